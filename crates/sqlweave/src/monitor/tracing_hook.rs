use super::clip;
use super::types::{HookAction, QueryContext, QueryHook};
use tracing::Level;

/// Logs each statement before it is sent, as a `tracing` event on target
/// `sqlweave.sql`.
///
/// Being a hook, it fires whether or not monitoring is enabled on the
/// [`InstrumentedClient`](super::InstrumentedClient).
///
/// ```ignore
/// let client = InstrumentedClient::new(client)
///     .with_hook(TracingSqlHook::new().with_level(Level::INFO).truncate_at(None));
/// ```
#[derive(Debug, Clone)]
pub struct TracingSqlHook {
    level: Level,
    truncate_at: Option<usize>,
}

impl Default for TracingSqlHook {
    fn default() -> Self {
        TracingSqlHook {
            level: Level::DEBUG,
            truncate_at: Some(200),
        }
    }
}

impl TracingSqlHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(self, level: Level) -> Self {
        TracingSqlHook { level, ..self }
    }

    /// Longest statement text logged, in bytes; `None` logs it whole.
    pub fn truncate_at(self, max_bytes: Option<usize>) -> Self {
        TracingSqlHook {
            truncate_at: max_bytes,
            ..self
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Statement text as it will appear in the event.
    pub(crate) fn loggable<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        let sql = sql.trim();
        match self.truncate_at {
            Some(max) => clip(sql, max),
            None => sql.into(),
        }
    }
}

/// `tracing` levels must be known at the call site.
macro_rules! event_at {
    ($level:expr, $($field:tt)*) => {
        match $level {
            Level::ERROR => tracing::error!($($field)*),
            Level::WARN => tracing::warn!($($field)*),
            Level::INFO => tracing::info!($($field)*),
            Level::DEBUG => tracing::debug!($($field)*),
            Level::TRACE => tracing::trace!($($field)*),
        }
    };
}

impl QueryHook for TracingSqlHook {
    fn before_query(&self, ctx: &QueryContext) -> HookAction {
        let sql = self.loggable(&ctx.exec_sql);
        event_at!(
            self.level,
            target: "sqlweave.sql",
            kind = ctx.query_type.as_str(),
            tag = ctx.tag.as_deref().unwrap_or("-"),
            args = ctx.param_count,
            sql = %sql,
            "executing statement"
        );
        HookAction::Continue
    }
}
