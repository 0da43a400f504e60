//! Observing statements on their way to the database.
//!
//! An [`InstrumentedClient`] sits between [`Executable`](crate::Executable)
//! and the real [`GenericClient`](crate::GenericClient). Each serialized
//! statement first passes the [`QueryHook`] chain, which may rewrite its text
//! or refuse it; once it completes, every [`QueryMonitor`] receives the
//! elapsed time and the outcome. A configured timeout cancels the statement
//! server-side when the client exposes a cancel token.
//!
//! # Example
//!
//! ```rust,ignore
//! use sqlweave::monitor::{InstrumentedClient, LoggingMonitor, MonitorConfig};
//! use std::time::Duration;
//!
//! let config = MonitorConfig::new()
//!     .with_query_timeout(Duration::from_secs(30))
//!     .with_slow_query_threshold(Duration::from_secs(5))
//!     .enable_monitoring();
//!
//! let client = InstrumentedClient::new(db_client)
//!     .with_config(config)
//!     .with_monitor(LoggingMonitor::new());
//!
//! let films: Vec<Film> = stmt.fetch_all(&client).await?;
//! ```

use std::borrow::Cow;

mod config;
mod instrumented;
mod monitors;
mod stream;
mod types;

#[cfg(feature = "tracing")]
mod tracing_hook;

#[cfg(test)]
mod tests;

pub use config::MonitorConfig;
pub use instrumented::InstrumentedClient;
pub use monitors::{
    CompositeHook, CompositeMonitor, LoggingMonitor, NoopMonitor, QueryStats, StatsMonitor,
};
pub use types::{HookAction, QueryContext, QueryHook, QueryMonitor, QueryResult, QueryType};

#[cfg(feature = "tracing")]
pub use tracing_hook::TracingSqlHook;

/// `text` cut to at most `max_bytes` on a char boundary, marked with `...`.
pub(crate) fn clip(text: &str, max_bytes: usize) -> Cow<'_, str> {
    if text.len() <= max_bytes {
        return Cow::Borrowed(text);
    }
    let end = text
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= max_bytes)
        .last()
        .unwrap_or(0);
    Cow::Owned(format!("{}...", &text[..end]))
}
