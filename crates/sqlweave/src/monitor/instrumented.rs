use super::config::MonitorConfig;
use super::monitors::{CompositeHook, NoopMonitor};
use super::types::{HookAction, QueryContext, QueryHook, QueryMonitor, QueryResult, QueryType};
use crate::client::GenericClient;
use crate::dialect::Dialect;
use crate::error::{SqlError, SqlResult};
use crate::hydrate::RowSet;
use crate::value::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Wraps a [`GenericClient`] with hooks, monitors and a query timeout.
///
/// Hooks run on every call; monitors only receive events once monitoring is
/// enabled through [`MonitorConfig::enable_monitoring`].
pub struct InstrumentedClient<C> {
    pub(super) client: C,
    pub(super) monitor: Arc<dyn QueryMonitor>,
    pub(super) hook: Option<Arc<dyn QueryHook>>,
    pub(super) config: MonitorConfig,
}

impl<C: GenericClient> InstrumentedClient<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            monitor: Arc::new(NoopMonitor),
            hook: None,
            config: MonitorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_monitor<M: QueryMonitor + 'static>(mut self, monitor: M) -> Self {
        self.monitor = Arc::new(monitor);
        self
    }

    pub fn with_monitor_arc(mut self, monitor: Arc<dyn QueryMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    /// Replace the hook.
    pub fn with_hook<H: QueryHook + 'static>(mut self, hook: H) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// Add a hook after any already set.
    pub fn add_hook<H: QueryHook + 'static>(self, hook: H) -> Self {
        self.add_hook_arc(Arc::new(hook))
    }

    pub fn add_hook_arc(mut self, hook: Arc<dyn QueryHook>) -> Self {
        self.hook = Some(match self.hook.take() {
            None => hook,
            Some(existing) => Arc::new(CompositeHook::new().add_arc(existing).add_arc(hook)),
        });
        self
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.config.query_timeout = Some(timeout);
        self
    }

    pub fn enable_monitoring(mut self) -> Self {
        self.config.monitoring_enabled = true;
        self
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn inner(&self) -> &C {
        &self.client
    }

    pub fn into_inner(self) -> C {
        self.client
    }

    /// Build the context for `sql` and let the hook rewrite or veto it.
    pub(super) fn prepare(
        &self,
        sql: &str,
        param_count: usize,
        tag: Option<&str>,
    ) -> SqlResult<QueryContext> {
        let mut ctx = QueryContext::new(sql, param_count);
        ctx.tag = tag.map(str::to_string);

        if let Some(hook) = &self.hook {
            match hook.before_query(&ctx) {
                HookAction::Continue => {}
                HookAction::ModifySql {
                    exec_sql,
                    canonical_sql,
                } => {
                    ctx.exec_sql = exec_sql;
                    if let Some(canonical_sql) = canonical_sql {
                        ctx.canonical_sql = canonical_sql;
                    }
                    ctx.query_type = QueryType::from_sql(&ctx.canonical_sql);
                }
                HookAction::Abort(reason) => {
                    return Err(SqlError::validation(format!(
                        "Query aborted by hook: {reason}"
                    )));
                }
            }
        }

        if self.config.monitoring_enabled {
            self.monitor.on_query_start(&ctx);
        }
        Ok(ctx)
    }

    pub(super) fn report_result(
        &self,
        ctx: &QueryContext,
        duration: Duration,
        result: &QueryResult,
    ) {
        if !self.config.monitoring_enabled {
            return;
        }
        if let Some(hook) = &self.hook {
            hook.after_query(ctx, duration, result);
        }
        self.monitor.on_query_complete(ctx, duration, result);
        if self.config.is_slow(duration) {
            self.monitor.on_slow_query(ctx, duration);
        }
    }

    pub(super) async fn with_timeout<T, F>(&self, future: F) -> SqlResult<T>
    where
        F: std::future::Future<Output = SqlResult<T>> + Send,
    {
        let Some(timeout) = self.config.query_timeout else {
            return future.await;
        };
        match tokio::time::timeout(timeout, future).await {
            Ok(result) => result,
            Err(_) => {
                if let Some(cancel_token) = self.client.cancel_token() {
                    tokio::spawn(async move {
                        let _ = cancel_token.cancel_query(tokio_postgres::NoTls).await;
                    });
                }
                Err(SqlError::Timeout(timeout))
            }
        }
    }

    async fn query_inner(&self, sql: &str, args: &[Value], tag: Option<&str>) -> SqlResult<RowSet> {
        let ctx = self.prepare(sql, args.len(), tag)?;
        let start = Instant::now();
        let result = self
            .with_timeout(self.client.query(&ctx.exec_sql, args))
            .await;
        let outcome = match &result {
            Ok(rows) => QueryResult::Rows(rows.len()),
            Err(e) => QueryResult::error(e.to_string()),
        };
        self.report_result(&ctx, start.elapsed(), &outcome);
        result
    }

    async fn execute_inner(&self, sql: &str, args: &[Value], tag: Option<&str>) -> SqlResult<u64> {
        let ctx = self.prepare(sql, args.len(), tag)?;
        let start = Instant::now();
        let result = self
            .with_timeout(self.client.execute(&ctx.exec_sql, args))
            .await;
        let outcome = match &result {
            Ok(n) => QueryResult::Affected(*n),
            Err(e) => QueryResult::error(e.to_string()),
        };
        self.report_result(&ctx, start.elapsed(), &outcome);
        result
    }
}

impl<C: GenericClient> GenericClient for InstrumentedClient<C> {
    async fn query(&self, sql: &str, args: &[Value]) -> SqlResult<RowSet> {
        self.query_inner(sql, args, None).await
    }

    async fn query_tagged(&self, tag: &str, sql: &str, args: &[Value]) -> SqlResult<RowSet> {
        self.query_inner(sql, args, Some(tag)).await
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> SqlResult<u64> {
        self.execute_inner(sql, args, None).await
    }

    async fn execute_tagged(&self, tag: &str, sql: &str, args: &[Value]) -> SqlResult<u64> {
        self.execute_inner(sql, args, Some(tag)).await
    }

    fn dialect(&self) -> &Dialect {
        self.client.dialect()
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        self.client.cancel_token()
    }
}
