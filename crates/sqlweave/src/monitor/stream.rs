use super::config::MonitorConfig;
use super::instrumented::InstrumentedClient;
use super::types::{QueryContext, QueryHook, QueryMonitor, QueryResult};
use crate::client::{RowStream, StreamingClient};
use crate::error::{SqlError, SqlResult};
use crate::value::Value;
use futures_core::Stream;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

/// Counts rows as they pass and reports once the stream ends, fails, times
/// out or is dropped.
struct InstrumentedRowStream {
    inner: RowStream,
    monitor: Arc<dyn QueryMonitor>,
    hook: Option<Arc<dyn QueryHook>>,
    config: MonitorConfig,
    ctx: QueryContext,
    start: Instant,
    rows: usize,
    cancel_token: Option<tokio_postgres::CancelToken>,
    deadline: Option<(Duration, Pin<Box<tokio::time::Sleep>>)>,
    finished: bool,
}

impl InstrumentedRowStream {
    fn finalize(&mut self, dropped: bool, err: Option<&SqlError>) {
        if self.finished {
            return;
        }
        self.finished = true;
        if !self.config.monitoring_enabled {
            return;
        }
        self.ctx
            .fields
            .insert("stream_dropped".to_string(), dropped.to_string());

        let duration = self.start.elapsed();
        let outcome = match err {
            None => QueryResult::Rows(self.rows),
            Some(e) => QueryResult::error(e.to_string()),
        };
        if let Some(hook) = &self.hook {
            hook.after_query(&self.ctx, duration, &outcome);
        }
        self.monitor.on_query_complete(&self.ctx, duration, &outcome);
        if self.config.is_slow(duration) {
            self.monitor.on_slow_query(&self.ctx, duration);
        }
    }
}

impl Stream for InstrumentedRowStream {
    type Item = SqlResult<Vec<Value>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.finished {
            return Poll::Ready(None);
        }

        if let Some((timeout, sleep)) = self.deadline.as_mut() {
            if sleep.as_mut().poll(cx).is_ready() {
                let err = SqlError::Timeout(*timeout);
                self.deadline = None;
                if let Some(cancel_token) = self.cancel_token.take() {
                    tokio::spawn(async move {
                        let _ = cancel_token.cancel_query(tokio_postgres::NoTls).await;
                    });
                }
                self.finalize(false, Some(&err));
                return Poll::Ready(Some(Err(err)));
            }
        }

        match Pin::new(&mut self.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(row))) => {
                self.rows += 1;
                Poll::Ready(Some(Ok(row)))
            }
            Poll::Ready(Some(Err(e))) => {
                self.finalize(false, Some(&e));
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                self.finalize(false, None);
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for InstrumentedRowStream {
    fn drop(&mut self) {
        self.finalize(true, None);
    }
}

impl<C: StreamingClient> InstrumentedClient<C> {
    async fn query_stream_inner(
        &self,
        sql: &str,
        args: &[Value],
        tag: Option<&str>,
    ) -> SqlResult<RowStream> {
        let mut ctx = self.prepare(sql, args.len(), tag)?;
        ctx.fields.insert("stream".to_string(), "true".to_string());

        let start = Instant::now();
        let stream = match self
            .with_timeout(self.client.query_stream(&ctx.exec_sql, args))
            .await
        {
            Ok(stream) => stream,
            Err(e) => {
                self.report_result(&ctx, start.elapsed(), &QueryResult::error(e.to_string()));
                return Err(e);
            }
        };

        if self.config.is_passive() {
            return Ok(stream);
        }

        let deadline = self.config.query_timeout.map(|timeout| {
            let remaining = timeout.saturating_sub(start.elapsed());
            (timeout, Box::pin(tokio::time::sleep(remaining)))
        });
        let columns = stream.columns().to_vec();
        Ok(RowStream::new(
            columns,
            InstrumentedRowStream {
                inner: stream,
                monitor: self.monitor.clone(),
                hook: self.hook.clone(),
                config: self.config,
                ctx,
                start,
                rows: 0,
                cancel_token: self.client.cancel_token(),
                deadline,
                finished: false,
            },
        ))
    }
}

impl<C: StreamingClient> StreamingClient for InstrumentedClient<C> {
    async fn query_stream(&self, sql: &str, args: &[Value]) -> SqlResult<RowStream> {
        self.query_stream_inner(sql, args, None).await
    }

    async fn query_stream_tagged(
        &self,
        tag: &str,
        sql: &str,
        args: &[Value],
    ) -> SqlResult<RowStream> {
        self.query_stream_inner(sql, args, Some(tag)).await
    }
}
