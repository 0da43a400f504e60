//! Driver boundary: the two calls the crate makes against a database.

use crate::dialect::Dialect;
use crate::error::SqlResult;
use crate::hydrate::{ColumnMeta, RowSet, decode_row};
use crate::value::Value;
use futures_core::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

fn params(args: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    args.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

/// A trait that unifies database clients and transactions.
///
/// Statement execution only needs "run query, get rows" and "run statement,
/// get affected count". Anything implementing these two (a connection, a
/// transaction, a pooled client or a test double) can execute statements.
pub trait GenericClient: Send + Sync {
    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = SqlResult<RowSet>> + Send;

    /// Execute a query, associating a tag for monitoring/observability.
    ///
    /// The default implementation ignores `tag` and calls [`GenericClient::query`].
    fn query_tagged(
        &self,
        tag: &str,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = SqlResult<RowSet>> + Send {
        let _ = tag;
        self.query(sql, args)
    }

    /// Execute a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = SqlResult<u64>> + Send;

    /// Execute a statement, associating a tag for monitoring/observability.
    ///
    /// The default implementation ignores `tag` and calls [`GenericClient::execute`].
    fn execute_tagged(
        &self,
        tag: &str,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = SqlResult<u64>> + Send {
        let _ = tag;
        self.execute(sql, args)
    }

    /// Dialect statements are serialized with before reaching this client.
    fn dialect(&self) -> &Dialect {
        Dialect::postgres()
    }

    /// Return a cancellation token for the underlying connection, if supported.
    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        None
    }
}

async fn pg_query<C: tokio_postgres::GenericClient + Sync>(
    client: &C,
    sql: &str,
    args: &[Value],
) -> SqlResult<RowSet> {
    let rows = client.query(sql, &params(args)).await?;
    RowSet::from_pg_rows(&rows)
}

impl GenericClient for tokio_postgres::Client {
    async fn query(&self, sql: &str, args: &[Value]) -> SqlResult<RowSet> {
        pg_query(self, sql, args).await
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> SqlResult<u64> {
        Ok(tokio_postgres::Client::execute(self, sql, &params(args)).await?)
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        Some(tokio_postgres::Client::cancel_token(self))
    }
}

impl GenericClient for tokio_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, args: &[Value]) -> SqlResult<RowSet> {
        pg_query(self, sql, args).await
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> SqlResult<u64> {
        Ok(tokio_postgres::Transaction::execute(self, sql, &params(args)).await?)
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        Some(tokio_postgres::Transaction::cancel_token(self))
    }
}

/// A forward-only stream of decoded rows.
///
/// Column metadata is known before the first row arrives.
#[must_use]
pub struct RowStream {
    columns: Vec<ColumnMeta>,
    inner: Pin<Box<dyn Stream<Item = SqlResult<Vec<Value>>> + Send>>,
}

impl RowStream {
    pub fn new<S>(columns: Vec<ColumnMeta>, stream: S) -> Self
    where
        S: Stream<Item = SqlResult<Vec<Value>>> + Send + 'static,
    {
        Self {
            columns,
            inner: Box::pin(stream),
        }
    }

    /// Stream over an already materialized row set.
    pub fn from_row_set(rows: RowSet) -> Self {
        Self::new(
            rows.columns,
            futures_util::stream::iter(rows.rows.into_iter().map(Ok)),
        )
    }

    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }
}

impl Stream for RowStream {
    type Item = SqlResult<Vec<Value>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

/// Streaming query support.
///
/// Separate from [`GenericClient`] so that only clients that can stream rows
/// incrementally need to implement it.
pub trait StreamingClient: GenericClient {
    fn query_stream(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = SqlResult<RowStream>> + Send;

    /// The default implementation ignores `tag` and calls [`StreamingClient::query_stream`].
    fn query_stream_tagged(
        &self,
        tag: &str,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = SqlResult<RowStream>> + Send {
        let _ = tag;
        self.query_stream(sql, args)
    }
}

struct DecodeRowStream<S> {
    inner: Pin<Box<S>>,
}

impl<S> Stream for DecodeRowStream<S>
where
    S: Stream<Item = Result<Row, tokio_postgres::Error>> + Send + 'static,
{
    type Item = SqlResult<Vec<Value>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(row))) => Poll::Ready(Some(decode_row(&row))),
            Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(e.into()))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

async fn pg_stream<C: tokio_postgres::GenericClient + Sync>(
    client: &C,
    sql: &str,
    args: &[Value],
) -> SqlResult<RowStream> {
    let statement = client.prepare(sql).await?;
    let columns = statement.columns().iter().map(ColumnMeta::from_pg).collect();
    let stream = client.query_raw(&statement, params(args)).await?;
    Ok(RowStream::new(
        columns,
        DecodeRowStream {
            inner: Box::pin(stream),
        },
    ))
}

impl StreamingClient for tokio_postgres::Client {
    async fn query_stream(&self, sql: &str, args: &[Value]) -> SqlResult<RowStream> {
        pg_stream(self, sql, args).await
    }
}

impl StreamingClient for tokio_postgres::Transaction<'_> {
    async fn query_stream(&self, sql: &str, args: &[Value]) -> SqlResult<RowStream> {
        pg_stream(self, sql, args).await
    }
}

// ===== deadpool-postgres support =====

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::Client {
    async fn query(&self, sql: &str, args: &[Value]) -> SqlResult<RowSet> {
        // Delegate to the deref target (ClientWrapper / tokio_postgres::Client).
        GenericClient::query(&**self, sql, args).await
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> SqlResult<u64> {
        GenericClient::execute(&**self, sql, args).await
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        GenericClient::cancel_token(&**self)
    }
}

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::ClientWrapper {
    async fn query(&self, sql: &str, args: &[Value]) -> SqlResult<RowSet> {
        GenericClient::query(&**self, sql, args).await
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> SqlResult<u64> {
        GenericClient::execute(&**self, sql, args).await
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        GenericClient::cancel_token(&**self)
    }
}

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, args: &[Value]) -> SqlResult<RowSet> {
        GenericClient::query(&**self, sql, args).await
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> SqlResult<u64> {
        GenericClient::execute(&**self, sql, args).await
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        GenericClient::cancel_token(&**self)
    }
}

#[cfg(feature = "pool")]
impl StreamingClient for deadpool_postgres::Client {
    async fn query_stream(&self, sql: &str, args: &[Value]) -> SqlResult<RowStream> {
        StreamingClient::query_stream(&**self, sql, args).await
    }
}

#[cfg(feature = "pool")]
impl StreamingClient for deadpool_postgres::ClientWrapper {
    async fn query_stream(&self, sql: &str, args: &[Value]) -> SqlResult<RowStream> {
        StreamingClient::query_stream(&**self, sql, args).await
    }
}

#[cfg(feature = "pool")]
impl StreamingClient for deadpool_postgres::Transaction<'_> {
    async fn query_stream(&self, sql: &str, args: &[Value]) -> SqlResult<RowStream> {
        StreamingClient::query_stream(&**self, sql, args).await
    }
}

// ===== Reference implementations =====
// These allow InstrumentedClient to wrap &Client instead of owned Client

impl<C: GenericClient> GenericClient for &C {
    fn query(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = SqlResult<RowSet>> + Send {
        (*self).query(sql, args)
    }

    fn query_tagged(
        &self,
        tag: &str,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = SqlResult<RowSet>> + Send {
        (*self).query_tagged(tag, sql, args)
    }

    fn execute(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = SqlResult<u64>> + Send {
        (*self).execute(sql, args)
    }

    fn execute_tagged(
        &self,
        tag: &str,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = SqlResult<u64>> + Send {
        (*self).execute_tagged(tag, sql, args)
    }

    fn dialect(&self) -> &Dialect {
        (*self).dialect()
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        (*self).cancel_token()
    }
}

impl<C: StreamingClient> StreamingClient for &C {
    fn query_stream(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = SqlResult<RowStream>> + Send {
        (*self).query_stream(sql, args)
    }

    fn query_stream_tagged(
        &self,
        tag: &str,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = SqlResult<RowStream>> + Send {
        (*self).query_stream_tagged(tag, sql, args)
    }
}
