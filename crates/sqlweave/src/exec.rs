//! Statement execution: serialize against the client's dialect, run, hydrate.

use crate::client::{GenericClient, StreamingClient};
use crate::error::{SqlError, SqlResult};
use crate::hydrate::{Model, RowSet, Scanner, hydrate_all, hydrate_one};
use crate::sql::BuiltSql;
use crate::statement::SqlStatement;
use futures_util::StreamExt;
use std::future::Future;
use std::time::Duration;

/// Execution methods for every statement builder.
///
/// ```ignore
/// let films: Vec<Film> = select(film.all_columns())
///     .from(&film)
///     .where_(film.rating.eq("PG"))
///     .fetch_all(&client)
///     .await?;
/// ```
pub trait Executable: SqlStatement + Sync {
    /// Rows as returned by the client, without hydration.
    fn fetch_rows<C: GenericClient>(
        &self,
        client: &C,
    ) -> impl Future<Output = SqlResult<RowSet>> + Send {
        async move {
            let built = self.build_for(client)?;
            client.query(&built.sql, &built.args).await
        }
    }

    /// Every hydrated record.
    fn fetch_all<T: Model, C: GenericClient>(
        &self,
        client: &C,
    ) -> impl Future<Output = SqlResult<Vec<T>>> + Send {
        async move {
            let rows = self.fetch_rows(client).await?;
            hydrate_all(&rows)
        }
    }

    /// First hydrated record; `NotFound` when there is none.
    fn fetch_one<T: Model, C: GenericClient>(
        &self,
        client: &C,
    ) -> impl Future<Output = SqlResult<T>> + Send {
        async move {
            self.fetch_optional(client).await?.ok_or_else(|| {
                SqlError::not_found(format!(
                    "{} returned no {} record",
                    self.kind().as_str(),
                    T::descriptor().type_name
                ))
            })
        }
    }

    /// First hydrated record, if any.
    fn fetch_optional<T: Model, C: GenericClient>(
        &self,
        client: &C,
    ) -> impl Future<Output = SqlResult<Option<T>>> + Send {
        async move {
            let rows = self.fetch_rows(client).await?;
            hydrate_one(&rows)
        }
    }

    /// Run for its effect; returns the affected row count.
    fn execute<C: GenericClient>(&self, client: &C) -> impl Future<Output = SqlResult<u64>> + Send {
        async move {
            let built = self.build_for(client)?;
            client.execute(&built.sql, &built.args).await
        }
    }

    /// Hydrate from a row stream without materializing the result.
    fn fetch_stream<T: Model, C: StreamingClient>(
        &self,
        client: &C,
    ) -> impl Future<Output = SqlResult<Vec<T>>> + Send {
        async move {
            let built = self.build_for(client)?;
            let mut stream = client.query_stream(&built.sql, &built.args).await?;
            let mut scanner = Scanner::<T>::new(stream.columns());
            while let Some(row) = stream.next().await {
                scanner.push(&row?)?;
            }
            Ok(scanner.finish())
        }
    }

    fn fetch_all_within<T: Model, C: GenericClient>(
        &self,
        client: &C,
        timeout: Duration,
    ) -> impl Future<Output = SqlResult<Vec<T>>> + Send {
        within(timeout, self.fetch_all(client))
    }

    fn fetch_one_within<T: Model, C: GenericClient>(
        &self,
        client: &C,
        timeout: Duration,
    ) -> impl Future<Output = SqlResult<T>> + Send {
        within(timeout, self.fetch_one(client))
    }

    fn fetch_optional_within<T: Model, C: GenericClient>(
        &self,
        client: &C,
        timeout: Duration,
    ) -> impl Future<Output = SqlResult<Option<T>>> + Send {
        within(timeout, self.fetch_optional(client))
    }

    fn execute_within<C: GenericClient>(
        &self,
        client: &C,
        timeout: Duration,
    ) -> impl Future<Output = SqlResult<u64>> + Send {
        within(timeout, self.execute(client))
    }

    /// Serialize with the dialect `client` expects.
    fn build_for<C: GenericClient>(&self, client: &C) -> SqlResult<BuiltSql> {
        let built = self.build(client.dialect())?;

        #[cfg(feature = "tracing")]
        tracing::trace!(
            target: "sqlweave.sql",
            kind = self.kind().as_str(),
            dialect = client.dialect().name(),
            args = built.args.len(),
            "statement built"
        );

        Ok(built)
    }
}

impl<S: SqlStatement + Sync + ?Sized> Executable for S {}

async fn within<T>(
    timeout: Duration,
    future: impl Future<Output = SqlResult<T>>,
) -> SqlResult<T> {
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(SqlError::Timeout(timeout)),
    }
}
