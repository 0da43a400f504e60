use super::*;
use crate::client::{GenericClient, RowStream, StreamingClient};
use crate::error::{SqlError, SqlResult};
use crate::hydrate::RowSet;
use crate::sql::StatementKind;
use crate::value::Value;
use futures_util::StreamExt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ── Test doubles ──

/// Returns `rows` for every query and remembers the SQL it was given.
#[derive(Default)]
struct FakeClient {
    rows: RowSet,
    delay: Option<Duration>,
    seen: Mutex<Vec<String>>,
}

impl FakeClient {
    fn with_rows(n: usize) -> Self {
        let mut rows = RowSet::with_column_names(["n"]);
        for i in 0..n {
            rows.push(vec![Value::Int(i as i64)]);
        }
        FakeClient {
            rows,
            ..Default::default()
        }
    }

    fn slow(delay: Duration) -> Self {
        FakeClient {
            delay: Some(delay),
            ..Default::default()
        }
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    async fn record(&self, sql: &str) {
        self.seen.lock().unwrap().push(sql.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl GenericClient for FakeClient {
    async fn query(&self, sql: &str, _args: &[Value]) -> SqlResult<RowSet> {
        self.record(sql).await;
        Ok(self.rows.clone())
    }

    async fn execute(&self, sql: &str, _args: &[Value]) -> SqlResult<u64> {
        self.record(sql).await;
        Ok(3)
    }
}

impl StreamingClient for FakeClient {
    async fn query_stream(&self, sql: &str, _args: &[Value]) -> SqlResult<RowStream> {
        self.record(sql).await;
        Ok(RowStream::from_row_set(self.rows.clone()))
    }
}

#[derive(Default)]
struct RecordingMonitor {
    events: Mutex<Vec<(QueryType, Option<String>, QueryResult)>>,
    slow: Mutex<usize>,
}

impl QueryMonitor for RecordingMonitor {
    fn on_query_complete(&self, ctx: &QueryContext, _duration: Duration, result: &QueryResult) {
        self.events
            .lock()
            .unwrap()
            .push((ctx.query_type, ctx.tag.clone(), result.clone()));
    }

    fn on_slow_query(&self, _ctx: &QueryContext, _duration: Duration) {
        *self.slow.lock().unwrap() += 1;
    }
}

struct Rewrite(&'static str);

impl QueryHook for Rewrite {
    fn before_query(&self, _ctx: &QueryContext) -> HookAction {
        HookAction::ModifySql {
            exec_sql: self.0.to_string(),
            canonical_sql: None,
        }
    }
}

struct Veto;

impl QueryHook for Veto {
    fn before_query(&self, _ctx: &QueryContext) -> HookAction {
        HookAction::Abort("read-only".into())
    }
}

// ── QueryType ──

#[test]
fn query_type_follows_leading_keyword() {
    assert_eq!(QueryType::from_sql("\nSELECT a FROM t;\n"), QueryType::Select);
    assert_eq!(QueryType::from_sql("  insert INTO t VALUES ($1)"), QueryType::Insert);
    assert_eq!(QueryType::from_sql("\nUPDATE t\nSET a = $1"), QueryType::Update);
    assert_eq!(QueryType::from_sql("DELETE FROM t WHERE a"), QueryType::Delete);
    assert_eq!(QueryType::from_sql("\nLOCK TABLE t IN SHARE MODE;"), QueryType::Lock);
    assert_eq!(QueryType::from_sql("CREATE TABLE t (a INT)"), QueryType::Other);
    assert_eq!(QueryType::from_sql(""), QueryType::Other);
}

#[test]
fn query_type_looks_past_cte_definitions() {
    assert_eq!(
        QueryType::from_sql("\nWITH c AS (\n     SELECT 1\n)\nDELETE FROM t USING c"),
        QueryType::Delete
    );
    assert_eq!(
        QueryType::from_sql("WITH RECURSIVE r AS (SELECT ')' AS p) SELECT * FROM r"),
        QueryType::Select
    );
}

#[test]
fn query_type_from_statement_kind() {
    assert_eq!(QueryType::from(StatementKind::SetOperation), QueryType::Select);
    assert_eq!(QueryType::from(StatementKind::Lock), QueryType::Lock);
}

#[test]
fn query_type_names() {
    assert_eq!(QueryType::Select.as_str(), "SELECT");
    assert_eq!(QueryType::Other.as_str(), "OTHER");
}

// ── Config and clipping ──

#[test]
fn slow_threshold_is_exclusive() {
    let config = MonitorConfig::new().with_slow_query_threshold(Duration::from_millis(5));
    assert!(!config.is_slow(Duration::from_millis(5)));
    assert!(config.is_slow(Duration::from_millis(6)));
    assert!(!MonitorConfig::new().is_slow(Duration::from_secs(60)));
}

#[test]
fn passive_config_needs_no_wrapping() {
    assert!(MonitorConfig::new().is_passive());
    assert!(!MonitorConfig::new().enable_monitoring().is_passive());
    assert!(!MonitorConfig::new()
        .with_query_timeout(Duration::from_secs(1))
        .is_passive());
}

#[test]
fn clip_respects_char_boundaries() {
    assert_eq!(clip("short", 10), "short");
    assert_eq!(clip("abcdef", 3), "abc...");
    // 'é' is two bytes; cutting at 2 would split it
    assert_eq!(clip("aéb", 2), "a...");
}

#[cfg(feature = "tracing")]
#[test]
fn tracing_hook_trims_and_clips() {
    let hook = TracingSqlHook::new().truncate_at(Some(8));
    assert_eq!(hook.loggable("\nSELECT a, b FROM t;\n"), "SELECT a...");
    assert_eq!(hook.level(), tracing::Level::DEBUG);

    let whole = TracingSqlHook::new().truncate_at(None);
    assert_eq!(whole.loggable(" SELECT 1 "), "SELECT 1");
    assert_eq!(whole.before_query(&QueryContext::new("SELECT 1", 0)), HookAction::Continue);
}

// ── Monitors ──

#[test]
fn logging_monitor_flattens_and_truncates() {
    let monitor = LoggingMonitor::new().max_sql_length(12);
    assert_eq!(monitor.format_sql("\nSELECT a\nFROM t;\n"), "SELECT a FRO...");
    assert_eq!(monitor.format_sql("SELECT 1"), "SELECT 1");
}

#[test]
fn stats_monitor_counts_by_kind() {
    let monitor = StatsMonitor::new();
    let select = QueryContext::new("SELECT 1", 0);
    let update = QueryContext::new("UPDATE t SET a = 1 WHERE b", 0);

    monitor.on_query_complete(&select, Duration::from_millis(10), &QueryResult::Rows(5));
    monitor.on_query_complete(&update, Duration::from_millis(20), &QueryResult::Affected(1));
    monitor.on_query_complete(&select, Duration::from_millis(5), &QueryResult::error("boom"));

    let stats = monitor.stats();
    assert_eq!(stats.total_queries, 3);
    assert_eq!(stats.select_count, 2);
    assert_eq!(stats.update_count, 1);
    assert_eq!(stats.failed_queries, 1);
    assert_eq!(stats.total_duration, Duration::from_millis(35));
    assert_eq!(stats.max_duration, Duration::from_millis(20));
    assert_eq!(stats.slowest_query.as_deref(), Some("UPDATE t SET a = 1 WHERE b"));

    monitor.reset();
    assert_eq!(monitor.stats(), QueryStats::default());
}

#[test]
fn long_error_messages_are_truncated() {
    let result = QueryResult::error("x".repeat(2000));
    match result {
        QueryResult::Error(msg) => assert_eq!(msg.len(), 512 + 3),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn composite_hook_chains_rewrites_and_stops_at_abort() {
    let ctx = QueryContext::new("SELECT 1", 0);

    let hook = CompositeHook::new().add(Rewrite("SELECT 2")).add(Rewrite("SELECT 3"));
    assert_eq!(
        hook.before_query(&ctx),
        HookAction::ModifySql {
            exec_sql: "SELECT 3".into(),
            canonical_sql: None,
        }
    );

    let hook = CompositeHook::new().add(Rewrite("SELECT 2")).add(Veto);
    assert!(matches!(hook.before_query(&ctx), HookAction::Abort(_)));

    let hook = CompositeHook::new();
    assert_eq!(hook.before_query(&ctx), HookAction::Continue);
}

// ── InstrumentedClient ──

#[tokio::test]
async fn monitors_receive_outcomes_when_enabled() {
    let monitor = Arc::new(RecordingMonitor::default());
    let client = InstrumentedClient::new(FakeClient::with_rows(2))
        .with_config(MonitorConfig::new().enable_monitoring())
        .with_monitor_arc(monitor.clone());

    let rows = client.query("SELECT n FROM t", &[]).await.unwrap();
    assert_eq!(rows.len(), 2);
    let affected = client
        .execute_tagged("cleanup", "DELETE FROM t WHERE n", &[])
        .await
        .unwrap();
    assert_eq!(affected, 3);

    let events = monitor.events.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0], (QueryType::Select, None, QueryResult::Rows(2)));
    assert_eq!(
        events[1],
        (
            QueryType::Delete,
            Some("cleanup".to_string()),
            QueryResult::Affected(3)
        )
    );
}

#[tokio::test]
async fn monitors_are_silent_when_disabled() {
    let monitor = Arc::new(RecordingMonitor::default());
    let client = InstrumentedClient::new(FakeClient::with_rows(1)).with_monitor_arc(monitor.clone());

    client.query("SELECT 1", &[]).await.unwrap();
    assert!(monitor.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn hook_rewrites_sql_sent_to_client() {
    let client = InstrumentedClient::new(FakeClient::default()).with_hook(Rewrite("SELECT 42"));
    client.query("SELECT 1", &[]).await.unwrap();
    assert_eq!(client.inner().seen(), vec!["SELECT 42"]);
}

#[tokio::test]
async fn hook_abort_never_reaches_client() {
    let client = InstrumentedClient::new(FakeClient::default()).add_hook(Veto);
    let err = client.execute("DELETE FROM t WHERE a", &[]).await.unwrap_err();
    assert!(matches!(err, SqlError::Validation(_)));
    assert!(client.inner().seen().is_empty());
}

#[tokio::test]
async fn slow_statements_time_out() {
    let monitor = Arc::new(RecordingMonitor::default());
    let client = InstrumentedClient::new(FakeClient::slow(Duration::from_millis(200)))
        .with_config(
            MonitorConfig::new()
                .with_query_timeout(Duration::from_millis(10))
                .enable_monitoring(),
        )
        .with_monitor_arc(monitor.clone());

    let err = client.query("SELECT pg_sleep(1)", &[]).await.unwrap_err();
    assert!(err.is_timeout());
    let events = monitor.events.lock().unwrap();
    assert!(events[0].2.is_error());
}

#[tokio::test]
async fn slow_query_threshold_notifies_monitor() {
    let monitor = Arc::new(RecordingMonitor::default());
    let client = InstrumentedClient::new(FakeClient::slow(Duration::from_millis(20)))
        .with_config(
            MonitorConfig::new()
                .with_slow_query_threshold(Duration::from_millis(1))
                .enable_monitoring(),
        )
        .with_monitor_arc(monitor.clone());

    client.query("SELECT 1", &[]).await.unwrap();
    assert_eq!(*monitor.slow.lock().unwrap(), 1);
}

#[tokio::test]
async fn streams_report_row_count_when_exhausted() {
    let monitor = Arc::new(RecordingMonitor::default());
    let client = InstrumentedClient::new(FakeClient::with_rows(3))
        .with_config(MonitorConfig::new().enable_monitoring())
        .with_monitor_arc(monitor.clone());

    let mut stream = client.query_stream("SELECT n FROM t", &[]).await.unwrap();
    assert_eq!(stream.columns().len(), 1);
    let mut count = 0;
    while let Some(row) = stream.next().await {
        row.unwrap();
        count += 1;
    }
    assert_eq!(count, 3);
    drop(stream);

    let events = monitor.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].2, QueryResult::Rows(3));
}

#[tokio::test]
async fn instrumented_client_keeps_inner_dialect() {
    let client = InstrumentedClient::new(FakeClient::default());
    assert_eq!(client.dialect().name(), "postgres");
}
