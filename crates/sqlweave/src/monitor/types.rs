use crate::sql::StatementKind;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// The type of SQL operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    /// SELECT, set operations and WITH ... SELECT
    Select,
    Insert,
    Update,
    Delete,
    Lock,
    /// Anything else (DDL, raw SQL)
    Other,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Select => "SELECT",
            QueryType::Insert => "INSERT",
            QueryType::Update => "UPDATE",
            QueryType::Delete => "DELETE",
            QueryType::Lock => "LOCK",
            QueryType::Other => "OTHER",
        }
    }

    /// Detect the query type from the leading keyword of `sql`.
    ///
    /// `WITH` is resolved by the first DML keyword that follows the CTE
    /// definitions at parenthesis depth zero.
    pub fn from_sql(sql: &str) -> Self {
        let mut depth = 0usize;
        let mut in_string = false;
        let mut word_start: Option<usize> = None;
        let mut saw_with = false;

        for (i, ch) in sql.char_indices().chain(std::iter::once((sql.len(), ' '))) {
            if in_string {
                in_string = ch != '\'';
                continue;
            }
            if ch.is_ascii_alphabetic() || ch == '_' {
                word_start.get_or_insert(i);
                continue;
            }
            if let Some(start) = word_start.take() {
                if depth == 0 {
                    match Self::keyword(&sql[start..i]) {
                        Some(kind) => return kind,
                        None if !saw_with && sql[start..i].eq_ignore_ascii_case("WITH") => {
                            saw_with = true;
                        }
                        None if !saw_with => return QueryType::Other,
                        None => {}
                    }
                }
            }
            match ch {
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                '\'' => in_string = true,
                _ => {}
            }
        }
        QueryType::Other
    }

    fn keyword(word: &str) -> Option<Self> {
        [
            ("SELECT", QueryType::Select),
            ("INSERT", QueryType::Insert),
            ("UPDATE", QueryType::Update),
            ("DELETE", QueryType::Delete),
            ("LOCK", QueryType::Lock),
        ]
        .into_iter()
        .find(|(kw, _)| word.eq_ignore_ascii_case(kw))
        .map(|(_, kind)| kind)
    }
}

impl From<StatementKind> for QueryType {
    fn from(kind: StatementKind) -> Self {
        match kind {
            StatementKind::Select | StatementKind::SetOperation => QueryType::Select,
            StatementKind::Insert => QueryType::Insert,
            StatementKind::Update => QueryType::Update,
            StatementKind::Delete => QueryType::Delete,
            StatementKind::Lock => QueryType::Lock,
        }
    }
}

/// Context information about the query being executed.
#[derive(Debug, Clone)]
pub struct QueryContext {
    /// SQL used as the metrics aggregation key.
    pub canonical_sql: String,
    /// The SQL actually sent to the database.
    pub exec_sql: String,
    /// Number of bound arguments.
    pub param_count: usize,
    pub query_type: QueryType,
    /// Optional query name/tag for identification.
    pub tag: Option<String>,
    /// Optional structured fields for observability (low-cardinality).
    pub fields: BTreeMap<String, String>,
}

impl QueryContext {
    pub fn new(sql: &str, param_count: usize) -> Self {
        Self {
            canonical_sql: sql.to_string(),
            exec_sql: sql.to_string(),
            param_count,
            query_type: QueryType::from_sql(sql),
            tag: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// Maximum length for error messages in `QueryResult::Error`.
const MAX_ERROR_LEN: usize = 512;

/// Result of a query execution for monitoring purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    /// Query returned rows.
    Rows(usize),
    /// Statement affected rows.
    Affected(u64),
    /// Query failed (message truncated to 512 bytes).
    Error(String),
}

impl QueryResult {
    /// Create an error result, truncating the message.
    pub fn error(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        Self::Error(super::clip(&msg, MAX_ERROR_LEN).into_owned())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, QueryResult::Error(_))
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Rows(n) => write!(f, "{n} rows"),
            QueryResult::Affected(n) => write!(f, "{n} affected"),
            QueryResult::Error(e) => write!(f, "error: {e}"),
        }
    }
}

/// Observes SQL execution: metrics, logging, alerting.
pub trait QueryMonitor: Send + Sync {
    /// Called before a query is executed.
    fn on_query_start(&self, _ctx: &QueryContext) {}

    /// Called after a query completes (success or failure).
    fn on_query_complete(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult);

    /// Called when a query exceeds the slow-query threshold.
    fn on_slow_query(&self, _ctx: &QueryContext, _duration: Duration) {}
}

/// Action to take after a hook processes a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookAction {
    /// Continue with the original query.
    Continue,
    /// Continue with a modified SQL statement.
    ModifySql {
        exec_sql: String,
        /// Optional override for the canonical SQL.
        canonical_sql: Option<String>,
    },
    /// Abort the query with an error.
    Abort(String),
}

/// Inspects, rewrites or vetoes SQL before it reaches the database.
pub trait QueryHook: Send + Sync {
    fn before_query(&self, ctx: &QueryContext) -> HookAction {
        let _ = ctx;
        HookAction::Continue
    }

    /// Called after a query completes, before monitors are notified.
    fn after_query(&self, _ctx: &QueryContext, _duration: Duration, _result: &QueryResult) {}
}
