use std::time::Duration;

/// Settings of an [`InstrumentedClient`](super::InstrumentedClient).
///
/// Nothing is enforced and no monitor is notified until configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Deadline per statement; exceeded statements fail with `SqlError::Timeout`.
    pub query_timeout: Option<Duration>,
    /// Duration above which `QueryMonitor::on_slow_query` fires.
    pub slow_query_threshold: Option<Duration>,
    pub monitoring_enabled: bool,
}

impl MonitorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query_timeout(self, timeout: Duration) -> Self {
        MonitorConfig {
            query_timeout: Some(timeout),
            ..self
        }
    }

    pub fn with_slow_query_threshold(self, threshold: Duration) -> Self {
        MonitorConfig {
            slow_query_threshold: Some(threshold),
            ..self
        }
    }

    pub fn enable_monitoring(self) -> Self {
        MonitorConfig {
            monitoring_enabled: true,
            ..self
        }
    }

    pub fn disable_monitoring(self) -> Self {
        MonitorConfig {
            monitoring_enabled: false,
            ..self
        }
    }

    /// `elapsed` crosses the slow-query threshold.
    pub fn is_slow(&self, elapsed: Duration) -> bool {
        self.slow_query_threshold
            .is_some_and(|threshold| elapsed > threshold)
    }

    /// Whether the client must wrap statements at all.
    pub(crate) fn is_passive(&self) -> bool {
        !self.monitoring_enabled && self.query_timeout.is_none()
    }
}
