//! The event port the scanner reports through.

use super::{ComparisonEvent, LogLevel, SummaryEvent};

/// Receives one-way notifications from a scan.
///
/// Implement this to plug the scanner into a UI. None of the methods can
/// fail; a sink that cannot keep up should drop events rather than block.
pub trait EventSink {
    /// A pair was compared
    fn on_comparison(&mut self, event: &ComparisonEvent);

    /// The scan reached Done
    fn on_summary(&mut self, event: &SummaryEvent);

    /// A log line for the operator
    fn on_log(&mut self, level: LogLevel, message: &str);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn on_comparison(&mut self, event: &ComparisonEvent) {
        (**self).on_comparison(event)
    }

    fn on_summary(&mut self, event: &SummaryEvent) {
        (**self).on_summary(event)
    }

    fn on_log(&mut self, level: LogLevel, message: &str) {
        (**self).on_log(level, message)
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_comparison(&mut self, _event: &ComparisonEvent) {}

    fn on_summary(&mut self, _event: &SummaryEvent) {}

    fn on_log(&mut self, _level: LogLevel, _message: &str) {}
}

/// Forwards log lines and summaries to `tracing`.
///
/// Comparisons are only traced at debug level; preview frames are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn on_comparison(&mut self, event: &ComparisonEvent) {
        tracing::debug!(
            reference = %event.reference.display(),
            candidate = %event.candidate.display(),
            distance = event.distance,
            duplicate = event.is_duplicate,
            "compared"
        );
    }

    fn on_summary(&mut self, event: &SummaryEvent) {
        tracing::info!(
            duplicates = event.duplicate_count,
            moved = event.moved_count,
            comparisons = event.comparisons,
            cancelled = event.cancelled,
            "scan finished"
        );
    }

    fn on_log(&mut self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!("{}", message),
            LogLevel::Info => tracing::info!("{}", message),
            LogLevel::Warn => tracing::warn!("{}", message),
            LogLevel::Error => tracing::error!("{}", message),
        }
    }
}
