//! Event logging for program passes.
//!
//! Every decision the specialization pass makes is recorded as an [`Event`]:
//! the per-call clone verdict, each clone created, each call retargeted and
//! each argument folded into a clone. Events can be inspected by tests and
//! tools, or ignored.
//!
//! # Architecture
//!
//! - [`Event`] - A single recorded event
//! - [`EventLog`] - Append-only collection of events with query and summary helpers
//! - [`EventBuilder`] - Fluent API for creating events
//!
//! # Example
//!
//! ```rust
//! use argspec::compiler::{EventKind, EventLog};
//! use argspec::ir::{CallSite, FunctionId};
//!
//! let log = EventLog::new();
//!
//! log.record(EventKind::CloneRequired)
//!     .at(CallSite::new(FunctionId::new(1), 0, 0))
//!     .message("needs to be cloned: sum");
//! log.record(EventKind::CloneNotRequired)
//!     .at(CallSite::new(FunctionId::new(1), 0, 2))
//!     .message("does not need to be cloned: sum");
//!
//! assert!(log.has(EventKind::CloneRequired));
//! assert_eq!(log.decisions().count(), 2);
//! ```

use std::{fmt, time::Duration};

use rustc_hash::FxHashMap;
use strum::{EnumCount, EnumIter, IntoEnumIterator};

use crate::ir::{CallSite, FunctionId};

/// Categories of events that can be logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount)]
pub enum EventKind {
    /// A direct call passes an integer constant and its target is an original.
    CloneRequired,
    /// A direct call does not qualify for specialization.
    CloneNotRequired,
    /// A specialized copy of a function was appended to the program.
    FunctionCloned,
    /// A call was pointed at a specialized copy.
    CallRetargeted,
    /// A parameter of a specialized copy was replaced by a constant.
    ArgumentSubstituted,

    /// A pass started.
    PassStarted,
    /// A pass completed.
    PassCompleted,

    /// Something unexpected but recoverable, such as the clone limit being hit.
    Warning,
}

impl EventKind {
    /// Returns a human-readable description of this event kind.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::CloneRequired => "clone required",
            Self::CloneNotRequired => "clone not required",
            Self::FunctionCloned => "function cloned",
            Self::CallRetargeted => "call retargeted",
            Self::ArgumentSubstituted => "argument substituted",
            Self::PassStarted => "pass started",
            Self::PassCompleted => "pass completed",
            Self::Warning => "warning",
        }
    }

    /// Returns true if this event represents a change to the program.
    #[must_use]
    pub fn is_transformation(&self) -> bool {
        matches!(
            self,
            Self::FunctionCloned | Self::CallRetargeted | Self::ArgumentSubstituted
        )
    }

    /// Returns true if this is a per-call clone verdict.
    #[must_use]
    pub fn is_decision(&self) -> bool {
        matches!(self, Self::CloneRequired | Self::CloneNotRequired)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A single logged event.
#[derive(Debug, Clone)]
pub struct Event {
    /// The type of event.
    pub kind: EventKind,
    /// The function the event concerns (if applicable).
    pub function: Option<FunctionId>,
    /// The instruction the event concerns (if applicable).
    pub site: Option<CallSite>,
    /// Human-readable description.
    pub message: String,
    /// Associated pass name (if from a pass).
    pub pass: Option<String>,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Builder for creating events with a fluent API.
///
/// Created by [`EventLog::record`]. The event is added to the log when the
/// builder is dropped.
pub struct EventBuilder<'a> {
    log: &'a EventLog,
    kind: EventKind,
    function: Option<FunctionId>,
    site: Option<CallSite>,
    message: Option<String>,
    pass: Option<String>,
}

impl<'a> EventBuilder<'a> {
    fn new(log: &'a EventLog, kind: EventKind) -> Self {
        Self {
            log,
            kind,
            function: None,
            site: None,
            message: None,
            pass: None,
        }
    }

    /// Sets the instruction the event concerns, and its containing function.
    pub fn at(mut self, site: CallSite) -> Self {
        self.function = Some(site.function);
        self.site = Some(site);
        self
    }

    /// Sets only the function (for function-level events).
    pub fn function(mut self, function: FunctionId) -> Self {
        self.function = Some(function);
        self
    }

    /// Sets a custom message describing the event.
    pub fn message(mut self, msg: impl Into<String>) -> Self {
        self.message = Some(msg.into());
        self
    }

    /// Associates this event with a specific pass.
    pub fn pass(mut self, pass_name: impl Into<String>) -> Self {
        self.pass = Some(pass_name.into());
        self
    }
}

impl Drop for EventBuilder<'_> {
    fn drop(&mut self) {
        let message = self
            .message
            .take()
            .unwrap_or_else(|| self.kind.description().to_string());

        self.log.events.push(Event {
            kind: self.kind,
            function: self.function.take(),
            site: self.site.take(),
            message,
            pass: self.pass.take(),
        });
    }
}

/// Collection of events recorded while running passes.
///
/// Statistics are derived from the events rather than tracked separately.
/// Events can be appended through a shared reference, so a log can be handed
/// to a pass as `&EventLog`.
#[derive(Debug)]
pub struct EventLog {
    events: boxcar::Vec<Event>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventLog {
    fn clone(&self) -> Self {
        let new_log = Self::new();
        new_log.merge(self);
        new_log
    }
}

impl EventLog {
    /// Creates an empty event log.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: boxcar::Vec::new(),
        }
    }

    /// Returns true if no events have been logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.count() == 0
    }

    /// Returns the total number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.count()
    }

    /// Starts building a new event of the given kind.
    ///
    /// The event is added when the builder is dropped.
    pub fn record(&self, kind: EventKind) -> EventBuilder<'_> {
        EventBuilder::new(self, kind)
    }

    /// Appends copies of every event in `other`.
    pub fn merge(&self, other: &EventLog) {
        for (_, event) in &other.events {
            self.events.push(event.clone());
        }
    }

    /// Returns true if any event of the given kind exists.
    #[must_use]
    pub fn has(&self, kind: EventKind) -> bool {
        self.iter().any(|e| e.kind == kind)
    }

    /// Counts events of the given kind.
    #[must_use]
    pub fn count_kind(&self, kind: EventKind) -> usize {
        self.filter_kind(kind).count()
    }

    /// Returns an iterator over all events in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().map(|(_, e)| e)
    }

    /// Returns an iterator over events of a specific kind.
    pub fn filter_kind(&self, kind: EventKind) -> impl Iterator<Item = &Event> + '_ {
        self.iter().filter(move |e| e.kind == kind)
    }

    /// Returns an iterator over clone verdicts, in the order they were made.
    pub fn decisions(&self) -> impl Iterator<Item = &Event> + '_ {
        self.iter().filter(|e| e.kind.is_decision())
    }

    /// Returns an iterator over transformation events only.
    pub fn transformations(&self) -> impl Iterator<Item = &Event> + '_ {
        self.iter().filter(|e| e.kind.is_transformation())
    }

    /// Returns an iterator over warning events.
    pub fn warnings(&self) -> impl Iterator<Item = &Event> + '_ {
        self.filter_kind(EventKind::Warning)
    }

    /// Counts events grouped by kind.
    #[must_use]
    pub fn count_by_kind(&self) -> FxHashMap<EventKind, usize> {
        let mut counts = FxHashMap::default();
        for event in self.iter() {
            *counts.entry(event.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Generates a human-readable summary of the transformations.
    ///
    /// Kinds are listed in declaration order.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "no events".to_string();
        }

        let counts = self.count_by_kind();
        let parts: Vec<String> = EventKind::iter()
            .filter(EventKind::is_transformation)
            .filter_map(|kind| {
                counts
                    .get(&kind)
                    .map(|count| format!("{count} {}", kind.description()))
            })
            .collect();

        if parts.is_empty() {
            format!("{} events", self.len())
        } else {
            parts.join(", ")
        }
    }
}

/// Statistics derived from an [`EventLog`].
#[derive(Debug, Clone, Default)]
pub struct DerivedStats {
    /// Number of direct calls the policy was asked about.
    pub calls_inspected: usize,
    /// Number of those calls that qualified for specialization.
    pub calls_qualified: usize,
    /// Number of specialized copies created.
    pub clones_created: usize,
    /// Number of calls pointed at a specialized copy.
    pub calls_retargeted: usize,
    /// Number of clone parameters bound to a constant argument, whether or
    /// not the parameter had any uses.
    pub arguments_substituted: usize,
    /// Number of warnings.
    pub warnings: usize,
    /// Processing time.
    pub total_time: Duration,
}

impl DerivedStats {
    /// Computes statistics from an event log.
    #[must_use]
    pub fn from_log(log: &EventLog) -> Self {
        let counts = log.count_by_kind();
        let get = |kind: EventKind| counts.get(&kind).copied().unwrap_or(0);

        Self {
            calls_inspected: get(EventKind::CloneRequired) + get(EventKind::CloneNotRequired),
            calls_qualified: get(EventKind::CloneRequired),
            clones_created: get(EventKind::FunctionCloned),
            calls_retargeted: get(EventKind::CallRetargeted),
            arguments_substituted: get(EventKind::ArgumentSubstituted),
            warnings: get(EventKind::Warning),
            total_time: Duration::ZERO,
        }
    }

    /// Sets the total processing time.
    #[must_use]
    pub fn with_time(mut self, time: Duration) -> Self {
        self.total_time = time;
        self
    }

    /// Generates a human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{} calls inspected", self.calls_inspected)];

        if self.clones_created > 0 {
            parts.push(format!("{} clones", self.clones_created));
        }
        if self.calls_retargeted > 0 {
            parts.push(format!("{} calls retargeted", self.calls_retargeted));
        }
        if self.arguments_substituted > 0 {
            parts.push(format!(
                "{} arguments substituted",
                self.arguments_substituted
            ));
        }
        if self.warnings > 0 {
            parts.push(format!("{} warnings", self.warnings));
        }

        let stats = parts.join(", ");
        if self.total_time.as_millis() > 0 {
            format!("{stats} in {:?}", self.total_time)
        } else {
            stats
        }
    }
}

impl fmt::Display for DerivedStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(function: usize, index: usize) -> CallSite {
        CallSite::new(FunctionId::new(function), 0, index)
    }

    #[test]
    fn test_empty_log() {
        let log = EventLog::new();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
        assert!(!log.has(EventKind::FunctionCloned));
        assert_eq!(log.summary(), "no events");
    }

    #[test]
    fn test_record_event() {
        let log = EventLog::new();

        log.record(EventKind::CloneRequired)
            .at(site(1, 3))
            .message("needs to be cloned: f");

        assert_eq!(log.len(), 1);
        let event = log.iter().next().unwrap();
        assert_eq!(event.function, Some(FunctionId::new(1)));
        assert_eq!(event.site, Some(site(1, 3)));
        assert_eq!(event.message, "needs to be cloned: f");
    }

    #[test]
    fn test_default_message() {
        let log = EventLog::new();
        log.record(EventKind::CallRetargeted).at(site(0, 0));

        let event = log.iter().next().unwrap();
        assert_eq!(event.message, "call retargeted");
        assert_eq!(event.to_string(), "[call retargeted] call retargeted");
    }

    #[test]
    fn test_warnings() {
        let log = EventLog::new();

        log.record(EventKind::Warning)
            .at(site(0, 4))
            .message("clone limit of 8 reached");
        log.record(EventKind::CloneNotRequired).at(site(0, 4));

        let warnings: Vec<_> = log.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].to_string(), "[warning] clone limit of 8 reached");
        assert_eq!(log.transformations().count(), 0);
    }

    #[test]
    fn test_decisions_keep_order() {
        let log = EventLog::new();
        log.record(EventKind::CloneRequired).message("needs to be cloned: a");
        log.record(EventKind::FunctionCloned).function(FunctionId::new(2));
        log.record(EventKind::CloneNotRequired)
            .message("does not need to be cloned: b");

        let messages: Vec<_> = log.decisions().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["needs to be cloned: a", "does not need to be cloned: b"]
        );
    }

    #[test]
    fn test_summary_in_declaration_order() {
        let log = EventLog::new();
        log.record(EventKind::ArgumentSubstituted).function(FunctionId::new(2));
        log.record(EventKind::CallRetargeted).at(site(1, 0));
        log.record(EventKind::FunctionCloned).function(FunctionId::new(2));
        log.record(EventKind::ArgumentSubstituted).function(FunctionId::new(2));

        assert_eq!(
            log.summary(),
            "1 function cloned, 1 call retargeted, 2 argument substituted"
        );
        assert_eq!(log.transformations().count(), 4);
    }

    #[test]
    fn test_every_kind_has_description() {
        assert_eq!(EventKind::iter().count(), EventKind::COUNT);
        for kind in EventKind::iter() {
            assert!(!kind.description().is_empty());
        }
    }

    #[test]
    fn test_derived_stats() {
        let log = EventLog::new();
        log.record(EventKind::CloneRequired);
        log.record(EventKind::CloneNotRequired);
        log.record(EventKind::CloneNotRequired);
        log.record(EventKind::FunctionCloned);
        log.record(EventKind::CallRetargeted);
        log.record(EventKind::ArgumentSubstituted);
        log.record(EventKind::ArgumentSubstituted);
        log.record(EventKind::Warning).message("budget exhausted");

        let stats = DerivedStats::from_log(&log);
        assert_eq!(stats.calls_inspected, 3);
        assert_eq!(stats.calls_qualified, 1);
        assert_eq!(stats.clones_created, 1);
        assert_eq!(stats.calls_retargeted, 1);
        assert_eq!(stats.arguments_substituted, 2);
        assert_eq!(stats.warnings, 1);
        assert_eq!(
            stats.summary(),
            "3 calls inspected, 1 clones, 1 calls retargeted, 2 arguments substituted, 1 warnings"
        );
    }

    #[test]
    fn test_clone_and_merge() {
        let log = EventLog::new();
        log.record(EventKind::PassStarted).pass("SpecializationPass");
        let copy = log.clone();
        copy.merge(&log);
        assert_eq!(copy.len(), 2);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_thread_safe_append() {
        use std::sync::Arc;
        use std::thread;

        let log = Arc::new(EventLog::new());
        let mut handles = vec![];

        for i in 0..4 {
            let log_clone = Arc::clone(&log);
            handles.push(thread::spawn(move || {
                for j in 0..100 {
                    log_clone
                        .record(EventKind::CallRetargeted)
                        .at(site(i, j))
                        .message(format!("thread {i} event {j}"));
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(log.len(), 400);
    }
}
