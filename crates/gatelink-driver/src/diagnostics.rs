//! Structured reporting of degraded translations.
//!
//! Compiling formulas and translating values never fail. When the engine
//! falls back (a malformed map tuple is skipped, a lookup misses, a value
//! cannot be scaled) it reports a [`Diagnostic`] to a [`DiagnosticSink`]
//! instead of returning an error. Callers pick the sink:
//!
//! - [`TracingSink`] logs each event through `tracing` (the default)
//! - [`DiagnosticCounter`] counts events per kind and logs them
//! - [`DiagnosticLog`] keeps the events in memory
//!
//! # Example
//!
//! ```
//! use gatelink_core::Value;
//! use gatelink_driver::{DiagnosticCounter, DiagnosticKind, Formula, TranslationRule};
//!
//! let counter = DiagnosticCounter::new();
//! let rule = TranslationRule::compile_with(Some(&Formula::mapping("(1,ON)")), true, &counter);
//!
//! assert_eq!(rule.translate_with(Value::Int(2), &counter), Value::Int(2));
//! assert_eq!(counter.count(DiagnosticKind::LookupMiss), 1);
//! ```

use gatelink_core::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::warn;

/// Kind of a degraded translation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A formula map tuple did not split into a key and a value.
    MalformedTuple,

    /// A value had no entry in a non-empty lookup table.
    LookupMiss,

    /// A non-numeric value reached a scaling coefficient.
    UnsupportedScaling,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedTuple => write!(f, "malformed_tuple"),
            Self::LookupMiss => write!(f, "lookup_miss"),
            Self::UnsupportedScaling => write!(f, "unsupported_scaling"),
        }
    }
}

/// A degraded translation event, with the data needed to investigate it.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// The tuple was skipped while compiling a formula map.
    MalformedTuple {
        /// Raw tuple text, before parentheses were stripped.
        tuple: String,
    },

    /// The value passed through unchanged.
    LookupMiss {
        /// Value that had no table entry.
        value: Value,

        /// Number of entries in the table that was searched.
        table_len: usize,
    },

    /// The value was left unscaled.
    UnsupportedScaling {
        /// Value that could not be multiplied.
        value: Value,

        /// Coefficient of the rule.
        coefficient: f64,
    },
}

impl Diagnostic {
    /// Kind of this event.
    #[must_use]
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::MalformedTuple { .. } => DiagnosticKind::MalformedTuple,
            Self::LookupMiss { .. } => DiagnosticKind::LookupMiss,
            Self::UnsupportedScaling { .. } => DiagnosticKind::UnsupportedScaling,
        }
    }

    /// Log this event as a `tracing` warning.
    pub fn emit(&self) {
        match self {
            Self::MalformedTuple { tuple } => {
                warn!(kind = %self.kind(), tuple = %tuple, "Formula map tuple not valid, skipped");
            }
            Self::LookupMiss { value, table_len } => {
                warn!(
                    kind = %self.kind(),
                    value = %value,
                    value_type = value.type_name(),
                    table_len,
                    "No translation found for value"
                );
            }
            Self::UnsupportedScaling { value, coefficient } => {
                warn!(
                    kind = %self.kind(),
                    value = %value,
                    value_type = value.type_name(),
                    coefficient,
                    "Value not able to use coefficient"
                );
            }
        }
    }
}

/// Receiver of degraded translation events.
///
/// Sinks observe events; they never change translation results. Sinks are
/// shared by concurrent translations and must be `Send + Sync`.
pub trait DiagnosticSink: Send + Sync {
    /// Record one event.
    fn record(&self, diagnostic: Diagnostic);
}

/// Sink that logs every event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, diagnostic: Diagnostic) {
        diagnostic.emit();
    }
}

/// Sink that counts events per kind, then logs them.
#[derive(Debug, Default)]
pub struct DiagnosticCounter {
    malformed_tuple: AtomicU64,
    lookup_miss: AtomicU64,
    unsupported_scaling: AtomicU64,
}

impl DiagnosticCounter {
    /// Create a counter with every kind at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, kind: DiagnosticKind) -> &AtomicU64 {
        match kind {
            DiagnosticKind::MalformedTuple => &self.malformed_tuple,
            DiagnosticKind::LookupMiss => &self.lookup_miss,
            DiagnosticKind::UnsupportedScaling => &self.unsupported_scaling,
        }
    }

    /// Number of events of `kind` recorded so far.
    #[must_use]
    pub fn count(&self, kind: DiagnosticKind) -> u64 {
        self.slot(kind).load(Ordering::Relaxed)
    }

    /// Number of events recorded so far, all kinds together.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.count(DiagnosticKind::MalformedTuple)
            + self.count(DiagnosticKind::LookupMiss)
            + self.count(DiagnosticKind::UnsupportedScaling)
    }

    /// Reset every kind to zero.
    pub fn reset(&self) {
        self.malformed_tuple.store(0, Ordering::Relaxed);
        self.lookup_miss.store(0, Ordering::Relaxed);
        self.unsupported_scaling.store(0, Ordering::Relaxed);
    }
}

impl DiagnosticSink for DiagnosticCounter {
    fn record(&self, diagnostic: Diagnostic) {
        self.slot(diagnostic.kind()).fetch_add(1, Ordering::Relaxed);
        diagnostic.emit();
    }
}

/// Sink that keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    events: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return the recorded events.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no event was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for DiagnosticLog {
    fn record(&self, diagnostic: Diagnostic) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }
}
