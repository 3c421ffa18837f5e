//! Stage spans and events for the detection pipeline.
//!
//! Spans wrap `extract_boundaries`, `recover_quad`, `prepare_deck`,
//! `identify` and `detect`. Events carry counts and scores. A dropped card
//! region is reported at warn level. Without the `tracing` feature every
//! macro expands to a no-op and fields are still evaluated once.

/// Opens an info-level span named after a pipeline stage.
///
/// Call sites use `let _span = trace_span!(..).entered();` in both builds.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// Named event at an explicit level; backs `trace_event!` and `trace_warn!`.
#[cfg(feature = "tracing")]
macro_rules! trace_at {
    ($level:ident, $name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::event!(name: $name, tracing::Level::$level, $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_at {
    ($level:ident, $name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
}

/// Stage measurement: counts, best scores.
macro_rules! trace_event {
    ($name:expr, $($fields:tt)+) => {
        $crate::trace::trace_at!(INFO, $name, $($fields)+)
    };
}

/// A card region dropped for degenerate geometry.
macro_rules! trace_warn {
    ($name:expr, $($fields:tt)+) => {
        $crate::trace::trace_at!(WARN, $name, $($fields)+)
    };
}

pub(crate) use trace_at;
pub(crate) use trace_event;
pub(crate) use trace_span;
pub(crate) use trace_warn;

/// Stand-in span guard for builds without `tracing`.
#[cfg(not(feature = "tracing"))]
#[must_use]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
