//! `tracing` when the `tracing` feature is enabled, no-op stand-ins otherwise.
//!
//! Adapters log through this module so that no call site needs its own `#[cfg]`. Spans are
//! attached to futures with [`Instrument`]; without the feature the span is `()` and
//! instrumentation does nothing.

#![allow(unused_imports, unused_macros, dead_code)]

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, debug_span, info, trace, warn};
#[cfg(feature = "tracing")]
pub(crate) use tracing_futures::Instrument;

#[cfg(not(feature = "tracing"))]
macro_rules! event {
    ($($x:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
macro_rules! event_span {
    ($($x:tt)*) => {
        ()
    };
}

#[cfg(not(feature = "tracing"))]
pub(crate) use {
    event as debug, event as info, event as trace, event as warn, event_span as debug_span,
};

#[cfg(not(feature = "tracing"))]
pub(crate) trait Instrument: Sized {
    fn instrument(self, span: ()) -> Self;
}

#[cfg(not(feature = "tracing"))]
impl<T> Instrument for T {
    fn instrument(self, (): ()) -> Self {
        self
    }
}
