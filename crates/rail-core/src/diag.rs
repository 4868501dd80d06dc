//! Injected diagnostics capability.
//!
//! The simulation core never talks to a process-wide logger directly; it
//! reports through whatever [`Diagnostics`] implementation the host hands it.
//! All methods have no-op defaults so implementors only override what they
//! care about.

/// Sink for soft-failure warnings and informational messages from the core.
pub trait Diagnostics {
    /// A soft validation failure: the operation was ignored and the world is
    /// unchanged (duplicate track, invalid spawn, …).
    fn warning(&self, _message: &str) {}

    /// A notable simulation event (train entered an area, …).
    fn info(&self, _message: &str) {}

    /// Verbose detail useful while debugging scenarios.
    fn debug(&self, _message: &str) {}
}

/// Forwards every message to the `log` facade.  The default sink.
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn warning(&self, message: &str) {
        log::warn!("{message}");
    }

    fn info(&self, message: &str) {
        log::info!("{message}");
    }

    fn debug(&self, message: &str) {
        log::debug!("{message}");
    }
}

/// Discards everything.  Useful in tests that exercise failure paths.
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {}
