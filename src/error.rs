//! Unified error type for cups-hat.
//!
//! Every fallible boundary (GPIO, display bus, shell commands, worker
//! threads) maps into this enum so the main loop can decide per call
//! site whether to propagate or absorb.

use crate::ui::Button;

/// Top-level error type used across the application.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // GPIO
    /// A sysfs GPIO line could not be exported or configured.
    #[error("GPIO{pin}: {reason}")]
    Gpio { pin: u64, reason: String },

    /// Registration kept failing until the retry budget ran out.
    #[error("GPIO{pin} still unavailable after {attempts} attempts: {reason}")]
    GpioRegistration {
        pin: u64,
        attempts: u32,
        reason: String,
    },

    /// Reading a button line failed.
    #[error("{button:?} button read failed: {reason}")]
    ButtonRead { button: Button, reason: String },

    /// Writing a status LED failed.
    #[error("status LED write failed: {0}")]
    Led(String),

    // UI / Display
    /// I²C transaction to the display failed.
    #[error("display error: {0}")]
    Display(String),

    /// The menu graph handed to the builder is inconsistent.
    #[error("invalid menu graph: {0}")]
    Menu(&'static str),

    // OS boundary
    /// A shell command could not be spawned.
    #[error("failed to run `{program}`: {source}")]
    Command {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// A system-info probe failed or produced unusable output.
    #[error("system info unavailable: {0}")]
    SystemInfo(String),

    /// Signal mask or signalfd setup failed.
    #[error("signal handling: {0}")]
    Signal(String),

    /// A background thread could not be started.
    #[error("failed to spawn {name} thread: {source}")]
    Thread {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = core::result::Result<T, Error>;
