//! Button-driven OLED menu for a CUPS print-server hat.
//!
//! A Raspberry Pi Zero 2 drives a 128×32 SSD1306 panel, three front
//! buttons and three status LEDs. This library holds everything that
//! does not touch hardware, so it builds and tests on any host:
//!
//! - `ui`         - edge detection, menu graph + navigator, compositor
//! - `scheduler`  - redraw / heartbeat tick threads
//! - `sysinfo`    - system snapshot provider and its background feed
//! - `command`    - OS actions behind terminal menu items
//! - `app`        - the per-iteration step over all of the above
//! - `runtime`    - main loop and the shutdown sequence
//!
//! Usage: `cargo test` on the host, `cargo build --release --features
//! embedded` for the Pi. The `board` module and the `cups-hat` binary
//! only exist with the `embedded` feature.

pub mod app;
pub mod command;
pub mod config;
pub mod error;
pub mod runtime;
pub mod scheduler;
pub mod status;
pub mod sysinfo;
pub mod ui;

#[cfg(feature = "embedded")]
pub mod board;

pub use error::{Error, Result};
