//! GPIO button input with debounced edge latching.
//!
//! Three physical buttons (active-low with pull-up):
//!   - LEFT   - previous menu item (falling edge)
//!   - ENTER  - enter/leave submenu or run the item's command (rising edge)
//!   - RIGHT  - next menu item (falling edge)
//!
//! The main loop samples every line once per iteration. A qualifying
//! transition latches a pending bit that `poll` hands out exactly once;
//! transitions inside the debounce window of the last accepted edge
//! are dropped.

use core::time::Duration;
use std::thread;
use std::time::Instant;

use embedded_hal::digital::{Error as _, InputPin};
use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::ui::{Button, Edge, Level};

/// Source of raw line levels.
pub trait ButtonLines {
    fn level(&mut self, button: Button) -> Result<Level>;
}

/// Debounced edge latch for one line.
#[derive(Clone, Debug)]
pub struct EdgeDetector {
    edge: Edge,
    debounce: Duration,
    last_level: Option<Level>,
    last_accepted: Option<Instant>,
    pending: bool,
}

impl EdgeDetector {
    pub fn new(edge: Edge, debounce: Duration) -> Self {
        Self {
            edge,
            debounce,
            last_level: None,
            last_accepted: None,
            pending: false,
        }
    }

    /// Feed one level sample taken at `now`.
    ///
    /// The first sample only establishes the baseline.
    pub fn sample(&mut self, level: Level, now: Instant) {
        let previous = self.last_level.replace(level);
        let Some(previous) = previous else {
            return;
        };
        if !self.edge.matches(previous, level) {
            return;
        }

        let bouncing = self
            .last_accepted
            .is_some_and(|t| now.saturating_duration_since(t) < self.debounce);
        if bouncing {
            return;
        }

        self.last_accepted = Some(now);
        self.pending = true;
    }

    /// Take the latched edge, if any.
    pub fn take(&mut self) -> bool {
        core::mem::take(&mut self.pending)
    }

    /// Instantaneous "pressed" state, independent of the latch.
    pub fn is_held(&self) -> bool {
        self.last_level == Some(Level::Low)
    }
}

/// Latched input state for all three buttons.
pub struct InputState {
    detectors: [EdgeDetector; 3],
    read_fault: bool,
}

impl InputState {
    pub fn new(debounce: Duration) -> Self {
        Self {
            detectors: Button::ALL.map(|b| EdgeDetector::new(b.edge(), debounce)),
            read_fault: false,
        }
    }

    /// Sample every line once. A failed read leaves that button's
    /// state untouched and raises the fault flag until the next clean
    /// sweep.
    pub fn sample<L: ButtonLines>(&mut self, lines: &mut L, now: Instant) {
        let mut fault = false;
        for button in Button::ALL {
            match lines.level(button) {
                Ok(level) => self.detectors[button.slot()].sample(level, now),
                Err(e) => {
                    if !self.read_fault {
                        warn!("Buttons: {}", e);
                    }
                    fault = true;
                }
            }
        }
        self.read_fault = fault;
    }

    /// Returns true at most once per accepted transition.
    pub fn poll(&mut self, button: Button) -> bool {
        let fired = self.detectors[button.slot()].take();
        if fired {
            debug!("Button: {:?}", button);
        }
        fired
    }

    pub fn is_held(&self, button: Button) -> bool {
        self.detectors[button.slot()].is_held()
    }

    pub fn read_fault(&self) -> bool {
        self.read_fault
    }
}

/// Button lines backed by `embedded-hal` input pins.
pub struct PinLines<P> {
    pub left: P,
    pub enter: P,
    pub right: P,
}

impl<P: InputPin> ButtonLines for PinLines<P> {
    fn level(&mut self, button: Button) -> Result<Level> {
        let pin = match button {
            Button::Left => &mut self.left,
            Button::Enter => &mut self.enter,
            Button::Right => &mut self.right,
        };
        match pin.is_low() {
            Ok(true) => Ok(Level::Low),
            Ok(false) => Ok(Level::High),
            Err(e) => Err(Error::ButtonRead {
                button,
                reason: format!("{:?}", e.kind()),
            }),
        }
    }
}

/// Run `op` until it succeeds, at most `attempts` times.
///
/// Used for GPIO registration, which fails transiently right after a
/// sysfs export.
pub fn register_with_retry<T>(
    pin: u64,
    attempts: u32,
    backoff: Duration,
    mut op: impl FnMut() -> Result<T>,
) -> Result<T> {
    let mut last = String::from("no attempt made");
    for attempt in 1..=attempts {
        match op() {
            Ok(value) => {
                if attempt > 1 {
                    info!("GPIO{}: registered on attempt {}", pin, attempt);
                }
                return Ok(value);
            }
            Err(e) => {
                debug!("GPIO{}: attempt {} failed: {}", pin, attempt, e);
                last = e.to_string();
                if attempt < attempts {
                    thread::sleep(backoff);
                }
            }
        }
    }
    Err(Error::GpioRegistration {
        pin,
        attempts,
        reason: last,
    })
}
