//! The cooperative main loop and its shutdown sequence.

use std::thread;
use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::app::{App, Flow};
use crate::command::CommandDispatcher;
use crate::error::Result;
use crate::scheduler::Scheduler;
use crate::status::StatusIndicator;
use crate::ui::animation;
use crate::ui::buttons::ButtonLines;
use crate::ui::display::DisplayDriver;
use crate::ui::menu::Command;

/// External stop request (SIGINT/SIGTERM on the device).
pub trait Interrupt {
    /// Checked once per iteration; must not block.
    fn triggered(&mut self) -> bool;
}

/// Why the loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exit {
    Interrupted,
    PowerOff,
}

/// Run until interrupted or until power-off is selected.
///
/// Afterwards the tick threads are stopped and joined, the shutdown
/// animation plays to completion, and only then, for power-off, the
/// OS `poweroff` is dispatched.
pub fn run<B, D, C, S, I, T>(
    app: &mut App<B, D, C, S>,
    scheduler: Scheduler,
    interrupt: &mut I,
    delay: &mut T,
    idle: Duration,
) -> Result<Exit>
where
    B: ButtonLines,
    D: DisplayDriver,
    C: CommandDispatcher,
    S: StatusIndicator,
    I: Interrupt,
    T: DelayNs,
{
    info!("Runtime: main loop running");
    let exit = loop {
        if interrupt.triggered() {
            info!("Runtime: interrupted");
            break Exit::Interrupted;
        }
        if app.step(Instant::now()) == Flow::PowerOff {
            info!("Runtime: power-off selected");
            break Exit::PowerOff;
        }
        thread::sleep(idle);
    };

    scheduler.shutdown();

    let io = app.peripherals_mut();
    io.status.all_off();
    if let Err(e) = animation::shutdown(&mut io.display, delay) {
        warn!("Display: shutdown animation failed: {}", e);
    }
    if exit == Exit::PowerOff {
        io.commands.dispatch(Command::PowerOff)?;
    }
    Ok(exit)
}
