//! cups-hat - Raspberry Pi entry point.
//!
//! Wires the sysfs GPIO lines, the I²C OLED and the shell boundaries
//! into the library's main loop. Logging goes to stderr; tune it with
//! `RUST_LOG` (default `info`).

use anyhow::Context;
use linux_embedded_hal::Delay;
use log::{info, warn};

use cups_hat::app::{App, Peripherals};
use cups_hat::board::{self, SignalWatch};
use cups_hat::command::{PrinterTarget, ShellDispatcher};
use cups_hat::config::{Cadence, Timing};
use cups_hat::runtime;
use cups_hat::scheduler::Scheduler;
use cups_hat::sysinfo::{ShellSystemInfo, SnapshotFeed};
use cups_hat::ui::animation;
use cups_hat::ui::menu::MenuGraph;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("cups-hat {} starting", env!("CARGO_PKG_VERSION"));

    // Must happen before any thread is spawned so all of them inherit
    // the blocked mask.
    let mut signals = SignalWatch::install().context("installing SIGINT/SIGTERM watch")?;

    let mut display = board::oled().context("initialising OLED")?;
    let mut delay = Delay;
    if let Err(e) = animation::startup(&mut display, &mut delay) {
        warn!("Display: startup animation failed: {}", e);
    }

    let buttons = board::button_lines().context("registering buttons")?;
    let status = board::status_leds().context("registering status LEDs")?;

    let timing = Timing::default();
    let feed = SnapshotFeed::spawn(ShellSystemInfo, timing.snapshot_refresh)
        .context("starting system info feed")?;
    let scheduler = Scheduler::start(Cadence::default()).context("starting tick scheduler")?;

    let peripherals = Peripherals {
        buttons,
        display,
        commands: ShellDispatcher::new(PrinterTarget::default()),
        status,
    };
    let mut app = App::new(MenuGraph::standard(), timing, scheduler.flags(), feed, peripherals);

    let exit = runtime::run(&mut app, scheduler, &mut signals, &mut delay, timing.loop_idle)
        .context("main loop")?;
    info!("cups-hat stopped: {:?}", exit);
    Ok(())
}
