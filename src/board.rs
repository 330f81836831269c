//! Raspberry Pi wiring: sysfs GPIO lines, the I²C panel and the
//! signalfd used as the external interrupt.

use core::time::Duration;

use linux_embedded_hal::sysfs_gpio::{Direction, Pin};
use linux_embedded_hal::{I2cdev, SysfsPin};
use log::{info, warn};
use nix::sys::signal::{SigSet, Signal};
use nix::sys::signalfd::{SfdFlags, SignalFd};

use crate::config::{
    GPIO_BUTTON_ENTER, GPIO_BUTTON_LEFT, GPIO_BUTTON_RIGHT, GPIO_LED_GREEN, GPIO_LED_ORANGE,
    GPIO_LED_RED, GPIO_REGISTER_ATTEMPTS, GPIO_REGISTER_BACKOFF_MS, I2C_BUS,
};
use crate::error::{Error, Result};
use crate::runtime::Interrupt;
use crate::status::StatusLeds;
use crate::ui::buttons::{register_with_retry, PinLines};
use crate::ui::display::Oled;

/// Export `pin` and set its direction, retrying while sysfs settles.
fn sysfs_line(pin: u64, direction: Direction) -> Result<SysfsPin> {
    let backoff = Duration::from_millis(GPIO_REGISTER_BACKOFF_MS);
    register_with_retry(pin, GPIO_REGISTER_ATTEMPTS, backoff, || {
        let line = Pin::new(pin);
        line.export().map_err(|e| Error::Gpio {
            pin,
            reason: format!("export: {}", e),
        })?;
        line.set_direction(direction).map_err(|e| Error::Gpio {
            pin,
            reason: format!("direction: {}", e),
        })?;
        Ok(SysfsPin(line))
    })
}

/// LEFT / ENTER / RIGHT as inputs.
pub fn button_lines() -> Result<PinLines<SysfsPin>> {
    let lines = PinLines {
        left: sysfs_line(GPIO_BUTTON_LEFT, Direction::In)?,
        enter: sysfs_line(GPIO_BUTTON_ENTER, Direction::In)?,
        right: sysfs_line(GPIO_BUTTON_RIGHT, Direction::In)?,
    };
    info!(
        "Buttons: GPIO{} / GPIO{} / GPIO{}",
        GPIO_BUTTON_LEFT, GPIO_BUTTON_ENTER, GPIO_BUTTON_RIGHT
    );
    Ok(lines)
}

/// Green / orange / red as outputs, initially off.
pub fn status_leds() -> Result<StatusLeds<SysfsPin>> {
    Ok(StatusLeds::new(
        sysfs_line(GPIO_LED_GREEN, Direction::Low)?,
        sysfs_line(GPIO_LED_ORANGE, Direction::Low)?,
        sysfs_line(GPIO_LED_RED, Direction::Low)?,
    ))
}

pub fn oled() -> Result<Oled<I2cdev>> {
    let i2c = I2cdev::new(I2C_BUS).map_err(|e| Error::Display(format!("{}: {}", I2C_BUS, e)))?;
    Oled::new(i2c)
}

/// SIGINT/SIGTERM delivered through a non-blocking signalfd.
pub struct SignalWatch {
    fd: SignalFd,
}

impl SignalWatch {
    /// Block both signals for this thread (and every thread spawned
    /// after it) and open the descriptor. Call before any spawn.
    pub fn install() -> Result<Self> {
        let mut mask = SigSet::empty();
        mask.add(Signal::SIGINT);
        mask.add(Signal::SIGTERM);
        mask.thread_block()
            .map_err(|e| Error::Signal(format!("block: {}", e)))?;
        let fd = SignalFd::with_flags(&mask, SfdFlags::SFD_NONBLOCK)
            .map_err(|e| Error::Signal(format!("signalfd: {}", e)))?;
        Ok(Self { fd })
    }
}

impl Interrupt for SignalWatch {
    fn triggered(&mut self) -> bool {
        match self.fd.read_signal() {
            Ok(Some(info)) => {
                info!("Signal {} received", info.ssi_signo);
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!("signalfd read: {}", e);
                false
            }
        }
    }
}
