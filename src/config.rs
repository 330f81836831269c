//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and display
//! geometry live here so they can be tuned in one place.

use core::time::Duration;

// Timing

/// Display refresh cadence (ms). 10 Hz.
pub const REDRAW_INTERVAL_MS: u64 = 100;

/// Heartbeat LED blink cadence (ms).
pub const HEARTBEAT_INTERVAL_MS: u64 = 250;

/// Button debounce window (ms). Edges closer than this to the last
/// accepted edge are discarded.
pub const BUTTON_DEBOUNCE_MS: u64 = 200;

/// How old the cached system snapshot may get before a refresh is
/// requested while the System Info submenu is shown (ms).
pub const SNAPSHOT_REFRESH_MS: u64 = 2_000;

/// A system-info probe still running after this long is killed (ms).
pub const PROBE_TIMEOUT_MS: u64 = 3_000;

/// Main loop yield between iterations (ms).
pub const LOOP_IDLE_MS: u64 = 2;

// GPIO pin assignments (BCM numbering, Raspberry Pi Zero 2 W)
//
//   Button LEFT    → GPIO5   (falling edge, active-low)
//   Button ENTER   → GPIO6   (rising edge: fires on release)
//   Button RIGHT   → GPIO26  (falling edge, active-low)
//   LED green      → GPIO23  (heartbeat)
//   LED orange     → GPIO24  (system-info fetch in flight)
//   LED red        → GPIO25  (display / input fault)
//
// sysfs cannot enable pull-ups; add `gpio=5,6,26=ip,pu` to config.txt.

pub const GPIO_BUTTON_LEFT: u64 = 5;
pub const GPIO_BUTTON_ENTER: u64 = 6;
pub const GPIO_BUTTON_RIGHT: u64 = 26;
pub const GPIO_LED_GREEN: u64 = 23;
pub const GPIO_LED_ORANGE: u64 = 24;
pub const GPIO_LED_RED: u64 = 25;

/// Export/direction setup is retried this many times before start-up
/// fails. Freshly exported sysfs lines stay root-only until udev fixes
/// their permissions.
pub const GPIO_REGISTER_ATTEMPTS: u32 = 10;

/// Pause between GPIO registration attempts (ms).
pub const GPIO_REGISTER_BACKOFF_MS: u64 = 100;

// Display (SSD1306 128×32 over I²C)

pub const I2C_BUS: &str = "/dev/i2c-1";
pub const OLED_I2C_ADDRESS: u8 = 0x3C;
pub const OLED_WIDTH: u32 = 128;
pub const OLED_HEIGHT: u32 = 32;

/// Contrast used in normal operation and as the top of every ramp.
pub const CONTRAST_MAX: u8 = 175;

/// Step sizes for the start-up ramp (down fast, up slow).
pub const STARTUP_RAMP_DOWN_STEP: u8 = 5;
pub const STARTUP_RAMP_UP_STEP: u8 = 1;

/// Delay between contrast steps (ms).
pub const RAMP_STEP_MS: u32 = 10;

/// Hold time before and after each animation ramp (ms).
pub const ANIMATION_HOLD_MS: u32 = 200;

// Printer

/// CUPS queue targeted by the printer actions.
pub const PRINTER_QUEUE: &str = "WiFi_HP_Ink_Tank_115";

/// CUPS ships this test page with every install.
pub const TEST_PAGE_PATH: &str = "/usr/share/cups/data/testprint";

/// USB port path of the printer under /sys/bus/usb/drivers/usb.
pub const PRINTER_USB_PORT: &str = "1-1";

/// Periodic source cadences handed to the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cadence {
    pub redraw: Duration,
    pub heartbeat: Duration,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            redraw: Duration::from_millis(REDRAW_INTERVAL_MS),
            heartbeat: Duration::from_millis(HEARTBEAT_INTERVAL_MS),
        }
    }
}

/// Main-loop timing knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    pub debounce: Duration,
    pub snapshot_refresh: Duration,
    pub loop_idle: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(BUTTON_DEBOUNCE_MS),
            snapshot_refresh: Duration::from_millis(SNAPSHOT_REFRESH_MS),
            loop_idle: Duration::from_millis(LOOP_IDLE_MS),
        }
    }
}
