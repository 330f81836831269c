//! Startup and shutdown splash sequences.
//!
//! Both draw a splash frame and then sweep the panel contrast. The
//! delays go through `DelayNs` so tests can run them instantly.

use embedded_hal::delay::DelayNs;
use log::info;

use crate::config::{
    ANIMATION_HOLD_MS, CONTRAST_MAX, RAMP_STEP_MS, STARTUP_RAMP_DOWN_STEP, STARTUP_RAMP_UP_STEP,
};
use crate::error::Result;
use crate::ui::compositor::{compose, Scene};
use crate::ui::display::DisplayDriver;
use crate::ui::framebuffer::Framebuffer;
use crate::ui::menu::Icon;

/// Contrast levels from `from` to `to`, both inclusive.
#[derive(Clone, Debug)]
pub struct Ramp {
    next: Option<u8>,
    to: u8,
    step: u8,
}

impl Ramp {
    pub fn new(from: u8, to: u8, step: u8) -> Self {
        Self {
            next: Some(from),
            to,
            step: step.max(1),
        }
    }
}

impl Iterator for Ramp {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let current = self.next?;
        self.next = if current == self.to {
            None
        } else if current > self.to {
            Some(current.saturating_sub(self.step).max(self.to))
        } else {
            Some(current.saturating_add(self.step).min(self.to))
        };
        Some(current)
    }
}

/// "Welcome!" splash, fade out, fade back in, blank.
pub fn startup<D, T>(display: &mut D, delay: &mut T) -> Result<()>
where
    D: DisplayDriver,
    T: DelayNs,
{
    info!("Display: startup animation");
    splash(display, Icon::Printer, "Welcome!\nStartup!")?;
    delay.delay_ms(ANIMATION_HOLD_MS);
    sweep(display, delay, Ramp::new(CONTRAST_MAX, 0, STARTUP_RAMP_DOWN_STEP))?;
    sweep(display, delay, Ramp::new(0, CONTRAST_MAX, STARTUP_RAMP_UP_STEP))?;
    delay.delay_ms(ANIMATION_HOLD_MS);
    display.blank()
}

/// "Goodbye!" splash, fade to the dimmest level, blank.
pub fn shutdown<D, T>(display: &mut D, delay: &mut T) -> Result<()>
where
    D: DisplayDriver,
    T: DelayNs,
{
    info!("Display: shutdown animation");
    splash(display, Icon::Power, "Goodbye!\nShutdown!")?;
    delay.delay_ms(ANIMATION_HOLD_MS);
    sweep(display, delay, Ramp::new(CONTRAST_MAX, 1, 1))?;
    delay.delay_ms(ANIMATION_HOLD_MS);
    display.blank()
}

fn splash<D: DisplayDriver>(display: &mut D, icon: Icon, text: &str) -> Result<()> {
    let mut frame = Framebuffer::new();
    compose(&mut frame, &Scene::splash(icon, text));
    display.set_contrast(CONTRAST_MAX)?;
    display.show(&frame)
}

fn sweep<D, T>(display: &mut D, delay: &mut T, ramp: Ramp) -> Result<()>
where
    D: DisplayDriver,
    T: DelayNs,
{
    for level in ramp {
        display.set_contrast(level)?;
        delay.delay_ms(RAMP_STEP_MS);
    }
    Ok(())
}
