//! Front-panel status LEDs.
//!
//!   - green  - toggles on every heartbeat tick
//!   - orange - lit while a system-info fetch is running
//!   - red    - lit while the display or the buttons are failing

use embedded_hal::digital::{Error as _, OutputPin, PinState};
use log::warn;

use crate::error::{Error, Result};

pub trait StatusIndicator {
    fn heartbeat(&mut self);
    fn set_busy(&mut self, busy: bool);
    fn set_fault(&mut self, fault: bool);
    fn all_off(&mut self);
}

/// One LED with its last written state, so unchanged states skip the
/// sysfs write.
struct Led<P> {
    pin: P,
    name: &'static str,
    lit: Option<bool>,
}

impl<P: OutputPin> Led<P> {
    fn new(pin: P, name: &'static str) -> Self {
        Self {
            pin,
            name,
            lit: None,
        }
    }

    fn set(&mut self, on: bool) {
        if self.lit == Some(on) {
            return;
        }
        match self.write(on) {
            Ok(()) => self.lit = Some(on),
            Err(e) => warn!("{}", e),
        }
    }

    fn write(&mut self, on: bool) -> Result<()> {
        self.pin
            .set_state(PinState::from(on))
            .map_err(|e| Error::Led(format!("{} LED: {:?}", self.name, e.kind())))
    }

    fn toggle(&mut self) {
        let on = !self.lit.unwrap_or(false);
        self.set(on);
    }
}

/// Green/orange/red LEDs on `embedded-hal` output pins.
pub struct StatusLeds<P> {
    green: Led<P>,
    orange: Led<P>,
    red: Led<P>,
}

impl<P: OutputPin> StatusLeds<P> {
    /// Takes the pins and switches every LED off.
    pub fn new(green: P, orange: P, red: P) -> Self {
        let mut leds = Self {
            green: Led::new(green, "green"),
            orange: Led::new(orange, "orange"),
            red: Led::new(red, "red"),
        };
        leds.all_off();
        leds
    }
}

impl<P: OutputPin> StatusIndicator for StatusLeds<P> {
    fn heartbeat(&mut self) {
        self.green.toggle();
    }

    fn set_busy(&mut self, busy: bool) {
        self.orange.set(busy);
    }

    fn set_fault(&mut self, fault: bool) {
        self.red.set(fault);
    }

    fn all_off(&mut self) {
        self.green.set(false);
        self.orange.set(false);
        self.red.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Probe {
        writes: Rc<RefCell<Vec<bool>>>,
    }

    impl ErrorType for Probe {
        type Error = Infallible;
    }

    impl OutputPin for Probe {
        fn set_low(&mut self) -> core::result::Result<(), Infallible> {
            self.writes.borrow_mut().push(false);
            Ok(())
        }
        fn set_high(&mut self) -> core::result::Result<(), Infallible> {
            self.writes.borrow_mut().push(true);
            Ok(())
        }
    }

    #[test]
    fn leds_start_off() {
        let (g, o, r) = (Probe::default(), Probe::default(), Probe::default());
        let _leds = StatusLeds::new(g.clone(), o.clone(), r.clone());
        for p in [g, o, r] {
            assert_eq!(*p.writes.borrow(), vec![false]);
        }
    }

    #[test]
    fn heartbeat_toggles_green() {
        let green = Probe::default();
        let mut leds = StatusLeds::new(green.clone(), Probe::default(), Probe::default());
        leds.heartbeat();
        leds.heartbeat();
        leds.heartbeat();
        assert_eq!(*green.writes.borrow(), vec![false, true, false, true]);
    }

    #[test]
    fn unchanged_state_is_not_rewritten() {
        let red = Probe::default();
        let mut leds = StatusLeds::new(Probe::default(), Probe::default(), red.clone());
        leds.set_fault(true);
        leds.set_fault(true);
        leds.set_fault(false);
        leds.set_fault(false);
        assert_eq!(*red.writes.borrow(), vec![false, true, false]);
    }
}
