//! Display driver seam and the SSD1306 implementation behind it.

use crate::error::Result;
use crate::ui::framebuffer::Framebuffer;

/// Sink for finished frames.
pub trait DisplayDriver {
    /// Push a complete frame to the panel.
    fn show(&mut self, frame: &Framebuffer) -> Result<()>;

    fn set_contrast(&mut self, level: u8) -> Result<()>;

    /// Blank the panel.
    fn blank(&mut self) -> Result<()>;
}

#[cfg(feature = "embedded")]
pub use oled::Oled;

#[cfg(feature = "embedded")]
mod oled {
    use embedded_graphics::prelude::*;
    use log::info;
    use ssd1306::mode::BufferedGraphicsMode;
    use ssd1306::prelude::*;
    use ssd1306::{I2CDisplayInterface, Ssd1306};

    use super::DisplayDriver;
    use crate::config::OLED_I2C_ADDRESS;
    use crate::error::{Error, Result};
    use crate::ui::framebuffer::Framebuffer;

    /// Pre-charge period used with every contrast change.
    const PRECHARGE: u8 = 0x2;

    type Panel<I2C> =
        Ssd1306<I2CInterface<I2C>, DisplaySize128x32, BufferedGraphicsMode<DisplaySize128x32>>;

    /// 128×32 SSD1306 on I²C, buffered.
    pub struct Oled<I2C> {
        panel: Panel<I2C>,
    }

    impl<I2C> Oled<I2C>
    where
        I2C: embedded_hal::i2c::I2c,
    {
        /// Initialise the controller and clear the screen.
        pub fn new(i2c: I2C) -> Result<Self> {
            let interface = I2CDisplayInterface::new_custom_address(i2c, OLED_I2C_ADDRESS);
            let mut panel = Ssd1306::new(interface, DisplaySize128x32, DisplayRotation::Rotate0)
                .into_buffered_graphics_mode();
            panel.init().map_err(bus_error)?;
            panel.clear_buffer();
            panel.flush().map_err(bus_error)?;
            info!("Display: SSD1306 128x32 ready");
            Ok(Self { panel })
        }
    }

    impl<I2C> DisplayDriver for Oled<I2C>
    where
        I2C: embedded_hal::i2c::I2c,
    {
        fn show(&mut self, frame: &Framebuffer) -> Result<()> {
            self.panel.clear_buffer();
            self.panel.draw_iter(frame.pixels()).map_err(bus_error)?;
            self.panel.flush().map_err(bus_error)
        }

        fn set_contrast(&mut self, level: u8) -> Result<()> {
            self.panel
                .set_brightness(Brightness::custom(PRECHARGE, level))
                .map_err(bus_error)
        }

        fn blank(&mut self) -> Result<()> {
            self.panel.clear_buffer();
            self.panel.flush().map_err(bus_error)
        }
    }

    fn bus_error<E: core::fmt::Debug>(e: E) -> Error {
        Error::Display(format!("{:?}", e))
    }
}
