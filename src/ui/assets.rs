//! Built-in 1-bit icons and navigation glyphs.
//!
//! Each sprite is stored as MSB-first `u16` rows. Drawing writes every
//! pixel of the sprite's box, so the inverted variant is a lit box with
//! the artwork punched out.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::ui::menu::Icon;

pub struct Sprite {
    width: u32,
    rows: &'static [u16],
}

impl Sprite {
    pub const fn new(width: u32, rows: &'static [u16]) -> Self {
        Self { width, rows }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.rows.len() as u32)
    }

    pub fn bit(&self, x: u32, y: u32) -> bool {
        match self.rows.get(y as usize) {
            Some(row) if x < self.width && x < 16 => row & (0x8000 >> x) != 0,
            _ => false,
        }
    }

    /// All pixels of the sprite placed at `origin`.
    pub fn pixels(&self, origin: Point, inverted: bool) -> impl Iterator<Item = Pixel<BinaryColor>> + '_ {
        let width = self.width;
        (0..self.rows.len() as u32).flat_map(move |y| {
            (0..width).map(move |x| {
                let on = self.bit(x, y) != inverted;
                Pixel(origin + Point::new(x as i32, y as i32), BinaryColor::from(on))
            })
        })
    }

    pub fn draw<D>(&self, target: &mut D, origin: Point, inverted: bool) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        target.draw_iter(self.pixels(origin, inverted))
    }
}

pub fn icon(icon: Icon) -> &'static Sprite {
    match icon {
        Icon::Reboot => &REBOOT,
        Icon::Printer => &PRINTER,
        Icon::Power => &POWER,
        Icon::PrinterInfo => &PRINTER_INFO,
        Icon::Info => &INFO,
        Icon::Back => &BACK,
    }
}

pub static PRINTER: Sprite = Sprite::new(16, &[
    0b0000_0000_0000_0000,
    0b0000_1111_1111_0000,
    0b0000_1000_0001_0000,
    0b0000_1000_0001_0000,
    0b0011_1111_1111_1100,
    0b0100_0000_0000_0010,
    0b0100_0000_0000_0010,
    0b0100_0000_0001_1010,
    0b0100_0000_0000_0010,
    0b0111_1111_1111_1110,
    0b0001_0000_0000_1000,
    0b0001_0111_1110_1000,
    0b0001_0000_0000_1000,
    0b0001_0111_1110_1000,
    0b0001_1111_1111_1000,
    0b0000_0000_0000_0000,
]);

pub static REBOOT: Sprite = Sprite::new(16, &[
    0b0000_0000_0000_0000,
    0b0000_0111_1100_0000,
    0b0001_1000_0011_0100,
    0b0010_0000_0000_1100,
    0b0100_0000_0001_1100,
    0b0100_0000_0000_0000,
    0b1000_0000_0000_0000,
    0b1000_0000_0000_0000,
    0b1000_0000_0000_0001,
    0b1000_0000_0000_0001,
    0b0100_0000_0000_0010,
    0b0100_0000_0000_0010,
    0b0010_0000_0000_0100,
    0b0001_1000_0001_1000,
    0b0000_0111_1110_0000,
    0b0000_0000_0000_0000,
]);

pub static POWER: Sprite = Sprite::new(16, &[
    0b0000_0001_0000_0000,
    0b0000_0001_0000_0000,
    0b0001_1001_0011_0000,
    0b0010_0001_0000_1000,
    0b0100_0001_0000_0100,
    0b0100_0001_0000_0100,
    0b1000_0001_0000_0010,
    0b1000_0000_0000_0010,
    0b1000_0000_0000_0010,
    0b1000_0000_0000_0010,
    0b0100_0000_0000_0100,
    0b0100_0000_0000_0100,
    0b0010_0000_0000_1000,
    0b0001_1000_0011_0000,
    0b0000_0111_1100_0000,
    0b0000_0000_0000_0000,
]);

pub static PRINTER_INFO: Sprite = Sprite::new(16, &[
    0b0000_0000_0000_0000,
    0b0011_1111_1110_0000,
    0b0010_0000_0011_0000,
    0b0010_0000_0010_1000,
    0b0010_1111_0011_1100,
    0b0010_0000_0000_0100,
    0b0010_1111_1110_0100,
    0b0010_0000_0000_0100,
    0b0010_1111_1110_0100,
    0b0010_0000_0000_0100,
    0b0010_1111_1000_0100,
    0b0010_0000_0000_0100,
    0b0010_0000_0000_0100,
    0b0011_1111_1111_1100,
    0b0000_0000_0000_0000,
    0b0000_0000_0000_0000,
]);

pub static INFO: Sprite = Sprite::new(16, &[
    0b0000_0111_1100_0000,
    0b0001_1000_0011_0000,
    0b0010_0001_0000_1000,
    0b0100_0001_0000_0100,
    0b0100_0000_0000_0100,
    0b1000_0011_0000_0010,
    0b1000_0001_0000_0010,
    0b1000_0001_0000_0010,
    0b1000_0001_0000_0010,
    0b1000_0001_0000_0010,
    0b0100_0011_1000_0100,
    0b0100_0000_0000_0100,
    0b0010_0000_0000_1000,
    0b0001_1000_0011_0000,
    0b0000_0111_1100_0000,
    0b0000_0000_0000_0000,
]);

pub static BACK: Sprite = Sprite::new(16, &[
    0b0000_0000_0000_0000,
    0b0000_1000_0000_0000,
    0b0001_1000_0000_0000,
    0b0011_1111_1111_0000,
    0b0111_1111_1111_1000,
    0b0011_1111_1111_1100,
    0b0001_1000_0000_1100,
    0b0000_1000_0000_0110,
    0b0000_0000_0000_0110,
    0b0000_0000_0000_0110,
    0b0000_0000_0000_0110,
    0b0000_0000_0000_1100,
    0b0000_0000_1111_1100,
    0b0000_0000_1111_1000,
    0b0000_0000_0000_0000,
    0b0000_0000_0000_0000,
]);

pub static NAV_LEFT: Sprite = Sprite::new(6, &[
    0b0000_1000_0000_0000,
    0b0001_1000_0000_0000,
    0b0011_1000_0000_0000,
    0b0111_1000_0000_0000,
    0b0111_1000_0000_0000,
    0b0011_1000_0000_0000,
    0b0001_1000_0000_0000,
    0b0000_1000_0000_0000,
]);

pub static NAV_RIGHT: Sprite = Sprite::new(6, &[
    0b0100_0000_0000_0000,
    0b0110_0000_0000_0000,
    0b0111_0000_0000_0000,
    0b0111_1000_0000_0000,
    0b0111_1000_0000_0000,
    0b0111_0000_0000_0000,
    0b0110_0000_0000_0000,
    0b0100_0000_0000_0000,
]);
