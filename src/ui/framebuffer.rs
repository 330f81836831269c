//! 1-bit framebuffer with named sub-regions.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::config::{OLED_HEIGHT, OLED_WIDTH};

const WIDTH: usize = OLED_WIDTH as usize;
const HEIGHT: usize = OLED_HEIGHT as usize;
const BYTES: usize = WIDTH * HEIGHT / 8;

/// Named areas of the 128×32 layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    Icon,
    /// Label text box.
    Text,
    /// Denser text box for live snapshot pages; drawn instead of `Text`.
    SubText,
    NavLeft,
    NavRight,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Icon,
        Region::Text,
        Region::SubText,
        Region::NavLeft,
        Region::NavRight,
    ];

    /// Regions never drawn in the same pass.
    pub fn exclusive(self, other: Region) -> bool {
        matches!(
            (self, other),
            (Region::Text, Region::SubText) | (Region::SubText, Region::Text)
        )
    }

    pub const fn area(self) -> Rectangle {
        match self {
            Region::Icon => Rectangle::new(Point::new(14, 8), Size::new(16, 16)),
            Region::Text => Rectangle::new(Point::new(36, 3), Size::new(80, 26)),
            Region::SubText => Rectangle::new(Point::new(33, 2), Size::new(86, 28)),
            Region::NavLeft => Rectangle::new(Point::new(1, 12), Size::new(6, 8)),
            Region::NavRight => Rectangle::new(Point::new(121, 12), Size::new(6, 8)),
        }
    }
}

/// Row-major packed bitmap, MSB first.
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    bits: [u8; BYTES],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    pub const fn new() -> Self {
        Self { bits: [0; BYTES] }
    }

    /// Blank the background and every sub-region.
    pub fn clear_all(&mut self) {
        self.bits.fill(0);
        for region in Region::ALL {
            self.fill_area(&region.area(), false);
        }
    }

    pub fn fill_area(&mut self, area: &Rectangle, on: bool) {
        for p in area.points() {
            self.set(p, on);
        }
    }

    pub fn is_on(&self, p: Point) -> bool {
        match Self::offset(p) {
            Some((byte, mask)) => self.bits[byte] & mask != 0,
            None => false,
        }
    }

    /// Lit pixels inside `area`.
    pub fn lit_in(&self, area: &Rectangle) -> usize {
        area.points().filter(|p| self.is_on(*p)).count()
    }

    pub fn lit(&self) -> usize {
        self.bits.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Every pixel of the frame, for pushing to a display.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel<BinaryColor>> + '_ {
        self.bounding_box()
            .points()
            .map(|p| Pixel(p, BinaryColor::from(self.is_on(p))))
    }

    fn set(&mut self, p: Point, on: bool) {
        if let Some((byte, mask)) = Self::offset(p) {
            if on {
                self.bits[byte] |= mask;
            } else {
                self.bits[byte] &= !mask;
            }
        }
    }

    fn offset(p: Point) -> Option<(usize, u8)> {
        if p.x < 0 || p.y < 0 || p.x >= WIDTH as i32 || p.y >= HEIGHT as i32 {
            return None;
        }
        let idx = p.y as usize * WIDTH + p.x as usize;
        Some((idx / 8, 0x80 >> (idx % 8)))
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set(point, color.is_on());
        }
        Ok(())
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(OLED_WIDTH, OLED_HEIGHT)
    }
}

impl core::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for y in 0..HEIGHT as i32 {
            for x in 0..WIDTH as i32 {
                f.write_str(if self.is_on(Point::new(x, y)) { "#" } else { "." })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_fit_inside_the_panel_and_do_not_overlap() {
        let panel = Rectangle::new(Point::zero(), Size::new(OLED_WIDTH, OLED_HEIGHT));
        for a in Region::ALL {
            let area = a.area();
            assert_eq!(panel.intersection(&area), area, "{:?} leaves the panel", a);
            for b in Region::ALL {
                if a != b && !a.exclusive(b) {
                    let overlap = area.intersection(&b.area());
                    assert_eq!(overlap.size, Size::zero(), "{:?} overlaps {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn out_of_bounds_pixels_are_dropped() {
        let mut fb = Framebuffer::new();
        fb.draw_iter([
            Pixel(Point::new(-1, 0), BinaryColor::On),
            Pixel(Point::new(128, 0), BinaryColor::On),
            Pixel(Point::new(0, 32), BinaryColor::On),
        ])
        .unwrap();
        assert_eq!(fb.lit(), 0);
    }

    #[test]
    fn clear_all_wipes_everything() {
        let mut fb = Framebuffer::new();
        fb.clear(BinaryColor::On).unwrap();
        assert_eq!(fb.lit(), BYTES * 8);
        fb.clear_all();
        assert_eq!(fb.lit(), 0);
    }

    #[test]
    fn pixels_cover_the_whole_panel() {
        let mut fb = Framebuffer::new();
        fb.fill_area(&Region::Icon.area(), true);
        let pixels: Vec<_> = fb.pixels().collect();
        assert_eq!(pixels.len(), WIDTH * HEIGHT);
        let on = pixels.iter().filter(|Pixel(_, c)| c.is_on()).count();
        assert_eq!(on, 16 * 16);
    }
}
