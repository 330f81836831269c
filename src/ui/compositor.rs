//! Frame composition.
//!
//! Every pass starts from a blank frame: clear, then text and icon,
//! then the navigation glyphs. Nothing from a previous pass is read.

use embedded_graphics::mono_font::ascii::{FONT_5X8, FONT_6X10};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use crate::ui::assets::{self, Sprite};
use crate::ui::framebuffer::{Framebuffer, Region};
use crate::ui::menu::{Icon, MenuGraph, MenuNode, NodeKind};

/// Buttons physically held during this pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Held {
    pub left: bool,
    pub enter: bool,
    pub right: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
    /// Direction is a no-op here.
    Hidden,
    Normal,
    Inverted,
}

impl Glyph {
    fn pick(available: bool, held: bool) -> Self {
        match (available, held) {
            (false, _) => Glyph::Hidden,
            (true, false) => Glyph::Normal,
            (true, true) => Glyph::Inverted,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Body<'a> {
    /// Node label in the main text box.
    Label(&'a str),
    /// Multi-line snapshot text in the submenu text box.
    Snapshot(&'a str),
}

/// Everything one pass draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scene<'a> {
    pub icon: Icon,
    pub icon_inverted: bool,
    pub body: Body<'a>,
    pub left: Glyph,
    pub right: Glyph,
}

impl<'a> Scene<'a> {
    /// Scene for `node`. `snapshot` replaces the label on snapshot pages.
    pub fn for_node(graph: &MenuGraph, node: &'a MenuNode, held: Held, snapshot: Option<&'a str>) -> Self {
        let body = match (node.kind, snapshot) {
            (NodeKind::Snapshot(_), Some(text)) => Body::Snapshot(text),
            _ => Body::Label(node.label),
        };
        Self {
            icon: node.icon,
            icon_inverted: held.enter,
            body,
            left: Glyph::pick(graph.can_move_left(node.id), held.left),
            right: Glyph::pick(graph.can_move_right(node.id), held.right),
        }
    }

    /// Glyph-free splash frame.
    pub fn splash(icon: Icon, text: &'a str) -> Self {
        Self {
            icon,
            icon_inverted: false,
            body: Body::Label(text),
            left: Glyph::Hidden,
            right: Glyph::Hidden,
        }
    }
}

/// Rebuild `fb` from `scene`.
pub fn compose(fb: &mut Framebuffer, scene: &Scene<'_>) {
    fb.clear_all();

    match scene.body {
        Body::Label(text) => draw_text(fb, Region::Text, text, &FONT_6X10),
        Body::Snapshot(text) => draw_text(fb, Region::SubText, text, &FONT_5X8),
    }
    draw_sprite(fb, Region::Icon, assets::icon(scene.icon), scene.icon_inverted);

    draw_glyph(fb, Region::NavLeft, &assets::NAV_LEFT, scene.left);
    draw_glyph(fb, Region::NavRight, &assets::NAV_RIGHT, scene.right);
}

fn draw_text(fb: &mut Framebuffer, region: Region, text: &str, font: &MonoFont<'_>) {
    let area = region.area();
    let lines = text.lines().count().max(1) as u32;
    let used = lines * font.character_size.height;
    let top = area.top_left.y + (area.size.height.saturating_sub(used) / 2) as i32;

    let style = MonoTextStyle::new(font, BinaryColor::On);
    let origin = Point::new(area.top_left.x + 1, top);
    let mut clipped = fb.clipped(&area);
    let _ = Text::with_baseline(text, origin, style, Baseline::Top).draw(&mut clipped);
}

fn draw_sprite(fb: &mut Framebuffer, region: Region, sprite: &Sprite, inverted: bool) {
    let _ = sprite.draw(fb, region.area().top_left, inverted);
}

fn draw_glyph(fb: &mut Framebuffer, region: Region, sprite: &Sprite, glyph: Glyph) {
    match glyph {
        Glyph::Hidden => {}
        Glyph::Normal => draw_sprite(fb, region, sprite, false),
        Glyph::Inverted => draw_sprite(fb, region, sprite, true),
    }
}
