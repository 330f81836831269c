//! User interface subsystem - OLED display + physical buttons.
//!
//! The main loop samples the buttons, feeds debounced events to the
//! menu navigator, and rebuilds the frame on every redraw tick.
//!
//! ## Components
//!
//! - **Buttons**: 3 tactile switches with debouncing (LEFT, ENTER, RIGHT)
//! - **Menu**: ring-structured menu graph and the navigator over it
//! - **Compositor**: draws the current node into a 128×32 framebuffer
//! - **Display**: SSD1306 128×32 OLED via I²C (hardware build only)

pub mod animation;
pub mod assets;
pub mod buttons;
pub mod compositor;
pub mod display;
pub mod framebuffer;
pub mod input_logic;
pub mod menu;


/// The three front-panel buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Enter,
    Right,
}

impl Button {
    pub const ALL: [Button; 3] = [Button::Left, Button::Enter, Button::Right];

    /// Which electrical transition counts as a press.
    ///
    /// LEFT/RIGHT react on press; ENTER reacts on release so a held
    /// ENTER can show its inverted icon before the command runs.
    pub fn edge(self) -> Edge {
        match self {
            Button::Left | Button::Right => Edge::Falling,
            Button::Enter => Edge::Rising,
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            Button::Left => 0,
            Button::Enter => 1,
            Button::Right => 2,
        }
    }
}

/// Raw line level. Buttons are active-low with pull-ups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Falling,
    Rising,
}

impl Edge {
    /// Does `from -> to` match this edge?
    pub fn matches(self, from: Level, to: Level) -> bool {
        match self {
            Edge::Falling => from == Level::High && to == Level::Low,
            Edge::Rising => from == Level::Low && to == Level::High,
        }
    }
}

/// Navigation events (after debouncing).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavEvent {
    Left,
    Right,
    Enter,
}

impl From<Button> for NavEvent {
    fn from(button: Button) -> Self {
        match button {
            Button::Left => NavEvent::Left,
            Button::Enter => NavEvent::Enter,
            Button::Right => NavEvent::Right,
        }
    }
}
