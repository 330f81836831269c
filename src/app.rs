//! Application context: everything the main loop touches.
//!
//! One `step` is one loop iteration, in a fixed order: sample input,
//! apply navigation, service the snapshot feed, redraw if the redraw
//! tick is due, blink if the heartbeat tick is due. A single menu
//! position governs the whole frame.

use std::time::Instant;

use log::{debug, warn};

use crate::command::CommandDispatcher;
use crate::config::Timing;
use crate::scheduler::TickFlags;
use crate::status::StatusIndicator;
use crate::sysinfo::SnapshotFeed;
use crate::ui::buttons::{ButtonLines, InputState};
use crate::ui::compositor::{compose, Held, Scene};
use crate::ui::display::DisplayDriver;
use crate::ui::framebuffer::Framebuffer;
use crate::ui::menu::{Command, MenuGraph, MenuId, Navigator, NodeKind, Transition};
use crate::ui::{Button, NavEvent};

/// The boundary objects the loop drives.
pub struct Peripherals<B, D, C, S> {
    pub buttons: B,
    pub display: D,
    pub commands: C,
    pub status: S,
}

/// What the caller should do after a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Power-off was selected. Not yet dispatched: the shutdown
    /// animation has to run first.
    PowerOff,
}

pub struct App<B, D, C, S> {
    graph: MenuGraph,
    navigator: Navigator,
    input: InputState,
    flags: TickFlags,
    feed: SnapshotFeed,
    io: Peripherals<B, D, C, S>,
    display_fault: bool,
}

impl<B, D, C, S> App<B, D, C, S>
where
    B: ButtonLines,
    D: DisplayDriver,
    C: CommandDispatcher,
    S: StatusIndicator,
{
    pub fn new(
        graph: MenuGraph,
        timing: Timing,
        flags: TickFlags,
        feed: SnapshotFeed,
        io: Peripherals<B, D, C, S>,
    ) -> Self {
        let navigator = Navigator::new(&graph);
        Self {
            graph,
            navigator,
            input: InputState::new(timing.debounce),
            flags,
            feed,
            io,
            display_fault: false,
        }
    }

    pub fn current(&self) -> MenuId {
        self.navigator.current()
    }

    pub fn graph(&self) -> &MenuGraph {
        &self.graph
    }

    pub fn peripherals_mut(&mut self) -> &mut Peripherals<B, D, C, S> {
        &mut self.io
    }

    /// Run one loop iteration.
    pub fn step(&mut self, now: Instant) -> Flow {
        self.input.sample(&mut self.io.buttons, now);

        for button in [Button::Left, Button::Right, Button::Enter] {
            if !self.input.poll(button) {
                continue;
            }
            match self.navigator.apply(&self.graph, NavEvent::from(button)) {
                Transition::Dispatch(Command::PowerOff) => return Flow::PowerOff,
                Transition::Dispatch(command) => {
                    if let Err(e) = self.io.commands.dispatch(command) {
                        warn!("Command: {}", e);
                    }
                }
                Transition::Moved { .. } | Transition::Unchanged => {}
            }
        }

        let wants_snapshot = matches!(self.current_kind(), Some(NodeKind::Snapshot(_)));
        self.feed.poll(now, wants_snapshot);
        self.io.status.set_busy(self.feed.in_flight());

        if self.flags.redraw.take() {
            self.redraw();
        }
        if self.flags.heartbeat.take() {
            self.io.status.heartbeat();
        }

        self.io
            .status
            .set_fault(self.display_fault || self.input.read_fault());
        Flow::Continue
    }

    /// Build a fresh frame for the current position and push it.
    fn redraw(&mut self) {
        let Some(node) = self.graph.node(self.navigator.current()) else {
            return;
        };
        let snapshot = match node.kind {
            NodeKind::Snapshot(page) => Some(self.feed.view().page_text(page)),
            _ => None,
        };
        let held = Held {
            left: self.input.is_held(Button::Left),
            enter: self.input.is_held(Button::Enter),
            right: self.input.is_held(Button::Right),
        };
        let scene = Scene::for_node(&self.graph, node, held, snapshot.as_deref());

        let mut frame = Framebuffer::new();
        compose(&mut frame, &scene);

        match self.io.display.show(&frame) {
            Ok(()) => {
                if self.display_fault {
                    debug!("Display: recovered");
                }
                self.display_fault = false;
            }
            Err(e) => {
                if !self.display_fault {
                    warn!("{}", e);
                }
                self.display_fault = true;
            }
        }
    }

    fn current_kind(&self) -> Option<NodeKind> {
        self.graph.node(self.navigator.current()).map(|n| n.kind)
    }
}
