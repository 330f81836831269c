//! Menu graph and navigation state machine.
//!
//! The graph is a ring of Main items, some of which own a nested
//! submenu ring. Positions are `MenuId`s (band tag + index), so moving
//! within a ring can never land in another band.
//!
//! Ring rules:
//! - Main wraps end-to-end.
//! - Submenus are clamped: LEFT on the first item and RIGHT on the last
//!   item are no-ops.
//! - ENTER on a submenu owner jumps to its first item; ENTER on a
//!   navigation item inside a submenu returns to the owner; ENTER on an
//!   action item dispatches its command and stays put.

use log::info;

use crate::error::{Error, Result};
use crate::ui::input_logic::{can_select_next, can_select_prev, select_next, select_prev, Wrap};
use crate::ui::NavEvent;

/// Disjoint menu bands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Band {
    Main,
    SystemInfo,
    PrinterOptions,
}

/// Position in the menu graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MenuId {
    band: Band,
    index: u8,
}

impl MenuId {
    pub fn band(&self) -> Band {
        self.band
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }
}

/// Icon shown next to a node's label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Icon {
    Reboot,
    Printer,
    Power,
    PrinterInfo,
    Info,
    Back,
}

/// Side-effecting OS actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Reboot,
    PrintTestPage,
    PowerOff,
    ResumeQueue,
    CancelJobs,
    ResetUsb,
}

/// Which slice of the system snapshot a System Info page shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotPage {
    /// IP address and CPU temperature.
    Network,
    /// Uptime, memory and CPU load.
    Load,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Terminal item bound to a command.
    Action(Command),
    /// Main item owning a submenu ring.
    Submenu(Band),
    /// Submenu item that only leads back to its owner.
    Back,
    /// Submenu item rendering live system info; ENTER leads back.
    Snapshot(SnapshotPage),
}

/// One static menu entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuNode {
    pub id: MenuId,
    /// Display label; `\n` splits lines.
    pub label: &'static str,
    pub icon: Icon,
    pub kind: NodeKind,
}

/// Node description handed to the builder.
#[derive(Clone, Copy, Debug)]
pub struct Entry {
    pub label: &'static str,
    pub icon: Icon,
    pub kind: NodeKind,
}

impl Entry {
    pub const fn new(label: &'static str, icon: Icon, kind: NodeKind) -> Self {
        Self { label, icon, kind }
    }
}

/// Result of ENTER.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnterOutcome {
    Navigate(MenuId),
    Dispatch(Command),
    Stay,
}

struct Ring {
    band: Band,
    wrap: Wrap,
    /// Main index of the owner; `None` for Main itself.
    owner: Option<u8>,
    nodes: Vec<MenuNode>,
}

/// Immutable menu graph.
pub struct MenuGraph {
    rings: Vec<Ring>,
    default: MenuId,
}

impl MenuGraph {
    pub fn builder() -> MenuGraphBuilder {
        MenuGraphBuilder::default()
    }

    /// The hat's menu: five Main items, two submenus.
    pub fn standard() -> Self {
        use Icon::*;
        use NodeKind::*;

        let built = Self::builder()
            .item(Entry::new("Reboot", Reboot, Action(Command::Reboot)))
            .item(Entry::new("Print\nTest Page", Printer, Action(Command::PrintTestPage)))
            .item(Entry::new("Shutdown", Power, Action(Command::PowerOff)))
            .item(Entry::new("Printer\nOptions", PrinterInfo, Submenu(Band::PrinterOptions)))
            .item(Entry::new("System\nInfo", Info, Submenu(Band::SystemInfo)))
            .submenu(
                Band::SystemInfo,
                &[
                    Entry::new("Network", Info, Snapshot(SnapshotPage::Network)),
                    Entry::new("Load", Info, Snapshot(SnapshotPage::Load)),
                ],
            )
            .submenu(
                Band::PrinterOptions,
                &[
                    Entry::new("Resume\nQueue", Printer, Action(Command::ResumeQueue)),
                    Entry::new("Cancel\nAll Jobs", Printer, Action(Command::CancelJobs)),
                    Entry::new("Reset\nUSB Port", PrinterInfo, Action(Command::ResetUsb)),
                    Entry::new("Back", Icon::Back, NodeKind::Back),
                ],
            )
            .start_at(3)
            .build();

        match built {
            Ok(graph) => graph,
            // The table above is static; reaching this is a coding error.
            Err(e) => unreachable!("standard menu rejected: {}", e),
        }
    }

    pub fn default_item(&self) -> MenuId {
        self.default
    }

    /// Number of items in `band` (0 if the band is not present).
    pub fn len(&self, band: Band) -> usize {
        self.ring(band).map_or(0, |r| r.nodes.len())
    }

    /// Look up a position by band and index.
    pub fn find(&self, band: Band, index: usize) -> Option<MenuId> {
        self.ring(band)
            .and_then(|r| r.nodes.get(index))
            .map(|n| n.id)
    }

    pub fn node(&self, id: MenuId) -> Option<&MenuNode> {
        self.ring(id.band).and_then(|r| r.nodes.get(id.index()))
    }

    /// Main item that owns `band`.
    pub fn owner_of(&self, band: Band) -> Option<MenuId> {
        let owner = self.ring(band)?.owner?;
        self.find(Band::Main, owner as usize)
    }

    pub fn move_left(&self, id: MenuId) -> MenuId {
        self.step(id, select_prev)
    }

    pub fn move_right(&self, id: MenuId) -> MenuId {
        self.step(id, select_next)
    }

    pub fn can_move_left(&self, id: MenuId) -> bool {
        self.ring(id.band)
            .is_some_and(|r| can_select_prev(id.index(), r.nodes.len(), r.wrap))
    }

    pub fn can_move_right(&self, id: MenuId) -> bool {
        self.ring(id.band)
            .is_some_and(|r| can_select_next(id.index(), r.nodes.len(), r.wrap))
    }

    pub fn enter(&self, id: MenuId) -> EnterOutcome {
        let Some(node) = self.node(id) else {
            return EnterOutcome::Stay;
        };
        match node.kind {
            NodeKind::Action(command) => EnterOutcome::Dispatch(command),
            NodeKind::Submenu(band) => self
                .find(band, 0)
                .map_or(EnterOutcome::Stay, EnterOutcome::Navigate),
            NodeKind::Back | NodeKind::Snapshot(_) => self
                .owner_of(id.band)
                .map_or(EnterOutcome::Stay, EnterOutcome::Navigate),
        }
    }

    fn step(&self, id: MenuId, f: fn(usize, usize, Wrap) -> usize) -> MenuId {
        match self.ring(id.band) {
            Some(ring) if id.index() < ring.nodes.len() => {
                ring.nodes[f(id.index(), ring.nodes.len(), ring.wrap)].id
            }
            _ => id,
        }
    }

    fn ring(&self, band: Band) -> Option<&Ring> {
        self.rings.iter().find(|r| r.band == band)
    }
}

/// Validating constructor for `MenuGraph`.
#[derive(Default)]
pub struct MenuGraphBuilder {
    main: Vec<Entry>,
    submenus: Vec<(Band, Vec<Entry>)>,
    start: usize,
}

impl MenuGraphBuilder {
    pub fn item(mut self, entry: Entry) -> Self {
        self.main.push(entry);
        self
    }

    pub fn submenu(mut self, band: Band, entries: &[Entry]) -> Self {
        self.submenus.push((band, entries.to_vec()));
        self
    }

    pub fn start_at(mut self, index: usize) -> Self {
        self.start = index;
        self
    }

    pub fn build(self) -> Result<MenuGraph> {
        if self.main.is_empty() {
            return Err(Error::Menu("main ring is empty"));
        }
        if self.main.len() > u8::MAX as usize {
            return Err(Error::Menu("main ring too long"));
        }
        if self.start >= self.main.len() {
            return Err(Error::Menu("default item outside main ring"));
        }

        let mut rings = vec![Ring {
            band: Band::Main,
            wrap: Wrap::Cyclic,
            owner: None,
            nodes: to_nodes(Band::Main, &self.main),
        }];

        for (band, entries) in &self.submenus {
            if *band == Band::Main {
                return Err(Error::Menu("main band used as submenu"));
            }
            if entries.is_empty() {
                return Err(Error::Menu("submenu ring is empty"));
            }
            if entries.len() > u8::MAX as usize {
                return Err(Error::Menu("submenu ring too long"));
            }
            if rings.iter().any(|r| r.band == *band) {
                return Err(Error::Menu("submenu band defined twice"));
            }
            if entries.iter().any(|e| matches!(e.kind, NodeKind::Submenu(_))) {
                return Err(Error::Menu("submenus cannot nest"));
            }

            let mut owners = self
                .main
                .iter()
                .enumerate()
                .filter(|(_, e)| e.kind == NodeKind::Submenu(*band));
            let owner = match (owners.next(), owners.next()) {
                (Some((i, _)), None) => i as u8,
                (None, _) => return Err(Error::Menu("submenu has no owner")),
                (Some(_), Some(_)) => return Err(Error::Menu("submenu owned twice")),
            };

            rings.push(Ring {
                band: *band,
                wrap: Wrap::Clamped,
                owner: Some(owner),
                nodes: to_nodes(*band, entries),
            });
        }

        for entry in &self.main {
            match entry.kind {
                NodeKind::Submenu(band) if !rings.iter().any(|r| r.band == band) => {
                    return Err(Error::Menu("main item points at a missing submenu"));
                }
                NodeKind::Back | NodeKind::Snapshot(_) => {
                    return Err(Error::Menu("navigation-only item in main ring"));
                }
                _ => {}
            }
        }

        let default = rings[0].nodes[self.start].id;
        Ok(MenuGraph { rings, default })
    }
}

fn to_nodes(band: Band, entries: &[Entry]) -> Vec<MenuNode> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| MenuNode {
            id: MenuId {
                band,
                index: i as u8,
            },
            label: e.label,
            icon: e.icon,
            kind: e.kind,
        })
        .collect()
}

/// What a navigation event did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Moved { from: MenuId, to: MenuId },
    Unchanged,
    Dispatch(Command),
}

/// Owner of the current position.
pub struct Navigator {
    current: MenuId,
}

impl Navigator {
    pub fn new(graph: &MenuGraph) -> Self {
        Self {
            current: graph.default_item(),
        }
    }

    pub fn current(&self) -> MenuId {
        self.current
    }

    pub fn apply(&mut self, graph: &MenuGraph, event: NavEvent) -> Transition {
        let from = self.current;
        let to = match event {
            NavEvent::Left => graph.move_left(from),
            NavEvent::Right => graph.move_right(from),
            NavEvent::Enter => match graph.enter(from) {
                EnterOutcome::Navigate(to) => to,
                EnterOutcome::Dispatch(command) => {
                    info!("Menu: {:?} dispatches {:?}", from, command);
                    return Transition::Dispatch(command);
                }
                EnterOutcome::Stay => from,
            },
        };

        if to == from {
            return Transition::Unchanged;
        }
        info!("Menu: {:?} -> {:?}", from, to);
        self.current = to;
        Transition::Moved { from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn main_id(graph: &MenuGraph, i: usize) -> MenuId {
        graph.find(Band::Main, i).unwrap()
    }

    fn six_item_graph() -> MenuGraph {
        let mut builder = MenuGraph::builder();
        for label in ["A", "B", "C", "D", "E", "F"] {
            builder = builder.item(Entry::new(label, Icon::Info, NodeKind::Action(Command::Reboot)));
        }
        builder.start_at(0).build().unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════
    // Standard graph
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn standard_graph_shape() {
        let graph = MenuGraph::standard();
        assert_eq!(graph.len(Band::Main), 5);
        assert_eq!(graph.len(Band::SystemInfo), 2);
        assert_eq!(graph.len(Band::PrinterOptions), 4);
        let start = graph.node(graph.default_item()).unwrap();
        assert_eq!(start.kind, NodeKind::Submenu(Band::PrinterOptions));
    }

    #[test]
    fn owners_are_the_submenu_items() {
        let graph = MenuGraph::standard();
        assert_eq!(graph.owner_of(Band::SystemInfo), Some(main_id(&graph, 4)));
        assert_eq!(graph.owner_of(Band::PrinterOptions), Some(main_id(&graph, 3)));
        assert_eq!(graph.owner_of(Band::Main), None);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Ring movement
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn main_ring_wraps() {
        let graph = MenuGraph::standard();
        assert_eq!(graph.move_left(main_id(&graph, 0)), main_id(&graph, 4));
        assert_eq!(graph.move_right(main_id(&graph, 4)), main_id(&graph, 0));
    }

    #[test]
    fn two_item_submenu_is_asymmetric() {
        let graph = MenuGraph::standard();
        let first = graph.find(Band::SystemInfo, 0).unwrap();
        let second = graph.find(Band::SystemInfo, 1).unwrap();

        assert_eq!(graph.move_left(first), first);
        assert_eq!(graph.move_right(first), second);
        assert_eq!(graph.move_right(second), second);
        assert_eq!(graph.move_left(second), first);

        assert!(!graph.can_move_left(first));
        assert!(graph.can_move_right(first));
        assert!(graph.can_move_left(second));
        assert!(!graph.can_move_right(second));
    }

    #[test]
    fn four_item_submenu_clamps_at_both_ends() {
        let graph = MenuGraph::standard();
        let last = graph.find(Band::PrinterOptions, 3).unwrap();
        assert_eq!(graph.move_right(last), last);
        let mut id = graph.find(Band::PrinterOptions, 0).unwrap();
        for _ in 0..10 {
            id = graph.move_right(id);
        }
        assert_eq!(id, last);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Enter
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn enter_round_trip_through_system_info() {
        let graph = MenuGraph::standard();
        let owner = main_id(&graph, 4);
        let first = graph.find(Band::SystemInfo, 0).unwrap();
        let second = graph.find(Band::SystemInfo, 1).unwrap();

        assert_eq!(graph.enter(owner), EnterOutcome::Navigate(first));
        assert_eq!(graph.enter(first), EnterOutcome::Navigate(owner));
        assert_eq!(graph.enter(second), EnterOutcome::Navigate(owner));
    }

    #[test]
    fn enter_on_terminal_main_item_dispatches() {
        let graph = MenuGraph::standard();
        assert_eq!(
            graph.enter(main_id(&graph, 0)),
            EnterOutcome::Dispatch(Command::Reboot)
        );
        assert_eq!(
            graph.enter(main_id(&graph, 2)),
            EnterOutcome::Dispatch(Command::PowerOff)
        );
    }

    #[test]
    fn printer_options_actions_dispatch_and_back_returns() {
        let graph = MenuGraph::standard();
        let resume = graph.find(Band::PrinterOptions, 0).unwrap();
        let back = graph.find(Band::PrinterOptions, 3).unwrap();
        assert_eq!(graph.enter(resume), EnterOutcome::Dispatch(Command::ResumeQueue));
        assert_eq!(graph.enter(back), EnterOutcome::Navigate(main_id(&graph, 3)));
    }

    #[test]
    fn navigator_scenario_system_info() {
        let graph = MenuGraph::standard();
        let mut nav = Navigator::new(&graph);
        nav.apply(&graph, NavEvent::Right);
        assert_eq!(nav.current(), main_id(&graph, 4));

        nav.apply(&graph, NavEvent::Enter);
        assert_eq!(nav.current(), graph.find(Band::SystemInfo, 0).unwrap());
        nav.apply(&graph, NavEvent::Right);
        assert_eq!(nav.current(), graph.find(Band::SystemInfo, 1).unwrap());
        assert_eq!(nav.apply(&graph, NavEvent::Right), Transition::Unchanged);
        nav.apply(&graph, NavEvent::Enter);
        assert_eq!(nav.current(), main_id(&graph, 4));
    }

    #[test]
    fn navigator_dispatch_keeps_position() {
        let graph = MenuGraph::standard();
        let mut nav = Navigator::new(&graph);
        nav.apply(&graph, NavEvent::Left);
        nav.apply(&graph, NavEvent::Left);
        nav.apply(&graph, NavEvent::Left);
        assert_eq!(nav.current(), main_id(&graph, 0));
        assert_eq!(
            nav.apply(&graph, NavEvent::Enter),
            Transition::Dispatch(Command::Reboot)
        );
        assert_eq!(nav.current(), main_id(&graph, 0));
    }

    #[test]
    fn six_items_four_rights() {
        let graph = six_item_graph();
        let mut nav = Navigator::new(&graph);
        for _ in 0..4 {
            nav.apply(&graph, NavEvent::Right);
        }
        assert_eq!(nav.current().index(), 4);
        assert_eq!(nav.current().band(), Band::Main);
    }

    #[test]
    fn ids_from_another_graph_are_no_ops() {
        let standard = MenuGraph::standard();
        let small = six_item_graph();
        let foreign = standard.find(Band::PrinterOptions, 2).unwrap();
        assert_eq!(small.move_left(foreign), foreign);
        assert_eq!(small.move_right(foreign), foreign);
        assert_eq!(small.enter(foreign), EnterOutcome::Stay);
        assert!(!small.can_move_left(foreign));
    }

    // ════════════════════════════════════════════════════════════════════════
    // Builder validation
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn builder_rejects_broken_graphs() {
        let action = Entry::new("X", Icon::Info, NodeKind::Action(Command::Reboot));
        let owner = Entry::new("S", Icon::Info, NodeKind::Submenu(Band::SystemInfo));
        let back = Entry::new("B", Icon::Back, NodeKind::Back);

        assert!(MenuGraph::builder().build().is_err());
        assert!(MenuGraph::builder().item(action).start_at(1).build().is_err());
        assert!(MenuGraph::builder().item(owner).build().is_err());
        assert!(MenuGraph::builder().item(back).build().is_err());
        assert!(MenuGraph::builder()
            .item(action)
            .submenu(Band::SystemInfo, &[back])
            .build()
            .is_err());
        assert!(MenuGraph::builder()
            .item(owner)
            .item(owner)
            .submenu(Band::SystemInfo, &[back])
            .build()
            .is_err());
        assert!(MenuGraph::builder()
            .item(owner)
            .submenu(Band::SystemInfo, &[owner])
            .build()
            .is_err());
        assert!(MenuGraph::builder()
            .item(owner)
            .submenu(Band::SystemInfo, &[])
            .build()
            .is_err());
        assert!(MenuGraph::builder()
            .item(owner)
            .submenu(Band::SystemInfo, &[back])
            .build()
            .is_ok());
    }

    // ════════════════════════════════════════════════════════════════════════
    // Properties
    // ════════════════════════════════════════════════════════════════════════

    proptest! {
        #[test]
        fn main_moves_stay_in_main(start in 0usize..5, moves in proptest::collection::vec(any::<bool>(), 0..64)) {
            let graph = MenuGraph::standard();
            let mut id = main_id(&graph, start);
            for right in moves {
                id = if right { graph.move_right(id) } else { graph.move_left(id) };
                prop_assert_eq!(id.band(), Band::Main);
            }
        }

        #[test]
        fn n_rights_close_the_ring(len in 1usize..12, start in 0usize..12) {
            let mut builder = MenuGraph::builder();
            for _ in 0..len {
                builder = builder.item(Entry::new("x", Icon::Info, NodeKind::Action(Command::Reboot)));
            }
            let graph = builder.build().unwrap();
            let origin = main_id(&graph, start % len);
            let mut id = origin;
            for _ in 0..len {
                id = graph.move_right(id);
            }
            prop_assert_eq!(id, origin);
        }

        #[test]
        fn enter_enter_is_identity_on_owner(band_is_info in any::<bool>()) {
            let graph = MenuGraph::standard();
            let band = if band_is_info { Band::SystemInfo } else { Band::PrinterOptions };
            let owner = graph.owner_of(band).unwrap();
            let inside = match graph.enter(owner) {
                EnterOutcome::Navigate(id) => id,
                other => panic!("owner did not navigate: {:?}", other),
            };
            prop_assert_eq!(inside.band(), band);
            prop_assert_eq!(inside.index(), 0);
            if band == Band::SystemInfo {
                prop_assert_eq!(graph.enter(inside), EnterOutcome::Navigate(owner));
            }
        }

        #[test]
        fn submenu_moves_never_leave_band(moves in proptest::collection::vec(any::<bool>(), 0..32)) {
            let graph = MenuGraph::standard();
            for band in [Band::SystemInfo, Band::PrinterOptions] {
                let mut id = graph.find(band, 0).unwrap();
                for &right in &moves {
                    id = if right { graph.move_right(id) } else { graph.move_left(id) };
                    prop_assert_eq!(id.band(), band);
                }
            }
        }
    }
}
