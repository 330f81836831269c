/// How a ring behaves at its ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wrap {
    /// Last and first item are neighbours.
    Cyclic,
    /// Moving past either end is a no-op.
    Clamped,
}

/// Move selection cursor one item left.
pub fn select_prev(selected: usize, item_count: usize, wrap: Wrap) -> usize {
    if item_count == 0 {
        return 0;
    }
    match (selected, wrap) {
        (0, Wrap::Cyclic) => item_count - 1,
        (0, Wrap::Clamped) => 0,
        (i, _) => (i - 1).min(item_count - 1),
    }
}

/// Move selection cursor one item right.
pub fn select_next(selected: usize, item_count: usize, wrap: Wrap) -> usize {
    if item_count == 0 {
        return 0;
    }
    if selected + 1 < item_count {
        selected + 1
    } else {
        match wrap {
            Wrap::Cyclic => 0,
            Wrap::Clamped => item_count - 1,
        }
    }
}

/// Would `select_prev` change the selection?
pub fn can_select_prev(selected: usize, item_count: usize, wrap: Wrap) -> bool {
    select_prev(selected, item_count, wrap) != selected
}

/// Would `select_next` change the selection?
pub fn can_select_next(selected: usize, item_count: usize, wrap: Wrap) -> bool {
    select_next(selected, item_count, wrap) != selected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cyclic_wraps_both_ends() {
        assert_eq!(select_prev(0, 5, Wrap::Cyclic), 4);
        assert_eq!(select_next(4, 5, Wrap::Cyclic), 0);
        assert_eq!(select_prev(3, 5, Wrap::Cyclic), 2);
        assert_eq!(select_next(3, 5, Wrap::Cyclic), 4);
    }

    #[test]
    fn clamped_stops_at_ends() {
        assert_eq!(select_prev(0, 2, Wrap::Clamped), 0);
        assert_eq!(select_next(0, 2, Wrap::Clamped), 1);
        assert_eq!(select_next(1, 2, Wrap::Clamped), 1);
        assert_eq!(select_prev(1, 2, Wrap::Clamped), 0);
    }

    #[test]
    fn single_item_ring_never_moves() {
        for wrap in [Wrap::Cyclic, Wrap::Clamped] {
            assert_eq!(select_prev(0, 1, wrap), 0);
            assert_eq!(select_next(0, 1, wrap), 0);
            assert!(!can_select_prev(0, 1, wrap));
            assert!(!can_select_next(0, 1, wrap));
        }
    }

    #[test]
    fn empty_ring_is_total() {
        assert_eq!(select_prev(0, 0, Wrap::Cyclic), 0);
        assert_eq!(select_next(7, 0, Wrap::Clamped), 0);
    }

    #[test]
    fn boundary_queries_match_moves() {
        assert!(!can_select_prev(0, 4, Wrap::Clamped));
        assert!(can_select_next(0, 4, Wrap::Clamped));
        assert!(!can_select_next(3, 4, Wrap::Clamped));
        assert!(can_select_prev(0, 4, Wrap::Cyclic));
    }
}
