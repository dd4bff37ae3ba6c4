//! Padded item sequence: real items wrapped in a spacer at each end.
//!
//! The spacers give the strip enough leading and trailing room that the
//! first and last real items can scroll into the centred slot.  Consumers
//! that must not draw spacer geometry (the backdrop, the indicator) work
//! from [`PaddedSequence::real_items`] instead.

/// One entry of the padded sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<T> {
    /// Empty space of `spacer_width`; never interpolated.
    Spacer,
    /// A real item.
    Item(T),
}

impl<T> Slot<T> {
    #[cfg(test)]
    pub fn is_spacer(&self) -> bool {
        matches!(self, Slot::Spacer)
    }

    pub fn item(&self) -> Option<&T> {
        match self {
            Slot::Item(item) => Some(item),
            Slot::Spacer => None,
        }
    }
}

/// `[Spacer] ++ items ++ [Spacer]`, or nothing at all while no items exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedSequence<T> {
    slots: Vec<Slot<T>>,
}

impl<T> Default for PaddedSequence<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T: Clone> PaddedSequence<T> {
    /// Wrap `items` in leading and trailing spacers.
    ///
    /// An empty input produces an empty sequence (the "loading" state):
    /// there is nothing to centre, so no spacers are emitted either.
    pub fn build(items: &[T]) -> Self {
        if items.is_empty() {
            return Self::default();
        }
        let mut slots = Vec::with_capacity(items.len() + 2);
        slots.push(Slot::Spacer);
        slots.extend(items.iter().cloned().map(Slot::Item));
        slots.push(Slot::Spacer);
        Self { slots }
    }

    /// The real items in order, spacers removed.
    pub fn real_items_only(&self) -> Vec<T> {
        self.real_items().cloned().collect()
    }
}

impl<T> PaddedSequence<T> {
    /// Iterate the real items in order, spacers removed.
    pub fn real_items(&self) -> impl Iterator<Item = &T> + '_ {
        self.slots.iter().filter_map(Slot::item)
    }

    /// All slots, spacers included.
    pub fn slots(&self) -> &[Slot<T>] {
        &self.slots
    }

    /// Number of slots including spacers.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Number of real items.
    pub fn real_len(&self) -> usize {
        self.slots.len().saturating_sub(2)
    }

    /// `true` while no real items have been loaded.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, padded_index: usize) -> Option<&Slot<T>> {
        self.slots.get(padded_index)
    }

    /// Real-item index of a padded slot, or `None` for spacers / out of range.
    pub fn real_index(&self, padded_index: usize) -> Option<usize> {
        match self.slots.get(padded_index)? {
            Slot::Item(_) => Some(padded_index - 1),
            Slot::Spacer => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<&'static str> {
        vec!["a.png", "b.png", "c.png", "d.png"]
    }

    #[test]
    fn test_build_pads_both_ends() {
        let seq = PaddedSequence::build(&items());
        assert_eq!(seq.len(), 6);
        assert_eq!(seq.real_len(), 4);
        assert!(seq.slots()[0].is_spacer());
        assert!(seq.slots()[5].is_spacer());
        let middle: Vec<_> = seq.slots()[1..5].iter().filter_map(Slot::item).copied().collect();
        assert_eq!(middle, items());
    }

    #[test]
    fn test_single_item() {
        let seq = PaddedSequence::build(&["only"]);
        assert_eq!(
            seq.slots(),
            &[Slot::Spacer, Slot::Item("only"), Slot::Spacer]
        );
    }

    #[test]
    fn test_empty_input_is_loading_state() {
        let seq: PaddedSequence<&str> = PaddedSequence::build(&[]);
        assert!(seq.is_empty());
        assert_eq!(seq.len(), 0);
        assert_eq!(seq.real_len(), 0);
        assert_eq!(seq.real_items().count(), 0);
    }

    #[test]
    fn test_real_items_only_strips_spacers() {
        let seq = PaddedSequence::build(&items());
        assert_eq!(seq.real_items_only(), items());
    }

    #[test]
    fn test_rebuild_from_real_items_is_identical() {
        let seq = PaddedSequence::build(&items());
        let rebuilt = PaddedSequence::build(&seq.real_items_only());
        assert_eq!(rebuilt, seq);
        assert_eq!(PaddedSequence::build(&items()), seq);
    }

    #[test]
    fn test_duplicate_items_are_kept() {
        // Real data that happens to repeat is still data, never a spacer.
        let seq = PaddedSequence::build(&["x", "x"]);
        assert_eq!(seq.real_len(), 2);
        assert_eq!(seq.real_index(2), Some(1));
    }

    #[test]
    fn test_real_index_mapping() {
        let seq = PaddedSequence::build(&items());
        assert_eq!(seq.real_index(0), None);
        assert_eq!(seq.real_index(1), Some(0));
        assert_eq!(seq.real_index(4), Some(3));
        assert_eq!(seq.real_index(5), None);
        assert_eq!(seq.real_index(99), None);
        assert_eq!(seq.get(2), Some(&Slot::Item("b.png")));
    }
}
