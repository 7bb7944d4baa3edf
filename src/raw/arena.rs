use alloc::vec::Vec;

use super::handle::Handle;

/// Slot storage addressed by [`Handle`].
///
/// Nodes and values of a tree live here instead of behind individual boxes, so
/// structural changes move handles around rather than re-borrowing owners.
/// Vacated slots are recycled through a free list.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Number of occupied slots.
    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    pub(crate) fn insert(&mut self, element: T) -> Handle {
        if let Some(handle) = self.free.pop() {
            self.slots[handle.index()] = Some(element);
            return handle;
        }
        assert!(
            self.slots.len() <= Handle::MAX,
            "`Arena::insert()` - arena is at maximum capacity ({})",
            Handle::MAX + 1
        );
        self.slots.push(Some(element));
        Handle::from_index(self.slots.len() - 1)
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        match &self.slots[handle.index()] {
            Some(element) => element,
            None => panic!("`Arena::get()` - stale handle {handle:?}"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        match &mut self.slots[handle.index()] {
            Some(element) => element,
            None => panic!("`Arena::get_mut()` - stale handle {handle:?}"),
        }
    }

    /// Moves the element out and releases its slot for reuse.
    pub(crate) fn remove(&mut self, handle: Handle) -> T {
        match self.slots[handle.index()].take() {
            Some(element) => {
                self.free.push(handle);
                element
            }
            None => panic!("`Arena::remove()` - stale handle {handle:?}"),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn removed_slots_are_reused() {
        let mut arena = Arena::new();
        let a = arena.insert('a');
        let b = arena.insert('b');
        assert_eq!(arena.remove(a), 'a');
        let c = arena.insert('c');
        assert_eq!(c, a);
        assert_eq!(*arena.get(b), 'b');
        assert_eq!(*arena.get(c), 'c');
        assert_eq!(arena.len(), 2);
    }

    #[test]
    #[should_panic(expected = "stale handle")]
    fn stale_handle_panics() {
        let mut arena = Arena::new();
        let a = arena.insert(1u8);
        arena.remove(a);
        let _ = arena.get(a);
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Insert(u32),
        Overwrite(usize, u32),
        Remove(usize),
        Clear,
    }

    fn operation() -> impl Strategy<Value = Operation> {
        prop_oneof![
            10 => any::<u32>().prop_map(Operation::Insert),
            4 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Operation::Overwrite(which, value)),
            5 => any::<usize>().prop_map(Operation::Remove),
            1 => Just(Operation::Clear),
        ]
    }

    proptest! {
        #[test]
        fn arena_tracks_live_elements(operations in prop::collection::vec(operation(), 0..256)) {
            let mut model: Vec<(Handle, u32)> = Vec::new();
            let mut arena: Arena<u32> = Arena::new();

            for operation in operations {
                match operation {
                    Operation::Insert(value) => model.push((arena.insert(value), value)),
                    Operation::Overwrite(which, value) if !model.is_empty() => {
                        let index = which % model.len();
                        *arena.get_mut(model[index].0) = value;
                        model[index].1 = value;
                    }
                    Operation::Remove(which) if !model.is_empty() => {
                        let (handle, value) = model.swap_remove(which % model.len());
                        prop_assert_eq!(arena.remove(handle), value);
                    }
                    Operation::Clear => {
                        arena.clear();
                        model.clear();
                    }
                    Operation::Overwrite(..) | Operation::Remove(_) => {}
                }

                prop_assert_eq!(arena.len(), model.len());
                for &(handle, value) in &model {
                    prop_assert_eq!(*arena.get(handle), value);
                }
            }
        }
    }
}
