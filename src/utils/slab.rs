/// An index-stable slot map.
///
/// A `Slab` stores values in a growable array and returns indices that
/// remain valid until the value is removed. Freed indices are reused by
/// later insertions, which keeps tokens small and dense.
///
/// The reactor uses slab indices as poller tokens, so an index must never
/// be handed to the poller after its slot has been freed.
pub(crate) struct Slab<T> {
    /// Slot storage; `None` marks a free slot.
    items: Vec<Option<T>>,

    /// Stack of free indices available for reuse.
    free: Vec<usize>,
}

impl<T> Slab<T> {
    /// Creates a new `Slab` with the given initial capacity.
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    /// Inserts a value and returns its index.
    ///
    /// Reuses a freed slot when one is available, otherwise appends.
    pub(crate) fn insert(&mut self, item: T) -> usize {
        match self.free.pop() {
            Some(index) => {
                debug_assert!(self.items[index].is_none());
                self.items[index] = Some(item);
                index
            }
            None => {
                self.items.push(Some(item));
                self.items.len() - 1
            }
        }
    }

    /// Removes and returns the value stored at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds or the slot is already free.
    pub(crate) fn remove(&mut self, index: usize) -> T {
        let item = self.items[index].take().expect("slab slot is not in use");
        self.free.push(index);
        item
    }

    /// Returns a mutable reference to the value at `index`, if the slot
    /// is in use.
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index).and_then(|slot| slot.as_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::Slab;

    #[test]
    fn insert_remove_reuses_slots() {
        let mut slab = Slab::new(2);

        let a = slab.insert("a");
        let b = slab.insert("b");
        assert_ne!(a, b);

        assert_eq!(slab.remove(a), "a");

        let c = slab.insert("c");
        assert_eq!(c, a, "freed slot should be reused");

        assert_eq!(slab.get_mut(b).copied(), Some("b"));
        assert_eq!(slab.get_mut(c).copied(), Some("c"));
    }

    #[test]
    fn get_mut_on_free_slot_is_none() {
        let mut slab = Slab::new(1);

        let idx = slab.insert(1u8);
        slab.remove(idx);

        assert!(slab.get_mut(idx).is_none());
    }
}
