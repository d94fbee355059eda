//! # Component arena with generation-checked slots.
//!
//! [`Components`] owns every live component and hands out [`Handle`]s to
//! them. Liveness is a table lookup: a handle resolves only while its slot
//! is occupied *and* the slot generation still matches the one the handle
//! was issued under.
//!
//! ## Rules
//! - `remove` bumps the slot generation before the slot is reused, so stale
//!   handles can never alias a later occupant (no ABA).
//! - Freed slots are recycled from a free list; the arena never shrinks.
//! - The arena owns its components; dropping it drops them all.

use super::component::Component;
use super::handle::Handle;

/// One storage cell. `occupant` is `None` while the slot sits on the free list.
struct Slot {
    generation: u32,
    occupant: Option<Box<dyn Component>>,
}

/// Owning table of live components.
///
/// ### Responsibilities
/// - Stores components and issues generation-checked handles.
/// - Answers liveness queries for the dispatch loop.
#[derive(Default)]
pub struct Components {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl Components {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a component and returns its handle.
    pub fn insert(&mut self, component: Box<dyn Component>) -> Handle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.occupant = Some(component);
            return Handle {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            occupant: Some(component),
        });
        Handle {
            index,
            generation: 0,
        }
    }

    /// Removes the component behind `handle`, returning it if it was alive.
    ///
    /// The slot generation is bumped immediately, so every outstanding
    /// handle to this component goes stale at this point.
    pub fn remove(&mut self, handle: Handle) -> Option<Box<dyn Component>> {
        let slot = self.slot_mut(handle)?;
        let component = slot.occupant.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        Some(component)
    }

    /// Returns the live component behind `handle`, if any.
    pub fn get(&self, handle: Handle) -> Option<&dyn Component> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.occupant.as_deref())
    }

    /// Returns the live component behind `handle` mutably, if any.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut dyn Component> {
        self.slot_mut(handle)?.occupant.as_deref_mut()
    }

    /// Returns true iff `handle` resolves to a live component.
    #[inline]
    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    /// Number of live components.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no components are alive.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn slot_mut(&mut self, handle: Handle) -> Option<&mut Slot> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ListenerSpec;

    struct Dummy(u8);

    impl Component for Dummy {
        fn listeners(&self) -> &'static [ListenerSpec] {
            &[]
        }
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    }

    fn dummy(tag: u8) -> Box<dyn Component> {
        Box::new(Dummy(tag))
    }

    #[test]
    fn test_insert_then_get_resolves() {
        let mut arena = Components::new();
        let h = arena.insert(dummy(7));
        assert!(arena.contains(h));
        assert_eq!(arena.len(), 1);
        let d = arena.get(h).unwrap().as_any().downcast_ref::<Dummy>();
        assert_eq!(d.unwrap().0, 7);
    }

    #[test]
    fn test_remove_makes_handle_stale() {
        let mut arena = Components::new();
        let h = arena.insert(dummy(1));
        assert!(arena.remove(h).is_some());
        assert!(!arena.contains(h));
        assert!(arena.get(h).is_none());
        assert!(arena.remove(h).is_none(), "second remove must be a no-op");
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn test_recycled_slot_gets_new_generation() {
        let mut arena = Components::new();
        let first = arena.insert(dummy(1));
        arena.remove(first);
        let second = arena.insert(dummy(2));
        assert_eq!(first.index(), second.index(), "slot should be recycled");
        assert_ne!(first.generation(), second.generation());
        assert!(!arena.contains(first), "stale handle must not see new occupant");
        assert!(arena.contains(second));
    }

    #[test]
    fn test_len_tracks_inserts_and_removes() {
        let mut arena = Components::new();
        let a = arena.insert(dummy(1));
        let b = arena.insert(dummy(2));
        assert_eq!(arena.len(), 2);
        arena.remove(a);
        assert_eq!(arena.len(), 1);
        arena.remove(b);
        assert!(arena.is_empty());
    }
}
