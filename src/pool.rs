//! Sparse id → slot arena with per-frame reclamation.
//!
//! Nodes, pins and links are all stored in an [`ObjectPool`]. The host picks
//! stable integer ids; the pool maps them to slots, and ids that are not
//! resubmitted during a frame are reclaimed at the next [`ObjectPool::update`].
//!
//! Slot indices are only meaningful within one frame. Re-resolve ids through
//! [`ObjectPool::find`] every frame instead of caching indices.

use std::collections::HashMap;

/// Objects stored in an [`ObjectPool`] are created from, and report, their id.
pub trait PoolItem {
    fn from_id(id: i32) -> Self;
    fn id(&self) -> i32;
}

#[derive(Debug)]
struct Slot<T> {
    item: Option<T>,
    in_use: bool,
    generation: u32,
}

/// Handle that remembers which reuse of a slot it was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotHandle {
    pub index: usize,
    pub generation: u32,
}

#[derive(Debug)]
pub struct ObjectPool<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<usize>,
    id_map: HashMap<i32, usize>,
}

impl<T> Default for ObjectPool<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            id_map: HashMap::new(),
        }
    }
}

impl<T: PoolItem> ObjectPool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the slot for `id`, creating the object if the id is unseen.
    ///
    /// The slot is marked in use. Calling this twice for the same id without an
    /// intervening [`update`](Self::update) returns the same index.
    pub fn find_or_create(&mut self, id: i32) -> usize {
        if let Some(&index) = self.id_map.get(&id) {
            self.slots[index].in_use = true;
            return index;
        }

        let index = match self.free_list.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.item = Some(T::from_id(id));
                slot.in_use = true;
                index
            }
            None => {
                self.slots.push(Slot {
                    item: Some(T::from_id(id)),
                    in_use: true,
                    generation: 0,
                });
                self.slots.len() - 1
            }
        };
        self.id_map.insert(id, index);
        index
    }

    /// [`find_or_create`](Self::find_or_create) returning the object as well.
    pub fn find_or_create_mut(&mut self, id: i32) -> (usize, &mut T) {
        let index = self.find_or_create(id);
        let item = self.slots[index].item.get_or_insert_with(|| T::from_id(id));
        (index, item)
    }

    /// Reclaim every live slot that was not marked in use since the last
    /// [`reset_in_use`](Self::reset_in_use). Returns the ids that were dropped.
    pub fn update(&mut self) -> Vec<i32> {
        let mut reclaimed = Vec::new();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.in_use {
                continue;
            }
            if let Some(item) = slot.item.take() {
                let id = item.id();
                self.id_map.remove(&id);
                self.free_list.push(index);
                slot.generation = slot.generation.wrapping_add(1);
                reclaimed.push(id);
            }
        }
        if !reclaimed.is_empty() {
            log::trace!("pool reclaimed {} ids: {:?}", reclaimed.len(), reclaimed);
        }
        reclaimed
    }

    /// Clear the in-use marks so the coming submissions can re-mark what's live.
    pub fn reset_in_use(&mut self) {
        for slot in &mut self.slots {
            slot.in_use = false;
        }
    }

    /// Slot index for `id`, without creating or marking anything.
    pub fn find(&self, id: i32) -> Option<usize> {
        self.id_map.get(&id).copied()
    }

    pub fn contains(&self, id: i32) -> bool {
        self.id_map.contains_key(&id)
    }

    pub fn is_in_use(&self, index: usize) -> bool {
        self.slots.get(index).map_or(false, |s| s.in_use && s.item.is_some())
    }

    pub fn handle(&self, index: usize) -> Option<SlotHandle> {
        let slot = self.slots.get(index)?;
        slot.item.as_ref()?;
        Some(SlotHandle {
            index,
            generation: slot.generation,
        })
    }

    /// Resolve a handle, failing if the slot was reclaimed since.
    pub fn resolve(&self, handle: SlotHandle) -> Option<&T> {
        let slot = self.slots.get(handle.index)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.item.as_ref()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)?.item.as_ref()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)?.item.as_mut()
    }

    pub fn get_by_id(&self, id: i32) -> Option<&T> {
        self.get(self.find(id)?)
    }

    pub fn get_by_id_mut(&mut self, id: i32) -> Option<&mut T> {
        let index = self.find(id)?;
        self.get_mut(index)
    }

    /// Number of slots ever allocated (the high-water mark of live ids).
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of ids currently mapped to a slot.
    pub fn len(&self) -> usize {
        self.id_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_map.is_empty()
    }

    /// Iterate `(index, object)` for every slot marked in use this frame.
    pub fn iter_in_use(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            if slot.in_use {
                slot.item.as_ref().map(|item| (index, item))
            } else {
                None
            }
        })
    }

    pub fn iter_in_use_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            if slot.in_use {
                slot.item.as_mut().map(|item| (index, item))
            } else {
                None
            }
        })
    }
}
