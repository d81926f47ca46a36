//! Indexed priority queue module.
//!
//! This module contains [`MinHeap`], a binary min-heap whose items remember their own position in
//! the backing array. That bookkeeping is what allows [`MinHeap::update_priority`] to re-order an
//! item in `O(log n)` without searching for it first.
//!
//! Items are stored in a slot arena and the heap array only holds slot ids. Callers address an
//! item through the [`Handle`] returned by [`MinHeap::push`]; every swap performed by the heap
//! rewrites the stored index of both items involved, so the index of an item always equals its
//! real position in the heap array once an operation returns.

use std::{error, fmt, mem};

/// Errors reported by [`MinHeap`] operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueError {
    /// The queue holds no item.
    Empty,
    /// The handle refers to an item that already left the queue.
    StaleHandle,
}

impl fmt::Display for QueueError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => formatter.write_str("priority queue is empty"),
            Self::StaleHandle => formatter.write_str("handle refers to an item no longer queued"),
        }
    }
}

impl error::Error for QueueError {}

/// Reference to an item living in a [`MinHeap`].
///
/// A handle stays valid until its item is popped or the queue is cleared. Slots are reused after
/// that, but each reuse bumps a generation counter, so an old handle never aliases a new item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle {
    /// Arena slot holding the item.
    slot: usize,
    /// Generation of the slot when the item was pushed.
    generation: u32,
}

/// Queued value together with its ordering key and heap position.
#[derive(Clone, Debug)]
struct Item<T, P> {
    /// Payload of the item.
    value: T,
    /// Ordering key; lower values are popped first.
    priority: P,
    /// Current position of the item in the heap array.
    index: usize,
}

/// Arena cell, either holding an item or waiting for reuse.
#[derive(Clone, Debug)]
struct Slot<T, P> {
    /// Bumped every time the slot is vacated.
    generation: u32,
    /// Occupant of the slot, if any.
    item: Option<Item<T, P>>,
}

/// Binary min-heap with in-place priority updates.
///
/// Items with the lowest priority come out first. Items with equal priorities come out in no
/// particular order.
#[derive(Clone, Debug)]
pub struct MinHeap<T, P> {
    /// Item storage addressed by [`Handle`].
    slots: Vec<Slot<T, P>>,
    /// Slot ids laid out as an implicit binary tree.
    heap: Vec<usize>,
    /// Slots free for reuse.
    vacant: Vec<usize>,
}

impl<T, P> Default for MinHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P> MinHeap<T, P> {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            heap: Vec::new(),
            vacant: Vec::new(),
        }
    }

    /// Creates an empty queue able to hold `capacity` items without reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            heap: Vec::with_capacity(capacity),
            vacant: Vec::new(),
        }
    }

    /// Number of queued items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the queue holds no item.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Whether the item behind `handle` is still queued.
    #[must_use]
    pub fn contains(&self, handle: Handle) -> bool {
        self.item(handle).is_some()
    }

    /// Value of the item behind `handle`, if it is still queued.
    #[must_use]
    pub fn value(&self, handle: Handle) -> Option<&T> {
        self.item(handle).map(|item| &item.value)
    }

    /// Drops every item. All outstanding handles become stale.
    pub fn clear(&mut self) {
        for slot_id in mem::take(&mut self.heap) {
            if let Some(slot) = self.slots.get_mut(slot_id) {
                slot.item = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.vacant.push(slot_id);
            }
        }
    }

    /// Looks up the live item behind `handle`.
    fn item(&self, handle: Handle) -> Option<&Item<T, P>> {
        self.slots
            .get(handle.slot)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.item.as_ref())
    }

    /// Looks up the live item behind `handle` for modification.
    fn item_mut(&mut self, handle: Handle) -> Option<&mut Item<T, P>> {
        self.slots
            .get_mut(handle.slot)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.item.as_mut())
    }

    /// Swaps two heap positions and records the new positions in both items.
    #[expect(
        clippy::indexing_slicing,
        reason = "Heap positions and slot ids are kept in range by every operation of the queue."
    )]
    fn swap(&mut self, first: usize, second: usize) {
        self.heap.swap(first, second);
        for index in [first, second] {
            if let Some(item) = self.slots[self.heap[index]].item.as_mut() {
                item.index = index;
            }
        }
    }
}

impl<T, P: Ord + Copy> MinHeap<T, P> {
    /// Inserts `value` with `priority` and returns a handle to it.
    pub fn push(&mut self, value: T, priority: P) -> Handle {
        let index = self.heap.len();
        let item = Some(Item {
            value,
            priority,
            index,
        });

        let slot_id = self.vacant.pop().unwrap_or_else(|| {
            self.slots.push(Slot {
                generation: 0,
                item: None,
            });
            self.slots.len() - 1
        });
        let generation = self.slots.get_mut(slot_id).map_or(0, |slot| {
            slot.item = item;
            slot.generation
        });

        self.heap.push(slot_id);
        let _moved = self.sift_up(index);

        Handle {
            slot: slot_id,
            generation,
        }
    }

    /// Removes and returns the value with the lowest priority, along with that priority.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Empty`] when the queue holds no item.
    pub fn pop_min(&mut self) -> Result<(T, P), QueueError> {
        let last = self.heap.len().checked_sub(1).ok_or(QueueError::Empty)?;
        self.swap(0, last);

        let slot_id = self.heap.pop().ok_or(QueueError::Empty)?;
        let slot = self.slots.get_mut(slot_id).ok_or(QueueError::Empty)?;
        let item = slot.item.take().ok_or(QueueError::Empty)?;
        slot.generation = slot.generation.wrapping_add(1);
        self.vacant.push(slot_id);

        if !self.heap.is_empty() {
            self.sift_down(0);
        }

        Ok((item.value, item.priority))
    }

    /// Returns the value with the lowest priority without removing it.
    #[must_use]
    pub fn peek_min(&self) -> Option<(&T, P)> {
        self.heap
            .first()
            .and_then(|&slot_id| self.slots.get(slot_id))
            .and_then(|slot| slot.item.as_ref())
            .map(|item| (&item.value, item.priority))
    }

    /// Priority of the item behind `handle`, if it is still queued.
    #[must_use]
    pub fn priority(&self, handle: Handle) -> Option<P> {
        self.item(handle).map(|item| item.priority)
    }

    /// Overwrites the value and priority of a queued item, then restores heap order.
    ///
    /// The item moves up when its priority decreased and down when it increased.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::StaleHandle`] when the item behind `handle` is no longer queued.
    pub fn update_priority(
        &mut self,
        handle: Handle,
        value: T,
        priority: P,
    ) -> Result<(), QueueError> {
        let item = self.item_mut(handle).ok_or(QueueError::StaleHandle)?;
        item.value = value;
        item.priority = priority;
        let index = item.index;

        if !self.sift_up(index) {
            self.sift_down(index);
        }

        Ok(())
    }

    /// Priority of the item at heap position `index`.
    #[expect(
        clippy::indexing_slicing,
        reason = "Heap positions and slot ids are kept in range by every operation of the queue."
    )]
    fn priority_at(&self, index: usize) -> P {
        match &self.slots[self.heap[index]].item {
            Some(item) => item.priority,
            None => unreachable!("heap position {index} points at a vacant slot"),
        }
    }

    /// Moves the item at `index` towards the root while it beats its parent.
    ///
    /// Returns whether the item moved.
    fn sift_up(&mut self, mut index: usize) -> bool {
        let start = index;
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.priority_at(index) >= self.priority_at(parent) {
                break;
            }
            self.swap(index, parent);
            index = parent;
        }

        index != start
    }

    /// Moves the item at `index` towards the leaves while a child beats it.
    fn sift_down(&mut self, mut index: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let smallest = if right < len && self.priority_at(right) < self.priority_at(left) {
                right
            } else {
                left
            };

            if self.priority_at(smallest) >= self.priority_at(index) {
                break;
            }
            self.swap(index, smallest);
            index = smallest;
        }
    }
}
