use std::{collections::VecDeque, mem};

use num::{traits::WrappingAdd, NumCast, PrimInt, Unsigned};

use bitvec::prelude::*;

/// Generational handle into a [`HandlePool`]. A handle outlives the slot it points to only as a
/// stale value: once the slot is freed its serial is bumped and the handle stops resolving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Handle<IndexT = u32, SerialT = u32>
where
    IndexT: PrimInt + Unsigned,
    SerialT: Unsigned + Copy,
{
    pub(self) index: IndexT,
    pub(self) serial: SerialT,
}

impl<IndexT, SerialT> Handle<IndexT, SerialT>
where
    IndexT: PrimInt + Unsigned,
    SerialT: Unsigned + Copy,
{
    pub fn index(&self) -> IndexT {
        self.index
    }

    pub fn serial(&self) -> SerialT {
        self.serial
    }

    #[inline]
    fn index_usize(&self) -> Option<usize> {
        self.index.to_usize()
    }
}

/// Slot storage addressed by generational handles. Freed slots are recycled in FIFO order.
#[derive(Debug, Clone, Default)]
pub struct HandlePool<T, IndexT = u32, SerialT = u32>
where
    T: Default,
    IndexT: PrimInt + Unsigned,
    SerialT: Unsigned + Copy + Default + WrappingAdd,
{
    data: Vec<T>,
    serials: Vec<SerialT>,
    free_list: VecDeque<IndexT>,
    is_active: BitVec,
    active_count: usize,
}

impl<T, IndexT, SerialT> HandlePool<T, IndexT, SerialT>
where
    T: Default,
    IndexT: PrimInt + Unsigned,
    SerialT: Unsigned + Copy + Default + WrappingAdd,
{
    /// Number of live objects
    #[inline]
    pub fn len(&self) -> usize {
        self.active_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slot index of a live handle
    #[inline]
    fn live_index(&self, handle: &Handle<IndexT, SerialT>) -> Option<usize> {
        let index = handle.index_usize()?;
        if index >= self.data.len() {
            return None;
        }

        if !self.is_active[index] {
            // Inactive object
            return None;
        }

        if self.serials[index] != handle.serial() {
            // Wrong serial, the handle points to a previous object
            return None;
        }

        Some(index)
    }

    /// Store a value and get its handle. Returns `None` once the index type cannot address a new
    /// slot.
    pub fn insert(&mut self, value: T) -> Option<Handle<IndexT, SerialT>> {
        if self.free_list.is_empty() {
            let next_index = <IndexT as NumCast>::from(self.data.len())?;
            self.data.push(Default::default());
            self.serials.push(Default::default());
            self.is_active.push(false);
            self.free_list.push_back(next_index);
        }

        let free_pos = self.free_list.pop_front()?;
        let free_pos_usize = free_pos.to_usize()?;

        self.data[free_pos_usize] = value;
        self.is_active.set(free_pos_usize, true);
        self.active_count += 1;

        Some(Handle {
            index: free_pos,
            serial: self.serials[free_pos_usize],
        })
    }

    /// Take the value out of its slot, invalidating every copy of the handle
    pub fn remove(&mut self, handle: &Handle<IndexT, SerialT>) -> Option<T> {
        let index = self.live_index(handle)?;

        self.serials[index] = self.serials[index].wrapping_add(&SerialT::one());
        self.is_active.set(index, false);
        self.active_count -= 1;
        self.free_list.push_back(handle.index());

        Some(mem::take(&mut self.data[index]))
    }

    pub fn get(&self, handle: &Handle<IndexT, SerialT>) -> Option<&T> {
        let index = self.live_index(handle)?;
        Some(&self.data[index])
    }

    pub fn get_mut(&mut self, handle: &Handle<IndexT, SerialT>) -> Option<&mut T> {
        let index = self.live_index(handle)?;
        Some(&mut self.data[index])
    }
}
