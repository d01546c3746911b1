//! # Linear Heap Module
//!
//! A single byte budget from which every cluster's mesh buffer is allocated.
//!
//! ## Key Features
//!
//! * Budget accounting shared by all mesh buffers through an [`AllocatorHandle`]
//! * Allocations release their bytes automatically when dropped
//! * Usage analytics (live bytes, peak bytes, allocation counts) for tuning the budget
//!
//! ## Architecture
//!
//! The heap never hands out raw pointers. An allocation owns a zero-filled `Vec<u8>`
//! sized exactly to the request, plus a handle back to the heap so it can return its
//! budget on drop. Exhausting the budget, or the system allocator refusing the backing
//! storage, is reported as an [`AllocationError`] and leaves the heap unchanged.

use log::{trace, warn};

use crate::core::MtResource;
use crate::error::AllocationError;

/// Shared handle to the linear heap.
pub type AllocatorHandle = MtResource<LinearHeap>;

/// Opaque identity of a live allocation, handed to render backends as the vertex
/// source handle.
pub type AllocationId = u64;

/// Byte budget and usage analytics for linear (vertex) memory.
#[derive(Debug)]
pub struct LinearHeap {
    /// Total bytes that may be live at once
    capacity: u64,
    /// Bytes currently handed out
    allocated_memory: u64,
    /// Highest value `allocated_memory` has reached
    peak_memory: u64,
    /// Number of allocations not yet released
    live_allocations: u64,
    /// Number of allocations ever made
    total_allocations: u64,
    /// Identity handed to the next allocation
    next_id: AllocationId,
}

impl LinearHeap {
    /// Creates a heap with the given byte budget.
    pub fn new(capacity: u64) -> Self {
        Self {
            capacity,
            allocated_memory: 0,
            peak_memory: 0,
            live_allocations: 0,
            total_allocations: 0,
            next_id: 1,
        }
    }

    /// Convenience constructor for a shared handle.
    pub fn shared(capacity: u64) -> AllocatorHandle {
        MtResource::new(Self::new(capacity))
    }

    /// Total byte budget.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Bytes currently allocated.
    pub fn allocated_memory(&self) -> u64 {
        self.allocated_memory
    }

    /// Bytes still available.
    pub fn available_memory(&self) -> u64 {
        self.capacity - self.allocated_memory
    }

    /// Highest number of bytes live at once.
    pub fn peak_memory(&self) -> u64 {
        self.peak_memory
    }

    /// Allocations not yet released.
    pub fn live_allocations(&self) -> u64 {
        self.live_allocations
    }

    /// Allocations ever made.
    pub fn total_allocations(&self) -> u64 {
        self.total_allocations
    }

    fn reserve(&mut self, size: u64) -> Result<AllocationId, AllocationError> {
        if size > self.available_memory() {
            return Err(AllocationError::OutOfMemory {
                requested: size,
                available: self.available_memory(),
            });
        }

        self.allocated_memory += size;
        self.peak_memory = self.peak_memory.max(self.allocated_memory);
        self.live_allocations += 1;
        self.total_allocations += 1;

        let id = self.next_id;
        self.next_id += 1;
        Ok(id)
    }

    fn release(&mut self, size: u64) {
        self.allocated_memory = self.allocated_memory.saturating_sub(size);
        self.live_allocations = self.live_allocations.saturating_sub(1);
    }
}

impl MtResource<LinearHeap> {
    /// Allocates `size` zero-filled bytes from the heap.
    ///
    /// # Errors
    ///
    /// * [`AllocationError::OutOfMemory`] if the budget cannot cover `size`
    /// * [`AllocationError::Unaddressable`] if `size` does not fit in `usize`
    /// * [`AllocationError::SystemExhausted`] if the system allocator refuses the region
    pub fn alloc(&self, size: u64) -> Result<LinearAllocation, AllocationError> {
        let len = usize::try_from(size).map_err(|_| AllocationError::Unaddressable(size))?;

        let id = self.get_mut().reserve(size)?;

        let mut bytes = Vec::new();
        if bytes.try_reserve_exact(len).is_err() {
            self.get_mut().release(size);
            warn!("System allocator refused {size} bytes of linear memory");
            return Err(AllocationError::SystemExhausted(size));
        }
        bytes.resize(len, 0);

        trace!("Linear allocation {id}: {size} bytes");

        Ok(LinearAllocation {
            id,
            bytes,
            heap: self.clone(),
        })
    }
}

/// A region of linear memory. Its bytes are returned to the heap on drop.
#[derive(Debug)]
pub struct LinearAllocation {
    id: AllocationId,
    bytes: Vec<u8>,
    heap: AllocatorHandle,
}

impl LinearAllocation {
    /// Identity of this region.
    pub fn id(&self) -> AllocationId {
        self.id
    }

    /// Size of the region in bytes.
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Whether the region is zero-sized.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The whole region.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The whole region, mutably.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Returns the region to the heap.
    pub fn free(self) {
        drop(self);
    }
}

impl Drop for LinearAllocation {
    fn drop(&mut self) {
        trace!("Releasing linear allocation {}", self.id);
        self.heap.get_mut().release(self.bytes.len() as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_accounts_and_releases() {
        let heap = LinearHeap::shared(1024);

        let first = heap.alloc(100).unwrap();
        let second = heap.alloc(200).unwrap();
        assert_ne!(first.id(), second.id());
        assert_eq!(first.len(), 100);
        assert!(first.bytes().iter().all(|&b| b == 0));

        {
            let stats = heap.get();
            assert_eq!(stats.allocated_memory(), 300);
            assert_eq!(stats.available_memory(), 724);
            assert_eq!(stats.live_allocations(), 2);
        }

        first.free();
        drop(second);

        let stats = heap.get();
        assert_eq!(stats.allocated_memory(), 0);
        assert_eq!(stats.live_allocations(), 0);
        assert_eq!(stats.peak_memory(), 300);
        assert_eq!(stats.total_allocations(), 2);
    }

    #[test]
    fn exhausted_budget_is_reported() {
        let heap = LinearHeap::shared(64);
        let _held = heap.alloc(60).unwrap();

        let err = heap.alloc(8).unwrap_err();
        assert_eq!(
            err,
            AllocationError::OutOfMemory {
                requested: 8,
                available: 4
            }
        );
        assert_eq!(heap.get().live_allocations(), 1);
    }

    #[test]
    fn released_budget_can_be_reused() {
        let heap = LinearHeap::shared(64);
        heap.alloc(64).unwrap().free();
        assert!(heap.alloc(64).is_ok());
    }

    #[test]
    fn identities_are_numbered_per_heap() {
        let first_heap = LinearHeap::shared(64);
        let second_heap = LinearHeap::shared(64);

        let a = first_heap.alloc(8).unwrap();
        let b = first_heap.alloc(8).unwrap();
        let c = second_heap.alloc(8).unwrap();

        assert_eq!(a.id(), 1);
        assert_eq!(b.id(), 2);
        assert_eq!(c.id(), 1);
    }
}
