//! The mark-sweep collector.
//!
//! The whole heap is managed by an explicit free list.  Allocation is
//! first fit with block splitting.  When a request does not fit, the
//! reachable set is marked transitively from the stack-walked roots,
//! unmarked objects are swept back onto the free list, and, if the
//! request still does not fit, abutting free blocks are coalesced before
//! the final retry.
//!
//! Objects never move, so headers are never rewritten and stack slots are
//! never touched; the root set is only consulted to seed the mark phase.

use std::collections::{HashMap, HashSet};

use crate::util::address::WordSize;
use crate::util::alloc::{AllocError, FreeList};
use crate::util::heap::HeapSpace;
use crate::util::stats::{GcStats, GcStatsReporter, LogReporter};
use crate::util::{logger, Address};
use crate::vm::object_model::{self, Header};
use crate::vm::RootSet;

pub struct MarkSweep {
    base_frame_ptr: Address,
    heap: HeapSpace,
    free_list: FreeList,
    /// Payload address of every live allocation, with its size in payload
    /// words.
    objects: HashMap<Address, WordSize>,
    stats: GcStats,
}

impl MarkSweep {
    /// A mark-sweep collector over a fresh heap of `heap_size_in_words`
    /// words (positive, even).  `base_frame_ptr` is the frame-pointer
    /// value at which stack walking stops.
    pub fn new(base_frame_ptr: Address, heap_size_in_words: WordSize) -> Self {
        Self::with_reporter(base_frame_ptr, heap_size_in_words, Box::new(LogReporter))
    }

    /// Like [`MarkSweep::new`], reporting collection statistics to `reporter`.
    pub fn with_reporter(
        base_frame_ptr: Address,
        heap_size_in_words: WordSize,
        reporter: Box<dyn GcStatsReporter>,
    ) -> Self {
        assert!(
            heap_size_in_words > 0 && heap_size_in_words % 2 == 0,
            "heap size must be a positive even number of words, got {}",
            heap_size_in_words
        );
        logger::try_init();

        let heap = HeapSpace::new(heap_size_in_words);
        let free_list = FreeList::new(heap.start(), heap_size_in_words);

        MarkSweep {
            base_frame_ptr,
            heap,
            free_list,
            objects: HashMap::new(),
            stats: GcStats::new(reporter),
        }
    }

    /// Allocate `num_words + 1` words (header plus payload) and return the
    /// payload address.  `curr_frame_ptr` is the innermost frame pointer of
    /// the running program, used to walk the stack should a collection be
    /// needed.
    pub fn alloc(
        &mut self,
        num_words: WordSize,
        curr_frame_ptr: Address,
    ) -> Result<Address, AllocError> {
        let block_words = num_words + 1;

        if let Some(position) = self.free_list.find_fit(block_words) {
            return Ok(self.finish_alloc(position, num_words));
        }

        debug!(
            "no free block holds {} words, collecting",
            block_words
        );
        unsafe { self.collect(curr_frame_ptr) };

        if self.free_list.free_words() < block_words {
            return Err(AllocError::OutOfMemory);
        }
        if let Some(position) = self.free_list.find_fit(block_words) {
            return Ok(self.finish_alloc(position, num_words));
        }

        // Enough words exist but no single block holds them.
        self.free_list.coalesce();
        match self.free_list.find_fit(block_words) {
            Some(position) => Ok(self.finish_alloc(position, num_words)),
            // External fragmentation.
            None => Err(AllocError::OutOfMemory),
        }
    }

    fn finish_alloc(&mut self, position: usize, num_words: WordSize) -> Address {
        let start = self.free_list.allocate(position, num_words + 1);
        let payload = start.plus_words(1);
        self.objects.insert(payload, num_words);
        trace!("allocated {} payload words at {}", num_words, payload);
        payload
    }

    /// Mark the reachable set and sweep everything else onto the free list.
    ///
    /// # Safety
    /// `curr_frame_ptr` must chain to the base frame pointer, and every
    /// slot the info words flag must hold null or a live payload address.
    unsafe fn collect(&mut self, curr_frame_ptr: Address) {
        let roots = RootSet::walk(self.base_frame_ptr, curr_frame_ptr);
        let marked = self.mark(&roots);
        self.sweep(&marked);
        self.stats.flush();
    }

    /// The transitive closure of the root set: a worklist seeded with the
    /// root pointers, expanded through each object's pointer fields as
    /// described by its header bitvector.
    unsafe fn mark(&self, roots: &RootSet) -> HashSet<Address> {
        let mut marked = HashSet::new();
        let mut worklist = Vec::new();

        let visit = |ptr: Address, origin: Address, marked: &mut HashSet<Address>,
                     worklist: &mut Vec<Address>| {
            if ptr.is_zero() {
                return;
            }
            if !self.objects.contains_key(&ptr) {
                panic!(
                    "slot {} holds {} which is not a live heap object",
                    origin, ptr
                );
            }
            if marked.insert(ptr) {
                worklist.push(ptr);
            }
        };

        for slot in roots.iter() {
            let ptr = Address::from_usize(slot.load::<usize>());
            visit(ptr, slot, &mut marked, &mut worklist);
        }

        while let Some(payload) = worklist.pop() {
            match object_model::read_header(payload) {
                Header::Descriptor {
                    field_count,
                    ptr_mask,
                } => {
                    for field in object_model::pointer_field_indices(field_count, ptr_mask) {
                        let slot = payload.plus_words(field);
                        let ptr = Address::from_usize(slot.load::<usize>());
                        visit(ptr, slot, &mut marked, &mut worklist);
                    }
                }
                Header::Forwarded(_) => panic!(
                    "object {} carries a forwarding-tagged header under mark-sweep",
                    payload
                ),
            }
        }

        trace!("marked {} reachable objects", marked.len());
        marked
    }

    /// Drop every unmarked object from the object table and return its
    /// block, header word included, to the free list.
    fn sweep(&mut self, marked: &HashSet<Address>) {
        let free_list = &mut self.free_list;
        let stats = &mut self.stats;

        self.objects.retain(|&payload, &mut num_words| {
            if marked.contains(&payload) {
                stats.account_object(num_words + 1);
                true
            } else {
                trace!("sweeping {} ({} payload words)", payload, num_words);
                free_list.release(object_model::header_address(payload), num_words + 1);
                false
            }
        });
    }

    /// Words on the free list.
    pub fn free_words(&self) -> WordSize {
        self.free_list.free_words()
    }

    /// The number of objects currently in the object table.
    pub fn live_objects(&self) -> usize {
        self.objects.len()
    }

    /// The recorded payload size of the object at `payload`, if any.
    pub fn size_of(&self, payload: Address) -> Option<WordSize> {
        self.objects.get(&payload).copied()
    }

    /// Every table entry as `(payload, payload words)`.
    pub fn objects(&self) -> impl Iterator<Item = (Address, WordSize)> + '_ {
        self.objects.iter().map(|(&payload, &words)| (payload, words))
    }

    /// Every free block as `(start, words)`, in free-list order.
    pub fn free_blocks(&self) -> impl Iterator<Item = (Address, WordSize)> + '_ {
        self.free_list.blocks().map(|block| (block.start, block.words))
    }

    pub fn heap(&self) -> &HeapSpace {
        &self.heap
    }
}
