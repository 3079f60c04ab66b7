//! The semispace copying collector.
//!
//! The heap is bisected into two halves.  Allocation bumps a cursor
//! through the active half; when a request does not fit, the live graph
//! reachable from the stack-walked root set is evacuated into the other
//! half, every evacuated object leaves a forwarding pointer in its old
//! header, and the halves swap roles.
//!
//! Evacuation is a Cheney walk: roots are forwarded first, then a scan
//! cursor chases the bump cursor through the new half, forwarding the
//! pointer fields of each copied object until the two cursors meet.

use std::collections::HashMap;
use std::mem;

use crate::util::address::WordSize;
use crate::util::alloc::{AllocError, BumpPointer};
use crate::util::heap::HeapSpace;
use crate::util::stats::{GcStats, GcStatsReporter, LogReporter};
use crate::util::{logger, Address};
use crate::vm::object_model::{self, Header};
use crate::vm::RootSet;

pub struct SemiSpace {
    base_frame_ptr: Address,
    heap: HeapSpace,
    /// Start of the active half.
    from_space: Address,
    /// Start of the inactive half.
    to_space: Address,
    half_words: WordSize,
    bump: BumpPointer,
    /// Payload address of every allocated object, with its size in payload
    /// words.  Load-bearing during evacuation: once an object is forwarded
    /// its header no longer carries the descriptor.
    objects: HashMap<Address, WordSize>,
    stats: GcStats,
}

impl SemiSpace {
    /// A semispace collector over a fresh heap of `heap_size_in_words`
    /// words (positive, even).  `base_frame_ptr` is the frame-pointer
    /// value at which stack walking stops.
    pub fn new(base_frame_ptr: Address, heap_size_in_words: WordSize) -> Self {
        Self::with_reporter(base_frame_ptr, heap_size_in_words, Box::new(LogReporter))
    }

    /// Like [`SemiSpace::new`], reporting collection statistics to `reporter`.
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
        let half_words = heap_size_in_words / 2;
        let from_space = heap.start();
        let to_space = heap.start().plus_words(half_words);
        let bump = BumpPointer::new(from_space, to_space);

        SemiSpace {
            base_frame_ptr,
            heap,
            from_space,
            to_space,
            half_words,
            bump,
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
        if let Some(header) = self.bump.alloc(num_words + 1) {
            return Ok(self.finish_alloc(header, num_words));
        }

        debug!(
            "active half exhausted by a {} word request, collecting",
            num_words + 1
        );
        unsafe { self.collect(curr_frame_ptr) };

        match self.bump.alloc(num_words + 1) {
            Some(header) => Ok(self.finish_alloc(header, num_words)),
            None => Err(AllocError::OutOfMemory),
        }
    }

    fn finish_alloc(&mut self, header: Address, num_words: WordSize) -> Address {
        let payload = header.plus_words(1);
        self.objects.insert(payload, num_words);
        trace!("allocated {} payload words at {}", num_words, payload);
        payload
    }

    /// Evacuate the live graph into the inactive half and swap the halves.
    ///
    /// # Safety
    /// `curr_frame_ptr` must chain to the base frame pointer, and every
    /// slot the info words flag must hold null or a live payload address.
    unsafe fn collect(&mut self, curr_frame_ptr: Address) {
        let roots = RootSet::walk(self.base_frame_ptr, curr_frame_ptr);

        self.bump
            .rebind(self.to_space, self.to_space.plus_words(self.half_words));
        let mut evacuated: HashMap<Address, WordSize> =
            HashMap::with_capacity(self.objects.len());

        for slot in roots.iter() {
            self.forward_slot(slot, &mut evacuated);
        }

        // Cheney scan: every object between the scan cursor and the bump
        // cursor has been copied but not yet had its fields forwarded.
        let mut scan = self.to_space;
        while scan < self.bump.cursor() {
            let payload = scan.plus_words(1);
            let num_words = evacuated[&payload];
            if let Header::Descriptor {
                field_count,
                ptr_mask,
            } = object_model::read_header(payload)
            {
                for field in object_model::pointer_field_indices(field_count, ptr_mask) {
                    self.forward_slot(payload.plus_words(field), &mut evacuated);
                }
            }
            scan = scan.plus_words(num_words + 1);
        }

        self.objects = evacuated;
        mem::swap(&mut self.from_space, &mut self.to_space);
        self.stats.flush();
    }

    /// Forward the object a slot points at.  The slot is a stack slot or a
    /// pointer field of an already copied object; either way it is
    /// rewritten in place with the object's post-collection address.
    unsafe fn forward_slot(&mut self, slot: Address, evacuated: &mut HashMap<Address, WordSize>) {
        let ptr = Address::from_usize(slot.load::<usize>());
        if ptr.is_zero() {
            return;
        }

        let num_words = match self.objects.get(&ptr) {
            Some(&num_words) => num_words,
            None => panic!(
                "slot {} holds {} which is not a live heap object",
                slot, ptr
            ),
        };

        match object_model::read_header(ptr) {
            Header::Forwarded(new_payload) => slot.store(new_payload.as_usize()),
            Header::Descriptor { .. } => {
                let dst = self
                    .bump
                    .alloc(num_words + 1)
                    .expect("live data exceeded a semispace half");
                std::ptr::copy_nonoverlapping(
                    object_model::header_address(ptr).to_ptr::<usize>(),
                    dst.to_mut_ptr::<usize>(),
                    num_words + 1,
                );
                let new_payload = dst.plus_words(1);
                evacuated.insert(new_payload, num_words);
                self.stats.account_object(num_words + 1);
                slot.store(new_payload.as_usize());
                object_model::install_forwarding(ptr, new_payload);
            }
        }
    }

    /// Words still free in the active half.
    pub fn free_words(&self) -> WordSize {
        self.bump.remaining_words()
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

    pub fn heap(&self) -> &HeapSpace {
        &self.heap
    }
}
