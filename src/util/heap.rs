//! The heap buffer owned by a collector.
//!
//! L2 heaps are sized once at construction and never grow, so the backing
//! store is a plain boxed word slice rather than a mapped region.  The
//! buffer keeps its location for the lifetime of the collector, which is
//! what makes handing out raw payload addresses to the mutator sound.

use crate::util::address::WordSize;
use crate::util::Address;

pub struct HeapSpace {
    words: Box<[usize]>,
}

impl HeapSpace {
    /// Reserve a heap of `words` machine words, zero initialized.
    pub fn new(words: WordSize) -> Self {
        assert!(words > 0, "heap size must be positive, got {} words", words);
        let space = HeapSpace {
            words: vec![0usize; words].into_boxed_slice(),
        };
        debug!(
            "reserved {} word heap at [{}, {})",
            words,
            space.start(),
            space.limit()
        );
        space
    }

    /// The address of the first word of the heap.
    pub fn start(&self) -> Address {
        Address::from_ptr(self.words.as_ptr())
    }

    /// The address one word past the end of the heap.
    pub fn limit(&self) -> Address {
        self.start().plus_words(self.words.len())
    }

    /// Heap capacity in words.
    pub fn words(&self) -> WordSize {
        self.words.len()
    }

    /// Does `addr` fall inside the heap buffer?
    pub fn contains(&self, addr: Address) -> bool {
        addr >= self.start() && addr < self.limit()
    }
}

#[cfg(test)]
mod tests {
    use super::HeapSpace;

    #[test]
    fn bounds() {
        let heap = HeapSpace::new(16);
        assert_eq!(heap.words(), 16);
        assert_eq!(heap.limit().diff_in_words(heap.start()), 16);
        assert!(heap.contains(heap.start()));
        assert!(heap.contains(heap.limit().minus_words(1)));
        assert!(!heap.contains(heap.limit()));
    }

    #[test]
    #[should_panic]
    fn zero_sized_heap_rejected() {
        let _ = HeapSpace::new(0);
    }
}
