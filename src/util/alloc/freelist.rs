//! An explicit free list over a word-addressed region.
//!
//! Blocks are `(start, size-in-words)` pairs.  Allocation is first fit in
//! list order with the leftover split pushed to the front; freed blocks
//! are likewise pushed to the front.  Freeing never merges eagerly:
//! abutting blocks are only merged by an explicit `coalesce` pass, which
//! the mark-sweep policy runs as a last resort before declaring the heap
//! externally fragmented.

use std::collections::{HashMap, VecDeque};

use crate::util::address::WordSize;
use crate::util::Address;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FreeBlock {
    pub start: Address,
    pub words: WordSize,
}

impl FreeBlock {
    /// The address one word past the end of the block.
    pub fn limit(&self) -> Address {
        self.start.plus_words(self.words)
    }
}

pub struct FreeList {
    blocks: VecDeque<FreeBlock>,
    free_words: WordSize,
}

impl FreeList {
    /// A free list holding one block that covers the whole region.
    pub fn new(start: Address, words: WordSize) -> Self {
        let mut blocks = VecDeque::new();
        blocks.push_back(FreeBlock { start, words });
        FreeList {
            blocks,
            free_words: words,
        }
    }

    /// Total free words across all blocks.
    pub fn free_words(&self) -> WordSize {
        self.free_words
    }

    /// First-fit search: the position of the first block of at least
    /// `words` words.
    pub fn find_fit(&self, words: WordSize) -> Option<usize> {
        self.blocks.iter().position(|block| block.words >= words)
    }

    /// Carve `words` words from the front of the block at `position`
    /// (previously returned by `find_fit`) and return their start address.
    /// A nonzero leftover goes to the front of the list.
    pub fn allocate(&mut self, position: usize, words: WordSize) -> Address {
        let block = self.blocks.remove(position).unwrap();
        debug_assert!(block.words >= words);

        let leftover = block.words - words;
        if leftover != 0 {
            self.blocks.push_front(FreeBlock {
                start: block.start.plus_words(words),
                words: leftover,
            });
        }
        self.free_words -= words;
        trace!(
            "allocated {} words at {}, {} leftover",
            words,
            block.start,
            leftover
        );
        block.start
    }

    /// Return a block to the front of the list.
    pub fn release(&mut self, start: Address, words: WordSize) {
        debug_assert!(words > 0);
        self.blocks.push_front(FreeBlock { start, words });
        self.free_words += words;
    }

    /// Merge abutting blocks.  For each block, any free block starting
    /// exactly at its limit is absorbed, repeatedly, so a chain of
    /// neighbours collapses into one block.  List order of the surviving
    /// blocks is preserved.
    pub fn coalesce(&mut self) {
        let before = self.blocks.len();
        let mut blocks: Vec<Option<FreeBlock>> = self.blocks.drain(..).map(Some).collect();
        let index: HashMap<Address, usize> = blocks
            .iter()
            .enumerate()
            .map(|(position, block)| (block.unwrap().start, position))
            .collect();

        for position in 0..blocks.len() {
            let Some(mut current) = blocks[position] else {
                continue;
            };
            while let Some(&neighbour) = index.get(&current.limit()) {
                match blocks[neighbour].take() {
                    Some(absorbed) => current.words += absorbed.words,
                    // Already absorbed into an earlier chain.
                    None => break,
                }
            }
            blocks[position] = Some(current);
        }

        self.blocks = blocks.into_iter().flatten().collect();
        trace!("coalesced {} free blocks into {}", before, self.blocks.len());
    }

    /// The blocks in list order.
    pub fn blocks(&self) -> impl Iterator<Item = &FreeBlock> {
        self.blocks.iter()
    }
}
