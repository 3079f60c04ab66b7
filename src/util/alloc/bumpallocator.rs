use crate::util::address::WordSize;
use crate::util::Address;

/// Bump allocation over a contiguous word region.  The semispace policy
/// binds one of these to the active half of its heap and rebinds it to the
/// other half when evacuation begins.
pub struct BumpPointer {
    cursor: Address,
    limit: Address,
}

impl BumpPointer {
    pub fn new(cursor: Address, limit: Address) -> Self {
        debug_assert!(cursor <= limit);
        BumpPointer { cursor, limit }
    }

    /// Reserve `words` contiguous words, or fail without moving the cursor.
    pub fn alloc(&mut self, words: WordSize) -> Option<Address> {
        let result = self.cursor;
        let new_cursor = result.plus_words(words);
        if new_cursor > self.limit {
            trace!(
                "bump allocation of {} words failed: cursor {} limit {}",
                words,
                self.cursor,
                self.limit
            );
            None
        } else {
            self.cursor = new_cursor;
            Some(result)
        }
    }

    /// Point the allocator at a new region.
    pub fn rebind(&mut self, cursor: Address, limit: Address) {
        debug_assert!(cursor <= limit);
        self.cursor = cursor;
        self.limit = limit;
    }

    /// The next word to be handed out.
    pub fn cursor(&self) -> Address {
        self.cursor
    }

    /// Words left between the cursor and the limit.
    pub fn remaining_words(&self) -> WordSize {
        self.limit.diff_in_words(self.cursor)
    }
}
