use cfg_if::cfg_if;
use static_assertions::const_assert;

/// log2 of the number of bits in a byte
pub const LOG_BITS_IN_BYTE: u8 = 3;
/// The number of bits in a byte
pub const BITS_IN_BYTE: usize = 1 << LOG_BITS_IN_BYTE;

cfg_if! {
    if #[cfg(target_pointer_width = "64")] {
        /// log2 of the number of bytes in a machine word
        pub const LOG_BYTES_IN_WORD: u8 = 3;
    } else {
        /// log2 of the number of bytes in a machine word
        pub const LOG_BYTES_IN_WORD: u8 = 2;
    }
}
/// The number of bytes in a machine word
pub const BYTES_IN_WORD: usize = 1 << LOG_BYTES_IN_WORD;
/// log2 of the number of bits in a machine word
pub const LOG_BITS_IN_WORD: usize = LOG_BITS_IN_BYTE as usize + LOG_BYTES_IN_WORD as usize;
/// The number of bits in a machine word
pub const BITS_IN_WORD: usize = 1 << LOG_BITS_IN_WORD;

// The header word encoding is part of the L2 compiler ABI and is fixed at
// 32 bits regardless of the machine word width.  On a 64-bit target the
// descriptor occupies the low half of the header word.

/// The number of bits in an encoded header word
pub const BITS_IN_HEADER: u32 = 32;
/// Bit 0 of a header word: set for a descriptor, clear for a forwarding pointer
pub const HEADER_TAG_MASK: usize = 0b1;
/// Lowest bit of the pointer bitvector within the header word
pub const PTR_BITVECTOR_SHIFT: u32 = 1;
/// Width of the pointer bitvector: fields at indices beyond this are never pointers
pub const PTR_BITVECTOR_BITS: u32 = 23;
/// The pointer bitvector after it has been shifted down
pub const PTR_BITVECTOR_MASK: u32 = (1 << PTR_BITVECTOR_BITS) - 1;
/// Lowest bit of the field count within the header word
pub const FIELD_COUNT_SHIFT: u32 = PTR_BITVECTOR_SHIFT + PTR_BITVECTOR_BITS;
/// Width of the field count
pub const FIELD_COUNT_BITS: u32 = 8;
/// The field count after it has been shifted down
pub const FIELD_COUNT_MASK: u32 = (1 << FIELD_COUNT_BITS) - 1;

// The three header fields must tile the 32-bit encoding exactly.
const_assert!(PTR_BITVECTOR_SHIFT + PTR_BITVECTOR_BITS + FIELD_COUNT_BITS == BITS_IN_HEADER);
// A header word must be able to hold the full encoding.
const_assert!(BITS_IN_WORD >= BITS_IN_HEADER as usize);
