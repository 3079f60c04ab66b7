//! The header word of an L2 heap object.
//!
//! Every object carries one header word at payload − 1, written by the
//! compiled program.  The low bit doubles as a tag: a normal header keeps
//! it set, while evacuation overwrites the whole word with the new payload
//! address, whose low bit is clear because payload addresses are word
//! aligned.  The remaining descriptor bits are a 23-bit pointer bitvector
//! over the payload fields and an 8-bit field count.
//!
//! The bit-level encoding is compiler ABI and is confined to this module;
//! everything else works with the decoded [`Header`] view.

use crate::util::address::WordSize;
use crate::util::constants::{
    FIELD_COUNT_MASK, FIELD_COUNT_SHIFT, HEADER_TAG_MASK, PTR_BITVECTOR_BITS, PTR_BITVECTOR_MASK,
    PTR_BITVECTOR_SHIFT,
};
use crate::util::Address;

/// Decoded view of a header word.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Header {
    /// A normal object header as written by the mutator.
    Descriptor { field_count: usize, ptr_mask: u32 },
    /// The object was evacuated; the header now holds the new payload address.
    Forwarded(Address),
}

impl Header {
    /// Decode a raw header word.  Lossless on the descriptor/forwarded
    /// distinction; descriptor decoding reads the fixed 32-bit encoding.
    pub fn from_word(word: usize) -> Header {
        if word & HEADER_TAG_MASK == 0 {
            Header::Forwarded(unsafe { Address::from_usize(word) })
        } else {
            let encoded = word as u32;
            Header::Descriptor {
                field_count: ((encoded >> FIELD_COUNT_SHIFT) & FIELD_COUNT_MASK) as usize,
                ptr_mask: (encoded >> PTR_BITVECTOR_SHIFT) & PTR_BITVECTOR_MASK,
            }
        }
    }

    /// Encode a descriptor header word the way the compiler emits it.
    pub fn encode_descriptor(field_count: usize, ptr_mask: u32) -> usize {
        debug_assert!(field_count <= FIELD_COUNT_MASK as usize);
        debug_assert_eq!(ptr_mask & !PTR_BITVECTOR_MASK, 0);
        (field_count << FIELD_COUNT_SHIFT) | ((ptr_mask as usize) << PTR_BITVECTOR_SHIFT) | 1
    }
}

/// The address of the header word for a payload address.
pub fn header_address(payload: Address) -> Address {
    payload.minus_words(1)
}

/// Read and decode the header of the object at `payload`.
///
/// # Safety
/// `payload` must be a live payload address in a heap this runtime manages.
pub unsafe fn read_header(payload: Address) -> Header {
    Header::from_word(header_address(payload).load::<usize>())
}

/// Overwrite the header of the object at `old_payload` with a forwarding
/// pointer to `new_payload`.
///
/// # Safety
/// Both addresses must be payload addresses in heaps this runtime manages.
pub unsafe fn install_forwarding(old_payload: Address, new_payload: Address) {
    debug_assert!(
        new_payload.is_word_aligned(),
        "forwarding target {} would decode as a descriptor",
        new_payload
    );
    trace!("forward {} -> {}", old_payload, new_payload);
    header_address(old_payload).store(new_payload.as_usize());
}

/// The payload indices of the pointer fields described by a descriptor
/// header, in ascending order.  Fields at indices the bitvector cannot
/// describe are never pointers.
pub fn pointer_field_indices(
    field_count: usize,
    ptr_mask: u32,
) -> impl Iterator<Item = WordSize> {
    (0..field_count.min(PTR_BITVECTOR_BITS as usize)).filter(move |i| ptr_mask >> i & 1 == 1)
}
