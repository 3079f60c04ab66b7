//! Fixtures that fabricate the mutator side of the compiler ABI: a stack
//! of activation frames in a plain word buffer, mutator-style header
//! words, and a stats reporter the tests can inspect.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use l2gc::vm::object_model::{self, Header};
use l2gc::vm::Frame;
use l2gc::{Address, GcStatsReporter};

const STACK_WORDS: usize = 256;
const BASE_INDEX: usize = 200;
const FRAME_STRIDE: usize = 16;

/// A synthetic L2 stack.  Frames are pushed downwards from the base frame
/// at a fixed stride, each laid out exactly as the compiler would emit it:
/// saved caller frame pointer at the frame pointer, info words below it,
/// argument slots above, local slots further below.
pub struct MockStack {
    words: Box<[usize]>,
    frames: Vec<usize>,
}

impl MockStack {
    pub fn new() -> Self {
        MockStack {
            words: vec![0usize; STACK_WORDS].into_boxed_slice(),
            frames: Vec::new(),
        }
    }

    fn fp_at(&self, index: usize) -> Address {
        Address::from_ref(&self.words[index])
    }

    /// The stack-walk terminator: the frame above the program's entry.
    pub fn base_fp(&self) -> Address {
        self.fp_at(BASE_INDEX)
    }

    /// Push a frame whose caller is the previously pushed frame (or the
    /// base frame).  Returns a handle for slot accessors.
    pub fn push_frame(&mut self, arg_info: usize, local_info: usize) -> usize {
        let caller_index = self.frames.last().copied().unwrap_or(BASE_INDEX);
        let index = caller_index - FRAME_STRIDE;
        self.words[index] = self.fp_at(caller_index).as_usize();
        self.words[index - 1] = arg_info;
        self.words[index - 2] = local_info;
        self.frames.push(index);
        self.frames.len() - 1
    }

    pub fn fp(&self, frame: usize) -> Address {
        self.fp_at(self.frames[frame])
    }

    /// The frame pointer the mutator would pass to `alloc`: the most
    /// recently pushed frame, or the base frame if none was pushed.
    pub fn innermost_fp(&self) -> Address {
        self.frames
            .last()
            .map(|&index| self.fp_at(index))
            .unwrap_or_else(|| self.base_fp())
    }

    pub fn arg_slot(&self, frame: usize, k: usize) -> Address {
        Frame::new(self.fp(frame)).arg_slot(k)
    }

    pub fn local_slot(&self, frame: usize, k: usize) -> Address {
        Frame::new(self.fp(frame)).local_slot(k)
    }

    pub fn set_arg(&mut self, frame: usize, k: usize, value: usize) {
        unsafe { self.arg_slot(frame, k).store(value) }
    }

    pub fn get_arg(&self, frame: usize, k: usize) -> usize {
        unsafe { self.arg_slot(frame, k).load::<usize>() }
    }

    pub fn set_local(&mut self, frame: usize, k: usize, value: usize) {
        unsafe { self.local_slot(frame, k).store(value) }
    }

    pub fn get_local(&self, frame: usize, k: usize) -> usize {
        unsafe { self.local_slot(frame, k).load::<usize>() }
    }
}

/// Write a descriptor header the way a compiled program would, at
/// payload − 1.
pub fn write_header(payload: Address, field_count: usize, ptr_mask: u32) {
    unsafe {
        object_model::header_address(payload).store(Header::encode_descriptor(field_count, ptr_mask))
    }
}

/// Read the raw header word of an object.
pub fn read_header_word(payload: Address) -> usize {
    unsafe { object_model::header_address(payload).load::<usize>() }
}

/// Write payload field `k` of an object.
pub fn write_field(payload: Address, k: usize, value: usize) {
    unsafe { payload.plus_words(k).store(value) }
}

/// Read payload field `k` of an object.
pub fn read_field(payload: Address, k: usize) -> usize {
    unsafe { payload.plus_words(k).load::<usize>() }
}

/// A stats reporter that records every callback for later inspection.
pub struct RecordingReporter(pub Rc<RefCell<Vec<(usize, usize)>>>);

impl GcStatsReporter for RecordingReporter {
    fn report_gc_stats(&mut self, live_objects: usize, live_words: usize) {
        self.0.borrow_mut().push((live_objects, live_words));
    }
}

/// A recording reporter plus the shared log it feeds.
pub fn recording_reporter() -> (Box<RecordingReporter>, Rc<RefCell<Vec<(usize, usize)>>>) {
    let reports = Rc::new(RefCell::new(Vec::new()));
    (Box::new(RecordingReporter(reports.clone())), reports)
}

/// Assert that the `[header, payload + words)` ranges of the given objects
/// are pairwise disjoint and lie inside `[start, limit)`.
pub fn assert_objects_disjoint(
    mut objects: Vec<(Address, usize)>,
    start: Address,
    limit: Address,
) {
    objects.sort_by_key(|&(payload, _)| payload);
    let mut prev_end: Option<Address> = None;
    for (payload, words) in objects {
        let block_start = payload.minus_words(1);
        let block_end = payload.plus_words(words);
        assert!(
            block_start >= start && block_end <= limit,
            "object at {} ({} words) escapes [{}, {})",
            payload,
            words,
            start,
            limit
        );
        if let Some(end) = prev_end {
            assert!(
                block_start >= end,
                "object at {} overlaps the previous object ending at {}",
                payload,
                end
            );
        }
        prev_end = Some(block_end);
    }
}
