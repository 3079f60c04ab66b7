//! l2gc is the heap-management runtime for compiled L2 programs.  It
//! provides two alternative tracing collectors, each owning a fixed-size
//! word-addressed heap behind a single allocation entry point:
//!
//! * [`SemiSpace`] bisects its heap and bump-allocates in the active
//!   half; exhaustion triggers a Cheney evacuation of the live graph into
//!   the inactive half, after which the halves swap.
//! * [`MarkSweep`] manages its heap with a first-fit free list;
//!   exhaustion triggers transitive marking from the roots, a sweep of
//!   the dead objects back onto the free list, and coalescing of abutting
//!   free blocks as a last resort.
//!
//! Both collectors discover their roots by walking the chain of
//! activation frames the L2 compiler lays out, interpreting the info
//! words that flag which stack slots hold heap pointers (see
//! [`vm::frame`]).  The compiled program authors each object's header
//! word; its encoding is decoded in [`vm::object_model`].
//!
//! Collection is stop-the-world and runs synchronously inside
//! [`SemiSpace::alloc`]/[`MarkSweep::alloc`]; the host receives one
//! [`GcStatsReporter`] callback per collection cycle.

#[macro_use]
extern crate log;

pub mod policy;
pub mod util;
pub mod vm;

pub use crate::policy::marksweep::MarkSweep;
pub use crate::policy::semispace::SemiSpace;
pub use crate::util::alloc::AllocError;
pub use crate::util::stats::{GcStatsReporter, LogReporter};
pub use crate::util::Address;
