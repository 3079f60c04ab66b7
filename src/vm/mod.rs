//! The compiler ABI boundary.
//!
//! Everything the L2 compiler and the heap runtime must agree on lives
//! here: the activation-frame layout with its info words, and the object
//! header encoding.  The collectors consume these contracts; they never
//! re-derive them.

pub mod frame;
pub mod object_model;

pub use self::frame::{Frame, RootSet};
pub use self::object_model::Header;
