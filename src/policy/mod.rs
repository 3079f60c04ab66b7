//! The collector policies.
//!
//! Each policy owns a heap and serves the whole allocation interface for
//! it.  A compiled program links against exactly one of them; they share
//! the stack-walking and object-model machinery but nothing else.

pub mod marksweep;
pub mod semispace;

pub use self::marksweep::MarkSweep;
pub use self::semispace::SemiSpace;
