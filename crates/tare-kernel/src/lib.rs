//! Deterministic numeric state kernel.
//!
//! Every operation here is a function of a [`StateRecord`] and its
//! explicit arguments — nothing else. The kernel is what makes the three
//! construction strategies comparable: they all route through these
//! functions, so any observable divergence between strategies is a bug
//! in the strategy, never in the math.
//!
//! All operations are defined for any finite-length value sequence,
//! including empty, and none returns `Result`: callers guarantee finite
//! inputs, and the kernel does not validate NaN or infinity.
//!
//! [`StateRecord`]: tare_core::StateRecord

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod checksum;
mod ops;
mod rng;
mod summary;

pub use checksum::checksum;
pub use ops::{normalize_in_place, rolling_average, scramble, simulate, EPSILON};
pub use rng::{Xorshift32, SEED_FALLBACK};
pub use summary::format_summary;
