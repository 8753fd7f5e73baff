//! Tare: a memory-footprint comparison harness for object-construction
//! strategies.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Tare sub-crates. For most users, adding `tare` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tare::prelude::*;
//!
//! // Generate a deterministic population under one strategy.
//! let population = Population::generate_at(StrategyKind::Delegate, 3, 1_700_000_000);
//! assert_eq!(population.len(), 3);
//!
//! // All strategies agree on the numeric contract.
//! let reference = Population::generate_at(StrategyKind::Shared, 3, 1_700_000_000);
//! for i in 0..3 {
//!     assert_eq!(
//!         population.get(i).unwrap().checksum(),
//!         reference.get(i).unwrap().checksum(),
//!     );
//! }
//!
//! // Capture the live object graph to an in-memory snapshot.
//! let graph = HeapGraph::from_population(&population);
//! let (stats, bytes) = capture_to_writer(graph, Vec::new()).unwrap();
//! assert_eq!(stats.bytes as usize, bytes.len());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tare-core` | IDs, state record, strategy selector, the `Instance` trait |
//! | [`kernel`] | `tare-kernel` | Deterministic numeric operations and the xorshift stream |
//! | [`strategy`] | `tare-strategy` | The three construction strategies and the factory |
//! | [`population`] | `tare-population` | Deterministic generation and retention |
//! | [`snapshot`] | `tare-snapshot` | Heap graph, profiler protocol, capture driver |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`tare-core`).
///
/// Contains [`types::StateRecord`], [`types::InstanceSpec`], the
/// [`types::Instance`] trait, and the [`types::StrategyKind`] selector.
pub use tare_core as types;

/// Deterministic numeric operations (`tare-kernel`).
///
/// The state-parameterized kernel every strategy routes through:
/// [`kernel::checksum`], [`kernel::normalize_in_place`],
/// [`kernel::rolling_average`], [`kernel::format_summary`],
/// [`kernel::scramble`], [`kernel::simulate`], and the
/// [`kernel::Xorshift32`] stream.
pub use tare_kernel as kernel;

/// Construction strategies (`tare-strategy`).
///
/// [`strategy::SharedInstance`], [`strategy::ClosureInstance`], and
/// [`strategy::DelegateInstance`], built via [`strategy::build`] or
/// [`strategy::build_at`].
pub use tare_strategy as strategy;

/// Population generation and retention (`tare-population`).
///
/// [`population::Population`] plus the deterministic
/// [`population::seed_spec`] derivation.
pub use tare_population as population;

/// Snapshot capture (`tare-snapshot`).
///
/// Build a [`snapshot::HeapGraph`] from a population and stream it with
/// [`snapshot::capture_to_file`] or [`snapshot::capture_to_writer`].
pub use tare_snapshot as snapshot;

/// Common imports for typical Tare usage.
///
/// ```rust
/// use tare::prelude::*;
/// ```
pub mod prelude {
    pub use tare_core::{
        Instance, InstanceId, InstanceLayout, InstanceSpec, StateRecord, StrategyKind, Tag,
    };

    pub use tare_kernel::Xorshift32;

    pub use tare_population::Population;

    pub use tare_snapshot::{
        capture_to_file, capture_to_writer, CaptureReport, HeapGraph, SnapshotError,
    };

    pub use tare_strategy::{build, build_at};
}
