//! The uniform instance contract shared by every construction strategy.

use crate::layout::InstanceLayout;
use crate::InstanceId;

/// A polymorphic wrapper over exactly one state record.
///
/// Every construction strategy produces a `Box<dyn Instance>` exposing
/// this surface, and the contract is strict: for any operation sequence,
/// all strategies yield byte-identical results (checksums, summaries,
/// mutated state) given identical constructor arguments. The numeric
/// semantics live in `tare-kernel`; implementations differ only in how
/// the behavior is attached to the state.
///
/// Ownership of the state record is exclusive to the instance. An
/// instance lives until its population is dropped and is never shared
/// between populations.
pub trait Instance {
    /// The immutable instance identifier.
    fn id(&self) -> InstanceId;

    /// The current display name.
    fn name(&self) -> String;

    /// Replace the display name.
    ///
    /// Renaming never affects kernel math except through the name's
    /// length, which feeds the checksum.
    fn set_name(&mut self, name: &str);

    /// Deterministic 32-bit checksum of the current state.
    ///
    /// Pure: two calls with no intervening mutation return the same
    /// value.
    fn checksum(&self) -> i32;

    /// Normalize `values` in place and blend `bias`/`scale` toward the
    /// observed statistics.
    fn normalize(&mut self);

    /// Causal moving average of `values` over `window` elements, mapped
    /// through the record's linear transform. Does not mutate state.
    fn rolling_average(&self, window: usize) -> Vec<f64>;

    /// Multi-line formatted summary of the current state. Re-derives the
    /// checksum internally; does not mutate state.
    fn format_summary(&self) -> String;

    /// Deterministically perturb `values`, `bias`, and `scale` from a
    /// 32-bit seed.
    fn scramble(&mut self, seed: u32);

    /// Run the relaxation simulation for `iterations` rounds (clamped to
    /// at least one) and return the final roughness energy.
    fn simulate(&mut self, iterations: u32) -> f64;

    /// Describe this instance's memory layout for snapshot capture and
    /// footprint reporting.
    fn layout(&self) -> InstanceLayout;
}
