//! Core types and traits for the Tare footprint harness.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Tare workspace:
//! instance identifiers, the state record, the uniform [`Instance`]
//! contract, the strategy selector, and the per-instance layout
//! descriptor consumed by snapshot capture and footprint reporting.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod layout;
pub mod spec;
pub mod state;
pub mod strategy;
pub mod traits;

pub use id::InstanceId;
pub use layout::InstanceLayout;
pub use spec::InstanceSpec;
pub use state::{StateRecord, Tag};
pub use strategy::{ParseStrategyError, StrategyKind};
pub use traits::Instance;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall clock as unix seconds.
///
/// The only sanctioned clock read in the workspace: construction stamps
/// [`StateRecord::created_at`] once, and kernel math never touches the
/// clock again.
pub fn now_unix() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs() as i64,
        // Clock before the epoch: representable, just negative.
        Err(e) => -(e.duration().as_secs() as i64),
    }
}
