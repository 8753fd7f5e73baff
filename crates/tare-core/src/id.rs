//! Strongly-typed instance identifier.

use std::fmt;

/// Identifies one logical instance within a population.
///
/// IDs are positive, assigned sequentially from 1 during population
/// generation, and immutable for the life of the instance. The raw
/// value doubles as the seed of the instance's initial value stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u32);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for InstanceId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
