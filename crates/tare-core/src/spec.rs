//! Common constructor arguments for instance building.

use crate::id::InstanceId;
use crate::state::{StateRecord, Tag};

/// The constructor arguments shared by every construction strategy.
///
/// One spec can build any number of instances under any strategy — the
/// factory copies `values` and `name` into each instance, so the spec's
/// buffers are never aliased by the result. This is what makes
/// cross-strategy comparison fair: the three strategies receive
/// byte-identical starting material.
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceSpec {
    /// Instance identifier, immutable once built.
    pub id: InstanceId,
    /// Initial display name.
    pub name: String,
    /// Initial value sequence; its length is fixed for the built instance.
    pub values: Vec<f64>,
    /// Initial linear-transform offset.
    pub bias: f64,
    /// Initial linear-transform gain.
    pub scale: f64,
    /// Categorical label.
    pub tag: Tag,
}

impl InstanceSpec {
    /// Materialize a state record from this spec, copying the buffers
    /// and stamping the given construction timestamp.
    pub fn to_record(&self, created_at: i64) -> StateRecord {
        StateRecord {
            id: self.id,
            name: self.name.clone(),
            values: self.values.clone(),
            bias: self.bias,
            scale: self.scale,
            created_at,
            tag: self.tag,
        }
    }
}
