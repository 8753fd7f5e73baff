//! Delegating thin-wrapper strategy.

use std::mem;

use tare_core::{Instance, InstanceId, InstanceLayout, InstanceSpec, StateRecord, StrategyKind};
use tare_kernel as kernel;

/// Per-instance table of forwarding pointers into the kernel.
///
/// Every entry is a plain `fn` pointer to a stateless shared function;
/// the wrapper passes the instance's state record explicitly on each
/// call. The table is what each instance "owns" under this strategy —
/// small, flat, and identical in content across instances, but
/// duplicated per instance by construction.
#[derive(Clone, Copy)]
struct OpTable {
    checksum: fn(&StateRecord) -> i32,
    normalize: fn(&mut StateRecord),
    rolling_average: fn(&StateRecord, usize) -> Vec<f64>,
    format_summary: fn(&StateRecord) -> String,
    scramble: fn(&mut StateRecord, u32),
    simulate: fn(&mut StateRecord, u32) -> f64,
}

impl OpTable {
    fn kernel() -> Self {
        Self {
            checksum: kernel::checksum,
            normalize: kernel::normalize_in_place,
            rolling_average: kernel::rolling_average,
            format_summary: kernel::format_summary,
            scramble: kernel::scramble,
            simulate: kernel::simulate,
        }
    }
}

/// Instance holding its state record plus a thin forwarding table.
///
/// The heavy logic lives once in the kernel; the per-instance cost is
/// the table of six function pointers.
pub struct DelegateInstance {
    state: StateRecord,
    ops: OpTable,
}

impl DelegateInstance {
    /// Build from a spec, copying its buffers and stamping `created_at`.
    pub fn from_spec(spec: &InstanceSpec, created_at: i64) -> Self {
        Self {
            state: spec.to_record(created_at),
            ops: OpTable::kernel(),
        }
    }
}

impl Instance for DelegateInstance {
    fn id(&self) -> InstanceId {
        self.state.id
    }

    fn name(&self) -> String {
        self.state.name.clone()
    }

    fn set_name(&mut self, name: &str) {
        self.state.name = name.to_string();
    }

    fn checksum(&self) -> i32 {
        (self.ops.checksum)(&self.state)
    }

    fn normalize(&mut self) {
        (self.ops.normalize)(&mut self.state)
    }

    fn rolling_average(&self, window: usize) -> Vec<f64> {
        (self.ops.rolling_average)(&self.state, window)
    }

    fn format_summary(&self) -> String {
        (self.ops.format_summary)(&self.state)
    }

    fn scramble(&mut self, seed: u32) {
        (self.ops.scramble)(&mut self.state, seed)
    }

    fn simulate(&mut self, iterations: u32) -> f64 {
        (self.ops.simulate)(&mut self.state, iterations)
    }

    fn layout(&self) -> InstanceLayout {
        InstanceLayout {
            strategy: StrategyKind::Delegate,
            id: self.state.id,
            name: self.state.name.clone(),
            tag: self.state.tag,
            created_at: self.state.created_at,
            value_count: self.state.values.len(),
            state_bytes: mem::size_of::<StateRecord>(),
            buffer_bytes: self.state.values.len() * mem::size_of::<f64>(),
            name_bytes: self.state.name.len(),
            dispatch_bytes: mem::size_of::<OpTable>(),
        }
    }
}
