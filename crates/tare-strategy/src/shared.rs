//! Shared-dispatch strategy.

use std::mem;

use tare_core::{Instance, InstanceId, InstanceLayout, InstanceSpec, StateRecord, StrategyKind};
use tare_kernel as kernel;

/// Instance whose behavior is the type's single set of method bodies.
///
/// Every `SharedInstance` dispatches through the same compiled code;
/// the only per-instance memory is the state record itself. This is the
/// baseline the other two strategies are compared against.
pub struct SharedInstance {
    state: StateRecord,
}

impl SharedInstance {
    /// Build from a spec, copying its buffers and stamping `created_at`.
    pub fn from_spec(spec: &InstanceSpec, created_at: i64) -> Self {
        Self {
            state: spec.to_record(created_at),
        }
    }
}

impl Instance for SharedInstance {
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
        kernel::checksum(&self.state)
    }

    fn normalize(&mut self) {
        kernel::normalize_in_place(&mut self.state);
    }

    fn rolling_average(&self, window: usize) -> Vec<f64> {
        kernel::rolling_average(&self.state, window)
    }

    fn format_summary(&self) -> String {
        kernel::format_summary(&self.state)
    }

    fn scramble(&mut self, seed: u32) {
        kernel::scramble(&mut self.state, seed);
    }

    fn simulate(&mut self, iterations: u32) -> f64 {
        kernel::simulate(&mut self.state, iterations)
    }

    fn layout(&self) -> InstanceLayout {
        InstanceLayout {
            strategy: StrategyKind::Shared,
            id: self.state.id,
            name: self.state.name.clone(),
            tag: self.state.tag,
            created_at: self.state.created_at,
            value_count: self.state.values.len(),
            state_bytes: mem::size_of::<StateRecord>(),
            buffer_bytes: self.state.values.len() * mem::size_of::<f64>(),
            name_bytes: self.state.name.len(),
            // Shared dispatch attaches nothing per instance.
            dispatch_bytes: 0,
        }
    }
}
