//! Per-instance-closure strategy.

use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

use tare_core::{Instance, InstanceId, InstanceLayout, InstanceSpec, StateRecord, StrategyKind};
use tare_kernel as kernel;

use crate::OP_COUNT;

type SharedState = Rc<RefCell<StateRecord>>;

/// Instance that rebuilds every operation as its own boxed closure.
///
/// The state record lives in an `Rc<RefCell<_>>` and each of the six
/// operations is a separately allocated closure capturing its own
/// handle to that cell — the Rust rendering of building a fresh method
/// set per object. Per-instance memory therefore scales with
/// instances × operations, which is exactly the cost this strategy
/// exists to measure. The model is single-threaded cooperative, so the
/// non-`Send` handles are intentional.
pub struct ClosureInstance {
    state: SharedState,
    checksum_op: Box<dyn Fn() -> i32>,
    normalize_op: Box<dyn FnMut()>,
    rolling_average_op: Box<dyn Fn(usize) -> Vec<f64>>,
    format_summary_op: Box<dyn Fn() -> String>,
    scramble_op: Box<dyn FnMut(u32)>,
    simulate_op: Box<dyn FnMut(u32) -> f64>,
}

impl ClosureInstance {
    /// Build from a spec, copying its buffers and stamping `created_at`.
    ///
    /// Each operation closure receives its own clone of the state
    /// handle at construction; nothing is shared between instances.
    pub fn from_spec(spec: &InstanceSpec, created_at: i64) -> Self {
        let state: SharedState = Rc::new(RefCell::new(spec.to_record(created_at)));

        let checksum_state = Rc::clone(&state);
        let normalize_state = Rc::clone(&state);
        let rolling_state = Rc::clone(&state);
        let summary_state = Rc::clone(&state);
        let scramble_state = Rc::clone(&state);
        let simulate_state = Rc::clone(&state);

        Self {
            state,
            checksum_op: Box::new(move || kernel::checksum(&checksum_state.borrow())),
            normalize_op: Box::new(move || {
                kernel::normalize_in_place(&mut normalize_state.borrow_mut())
            }),
            rolling_average_op: Box::new(move |window| {
                kernel::rolling_average(&rolling_state.borrow(), window)
            }),
            format_summary_op: Box::new(move || kernel::format_summary(&summary_state.borrow())),
            scramble_op: Box::new(move |seed| {
                kernel::scramble(&mut scramble_state.borrow_mut(), seed)
            }),
            simulate_op: Box::new(move |iterations| {
                kernel::simulate(&mut simulate_state.borrow_mut(), iterations)
            }),
        }
    }

    /// Bytes of per-instance dispatch machinery for this strategy.
    ///
    /// Six boxed closures (fat pointer in the struct plus the captured
    /// handle on the heap) and the shared cell's bookkeeping beyond the
    /// record itself (reference counts and the borrow flag).
    fn dispatch_bytes() -> usize {
        let per_op = mem::size_of::<Box<dyn Fn() -> i32>>() + mem::size_of::<SharedState>();
        let cell_overhead = mem::size_of::<RefCell<StateRecord>>() - mem::size_of::<StateRecord>()
            + 2 * mem::size_of::<usize>();
        OP_COUNT * per_op + cell_overhead
    }
}

impl Instance for ClosureInstance {
    fn id(&self) -> InstanceId {
        self.state.borrow().id
    }

    fn name(&self) -> String {
        self.state.borrow().name.clone()
    }

    fn set_name(&mut self, name: &str) {
        self.state.borrow_mut().name = name.to_string();
    }

    fn checksum(&self) -> i32 {
        (self.checksum_op)()
    }

    fn normalize(&mut self) {
        (self.normalize_op)()
    }

    fn rolling_average(&self, window: usize) -> Vec<f64> {
        (self.rolling_average_op)(window)
    }

    fn format_summary(&self) -> String {
        (self.format_summary_op)()
    }

    fn scramble(&mut self, seed: u32) {
        (self.scramble_op)(seed)
    }

    fn simulate(&mut self, iterations: u32) -> f64 {
        (self.simulate_op)(iterations)
    }

    fn layout(&self) -> InstanceLayout {
        let state = self.state.borrow();
        InstanceLayout {
            strategy: StrategyKind::Closure,
            id: state.id,
            name: state.name.clone(),
            tag: state.tag,
            created_at: state.created_at,
            value_count: state.values.len(),
            state_bytes: mem::size_of::<StateRecord>(),
            buffer_bytes: state.values.len() * mem::size_of::<f64>(),
            name_bytes: state.name.len(),
            dispatch_bytes: Self::dispatch_bytes(),
        }
    }
}
