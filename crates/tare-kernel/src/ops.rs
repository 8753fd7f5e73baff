//! Mutating and windowed kernel operations.

use tare_core::StateRecord;

use crate::rng::Xorshift32;

/// Divisor guard added to the standard deviation during normalization.
pub const EPSILON: f64 = 1e-6;

/// Normalize `values` in place and blend `bias`/`scale` toward the
/// observed statistics.
///
/// Mean uses 0.0 for an empty sequence; sample variance uses the `n-1`
/// denominator and is 0.0 when `n <= 1`; the standard deviation falls
/// back to 1.0 when the variance is non-positive, so constant sequences
/// never divide by zero. Each value becomes
/// `(v - mean) / (std + EPSILON)` clamped to `[-8, 8]`, then
/// `bias = 0.9*bias + 0.1*mean` and
/// `scale = 0.9*scale + 0.1*(1/(std + EPSILON))`.
pub fn normalize_in_place(state: &mut StateRecord) {
    let n = state.values.len();
    let mean = if n == 0 {
        0.0
    } else {
        state.values.iter().sum::<f64>() / n as f64
    };
    let variance = if n <= 1 {
        0.0
    } else {
        state
            .values
            .iter()
            .map(|&v| (v - mean) * (v - mean))
            .sum::<f64>()
            / (n as f64 - 1.0)
    };
    let std = if variance > 0.0 { variance.sqrt() } else { 1.0 };
    let denom = std + EPSILON;

    for v in &mut state.values {
        *v = ((*v - mean) / denom).clamp(-8.0, 8.0);
    }

    state.bias = 0.9 * state.bias + 0.1 * mean;
    state.scale = 0.9 * state.scale + 0.1 * (1.0 / denom);
}

/// Causal moving average over a clamped window, mapped through the
/// record's linear transform.
///
/// The window is clamped to `[1, max(1, n)]`. Output element `i`
/// averages the current element and up to `window - 1` predecessors
/// (fewer at the start), computed with a running sum, then maps through
/// `avg * scale + bias * 0.001`. Pure; same length as `values`.
pub fn rolling_average(state: &StateRecord, window: usize) -> Vec<f64> {
    let n = state.values.len();
    let mut out = Vec::with_capacity(n);
    if n == 0 {
        return out;
    }

    let w = window.clamp(1, n);
    let mut running = 0.0;
    for i in 0..n {
        running += state.values[i];
        if i >= w {
            running -= state.values[i - w];
        }
        let span = (i + 1).min(w);
        out.push(running / span as f64 * state.scale + state.bias * 0.001);
    }
    out
}

/// Deterministically perturb `values`, `bias`, and `scale` from a seed.
///
/// Seeds a [`Xorshift32`] from `seed` (zero falls back to the fixed
/// constant), burns 8 warm-up rounds, then draws one round `r` per value
/// and adds `sign(r) * (r/2^32 * 0.01 + (i % 7) * 1e-4)` — positive for
/// even `r`, negative for odd. Afterward the low and high bytes of the
/// final generator state perturb `bias` and `scale`. Identical
/// `values.len()` and `seed` always produce identical results,
/// independent of strategy.
pub fn scramble(state: &mut StateRecord, seed: u32) {
    let mut rng = Xorshift32::new(seed);
    rng.burn(8);

    for (i, v) in state.values.iter_mut().enumerate() {
        let r = rng.next_u32();
        let magnitude = r as f64 / 4_294_967_296.0 * 0.01 + (i % 7) as f64 * 1e-4;
        *v += if r & 1 == 0 { magnitude } else { -magnitude };
    }

    let s = rng.state();
    state.bias += ((s & 0xff) as f64 - 127.5) * 1e-5;
    state.scale += ((s >> 24) as f64 - 127.5) * 1e-6;
}

/// Run the three-point relaxation simulation and return the roughness
/// energy of the final sequence.
///
/// Iterations clamp to at least 1; a zero-length sequence
/// short-circuits to 0.0 without entering the loop. Each iteration
/// reads the previous iteration's buffer in full (double-buffered, so
/// no index ever sees a partially-updated neighbor): every value is
/// relaxed 25% toward the three-point neighbor average (edges clamp to
/// self), then mapped through `v * scale + bias * 1e-4`. The returned
/// energy is the sum of squared differences between consecutive
/// elements of the final state.
pub fn simulate(state: &mut StateRecord, iterations: u32) -> f64 {
    let n = state.values.len();
    if n == 0 {
        return 0.0;
    }
    let iterations = iterations.max(1);

    let mut prev = state.values.clone();
    let mut next = vec![0.0f64; n];

    for _ in 0..iterations {
        for i in 0..n {
            let left = prev[i.saturating_sub(1)];
            let right = prev[if i + 1 < n { i + 1 } else { i }];
            let avg = (left + prev[i] + right) / 3.0;
            let relaxed = prev[i] + 0.25 * (avg - prev[i]);
            next[i] = relaxed * state.scale + state.bias * 1e-4;
        }
        std::mem::swap(&mut prev, &mut next);
    }

    state.values.copy_from_slice(&prev);

    let mut energy = 0.0;
    for pair in state.values.windows(2) {
        let d = pair[1] - pair[0];
        energy += d * d;
    }
    energy
}

#[cfg(test)]
mod tests {
    use super::*;
    use tare_test_utils::{constant_record, ramp_record};

    // ---------------------------------------------------------------
    // normalize_in_place
    // ---------------------------------------------------------------

    #[test]
    fn normalize_constant_sequence_does_not_divide_by_zero() {
        let mut record = constant_record(1, 16, 3.5);
        normalize_in_place(&mut record);
        for &v in &record.values {
            assert!(v.is_finite());
            // (3.5 - 3.5) / (1 + eps) == 0 exactly.
            assert_eq!(v, 0.0);
        }
    }

    #[test]
    fn normalize_second_application_centers_values() {
        let mut record = ramp_record(1, 64);
        normalize_in_place(&mut record);
        normalize_in_place(&mut record);
        let mean: f64 = record.values.iter().sum::<f64>() / record.values.len() as f64;
        assert!(mean.abs() < 1e-9, "second normalize should center, mean={mean}");
    }

    #[test]
    fn normalize_clamps_outliers() {
        let mut record = constant_record(1, 32, 0.0);
        record.values[0] = 1e12;
        normalize_in_place(&mut record);
        for &v in &record.values {
            assert!((-8.0..=8.0).contains(&v));
        }
    }

    #[test]
    fn normalize_blends_bias_and_scale() {
        let mut record = ramp_record(1, 8);
        let (bias0, scale0) = (record.bias, record.scale);
        normalize_in_place(&mut record);
        assert_ne!(record.bias, bias0);
        assert_ne!(record.scale, scale0);
    }

    #[test]
    fn normalize_empty_and_singleton_are_defined() {
        let mut empty = constant_record(1, 0, 0.0);
        normalize_in_place(&mut empty);
        assert!(empty.values.is_empty());

        let mut single = constant_record(1, 1, 2.0);
        normalize_in_place(&mut single);
        assert!(single.values[0].is_finite());
    }

    // ---------------------------------------------------------------
    // rolling_average
    // ---------------------------------------------------------------

    #[test]
    fn window_one_is_pointwise_affine_map() {
        let record = ramp_record(1, 16);
        let out = rolling_average(&record, 1);
        for (i, &o) in out.iter().enumerate() {
            let expected = record.values[i] * record.scale + record.bias * 0.001;
            assert!((o - expected).abs() < 1e-12, "index {i}: {o} vs {expected}");
        }
    }

    #[test]
    fn oversized_window_clamps_to_length() {
        let record = ramp_record(1, 8);
        assert_eq!(rolling_average(&record, 1000), rolling_average(&record, 8));
    }

    #[test]
    fn zero_window_clamps_to_one() {
        let record = ramp_record(1, 8);
        assert_eq!(rolling_average(&record, 0), rolling_average(&record, 1));
    }

    #[test]
    fn output_length_matches_input() {
        let record = ramp_record(1, 33);
        assert_eq!(rolling_average(&record, 4).len(), 33);
        let empty = constant_record(1, 0, 0.0);
        assert!(rolling_average(&empty, 4).is_empty());
    }

    #[test]
    fn causal_window_averages_predecessors() {
        let mut record = constant_record(1, 4, 0.0);
        record.values = vec![1.0, 3.0, 5.0, 7.0];
        record.scale = 1.0;
        record.bias = 0.0;
        let out = rolling_average(&record, 2);
        assert_eq!(out[0], 1.0); // only itself at the start
        assert_eq!(out[1], 2.0); // (1+3)/2
        assert_eq!(out[2], 4.0); // (3+5)/2
        assert_eq!(out[3], 6.0); // (5+7)/2
    }

    #[test]
    fn rolling_average_does_not_mutate() {
        let record = ramp_record(1, 16);
        let before = record.values.clone();
        let _ = rolling_average(&record, 5);
        assert_eq!(record.values, before);
    }

    // ---------------------------------------------------------------
    // scramble
    // ---------------------------------------------------------------

    #[test]
    fn scramble_same_seed_same_result() {
        let mut a = ramp_record(1, 64);
        let mut b = a.clone();
        scramble(&mut a, 1234);
        scramble(&mut b, 1234);
        assert_eq!(a.values, b.values);
        assert_eq!(a.bias, b.bias);
        assert_eq!(a.scale, b.scale);
    }

    #[test]
    fn scramble_different_seed_different_result() {
        let mut a = ramp_record(1, 64);
        let mut b = a.clone();
        scramble(&mut a, 1);
        scramble(&mut b, 2);
        assert_ne!(a.values, b.values);
    }

    #[test]
    fn scramble_zero_seed_uses_fallback() {
        let mut a = ramp_record(1, 16);
        let mut b = a.clone();
        scramble(&mut a, 0);
        scramble(&mut b, crate::SEED_FALLBACK);
        assert_eq!(a.values, b.values);
        assert_eq!(a.bias, b.bias);
        assert_eq!(a.scale, b.scale);
    }

    #[test]
    fn scramble_perturbs_bias_and_scale() {
        let mut record = ramp_record(1, 8);
        let (bias0, scale0) = (record.bias, record.scale);
        scramble(&mut record, 99);
        // The byte offsets are centered, so a perturbation of exactly
        // zero would need byte value 127.5 — impossible.
        assert_ne!(record.bias, bias0);
        assert_ne!(record.scale, scale0);
    }

    #[test]
    fn scramble_preserves_length() {
        let mut record = ramp_record(1, 24);
        scramble(&mut record, 7);
        assert_eq!(record.values.len(), 24);
    }

    // ---------------------------------------------------------------
    // simulate
    // ---------------------------------------------------------------

    #[test]
    fn zero_iterations_clamps_to_one() {
        let mut a = ramp_record(1, 32);
        let mut b = a.clone();
        let ea = simulate(&mut a, 0);
        let eb = simulate(&mut b, 1);
        assert_eq!(a.values, b.values);
        assert_eq!(ea, eb);
    }

    #[test]
    fn empty_values_short_circuits_to_zero() {
        let mut record = constant_record(1, 0, 0.0);
        assert_eq!(simulate(&mut record, 10), 0.0);
    }

    #[test]
    fn relaxation_smooths_the_sequence() {
        let mut record = constant_record(1, 64, 0.0);
        record.values[32] = 100.0;
        record.scale = 1.0;
        record.bias = 0.0;
        let e1 = simulate(&mut record, 1);
        let e2 = simulate(&mut record, 1);
        assert!(e2 < e1, "repeated relaxation should reduce energy: {e1} -> {e2}");
    }

    #[test]
    fn updates_are_atomic_per_iteration() {
        // With a unit impulse, a sequential (non-buffered) update would
        // leak the new left-neighbor value into the current index. The
        // double-buffered result for the element left of the impulse
        // must only see the impulse itself, not its relaxed version.
        let mut record = constant_record(1, 5, 0.0);
        record.values = vec![0.0, 0.0, 12.0, 0.0, 0.0];
        record.scale = 1.0;
        record.bias = 0.0;
        simulate(&mut record, 1);
        // index 1 and index 3 must be symmetric around the impulse.
        assert_eq!(record.values[1], record.values[3]);
    }

    #[test]
    fn singleton_sequence_has_zero_energy() {
        let mut record = constant_record(1, 1, 5.0);
        assert_eq!(simulate(&mut record, 3), 0.0);
    }
}
