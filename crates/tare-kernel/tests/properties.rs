//! Property tests for the kernel's determinism and invariants.

use proptest::prelude::*;

use tare_core::{InstanceId, StateRecord, Tag};
use tare_kernel::{
    checksum, format_summary, normalize_in_place, rolling_average, scramble, simulate,
};

fn arb_record() -> impl Strategy<Value = StateRecord> {
    (
        1u32..10_000,
        proptest::collection::vec(-1000.0f64..1000.0, 0..96),
        -10.0f64..10.0,
        0.01f64..10.0,
        0usize..3,
    )
        .prop_map(|(id, values, bias, scale, tag)| StateRecord {
            id: InstanceId(id),
            name: format!("rec-{id:04x}"),
            values,
            bias,
            scale,
            created_at: 1_700_000_000,
            tag: Tag::cycle(tag),
        })
}

proptest! {
    #[test]
    fn checksum_is_pure(record in arb_record()) {
        prop_assert_eq!(checksum(&record), checksum(&record));
    }

    #[test]
    fn summary_is_pure_and_embeds_checksum(record in arb_record()) {
        let summary = format_summary(&record);
        prop_assert_eq!(&summary, &format_summary(&record));
        prop_assert!(summary.contains(&checksum(&record).to_string()));
    }

    #[test]
    fn scramble_is_deterministic(record in arb_record(), seed in any::<u32>()) {
        let mut a = record.clone();
        let mut b = record;
        scramble(&mut a, seed);
        scramble(&mut b, seed);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn normalize_keeps_values_in_clamp_range(mut record in arb_record()) {
        normalize_in_place(&mut record);
        for &v in &record.values {
            prop_assert!((-8.0..=8.0).contains(&v));
        }
    }

    #[test]
    fn normalize_never_changes_length(mut record in arb_record()) {
        let len = record.values.len();
        normalize_in_place(&mut record);
        prop_assert_eq!(record.values.len(), len);
    }

    #[test]
    fn rolling_average_length_matches_any_window(
        record in arb_record(),
        window in 0usize..200,
    ) {
        prop_assert_eq!(rolling_average(&record, window).len(), record.values.len());
    }

    #[test]
    fn simulate_is_deterministic(record in arb_record(), iterations in 0u32..6) {
        let mut a = record.clone();
        let mut b = record;
        let ea = simulate(&mut a, iterations);
        let eb = simulate(&mut b, iterations);
        prop_assert_eq!(ea.to_bits(), eb.to_bits());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn simulate_energy_is_finite_and_non_negative(
        mut record in arb_record(),
        iterations in 0u32..6,
    ) {
        // Scales are bounded in the generator, so the relaxation stays
        // finite over a handful of iterations.
        let energy = simulate(&mut record, iterations);
        prop_assert!(energy.is_finite());
        prop_assert!(energy >= 0.0);
    }
}
