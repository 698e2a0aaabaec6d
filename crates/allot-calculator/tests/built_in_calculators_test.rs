use allot_calculator::constants::scores::NEUTRAL_SCORE;
use allot_calculator::*;
use allot_types::{FactorBreakdown, InventoryScaling, Ratios};
use proptest::prelude::*;

fn allocate(entries: &[(&str, f64)], quantity: u64) -> Vec<u64> {
    ProportionalAllocator.allocate(entries, quantity).units
}

#[test]
fn allocator_exact_split_has_no_remainder() {
    let outcome = ProportionalAllocator.allocate(&[("A", 0.5), ("B", 0.3), ("C", 0.2)], 10);
    assert_eq!(outcome.units, vec![5, 3, 2]);
    assert_eq!(outcome.base_total, 10);
    assert_eq!(outcome.remainder, 0);
}

#[test]
fn allocator_gives_remainder_to_highest_weight() {
    let outcome = ProportionalAllocator.allocate(&[("A", 0.5), ("B", 0.3), ("C", 0.2)], 11);
    assert_eq!(outcome.base_total, 10);
    assert_eq!(outcome.remainder, 1);
    assert_eq!(outcome.units, vec![6, 3, 2]);
}

#[test]
fn allocator_breaks_equal_weights_by_key() {
    let third = 1.0 / 3.0;
    assert_eq!(allocate(&[("A", third), ("B", third), ("C", third)], 10), vec![4, 3, 3]);
    // Input order does not matter, the key does
    assert_eq!(allocate(&[("C", third), ("A", third), ("B", third)], 10), vec![3, 4, 3]);
}

#[test]
fn allocator_zero_total_weight_deals_round_robin() {
    // Every base share is zero, so the whole quantity goes through remainder dealing
    let outcome = ProportionalAllocator.allocate(&[("B", 0.0), ("A", 0.0)], 5);
    assert_eq!(outcome.base_total, 0);
    assert_eq!(outcome.remainder, 5);
    assert_eq!(outcome.units, vec![2, 3]);
}

#[test]
fn allocator_handles_tiny_and_invalid_weights() {
    // One dominant weight and two tiny ones: floor shares are 9, 0, 0
    let units = allocate(&[("A", 0.9), ("B", 0.05), ("C", 0.05)], 10);
    assert_eq!(units.iter().sum::<u64>(), 10);
    assert_eq!(units, vec![10, 0, 0]);

    // Invalid weights count as zero; 7 units over 3 entries wraps twice
    let units = allocate(&[("A", 0.0), ("B", f64::NAN), ("C", -2.0)], 7);
    assert_eq!(units, vec![3, 2, 2]);
}

#[test]
fn allocator_degenerate_inputs_yield_zeros() {
    assert_eq!(allocate(&[("A", 0.7), ("B", 0.3)], 0), vec![0, 0]);
    assert!(allocate(&[], 10).is_empty());
}

#[test]
fn turnover_rate_calculator_works() {
    assert_eq!(TurnoverRateCalculator.calculate(1, 3), 25.0);
    assert_eq!(TurnoverRateCalculator.calculate(0, 0), 0.0);
}

#[test]
fn max_relative_scaler_works() {
    assert_eq!(MaxRelativeScaler.scale(&[10.0, 5.0, 0.0]), vec![100.0, 50.0, 0.0]);
    assert_eq!(MaxRelativeScaler.scale(&[0.0, 0.0]), vec![0.0, 0.0]);
    assert!(MaxRelativeScaler.scale(&[]).is_empty());
}

#[test]
fn min_max_scaler_works() {
    assert_eq!(MinMaxScaler.scale(&[-10.0, 0.0, 30.0]), vec![0.0, 25.0, 100.0]);
    assert_eq!(MinMaxScaler.scale(&[4.0, 4.0, 4.0]), vec![NEUTRAL_SCORE; 3]);
    assert_eq!(MinMaxScaler.scale(&[7.0]), vec![NEUTRAL_SCORE]);
}

#[test]
fn clamped_shift_scaler_works() {
    assert_eq!(ClampedShiftScaler.scale(&[-80.0, -10.0, 0.0, 25.0, 120.0]), vec![
        0.0, 40.0, 50.0, 75.0, 100.0
    ]);
}

#[test]
fn inventory_scaler_follows_settings() {
    assert_eq!(inventory_scaler(InventoryScaling::MinMax).name(), "min_max");
    assert_eq!(inventory_scaler(InventoryScaling::Clamped).name(), "clamped_shift");
}

#[test]
fn weighted_composite_calculator_works() {
    let ratios = Ratios { turnover_rate: 40.0, store_count: 20.0, remaining_inventory: 20.0, sales_volume: 20.0 };
    let breakdown = FactorBreakdown {
        turnover_rate: 50.0,
        store_count: 100.0,
        inventory_score: 0.0,
        sales_volume: 50.0,
    };
    let composite = WeightedCompositeCalculator::new().calculate(&ratios, &breakdown);
    // (40*50 + 20*100 + 20*0 + 20*50) / 100 = 50
    assert!((composite.score - 50.0).abs() < 1e-9);
    assert!((composite.weight - 0.5).abs() < 1e-9);

    // Shares are relative: doubling every ratio changes nothing
    let doubled = Ratios { turnover_rate: 80.0, store_count: 40.0, remaining_inventory: 40.0, sales_volume: 40.0 };
    let same = WeightedCompositeCalculator::new().calculate(&doubled, &breakdown);
    assert!((same.score - composite.score).abs() < 1e-9);

    let zero = Ratios { turnover_rate: 0.0, store_count: 0.0, remaining_inventory: 0.0, sales_volume: 0.0 };
    assert_eq!(WeightedCompositeCalculator::new().calculate(&zero, &breakdown).weight, 0.0);
}

proptest! {
    #[test]
    fn allocator_always_sums_to_quantity(
        weights in prop::collection::vec(0.0f64..10.0, 1..40),
        quantity in 0u64..5_000,
    ) {
        let entries: Vec<(usize, f64)> = weights.iter().copied().enumerate().collect();
        let outcome = ProportionalAllocator.allocate(&entries, quantity);
        prop_assert_eq!(outcome.units.len(), entries.len());
        prop_assert_eq!(outcome.units.iter().sum::<u64>(), quantity);
        prop_assert_eq!(outcome.base_total + outcome.remainder, quantity);
    }

    #[test]
    fn allocator_is_deterministic(
        weights in prop::collection::vec(0.0f64..1.0, 1..20),
        quantity in 0u64..1_000,
    ) {
        let entries: Vec<(usize, f64)> = weights.iter().copied().enumerate().collect();
        prop_assert_eq!(
            ProportionalAllocator.allocate(&entries, quantity),
            ProportionalAllocator.allocate(&entries, quantity)
        );
    }
}
