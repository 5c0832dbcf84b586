//! Property tests for the cost estimator.

use digimplant_model::{ModelTier, estimate_cost};
use proptest::prelude::*;

fn arb_tier() -> impl Strategy<Value = ModelTier> {
    prop::sample::select(ModelTier::ALL.to_vec())
}

/// **Property: cost is monotonic**
/// *For any* tier, increasing input or output tokens SHALL never decrease
/// the estimated cost.
mod prop_cost_monotonic {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn more_tokens_never_cost_less(
            tier in arb_tier(),
            input in 0u32..2_000_000,
            output in 0u32..2_000_000,
            extra_input in 0u32..100_000,
            extra_output in 0u32..100_000,
        ) {
            let base = estimate_cost(input, output, tier);
            prop_assert!(estimate_cost(input + extra_input, output, tier) >= base);
            prop_assert!(estimate_cost(input, output + extra_output, tier) >= base);
            prop_assert!(base >= 0.0);
        }

        #[test]
        fn result_has_at_most_six_decimals(
            tier in arb_tier(),
            input in 0u32..1_000_000,
            output in 0u32..1_000_000,
        ) {
            let cost = estimate_cost(input, output, tier);
            let scaled = cost * 1_000_000.0;
            prop_assert!((scaled - scaled.round()).abs() < 1e-6);
        }
    }
}
