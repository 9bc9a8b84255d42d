//! Randomized invariants across the engines

use proptest::prelude::*;

use crate::attribution::compute_attribution;
use crate::sampler::GaussianMethod;
use crate::simulation::{SimulationConfig, run_monte_carlo_seeded};
use crate::stats::max_drawdown;
use crate::stress::{AllocationWeights, ShockVector, run_stress_tests};

proptest! {
    #[test]
    fn drawdown_is_a_fraction(returns in prop::collection::vec(-0.99f64..1.0, 0..200)) {
        let drawdown = max_drawdown(&returns);
        prop_assert!((0.0..=1.0).contains(&drawdown), "drawdown {}", drawdown);
    }

    #[test]
    fn reported_drawdown_is_a_percentage(returns in prop::collection::vec(-0.99f64..1.0, 1..100)) {
        let result = compute_attribution(&returns, &returns, 5.0).unwrap();
        prop_assert!((0.0..=100.0).contains(&result.max_drawdown));
        prop_assert!(result.volatility >= 0.0);
    }

    #[test]
    fn percentile_bands_are_monotonic(
        current_value in 1.0f64..1e7,
        expected_return in -0.2f64..0.3,
        volatility in 0.0f64..0.6,
        time_horizon in 0u32..30,
        simulation_count in 1usize..400,
        seed in any::<u64>(),
    ) {
        let params = SimulationConfig {
            current_value,
            expected_return,
            volatility,
            time_horizon,
            simulation_count,
            gaussian: GaussianMethod::BoxMuller,
        };
        let ci = run_monte_carlo_seeded(&params, seed).unwrap().confidence_intervals;
        prop_assert!(ci.p5 <= ci.p25);
        prop_assert!(ci.p25 <= ci.p50);
        prop_assert!(ci.p50 <= ci.p75);
        prop_assert!(ci.p75 <= ci.p95);
    }

    #[test]
    fn zero_allocation_never_moves_value(
        current_value in 1.0f64..1e8,
        shocks in prop::collection::vec(-100.0f64..100.0, 5),
        fixed in prop::option::of(-50.0f64..0.0),
    ) {
        let shock = ShockVector {
            name: "Random".to_string(),
            stocks: shocks[0],
            bonds: shocks[1],
            gold: shocks[2],
            cash: shocks[3],
            alternatives: shocks[4],
            fixed_impact: fixed,
            ..Default::default()
        };
        let results =
            run_stress_tests(current_value, &AllocationWeights::default(), &[shock]).unwrap();
        prop_assert_eq!(results[0].portfolio_impact, 0.0);
        prop_assert_eq!(results[0].estimated_value, current_value.round());
    }
}
