//! End-to-end tests for the inverse search

use pretty_assertions::assert_eq;
use std::thread;
use std::time::Duration;
use tictac_core::prelude::*;
use tictac_core::search::{generate, rank, Scorer};
use tokio_util::sync::CancellationToken;

/// 15 evenly spaced points from 0 V to 12 V
fn ramp_points() -> Vec<f64> {
    (0..15).map(|i| 12.0 * i as f64 / 14.0).collect()
}

fn reduced_config() -> EngineConfig {
    EngineConfig {
        grid: GridValues {
            power: vec![4, 10],
            acceleration: vec![1, 15],
            power_zone: vec![1, 8, 15],
            post_curve: vec![1, 8],
            multifunction: vec![1, 2],
            brake_anticipation: vec![1],
            brake_entry_speed: vec![1],
            minimum_brake: vec![1],
            sensitivity: vec![1, 15],
            pot_value: vec![15],
        },
        ..EngineConfig::default()
    }
}

#[test]
fn test_reference_search_returns_five_sorted_candidates() {
    let result = invert(&ramp_points(), 10.0, 14.0).unwrap();

    assert_eq!(result.len(), 5);
    assert_eq!(result.evaluated, 11_664 * 9);
    for pair in result.candidates.windows(2) {
        assert!(pair[0].error <= pair[1].error);
    }
    for candidate in result.iter() {
        assert_eq!(candidate.sim_curve.len(), SAMPLE_COUNT);
        assert!(candidate.error.is_finite());
        assert!((10.0..=14.0).contains(&candidate.params.max_voltage));
        assert!(candidate.params.validate(&EngineConfig::default()).is_ok());
    }
}

#[test]
fn test_inverted_voltage_range_fails() {
    let err = invert(&ramp_points(), 15.0, 10.0).unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidRange {
            min: 15.0,
            max: 10.0
        }
    );
}

#[test]
fn test_voltage_range_outside_domain_fails() {
    assert!(matches!(
        invert(&ramp_points(), 10.0, 17.0),
        Err(EngineError::InvalidRange { .. })
    ));
}

#[test]
fn test_single_control_point_is_degenerate() {
    assert_eq!(
        invert(&[4.0], 10.0, 12.0),
        Err(EngineError::DegenerateCurve { points: 1 })
    );
}

#[test]
fn test_search_is_repeatable_with_stable_ids() {
    let search = InverseSearch::new(reduced_config()).unwrap();
    let first = search.invert(&ramp_points(), 10.0, 12.0).unwrap();
    let second = search.invert(&ramp_points(), 10.0, 12.0).unwrap();

    let ids = |r: &SearchResult| r.iter().map(|c| c.id).collect::<Vec<_>>();
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(first, second);
}

#[test]
fn test_search_matches_exhaustive_ranking() {
    let config = reduced_config();
    let target = TargetCurve::new(ramp_points(), &config)
        .unwrap()
        .densify()
        .unwrap();
    let scorer = Scorer::from_config(&config);
    let everything: Vec<Candidate> = generate(&config, 10.0, 12.0)
        .unwrap()
        .iter()
        .enumerate()
        .map(|(i, params)| scorer.score(CandidateId(i as u64), params, &target))
        .collect();
    let total = everything.len();
    let expected = rank(everything, config.top_k);

    let result = InverseSearch::new(config)
        .unwrap()
        .invert(&ramp_points(), 10.0, 12.0)
        .unwrap();
    assert_eq!(result.evaluated, total);
    assert_eq!(result.candidates, expected);
}

#[test]
fn test_exact_forward_curve_is_found_with_zero_error() {
    // Draw the ceiling-mode curve of a grid point and search for it
    let config = reduced_config();
    let params = ParameterVector {
        power: 10,
        acceleration: 15,
        power_zone: 1,
        post_curve: 8,
        multifunction: 1,
        brake_anticipation: 1,
        brake_entry_speed: 1,
        minimum_brake: 1,
        sensitivity: 15,
        pot_value: 15,
        max_voltage: 11.0,
    };
    let drawn = simulate_mode(
        &params,
        true,
        CurveMode::Ceiling {
            target_voltage: 11.0,
        },
        &config,
    )
    .unwrap();

    let result = InverseSearch::new(config)
        .unwrap()
        .invert(drawn.samples(), 10.0, 12.0)
        .unwrap();
    let best = result.best().unwrap();
    assert!(best.error < 1e-9, "best error {}", best.error);
    assert_eq!(best.params.max_voltage, 11.0);
    assert_eq!(best.params.power_zone, 1);
    assert!(!best.overflow);
}

#[test]
fn test_overflow_flag_tracks_ceiling() {
    let config = EngineConfig::default();
    let scorer = Scorer::from_config(&config);
    let target = TargetCurve::default().densify().unwrap();

    let peaky = ParameterVector {
        power_zone: 15,
        max_voltage: 12.0,
        ..ParameterVector::default()
    };
    let candidate = scorer.score(CandidateId(0), &peaky, &target);
    assert!(candidate.overflow);
    assert!(candidate
        .sim_curve
        .samples()
        .iter()
        .any(|&v| v > 12.0 + config.overflow_tolerance));

    let rising = ParameterVector {
        power_zone: 1,
        max_voltage: 12.0,
        ..ParameterVector::default()
    };
    let candidate = scorer.score(CandidateId(1), &rising, &target);
    assert!(!candidate.overflow);
    assert!(candidate
        .sim_curve
        .samples()
        .iter()
        .all(|&v| v <= 12.0 + config.overflow_tolerance));
}

#[test]
fn test_top_k_is_configurable() {
    let config = EngineConfig {
        top_k: 2,
        ..reduced_config()
    };
    let result = InverseSearch::new(config)
        .unwrap()
        .invert(&ramp_points(), 12.0, 12.0)
        .unwrap();
    assert_eq!(result.len(), 2);
}

#[test]
fn test_cancellation_from_another_thread() {
    let search = InverseSearch::new(EngineConfig {
        workers: Some(2),
        batch_size: 1,
        ..EngineConfig::default()
    })
    .unwrap();
    let request = CancellationToken::new();

    let canceller = {
        let request = request.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(5));
            request.cancel();
        })
    };
    let result = search.invert_with_cancellation(&ramp_points(), 0.0, 16.0, &request);
    canceller.join().unwrap();
    assert_eq!(result, Err(EngineError::Cancelled));

    // A fresh request on the same instance is unaffected
    let next = search
        .invert_with_cancellation(&ramp_points(), 12.0, 12.0, &CancellationToken::new())
        .unwrap();
    assert_eq!(next.len(), 5);
}

#[test]
fn test_instance_token_cancels_searches() {
    let token = CancellationToken::new();
    let search = InverseSearch::new(reduced_config())
        .unwrap()
        .with_cancellation(token.clone());
    token.cancel();
    assert_eq!(
        search.invert(&ramp_points(), 10.0, 12.0),
        Err(EngineError::Cancelled)
    );
}

/// Generator handing out vectors the grid would never produce
struct UncheckedList(Vec<ParameterVector>);

impl CandidateGenerator for UncheckedList {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn candidate(&self, index: usize) -> ParameterVector {
        self.0[index]
    }
}

#[test]
fn test_custom_generator_candidates_are_validated() {
    let search = InverseSearch::new(EngineConfig {
        workers: Some(1),
        ..EngineConfig::default()
    })
    .unwrap();
    let target = TargetCurve::default().densify().unwrap();

    let oversized = UncheckedList(vec![ParameterVector {
        power: 200,
        max_voltage: 40.0,
        ..ParameterVector::default()
    }]);
    assert!(matches!(
        search.run(&oversized, &target),
        Err(EngineError::InvalidParameter { field: "power", .. })
    ));

    let no_pot = UncheckedList(vec![ParameterVector {
        pot_value: 0,
        ..ParameterVector::default()
    }]);
    assert!(matches!(
        search.run(&no_pot, &target),
        Err(EngineError::InvalidParameter {
            field: "pot_value",
            ..
        })
    ));
}
