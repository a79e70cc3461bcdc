use std::time::Duration;

use anytime_tsp::heuristics::{solve, SearchConfig};
use anytime_tsp::instance::DEFAULT_MAX_POINTS;
use anytime_tsp::TspInstance;

fn config(ms: u64, seed: u64) -> SearchConfig {
    SearchConfig {
        time_limit: Duration::from_millis(ms),
        seed: Some(seed),
        max_perturbations: None,
    }
}

fn load(input: &str) -> TspInstance {
    TspInstance::from_reader(input.as_bytes(), "test", DEFAULT_MAX_POINTS).unwrap()
}

#[test]
fn two_points_print_identity() {
    let instance = load("2\n0 0\n5 5\n");
    let outcome = solve(&instance, &SearchConfig::default());
    assert_eq!(outcome.tour.to_string(), "0\n1\n");
}

#[test]
fn three_points_print_identity() {
    let instance = load("3\n10 0\n0 0\n5 9\n");
    let outcome = solve(&instance, &SearchConfig::default());
    assert_eq!(outcome.tour.to_string(), "0\n1\n2\n");
}

#[test]
fn unit_square_is_solved_exactly() {
    let instance = load("4\n0 0\n1 0\n1 1\n0 1\n");
    let outcome = solve(&instance, &config(100, 42));
    assert!((outcome.tour.length - 4.0).abs() < 1e-9);

    // every edge of the answer is a side of the square
    let order = &outcome.tour.order;
    for k in 0..4 {
        let (a, b) = (order[k], order[(k + 1) % 4]);
        assert!((instance.distance(a, b) - 1.0).abs() < 1e-12);
    }
}

#[test]
fn collinear_points_have_length_six() {
    let instance = load("4\n0 0\n1 0\n2 0\n3 0\n");
    for seed in 0..5 {
        let outcome = solve(&instance, &config(30, seed));
        assert!((outcome.tour.length - 6.0).abs() < 1e-9);
    }
}

#[test]
fn circle_points_are_visited_in_angular_order() {
    let n = 30;
    let mut input = format!("{n}\n");
    for k in 0..n {
        // shuffle input order so the identity is not already optimal
        let idx = (k * 7) % n;
        let a = idx as f64 * 2.0 * std::f64::consts::PI / n as f64;
        input.push_str(&format!("{} {}\n", 100.0 * a.cos(), 100.0 * a.sin()));
    }
    let instance = load(&input);

    let outcome = solve(&instance, &config(300, 1));
    let side = 2.0 * 100.0 * (std::f64::consts::PI / n as f64).sin();
    assert!((outcome.tour.length - side * n as f64).abs() < 1e-6);
}

#[test]
fn tsplib_input_is_accepted() {
    let content = "NAME: pentagon\nTYPE: TSP\nDIMENSION: 5\nEDGE_WEIGHT_TYPE: EUC_2D\nNODE_COORD_SECTION\n\
                   1 0 10\n2 -9.511 -3.09\n3 9.511 3.09\n4 -5.878 8.09\n5 5.878 -8.09\nEOF\n";
    let instance = load(content);
    assert_eq!(instance.name, "pentagon");

    let outcome = solve(&instance, &config(50, 7));
    assert!(outcome.tour.is_permutation());
    assert_eq!(outcome.tour.len(), 5);
    assert!((outcome.tour.length - instance.matrix.tour_length(&outcome.tour.order)).abs() < 1e-9);
}

#[test]
fn json_report_carries_tour_and_stats() {
    let instance = load("5\n0 0\n4 0\n4 3\n0 3\n2 5\n");
    let outcome = solve(&instance, &config(20, 3));
    let json: serde_json::Value = serde_json::from_str(&serde_json::to_string(&outcome).unwrap()).unwrap();

    let order: Vec<usize> = json["tour"]["order"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_u64().unwrap() as usize)
        .collect();
    assert_eq!(order, outcome.tour.order);
    assert_eq!(json["stats"]["seed"].as_u64(), Some(3));
    assert_eq!(
        json["stats"]["perturbations"].as_u64(),
        Some(outcome.stats.perturbations as u64)
    );
    assert!((json["tour"]["length"].as_f64().unwrap() - outcome.tour.length).abs() < 1e-9);
}
