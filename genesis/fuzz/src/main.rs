//! Fuzz test runner for the genesis bond workflow
//!
//! Run with: cargo run --release -p genesis-bond-fuzz
//! Or: cargo test -p genesis-bond-fuzz (for property-based tests)

use genesis_bond_core::{Amount, SignedBond};
use genesis_bond_fuzz::*;
use proptest::prelude::*;
use proptest::strategy::ValueTree;
use std::time::Instant;

fn main() {
    println!("=== Genesis Bond Workflow Fuzz Testing ===\n");

    let start = Instant::now();
    let mut total_tests = 0;
    let mut passed = 0;
    let mut failed = 0;

    println!("Running amount split fuzz tests...");
    let (p, f) = run_split_fuzz(1000);
    passed += p;
    failed += f;
    total_tests += p + f;

    println!("Running bond plan fuzz tests...");
    let (p, f) = run_bond_plan_fuzz(500);
    passed += p;
    failed += f;
    total_tests += p + f;

    println!("Running bond.toml fuzz tests...");
    let (p, f) = run_bond_toml_fuzz(200);
    passed += p;
    failed += f;
    total_tests += p + f;

    println!("Running validator ordering fuzz tests...");
    let (p, f) = run_ordering_fuzz(200);
    passed += p;
    failed += f;
    total_tests += p + f;

    println!("Running edge case tests...");
    let (p, f) = run_edge_case_tests();
    passed += p;
    failed += f;
    total_tests += p + f;

    let duration = start.elapsed();

    println!("\n=== Fuzz Testing Complete ===");
    println!("Total tests: {}", total_tests);
    println!("Passed: {}", passed);
    println!("Failed: {}", failed);
    println!("Duration: {:?}", duration);

    if failed > 0 {
        std::process::exit(1);
    }
}

fn generate<S: Strategy>(strategy: &S, runner: &mut proptest::test_runner::TestRunner) -> S::Value {
    strategy
        .new_tree(runner)
        .expect("Failed to generate input")
        .current()
}

fn tally(name: &str, results: impl Iterator<Item = (usize, bool)>) -> (usize, usize) {
    let mut passed = 0;
    let mut failed = 0;
    for (i, ok) in results {
        if ok {
            passed += 1;
        } else {
            println!("  [FAIL] {} iteration {}", name, i);
            failed += 1;
        }
    }
    println!("  {}: {} passed, {} failed", name, passed, failed);
    (passed, failed)
}

fn run_split_fuzz(iterations: usize) -> (usize, usize) {
    let mut runner = proptest::test_runner::TestRunner::default();
    let strategy = any::<SplitInput>();
    tally(
        "amount_split",
        (0..iterations).map(|i| {
            let input = generate(&strategy, &mut runner);
            let amount = Amount::from_base_units(input.base_units);
            let result = check_split(amount, input.with_tip, amount.split(input.with_tip));
            if !result.is_valid() {
                println!("    {:?} for {:?}", result, input);
            }
            (i, result.is_valid())
        }),
    )
}

fn run_bond_plan_fuzz(iterations: usize) -> (usize, usize) {
    let mut runner = proptest::test_runner::TestRunner::default();
    let strategy = any::<BondPlanInput>();
    tally(
        "bond_plan",
        (0..iterations).map(|i| {
            let input = generate(&strategy, &mut runner);
            let result = simulate_bond_plan(&input);
            if result.is_invariant_violation() {
                println!("    {:?} for {:?}", result, input);
            }
            (i, !result.is_invariant_violation())
        }),
    )
}

fn run_bond_toml_fuzz(iterations: usize) -> (usize, usize) {
    let mut runner = proptest::test_runner::TestRunner::default();
    let strategy = prop::collection::vec(arb_signed_bond(), 0..5);
    tally(
        "bond_toml",
        (0..iterations).map(|i| {
            let bonds: Vec<SignedBond> = generate(&strategy, &mut runner);
            let result = check_bond_toml_round_trip(&bonds);
            if !result.is_valid() {
                println!("    {:?}", result);
            }
            (i, result.is_valid())
        }),
    )
}

fn run_ordering_fuzz(iterations: usize) -> (usize, usize) {
    let mut runner = proptest::test_runner::TestRunner::default();
    let strategy = any::<OrderingInput>();
    tally(
        "validator_ordering",
        (0..iterations).map(|i| {
            let input = generate(&strategy, &mut runner);
            let result = simulate_validator_ordering(&input);
            if result.is_invariant_violation() {
                println!("    {:?}", result);
            }
            (i, !result.is_invariant_violation())
        }),
    )
}

fn run_edge_case_tests() -> (usize, usize) {
    let amounts = [
        0u128,
        1,
        UNIT - 1,
        UNIT,
        UNIT + 1,
        5 * UNIT - 1,
        5 * UNIT,
        u128::MAX / 4,
        u128::MAX - 1,
        u128::MAX,
    ];
    tally(
        "edge_cases",
        amounts.iter().enumerate().flat_map(|(i, raw)| {
            let amount = Amount::from_base_units(*raw);
            [true, false].into_iter().map(move |tip| {
                let result = check_split(amount, tip, amount.split(tip));
                if !result.is_valid() {
                    println!("    {:?} for {} (tip: {})", result, raw, tip);
                }
                (i, result.is_valid())
            })
        }),
    )
}
