//! Property-based fuzz testing library for the genesis bond workflow
//!
//! Covers the pure parts of the workflow: amount parsing and splitting,
//! bond intent construction, the bond.toml block and validator ordering.
//!
//! # Usage
//!
//! ```bash
//! # Run all property-based tests
//! cargo test --release -p genesis-bond-fuzz
//!
//! # Run the fuzz test runner
//! cargo run --release -p genesis-bond-fuzz
//!
//! # Run with more iterations
//! PROPTEST_CASES=10000 cargo test --release -p genesis-bond-fuzz
//! ```

pub mod arbitrary;
pub mod invariants;
pub mod scenarios;

pub use arbitrary::*;
pub use invariants::*;
pub use scenarios::*;

// Include fuzz targets as test modules
#[cfg(test)]
#[path = "../fuzz_targets/amount_split.rs"]
mod amount_split_tests;

#[cfg(test)]
#[path = "../fuzz_targets/bond_toml.rs"]
mod bond_toml_tests;

#[cfg(test)]
#[path = "../fuzz_targets/validator_ordering.rs"]
mod validator_ordering_tests;

#[cfg(test)]
#[path = "../fuzz_targets/bond_plan.rs"]
mod bond_plan_tests;
