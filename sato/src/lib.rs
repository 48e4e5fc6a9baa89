//! Compiles finite-domain constraint satisfaction problems to SAT.
//!
//! Integer variables are represented with the order encoding: each primitive
//! comparison `x <= c` becomes one boolean predicate. The resulting CNF is
//! written in DIMACS format for an external SAT solver whose model is decoded
//! back into integer values.

pub mod cli;
pub mod config;
pub mod csp;
pub mod encode;
pub mod error;
pub mod output;
pub mod parser;
pub mod product;
pub mod sat;
pub mod solve;
pub mod types;
