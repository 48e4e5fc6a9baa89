//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use anyhow::Result;
use sato::config::BlockingMode;
use sato::config::SolverConfig;
use sato::csp::Csp;
use sato::product::cartesian_product;
use sato::solve::SatBackend;
use sato::solve::Solution;
use sato::solve::Solver;
use sato::types::Int;
use tempfile::TempDir;

/// In-process backend honouring the file contract of MiniSat.
pub struct Varisat;

impl SatBackend for Varisat {
    fn run(&mut self, input: &Path, output: &Path) -> Result<()> {
        let formula = varisat_dimacs::DimacsParser::parse(fs::File::open(input)?)?;
        let mut solver = varisat::Solver::new();
        solver.add_formula(&formula);
        let text = if solver.solve()? {
            let model: Vec<String> = solver
                .model()
                .unwrap_or_default()
                .iter()
                .map(|lit| lit.to_dimacs().to_string())
                .collect();
            format!("SAT\n{} 0\n", model.join(" "))
        } else {
            "UNSAT\n".to_string()
        };
        fs::write(output, text)?;
        Ok(())
    }
}

/// Solver over a fresh artifact directory, removed when the guard is dropped.
pub fn solver(csp: Csp, blocking: BlockingMode) -> (Solver<Varisat>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = SolverConfig {
        blocking,
        ..SolverConfig::in_dir(dir.path())
    };
    (Solver::new(csp, config, Varisat).unwrap(), dir)
}

/// Values of the solution, in declaration order.
pub fn values(solution: &Solution) -> Vec<Int> {
    solution.assignments().iter().map(|a| a.value()).collect()
}

/// Every assignment satisfying the CSP, by enumeration of the domains.
pub fn brute_force(csp: &Csp) -> Vec<Vec<Int>> {
    let ranges: Vec<Vec<Int>> = csp
        .variables()
        .iter()
        .map(|v| (v.lb()..=v.ub()).collect())
        .collect();
    cartesian_product(&ranges)
        .into_iter()
        .filter(|assignment| {
            let value_of = |name: &str| {
                let i = csp.variables().iter().position(|v| v.name() == name).unwrap();
                assignment[i]
            };
            csp.clauses()
                .iter()
                .all(|clause| clause.iter().any(|ineq| ineq.eval(value_of)))
        })
        .collect()
}
