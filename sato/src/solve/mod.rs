//! Solve and enumerate loop around a SAT backend.

mod backend;
mod solution;

use std::collections::HashMap;
use std::collections::HashSet;
use std::fs;
use std::io;

use anyhow::Context;
use anyhow::Result;

pub use backend::ExternalSolver;
pub use backend::SatBackend;
pub use solution::Assignment;
pub use solution::Solution;

use crate::config::BlockingMode;
use crate::config::SolverConfig;
use crate::csp::Csp;
use crate::encode::encode;
use crate::error::Error;
use crate::sat::dimacs::parse_solver_output;
use crate::sat::dimacs::write_dimacs;
use crate::sat::dimacs::SolverOutput;
use crate::sat::Literal;
use crate::sat::Predicate;
use crate::sat::Sat;
use crate::types::Int;

/// Result of one solver call.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Outcome {
    Sat(Solution),
    Unsat,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum State {
    #[default]
    Unsolved,
    Sat,
    Unsat,
}

/// Solver of a CSP through its order encoding.
///
/// The SAT instance only grows: every enumerated model adds a blocking clause.
pub struct Solver<B: SatBackend> {
    csp: Csp,
    sat: Sat,
    config: SolverConfig,
    backend: B,
    state: State,
    last_model: Option<Vec<Int>>,
}

impl Solver<ExternalSolver> {
    /// Solver calling the external program of the configuration.
    pub fn external(csp: Csp, config: SolverConfig) -> Result<Self> {
        let backend = ExternalSolver::from_config(&config);
        Self::new(csp, config, backend)
    }
}

impl<B: SatBackend> Solver<B> {
    /// Encode the CSP.
    pub fn new(csp: Csp, config: SolverConfig, backend: B) -> Result<Self> {
        let sat = encode(&csp)?;
        Ok(Self {
            csp,
            sat,
            config,
            backend,
            state: State::Unsolved,
            last_model: None,
        })
    }

    pub fn csp(&self) -> &Csp {
        &self.csp
    }

    pub fn sat(&self) -> &Sat {
        &self.sat
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Write the current instance to the input artifact.
    pub fn export_dimacs(&self) -> Result<()> {
        let content = write_dimacs(&self.sat, &self.config.comment)?;
        let path = &self.config.input;
        fs::write(path, content)
            .map_err(|e| Error::solver_io(path, e))
            .context("cannot write the DIMACS instance")?;
        tracing::debug!("DIMACS instance written to {}", path.display());
        Ok(())
    }

    /// Run the backend once on the current instance.
    pub fn solve(&mut self) -> Result<Outcome> {
        self.export_dimacs()?;
        let output = &self.config.output;
        // a stale verdict must not be read back
        match fs::remove_file(output) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => {
                return Err(Error::solver_io(output, e).into());
            }
            _ => {}
        }
        self.backend
            .run(&self.config.input, output)
            .context("solver call failed")?;
        let text = fs::read_to_string(output)
            .map_err(|e| Error::solver_io(output, e))
            .context("cannot read the solver output")?;

        match parse_solver_output(&text).context("invalid solver output")? {
            SolverOutput::Unsat => {
                tracing::debug!("UNSAT");
                self.state = State::Unsat;
                self.last_model = None;
                Ok(Outcome::Unsat)
            }
            SolverOutput::Sat(model) => {
                let solution = decode(&self.csp, &self.sat, &model)?;
                tracing::debug!("SAT: {}", solution.to_string().replace('\n', ", "));
                self.state = State::Sat;
                self.last_model = Some(model);
                Ok(Outcome::Sat(solution))
            }
        }
    }

    /// Forbid the last model found.
    fn block_last_model(&mut self) -> Result<()> {
        let Some(model) = self.last_model.take() else {
            return Ok(());
        };
        let mut clause = Vec::with_capacity(model.len());
        for number in model {
            let literal = self.sat.from_dimacs(number)?;
            if self.config.blocking == BlockingMode::Projected && literal.predicate.is_selector() {
                continue;
            }
            clause.push(literal.negated());
        }
        tracing::trace!("blocking clause of {} literals", clause.len());
        self.sat.add_registered_clause(clause)
    }

    /// All distinct solutions, in the order they are found.
    pub fn enumerate(&mut self) -> Result<Vec<Solution>> {
        self.enumerate_with(|_| {})
    }

    /// Enumerate solutions, calling `f` on each new one as soon as it is found.
    ///
    /// Stops when the instance becomes unsatisfiable or when the configured
    /// maximum number of solutions is reached.
    pub fn enumerate_with<F>(&mut self, mut f: F) -> Result<Vec<Solution>>
    where
        F: FnMut(&Solution),
    {
        let span = tracing::span!(tracing::Level::DEBUG, "ENUMERATION");
        let _span = span.enter();

        let mut seen = HashSet::new();
        let mut solutions = Vec::new();
        let mut round = 0;
        loop {
            if self.config.max_solutions.is_some_and(|max| solutions.len() >= max) {
                break;
            }
            let outcome = self
                .solve()
                .with_context(|| format!("while looking for solution {}", round + 1))?;
            round += 1;
            match outcome {
                Outcome::Unsat => break,
                Outcome::Sat(solution) => {
                    if seen.insert(solution.clone()) {
                        f(&solution);
                        solutions.push(solution);
                    }
                    self.block_last_model()?;
                }
            }
        }
        tracing::debug!("{} solutions in {round} solver calls", solutions.len());
        Ok(solutions)
    }
}

/// Integer values encoded by a model.
///
/// The value of a variable is the smallest `c` such that `p(x,c)` is true.
/// Selectors and false predicates are ignored.
pub fn decode(csp: &Csp, sat: &Sat, model: &[Int]) -> Result<Solution> {
    let mut values: HashMap<String, Int> = HashMap::new();
    for &number in model {
        let Literal { predicate, positive } = sat.from_dimacs(number)?;
        if let (Predicate::Order { var, value }, true) = (predicate, positive) {
            values
                .entry(var)
                .and_modify(|v| *v = (*v).min(value))
                .or_insert(value);
        }
    }
    let mut assignments = Vec::with_capacity(csp.variables().len());
    for var in csp.variables() {
        let value = *values.get(var.name()).ok_or_else(|| {
            Error::Encoding(format!("no true order predicate for variable '{}'", var.name()))
        })?;
        if !var.contains(value) {
            return Err(Error::Encoding(format!(
                "value {value} of '{}' is outside of its domain",
                var.name()
            ))
            .into());
        }
        assignments.push(Assignment::new(var.name(), value));
    }
    Ok(Solution::new(assignments))
}
