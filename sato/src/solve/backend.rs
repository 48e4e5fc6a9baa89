use std::path::Path;
use std::process::Command;

use anyhow::Context;
use anyhow::Result;

use crate::config::SolverConfig;
use crate::error::Error;

/// Something able to solve a DIMACS file.
///
/// The backend reads the instance from `input` and must write its verdict to
/// `output`: nothing or `UNSAT` when unsatisfiable, otherwise a line of signed
/// DIMACS literals ended by `0`.
pub trait SatBackend {
    fn run(&mut self, input: &Path, output: &Path) -> Result<()>;
}

/// Solver run as a child process: `program [args] input output`.
///
/// MiniSat and Glucose follow this convention.
#[derive(Clone, Debug)]
pub struct ExternalSolver {
    program: String,
    args: Vec<String>,
}

impl ExternalSolver {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &SolverConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
    }
}

impl SatBackend for ExternalSolver {
    fn run(&mut self, input: &Path, output: &Path) -> Result<()> {
        tracing::debug!(
            "running {} {} {} {}",
            self.program,
            self.args.join(" "),
            input.display(),
            output.display()
        );
        let result = Command::new(&self.program)
            .args(&self.args)
            .arg(input)
            .arg(output)
            .output()
            .map_err(|e| Error::solver_io(&self.program, e))
            .with_context(|| format!("cannot run solver '{}'", self.program))?;

        for line in String::from_utf8_lossy(&result.stdout).lines() {
            tracing::debug!(target: "sato::solver", "{line}");
        }
        // 10 and 20 are the SAT and UNSAT exit codes of the competition solvers
        match result.status.code() {
            Some(0 | 10 | 20) => {}
            _ => tracing::warn!(
                "solver '{}' exited with {}: {}",
                self.program,
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            ),
        }
        Ok(())
    }
}
