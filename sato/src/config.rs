use std::path::PathBuf;

use clap::ValueEnum;

/// Environment variable naming the default solver program.
pub const SOLVER_ENV: &str = "SATO_SOLVER";

/// Solver used when `SATO_SOLVER` is not set.
pub const DEFAULT_SOLVER: &str = "glucose";

pub const DEFAULT_INPUT: &str = "sat.dimacs";
pub const DEFAULT_OUTPUT: &str = "output.txt";

/// How a found model is excluded before looking for the next one.
#[derive(ValueEnum, Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum BlockingMode {
    /// Negate every literal of the raw model, selectors included.
    #[default]
    FullAssignment,
    /// Negate only the order predicates, so that each integer solution is
    /// reported once.
    Projected,
}

/// Configuration of the solve loop.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SolverConfig {
    /// Solver executable, called as `program [args] input output`.
    pub program: String,
    pub args: Vec<String>,
    /// DIMACS input artifact.
    pub input: PathBuf,
    /// Artifact written by the solver.
    pub output: PathBuf,
    /// Second comment line of the DIMACS artifact.
    pub comment: String,
    pub blocking: BlockingMode,
    /// Stop enumerating after this many solutions.
    pub max_solutions: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let program = std::env::var(SOLVER_ENV)
            .ok()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_SOLVER.to_string());
        SolverConfig {
            program,
            args: Vec::new(),
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            comment: String::new(),
            blocking: BlockingMode::default(),
            max_solutions: None,
        }
    }
}

impl SolverConfig {
    /// Default configuration exchanging artifacts in the given directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        SolverConfig {
            input: dir.join(DEFAULT_INPUT),
            output: dir.join(DEFAULT_OUTPUT),
            ..Self::default()
        }
    }
}
