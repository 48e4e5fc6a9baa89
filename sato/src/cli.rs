//! Command line interface.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::config::BlockingMode;
use crate::config::SolverConfig;
use crate::config::DEFAULT_INPUT;
use crate::config::DEFAULT_OUTPUT;
use crate::output::make_enumeration_output;
use crate::output::make_output;
use crate::parser::parse_csp;
use crate::solve::Solver;
use crate::solve::State;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Solve finite-domain CSPs with a SAT solver through the order encoding.",
    long_about = None,
    after_help = "Example: sato -a x 0 2 y 0 2 [x-y<=-1 -x+y<=-1] [x+y<=7]"
)]
pub struct Args {
    /// Report all solutions
    #[arg(short, long)]
    pub all_solutions: bool,

    /// Stop after N solutions
    #[arg(short = 'n', long, value_name = "N")]
    pub max_solutions: Option<usize>,

    /// DIMACS file given to the solver, must end with .dimacs
    #[arg(short = 'f', long, value_name = "FILE", default_value = DEFAULT_INPUT, value_parser = dimacs_path)]
    pub dimacs: PathBuf,

    /// File where the solver writes its result
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Comment written in the DIMACS file
    #[arg(short, long, value_name = "TEXT", default_value = "")]
    pub comment: String,

    /// Show the intermediate CSP and SAT instances and the solver output
    #[arg(short, long)]
    pub verbose: bool,

    /// Solver program, called as `PROGRAM [ARGS] input output` [default: $SATO_SOLVER or glucose]
    #[arg(long, value_name = "PROGRAM")]
    pub solver: Option<String>,

    /// Extra argument given to the solver, can be repeated
    #[arg(long = "solver-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub solver_args: Vec<String>,

    /// How found models are excluded when enumerating
    #[arg(long, value_enum, default_value_t = BlockingMode::FullAssignment)]
    pub blocking: BlockingMode,

    /// Only write the DIMACS file
    #[arg(long)]
    pub dimacs_only: bool,

    /// Logging level to use: one of "error", "warn", "info", "debug", "trace"
    #[arg(long, default_value = "warn")]
    pub log_level: tracing::Level,

    /// Read the problem from a file
    #[arg(long = "problem", value_name = "FILE", conflicts_with = "problem")]
    pub problem_file: Option<PathBuf>,

    /// Problem: variable declarations `x 0 5` and clauses `[x+y<=3 x!=y]`
    #[arg(value_name = "PROBLEM", trailing_var_arg = true, allow_hyphen_values = true)]
    pub problem: Vec<String>,
}

fn dimacs_path(s: &str) -> Result<PathBuf, String> {
    if s.ends_with(".dimacs") {
        Ok(PathBuf::from(s))
    } else {
        Err(format!("'{s}' does not end with .dimacs"))
    }
}

impl Args {
    /// Solver configuration described by the arguments.
    pub fn solver_config(&self) -> SolverConfig {
        let mut config = SolverConfig {
            args: self.solver_args.clone(),
            input: self.dimacs.clone(),
            output: self.output.clone(),
            comment: self.comment.clone(),
            blocking: self.blocking,
            max_solutions: self.max_solutions,
            ..SolverConfig::default()
        };
        if let Some(program) = &self.solver {
            config.program = program.clone();
        }
        config
    }

    /// Effective logging level.
    pub fn level(&self) -> tracing::Level {
        if self.verbose && self.log_level != tracing::Level::TRACE {
            tracing::Level::DEBUG
        } else {
            self.log_level
        }
    }

    fn problem_text(&self) -> anyhow::Result<String> {
        match &self.problem_file {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("cannot read problem file {}", path.display())),
            None => {
                anyhow::ensure!(!self.problem.is_empty(), "no problem given");
                Ok(self.problem.join(" "))
            }
        }
    }
}

/// Return command line args.
pub fn parse_args() -> Args {
    Args::parse()
}

/// Install a subscriber printing logs on stderr.
pub fn init_logging(args: &Args) -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(args.level())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Run the solver with the given args.
pub fn run(args: &Args) -> anyhow::Result<()> {
    let text = args.problem_text()?;
    let csp = parse_csp(&text).context("invalid problem")?;
    tracing::debug!("CSP: {csp}");

    let mut solver = Solver::external(csp, args.solver_config())?;
    tracing::debug!("SAT:\n{}", solver.sat());

    if args.dimacs_only {
        return solver.export_dimacs();
    }
    if args.all_solutions || args.max_solutions.is_some() {
        let solutions = solver.enumerate()?;
        let complete = solver.state() == State::Unsat;
        println!("{}", make_enumeration_output(&solutions, complete));
    } else {
        let outcome = solver.solve()?;
        println!("{}", make_output(&outcome));
    }
    Ok(())
}
