//! Textual results.

use crate::solve::Outcome;
use crate::solve::Solution;

/// Message to indicate the problem is unsatisfiable.
pub const UNSAT: &str = "=====UNSATISFIABLE=====";

/// Message to indicate the end of a solution.
pub const END_OF_SOLUTION: &str = "----------";

/// Message to indicate all solutions have been found.
pub const END_OF_SEARCH: &str = "==========";

/// Solution lines followed by the end of solution marker.
pub fn solution_output(solution: &Solution) -> String {
    let mut output = String::new();
    for assignment in solution.assignments() {
        output += assignment.to_string().as_str();
        output += "\n";
    }
    output += END_OF_SOLUTION;
    output
}

/// Create a string representing the output of a single solve.
pub fn make_output(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Sat(solution) => solution_output(solution),
        Outcome::Unsat => UNSAT.to_string(),
    }
}

/// Create a string representing the output of an enumeration.
///
/// `complete` tells whether the search ran until unsatisfiability.
pub fn make_enumeration_output(solutions: &[Solution], complete: bool) -> String {
    if solutions.is_empty() && complete {
        return UNSAT.to_string();
    }
    let mut lines: Vec<String> = solutions.iter().map(solution_output).collect();
    if complete {
        lines.push(END_OF_SEARCH.to_string());
    }
    lines.join("\n")
}
