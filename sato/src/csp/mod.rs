//! Constraint satisfaction problems over bounded integer variables.

mod comparison;
mod expression;
mod variable;

use std::fmt;
use std::rc::Rc;

use itertools::Itertools;

pub use comparison::Comparison;
pub use comparison::Inequation;
pub use comparison::PrimitiveComparison;
pub use expression::LinearExpression;
pub use expression::LinearTerm;
pub use variable::IntegerVariable;

/// A CSP: a set of integer variables and a conjunction of clauses.
///
/// Each clause is a disjunction of canonical inequations.
/// The problem is immutable once built.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Csp {
    variables: Vec<Rc<IntegerVariable>>,
    clauses: Vec<Vec<Inequation>>,
}

impl Csp {
    pub fn new(
        variables: Vec<Rc<IntegerVariable>>,
        clauses: Vec<Vec<Inequation>>,
    ) -> Self {
        Self { variables, clauses }
    }

    /// Variables in declaration order.
    pub fn variables(&self) -> &[Rc<IntegerVariable>] {
        &self.variables
    }

    pub fn clauses(&self) -> &[Vec<Inequation>] {
        &self.clauses
    }

    /// Return the variable with the given name.
    pub fn variable(&self, name: &str) -> Option<&Rc<IntegerVariable>> {
        self.variables.iter().find(|v| v.name() == name)
    }
}

/// Same syntax as the parser input, so a printed CSP can be parsed back.
impl fmt::Display for Csp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let declarations = self.variables.iter().map(|v| v.declaration());
        let clauses = self
            .clauses
            .iter()
            .map(|clause| format!("[{}]", clause.iter().join(" ")));
        write!(f, "{}", declarations.chain(clauses).join(" "))
    }
}
