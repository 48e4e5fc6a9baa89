//! Propositional instances over named predicates.

pub mod dimacs;

use std::collections::HashMap;
use std::fmt;

use anyhow::Result;
use itertools::Itertools;

use crate::csp::PrimitiveComparison;
use crate::error::Error;
use crate::types::Int;

/// Named boolean of a SAT instance.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Predicate {
    /// Order predicate `var <= value`.
    Order { var: String, value: Int },
    /// Selector of the `literal`-th literal of the `clause`-th CSP clause.
    Selector { clause: usize, literal: usize },
}

impl Predicate {
    pub fn order(var: impl Into<String>, value: Int) -> Self {
        Predicate::Order {
            var: var.into(),
            value,
        }
    }

    pub fn is_selector(&self) -> bool {
        matches!(self, Predicate::Selector { .. })
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Order { var, value } => write!(f, "p({var},{value})"),
            Predicate::Selector { clause, literal } => write!(f, "q({clause},{literal})"),
        }
    }
}

/// Signed predicate.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Literal {
    pub predicate: Predicate,
    pub positive: bool,
}

impl Literal {
    pub fn pos(predicate: Predicate) -> Self {
        Literal {
            predicate,
            positive: true,
        }
    }

    pub fn neg(predicate: Predicate) -> Self {
        Literal {
            predicate,
            positive: false,
        }
    }

    pub fn negated(&self) -> Self {
        Literal {
            predicate: self.predicate.clone(),
            positive: !self.positive,
        }
    }
}

impl From<&PrimitiveComparison> for Literal {
    fn from(cmp: &PrimitiveComparison) -> Self {
        Literal {
            predicate: Predicate::order(cmp.var().name(), cmp.constant()),
            positive: cmp.sign(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.positive {
            write!(f, "{}", self.predicate)
        } else {
            write!(f, "-{}", self.predicate)
        }
    }
}

pub type Clause = Vec<Literal>;

/// SAT instance: an ordered set of predicates and a list of clauses.
///
/// The 1-based position of a predicate is its DIMACS variable number.
/// Predicates are registered in order of first appearance and never removed.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Sat {
    predicates: Vec<Predicate>,
    indices: HashMap<Predicate, usize>,
    clauses: Vec<Clause>,
}

impl Sat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instance with the given predicates registered and no clause.
    pub fn with_predicates(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        let mut sat = Self::new();
        for predicate in predicates {
            sat.register(predicate);
        }
        sat
    }

    /// Register the predicate if needed and return its DIMACS number.
    pub fn register(&mut self, predicate: Predicate) -> usize {
        if let Some(index) = self.indices.get(&predicate) {
            return *index;
        }
        self.predicates.push(predicate.clone());
        let index = self.predicates.len();
        self.indices.insert(predicate, index);
        index
    }

    /// Add a clause, registering its predicates.
    pub fn add_clause(&mut self, clause: Clause) {
        for literal in &clause {
            self.register(literal.predicate.clone());
        }
        self.clauses.push(clause);
    }

    /// Append a clause over already registered predicates.
    ///
    /// Fails with `UnknownBoolean` and leaves the instance unchanged if a
    /// literal names a predicate without a slot.
    pub fn add_registered_clause(&mut self, clause: Clause) -> Result<()> {
        for literal in &clause {
            self.index_of(&literal.predicate)?;
        }
        self.clauses.push(clause);
        Ok(())
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn num_predicates(&self) -> usize {
        self.predicates.len()
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// DIMACS number of a registered predicate.
    pub fn index_of(&self, predicate: &Predicate) -> Result<usize> {
        self.indices
            .get(predicate)
            .copied()
            .ok_or_else(|| Error::UnknownBoolean(predicate.to_string()).into())
    }

    /// Signed DIMACS number of a literal.
    pub fn to_dimacs(&self, literal: &Literal) -> Result<Int> {
        let index = self.index_of(&literal.predicate)? as Int;
        Ok(if literal.positive { index } else { -index })
    }

    /// Literal of a signed DIMACS number.
    pub fn from_dimacs(&self, number: Int) -> Result<Literal> {
        let out_of_range = || Error::IndexOutOfRange {
            index: number,
            max: self.predicates.len(),
        };
        let index = usize::try_from(number.unsigned_abs()).map_err(|_| out_of_range())?;
        let predicate = index
            .checked_sub(1)
            .and_then(|i| self.predicates.get(i))
            .ok_or_else(out_of_range)?;
        Ok(Literal {
            predicate: predicate.clone(),
            positive: number > 0,
        })
    }
}

impl fmt::Display for Sat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "B = {{{}}}", self.predicates.iter().join(", "))?;
        writeln!(f, "S = {{")?;
        for clause in &self.clauses {
            writeln!(f, "  [{}]", clause.iter().join(" "))?;
        }
        write!(f, "}}")
    }
}
