use std::fmt;

use anyhow::Result;

use crate::error::Error;
use crate::types::Int;

/// Integer variable with the inclusive domain `[lb, ub]`.
///
/// ```text
/// x 0 5
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct IntegerVariable {
    name: String,
    lb: Int,
    ub: Int,
}

impl IntegerVariable {
    /// Create a variable with the given bounds.
    ///
    /// Return an `Error` if the lower bound is greater than the upper bound,
    /// or if `lb - 1` is not representable.
    pub fn new(name: impl Into<String>, lb: Int, ub: Int) -> Result<Self> {
        let name = name.into();
        if lb > ub {
            return Err(Error::Parse(format!(
                "empty domain [{lb}, {ub}] for variable '{name}'"
            ))
            .into());
        }
        if lb == Int::MIN {
            return Err(Error::Parse(format!(
                "lower bound {lb} of variable '{name}' is out of range"
            ))
            .into());
        }
        Ok(IntegerVariable { name, lb, ub })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lb(&self) -> Int {
        self.lb
    }

    pub fn ub(&self) -> Int {
        self.ub
    }

    pub fn bounds(&self) -> (Int, Int) {
        (self.lb, self.ub)
    }

    /// Number of values in the domain.
    pub fn size(&self) -> u64 {
        self.lb.abs_diff(self.ub) + 1
    }

    pub fn contains(&self, value: Int) -> bool {
        self.lb <= value && value <= self.ub
    }

    /// Declaration as accepted by the parser: `name lb ub`.
    pub fn declaration(&self) -> String {
        format!("{} {} {}", self.name, self.lb, self.ub)
    }
}

impl fmt::Display for IntegerVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
