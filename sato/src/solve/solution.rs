use std::fmt;

use crate::types::Int;

/// Value given to one integer variable.
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub struct Assignment {
    name: String,
    value: Int,
}

impl Assignment {
    pub fn new(name: impl Into<String>, value: Int) -> Self {
        Assignment {
            name: name.into(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Int {
        self.value
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}

/// Decoded solution, one assignment per variable in declaration order.
///
/// ```text
/// x = 0
/// y = 1
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Debug, Default)]
pub struct Solution {
    assignments: Vec<Assignment>,
}

impl Solution {
    pub fn new(assignments: Vec<Assignment>) -> Self {
        Self { assignments }
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Value of the named variable.
    pub fn get(&self, name: &str) -> Option<Int> {
        self.assignments
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value)
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, assignment) in self.assignments.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{assignment}")?;
        }
        Ok(())
    }
}
