//! Relational literals: `lhs <op> rhs` over linear expressions.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::csp::IntegerVariable;
use crate::csp::LinearExpression;
use crate::error::Error;
use crate::types::Int;

static RELATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)(<=|>=|!=|<|>|=)(.*)$").unwrap());

static TERM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<coeff>\d+)?(?:\*?(?P<var>[A-Za-z][A-Za-z0-9_]*))?$").unwrap()
});

/// Relation between the two sides of a literal.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Relation {
    Le,
    Lt,
    Ge,
    Gt,
    Eq,
    Ne,
}

impl FromStr for Relation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<=" => Ok(Relation::Le),
            "<" => Ok(Relation::Lt),
            ">=" => Ok(Relation::Ge),
            ">" => Ok(Relation::Gt),
            "=" => Ok(Relation::Eq),
            "!=" => Ok(Relation::Ne),
            _ => Err(Error::invalid(s, "unknown relation")),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Relation::Le => "<=",
            Relation::Lt => "<",
            Relation::Ge => ">=",
            Relation::Gt => ">",
            Relation::Eq => "=",
            Relation::Ne => "!=",
        };
        write!(f, "{s}")
    }
}

/// A literal with both sides moved to the left: `expression <rel> constant`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Relational {
    pub expression: LinearExpression,
    pub relation: Relation,
    pub constant: Int,
}

/// Parse `lhs <rel> rhs` and move every variable term to the left side.
pub fn parse_relational(
    literal: &str,
    vars: &[Rc<IntegerVariable>],
) -> Result<Relational> {
    let caps = RELATION
        .captures(literal)
        .ok_or_else(|| Error::invalid(literal, "no relation found"))?;
    let relation: Relation = caps[2].parse()?;
    let (lhs, rhs) = (&caps[1], &caps[3]);
    if rhs.contains(['<', '>', '=', '!']) {
        return Err(Error::invalid(literal, "more than one relation").into());
    }
    let (lhs_pairs, lhs_constant) = parse_side(lhs, vars)?;
    let (rhs_pairs, rhs_constant) = parse_side(rhs, vars)?;
    let pairs = lhs_pairs
        .into_iter()
        .chain(rhs_pairs.into_iter().map(|(v, a)| (v, -a)));
    let expression = LinearExpression::from_pairs(pairs)
        .map_err(|_| Error::invalid(literal, "constant out of range"))?;
    let constant = rhs_constant
        .checked_sub(lhs_constant)
        .ok_or_else(|| Error::invalid(literal, "constant out of range"))?;
    Ok(Relational {
        expression,
        relation,
        constant,
    })
}

/// Parse one side of a literal such as `-x+2y-3`.
///
/// Return the `(variable, coefficient)` pairs in order of appearance and the
/// sum of the constant terms.
pub fn parse_side(
    side: &str,
    vars: &[Rc<IntegerVariable>],
) -> Result<(Vec<(Rc<IntegerVariable>, Int)>, Int)> {
    let side: String = side.chars().filter(|c| !c.is_whitespace()).collect();
    if side.is_empty() {
        return Err(Error::invalid(side, "empty side").into());
    }
    let mut pairs = Vec::new();
    let mut constant: Int = 0;
    for chunk in split_terms(&side) {
        let (negative, body) = match chunk.strip_prefix('-') {
            Some(body) => (true, body),
            None => (false, chunk.strip_prefix('+').unwrap_or(chunk)),
        };
        let caps = TERM
            .captures(body)
            .filter(|c| c.name("coeff").is_some() || c.name("var").is_some())
            .ok_or_else(|| Error::invalid(chunk, "malformed term"))?;
        let magnitude: Int = match caps.name("coeff") {
            Some(m) => m
                .as_str()
                .parse()
                .map_err(|_| Error::invalid(chunk, "coefficient out of range"))?,
            None => 1,
        };
        let value = if negative { -magnitude } else { magnitude };
        match caps.name("var") {
            Some(name) => {
                if value == 0 {
                    return Err(
                        Error::invalid(chunk, "coefficient cannot equal 0").into()
                    );
                }
                let var = vars
                    .iter()
                    .find(|v| v.name() == name.as_str())
                    .ok_or_else(|| Error::UnknownVariable(name.as_str().to_string()))?;
                pairs.push((var.clone(), value));
            }
            None => {
                constant = constant
                    .checked_add(value)
                    .ok_or_else(|| Error::invalid(chunk, "constant out of range"))?;
            }
        }
    }
    Ok((pairs, constant))
}

/// Split before every `+` or `-` that is not the leading character.
fn split_terms(side: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    for (i, c) in side.char_indices() {
        if i > start && (c == '+' || c == '-') {
            chunks.push(&side[start..i]);
            start = i;
        }
    }
    chunks.push(&side[start..]);
    chunks
}
