//! Parsing of problem text into a [Csp].
//!
//! ```text
//! x 1 3 y -1 0 [x+y<1] [-(-x+y>=-3)]
//! ```
//!
//! Variable declarations `name lb ub` and bracketed clauses may be
//! interleaved. Each clause is a whitespace-separated disjunction of
//! relational literals.

pub mod literal;
pub mod normalize;

use std::rc::Rc;

use anyhow::Context;
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::csp::Csp;
use crate::csp::Inequation;
use crate::csp::IntegerVariable;
use crate::error::Error;
use crate::parser::normalize::distribute;
use crate::parser::normalize::normalize;
use crate::parser::normalize::to_cnf;
use crate::types::Int;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap());

/// Parse a problem text into a new [Csp].
pub fn parse_csp(text: &str) -> Result<Csp> {
    let (declarations, clauses) = split_clauses(text)?;
    let variables = parse_declarations(&declarations)?;

    let mut constraints = Vec::new();
    for (k, body) in clauses.iter().enumerate() {
        let cnf = parse_clause(body, &variables)
            .with_context(|| format!("clause {k}: [{body}]"))?;
        constraints.extend(cnf);
    }
    let csp = Csp::new(variables, constraints);
    tracing::debug!(
        "parsed CSP with {} variables and {} clauses",
        csp.variables().len(),
        csp.clauses().len()
    );
    Ok(csp)
}

/// Separate the bracketed clause bodies from the declaration text.
fn split_clauses(text: &str) -> Result<(String, Vec<String>)> {
    let mut declarations = String::new();
    let mut clauses = Vec::new();
    let mut current: Option<String> = None;
    for c in text.chars() {
        match c {
            '[' if current.is_some() => {
                return Err(Error::Parse("nested '[' in clause".to_string()).into())
            }
            '[' => {
                current = Some(String::new());
                declarations.push(' ');
            }
            ']' => {
                let body = current
                    .take()
                    .ok_or_else(|| Error::Parse("unmatched ']'".to_string()))?;
                clauses.push(body);
                declarations.push(' ');
            }
            c => match current.as_mut() {
                Some(body) => body.push(c),
                None => declarations.push(c),
            },
        }
    }
    if current.is_some() {
        return Err(Error::Parse("unterminated clause, missing ']'".to_string()).into());
    }
    Ok((declarations, clauses))
}

/// Parse the `name lb ub` triples left once clauses are removed.
fn parse_declarations(text: &str) -> Result<Vec<Rc<IntegerVariable>>> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut variables: Vec<Rc<IntegerVariable>> = Vec::new();
    for chunk in tokens.chunks(3) {
        let [name, lb, ub] = chunk else {
            return Err(Error::Parse(format!(
                "malformed variable declaration '{}'",
                chunk.join(" ")
            ))
            .into());
        };
        if !IDENTIFIER.is_match(name) {
            return Err(Error::Parse(format!("invalid variable name '{name}'")).into());
        }
        if variables.iter().any(|v| v.name() == *name) {
            return Err(Error::Parse(format!("variable '{name}' declared twice")).into());
        }
        let lb = parse_bound(name, lb)?;
        let ub = parse_bound(name, ub)?;
        let var = IntegerVariable::new(*name, lb, ub)
            .with_context(|| format!("declaration of '{name}'"))?;
        variables.push(Rc::new(var));
    }
    Ok(variables)
}

fn parse_bound(name: &str, token: &str) -> Result<Int> {
    token.parse().map_err(|_| {
        Error::Parse(format!("invalid bound '{token}' for variable '{name}'")).into()
    })
}

/// Parse the body of one clause into CNF over canonical inequations.
pub fn parse_clause(
    body: &str,
    variables: &[Rc<IntegerVariable>],
) -> Result<Vec<Vec<Inequation>>> {
    let literals: Vec<&str> = body
        .split_whitespace()
        .map(|l| l.trim_matches(|c| c == '\'' || c == '"'))
        .filter(|l| !l.is_empty())
        .collect();
    if literals.is_empty() {
        return Err(Error::Parse("empty clause".to_string()).into());
    }
    let mut acc = None;
    for literal in literals {
        let alternatives = normalize(literal, variables)
            .with_context(|| format!("literal '{literal}'"))?;
        acc = Some(distribute(acc, to_cnf(&alternatives)));
    }
    Ok(acc.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::error::kind;

    #[test]
    fn declarations_and_clauses() -> Result<()> {
        let csp = parse_csp("x 1 3 y -1 0 [x+y<1] [-(-x+y>=-3)]")?;
        let names: Vec<_> = csp.variables().iter().map(|v| v.declaration()).collect();
        assert_eq!(names, vec!["x 1 3", "y -1 0"]);
        assert_eq!(csp.clauses().len(), 2);
        assert_eq!(csp.clauses()[0].iter().join(" "), "x+y<=0");
        assert_eq!(csp.clauses()[1].iter().join(" "), "-x+y<=-4");
        Ok(())
    }

    #[test]
    fn interleaved_declarations() -> Result<()> {
        let csp = parse_csp("x 0 2 [x<=1] y 0 2 [x-y<=-1 -x+y<=-1]")?;
        assert_eq!(csp.variables().len(), 2);
        assert_eq!(csp.variable("y").map(|v| v.bounds()), Some((0, 2)));
        assert_eq!(csp.clauses().len(), 2);
        assert_eq!(csp.clauses()[1].len(), 2);
        Ok(())
    }

    #[test]
    fn equality_in_clause_is_distributed() -> Result<()> {
        let csp = parse_csp("x 0 1 y 0 1 [x=y x<=0]")?;
        let clauses: Vec<String> = csp.clauses().iter().map(|c| c.iter().join(" ")).collect();
        assert_eq!(clauses, vec!["x-y<=0 x<=0", "-(x-y<=-1) x<=0"]);
        Ok(())
    }

    #[test]
    fn round_trip() -> Result<()> {
        let inputs = [
            "x 0 2 y 0 2 [x-y<=-1 -x+y<=-1] [x+y<=7]",
            "x 0 1 y 0 1 [x!=y] [x=y]",
            "a -3 3 b_2 0 4 [2a-3b_2>5 -(a=b_2)] [a<b_2]",
        ];
        for input in inputs {
            let csp = parse_csp(input)?;
            let printed = csp.to_string();
            let reparsed = parse_csp(&printed)?;
            assert_eq!(reparsed, csp, "{input} printed as {printed}");
        }
        Ok(())
    }

    #[test]
    fn parse_errors() {
        let cases = [
            "x 0",
            "x 3 1 [x<=1]",
            "x 0 a [x<=1]",
            "1x 0 1 [1x<=1]",
            "x 0 1 x 0 2",
            "x 0 1 [x<=1",
            "x 0 1 x<=1]",
            "x 0 1 [[x<=1]]",
            "x 0 1 []",
        ];
        for input in cases {
            let err = parse_csp(input).unwrap_err();
            assert!(matches!(kind(&err), Some(Error::Parse(_))), "{input}: {err:#}");
        }
    }

    #[test]
    fn errors_carry_context() {
        let err = parse_csp("x 0 1 [x<=1] [x+w<=1]").unwrap_err();
        assert!(matches!(kind(&err), Some(Error::UnknownVariable(_))));
        let message = format!("{err:#}");
        assert!(message.contains("clause 1"), "{message}");
        assert!(message.contains("literal 'x+w<=1'"), "{message}");

        let err = parse_csp("x 0 1 [x<<1]").unwrap_err();
        assert!(matches!(kind(&err), Some(Error::InvalidExpression { .. })));
    }

    #[test]
    fn constants_out_of_range() {
        let cases = [
            "x 0 1 [x-1<=9223372036854775807]",
            "x 0 2 [9223372036854775807x<=1]",
            "x 0 1 [x+1<-9223372036854775807]",
            "x 0 1 [x+1>=-9223372036854775807]",
            "x 0 1 y 0 1 [4611686018427387904x+4611686018427387904y<=0]",
            "x 0 1 [x+9223372036854775807+1<=0]",
        ];
        for input in cases {
            let err = parse_csp(input).unwrap_err();
            assert!(
                matches!(kind(&err), Some(Error::InvalidExpression { .. })),
                "{input}: {err:#}"
            );
        }
        let err = parse_csp("x -9223372036854775808 0 [x<=0]").unwrap_err();
        assert!(matches!(kind(&err), Some(Error::Parse(_))), "{err:#}");
        assert!(parse_csp("x 0 1 [x<=9223372036854775807]").is_ok());
    }
}
