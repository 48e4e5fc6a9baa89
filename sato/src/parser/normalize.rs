//! Rewriting of relational literals into canonical inequations.
//!
//! A literal yields [Alternatives]: a disjunction of conjunctions of
//! canonical `expression <= constant` forms. The alternatives of the literals
//! of one clause are then distributed into conjunctive normal form.

use std::rc::Rc;

use anyhow::Result;

use crate::csp::Inequation;
use crate::csp::IntegerVariable;
use crate::error::Error;
use crate::parser::literal::parse_relational;
use crate::parser::literal::Relation;
use crate::product::cartesian_product;
use crate::types::Int;

/// Disjunction of conjunctions of canonical inequations.
pub type Alternatives = Vec<Vec<Inequation>>;

/// Normalize a literal string into its canonical alternatives.
pub fn normalize(
    literal: &str,
    vars: &[Rc<IntegerVariable>],
) -> Result<Alternatives> {
    normalize_signed(literal.trim(), true, vars)
}

fn normalize_signed(
    literal: &str,
    positive: bool,
    vars: &[Rc<IntegerVariable>],
) -> Result<Alternatives> {
    if let Some(inner) = strip_negation(literal) {
        return normalize_signed(inner.trim(), !positive, vars);
    }
    let rel = parse_relational(literal, vars)?;
    let (e, k) = (rel.expression, rel.constant);
    let le = |c| Inequation::le(e.clone(), c);
    let below = || -> Result<Int> {
        k.checked_sub(1)
            .ok_or_else(|| Error::invalid(literal, "constant out of range").into())
    };
    let alternatives = match rel.relation {
        Relation::Le => vec![vec![le(k)]],
        Relation::Gt => vec![vec![le(k).negated()]],
        Relation::Lt => vec![vec![le(below()?)]],
        Relation::Ge => vec![vec![le(below()?).negated()]],
        Relation::Eq => vec![vec![le(k), le(below()?).negated()]],
        Relation::Ne => vec![vec![le(below()?)], vec![le(k).negated()]],
    };
    Ok(if positive {
        alternatives
    } else {
        negate(&alternatives)
    })
}

/// Content of a `-( … )` wrapper, if the whole literal is wrapped.
fn strip_negation(literal: &str) -> Option<&str> {
    let inner = literal.strip_prefix("-(")?.strip_suffix(')')?;
    // the opening parenthesis must be closed by the last character
    let mut depth = 0i32;
    for c in inner.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return None;
        }
    }
    (depth == 0).then_some(inner)
}

/// Negation of a disjunction of conjunctions (De Morgan).
pub fn negate(alternatives: &Alternatives) -> Alternatives {
    cartesian_product(alternatives)
        .into_iter()
        .map(|pick| dedup(pick.into_iter().map(Inequation::negated)))
        .collect()
}

/// Conjunctive normal form of a disjunction of alternatives.
///
/// `(A∧B) ∨ (C∧D)` gives `(A∨C) ∧ (A∨D) ∧ (B∨C) ∧ (B∨D)`.
pub fn to_cnf(alternatives: &Alternatives) -> Vec<Vec<Inequation>> {
    cartesian_product(alternatives)
        .into_iter()
        .map(|pick| dedup(pick.into_iter()))
        .collect()
}

/// Disjunction of two CNFs, distributed back into CNF.
///
/// `None` stands for the identity of the disjunction (no literal yet).
pub fn distribute(
    acc: Option<Vec<Vec<Inequation>>>,
    cnf: Vec<Vec<Inequation>>,
) -> Vec<Vec<Inequation>> {
    let Some(acc) = acc else {
        return cnf;
    };
    let mut result = Vec::with_capacity(acc.len() * cnf.len());
    for left in &acc {
        for right in &cnf {
            result.push(dedup(left.iter().chain(right).cloned()));
        }
    }
    result
}

fn dedup(forms: impl Iterator<Item = Inequation>) -> Vec<Inequation> {
    let mut result: Vec<Inequation> = Vec::new();
    for form in forms {
        if !result.contains(&form) {
            result.push(form);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use itertools::Itertools;

    use super::*;
    use crate::types::Int;

    fn vars() -> Vec<Rc<IntegerVariable>> {
        vec![
            Rc::new(IntegerVariable::new("x", -1, 3).unwrap()),
            Rc::new(IntegerVariable::new("y", 0, 4).unwrap()),
        ]
    }

    fn holds(alternatives: &Alternatives, values: &HashMap<&str, Int>) -> bool {
        let value_of = |name: &str| values[name];
        alternatives
            .iter()
            .any(|conj| conj.iter().all(|ineq| ineq.eval(value_of)))
    }

    fn cnf_holds(cnf: &[Vec<Inequation>], values: &HashMap<&str, Int>) -> bool {
        let value_of = |name: &str| values[name];
        cnf.iter()
            .all(|clause| clause.iter().any(|ineq| ineq.eval(value_of)))
    }

    /// Check `normalize(literal)` against `expected` on every assignment.
    fn verify_all(literal: &str, expected: impl Fn(Int, Int) -> bool) {
        let vars = vars();
        let alternatives = normalize(literal, &vars).unwrap();
        for x in vars[0].lb()..=vars[0].ub() {
            for y in vars[1].lb()..=vars[1].ub() {
                let values = HashMap::from([("x", x), ("y", y)]);
                assert_eq!(
                    holds(&alternatives, &values),
                    expected(x, y),
                    "{literal} with x={x}, y={y}"
                );
                assert_eq!(
                    cnf_holds(&to_cnf(&alternatives), &values),
                    expected(x, y),
                    "cnf of {literal} with x={x}, y={y}"
                );
            }
        }
    }

    #[test]
    fn relations() {
        verify_all("x+y<=3", |x, y| x + y <= 3);
        verify_all("x-y<2", |x, y| x - y < 2);
        verify_all("2x>=y", |x, y| 2 * x >= y);
        verify_all("x>y-1", |x, y| x > y - 1);
        verify_all("x=y", |x, y| x == y);
        verify_all("x!=y", |x, y| x != y);
        verify_all("x+1=2y-3", |x, y| x + 1 == 2 * y - 3);
        verify_all("-x+y>=-3", |x, y| -x + y >= -3);
    }

    #[test]
    fn negations() {
        verify_all("-(x+y<1)", |x, y| x + y >= 1);
        verify_all("-(-x+y>=-3)", |x, y| -x + y < -3);
        verify_all("-(x=y)", |x, y| x != y);
        verify_all("-(x!=y)", |x, y| x == y);
        verify_all("-(-(x<=2))", |x, _| x <= 2);
    }

    #[test]
    fn canonical_shapes() -> Result<()> {
        let vars = vars();
        let eq = normalize("x=y", &vars)?;
        assert_eq!(eq.len(), 1);
        assert_eq!(eq[0].iter().join(" "), "x-y<=0 -(x-y<=-1)");

        let ne = normalize("x!=y", &vars)?;
        assert_eq!(ne.len(), 2);
        assert_eq!(ne.iter().map(|c| c.iter().join(" ")).join(" | "), "x-y<=-1 | -(x-y<=0)");
        Ok(())
    }

    #[test]
    fn distribution() -> Result<()> {
        let vars = vars();
        let a = to_cnf(&normalize("x=y", &vars)?);
        let b = to_cnf(&normalize("x<=0", &vars)?);
        let cnf = distribute(Some(distribute(None, a)), b);
        assert_eq!(cnf.len(), 2);
        for x in vars[0].lb()..=vars[0].ub() {
            for y in vars[1].lb()..=vars[1].ub() {
                let values = HashMap::from([("x", x), ("y", y)]);
                assert_eq!(cnf_holds(&cnf, &values), x == y || x <= 0);
            }
        }
        Ok(())
    }

    #[test]
    fn unbalanced_negation_is_not_stripped() {
        assert_eq!(strip_negation("-(x<=1)"), Some("x<=1"));
        assert_eq!(strip_negation("-(x<=1)+(y<=2)"), None);
        assert_eq!(strip_negation("-x<=1"), None);
    }
}
