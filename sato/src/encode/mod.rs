//! Compilation of a CSP into a SAT instance with the order encoding.

mod axiom;
mod order;

use anyhow::Context;
use anyhow::Result;
use itertools::Itertools;

use crate::csp::Csp;
use crate::csp::PrimitiveComparison;
use crate::sat::Clause;
use crate::sat::Literal;
use crate::sat::Predicate;
use crate::sat::Sat;

pub use axiom::axioms;
pub use order::combinations_with_sum;
pub use order::encode_inequation;
pub use order::PrimitiveCnf;

/// Encode the CSP into an equisatisfiable SAT instance.
///
/// Each CSP clause `k` gets one selector `q(k,i)` per literal: the clause
/// `[q(k,0) ... q(k,m-1)]` plus `[-q(k,i)] ∪ C` for every clause `C` of the
/// CNF of literal `i`. The axioms of every variable come last.
pub fn encode(csp: &Csp) -> Result<Sat> {
    let span = tracing::span!(tracing::Level::DEBUG, "ENCODING");
    let _span = span.enter();

    let mut sat = Sat::new();
    for (k, clause) in csp.clauses().iter().enumerate() {
        let fragments = clause
            .iter()
            .map(encode_inequation)
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("while encoding clause {k}: [{}]", clause.iter().join(" ")))?;
        for sat_clause in select_clause(k, &fragments) {
            sat.add_clause(sat_clause);
        }
    }
    for var in csp.variables() {
        for axiom in axioms(var) {
            sat.add_clause(to_clause(&axiom));
        }
    }
    tracing::debug!(
        "SAT instance: {} booleans, {} clauses",
        sat.num_predicates(),
        sat.num_clauses()
    );
    Ok(sat)
}

/// Clauses selecting at least one of the CNF fragments of CSP clause `k`.
fn select_clause(k: usize, fragments: &[PrimitiveCnf]) -> Vec<Clause> {
    let selector = |i| Predicate::Selector {
        clause: k,
        literal: i,
    };
    let mut clauses = vec![(0..fragments.len()).map(|i| Literal::pos(selector(i))).collect()];
    for (i, fragment) in fragments.iter().enumerate() {
        for sub_clause in fragment {
            let mut clause = vec![Literal::neg(selector(i))];
            clause.extend(to_clause(sub_clause));
            clauses.push(clause);
        }
    }
    clauses
}

fn to_clause(comparisons: &[PrimitiveComparison]) -> Clause {
    comparisons.iter().map(Literal::from).collect()
}
