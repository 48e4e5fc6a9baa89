//! DIMACS CNF codec.
//!
//! ```text
//! c Created from SAT object
//! c <comment>
//! c
//! p cnf 3 2
//! 1 -2 0
//! 3 0
//! ```

use anyhow::Context;
use anyhow::Result;

use crate::error::Error;
use crate::sat::Literal;
use crate::sat::Predicate;
use crate::sat::Sat;
use crate::types::Int;

/// First comment line of every generated file.
pub const ORIGIN: &str = "Created from SAT object";

/// Serialize the instance in DIMACS CNF format.
///
/// Fails if a clause refers to an unregistered predicate.
pub fn write_dimacs(sat: &Sat, comment: &str) -> Result<String> {
    let comment = comment.replace(['\r', '\n'], " ");
    let mut content = format!(
        "c {ORIGIN}\nc {comment}\nc\np cnf {} {}\n",
        sat.num_predicates(),
        sat.num_clauses()
    );
    for (i, clause) in sat.clauses().iter().enumerate() {
        let numbers = clause
            .iter()
            .map(|literal| sat.to_dimacs(literal))
            .collect::<Result<Vec<Int>>>()
            .with_context(|| format!("clause {i} cannot be exported"))?;
        // every literal is followed by a space, so an empty clause is "0"
        content.extend(numbers.iter().map(|number| format!("{number} ")));
        content.push_str("0\n");
    }
    Ok(content)
}

/// Numeric content of a DIMACS CNF file.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Cnf {
    pub num_vars: usize,
    pub clauses: Vec<Vec<Int>>,
}

/// Parse DIMACS CNF text.
pub fn parse_cnf(text: &str) -> Result<Cnf> {
    let mut header: Option<(usize, usize)> = None;
    let mut clauses = Vec::new();
    let mut current = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line == "c" || line.starts_with("c ") {
            continue;
        }
        if let Some(rest) = line.strip_prefix("p ") {
            header = Some(parse_header(rest).with_context(|| format!("line {}", n + 1))?);
            continue;
        }
        if header.is_none() {
            return Err(Error::Parse(format!("clause before header at line {}", n + 1)).into());
        }
        for token in line.split_whitespace() {
            let number: Int = token.parse().map_err(|_| {
                Error::Parse(format!("invalid literal '{token}' at line {}", n + 1))
            })?;
            if number == 0 {
                clauses.push(std::mem::take(&mut current));
            } else {
                current.push(number);
            }
        }
    }
    let (num_vars, num_clauses) =
        header.ok_or_else(|| Error::Parse("missing 'p cnf' header".to_string()))?;
    if !current.is_empty() {
        return Err(Error::Parse("last clause is not terminated by 0".to_string()).into());
    }
    if clauses.len() != num_clauses {
        return Err(Error::Parse(format!(
            "header announces {num_clauses} clauses, found {}",
            clauses.len()
        ))
        .into());
    }
    if let Some(lit) = clauses.iter().flatten().find(|l| l.unsigned_abs() as usize > num_vars) {
        return Err(Error::IndexOutOfRange {
            index: *lit,
            max: num_vars,
        }
        .into());
    }
    Ok(Cnf { num_vars, clauses })
}

fn parse_header(rest: &str) -> Result<(usize, usize)> {
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    match tokens.as_slice() {
        ["cnf", vars, clauses] => {
            let vars = vars.parse().map_err(|_| Error::Parse(format!("invalid count '{vars}'")))?;
            let clauses = clauses
                .parse()
                .map_err(|_| Error::Parse(format!("invalid count '{clauses}'")))?;
            Ok((vars, clauses))
        }
        _ => Err(Error::Parse(format!("invalid header 'p {rest}'")).into()),
    }
}

/// Rebuild a SAT instance from DIMACS text and the predicate names it was
/// written with.
pub fn read_dimacs(text: &str, predicates: Vec<Predicate>) -> Result<Sat> {
    let cnf = parse_cnf(text)?;
    if cnf.num_vars != predicates.len() {
        return Err(Error::Parse(format!(
            "header announces {} variables, {} names given",
            cnf.num_vars,
            predicates.len()
        ))
        .into());
    }
    let mut sat = Sat::with_predicates(predicates);
    for clause in cnf.clauses {
        let literals = clause
            .into_iter()
            .map(|number| sat.from_dimacs(number))
            .collect::<Result<Vec<Literal>>>()?;
        sat.add_registered_clause(literals)?;
    }
    Ok(sat)
}

/// Verdict read from the solver output artifact.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SolverOutput {
    Unsat,
    /// Signed DIMACS numbers of the model, without the final `0`.
    Sat(Vec<Int>),
}

/// Parse the output artifact of the solver.
///
/// Accepts an empty file or `UNSAT` for unsatisfiability, and a line of
/// signed integers ended by `0` for a model, optionally preceded by a `SAT`
/// line. The competition shape (`s SATISFIABLE`, `v ... 0`) is accepted too.
pub fn parse_solver_output(text: &str) -> Result<SolverOutput> {
    let mut model = Vec::new();
    let mut satisfiable = false;
    for line in text.lines() {
        let line = line.trim();
        let mut tokens = line.split_whitespace().peekable();
        match tokens.peek().copied() {
            None | Some("c") => continue,
            Some("UNSAT") | Some("UNSATISFIABLE") => return Ok(SolverOutput::Unsat),
            Some("SAT") | Some("SATISFIABLE") => {
                satisfiable = true;
                continue;
            }
            Some("s") => match line {
                "s UNSATISFIABLE" => return Ok(SolverOutput::Unsat),
                "s SATISFIABLE" => {
                    satisfiable = true;
                    continue;
                }
                _ => return Err(Error::Parse(format!("solver gave no verdict: '{line}'")).into()),
            },
            Some("INDET") | Some("UNKNOWN") => {
                return Err(Error::Parse(format!("solver gave no verdict: '{line}'")).into())
            }
            Some("v") => {
                tokens.next();
            }
            Some(_) => {}
        }
        for token in tokens {
            let number: Int = token
                .parse()
                .map_err(|_| Error::Parse(format!("invalid model literal '{token}'")))?;
            if number == 0 {
                return Ok(SolverOutput::Sat(model));
            }
            model.push(number);
        }
    }
    if model.is_empty() && !satisfiable {
        Ok(SolverOutput::Unsat)
    } else {
        Ok(SolverOutput::Sat(model))
    }
}
