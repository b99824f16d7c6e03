// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! The ILP Oracle (§4.2): a thin adapter over an external mixed-integer
//! solver. The contract is deliberately narrow — assemble the matrix,
//! minimize, hand back `(status, objval, solution[])` — so swapping the
//! backend never touches the Problem Builder or the Blame Tracer.

use good_lp::{
    constraint, variable, Expression, ProblemVariables, Solution, SolverModel, Variable,
};
use log::{debug, warn};

use crate::problem::{Op, Problem};

const LOGNAME: &str = "depsolve::oracle";

/// Outcome of one oracle invocation (§4.2). `status == 0` means the
/// backend found an optimum; `solution[i]` is `1` iff variable `i` was
/// selected.
#[derive(Clone, Debug)]
pub struct OracleResult {
    pub status: i32,
    pub objval: u64,
    pub solution: Vec<u8>,
}

/// The abstract "external mixed-integer solver" of §4.2 — swappable so
/// tests can inject a canned result instead of running branch-and-bound.
pub trait IlpOracle {
    fn solve(&self, problem: &Problem) -> OracleResult;
}

/// The real backend: `good_lp` over its `microlp` feature (§4.2.1).
#[derive(Clone, Copy, Debug, Default)]
pub struct GoodLpOracle;

impl IlpOracle for GoodLpOracle {
    fn solve(&self, problem: &Problem) -> OracleResult {
        let total = problem.total();
        if total == 0 {
            debug!(target: LOGNAME, "zero-variable problem, short-circuiting");
            return OracleResult {
                status: 0,
                objval: 0,
                solution: Vec::new(),
            };
        }

        let mut vars = ProblemVariables::new();
        let xs: Vec<Variable> = (0..total).map(|_| vars.add(variable().binary())).collect();

        let objective: Expression = problem
            .obj
            .iter()
            .enumerate()
            .map(|(i, &coef)| coef as f64 * xs[i])
            .sum();

        let mut model = vars.minimise(objective).using(good_lp::microlp);

        for cond in &problem.conds {
            let lhs: Expression = cond.terms.iter().map(|&(v, coef)| coef as f64 * xs[v]).sum();
            model = match cond.op {
                Op::Eq => model.with(constraint!(lhs == cond.rhs as f64)),
                Op::Le => model.with(constraint!(lhs <= cond.rhs as f64)),
                Op::Ge => model.with(constraint!(lhs >= cond.rhs as f64)),
            };
        }

        match model.solve() {
            Ok(solution) => {
                let values: Vec<u8> = xs
                    .iter()
                    .map(|&v| if solution.value(v) > 0.5 { 1 } else { 0 })
                    .collect();
                let objval: u64 = problem
                    .obj
                    .iter()
                    .zip(values.iter())
                    .map(|(&coef, &v)| coef * v as u64)
                    .sum();
                OracleResult {
                    status: 0,
                    objval,
                    solution: values,
                }
            }
            Err(err) => {
                warn!(target: LOGNAME, "oracle failed to find a solution: {}", err);
                OracleResult {
                    status: 1,
                    objval: 0,
                    solution: Vec::new(),
                }
            }
        }
    }
}
