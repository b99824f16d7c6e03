// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! What [`crate::Solver::solve`] hands back (§6): either the selected
//! candidates, or a structured [`FailureReport`] the Blame Tracer produced.

use std::collections::HashSet;
use std::fmt;

use crate::candidate::{CandidateIndex, CandidateRef, PackageName};
use crate::problem::Problem;

/// Which rule-out state (§4.3) put a candidate into the Failure Report.
#[derive(Clone, Copy, Eq, Debug, Hash, PartialEq)]
pub enum FailureType {
    FailedRes,
    SatisfyDirect,
    Conflict,
    DepFailed,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            FailureType::FailedRes => "failed-res",
            FailureType::SatisfyDirect => "satisfy-direct",
            FailureType::Conflict => "conflict",
            FailureType::DepFailed => "dep-failed",
        };
        write!(f, "{}", s)
    }
}

/// One blamed candidate (§3's "Failure Report").
#[derive(Clone, Debug)]
pub struct FailedCandidate {
    pub index: CandidateIndex,
    pub candidate_ref: CandidateRef,
    pub package: PackageName,
    pub failure_type: FailureType,
    pub failure_message: Vec<String>,
    /// Dependency refs whose absence this candidate's failure traces back
    /// to — empty unless `failure_type == DepFailed`.
    pub failure_down: Vec<String>,
}

/// The full blame trace for an infeasible solve.
#[derive(Clone, Debug)]
pub struct FailureReport {
    pub failed: Vec<FailedCandidate>,
}

impl FailureReport {
    /// Render one bullet per directly-requested failed candidate,
    /// depth-first through `failure_down`, deduplicating by index (§4.3).
    pub fn render(&self, candidates: &[crate::candidate::Candidate]) -> String {
        let mut out = String::new();
        let mut seen: HashSet<usize> = HashSet::new();

        let by_ref: std::collections::HashMap<&str, &FailedCandidate> = self
            .failed
            .iter()
            .map(|f| (f.candidate_ref.as_str(), f))
            .collect();

        for f in &self.failed {
            if candidates[f.index.0].direct {
                render_bullet(f, &by_ref, &mut seen, &mut out, 0);
            }
        }
        // Anything not reachable from a direct failure still gets reported.
        for f in &self.failed {
            if !seen.contains(&f.index.0) {
                render_bullet(f, &by_ref, &mut seen, &mut out, 0);
            }
        }
        out
    }
}

fn render_bullet(
    f: &FailedCandidate,
    by_ref: &std::collections::HashMap<&str, &FailedCandidate>,
    seen: &mut HashSet<usize>,
    out: &mut String,
    depth: usize,
) {
    if !seen.insert(f.index.0) {
        return;
    }
    let indent = "  ".repeat(depth);
    out.push_str(&format!(
        "{}- {} ({}): {}\n",
        indent,
        f.candidate_ref,
        f.failure_type,
        f.failure_message.join("; ")
    ));
    for dep_ref in &f.failure_down {
        if let Some(next) = by_ref.get(dep_ref.as_str()) {
            render_bullet(next, by_ref, seen, out, depth + 1);
        }
    }
}

/// The outcome of one `solve` call (§6).
#[derive(Clone, Debug)]
pub enum SolutionResult {
    Ok {
        selected_indices: HashSet<CandidateIndex>,
        problem: Problem,
        raw_solution: Vec<u8>,
    },
    Failed {
        problem: Problem,
        raw_solution: Vec<u8>,
        failures: FailureReport,
    },
}

impl SolutionResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, SolutionResult::Ok { .. })
    }

    pub fn problem(&self) -> &Problem {
        match self {
            SolutionResult::Ok { problem, .. } => problem,
            SolutionResult::Failed { problem, .. } => problem,
        }
    }
}
