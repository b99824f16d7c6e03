// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! The Blame Tracer (§4.3): turns an infeasible solve into a structured
//! [`FailureReport`] by replaying the constraint list against the raw
//! solution and walking a per-candidate state machine to a fixed point.

use std::collections::{HashMap, HashSet, VecDeque};

use log::debug;

use crate::candidate::{Candidate, CandidateIndex};
use crate::problem::{ConstraintKind, Problem};
use crate::solution::{FailedCandidate, FailureReport, FailureType};

const LOGNAME: &str = "depsolve::blame";

#[derive(Clone, Copy, Eq, Debug, Hash, PartialEq)]
enum State {
    MaybeGood,
    Installed,
    FailedRes,
    SatisfyDirect,
    Conflict,
    DepFailed,
    CouldBe,
}

impl State {
    fn is_fail(self) -> bool {
        matches!(
            self,
            State::FailedRes | State::SatisfyDirect | State::Conflict | State::DepFailed
        )
    }

    fn failure_type(self) -> Option<FailureType> {
        match self {
            State::FailedRes => Some(FailureType::FailedRes),
            State::SatisfyDirect => Some(FailureType::SatisfyDirect),
            State::Conflict => Some(FailureType::Conflict),
            State::DepFailed => Some(FailureType::DepFailed),
            _ => None,
        }
    }
}

/// Build a [`FailureReport`] from a [`Problem`] and the oracle's raw
/// solution. Caller is responsible for only invoking this when
/// `objval >= dummy_cost - 1` (§4.3's entry condition).
pub fn trace(problem: &Problem, candidates: &[Candidate], solution: &[u8]) -> FailureReport {
    let n = problem.num_candidates;
    let mut state = vec![State::MaybeGood; n];
    let mut notes: Vec<Vec<String>> = vec![Vec::new(); n];
    let mut downstream: Vec<Vec<String>> = vec![Vec::new(); n];

    // Step 1: installed.
    for i in 0..n {
        if solution.get(i).copied().unwrap_or(0) == 1 {
            state[i] = State::Installed;
        }
    }

    // Step 2: ok-resolution.
    for cond in &problem.conds {
        if let ConstraintKind::OkResolution = &cond.kind {
            let idx = cond.subject();
            if state[idx.0] == State::MaybeGood {
                state[idx.0] = State::FailedRes;
                if let Some(msg) = &candidates[idx.0].error {
                    notes[idx.0].push(msg.clone());
                } else {
                    notes[idx.0].push("resolution failed".to_string());
                }
            }
        }
    }

    // Step 3: satisfy-refs.
    for cond in &problem.conds {
        if let ConstraintKind::SatisfyRefs { direct_index } = &cond.kind {
            let idx = cond.subject();
            if state[idx.0] == State::MaybeGood {
                state[idx.0] = State::SatisfyDirect;
                notes[idx.0].push(format!(
                    "does not satisfy direct request {}",
                    candidates[direct_index.0].candidate_ref
                ));
            }
        }
    }

    // Step 4: at-most-once conflicts.
    for cond in &problem.conds {
        if let ConstraintKind::AtMostOnce { .. } = &cond.kind {
            let winner = cond
                .terms
                .iter()
                .find(|&&(v, _)| solution.get(v).copied().unwrap_or(0) == 1);
            let Some(&(winner_var, _)) = winner else {
                continue;
            };
            for &(v, _) in &cond.terms {
                if v != winner_var && v < n && state[v] == State::MaybeGood {
                    state[v] = State::Conflict;
                    notes[v].push(format!(
                        "lost to {} in the same package",
                        candidates[winner_var].candidate_ref
                    ));
                }
            }
        }
    }

    // Step 5: dependency transitive closure via a reverse-adjacency worklist.
    let mut good_cands: Vec<(CandidateIndex, HashSet<CandidateIndex>, String)> = Vec::new();
    // reverse_adj[j] = list of indices into `good_cands` whose good set contains j
    let mut reverse_adj: HashMap<usize, Vec<usize>> = HashMap::new();

    for cond in &problem.conds {
        if let ConstraintKind::Dependency {
            upstream,
            dependency_ref,
            good_candidates,
            ..
        } = &cond.kind
        {
            let gi = good_cands.len();
            for j in good_candidates {
                reverse_adj.entry(j.0).or_default().push(gi);
            }
            good_cands.push((*upstream, good_candidates.iter().copied().collect(), dependency_ref.to_string()));
        }
    }

    let mut worklist: VecDeque<usize> = VecDeque::new();

    // First pass: empty good_cands at construction time.
    for (gi, (upstream, good, dep_ref)) in good_cands.iter().enumerate() {
        if good.is_empty() && state[upstream.0] == State::MaybeGood {
            state[upstream.0] = State::DepFailed;
            notes[upstream.0].push(format!("Cannot install dependency {}", dep_ref));
            downstream[upstream.0].push(dep_ref.clone());
            worklist.push_back(gi);
        }
    }

    // Seed the worklist with every constraint touching a candidate already
    // in a FAILS state, so step 5's closure starts from a consistent view.
    for i in 0..n {
        if state[i].is_fail() {
            if let Some(affected) = reverse_adj.get(&i) {
                for &gi in affected {
                    worklist.push_back(gi);
                }
            }
        }
    }

    while let Some(gi) = worklist.pop_front() {
        let (upstream, dep_ref) = {
            let (upstream, good, dep_ref) = &mut good_cands[gi];
            good.retain(|j| !state[j.0].is_fail());
            (*upstream, dep_ref.clone())
        };
        let still_empty = good_cands[gi].1.is_empty();
        if still_empty && state[upstream.0] == State::MaybeGood {
            state[upstream.0] = State::DepFailed;
            notes[upstream.0].push(format!("Cannot install dependency {}", dep_ref));
            downstream[upstream.0].push(dep_ref);
            if let Some(affected) = reverse_adj.get(&upstream.0) {
                for &next in affected {
                    worklist.push_back(next);
                }
            }
        }
    }

    // Step 6: remaining maybe-good become could-be (no FailureType; not part
    // of the report, but tracked for completeness of the state machine).
    for s in state.iter_mut() {
        if *s == State::MaybeGood {
            *s = State::CouldBe;
        }
    }

    debug!(
        target: LOGNAME,
        "blame trace complete: {} candidates in a failing state",
        state.iter().filter(|s| s.is_fail()).count()
    );

    // Step 7: build the report, ordered by candidate index for determinism.
    let mut failed: Vec<FailedCandidate> = Vec::new();
    for i in 0..n {
        if let Some(failure_type) = state[i].failure_type() {
            failed.push(FailedCandidate {
                index: CandidateIndex(i),
                candidate_ref: candidates[i].candidate_ref.clone(),
                package: candidates[i].package.clone(),
                failure_type,
                failure_message: notes[i].clone(),
                failure_down: downstream[i].clone(),
            });
        }
    }

    FailureReport { failed }
}
