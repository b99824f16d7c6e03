// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Top-level entry point: build the Problem, hand it to an oracle, and
//! either return the selection or recover a Failure Report (§7).

use std::collections::HashSet;

use log::{info, warn};

use crate::blame;
use crate::candidate::{Candidate, CandidateIndex, PackageName, Policy};
use crate::config::SolverConfig;
use crate::errors::SolverError;
use crate::oracle::{GoodLpOracle, IlpOracle};
use crate::problem::Problem;
use crate::solution::SolutionResult;

const LOGNAME: &str = "depsolve::solver";

/// Solves one candidate table against one [`Policy`], wrapping the
/// Problem Builder, an [`IlpOracle`], and the Blame Tracer. Generic over
/// the oracle so tests can supply a canned one instead of `good_lp`.
pub struct Solver<O: IlpOracle = GoodLpOracle> {
    oracle: O,
    config: SolverConfig,
}

impl Solver<GoodLpOracle> {
    pub fn new(config: SolverConfig) -> Self {
        Solver {
            oracle: GoodLpOracle,
            config,
        }
    }
}

impl<O: IlpOracle> Solver<O> {
    pub fn with_oracle(oracle: O, config: SolverConfig) -> Self {
        Solver { oracle, config }
    }

    /// Build, solve, and (if infeasible) trace blame for `candidates`
    /// under `policy`. `base_packages` is the externally-supplied set
    /// §4.1.7 strips from dependency edges.
    pub fn solve(
        &self,
        candidates: &[Candidate],
        policy: Policy,
        base_packages: &HashSet<PackageName>,
    ) -> Result<SolutionResult, SolverError> {
        info!(
            target: LOGNAME,
            "solving {} candidates under {} policy",
            candidates.len(),
            policy
        );

        let problem = Problem::build(candidates, policy, base_packages, &self.config)?;
        let result = self.oracle.solve(&problem);

        if result.status != 0 {
            return Err(SolverError::OracleFailed { status: result.status });
        }

        if result.objval >= self.config.dummy_cost.saturating_sub(1) {
            warn!(
                target: LOGNAME,
                "infeasible: objective {} indicates a slack variable was used",
                result.objval
            );
            let failures = blame::trace(&problem, candidates, &result.solution);
            return Ok(SolutionResult::Failed {
                problem,
                raw_solution: result.solution,
                failures,
            });
        }

        let selected_indices: HashSet<CandidateIndex> = result
            .solution
            .iter()
            .enumerate()
            .take(problem.num_candidates)
            .filter(|(_, &v)| v == 1)
            .map(|(i, _)| CandidateIndex(i))
            .collect();

        Ok(SolutionResult::Ok {
            selected_indices,
            problem,
            raw_solution: result.solution,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{CandidateRef, CandidateSource, DependencyKind, Platform, Status};
    use crate::oracle::OracleResult;

    struct MockOracle(OracleResult);

    impl IlpOracle for MockOracle {
        fn solve(&self, _problem: &Problem) -> OracleResult {
            self.0.clone()
        }
    }

    fn candidate(r: &str, pkg: &str, direct: bool) -> Candidate {
        Candidate {
            candidate_ref: CandidateRef::new(r),
            package: PackageName::new(pkg),
            version: Some("1.0".parse().unwrap()),
            source: CandidateSource::Cran,
            platform: Platform::Source,
            mirror: String::new(),
            direct,
            status: Status::Ok,
            deps: Vec::new(),
            dep_types: std::collections::HashSet::<DependencyKind>::new(),
            error: None,
        }
    }

    #[test]
    fn ok_result_collects_selected_indices() {
        let candidates = vec![candidate("cran::foo", "foo", true)];
        let oracle = MockOracle(OracleResult {
            status: 0,
            objval: 0,
            solution: vec![1, 0],
        });
        let solver = Solver::with_oracle(oracle, SolverConfig::default());
        let result = solver
            .solve(&candidates, Policy::Lazy, &HashSet::new())
            .unwrap();
        assert!(result.is_ok());
        match result {
            SolutionResult::Ok { selected_indices, .. } => {
                assert_eq!(selected_indices, HashSet::from([CandidateIndex(0)]));
            }
            SolutionResult::Failed { .. } => panic!("expected Ok"),
        }
    }

    #[test]
    fn oracle_failure_status_becomes_solver_error() {
        let candidates = vec![candidate("cran::foo", "foo", true)];
        let oracle = MockOracle(OracleResult {
            status: 1,
            objval: 0,
            solution: vec![],
        });
        let solver = Solver::with_oracle(oracle, SolverConfig::default());
        let err = solver
            .solve(&candidates, Policy::Lazy, &HashSet::new())
            .unwrap_err();
        assert!(matches!(err, SolverError::OracleFailed { status: 1 }));
    }

    #[test]
    fn dummy_cost_objective_triggers_blame_trace() {
        let mut c = candidate("cran::foo", "foo", true);
        c.status = Status::Failed;
        c.version = None;
        let candidates = vec![c];
        let oracle = MockOracle(OracleResult {
            status: 0,
            objval: SolverConfig::default().dummy_cost,
            solution: vec![0, 1],
        });
        let solver = Solver::with_oracle(oracle, SolverConfig::default());
        let result = solver
            .solve(&candidates, Policy::Lazy, &HashSet::new())
            .unwrap();
        match result {
            SolutionResult::Failed { failures, .. } => {
                assert_eq!(failures.failed.len(), 1);
            }
            SolutionResult::Ok { .. } => panic!("expected Failed"),
        }
    }

    // End-to-end scenarios against the real `good_lp` oracle, one per
    // numbered case in §8's "end-to-end scenarios" list.
    mod end_to_end {
        use super::*;
        use crate::candidate::DependencyEdge;
        use crate::solution::FailureType;
        use crate::version::{Version, VersionOp};

        fn version(v: &str) -> Version {
            v.parse().unwrap()
        }

        /// Surfaces the `log`-based tracing these tests exercise under
        /// `cargo test -- --nocapture`, without requiring every test binary
        /// in the suite to install a global logger redundantly.
        fn init_logger() {
            let _ = env_logger::builder().is_test(true).try_init();
        }

        fn objective_of(result: &SolutionResult) -> u64 {
            let (problem, raw) = match result {
                SolutionResult::Ok {
                    problem,
                    raw_solution,
                    ..
                } => (problem, raw_solution),
                SolutionResult::Failed {
                    problem,
                    raw_solution,
                    ..
                } => (problem, raw_solution),
            };
            problem
                .obj
                .iter()
                .zip(raw.iter())
                .map(|(&coef, &v)| coef * v as u64)
                .sum()
        }

        #[test]
        fn trivial_installed_candidate_is_selected_at_zero_cost() {
            init_logger();
            let mut c = candidate("installed::foo", "foo", true);
            c.source = CandidateSource::Installed { repotype: None };
            let candidates = vec![c];

            let solver = Solver::new(SolverConfig::default());
            let result = solver
                .solve(&candidates, Policy::Lazy, &HashSet::new())
                .unwrap();

            assert!(result.is_ok());
            assert_eq!(objective_of(&result), 0);
            match result {
                SolutionResult::Ok { selected_indices, .. } => {
                    assert_eq!(selected_indices, HashSet::from([CandidateIndex(0)]));
                }
                SolutionResult::Failed { .. } => unreachable!(),
            }
        }

        #[test]
        fn binary_beats_source_for_the_same_version() {
            init_logger();
            let mut src = candidate("cran::a-src", "a", true);
            src.platform = Platform::Source;
            let mut bin = candidate("cran::a-bin", "a", true);
            bin.platform = Platform::Binary("linux-x86_64".to_string());
            let candidates = vec![src, bin];

            let solver = Solver::new(SolverConfig::default());
            let result = solver
                .solve(&candidates, Policy::Lazy, &HashSet::new())
                .unwrap();

            match result {
                SolutionResult::Ok { selected_indices, .. } => {
                    assert_eq!(selected_indices, HashSet::from([CandidateIndex(1)]));
                }
                SolutionResult::Failed { .. } => panic!("expected Ok"),
            }
        }

        #[test]
        fn upgrade_policy_selects_the_newest_candidate() {
            init_logger();
            let mut v1 = candidate("cran::a1", "a", true);
            v1.version = Some(version("1.0"));
            v1.platform = Platform::Binary("linux-x86_64".to_string());
            let mut v2 = candidate("cran::a2", "a", true);
            v2.version = Some(version("2.0"));
            v2.platform = Platform::Binary("linux-x86_64".to_string());
            let mut v3 = candidate("cran::a3", "a", true);
            v3.version = Some(version("3.0"));
            v3.platform = Platform::Binary("linux-x86_64".to_string());
            let candidates = vec![v1, v2, v3];

            let solver = Solver::new(SolverConfig::default());
            let result = solver
                .solve(&candidates, Policy::Upgrade, &HashSet::new())
                .unwrap();

            match result {
                SolutionResult::Ok { selected_indices, .. } => {
                    assert_eq!(selected_indices, HashSet::from([CandidateIndex(2)]));
                }
                SolutionResult::Failed { .. } => panic!("expected Ok"),
            }
        }

        #[test]
        fn unsatisfied_version_requirement_fails_with_dep_failed() {
            init_logger();
            let dep = DependencyEdge::new(
                CandidateRef::new("cran::b"),
                PackageName::new("b"),
                DependencyKind::Depends,
                CandidateSource::Standard,
            )
            .with_requirement(VersionOp::Ge, version("2.0"));
            let mut a = candidate("cran::a", "a", true);
            a.deps = vec![dep];
            a.dep_types = std::collections::HashSet::from([DependencyKind::Depends]);
            let mut b = candidate("cran::b", "b", false);
            b.version = Some(version("1.0"));
            let candidates = vec![a, b];

            let solver = Solver::new(SolverConfig::default());
            let result = solver
                .solve(&candidates, Policy::Lazy, &HashSet::new())
                .unwrap();

            match result {
                SolutionResult::Failed { failures, .. } => {
                    assert_eq!(failures.failed.len(), 1);
                    let a_failure = &failures.failed[0];
                    assert_eq!(a_failure.package, PackageName::new("a"));
                    assert_eq!(a_failure.failure_type, FailureType::DepFailed);
                    assert!(a_failure.failure_message.iter().any(|m| m.contains("cran::b")));
                }
                SolutionResult::Ok { .. } => panic!("expected Failed"),
            }
        }

        #[test]
        fn transitive_resolution_failure_blames_the_whole_chain() {
            init_logger();
            let dep_b = DependencyEdge::new(
                CandidateRef::new("cran::b"),
                PackageName::new("b"),
                DependencyKind::Depends,
                CandidateSource::Standard,
            );
            let dep_c = DependencyEdge::new(
                CandidateRef::new("cran::c"),
                PackageName::new("c"),
                DependencyKind::Depends,
                CandidateSource::Standard,
            );
            let mut a = candidate("cran::a", "a", true);
            a.deps = vec![dep_b];
            a.dep_types = std::collections::HashSet::from([DependencyKind::Depends]);
            let mut b = candidate("cran::b", "b", false);
            b.deps = vec![dep_c];
            b.dep_types = std::collections::HashSet::from([DependencyKind::Depends]);
            let mut c = candidate("cran::c", "c", false);
            c.status = Status::Failed;
            c.version = None;
            c.error = Some("download failed".to_string());
            let candidates = vec![a, b, c];

            let solver = Solver::new(SolverConfig::default());
            let result = solver
                .solve(&candidates, Policy::Lazy, &HashSet::new())
                .unwrap();

            match result {
                SolutionResult::Failed { failures, .. } => {
                    assert_eq!(failures.failed.len(), 3);
                    let by_pkg: std::collections::HashMap<_, _> = failures
                        .failed
                        .iter()
                        .map(|f| (f.package.as_str(), f))
                        .collect();
                    assert_eq!(by_pkg["c"].failure_type, FailureType::FailedRes);
                    assert_eq!(by_pkg["b"].failure_type, FailureType::DepFailed);
                    assert_eq!(by_pkg["a"].failure_type, FailureType::DepFailed);

                    let rendered = failures.render(&candidates);
                    assert!(rendered.contains("cran::a"));
                    assert!(rendered.contains("cran::b"));
                    assert!(rendered.contains("cran::c"));
                }
                SolutionResult::Ok { .. } => panic!("expected Failed"),
            }
        }

        #[test]
        fn conflicting_direct_refs_for_the_same_package_fail() {
            init_logger();
            let mut cran = candidate("cran::a", "a", true);
            cran.source = CandidateSource::Cran;
            let mut bioc = candidate("bioc::a", "a", true);
            bioc.source = CandidateSource::Bioc;
            let candidates = vec![cran, bioc];

            let solver = Solver::new(SolverConfig::default());
            let result = solver
                .solve(&candidates, Policy::Lazy, &HashSet::new())
                .unwrap();

            match result {
                SolutionResult::Failed { failures, .. } => {
                    assert!(!failures.failed.is_empty());
                    assert!(failures
                        .failed
                        .iter()
                        .all(|f| f.failure_type == FailureType::SatisfyDirect));
                }
                SolutionResult::Ok { .. } => panic!("expected Failed"),
            }
        }
    }
}
