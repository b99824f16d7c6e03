// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! A dependency solver core for a package-installation planner.
//!
//! Given a flat table of candidate package artifacts ([`Candidate`]) and a
//! [`Policy`], [`Solver::solve`] encodes the problem as an integer linear
//! program, hands it to an ILP oracle, and either returns the selected
//! candidates or, if no satisfying subset exists, a [`FailureReport`] tracing
//! blame back to the direct packages that could not be installed.
//!
//! Resolution (producing the candidate table), downloading, building,
//! installing, and all outer-surface concerns (CLI, file configuration,
//! JSON export) live outside this crate.

pub mod candidate;
pub mod config;
pub mod errors;
pub mod oracle;
pub mod problem;
pub mod refs;
pub mod solution;
pub mod version;

mod blame;
mod solver;

pub use candidate::{
    Candidate, CandidateIndex, CandidateSource, DependencyEdge, DependencyKind, PackageName,
    Policy, Status,
};
pub use config::SolverConfig;
pub use errors::SolverError;
pub use oracle::{GoodLpOracle, IlpOracle};
pub use problem::{Constraint, ConstraintKind, Op, Problem};
pub use refs::satisfies_remote;
pub use solution::{FailureReport, FailureType, FailedCandidate, SolutionResult};
pub use solver::Solver;
pub use version::{Version, VersionError, VersionOp, version_satisfies};
