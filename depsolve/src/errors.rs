// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

use thiserror::Error;

use crate::candidate::CandidateIndex;
use crate::version::VersionError;

/// Fatal errors raised by [`crate::Solver::solve`].
///
/// `Infeasible` is intentionally absent here: an ILP that the oracle solves
/// to optimality but whose objective indicates no real solution exists is
/// recovered into a [`crate::FailureReport`], not raised. See §7.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("solve was invoked without a target library configured")]
    NoLibrary,

    #[error("candidate table is stale and must be re-resolved")]
    StaleResolution,

    #[error("unknown policy: {0}")]
    UnknownPolicy(String),

    #[error(transparent)]
    InvalidVersion(#[from] VersionError),

    #[error("ILP oracle failed with status {status}")]
    OracleFailed { status: i32 },

    #[error("candidate index {0:?} is out of bounds for this problem")]
    IndexOutOfBounds(CandidateIndex),
}
