// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! `satisfies_remote` (§4.1.3): whether one candidate is an acceptable
//! substitute for another. Exhaustive over [`CandidateSource`] so adding a
//! new source variant forces a decision here.

use crate::candidate::{Candidate, CandidateRef, CandidateSource};

/// Is `other` an acceptable substitute for a request of `wanted_source`
/// identified by `wanted_ref`?
///
/// The lower-level form behind [`satisfies_remote`]: it takes a source/ref
/// pair instead of a whole [`Candidate`] so a [`crate::candidate::DependencyEdge`]
/// (which carries its own `requested_source` rather than an adjacent
/// `Candidate`) can be checked against a table of candidates without first
/// materializing a stand-in `Candidate` for itself.
pub fn satisfies_source(wanted_source: &CandidateSource, wanted_ref: &CandidateRef, other: &Candidate) -> bool {
    if *wanted_ref == other.candidate_ref {
        return true;
    }

    match wanted_source {
        CandidateSource::Installed { .. } => false,
        CandidateSource::Cran => matches!(other.source, CandidateSource::Cran),
        CandidateSource::Bioc => matches!(other.source, CandidateSource::Bioc),
        CandidateSource::Standard => other.source.is_registry(),
        CandidateSource::Github { repo } => match &other.source {
            CandidateSource::Github { repo: other_repo } => repo == other_repo,
            _ => false,
        },
        CandidateSource::Url => false,
        CandidateSource::Local => false,
        CandidateSource::Deps => matches!(other.source, CandidateSource::Deps),
    }
}

/// Is `other` an acceptable substitute for `wanted`?
///
/// Identical refs always qualify — a candidate trivially substitutes for
/// itself — then each [`CandidateSource`] variant narrows further per the
/// table in §4.1.3.
pub fn satisfies_remote(wanted: &Candidate, other: &Candidate) -> bool {
    satisfies_source(&wanted.source, &wanted.candidate_ref, other)
}
