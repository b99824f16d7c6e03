// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! §4.1.1: objective coefficients.

use crate::candidate::{Candidate, CandidateSource, Platform, Policy, Status};
use crate::config::SolverConfig;
use crate::errors::SolverError;
use crate::problem::Builder;

pub(super) fn apply(
    builder: &mut Builder,
    candidates: &[Candidate],
    policy: Policy,
    config: &SolverConfig,
) -> Result<(), SolverError> {
    match policy {
        Policy::Lazy => lazy(builder, candidates, config),
        Policy::Upgrade => upgrade(builder, candidates, config),
    }

    // Slack variables always cost `dummy_cost`, for either policy.
    for v in candidates.len()..builder.obj.len() {
        builder.obj[v] = config.dummy_cost;
    }

    Ok(())
}

fn lazy(builder: &mut Builder, candidates: &[Candidate], config: &SolverConfig) {
    let w = config.lazy_weights;
    for (i, c) in candidates.iter().enumerate() {
        builder.obj[i] = if matches!(c.source, CandidateSource::Installed { .. }) {
            w.installed
        } else if c.platform.is_source() {
            w.source
        } else {
            w.binary
        };
    }
}

fn upgrade(builder: &mut Builder, candidates: &[Candidate], config: &SolverConfig) {
    let n = candidates.len();
    let base = (n as u64 + 1) * config.upgrade_rank_scale;
    for slot in builder.obj.iter_mut().take(n) {
        *slot = base;
    }

    // Step 2: rank versions within each package, newest = highest rank.
    let mut by_package: std::collections::HashMap<&str, Vec<usize>> = std::collections::HashMap::new();
    for (i, c) in candidates.iter().enumerate() {
        if c.status == Status::Ok && c.version.is_some() {
            by_package.entry(c.package.as_str()).or_default().push(i);
        }
    }

    for indices in by_package.values() {
        let mut sorted = indices.clone();
        sorted.sort_by(|&a, &b| candidates[a].version.cmp(&candidates[b].version));

        // Competition ranking: ties share the lowest rank among them.
        let mut ranks = vec![0u64; sorted.len()];
        let mut rank = 1u64;
        for pos in 0..sorted.len() {
            if pos > 0 && candidates[sorted[pos]].version != candidates[sorted[pos - 1]].version {
                rank = pos as u64 + 1;
            }
            ranks[pos] = rank;
        }
        let max_rank = *ranks.iter().max().unwrap_or(&1);

        let mut min_coef = u64::MAX;
        let mut assigned = Vec::with_capacity(sorted.len());
        for (pos, &idx) in sorted.iter().enumerate() {
            let coef = (max_rank - ranks[pos] + 1) * config.upgrade_rank_scale;
            assigned.push((idx, coef));
            min_coef = min_coef.min(coef);
        }
        for (idx, coef) in assigned {
            builder.obj[idx] = coef - min_coef;
        }
    }

    // Step 3: type/platform tiebreaker, applied to every candidate.
    let t = config.upgrade_tiebreak;
    for (i, c) in candidates.iter().enumerate() {
        let bump = if matches!(c.source, CandidateSource::Installed { .. }) {
            t.installed
        } else if c.platform.is_source() {
            t.source
        } else {
            t.binary
        };
        builder.obj[i] += bump;
    }

    // Step 4: subtract the global minimum so every coefficient is >= 0.
    if let Some(&min) = builder.obj[..n].iter().min() {
        for slot in builder.obj.iter_mut().take(n) {
            *slot -= min;
        }
    }
}

// Kept separate from `CandidateSource`/`Platform` so that a caller parsing
// a policy from user-facing text (config files, CLI flags — outside this
// crate's scope per §1) has somewhere to land an unrecognized string. A
// `Problem` can never itself be built with an unknown policy: `Policy` is a
// closed two-variant enum, so the only way to observe `UnknownPolicy` is
// through this conversion.
impl std::str::FromStr for Policy {
    type Err = SolverError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "lazy" => Ok(Policy::Lazy),
            "upgrade" => Ok(Policy::Upgrade),
            other => Err(SolverError::UnknownPolicy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{CandidateRef, DependencyKind, PackageName};
    use crate::version::Version;
    use std::collections::HashSet;

    fn candidate(
        pkg: &str,
        version: Option<&str>,
        source: CandidateSource,
        platform: Platform,
        status: Status,
    ) -> Candidate {
        Candidate {
            candidate_ref: CandidateRef::new(format!("{}::x", pkg)),
            package: PackageName::new(pkg),
            version: version.map(|v| v.parse::<Version>().unwrap()),
            source,
            platform,
            mirror: String::new(),
            direct: false,
            status,
            deps: Vec::new(),
            dep_types: HashSet::<DependencyKind>::new(),
            error: None,
        }
    }

    #[test]
    fn lazy_weights_follow_type_then_platform() {
        let candidates = vec![
            candidate(
                "a",
                Some("1.0"),
                CandidateSource::Installed { repotype: None },
                Platform::Source,
                Status::Ok,
            ),
            candidate(
                "b",
                Some("1.0"),
                CandidateSource::Cran,
                Platform::Source,
                Status::Ok,
            ),
            candidate(
                "c",
                Some("1.0"),
                CandidateSource::Cran,
                Platform::Binary("linux-x86_64".to_string()),
                Status::Ok,
            ),
        ];
        let mut builder = Builder::new(candidates.len(), 0);
        apply(&mut builder, &candidates, Policy::Lazy, &SolverConfig::default()).unwrap();
        assert_eq!(builder.obj, vec![0, 5, 1]);
    }

    #[test]
    fn upgrade_prefers_newest_within_package() {
        let candidates = vec![
            candidate(
                "a",
                Some("1.0"),
                CandidateSource::Cran,
                Platform::Binary("linux-x86_64".to_string()),
                Status::Ok,
            ),
            candidate(
                "a",
                Some("2.0"),
                CandidateSource::Cran,
                Platform::Binary("linux-x86_64".to_string()),
                Status::Ok,
            ),
            candidate(
                "a",
                Some("3.0"),
                CandidateSource::Cran,
                Platform::Binary("linux-x86_64".to_string()),
                Status::Ok,
            ),
        ];
        let mut builder = Builder::new(candidates.len(), 0);
        apply(
            &mut builder,
            &candidates,
            Policy::Upgrade,
            &SolverConfig::default(),
        )
        .unwrap();
        let newest = builder.obj[2];
        assert!(newest < builder.obj[1]);
        assert!(builder.obj[1] < builder.obj[0]);
    }

    #[test]
    fn upgrade_ties_share_minimum_rank() {
        let candidates = vec![
            candidate(
                "a",
                Some("1.0"),
                CandidateSource::Cran,
                Platform::Source,
                Status::Ok,
            ),
            candidate(
                "a",
                Some("1.0"),
                CandidateSource::Bioc,
                Platform::Source,
                Status::Ok,
            ),
            candidate(
                "a",
                Some("2.0"),
                CandidateSource::Cran,
                Platform::Source,
                Status::Ok,
            ),
        ];
        let mut builder = Builder::new(candidates.len(), 0);
        apply(
            &mut builder,
            &candidates,
            Policy::Upgrade,
            &SolverConfig::default(),
        )
        .unwrap();
        // The two 1.0 candidates share the same pre-tiebreak rank; both
        // used `Source` platform, so their final coefficients match too.
        assert_eq!(builder.obj[0], builder.obj[1]);
        assert!(builder.obj[2] < builder.obj[0]);
    }

    #[test]
    fn slack_variables_always_cost_dummy() {
        let candidates = vec![candidate(
            "a",
            Some("1.0"),
            CandidateSource::Cran,
            Platform::Source,
            Status::Ok,
        )];
        let mut builder = Builder::new(candidates.len(), 1);
        apply(&mut builder, &candidates, Policy::Lazy, &SolverConfig::default()).unwrap();
        assert_eq!(builder.obj[1], SolverConfig::default().dummy_cost);
    }
}
