// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! §4.1.3–§4.1.6: the four rule-out phases. Each rules out candidates by
//! emitting `v == 0` via [`Builder::rule_out`]; none of them touch the
//! objective or the cardinality constraints already in place.

use indexmap::IndexMap;

use crate::candidate::{Candidate, CandidateIndex, CandidateSource, RepoType, Status};
use crate::problem::{Builder, ByPackage, ConstraintKind};
use crate::refs::satisfies_remote;

/// §4.1.3: a candidate that isn't an acceptable substitute for some direct
/// request of the same package is ruled out.
pub(super) fn satisfy_refs(builder: &mut Builder, candidates: &[Candidate], by_package: &ByPackage) {
    for (c_idx, c) in candidates.iter().enumerate() {
        if !c.direct {
            continue;
        }
        let siblings = match by_package.get(&c.package) {
            Some(v) => v,
            None => continue,
        };
        for &o_idx in siblings {
            if o_idx.0 == c_idx {
                continue;
            }
            let o = &candidates[o_idx.0];
            if !satisfies_remote(c, o) {
                builder.rule_out(
                    o_idx,
                    ConstraintKind::SatisfyRefs {
                        direct_index: CandidateIndex(c_idx),
                    },
                );
            }
        }
    }
}

/// §4.1.4: resolution failures are ruled out and feed the Blame Tracer's
/// `failed-res` state directly.
pub(super) fn resolution_failures(builder: &mut Builder, candidates: &[Candidate]) {
    for (i, c) in candidates.iter().enumerate() {
        if c.status == Status::Failed {
            builder.rule_out(CandidateIndex(i), ConstraintKind::OkResolution);
        }
    }
}

/// §4.1.5: an installed candidate that originated from CRAN/Bioconductor
/// shadows any other candidate offering the identical `(package, version)`,
/// preventing an unnecessary replacement of something already installed.
pub(super) fn prefer_installed(builder: &mut Builder, candidates: &[Candidate], by_package: &ByPackage) {
    for (i, c) in candidates.iter().enumerate() {
        let is_registry_install = matches!(
            &c.source,
            CandidateSource::Installed {
                repotype: Some(RepoType::Cran | RepoType::Bioc)
            }
        );
        if !is_registry_install {
            continue;
        }
        let Some(version) = &c.version else { continue };

        let siblings = match by_package.get(&c.package) {
            Some(v) => v,
            None => continue,
        };
        for &o_idx in siblings {
            if o_idx.0 == i {
                continue;
            }
            let o = &candidates[o_idx.0];
            if o.source.is_registry() && o.version.as_ref() == Some(version) {
                builder.rule_out(o_idx, ConstraintKind::PreferInstalled);
            }
        }
    }
}

/// §4.1.6: among registry candidates offering the same `(type, package,
/// version)`, prefer a binary over source, and prefer the `__linux__`
/// mirror when every candidate is source.
pub(super) fn prefer_binaries(builder: &mut Builder, candidates: &[Candidate], _by_package: &ByPackage) {
    let mut partitions: IndexMap<(String, String, String), Vec<usize>> = IndexMap::new();

    for (i, c) in candidates.iter().enumerate() {
        if !c.source.is_registry() {
            continue;
        }
        let Some(version) = &c.version else { continue };
        let key = (c.source.to_string(), c.package.to_string(), version.to_string());
        partitions.entry(key).or_default().push(i);
    }

    for members in partitions.values() {
        let preferred = members
            .iter()
            .find(|&&i| !candidates[i].platform.is_source())
            .or_else(|| members.iter().find(|&&i| candidates[i].mirror.contains("__linux__")));

        let Some(&preferred) = preferred else {
            continue;
        };

        for &i in members {
            if i != preferred {
                builder.rule_out(CandidateIndex(i), ConstraintKind::PreferBinary);
            }
        }
    }
}
