// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! §4.1.7: dependency constraints, the last and largest of the seven
//! phases — for every still-viable candidate, pin its choice to at least
//! one still-good candidate of each dependency it carries.

use crate::candidate::{Candidate, CandidateIndex, DependencyKind, Status};
use crate::problem::{BasePackages, Builder, ByPackage, Constraint, ConstraintKind, Op};
use crate::refs::satisfies_source;
use crate::version::version_satisfies;

pub(super) fn apply(
    builder: &mut Builder,
    candidates: &[Candidate],
    by_package: &ByPackage,
    base_packages: &BasePackages,
) {
    for (i, c) in candidates.iter().enumerate() {
        if c.status != Status::Ok || builder.ruled_out.contains(&CandidateIndex(i)) {
            continue;
        }

        for d in &c.deps {
            if d.is_runtime_pseudo_dep() {
                continue;
            }
            if base_packages.contains(&d.package) {
                continue;
            }
            if !c.dep_types.contains(&d.kind) {
                continue;
            }
            if !c.platform.is_source() && d.kind == DependencyKind::LinkingTo {
                continue;
            }

            let cand: Vec<CandidateIndex> = by_package
                .get(&d.package)
                .cloned()
                .unwrap_or_default();

            let good_cand: Vec<CandidateIndex> = cand
                .iter()
                .copied()
                .filter(|j| {
                    let other = &candidates[j.0];
                    other.status == Status::Ok
                        && satisfies_source(&d.requested_source, &d.target_ref, other)
                        && match (&other.version, &d.requirement) {
                            (_, None) => true,
                            (Some(v), Some((op, req))) => version_satisfies(v, Some((*op, req))),
                            (None, Some(_)) => false,
                        }
                })
                .collect();

            let mut terms: Vec<(usize, i64)> = vec![(i, 1)];
            terms.extend(good_cand.iter().map(|j| (j.0, -1)));

            let message = format!(
                "{} requires {} ({})",
                c.candidate_ref, d.target_ref, d.package
            );

            builder.conds.push(Constraint {
                target: CandidateIndex(i),
                terms,
                op: Op::Le,
                rhs: 0,
                kind: ConstraintKind::Dependency {
                    upstream: CandidateIndex(i),
                    dependency_ref: d.target_ref.clone(),
                    dependency_package: d.package.clone(),
                    candidates: cand,
                    good_candidates: good_cand,
                    message,
                },
            });
        }
    }
}
