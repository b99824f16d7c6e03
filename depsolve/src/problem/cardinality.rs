// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! §4.1.2: cardinality constraints — `exactly-once` for direct packages
//! (candidates plus their slack variable sum to 1), `at-most-once` for
//! indirect packages.

use crate::candidate::Candidate;
use crate::config::SolverConfig;
use crate::problem::{Builder, ByPackage, Constraint, ConstraintKind, DirectPackages, Op};

pub(super) fn apply(
    builder: &mut Builder,
    candidates: &[Candidate],
    by_package: &ByPackage,
    direct_packages: &DirectPackages,
    num_candidates: usize,
    _config: &SolverConfig,
) {
    for (package, indices) in by_package.iter() {
        let terms: Vec<(usize, i64)> = indices.iter().map(|i| (i.0, 1)).collect();
        let target = indices[0];

        if let Some(&offset) = direct_packages.get(package) {
            let slack = num_candidates + offset;
            let mut terms = terms;
            terms.push((slack, 1));
            builder.conds.push(Constraint {
                target,
                terms,
                op: Op::Eq,
                rhs: 1,
                kind: ConstraintKind::ExactlyOnce {
                    package: package.clone(),
                },
            });
        } else {
            builder.conds.push(Constraint {
                target,
                terms,
                op: Op::Le,
                rhs: 1,
                kind: ConstraintKind::AtMostOnce {
                    package: package.clone(),
                },
            });
        }
    }

    debug_assert_eq!(
        candidates.len(),
        num_candidates,
        "candidate slice length must match the problem's num_candidates"
    );
}
