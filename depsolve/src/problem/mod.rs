// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! The Problem Builder (§4.1): translates candidates + policy into an ILP
//! [`Problem`]. Built as seven ordered phases over a private [`Builder`]
//! accumulator; the phases are commutative in outcome, but this module
//! applies them in the order §4.1 lists them because the Blame Tracer scans
//! `conds` by [`ConstraintKind`] afterwards and some notes assume earlier
//! phases already ran (e.g. `ok-resolution` must populate `ruled_out` before
//! §4.1.7 decides which candidates are dependency sources).

use std::fmt;

use indexmap::IndexMap;
use log::{debug, trace};

use crate::candidate::{Candidate, CandidateIndex, CandidateRef, PackageName, Policy};
use crate::config::SolverConfig;
use crate::errors::SolverError;

mod cardinality;
mod dependencies;
mod objective;
mod rules;

const LOGNAME: &str = "depsolve::problem";

/// A linear relation between a constraint's weighted sum and its bound.
#[derive(Clone, Copy, Eq, Debug, Hash, PartialEq)]
pub enum Op {
    Eq,
    Le,
    Ge,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Op::Eq => "==",
            Op::Le => "<=",
            Op::Ge => ">=",
        };
        write!(f, "{}", s)
    }
}

/// The `type` discriminator of a constraint, carrying whatever `note` data
/// the Blame Tracer needs for that kind (§9: an enum communicates the
/// per-kind note shape better than a stringly-typed field would).
#[derive(Clone, Debug)]
pub enum ConstraintKind {
    ExactlyOnce {
        package: PackageName,
    },
    AtMostOnce {
        package: PackageName,
    },
    SatisfyRefs {
        /// Index of the direct candidate this ruled-out candidate failed to
        /// satisfy.
        direct_index: CandidateIndex,
    },
    OkResolution,
    PreferInstalled,
    PreferBinary,
    Dependency {
        upstream: CandidateIndex,
        dependency_ref: CandidateRef,
        dependency_package: PackageName,
        /// All candidates for `dependency_package` (`cand` in §4.1.7).
        candidates: Vec<CandidateIndex>,
        /// The subset of `candidates` that satisfied version/ref/status
        /// filters when this constraint was built (`good_cand`).
        good_candidates: Vec<CandidateIndex>,
        message: String,
    },
}

impl ConstraintKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::ExactlyOnce { .. } => "exactly-once",
            ConstraintKind::AtMostOnce { .. } => "at-most-once",
            ConstraintKind::SatisfyRefs { .. } => "satisfy-refs",
            ConstraintKind::OkResolution => "ok-resolution",
            ConstraintKind::PreferInstalled => "prefer-installed",
            ConstraintKind::PreferBinary => "prefer-binary",
            ConstraintKind::Dependency { .. } => "dependency",
        }
    }
}

/// One linear constraint: `note` via [`ConstraintKind`] as `(vars, coef)`
/// sparse pairs rather than parallel arrays — same semantics as §3's
/// `(vars, coef, op, rhs, type, note)` tuple, easier to keep in sync.
#[derive(Clone, Debug)]
pub struct Constraint {
    pub target: CandidateIndex,
    pub terms: Vec<(usize, i64)>,
    pub op: Op,
    pub rhs: i64,
    pub kind: ConstraintKind,
}

impl Constraint {
    /// The variable this constraint is most naturally "about", for
    /// rendering and blame lookups (the ruled-out candidate for
    /// rule-out constraints, the upstream candidate for a dependency).
    pub fn subject(&self) -> CandidateIndex {
        self.target
    }
}

/// The ILP problem (§3): `total = num_candidates + num_direct` binary
/// variables, an objective to minimize, and an ordered constraint list.
#[derive(Clone, Debug)]
pub struct Problem {
    pub num_candidates: usize,
    pub num_direct: usize,
    pub obj: Vec<u64>,
    pub conds: Vec<Constraint>,
    pub ruled_out: std::collections::HashSet<CandidateIndex>,
    candidate_refs: Vec<CandidateRef>,
    direct_packages: IndexMap<PackageName, usize>,
}

impl Problem {
    pub fn total(&self) -> usize {
        self.num_candidates + self.num_direct
    }

    /// The slack variable index for a direct package, if it has one.
    pub fn slack_var(&self, package: &PackageName) -> Option<usize> {
        self.direct_packages
            .get(package)
            .map(|offset| self.num_candidates + offset)
    }

    pub fn is_slack_var(&self, var: usize) -> bool {
        var >= self.num_candidates
    }

    /// Stable one-line-per-candidate, one-line-per-constraint textual
    /// rendering (§6).
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (idx, r) in self.candidate_refs.iter().enumerate() {
            out.push_str(&format!("candidate[{}] = {}\n", idx, r));
        }
        for cond in &self.conds {
            out.push_str(&render_constraint(cond));
            out.push('\n');
        }
        out
    }
}

fn render_constraint(c: &Constraint) -> String {
    let terms: Vec<String> = c
        .terms
        .iter()
        .map(|(v, coef)| format!("{:+}*x{}", coef, v))
        .collect();
    format!(
        "[{}] {} {} {} {}",
        c.kind.as_str(),
        terms.join(" "),
        c.op,
        c.rhs,
        render_note(&c.kind)
    )
}

fn render_note(kind: &ConstraintKind) -> String {
    match kind {
        ConstraintKind::Dependency { message, .. } => message.clone(),
        ConstraintKind::SatisfyRefs { direct_index } => {
            format!("note=direct:{}", direct_index)
        }
        _ => String::new(),
    }
}

/// Accumulator the seven phases append to. Exposed only through
/// [`Problem::build`] once every phase has run (§9).
pub(crate) struct Builder {
    pub obj: Vec<u64>,
    pub conds: Vec<Constraint>,
    pub ruled_out: std::collections::HashSet<CandidateIndex>,
}

impl Builder {
    fn new(num_candidates: usize, num_direct: usize) -> Builder {
        Builder {
            obj: vec![0; num_candidates + num_direct],
            conds: Vec::new(),
            ruled_out: std::collections::HashSet::new(),
        }
    }

    /// Emit `v == 0` and record `v` in `ruled_out` — the shared idiom behind
    /// §4.1.4, §4.1.5, and §4.1.6.
    pub fn rule_out(&mut self, v: CandidateIndex, kind: ConstraintKind) {
        self.ruled_out.insert(v);
        self.conds.push(Constraint {
            target: v,
            terms: vec![(v.0, 1)],
            op: Op::Eq,
            rhs: 0,
            kind,
        });
    }
}

impl Problem {
    /// Run all seven phases of §4.1 over `candidates` and produce a
    /// [`Problem`]. `base_packages` is the externally-supplied set §4.1.7
    /// strips from dependency edges.
    pub fn build(
        candidates: &[Candidate],
        policy: Policy,
        base_packages: &std::collections::HashSet<PackageName>,
        config: &SolverConfig,
    ) -> Result<Problem, SolverError> {
        let num_candidates = candidates.len();

        let mut by_package: IndexMap<PackageName, Vec<CandidateIndex>> = IndexMap::new();
        for (i, c) in candidates.iter().enumerate() {
            by_package
                .entry(c.package.clone())
                .or_default()
                .push(CandidateIndex(i));
        }

        let mut direct_packages: IndexMap<PackageName, usize> = IndexMap::new();
        for (pkg, idxs) in by_package.iter() {
            if idxs.iter().any(|i| candidates[i.0].direct) {
                let offset = direct_packages.len();
                direct_packages.insert(pkg.clone(), offset);
            }
        }
        let num_direct = direct_packages.len();

        debug!(
            target: LOGNAME,
            "building problem: {} candidates, {} direct packages, policy={}",
            num_candidates,
            num_direct,
            policy
        );

        let mut builder = Builder::new(num_candidates, num_direct);

        // Phase 4.1.1
        objective::apply(&mut builder, candidates, policy, config)?;
        // Phase 4.1.2
        cardinality::apply(&mut builder, candidates, &by_package, &direct_packages, num_candidates, config);
        // Phase 4.1.3
        rules::satisfy_refs(&mut builder, candidates, &by_package);
        // Phase 4.1.4
        rules::resolution_failures(&mut builder, candidates);
        // Phase 4.1.5
        rules::prefer_installed(&mut builder, candidates, &by_package);
        // Phase 4.1.6
        rules::prefer_binaries(&mut builder, candidates, &by_package);
        // Phase 4.1.7
        dependencies::apply(&mut builder, candidates, &by_package, base_packages);

        trace!(
            target: LOGNAME,
            "problem built: {} constraints, {} ruled out",
            builder.conds.len(),
            builder.ruled_out.len()
        );

        Ok(Problem {
            num_candidates,
            num_direct,
            obj: builder.obj,
            conds: builder.conds,
            ruled_out: builder.ruled_out,
            candidate_refs: candidates.iter().map(|c| c.candidate_ref.clone()).collect(),
            direct_packages,
        })
    }
}

pub(crate) type ByPackage = IndexMap<PackageName, Vec<CandidateIndex>>;
pub(crate) type DirectPackages = IndexMap<PackageName, usize>;
pub(crate) type BasePackages = std::collections::HashSet<PackageName>;
