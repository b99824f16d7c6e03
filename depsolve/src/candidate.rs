// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! The data model the rest of the crate is built on: [`Candidate`] and its
//! supporting types. Candidates are produced by an upstream resolver and are
//! read-only here.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::version::Version;

#[derive(Error, Debug)]
pub enum PackageNameError {
    #[error("names must have at least one character")]
    TooShort,

    #[error("names must begin with an alpha character")]
    NoStartingAlpha { name: String, character: String },

    #[error("names must contain only alphanumeric or '.' characters")]
    InvalidCharacter { name: String, character: String },
}

/// The package name a candidate belongs to. Many candidates may share one.
#[derive(Clone, Eq, Debug, Hash, PartialEq, Ord, PartialOrd)]
pub struct PackageName(String);

impl PackageName {
    pub fn new<S: Into<String>>(s: S) -> PackageName {
        PackageName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PackageName {
    type Err = PackageNameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if !value.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return match value.chars().next() {
                Some(c) => Err(PackageNameError::NoStartingAlpha {
                    name: value.to_string(),
                    character: c.to_string(),
                }),
                None => Err(PackageNameError::TooShort),
            };
        }

        for c in value.chars() {
            if !(c.is_ascii_alphanumeric() || c == '.') {
                return Err(PackageNameError::InvalidCharacter {
                    name: value.to_string(),
                    character: c.to_string(),
                });
            }
        }

        Ok(PackageName(value.to_string()))
    }
}

/// A stable identifier for one candidate, e.g. `cran::Pkg` or
/// `github::user/Pkg@sha`.
#[derive(Clone, Eq, Debug, Hash, PartialEq, Ord, PartialOrd)]
pub struct CandidateRef(String);

impl CandidateRef {
    pub fn new<S: Into<String>>(s: S) -> CandidateRef {
        CandidateRef(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registries a locally [`CandidateSource::Installed`] package may have
/// originated from; used to identify `prefer-installed` candidates (§4.1.5).
#[derive(Clone, Copy, Eq, Debug, Hash, PartialEq)]
pub enum RepoType {
    Cran,
    Bioc,
}

/// The tagged variant behind "`type`" in §3: dispatch by match, not by
/// string, so `satisfies_remote` and the §4.1 filters are exhaustive.
#[derive(Clone, Eq, Debug, Hash, PartialEq)]
pub enum CandidateSource {
    /// Already present locally. `repotype` hints which registry it came
    /// from, if known; only `Cran`/`Bioc` repotypes feed `prefer-installed`.
    Installed { repotype: Option<RepoType> },
    Cran,
    Bioc,
    /// An abstract request any registry may satisfy.
    Standard,
    Github { repo: String },
    Url,
    Local,
    /// A virtual meta-candidate with no installable artifact of its own.
    Deps,
}

impl CandidateSource {
    /// True for the registry-like sources that participate in
    /// `prefer-installed` (§4.1.5) and `prefer-binaries` (§4.1.6) scans.
    pub fn is_registry(&self) -> bool {
        matches!(
            self,
            CandidateSource::Cran | CandidateSource::Bioc | CandidateSource::Standard
        )
    }
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CandidateSource::Installed { .. } => write!(f, "installed"),
            CandidateSource::Cran => write!(f, "cran"),
            CandidateSource::Bioc => write!(f, "bioc"),
            CandidateSource::Standard => write!(f, "standard"),
            CandidateSource::Github { repo } => write!(f, "github::{}", repo),
            CandidateSource::Url => write!(f, "url"),
            CandidateSource::Local => write!(f, "local"),
            CandidateSource::Deps => write!(f, "deps"),
        }
    }
}

/// `source`, or a binary platform tag (`linux-x86_64`, `win-x64`, …).
#[derive(Clone, Eq, Debug, Hash, PartialEq)]
pub enum Platform {
    Source,
    Binary(String),
}

impl Platform {
    pub fn is_source(&self) -> bool {
        matches!(self, Platform::Source)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Platform::Source => write!(f, "source"),
            Platform::Binary(tag) => write!(f, "{}", tag),
        }
    }
}

/// Resolution outcome of one candidate.
#[derive(Clone, Copy, Eq, Debug, Hash, PartialEq)]
pub enum Status {
    Ok,
    Failed,
}

/// The dependency kind a [`DependencyEdge`] carries. `depends`/`imports` are
/// the common ones; `linkingto` is filtered out of binary candidates
/// (§4.1.7); anything else this crate doesn't special-case is `Other`.
#[derive(Clone, Eq, Debug, Hash, PartialEq)]
pub enum DependencyKind {
    Depends,
    Imports,
    LinkingTo,
    Suggests,
    Enhances,
    Other(String),
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DependencyKind::Depends => write!(f, "depends"),
            DependencyKind::Imports => write!(f, "imports"),
            DependencyKind::LinkingTo => write!(f, "linkingto"),
            DependencyKind::Suggests => write!(f, "suggests"),
            DependencyKind::Enhances => write!(f, "enhances"),
            DependencyKind::Other(s) => write!(f, "{}", s),
        }
    }
}

/// One `(ref, package, type, op, version)` dependency edge out of a
/// candidate (§3).
///
/// `requested_source` is what the upstream resolver decided `target_ref`
/// resolves to — e.g. a `standard` dependency on `foo` vs. a pinned
/// `github::user/foo@sha` dependency — so that `satisfies_remote` can be
/// evaluated without the solver having to go back and ask the resolver
/// what `target_ref` means (`resolver_candidate_for` in §4.1.7's prose).
#[derive(Clone, Debug)]
pub struct DependencyEdge {
    pub target_ref: CandidateRef,
    pub package: PackageName,
    pub kind: DependencyKind,
    pub requested_source: CandidateSource,
    pub requirement: Option<(crate::version::VersionOp, Version)>,
}

impl DependencyEdge {
    pub fn new(
        target_ref: CandidateRef,
        package: PackageName,
        kind: DependencyKind,
        requested_source: CandidateSource,
    ) -> Self {
        DependencyEdge {
            target_ref,
            package,
            kind,
            requested_source,
            requirement: None,
        }
    }

    pub fn with_requirement(
        mut self,
        op: crate::version::VersionOp,
        version: Version,
    ) -> DependencyEdge {
        self.requirement = Some((op, version));
        self
    }

    /// True for the R-runtime pseudo-dependency that §4.1.7 always strips.
    pub fn is_runtime_pseudo_dep(&self) -> bool {
        self.target_ref.as_str() == "R"
    }
}

/// The objective-function selection strategy (§3).
#[derive(Clone, Copy, Eq, Debug, Hash, PartialEq)]
pub enum Policy {
    Lazy,
    Upgrade,
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Policy::Lazy => write!(f, "lazy"),
            Policy::Upgrade => write!(f, "upgrade"),
        }
    }
}

/// One possible way to obtain one version of one package (§3).
#[derive(Clone, Debug)]
pub struct Candidate {
    pub candidate_ref: CandidateRef,
    pub package: PackageName,
    pub version: Option<Version>,
    pub source: CandidateSource,
    pub platform: Platform,
    pub mirror: String,
    pub direct: bool,
    pub status: Status,
    pub deps: Vec<DependencyEdge>,
    pub dep_types: HashSet<DependencyKind>,
    pub error: Option<String>,
}

impl Candidate {
    /// `extra.repotype`, when this is an [`CandidateSource::Installed`]
    /// candidate that originated from a registry.
    pub fn repotype(&self) -> Option<RepoType> {
        match &self.source {
            CandidateSource::Installed { repotype } => *repotype,
            _ => None,
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{} {} ({})", self.package, v, self.candidate_ref),
            None => write!(f, "{} (no version, {})", self.package, self.candidate_ref),
        }
    }
}

/// The index of a [`Candidate`] within a [`crate::problem::Problem`]'s
/// variable numbering. Distinct from a raw `usize` so it can't be confused
/// with a slack-variable index or an arbitrary count.
#[derive(Clone, Copy, Eq, Debug, Hash, PartialEq, Ord, PartialOrd)]
pub struct CandidateIndex(pub usize);

impl fmt::Display for CandidateIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
