// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Hierarchical numeric dotted versions (§4.1.8). Deliberately simpler than
//! a SemVer parser: no pre-release/build-metadata grammar, just
//! left-to-right numeric comparison with zero-padding for unequal lengths,
//! which is what the upstream resolvers this crate's candidates come from
//! (CRAN, Bioconductor, …) actually use.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, Eq, PartialEq)]
pub enum VersionError {
    #[error("version string is empty")]
    Empty,

    #[error("version component {0:?} is not a non-negative integer")]
    InvalidComponent(String),
}

/// A hierarchical numeric dotted version, e.g. `1.2.3` or `0.4.1.9000`.
#[derive(Clone, Eq, Debug, Hash, PartialEq)]
pub struct Version(Vec<u64>);

impl Version {
    pub fn new(components: Vec<u64>) -> Version {
        Version(components)
    }

    pub fn components(&self) -> &[u64] {
        &self.0
    }

    fn compare(&self, other: &Version) -> Ordering {
        let len = self.0.len().max(other.0.len());
        for i in 0..len {
            let l = self.0.get(i).copied().unwrap_or(0);
            let r = other.0.get(i).copied().unwrap_or(0);
            match l.cmp(&r) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        Ordering::Equal
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.is_empty() {
            return Err(VersionError::Empty);
        }

        value
            .split(|c| c == '.' || c == '-')
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|_| VersionError::InvalidComponent(part.to_string()))
            })
            .collect::<Result<Vec<u64>, VersionError>>()
            .map(Version)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u64::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Version) -> Ordering {
        self.compare(other)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Version) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Comparison operator for a dependency's version requirement (§3).
#[derive(Clone, Copy, Eq, Debug, Hash, PartialEq)]
#[derive(strum::Display, strum::EnumIter)]
pub enum VersionOp {
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    Ne,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    Le,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    Ge,
}

impl FromStr for VersionOp {
    type Err = VersionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "==" => Ok(VersionOp::Eq),
            "!=" => Ok(VersionOp::Ne),
            "<" => Ok(VersionOp::Lt),
            "<=" => Ok(VersionOp::Le),
            ">" => Ok(VersionOp::Gt),
            ">=" => Ok(VersionOp::Ge),
            other => Err(VersionError::InvalidComponent(other.to_string())),
        }
    }
}

/// `version_satisfies(v, op, req)` from §4.1.8. A missing requirement
/// (`req_op` is `None`) is always satisfied.
pub fn version_satisfies(v: &Version, req: Option<(VersionOp, &Version)>) -> bool {
    match req {
        None => true,
        Some((op, req_version)) => {
            let ord = v.cmp(req_version);
            match op {
                VersionOp::Eq => ord == Ordering::Equal,
                VersionOp::Ne => ord != Ordering::Equal,
                VersionOp::Lt => ord == Ordering::Less,
                VersionOp::Le => ord != Ordering::Greater,
                VersionOp::Gt => ord == Ordering::Greater,
                VersionOp::Ge => ord != Ordering::Less,
            }
        }
    }
}
