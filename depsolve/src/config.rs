// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! In-process tunables (§4.4). There is no file/env/CLI configuration at
//! this layer — that belongs to a caller — but the numeric constants the
//! rest of this crate treats as fixed are gathered here so a caller can
//! override them without touching the builder's control flow.

/// Per-type objective weights for the `lazy` policy (§4.1.1).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LazyWeights {
    pub installed: u64,
    pub source: u64,
    pub binary: u64,
}

impl Default for LazyWeights {
    fn default() -> Self {
        LazyWeights {
            installed: 0,
            source: 5,
            binary: 1,
        }
    }
}

/// Type/platform tiebreaker weights for the `upgrade` policy (§4.1.1 step 3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpgradeTiebreak {
    pub installed: u64,
    pub source: u64,
    pub binary: u64,
}

impl Default for UpgradeTiebreak {
    fn default() -> Self {
        UpgradeTiebreak {
            installed: 1,
            source: 3,
            binary: 2,
        }
    }
}

/// Tunables for [`crate::Solver::solve`]. `SolverConfig::default()`
/// reproduces §4.1.1/§4.1.2 exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    /// Cost assigned to every slack variable (§3). Must exceed the largest
    /// possible sum of real candidate coefficients or infeasibility
    /// detection (`objval >= dummy_cost - 1`) breaks down.
    pub dummy_cost: u64,
    pub lazy_weights: LazyWeights,
    /// The `100` in "`(max_rank - rank + 1) * 100`" (§4.1.1).
    pub upgrade_rank_scale: u64,
    pub upgrade_tiebreak: UpgradeTiebreak,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            dummy_cost: 1_000_000_000,
            lazy_weights: LazyWeights::default(),
            upgrade_rank_scale: 100,
            upgrade_tiebreak: UpgradeTiebreak::default(),
        }
    }
}
