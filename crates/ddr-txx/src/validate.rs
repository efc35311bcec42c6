//! Cycle-count range checks for the register packers.
//!
//! Out-of-range counts are not fatal. Each one is clamped and returned
//! as a [`RangeIssue`]; reporting is left to the caller.

use std::fmt;

use ddr_core::cycles::ps_to_cycles_ceil;
use ddr_core::{lpddr_rl_wl_code, DdrError, DdrPhyParams, DdrType, LogicalDdrConfig};
use serde::Serialize;

/// One timing that fell outside its field range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RangeIssue {
    pub field: &'static str,
    /// Cycle count before clamping.
    pub cycles: u32,
    pub min: u32,
    pub max: u32,
    /// Value written to the register instead.
    pub clamped_to: u32,
}

impl RangeIssue {
    /// The issue as a hard error, for callers that refuse to clamp.
    pub fn to_error(&self) -> DdrError {
        DdrError::OutOfRange {
            field: self.field,
            value: self.cycles,
            min: self.min,
            max: self.max,
        }
    }
}

impl fmt::Display for RangeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {} cycles outside [{}, {}], clamped to {}",
            self.field, self.cycles, self.min, self.max, self.clamped_to
        )
    }
}

/// Timings converted to whole clock cycles and clamped to field range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimingCycles {
    pub t_wr: u32,
    pub t_wl: u32,
    pub t_ras: u32,
    pub t_rcd: u32,
    pub t_rl: u32,
    pub t_rp: u32,
    pub t_rrd: u32,
    pub t_rc: u32,
    pub t_rfc: u32,
    pub t_cke: u32,
    pub t_xp: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTimings {
    pub cycles: TimingCycles,
    pub issues: Vec<RangeIssue>,
}

impl ValidatedTimings {
    fn clamped(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }

    /// Calibration parameters for `config` with the range-checked timings
    /// taken from the clamped counts.
    ///
    /// tRFC keeps its halved DDR2/DDR3 rounding unless it was clamped. The
    /// LPDDR/LPDDR2 latency code is built from the clamped tRL and tWL.
    pub fn phy_params(&self, config: &LogicalDdrConfig, period_ps: u32) -> DdrPhyParams {
        let c = &self.cycles;
        // Clamped counts never exceed 127.
        let byte = |cycles: u32| u8::try_from(cycles).unwrap_or(u8::MAX);

        let mut params = DdrPhyParams::from_logical(config, period_ps);
        params.t_ras = byte(c.t_ras);
        params.t_rc = byte(c.t_rc);
        params.t_rcd = byte(c.t_rcd);
        params.t_rp = byte(c.t_rp);
        params.t_rrd = byte(c.t_rrd);
        if self.clamped(T_RFC.field) {
            params.t_rfc = byte(c.t_rfc);
        }
        if matches!(config.ddr_type, DdrType::Lpddr | DdrType::Lpddr2) {
            let code = lpddr_rl_wl_code(c.t_rl, c.t_wl);
            params.cl = code;
            params.bl = code;
        }
        params
    }
}

struct Limit {
    field: &'static str,
    min: u32,
    max: u32,
    /// Replacement for values above `max`.
    over: u32,
}

const fn limit(field: &'static str, min: u32, max: u32) -> Limit {
    Limit {
        field,
        min,
        max,
        over: max,
    }
}

const WIDE: u32 = 0x7f;
const NARROW: u32 = 0x0f;

const T_WR: Limit = limit("tWR", 1, WIDE);
const T_WL: Limit = limit("tWL", 1, WIDE);
const T_RAS: Limit = limit("tRAS", 1, WIDE);
const T_RCD: Limit = limit("tRCD", 1, WIDE);
const T_RL: Limit = limit("tRL", 1, WIDE);
const T_RP: Limit = limit("tRP", 1, WIDE);
const T_RRD: Limit = limit("tRRD", 1, WIDE);
const T_RC: Limit = limit("tRC", 1, WIDE);
// An oversized refresh cycle falls back to a fixed 63, not to the bound.
const T_RFC: Limit = Limit {
    field: "tRFC",
    min: 0,
    max: WIDE,
    over: 0x3f,
};
const T_CKE: Limit = limit("tCKE", 1, NARROW);
const T_XP: Limit = limit("tXP", 1, NARROW);

fn check(limit: &Limit, cycles: u32, issues: &mut Vec<RangeIssue>) -> u32 {
    let clamped_to = if cycles < limit.min {
        limit.min
    } else if cycles > limit.max {
        limit.over
    } else {
        return cycles;
    };
    issues.push(RangeIssue {
        field: limit.field,
        cycles,
        min: limit.min,
        max: limit.max,
        clamped_to,
    });
    clamped_to
}

/// Convert the range-checked timings of `config` to cycles at its clock.
///
/// Fails only when the clock is unusable.
pub fn validate_timings(config: &LogicalDdrConfig) -> ddr_core::Result<ValidatedTimings> {
    let period = config.clock_period_ps()?;
    let ceil = |ps| ps_to_cycles_ceil(ps, period);
    let mut issues = Vec::new();

    let cycles = TimingCycles {
        t_wr: check(&T_WR, ceil(config.t_wr), &mut issues),
        t_wl: check(&T_WL, ceil(config.t_wl), &mut issues),
        t_ras: check(&T_RAS, ceil(config.t_ras), &mut issues),
        t_rcd: check(&T_RCD, ceil(config.t_rcd), &mut issues),
        t_rl: check(&T_RL, ceil(config.t_rl), &mut issues),
        t_rp: check(&T_RP, ceil(config.t_rp), &mut issues),
        t_rrd: check(&T_RRD, ceil(config.t_rrd), &mut issues),
        t_rc: check(&T_RC, ceil(config.t_rc), &mut issues),
        t_rfc: check(&T_RFC, ceil(config.t_rfc), &mut issues),
        t_cke: check(&T_CKE, ceil(config.t_cke), &mut issues),
        t_xp: check(&T_XP, ceil(config.t_xp), &mut issues),
    };
    Ok(ValidatedTimings { cycles, issues })
}
