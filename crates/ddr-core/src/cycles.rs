//! Picosecond-to-cycle conversion.
//!
//! The vendor code rounds differently depending on the field, and the
//! order of integer divisions matters for bit-exact output. Each policy
//! therefore gets its own function instead of a rounding-mode argument.

/// Picoseconds per nanosecond.
pub const PS_PER_NS: u32 = 1_000;

/// `ceil(duration_ps / period_ps)`, with zero duration mapping to zero.
///
/// A zero period yields zero rather than panicking; callers validate the
/// clock before converting.
pub fn ps_to_cycles_ceil(duration_ps: u32, period_ps: u32) -> u32 {
    if duration_ps == 0 || period_ps == 0 {
        return 0;
    }
    let d = u64::from(duration_ps);
    let p = u64::from(period_ps);
    ((d + p - 1) / p) as u32
}

/// Refresh-cycle rounding: `((duration + 2 * period - 1) / period) / 2`.
///
/// Both divisions truncate, in this order. This is not the same as
/// halving a full-precision ceiling.
pub fn ps_to_cycles_ceil_halved(duration_ps: u32, period_ps: u32) -> u32 {
    if duration_ps == 0 || period_ps == 0 {
        return 0;
    }
    let d = u64::from(duration_ps);
    let p = u64::from(period_ps);
    (((d + 2 * p - 1) / p) / 2) as u32
}

/// Vendor `PS2CYCLE_DIV`: ceiling division by `period_ps * div` in
/// wrapping 32-bit arithmetic.
///
/// Unlike [`ps_to_cycles_ceil`] there is no zero special case; a zero
/// duration still produces `(period * div - 1) / (period * div) == 0`.
pub fn ps_to_cycles_ceil_scaled(duration_ps: u32, period_ps: u32, div: u32) -> u32 {
    let step = period_ps.wrapping_mul(div);
    if step == 0 {
        return 0;
    }
    duration_ps.wrapping_add(step).wrapping_sub(1) / step
}

/// Truncating conversion, used for the refresh interval.
pub fn ps_to_cycles_floor(duration_ps: u32, period_ps: u32) -> u32 {
    if period_ps == 0 {
        return 0;
    }
    duration_ps / period_ps
}

/// Clock period in picoseconds from a frequency in Hz, computed as
/// `1e9 / (hz / 1000)`. Returns zero below 1 kHz.
pub fn period_ps_from_hz(freq_hz: u32) -> u32 {
    let khz = freq_hz / 1000;
    if khz == 0 {
        return 0;
    }
    1_000_000_000 / khz
}

/// Clock period in picoseconds from a frequency in MHz.
pub fn period_ps_from_mhz(freq_mhz: u32) -> u32 {
    if freq_mhz == 0 {
        return 0;
    }
    1_000_000 / freq_mhz
}

/// Saturating nanosecond-to-picosecond conversion.
pub fn ns_to_ps(ns: u32) -> u32 {
    ns.saturating_mul(PS_PER_NS)
}

/// Duration of `cycles` clock periods, in picoseconds.
pub fn tck_to_ps(cycles: u32, period_ps: u32) -> u32 {
    cycles.saturating_mul(period_ps)
}
