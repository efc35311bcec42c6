//! `ddrgen show`: one chip in detail.

use std::path::Path;

use anyhow::{bail, Context, Result};
use ddr_catalog::ChipTiming;

use super::{ddr_clock_mhz, load_catalog};

pub fn run(name: &str, catalog: Option<&Path>, freq: u32, format: Option<&str>) -> Result<()> {
    let catalog = load_catalog(catalog)?;
    let Some(chip) = catalog.chip(name) else {
        bail!("unknown chip: '{name}'. Use 'ddrgen list chips' to see available chips.");
    };
    ddr_clock_mhz(freq)?;

    match format {
        None | Some("text") => print!("{}", describe(chip, freq)),
        Some("toml") => {
            let text = toml::to_string_pretty(chip)
                .with_context(|| format!("serializing chip '{name}'"))?;
            print!("{text}");
        }
        Some(other) => bail!("unknown format: '{other}' (expected text or toml)"),
    }
    Ok(())
}

fn describe(chip: &ChipTiming, freq: u32) -> String {
    let p = chip.phy_params(freq);
    let mut out = String::new();
    let mut line = |s: String| {
        out.push_str(&s);
        out.push('\n');
    };

    line(format!("=== Chip: {} ===", chip.name));
    line(format!("Vendor: {}", chip.vendor));
    line(format!("Type:   {}", chip.ddr_type));
    line(String::new());

    line("--- Geometry ---".into());
    line(format!("  Banks:      {}", chip.banks));
    line(format!("  Row bits:   {}", chip.row_bits));
    line(format!("  Col bits:   {}", chip.col_bits));
    line(format!("  Data width: x{}", chip.data_width));
    line(format!("  Density:    {} MB", chip.density_bytes() >> 20));
    line(String::new());

    line("--- Timing (ps) ---".into());
    for (label, ps) in [
        ("tRAS", chip.t_ras),
        ("tRC", chip.t_rc),
        ("tRCD", chip.t_rcd),
        ("tRP", chip.t_rp),
        ("tRFC", chip.t_rfc),
        ("tRTP", chip.t_rtp),
        ("tFAW", chip.t_faw),
        ("tRRD", chip.t_rrd),
        ("tWTR", chip.t_wtr),
        ("tWR", chip.t_wr),
        ("tREFI", chip.t_refi),
    ] {
        line(format!("  {label:<6} {ps}"));
    }
    line(format!(
        "  CL {}  BL {}  RL {}  WL {}  tCKE {}tck  tXP {}tck",
        chip.cl, chip.bl, chip.rl, chip.wl, chip.t_cke, chip.t_xp
    ));
    line(String::new());

    line(format!("--- PHY parameters @ {} MHz ---", freq / 1_000_000));
    line(format!("  type code {}  CL {}  BL {}", p.ddr_type, p.cl, p.bl));
    line(format!(
        "  tRAS {}  tRC {}  tRCD {}  tRP {}  tRFC {}",
        p.t_ras, p.t_rc, p.t_rcd, p.t_rp, p.t_rfc
    ));
    line(format!(
        "  tRTP {}  tFAW {}  tRRD {}  tWTR {}",
        p.t_rtp, p.t_faw, p.t_rrd, p.t_wtr
    ));
    out
}
