//! `ddrgen list`: catalog listings.

use std::path::Path;

use anyhow::Result;
use ddr_core::DdrType;

use super::load_catalog;

pub fn processors(catalog: Option<&Path>) -> Result<()> {
    let catalog = load_catalog(catalog)?;
    println!("Processors:");
    println!();
    for p in &catalog.processors {
        println!(
            "  {:<10} DDR {:>4} MHz  CPU {:>4} MHz  chip {}",
            p.name,
            p.ddr_freq / 1_000_000,
            p.cpu_freq / 1_000_000,
            p.default_chip.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

pub fn chips(tech: Option<DdrType>, catalog: Option<&Path>) -> Result<()> {
    let catalog = load_catalog(catalog)?;
    let chips = match tech {
        Some(t) => catalog.chips_by_technology(t),
        None => catalog.chips.iter().collect(),
    };

    match tech {
        Some(t) => println!("{t} chips:"),
        None => println!("Chips:"),
    }
    println!();
    if chips.is_empty() {
        println!("  (none)");
    }
    for c in chips {
        println!(
            "  {:<22} {:<7} {:<8} {:>5} MB  x{}",
            c.name,
            c.ddr_type,
            c.vendor,
            c.density_bytes() >> 20,
            c.data_width,
        );
    }
    println!();
    println!("Use 'ddrgen show <chip>' for details.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listings_run() {
        processors(None).unwrap();
        chips(None, None).unwrap();
        chips(Some(DdrType::Lpddr3), None).unwrap();
    }
}
