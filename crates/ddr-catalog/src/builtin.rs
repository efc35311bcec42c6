//! Built-in catalog entries.
//!
//! Processor values match the FIDB blocks of stock cloner captures.
//! Chip values come from the part datasheets at the speed grade the
//! boards ship with.

use ddr_core::DdrType;

use crate::chip::ChipTiming;
use crate::processor::ProcessorConfig;

/// Processor used when a name is not in the catalog.
pub const DEFAULT_PROCESSOR: &str = "t31";

const MB: u32 = 1024 * 1024;

fn ingenic(name: &str, default_chip: &str) -> ProcessorConfig {
    ProcessorConfig {
        name: name.into(),
        crystal_freq: 24_000_000,
        cpu_freq: 576_000_000,
        ddr_freq: 400_000_000,
        uart_baud: 115_200,
        mem_size: 8 * MB,
        default_chip: Some(default_chip.into()),
    }
}

/// Built-in processor entries.
pub fn processors() -> Vec<ProcessorConfig> {
    vec![
        ingenic("t30", "M14D1G1664A_DDR2"),
        ingenic("t31", "M14D1G1664A_DDR2"),
        ingenic("t31x", "M14D1G1664A_DDR2"),
        ingenic("t31zx", "M14D5121632A_DDR2"),
        ingenic("t31a", "W632GU6NB_DDR3"),
        ingenic("t40", "W631GU6NG_DDR3"),
        ingenic("t41", "W631GU6NG_DDR3"),
    ]
}

fn ddr2(name: &str, vendor: &str, banks: u32, t_rfc: u32) -> ChipTiming {
    ChipTiming {
        name: name.into(),
        vendor: vendor.into(),
        ddr_type: DdrType::Ddr2,
        banks,
        data_width: 16,
        row_bits: 13,
        col_bits: 10,
        cl: 7,
        bl: 8,
        rl: 7,
        wl: 6,
        t_ras: 45_000,
        t_rc: 57_500,
        t_rcd: 15_000,
        t_rp: 15_000,
        t_rfc,
        t_rtp: 7_500,
        t_faw: 45_000,
        t_rrd: 10_000,
        t_wtr: 7_500,
        t_wr: 15_000,
        t_refi: 7_800_000,
        t_cke: 3,
        t_xp: 3,
    }
}

fn ddr3(name: &str, vendor: &str, row_bits: u32, t_rfc: u32) -> ChipTiming {
    ChipTiming {
        name: name.into(),
        vendor: vendor.into(),
        ddr_type: DdrType::Ddr3,
        banks: 8,
        data_width: 16,
        row_bits,
        col_bits: 10,
        cl: 7,
        bl: 8,
        rl: 7,
        wl: 6,
        t_ras: 35_000,
        t_rc: 48_750,
        t_rcd: 13_750,
        t_rp: 13_750,
        t_rfc,
        t_rtp: 7_500,
        t_faw: 40_000,
        t_rrd: 7_500,
        t_wtr: 7_500,
        t_wr: 15_000,
        t_refi: 7_800_000,
        t_cke: 3,
        t_xp: 3,
    }
}

/// Built-in chip entries.
pub fn chips() -> Vec<ChipTiming> {
    vec![
        ddr2("M14D1G1664A_DDR2", "ESMT", 8, 127_500),
        ddr2("M14D5121632A_DDR2", "ESMT", 4, 105_000),
        ddr2("W9751G6KB_DDR2", "Winbond", 4, 105_000),
        ddr3("W631GU6NG_DDR3", "Winbond", 13, 110_000),
        ddr3("W632GU6NB_DDR3", "Winbond", 14, 160_000),
        ChipTiming {
            name: "W97AH6KB_LPDDR2".into(),
            vendor: "Winbond".into(),
            ddr_type: DdrType::Lpddr2,
            banks: 8,
            data_width: 16,
            row_bits: 13,
            col_bits: 10,
            cl: 6,
            bl: 4,
            rl: 6,
            wl: 3,
            t_ras: 42_000,
            t_rc: 60_000,
            t_rcd: 18_000,
            t_rp: 18_000,
            t_rfc: 130_000,
            t_rtp: 7_500,
            t_faw: 50_000,
            t_rrd: 10_000,
            t_wtr: 7_500,
            t_wr: 15_000,
            t_refi: 3_900_000,
            t_cke: 3,
            t_xp: 2,
        },
    ]
}
