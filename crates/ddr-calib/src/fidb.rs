//! FIDB section: platform configuration.
//!
//! Layout (192 bytes, little-endian):
//! ```text
//! [0x00..0x04]  magic          b"FIDB"
//! [0x04..0x08]  declared len   0xB8
//! [0x08..0x0c]  crystal_freq
//! [0x0c..0x10]  cpu_freq
//! [0x10..0x14]  ddr_freq
//! [0x14..0x18]  reserved       0
//! [0x18..0x1c]  enable flag    1
//! [0x1c..0x20]  uart_baud
//! [0x20..0x24]  flag           1
//! [0x24..0x28]  reserved       0
//! [0x28..0x2c]  mem_size
//! [0x2c..0x30]  flag           1
//! [0x30..0x34]  reserved       0
//! [0x34..0x38]  flag           0x11
//! [0x38..0x3c]  platform id    0x19800000
//! [0x3c..0xc0]  zero
//! ```

use ddr_core::PlatformConfig;

use crate::binary::put_u32;

pub const FIDB_MAGIC: [u8; 4] = *b"FIDB";

/// Value of the declared-length field. Constant, not derived.
pub const FIDB_DECLARED_LEN: u32 = 0xB8;

/// Total section size including the 8-byte header.
pub const FIDB_SECTION_LEN: usize = 192;

// Opaque values observed in every stock capture. Do not derive.
const ENABLE_FLAG: u32 = 1;
const FLAG_20: u32 = 1;
const FLAG_2C: u32 = 1;
const FLAG_34: u32 = 0x11;
const PLATFORM_ID: u32 = 0x1980_0000;

/// Build the FIDB section.
pub fn build_fidb(platform: &PlatformConfig) -> [u8; FIDB_SECTION_LEN] {
    let mut buf = [0u8; FIDB_SECTION_LEN];
    buf[0..4].copy_from_slice(&FIDB_MAGIC);
    put_u32(&mut buf, 0x04, FIDB_DECLARED_LEN);
    put_u32(&mut buf, 0x08, platform.crystal_freq);
    put_u32(&mut buf, 0x0c, platform.cpu_freq);
    put_u32(&mut buf, 0x10, platform.ddr_freq);
    put_u32(&mut buf, 0x18, ENABLE_FLAG);
    put_u32(&mut buf, 0x1c, platform.uart_baud);
    put_u32(&mut buf, 0x20, FLAG_20);
    put_u32(&mut buf, 0x28, platform.mem_size);
    put_u32(&mut buf, 0x2c, FLAG_2C);
    put_u32(&mut buf, 0x34, FLAG_34);
    put_u32(&mut buf, 0x38, PLATFORM_ID);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::get_u32;

    fn t31() -> PlatformConfig {
        PlatformConfig {
            crystal_freq: 24_000_000,
            cpu_freq: 576_000_000,
            ddr_freq: 400_000_000,
            uart_baud: 115_200,
            mem_size: 8_388_608,
        }
    }

    #[test]
    fn header() {
        let fidb = build_fidb(&t31());
        assert_eq!(&fidb[0..4], b"FIDB");
        assert_eq!(&fidb[4..8], &[0xb8, 0, 0, 0]);
    }

    #[test]
    fn platform_fields() {
        let fidb = build_fidb(&t31());
        assert_eq!(get_u32(&fidb, 0x08), 24_000_000);
        assert_eq!(get_u32(&fidb, 0x0c), 576_000_000);
        assert_eq!(get_u32(&fidb, 0x10), 400_000_000);
        assert_eq!(get_u32(&fidb, 0x14), 0);
        assert_eq!(get_u32(&fidb, 0x18), 1);
        assert_eq!(get_u32(&fidb, 0x1c), 115_200);
        assert_eq!(get_u32(&fidb, 0x28), 8_388_608);
        assert_eq!(get_u32(&fidb, 0x34), 0x11);
        assert_eq!(get_u32(&fidb, 0x38), 0x1980_0000);
    }

    #[test]
    fn tail_is_zero() {
        let fidb = build_fidb(&t31());
        assert!(fidb[0x3c..].iter().all(|&b| b == 0));
    }
}
