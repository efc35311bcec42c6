//! The assembled 324-byte calibration binary.

use ddr_core::error::copy_into;
use ddr_core::{DdrPhyParams, PlatformConfig};

use crate::error::{FormatError, Result};
use crate::fidb::{build_fidb, FIDB_DECLARED_LEN, FIDB_MAGIC, FIDB_SECTION_LEN};
use crate::rdd::{build_rdd, RDD_DECLARED_LEN, RDD_MAGIC, RDD_SECTION_LEN};

/// Total length of a calibration binary.
pub const CALIBRATION_BINARY_LEN: usize = FIDB_SECTION_LEN + RDD_SECTION_LEN;

/// Offset of the RDD section within the binary.
pub const RDD_OFFSET: usize = FIDB_SECTION_LEN;

pub(crate) fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

pub(crate) fn get_u32(buf: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(word)
}

/// Build the FIDB and RDD sections and concatenate them.
pub fn build_binary(
    platform: &PlatformConfig,
    params: &DdrPhyParams,
) -> [u8; CALIBRATION_BINARY_LEN] {
    let mut out = [0u8; CALIBRATION_BINARY_LEN];
    out[..RDD_OFFSET].copy_from_slice(&build_fidb(platform));
    out[RDD_OFFSET..].copy_from_slice(&build_rdd(platform, params));
    out
}

/// Build into a caller-supplied buffer. Returns the number of bytes
/// written, or `SizeMismatch` without touching `out` if it is too short.
pub fn write_into(
    platform: &PlatformConfig,
    params: &DdrPhyParams,
    out: &mut [u8],
) -> ddr_core::Result<usize> {
    copy_into(&build_binary(platform, params), out)
}

/// Check length, magics, declared lengths and the RDD checksum.
pub fn validate_calibration_binary(bytes: &[u8]) -> Result<()> {
    if bytes.len() != CALIBRATION_BINARY_LEN {
        return Err(FormatError::WrongLength {
            expected: CALIBRATION_BINARY_LEN,
            actual: bytes.len(),
        });
    }
    let (fidb, rdd) = bytes.split_at(RDD_OFFSET);

    check_header(fidb, "FIDB", FIDB_MAGIC, FIDB_DECLARED_LEN)?;
    check_header(rdd, "RDD", RDD_MAGIC, RDD_DECLARED_LEN)?;

    let stored = get_u32(rdd, crate::rdd::CRC_OFFSET);
    let computed = ddr_core::crc32::crc32(&rdd[crate::rdd::CRC_START..]);
    if stored != computed {
        return Err(FormatError::ChecksumMismatch { stored, computed });
    }
    Ok(())
}

fn check_header(
    section: &[u8],
    name: &'static str,
    magic: [u8; 4],
    declared_len: u32,
) -> Result<()> {
    let mut found = [0u8; 4];
    found.copy_from_slice(&section[0..4]);
    if found != magic {
        return Err(FormatError::InvalidMagic {
            section: name,
            found,
        });
    }
    let declared = get_u32(section, 4);
    if declared != declared_len {
        return Err(FormatError::DeclaredLength {
            section: name,
            declared,
            expected: declared_len,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddr_core::DdrError;

    fn t31() -> PlatformConfig {
        PlatformConfig {
            crystal_freq: 24_000_000,
            cpu_freq: 576_000_000,
            ddr_freq: 400_000_000,
            uart_baud: 115_200,
            mem_size: 8_388_608,
        }
    }

    fn params() -> DdrPhyParams {
        DdrPhyParams {
            ddr_type: 1,
            row_bits: 13,
            col_bits: 10,
            cl: 7,
            bl: 8,
            t_ras: 18,
            t_rc: 23,
            t_rcd: 6,
            t_rp: 6,
            t_rfc: 52,
            t_rtp: 3,
            t_faw: 18,
            t_rrd: 4,
            t_wtr: 3,
        }
    }

    #[test]
    fn reference_scenario() {
        let bin = build_binary(&t31(), &params());
        assert_eq!(bin.len(), 324);
        assert_eq!(&bin[0..4], b"FIDB");
        assert_eq!(get_u32(&bin, 4), 0xB8);
        assert_eq!(&bin[192..196], &[0x00, b'R', b'D', b'D']);
        assert_eq!(get_u32(&bin, 0xC8), ddr_core::crc32::crc32(&bin[204..324]));
        assert!(validate_calibration_binary(&bin).is_ok());
    }

    #[test]
    fn write_into_buffers() {
        let mut big = [0xAAu8; 400];
        assert_eq!(write_into(&t31(), &params(), &mut big).unwrap(), 324);
        assert_eq!(&big[..324], &build_binary(&t31(), &params())[..]);
        assert!(big[324..].iter().all(|&b| b == 0xAA));

        let mut small = [0xAAu8; 323];
        assert_eq!(
            write_into(&t31(), &params(), &mut small),
            Err(DdrError::SizeMismatch {
                required: 324,
                actual: 323
            })
        );
        assert!(small.iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn validate_rejects_wrong_length() {
        let bin = build_binary(&t31(), &params());
        assert_eq!(
            validate_calibration_binary(&bin[..320]),
            Err(FormatError::WrongLength {
                expected: 324,
                actual: 320
            })
        );
    }

    #[test]
    fn validate_rejects_bad_magic() {
        let mut bin = build_binary(&t31(), &params());
        bin[0] = b'X';
        assert!(matches!(
            validate_calibration_binary(&bin),
            Err(FormatError::InvalidMagic { section: "FIDB", .. })
        ));
    }

    #[test]
    fn validate_rejects_bad_declared_length() {
        let mut bin = build_binary(&t31(), &params());
        bin[RDD_OFFSET + 4] = 0x80;
        assert!(matches!(
            validate_calibration_binary(&bin),
            Err(FormatError::DeclaredLength { section: "RDD", .. })
        ));
    }

    #[test]
    fn validate_rejects_corrupted_payload() {
        let mut bin = build_binary(&t31(), &params());
        bin[RDD_OFFSET + 0x28] ^= 0xff;
        assert!(matches!(
            validate_calibration_binary(&bin),
            Err(FormatError::ChecksumMismatch { .. })
        ));
    }
}
