//! Reflected CRC-32 (polynomial 0xEDB88320) as used by the RDD block.
//!
//! The lookup table is generated at compile time.

const POLY: u32 = 0xEDB8_8320;

const fn make_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ POLY } else { crc >> 1 };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

static TABLE: [u32; 256] = make_table();

/// CRC-32 of `bytes`: seed 0xFFFFFFFF, output inverted.
///
/// An empty slice returns 0, which coincides with the standard result.
pub fn crc32(bytes: &[u8]) -> u32 {
    if bytes.is_empty() {
        return 0;
    }
    !update(0xFFFF_FFFF, bytes)
}

fn update(mut crc: u32, bytes: &[u8]) -> u32 {
    for &b in bytes {
        crc = TABLE[((crc ^ u32::from(b)) & 0xff) as usize] ^ (crc >> 8);
    }
    crc
}
