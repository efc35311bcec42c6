//! DDRC memory-map (MMAP0/MMAP1) words.
//!
//! Known layouts come from a fixed table keyed on total size in MB and
//! chip-select-1 size in bytes. Anything else is computed from the byte
//! sizes with the controller's 8-bit base/mask arithmetic, which relies
//! on 32-bit wraparound.

/// Memory-map register pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryMap {
    pub mmap0: u32,
    pub mmap1: u32,
}

struct KnownLayout {
    total_mb: u32,
    cs1_bytes: u32,
    map: MemoryMap,
}

const fn known(total_mb: u32, cs1_bytes: u32, mmap0: u32, mmap1: u32) -> KnownLayout {
    KnownLayout {
        total_mb,
        cs1_bytes,
        map: MemoryMap { mmap0, mmap1 },
    }
}

const KNOWN_LAYOUTS: [KnownLayout; 4] = [
    known(128, 0, 0, 1),
    known(256, 0, 0, 2),
    known(512, 0, 0, 4),
    known(256, 128 << 20, 1, 2),
];

const HALF_GB: u32 = 0x2000_0000;

/// Memory-map words for chip selects of `cs0_mb` and `cs1_mb`.
///
/// Callers guarantee both byte counts fit in 32 bits.
pub fn memory_map(cs0_mb: u32, cs1_mb: u32) -> MemoryMap {
    let total_mb = cs0_mb.wrapping_add(cs1_mb);
    let cs0 = cs0_mb.wrapping_shl(20);
    let cs1 = cs1_mb.wrapping_shl(20);

    if let Some(layout) = KNOWN_LAYOUTS
        .iter()
        .find(|l| l.total_mb == total_mb && l.cs1_bytes == cs1)
    {
        return layout.map;
    }

    let total = cs0.wrapping_add(cs1);
    let neg_mask = |bytes: u32| (bytes >> 24).wrapping_neg() & 0xff;

    if total <= HALF_GB {
        MemoryMap {
            mmap0: 0x2000 | neg_mask(cs0),
            mmap1: (cs0.wrapping_add(HALF_GB) >> 24) << 8 | neg_mask(cs1),
        }
    } else if cs1 == 0 {
        MemoryMap {
            mmap0: 0,
            mmap1: 0xff00 | neg_mask(cs0.wrapping_mul(2)),
        }
    } else {
        let mask = !(total >> 24);
        MemoryMap {
            mmap0: neg_mask(cs1) & mask,
            mmap1: (neg_mask(cs0) & mask) | (cs1 >> 24) << 8,
        }
    }
}
