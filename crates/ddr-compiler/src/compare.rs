//! Byte-level comparison against captured reference binaries.

use std::fmt;

use ddr_core::LogicalDdrConfig;
use serde::Serialize;

use crate::error::Result;
use crate::pipeline::{compile, CompileOptions};

/// One differing byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ByteDiff {
    pub offset: usize,
    pub generated: u8,
    pub expected: u8,
}

/// Outcome of comparing generated output to a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "kebab-case")]
pub enum Comparison {
    Match,
    #[serde(rename_all = "kebab-case")]
    Mismatch {
        generated_len: usize,
        expected_len: usize,
        /// Every differing byte within the common length, in offset order.
        diffs: Vec<ByteDiff>,
    },
}

impl Comparison {
    pub fn is_match(&self) -> bool {
        matches!(self, Comparison::Match)
    }

    pub fn diffs(&self) -> &[ByteDiff] {
        match self {
            Comparison::Match => &[],
            Comparison::Mismatch { diffs, .. } => diffs,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparison::Match => write!(f, "MATCH"),
            Comparison::Mismatch {
                generated_len,
                expected_len,
                diffs,
            } => {
                writeln!(f, "MISMATCH: {} byte(s) differ", diffs.len())?;
                if generated_len != expected_len {
                    writeln!(
                        f,
                        "  length: generated {generated_len}, expected {expected_len}"
                    )?;
                }
                for d in diffs {
                    writeln!(
                        f,
                        "  {:#06x}: generated {:#04x}, expected {:#04x}",
                        d.offset, d.generated, d.expected
                    )?;
                }
                Ok(())
            }
        }
    }
}

/// Compare two byte strings. A length difference is a mismatch even when
/// the common prefix is identical.
pub fn diff_bytes(generated: &[u8], expected: &[u8]) -> Comparison {
    let diffs: Vec<ByteDiff> = generated
        .iter()
        .zip(expected)
        .enumerate()
        .filter(|(_, (g, e))| g != e)
        .map(|(offset, (&generated, &expected))| ByteDiff {
            offset,
            generated,
            expected,
        })
        .collect();

    if diffs.is_empty() && generated.len() == expected.len() {
        Comparison::Match
    } else {
        Comparison::Mismatch {
            generated_len: generated.len(),
            expected_len: expected.len(),
            diffs,
        }
    }
}

/// Compile `config` and compare the result against `reference`.
pub fn compare_against_reference(
    config: &LogicalDdrConfig,
    options: &CompileOptions,
    reference: &[u8],
) -> Result<Comparison> {
    let output = compile(config, options)?;
    Ok(diff_bytes(output.binary.as_bytes(), reference))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_bytes_match() {
        assert_eq!(diff_bytes(&[1, 2, 3], &[1, 2, 3]), Comparison::Match);
        assert!(diff_bytes(&[], &[]).is_match());
    }

    #[test]
    fn every_difference_is_reported() {
        let cmp = diff_bytes(&[1, 9, 3, 8], &[1, 2, 3, 4]);
        assert_eq!(
            cmp.diffs(),
            &[
                ByteDiff {
                    offset: 1,
                    generated: 9,
                    expected: 2
                },
                ByteDiff {
                    offset: 3,
                    generated: 8,
                    expected: 4
                },
            ]
        );
    }

    #[test]
    fn length_difference_is_a_mismatch() {
        let cmp = diff_bytes(&[1, 2, 3], &[1, 2]);
        assert!(!cmp.is_match());
        assert!(cmp.diffs().is_empty());
        assert!(matches!(
            cmp,
            Comparison::Mismatch {
                generated_len: 3,
                expected_len: 2,
                ..
            }
        ));
    }

    #[test]
    fn display_lists_offsets() {
        let text = diff_bytes(&[0, 0x42], &[0, 0x00]).to_string();
        assert!(text.starts_with("MISMATCH: 1 byte(s) differ"));
        assert!(text.contains("0x0001: generated 0x42, expected 0x00"));
        assert_eq!(Comparison::Match.to_string(), "MATCH");
    }

    #[test]
    fn serializes_with_result_tag() {
        let json = serde_json::to_value(diff_bytes(&[5], &[6])).unwrap();
        assert_eq!(json["result"], "mismatch");
        assert_eq!(json["expected-len"], 1);
        assert_eq!(json["diffs"][0]["generated"], 5);
        let json = serde_json::to_value(Comparison::Match).unwrap();
        assert_eq!(json["result"], "match");
    }
}
