//! HDR profile ranking
//!
//! Every row of the media table carries three free-text labels produced by
//! the scanner: an HDR format ("Dolby Vision", "HDR10+", "SDR"), a detail
//! ("Profile 7", "dvhe.08.06") and an enhancement-layer type ("FEL", "MEL").
//! This module folds those labels into a single priority bucket so the table
//! can be ordered with the most valuable encodes first.
//!
//! # Buckets
//!
//! | Rank | Bucket | Matches |
//! |------|--------|---------|
//! | 0 | Profile 7 FEL | Dolby Vision + full enhancement layer |
//! | 1 | Profile 7 MEL | Dolby Vision + minimal enhancement layer |
//! | 2 | Profile 8 | "profile 8" / "p8" |
//! | 3 | Profile 5 | "profile 5" / "p5" |
//! | 4 | HDR10+ | "hdr10+" / "hdr10plus" |
//! | 5 | HDR | "hdr10", "hlg", "smpte2084" |
//! | 6 | SDR | "sdr" |
//! | 7 | Unknown | nothing above |
//!
//! Matching is case-insensitive substring matching, nothing is parsed as a
//! number. The patterns overlap ("hdr10+" contains "hdr10"), so the rules are
//! kept as an ordered list and the first hit wins.

use serde::Serialize;
use std::fmt;

/// Priority bucket of a media row. Lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ProfileRank {
    DolbyVisionFel = 0,
    DolbyVisionMel = 1,
    Profile8 = 2,
    Profile5 = 3,
    Hdr10Plus = 4,
    Hdr = 5,
    Sdr = 6,
    Unknown = 7,
}

impl ProfileRank {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            ProfileRank::DolbyVisionFel => "DV P7 FEL",
            ProfileRank::DolbyVisionMel => "DV P7 MEL",
            ProfileRank::Profile8 => "DV P8",
            ProfileRank::Profile5 => "DV P5",
            ProfileRank::Hdr10Plus => "HDR10+",
            ProfileRank::Hdr => "HDR",
            ProfileRank::Sdr => "SDR",
            ProfileRank::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProfileRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_u8(), self.label())
    }
}

/// Lowercased view of the three labels, built once per classification.
struct Labels {
    format: String,
    detail: String,
    el: String,
}

impl Labels {
    fn detail_has(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.detail.contains(n))
    }

    fn format_has(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.format.contains(n))
    }

    fn either_has(&self, needles: &[&str]) -> bool {
        self.format_has(needles) || self.detail_has(needles)
    }

    fn dolby_vision_like(&self) -> bool {
        self.detail_has(&["profile 7", "prof 7", "p7", "profile7"])
            || self.format_has(&["dolby vision", "dolby"])
    }
}

type Rule = (fn(&Labels) -> bool, ProfileRank);

// Order is precedence. Do not sort this list.
const RULES: &[Rule] = &[
    (|l| l.dolby_vision_like() && l.el.contains("fel"), ProfileRank::DolbyVisionFel),
    (|l| l.dolby_vision_like() && l.el.contains("mel"), ProfileRank::DolbyVisionMel),
    (
        |l| l.detail_has(&["profile 8", "profile8", "p8"]) || l.format_has(&["profile 8", "p8"]),
        ProfileRank::Profile8,
    ),
    (|l| l.detail_has(&["profile 5", "profile5", "p5"]), ProfileRank::Profile5),
    (|l| l.either_has(&["hdr10+", "hdr10plus"]), ProfileRank::Hdr10Plus),
    (|l| l.either_has(&["hdr10", "hlg", "smpte2084"]), ProfileRank::Hdr),
    (|l| l.either_has(&["sdr"]), ProfileRank::Sdr),
];

/// Classify a row by its HDR format, HDR detail and enhancement-layer labels.
///
/// Total over all inputs: empty or unrecognised labels give
/// [`ProfileRank::Unknown`].
pub fn classify(hdr_format: &str, hdr_detail: &str, el_type: &str) -> ProfileRank {
    let labels = Labels {
        format: hdr_format.to_lowercase(),
        detail: hdr_detail.to_lowercase(),
        el: el_type.to_lowercase(),
    };

    RULES
        .iter()
        .find(|(matches, _)| matches(&labels))
        .map(|(_, rank)| *rank)
        .unwrap_or(ProfileRank::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // DOLBY VISION PROFILE 7
    // ==========================================================================
    //
    // Profile 7 is the dual-layer UHD Blu-ray format. The enhancement layer
    // decides the bucket: FEL carries the full 12-bit residual and ranks
    // highest, MEL is a near-empty layer and ranks right below it.
    // ==========================================================================

    #[test]
    fn test_profile7_fel_is_rank_zero() {
        for detail in ["Profile 7", "PROFILE 7", "prof 7", "P7", "profile7", "dvhe.07 (p7)"] {
            assert_eq!(
                classify("", detail, "FEL"),
                ProfileRank::DolbyVisionFel,
                "detail {:?} should be recognised as profile 7",
                detail
            );
        }
    }

    #[test]
    fn test_profile7_mel_is_rank_one() {
        assert_eq!(classify("", "Profile 7", "MEL"), ProfileRank::DolbyVisionMel);
        assert_eq!(classify("", "profile 7", "mel"), ProfileRank::DolbyVisionMel);
    }

    #[test]
    fn test_dolby_format_alone_counts_as_dolby_vision() {
        assert_eq!(classify("Dolby Vision", "", "FEL"), ProfileRank::DolbyVisionFel);
        assert_eq!(classify("DOLBY", "", "mel"), ProfileRank::DolbyVisionMel);
    }

    #[test]
    fn test_fel_wins_over_mel_when_both_present() {
        // Contradictory label, but FEL is checked first
        assert_eq!(classify("Dolby Vision", "Profile 7", "FEL/MEL"), ProfileRank::DolbyVisionFel);
    }

    #[test]
    fn test_enhancement_layer_without_dolby_vision_is_ignored() {
        assert_eq!(classify("HDR10", "", "FEL"), ProfileRank::Hdr);
        assert_eq!(classify("", "", "MEL"), ProfileRank::Unknown);
    }

    #[test]
    fn test_dolby_vision_without_layer_falls_through() {
        // A profile 7 stream with no EL info lands in the generic buckets
        assert_eq!(classify("Dolby Vision", "Profile 7", ""), ProfileRank::Unknown);
        assert_eq!(classify("Dolby Vision", "Profile 8.1", ""), ProfileRank::Profile8);
    }

    // ==========================================================================
    // SINGLE-LAYER PROFILES
    // ==========================================================================

    #[test]
    fn test_profile8_variants() {
        assert_eq!(classify("", "Profile 8", ""), ProfileRank::Profile8);
        assert_eq!(classify("", "profile8", ""), ProfileRank::Profile8);
        assert_eq!(classify("", "P8", ""), ProfileRank::Profile8);
        assert_eq!(classify("Dolby Vision Profile 8", "", ""), ProfileRank::Profile8);
        assert_eq!(classify("DV p8", "", ""), ProfileRank::Profile8);
    }

    #[test]
    fn test_profile5_only_checks_detail() {
        assert_eq!(classify("", "Profile 5", ""), ProfileRank::Profile5);
        assert_eq!(classify("", "profile5", ""), ProfileRank::Profile5);
        assert_eq!(classify("", "p5", ""), ProfileRank::Profile5);
        // Format is not consulted for profile 5
        assert_eq!(classify("Profile 5", "", ""), ProfileRank::Unknown);
    }

    #[test]
    fn test_profile8_beats_hdr10_fallback_layer() {
        // P8.1 streams usually also advertise HDR10 compatibility
        assert_eq!(classify("HDR10", "Profile 8", ""), ProfileRank::Profile8);
    }

    // ==========================================================================
    // GENERIC HDR / SDR
    // ==========================================================================

    #[test]
    fn test_generic_buckets() {
        assert_eq!(classify("HDR10+", "", ""), ProfileRank::Hdr10Plus);
        assert_eq!(classify("", "hdr10plus", ""), ProfileRank::Hdr10Plus);
        assert_eq!(classify("HDR10", "", ""), ProfileRank::Hdr);
        assert_eq!(classify("HLG", "", ""), ProfileRank::Hdr);
        assert_eq!(classify("", "SMPTE2084", ""), ProfileRank::Hdr);
        assert_eq!(classify("SDR", "", ""), ProfileRank::Sdr);
        assert_eq!(classify("", "", ""), ProfileRank::Unknown);
    }

    #[test]
    fn test_hdr10_plus_checked_before_hdr10() {
        // "hdr10+" contains "hdr10"; rule order keeps it in its own bucket
        assert_eq!(classify("hdr10+", "", ""), ProfileRank::Hdr10Plus);
    }

    #[test]
    fn test_rank_numbers_and_order() {
        assert_eq!(ProfileRank::DolbyVisionFel.as_u8(), 0);
        assert_eq!(ProfileRank::Unknown.as_u8(), 7);
        assert!(ProfileRank::Profile8 < ProfileRank::Profile5);
        assert!(ProfileRank::Sdr < ProfileRank::Unknown);
        assert_eq!(ProfileRank::Hdr10Plus.to_string(), "4 (HDR10+)");
    }
}
