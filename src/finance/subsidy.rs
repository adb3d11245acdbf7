//! Residential rooftop subsidy schedules.

use std::fmt;

/// Capacity covered by the first subsidy tier (kW).
pub const FIRST_TIER_KW: f64 = 3.0;
/// Share of cost reimbursed in the first tier.
pub const FIRST_TIER_RATE: f64 = 0.40;
/// Capacity above which no further subsidy accrues (kW).
pub const SUBSIDY_CAP_KW: f64 = 10.0;
/// Share of cost reimbursed between the first tier and the cap.
pub const SECOND_TIER_RATE: f64 = 0.20;

/// Tiered capital subsidy schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubsidyPolicy {
    /// Flat first tier: any system up to 3 kW receives the full 3 kW amount.
    #[default]
    PmSuryaGhar,
    /// First tier scales with capacity below 3 kW.
    PmSuryaGharProrated,
    NoSubsidy,
}

impl SubsidyPolicy {
    pub const ALL: [SubsidyPolicy; 3] = [
        Self::PmSuryaGhar,
        Self::PmSuryaGharProrated,
        Self::NoSubsidy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::PmSuryaGhar => "pm_surya_ghar",
            Self::PmSuryaGharProrated => "pm_surya_ghar_prorated",
            Self::NoSubsidy => "none",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Subsidy for a system, truncated to a whole currency unit.
    ///
    /// Fractions are dropped rather than rounded, so the payout never exceeds
    /// the tier formula.
    ///
    /// # Arguments
    ///
    /// * `system_size_kw` - Installed capacity
    /// * `cost_per_kw` - Installed cost per kW
    pub fn subsidy(self, system_size_kw: f64, cost_per_kw: f64) -> f64 {
        let size = system_size_kw.max(0.0);
        let cost = cost_per_kw.max(0.0);
        let first_tier_kw = match self {
            Self::NoSubsidy => return 0.0,
            Self::PmSuryaGhar => FIRST_TIER_KW,
            Self::PmSuryaGharProrated => size.min(FIRST_TIER_KW),
        };
        let first = first_tier_kw * cost * FIRST_TIER_RATE;
        let second = (size.min(SUBSIDY_CAP_KW) - FIRST_TIER_KW).max(0.0) * cost * SECOND_TIER_RATE;
        // 1e-6 absorbs float noise such as 6599.9999999 before truncating
        (first + second + 1e-6).trunc()
    }
}

impl fmt::Display for SubsidyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl serde::Serialize for SubsidyPolicy {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
