use serde::Serialize;

/// Fixed color bands for report counts at one location.
///
/// The same colors drive the heat layer gradient, the marker badges and the
/// legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityBand {
    Low,
    Medium,
    High,
    VeryHigh,
    Critical,
    Severe,
}

impl IntensityBand {
    /// Lowest band first.
    pub const ALL: [IntensityBand; 6] = [
        IntensityBand::Low,
        IntensityBand::Medium,
        IntensityBand::High,
        IntensityBand::VeryHigh,
        IntensityBand::Critical,
        IntensityBand::Severe,
    ];

    /// Band for a report count. Counts of 2 or less are `Low`.
    pub fn from_count(count: u32) -> Self {
        match count {
            10.. => IntensityBand::Severe,
            9 => IntensityBand::Critical,
            7..=8 => IntensityBand::VeryHigh,
            5..=6 => IntensityBand::High,
            3..=4 => IntensityBand::Medium,
            _ => IntensityBand::Low,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            IntensityBand::Low => "#22c55e",
            IntensityBand::Medium => "#84cc16",
            IntensityBand::High => "#eab308",
            IntensityBand::VeryHigh => "#f97316",
            IntensityBand::Critical => "#dc2626",
            IntensityBand::Severe => "#7f1d1d",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IntensityBand::Low => "Low",
            IntensityBand::Medium => "Medium",
            IntensityBand::High => "High",
            IntensityBand::VeryHigh => "Very High",
            IntensityBand::Critical => "Critical",
            IntensityBand::Severe => "Severe",
        }
    }

    /// Inclusive count range; `None` upper bound means open-ended.
    pub fn range(&self) -> (u32, Option<u32>) {
        match self {
            IntensityBand::Low => (1, Some(2)),
            IntensityBand::Medium => (3, Some(4)),
            IntensityBand::High => (5, Some(6)),
            IntensityBand::VeryHigh => (7, Some(8)),
            IntensityBand::Critical => (9, Some(9)),
            IntensityBand::Severe => (10, None),
        }
    }

    /// Position of this band on the normalized 0..1 heat gradient.
    pub fn gradient_stop(&self) -> f64 {
        match self {
            IntensityBand::Low => 0.2,
            IntensityBand::Medium => 0.4,
            IntensityBand::High => 0.6,
            IntensityBand::VeryHigh => 0.7,
            IntensityBand::Critical => 0.9,
            IntensityBand::Severe => 1.0,
        }
    }
}
