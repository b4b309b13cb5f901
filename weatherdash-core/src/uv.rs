//! UV index risk bands.

use serde::Serialize;

/// Index at which the scale marker reaches the right edge.
const SCALE_MAX: f64 = 11.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UvBand {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl UvBand {
    pub const ALL: [UvBand; 5] =
        [UvBand::Low, UvBand::Moderate, UvBand::High, UvBand::VeryHigh, UvBand::Extreme];

    pub fn label(&self) -> &'static str {
        match self {
            UvBand::Low => "Low",
            UvBand::Moderate => "Moderate",
            UvBand::High => "High",
            UvBand::VeryHigh => "Very High",
            UvBand::Extreme => "Extreme",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            UvBand::Low => "#299501",
            UvBand::Moderate => "#F7E401",
            UvBand::High => "#F95901",
            UvBand::VeryHigh => "#D90011",
            UvBand::Extreme => "#6C49CB",
        }
    }

    /// Inclusive range of rounded indices covered by the band.
    pub fn range(&self) -> (u8, Option<u8>) {
        match self {
            UvBand::Low => (0, Some(2)),
            UvBand::Moderate => (3, Some(5)),
            UvBand::High => (6, Some(7)),
            UvBand::VeryHigh => (8, Some(10)),
            UvBand::Extreme => (11, None),
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            UvBand::Low => "No protection needed.",
            UvBand::Moderate => "Wear sunscreen and a hat.",
            UvBand::High => "Use SPF 30+ sunscreen, a hat and sunglasses.",
            UvBand::VeryHigh => "Avoid the sun between 10 AM and 4 PM. Use SPF 50+ sunscreen.",
            UvBand::Extreme => "Extreme! Avoid sun exposure and use every protection available.",
        }
    }
}

/// Band for a UV index. The index is rounded first; negative and non-finite
/// values fall into [`UvBand::Low`].
pub fn uv_band(uv: f64) -> UvBand {
    if !uv.is_finite() {
        return UvBand::Low;
    }
    match uv.round() {
        r if r >= 11.0 => UvBand::Extreme,
        r if r >= 8.0 => UvBand::VeryHigh,
        r if r >= 6.0 => UvBand::High,
        r if r >= 3.0 => UvBand::Moderate,
        _ => UvBand::Low,
    }
}

/// Marker position on a 0–11 scale, as a percentage clamped to 0..=100.
pub fn scale_position(uv: f64) -> f64 {
    if !uv.is_finite() {
        return 0.0;
    }
    (uv.round() / SCALE_MAX * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges_use_rounded_index() {
        assert_eq!(uv_band(0.0), UvBand::Low);
        assert_eq!(uv_band(2.4), UvBand::Low);
        assert_eq!(uv_band(2.5), UvBand::Moderate);
        assert_eq!(uv_band(5.0), UvBand::Moderate);
        assert_eq!(uv_band(6.0), UvBand::High);
        assert_eq!(uv_band(7.4), UvBand::High);
        assert_eq!(uv_band(8.0), UvBand::VeryHigh);
        assert_eq!(uv_band(10.4), UvBand::VeryHigh);
        assert_eq!(uv_band(10.5), UvBand::Extreme);
        assert_eq!(uv_band(14.0), UvBand::Extreme);
    }

    #[test]
    fn odd_values_fall_back_to_low() {
        assert_eq!(uv_band(-3.0), UvBand::Low);
        assert_eq!(uv_band(f64::NAN), UvBand::Low);
    }

    #[test]
    fn scale_position_is_clamped() {
        assert_eq!(scale_position(0.0), 0.0);
        assert_eq!(scale_position(11.0), 100.0);
        assert_eq!(scale_position(20.0), 100.0);
        assert_eq!(scale_position(-1.0), 0.0);
    }

    #[test]
    fn bands_cover_contiguous_ranges() {
        let mut expected_start = 0u8;
        for band in UvBand::ALL {
            let (start, end) = band.range();
            assert_eq!(start, expected_start, "{band:?}");
            if let Some(end) = end {
                expected_start = end + 1;
            }
        }
    }
}
