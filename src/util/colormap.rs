// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Named colormaps for body-part markers.
//!
//! Markers are colored by their ordinal in the placeable body-part list,
//! normalized over `[0, count]` and fed through one of these maps.

use crate::error::{LabelingError, Result};

/// A continuous colormap `[0, 1] -> RGB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Hsv,
    Jet,
    Rainbow,
    Cool,
    Spring,
    Summer,
    Autumn,
    Winter,
    Gray,
}

impl ColorScheme {
    /// Look up a colormap by its (case-insensitive) name.
    pub fn from_name(name: &str) -> Result<Self> {
        let scheme = match name.trim().to_ascii_lowercase().as_str() {
            "hsv" => Self::Hsv,
            "jet" => Self::Jet,
            "rainbow" => Self::Rainbow,
            "cool" => Self::Cool,
            "spring" => Self::Spring,
            "summer" => Self::Summer,
            "autumn" => Self::Autumn,
            "winter" => Self::Winter,
            "gray" | "grey" => Self::Gray,
            other => {
                return Err(LabelingError::InvalidConfig(format!(
                    "unsupported colormap '{}'",
                    other
                )))
            }
        };
        Ok(scheme)
    }

    /// Sample the colormap. `t` is clamped to `[0, 1]`.
    pub fn sample(self, t: f32) -> [f32; 3] {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        match self {
            Self::Hsv => hsv_to_rgb(t * 360.0, 1.0, 1.0),
            Self::Jet => [
                clamp01(1.5 - (4.0 * t - 3.0).abs()),
                clamp01(1.5 - (4.0 * t - 2.0).abs()),
                clamp01(1.5 - (4.0 * t - 1.0).abs()),
            ],
            Self::Rainbow => [
                clamp01((2.0 * t - 0.5).abs()),
                clamp01((std::f32::consts::PI * t).sin()),
                clamp01((std::f32::consts::FRAC_PI_2 * t).cos()),
            ],
            Self::Cool => [t, 1.0 - t, 1.0],
            Self::Spring => [1.0, t, 1.0 - t],
            Self::Summer => [t, 0.5 + t / 2.0, 0.4],
            Self::Autumn => [1.0, t, 0.0],
            Self::Winter => [0.0, t, 1.0 - t / 2.0],
            Self::Gray => [t, t, t],
        }
    }

    /// Color for the body part at `ordinal` in a palette of `count` parts.
    pub fn color_for(self, ordinal: usize, count: usize) -> [f32; 3] {
        self.sample(normalize(ordinal, count))
    }
}

/// Linear normalization of `ordinal` over `[0, count]`.
pub fn normalize(ordinal: usize, count: usize) -> f32 {
    if count == 0 {
        return 0.0;
    }
    ordinal as f32 / count as f32
}

fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let h = h % 360.0;
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;
    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    [r + m, g + m, b + m]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-4)
    }

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(ColorScheme::from_name("Jet").unwrap(), ColorScheme::Jet);
        assert_eq!(ColorScheme::from_name("grey").unwrap(), ColorScheme::Gray);
        assert!(ColorScheme::from_name("plasma_custom").is_err());
    }

    #[test]
    fn test_normalize_over_count() {
        assert_eq!(normalize(0, 4), 0.0);
        assert_eq!(normalize(2, 4), 0.5);
        assert_eq!(normalize(4, 4), 1.0);
        assert_eq!(normalize(3, 0), 0.0);
    }

    #[test]
    fn test_hsv_endpoints_are_red() {
        assert!(close(ColorScheme::Hsv.sample(0.0), [1.0, 0.0, 0.0]));
        assert!(close(ColorScheme::Hsv.sample(1.0), [1.0, 0.0, 0.0]));
        assert!(close(ColorScheme::Hsv.sample(1.0 / 3.0), [0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_jet_midpoint_is_green() {
        assert!(close(ColorScheme::Jet.sample(0.5), [0.5, 1.0, 0.5]));
        assert!(close(ColorScheme::Jet.sample(0.0), [0.0, 0.0, 0.5]));
    }

    #[test]
    fn test_sample_clamps_out_of_range() {
        assert_eq!(ColorScheme::Gray.sample(-1.0), [0.0, 0.0, 0.0]);
        assert_eq!(ColorScheme::Gray.sample(2.0), [1.0, 1.0, 1.0]);
        assert_eq!(ColorScheme::Gray.sample(f32::NAN), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_distinct_ordinals_get_distinct_colors() {
        let a = ColorScheme::Hsv.color_for(0, 3);
        let b = ColorScheme::Hsv.color_for(1, 3);
        let c = ColorScheme::Hsv.color_for(2, 3);
        assert!(!close(a, b));
        assert!(!close(b, c));
    }
}
