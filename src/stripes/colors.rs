//! Diverging color scale for the stripe band.
//!
//! Blue for cold years, red for warm years, a neutral midpoint in between.
//! One scale instance spans a whole stripe batch so fills stay comparable
//! across the series.

use plotters::style::colors::colormaps::{ColorMap, DerivedColorMap};
use plotters::style::RGBColor;

/// Anchor colors of the reversed red-blue diverging map, cold to warm.
const DIVERGING_ANCHORS: [RGBColor; 11] = [
    RGBColor(5, 48, 97),
    RGBColor(33, 102, 172),
    RGBColor(67, 147, 195),
    RGBColor(146, 197, 222),
    RGBColor(209, 229, 240),
    RGBColor(247, 247, 247),
    RGBColor(253, 219, 199),
    RGBColor(244, 165, 130),
    RGBColor(214, 96, 77),
    RGBColor(178, 24, 43),
    RGBColor(103, 0, 31),
];

/// Fill for years without a reading. Such years are excluded from the
/// normalization and drawn in this neutral grey instead of aborting the
/// render.
pub const MISSING_FILL: RGBColor = RGBColor(189, 189, 189);

/// A diverging scale normalized over one batch of values.
pub struct DivergingScale {
    colormap: DerivedColorMap<RGBColor>,
    min: f64,
    max: f64,
}

impl DivergingScale {
    /// Builds the scale from every present value of the batch.
    ///
    /// Returns `None` when the batch holds no values at all; callers then
    /// fall back to [`MISSING_FILL`] for every stripe.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut seen = false;
        for value in values {
            seen = true;
            min = min.min(value);
            max = max.max(value);
        }
        if !seen {
            return None;
        }
        Some(Self {
            colormap: DerivedColorMap::new(&DIVERGING_ANCHORS),
            min,
            max,
        })
    }

    /// Maps one year's reading onto a fill color; missing readings get the
    /// neutral fill.
    pub fn color_for(&self, value: Option<f64>) -> RGBColor {
        let Some(value) = value else {
            return MISSING_FILL;
        };
        if self.max - self.min < f64::EPSILON {
            // Constant series: every stripe sits on the neutral midpoint.
            return self.colormap.get_color(0.5);
        }
        self.colormap
            .get_color_normalized(value as f32, self.min as f32, self.max as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cold_end_is_blue_warm_end_is_red() {
        let scale = DivergingScale::from_values([7.0, 8.0, 9.0]).unwrap();
        let cold = scale.color_for(Some(7.0));
        let warm = scale.color_for(Some(9.0));
        assert!(cold.2 > cold.0, "cold fill should lean blue: {:?}", cold);
        assert!(warm.0 > warm.2, "warm fill should lean red: {:?}", warm);
    }

    #[test]
    fn missing_years_get_the_neutral_fill() {
        let scale = DivergingScale::from_values([7.0, 9.0]).unwrap();
        assert_eq!(scale.color_for(None), MISSING_FILL);
    }

    #[test]
    fn constant_series_does_not_divide_by_zero() {
        let scale = DivergingScale::from_values([8.5, 8.5, 8.5]).unwrap();
        let fill = scale.color_for(Some(8.5));
        assert_ne!(fill, MISSING_FILL);
    }

    #[test]
    fn all_missing_batch_has_no_scale() {
        assert!(DivergingScale::from_values(std::iter::empty()).is_none());
    }
}
