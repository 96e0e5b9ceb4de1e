//! # Chart Assembly Module
//!
//! Builds the two comparison artifacts as plotly figure objects: the
//! dual depth-vs-time heatmap ("dynamics" view) and the single-date
//! depth profile overlay. Both are pure functions of a resolved
//! [`WellDataset`](crate::dataset::WellDataset); the Shell only renders
//! what comes out.
use plotly::contour::{Coloring, Contours};

pub mod dynamics;
pub mod profile;

pub use dynamics::dynamics_figure;
pub use profile::profile_figure;

/// X axis title of the dynamics view
pub const DATES_AXIS_TITLE: &str = "Measurement dates";
/// Y axis title shared by both views
pub const ELEVATION_AXIS_TITLE: &str = "Absolute elevation, m";
/// X axis title of the profile view
pub const TEMPERATURE_AXIS_TITLE: &str = "Temperature";
/// Top panel title of the dynamics view
pub const COMPUTED_PANEL_TITLE: &str = "Computed values";
/// Bottom panel title of the dynamics view
pub const MEASURED_PANEL_TITLE: &str = "Measurements";
/// Profile series name for the model curve
pub const COMPUTED_SERIES: &str = "Computed";
/// Profile series name for the field samples
pub const MEASURED_SERIES: &str = "Measured";

/// Fixed presentation parameters for both views.
///
/// The contour band and the profile range are display conventions of the
/// thermometry charts, not data-derived: every well renders on the same
/// scale so charts stay comparable across wells and uploads.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartStyle {
    /// First contour band boundary, degrees
    pub contour_start: f64,
    /// Last contour band boundary, degrees
    pub contour_end: f64,
    /// Contour band step, degrees
    pub contour_size: f64,
    /// Clamped x range of the profile view, degrees
    pub profile_range: (f64, f64),
    /// Canvas width, logical units
    pub width: usize,
    /// Canvas height, logical units
    pub height: usize,
}

impl Default for ChartStyle {
    fn default() -> Self {
        ChartStyle {
            contour_start: -5.0,
            contour_end: 7.0,
            contour_size: 0.5,
            profile_range: (-10.0, 10.0),
            width: 1000,
            height: 800,
        }
    }
}

impl ChartStyle {
    /// Contour banding shared by both heatmap panels.
    ///
    /// Built in one place so the panels cannot drift apart; independent
    /// auto-scaling would make the computed and measured surfaces
    /// incomparable.
    pub(crate) fn contour_bands(&self) -> Contours {
        Contours::new()
            .coloring(Coloring::HeatMap)
            .show_labels(true)
            .start(self.contour_start)
            .end(self.contour_end)
            .size(self.contour_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_style_matches_display_conventions() {
        let style = ChartStyle::default();

        assert_eq!(style.contour_start, -5.0);
        assert_eq!(style.contour_end, 7.0);
        assert_eq!(style.contour_size, 0.5);
        assert_eq!(style.profile_range, (-10.0, 10.0));
        assert_eq!((style.width, style.height), (1000, 800));
    }
}
