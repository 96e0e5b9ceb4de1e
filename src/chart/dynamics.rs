//! Dual heatmap ("dynamics") view: computed and measured depth-by-date
//! surfaces stacked vertically over one shared date axis.
use crate::chart::{
    ChartStyle, COMPUTED_PANEL_TITLE, DATES_AXIS_TITLE, ELEVATION_AXIS_TITLE,
    MEASURED_PANEL_TITLE,
};
use crate::dataset::WellDataset;
use plotly::common::{Anchor, ColorScale, ColorScalePalette, Font, Title};
use plotly::layout::{Annotation, Axis, GridPattern, Layout, LayoutGrid, RowOrder};
use plotly::{Contour, Plot};
use tracing::debug;

/// Builds the dynamics figure for a resolved well dataset.
///
/// The top panel shows the computation surface truncated to the depth
/// range covered by measurements; the bottom panel shows the full
/// measurement surface. Both panels carry the same color scale and the
/// same contour banding, so a cell of a given temperature renders the
/// same color in either panel.
///
/// # Arguments
///
/// * `dataset` - Resolved well dataset
/// * `style` - Fixed presentation parameters
///
/// # Returns
///
/// * `Plot` - The assembled two-panel figure object
pub fn dynamics_figure(dataset: &WellDataset, style: &ChartStyle) -> Plot {
    let dates = dataset.dates().to_vec();
    let bands = style.contour_bands();

    let computed = Contour::new(dates.clone(), dataset.masked_abs(), dataset.masked_values())
        .name(COMPUTED_PANEL_TITLE)
        .color_scale(ColorScale::Palette(ColorScalePalette::Jet))
        .contours(bands.clone())
        .x_axis("x")
        .y_axis("y");

    let measured = Contour::new(
        dates,
        dataset.measurements.abs.clone(),
        dataset.measurements.values.clone(),
    )
    .name(MEASURED_PANEL_TITLE)
    .color_scale(ColorScale::Palette(ColorScalePalette::Jet))
    .contours(bands)
    .show_scale(false)
    .x_axis("x2")
    .y_axis("y2");

    let layout = Layout::new()
        .grid(
            LayoutGrid::new()
                .rows(2)
                .columns(1)
                .pattern(GridPattern::Independent)
                .row_order(RowOrder::TopToBottom),
        )
        .width(style.width)
        .height(style.height)
        .x_axis(Axis::new().title(Title::with_text(DATES_AXIS_TITLE)))
        .y_axis(Axis::new().title(Title::with_text(ELEVATION_AXIS_TITLE)))
        .x_axis2(
            Axis::new()
                .title(Title::with_text(DATES_AXIS_TITLE))
                .matches("x"),
        )
        .y_axis2(Axis::new().title(Title::with_text(ELEVATION_AXIS_TITLE)))
        .annotations(vec![
            panel_title(COMPUTED_PANEL_TITLE, 1.0),
            panel_title(MEASURED_PANEL_TITLE, 0.425),
        ]);

    let mut plot = Plot::new();
    plot.add_trace(computed);
    plot.add_trace(measured);
    plot.set_layout(layout);
    debug!(well = %dataset.well, "dynamics figure assembled");
    plot
}

/// Centered paper-anchored caption above one panel.
fn panel_title(text: &str, y: f64) -> Annotation {
    Annotation::new()
        .text(text)
        .x_ref("paper")
        .y_ref("paper")
        .x(0.5)
        .y(y)
        .x_anchor(Anchor::Center)
        .y_anchor(Anchor::Bottom)
        .show_arrow(false)
        .font(Font::new().size(16))
}
