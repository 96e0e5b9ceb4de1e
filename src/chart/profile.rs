//! Single-date profile ("1-D graphs") view: the computed curve and the
//! measured samples of one date column over the shared depth domain.
use crate::chart::{
    ChartStyle, COMPUTED_SERIES, ELEVATION_AXIS_TITLE, MEASURED_SERIES, TEMPERATURE_AXIS_TITLE,
};
use crate::dataset::{DatasetError, WellDataset};
use plotly::common::{Mode, Title};
use plotly::layout::{Axis, Layout};
use plotly::{Plot, Scatter};
use tracing::debug;

/// Builds the profile overlay for one date column of a resolved dataset.
///
/// The computed series is drawn as a plain line over the truncation mask;
/// the measured series is drawn with markers so the discrete field
/// samples stand out against the denser model curve. The temperature
/// axis is clamped to the style's fixed range whatever the data extent;
/// readings outside it clip out of view rather than erroring.
///
/// # Arguments
///
/// * `dataset` - Resolved well dataset
/// * `date` - Selected date label, one of [`WellDataset::dates`]
/// * `style` - Fixed presentation parameters
///
/// # Returns
///
/// * `Result<Plot, DatasetError>` - The assembled figure, or
///   [`DatasetError::UnknownDateColumn`] for a stale label
pub fn profile_figure(
    dataset: &WellDataset,
    date: &str,
    style: &ChartStyle,
) -> Result<Plot, DatasetError> {
    let date_index = dataset.date_index(date)?;

    let computed = Scatter::new(dataset.masked_column(date_index), dataset.masked_abs())
        .name(COMPUTED_SERIES)
        .mode(Mode::Lines);

    let measured = Scatter::new(
        dataset.measurements.column(date_index),
        dataset.measurements.abs.clone(),
    )
    .name(MEASURED_SERIES)
    .mode(Mode::LinesMarkers);

    let layout = Layout::new()
        .width(style.width)
        .height(style.height)
        .x_axis(
            Axis::new()
                .title(Title::with_text(TEMPERATURE_AXIS_TITLE))
                .range(vec![style.profile_range.0, style.profile_range.1]),
        )
        .y_axis(Axis::new().title(Title::with_text(ELEVATION_AXIS_TITLE)));

    let mut plot = Plot::new();
    plot.add_trace(computed);
    plot.add_trace(measured);
    plot.set_layout(layout);
    debug!(well = %dataset.well, date, "profile figure assembled");
    Ok(plot)
}
