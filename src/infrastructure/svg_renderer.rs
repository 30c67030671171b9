// SVG chart renderer built on plotters
use crate::application::chart_renderer::{ChartRenderer, RenderError};
use crate::domain::chart::{AxisSpec, ChartImage, ChartLayout};
use crate::domain::reading::{Metric, Series};
use chrono::Timelike;
use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use std::fmt::Display;

const CAPTION_SIZE: f64 = 28.0;
const LABEL_SIZE: f64 = 16.0;
const MARGIN: u32 = 20;
const X_LABEL_AREA: u32 = 50;
const Y_LABEL_AREA: u32 = 70;
const TICK_LEN: i32 = 5;

const CO_COLOR: RGBColor = RGBColor(255, 165, 0);
const TVOC_COLOR: RGBColor = RGBColor(0, 0, 255);
const TEMPERATURE_COLOR: RGBColor = RGBColor(214, 39, 40);
const HUMIDITY_COLOR: RGBColor = RGBColor(31, 119, 180);
const PM25_COLOR: RGBColor = RGBColor(31, 119, 180);
const PM10_COLOR: RGBColor = RGBColor(255, 127, 14);
const GRID_COLOR: RGBColor = RGBColor(225, 225, 225);

#[derive(Debug, Clone)]
pub struct SvgChartRenderer {
    width: u32,
    height: u32,
}

impl SvgChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn render(
        &self,
        series: &Series,
        layout: &ChartLayout,
        label: &str,
    ) -> Result<ChartImage, RenderError> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(backend_error)?;

            let panels = root.split_evenly((3, 1));
            draw_co_tvoc(&panels[0], series, layout, label)?;
            draw_climate(&panels[1], series, layout, label)?;
            draw_particulates(&panels[2], series, layout, label)?;

            root.present().map_err(backend_error)?;
        }

        Ok(ChartImage {
            bytes: svg.into_bytes(),
            extension: "svg",
        })
    }
}

fn backend_error<E: Display>(e: E) -> RenderError {
    RenderError::Backend(e.to_string())
}

fn font(size: f64) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, size, FontStyle::Normal)
}

fn clock_label(secs: f64) -> String {
    let secs = secs.round().max(0.0) as u32;
    format!("{:02}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60)
}

/// Whole-number ticks print without decimals; fractional steps get two.
fn value_label(axis: &AxisSpec, value: f64) -> String {
    match axis.interval() {
        Some(step) if step.fract() != 0.0 => format!("{:.2}", value),
        _ => format!("{:.0}", value),
    }
}

/// Splits a metric into contiguous runs of present values. Gap markers end a
/// run so the plotted line breaks there.
fn segments(series: &Series, metric: Metric) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (time, value) in series.timestamps().iter().zip(series.values(metric)) {
        match value {
            Some(v) => current.push((time.num_seconds_from_midnight() as f64, *v)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

type Panel<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Which side of the plotting area a row of tick labels sits on.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Edge {
    Bottom,
    Left,
    Right,
}

/// Draws a tick mark and label at each of `axis.ticks` along `edge`.
///
/// plotters picks its own "nice" tick positions, so the exact ticks are drawn
/// by hand. `cross` is the value on the other axis where the edge lies.
fn draw_ticks<'a, DB: DrawingBackend + 'a>(
    area: &DrawingArea<DB, Shift>,
    chart: &Panel<'a, DB>,
    axis: &AxisSpec,
    cross: f64,
    edge: Edge,
    color: &RGBColor,
    format: impl Fn(f64) -> String,
) -> Result<(), RenderError> {
    let (base_x, base_y) = area.get_base_pixel();
    let (anchor, mark, offset) = match edge {
        Edge::Bottom => (Pos::new(HPos::Center, VPos::Top), (0, TICK_LEN), (0, 2 * TICK_LEN)),
        Edge::Left => (Pos::new(HPos::Right, VPos::Center), (-TICK_LEN, 0), (-2 * TICK_LEN, 0)),
        Edge::Right => (Pos::new(HPos::Left, VPos::Center), (TICK_LEN, 0), (2 * TICK_LEN, 0)),
    };
    let style = font(LABEL_SIZE).color(color).pos(anchor);

    for &tick in &axis.ticks {
        let point = match edge {
            Edge::Bottom => (tick, cross),
            Edge::Left | Edge::Right => (cross, tick),
        };
        let (x, y) = chart.backend_coord(&point);
        let (x, y) = (x - base_x, y - base_y);

        area.draw(&PathElement::new(vec![(x, y), (x + mark.0, y + mark.1)], BLACK))
            .map_err(backend_error)?;
        area.draw(&Text::new(format(tick), (x + offset.0, y + offset.1), style.clone()))
            .map_err(backend_error)?;
    }
    Ok(())
}

/// Light grid lines at the exact time ticks and the primary value ticks.
fn draw_grid<'a, DB: DrawingBackend + 'a>(
    chart: &mut Panel<'a, DB>,
    time: &AxisSpec,
    values: &AxisSpec,
) -> Result<(), RenderError> {
    let vertical = time
        .ticks
        .iter()
        .map(|&t| PathElement::new(vec![(t, values.min), (t, values.max)], GRID_COLOR));
    let horizontal = values
        .ticks
        .iter()
        .map(|&v| PathElement::new(vec![(time.min, v), (time.max, v)], GRID_COLOR));
    chart
        .draw_series(vertical.chain(horizontal))
        .map_err(backend_error)?;
    Ok(())
}

/// Axis lines and descriptions only; tick labels come from `draw_ticks`.
fn draw_axes<'a, DB: DrawingBackend + 'a>(
    chart: &mut Panel<'a, DB>,
    x_desc: Option<&str>,
    y_desc: Option<(&str, &RGBColor)>,
) -> Result<(), RenderError> {
    let mut mesh = chart.configure_mesh();
    mesh.disable_mesh().x_labels(0).y_labels(0);
    if let Some(desc) = x_desc {
        mesh.x_desc(desc);
    }
    if let Some((desc, color)) = y_desc {
        mesh.y_desc(desc).axis_desc_style(font(LABEL_SIZE).color(color));
    }
    mesh.draw().map_err(backend_error)
}

/// Draws every run of `metric`, labelling only the first.
/// Returns whether anything was drawn.
fn plot_metric<'a, DB: DrawingBackend + 'a>(
    chart: &mut Panel<'a, DB>,
    series: &Series,
    metric: Metric,
    color: RGBColor,
) -> Result<bool, RenderError> {
    let runs = segments(series, metric);
    let drawn = !runs.is_empty();
    for (index, run) in runs.into_iter().enumerate() {
        let anno = chart
            .draw_series(LineSeries::new(run, color.stroke_width(2)))
            .map_err(backend_error)?;
        if index == 0 {
            anno.label(metric.name())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }
    }
    Ok(drawn)
}

fn draw_legend<'a, DB: DrawingBackend + 'a>(
    chart: &mut Panel<'a, DB>,
    position: SeriesLabelPosition,
) -> Result<(), RenderError> {
    chart
        .configure_series_labels()
        .position(position)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(0.3))
        .label_font(font(LABEL_SIZE))
        .draw()
        .map_err(backend_error)
}

fn draw_co_tvoc<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    series: &Series,
    layout: &ChartLayout,
    label: &str,
) -> Result<(), RenderError> {
    let (time, values) = (&layout.time, &layout.co_tvoc);
    let mut chart = ChartBuilder::on(area)
        .caption(format!("CO & TVOC ({})", label), font(CAPTION_SIZE))
        .margin(MARGIN)
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(Y_LABEL_AREA)
        .build_cartesian_2d(time.min..time.max, values.min..values.max)
        .map_err(backend_error)?;

    draw_grid(&mut chart, time, values)?;
    draw_axes(&mut chart, None, None)?;
    draw_ticks(area, &chart, time, values.min, Edge::Bottom, &BLACK, clock_label)?;
    draw_ticks(area, &chart, values, time.min, Edge::Left, &BLACK, |v| {
        value_label(values, v)
    })?;

    let co = plot_metric(&mut chart, series, Metric::Co, CO_COLOR)?;
    let tvoc = plot_metric(&mut chart, series, Metric::Tvoc, TVOC_COLOR)?;
    if co || tvoc {
        draw_legend(&mut chart, SeriesLabelPosition::UpperRight)?;
    }
    Ok(())
}

/// Temperature on the left axis, humidity on the right, each with its own
/// legend and tick colour.
///
/// Two charts are laid over the same plotting rectangle: the left one
/// reserves the right label area as margin and the right one does the
/// opposite, so both map time to identical pixels.
fn draw_climate<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    series: &Series,
    layout: &ChartLayout,
    label: &str,
) -> Result<(), RenderError> {
    let time = &layout.time;
    let (temperature, humidity) = (&layout.temperature, &layout.humidity);
    let area = area
        .titled(&format!("Temperature & Humidity ({})", label), font(CAPTION_SIZE))
        .map_err(backend_error)?;

    let mut left = ChartBuilder::on(&area)
        .margin(MARGIN)
        .margin_right(MARGIN + Y_LABEL_AREA)
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(Y_LABEL_AREA)
        .build_cartesian_2d(time.min..time.max, temperature.min..temperature.max)
        .map_err(backend_error)?;
    let mut right = ChartBuilder::on(&area)
        .margin(MARGIN)
        .margin_left(MARGIN + Y_LABEL_AREA)
        .margin_bottom(MARGIN + X_LABEL_AREA)
        .right_y_label_area_size(Y_LABEL_AREA)
        .build_cartesian_2d(time.min..time.max, humidity.min..humidity.max)
        .map_err(backend_error)?;

    draw_grid(&mut left, time, temperature)?;
    draw_axes(&mut left, Some("Time"), Some(("Temperature (°C)", &TEMPERATURE_COLOR)))?;
    draw_axes(&mut right, None, Some(("Humidity (%)", &HUMIDITY_COLOR)))?;
    draw_ticks(&area, &left, time, temperature.min, Edge::Bottom, &BLACK, clock_label)?;
    draw_ticks(&area, &left, temperature, time.min, Edge::Left, &TEMPERATURE_COLOR, |v| {
        value_label(temperature, v)
    })?;
    draw_ticks(&area, &right, humidity, time.max, Edge::Right, &HUMIDITY_COLOR, |v| {
        value_label(humidity, v)
    })?;

    if plot_metric(&mut left, series, Metric::Temperature, TEMPERATURE_COLOR)? {
        draw_legend(&mut left, SeriesLabelPosition::UpperLeft)?;
    }
    if plot_metric(&mut right, series, Metric::Humidity, HUMIDITY_COLOR)? {
        draw_legend(&mut right, SeriesLabelPosition::UpperRight)?;
    }
    Ok(())
}

fn draw_particulates<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    series: &Series,
    layout: &ChartLayout,
    label: &str,
) -> Result<(), RenderError> {
    let (time, values) = (&layout.time, &layout.particulates);
    let mut chart = ChartBuilder::on(area)
        .caption(format!("PM2.5 & PM10 ({})", label), font(CAPTION_SIZE))
        .margin(MARGIN)
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(Y_LABEL_AREA)
        .build_cartesian_2d(time.min..time.max, values.min..values.max)
        .map_err(backend_error)?;

    draw_grid(&mut chart, time, values)?;
    draw_axes(&mut chart, None, None)?;
    draw_ticks(area, &chart, time, values.min, Edge::Bottom, &BLACK, clock_label)?;
    draw_ticks(area, &chart, values, time.min, Edge::Left, &BLACK, |v| {
        value_label(values, v)
    })?;

    let pm25 = plot_metric(&mut chart, series, Metric::Pm25, PM25_COLOR)?;
    let pm10 = plot_metric(&mut chart, series, Metric::Pm10, PM10_COLOR)?;
    if pm25 || pm10 {
        draw_legend(&mut chart, SeriesLabelPosition::UpperRight)?;
    }
    Ok(())
}
