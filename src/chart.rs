//! Builds ECharts-compatible line chart options from reshaped series and
//! hands them to a [`ChartSurface`].
//!
//! Per-item lines are aligned on the [`UnifiedAxis`] with `null` for dates an
//! item has no row on. When the result is a set, one extra line shows the
//! per-date sum of every item's highest price, where a missing row counts as 0.

use std::sync::{Arc, Mutex};

use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::config;
use crate::error::{PriceError, Result};
use crate::format::{escape_html, format_axis_value, format_price, truncate_date};
use crate::labels::Labels;
use crate::models::{ItemSeries, UnifiedAxis};
use crate::reshape::{align_highest, align_lowest, has_set_prices, set_total};

// ---------------------------------------------------------------------------
// ChartOption — serialized with ECharts field names
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOption {
    pub title: Title,
    pub tooltip: Tooltip,
    pub legend: Legend,
    pub grid: Grid,
    pub x_axis: XAxis,
    pub y_axis: YAxis,
    pub series: Vec<LineSeries>,
    pub animation: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    pub subtext: String,
    pub left: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub trigger: &'static str,
    pub axis_pointer: AxisPointer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisPointer {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub animation: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub data: Vec<String>,
    pub top: u32,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub page_button_position: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub left: &'static str,
    pub right: &'static str,
    pub bottom: &'static str,
    pub contain_label: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XAxis {
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Axis dates, already truncated to the calendar day.
    pub data: Vec<String>,
    pub axis_label: AxisLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLabel {
    pub interval: usize,
    pub rotate: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YAxis {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    pub split_line: SplitLine,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitLine {
    pub show: bool,
    pub line_style: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSeries {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// One point per axis date; `None` serializes as `null` (no point).
    pub data: Vec<Option<f64>>,
    pub smooth: bool,
    pub symbol: &'static str,
    pub line_style: LineStyle,
    pub sampling: &'static str,
    pub progressive: u32,
    pub progressive_threshold: u32,
    pub animation: bool,
    pub emphasis: Emphasis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Emphasis {
    pub disabled: bool,
}

impl LineSeries {
    fn item_line(name: String, data: Vec<Option<f64>>) -> Self {
        Self {
            name,
            kind: "line",
            data,
            smooth: true,
            symbol: "none",
            line_style: LineStyle {
                width: Some(2),
                kind: None,
                color: None,
            },
            sampling: config::SAMPLING,
            progressive: config::PROGRESSIVE,
            progressive_threshold: config::PROGRESSIVE_THRESHOLD,
            animation: false,
            emphasis: Emphasis { disabled: true },
        }
    }

    fn set_total_line(name: String, totals: Vec<f64>) -> Self {
        Self {
            smooth: false,
            line_style: LineStyle {
                width: Some(3),
                kind: Some("dashed"),
                color: Some("#ff5722"),
            },
            ..Self::item_line(name, totals.into_iter().map(Some).collect())
        }
    }
}

/// Build the chart option for `series`.
///
/// Series are emitted as `highest` then `lowest` per item, in item order,
/// followed by the set total when any item carries set prices.
pub fn build_option(series: &[ItemSeries], labels: &Labels) -> ChartOption {
    let axis = UnifiedAxis::from_series(series);

    let mut lines = Vec::with_capacity(series.len() * 2 + 1);
    for item in series {
        lines.push(LineSeries::item_line(
            labels.highest_name(&item.item_name),
            align_highest(item, &axis),
        ));
        lines.push(LineSeries::item_line(
            labels.lowest_name(&item.item_name),
            align_lowest(item, &axis),
        ));
    }
    if has_set_prices(series) {
        lines.push(LineSeries::set_total_line(
            labels.set_total.clone(),
            set_total(series, &axis),
        ));
    }

    let interval = axis.len().div_ceil(config::MAX_AXIS_LABELS);

    ChartOption {
        title: Title {
            text: String::new(),
            subtext: labels.data_source.clone(),
            left: "center",
        },
        tooltip: Tooltip {
            trigger: "axis",
            axis_pointer: AxisPointer {
                kind: "line",
                animation: false,
            },
        },
        legend: Legend {
            data: lines.iter().map(|l| l.name.clone()).collect(),
            top: 30,
            kind: "scroll",
            page_button_position: "end",
        },
        grid: Grid {
            left: "3%",
            right: "4%",
            bottom: "3%",
            contain_label: true,
        },
        x_axis: XAxis {
            kind: "category",
            data: axis
                .dates
                .iter()
                .map(|d| truncate_date(d).to_string())
                .collect(),
            axis_label: AxisLabel {
                interval,
                rotate: 45,
            },
        },
        y_axis: YAxis {
            kind: "value",
            name: labels.price_axis.clone(),
            split_line: SplitLine {
                show: true,
                line_style: LineStyle {
                    width: None,
                    kind: Some("dashed"),
                    color: None,
                },
            },
        },
        series: lines,
        animation: false,
    }
}

/// Tooltip markup for the axis position `index`: the date, then one line per
/// series that has a value there, in series order.
pub fn tooltip(option: &ChartOption, index: usize) -> Option<String> {
    let date = option.x_axis.data.get(index)?;
    let mut out = escape_html(date);
    out.push_str("<br/>");
    for line in &option.series {
        if let Some(Some(value)) = line.data.get(index) {
            out.push_str(&format!(
                "{}: {}<br/>",
                escape_html(&line.name),
                format_price(Some(*value))
            ));
        }
    }
    Some(out)
}

// ---------------------------------------------------------------------------
// ChartSurface
// ---------------------------------------------------------------------------

/// The charting engine the options are handed to.
pub trait ChartSurface: Send {
    fn set_option(&mut self, option: &ChartOption) -> Result<()>;
    fn clear(&mut self);
    fn resize(&mut self);
}

#[derive(Debug, Default)]
struct JsonSurfaceState {
    option: Option<Value>,
    updates: usize,
    resizes: usize,
    clears: usize,
}

/// Keeps the latest option as JSON for a host to pick up.
///
/// Clones share state, so a host can keep one handle while the renderer owns
/// another.
#[derive(Debug, Default, Clone)]
pub struct JsonSurface {
    state: Arc<Mutex<JsonSurfaceState>>,
}

impl JsonSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut JsonSurfaceState) -> T) -> T {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    /// The option currently displayed, if any.
    pub fn option(&self) -> Option<Value> {
        self.with_state(|s| s.option.clone())
    }

    pub fn update_count(&self) -> usize {
        self.with_state(|s| s.updates)
    }

    pub fn resize_count(&self) -> usize {
        self.with_state(|s| s.resizes)
    }

    pub fn clear_count(&self) -> usize {
        self.with_state(|s| s.clears)
    }
}

impl ChartSurface for JsonSurface {
    fn set_option(&mut self, option: &ChartOption) -> Result<()> {
        let value = serde_json::to_value(option).map_err(PriceError::from)?;
        self.with_state(|s| {
            s.option = Some(value);
            s.updates += 1;
        });
        Ok(())
    }

    fn clear(&mut self) {
        self.with_state(|s| {
            s.option = None;
            s.clears += 1;
        });
    }

    fn resize(&mut self) {
        self.with_state(|s| s.resizes += 1);
    }
}

// ---------------------------------------------------------------------------
// ChartRenderer
// ---------------------------------------------------------------------------

/// Owns a chart surface and the dataset it currently shows.
pub struct ChartRenderer {
    surface: Box<dyn ChartSurface>,
    labels: Labels,
    current: Vec<ItemSeries>,
    option: Option<ChartOption>,
}

impl ChartRenderer {
    pub fn new(surface: Box<dyn ChartSurface>, labels: Labels) -> Self {
        Self {
            surface,
            labels,
            current: Vec::new(),
            option: None,
        }
    }

    /// Draw `series`. Rendering the same input twice produces the same option.
    /// An empty input clears the chart.
    pub fn render(&mut self, series: &[ItemSeries]) -> Result<()> {
        if series.is_empty() {
            self.clear();
            return Ok(());
        }
        let option = build_option(series, &self.labels);
        debug!(
            "Rendering {} lines over {} dates",
            option.series.len(),
            option.x_axis.data.len()
        );
        self.surface.set_option(&option)?;
        self.current = series.to_vec();
        self.option = Some(option);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.surface.clear();
        self.current.clear();
        self.option = None;
    }

    pub fn resize(&mut self) {
        self.surface.resize();
    }

    /// Series currently drawn.
    pub fn current(&self) -> &[ItemSeries] {
        &self.current
    }

    /// Option currently drawn.
    pub fn option(&self) -> Option<&ChartOption> {
        self.option.as_ref()
    }

    /// Tooltip markup at axis position `index` of the current chart.
    pub fn tooltip(&self, index: usize) -> Option<String> {
        self.option.as_ref().and_then(|o| tooltip(o, index))
    }

    /// Price axis tick label for `value`, for hosts that format ticks through
    /// a callback.
    pub fn y_axis_label(&self, value: f64) -> String {
        format_axis_value(value)
    }
}
