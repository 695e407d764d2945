use egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Line, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use stintview::chart::{Band, ChartSink, Marker, MarkerKind, StintSegment};

use crate::ui::{color32, translucent};

const SEGMENT_WIDTH: f32 = 10.;
const PIT_MARKER_RADIUS: f32 = 5.;
const FASTEST_MARKER_RADIUS: f32 = 8.;
const MARKER_HIT_DISTANCE: f64 = 0.5;
const LABEL_OFFSET: f64 = 0.35;

/// Collects chart primitives and draws them with `egui_plot`.
///
/// Drivers are categorical rows; row `i` of the order given by `rows` is drawn
/// at `y = i`.
#[derive(Default)]
pub(crate) struct PlotSink {
    rows: Vec<String>,
    segments: Vec<StintSegment>,
    markers: Vec<Marker>,
    bands: Vec<Band>,
}

impl ChartSink for PlotSink {
    fn rows(&mut self, rows: &[String]) {
        self.rows = rows.to_vec();
    }

    fn segment(&mut self, segment: &StintSegment) {
        self.segments.push(segment.clone());
    }

    fn marker(&mut self, marker: &Marker) {
        self.markers.push(marker.clone());
    }

    fn band(&mut self, band: &Band) {
        self.bands.push(band.clone());
    }
}

impl PlotSink {
    fn row_y(&self, row: &str) -> Option<f64> {
        self.rows.iter().position(|r| r == row).map(|i| i as f64)
    }

    /// Hover text of whatever sits under the given plot coordinate. Markers win
    /// over the segment they are drawn on.
    pub(crate) fn hover_text(&self, x: f64, y: f64) -> Option<&str> {
        if y < -0.5 {
            return None;
        }
        let row = self.rows.get(y.round() as usize)?;
        self.markers
            .iter()
            .filter(|m| &m.row == row && (m.x - x).abs() <= MARKER_HIT_DISTANCE)
            .min_by(|a, b| (a.x - x).abs().total_cmp(&(b.x - x).abs()))
            .map(|m| m.hover.as_str())
            .or_else(|| {
                self.segments
                    .iter()
                    .find(|s| {
                        &s.row == row
                            && x >= s.x_start - MARKER_HIT_DISTANCE
                            && x <= s.x_end + MARKER_HIT_DISTANCE
                    })
                    .map(|s| s.hover.as_str())
            })
    }

    pub(crate) fn show(&self, ui: &mut Ui, max_lap: u32) -> Option<String> {
        let rows = self.rows.clone();
        let row_count = self.rows.len();
        let top = row_count as f64 - 0.5;

        let plot_response = Plot::new("stints")
            .show_background(false)
            .include_x(0.)
            .include_x(max_lap as f64 + 1.)
            .include_y(-0.5)
            .include_y(top)
            .x_axis_label("Lap Number")
            .y_axis_label("Drivers")
            .allow_scroll(false)
            .y_axis_formatter(move |mark, _range| {
                if mark.value.fract() != 0. || mark.value < 0. {
                    return String::new();
                }
                rows.get(mark.value as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                for band in &self.bands {
                    let corners = vec![
                        [band.x_start, -0.5],
                        [band.x_end, -0.5],
                        [band.x_end, top],
                        [band.x_start, top],
                    ];
                    plot_ui.polygon(
                        Polygon::new("Safety car", PlotPoints::new(corners))
                            .fill_color(translucent(band.color, band.opacity))
                            .stroke(Stroke::NONE),
                    );
                }

                for segment in &self.segments {
                    let Some(y) = self.row_y(&segment.row) else {
                        continue;
                    };
                    plot_ui.line(
                        Line::new(
                            segment.compound.title(),
                            PlotPoints::new(vec![[segment.x_start, y], [segment.x_end, y]]),
                        )
                        .color(color32(segment.color))
                        .width(SEGMENT_WIDTH),
                    );
                }

                for marker in &self.markers {
                    let Some(y) = self.row_y(&marker.row) else {
                        continue;
                    };
                    let (name, shape, radius) = match marker.kind {
                        MarkerKind::PitStop => ("Pit stop", MarkerShape::Circle, PIT_MARKER_RADIUS),
                        MarkerKind::FastestLap => {
                            ("Fastest lap", MarkerShape::Asterisk, FASTEST_MARKER_RADIUS)
                        }
                    };
                    plot_ui.points(
                        Points::new(name, vec![[marker.x, y]])
                            .shape(shape)
                            .radius(radius)
                            .filled(true)
                            .color(color32(marker.color)),
                    );
                    if let Some(label) = &marker.label {
                        plot_ui.text(Text::new(
                            name,
                            PlotPoint::new(marker.x, y + LABEL_OFFSET),
                            RichText::new(label).color(Color32::WHITE),
                        ));
                    }
                }
            });

        let hovered = plot_response
            .response
            .hover_pos()
            .map(|pos| plot_response.transform.value_from_position(pos))
            .and_then(|value| self.hover_text(value.x, value.y))
            .map(str::to_string);
        if let Some(text) = &hovered {
            plot_response.response.on_hover_text_at_pointer(text.as_str());
        }
        hovered
    }
}
