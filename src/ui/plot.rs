use std::f32::consts::TAU;

use eframe::egui::{self, Color32, Pos2, RichText, ScrollArea, Sense, Shape, Stroke, Ui, Vec2};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart as PlotBarChart, Legend, Plot, PlotBounds, PlotPoints, Points};

use crate::charts::{BarChart, PieChart, ScatterChart, ViewError, VELOCITY_Y_RANGE};
use crate::state::AppState;

const PLOT_HEIGHT: f32 = 340.0;
const PIE_SIZE: f32 = 280.0;

const ABOUT: &str = "Batted ball outcomes between batter and pitcher, seen through play \
outcome, exit velocity and launch angle.\n\n\
The pie chart shows how often each outcome happens, for every batter or for the one \
picked on the left. The bar chart shows the average exit velocity for each outcome: \
harder contact tends to turn outs into extra-base hits. The scatter plot pairs launch \
angle with exit velocity; hits cluster between roughly 8 and 32 degrees when the ball \
is struck hard.";

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the header and the three charts.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Batted Ball Data");
            egui::CollapsingHeader::new("About this dashboard")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    ui.label(ABOUT);
                });
            ui.separator();

            let Some(charts) = &state.charts else {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Open a file to view batted balls  (File → Open…)");
                });
                return;
            };

            view(ui, &charts.distribution, pie_chart);
            ui.separator();
            view(ui, &charts.velocity, velocity_chart);
            ui.separator();
            view(ui, &charts.launch, launch_chart);
        });
}

/// Draw one chart, or its error in place of the chart.
fn view<T>(ui: &mut Ui, chart: &Result<T, ViewError>, draw: fn(&mut Ui, &T)) {
    match chart {
        Ok(chart) => draw(ui, chart),
        Err(e) => {
            ui.label(RichText::new(format!("Chart unavailable: {e}")).color(Color32::RED));
        }
    }
}

fn no_data(ui: &mut Ui) {
    ui.label(RichText::new("No data").italics().weak());
}

// ---------------------------------------------------------------------------
// Outcome distribution (pie)
// ---------------------------------------------------------------------------

/// Point on the rim `turn` of the way round, clockwise from twelve o'clock.
fn rim_point(center: Pos2, radius: f32, turn: f64) -> Pos2 {
    let angle = turn as f32 * TAU;
    Pos2::new(center.x + radius * angle.sin(), center.y - radius * angle.cos())
}

/// Inverse of [`rim_point`] for an offset from the centre.
fn turn_of(offset: Vec2) -> f64 {
    (offset.x.atan2(-offset.y) / TAU).rem_euclid(1.0) as f64
}

fn pie_chart(ui: &mut Ui, pie: &PieChart) {
    ui.strong(&pie.title);
    if pie.slices.is_empty() {
        no_data(ui);
    }

    ui.horizontal(|ui: &mut Ui| {
        let (rect, response) = ui.allocate_exact_size(Vec2::splat(PIE_SIZE), Sense::hover());
        let center = rect.center();
        let radius = PIE_SIZE * 0.45;
        let painter = ui.painter_at(rect);

        if pie.slices.is_empty() {
            painter.circle_stroke(center, radius, Stroke::new(1.0, Color32::GRAY));
        }

        for slice in &pie.slices {
            // Split into wedges of at most a quarter turn so each is convex.
            let wedges = (slice.fraction() / 0.25).ceil().max(1.0) as usize;
            for w in 0..wedges {
                let from = slice.start + slice.fraction() * w as f64 / wedges as f64;
                let to = slice.start + slice.fraction() * (w + 1) as f64 / wedges as f64;
                let steps = (((to - from) * 128.0).ceil() as usize).max(1);
                let mut points = Vec::with_capacity(steps + 2);
                points.push(center);
                for i in 0..=steps {
                    let turn = from + (to - from) * i as f64 / steps as f64;
                    points.push(rim_point(center, radius, turn));
                }
                painter.add(Shape::convex_polygon(points, slice.color, Stroke::NONE));
            }
        }

        if let Some(pos) = response.hover_pos() {
            let offset = pos - center;
            if offset.length() <= radius {
                if let Some(slice) = pie.slice_at(turn_of(offset)) {
                    let total = pie.total;
                    response.on_hover_ui_at_pointer(|ui: &mut Ui| {
                        ui.strong(&slice.outcome);
                        ui.label(format!(
                            "{} of {total} ({:.1}%)",
                            slice.count,
                            slice.fraction() * 100.0
                        ));
                    });
                }
            }
        }

        ui.vertical(|ui: &mut Ui| {
            for slice in &pie.slices {
                ui.label(
                    RichText::new(format!(
                        "■ {}  {:.1}%",
                        slice.outcome,
                        slice.fraction() * 100.0
                    ))
                    .color(slice.color),
                );
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Exit velocity by outcome (bars)
// ---------------------------------------------------------------------------

fn velocity_chart(ui: &mut Ui, chart: &BarChart) {
    ui.strong(&chart.title);
    if chart.bars.is_empty() {
        no_data(ui);
    }

    let labels: Vec<String> = chart.bars.iter().map(|b| b.outcome.clone()).collect();
    let n = chart.bars.len().max(1) as f64;
    let y = chart.y_range.clone();

    Plot::new("velocity_plot")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(chart.x_label)
        .y_axis_label(chart.y_label)
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if idx < 0.0 || (mark.value - idx).abs() > 1e-6 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for (i, bar) in chart.bars.iter().enumerate() {
                let bars = vec![Bar::new(i as f64, bar.value)
                    .width(0.7)
                    .name(format!("{}: {:.1} mph", bar.outcome, bar.value))];
                plot_ui.bar_chart(PlotBarChart::new(bars).name(&bar.outcome).color(bar.color));
            }
            // Fixed range: anything outside is clipped on screen only.
            plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                [-0.6, *y.start()],
                [n - 0.4, *y.end()],
            ));
        });

    if !chart.bars.is_empty() {
        ui.push_id("velocity_table", |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .column(Column::auto().at_least(160.0))
                .column(Column::auto().at_least(140.0))
                .column(Column::auto())
                .header(20.0, |mut header| {
                    header.col(|ui| {
                        ui.strong(chart.x_label);
                    });
                    header.col(|ui| {
                        ui.strong(chart.y_label);
                    });
                    header.col(|ui| {
                        ui.strong("Rows");
                    });
                })
                .body(|mut body| {
                    for bar in &chart.bars {
                        body.row(18.0, |mut row| {
                            row.col(|ui| {
                                ui.label(RichText::new(&bar.outcome).color(bar.color));
                            });
                            row.col(|ui| {
                                ui.label(format!("{:.1}", bar.value));
                            });
                            row.col(|ui| {
                                ui.label(bar.samples.to_string());
                            });
                        });
                    }
                });
        });
    }
}

// ---------------------------------------------------------------------------
// Launch angle vs exit velocity (scatter)
// ---------------------------------------------------------------------------

fn launch_chart(ui: &mut Ui, chart: &ScatterChart) {
    ui.strong(&chart.title);
    if chart.point_count() == 0 {
        no_data(ui);
    }

    let x = chart.x_range.clone();
    let y = chart.y_range.clone().unwrap_or(VELOCITY_Y_RANGE);
    let (x_label, y_label) = (chart.x_label, chart.y_label);

    Plot::new("launch_plot")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .label_formatter(move |name, value| {
            if name.is_empty() {
                return String::new();
            }
            format!("{name}\n{x_label}: {:.1}\n{y_label}: {:.1}", value.x, value.y)
        })
        .show(ui, |plot_ui| {
            for series in &chart.series {
                let points = Points::new(PlotPoints::from(series.points.clone()))
                    .name(&series.outcome)
                    .color(series.color)
                    .radius(3.0);
                plot_ui.points(points);
            }
            plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                [*x.start(), *y.start()],
                [*x.end(), *y.end()],
            ));
        });
}
