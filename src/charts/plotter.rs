//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use egui::Color32;
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use crate::stats::{GroupChurnRate, ScatterPoint};

/// Bar fill for grouped churn rates.
pub const BAR_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

/// Scatter colors by churn status.
pub const RETAINED_COLOR: Color32 = Color32::from_rgb(46, 204, 113); // Green
pub const CHURNED_COLOR: Color32 = Color32::from_rgb(231, 76, 60); // Red

const CHART_HEIGHT: f32 = 280.0;

/// Creates dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw a churn-rate bar chart, one bar per group.
    /// X-axis: groups, Y-axis: churn rate in [0, 1].
    pub fn draw_churn_rate_chart(ui: &mut egui::Ui, id: &str, rates: &[GroupChurnRate]) {
        let labels: Vec<String> = rates.iter().map(|r| r.group.clone()).collect();

        let bars: Vec<Bar> = rates
            .iter()
            .enumerate()
            .map(|(i, rate)| {
                Bar::new(i as f64, rate.churn_rate)
                    .width(0.6)
                    .fill(BAR_COLOR)
                    .name(&rate.group)
            })
            .collect();

        Plot::new(format!("churn_rate_{id}"))
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .y_axis_label("Churn Rate")
            .include_y(0.0)
            .include_y(1.0)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if (mark.value - idx as f64).abs() < 1e-6 && idx < labels.len() {
                    labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });
    }

    /// Draw a scatter chart with points split by churn status.
    pub fn draw_scatter_chart(
        ui: &mut egui::Ui,
        id: &str,
        points: &[ScatterPoint],
        x_label: &str,
        y_label: &str,
    ) {
        let retained: PlotPoints = points
            .iter()
            .filter(|p| !p.churned)
            .map(|p| [p.x, p.y])
            .collect();
        let churned: PlotPoints = points
            .iter()
            .filter(|p| p.churned)
            .map(|p| [p.x, p.y])
            .collect();

        Plot::new(format!("scatter_{id}"))
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_label(x_label.to_string())
            .y_axis_label(y_label.to_string())
            .show(ui, |plot_ui| {
                plot_ui.points(
                    Points::new(retained)
                        .radius(2.5)
                        .color(RETAINED_COLOR)
                        .name("Retained"),
                );
                plot_ui.points(
                    Points::new(churned)
                        .radius(2.5)
                        .color(CHURNED_COLOR)
                        .name("Churned"),
                );
            });
    }
}
