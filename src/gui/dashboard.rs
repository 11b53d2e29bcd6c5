//! Dashboard Widget
//! Central scrollable panel: summary cards, churn-rate bar charts,
//! scatter charts and the filtered-rows table.

use egui::{Color32, RichText, ScrollArea};

use crate::charts::ChartPlotter;
use crate::stats::{DashboardData, TableData, ViewModel};

const SECTION_SPACING: f32 = 18.0;
const TABLE_HEIGHT: f32 = 320.0;

/// Scrollable dashboard rendering the current view model.
#[derive(Default)]
pub struct DashboardView;

impl DashboardView {
    pub fn new() -> Self {
        Self
    }

    /// Draw the dashboard for the current view, or the placeholder
    /// states when nothing is loaded or nothing matches.
    pub fn show(&self, ui: &mut egui::Ui, view: Option<&ViewModel>) {
        let Some(view) = view else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No dataset loaded").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(6.0);
                ui.label(
                    RichText::new(format!(
                        "Number of rows after filtering: {}",
                        view.row_count()
                    ))
                    .size(13.0),
                );
                ui.add_space(SECTION_SPACING);

                match view {
                    ViewModel::Empty => {
                        ui.label(
                            RichText::new("⚠ No data available for the selected filters.")
                                .size(15.0)
                                .color(Color32::from_rgb(255, 193, 7)),
                        );
                    }
                    ViewModel::Ready(data) => Self::draw_dashboard(ui, data),
                }
            });
    }

    fn draw_dashboard(ui: &mut egui::Ui, data: &DashboardData) {
        // ===== Summary metrics =====
        ui.label(RichText::new("Summary Metrics").size(16.0).strong());
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            Self::metric_card(ui, "Total Users", data.summary.total_users.to_string());
            Self::metric_card(ui, "Total Churned", data.summary.total_churned.to_string());
            Self::metric_card(
                ui,
                "Average Listening Time (hrs)",
                format!("{:.2}", data.summary.avg_listening_time),
            );
        });
        ui.add_space(SECTION_SPACING);

        // ===== Grouped churn rates =====
        ui.label(
            RichText::new("Churn Rate by Subscription Type")
                .size(16.0)
                .strong(),
        );
        ChartPlotter::draw_churn_rate_chart(ui, "subscription", &data.churn_by_subscription);
        ui.add_space(SECTION_SPACING);

        ui.label(RichText::new("Churn Rate by Device Type").size(16.0).strong());
        ChartPlotter::draw_churn_rate_chart(ui, "device", &data.churn_by_device);
        ui.add_space(SECTION_SPACING);

        // ===== Scatter charts =====
        ui.label(
            RichText::new("Songs Played per Day vs Listening Time")
                .size(16.0)
                .strong(),
        );
        ChartPlotter::draw_scatter_chart(
            ui,
            "listening",
            &data.listening_scatter,
            "Songs Played per Day",
            "Listening Time (hours)",
        );
        ui.add_space(SECTION_SPACING);

        ui.label(
            RichText::new("Skip Rate vs Songs Played per Day")
                .size(16.0)
                .strong(),
        );
        ChartPlotter::draw_scatter_chart(
            ui,
            "skip",
            &data.skip_scatter,
            "Songs Played per Day",
            "Skip Rate",
        );
        ui.add_space(SECTION_SPACING);

        // ===== Filtered rows =====
        ui.label(RichText::new("Filtered Data").size(16.0).strong());
        ui.add_space(6.0);
        Self::draw_table(ui, &data.table);
        ui.add_space(SECTION_SPACING);
    }

    /// One summary metric in a framed card.
    fn metric_card(ui: &mut egui::Ui, label: &str, value: String) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new(label).size(12.0).color(Color32::GRAY));
                    ui.label(RichText::new(value).size(22.0).strong());
                });
            });
        ui.add_space(10.0);
    }

    /// The filtered-rows preview table.
    fn draw_table(ui: &mut egui::Ui, table: &TableData) {
        if table.rows.len() < table.total_rows {
            ui.label(
                RichText::new(format!(
                    "Showing first {} of {} rows",
                    table.rows.len(),
                    table.total_rows
                ))
                .size(11.0)
                .color(Color32::GRAY),
            );
            ui.add_space(4.0);
        }

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ScrollArea::both()
                    .id_salt("filtered_rows")
                    .max_height(TABLE_HEIGHT)
                    .show(ui, |ui| {
                        egui::Grid::new("filtered_rows_grid")
                            .striped(true)
                            .min_col_width(70.0)
                            .spacing([10.0, 4.0])
                            .show(ui, |ui| {
                                for column in &table.columns {
                                    ui.label(RichText::new(column).strong().size(11.0));
                                }
                                ui.end_row();

                                for row in &table.rows {
                                    for value in row {
                                        ui.label(RichText::new(value).size(11.0));
                                    }
                                    ui.end_row();
                                }
                            });
                    });
            });
    }
}
