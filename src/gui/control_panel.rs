//! Control Panel Widget
//! Left side panel with the data source row and the categorical filters.

use std::collections::BTreeSet;
use std::path::PathBuf;

use egui::{Color32, RichText, ScrollArea};

use crate::data::{FilterOptions, FilterSelection};

/// Left side control panel with file selection and filter controls.
pub struct ControlPanel {
    pub csv_path: Option<PathBuf>,
    pub options: FilterOptions,
    pub selection: FilterSelection,
    pub status: String,
    pub has_data: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            csv_path: None,
            options: FilterOptions::default(),
            selection: FilterSelection::default(),
            status: "Ready".to_string(),
            has_data: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the distinct values of a freshly loaded dataset and reset
    /// the selection to "everything allowed".
    pub fn set_options(&mut self, options: FilterOptions) {
        self.selection = FilterSelection::all_of(&options);
        self.options = options;
        self.has_data = true;
    }

    /// Set the status line.
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel.
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Churnboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Churn Dataset Explorer")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filter Section =====
        ui.label(RichText::new("🔎 Filters").size(14.0).strong());
        ui.add_space(5.0);

        if self.has_data {
            // Clone the option lists so the selection sets can be
            // mutated inside the loop
            let countries = self.options.countries.clone();
            let genders = self.options.genders.clone();
            let subscription_types = self.options.subscription_types.clone();

            let mut changed = false;
            ScrollArea::vertical().max_height(420.0).show(ui, |ui| {
                changed |=
                    Self::filter_section(ui, "Country", &countries, &mut self.selection.countries);
                changed |=
                    Self::filter_section(ui, "Gender", &genders, &mut self.selection.genders);
                changed |= Self::filter_section(
                    ui,
                    "Subscription Type",
                    &subscription_types,
                    &mut self.selection.subscription_types,
                );
            });

            if changed {
                action = ControlPanelAction::SelectionChanged;
            }
        } else {
            ui.label(
                RichText::new("No dataset loaded")
                    .size(12.0)
                    .color(Color32::GRAY),
            );
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Loaded") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// One collapsible multiselect block. Returns true when the
    /// selection set changed.
    fn filter_section(
        ui: &mut egui::Ui,
        title: &str,
        values: &[String],
        selected: &mut BTreeSet<String>,
    ) -> bool {
        let mut changed = false;

        let header_text = format!("{title}  ({}/{})", selected.len(), values.len());
        egui::CollapsingHeader::new(RichText::new(header_text).strong())
            .id_salt(title)
            .default_open(false)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    if ui.small_button("All").clicked() {
                        selected.extend(values.iter().cloned());
                        changed = true;
                    }
                    if ui.small_button("None").clicked() {
                        selected.clear();
                        changed = true;
                    }
                });

                for value in values {
                    let mut checked = selected.contains(value);
                    if ui.checkbox(&mut checked, value.as_str()).changed() {
                        if checked {
                            selected.insert(value.clone());
                        } else {
                            selected.remove(value);
                        }
                        changed = true;
                    }
                }
            });

        changed
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    SelectionChanged,
}
