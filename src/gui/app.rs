//! Churnboard Main Application
//! Main window wiring the filter panel, the dashboard and dataset loading.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

use anyhow::Context;
use egui::SidePanel;

use crate::data::ChurnDataset;
use crate::gui::{ControlPanel, ControlPanelAction, DashboardView};
use crate::stats::{self, ViewModel};

/// CSV loading result from background thread
enum LoadResult {
    Complete(Box<ChurnDataset>),
    Error(String),
}

/// Main application window.
pub struct ChurnboardApp {
    dataset: Option<ChurnDataset>,
    view: Option<ViewModel>,
    control_panel: ControlPanel,
    dashboard: DashboardView,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
    startup_path: Option<PathBuf>,
}

impl ChurnboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, data_path: PathBuf) -> Self {
        Self {
            dataset: None,
            view: None,
            control_panel: ControlPanel::new(),
            dashboard: DashboardView::new(),
            load_rx: None,
            is_loading: false,
            startup_path: Some(data_path),
        }
    }

    /// Handle CSV file selection via the file dialog.
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return; // Already loading
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.begin_load(path);
        }
    }

    /// Load a dataset in a background thread so the UI stays responsive.
    /// The pipeline itself stays synchronous; this only covers the
    /// one-time file read.
    fn begin_load(&mut self, path: PathBuf) {
        self.control_panel.csv_path = Some(path.clone());
        self.control_panel.set_status("Loading CSV file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let result = ChurnDataset::load(&path)
                .with_context(|| format!("loading {}", path.display()));

            match result {
                Ok(dataset) => {
                    let _ = tx.send(LoadResult::Complete(Box::new(dataset)));
                }
                Err(e) => {
                    let _ = tx.send(LoadResult::Error(format!("{e:#}")));
                }
            }
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Complete(dataset) => {
                        log::info!(
                            "Loaded {} rows, {} columns",
                            dataset.row_count(),
                            dataset.column_count()
                        );
                        self.control_panel.set_status(&format!(
                            "Loaded {} rows, {} columns",
                            dataset.row_count(),
                            dataset.column_count()
                        ));
                        self.control_panel.set_options(dataset.options().clone());
                        self.dataset = Some(*dataset);
                        self.recompute_view();
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        log::error!("Failed to load dataset: {error}");
                        self.control_panel.set_status(&format!("Error: {error}"));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Re-run the filter-and-aggregate pipeline for the current
    /// selection and replace the cached view.
    fn recompute_view(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };

        match stats::render(dataset, &self.control_panel.selection) {
            Ok(view) => {
                log::debug!("View recomputed: {} rows pass the filter", view.row_count());
                self.view = Some(view);
            }
            Err(e) => {
                log::error!("Failed to recompute view: {e}");
                self.control_panel.set_status(&format!("Error: {e}"));
            }
        }
    }
}

impl eframe::App for ChurnboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Load the startup dataset on the first frame
        if let Some(path) = self.startup_path.take() {
            self.begin_load(path);
        }

        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Filters
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::SelectionChanged => self.recompute_view(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.dashboard.show(ui, self.view.as_ref());
        });
    }
}
