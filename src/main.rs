//! Churnboard - Churn CSV Analysis & Interactive Dashboard
//!
//! A Rust application for exploring a music-streaming churn dataset:
//! filter listeners by categorical attributes and view summary metrics,
//! grouped churn rates and scatter charts over the filtered subset.

mod charts;
mod data;
mod gui;
mod stats;

use std::path::PathBuf;

use eframe::egui;
use gui::ChurnboardApp;

/// Dataset loaded at startup when no path is given on the command line.
const DEFAULT_DATASET: &str = "spotify_churn_dataset.csv";

fn main() -> eframe::Result<()> {
    env_logger::init();

    // First process argument overrides the default dataset path
    let data_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET));

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1100.0, 650.0])
            .with_title("Churnboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Churnboard",
        options,
        Box::new(move |cc| Ok(Box::new(ChurnboardApp::new(cc, data_path)))),
    )
}
