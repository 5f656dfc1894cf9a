// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Labeling Toolbox
//!
//! A desktop application for manually placing body-part landmarks on
//! extracted video frames, producing the labeled dataset a pose-estimation
//! network is trained on.

mod app;
mod error;
mod io;
mod models;
mod ui;
mod util;

use anyhow::{Context, Result};
use app::LabelingApp;
use clap::Parser;
use models::project::ProjectConfig;
use std::path::PathBuf;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to the project's config.yaml
    config: PathBuf,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    // Configuration problems are fatal before any window opens
    let config = ProjectConfig::load(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid project configuration in {}", args.config.display()))?;
    log::info!(
        "Project {} ({} videos, body parts {:?})",
        config.project_path.display(),
        config.videos().count(),
        config.bodyparts
    );

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1600.0, 980.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Labeling ToolBox"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Labeling ToolBox",
        options,
        Box::new(|_cc| Ok(Box::new(LabelingApp::new(args.config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
