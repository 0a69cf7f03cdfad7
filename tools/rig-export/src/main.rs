//! rig-export - scene document baker
//!
//! Converts a scene document into .rigmesh, .rigskel and .riganim files.
//!
//! ```text
//! rig-export <input> <output_dir> [-maxNumWeights N] [-restrictObjects "a b"] [-verbose] [-indexed]
//! ```

use anyhow::Result;
use clap::Parser;

use rig_export::{normalize_legacy_args, pipeline, ExportArgs, ExportConfig, ExportError};

fn main() -> Result<()> {
    let args = ExportArgs::parse_from(normalize_legacy_args(std::env::args()));
    let config = ExportConfig::from_args(args)?;

    let level = if config.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let summary = match pipeline::run(&config) {
        Ok(summary) => summary,
        Err(err) => {
            if err.downcast_ref::<ExportError>().is_some_and(ExportError::is_fatal) {
                tracing::error!("Export aborted: {:#}", err);
            }
            return Err(err);
        }
    };

    tracing::info!(
        "Export complete: {} meshes ({} skipped), skeleton {}, {} clips ({} skipped)",
        summary.meshes_written,
        summary.meshes_skipped,
        if summary.skeleton_written { "written" } else { "none" },
        summary.clips_written,
        summary.clips_skipped
    );

    Ok(())
}
