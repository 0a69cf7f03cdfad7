//! Export configuration
//!
//! One immutable [`ExportConfig`] is built from the command line (and an
//! optional TOML defaults file) and passed through the whole run.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::mesh::BakeOptions;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "rig-export")]
#[command(about = "Bake a scene document into rig mesh, skeleton and clip files")]
#[command(version)]
pub struct ExportArgs {
    /// Scene document (JSON)
    pub input: PathBuf,

    /// Directory receiving the baked files
    pub output_dir: PathBuf,

    /// Maximum skin influences per vertex (0 = no limit)
    #[arg(long)]
    pub max_num_weights: Option<u32>,

    /// Space-separated entity names to export; everything when omitted
    #[arg(long)]
    pub restrict_objects: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Require shared position/normal/texcoord indices
    #[arg(long)]
    pub indexed: bool,

    /// TOML file with default settings
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Defaults loaded from a `--config` file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub max_num_weights: Option<u32>,
    #[serde(default)]
    pub restrict_objects: Vec<String>,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub indexed: bool,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse export config")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Maximum skin influences per vertex; 0 keeps all
    pub max_weights: u32,
    /// Entity names to export; empty exports everything
    pub restrict_objects: Vec<String>,
    pub verbose: bool,
    pub indexed: bool,
}

impl ExportConfig {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            max_weights: 0,
            restrict_objects: Vec::new(),
            verbose: false,
            indexed: false,
        }
    }

    /// Merge command-line arguments over an optional config file.
    pub fn from_args(args: ExportArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };
        Ok(Self::merge(args, file))
    }

    fn merge(args: ExportArgs, file: ConfigFile) -> Self {
        let restrict_objects = match args.restrict_objects {
            Some(list) => list.split_whitespace().map(str::to_string).collect(),
            None => file.restrict_objects,
        };
        Self {
            input: args.input,
            output_dir: args.output_dir,
            max_weights: args.max_num_weights.or(file.max_num_weights).unwrap_or(0),
            restrict_objects,
            verbose: args.verbose || file.verbose,
            indexed: args.indexed || file.indexed,
        }
    }

    pub fn bake_options(&self) -> BakeOptions {
        BakeOptions {
            max_weights: self.max_weights,
            indexed: self.indexed,
        }
    }
}

/// Rewrite the classic single-dash flags (`-maxNumWeights 4`,
/// `-restrictObjects "a b"`, `-verbose`, `-indexed`) into their long forms.
pub fn normalize_legacy_args<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    args.into_iter()
        .map(|arg| {
            let arg = arg.into();
            match arg.as_str() {
                "-maxNumWeights" => "--max-num-weights".to_string(),
                "-restrictObjects" => "--restrict-objects".to_string(),
                "-verbose" => "--verbose".to_string(),
                "-indexed" => "--indexed".to_string(),
                _ => arg,
            }
        })
        .collect()
}
