//! Export run: scene document in, baked files out
//!
//! Meshes and clips fail independently; a skeleton failure stops the run
//! because skinned meshes and clips depend on its joint numbering.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hashbrown::HashSet;

use crate::animation::{extract_clip, extract_loose_clip, AnimationClip};
use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::formats::{write_clip_file, write_mesh_file, write_skeleton_file, RIG_FORMAT};
use crate::mesh::{BakedMesh, Mesh};
use crate::scene::{Instance, SceneDocument};
use crate::skeleton::{build_skeleton, Skeleton};

/// What a run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub meshes_written: usize,
    pub meshes_skipped: usize,
    pub skeleton_written: bool,
    pub clips_written: usize,
    pub clips_skipped: usize,
    /// Every file written, in order
    pub files: Vec<PathBuf>,
}

/// Load `config.input` and export everything it contains.
pub fn run(config: &ExportConfig) -> Result<ExportSummary> {
    let doc = SceneDocument::load(&config.input)?;
    export_document(&doc, config)
}

/// Export an already loaded document into `config.output_dir`.
pub fn export_document(doc: &SceneDocument, config: &ExportConfig) -> Result<ExportSummary> {
    doc.check_references()?;
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            config.output_dir.display()
        )
    })?;

    let mut summary = ExportSummary::default();
    let entities = doc.discover(&config.restrict_objects);
    tracing::debug!("Found {} entities", entities.len());

    // Skeleton first: a topology error must stop the run before anything is written
    let mut skeleton: Option<(usize, Skeleton)> = None;
    for entity in &entities {
        let Instance::Controller(index) = entity.instance else {
            continue;
        };
        let controller = &doc.controllers[index];
        if let Some((owner, _)) = &skeleton {
            if *owner != index {
                tracing::warn!(
                    "Only the first skeleton is exported; ignoring controller '{}'",
                    controller.name
                );
            }
            continue;
        }
        let built = build_skeleton(doc, controller)
            .and_then(|mut s| s.canonicalize().map(|_| s))
            .map_err(|source| ExportError::Skeleton {
                name: controller.name.clone(),
                source,
            })?;
        tracing::debug!("Built skeleton '{}' with {} joints", built.name, built.len());
        skeleton = Some((index, built));
    }

    let opts = config.bake_options();
    let mut outputs = OutputFiles::default();
    let mut exported = HashSet::new();
    for entity in &entities {
        if !exported.insert(entity.instance) {
            tracing::debug!(
                "Node '{}' instances an asset that is already exported",
                doc.nodes[entity.node].name
            );
            continue;
        }

        let (geometry, controller) = match entity.instance {
            Instance::Geometry(g) => (&doc.geometries[g], None),
            Instance::Controller(c) => {
                let controller = &doc.controllers[c];
                (&doc.geometries[controller.geometry], Some(controller))
            }
        };

        let mut mesh = Mesh::from_geometry(geometry, controller);
        if let (Some((owner, skeleton)), Instance::Controller(c)) = (&skeleton, entity.instance) {
            // Bound nodes left out of the skeleton cannot be addressed
            if *owner == c && (skeleton.len() as u32) < mesh.joint_count {
                tracing::warn!(
                    "Mesh '{}': only {} of {} bound joints made it into skeleton '{}'",
                    mesh.name,
                    skeleton.len(),
                    mesh.joint_count,
                    skeleton.name
                );
                mesh.joint_count = skeleton.len() as u32;
            }
        }

        let path = asset_path(&config.output_dir, &mesh.name, RIG_FORMAT.mesh_ext);
        if outputs.contains(&path) {
            tracing::warn!(
                "Skipping mesh '{}': {} was already written by another asset",
                mesh.name,
                path.display()
            );
            summary.meshes_skipped += 1;
            continue;
        }

        let result = mesh
            .bake(&opts)
            .map_err(|source| ExportError::Mesh {
                name: mesh.name.clone(),
                source,
            })
            .and_then(|baked| write_mesh(&path, &baked));

        match result {
            Ok(()) => {
                summary.meshes_written += 1;
                outputs.record(path, &mut summary);
            }
            Err(err) => {
                tracing::error!("Skipping {}", err);
                summary.meshes_skipped += 1;
            }
        }
    }

    let Some((_, skeleton)) = skeleton else {
        if !doc.animation_clips.is_empty() || !doc.animations.is_empty() {
            tracing::warn!("Scene has animations but no skeleton; animations skipped");
        }
        return Ok(summary);
    };

    let path = asset_path(&config.output_dir, &skeleton.name, RIG_FORMAT.skeleton_ext);
    match write_asset(&path, |w| write_skeleton_file(w, &skeleton)) {
        Ok(()) => {
            tracing::info!(
                "Exported skeleton '{}': {} joints -> {}",
                skeleton.name,
                skeleton.len(),
                path.display()
            );
            summary.skeleton_written = true;
            outputs.record(path, &mut summary);
        }
        Err(err) => tracing::error!("{}", err),
    }

    for clip in collect_clips(doc, &skeleton, &mut summary) {
        let path = asset_path(&config.output_dir, &clip.name, RIG_FORMAT.animation_ext);
        if outputs.contains(&path) {
            tracing::warn!(
                "Skipping clip '{}': {} was already written by another clip",
                clip.name,
                path.display()
            );
            summary.clips_skipped += 1;
            continue;
        }
        match write_asset(&path, |w| write_clip_file(w, &clip, &skeleton)) {
            Ok(()) => {
                tracing::info!(
                    "Exported clip '{}': {} animations -> {}",
                    clip.name,
                    clip.animations.len(),
                    path.display()
                );
                summary.clips_written += 1;
                outputs.record(path, &mut summary);
            }
            Err(err) => {
                tracing::error!("{}", err);
                summary.clips_skipped += 1;
            }
        }
    }

    Ok(summary)
}

/// Authored clips if the document has any, otherwise the loose animations
/// gathered into one clip.
fn collect_clips(
    doc: &SceneDocument,
    skeleton: &Skeleton,
    summary: &mut ExportSummary,
) -> Vec<AnimationClip> {
    let mut clips = Vec::new();

    if doc.animation_clips.is_empty() {
        match extract_loose_clip(&doc.animations, skeleton) {
            Ok(Some(clip)) => clips.push(clip),
            Ok(None) => {}
            Err(source) => {
                let err = ExportError::Animation {
                    name: skeleton.name.clone(),
                    source,
                };
                tracing::warn!("Skipping {}", err);
                summary.clips_skipped += 1;
            }
        }
        return clips;
    }

    for (index, source_clip) in doc.animation_clips.iter().enumerate() {
        match extract_clip(source_clip, index, skeleton) {
            Ok(clip) => clips.push(clip),
            Err(source) => {
                let err = ExportError::Animation {
                    name: source_clip.name.clone(),
                    source,
                };
                tracing::warn!("Skipping {}", err);
                summary.clips_skipped += 1;
            }
        }
    }
    clips
}

/// Files written so far in one run
#[derive(Default)]
struct OutputFiles {
    written: HashSet<PathBuf>,
}

impl OutputFiles {
    fn contains(&self, path: &Path) -> bool {
        self.written.contains(path)
    }

    fn record(&mut self, path: PathBuf, summary: &mut ExportSummary) {
        self.written.insert(path.clone());
        summary.files.push(path);
    }
}

/// `<dir>/<stem>.<ext>`, where the stem is the last path component of `name`
/// so scene names never point outside `dir`.
fn asset_path(dir: &Path, name: &str, ext: &str) -> PathBuf {
    dir.join(format!("{}.{}", file_stem(name), ext))
}

fn file_stem(name: &str) -> &str {
    let base = name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(name);
    match base {
        "" | "." | ".." => "unnamed",
        base => base,
    }
}

fn write_mesh(path: &Path, mesh: &BakedMesh) -> Result<(), ExportError> {
    write_asset(path, |w| write_mesh_file(w, mesh))?;
    tracing::info!(
        "Exported mesh '{}': {} vertices -> {}",
        mesh.name,
        mesh.vertex_count,
        path.display()
    );
    Ok(())
}

/// Encode fully in memory, then write the file in one call.
fn write_asset<F>(path: &Path, encode: F) -> Result<(), ExportError>
where
    F: FnOnce(&mut Vec<u8>) -> Result<()>,
{
    let mut bytes = Vec::new();
    encode(&mut bytes).map_err(|err| ExportError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::other(err),
    })?;
    fs::write(path, &bytes).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
