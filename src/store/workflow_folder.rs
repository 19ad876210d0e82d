// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::collab::{CollabError, SaveReceipt, WorkflowStore};
use crate::model::{starter_workflow, GraphDocument, RecordError, WorkflowRecord};

use super::TRACING_TARGET;

pub const WORKFLOW_FILENAME: &str = "workflow.json";
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("i/o error at {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid workflow in {path:?}: {source}")]
    Record { path: PathBuf, source: RecordError },
    #[error("unsupported workflow file version {version} in {path:?}")]
    UnsupportedVersion { path: PathBuf, version: u32 },
    #[error("refusing to write through symlink at {path:?}")]
    SymlinkRefused { path: PathBuf },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to stable storage where
    /// possible. Exact guarantees are platform/filesystem-dependent.
    Durable,
}

#[derive(Debug, Serialize, Deserialize)]
struct WorkflowFile {
    version: u32,
    workflow: WorkflowRecord,
}

/// A folder holding one workflow as `workflow.json`.
#[derive(Debug, Clone)]
pub struct WorkflowFolder {
    root: PathBuf,
    durability: WriteDurability,
}

impl WorkflowFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn workflow_path(&self) -> PathBuf {
        self.root.join(WORKFLOW_FILENAME)
    }

    /// Loads the saved workflow, or `None` when the folder has none yet.
    pub fn load_workflow(&self) -> Result<Option<GraphDocument>, StoreError> {
        let path = self.workflow_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let file: WorkflowFile = serde_json::from_str(&raw).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        if file.version != FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                path,
                version: file.version,
            });
        }

        let doc = GraphDocument::from_record(file.workflow)
            .map_err(|source| StoreError::Record { path, source })?;
        tracing::info!(
            target: TRACING_TARGET,
            root = %self.root.display(),
            nodes = doc.node_count(),
            edges = doc.edge_count(),
            "workflow loaded"
        );
        Ok(Some(doc))
    }

    /// Loads the saved workflow or writes and returns a starter workflow named after the folder.
    pub fn load_or_init(&self) -> Result<GraphDocument, StoreError> {
        if let Some(doc) = self.load_workflow()? {
            return Ok(doc);
        }
        let doc = starter_workflow(self.default_name());
        self.save_workflow(&doc.to_record())?;
        Ok(doc)
    }

    pub fn save_workflow(&self, workflow: &WorkflowRecord) -> Result<(), StoreError> {
        let path = self.workflow_path();
        let file = WorkflowFile {
            version: FORMAT_VERSION,
            workflow: workflow.clone(),
        };
        let mut json = serde_json::to_vec_pretty(&file).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        json.push(b'\n');

        write_atomic(&self.root, &path, &json, self.durability)?;
        tracing::info!(
            target: TRACING_TARGET,
            path = %path.display(),
            nodes = workflow.nodes.len(),
            edges = workflow.edges.len(),
            bytes = json.len(),
            "workflow saved"
        );
        Ok(())
    }

    fn default_name(&self) -> String {
        fs::canonicalize(&self.root)
            .ok()
            .as_deref()
            .unwrap_or(&self.root)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "Untitled workflow".to_owned())
    }
}

#[async_trait::async_trait]
impl WorkflowStore for WorkflowFolder {
    async fn save(&self, workflow: WorkflowRecord) -> Result<SaveReceipt, CollabError> {
        let folder = self.clone();
        tokio::task::spawn_blocking(move || folder.save_workflow(&workflow))
            .await
            .map_err(|err| CollabError::Task(err.to_string()))??;
        Ok(SaveReceipt {
            location: self.workflow_path().display().to_string(),
        })
    }
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

/// Writes `contents` to `path` through a temp file in the same directory and a rename.
fn write_atomic(
    root: &Path,
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    match fs::symlink_metadata(root) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: root.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(root).map_err(|source| StoreError::Io {
                path: root.to_path_buf(),
                source,
            })?;
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: root.to_path_buf(),
                source,
            })
        }
    }

    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = root.join(format!(
        ".flowstudio.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

    if let Err(source) = file.write_all(contents) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: tmp_path,
            source,
        });
    }

    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(root).map_err(|source| StoreError::Io {
                path: root.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: root.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
