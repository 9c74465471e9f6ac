use std::path::{Path, PathBuf};

use crate::constants::layout::{INPUTS_DIR, OUTPUTS_DIR};
use crate::constants::records::{RECORD_EXTENSION, SETTINGS_EXTENSION};
use crate::errors::ExperimentError;
use crate::types::ParticipantId;

/// Resolves the fixed folder layout under one experiment root.
///
/// The root holds an `Inputs` tree (deployed, read-only data) and an
/// `Outputs` tree (files the application writes), each with numbered
/// per-participant subfolders. Callers construct the resolver explicitly;
/// nothing here touches global state or the filesystem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExperimentPaths {
    root: PathBuf,
}

impl ExperimentPaths {
    /// Create a resolver rooted at `root`. The folders do not need to exist.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Experiment root this resolver was built from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder holding deployed input files (`<root>/Inputs`).
    pub fn inputs_root(&self) -> PathBuf {
        self.root.join(INPUTS_DIR)
    }

    /// Folder receiving written output files (`<root>/Outputs`).
    pub fn outputs_root(&self) -> PathBuf {
        self.root.join(OUTPUTS_DIR)
    }

    /// Input folder for one participant (`<root>/Inputs/<id>`).
    pub fn participant_inputs(&self, id: ParticipantId) -> PathBuf {
        participant_folder(&self.inputs_root(), id)
    }

    /// Output folder for one participant (`<root>/Outputs/<id>`).
    pub fn participant_outputs(&self, id: ParticipantId) -> PathBuf {
        participant_folder(&self.outputs_root(), id)
    }
}

/// Folder scope a record or settings file lives under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Shared files directly under the inputs or outputs root.
    Common,
    /// Files under the participant's numbered subfolder.
    Participant(ParticipantId),
}

impl Scope {
    /// Resolve this scope against `root`: `Common` is the root itself,
    /// `Participant(id)` is `root/<id>`.
    pub fn folder_under(&self, root: &Path) -> PathBuf {
        match self {
            Scope::Common => root.to_path_buf(),
            Scope::Participant(id) => participant_folder(root, *id),
        }
    }
}

/// Subfolder under `root` named by the participant's decimal id.
pub fn participant_folder(root: &Path, id: ParticipantId) -> PathBuf {
    root.join(id.to_string())
}

/// Normalize `name` so it carries the `csv` record extension.
///
/// A different existing extension is replaced (`"trials.txt"` becomes
/// `"trials.csv"`); names already ending in `.csv` pass through unchanged.
/// A blank name is rejected with [`ExperimentError::InvalidArgument`].
pub fn with_record_extension(name: &str) -> Result<String, ExperimentError> {
    normalize_extension(name, RECORD_EXTENSION)
}

/// Normalize `name` so it carries the `json` settings extension.
///
/// Same replacement rule as [`with_record_extension`].
pub fn with_settings_extension(name: &str) -> Result<String, ExperimentError> {
    normalize_extension(name, SETTINGS_EXTENSION)
}

fn normalize_extension(name: &str, extension: &str) -> Result<String, ExperimentError> {
    if name.trim().is_empty() {
        return Err(ExperimentError::InvalidArgument(
            "file name must not be blank".into(),
        ));
    }
    let coerced = Path::new(name).with_extension(extension);
    Ok(coerced.to_string_lossy().into_owned())
}
