use std::fs;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::codec::{FieldMapping, read_file_records};
use crate::errors::ExperimentError;
use crate::paths::{ExperimentPaths, with_record_extension};
use crate::types::ParticipantId;

/// Reads deployed record files from the inputs tree.
///
/// Inputs are provisioned ahead of a session (see
/// [`DirectoryMirror`](crate::DirectoryMirror)), so a missing file usually
/// means the participant or condition was never set up; reads report that as
/// `None` and leave the decision to the caller.
#[derive(Clone, Debug)]
pub struct InputStore {
    paths: ExperimentPaths,
}

impl InputStore {
    /// Create a store over `paths`.
    pub fn new(paths: ExperimentPaths) -> Self {
        Self { paths }
    }

    /// Read records from `<inputs>/<id>/<file>`, or `None` when absent.
    pub fn read_participant_records<T>(
        &self,
        id: ParticipantId,
        file_name: &str,
        mapping: Option<&FieldMapping<T>>,
    ) -> Result<Option<Vec<T>>, ExperimentError>
    where
        T: DeserializeOwned,
    {
        let file_name = with_record_extension(file_name)?;
        let path = self.paths.participant_inputs(id).join(file_name);
        self.read_records_at(&path, mapping)
    }

    /// Read records from `<inputs>/<file>` (shared by all participants), or
    /// `None` when absent.
    pub fn read_common_records<T>(
        &self,
        file_name: &str,
        mapping: Option<&FieldMapping<T>>,
    ) -> Result<Option<Vec<T>>, ExperimentError>
    where
        T: DeserializeOwned,
    {
        let file_name = with_record_extension(file_name)?;
        let path = self.paths.inputs_root().join(file_name);
        self.read_records_at(&path, mapping)
    }

    /// Read records from an already-resolved `path`, or `None` when absent.
    pub fn read_records_at<T>(
        &self,
        path: &Path,
        mapping: Option<&FieldMapping<T>>,
    ) -> Result<Option<Vec<T>>, ExperimentError>
    where
        T: DeserializeOwned,
    {
        let records = read_file_records(path, mapping)?;
        match &records {
            Some(rows) => {
                debug!(path = %path.display(), rows = rows.len(), "input records read");
            }
            None => debug!(path = %path.display(), "input record file absent"),
        }
        Ok(records)
    }

    /// Number of top-level files in the participant's inputs folder, or
    /// `None` when the folder itself is absent.
    pub fn participant_file_count(
        &self,
        id: ParticipantId,
    ) -> Result<Option<usize>, ExperimentError> {
        folder_file_count(&self.paths.participant_inputs(id))
    }

    /// Number of top-level files in the common inputs folder, or `None`
    /// when the folder itself is absent.
    pub fn common_file_count(&self) -> Result<Option<usize>, ExperimentError> {
        folder_file_count(&self.paths.inputs_root())
    }
}

fn folder_file_count(folder: &Path) -> Result<Option<usize>, ExperimentError> {
    let entries = match fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(ExperimentError::Io(err)),
    };
    let mut count = 0;
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            count += 1;
        }
    }
    Ok(Some(count))
}
