use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::codec::{FieldMapping, file_missing_or_empty, read_file_records, write_records_to};
use crate::constants::records::RECORD_EXTENSION;
use crate::constants::sessions::{
    LOG_EXTENSION, LOG_FILE_STEM, LOG_TIMESTAMP_FORMAT, SESSION_TIMESTAMP_FORMAT,
};
use crate::errors::ExperimentError;
use crate::paths::{ExperimentPaths, Scope, with_record_extension};
use crate::types::ParticipantId;

/// Writes, appends, and reads back record files under the outputs tree.
///
/// Writes validate their arguments first and fail fast; scope folders are
/// created on demand. Reads never create anything and report an absent file
/// as `None`.
#[derive(Clone, Debug)]
pub struct OutputStore {
    paths: ExperimentPaths,
}

impl OutputStore {
    /// Create a store over `paths`.
    pub fn new(paths: ExperimentPaths) -> Self {
        Self { paths }
    }

    /// Create or truncate `<outputs>/<scope>/<file>` with a header row and
    /// one data row per record. Returns the resolved path.
    pub fn write_records<T>(
        &self,
        scope: Scope,
        file_name: &str,
        records: &[T],
        mapping: Option<&FieldMapping<T>>,
    ) -> Result<PathBuf, ExperimentError>
    where
        T: Serialize,
    {
        let path = self.resolve_target(scope, file_name)?;
        let file = File::create(&path)?;
        write_records_to(file, records, mapping, true)?;
        debug!(path = %path.display(), rows = records.len(), "record file written");
        Ok(path)
    }

    /// Append data rows to `<outputs>/<scope>/<file>`. The header row is
    /// written only when the file is missing or has zero length. Returns the
    /// resolved path.
    pub fn append_records<T>(
        &self,
        scope: Scope,
        file_name: &str,
        records: &[T],
        mapping: Option<&FieldMapping<T>>,
    ) -> Result<PathBuf, ExperimentError>
    where
        T: Serialize,
    {
        let path = self.resolve_target(scope, file_name)?;
        append_records_at(&path, records, mapping)?;
        Ok(path)
    }

    /// Append a single record to an already-resolved `path`, with the same
    /// missing-or-empty header rule.
    ///
    /// This is the steady-state call of a recording loop; resolve the path
    /// once (for example with [`OutputStore::session_record_path`]) and feed
    /// it one record per frame or trial.
    pub fn append_record<T>(
        &self,
        record: &T,
        path: &Path,
        mapping: Option<&FieldMapping<T>>,
    ) -> Result<(), ExperimentError>
    where
        T: Serialize,
    {
        if path.as_os_str().is_empty() {
            return Err(ExperimentError::InvalidArgument(
                "record file path must not be empty".into(),
            ));
        }
        append_records_at(path, std::slice::from_ref(record), mapping)
    }

    /// Read records back from `<outputs>/<scope>/<file>`, or `None` when the
    /// file is absent.
    pub fn read_records<T>(
        &self,
        scope: Scope,
        file_name: &str,
        mapping: Option<&FieldMapping<T>>,
    ) -> Result<Option<Vec<T>>, ExperimentError>
    where
        T: DeserializeOwned,
    {
        let file_name = with_record_extension(file_name)?;
        let path = scope.folder_under(&self.paths.outputs_root()).join(file_name);
        let records = read_file_records(&path, mapping)?;
        match &records {
            Some(rows) => {
                debug!(path = %path.display(), rows = rows.len(), "output records read");
            }
            None => debug!(path = %path.display(), "output record file absent"),
        }
        Ok(records)
    }

    /// Timestamped record path for one session, under the participant's
    /// outputs folder: `<base>_<id>_<YYYY-MM-DD_HH-MM-SS>.csv`. The folder is
    /// created; the file is not touched until the first append.
    pub fn session_record_path(
        &self,
        id: ParticipantId,
        base_name: &str,
    ) -> Result<PathBuf, ExperimentError> {
        if base_name.trim().is_empty() {
            return Err(ExperimentError::InvalidArgument(
                "session base name must not be blank".into(),
            ));
        }
        let folder = self.paths.participant_outputs(id);
        fs::create_dir_all(&folder)?;
        let stamp = Local::now().format(SESSION_TIMESTAMP_FORMAT);
        Ok(folder.join(format!("{base_name}_{id}_{stamp}.{RECORD_EXTENSION}")))
    }

    /// Copy the application log at `source` into the participant's outputs
    /// folder as `LogSave.<yy-MM-dd.HH-mm-ss>.log`. Returns the destination
    /// path.
    pub fn save_participant_log(
        &self,
        id: ParticipantId,
        source: &Path,
    ) -> Result<PathBuf, ExperimentError> {
        if !source.is_file() {
            return Err(ExperimentError::SourceNotFound {
                path: source.to_path_buf(),
            });
        }
        let folder = self.paths.participant_outputs(id);
        fs::create_dir_all(&folder)?;
        let stamp = Local::now().format(LOG_TIMESTAMP_FORMAT);
        let dest = folder.join(format!("{LOG_FILE_STEM}.{stamp}.{LOG_EXTENSION}"));
        fs::copy(source, &dest)?;
        debug!(source = %source.display(), dest = %dest.display(), "log file saved");
        Ok(dest)
    }

    fn resolve_target(&self, scope: Scope, file_name: &str) -> Result<PathBuf, ExperimentError> {
        let file_name = with_record_extension(file_name)?;
        let folder = scope.folder_under(&self.paths.outputs_root());
        fs::create_dir_all(&folder)?;
        Ok(folder.join(file_name))
    }
}

fn append_records_at<T>(
    path: &Path,
    records: &[T],
    mapping: Option<&FieldMapping<T>>,
) -> Result<(), ExperimentError>
where
    T: Serialize,
{
    let include_header = file_missing_or_empty(path)?;
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    write_records_to(file, records, mapping, include_header)?;
    debug!(
        path = %path.display(),
        rows = records.len(),
        header = include_header,
        "records appended"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::fs;
    use tempfile::tempdir;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct TrialResult {
        trial: u32,
        correct: bool,
    }

    fn sample() -> Vec<TrialResult> {
        vec![
            TrialResult {
                trial: 1,
                correct: true,
            },
            TrialResult {
                trial: 2,
                correct: false,
            },
        ]
    }

    #[test]
    fn writing_creates_scope_folders_and_the_header() {
        let dir = tempdir().unwrap();
        let store = OutputStore::new(ExperimentPaths::new(dir.path()));

        let path = store
            .write_records(Scope::Participant(8), "results", &sample(), None)
            .unwrap();
        assert!(path.ends_with("Outputs/8/results.csv"));
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "trial,correct\n1,true\n2,false\n");
    }

    #[test]
    fn writing_twice_overwrites_the_file() {
        let dir = tempdir().unwrap();
        let store = OutputStore::new(ExperimentPaths::new(dir.path()));

        store
            .write_records(Scope::Common, "results", &sample(), None)
            .unwrap();
        let path = store
            .write_records(
                Scope::Common,
                "results",
                &[TrialResult {
                    trial: 9,
                    correct: true,
                }],
                None,
            )
            .unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "trial,correct\n9,true\n");
    }

    #[test]
    fn blank_file_names_fail_before_touching_the_filesystem() {
        let dir = tempdir().unwrap();
        let store = OutputStore::new(ExperimentPaths::new(dir.path()));

        let err = store
            .write_records(Scope::Common, "  ", &sample(), None)
            .unwrap_err();
        assert!(matches!(err, ExperimentError::InvalidArgument(_)));
        assert!(!dir.path().join("Outputs").exists());
    }

    #[test]
    fn append_record_rejects_empty_paths() {
        let dir = tempdir().unwrap();
        let store = OutputStore::new(ExperimentPaths::new(dir.path()));

        let err = store
            .append_record(
                &TrialResult {
                    trial: 1,
                    correct: true,
                },
                Path::new(""),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, ExperimentError::InvalidArgument(_)));
    }

    #[test]
    fn reading_an_absent_file_yields_none() {
        let dir = tempdir().unwrap();
        let store = OutputStore::new(ExperimentPaths::new(dir.path()));

        let records: Option<Vec<TrialResult>> =
            store.read_records(Scope::Participant(2), "results", None).unwrap();
        assert!(records.is_none());
        assert!(!dir.path().join("Outputs").exists());
    }

    #[test]
    fn session_paths_carry_base_id_and_timestamp() {
        let dir = tempdir().unwrap();
        let store = OutputStore::new(ExperimentPaths::new(dir.path()));

        let path = store.session_record_path(11, "movements").unwrap();
        assert!(path.parent().unwrap().ends_with("Outputs/11"));
        assert!(path.parent().unwrap().is_dir());
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("movements_11_"));
        assert!(name.ends_with(".csv"));

        let err = store.session_record_path(11, " ").unwrap_err();
        assert!(matches!(err, ExperimentError::InvalidArgument(_)));
    }

    #[test]
    fn participant_logs_are_copied_with_a_stamped_name() {
        let dir = tempdir().unwrap();
        let store = OutputStore::new(ExperimentPaths::new(dir.path()));
        let log = dir.path().join("Player.log");
        fs::write(&log, "frame 1\nframe 2\n").unwrap();

        let dest = store.save_participant_log(6, &log).unwrap();
        assert!(dest.parent().unwrap().ends_with("Outputs/6"));
        let name = dest.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("LogSave."));
        assert!(name.ends_with(".log"));
        assert_eq!(fs::read_to_string(&dest).unwrap(), "frame 1\nframe 2\n");

        let err = store
            .save_participant_log(6, &dir.path().join("missing.log"))
            .unwrap_err();
        assert!(matches!(err, ExperimentError::SourceNotFound { .. }));
    }
}
