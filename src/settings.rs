use std::fs;
use std::io;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::constants::records::DEFAULT_SETTINGS_STEM;
use crate::errors::ExperimentError;
use crate::paths::{ExperimentPaths, with_settings_extension};
use crate::types::ParticipantId;

/// Reads per-participant JSON settings documents from the inputs tree.
///
/// A missing document is an expected state (a participant may not have been
/// provisioned yet) and reads back as `None`, never as an error.
#[derive(Clone, Debug)]
pub struct SettingsStore {
    paths: ExperimentPaths,
}

impl SettingsStore {
    /// Create a store over `paths`.
    pub fn new(paths: ExperimentPaths) -> Self {
        Self { paths }
    }

    /// Read `<inputs>/<id>/Settings.json`, or `None` when absent.
    pub fn read_participant_settings<T>(
        &self,
        id: ParticipantId,
    ) -> Result<Option<T>, ExperimentError>
    where
        T: DeserializeOwned,
    {
        self.read_participant_settings_named(id, DEFAULT_SETTINGS_STEM)
    }

    /// Read `<inputs>/<id>/<stem>.json`, or `None` when absent.
    ///
    /// The stem is normalized the same way record file names are, so
    /// `"Calibration"` and `"Calibration.json"` address the same document.
    pub fn read_participant_settings_named<T>(
        &self,
        id: ParticipantId,
        stem: &str,
    ) -> Result<Option<T>, ExperimentError>
    where
        T: DeserializeOwned,
    {
        let file_name = with_settings_extension(stem)?;
        let path = self.paths.participant_inputs(id).join(file_name);
        read_settings_document(path)
    }
}

fn read_settings_document<T>(path: PathBuf) -> Result<Option<T>, ExperimentError>
where
    T: DeserializeOwned,
{
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "settings document absent");
            return Ok(None);
        }
        Err(err) => return Err(ExperimentError::Io(err)),
    };
    match serde_json::from_str(&text) {
        Ok(settings) => {
            debug!(path = %path.display(), "settings document loaded");
            Ok(Some(settings))
        }
        Err(err) => Err(ExperimentError::MalformedDocument {
            path,
            details: err.to_string(),
        }),
    }
}
