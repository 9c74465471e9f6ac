#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Tabular record encoding/decoding and explicit field mappings.
pub mod codec;
/// Centralized constants for the on-disk layout and file naming.
pub mod constants;
/// Composite cell converters (vectors packed into one column).
pub mod convert;
/// Record reads from the deployed inputs tree.
pub mod inputs;
/// Tree copies with per-extension exclusion (input deployment).
pub mod mirror;
/// Record writes, appends, and read-back under the outputs tree.
pub mod outputs;
/// Experiment folder layout and file-name normalization.
pub mod paths;
/// Per-participant JSON settings documents.
pub mod settings;
/// Shared type aliases.
pub mod types;

mod errors;

pub use codec::{FieldMapping, RowView, decode_records, encode_records};
pub use convert::{vec2_cell, vec3_cell};
pub use errors::ExperimentError;
pub use inputs::InputStore;
pub use mirror::{DirectoryMirror, ExtensionFilter, MirrorReport};
pub use outputs::OutputStore;
pub use paths::{
    ExperimentPaths, Scope, participant_folder, with_record_extension, with_settings_extension,
};
pub use settings::SettingsStore;
pub use types::{Cell, ColumnName, FileName, ParticipantId};
