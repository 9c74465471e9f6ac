/// Constants naming the fixed on-disk experiment layout.
pub mod layout {
    /// Folder under the experiment root holding deployed input files.
    pub const INPUTS_DIR: &str = "Inputs";
    /// Folder under the experiment root receiving written output files.
    pub const OUTPUTS_DIR: &str = "Outputs";
}

/// Constants used by record and settings file naming.
pub mod records {
    /// Extension carried by tabular record files.
    pub const RECORD_EXTENSION: &str = "csv";
    /// Extension carried by settings documents.
    pub const SETTINGS_EXTENSION: &str = "json";
    /// Document stem used when no settings file name is given.
    pub const DEFAULT_SETTINGS_STEM: &str = "Settings";
}

/// Constants used by composite cell encoding (for example `[1.5,-2]`).
pub mod composite {
    /// Opening delimiter of a composite cell.
    pub const OPEN: char = '[';
    /// Closing delimiter of a composite cell.
    pub const CLOSE: char = ']';
    /// Separator between composite components.
    pub const SEPARATOR: char = ',';
}

/// Constants used by session file naming and log capture.
pub mod sessions {
    /// Timestamp format embedded in per-session record file names.
    pub const SESSION_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
    /// Stem of saved application log copies.
    pub const LOG_FILE_STEM: &str = "LogSave";
    /// Extension of saved application log copies.
    pub const LOG_EXTENSION: &str = "log";
    /// Timestamp format embedded in saved log file names.
    pub const LOG_TIMESTAMP_FORMAT: &str = "%y-%m-%d.%H-%M-%S";
}
