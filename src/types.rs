/// Numeric participant identifier; its decimal rendering names the
/// participant's folder under the inputs and outputs roots.
/// Examples: `1`, `42`, `117`
pub type ParticipantId = u32;
/// Header name of one column in a record file.
/// Examples: `Time`, `Position`, `TrialIndex`
pub type ColumnName = String;
/// Raw text of a single cell before typed parsing.
/// Examples: `0.25`, `[1.5,-2]`, `practice_block`
pub type Cell = String;
/// File name (with or without extension) as accepted by the stores.
/// Examples: `movements`, `Settings.json`, `trials.csv`
pub type FileName = String;
