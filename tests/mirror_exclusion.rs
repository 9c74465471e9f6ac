use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::tempdir;

use experiment_files::{
    DirectoryMirror, ExperimentPaths, ExtensionFilter, InputStore, MirrorReport, SettingsStore,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct TrialSpec {
    index: u32,
    condition: String,
}

#[derive(Debug, PartialEq, Deserialize)]
struct SessionSettings {
    block_count: u32,
}

fn build_authoring_tree(root: &Path) {
    fs::create_dir_all(root.join("7")).unwrap();
    fs::write(
        root.join("trials.csv"),
        "index,condition\n1,baseline\n2,occluded\n",
    )
    .unwrap();
    fs::write(root.join("trials.csv.meta"), "guid: abc").unwrap();
    fs::write(root.join("7").join("Settings.json"), r#"{"block_count": 4}"#).unwrap();
    fs::write(root.join("7").join("Settings.json.meta"), "guid: def").unwrap();
    fs::write(root.join("7").join("practice.csv"), "index,condition\n1,warmup\n").unwrap();
}

fn collect_files(root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(folder) = stack.pop() {
        for entry in fs::read_dir(&folder).unwrap() {
            let entry = entry.unwrap();
            if entry.file_type().unwrap().is_dir() {
                stack.push(entry.path());
            } else {
                let relative = entry.path().strip_prefix(root).unwrap().to_path_buf();
                files.push(relative.to_string_lossy().into_owned());
            }
        }
    }
    files.sort();
    files
}

#[test]
fn deployment_copies_the_tree_minus_excluded_extensions_exactly() {
    let dir = tempdir().unwrap();
    let authoring = dir.path().join("authoring");
    build_authoring_tree(&authoring);

    let root = dir.path().join("build");
    let paths = ExperimentPaths::new(&root);
    let report = DirectoryMirror::new(&authoring, paths.inputs_root())
        .with_filter(ExtensionFilter::new().exclude("meta"))
        .copy()
        .unwrap();

    assert_eq!(report, MirrorReport { copied: 3, skipped: 2 });
    assert_eq!(
        collect_files(&paths.inputs_root()),
        vec![
            "7/Settings.json".to_string(),
            "7/practice.csv".to_string(),
            "trials.csv".to_string(),
        ]
    );
}

#[test]
fn deployed_inputs_are_readable_through_the_stores() {
    let dir = tempdir().unwrap();
    let authoring = dir.path().join("authoring");
    build_authoring_tree(&authoring);

    let paths = ExperimentPaths::new(dir.path().join("build"));
    DirectoryMirror::new(&authoring, paths.inputs_root())
        .with_filter(ExtensionFilter::new().exclude("meta"))
        .copy()
        .unwrap();

    let inputs = InputStore::new(paths.clone());
    let trials: Vec<TrialSpec> = inputs.read_common_records("trials", None).unwrap().unwrap();
    assert_eq!(trials.len(), 2);
    assert_eq!(trials[1].condition, "occluded");

    let practice: Option<Vec<TrialSpec>> =
        inputs.read_participant_records(7, "practice", None).unwrap();
    assert_eq!(practice.unwrap().len(), 1);

    assert_eq!(inputs.common_file_count().unwrap(), Some(1));
    assert_eq!(inputs.participant_file_count(7).unwrap(), Some(2));
    assert_eq!(inputs.participant_file_count(8).unwrap(), None);

    let settings: SessionSettings = SettingsStore::new(paths)
        .read_participant_settings(7)
        .unwrap()
        .unwrap();
    assert_eq!(settings, SessionSettings { block_count: 4 });
}

#[test]
fn redeployment_overwrites_stale_files_and_leaves_extras_alone() {
    let dir = tempdir().unwrap();
    let authoring = dir.path().join("authoring");
    build_authoring_tree(&authoring);

    let paths = ExperimentPaths::new(dir.path().join("build"));
    let inputs_root = paths.inputs_root();
    fs::create_dir_all(&inputs_root).unwrap();
    fs::write(inputs_root.join("trials.csv"), "stale").unwrap();
    fs::write(inputs_root.join("local_only.csv"), "index,condition\n").unwrap();

    DirectoryMirror::new(&authoring, &inputs_root)
        .with_filter(ExtensionFilter::new().exclude("meta"))
        .copy()
        .unwrap();

    let text = fs::read_to_string(inputs_root.join("trials.csv")).unwrap();
    assert!(text.starts_with("index,condition\n"));
    assert!(inputs_root.join("local_only.csv").is_file());
}
