use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::errors::ExperimentError;

/// Case-sensitive set of file extensions excluded from a mirror pass.
///
/// Entries are stored without a leading dot, so `exclude(".meta")` and
/// `exclude("meta")` add the same entry. Files without an extension are
/// never excluded. The default filter excludes nothing.
#[derive(Clone, Debug, Default)]
pub struct ExtensionFilter {
    excluded: HashSet<String>,
}

impl ExtensionFilter {
    /// Filter that excludes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one excluded extension; a leading dot is stripped.
    pub fn exclude(mut self, extension: &str) -> Self {
        self.excluded
            .insert(extension.trim_start_matches('.').to_string());
        self
    }

    /// True when `path` carries an excluded extension.
    pub fn is_excluded(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| self.excluded.contains(extension))
    }
}

impl<S: Into<String>> FromIterator<S> for ExtensionFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut filter = Self::new();
        for extension in iter {
            filter = filter.exclude(&extension.into());
        }
        filter
    }
}

/// Per-pass copy counters returned by [`DirectoryMirror::copy`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MirrorReport {
    /// Files copied into the destination tree.
    pub copied: usize,
    /// Files skipped by the extension filter.
    pub skipped: usize,
}

/// Tree copy with per-extension exclusion, used to deploy input folders.
///
/// Copies every non-excluded file under the source into the destination,
/// overwriting files already there. A failure mid-pass surfaces immediately
/// and leaves the files copied so far in place.
pub struct DirectoryMirror {
    source: PathBuf,
    dest: PathBuf,
    recursive: bool,
    filter: ExtensionFilter,
}

impl DirectoryMirror {
    /// Mirror `source` into `dest`: recursive, no exclusions.
    pub fn new<S: Into<PathBuf>, D: Into<PathBuf>>(source: S, dest: D) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
            recursive: true,
            filter: ExtensionFilter::new(),
        }
    }

    /// Restrict the pass to top-level files when `recursive` is false.
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Exclude files matched by `filter`.
    pub fn with_filter(mut self, filter: ExtensionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Run the copy pass.
    ///
    /// The source must be an existing directory; the destination tree is
    /// created on demand.
    pub fn copy(&self) -> Result<MirrorReport, ExperimentError> {
        if !self.source.is_dir() {
            return Err(ExperimentError::SourceNotFound {
                path: self.source.clone(),
            });
        }
        fs::create_dir_all(&self.dest)?;

        let mut walk = WalkDir::new(&self.source).min_depth(1);
        if !self.recursive {
            walk = walk.max_depth(1);
        }

        let mut report = MirrorReport::default();
        for entry in walk {
            let entry = entry.map_err(io::Error::other)?;
            let relative = entry
                .path()
                .strip_prefix(&self.source)
                .map_err(io::Error::other)?;
            let target = self.dest.join(relative);
            if entry.file_type().is_dir() {
                if self.recursive {
                    fs::create_dir_all(&target)?;
                }
                continue;
            }
            if self.filter.is_excluded(entry.path()) {
                report.skipped += 1;
                continue;
            }
            fs::copy(entry.path(), &target)?;
            report.copied += 1;
        }
        debug!(
            source = %self.source.display(),
            dest = %self.dest.display(),
            copied = report.copied,
            skipped = report.skipped,
            "directory mirrored"
        );
        Ok(report)
    }
}
