//! class name <-> storage path mapping
//!
//! A class `a.b.c` may live in one of three places below `<root>/classes`, checked in this order:
//!
//! | shape     | path                 |
//! |-----------|----------------------|
//! | flat      | `a.b.c.<ext>`        |
//! | segmented | `a/b/c.<ext>`        |
//! | init      | `a/b/c/init.<ext>`   |
use std::path::{Path, PathBuf};

pub const CLASSES_DIR: &str = "classes";
pub const NODES_DIR: &str = "nodes";
pub const INIT_STEM: &str = "init";

/// Candidate storage locations of one class, in lookup priority
#[derive(Debug, Clone, PartialEq)]
pub struct ClassPaths {
    pub flat: PathBuf,
    pub segmented: PathBuf,
    pub init: PathBuf,
}

impl ClassPaths {
    pub fn new(root: &Path, class: &str, extension: &str) -> Self {
        let classes = root.join(CLASSES_DIR);
        let segments: PathBuf = class.split('.').collect();

        Self {
            flat: classes.join(format!("{class}.{extension}")),
            segmented: classes.join(segments.clone().with_extension_appended(extension)),
            init: classes
                .join(segments)
                .join(format!("{INIT_STEM}.{extension}")),
        }
    }

    /// Candidates in lookup priority
    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        [&self.flat, &self.segmented, &self.init].into_iter()
    }
}

trait PathBufExt {
    fn with_extension_appended(self, extension: &str) -> PathBuf;
}

impl PathBufExt for PathBuf {
    /// `a/b.c` + `yml` => `a/b.c.yml` (unlike [PathBuf::set_extension])
    fn with_extension_appended(self, extension: &str) -> PathBuf {
        let mut os_string = self.into_os_string();
        os_string.push(".");
        os_string.push(extension);
        os_string.into()
    }
}

/// Class name of a file below `<root>/classes`
///
/// Returns `None` for files outside of the classes directory or with a different extension.
pub fn class_from_file(root: &Path, file: &Path, extension: &str) -> Option<String> {
    let relative = file.strip_prefix(root.join(CLASSES_DIR)).ok()?;

    let mut segments = relative
        .iter()
        .map(|segment| segment.to_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()?;

    let last = segments.last_mut()?;
    let stem_len = last.strip_suffix(extension)?.strip_suffix('.')?.len();
    last.truncate(stem_len);

    let mut class = segments.join(".");
    if let Some(stripped) = class.strip_suffix(&format!(".{INIT_STEM}")) {
        class.truncate(stripped.len());
    }

    Some(class)
}
