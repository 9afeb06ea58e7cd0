//! wildcard class names (globbing)
//!
//! `services.*` is matched against the same three shapes a plain class name maps to
//! (see [crate::paths]) and every matching file is turned back into a class name.
use crate::error::{Error, Result};
use crate::paths::{class_from_file, ClassPaths};
use crate::storage::{ClassIndex, Storage};
use std::path::Path;

const WILDCARDS: [char; 3] = ['*', '?', '['];

pub fn is_glob(class: &str) -> bool {
    class.contains(WILDCARDS)
}

/// Class names matching a wildcard class name
///
/// The result may contain duplicates when a class exists in more than one shape. No match is
/// not an error.
pub fn expand_glob(storage: &Storage, class: &str) -> Result<Vec<String>> {
    let escaped_root = glob::Pattern::escape(&storage.root().to_string_lossy());
    let escaped_extension = glob::Pattern::escape(storage.extension());
    let patterns = ClassPaths::new(Path::new(&escaped_root), class, &escaped_extension);

    let mut classes = vec![];
    for pattern in patterns.iter() {
        let pattern = pattern.to_string_lossy();
        let matches = glob::glob(&pattern).map_err(|source| Error::Pattern {
            pattern: class.to_string(),
            source,
        })?;

        for path in matches {
            let path = path?;
            if !path.is_file() {
                continue;
            }

            if let Some(name) = class_from_file(storage.root(), &path, storage.extension()) {
                tracing::trace!(class, matched = %name, "glob match");
                classes.push(name);
            }
        }
    }

    if classes.is_empty() {
        tracing::warn!(class, "Class globbing did not yield any results");
    }

    Ok(classes)
}

/// Replace every name by the classes it matches and drop duplicates, keeping the first occurrence
///
/// Wildcard names are globbed, plain names are looked up in `index`. Names without a match are
/// dropped.
pub fn expand_class_list(
    storage: &Storage,
    index: &ClassIndex,
    classes: &[String],
) -> Result<Vec<String>> {
    let mut expanded: indexmap::IndexSet<String> = Default::default();

    for class in classes {
        if is_glob(class) {
            expanded.extend(expand_glob(storage, class)?);
        } else if index.locate(&storage.class_paths(class)).is_some() {
            expanded.insert(class.clone());
        } else {
            tracing::warn!(class = %class, "Class globbing did not yield any results");
        }
    }

    Ok(expanded.into_iter().collect())
}
