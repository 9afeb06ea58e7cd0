//! read-only class and node storage
//!
//! ```text
//! <root>/classes/...   class documents, see [crate::paths]
//! <root>/nodes/...     node documents, `<node-id>.<ext>` anywhere below
//! ```
use crate::document::Document;
use crate::error::Result;
use crate::paths::{ClassPaths, CLASSES_DIR, NODES_DIR};
use crate::render::{load_document, RenderContext, Renderer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const DEFAULT_EXTENSION: &str = "yml";

#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
    extension: String,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn class_paths(&self, class: &str) -> ClassPaths {
        ClassPaths::new(&self.root, class, &self.extension)
    }

    /// Enumerate every file below `<root>/classes` once
    pub fn class_index(&self) -> Result<ClassIndex> {
        let classes_dir = self.root.join(CLASSES_DIR);
        let mut files = HashSet::new();

        if !classes_dir.is_dir() {
            tracing::warn!(path=%classes_dir.display(), "Class directory not found");
            return Ok(ClassIndex { files });
        }

        for entry in WalkDir::new(&classes_dir).follow_links(true) {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.insert(entry.into_path());
            }
        }

        let index = ClassIndex { files };
        tracing::debug!(files = index.len(), "class index built");
        Ok(index)
    }

    /// Render and parse the document of one class
    ///
    /// A class without a file is an empty document.
    pub fn load_class(
        &self,
        index: &ClassIndex,
        renderer: &dyn Renderer,
        class: &str,
        context: &RenderContext,
    ) -> Result<Document> {
        let paths = self.class_paths(class);
        let Some(path) = index.locate(&paths) else {
            tracing::warn!(class, "Class definition not found");
            return Ok(Document::default());
        };

        tracing::debug!(class, path=%path.display(), "loading class");
        let map = load_document(renderer, path, context)?;
        Ok(Document::from_map(class, map))
    }

    /// Location of the document for `node_id`
    ///
    /// The node directory is walked in file name order and the first `<node_id>.<ext>` wins.
    pub fn find_node(&self, node_id: &str) -> Result<Option<PathBuf>> {
        let nodes_dir = self.root.join(NODES_DIR);
        if !nodes_dir.is_dir() {
            return Ok(None);
        }

        let file_name = format!("{node_id}.{}", self.extension);
        for entry in WalkDir::new(&nodes_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            if entry.file_type().is_file() && entry.file_name() == file_name.as_str() {
                return Ok(Some(entry.into_path()));
            }
        }

        Ok(None)
    }

    /// Render and parse the document of a node
    ///
    /// An unknown node is an empty document.
    pub fn load_node(
        &self,
        renderer: &dyn Renderer,
        node_id: &str,
        context: &RenderContext,
    ) -> Result<Document> {
        let Some(path) = self.find_node(node_id)? else {
            tracing::warn!(node = node_id, "Node definition not found");
            return Ok(Document::default());
        };

        tracing::debug!(node = node_id, path=%path.display(), "loading node");
        let map = load_document(renderer, &path, context)?;
        Ok(Document::from_map(node_id, map))
    }
}

/// Snapshot of all files below `<root>/classes`
#[derive(Debug, Default)]
pub struct ClassIndex {
    files: HashSet<PathBuf>,
}

impl ClassIndex {
    /// First existing candidate in lookup priority
    pub fn locate<'p>(&self, paths: &'p ClassPaths) -> Option<&'p PathBuf> {
        paths.iter().find(|path| self.files.contains(*path))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
