//! class graph expansion
//!
//! Walks the classes of a node depth first. Two orders come out of one walk:
//!
//! - **render order** (preorder): as soon as a class is loaded its `pillars` are merged into the
//!   [RenderContext], before its own `classes` are visited. A nested class template therefore
//!   sees the data of every ancestor loaded before it.
//! - **output order** (postorder): a class is recorded after the classes it includes. The node
//!   document is always the last entry.
//!
//! Given a node including `A` and `L`, where `A` includes `B`, `B` includes `C` and `L` includes
//! `M` and `B`, the classes are rendered as `A B C L M` and recorded as `C B A M L <node>`.
//!
//! Every class is loaded at most once per expansion. A class reached a second time, including
//! through a cycle, is skipped.
use crate::document::Document;
use crate::error::Result;
use crate::render::{RenderContext, Renderer};
use crate::storage::{ClassIndex, Storage};
use crate::wildcard::expand_class_list;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Class,
    Node,
}

/// A loaded document and the name it was loaded under
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
    pub document: Document,
}

/// Documents in output order, the node document last
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpansionResult {
    entries: Vec<Entry>,
}

impl ExpansionResult {
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Names of all expanded classes in output order
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|entry| entry.kind == EntryKind::Class)
            .map(|entry| entry.name.as_str())
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.entries.iter().map(|entry| &entry.document)
    }
}

impl From<Vec<Entry>> for ExpansionResult {
    fn from(entries: Vec<Entry>) -> Self {
        Self { entries }
    }
}

/// State of one expansion: the set of loaded classes and the live render context
pub struct Expansion<'a> {
    storage: &'a Storage,
    renderer: &'a dyn Renderer,
    index: ClassIndex,
    context: RenderContext,
    seen: HashSet<String>,
}

impl<'a> Expansion<'a> {
    pub fn new(
        storage: &'a Storage,
        renderer: &'a dyn Renderer,
        context: RenderContext,
    ) -> Result<Self> {
        Ok(Self {
            storage,
            renderer,
            index: storage.class_index()?,
            context,
            seen: Default::default(),
        })
    }

    /// Load the node document and expand everything it includes
    pub fn expand_node(self, node_id: &str) -> Result<ExpansionResult> {
        let node = self
            .storage
            .load_node(self.renderer, node_id, &self.context)?;
        self.expand(node_id, node)
    }

    /// Expand the classes of an already loaded node document
    pub fn expand(mut self, node_id: &str, node: Document) -> Result<ExpansionResult> {
        if let Some(pillars) = &node.pillars {
            self.context.merge_pillar(pillars.clone());
        }

        let mut entries = self.expand_classes(&node.classes)?;
        entries.push(Entry {
            name: node_id.to_string(),
            kind: EntryKind::Node,
            document: node,
        });

        tracing::debug!(
            node = node_id,
            classes = entries.len() - 1,
            "expansion finished"
        );
        Ok(ExpansionResult { entries })
    }

    #[tracing::instrument(level = "trace", skip(self))]
    fn expand_classes(&mut self, classes: &[String]) -> Result<Vec<Entry>> {
        let classes = expand_class_list(self.storage, &self.index, classes)?;
        let mut entries = vec![];

        for class in classes {
            if !self.seen.insert(class.clone()) {
                tracing::trace!(%class, "already expanded");
                continue;
            }

            let document =
                self.storage
                    .load_class(&self.index, self.renderer, &class, &self.context)?;

            // visible to every template rendered from here on, including nested classes
            if let Some(pillars) = &document.pillars {
                self.context.merge_pillar(pillars.clone());
            }

            if !document.classes.is_empty() {
                entries.extend(self.expand_classes(&document.classes)?);
            }

            entries.push(Entry {
                name: class,
                kind: EntryKind::Class,
                document,
            });
        }

        Ok(entries)
    }
}
