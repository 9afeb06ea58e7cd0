//! final pillar tree and tops from an [ExpansionResult]
use crate::expand::ExpansionResult;
use crate::interpolate::expand_variables;
use crate::merge::merge;
use crate::value::{Map, Value};

/// Top level pillar key holding the resolution metadata
pub const METADATA_KEY: &str = "__saltclass__";

/// Environment name -> states to apply
pub type Tops = indexmap::IndexMap<String, Vec<String>>;

/// Everything known about a node after expansion, before variables are expanded
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub node: String,
    /// expanded class names in output order
    pub classes: Vec<String>,
    /// states of all documents in output order, first occurrence kept
    pub states: Vec<String>,
    /// taken from the last document that names one, empty otherwise
    pub environment: String,
    /// pillars of all documents merged in output order
    pub pillars: Map,
}

impl Composition {
    pub fn new(node: &str, expansion: &ExpansionResult) -> Self {
        let mut states: indexmap::IndexSet<String> = Default::default();
        let mut environment = String::new();
        let mut pillars = Map::new();

        for document in expansion.documents() {
            states.extend(document.states.iter().cloned());

            if let Some(env) = &document.environment {
                environment.clone_from(env);
            }

            if let Some(document_pillars) = &document.pillars {
                merge(&mut pillars, document_pillars.clone());
            }
        }

        Self {
            node: node.to_string(),
            classes: expansion.classes().map(str::to_string).collect(),
            states: states.into_iter().collect(),
            environment,
            pillars,
        }
    }

    pub fn tops(&self) -> Tops {
        let mut tops = Tops::new();
        tops.insert(self.environment.clone(), self.states.clone());
        tops
    }

    /// Metadata block followed by the variable-expanded pillars
    ///
    /// A pillar named like the metadata key replaces the metadata block.
    pub fn into_pillar_tree(self) -> Map {
        let mut metadata = Map::new();
        metadata.insert("states".to_string(), self.states.into());
        metadata.insert("classes".to_string(), self.classes.into());
        metadata.insert("environment".to_string(), self.environment.into());
        metadata.insert("nodename".to_string(), self.node.into());

        let mut tree = Map::new();
        tree.insert(METADATA_KEY.to_string(), Value::Object(metadata));
        tree.extend(expand_variables(self.pillars));
        tree
    }
}
