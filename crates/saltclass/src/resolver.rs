//! resolution entry points
//!
//! Every call builds its own render context and expansion state. A [Resolver] can be shared
//! between threads as long as the storage is not modified while nodes are resolved.
use crate::compose::{Composition, Tops};
use crate::config::Settings;
use crate::error::Result;
use crate::expand::{Expansion, ExpansionResult};
use crate::render::{Functions, RenderContext, Renderer, TeraRenderer};
use crate::storage::Storage;
use crate::value::Map;

#[derive(Debug)]
pub struct Resolver<R = TeraRenderer> {
    settings: Settings,
    storage: Storage,
    functions: Functions,
    renderer: R,
}

impl Resolver<TeraRenderer> {
    pub fn new(settings: Settings) -> Self {
        Self::with_renderer(settings, TeraRenderer)
    }
}

impl<R: Renderer> Resolver<R> {
    pub fn with_renderer(settings: Settings, renderer: R) -> Self {
        Self {
            storage: settings.storage(),
            settings,
            functions: Functions::new(),
            renderer,
        }
    }

    /// Functions callable from every template rendered by this resolver
    pub fn with_functions(mut self, functions: Functions) -> Self {
        self.functions = functions;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn render_context(&self, node_id: &str) -> RenderContext {
        RenderContext::new(
            node_id.to_string(),
            self.settings.opts.clone(),
            self.settings.grains.clone(),
            self.settings.pillar.clone(),
            self.functions.clone(),
        )
    }

    /// Load the node and walk its class graph
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn expand(&self, node_id: &str) -> Result<ExpansionResult> {
        Expansion::new(&self.storage, &self.renderer, self.render_context(node_id))?
            .expand_node(node_id)
    }

    pub fn compose(&self, node_id: &str) -> Result<Composition> {
        let expansion = self.expand(node_id)?;
        Ok(Composition::new(node_id, &expansion))
    }

    /// Merged and variable-expanded pillar data, including the metadata block
    pub fn resolve_pillars(&self, node_id: &str) -> Result<Map> {
        Ok(self.compose(node_id)?.into_pillar_tree())
    }

    /// `{environment: [state, ...]}`
    pub fn resolve_tops(&self, node_id: &str) -> Result<Tops> {
        Ok(self.compose(node_id)?.tops())
    }
}
