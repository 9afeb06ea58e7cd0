//! template rendering and yaml loading
//!
//! Every class and node file is a template. It is rendered with a [RenderContext] and the result
//! is parsed as a yaml mapping.
//!
//! The engine only depends on the [Renderer] trait. [TeraRenderer] is the default implementation
//! and exposes these variables to templates:
//!
//! | variable    | alias        | content                                                    |
//! |-------------|--------------|------------------------------------------------------------|
//! | `opts`      | `__opts__`   | configuration options                                      |
//! | `grains`    | `__grains__` | facts gathered about the node                              |
//! | `pillar`    | `__pillar__` | pillar data merged so far (grows while classes are loaded) |
//! | `minion_id` |              | the node id                                                |
//!
//! Every entry of the [Functions] table is callable by name. Files next to the rendered file
//! with the same extension can be used with `{% include %}`, `{% import %}` and `{% extends %}`
//! by their file name.
use crate::error::{Error, Result};
use crate::merge::merge;
use crate::value::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use walkdir::WalkDir;

/// Dispatch table of functions callable from templates
#[derive(Clone, Default)]
pub struct Functions {
    table: indexmap::IndexMap<String, Arc<dyn tera::Function>>,
}

impl Functions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a function; an existing function of the same name is replaced
    pub fn register<F>(&mut self, name: impl Into<String>, function: F) -> &mut Self
    where
        F: tera::Function + 'static,
    {
        self.table.insert(name.into(), Arc::new(function));
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    fn install(&self, tera: &mut tera::Tera) {
        for (name, function) in &self.table {
            tera.register_function(name, Dispatch(function.clone()));
        }
    }
}

impl std::fmt::Debug for Functions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

struct Dispatch(Arc<dyn tera::Function>);

impl tera::Function for Dispatch {
    fn call(&self, args: &HashMap<String, tera::Value>) -> tera::Result<tera::Value> {
        self.0.call(args)
    }

    fn is_safe(&self) -> bool {
        self.0.is_safe()
    }
}

/// Everything a template can see while it is rendered
///
/// One instance exists per resolution. The pillar accumulator is updated in place while the
/// class graph is walked, so templates rendered later see more data.
#[derive(Debug, derive_new::new)]
pub struct RenderContext {
    minion_id: String,
    opts: Value,
    grains: Value,
    pillar: Map,
    functions: Functions,
}

impl RenderContext {
    pub fn pillar(&self) -> &Map {
        &self.pillar
    }

    /// Fold newly loaded pillar data into the accumulator
    pub fn merge_pillar(&mut self, pillars: Map) {
        merge(&mut self.pillar, pillars);
    }

    fn to_tera(&self) -> tera::Context {
        let mut context = tera::Context::new();
        context.insert("opts", &self.opts);
        context.insert("grains", &self.grains);
        context.insert("pillar", &self.pillar);
        context.insert("minion_id", &self.minion_id);
        context.insert("__opts__", &self.opts);
        context.insert("__grains__", &self.grains);
        context.insert("__pillar__", &self.pillar);
        context
    }
}

/// Turns a template file into text
pub trait Renderer {
    fn render(&self, path: &Path, context: &RenderContext) -> Result<String>;
}

// blanket impl for Fn
impl<F> Renderer for F
where
    F: Fn(&Path, &RenderContext) -> Result<String>,
{
    fn render(&self, path: &Path, context: &RenderContext) -> Result<String> {
        self(path, context)
    }
}

/// [Renderer] backed by [tera]
#[derive(Debug, Default, Clone, Copy)]
pub struct TeraRenderer;

impl Renderer for TeraRenderer {
    #[tracing::instrument(level = "trace", skip(self, context))]
    fn render(&self, path: &Path, context: &RenderContext) -> Result<String> {
        let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;

        let name = path
            .file_name()
            .map_or_else(|| "document".to_string(), |name| name.to_string_lossy().into_owned());

        let mut templates = neighbours(path);
        templates.push((name.clone(), source.clone()));

        let mut tera = engine();
        if let Err(error) = tera.add_raw_templates(
            templates
                .iter()
                .map(|(name, source)| (name.as_str(), source.as_str())),
        ) {
            tracing::debug!(path=%path.display(), %error, "neighbouring templates ignored");
            tera = engine();
        }

        let render_error = |source: tera::Error| Error::Render {
            path: path.to_owned(),
            source: Box::new(source),
        };

        if tera.get_template_names().all(|known| known != name) {
            tera.add_raw_template(&name, &source).map_err(render_error)?;
        }

        // functions belong to the context, so every file gets its own instance
        context.functions.install(&mut tera);

        tera.render(&name, &context.to_tera()).map_err(render_error)
    }
}

fn engine() -> tera::Tera {
    let mut tera = tera::Tera::default();
    tera.autoescape_on(vec![]);
    tera
}

/// Files in the directory of `path` with the same extension, as (file name, source)
fn neighbours(path: &Path) -> Vec<(String, String)> {
    let Some(directory) = path.parent().filter(|dir| dir.is_dir()) else {
        return vec![];
    };

    WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry.path() != path
                && entry.path().extension() == path.extension()
        })
        .filter_map(|entry| {
            let source = std::fs::read_to_string(entry.path()).ok()?;
            Some((entry.file_name().to_string_lossy().into_owned(), source))
        })
        .collect()
}

/// Parse rendered text as a yaml mapping
///
/// A document without content is an empty mapping.
pub fn parse_document(path: &Path, text: &str) -> Result<Map> {
    if is_blank(text) {
        return Ok(Map::new());
    }

    let value = Value::from_yaml_str(text).map_err(|source| Error::Parse {
        path: path.to_owned(),
        source,
    })?;

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(Error::NotAMapping {
            path: path.to_owned(),
            kind: other.kind(),
        }),
    }
}

/// Render and parse in one go
pub fn load_document(
    renderer: &dyn Renderer,
    path: &Path,
    context: &RenderContext,
) -> Result<Map> {
    let text = renderer.render(path, context)?;
    tracing::trace!(path=%path.display(), %text, "rendered");
    parse_document(path, &text)
}

fn is_blank(text: &str) -> bool {
    text.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::yaml;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn context(pillar: Value) -> RenderContext {
        let Value::Object(pillar) = pillar else {
            panic!("pillar must be an object");
        };

        let mut functions = Functions::new();
        functions.register("echo", |args: &HashMap<String, tera::Value>| -> tera::Result<tera::Value> {
            Ok(args.get("text").cloned().unwrap_or(tera::Value::Null))
        });

        RenderContext::new(
            "web01".to_string(),
            yaml!("env: prod"),
            yaml!("os: Debian"),
            pillar,
            functions,
        )
    }

    struct Templates {
        dir: tempfile::TempDir,
    }

    impl Templates {
        fn path(&self, name: &str) -> std::path::PathBuf {
            self.dir.path().join(name)
        }
    }

    fn templates(files: &[(&str, &str)]) -> Templates {
        let dir = tempfile::tempdir().unwrap();
        for (name, source) in files {
            fs::write(dir.path().join(name), source).unwrap();
        }
        Templates { dir }
    }

    fn render(files: &[(&str, &str)], name: &str, pillar: Value) -> Result<String> {
        let templates = templates(files);
        TeraRenderer.render(&templates.path(name), &context(pillar))
    }

    #[test]
    fn exposes_context_variables() {
        let rendered = render(
            &[(
                "doc.yml",
                "id: {{ minion_id }}\nos: {{ grains.os }}\nenv: {{ opts.env }}\nrole: {{ pillar.role }}",
            )],
            "doc.yml",
            yaml!("role: web"),
        )
        .unwrap();

        assert_eq!(rendered, "id: web01\nos: Debian\nenv: prod\nrole: web");
    }

    #[test]
    fn exposes_dunder_aliases() {
        let rendered = render(
            &[(
                "doc.yml",
                "os: {{ __grains__.os }}\nenv: {{ __opts__.env }}\nrole: {{ __pillar__.role }}",
            )],
            "doc.yml",
            yaml!("role: web"),
        )
        .unwrap();

        assert_eq!(rendered, "os: Debian\nenv: prod\nrole: web");
    }

    #[test]
    fn calls_registered_functions() {
        let rendered = render(
            &[("doc.yml", r#"value: {{ echo(text="hello") }}"#)],
            "doc.yml",
            yaml!("{}"),
        )
        .unwrap();
        assert_eq!(rendered, "value: hello");
    }

    #[test]
    fn includes_neighbouring_files() {
        let rendered = render(
            &[
                ("doc.yml", r#"{% include "common.yml" %}role: {{ pillar.role }}"#),
                ("common.yml", "id: {{ minion_id }}\n"),
            ],
            "doc.yml",
            yaml!("role: web"),
        )
        .unwrap();

        assert_eq!(rendered, "id: web01\nrole: web");
    }

    #[test]
    fn imports_macros_from_neighbouring_files() {
        let rendered = render(
            &[
                (
                    "doc.yml",
                    r#"{% import "macros.yml" as m %}port: {{ m::port(base=8000) }}"#,
                ),
                ("macros.yml", "{% macro port(base) %}{{ base + 80 }}{% endmacro port %}"),
            ],
            "doc.yml",
            yaml!("{}"),
        )
        .unwrap();

        assert_eq!(rendered, "port: 8080");
    }

    #[test]
    fn broken_neighbour_does_not_break_rendering() {
        let rendered = render(
            &[("doc.yml", "a: 1"), ("broken.yml", "{% if %}")],
            "doc.yml",
            yaml!("{}"),
        )
        .unwrap();

        assert_eq!(rendered, "a: 1");
    }

    #[test]
    fn template_errors_propagate() {
        let result = render(
            &[("doc.yml", "{% if %}"), ("fine.yml", "a: 1")],
            "doc.yml",
            yaml!("{}"),
        );
        assert!(matches!(result, Err(Error::Render { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = TeraRenderer.render(Path::new("/does/not/exist.yml"), &context(yaml!("{}")));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn accumulator_merges() {
        let mut context = context(yaml!("list: [a]"));
        let Value::Object(more) = yaml!("list: [b]\nother: 1") else {
            unreachable!()
        };
        context.merge_pillar(more);
        assert_eq!(Value::Object(context.pillar().clone()), yaml!("list: [a, b]\nother: 1"));
    }

    #[test]
    fn blank_documents_are_empty() {
        let path = Path::new("blank.yml");
        assert!(parse_document(path, "").unwrap().is_empty());
        assert!(parse_document(path, "\n# only a comment\n---\n").unwrap().is_empty());
        assert!(parse_document(path, "~").unwrap().is_empty());
    }

    #[test]
    fn non_mapping_documents_are_rejected() {
        let result = parse_document(Path::new("list.yml"), "- a\n- b");
        assert!(matches!(result, Err(Error::NotAMapping { kind: "array", .. })));
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let result = parse_document(Path::new("bad.yml"), "a: [b");
        assert!(matches!(result, Err(Error::Parse { .. })));
    }
}
