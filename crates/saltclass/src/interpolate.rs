//! `${a:b:c}` references inside the merged pillar tree
//!
//! A single pass over the tree. Every distinct string value is scanned once for tokens of the
//! form `${...}`, optionally preceded by a backslash:
//!
//! - `\${path}`: escaped, the backslash is dropped and the token stays literal text
//! - `${a:b:c}`: looked up from the root of the tree (`a` -> `b` -> `c`)
//!   - a string that consists of nothing but the token takes the referenced value as is,
//!     including mappings and sequences
//!   - a token embedded in a longer string is replaced by the text of the referenced scalar
//!   - unknown paths, `null` values and non-scalars inside text are left untouched
//!
//! Replacement works on string *values*: every occurrence of the original string anywhere in the
//! tree is replaced by the expanded one, even under unrelated keys. Results are not scanned again.
use crate::value::{Map, Value};
use crate::visit::{VisitStrings, VisitStringsMut};
use regex::Regex;
use std::sync::OnceLock;

const PATH_SEPARATOR: char = ':';

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    // 1: escape, 2: token, 3: path
    TOKEN.get_or_init(|| Regex::new(r"(\\?)(\$\{(.*?)\})").expect("token regex is valid"))
}

/// Expand all references of `tree` against itself
pub fn expand_variables(mut tree: Map) -> Map {
    let mut originals: indexmap::IndexSet<String> = Default::default();
    tree.visit_strings(&mut |string: &str| {
        if token_regex().is_match(string) {
            originals.insert(string.to_string());
        }
    });

    for original in originals {
        let Some(expanded) = expand_string(&tree, &original) else {
            continue;
        };

        tracing::trace!(%original, ?expanded, "expanded");
        replace_all(&mut tree, &original, &expanded);
    }

    tree
}

/// Expanded form of one string, `None` if nothing changed
///
/// Each token is replaced within its own match only, text between tokens is copied as is.
fn expand_string(root: &Map, original: &str) -> Option<Value> {
    let mut expanded = String::with_capacity(original.len());
    let mut last = 0;

    for captures in token_regex().captures_iter(original) {
        let (Some(matched), Some(token), Some(path)) =
            (captures.get(0), captures.get(2), captures.get(3))
        else {
            continue;
        };
        let escaped = captures.get(1).is_some_and(|escape| !escape.is_empty());
        let token = token.as_str();

        expanded.push_str(&original[last..matched.start()]);
        last = matched.end();

        if escaped {
            expanded.push_str(token);
            continue;
        }

        let Some(value) = lookup(root, path.as_str()) else {
            tracing::debug!(reference = token, "unresolved reference");
            expanded.push_str(token);
            continue;
        };

        if token == original {
            return Some(value.clone());
        }

        match value.to_text() {
            Some(text) => expanded.push_str(&text),
            None => {
                tracing::debug!(
                    reference = token,
                    kind = value.kind(),
                    "can not embed value into text"
                );
                expanded.push_str(token);
            }
        }
    }
    expanded.push_str(&original[last..]);

    (expanded != original).then_some(Value::String(expanded))
}

/// Descend from the root key by key
fn lookup<'t>(root: &'t Map, path: &str) -> Option<&'t Value> {
    let mut segments = path.split(PATH_SEPARATOR);
    let mut current = root.get(segments.next()?)?;

    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }

    (!current.is_null()).then_some(current)
}

fn replace_all(tree: &mut Map, original: &str, replacement: &Value) {
    tree.visit_strings_mut(&mut |value: &mut Value| {
        if value.as_str() == Some(original) {
            *value = replacement.clone();
        }
    });
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::yaml;
    use pretty_assertions::assert_eq;

    fn expanded(source: &str) -> Value {
        let Value::Object(tree) = yaml!(source) else {
            panic!("tree must be a mapping");
        };
        Value::Object(expand_variables(tree))
    }

    #[test]
    fn embedded_reference() {
        assert_eq!(
            expanded("a: {b: v}\nc: pre-${a:b}-post"),
            yaml!("a: {b: v}\nc: pre-v-post")
        );
    }

    #[test]
    fn escaped_reference_stays_literal() {
        assert_eq!(
            expanded(r#"a: {b: v}
c: '\${a:b}'"#),
            yaml!("a: {b: v}\nc: '${a:b}'")
        );
    }

    #[test]
    fn unknown_reference_stays() {
        assert_eq!(
            expanded("c: '${missing:key}'"),
            yaml!("c: '${missing:key}'")
        );
    }

    #[test]
    fn whole_value_reference_keeps_type() {
        assert_eq!(
            expanded("a: {b: [1, 2], n: 80}\nlist: '${a:b}'\nport: '${a:n}'"),
            yaml!("a: {b: [1, 2], n: 80}\nlist: [1, 2]\nport: 80")
        );
    }

    #[test]
    fn scalars_are_embedded_as_text() {
        assert_eq!(
            expanded("port: 80\nflag: true\nurl: 'http://host:${port}/?debug=${flag}'"),
            yaml!("port: 80\nflag: true\nurl: 'http://host:80/?debug=true'")
        );
    }

    #[test]
    fn mapping_is_not_embedded_into_text() {
        assert_eq!(
            expanded("a: {b: 1}\nc: 'x ${a}'"),
            yaml!("a: {b: 1}\nc: 'x ${a}'")
        );
    }

    #[test]
    fn references_inside_sequences_and_nested_mappings() {
        assert_eq!(
            expanded("name: web\nlist: ['${name}-1', {inner: '${name}-2'}]"),
            yaml!("name: web\nlist: [web-1, {inner: web-2}]")
        );
    }

    #[test]
    fn identical_strings_are_replaced_together() {
        assert_eq!(
            expanded("v: 1\nx: '${v}!'\ny: {z: '${v}!'}"),
            yaml!("v: 1\nx: '1!'\ny: {z: '1!'}")
        );
    }

    #[test]
    fn results_are_not_scanned_again() {
        assert_eq!(
            expanded("a: 'x${b}'\nb: '${c}'\nc: 1"),
            yaml!("a: 'x${c}'\nb: 1\nc: 1")
        );
    }

    #[test]
    fn escaped_and_plain_reference_of_same_path() {
        assert_eq!(
            expanded(r#"a: v
c: '\${a}-${a}'"#),
            yaml!("a: v\nc: '${a}-v'")
        );
    }

    #[test]
    fn adjacent_references() {
        assert_eq!(
            expanded("a: x\nb: y\nc: '${a}${b}'"),
            yaml!("a: x\nb: y\nc: xy")
        );
    }

    #[test]
    fn unresolved_reference_keeps_its_place() {
        assert_eq!(
            expanded("a: v\nc: '${missing}/${a}/${missing}'"),
            yaml!("a: v\nc: '${missing}/v/${missing}'")
        );
    }

    #[test]
    fn null_is_unresolved() {
        assert_eq!(expanded("a: ~\nb: '${a}'"), yaml!("a: ~\nb: '${a}'"));
    }
}
