//! A small named-template store.
//!
//! `TextTemplates` understands exactly two tags:
//!
//! - `{{KEY}}` inserts the data value's field `KEY`; a missing field is a
//!   render error.
//! - `{{> name}}` embeds another template registered in the same store,
//!   rendered against the same data.
//!
//! Everything else is literal text. That is enough for the layout pattern
//! (`"<body>{{CONTENT}}</body>"`) and keeps this store a reference
//! implementation of [`TemplateStore`] rather than a template language.

use std::{collections::HashMap, io};
use strata_core::{TemplateData, TemplateError, TemplateStore};

/// Include nesting beyond this depth is treated as a cycle.
const MAX_INCLUDE_DEPTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(String),
    Include(String),
}

/// A store of named text templates sharing one namespace.
#[derive(Debug, Default, Clone)]
pub struct TextTemplates {
    templates: HashMap<String, Vec<Segment>>,
}

impl TextTemplates {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and register `source` under `name`.
    ///
    /// Names are unique; registering a name twice is rejected.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        source: &str,
    ) -> Result<&mut Self, TemplateError> {
        let name = name.into();
        if self.templates.contains_key(&name) {
            return Err(TemplateError::Invalid {
                template: name,
                reason: "a template with this name is already registered".into(),
            });
        }
        let segments = parse(&name, source)?;
        self.templates.insert(name, segments);
        Ok(self)
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, name: impl Into<String>, source: &str) -> Result<Self, TemplateError> {
        self.register(name, source)?;
        Ok(self)
    }

    /// Registered template names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get the number of registered templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Check if the store has no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    fn render_into(
        &self,
        name: &str,
        data: &dyn TemplateData,
        out: &mut String,
        depth: usize,
    ) -> Result<(), TemplateError> {
        let segments = self
            .templates
            .get(name)
            .ok_or_else(|| TemplateError::NotRegistered(name.to_owned()))?;

        for segment in segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(key) => {
                    let value = data.lookup(key).ok_or_else(|| TemplateError::Render {
                        template: name.to_owned(),
                        reason: format!("data has no field `{key}`"),
                    })?;
                    out.push_str(&value);
                }
                Segment::Include(other) => {
                    if depth >= MAX_INCLUDE_DEPTH {
                        return Err(TemplateError::Render {
                            template: name.to_owned(),
                            reason: format!("include depth exceeded at `{other}`"),
                        });
                    }
                    self.render_into(other, data, out, depth + 1)?;
                }
            }
        }
        Ok(())
    }
}

impl TemplateStore for TextTemplates {
    fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    fn execute(
        &self,
        name: &str,
        out: &mut dyn io::Write,
        data: &dyn TemplateData,
    ) -> Result<(), TemplateError> {
        // Rendered in full before anything reaches `out`.
        let mut rendered = String::new();
        self.render_into(name, data, &mut rendered, 0)?;
        out.write_all(rendered.as_bytes())?;
        Ok(())
    }
}

fn parse(name: &str, source: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut rest = source;

    while let Some(open) = rest.find("{{") {
        if open > 0 {
            segments.push(Segment::Text(rest[..open].to_owned()));
        }
        let after_open = &rest[open + 2..];
        let close = after_open.find("}}").ok_or_else(|| TemplateError::Invalid {
            template: name.to_owned(),
            reason: format!("unterminated tag at byte {}", source.len() - rest.len() + open),
        })?;
        let tag = after_open[..close].trim();

        let segment = match tag.strip_prefix('>') {
            Some(include) => Segment::Include(include.trim().to_owned()),
            None => Segment::Field(tag.to_owned()),
        };
        if matches!(&segment, Segment::Field(k) | Segment::Include(k) if k.is_empty()) {
            return Err(TemplateError::Invalid {
                template: name.to_owned(),
                reason: "empty tag".into(),
            });
        }
        segments.push(segment);
        rest = &after_open[close + 2..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Text(rest.to_owned()));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn render(store: &TextTemplates, name: &str, data: &dyn TemplateData) -> String {
        String::from_utf8(store.render(name, data).unwrap()).unwrap()
    }

    #[test]
    fn test_field_substitution() {
        let store = TextTemplates::new()
            .with("layout", "LAYOUT: {{CONTENT}}")
            .unwrap();
        let out = render(&store, "layout", &data(&[("CONTENT", "INNER")]));
        assert_eq!(out, "LAYOUT: INNER");
    }

    #[test]
    fn test_include_shares_namespace() {
        let store = TextTemplates::new()
            .with("page", "[{{> header}}|{{ BODY }}]")
            .unwrap()
            .with("header", "H:{{TITLE}}")
            .unwrap();
        let out = render(&store, "page", &data(&[("TITLE", "t"), ("BODY", "b")]));
        assert_eq!(out, "[H:t|b]");
    }

    #[test]
    fn test_missing_field_writes_nothing() {
        let store = TextTemplates::new().with("t", "before {{Name}}").unwrap();
        let mut out = Vec::new();
        let err = store.execute("t", &mut out, &data(&[])).unwrap_err();
        assert!(matches!(err, TemplateError::Render { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_unknown_template() {
        let store = TextTemplates::new();
        let err = store.render("nope", &data(&[])).unwrap_err();
        assert!(matches!(err, TemplateError::NotRegistered(name) if name == "nope"));
    }

    #[test]
    fn test_include_cycle_is_bounded() {
        let store = TextTemplates::new()
            .with("a", "{{> b}}")
            .unwrap()
            .with("b", "{{> a}}")
            .unwrap();
        let err = store.render("a", &data(&[])).unwrap_err();
        assert!(matches!(err, TemplateError::Render { .. }));
    }

    #[test]
    fn test_registration_errors() {
        let mut store = TextTemplates::new();
        store.register("t", "x").unwrap();
        assert!(matches!(
            store.register("t", "y"),
            Err(TemplateError::Invalid { .. })
        ));
        assert!(matches!(
            store.register("open", "oops {{CONTENT"),
            Err(TemplateError::Invalid { .. })
        ));
        assert!(matches!(
            store.register("empty", "{{ }}"),
            Err(TemplateError::Invalid { .. })
        ));
        assert_eq!(store.names(), vec!["t"]);
    }
}
