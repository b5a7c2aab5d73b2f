//! Prompt templates with explicit `{name}` placeholders
//!
//! Placeholders are parsed up front and rendered by explicit lookup, so an
//! unresolved placeholder is an error instead of text silently forwarded to
//! the model.

use std::collections::HashMap;
use thiserror::Error;

/// A placeholder present in a template but absent from the value map
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no value bound for placeholder '{{{0}}}'")]
pub struct UnboundPlaceholder(pub String);

/// A parsed prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    source: String,
    placeholders: Vec<String>,
}

impl PromptTemplate {
    /// Parse a template, collecting its `{name}` placeholders
    ///
    /// A placeholder is a brace-delimited identifier (`[A-Za-z0-9_]+`).
    /// Anything else, including unbalanced braces, is literal text.
    pub fn parse(source: &str) -> Self {
        let mut placeholders = Vec::new();
        let mut rest = source;

        while let Some(open) = rest.find('{') {
            rest = &rest[open + 1..];
            if let Some(close) = rest.find('}') {
                let name = &rest[..close];
                if is_identifier(name) && !placeholders.iter().any(|p| p == name) {
                    placeholders.push(name.to_string());
                }
            }
        }

        Self {
            source: source.to_string(),
            placeholders,
        }
    }

    /// The distinct placeholder names, in order of first appearance
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Render the template by looking up every placeholder in `values`
    pub fn render(&self, values: &HashMap<String, String>) -> Result<String, UnboundPlaceholder> {
        let mut out = String::with_capacity(self.source.len());
        let mut rest = self.source.as_str();

        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) if is_identifier(&after[..close]) => {
                    let name = &after[..close];
                    let value = values
                        .get(name)
                        .ok_or_else(|| UnboundPlaceholder(name.to_string()))?;
                    out.push_str(&rest[..open]);
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                _ => {
                    out.push_str(&rest[..open + 1]);
                    rest = after;
                }
            }
        }
        out.push_str(rest);

        Ok(out)
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_collects_placeholders_in_order() {
        let template = PromptTemplate::parse("Profile: {patient_info}\nSymptoms: {symptoms}");
        assert_eq!(template.placeholders(), ["patient_info", "symptoms"]);
    }

    #[test]
    fn test_parse_deduplicates() {
        let template = PromptTemplate::parse("{patient_info} and again {patient_info}");
        assert_eq!(template.placeholders(), ["patient_info"]);
    }

    #[test]
    fn test_render_substitutes() {
        let template = PromptTemplate::parse("Patient: {patient_info}");
        let rendered = template
            .render(&values(&[("patient_info", "45-year-old male")]))
            .unwrap();
        assert_eq!(rendered, "Patient: 45-year-old male");
    }

    #[test]
    fn test_render_missing_value_fails() {
        let template = PromptTemplate::parse("Symptoms: {symptoms}");
        let result = template.render(&HashMap::new());
        assert_eq!(result, Err(UnboundPlaceholder("symptoms".to_string())));
    }

    #[test]
    fn test_non_identifier_braces_are_literal() {
        let template = PromptTemplate::parse("JSON like {\"key\": 1} and {not valid}");
        assert!(template.placeholders().is_empty());
        let rendered = template.render(&HashMap::new()).unwrap();
        assert_eq!(rendered, "JSON like {\"key\": 1} and {not valid}");
    }

    #[test]
    fn test_render_is_injective_per_field() {
        let template = PromptTemplate::parse("{patient_info} / {symptoms}");
        let a = template
            .render(&values(&[("patient_info", "A"), ("symptoms", "S")]))
            .unwrap();
        let b = template
            .render(&values(&[("patient_info", "B"), ("symptoms", "S")]))
            .unwrap();
        assert_ne!(a, b);
    }
}
