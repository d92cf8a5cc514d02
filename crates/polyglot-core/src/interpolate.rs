//! Placeholder interpolation
//!
//! Substitutes `{{name}}`-style placeholders with stringified values from the
//! request options. Delimiters are configurable; unmatched placeholders are
//! left verbatim. Substituted values are never re-scanned, so a value that
//! happens to contain delimiters cannot trigger recursive substitution.

use crate::formatter::Formatter;
use crate::options::TranslateOptions;
use parking_lot::RwLock;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Interpolation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolationConfig {
    /// Opening delimiter
    pub prefix: String,
    /// Closing delimiter
    pub suffix: String,
    /// Escape `& < > " '` in substituted values
    pub escape_html: bool,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            prefix: "{{".to_string(),
            suffix: "}}".to_string(),
            escape_html: false,
        }
    }
}

struct InterpolationState {
    config: InterpolationConfig,
    pattern: Regex,
}

/// Substitutes placeholders in resolved translations
pub struct InterpolationFormatter {
    state: RwLock<InterpolationState>,
}

impl InterpolationFormatter {
    pub fn new(config: InterpolationConfig) -> Self {
        let pattern = build_pattern(&config);
        Self {
            state: RwLock::new(InterpolationState { config, pattern }),
        }
    }

    /// Replace the configuration, recompiling the placeholder pattern
    pub fn set_config(&self, config: InterpolationConfig) {
        let pattern = build_pattern(&config);
        *self.state.write() = InterpolationState { config, pattern };
    }
}

fn build_pattern(config: &InterpolationConfig) -> Regex {
    let pattern = format!(
        r"{}\s*([\w.]+)\s*{}",
        regex::escape(&config.prefix),
        regex::escape(&config.suffix)
    );
    // Escaped delimiters around a fixed group always form a valid pattern.
    Regex::new(&pattern).expect("placeholder pattern is valid by construction")
}

impl Formatter for InterpolationFormatter {
    fn name(&self) -> &'static str {
        "interpolation"
    }

    fn format(&self, value: &str, options: &TranslateOptions) -> String {
        if options.values.is_empty() {
            return value.to_string();
        }

        let state = self.state.read();
        state
            .pattern
            .replace_all(value, |caps: &Captures<'_>| {
                match options.values.get(&caps[1]) {
                    Some(replacement) if state.config.escape_html => escape_html(replacement),
                    Some(replacement) => replacement.clone(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

impl std::fmt::Debug for InterpolationFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterpolationFormatter")
            .field("config", &self.state.read().config)
            .finish()
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter() -> InterpolationFormatter {
        InterpolationFormatter::new(InterpolationConfig::default())
    }

    #[test]
    fn substitutes_matching_placeholders() {
        let options = TranslateOptions::new().add_value("name", "Ana");
        assert_eq!(formatter().format("Hello {{name}}", &options), "Hello Ana");
        assert_eq!(formatter().format("Hello {{ name }}", &options), "Hello Ana");
    }

    #[test]
    fn stringifies_numeric_values() {
        let options = TranslateOptions::new().add_value("count", 42);
        assert_eq!(formatter().format("{{count}} items", &options), "42 items");
    }

    #[test]
    fn leaves_unmatched_placeholders_verbatim() {
        let options = TranslateOptions::new().add_value("name", "Ana");
        assert_eq!(
            formatter().format("Hello {{name}}, {{other}}", &options),
            "Hello Ana, {{other}}"
        );
    }

    #[test]
    fn empty_values_is_a_no_op() {
        assert_eq!(
            formatter().format("Hello {{name}}", &TranslateOptions::new()),
            "Hello {{name}}"
        );
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let options = TranslateOptions::new()
            .add_value("a", "{{b}}")
            .add_value("b", "boom");
        assert_eq!(formatter().format("{{a}}", &options), "{{b}}");
    }

    #[test]
    fn escapes_html_when_configured() {
        let formatter = InterpolationFormatter::new(InterpolationConfig {
            escape_html: true,
            ..Default::default()
        });
        let options = TranslateOptions::new().add_value("name", "<b>\"Ana\" & 'Bob'</b>");
        assert_eq!(
            formatter.format("{{name}}", &options),
            "&lt;b&gt;&quot;Ana&quot; &amp; &#39;Bob&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn custom_delimiters() {
        let formatter = InterpolationFormatter::new(InterpolationConfig {
            prefix: "%(".to_string(),
            suffix: ")".to_string(),
            ..Default::default()
        });
        let options = TranslateOptions::new().add_value("name", "Ana");
        assert_eq!(formatter.format("Hello %(name)", &options), "Hello Ana");
        assert_eq!(formatter.format("Hello {{name}}", &options), "Hello {{name}}");
    }

    #[test]
    fn set_config_recompiles_pattern() {
        let formatter = formatter();
        formatter.set_config(InterpolationConfig {
            prefix: "[[".to_string(),
            suffix: "]]".to_string(),
            ..Default::default()
        });
        let options = TranslateOptions::new().add_value("name", "Ana");
        assert_eq!(formatter.format("Hello [[name]]", &options), "Hello Ana");
    }
}
