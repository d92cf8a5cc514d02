//! Composable text transforms applied to resolved translations

use crate::options::TranslateOptions;
use std::sync::Arc;

/// A pure text transform
///
/// Formatters never fail: a transform that does not apply returns its input
/// unchanged.
pub trait Formatter: Send + Sync {
    fn name(&self) -> &'static str;
    fn format(&self, value: &str, options: &TranslateOptions) -> String;
}

/// Applies an ordered list of formatters, feeding each one's output to the next
///
/// The translator runs pluralization first (selecting one `|`-delimited
/// variant), then interpolation, so placeholders inside the selected variant
/// are still substituted.
pub struct FormatterPipeline {
    formatters: Vec<Arc<dyn Formatter>>,
}

impl FormatterPipeline {
    pub fn new(formatters: Vec<Arc<dyn Formatter>>) -> Self {
        Self { formatters }
    }
}

impl Formatter for FormatterPipeline {
    fn name(&self) -> &'static str {
        "pipeline"
    }

    fn format(&self, value: &str, options: &TranslateOptions) -> String {
        self.formatters
            .iter()
            .fold(value.to_string(), |result, formatter| {
                formatter.format(&result, options)
            })
    }
}

impl std::fmt::Debug for FormatterPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.formatters.iter().map(|f| f.name()).collect();
        f.debug_struct("FormatterPipeline")
            .field("formatters", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Suffixer(&'static str);

    impl Formatter for Suffixer {
        fn name(&self) -> &'static str {
            "suffixer"
        }

        fn format(&self, value: &str, _options: &TranslateOptions) -> String {
            format!("{value}{}", self.0)
        }
    }

    #[test]
    fn pipeline_applies_formatters_in_order() {
        let pipeline =
            FormatterPipeline::new(vec![Arc::new(Suffixer("-a")), Arc::new(Suffixer("-b"))]);

        let result = pipeline.format("x", &TranslateOptions::new());
        assert_eq!(result, "x-a-b");
    }

    #[test]
    fn empty_pipeline_is_identity() {
        let pipeline = FormatterPipeline::new(Vec::new());
        assert_eq!(pipeline.format("x", &TranslateOptions::new()), "x");
    }
}
