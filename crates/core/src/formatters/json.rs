use crate::Result;
use crate::article::DocumentData;
use serde::Serialize;

/// Complete JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    /// Page the entry was extracted from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<&'a str>,
    /// Extracted entry data
    #[serde(flatten)]
    pub document: &'a DocumentData,
    /// Rendered LaTeX source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latex: Option<&'a str>,
}

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Include the rendered LaTeX source
    pub include_latex: bool,
    /// Pretty print JSON output
    pub pretty: bool,
}

/// Convert document data to JSON format
pub fn convert_to_json(
    data: &DocumentData, config: &JsonConfig, source_url: Option<&str>, latex: Option<&str>,
) -> Result<String> {
    let output = JsonOutput {
        source_url,
        document: data,
        latex: if config.include_latex { latex } else { None },
    };

    if config.pretty {
        Ok(serde_json::to_string_pretty(&output)?)
    } else {
        Ok(serde_json::to_string(&output)?)
    }
}

/// JSON formatter with configurable options
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, data: &DocumentData, source_url: Option<&str>, latex: Option<&str>) -> Result<String> {
        convert_to_json(data, &self.config, source_url, latex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toc::TocEntry;

    fn sample() -> DocumentData {
        DocumentData {
            title: "Henri Bergson".to_string(),
            publication: "First published 2004".to_string(),
            toc: vec![TocEntry::new("Life", "Life and Work", 1)],
            overview: "Overview text.".to_string(),
            section_contents: [("Life".to_string(), "Body.".to_string())].into_iter().collect(),
        }
    }

    #[test]
    fn test_convert_to_json_compact() {
        let json = convert_to_json(&sample(), &JsonConfig::default(), None, None).unwrap();

        assert!(json.contains(r#""title":"Henri Bergson""#));
        assert!(json.contains(r#""toc":[{"id":"Life","title":"Life and Work","level":1}]"#));
        assert!(json.contains(r#""section_contents":{"Life":"Body."}"#));
        assert!(!json.contains("source_url"));
        assert!(!json.contains("latex"));
    }

    #[test]
    fn test_convert_to_json_with_source_and_latex() {
        let config = JsonConfig { include_latex: true, pretty: true };
        let json = convert_to_json(
            &sample(),
            &config,
            Some("https://plato.stanford.edu/entries/bergson/"),
            Some("\\section{Life}"),
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["source_url"], "https://plato.stanford.edu/entries/bergson/");
        assert_eq!(value["latex"], "\\section{Life}");
        assert_eq!(value["overview"], "Overview text.");
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_latex_omitted_unless_requested() {
        let json = convert_to_json(&sample(), &JsonConfig::default(), None, Some("\\section{Life}")).unwrap();
        assert!(!json.contains("latex"));
    }

    #[test]
    fn test_json_formatter() {
        let data = sample();
        let config = JsonConfig { pretty: true, ..Default::default() };
        let formatter = JsonFormatter::new(config.clone());

        assert_eq!(
            formatter.convert(&data, None, None).unwrap(),
            convert_to_json(&data, &config, None, None).unwrap()
        );
    }
}
