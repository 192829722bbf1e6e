//! End-to-end entry conversion API.
//!
//! [`Pipeline`] ties the stages together: fetch the source page, extract
//! the entry, render LaTeX, write the `.tex` file and run the compiler.
//! Each stage is also callable on its own.
//!
//! # Example
//!
//! ```rust,no_run
//! use texentry_core::{Pipeline, PipelineConfig};
//!
//! # async fn example() -> texentry_core::Result<()> {
//! let url = "https://plato.stanford.edu/entries/bergson/";
//! let pipeline = Pipeline::with_config(PipelineConfig::builder().base_name_from_url(url).build());
//! let data = pipeline.fetch_and_extract(url).await?;
//! let tex = pipeline.write(&data, std::path::Path::new("out"))?;
//! pipeline.compile(&tex)?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use url::Url;

use crate::article::DocumentData;
use crate::compile::{CompileConfig, CompileOutput, compile_source, write_source};
use crate::extract::{ExtractConfig, extract_entry};
#[cfg(feature = "fetch")]
use crate::fetch::fetch_url;
use crate::fetch::FetchConfig;
use crate::formatters::{LatexConfig, convert_to_latex};
use crate::parse::Document;
use crate::{Result, TexEntryError};

/// Base name used when the source URL has no usable path segment.
pub const FALLBACK_BASE_NAME: &str = "entry";

/// Derives the output base name from the last non-empty path segment of a URL.
///
/// ```rust
/// use texentry_core::pipeline::default_base_name;
///
/// assert_eq!(default_base_name("https://plato.stanford.edu/entries/bergson/"), "bergson");
/// assert_eq!(default_base_name("https://example.com/"), "entry");
/// ```
pub fn default_base_name(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.rfind(|segment| !segment.is_empty()).map(str::to_string))
        })
        .map(|segment| segment.trim_end_matches(".html").to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_BASE_NAME.to_string())
}

/// Configuration for every stage of the pipeline.
///
/// # Example
///
/// ```rust
/// use texentry_core::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .timeout(10)
///     .compiler("xelatex")
///     .passes(2)
///     .base_name("bergson")
///     .build();
/// assert_eq!(config.compile.passes, 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// HTTP settings for the source page.
    pub fetch: FetchConfig,
    /// Selectors locating the parts of the entry.
    pub extract: ExtractConfig,
    /// Layout of the generated document.
    pub latex: LatexConfig,
    /// External compiler invocation.
    pub compile: CompileConfig,
    /// Output file name without extension. [`FALLBACK_BASE_NAME`] when unset.
    pub base_name: Option<String>,
}

impl PipelineConfig {
    /// Creates a new builder for PipelineConfig.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }
}

/// Builder for PipelineConfig.
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: PipelineConfig::default() }
    }

    /// Sets the HTTP timeout in seconds.
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.config.fetch.timeout = seconds;
        self
    }

    /// Sets the User-Agent header sent with the fetch.
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.user_agent = value.into();
        self
    }

    /// Sets the base URL for resolving relative links.
    pub fn base_url(mut self, url: Url) -> Self {
        self.config.extract.base_url = Some(url);
        self
    }

    /// Replaces the extraction selectors.
    pub fn extract(mut self, extract: ExtractConfig) -> Self {
        self.config.extract = extract;
        self
    }

    /// Replaces the document layout settings.
    pub fn latex(mut self, latex: LatexConfig) -> Self {
        self.config.latex = latex;
        self
    }

    /// Sets whether the document gets a table of contents.
    pub fn include_toc(mut self, value: bool) -> Self {
        self.config.latex.include_toc = value;
        self
    }

    /// Sets the compiler program.
    pub fn compiler(mut self, program: impl Into<String>) -> Self {
        self.config.compile.program = program.into();
        self
    }

    /// Sets the arguments placed before the source file name.
    pub fn compiler_args(mut self, args: Vec<String>) -> Self {
        self.config.compile.args = args;
        self
    }

    /// Sets the number of compiler runs.
    pub fn passes(mut self, value: usize) -> Self {
        self.config.compile.passes = value;
        self
    }

    /// Sets the output base name.
    pub fn base_name(mut self, name: impl Into<String>) -> Self {
        self.config.base_name = Some(name.into());
        self
    }

    /// Sets the output base name from the last path segment of `url`.
    pub fn base_name_from_url(mut self, url: &str) -> Self {
        self.config.base_name = Some(default_base_name(url));
        self
    }

    /// Builds the config.
    pub fn build(self) -> PipelineConfig {
        self.config
    }
}

impl Default for PipelineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts one encyclopedia entry page into a LaTeX document.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Creates a pipeline with default settings.
    pub fn new() -> Self {
        Self { config: PipelineConfig::default() }
    }

    /// Creates a pipeline with a custom configuration.
    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Extracts entry data from an HTML string.
    pub fn extract(&self, html: &str) -> Result<DocumentData> {
        let doc = Document::parse(html)?;
        Ok(extract_entry(&doc, &self.config.extract))
    }

    /// Extracts entry data, resolving relative links against `url`.
    ///
    /// # Errors
    ///
    /// Returns [`TexEntryError::InvalidUrl`] if the URL does not parse.
    pub fn extract_with_url(&self, html: &str, url: &str) -> Result<DocumentData> {
        let base_url = Url::parse(url).map_err(|e| TexEntryError::InvalidUrl(e.to_string()))?;
        let config = ExtractConfig { base_url: Some(base_url), ..self.config.extract.clone() };
        let doc = Document::parse(html)?;
        Ok(extract_entry(&doc, &config))
    }

    /// Fetches a page and extracts its entry data.
    #[cfg(feature = "fetch")]
    pub async fn fetch_and_extract(&self, url: &str) -> Result<DocumentData> {
        let html = fetch_url(url, &self.config.fetch).await?;
        tracing::info!(url = %url, bytes = html.len(), "fetched source page");
        self.extract_with_url(&html, url)
    }

    /// Renders entry data as a LaTeX source.
    pub fn render(&self, data: &DocumentData) -> String {
        convert_to_latex(data, &self.config.latex)
    }

    /// Output base name, falling back to [`FALLBACK_BASE_NAME`].
    pub fn base_name(&self) -> &str {
        self.config.base_name.as_deref().unwrap_or(FALLBACK_BASE_NAME)
    }

    /// Renders entry data and writes `<base_name>.tex` into `dir`.
    pub fn write(&self, data: &DocumentData, dir: &Path) -> Result<PathBuf> {
        write_source(dir, self.base_name(), &self.render(data))
    }

    /// Runs the configured compiler on a written source file.
    pub fn compile(&self, tex_path: &Path) -> Result<CompileOutput> {
        let output = compile_source(tex_path, &self.config.compile)?;
        tracing::info!(pdf = %output.pdf_path.display(), "compiled document");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const ENTRY: &str = r##"
        <html><body>
            <div id="toc"><ul><li><a href="#Life">1. Life</a></li></ul></div>
            <div id="aueditable">
                <h1>Henri Bergson</h1>
                <div id="pubinfo">First published Tue May 18, 2004</div>
                <div id="preamble"><p>See <a href="../deleuze/">Deleuze</a>.</p></div>
                <div id="main-text">
                    <h2 id="Life">1. Life</h2>
                    <p>Born in Paris.</p>
                </div>
            </div>
        </body></html>
    "##;

    #[rstest]
    #[case("https://plato.stanford.edu/entries/bergson/", "bergson")]
    #[case("https://plato.stanford.edu/entries/bergson", "bergson")]
    #[case("https://example.com/pages/time.html", "time")]
    #[case("https://example.com/", "entry")]
    #[case("not a url", "entry")]
    fn test_default_base_name(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(default_base_name(url), expected);
    }

    #[test]
    fn test_builder_sets_every_stage() {
        let config = PipelineConfig::builder()
            .timeout(5)
            .user_agent("test-agent")
            .include_toc(false)
            .compiler("lualatex")
            .compiler_args(vec!["-draftmode".to_string()])
            .passes(3)
            .base_name("bergson")
            .build();

        assert_eq!(config.fetch.timeout, 5);
        assert_eq!(config.fetch.user_agent, "test-agent");
        assert!(!config.latex.include_toc);
        assert_eq!(config.compile.program, "lualatex");
        assert_eq!(config.compile.args, vec!["-draftmode".to_string()]);
        assert_eq!(config.compile.passes, 3);
        assert_eq!(config.base_name.as_deref(), Some("bergson"));
    }

    #[test]
    fn test_extract_and_render() {
        let pipeline = Pipeline::new();
        let data = pipeline.extract(ENTRY).unwrap();

        assert_eq!(data.title, "Henri Bergson");
        assert_eq!(data.section_contents.get("Life"), Some("Born in Paris."));

        let latex = pipeline.render(&data);
        assert!(latex.contains("\\section{Life}%\nBorn in Paris.\n\n"));
    }

    #[test]
    fn test_extract_with_url_resolves_links() {
        let pipeline = Pipeline::new();
        let data = pipeline.extract_with_url(ENTRY, "https://plato.stanford.edu/entries/bergson/").unwrap();

        assert_eq!(data.overview, "See \\href{https://plato.stanford.edu/entries/deleuze/}{Deleuze}.");
    }

    #[test]
    fn test_extract_with_invalid_url() {
        let result = Pipeline::new().extract_with_url(ENTRY, "not a url");
        assert!(matches!(result, Err(TexEntryError::InvalidUrl(_))));
    }

    #[test]
    fn test_write_uses_base_name() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::with_config(PipelineConfig::builder().base_name("bergson").build());
        let data = pipeline.extract(ENTRY).unwrap();

        let path = pipeline.write(&data, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("bergson.tex"));

        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.starts_with("\\documentclass{article}%\n"));
    }

    #[test]
    fn test_write_without_base_name_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new();

        let path = pipeline.write(&DocumentData::default(), dir.path()).unwrap();
        assert_eq!(path, dir.path().join("entry.tex"));
    }

    #[test]
    fn test_write_with_name_from_url() {
        let dir = tempfile::tempdir().unwrap();
        let url = "https://plato.stanford.edu/entries/bergson/";
        let pipeline = Pipeline::with_config(PipelineConfig::builder().base_name_from_url(url).build());
        let data = pipeline.extract_with_url(ENTRY, url).unwrap();

        let path = pipeline.write(&data, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("bergson.tex"));
    }
}
