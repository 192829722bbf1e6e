pub mod article;
pub mod compile;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod formatters;
pub mod inline;
pub mod markup;
pub mod parse;
pub mod pipeline;
pub mod sections;
pub mod toc;

pub use article::{DocumentData, SectionContent};
pub use compile::{CompileConfig, CompileOutput, compile_source, write_source};
pub use error::{Result, TexEntryError};
pub use extract::{DEFAULT_PUBLICATION, DEFAULT_TITLE, ExtractConfig, extract_entry};
pub use fetch::FetchConfig;
#[cfg(feature = "fetch")]
pub use fetch::fetch_url;
pub use fetch::{fetch_file, fetch_stdin};
pub use formatters::{JsonConfig, JsonFormatter, LatexConfig, LatexFormatter, convert_to_json, convert_to_latex};
pub use inline::{InlineConverter, PLACEHOLDER_TARGET, convert_inline, convert_paragraph, escape_latex};
pub use markup::{MarkupNode, TagKind};
pub use parse::{Document, Element};
pub use pipeline::{Pipeline, PipelineConfig, PipelineConfigBuilder, default_base_name};
pub use sections::{extract_sections, find_heading, section_body};
pub use toc::{TocEntry, extract_toc, strip_enumeration};
