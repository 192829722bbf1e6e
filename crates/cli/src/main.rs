use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use owo_colors::OwoColorize;
use texentry_core::pipeline::FALLBACK_BASE_NAME;
use texentry_core::{
    JsonConfig, Pipeline, PipelineConfig, convert_to_json, default_base_name, fetch_file, fetch_stdin, fetch_url,
};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_ENTRY_URL: &str = "https://plato.stanford.edu/entries/bergson/";

/// What to produce from the extracted entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Latex,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latex" | "tex" => Ok(Self::Latex),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: latex, json", s)),
        }
    }
}

/// Where the source page comes from
#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Url(String),
    File(String),
    Stdin,
}

impl Source {
    fn from_input(input: &str) -> Self {
        if input == "-" {
            Self::Stdin
        } else if input.starts_with("http://") || input.starts_with("https://") {
            Self::Url(input.to_string())
        } else {
            Self::File(input.to_string())
        }
    }

    /// Output base name derived from the input.
    fn base_name(&self) -> String {
        match self {
            Self::Url(url) => default_base_name(url),
            Self::File(path) => Path::new(path)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| FALLBACK_BASE_NAME.to_string()),
            Self::Stdin => FALLBACK_BASE_NAME.to_string(),
        }
    }
}

/// Typeset an encyclopedia entry from the web as a LaTeX document
#[derive(Parser, Debug)]
#[command(name = "texentry")]
#[command(author = "texentry Contributors")]
#[command(version)]
#[command(about = "Typeset encyclopedia entries as LaTeX and PDF", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT", default_value = DEFAULT_ENTRY_URL)]
    input: String,

    /// Directory for the generated .tex and .pdf files
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    output_dir: PathBuf,

    /// Output file name without extension (default: derived from the input)
    #[arg(short, long, value_name = "NAME")]
    name: Option<String>,

    /// Output format (latex, json)
    #[arg(short, long, default_value = "latex", value_name = "FORMAT")]
    format: OutputFormat,

    /// Include the rendered LaTeX source in JSON output
    #[arg(long)]
    with_latex: bool,

    /// Write the .tex file without running the compiler
    #[arg(long)]
    no_compile: bool,

    /// Leave out the table of contents
    #[arg(long)]
    no_toc: bool,

    /// Compiler program
    #[arg(long, default_value = "pdflatex", value_name = "PROGRAM")]
    compiler: String,

    /// Compiler argument, repeatable (replaces the default arguments)
    #[arg(long = "compiler-arg", value_name = "ARG", allow_hyphen_values = true)]
    compiler_args: Vec<String>,

    /// Number of compiler runs
    #[arg(long, default_value = "1", value_name = "NUM")]
    passes: usize,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Generate shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn pipeline_config(&self, base_name: String) -> PipelineConfig {
        let mut builder = PipelineConfig::builder()
            .timeout(self.timeout)
            .include_toc(!self.no_toc)
            .compiler(&self.compiler)
            .passes(self.passes)
            .base_name(base_name);

        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        if !self.compiler_args.is_empty() {
            builder = builder.compiler_args(self.compiler_args.clone());
        }

        builder.build()
    }

    fn total_steps(&self) -> usize {
        match (self.format, self.no_compile) {
            (OutputFormat::Json, _) => 2,
            (OutputFormat::Latex, true) => 3,
            (OutputFormat::Latex, false) => 4,
        }
    }
}

/// Route log output to stderr. `RUST_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "texentry=debug,texentry_core=debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr).with_target(false))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "texentry", &mut io::stdout());
        return Ok(());
    }

    init_tracing(args.verbose);

    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    let source = Source::from_input(&args.input);
    let base_name = args.name.clone().unwrap_or_else(|| source.base_name());
    tracing::debug!(source = ?source, base_name = %base_name, "resolved input");
    let pipeline = Pipeline::with_config(args.pipeline_config(base_name));
    let total = args.total_steps();

    let started = Instant::now();
    let html = match &source {
        Source::Stdin => {
            if args.verbose {
                echo::print_step(1, total, "Reading from stdin");
            }
            fetch_stdin().context("Failed to read from stdin")?
        }
        Source::Url(url) => {
            if args.verbose {
                echo::print_step(1, total, &format!("Fetching from {}", url.bright_white().underline()));
            }
            fetch_url(url, &pipeline.config().fetch)
                .await
                .with_context(|| format!("Failed to fetch URL: {}", url))?
        }
        Source::File(path) => {
            if args.verbose {
                echo::print_step(1, total, &format!("Reading from file {}", path.bright_white()));
            }
            fetch_file(path).with_context(|| format!("Failed to read file: {}", path))?
        }
    };

    if args.verbose {
        echo::print_detail("Size", &echo::format_size(html.len()));
        echo::print_timing("Read", started.elapsed());
        eprintln!();
        echo::print_step(2, total, "Extracting entry");
    }

    let started = Instant::now();
    let source_url = match &source {
        Source::Url(url) => Some(url.as_str()),
        _ => None,
    };
    let data = match source_url {
        Some(url) => pipeline.extract_with_url(&html, url),
        None => pipeline.extract(&html),
    }
    .context("Failed to extract entry")?;

    if args.verbose {
        echo::print_timing("Extract", started.elapsed());
        echo::print_entry_summary(&data);
    }

    if args.format == OutputFormat::Json {
        let latex = args.with_latex.then(|| pipeline.render(&data));
        let config = JsonConfig { include_latex: args.with_latex, pretty: true };
        let json = convert_to_json(&data, &config, source_url, latex.as_deref()).context("Failed to serialize entry")?;
        println!("{}", json);
        return Ok(());
    }

    if args.verbose {
        echo::print_step(3, total, "Writing LaTeX source");
    }

    let tex_path = pipeline
        .write(&data, &args.output_dir)
        .with_context(|| format!("Failed to write LaTeX source to {}", args.output_dir.display()))?;
    echo::print_success(&format!("LaTeX source written to {}", tex_path.display().bright_white()));

    if args.no_compile {
        return Ok(());
    }

    if args.verbose {
        echo::print_step(4, total, &format!("Compiling with {}", pipeline.config().compile.program));
    }

    let started = Instant::now();
    let output = pipeline
        .compile(&tex_path)
        .with_context(|| format!("Failed to compile {}", tex_path.display()))?;

    if args.verbose {
        echo::print_detail("Passes", &output.passes.to_string());
        echo::print_timing("Compile", started.elapsed());
    }
    echo::print_success(&format!("PDF written to {}", output.pdf_path.display().bright_white()));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_from_input() {
        assert_eq!(Source::from_input("-"), Source::Stdin);
        assert_eq!(
            Source::from_input("https://plato.stanford.edu/entries/bergson/"),
            Source::Url("https://plato.stanford.edu/entries/bergson/".to_string())
        );
        assert_eq!(Source::from_input("page.html"), Source::File("page.html".to_string()));
    }

    #[test]
    fn test_source_base_name() {
        assert_eq!(Source::Url(DEFAULT_ENTRY_URL.to_string()).base_name(), "bergson");
        assert_eq!(Source::File("fixtures/kant.html".to_string()).base_name(), "kant");
        assert_eq!(Source::Stdin.base_name(), "entry");
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("latex".parse::<OutputFormat>(), Ok(OutputFormat::Latex));
        assert_eq!("TEX".parse::<OutputFormat>(), Ok(OutputFormat::Latex));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("markdown".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["texentry"]);
        assert_eq!(args.input, DEFAULT_ENTRY_URL);
        assert_eq!(args.format, OutputFormat::Latex);
        assert_eq!(args.output_dir, PathBuf::from("."));

        let config = args.pipeline_config("bergson".to_string());
        assert_eq!(config.compile.program, "pdflatex");
        assert_eq!(config.compile.passes, 1);
        assert!(config.latex.include_toc);
        assert_eq!(config.base_name.as_deref(), Some("bergson"));
    }

    #[test]
    fn test_compiler_args_replace_defaults() {
        let args = Args::parse_from(["texentry", "--compiler", "xelatex", "--compiler-arg", "-quiet", "page.html"]);
        let config = args.pipeline_config("page".to_string());

        assert_eq!(config.compile.program, "xelatex");
        assert_eq!(config.compile.args, vec!["-quiet".to_string()]);
    }

    #[test]
    fn test_args_command_is_valid() {
        Args::command().debug_assert();
    }
}
