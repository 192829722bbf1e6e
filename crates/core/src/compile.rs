//! Writing the LaTeX source and running the external document compiler.
//!
//! The compiler is an opaque subprocess: it is started in the directory of
//! the `.tex` file, and its exit status is the only signal that matters. A
//! non-zero exit aborts the run with [`TexEntryError::CompileFailed`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::{Result, TexEntryError};

/// Number of trailing compiler output lines kept in error messages.
const ERROR_TAIL_LINES: usize = 20;

/// External compiler configuration.
#[derive(Debug, Clone)]
pub struct CompileConfig {
    /// Program to run, looked up on `PATH`.
    pub program: String,
    /// Arguments placed before the source file name.
    pub args: Vec<String>,
    /// How many times to run the compiler. A second pass fills in the
    /// table of contents written by the first.
    pub passes: usize,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            program: "pdflatex".to_string(),
            args: vec!["-interaction=nonstopmode".to_string(), "-halt-on-error".to_string()],
            passes: 1,
        }
    }
}

/// Result of a successful compile.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    /// Expected location of the compiled document.
    pub pdf_path: PathBuf,
    /// Number of compiler runs performed.
    pub passes: usize,
    /// Standard output of the last run.
    pub log: String,
}

/// Writes `source` to `<dir>/<base_name>.tex`, creating `dir` if needed.
pub fn write_source(dir: &Path, base_name: &str, source: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.tex", base_name));
    fs::write(&path, source)?;
    tracing::info!(path = %path.display(), bytes = source.len(), "wrote LaTeX source");
    Ok(path)
}

/// Keeps the last lines of compiler output for error reporting.
fn output_tail(stdout: &[u8], stderr: &[u8]) -> String {
    let combined = format!("{}{}", String::from_utf8_lossy(stdout), String::from_utf8_lossy(stderr));
    let lines: Vec<&str> = combined.lines().filter(|line| !line.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(ERROR_TAIL_LINES);
    lines[start..].join("\n")
}

/// Runs the compiler on a `.tex` file.
///
/// The compiler runs in the file's directory so auxiliary files and the
/// PDF land next to the source.
pub fn compile_source(tex_path: &Path, config: &CompileConfig) -> Result<CompileOutput> {
    if !tex_path.exists() {
        return Err(TexEntryError::FileNotFound(tex_path.to_path_buf()));
    }

    let working_dir = match tex_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = tex_path.file_name().unwrap_or(tex_path.as_os_str());

    let passes = config.passes.max(1);
    let mut log = String::new();

    for pass in 1..=passes {
        tracing::info!(program = %config.program, pass = pass, passes = passes, "running document compiler");

        let output = Command::new(&config.program)
            .args(&config.args)
            .arg(file_name)
            .current_dir(&working_dir)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => TexEntryError::CompilerNotFound(config.program.clone()),
                _ => TexEntryError::CompilerLaunch { program: config.program.clone(), source: e },
            })?;

        if !output.status.success() {
            return Err(TexEntryError::CompileFailed {
                program: config.program.clone(),
                code: output.status.code(),
                output: output_tail(&output.stdout, &output.stderr),
            });
        }

        log = String::from_utf8_lossy(&output.stdout).into_owned();
    }

    Ok(CompileOutput { pdf_path: tex_path.with_extension("pdf"), passes, log })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_config_default() {
        let config = CompileConfig::default();
        assert_eq!(config.program, "pdflatex");
        assert_eq!(config.passes, 1);
        assert!(config.args.contains(&"-interaction=nonstopmode".to_string()));
    }

    #[test]
    fn test_write_source_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("nested").join("out");

        let path = write_source(&out_dir, "bergson", "\\documentclass{article}").unwrap();
        assert_eq!(path, out_dir.join("bergson.tex"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "\\documentclass{article}");
    }

    #[test]
    fn test_compile_missing_source() {
        let result = compile_source(Path::new("/nonexistent/entry.tex"), &CompileConfig::default());
        assert!(matches!(result, Err(TexEntryError::FileNotFound(_))));
    }

    #[test]
    fn test_compile_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(dir.path(), "entry", "x").unwrap();
        let config = CompileConfig { program: "texentry-no-such-compiler".to_string(), ..Default::default() };

        let result = compile_source(&path, &config);
        assert!(matches!(result, Err(TexEntryError::CompilerNotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_compile_non_zero_exit_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(dir.path(), "entry", "x").unwrap();
        let config = CompileConfig { program: "false".to_string(), args: Vec::new(), passes: 1 };

        let result = compile_source(&path, &config);
        assert!(matches!(result, Err(TexEntryError::CompileFailed { code: Some(1), .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_compile_success_runs_every_pass() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(dir.path(), "entry", "x").unwrap();
        let config = CompileConfig { program: "true".to_string(), args: Vec::new(), passes: 2 };

        let output = compile_source(&path, &config).unwrap();
        assert_eq!(output.passes, 2);
        assert_eq!(output.pdf_path, dir.path().join("entry.pdf"));
    }

    #[cfg(unix)]
    #[test]
    fn test_compile_program_without_execute_permission() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = write_source(dir.path(), "entry", "x").unwrap();
        let program = dir.path().join("not-executable");
        fs::write(&program, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&program, fs::Permissions::from_mode(0o644)).unwrap();

        let config = CompileConfig { program: program.display().to_string(), args: Vec::new(), passes: 1 };
        let err = compile_source(&path, &config).unwrap_err();

        assert!(matches!(err, TexEntryError::CompilerLaunch { .. }));
        assert!(err.to_string().starts_with("Failed to start document compiler"));
    }

    #[test]
    fn test_output_tail_keeps_last_lines() {
        let stdout: String = (1..=30).map(|i| format!("line {}\n", i)).collect();
        let tail = output_tail(stdout.as_bytes(), b"! Emergency stop.\n");

        assert!(tail.starts_with("line 12"));
        assert!(tail.ends_with("! Emergency stop."));
        assert_eq!(tail.lines().count(), ERROR_TAIL_LINES);
    }
}
