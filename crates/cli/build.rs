use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("texentry")
        .version("1.0.0")
        .author("texentry Contributors")
        .about("Typeset encyclopedia entries as LaTeX and PDF")
        .arg(
            clap::arg!([INPUT] "URL to fetch, local HTML file, or '-' for stdin")
                .default_value("https://plato.stanford.edu/entries/bergson/"),
        )
        .arg(
            clap::arg!(-o --output_dir <DIR> "Directory for the generated .tex and .pdf files")
                .value_name("DIR")
                .default_value(".")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(-n --name <NAME> "Output file name without extension"))
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (latex, json)")
                .value_name("FORMAT")
                .default_value("latex")
                .value_parser(["latex", "tex", "json"]),
        )
        .arg(clap::arg!(--with_latex "Include the rendered LaTeX source in JSON output"))
        .arg(clap::arg!(--no_compile "Write the .tex file without running the compiler"))
        .arg(clap::arg!(--no_toc "Leave out the table of contents"))
        .arg(clap::arg!(--compiler <PROGRAM> "Compiler program").default_value("pdflatex"))
        .arg(clap::arg!(--compiler_arg <ARG> "Compiler argument, repeatable").action(clap::ArgAction::Append))
        .arg(clap::arg!(--passes <NUM> "Number of compiler runs").default_value("1"))
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(clap::arg!(--user_agent <UA> "Custom User-Agent for HTTP requests").value_name("UA"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"))
        .arg(
            clap::arg!(--completions <SHELL> "Generate shell completion script and exit")
                .value_name("SHELL")
                .value_parser(["bash", "elvish", "fish", "powershell", "zsh"]),
        );

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "texentry", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "texentry", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "texentry", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "texentry", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
