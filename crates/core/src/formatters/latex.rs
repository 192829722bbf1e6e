use crate::article::DocumentData;
use crate::inline::escape_latex;

/// Packages loaded by every generated document.
const BASE_PACKAGES: [&str; 6] = [
    r"\usepackage[T1]{fontenc}",
    r"\usepackage[utf8]{inputenc}",
    r"\usepackage{lmodern}",
    r"\usepackage{textcomp}",
    r"\usepackage{lastpage}",
    r"\usepackage{hyperref}",
];

/// Configuration for LaTeX output
#[derive(Debug, Clone)]
pub struct LatexConfig {
    /// Document class passed to `\documentclass`
    pub document_class: String,
    /// Additional `\usepackage` names loaded after the base packages
    pub extra_packages: Vec<String>,
    /// Emit `\tableofcontents` and the page breaks around the overview
    pub include_toc: bool,
    /// Heading of the unnumbered overview section
    pub overview_heading: String,
}

impl Default for LatexConfig {
    fn default() -> Self {
        Self {
            document_class: "article".to_string(),
            extra_packages: Vec::new(),
            include_toc: true,
            overview_heading: "Overview".to_string(),
        }
    }
}

/// Whether a TOC entry id names the bibliography.
pub fn is_bibliography(id: &str) -> bool {
    id.eq_ignore_ascii_case("bib")
}

/// Render document data as a complete LaTeX source file
pub fn convert_to_latex(data: &DocumentData, config: &LatexConfig) -> String {
    let mut output = String::new();

    output.push_str(&generate_preamble(data, config));
    output.push_str("\\begin{document}%\n");
    output.push_str("\\normalsize%\n");
    output.push_str("\\maketitle%\n");

    output.push_str("\\noindent %\n");
    output.push_str(&escape_latex(&data.publication));
    output.push_str("\n\n");

    if config.include_toc {
        output.push_str("\\tableofcontents%\n");
        output.push_str("\\newpage%\n");
    }

    output.push_str(&format!("\\section*{{{}}}%\n", escape_latex(&config.overview_heading)));
    output.push_str(&data.overview);
    output.push_str("%\n");
    if config.include_toc {
        output.push_str("\\newpage%\n");
    }

    output.push_str(&generate_sections(data));
    output.push_str("\\end{document}\n");

    output
}

/// Generate everything before `\begin{document}`
fn generate_preamble(data: &DocumentData, config: &LatexConfig) -> String {
    let mut preamble = format!("\\documentclass{{{}}}%\n", config.document_class);

    for package in BASE_PACKAGES {
        preamble.push_str(package);
        preamble.push_str("%\n");
    }
    for package in &config.extra_packages {
        preamble.push_str(&format!("\\usepackage{{{}}}%\n", package));
    }

    preamble.push_str("%\n");
    preamble.push_str(&format!("\\title{{{}}}%\n", escape_latex(&data.title)));
    preamble.push_str("\\date{}%\n");
    preamble.push_str("%\n");

    preamble
}

/// Generate one `\section` per level-1 entry and one `\subsection` per level-2 entry
///
/// Stops for good at the first level-1 entry whose id is the bibliography;
/// that entry and everything after it are left out.
fn generate_sections(data: &DocumentData) -> String {
    let mut sections = String::new();

    for entry in &data.toc {
        match entry.level {
            1 => {
                if is_bibliography(&entry.id) {
                    tracing::debug!(id = %entry.id, "truncating at bibliography");
                    break;
                }
                sections.push_str(&format!("\\section{{{}}}%\n", escape_latex(&entry.title)));
                if let Some(body) = data.section_contents.get(&entry.id).filter(|body| !body.is_empty()) {
                    sections.push_str(body);
                    sections.push_str("\n\n");
                }
            }
            2 => sections.push_str(&format!("\\subsection{{{}}}%\n", escape_latex(&entry.title))),
            _ => {}
        }
    }

    sections
}

/// LaTeX formatter with configurable options
pub struct LatexFormatter {
    config: LatexConfig,
}

impl LatexFormatter {
    pub fn new(config: LatexConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, data: &DocumentData) -> String {
        convert_to_latex(data, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toc::TocEntry;

    fn sample() -> DocumentData {
        DocumentData {
            title: "Henri Bergson".to_string(),
            publication: "First published 2004; revised 2021 & 2022".to_string(),
            toc: vec![
                TocEntry::new("Life", "Life and Work", 1),
                TocEntry::new("Early", "Early Years", 2),
                TocEntry::new("Method", "Method of Intuition", 1),
                TocEntry::new("Bib", "Bibliography", 1),
                TocEntry::new("Primary", "Primary Literature", 2),
                TocEntry::new("X", "After Bibliography", 1),
            ],
            overview: r"Bergson's \emph{durée}.".to_string(),
            section_contents: [
                ("Life".to_string(), "Born in Paris.\n\nStudied philosophy.".to_string()),
                ("Bib".to_string(), "Bibliography body.".to_string()),
                ("X".to_string(), "Should never appear.".to_string()),
            ]
            .into_iter()
            .collect(),
        }
    }

    #[test]
    fn test_document_skeleton() {
        let latex = convert_to_latex(&sample(), &LatexConfig::default());

        assert!(latex.starts_with("\\documentclass{article}%\n"));
        assert!(latex.contains("\\usepackage{hyperref}%\n"));
        assert!(latex.contains("\\title{Henri Bergson}%\n\\date{}%\n"));
        assert!(latex.contains("\\maketitle%\n\\noindent %\nFirst published 2004; revised 2021 \\& 2022\n\n"));
        assert!(latex.contains("\\tableofcontents%\n\\newpage%\n\\section*{Overview}%\nBergson's \\emph{durée}.%\n\\newpage%\n"));
        assert!(latex.ends_with("\\end{document}\n"));
    }

    #[test]
    fn test_sections_in_toc_order_with_bodies() {
        let latex = convert_to_latex(&sample(), &LatexConfig::default());

        let expected = "\\section{Life and Work}%\nBorn in Paris.\n\nStudied philosophy.\n\n\
                        \\subsection{Early Years}%\n\
                        \\section{Method of Intuition}%\n\
                        \\end{document}\n";
        assert!(latex.ends_with(expected), "unexpected tail:\n{}", latex);
    }

    #[test]
    fn test_truncates_at_bibliography() {
        let latex = convert_to_latex(&sample(), &LatexConfig::default());

        assert!(!latex.contains("Bibliography"));
        assert!(!latex.contains("Primary Literature"));
        assert!(!latex.contains("After Bibliography"));
        assert!(!latex.contains("Should never appear"));
    }

    #[test]
    fn test_bibliography_match_is_case_insensitive() {
        assert!(is_bibliography("bib"));
        assert!(is_bibliography("BIB"));
        assert!(is_bibliography("Bib"));
        assert!(!is_bibliography("bibliography"));
    }

    #[test]
    fn test_level_two_bib_does_not_truncate() {
        let data = DocumentData {
            toc: vec![
                TocEntry::new("Works", "Works", 1),
                TocEntry::new("bib", "Selected bibliography", 2),
                TocEntry::new("Legacy", "Legacy", 1),
            ],
            ..Default::default()
        };
        let latex = convert_to_latex(&data, &LatexConfig::default());

        assert!(latex.contains("\\subsection{Selected bibliography}%\n"));
        assert!(latex.contains("\\section{Legacy}%\n"));
    }

    #[test]
    fn test_deeper_levels_are_not_rendered() {
        let data = DocumentData {
            toc: vec![TocEntry::new("A", "A", 1), TocEntry::new("A1a", "Deep", 3)],
            ..Default::default()
        };
        let latex = convert_to_latex(&data, &LatexConfig::default());
        assert!(!latex.contains("Deep"));
    }

    #[test]
    fn test_titles_are_escaped() {
        let data = DocumentData {
            title: "Bergson & Time".to_string(),
            toc: vec![TocEntry::new("Pct", "100% Duration", 1), TocEntry::new("Sub", "a_b", 2)],
            ..Default::default()
        };
        let latex = convert_to_latex(&data, &LatexConfig::default());

        assert!(latex.contains("\\title{Bergson \\& Time}%\n"));
        assert!(latex.contains("\\section{100\\% Duration}%\n"));
        assert!(latex.contains("\\subsection{a\\_b}%\n"));
    }

    #[test]
    fn test_config_without_toc_and_extra_packages() {
        let config = LatexConfig {
            document_class: "report".to_string(),
            extra_packages: vec!["microtype".to_string()],
            include_toc: false,
            overview_heading: "Summary".to_string(),
        };
        let latex = convert_to_latex(&sample(), &config);

        assert!(latex.starts_with("\\documentclass{report}%\n"));
        assert!(latex.contains("\\usepackage{microtype}%\n"));
        assert!(!latex.contains("\\tableofcontents"));
        assert!(!latex.contains("\\newpage"));
        assert!(latex.contains("\\section*{Summary}%\n"));
    }

    #[test]
    fn test_latex_formatter() {
        let data = sample();
        let config = LatexConfig::default();
        let formatter = LatexFormatter::new(config.clone());

        assert_eq!(formatter.convert(&data), convert_to_latex(&data, &config));
    }
}
