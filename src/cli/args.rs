use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::model::PaperSize;
use crate::render::RenderStrategy;

#[derive(Parser, Debug)]
#[command(name = "paginated-pdf")]
#[command(
    author,
    version,
    about = "Render a markdown document and paginate it into a multi-page PDF"
)]
pub struct Args {
    /// Input markdown file path
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output PDF file path (defaults to input with .pdf extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Rendering strategy
    #[arg(short = 's', long, value_enum, default_value = "sliced")]
    pub strategy: RenderStrategy,

    /// Paper size; `auto` picks Letter or A4 from the region
    #[arg(long, value_enum, default_value = "auto")]
    pub paper: PaperChoice,

    /// Region code or locale used by `--paper auto` (e.g. "US", "de_DE.UTF-8")
    #[arg(long)]
    pub region: Option<String>,

    /// Page margin in points
    #[arg(long, default_value_t = crate::config::defaults::DEFAULT_PAGE_MARGIN)]
    pub margin: f32,

    /// Bytes of stream-length jitter tolerated when detecting blank pages
    #[arg(long, default_value_t = crate::config::defaults::DEFAULT_EMPTY_PAGE_SLACK)]
    pub slack: i64,

    /// Timeout for the content height probe, in milliseconds
    #[arg(long, default_value_t = crate::config::defaults::DEFAULT_PROBE_TIMEOUT_MS)]
    pub probe_timeout_ms: u64,

    /// Document title (defaults to the input file name)
    #[arg(long)]
    pub title: Option<String>,

    /// Document author
    #[arg(long)]
    pub author: Option<String>,

    /// Document subject
    #[arg(long)]
    pub subject: Option<String>,

    /// Comma-separated document keywords
    #[arg(long)]
    pub keywords: Option<String>,

    /// Use the dark color scheme
    #[arg(long)]
    pub dark: bool,

    /// Link color as #rrggbb
    #[arg(long)]
    pub accent: Option<String>,

    /// Write to a fresh file in the temp directory instead of next to the input
    #[arg(long, conflicts_with = "output")]
    pub unique: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum PaperChoice {
    /// Letter in North and Central America and the Philippines, A4 elsewhere
    #[default]
    Auto,
    A4,
    Letter,
}

impl PaperChoice {
    /// The fixed paper size, or `None` when it should follow the region
    pub fn paper_size(&self) -> Option<PaperSize> {
        match self {
            PaperChoice::Auto => None,
            PaperChoice::A4 => Some(PaperSize::A4),
            PaperChoice::Letter => Some(PaperSize::Letter),
        }
    }
}

impl Args {
    /// Get the output path, defaulting to input with .pdf extension
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("pdf"))
    }

    /// Keywords split on commas, blanks dropped
    pub fn keyword_list(&self) -> Vec<String> {
        self.keywords
            .as_deref()
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Title given on the command line, else the input file stem
    pub fn document_title(&self) -> Option<String> {
        self.title.clone().or_else(|| {
            self.input
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["paginated-pdf", "notes/report.md"]);
        assert_eq!(args.strategy, RenderStrategy::Sliced);
        assert_eq!(args.paper, PaperChoice::Auto);
        assert_eq!(args.margin, 36.0);
        assert_eq!(args.slack, 16);
        assert_eq!(args.probe_timeout_ms, 5000);
        assert_eq!(args.output_path(), PathBuf::from("notes/report.pdf"));
        assert_eq!(args.document_title().as_deref(), Some("report"));
    }

    #[test]
    fn test_strategy_and_paper_values() {
        let args = parse(&[
            "paginated-pdf",
            "in.md",
            "-s",
            "print-formatter",
            "--paper",
            "letter",
            "-o",
            "out.pdf",
        ]);
        assert_eq!(args.strategy, RenderStrategy::PrintFormatter);
        assert_eq!(args.paper.paper_size(), Some(PaperSize::Letter));
        assert_eq!(args.output_path(), PathBuf::from("out.pdf"));

        let args = parse(&["paginated-pdf", "in.md", "--strategy", "single-shot"]);
        assert_eq!(args.strategy, RenderStrategy::SingleShot);
        assert_eq!(args.paper.paper_size(), None);
    }

    #[test]
    fn test_keyword_list() {
        let args = parse(&["paginated-pdf", "in.md", "--keywords", "pdf, paging,,  layout "]);
        assert_eq!(args.keyword_list(), vec!["pdf", "paging", "layout"]);
        assert!(parse(&["paginated-pdf", "in.md"]).keyword_list().is_empty());
    }

    #[test]
    fn test_unique_conflicts_with_output() {
        assert!(Args::try_parse_from(["paginated-pdf", "in.md", "--unique", "-o", "x.pdf"]).is_err());
        assert!(parse(&["paginated-pdf", "in.md", "--unique"]).unique);
    }

    #[test]
    fn test_verbosity_count() {
        assert_eq!(parse(&["paginated-pdf", "in.md", "-vv"]).verbose, 2);
    }
}
