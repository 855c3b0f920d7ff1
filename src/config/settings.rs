use std::path::PathBuf;
use std::time::Duration;

use crate::assembler::{default_output_path, unique_temp_path};
use crate::cli::Args;
use crate::config::appearance::{parse_hex_color, Appearance, ColorScheme};
use crate::error::ConfigError;
use crate::model::{DocumentMetadata, PageSpec, PaperSize, Region};
use crate::render::RenderStrategy;

use super::defaults::*;

/// Runtime settings for one pagination request
#[derive(Debug, Clone)]
pub struct Settings {
    pub strategy: RenderStrategy,

    /// Fixed paper size; `None` resolves it from `region`
    pub paper: Option<PaperSize>,
    pub region: Option<Region>,
    pub margin: f32,

    /// Bytes of jitter tolerated between a page and the blank probe
    pub empty_page_slack: i64,
    pub probe_timeout: Duration,

    pub appearance: Appearance,
    pub metadata: DocumentMetadata,

    /// Destination; `None` means the fixed default in the temp directory
    pub output: Option<PathBuf>,
    /// Write to a fresh temp file instead of `output`
    pub unique_output: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strategy: RenderStrategy::default(),
            paper: None,
            region: Region::current(),
            margin: DEFAULT_PAGE_MARGIN,
            empty_page_slack: DEFAULT_EMPTY_PAGE_SLACK,
            probe_timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
            appearance: Appearance::default(),
            metadata: DocumentMetadata::default(),
            output: None,
            unique_output: false,
        }
    }
}

impl Settings {
    /// Create settings from CLI arguments
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let region = match args.region.as_deref() {
            Some(code) => Some(
                Region::from_locale(code).ok_or_else(|| ConfigError::InvalidRegion(code.to_string()))?,
            ),
            None => Region::current(),
        };

        let mut appearance = Appearance::default();
        if args.dark {
            appearance.scheme = ColorScheme::Dark;
        }
        if let Some(ref accent) = args.accent {
            appearance.accent = parse_hex_color(accent)?;
        }

        let metadata = DocumentMetadata {
            title: args.document_title(),
            author: args.author.clone(),
            subject: args.subject.clone(),
            keywords: args.keyword_list(),
            ..Default::default()
        };

        let settings = Self {
            strategy: args.strategy,
            paper: args.paper.paper_size(),
            region,
            margin: args.margin,
            empty_page_slack: args.slack,
            probe_timeout: Duration::from_millis(args.probe_timeout_ms),
            appearance,
            metadata,
            output: (!args.unique).then(|| args.output_path()),
            unique_output: args.unique,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn with_strategy(mut self, strategy: RenderStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_paper(mut self, paper: PaperSize) -> Self {
        self.paper = Some(paper);
        self
    }

    pub fn with_region(mut self, region: Option<Region>) -> Self {
        self.region = region;
        self
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_slack(mut self, slack: i64) -> Self {
        self.empty_page_slack = slack;
        self
    }

    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = appearance;
        self
    }

    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self.unique_output = false;
        self
    }

    /// Explicit paper size, else Letter or A4 by region
    pub fn paper_size(&self) -> PaperSize {
        self.paper
            .unwrap_or_else(|| PaperSize::for_region(self.region.as_ref()))
    }

    pub fn page_spec(&self) -> Result<PageSpec, ConfigError> {
        PageSpec::new(self.paper_size(), self.margin)
    }

    /// Margin must fit the paper and slack must be non-negative
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.page_spec()?;
        if self.empty_page_slack < 0 {
            return Err(ConfigError::InvalidSlack(self.empty_page_slack));
        }
        Ok(())
    }

    /// Where the document will be written
    pub fn output_path(&self) -> PathBuf {
        if self.unique_output {
            unique_temp_path()
        } else {
            self.output.clone().unwrap_or_else(default_output_path)
        }
    }
}
