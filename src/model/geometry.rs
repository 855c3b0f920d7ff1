//! Page geometry: paper sizes, the region codes that select them, and the
//! rectangles derived from a paper size and a margin.

use std::fmt;

use crate::config::defaults::{A4_SIZE, LETTER_REGIONS, LETTER_SIZE};
use crate::error::ConfigError;

/// A width/height pair in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A point in points, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle, origin top-left, y growing downwards
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// Shrink by `inset` on every side
    pub fn inset(&self, inset: f32) -> Rect {
        Rect::new(
            self.origin.x + inset,
            self.origin.y + inset,
            self.size.width - 2.0 * inset,
            self.size.height - 2.0 * inset,
        )
    }
}

/// Two-letter region code, upper-cased (e.g. `US`, `DE`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region(String);

impl Region {
    /// Build a region from a bare code. Returns `None` unless the code is two
    /// ASCII letters.
    pub fn new(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Some(Region(code.to_ascii_uppercase()))
        } else {
            None
        }
    }

    /// Extract the region from a POSIX or BCP-47 style locale such as
    /// `en_US.UTF-8`, `fr-CA` or `de_DE@euro`. A bare two-letter code in
    /// either case (`us`, `DE`) is taken as the region itself.
    pub fn from_locale(locale: &str) -> Option<Self> {
        let base = locale
            .split(['.', '@'])
            .next()
            .unwrap_or_default()
            .trim();

        if let Some(region) = Region::new(base) {
            return Some(region);
        }

        base.split(['_', '-'])
            .skip(1)
            .find_map(Region::new)
    }

    /// Region of the current process locale (`LC_ALL`, then `LC_PAPER`, then `LANG`)
    pub fn current() -> Option<Self> {
        ["LC_ALL", "LC_PAPER", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .filter(|value| !value.is_empty())
            .find_map(|value| Region::from_locale(&value))
    }

    pub fn code(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two supported paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperSize {
    A4,
    Letter,
}

impl PaperSize {
    /// Letter for the fixed allow-list of regions, A4 for everything else
    /// including an unknown region.
    pub fn for_region(region: Option<&Region>) -> Self {
        match region {
            Some(r) if LETTER_REGIONS.contains(&r.code()) => PaperSize::Letter,
            _ => PaperSize::A4,
        }
    }

    pub fn size(&self) -> Size {
        let (width, height) = match self {
            PaperSize::A4 => A4_SIZE,
            PaperSize::Letter => LETTER_SIZE,
        };
        Size::new(width, height)
    }

    /// Full paper rectangle anchored at the origin
    pub fn page_rect(&self) -> Rect {
        let size = self.size();
        Rect::new(0.0, 0.0, size.width, size.height)
    }
}

/// Paper size plus a uniform margin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSpec {
    pub paper: PaperSize,
    pub margin: f32,
}

impl PageSpec {
    /// Validates `0 <= margin < min(width, height) / 2`.
    pub fn new(paper: PaperSize, margin: f32) -> Result<Self, ConfigError> {
        let size = paper.size();
        let limit = size.width.min(size.height);
        if !margin.is_finite() || margin < 0.0 || margin >= limit / 2.0 {
            return Err(ConfigError::InvalidMargin { margin, limit });
        }
        Ok(Self { paper, margin })
    }

    pub fn for_region(region: Option<&Region>, margin: f32) -> Result<Self, ConfigError> {
        Self::new(PaperSize::for_region(region), margin)
    }

    pub fn size(&self) -> Size {
        self.paper.size()
    }

    pub fn page_rect(&self) -> Rect {
        self.paper.page_rect()
    }

    /// The paper rectangle inset by the margin on every side
    pub fn content_rect(&self) -> Rect {
        self.page_rect().inset(self.margin)
    }
}

/// `max(1, ceil(content_height / page_height))`.
///
/// Non-finite or non-positive inputs collapse to a single page.
pub fn compute_page_count(content_height: f32, page_height: f32) -> usize {
    if !(content_height.is_finite() && page_height.is_finite()) || page_height <= 0.0 {
        return 1;
    }
    if content_height <= page_height {
        return 1;
    }
    (content_height / page_height).ceil() as usize
}
