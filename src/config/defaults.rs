/// Page margin in points used by the print strategies (one half inch)
pub const DEFAULT_PAGE_MARGIN: f32 = 36.0;

/// A4 paper size in points (~8.3 x 11.7 in)
pub const A4_SIZE: (f32, f32) = (595.0, 842.0);

/// US Letter paper size in points (8.5 x 11 in)
pub const LETTER_SIZE: (f32, f32) = (8.5 * 72.0, 11.0 * 72.0);

/// Region codes that print on Letter paper; everything else gets A4
pub const LETTER_REGIONS: [&str; 10] = ["US", "CA", "MX", "CL", "CO", "CR", "PA", "PE", "PH", "PR"];

/// Bytes of jitter tolerated between two blank captures.
/// Empirical; treat as tunable.
pub const DEFAULT_EMPTY_PAGE_SLACK: i64 = 16;

/// How many leading bytes of a capture the fingerprint sniffer inspects
pub const SNIFF_WINDOW: usize = 500;

/// Upper bound on a single height probe evaluation, in milliseconds
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 5_000;

/// Largest page count a single request may plan. A measured height beyond
/// this is treated as a measurement failure.
pub const MAX_PAGE_COUNT: usize = 10_000;

/// File name used when no output path is given
pub const DEFAULT_OUTPUT_NAME: &str = "untitled.pdf";

/// Default body font size in points
pub const DEFAULT_BODY_FONT_SIZE: f32 = 11.0;

/// Producer string written to document metadata
pub const PRODUCER: &str = concat!("paginated-pdf ", env!("CARGO_PKG_VERSION"));
