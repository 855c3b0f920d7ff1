pub mod markdown;
pub mod sniffer;

pub use markdown::parse_markdown;
pub use sniffer::extract_length;
