//! Document-level metadata written to the PDF `/Info` dictionary.

use time::OffsetDateTime;

use crate::config::defaults::PRODUCER;

/// Metadata attached to an assembled document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Vec<String>,
    pub creator: Option<String>,
    pub producer: String,
    pub created: OffsetDateTime,
    pub modified: OffsetDateTime,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            title: None,
            author: None,
            subject: None,
            keywords: Vec::new(),
            creator: None,
            producer: PRODUCER.to_string(),
            created: now,
            modified: now,
        }
    }
}

impl DocumentMetadata {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Pin both timestamps, e.g. for reproducible output
    pub fn with_timestamp(mut self, at: OffsetDateTime) -> Self {
        self.created = at;
        self.modified = at;
        self
    }

    /// Keywords joined the way PDF readers display them
    pub fn keywords_string(&self) -> Option<String> {
        if self.keywords.is_empty() {
            None
        } else {
            Some(self.keywords.join(", "))
        }
    }
}

/// Format a timestamp as a PDF date string, `D:YYYYMMDDHHmmSS+HH'mm'`
pub fn pdf_date(at: OffsetDateTime) -> String {
    let offset = at.offset();
    let (hours, minutes, _) = offset.as_hms();
    let tz = if offset.is_utc() {
        "Z".to_string()
    } else {
        let sign = if offset.is_negative() { '-' } else { '+' };
        format!("{}{:02}'{:02}'", sign, hours.unsigned_abs(), minutes.unsigned_abs())
    };
    format!(
        "D:{:04}{:02}{:02}{:02}{:02}{:02}{}",
        at.year(),
        u8::from(at.month()),
        at.day(),
        at.hour(),
        at.minute(),
        at.second(),
        tz
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, Month, PrimitiveDateTime, Time, UtcOffset};

    fn fixed(offset: UtcOffset) -> OffsetDateTime {
        let date = Date::from_calendar_date(2025, Month::September, 19).unwrap();
        let time = Time::from_hms(8, 5, 3).unwrap();
        PrimitiveDateTime::new(date, time).assume_offset(offset)
    }

    #[test]
    fn test_pdf_date_utc() {
        assert_eq!(pdf_date(fixed(UtcOffset::UTC)), "D:20250919080503Z");
    }

    #[test]
    fn test_pdf_date_offsets() {
        let east = UtcOffset::from_hms(5, 30, 0).unwrap();
        assert_eq!(pdf_date(fixed(east)), "D:20250919080503+05'30'");

        let west = UtcOffset::from_hms(-7, 0, 0).unwrap();
        assert_eq!(pdf_date(fixed(west)), "D:20250919080503-07'00'");
    }

    #[test]
    fn test_keywords_string() {
        let mut meta = DocumentMetadata::default();
        assert_eq!(meta.keywords_string(), None);
        meta.keywords = vec!["notes".into(), "markdown".into()];
        assert_eq!(meta.keywords_string().as_deref(), Some("notes, markdown"));
    }
}
