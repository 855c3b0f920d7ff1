//! Stream-length fingerprinting for minimal single-page PDFs.
//!
//! This is a byte-level heuristic, not a PDF parser. It looks at the first
//! `<<`..`>>` dictionary inside the leading [`SNIFF_WINDOW`] bytes and reads
//! the plain digits following `/Length `. Anything else, including an
//! indirect `/Length 7 0 R`, is reported as not found.

use nom::{
    bytes::complete::{tag, take_until},
    character::complete::digit1,
    IResult,
};

use crate::config::defaults::SNIFF_WINDOW;
use crate::model::StreamFingerprint;

const LENGTH_TOKEN: &[u8] = b"/Length ";

/// Skip to the first `<<` and return the bytes up to the matching `>>`
fn first_dictionary(input: &[u8]) -> IResult<&[u8], &[u8]> {
    let (input, _) = take_until(&b"<<"[..])(input)?;
    let (input, _) = tag(&b"<<"[..])(input)?;
    let (input, body) = take_until(&b">>"[..])(input)?;
    let (input, _) = tag(&b">>"[..])(input)?;
    Ok((input, body))
}

/// `/Length ` followed by one or more ASCII digits
fn length_entry(input: &[u8]) -> IResult<&[u8], &[u8]> {
    let (input, _) = take_until(LENGTH_TOKEN)(input)?;
    let (input, _) = tag(LENGTH_TOKEN)(input)?;
    digit1(input)
}

/// Extract the stream length from the first object dictionary of `pdf`.
pub fn extract_length(pdf: &[u8]) -> StreamFingerprint {
    let window = &pdf[..pdf.len().min(SNIFF_WINDOW)];

    let Ok((_, dictionary)) = first_dictionary(window) else {
        return StreamFingerprint::NOT_FOUND;
    };
    if !dictionary.is_ascii() {
        return StreamFingerprint::NOT_FOUND;
    }

    let Ok((rest, digits)) = length_entry(dictionary) else {
        return StreamFingerprint::NOT_FOUND;
    };
    if is_indirect_reference(rest) {
        return StreamFingerprint::NOT_FOUND;
    }

    // digit1 guarantees ASCII digits; only overflow can fail here
    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .map(StreamFingerprint::new)
        .unwrap_or(StreamFingerprint::NOT_FOUND)
}

/// `/Length 7 0 R`: after the object number comes ` <generation> R`
fn is_indirect_reference(rest: &[u8]) -> bool {
    let trimmed = trim_start(rest);
    if trimmed.len() == rest.len() {
        return false;
    }
    match digit1::<&[u8], nom::error::Error<&[u8]>>(trimmed) {
        Ok((after_generation, _)) => trim_start(after_generation).first() == Some(&b'R'),
        Err(_) => false,
    }
}

fn trim_start(input: &[u8]) -> &[u8] {
    let start = input
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(input.len());
    &input[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_plain_length() {
        let pdf = b"%PDF-1.4\n1 0 obj\n<< /Filter /FlateDecode /Length 84 >> stream\nxyz";
        assert_eq!(extract_length(pdf), StreamFingerprint::new(84));
    }

    #[test]
    fn test_compact_lopdf_style_dictionary() {
        let pdf = b"%PDF-1.5\n1 0 obj\n<</Length 131/Filter/FlateDecode>>stream\n";
        assert_eq!(extract_length(pdf).value(), 131);
    }

    #[test]
    fn test_no_open_delimiter() {
        let pdf = b"%PDF-1.4\n1 0 obj /Length 84 stream";
        assert_eq!(extract_length(pdf), StreamFingerprint::NOT_FOUND);
    }

    #[test]
    fn test_no_close_delimiter_within_window() {
        let mut pdf = b"%PDF-1.4\n1 0 obj\n<< /Filter /FlateDecode /Length 84 ".to_vec();
        pdf.extend(std::iter::repeat(b' ').take(SNIFF_WINDOW));
        pdf.extend_from_slice(b">> stream");
        assert_eq!(extract_length(&pdf), StreamFingerprint::NOT_FOUND);
    }

    #[test]
    fn test_dictionary_past_window_is_ignored() {
        let mut pdf = vec![b'%'; SNIFF_WINDOW];
        pdf.extend_from_slice(b"<< /Length 84 >>");
        assert_eq!(extract_length(&pdf), StreamFingerprint::NOT_FOUND);
    }

    #[test]
    fn test_indirect_reference_is_not_found() {
        let pdf = b"%PDF-1.4\n1 0 obj\n<< /Length 7 0 R /Filter /FlateDecode >> stream";
        assert_eq!(extract_length(pdf), StreamFingerprint::NOT_FOUND);
    }

    #[test]
    fn test_non_digit_after_token() {
        let pdf = b"<< /Length R >>";
        assert_eq!(extract_length(pdf), StreamFingerprint::NOT_FOUND);
    }

    #[test]
    fn test_missing_length_token() {
        let pdf = b"<< /Type /Catalog /Pages 2 0 R >>";
        assert_eq!(extract_length(pdf), StreamFingerprint::NOT_FOUND);
    }

    #[test]
    fn test_only_first_dictionary_counts() {
        let pdf = b"<< /Type /Catalog >> << /Length 84 >>";
        assert_eq!(extract_length(pdf), StreamFingerprint::NOT_FOUND);
    }

    #[test]
    fn test_non_ascii_dictionary() {
        let pdf = b"<< /Title (\xC3\xA9) /Length 84 >>";
        assert_eq!(extract_length(pdf), StreamFingerprint::NOT_FOUND);
    }

    #[test]
    fn test_binary_header_before_dictionary() {
        let pdf = b"%PDF-1.5\n%\xB5\xED\xAE\xFB\n1 0 obj\n<</Length 42>>stream";
        assert_eq!(extract_length(pdf).value(), 42);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_length(b""), StreamFingerprint::NOT_FOUND);
    }
}
