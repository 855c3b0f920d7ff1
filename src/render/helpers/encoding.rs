//! Text encoding for the builtin PDF fonts.
//!
//! The Standard 14 fonts are written with `/WinAnsiEncoding`, so every glyph
//! is one byte. Characters outside that code page degrade to `?`.

/// Windows-1252 bytes for `text`
pub fn win_ansi_bytes(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\u{20AC}' => 0x80, // euro
        '\u{201A}' => 0x82,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85, // ellipsis
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95, // bullet
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{2122}' => 0x99,
        '\u{00A0}' => 0x20,
        c if (c as u32) < 0x80 => c as u8,
        c if (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
        _ => b'?',
    }
}

/// ASCII rendition of `text`, for writers that only pass 7-bit strings
/// through unchanged
pub fn ascii_fallback(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' => '\'',
            '\u{201C}' | '\u{201D}' | '\u{201E}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2022}' => '*',
            '\u{00A0}' => ' ',
            c if c.is_ascii() => c,
            _ => '?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_ansi_bytes() {
        assert_eq!(win_ansi_bytes("abc"), b"abc".to_vec());
        assert_eq!(win_ansi_bytes("\u{2022} caf\u{e9}"), vec![0x95, b' ', b'c', b'a', b'f', 0xE9]);
        assert_eq!(win_ansi_bytes("\u{4e2d}"), vec![b'?']);
    }

    #[test]
    fn test_ascii_fallback() {
        assert_eq!(ascii_fallback("\u{2022} \u{201C}quoted\u{201D}"), "* \"quoted\"");
        assert_eq!(ascii_fallback("caf\u{e9}"), "caf?");
    }
}
