//! Shared XML helpers: namespaces, escaping and a well-formedness check

use std::borrow::Cow;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};

/// Declaration that starts every part
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// WordprocessingML main namespace
pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
/// Relationship reference namespace (`r:id`)
pub const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Escape text for use in element content or attribute values
pub fn escape(text: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(text)
}

/// A `w:t` element, preserving edge whitespace when present
pub fn text_element(text: &str) -> String {
    let preserve = text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace);
    if preserve {
        format!("<w:t xml:space=\"preserve\">{}</w:t>\n", escape(text))
    } else {
        format!("<w:t>{}</w:t>\n", escape(text))
    }
}

/// Byte offset of the first character XML 1.0 cannot carry
///
/// Works on raw UTF-8: C0 controls are single bytes and U+FFFE/U+FFFF
/// encode as `EF BF BE`/`EF BF BF`.
fn find_forbidden(xml: &[u8]) -> Option<usize> {
    xml.iter().enumerate().find_map(|(i, &b)| {
        let control = b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r');
        let noncharacter = b == 0xEF && matches!(xml.get(i + 1..i + 3), Some([0xBF, 0xBE | 0xBF]));
        (control || noncharacter).then_some(i)
    })
}

/// Parse a part end to end, failing on the first syntax error or on a
/// character outside the XML 1.0 range
pub fn check_well_formed(xml: &[u8]) -> Result<()> {
    if let Some(offset) = find_forbidden(xml) {
        return Err(OoxmlError::InvalidCharacter { offset });
    }
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut depth = 0usize;
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    if depth != 0 {
        return Err(quick_xml::Error::Syntax(quick_xml::errors::SyntaxError::UnclosedTag).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("Hello & World"), "Hello &amp; World");
        assert_eq!(escape("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape("\"quoted\""), "&quot;quoted&quot;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_text_element_whitespace() {
        assert_eq!(text_element("Page "), "<w:t xml:space=\"preserve\">Page </w:t>\n");
        assert_eq!(text_element("R&D"), "<w:t>R&amp;D</w:t>\n");
    }

    #[test]
    fn test_well_formed() {
        assert!(check_well_formed(b"<a><b/>text</a>").is_ok());
        assert!(check_well_formed(b"<a><b></a>").is_err());
        assert!(check_well_formed(b"<a><b>").is_err());
    }

    #[test]
    fn test_forbidden_characters_rejected() {
        assert!(check_well_formed("<a>\t\r\nété</a>".as_bytes()).is_ok());

        let err = check_well_formed(b"<a>x\x0By</a>").unwrap_err();
        assert!(matches!(err, OoxmlError::InvalidCharacter { offset: 4 }));
        assert_eq!(err.kind(), docweave_model::ErrorKind::Validation);

        let err = check_well_formed("<a v=\"\u{FFFF}\"/>".as_bytes()).unwrap_err();
        assert!(matches!(err, OoxmlError::InvalidCharacter { offset: 6 }));
    }
}
