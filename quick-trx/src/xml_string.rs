// Copyright (c) The spectre-rs Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{borrow::Cow, fmt};

/// The placeholder emitted in place of a non-printable character.
///
/// Reserved XML characters in the placeholder (and everywhere else) are
/// escaped at serialization time, so it shows up as a literal `<np>` to
/// readers of the report.
pub(crate) static NON_PRINTABLE_TOKEN: &str = "<np>";

/// A string suitable for inclusion in a TRX report.
///
/// Construction sanitizes the input:
///
/// 1. ANSI escape sequences are stripped.
/// 2. Every remaining control character other than tab, newline and carriage
///    return is replaced with a visible `<np>` token.
///
/// Reserved XML characters are *not* escaped here; that happens once, during
/// serialization. Sanitization is idempotent: applying it to an already-safe
/// string returns the same text.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct XmlString {
    inner: Box<str>,
}

impl XmlString {
    /// Creates a new `XmlString`, sanitizing the input.
    pub fn new(input: impl AsRef<str>) -> Self {
        let input = input.as_ref();
        // Only text that actually carries an ESC goes through the terminal
        // parser; everything else takes the plain replacement path.
        let stripped: Cow<'_, str> = if input.contains('\x1b') {
            Cow::Owned(strip_ansi_escapes::strip_str(input))
        } else {
            Cow::Borrowed(input)
        };
        let inner = stripped
            .replace(is_non_printable, NON_PRINTABLE_TOKEN)
            .into_boxed_str();
        Self { inner }
    }

    /// Creates a new `XmlString` from raw bytes.
    ///
    /// Invalid UTF-8 never aborts report generation: it is reported through a
    /// `tracing` diagnostic and the offending sequences degrade to
    /// replacement characters.
    pub fn from_utf8_lossy(bytes: &[u8]) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(s) => Self::new(s),
            Err(error) => {
                tracing::warn!(%error, "invalid UTF-8 in report text, replacing lossily");
                Self::new(String::from_utf8_lossy(bytes))
            }
        }
    }

    /// Returns the sanitized string.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Converts self into a `String`.
    pub fn into_string(self) -> String {
        self.inner.into_string()
    }
}

// Tab, newline and carriage return survive; they are the only control
// characters XML 1.0 text can carry.
fn is_non_printable(c: char) -> bool {
    matches!(c, '\x00'..='\x08' | '\x0b' | '\x0c' | '\x0e'..='\x1f' | '\x7f')
}

impl AsRef<str> for XmlString {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for XmlString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for XmlString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for XmlString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&String> for XmlString {
    fn from(s: &String) -> Self {
        Self::new(s)
    }
}

impl From<Cow<'_, str>> for XmlString {
    fn from(s: Cow<'_, str>) -> Self {
        Self::new(s)
    }
}

impl From<XmlString> for String {
    fn from(s: XmlString) -> Self {
        s.into_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn non_printables_become_placeholders() {
        let s = XmlString::new("before\x00\x08after\nnext\tline\r\n");
        assert_eq!(s.as_str(), "before<np><np>after\nnext\tline\r\n");
    }

    #[test]
    fn ansi_escapes_are_stripped() {
        let s = XmlString::new("\x1b[1;31mred\x1b[0m plain");
        assert_eq!(s.as_str(), "red plain");
    }

    #[test]
    fn sanitize_is_idempotent_on_safe_text() {
        let input = "printable ASCII, with <angle> & \"quotes\"";
        let once = XmlString::new(input);
        let twice = XmlString::new(once.as_str());
        assert_eq!(once, twice);
        assert_eq!(once.as_str(), input);
    }

    #[test]
    fn sanitize_is_idempotent_on_placeholder_output() {
        let once = XmlString::new("bad\x01byte");
        let twice = XmlString::new(once.as_str());
        assert_eq!(once.as_str(), "bad<np>byte");
        assert_eq!(once, twice);
    }

    #[test]
    fn invalid_utf8_degrades_instead_of_failing() {
        let s = XmlString::from_utf8_lossy(b"ok \xff\xfe end");
        assert_eq!(s.as_str(), "ok \u{fffd}\u{fffd} end");
    }

    #[test]
    fn valid_utf8_bytes_round_trip() {
        let s = XmlString::from_utf8_lossy("caf\u{e9}".as_bytes());
        assert_eq!(s.as_str(), "caf\u{e9}");
    }
}
