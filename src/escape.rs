//! Percent-encoding rules per URI component.
//!
//! Each component of a request URI has its own set of characters that may
//! appear unescaped. [`Encoding`] names the component, [`escape`] and
//! [`unescape`] convert between decoded values and their encoded form.
//!
//! Decoding is strict: a malformed escape is an error rather than literal
//! text, since that error is what routes a substitution to its fallback.

use std::borrow::Cow;

use crate::error::ParseErrorKind;

const UPPER_HEX: &[u8; 16] = b"0123456789ABCDEF";

/// The component a value is encoded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Encoding {
    /// A whole path, '/' kept literal
    Path,
    /// A single path segment; also used to decode a full serialized URI
    PathSegment,
    /// Registered name or IP literal
    Host,
    /// IPv6 zone identifier inside an IP literal
    Zone,
    /// Username or password
    UserPassword,
    /// Fragment
    Fragment,
}

impl Encoding {
    const fn component(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::PathSegment => "uri",
            Self::Host | Self::Zone => "host",
            Self::UserPassword => "userinfo",
            Self::Fragment => "fragment",
        }
    }
}

/// Returns true if `c` must be percent-escaped in the given component.
pub(crate) const fn should_escape(c: u8, mode: Encoding) -> bool {
    if c.is_ascii_alphanumeric() {
        return false;
    }

    if matches!(mode, Encoding::Host | Encoding::Zone)
        && matches!(
            c,
            b'!' | b'$'
                | b'&'
                | b'\''
                | b'('
                | b')'
                | b'*'
                | b'+'
                | b','
                | b';'
                | b'='
                | b':'
                | b'['
                | b']'
                | b'<'
                | b'>'
                | b'"'
        )
    {
        return false;
    }

    match c {
        b'-' | b'_' | b'.' | b'~' => false,
        b'$' | b'&' | b'+' | b',' | b'/' | b':' | b';' | b'=' | b'?' | b'@' => match mode {
            Encoding::Path => c == b'?',
            Encoding::PathSegment => matches!(c, b'/' | b';' | b',' | b'?'),
            Encoding::UserPassword => matches!(c, b'@' | b'/' | b'?' | b':'),
            Encoding::Fragment => false,
            Encoding::Host | Encoding::Zone => true,
        },
        b'!' | b'(' | b')' | b'*' => !matches!(mode, Encoding::Fragment),
        _ => true,
    }
}

/// Percent-escapes every byte of `s` the component does not allow literally.
pub(crate) fn escape(s: &str, mode: Encoding) -> Cow<'_, str> {
    if !s.bytes().any(|b| should_escape(b, mode)) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    for b in s.bytes() {
        if should_escape(b, mode) {
            out.push('%');
            out.push(char::from(UPPER_HEX[usize::from(b >> 4)]));
            out.push(char::from(UPPER_HEX[usize::from(b & 0x0f)]));
        } else {
            // Every byte >= 0x80 is escaped above, so this is ASCII.
            out.push(char::from(b));
        }
    }
    Cow::Owned(out)
}

/// Decodes the percent-escapes of `s` under the rules of the component.
///
/// # Errors
///
/// Fails on a '%' not followed by two hex digits, on escapes the host rules
/// forbid, on literal characters outside the host set (host and zone only),
/// and when the decoded bytes are not UTF-8.
pub(crate) fn unescape(s: &str, mode: Encoding) -> Result<Cow<'_, str>, ParseErrorKind> {
    let bytes = s.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut has_escape = false;
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if c == b'%' {
            let hi = bytes.get(i + 1).copied().and_then(hex_value);
            let lo = bytes.get(i + 2).copied().and_then(hex_value);
            let (Some(hi), Some(lo)) = (hi, lo) else {
                return Err(ParseErrorKind::InvalidEscape {
                    component: mode.component(),
                });
            };
            let is_escaped_percent = hi == 2 && lo == 5;
            let value = (hi << 4) | lo;

            // Only non-ASCII bytes may be escaped in a host; "%25" is allowed
            // for the percent sign that introduces an IPv6 zone.
            if mode == Encoding::Host && hi < 8 && !is_escaped_percent {
                return Err(ParseErrorKind::InvalidEscape {
                    component: mode.component(),
                });
            }
            if mode == Encoding::Zone
                && !is_escaped_percent
                && value != b' '
                && should_escape(value, Encoding::Host)
            {
                return Err(ParseErrorKind::InvalidEscape {
                    component: mode.component(),
                });
            }

            decoded.push(value);
            has_escape = true;
            i += 3;
        } else {
            if matches!(mode, Encoding::Host | Encoding::Zone)
                && c < 0x80
                && should_escape(c, mode)
            {
                return Err(ParseErrorKind::InvalidHostCharacter { char: char::from(c) });
            }
            decoded.push(c);
            i += 1;
        }
    }

    if !has_escape {
        return Ok(Cow::Borrowed(s));
    }

    String::from_utf8(decoded)
        .map(Cow::Owned)
        .map_err(|_| ParseErrorKind::InvalidUtf8 {
            component: mode.component(),
        })
}

/// Decodes every percent-escape of a serialized URI for display.
///
/// # Errors
///
/// Fails on malformed escapes and on decoded bytes that are not UTF-8.
pub(crate) fn percent_decode(s: &str) -> Result<Cow<'_, str>, ParseErrorKind> {
    unescape(s, Encoding::PathSegment)
}

/// Returns true if `s` is a valid encoding of some value in the component:
/// it contains no byte that would have been escaped, besides escapes
/// themselves and the sub-delimiters left alone by browsers.
pub(crate) fn valid_encoded(s: &str, mode: Encoding) -> bool {
    s.bytes().all(|c| {
        matches!(
            c,
            b'!' | b'$'
                | b'&'
                | b'\''
                | b'('
                | b')'
                | b'*'
                | b'+'
                | b','
                | b';'
                | b'='
                | b':'
                | b'@'
                | b'['
                | b']'
                | b'%'
        ) || !should_escape(c, mode)
    })
}

const fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_leaves_unreserved_alone() {
        assert!(matches!(escape("abc-_.~", Encoding::Path), Cow::Borrowed(_)));
    }

    #[test]
    fn escape_userinfo_delimiters() {
        assert_eq!(escape("p@ss:w/rd?", Encoding::UserPassword), "p%40ss%3Aw%2Frd%3F");
    }

    #[test]
    fn escape_path_keeps_slashes() {
        assert_eq!(escape("/a b/c?d", Encoding::Path), "/a%20b/c%3Fd");
    }

    #[test]
    fn escape_non_ascii() {
        assert_eq!(escape("é", Encoding::Path), "%C3%A9");
    }

    #[test]
    fn escape_fragment_keeps_sub_delims() {
        assert_eq!(escape("a!(b)*c/d?", Encoding::Fragment), "a!(b)*c/d?");
    }

    #[test]
    fn unescape_roundtrips_escape() {
        let value = "p@ss w:rd/é%";
        let encoded = escape(value, Encoding::UserPassword);
        assert_eq!(unescape(&encoded, Encoding::UserPassword).unwrap(), value);
    }

    #[test]
    fn unescape_without_escapes_borrows() {
        assert!(matches!(
            unescape("plain", Encoding::Path).unwrap(),
            Cow::Borrowed("plain")
        ));
    }

    #[test]
    fn unescape_rejects_truncated_escape() {
        assert_eq!(
            unescape("abc%4", Encoding::Path),
            Err(ParseErrorKind::InvalidEscape { component: "path" })
        );
    }

    #[test]
    fn unescape_rejects_non_hex_escape() {
        assert!(unescape("%zz", Encoding::PathSegment).is_err());
    }

    #[test]
    fn unescape_rejects_invalid_utf8() {
        assert_eq!(
            unescape("%FF", Encoding::Path),
            Err(ParseErrorKind::InvalidUtf8 { component: "path" })
        );
    }

    #[test]
    fn unescape_host_rejects_escaped_ascii() {
        assert!(unescape("ex%41mple.com", Encoding::Host).is_err());
        assert!(unescape("fe80::1%25en0", Encoding::Host).is_ok());
    }

    #[test]
    fn unescape_host_rejects_invalid_characters() {
        assert_eq!(
            unescape("exa mple", Encoding::Host),
            Err(ParseErrorKind::InvalidHostCharacter { char: ' ' })
        );
    }

    #[test]
    fn unescape_host_allows_non_ascii_escapes() {
        assert_eq!(unescape("%C3%A9.com", Encoding::Host).unwrap(), "é.com");
    }

    #[test]
    fn percent_decode_decodes_everything() {
        assert_eq!(percent_decode("a%2Fb%3Fc%23d").unwrap(), "a/b?c#d");
    }

    #[test]
    fn valid_encoded_accepts_escapes_and_sub_delims() {
        assert!(valid_encoded("/a%20b/c;d=e", Encoding::Path));
        assert!(!valid_encoded("/a b", Encoding::Path));
        assert!(!valid_encoded("/a#b", Encoding::Path));
    }
}
