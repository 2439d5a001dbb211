//! Error types for request-URI parsing.

use std::fmt;

/// Errors that can occur when parsing a request URI.
///
/// The error never carries the input, which may hold credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The specific error that occurred
    pub kind: ParseErrorKind,
}

/// Specific parsing error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// URI is empty
    Empty,
    /// URI contains an ASCII control byte
    ControlCharacter {
        /// Byte offset of the control byte
        position: usize,
    },
    /// URI starts with ':'
    MissingScheme,
    /// URI is neither absolute nor an absolute path
    NotAbsolute,
    /// A '%' is not followed by two hex digits, or escapes a byte the
    /// component does not allow escaped
    InvalidEscape {
        /// Component the escape was found in
        component: &'static str,
    },
    /// Host contains a character outside the host character set
    InvalidHostCharacter {
        /// The offending character
        char: char,
    },
    /// IP literal host without a closing ']'
    MissingBracket,
    /// Port is not all digits
    InvalidPort,
    /// Userinfo contains a character outside the userinfo character set
    InvalidUserInfo,
    /// A percent-decoded component is not valid UTF-8
    InvalidUtf8 {
        /// Component that failed to decode
        component: &'static str,
    },
}

impl ParseError {
    pub(crate) const fn new(kind: ParseErrorKind) -> Self {
        Self { kind }
    }
}

impl From<ParseErrorKind> for ParseError {
    fn from(kind: ParseErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse request URI: ")?;
        match &self.kind {
            ParseErrorKind::Empty => write!(f, "input is empty"),
            ParseErrorKind::ControlCharacter { position } => {
                write!(f, "control character at position {position}")
            }
            ParseErrorKind::MissingScheme => write!(f, "missing scheme before ':'"),
            ParseErrorKind::NotAbsolute => {
                write!(f, "expected an absolute URI or an absolute path")
            }
            ParseErrorKind::InvalidEscape { component } => {
                write!(f, "invalid percent-escape in {component}")
            }
            ParseErrorKind::InvalidHostCharacter { char } => {
                write!(f, "invalid character '{char}' in host")
            }
            ParseErrorKind::MissingBracket => write!(f, "missing ']' in host"),
            ParseErrorKind::InvalidPort => write!(f, "port must be numeric"),
            ParseErrorKind::InvalidUserInfo => write!(f, "invalid character in userinfo"),
            ParseErrorKind::InvalidUtf8 { component } => {
                write!(f, "decoded {component} is not valid UTF-8")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Error returned when a string does not name a [`Part`](crate::Part).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPartError {
    /// The name that was not recognized
    pub name: String,
}

impl fmt::Display for UnknownPartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown URI part '{}'; expected one of username, password, scheme, host, path, query, fragment, all",
            self.name
        )
    }
}

impl std::error::Error for UnknownPartError {}
