//! Request-URI type.
//!
//! # Grammar
//!
//! ```text
//! request-uri = "*" / absolute-uri / absolute-path [ "?" query ]
//! absolute-uri = scheme ":" ( "//" authority path / "/" path / opaque ) [ "?" query ]
//! authority   = [ userinfo "@" ] host [ ":" port ]
//! userinfo    = username [ ":" password ]
//! ```
//!
//! A request URI carries no fragment: a '#' stays in the raw query, or in the
//! path when there is no query.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::{ParseError, ParseErrorKind};
use crate::escape::{Encoding, escape, unescape, valid_encoded};

/// The `username[:password]` part of an authority, percent-decoded.
///
/// # Examples
///
/// ```
/// use uri_redact::UserInfo;
///
/// let user = UserInfo::with_password("app", "p@ss");
/// assert_eq!(user.to_string(), "app:p%40ss");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserInfo {
    username: String,
    password: Option<String>,
}

impl UserInfo {
    /// Creates userinfo with a username only.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: None,
        }
    }

    /// Creates userinfo with a username and a password.
    #[must_use]
    pub fn with_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Some(password.into()),
        }
    }

    /// Returns the decoded username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the decoded password, if one was given (it may be empty).
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

impl fmt::Display for UserInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&escape(&self.username, Encoding::UserPassword))?;
        if let Some(password) = &self.password {
            write!(f, ":{}", escape(password, Encoding::UserPassword))?;
        }
        Ok(())
    }
}

/// A parsed request URI.
///
/// Components are stored decoded, except the query, which is kept raw.
/// `Display` re-encodes each component with its own rules.
///
/// # Examples
///
/// ```
/// use uri_redact::Uri;
///
/// let uri = Uri::parse("postgres://app:secret@db:5432/main?sslmode=require").unwrap();
/// assert_eq!(uri.scheme(), "postgres");
/// assert_eq!(uri.user().map(|u| u.username()), Some("app"));
/// assert_eq!(uri.user().and_then(|u| u.password()), Some("secret"));
/// assert_eq!(uri.host(), "db:5432");
/// assert_eq!(uri.path(), "/main");
/// assert_eq!(uri.query(), "sslmode=require");
/// assert_eq!(uri.to_string(), "postgres://app:secret@db:5432/main?sslmode=require");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Uri {
    scheme: String,
    opaque: String,
    user: Option<UserInfo>,
    host: String,
    path: String,
    /// Encoded path as it appeared in the input, reused when still accurate
    raw_path: String,
    omit_host: bool,
    force_query: bool,
    raw_query: String,
    fragment: String,
}

impl Uri {
    /// Parses a request URI: an absolute URI, an absolute path, or `*`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if:
    /// - The input is empty or contains an ASCII control byte
    /// - The input starts with ':'
    /// - The input has no scheme and does not start with '/'
    /// - The authority has an invalid userinfo, host or port
    /// - A percent-escape is malformed or decodes to invalid UTF-8
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Self::parse_inner(input).map_err(ParseError::new)
    }

    /// Returns the lowercase scheme, or `""` for an absolute path.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns the opaque part of a URI such as `mailto:a@b`, or `""`.
    #[must_use]
    pub fn opaque(&self) -> &str {
        &self.opaque
    }

    /// Returns the userinfo, if the authority had one.
    #[must_use]
    pub const fn user(&self) -> Option<&UserInfo> {
        self.user.as_ref()
    }

    /// Returns the decoded host, including any `:port`.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the decoded path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the raw query, without the leading '?'.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.raw_query
    }

    /// Returns the decoded fragment, or `""`.
    ///
    /// Always empty for a parsed URI; see [`Uri::set_fragment`].
    #[must_use]
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Sets the scheme. An empty scheme makes the URI scheme-relative.
    pub fn set_scheme(&mut self, scheme: impl Into<String>) {
        self.scheme = scheme.into();
    }

    /// Sets or removes the userinfo.
    pub fn set_user(&mut self, user: Option<UserInfo>) {
        self.user = user;
    }

    /// Sets the decoded host, including any `:port`.
    pub fn set_host(&mut self, host: impl Into<String>) {
        self.host = host.into();
    }

    /// Sets the decoded path.
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    /// Sets the raw query, without the leading '?'. The value is emitted
    /// verbatim, so a '#' in it is data, not a fragment delimiter.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.raw_query = query.into();
    }

    /// Sets the decoded fragment, without the leading '#'.
    pub fn set_fragment(&mut self, fragment: impl Into<String>) {
        self.fragment = fragment.into();
    }

    /// Returns the encoded path.
    ///
    /// The path as written in the input is reused while it still decodes to
    /// the current path; otherwise the path is escaped afresh.
    #[must_use]
    pub fn escaped_path(&self) -> Cow<'_, str> {
        if !self.raw_path.is_empty()
            && valid_encoded(&self.raw_path, Encoding::Path)
            && unescape(&self.raw_path, Encoding::Path).is_ok_and(|p| p == self.path)
        {
            return Cow::Borrowed(&self.raw_path);
        }
        if self.path == "*" {
            return Cow::Borrowed("*");
        }
        escape(&self.path, Encoding::Path)
    }

    fn parse_inner(input: &str) -> Result<Self, ParseErrorKind> {
        if let Some(position) = input.bytes().position(|b| b < 0x20 || b == 0x7f) {
            return Err(ParseErrorKind::ControlCharacter { position });
        }

        if input.is_empty() {
            return Err(ParseErrorKind::Empty);
        }

        let mut uri = Self::default();

        if input == "*" {
            uri.path = "*".to_string();
            return Ok(uri);
        }

        // Split off scheme
        let (scheme, rest) = Self::split_scheme(input)?;
        uri.scheme = scheme.to_ascii_lowercase();

        // Split off query
        let rest = if rest.ends_with('?') && rest.matches('?').count() == 1 {
            uri.force_query = true;
            &rest[..rest.len() - 1]
        } else if let Some((rest, query)) = rest.split_once('?') {
            uri.raw_query = query.to_string();
            rest
        } else {
            rest
        };

        if !rest.starts_with('/') {
            if uri.scheme.is_empty() {
                return Err(ParseErrorKind::NotAbsolute);
            }
            // Rootless paths after a scheme are opaque
            uri.opaque = rest.to_string();
            return Ok(uri);
        }

        let rest = if !uri.scheme.is_empty() && rest.starts_with("//") {
            let (authority, path) = Self::split_authority(&rest[2..]);
            let (user, host) = Self::parse_authority(authority)?;
            uri.user = user;
            uri.host = host;
            path
        } else {
            uri.omit_host = !uri.scheme.is_empty();
            rest
        };

        uri.path = unescape(rest, Encoding::Path)?.into_owned();
        if escape(&uri.path, Encoding::Path) != rest {
            uri.raw_path = rest.to_string();
        }

        Ok(uri)
    }

    fn split_scheme(input: &str) -> Result<(&str, &str), ParseErrorKind> {
        for (i, c) in input.bytes().enumerate() {
            match c {
                b'a'..=b'z' | b'A'..=b'Z' => {}
                b'0'..=b'9' | b'+' | b'-' | b'.' if i > 0 => {}
                b':' if i == 0 => return Err(ParseErrorKind::MissingScheme),
                b':' => return Ok((&input[..i], &input[i + 1..])),
                // Not a scheme character, so there is no scheme
                _ => return Ok(("", input)),
            }
        }
        Ok(("", input))
    }

    fn split_authority(input: &str) -> (&str, &str) {
        match input.find('/') {
            Some(slash_idx) => (&input[..slash_idx], &input[slash_idx..]),
            None => (input, ""),
        }
    }

    fn parse_authority(authority: &str) -> Result<(Option<UserInfo>, String), ParseErrorKind> {
        let Some(at_idx) = authority.rfind('@') else {
            return Ok((None, Self::parse_host(authority)?));
        };

        let host = Self::parse_host(&authority[at_idx + 1..])?;
        let userinfo = &authority[..at_idx];
        if !Self::is_valid_userinfo(userinfo) {
            return Err(ParseErrorKind::InvalidUserInfo);
        }

        let user = match userinfo.split_once(':') {
            Some((username, password)) => UserInfo::with_password(
                unescape(username, Encoding::UserPassword)?,
                unescape(password, Encoding::UserPassword)?,
            ),
            None => UserInfo::new(unescape(userinfo, Encoding::UserPassword)?),
        };

        Ok((Some(user), host))
    }

    fn parse_host(host: &str) -> Result<String, ParseErrorKind> {
        if host.starts_with('[') {
            let close_idx = host.rfind(']').ok_or(ParseErrorKind::MissingBracket)?;
            if !Self::is_valid_optional_port(&host[close_idx + 1..]) {
                return Err(ParseErrorKind::InvalidPort);
            }

            // An IPv6 zone follows "%25" and has its own escaping rules
            if let Some(zone_idx) = host[..close_idx].find("%25") {
                let address = unescape(&host[..zone_idx], Encoding::Host)?;
                let zone = unescape(&host[zone_idx..close_idx], Encoding::Zone)?;
                let port = unescape(&host[close_idx..], Encoding::Host)?;
                return Ok(format!("{address}{zone}{port}"));
            }
        } else if let Some(colon_idx) = host.rfind(':') {
            if !Self::is_valid_optional_port(&host[colon_idx..]) {
                return Err(ParseErrorKind::InvalidPort);
            }
        }

        Ok(unescape(host, Encoding::Host)?.into_owned())
    }

    /// Returns true for `""` or ':' followed by digits.
    fn is_valid_optional_port(port: &str) -> bool {
        if port.is_empty() {
            return true;
        }
        port.strip_prefix(':')
            .is_some_and(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
    }

    fn is_valid_userinfo(userinfo: &str) -> bool {
        userinfo.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || matches!(
                    c,
                    '-' | '.'
                        | '_'
                        | ':'
                        | '~'
                        | '!'
                        | '$'
                        | '&'
                        | '\''
                        | '('
                        | ')'
                        | '*'
                        | '+'
                        | ','
                        | ';'
                        | '='
                        | '%'
                        | '@'
                )
        })
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();

        if !self.scheme.is_empty() {
            out.push_str(&self.scheme);
            out.push(':');
        }

        if self.opaque.is_empty() {
            let has_authority = !self.host.is_empty() || self.user.is_some();
            if (!self.scheme.is_empty() || has_authority) && !(self.omit_host && !has_authority) {
                if has_authority || !self.path.is_empty() {
                    out.push_str("//");
                }
                if let Some(user) = &self.user {
                    out.push_str(&user.to_string());
                    out.push('@');
                }
                out.push_str(&escape(&self.host, Encoding::Host));
            }

            let path = self.escaped_path();
            if !path.is_empty() && !path.starts_with('/') && !self.host.is_empty() {
                out.push('/');
            }
            // A leading segment with a colon would read as a scheme
            if out.is_empty() && path.split('/').next().is_some_and(|seg| seg.contains(':')) {
                out.push_str("./");
            }
            out.push_str(&path);
        } else {
            out.push_str(&self.opaque);
        }

        if self.force_query || !self.raw_query.is_empty() {
            out.push('?');
            out.push_str(&self.raw_query);
        }

        if !self.fragment.is_empty() {
            out.push('#');
            out.push_str(&escape(&self.fragment, Encoding::Fragment));
        }

        f.write_str(&out)
    }
}

impl FromStr for Uri {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Uri {
    type Error = ParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Uri {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Uri {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
