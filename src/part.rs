//! The components of a URI that a policy can target.

use std::fmt;
use std::str::FromStr;

use crate::error::UnknownPartError;

/// A constituent of a URI that can be substituted.
///
/// `All` stands for the whole input and is only consulted when the input
/// cannot be decomposed: it does not parse as a request URI, or its
/// substituted form cannot be decoded.
///
/// # Examples
///
/// ```
/// use uri_redact::Part;
///
/// let part: Part = "password".parse().unwrap();
/// assert_eq!(part, Part::Password);
/// assert_eq!(part.to_string(), "password");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Part {
    /// User name of the userinfo
    Username,
    /// Password of the userinfo
    Password,
    /// Scheme, without the trailing ':'
    Scheme,
    /// Host, including any port
    Host,
    /// Decoded path
    Path,
    /// Raw query, without the leading '?'
    Query,
    /// Fragment, without the leading '#'
    Fragment,
    /// The whole input, for inputs that are not decomposed
    All,
}

impl Part {
    /// Every part, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Username,
        Self::Password,
        Self::Scheme,
        Self::Host,
        Self::Path,
        Self::Query,
        Self::Fragment,
        Self::All,
    ];

    /// Returns the lowercase name of the part.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Password => "password",
            Self::Scheme => "scheme",
            Self::Host => "host",
            Self::Path => "path",
            Self::Query => "query",
            Self::Fragment => "fragment",
            Self::All => "all",
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Part {
    type Err = UnknownPartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|part| part.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPartError { name: s.to_string() })
    }
}

impl TryFrom<&str> for Part {
    type Error = UnknownPartError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Part {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Part {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip() {
        for part in Part::ALL {
            assert_eq!(part.as_str().parse::<Part>().unwrap(), part);
        }
    }

    #[test]
    fn parse_ignores_case() {
        assert_eq!("Password".parse::<Part>().unwrap(), Part::Password);
        assert_eq!("ALL".parse::<Part>().unwrap(), Part::All);
    }

    #[test]
    fn parse_unknown_fails() {
        let err = "port".parse::<Part>().unwrap_err();
        assert_eq!(err.name, "port");
    }
}
