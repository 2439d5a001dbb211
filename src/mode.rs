//! Replacement modes.

use std::fmt;
use std::sync::Arc;

use crate::constants::MASK_CHAR;
use crate::part::Part;

type CustomFn = dyn Fn(Part, &str) -> String + Send + Sync;

/// What replaces the current value of a [`Part`].
///
/// A mode is a pure function from a part and its current value to the
/// replacement. The engine never runs a mode on an empty value.
///
/// # Examples
///
/// ```
/// use uri_redact::{Mode, Part};
///
/// assert_eq!(Mode::hidden().apply(Part::Password, "secret"), "");
/// assert_eq!(Mode::nothing().apply(Part::Password, "secret"), "secret");
/// assert_eq!(Mode::starred(3).apply(Part::Password, "secret"), "***");
/// assert_eq!(Mode::value("xxx").apply(Part::Password, "secret"), "xxx");
///
/// let upper = Mode::func(|s| s.to_uppercase());
/// assert_eq!(upper.apply(Part::Username, "admin"), "ADMIN");
/// ```
#[derive(Clone)]
pub enum Mode {
    /// Replaces the value with the empty string.
    Hidden,
    /// Keeps the value unchanged.
    Nothing,
    /// Replaces the value with this many [`MASK_CHAR`]s, whatever its length.
    Starred(usize),
    /// Replaces the value with a fixed string.
    Value(String),
    /// Replaces the value with the result of a caller-supplied function.
    Func(Arc<CustomFn>),
}

impl Mode {
    /// Mode that removes the value.
    #[must_use]
    pub const fn hidden() -> Self {
        Self::Hidden
    }

    /// Mode that leaves the value as it is.
    #[must_use]
    pub const fn nothing() -> Self {
        Self::Nothing
    }

    /// Mode that masks the value with `count` mask characters.
    #[must_use]
    pub const fn starred(count: usize) -> Self {
        Self::Starred(count)
    }

    /// Mode that replaces the value with `value`.
    #[must_use]
    pub fn value(value: impl Into<String>) -> Self {
        Self::Value(value.into())
    }

    /// Mode that passes the value through `f`.
    ///
    /// Panics raised by `f` are not caught and unwind out of the substitution.
    #[must_use]
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::Func(Arc::new(move |_: Part, value: &str| f(value)))
    }

    /// Like [`Mode::func`], with the part being substituted passed to `f`.
    #[must_use]
    pub fn func_with_part<F>(f: F) -> Self
    where
        F: Fn(Part, &str) -> String + Send + Sync + 'static,
    {
        Self::Func(Arc::new(f))
    }

    /// Computes the replacement for `value`.
    #[must_use]
    pub fn apply(&self, part: Part, value: &str) -> String {
        match self {
            Self::Hidden => String::new(),
            Self::Nothing => value.to_string(),
            Self::Starred(count) => std::iter::repeat_n(MASK_CHAR, *count).collect(),
            Self::Value(v) => v.clone(),
            Self::Func(f) => f(part, value),
        }
    }
}

impl fmt::Debug for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hidden => f.write_str("Hidden"),
            Self::Nothing => f.write_str("Nothing"),
            Self::Starred(count) => f.debug_tuple("Starred").field(count).finish(),
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// Data-only modes loadable from configuration.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub(crate) enum ModeConfig {
    Hidden,
    Nothing,
    Starred { count: i64 },
    Value { value: String },
}

#[cfg(feature = "serde")]
impl From<ModeConfig> for Mode {
    fn from(config: ModeConfig) -> Self {
        match config {
            ModeConfig::Hidden => Self::Hidden,
            ModeConfig::Nothing => Self::Nothing,
            // Negative counts mask with nothing.
            ModeConfig::Starred { count } => Self::Starred(usize::try_from(count).unwrap_or(0)),
            ModeConfig::Value { value } => Self::Value(value),
        }
    }
}
