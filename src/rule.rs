//! Binding of one part to one mode.

use crate::mode::Mode;
use crate::part::Part;

/// A request to substitute one [`Part`] with one [`Mode`].
///
/// Rules are supplied as an ordered list; when several rules target the same
/// part, the last one wins.
///
/// # Examples
///
/// ```
/// use uri_redact::{Mode, Part, Rule};
///
/// let rule = Rule::new(Part::Password, Mode::starred(4));
/// assert_eq!(rule.part(), Part::Password);
///
/// let same: Rule = (Part::Password, Mode::starred(4)).into();
/// assert_eq!(same.part(), rule.part());
/// ```
#[derive(Debug, Clone)]
pub struct Rule {
    part: Part,
    mode: Mode,
}

impl Rule {
    /// Creates a rule substituting `part` with `mode`.
    #[must_use]
    pub const fn new(part: Part, mode: Mode) -> Self {
        Self { part, mode }
    }

    /// Returns the targeted part.
    #[must_use]
    pub const fn part(&self) -> Part {
        self.part
    }

    /// Returns the mode applied to the part.
    #[must_use]
    pub const fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Splits the rule into its part and mode.
    #[must_use]
    pub fn into_parts(self) -> (Part, Mode) {
        (self.part, self.mode)
    }
}

impl From<(Part, Mode)> for Rule {
    fn from((part, mode): (Part, Mode)) -> Self {
        Self::new(part, mode)
    }
}

/// Loads a rule from `{"part": "password", "mode": "starred", "count": 6}`.
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Rule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct RuleConfig {
            part: Part,
            #[serde(flatten)]
            mode: crate::mode::ModeConfig,
        }

        let config = RuleConfig::deserialize(deserializer)?;
        Ok(Self::new(config.part, config.mode.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_parts_returns_binding() {
        let (part, mode) = Rule::new(Part::Path, Mode::value("x")).into_parts();
        assert_eq!(part, Part::Path);
        assert_eq!(mode.apply(part, "old"), "x");
    }
}
