//! Composition of rules into a substitution policy.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::constants::{DEFAULT_PASSWORD_MASK_LENGTH, DEFAULT_USERNAME_PLACEHOLDER};
use crate::mode::Mode;
use crate::part::Part;
use crate::rule::Rule;

static DEFAULT_RULES: LazyLock<[Rule; 2]> = LazyLock::new(|| {
    [
        Rule::new(Part::Password, Mode::starred(DEFAULT_PASSWORD_MASK_LENGTH)),
        Rule::new(Part::Username, Mode::value(DEFAULT_USERNAME_PLACEHOLDER)),
    ]
});

/// Returns the rules used when a caller opts into defaults and supplies none:
/// the password is masked with [`DEFAULT_PASSWORD_MASK_LENGTH`] stars and the
/// username replaced with [`DEFAULT_USERNAME_PLACEHOLDER`].
#[must_use]
pub fn default_rules() -> &'static [Rule] {
    DEFAULT_RULES.as_slice()
}

/// Mapping from [`Part`] to the [`Mode`] that substitutes it.
///
/// Built from an ordered list of [`Rule`]s; a later rule for a part replaces
/// an earlier one. Parts without a mode are left untouched.
///
/// # Examples
///
/// ```
/// use uri_redact::{Mode, Part, Policy, Rule};
///
/// let policy = Policy::from_rules([
///     Rule::new(Part::Password, Mode::hidden()),
///     Rule::new(Part::Password, Mode::starred(3)),
/// ]);
/// assert_eq!(policy.len(), 1);
/// assert_eq!(
///     policy.substitute("postgres://app:secret@db/main"),
///     "postgres://app:***@db/main"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Policy {
    modes: HashMap<Part, Mode>,
}

impl Policy {
    /// Creates a policy that substitutes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds `rules` into a policy, last rule per part winning.
    #[must_use]
    pub fn from_rules<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = Rule>,
    {
        rules.into_iter().collect()
    }

    /// Like [`Policy::from_rules`], but returns [`Policy::defaults`] when
    /// `rules` is empty.
    #[must_use]
    pub fn from_rules_or_default<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = Rule>,
    {
        let mut rules = rules.into_iter().peekable();
        if rules.peek().is_none() {
            return Self::defaults();
        }
        rules.collect()
    }

    /// Returns the policy made of [`default_rules`].
    #[must_use]
    pub fn defaults() -> Self {
        default_rules().iter().cloned().collect()
    }

    /// Returns the policy with `mode` bound to `part`.
    #[must_use]
    pub fn with(mut self, part: Part, mode: Mode) -> Self {
        self.modes.insert(part, mode);
        self
    }

    /// Binds the rule's mode to its part, returning the mode it replaced.
    pub fn insert(&mut self, rule: Rule) -> Option<Mode> {
        let (part, mode) = rule.into_parts();
        self.modes.insert(part, mode)
    }

    /// Returns the mode bound to `part`, if any.
    #[must_use]
    pub fn get(&self, part: Part) -> Option<&Mode> {
        self.modes.get(&part)
    }

    /// Returns true if a mode is bound to `part`.
    #[must_use]
    pub fn contains(&self, part: Part) -> bool {
        self.modes.contains_key(&part)
    }

    /// Returns the number of bound parts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    /// Returns true if no part is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Returns the bound parts in declaration order.
    pub fn parts(&self) -> impl Iterator<Item = Part> + '_ {
        Part::ALL.into_iter().filter(|part| self.contains(*part))
    }

    /// Substitutes one component value.
    ///
    /// Empty values and parts without a mode come back unchanged; the mode is
    /// not run for them.
    pub(crate) fn apply<'a>(&self, part: Part, value: &'a str) -> Cow<'a, str> {
        if value.is_empty() {
            return Cow::Borrowed(value);
        }
        match self.modes.get(&part) {
            Some(mode) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(part = %part, "substituting URI component");
                Cow::Owned(mode.apply(part, value))
            }
            None => Cow::Borrowed(value),
        }
    }
}

impl FromIterator<Rule> for Policy {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        let mut policy = Self::new();
        policy.extend(iter);
        policy
    }
}

impl Extend<Rule> for Policy {
    fn extend<I: IntoIterator<Item = Rule>>(&mut self, iter: I) {
        for rule in iter {
            self.insert(rule);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn empty_rules_give_empty_policy() {
        let policy = Policy::from_rules(Vec::new());
        assert!(policy.is_empty());
    }

    #[test]
    fn last_rule_wins() {
        let policy = Policy::from_rules([
            Rule::new(Part::Path, Mode::value("first")),
            Rule::new(Part::Query, Mode::hidden()),
            Rule::new(Part::Path, Mode::value("second")),
        ]);
        assert_eq!(policy.len(), 2);
        assert_eq!(policy.apply(Part::Path, "p"), "second");
    }

    #[test]
    fn insert_returns_replaced_mode() {
        let mut policy = Policy::new();
        assert!(policy.insert(Rule::new(Part::Host, Mode::hidden())).is_none());
        let replaced = policy.insert(Rule::new(Part::Host, Mode::starred(1)));
        assert!(matches!(replaced, Some(Mode::Hidden)));
    }

    #[test]
    fn defaults_only_when_no_rules() {
        let defaulted = Policy::from_rules_or_default(Vec::new());
        assert!(defaulted.contains(Part::Password));
        assert!(defaulted.contains(Part::Username));

        let explicit = Policy::from_rules_or_default([Rule::new(Part::Path, Mode::hidden())]);
        assert_eq!(explicit.parts().collect::<Vec<_>>(), vec![Part::Path]);
    }

    #[test]
    fn default_rules_mask_credentials() {
        let policy = Policy::defaults();
        assert_eq!(policy.apply(Part::Password, "hunter2"), "*****");
        assert_eq!(policy.apply(Part::Username, "admin"), DEFAULT_USERNAME_PLACEHOLDER);
    }

    #[test]
    fn unbound_part_passes_through() {
        let policy = Policy::new().with(Part::Password, Mode::hidden());
        assert!(matches!(policy.apply(Part::Username, "admin"), Cow::Borrowed("admin")));
    }

    #[test]
    fn empty_value_skips_mode() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let policy = Policy::new().with(
            Part::Query,
            Mode::func(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                "x".to_string()
            }),
        );
        assert_eq!(policy.apply(Part::Query, ""), "");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(policy.apply(Part::Query, "q"), "x");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
