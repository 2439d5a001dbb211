//! Convenient re-exports for glob imports.
//!
//! ```rust
//! use uri_redact::prelude::*;
//!
//! let policy = Policy::new().with(Part::Password, Mode::hidden());
//! assert_eq!(policy.substitute("redis://:pw@cache/0"), "redis://cache/0");
//! ```

pub use crate::{
    // Core types
    Mode, Part, Policy, Rule, Substituted, Uri, UserInfo,
    // Operations
    default_rules, substitute, substitute_parsed, substitute_with_defaults,
    // Errors
    ParseError, ParseErrorKind, UnknownPartError,
    // Constants
    DEFAULT_PASSWORD_MASK_LENGTH, DEFAULT_USERNAME_PLACEHOLDER, MASK_CHAR,
};
