//! Constants for masking and the default policy.

/// Character repeated by [`Mode::Starred`](crate::Mode::Starred).
pub const MASK_CHAR: char = '*';

/// Number of mask characters the default policy puts in place of a password.
pub const DEFAULT_PASSWORD_MASK_LENGTH: usize = 5;

/// Username the default policy substitutes for the original one.
pub const DEFAULT_USERNAME_PLACEHOLDER: &str = "user";
