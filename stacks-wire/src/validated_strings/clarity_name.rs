/*!
Clarity name type and parsing
*/
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Validate, ValidatedString};
use crate::codec::LengthPrefix;

/// Maximum Clarity name length
pub const CLARITY_MAX_NAME_LENGTH: usize = 128;

/// Regex for Clarity names
pub static CLARITY_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
	Regex::new(
		"^[a-zA-Z]([a-zA-Z0-9]|[-_!?+<>=/*])*$|^[-+=/*]$|^[<>]=?$",
	)
	.expect("Clarity name regex is valid")
});

/// Clarity name type
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone)]
pub struct ValidClarityName(String);

impl Validate for ValidClarityName {
	const ERR_MSG: &'static str = "Clarity name not valid";
	const KIND: &'static str = "clarity name";
	const LENGTH_PREFIX: LengthPrefix = LengthPrefix::U8;
	const MIN_LENGTH: usize = 1;
	const MAX_LENGTH: usize = CLARITY_MAX_NAME_LENGTH;

	fn validate(text: impl AsRef<str>) -> bool {
		CLARITY_NAME_REGEX.is_match(text.as_ref())
	}

	fn create(text: impl AsRef<str>) -> Self
	where
		Self: Sized,
	{
		Self(text.as_ref().to_string())
	}

	fn as_str(&self) -> &str {
		&self.0
	}
}

/// Validated Clarity name, used for function names and tuple keys
pub type ClarityName = ValidatedString<ValidClarityName>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn should_validate_clarity_names() {
		assert!(ClarityName::new("stack-stx").is_ok());
		assert!(ClarityName::new("is-ok?").is_ok());
		assert!(ClarityName::new("<=").is_ok());
		assert!(ClarityName::new("-").is_ok());
		assert!(ClarityName::new("").is_err());
		assert!(ClarityName::new("9lives").is_err());
		assert!(ClarityName::new("a".repeat(129)).is_err());
	}
}
