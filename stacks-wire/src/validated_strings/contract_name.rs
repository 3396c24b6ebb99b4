/*!
Contract name type and parsing
*/
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Validate, ValidatedString};
use crate::codec::LengthPrefix;

/// Minimum contract name length
pub const CONTRACT_MIN_NAME_LENGTH: usize = 1;
/// Maximum length of newly deployed contract names
pub const CONTRACT_MAX_NAME_LENGTH: usize = 40;
/// Maximum length of contract names already on chain
pub const CONTRACT_MAX_WIRE_NAME_LENGTH: usize = 128;

/// Regex string for contract names
pub static CONTRACT_NAME_REGEX_STRING: Lazy<String> = Lazy::new(|| {
	format!(
		r#"([a-zA-Z](([a-zA-Z0-9]|[-_])){{{},{}}})"#,
		CONTRACT_MIN_NAME_LENGTH - 1,
		CONTRACT_MAX_WIRE_NAME_LENGTH - 1
	)
});

/// Regex for contract names
pub static CONTRACT_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
	Regex::new(
		format!("^{}$|^__transient$", CONTRACT_NAME_REGEX_STRING.as_str())
			.as_str(),
	)
	.expect("Contract name regex is valid")
});

/// Contract name type
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone)]
pub struct ValidContractName(String);

impl Validate for ValidContractName {
	const ERR_MSG: &'static str = "Contract name not valid";
	const KIND: &'static str = "contract name";
	const LENGTH_PREFIX: LengthPrefix = LengthPrefix::U8;
	const MIN_LENGTH: usize = CONTRACT_MIN_NAME_LENGTH;
	const MAX_LENGTH: usize = CONTRACT_MAX_NAME_LENGTH;
	const MAX_WIRE_LENGTH: usize = CONTRACT_MAX_WIRE_NAME_LENGTH;

	fn validate(text: impl AsRef<str>) -> bool {
		CONTRACT_NAME_REGEX.is_match(text.as_ref())
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

/// Validated contract name
pub type ContractName = ValidatedString<ValidContractName>;
