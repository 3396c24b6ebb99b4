/*!
Smart contract source code body
*/
use super::{Validate, ValidatedString};
use crate::codec::LengthPrefix;

/// Maximum size of a smart contract code body in bytes
pub const MAX_CODE_BODY_LENGTH: usize = 100_000;

/// Validated code body type
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone)]
pub struct ValidCodeBody(String);

impl Validate for ValidCodeBody {
	const ERR_MSG: &'static str =
		"Code body must be printable ASCII of at most 100000 bytes";
	const KIND: &'static str = "code body";
	const LENGTH_PREFIX: LengthPrefix = LengthPrefix::U32;
	const MIN_LENGTH: usize = 0;
	const MAX_LENGTH: usize = MAX_CODE_BODY_LENGTH;

	fn validate(text: impl AsRef<str>) -> bool {
		// Printable ASCII plus tab and newline
		text.as_ref().bytes().all(|byte| {
			(0x20..=0x7e).contains(&byte) || byte == b'\t' || byte == b'\n'
		})
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

/// Validated smart contract code body
pub type CodeBody = ValidatedString<ValidCodeBody>;
