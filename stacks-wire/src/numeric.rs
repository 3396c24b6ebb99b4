/*!
Normalization of loosely typed integer inputs.

Payload constructors accept native integers or decimal strings. Values are
range checked here, before any wire value exists.
*/
use std::num::IntErrorKind;

use crate::{StacksError, StacksResult};

/// An integer given either natively or as decimal text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegerInput {
	/// Signed native integer
	Signed(i128),
	/// Unsigned native integer
	Unsigned(u128),
	/// Decimal text, optionally signed
	Text(String),
}

macro_rules! impl_from_signed {
	($($ty:ty),*) => {
		$(
			impl From<$ty> for IntegerInput {
				fn from(value: $ty) -> Self {
					Self::Signed(value as i128)
				}
			}
		)*
	};
}

macro_rules! impl_from_unsigned {
	($($ty:ty),*) => {
		$(
			impl From<$ty> for IntegerInput {
				fn from(value: $ty) -> Self {
					Self::Unsigned(value as u128)
				}
			}
		)*
	};
}

impl_from_signed!(i8, i16, i32, i64, i128, isize);
impl_from_unsigned!(u8, u16, u32, u64, u128, usize);

impl From<&str> for IntegerInput {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for IntegerInput {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

/// Parsed form of an input, wide enough for both 128 bit ranges
enum Wide {
	Signed(i128),
	Unsigned(u128),
}

impl IntegerInput {
	fn out_of_range(&self, target: &'static str) -> StacksError {
		StacksError::OutOfRange {
			value: self.to_string(),
			target,
		}
	}

	fn parse(&self, target: &'static str) -> StacksResult<Wide> {
		match self {
			Self::Signed(value) => Ok(Wide::Signed(*value)),
			Self::Unsigned(value) => Ok(Wide::Unsigned(*value)),
			Self::Text(text) => {
				let text = text.trim();

				match text.parse::<i128>() {
					Ok(value) => Ok(Wide::Signed(value)),
					Err(err) => match err.kind() {
						IntErrorKind::PosOverflow => text
							.trim_start_matches('+')
							.parse::<u128>()
							.map(Wide::Unsigned)
							.map_err(|_| self.out_of_range(target)),
						IntErrorKind::NegOverflow => {
							Err(self.out_of_range(target))
						}
						_ => Err(StacksError::InvalidInteger(text.to_string())),
					},
				}
			}
		}
	}

	/// Signed 128 bit value
	pub fn to_i128(&self) -> StacksResult<i128> {
		match self.parse("i128")? {
			Wide::Signed(value) => Ok(value),
			Wide::Unsigned(value) => {
				i128::try_from(value).map_err(|_| self.out_of_range("i128"))
			}
		}
	}

	/// Unsigned 128 bit value
	pub fn to_u128(&self) -> StacksResult<u128> {
		match self.parse("u128")? {
			Wide::Signed(value) => {
				u128::try_from(value).map_err(|_| self.out_of_range("u128"))
			}
			Wide::Unsigned(value) => Ok(value),
		}
	}

	/// Unsigned 64 bit value, the width of amounts on the wire
	pub fn to_u64(&self) -> StacksResult<u64> {
		u64::try_from(self.to_u128()?).map_err(|_| self.out_of_range("u64"))
	}

	/// Unsigned 32 bit value
	pub fn to_u32(&self) -> StacksResult<u32> {
		u32::try_from(self.to_u128()?).map_err(|_| self.out_of_range("u32"))
	}
}

impl std::fmt::Display for IntegerInput {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Signed(value) => write!(f, "{}", value),
			Self::Unsigned(value) => write!(f, "{}", value),
			Self::Text(text) => f.write_str(text),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn should_accept_signed_bounds() {
		let min = IntegerInput::from(i128::MIN.to_string());
		let max = IntegerInput::from(i128::MAX.to_string());

		assert_eq!(min.to_i128().unwrap(), i128::MIN);
		assert_eq!(max.to_i128().unwrap(), i128::MAX);
	}

	#[test]
	fn should_reject_one_past_signed_bounds() {
		let below = IntegerInput::from("-170141183460469231731687303715884105729");
		let above = IntegerInput::from("170141183460469231731687303715884105728");

		assert!(matches!(
			below.to_i128(),
			Err(StacksError::OutOfRange { target: "i128", .. })
		));
		assert!(matches!(
			above.to_i128(),
			Err(StacksError::OutOfRange { target: "i128", .. })
		));
		assert_eq!(above.to_u128().unwrap(), i128::MAX as u128 + 1);
	}

	#[test]
	fn should_enforce_unsigned_bounds() {
		let max = IntegerInput::from(u128::MAX.to_string());
		let above = IntegerInput::from("340282366920938463463374607431768211456");

		assert_eq!(max.to_u128().unwrap(), u128::MAX);
		assert!(above.to_u128().is_err());
		assert!(IntegerInput::from(-1).to_u128().is_err());
		assert_eq!(IntegerInput::from(0u8).to_u128().unwrap(), 0);
	}

	#[test]
	fn should_enforce_narrow_widths() {
		assert_eq!(IntegerInput::from(u64::MAX).to_u64().unwrap(), u64::MAX);
		assert!(IntegerInput::from(u64::MAX as u128 + 1).to_u64().is_err());
		assert_eq!(IntegerInput::from("1000000").to_u64().unwrap(), 1_000_000);
		assert!(IntegerInput::from(u32::MAX as u64 + 1).to_u32().is_err());
	}

	#[test]
	fn should_reject_non_numbers() {
		assert!(matches!(
			IntegerInput::from("12abc").to_u64(),
			Err(StacksError::InvalidInteger(_))
		));
		assert!(matches!(
			IntegerInput::from("").to_i128(),
			Err(StacksError::InvalidInteger(_))
		));
	}
}
