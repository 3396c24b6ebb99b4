//! Crockford base-32 with the c32check checksum used by Stacks addresses.

use crate::crypto::{sha256::DoubleSha256Hasher, Hashing};

const C32_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Maps ASCII bytes to their 5-bit value. Lowercase letters are accepted,
/// `O` decodes as `0` and `I`/`L` decode as `1`.
const C32_BYTE_MAP: [i8; 128] = [
	-1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
	-1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
	-1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, 0, 1, 2, 3, 4, 5, 6, 7,
	8, 9, -1, -1, -1, -1, -1, -1, -1, 10, 11, 12, 13, 14, 15, 16, 17, 1, 18,
	19, 1, 20, 21, 0, 22, 23, 24, 25, 26, -1, 27, 28, 29, 30, 31, -1, -1, -1,
	-1, -1, -1, 10, 11, 12, 13, 14, 15, 16, 17, 1, 18, 19, 1, 20, 21, 0, 22,
	23, 24, 25, 26, -1, 27, 28, 29, 30, 31, -1, -1, -1, -1, -1,
];

const C32_CHECKSUM_LENGTH: usize = 4;

fn encode_overhead(len: usize) -> usize {
	(len * 8 + 4) / 5
}

fn decode_underhead(len: usize) -> usize {
	len * 5 / 8
}

/// Errors from c32 encoding and decoding
#[derive(thiserror::Error, Clone, Debug, Eq, PartialEq)]
pub enum C32Error {
	/// Invalid C32 string.
	#[error("Invalid C32 string")]
	InvalidC32,
	/// Invalid character.
	#[error("Invalid C32 character: {0}")]
	InvalidChar(char),
	/// Invalid checksum.
	#[error("Invalid C32 checksum - expected {0:?}, got {1:?}")]
	InvalidChecksum([u8; 4], Vec<u8>),
	/// Invalid C32 address.
	#[error("Invalid C32 address: {0}")]
	InvalidAddress(String),
	/// Invalid C32 address version.
	#[error("Invalid C32 address version: {0}")]
	InvalidAddressVersion(u8),
}

/// Encodes bytes into c32 characters
pub fn encode(data: impl AsRef<[u8]>) -> Vec<u8> {
	let data = data.as_ref();

	let mut encoded = Vec::with_capacity(encode_overhead(data.len()));
	let mut buffer = 0u32;
	let mut bits = 0;

	for byte in data.iter().rev() {
		buffer |= (*byte as u32) << bits;
		bits += 8;

		while bits >= 5 {
			encoded.push(C32_ALPHABET[(buffer & 0x1F) as usize]);
			buffer >>= 5;
			bits -= 5;
		}
	}

	if bits > 0 {
		encoded.push(C32_ALPHABET[(buffer & 0x1F) as usize]);
	}

	while let Some(i) = encoded.pop() {
		if i != C32_ALPHABET[0] {
			encoded.push(i);
			break;
		}
	}

	for i in data {
		if *i == 0 {
			encoded.push(C32_ALPHABET[0]);
		} else {
			break;
		}
	}

	encoded.reverse();
	encoded
}

/// Decodes c32 characters into bytes
pub fn decode(input: impl AsRef<[u8]>) -> Result<Vec<u8>, C32Error> {
	let input = input.as_ref();

	if !input.is_ascii() {
		return Err(C32Error::InvalidC32);
	}

	let mut decoded = Vec::with_capacity(decode_underhead(input.len()));
	let mut carry = 0u16;
	let mut carry_bits = 0;

	for byte in input.iter().rev() {
		let bits = C32_BYTE_MAP[*byte as usize];

		if bits < 0 {
			return Err(C32Error::InvalidChar(*byte as char));
		}

		carry |= (bits as u16) << carry_bits;
		carry_bits += 5;

		if carry_bits >= 8 {
			decoded.push((carry & 0xFF) as u8);
			carry >>= 8;
			carry_bits -= 8;
		}
	}

	if carry_bits > 0 {
		decoded.push((carry & 0xFF) as u8);
	}

	while let Some(i) = decoded.pop() {
		if i != 0 {
			decoded.push(i);
			break;
		}
	}

	for byte in input.iter() {
		if *byte == b'0' {
			decoded.push(0);
		} else {
			break;
		}
	}

	decoded.reverse();

	Ok(decoded)
}

fn checksum(version: u8, data: &[u8]) -> [u8; C32_CHECKSUM_LENGTH] {
	let mut buffer = Vec::with_capacity(data.len() + 1);
	buffer.push(version);
	buffer.extend_from_slice(data);

	DoubleSha256Hasher::new(&buffer).checksum()
}

/// Encodes a version and data with a c32check checksum
pub fn version_check_encode(
	version: u8,
	data: impl AsRef<[u8]>,
) -> Result<Vec<u8>, C32Error> {
	if version as usize >= C32_ALPHABET.len() {
		return Err(C32Error::InvalidAddressVersion(version));
	}

	let data = data.as_ref();

	let mut buffer = data.to_vec();
	buffer.extend_from_slice(&checksum(version, data));

	let mut encoded = encode(&buffer);
	encoded.insert(0, C32_ALPHABET[version as usize]);

	Ok(encoded)
}

/// Decodes a c32check string into its version and data
pub fn version_check_decode(
	input: impl AsRef<[u8]>,
) -> Result<(u8, Vec<u8>), C32Error> {
	let input = input.as_ref();

	if !input.is_ascii() || input.is_empty() {
		return Err(C32Error::InvalidC32);
	}

	let (version_char, data) = input.split_at(1);

	let version = C32_BYTE_MAP[version_char[0] as usize];
	if version < 0 {
		return Err(C32Error::InvalidChar(version_char[0] as char));
	}
	let version = version as u8;

	let decoded = decode(data)?;

	if decoded.len() < C32_CHECKSUM_LENGTH {
		return Err(C32Error::InvalidC32);
	}

	let (bytes, expected_checksum) =
		decoded.split_at(decoded.len() - C32_CHECKSUM_LENGTH);

	let computed_checksum = checksum(version, bytes);

	if computed_checksum != expected_checksum {
		return Err(C32Error::InvalidChecksum(
			computed_checksum,
			expected_checksum.to_vec(),
		));
	}

	Ok((version, bytes.to_vec()))
}

/// Encodes a Stacks address string from a version and hash
pub fn encode_address(version: u8, data: &[u8]) -> Result<String, C32Error> {
	let encoded = version_check_encode(version, data)?;

	// The alphabet is ASCII, so every byte maps to one char
	let encoded: String = encoded.into_iter().map(char::from).collect();

	Ok(format!("S{}", encoded))
}

/// Decodes a Stacks address string into its version and hash
pub fn decode_address(
	address: impl AsRef<str>,
) -> Result<(u8, Vec<u8>), C32Error> {
	let address = address.as_ref();

	if !address.starts_with('S') || address.len() <= 5 {
		return Err(C32Error::InvalidAddress(address.to_string()));
	}

	version_check_decode(&address[1..])
}

#[cfg(test)]
mod tests {
	use rand::{thread_rng, Rng, RngCore};

	#[test]
	fn test_c32_encode() {
		let input = vec![1, 2, 3, 4, 6, 1, 2, 6, 2, 3, 6, 9, 4, 0, 0];
		let encoded = String::from_utf8(super::encode(&input)).unwrap();
		assert_eq!(encoded, "41061060410C0G30R4G8000");
	}

	#[test]
	fn test_c32_decode() {
		let input = vec![1, 2, 3, 4, 6, 1, 2, 6, 2, 3, 6, 9, 4, 0, 0];
		let encoded = String::from_utf8(super::encode(&input)).unwrap();
		let decoded = super::decode(encoded).unwrap();
		assert_eq!(input, decoded);
	}

	#[test]
	fn test_c32_leading_zeroes() {
		let input = vec![0, 0, 1, 2];
		let encoded = super::encode(&input);

		assert!(encoded.starts_with(b"00"));
		assert_eq!(super::decode(encoded).unwrap(), input);
	}

	#[test]
	fn test_c32_rejects_invalid_characters() {
		assert_eq!(super::decode("U"), Err(super::C32Error::InvalidChar('U')));
		assert_eq!(super::decode("é"), Err(super::C32Error::InvalidC32));
	}

	#[test]
	fn test_c32_check_known_address() {
		let hash = hex::decode("a46ff88886c2ef9762d970b4d2c63678835bd39d")
			.unwrap();

		let encoded = super::encode_address(22, &hash).unwrap();

		assert_eq!(encoded, "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7");
		assert_eq!(super::decode_address(&encoded).unwrap(), (22, hash));
	}

	#[test]
	fn test_c32_check_rejects_bad_checksum() {
		let result =
			super::decode_address("SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ8");

		assert!(matches!(result, Err(super::C32Error::InvalidChecksum(..))));
	}

	#[test]
	fn test_c32_rejects_version_out_of_alphabet() {
		assert_eq!(
			super::encode_address(32, &[0; 20]),
			Err(super::C32Error::InvalidAddressVersion(32))
		);
	}

	#[test]
	fn test_c32_randomized_input() {
		let mut rng = thread_rng();

		for _ in 0..10_000 {
			let len = rng.gen_range(1..=40);
			let mut input = vec![0u8; len];
			rng.fill_bytes(&mut input);

			let encoded = super::encode(&input);
			let decoded = super::decode(encoded).unwrap();

			assert_eq!(decoded, input);
		}
	}

	#[test]
	fn test_c32_check_randomized_input() {
		let mut rng = thread_rng();

		for _ in 0..1_000 {
			let versions = [22, 26, 20, 21];
			let bytes = rng.gen::<[u8; 20]>();

			for version in versions.into_iter() {
				let encoded = super::encode_address(version, &bytes).unwrap();
				let (decoded_version, decoded) =
					super::decode_address(encoded).unwrap();

				assert_eq!(decoded, bytes);
				assert_eq!(decoded_version, version);
			}
		}
	}
}
