//! HMAC-based One-time Password generation as per RFC 4226.

use std::convert::TryFrom;
use std::fmt;

use byteorder::{BigEndian, ByteOrder};
use openssl::pkey::PKey;
use openssl::sign::Signer;

use crate::algorithm::Algorithm;
use crate::error::{Error, Result};

const MIN_DIGITS: u8 = 6;
const MAX_DIGITS: u8 = 8;
const DEFAULT_DIGITS: u8 = 6;

// Shortest HMAC output (SHA-1); the largest truncation offset 15 plus 4 bytes fits in it.
const MIN_DIGEST_LEN: usize = 20;

/// Number of decimal digits in a generated code, always within `6..=8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digits(u8);

impl Digits {
    pub fn new(digits: u8) -> Result<Self> {
        if (MIN_DIGITS..=MAX_DIGITS).contains(&digits) {
            Ok(Digits(digits))
        } else {
            Err(Error::InvalidDigitCount(digits))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    fn modulus(self) -> u32 {
        10_u32.pow(u32::from(self.0))
    }
}

impl Default for Digits {
    fn default() -> Self {
        Digits(DEFAULT_DIGITS)
    }
}

impl TryFrom<u8> for Digits {
    type Error = Error;

    fn try_from(digits: u8) -> Result<Self> {
        Digits::new(digits)
    }
}

/// A generated one-time code: exactly `digits` decimal characters,
/// left-padded with zeros.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Code {
    value: u32,
    text: String,
}

impl Code {
    fn new(value: u32, digits: Digits) -> Self {
        let text = format!("{:0width$}", value, width = usize::from(digits.get()));
        Code { value, text }
    }

    /// Numeric value of the code, without the padding.
    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for Code {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl PartialEq<str> for Code {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl<'a> PartialEq<&'a str> for Code {
    fn eq(&self, other: &&'a str) -> bool {
        self.text == *other
    }
}

/// Calculates the HMAC digest for the given secret and counter.
fn calc_digest(secret: &[u8], algorithm: Algorithm, counter: u64) -> Result<Vec<u8>> {
    let mut message = [0u8; 8];
    BigEndian::write_u64(&mut message, counter);
    let key = PKey::hmac(secret)?;
    let mut signer = Signer::new(algorithm.message_digest(), &key)?;
    signer.update(&message)?;
    Ok(signer.sign_to_vec()?)
}

/// Dynamic truncation (RFC 4226, section 5.3): selects four bytes of the
/// digest at the offset named by its last nibble and clears the top bit.
pub fn truncate(digest: &[u8]) -> Result<u32> {
    let last = match digest.last() {
        Some(last) if digest.len() >= MIN_DIGEST_LEN => *last,
        _ => return Err(Error::DigestTooShort(digest.len())),
    };
    let offset = usize::from(last & 0xf);
    Ok(BigEndian::read_u32(&digest[offset..offset + 4]) & 0x7fff_ffff)
}

/// Performs the [HMAC-based One-time Password Algorithm](http://en.wikipedia.org/wiki/HMAC-based_One-time_Password_Algorithm)
/// (HOTP) for a raw secret and counter.
///
/// The key must not be empty: a zero-length secret yields `Error::EmptySecret`
/// instead of a code, matching the check `Totp` applies at construction.
///
/// ```rust
/// use otpgen::{generate_otp, Algorithm, Digits};
///
/// let code = generate_otp(b"12345678901234567890", Algorithm::Sha1, 1, Digits::default()).unwrap();
/// assert_eq!(code, "287082");
/// ```
pub fn generate_otp(
    secret: &[u8],
    algorithm: Algorithm,
    counter: u64,
    digits: Digits,
) -> Result<Code> {
    if secret.is_empty() {
        return Err(Error::EmptySecret);
    }
    let binary = truncate(&calc_digest(secret, algorithm, counter)?)?;
    Ok(Code::new(binary % digits.modulus(), digits))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"12345678901234567890";

    #[test]
    fn digest_uses_big_endian_counter() {
        assert_eq!(
            calc_digest(SECRET, Algorithm::Sha1, 0).unwrap(),
            hex::decode("cc93cf18508d94934c64b65d8ba7667fb7cde4b0").unwrap()
        );
        assert_eq!(
            calc_digest(SECRET, Algorithm::Sha1, 1).unwrap(),
            hex::decode("75a48a19d4cbe100644e8ac1397eea747a2d33ab").unwrap()
        );
    }

    #[test]
    fn digest_lengths() {
        for alg in &[Algorithm::Sha1, Algorithm::Sha256, Algorithm::Sha512] {
            assert_eq!(calc_digest(SECRET, *alg, 7).unwrap().len(), alg.output_len());
        }
    }

    #[test]
    fn truncate_rfc_example() {
        let digest = hex::decode("1f8698690e02ca16618550ef7f19da8e945b555a").unwrap();
        assert_eq!(truncate(&digest).unwrap(), 0x50ef7f19);
        assert_eq!(truncate(&digest).unwrap() % 1_000_000, 872921);
    }

    #[test]
    fn truncate_masks_sign_bit() {
        let mut digest = [0xffu8; 20];
        digest[19] = 0xf0;
        assert_eq!(truncate(&digest).unwrap(), 0x7fff_ffff);
    }

    #[test]
    fn truncate_max_offset() {
        let mut digest = [0u8; 20];
        digest[15..19].copy_from_slice(&[0x01, 0x02, 0x03, 0x04]);
        digest[19] = 0x0f;
        assert_eq!(truncate(&digest).unwrap(), 0x0102_0304);
    }

    #[test]
    fn truncate_short_digest() {
        assert!(matches!(truncate(&[]), Err(Error::DigestTooShort(0))));
        assert!(matches!(truncate(&[0; 19]), Err(Error::DigestTooShort(19))));
    }

    #[test]
    fn digits_range() {
        for n in 0..=u8::max_value() {
            let valid = (6..=8).contains(&n);
            assert_eq!(Digits::new(n).is_ok(), valid, "digits {}", n);
        }
        assert_eq!(Digits::default().get(), 6);
        assert!(matches!(Digits::try_from(9), Err(Error::InvalidDigitCount(9))));
    }

    #[test]
    fn code_is_zero_padded() {
        let code = Code::new(42, Digits::new(6).unwrap());
        assert_eq!(code, "000042");
        assert_eq!(code.value(), 42);
        assert_eq!(Code::new(0, Digits::new(8).unwrap()).to_string(), "00000000");
    }

    #[test]
    fn hotp() {
        let expected = [
            "755224", "287082", "359152", "969429", "338314", "254676", "287922", "162583",
            "399871", "520489",
        ];
        for (counter, code) in expected.iter().enumerate() {
            let generated =
                generate_otp(SECRET, Algorithm::Sha1, counter as u64, Digits::default()).unwrap();
            assert_eq!(generated, *code);
        }
    }

    #[test]
    fn empty_secret() {
        assert!(matches!(
            generate_otp(b"", Algorithm::Sha1, 0, Digits::default()),
            Err(Error::EmptySecret)
        ));
    }
}
