use crate::address::{Address, AddressError};
use crate::derivation_path::{DerivationPath, DerivationPathError};
use crate::format::Format;
use crate::public_key::{PublicKey, PublicKeyError};

use core::{
    fmt::{Debug, Display},
    str::FromStr,
};

pub trait ExtendedPublicKey:
    Clone + Debug + Display + FromStr + Send + Sync + 'static + Eq + Sized
{
    type Address: Address;
    type DerivationPath: DerivationPath;
    type Format: Format;
    type PublicKey: PublicKey;

    /// Applies every segment of `path` in order, as public child derivations.
    fn derive(&self, path: &Self::DerivationPath) -> Result<Self, ExtendedPublicKeyError>;

    fn to_public_key(&self) -> Self::PublicKey;

    fn to_address(&self, format: &Self::Format) -> Result<Self::Address, AddressError>;
}

#[derive(Debug, Fail, PartialEq, Eq)]
pub enum ExtendedPublicKeyError {
    #[fail(display = "{} : {}", _0, _1)]
    Crate(&'static str, String),

    #[fail(display = "{}", _0)]
    DerivationPathError(DerivationPathError),

    #[fail(display = "derived child key is the identity point")]
    DegenerateChild,

    #[fail(display = "invalid byte length: {}", _0)]
    InvalidByteLength(usize),

    #[fail(display = "bad length of pubkey key string: {}", _0)]
    InvalidCharacterLength(usize),

    #[fail(display = "{}", _0)]
    PublicKeyError(PublicKeyError),
}

impl ExtendedPublicKeyError {
    /// Whether the error comes from the curve arithmetic of a single child
    /// derivation rather than from malformed input.
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            ExtendedPublicKeyError::DegenerateChild
                | ExtendedPublicKeyError::PublicKeyError(PublicKeyError::InvalidPoint)
        )
    }
}

impl From<DerivationPathError> for ExtendedPublicKeyError {
    fn from(error: DerivationPathError) -> Self {
        ExtendedPublicKeyError::DerivationPathError(error)
    }
}

impl From<PublicKeyError> for ExtendedPublicKeyError {
    fn from(error: PublicKeyError) -> Self {
        ExtendedPublicKeyError::PublicKeyError(error)
    }
}

impl From<hex::FromHexError> for ExtendedPublicKeyError {
    fn from(error: hex::FromHexError) -> Self {
        ExtendedPublicKeyError::Crate("hex", format!("{:?}", error))
    }
}

impl From<crypto_mac::InvalidKeyLength> for ExtendedPublicKeyError {
    fn from(error: crypto_mac::InvalidKeyLength) -> Self {
        ExtendedPublicKeyError::Crate("crypto-mac", format!("{:?}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_curve_failures_are_degenerate() {
        assert!(ExtendedPublicKeyError::DegenerateChild.is_degenerate());
        let invalid_point = ExtendedPublicKeyError::PublicKeyError(PublicKeyError::InvalidPoint);
        assert!(invalid_point.is_degenerate());

        assert!(!ExtendedPublicKeyError::InvalidByteLength(63).is_degenerate());
        assert!(!ExtendedPublicKeyError::InvalidCharacterLength(126).is_degenerate());
        assert!(!ExtendedPublicKeyError::PublicKeyError(PublicKeyError::InvalidByteLength(31))
            .is_degenerate());
        assert!(!ExtendedPublicKeyError::DerivationPathError(
            DerivationPathError::IndexOutOfRange(1 << 32)
        )
        .is_degenerate());
        assert!(!ExtendedPublicKeyError::Crate("hex", "bad".into()).is_degenerate());
    }
}
