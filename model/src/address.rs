use crate::format::{Format, FormatError};
use crate::network::NetworkError;
use crate::public_key::{PublicKey, PublicKeyError};

use core::{
    fmt::{Debug, Display},
    hash::Hash,
    str::FromStr,
};

pub trait Address:
    Clone + Debug + Display + FromStr + Send + Sync + 'static + Eq + Ord + Sized + Hash
{
    type Format: Format;
    type PublicKey: PublicKey;

    fn from_public_key(
        public_key: &Self::PublicKey,
        format: &Self::Format,
    ) -> Result<Self, AddressError>;
}

#[derive(Debug, Fail, PartialEq, Eq)]
pub enum AddressError {
    #[fail(display = "{} : {}", _0, _1)]
    Crate(&'static str, String),

    #[fail(display = "invalid address: {}", _0)]
    InvalidAddress(String),

    #[fail(display = "invalid byte length: {}", _0)]
    InvalidByteLength(usize),

    #[fail(display = "invalid character length: {}", _0)]
    InvalidCharacterLength(usize),

    #[fail(display = "invalid key hash length: {}", _0)]
    InvalidHashLength(usize),

    #[fail(display = "invalid address prefix: {}", _0)]
    InvalidPrefix(String),

    #[fail(display = "{}", _0)]
    Message(String),

    #[fail(display = "{}", _0)]
    FormatError(FormatError),

    #[fail(display = "{}", _0)]
    NetworkError(NetworkError),

    #[fail(display = "{}", _0)]
    PublicKeyError(PublicKeyError),
}

impl From<FormatError> for AddressError {
    fn from(error: FormatError) -> Self {
        AddressError::FormatError(error)
    }
}

impl From<NetworkError> for AddressError {
    fn from(error: NetworkError) -> Self {
        AddressError::NetworkError(error)
    }
}

impl From<PublicKeyError> for AddressError {
    fn from(error: PublicKeyError) -> Self {
        AddressError::PublicKeyError(error)
    }
}

impl From<hex::FromHexError> for AddressError {
    fn from(error: hex::FromHexError) -> Self {
        AddressError::Crate("hex", format!("{:?}", error))
    }
}
