use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use vanity_model::{
    address::{Address, AddressError},
    public_key::{PublicKey, PublicKeyError},
};
use std::{fmt::Display, marker::PhantomData, str::FromStr};

use crate::{address::BytomAddress, format::BytomFormat, network::BytomNetwork};

/// A compressed Edwards25519 point, as carried in the first half of an
/// extended public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytomPublicKey<N: BytomNetwork> {
    public_key: [u8; 32],
    _network: PhantomData<N>,
}

impl<N: BytomNetwork> PublicKey for BytomPublicKey<N> {
    type Address = BytomAddress<N>;
    type Format = BytomFormat;

    fn to_address(&self, format: &Self::Format) -> Result<Self::Address, AddressError> {
        Self::Address::from_public_key(self, format)
    }
}

impl<N: BytomNetwork> BytomPublicKey<N> {
    /// Wraps raw key bytes. Only the length is checked here; the point is
    /// decompressed when it takes part in derivation.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PublicKeyError> {
        if bytes.len() != 32 {
            return Err(PublicKeyError::InvalidByteLength(bytes.len()));
        }
        let mut public_key = [0u8; 32];
        public_key.copy_from_slice(bytes);
        Ok(Self::from_bytes(public_key))
    }

    pub fn from_bytes(public_key: [u8; 32]) -> Self {
        Self {
            public_key,
            _network: PhantomData,
        }
    }

    pub fn from_edwards_point(point: &EdwardsPoint) -> Self {
        Self::from_bytes(point.compress().to_bytes())
    }

    pub fn to_edwards_point(&self) -> Result<EdwardsPoint, PublicKeyError> {
        CompressedEdwardsY(self.public_key)
            .decompress()
            .ok_or(PublicKeyError::InvalidPoint)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.public_key
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.public_key
    }
}

impl<N: BytomNetwork> FromStr for BytomPublicKey<N> {
    type Err = PublicKeyError;
    fn from_str(public_key: &str) -> Result<Self, Self::Err> {
        if public_key.len() != 64 {
            return Err(PublicKeyError::InvalidCharacterLength(public_key.len()));
        }
        Self::from_slice(&hex::decode(public_key)?)
    }
}

impl<N: BytomNetwork> Display for BytomPublicKey<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for s in &self.public_key[..] {
            write!(f, "{:02x}", s)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Mainnet;
    use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;

    const BASEPOINT: &str = "5866666666666666666666666666666666666666666666666666666666666666";

    #[test]
    fn basepoint_round_trips() {
        let public_key = BytomPublicKey::<Mainnet>::from_str(BASEPOINT).unwrap();
        assert_eq!(public_key.to_string(), BASEPOINT);
        assert_eq!(public_key.to_edwards_point().unwrap(), ED25519_BASEPOINT_POINT);
        assert_eq!(
            BytomPublicKey::<Mainnet>::from_edwards_point(&ED25519_BASEPOINT_POINT),
            public_key
        );
    }

    #[test]
    fn rejects_wrong_lengths() {
        assert_eq!(
            BytomPublicKey::<Mainnet>::from_slice(&[0u8; 33]),
            Err(PublicKeyError::InvalidByteLength(33))
        );
        assert_eq!(
            BytomPublicKey::<Mainnet>::from_str("5866"),
            Err(PublicKeyError::InvalidCharacterLength(4))
        );
    }

    #[test]
    fn off_curve_point_fails_to_decompress() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0x02;
        let public_key = BytomPublicKey::<Mainnet>::from_bytes(bytes);
        assert_eq!(public_key.to_edwards_point(), Err(PublicKeyError::InvalidPoint));
    }
}
