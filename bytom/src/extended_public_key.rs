use std::{fmt, str::FromStr};

use curve25519_dalek::{edwards::EdwardsPoint, scalar::Scalar, traits::IsIdentity};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use vanity_model::{
    address::AddressError,
    derivation_path::{ChildIndex, DerivationPath},
    extended_public_key::{ExtendedPublicKey, ExtendedPublicKeyError},
    public_key::PublicKey,
};

use crate::{
    address::BytomAddress, derivation_path::BytomDerivationPath, format::BytomFormat,
    network::BytomNetwork, public_key::BytomPublicKey,
};

type HmacSha512 = Hmac<Sha512>;

/// Domain tag prepended to the HMAC input of a non-hardened child derivation.
const NON_HARDENED_TAG: &[u8] = b"N";

/// A 64-byte ChainKD extended public key: a compressed Edwards25519 point
/// followed by a 32-byte chain code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytomExtendedPublicKey<N: BytomNetwork> {
    depth: u8,
    chain_code: [u8; 32],
    public_key: BytomPublicKey<N>,
}

impl<N: BytomNetwork> ExtendedPublicKey for BytomExtendedPublicKey<N> {
    type Address = BytomAddress<N>;
    type DerivationPath = BytomDerivationPath;
    type Format = BytomFormat;
    type PublicKey = BytomPublicKey<N>;

    fn derive(&self, path: &Self::DerivationPath) -> Result<Self, ExtendedPublicKeyError> {
        let mut extended_public_key = self.clone();
        for index in path.to_vec()?.into_iter() {
            extended_public_key = extended_public_key.derive_child(index)?;
        }
        Ok(extended_public_key)
    }

    fn to_public_key(&self) -> Self::PublicKey {
        self.public_key.clone()
    }

    fn to_address(&self, format: &Self::Format) -> Result<Self::Address, AddressError> {
        self.public_key.to_address(format)
    }
}

impl<N: BytomNetwork> BytomExtendedPublicKey<N> {
    /// Splits 64 raw bytes into point and chain code. Fails if the point
    /// does not decompress, since no child could ever be derived from it.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ExtendedPublicKeyError> {
        if data.len() != 64 {
            return Err(ExtendedPublicKeyError::InvalidByteLength(data.len()));
        }

        let public_key = BytomPublicKey::from_slice(&data[0..32])?;
        let _ = public_key.to_edwards_point()?;

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&data[32..64]);

        Ok(Self {
            depth: 0,
            chain_code,
            public_key,
        })
    }

    /// Derives one non-hardened child.
    ///
    /// `f = HMAC-SHA512(chain_code, "N" || point || le32(index))`. The left
    /// half is pruned into a small scalar and `f·B` is added to the parent
    /// point; the right half is the child chain code.
    pub fn derive_child(&self, index: ChildIndex) -> Result<Self, ExtendedPublicKeyError> {
        let mut mac = HmacSha512::new_varkey(&self.chain_code)?;
        mac.input(NON_HARDENED_TAG);
        mac.input(self.public_key.as_bytes());
        mac.input(&index.to_le_bytes());
        let hmac = mac.result().code();

        let mut tweak = [0u8; 32];
        tweak.copy_from_slice(&hmac[..32]);
        prune_intermediate_scalar(&mut tweak);

        let parent = self.public_key.to_edwards_point()?;
        let child = parent + EdwardsPoint::mul_base(&Scalar::from_bytes_mod_order(tweak));
        if child.is_identity() {
            return Err(ExtendedPublicKeyError::DegenerateChild);
        }

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&hmac[32..]);

        Ok(Self {
            depth: self.depth.saturating_add(1),
            chain_code,
            public_key: BytomPublicKey::from_edwards_point(&child),
        })
    }

    /// Applies a sequence of child indices in order.
    pub fn derive_indices(&self, indices: &[ChildIndex]) -> Result<Self, ExtendedPublicKeyError> {
        indices
            .iter()
            .try_fold(self.clone(), |key, index| key.derive_child(*index))
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn chain_code(&self) -> [u8; 32] {
        self.chain_code
    }

    pub fn to_bytes(&self) -> [u8; 64] {
        let mut data = [0u8; 64];
        data[0..32].copy_from_slice(self.public_key.as_bytes());
        data[32..64].copy_from_slice(&self.chain_code);
        data
    }
}

/// Clears the low 3 bits and everything above bit 232, keeping the tweak far
/// below the group order.
fn prune_intermediate_scalar(f: &mut [u8; 32]) {
    f[0] &= 248;
    f[29] &= 1;
    f[30] = 0;
    f[31] = 0;
}

impl<N: BytomNetwork> FromStr for BytomExtendedPublicKey<N> {
    type Err = ExtendedPublicKeyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 128 {
            return Err(ExtendedPublicKeyError::InvalidCharacterLength(s.len()));
        }
        Self::from_bytes(&hex::decode(s)?)
    }
}

impl<N: BytomNetwork> fmt::Display for BytomExtendedPublicKey<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes()))
    }
}
