use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vanity_model::format::{Format, FormatError};

use crate::network::BytomNetwork;

/// How a public key is turned into a witness key-hash address.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[allow(non_camel_case_types)]
pub enum BytomFormat {
    /// Witness v0 key hash, RIPEMD-160 over SHA-256 of the key.
    #[default]
    #[serde(rename = "p2wpkh")]
    P2WPKH,
    /// Witness v0 key hash, a single RIPEMD-160 pass over the key.
    #[serde(rename = "p2wpkh_ripemd160")]
    P2WPKH_RIPEMD160,
}

impl Format for BytomFormat {}

impl BytomFormat {
    pub fn to_address_prefix<N: BytomNetwork>(&self) -> &'static str {
        N::to_address_prefix()
    }

    /// Hashes a serialized public key into the 20-byte witness program.
    pub fn key_hash(&self, public_key: &[u8]) -> [u8; 20] {
        match self {
            BytomFormat::P2WPKH => vanity_model::utilities::crypto::hash160(public_key),
            BytomFormat::P2WPKH_RIPEMD160 => vanity_model::utilities::crypto::ripemd160(public_key),
        }
    }
}

impl FromStr for BytomFormat {
    type Err = FormatError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "p2wpkh" => Ok(BytomFormat::P2WPKH),
            "p2wpkh_ripemd160" => Ok(BytomFormat::P2WPKH_RIPEMD160),
            _ => Err(FormatError::UnsupportedFormat(s.into())),
        }
    }
}

impl fmt::Display for BytomFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BytomFormat::P2WPKH => write!(f, "p2wpkh"),
            BytomFormat::P2WPKH_RIPEMD160 => write!(f, "p2wpkh_ripemd160"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{Mainnet, Testnet};

    #[test]
    fn format_names_round_trip() {
        for format in [BytomFormat::P2WPKH, BytomFormat::P2WPKH_RIPEMD160] {
            assert_eq!(format.to_string().parse::<BytomFormat>(), Ok(format));
        }
        assert!("bech32m".parse::<BytomFormat>().is_err());
    }

    #[test]
    fn format_serializes_as_its_name() {
        let json = serde_json::to_string(&BytomFormat::P2WPKH_RIPEMD160).unwrap();
        assert_eq!(json, "\"p2wpkh_ripemd160\"");
        let format: BytomFormat = serde_json::from_str("\"p2wpkh\"").unwrap();
        assert_eq!(format, BytomFormat::P2WPKH);
    }

    #[test]
    fn prefix_follows_network() {
        assert_eq!(BytomFormat::P2WPKH.to_address_prefix::<Mainnet>(), "bn");
        assert_eq!(BytomFormat::P2WPKH.to_address_prefix::<Testnet>(), "tn");
    }

    #[test]
    fn key_hash_depends_on_format() {
        let key = [0x11u8; 32];
        assert_ne!(
            BytomFormat::P2WPKH.key_hash(&key),
            BytomFormat::P2WPKH_RIPEMD160.key_hash(&key)
        );
    }
}
