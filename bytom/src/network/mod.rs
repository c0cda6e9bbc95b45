pub mod mainnet;
pub mod solonet;
pub mod testnet;

use vanity_model::{address::AddressError, network::Network};

pub use self::mainnet::*;
pub use self::solonet::*;
pub use self::testnet::*;

pub trait BytomNetwork: Network {
    /// Human-readable part of segwit addresses on this network.
    const BECH32_HRP: &'static str;

    fn to_address_prefix() -> &'static str {
        Self::BECH32_HRP
    }

    fn from_address_prefix(prefix: &str) -> Result<Self, AddressError>;
}
