use core::fmt;
use std::str::FromStr;

use serde::Serialize;
use vanity_model::{
    address::AddressError,
    network::{Network, NetworkError},
};

use crate::network::BytomNetwork;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Mainnet;

impl Network for Mainnet {
    const NAME: &'static str = "mainnet";
}

impl BytomNetwork for Mainnet {
    const BECH32_HRP: &'static str = "bn";

    fn from_address_prefix(prefix: &str) -> Result<Self, AddressError> {
        match prefix {
            Self::BECH32_HRP => Ok(Self),
            _ => Err(AddressError::InvalidPrefix(prefix.into())),
        }
    }
}

impl FromStr for Mainnet {
    type Err = NetworkError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::NAME => Ok(Self),
            _ => Err(NetworkError::InvalidNetwork(s.into())),
        }
    }
}

impl fmt::Display for Mainnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::NAME)
    }
}
