use core::fmt;
use std::str::FromStr;

use serde::Serialize;
use vanity_model::{
    address::AddressError,
    network::{Network, NetworkError},
};

use crate::network::BytomNetwork;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Solonet;

impl Network for Solonet {
    const NAME: &'static str = "solonet";
}

impl BytomNetwork for Solonet {
    const BECH32_HRP: &'static str = "sn";

    fn from_address_prefix(prefix: &str) -> Result<Self, AddressError> {
        match prefix {
            Self::BECH32_HRP => Ok(Self),
            _ => Err(AddressError::InvalidPrefix(prefix.into())),
        }
    }
}

impl FromStr for Solonet {
    type Err = NetworkError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::NAME => Ok(Self),
            _ => Err(NetworkError::InvalidNetwork(s.into())),
        }
    }
}

impl fmt::Display for Solonet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::NAME)
    }
}
