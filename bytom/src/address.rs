use bech32::{Bech32, FromBase32};
use vanity_model::address::{Address, AddressError};

use crate::{
    format::BytomFormat, network::BytomNetwork, public_key::BytomPublicKey,
    witness_program::WitnessProgram,
};

use std::{fmt::Display, marker::PhantomData, str::FromStr};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BytomAddress<N: BytomNetwork> {
    address: String,
    format: BytomFormat,
    _network: PhantomData<N>,
}

impl<N: BytomNetwork> Address for BytomAddress<N> {
    type Format = BytomFormat;
    type PublicKey = BytomPublicKey<N>;

    fn from_public_key(
        public_key: &Self::PublicKey,
        format: &Self::Format,
    ) -> Result<Self, AddressError> {
        Self::p2wpkh(public_key, format)
    }
}

impl<N: BytomNetwork> BytomAddress<N> {
    /// Returns a witness v0 key-hash address for a public key.
    pub fn p2wpkh(
        public_key: &<Self as Address>::PublicKey,
        format: &BytomFormat,
    ) -> Result<Self, AddressError> {
        let key_hash = format.key_hash(public_key.as_bytes());
        Self::from_key_hash(&key_hash, format)
    }

    /// Encodes raw public key bytes. Anything other than a 32-byte key is
    /// rejected before hashing.
    pub fn from_public_key_bytes(bytes: &[u8], format: &BytomFormat) -> Result<Self, AddressError> {
        Self::p2wpkh(&BytomPublicKey::from_slice(bytes)?, format)
    }

    /// Wraps a 20-byte key hash in a witness program and bech32-encodes it.
    pub fn from_key_hash(key_hash: &[u8], format: &BytomFormat) -> Result<Self, AddressError> {
        debug_assert_eq!(key_hash.len(), 20, "key hash must be 20 bytes");
        if key_hash.len() != 20 {
            return Err(AddressError::InvalidHashLength(key_hash.len()));
        }
        let mut hash = [0u8; 20];
        hash.copy_from_slice(key_hash);

        let data = WitnessProgram::p2wpkh(&hash).to_base32()?;
        let bech32 = Bech32::new(String::from(N::to_address_prefix()), data)
            .map_err(|error| AddressError::Crate("bech32", format!("{:?}", error)))?;

        Ok(Self {
            address: bech32.to_string(),
            format: format.clone(),
            _network: PhantomData,
        })
    }

    /// Returns the format of the address.
    pub fn format(&self) -> BytomFormat {
        self.format.clone()
    }

    /// Decodes the witness program carried by the address.
    pub fn to_witness_program(&self) -> Result<WitnessProgram, AddressError> {
        let bech32 = Bech32::from_str(&self.address)
            .map_err(|error| AddressError::Crate("bech32", format!("{:?}", error)))?;
        Self::witness_program(&bech32)
    }

    pub fn as_str(&self) -> &str {
        &self.address
    }

    fn witness_program(bech32: &Bech32) -> Result<WitnessProgram, AddressError> {
        let data = bech32.data();
        if data.is_empty() {
            return Err(AddressError::InvalidAddress(bech32.to_string()));
        }

        let version = data[0].to_u8();
        let mut program = Vec::from_base32(&data[1..])
            .map_err(|error| AddressError::Crate("bech32", format!("{:?}", error)))?;
        let mut data = vec![version, program.len() as u8];
        data.append(&mut program);

        Ok(WitnessProgram::new(data.as_slice())?)
    }
}

impl<'a, N: BytomNetwork> TryFrom<&'a str> for BytomAddress<N> {
    type Error = AddressError;
    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}

impl<N: BytomNetwork> FromStr for BytomAddress<N> {
    type Err = AddressError;

    /// Parses a key-hash address. The single-pass and two-pass key hashes
    /// cannot be told apart on the wire, so the format is reported as the
    /// default one.
    fn from_str(address: &str) -> Result<Self, Self::Err> {
        if address.len() < 14 || address.len() > 74 {
            return Err(AddressError::InvalidCharacterLength(address.len()));
        }

        let bech32 = Bech32::from_str(address)
            .map_err(|error| AddressError::Crate("bech32", format!("{:?}", error)))?;
        let _ = N::from_address_prefix(bech32.hrp())?;

        let program = Self::witness_program(&bech32)?;
        if program.version != 0 || program.program.len() != 20 {
            return Err(AddressError::InvalidAddress(address.to_owned()));
        }

        Ok(Self {
            address: address.to_owned(),
            format: BytomFormat::P2WPKH,
            _network: PhantomData,
        })
    }
}

impl<N: BytomNetwork> Display for BytomAddress<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{Mainnet, Solonet, Testnet};
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;
    use std::collections::HashSet;

    // Key derived at m/44/153/1/0/1 from the extended key used in the
    // extended_public_key tests.
    const PUBLIC_KEY: &str = "bb22049f8c92ee210f73a8b3c7dbedfefa242dad60ee1487296519379978da0c";

    fn public_key<N: BytomNetwork>() -> BytomPublicKey<N> {
        BytomPublicKey::from_str(PUBLIC_KEY).unwrap()
    }

    #[test]
    fn testnet_address_golden_value() {
        let address = BytomAddress::<Testnet>::p2wpkh(&public_key(), &BytomFormat::P2WPKH).unwrap();
        assert_eq!(address.to_string(), "tn1qczyc9gn76wlxkevse8ehj32l8hzp5wjrzn9ehk");
    }

    #[test]
    fn mainnet_address_golden_value() {
        let address = BytomAddress::<Mainnet>::p2wpkh(&public_key(), &BytomFormat::P2WPKH).unwrap();
        assert_eq!(address.to_string(), "bn1qczyc9gn76wlxkevse8ehj32l8hzp5wjrx9yah8");
    }

    #[test]
    fn single_pass_hash_golden_value() {
        let address =
            BytomAddress::<Testnet>::p2wpkh(&public_key(), &BytomFormat::P2WPKH_RIPEMD160).unwrap();
        assert_eq!(address.to_string(), "tn1qmqxfgyexd8cv93ehmj97n3nmkx8xdpzg354fe4");
        assert_eq!(address.format(), BytomFormat::P2WPKH_RIPEMD160);
    }

    #[test]
    fn key_hash_matches_reference_bech32_vector() {
        let hash = hex::decode("751e76e8199196d454941c45d1b3a323f1433bd6").unwrap();
        let address = BytomAddress::<Solonet>::from_key_hash(&hash, &BytomFormat::P2WPKH).unwrap();
        assert!(address.to_string().starts_with("sn1q"));
        let program = address.to_witness_program().unwrap();
        assert_eq!(program.program, hash);
        assert_eq!(
            hex::encode(program.to_control_program()),
            "0014751e76e8199196d454941c45d1b3a323f1433bd6"
        );
    }

    #[test]
    fn encoding_is_deterministic() {
        let first = BytomAddress::<Mainnet>::from_public_key(&public_key(), &BytomFormat::P2WPKH);
        let second = BytomAddress::<Mainnet>::from_public_key(&public_key(), &BytomFormat::P2WPKH);
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_wrong_public_key_length() {
        let result =
            BytomAddress::<Mainnet>::from_public_key_bytes(&[1u8; 33], &BytomFormat::P2WPKH);
        assert_eq!(
            result,
            Err(AddressError::PublicKeyError(
                vanity_model::public_key::PublicKeyError::InvalidByteLength(33)
            ))
        );
    }

    #[test]
    fn distinct_keys_give_distinct_addresses() {
        let mut rng = XorShiftRng::seed_from_u64(1231275789u64);
        let mut seen = HashSet::new();
        for _ in 0..4096 {
            let bytes: [u8; 32] = rng.gen();
            let address =
                BytomAddress::<Mainnet>::from_public_key_bytes(&bytes, &BytomFormat::P2WPKH);
            let address = address.unwrap();
            assert!(seen.insert(address.to_string()));
        }
    }

    #[test]
    fn parses_its_own_output() {
        let address = BytomAddress::<Testnet>::p2wpkh(&public_key(), &BytomFormat::P2WPKH).unwrap();
        let parsed = BytomAddress::<Testnet>::from_str(&address.to_string()).unwrap();
        assert_eq!(parsed, address);
        assert_eq!(
            BytomAddress::<Testnet>::try_from("tn1qczyc9gn76wlxkevse8ehj32l8hzp5wjrzn9ehk")
                .unwrap(),
            address
        );
    }

    #[test]
    fn parse_checks_network_and_checksum() {
        assert_eq!(
            BytomAddress::<Mainnet>::from_str("tn1qczyc9gn76wlxkevse8ehj32l8hzp5wjrzn9ehk"),
            Err(AddressError::InvalidPrefix("tn".into()))
        );
        let bad_checksum = "tn1qczyc9gn76wlxkevse8ehj32l8hzp5wjrzn9ehq";
        assert!(BytomAddress::<Testnet>::from_str(bad_checksum).is_err());
        assert_eq!(
            BytomAddress::<Testnet>::from_str("tn1q"),
            Err(AddressError::InvalidCharacterLength(4))
        );
    }
}
