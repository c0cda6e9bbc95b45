use vanity_model::derivation_path::{ChildIndex, DerivationPath, DerivationPathError};

use core::{fmt, str::FromStr};

/// Represents a Bytom derivation path
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum BytomDerivationPath {
    /// Free-form path, every segment applied as a public child derivation.
    BIP32(Vec<ChildIndex>),
    /// BIP44 - m/44/153/{account}/0/{index}
    /// https://github.com/bitcoin/bips/blob/master/bip-0044.mediawiki
    BIP44 {
        account: ChildIndex,
        address_index: ChildIndex,
    },
}

impl BytomDerivationPath {
    pub const PURPOSE: ChildIndex = ChildIndex(0x2C);
    pub const COIN_TYPE: ChildIndex = ChildIndex(0x99);
    pub const CHANGE: ChildIndex = ChildIndex(0);

    /// Builds `m/44/153/{account}/0/{address_index}`. Indices that do not fit
    /// the 4-byte segment are rejected rather than truncated.
    pub fn bip44(account: u64, address_index: u64) -> Result<Self, DerivationPathError> {
        Ok(BytomDerivationPath::BIP44 {
            account: ChildIndex::new(account)?,
            address_index: ChildIndex::new(address_index)?,
        })
    }

    /// The path shared by every address of an account, `m/44/153/{account}/0`.
    pub fn branch(account: ChildIndex) -> [ChildIndex; 4] {
        [Self::PURPOSE, Self::COIN_TYPE, account, Self::CHANGE]
    }

    /// Each segment as the 4 little-endian bytes fed to derivation.
    pub fn segments(&self) -> Vec<[u8; 4]> {
        self.indices().iter().map(ChildIndex::to_le_bytes).collect()
    }

    /// Each segment rendered as lowercase hex, e.g. `2c000000`.
    pub fn to_hex_segments(&self) -> Vec<String> {
        self.indices().iter().map(ChildIndex::to_hex).collect()
    }

    pub fn account(&self) -> Option<ChildIndex> {
        match self {
            BytomDerivationPath::BIP44 { account, .. } => Some(*account),
            BytomDerivationPath::BIP32(_) => None,
        }
    }

    pub fn address_index(&self) -> Option<ChildIndex> {
        match self {
            BytomDerivationPath::BIP44 { address_index, .. } => Some(*address_index),
            BytomDerivationPath::BIP32(_) => None,
        }
    }

    fn indices(&self) -> Vec<ChildIndex> {
        match self {
            BytomDerivationPath::BIP32(path) => path.clone(),
            BytomDerivationPath::BIP44 {
                account,
                address_index,
            } => {
                let mut path = Self::branch(*account).to_vec();
                path.push(*address_index);
                path
            }
        }
    }
}

impl DerivationPath for BytomDerivationPath {
    /// Returns a child index vector given the derivation path.
    fn to_vec(&self) -> Result<Vec<ChildIndex>, DerivationPathError> {
        match self {
            BytomDerivationPath::BIP32(path) => match path.len() < 256 {
                true => Ok(path.clone()),
                false => Err(DerivationPathError::PathTooDeep(path.len())),
            },
            BytomDerivationPath::BIP44 { .. } => Ok(self.indices()),
        }
    }

    /// Returns a derivation path given the child index vector.
    fn from_vec(path: &[ChildIndex]) -> Result<Self, DerivationPathError> {
        if path.len() >= 256 {
            return Err(DerivationPathError::PathTooDeep(path.len()));
        }
        if path.len() == 5
            && path[0] == Self::PURPOSE
            && path[1] == Self::COIN_TYPE
            && path[3] == Self::CHANGE
        {
            return Ok(BytomDerivationPath::BIP44 {
                account: path[2],
                address_index: path[4],
            });
        }
        Ok(BytomDerivationPath::BIP32(path.to_vec()))
    }
}

impl FromStr for BytomDerivationPath {
    type Err = DerivationPathError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let mut parts = path.split('/');

        if parts.next() != Some("m") {
            return Err(DerivationPathError::InvalidDerivationPath(path.to_string()));
        }

        let path: Result<Vec<ChildIndex>, Self::Err> = parts.map(str::parse).collect();
        Self::from_vec(&path?)
    }
}

impl TryFrom<Vec<ChildIndex>> for BytomDerivationPath {
    type Error = DerivationPathError;

    fn try_from(path: Vec<ChildIndex>) -> Result<Self, Self::Error> {
        Self::from_vec(&path)
    }
}

impl<'a> TryFrom<&'a [ChildIndex]> for BytomDerivationPath {
    type Error = DerivationPathError;

    fn try_from(path: &'a [ChildIndex]) -> Result<Self, Self::Error> {
        Self::from_vec(path)
    }
}

impl fmt::Debug for BytomDerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self, f)
    }
}

impl fmt::Display for BytomDerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("m")?;
        for index in self.indices().iter() {
            f.write_str("/")?;
            fmt::Display::fmt(index, f)?;
        }
        Ok(())
    }
}
