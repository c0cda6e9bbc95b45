use core::{
    fmt,
    fmt::{Debug, Display},
    str::FromStr,
};

pub trait DerivationPath:
    Clone + Debug + Display + FromStr + Send + Sync + 'static + Eq + Sized
{
    fn to_vec(&self) -> Result<Vec<ChildIndex>, DerivationPathError>;
    fn from_vec(path: &[ChildIndex]) -> Result<Self, DerivationPathError>;
}

#[derive(Debug, Fail, PartialEq, Eq)]
pub enum DerivationPathError {
    #[fail(display = "expected BIP44 path")]
    ExpectedBIP44Path,
    #[fail(display = "index {} does not fit in a 4-byte path segment", _0)]
    IndexOutOfRange(u64),
    #[fail(display = "invalid child number format")]
    InvalidChildNumberFormat,
    #[fail(display = "invalid derivation path : {}", _0)]
    InvalidDerivationPath(String),
    #[fail(display = "path too deep: {} levels", _0)]
    PathTooDeep(usize),
}

/// A single derivation selector, serialized as 4 little-endian bytes.
///
/// Public-only derivation has no hardened form, so an index is just a number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChildIndex(pub u32);

impl ChildIndex {
    pub fn new(index: u64) -> Result<Self, DerivationPathError> {
        u32::try_from(index)
            .map(ChildIndex)
            .map_err(|_| DerivationPathError::IndexOutOfRange(index))
    }

    pub fn to_index(&self) -> u32 {
        self.0
    }

    pub fn to_le_bytes(&self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    pub fn from_le_bytes(bytes: [u8; 4]) -> Self {
        ChildIndex(u32::from_le_bytes(bytes))
    }

    /// Lowercase hex of the serialized segment, e.g. `2c000000` for 44.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_le_bytes())
    }
}

impl From<u32> for ChildIndex {
    fn from(number: u32) -> Self {
        ChildIndex(number)
    }
}

impl From<ChildIndex> for u32 {
    fn from(index: ChildIndex) -> Self {
        index.0
    }
}

impl FromStr for ChildIndex {
    type Err = DerivationPathError;
    fn from_str(inp: &str) -> Result<Self, Self::Err> {
        let index: u64 = inp
            .parse()
            .map_err(|_| DerivationPathError::InvalidChildNumberFormat)?;
        Self::new(index)
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_serializes_little_endian() {
        assert_eq!(ChildIndex(0x2C).to_le_bytes(), [0x2C, 0, 0, 0]);
        assert_eq!(ChildIndex(0x99).to_hex(), "99000000");
        assert_eq!(ChildIndex(0x0102_0304).to_hex(), "04030201");
        assert_eq!(ChildIndex::from_le_bytes([7, 0, 0, 0]), ChildIndex(7));
    }

    #[test]
    fn index_rejects_values_past_u32() {
        assert_eq!(ChildIndex::new(u32::MAX as u64), Ok(ChildIndex(u32::MAX)));
        assert_eq!(
            ChildIndex::new(1 << 32),
            Err(DerivationPathError::IndexOutOfRange(1 << 32))
        );
    }

    #[test]
    fn index_parses_decimal() {
        assert_eq!("153".parse::<ChildIndex>(), Ok(ChildIndex(153)));
        assert_eq!(
            "44'".parse::<ChildIndex>(),
            Err(DerivationPathError::InvalidChildNumberFormat)
        );
        assert_eq!(
            "4294967296".parse::<ChildIndex>(),
            Err(DerivationPathError::IndexOutOfRange(4294967296))
        );
        assert_eq!(ChildIndex(42).to_string(), "42");
    }
}
