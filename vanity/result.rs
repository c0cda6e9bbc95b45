use std::fmt;

use bytom::BytomDerivationPath;
use serde::{Serialize, Serializer};

/// One address that ends with the requested suffix, with the indices and
/// path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub address: String,
    pub account: u32,
    pub address_index: u32,
    pub path: BytomDerivationPath,
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: accountIdx {}, addressIdx: {}, path: [{}]",
            self.address,
            self.account,
            self.address_index,
            self.path.to_hex_segments().join(" ")
        )
    }
}

#[derive(Serialize)]
struct ResultRecord<'a> {
    address: &'a str,
    account_index: u32,
    address_index: u32,
    path: Vec<String>,
}

impl Serialize for SearchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ResultRecord {
            address: &self.address,
            account_index: self.account,
            address_index: self.address_index,
            path: self.path.to_hex_segments(),
        }
        .serialize(serializer)
    }
}
