use failure::Fail;
use vanity_model::{
    address::AddressError, derivation_path::DerivationPathError,
    extended_public_key::ExtendedPublicKeyError,
};

#[derive(Debug, Fail)]
pub enum SearchError {
    /// The extended key string could not be parsed. Raised once, before
    /// any candidate is evaluated.
    #[fail(display = "{}", _0)]
    BadKeyFormat(ExtendedPublicKeyError),

    #[fail(display = "{}", _0)]
    IndexRange(DerivationPathError),

    #[fail(display = "address encoding failed: {}", _0)]
    Encoding(AddressError),

    #[fail(display = "derivation failed: {}", _0)]
    Derivation(ExtendedPublicKeyError),

    #[fail(display = "invalid index space: {}", _0)]
    InvalidSpace(String),

    #[fail(display = "failed to write match: {}", _0)]
    Output(String),

    #[fail(display = "{} : {}", _0, _1)]
    Crate(&'static str, String),
}

impl From<DerivationPathError> for SearchError {
    fn from(error: DerivationPathError) -> Self {
        SearchError::IndexRange(error)
    }
}

impl From<AddressError> for SearchError {
    fn from(error: AddressError) -> Self {
        SearchError::Encoding(error)
    }
}

impl From<std::io::Error> for SearchError {
    fn from(error: std::io::Error) -> Self {
        SearchError::Output(error.to_string())
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(error: serde_json::Error) -> Self {
        SearchError::Crate("serde_json", format!("{:?}", error))
    }
}

impl From<rayon::ThreadPoolBuildError> for SearchError {
    fn from(error: rayon::ThreadPoolBuildError) -> Self {
        SearchError::Crate("rayon", error.to_string())
    }
}

#[derive(Debug, Fail)]
pub enum ConfigError {
    #[fail(display = "{} : {}", _0, _1)]
    Crate(&'static str, String),

    #[fail(display = "invalid {} range: {}..{}", _0, _1, _2)]
    InvalidRange(&'static str, u64, u64),

    #[fail(display = "invalid suffix {:?}: {}", _0, _1)]
    InvalidSuffix(String, &'static str),

    #[fail(display = "missing required setting: {}", _0)]
    MissingSetting(&'static str),

    #[fail(display = "unknown network: {}", _0)]
    UnknownNetwork(String),
}

impl From<ext_config::ConfigError> for ConfigError {
    fn from(error: ext_config::ConfigError) -> Self {
        ConfigError::Crate("config", error.to_string())
    }
}
