use core::{
    fmt::{Debug, Display},
    hash::Hash,
    str::FromStr,
};

/// A chain's network parameters, fixed at the type level so that nothing
/// downstream reads them from global state.
pub trait Network:
    Copy + Clone + Debug + Display + FromStr + Send + Sync + 'static + Eq + Ord + Sized + Hash
{
    const NAME: &'static str;
}

#[derive(Debug, Fail, PartialEq, Eq)]
pub enum NetworkError {
    #[fail(display = "invalid network: {}", _0)]
    InvalidNetwork(String),
}
