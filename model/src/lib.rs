#[macro_use]
extern crate failure;

pub mod derivation_path;
pub mod network;

pub mod address;

pub mod format;

pub mod public_key;

pub mod extended_public_key;

pub mod utilities;
