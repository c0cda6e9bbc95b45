pub mod address;
pub mod derivation_path;
pub mod extended_public_key;
pub mod format;
pub mod network;
pub mod public_key;
pub mod witness_program;

pub use address::BytomAddress;
pub use derivation_path::BytomDerivationPath;
pub use extended_public_key::BytomExtendedPublicKey;
pub use format::BytomFormat;
pub use network::{BytomNetwork, Mainnet, Solonet, Testnet};
pub use public_key::BytomPublicKey;
