//! Binds the runtime network choice to the network-typed key and engine.

use std::{fmt, io, process, str::FromStr, thread};

use bytom::{
    BytomDerivationPath, BytomExtendedPublicKey, BytomNetwork, Mainnet, Solonet, Testnet,
};
use serde::Serialize;
use tracing::{info, warn};
use vanity_model::extended_public_key::ExtendedPublicKey;

use crate::{
    config::{KeyConfig, NetworkKind, SearchConfig},
    engine::{SearchEngine, SearchSummary, StopSignal},
    error::SearchError,
    sink::MatchSink,
};

pub fn search<S: MatchSink>(
    config: &SearchConfig,
    stop: &StopSignal,
    sink: &S,
) -> Result<SearchSummary, SearchError> {
    match config.key.network {
        NetworkKind::Mainnet => search_on::<Mainnet, S>(config, stop, sink),
        NetworkKind::Testnet => search_on::<Testnet, S>(config, stop, sink),
        NetworkKind::Solonet => search_on::<Solonet, S>(config, stop, sink),
    }
}

fn search_on<N: BytomNetwork, S: MatchSink>(
    config: &SearchConfig,
    stop: &StopSignal,
    sink: &S,
) -> Result<SearchSummary, SearchError> {
    let engine =
        SearchEngine::<N>::new(&config.key.xpub, &config.suffix, config.key.format.clone())?;
    engine.run(&config.space, config.strategy, &config.budget, stop, sink)
}

/// Sets `stop` on the first Ctrl-C so a running search ends with its summary.
/// A second Ctrl-C exits at once.
pub fn stop_on_interrupt(stop: StopSignal) -> io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    thread::Builder::new()
        .name("vanity-interrupt".into())
        .spawn(move || {
            runtime.block_on(async {
                if tokio::signal::ctrl_c().await.is_err() {
                    return;
                }
                warn!("interrupted, stopping search");
                stop.stop();
                if tokio::signal::ctrl_c().await.is_ok() {
                    process::exit(130);
                }
            })
        })?;
    Ok(())
}

/// Which key to derive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeriveTarget {
    Pair { account: u64, address_index: u64 },
    Path(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Derivation {
    pub address: String,
    pub path: String,
    pub segments: Vec<String>,
    pub public_key: String,
    pub chain_code: String,
}

impl fmt::Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "address: {}", self.address)?;
        writeln!(f, "path: {} [{}]", self.path, self.segments.join(" "))?;
        writeln!(f, "public key: {}", self.public_key)?;
        write!(f, "chain code: {}", self.chain_code)
    }
}

pub fn derive(key: &KeyConfig, target: &DeriveTarget) -> Result<Derivation, SearchError> {
    match key.network {
        NetworkKind::Mainnet => derive_on::<Mainnet>(key, target),
        NetworkKind::Testnet => derive_on::<Testnet>(key, target),
        NetworkKind::Solonet => derive_on::<Solonet>(key, target),
    }
}

fn derive_on<N: BytomNetwork>(
    key: &KeyConfig,
    target: &DeriveTarget,
) -> Result<Derivation, SearchError> {
    let xpub =
        BytomExtendedPublicKey::<N>::from_str(&key.xpub).map_err(SearchError::BadKeyFormat)?;
    let path = match target {
        DeriveTarget::Pair {
            account,
            address_index,
        } => BytomDerivationPath::bip44(*account, *address_index)?,
        DeriveTarget::Path(path) => BytomDerivationPath::from_str(path)?,
    };
    info!(%path, network = N::NAME, "deriving");

    let child = xpub.derive(&path).map_err(SearchError::Derivation)?;
    let address = child.to_address(&key.format)?;
    Ok(Derivation {
        address: address.to_string(),
        path: path.to_string(),
        segments: path.to_hex_segments(),
        public_key: child.to_public_key().to_string(),
        chain_code: hex::encode(child.chain_code()),
    })
}
