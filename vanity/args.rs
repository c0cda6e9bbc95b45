//! ## CLI Arguments Parsing Module
//!
//! Flags given on the command line override the configuration file and the
//! environment.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::{app::DeriveTarget, config::Settings, sink::OutputFormat};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Vanity address search over an extended public key",
    long_about = None
)]
pub struct Args {
    #[arg(short = 'c', long = "config", help = "Path to an optional TOML configuration file")]
    pub config_path: Option<PathBuf>,
    #[arg(
        short = 'f',
        long = "log-file",
        help = "Path to the log file. If not set, logs will only be written to stderr."
    )]
    pub log_file: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search for addresses ending with a suffix
    Search(SearchArgs),
    /// Print the address and key at one derivation path
    Derive(DeriveArgs),
}

#[derive(Debug, Default, ClapArgs)]
pub struct KeyArgs {
    #[arg(long, help = "128 hex characters: public key followed by chain code")]
    pub xpub: Option<String>,
    #[arg(long, help = "mainnet, testnet or solonet")]
    pub network: Option<String>,
    #[arg(long, help = "p2wpkh or p2wpkh_ripemd160")]
    pub format: Option<String>,
}

#[derive(Debug, ClapArgs)]
pub struct SearchArgs {
    #[command(flatten)]
    pub key: KeyArgs,
    #[arg(help = "Address suffix to look for")]
    pub suffix: Option<String>,
    #[arg(long)]
    pub account_start: Option<u64>,
    #[arg(long, help = "Exclusive upper bound of the account index")]
    pub account_end: Option<u64>,
    #[arg(long)]
    pub address_start: Option<u64>,
    #[arg(long, help = "Exclusive upper bound of the address index")]
    pub address_end: Option<u64>,
    #[arg(short = 't', long, help = "Worker threads, 0 for one per CPU, 1 for an ordered search")]
    pub threads: Option<usize>,
    #[arg(short = 'n', long)]
    pub max_matches: Option<u64>,
    #[arg(long)]
    pub max_candidates: Option<u64>,
    #[arg(long)]
    pub timeout_secs: Option<u64>,
    #[arg(short = 'o', long, help = "text or json")]
    pub output: Option<OutputFormat>,
}

#[derive(Debug, ClapArgs)]
pub struct DeriveArgs {
    #[command(flatten)]
    pub key: KeyArgs,
    #[arg(long, default_value_t = 0, conflicts_with = "path")]
    pub account: u64,
    #[arg(long, default_value_t = 0, conflicts_with = "path")]
    pub address: u64,
    #[arg(long, help = "Explicit path such as m/44/153/0/0/1")]
    pub path: Option<String>,
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Values set on the command line, to be merged over loaded settings.
    pub fn overrides(&self) -> Settings {
        let mut settings = match &self.command {
            Command::Search(search) => search.to_settings(),
            Command::Derive(derive) => derive.key.to_settings(),
        };
        settings.log_file = self.log_file.clone();
        settings
    }
}

impl KeyArgs {
    fn to_settings(&self) -> Settings {
        Settings {
            xpub: self.xpub.clone(),
            network: self.network.clone(),
            format: self.format.clone(),
            ..Settings::default()
        }
    }
}

impl SearchArgs {
    fn to_settings(&self) -> Settings {
        Settings {
            suffix: self.suffix.clone(),
            account_start: self.account_start,
            account_end: self.account_end,
            address_start: self.address_start,
            address_end: self.address_end,
            threads: self.threads,
            max_matches: self.max_matches,
            max_candidates: self.max_candidates,
            timeout_secs: self.timeout_secs,
            output: self.output,
            ..self.key.to_settings()
        }
    }
}

impl DeriveArgs {
    pub fn target(&self) -> DeriveTarget {
        match &self.path {
            Some(path) => DeriveTarget::Path(path.clone()),
            None => DeriveTarget::Pair {
                account: self.account,
                address_index: self.address,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_flags_become_overrides() {
        let args = Args::try_parse_from([
            "vanity", "-f", "run.log", "search", "x0x", "--xpub", "ab", "--network", "testnet",
            "--account-end", "10", "-n", "1", "-o", "json",
        ])
        .unwrap();
        let settings = args.overrides();
        assert_eq!(settings.suffix.as_deref(), Some("x0x"));
        assert_eq!(settings.xpub.as_deref(), Some("ab"));
        assert_eq!(settings.network.as_deref(), Some("testnet"));
        assert_eq!(settings.account_end, Some(10));
        assert_eq!(settings.max_matches, Some(1));
        assert_eq!(settings.output, Some(OutputFormat::Json));
        assert_eq!(settings.log_file, Some(PathBuf::from("run.log")));
        assert_eq!(settings.threads, None);
    }

    #[test]
    fn derive_target_from_flags() {
        let args =
            Args::try_parse_from(["vanity", "derive", "--account", "3", "--address", "7"]).unwrap();
        match args.command {
            Command::Derive(derive) => assert_eq!(
                derive.target(),
                DeriveTarget::Pair {
                    account: 3,
                    address_index: 7
                }
            ),
            _ => panic!("expected derive"),
        }
        let args = Args::try_parse_from(["vanity", "derive", "--path", "m/44/153/0/0/1"]).unwrap();
        match args.command {
            Command::Derive(derive) => {
                assert_eq!(derive.target(), DeriveTarget::Path("m/44/153/0/0/1".into()))
            }
            _ => panic!("expected derive"),
        }
    }

    #[test]
    fn path_conflicts_with_indices() {
        let args = Args::try_parse_from(["vanity", "derive", "--path", "m", "--account", "1"]);
        assert!(args.is_err());
    }
}
