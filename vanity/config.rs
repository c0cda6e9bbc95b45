//! Layered settings: an optional TOML file, then `VANITY_*` environment
//! variables, then command-line flags.

use std::{fmt, path::Path, path::PathBuf, str::FromStr, time::Duration};

use bytom::BytomFormat;
use ext_config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::{
    engine::{Budget, Strategy},
    error::ConfigError,
    sink::OutputFormat,
    space::{IndexSpace, INDEX_LIMIT},
};

/// Characters a bech32 data part can contain.
pub const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub xpub: Option<String>,
    pub suffix: Option<String>,
    pub network: Option<String>,
    pub format: Option<String>,
    pub account_start: Option<u64>,
    pub account_end: Option<u64>,
    pub address_start: Option<u64>,
    pub address_end: Option<u64>,
    pub threads: Option<usize>,
    pub max_matches: Option<u64>,
    pub max_candidates: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub output: Option<OutputFormat>,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Reads the optional file and the environment. A missing file given
    /// explicitly is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, Environment::with_prefix("VANITY"))
    }

    /// Environment values stay strings; numeric fields are converted when
    /// deserialized, so `VANITY_SUFFIX=00` keeps both zeros.
    fn load_with(path: Option<&Path>, environment: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        let settings = builder.add_source(environment).build()?;
        Ok(settings.try_deserialize::<Settings>()?)
    }

    /// Fields set in `overrides` win.
    pub fn merge(self, overrides: Settings) -> Settings {
        Settings {
            xpub: overrides.xpub.or(self.xpub),
            suffix: overrides.suffix.or(self.suffix),
            network: overrides.network.or(self.network),
            format: overrides.format.or(self.format),
            account_start: overrides.account_start.or(self.account_start),
            account_end: overrides.account_end.or(self.account_end),
            address_start: overrides.address_start.or(self.address_start),
            address_end: overrides.address_end.or(self.address_end),
            threads: overrides.threads.or(self.threads),
            max_matches: overrides.max_matches.or(self.max_matches),
            max_candidates: overrides.max_candidates.or(self.max_candidates),
            timeout_secs: overrides.timeout_secs.or(self.timeout_secs),
            output: overrides.output.or(self.output),
            log_file: overrides.log_file.or(self.log_file),
        }
    }

    pub fn key_config(&self) -> Result<KeyConfig, ConfigError> {
        let xpub = self
            .xpub
            .clone()
            .ok_or(ConfigError::MissingSetting("xpub"))?;
        let network = match &self.network {
            Some(network) => network.parse()?,
            None => NetworkKind::default(),
        };
        let format = match &self.format {
            Some(format) => BytomFormat::from_str(format)
                .map_err(|error| ConfigError::Crate("format", error.to_string()))?,
            None => BytomFormat::default(),
        };
        Ok(KeyConfig {
            xpub,
            network,
            format,
        })
    }

    pub fn into_search_config(self) -> Result<SearchConfig, ConfigError> {
        let key = self.key_config()?;
        let suffix = self.suffix.ok_or(ConfigError::MissingSetting("suffix"))?;
        validate_suffix(&suffix)?;

        let accounts = range("account", self.account_start, self.account_end)?;
        let addresses = range("address", self.address_start, self.address_end)?;
        let space = IndexSpace::new(accounts, addresses)
            .map_err(|error| ConfigError::Crate("space", error.to_string()))?;

        let strategy = match self.threads {
            Some(1) => Strategy::Sequential,
            Some(threads) => Strategy::Parallel { threads },
            None => Strategy::default(),
        };
        let budget = Budget {
            max_matches: self.max_matches,
            max_candidates: self.max_candidates,
            timeout: self.timeout_secs.map(Duration::from_secs),
        };

        Ok(SearchConfig {
            key,
            suffix,
            space,
            strategy,
            budget,
            output: self.output.unwrap_or_default(),
        })
    }
}

fn range(
    name: &'static str,
    start: Option<u64>,
    end: Option<u64>,
) -> Result<std::ops::Range<u64>, ConfigError> {
    let start = start.unwrap_or(0);
    let end = end.unwrap_or(INDEX_LIMIT);
    if start > end || end > INDEX_LIMIT {
        return Err(ConfigError::InvalidRange(name, start, end));
    }
    Ok(start..end)
}

/// A suffix with a character outside the bech32 charset can never match.
pub fn validate_suffix(suffix: &str) -> Result<(), ConfigError> {
    if suffix.is_empty() {
        return Err(ConfigError::InvalidSuffix(suffix.into(), "suffix is empty"));
    }
    if !suffix.chars().all(|c| BECH32_CHARSET.contains(c)) {
        return Err(ConfigError::InvalidSuffix(
            suffix.into(),
            "only lowercase bech32 characters can appear in an address",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NetworkKind {
    #[default]
    Mainnet,
    Testnet,
    Solonet,
}

impl FromStr for NetworkKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(NetworkKind::Mainnet),
            "testnet" => Ok(NetworkKind::Testnet),
            "solonet" => Ok(NetworkKind::Solonet),
            _ => Err(ConfigError::UnknownNetwork(s.into())),
        }
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkKind::Mainnet => write!(f, "mainnet"),
            NetworkKind::Testnet => write!(f, "testnet"),
            NetworkKind::Solonet => write!(f, "solonet"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyConfig {
    pub xpub: String,
    pub network: NetworkKind,
    pub format: BytomFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub key: KeyConfig,
    pub suffix: String,
    pub space: IndexSpace,
    pub strategy: Strategy,
    pub budget: Budget,
    pub output: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn settings() -> Settings {
        Settings {
            xpub: Some("00".repeat(64)),
            suffix: Some("x0x".into()),
            ..Settings::default()
        }
    }

    #[test]
    fn defaults_cover_the_whole_space() {
        let config = settings().into_search_config().unwrap();
        assert_eq!(config.space, IndexSpace::full());
        assert_eq!(config.key.network, NetworkKind::Mainnet);
        assert_eq!(config.key.format, BytomFormat::P2WPKH);
        assert_eq!(config.strategy, Strategy::Parallel { threads: 0 });
        assert_eq!(config.budget, Budget::default());
        assert_eq!(config.output, OutputFormat::Text);
    }

    #[test]
    fn suffix_must_be_bech32() {
        for bad in ["", "b", "1", "io", "QP"] {
            let config = Settings {
                suffix: Some(bad.into()),
                ..settings()
            };
            assert!(matches!(
                config.into_search_config(),
                Err(ConfigError::InvalidSuffix(..))
            ));
        }
        assert!(validate_suffix(BECH32_CHARSET).is_ok());
    }

    #[test]
    fn missing_required_settings() {
        let config = Settings {
            xpub: None,
            ..settings()
        };
        assert!(matches!(
            config.into_search_config(),
            Err(ConfigError::MissingSetting("xpub"))
        ));
        let config = Settings {
            suffix: None,
            ..settings()
        };
        assert!(matches!(
            config.into_search_config(),
            Err(ConfigError::MissingSetting("suffix"))
        ));
    }

    #[test]
    fn rejects_ranges_outside_the_index_limit() {
        let config = Settings {
            account_end: Some(INDEX_LIMIT + 1),
            ..settings()
        };
        assert!(matches!(
            config.into_search_config(),
            Err(ConfigError::InvalidRange("account", 0, _))
        ));
        let config = Settings {
            address_start: Some(9),
            address_end: Some(3),
            ..settings()
        };
        assert!(matches!(
            config.into_search_config(),
            Err(ConfigError::InvalidRange("address", 9, 3))
        ));
    }

    #[test]
    fn one_thread_means_sequential() {
        let config = Settings {
            threads: Some(1),
            ..settings()
        };
        assert_eq!(config.into_search_config().unwrap().strategy, Strategy::Sequential);
    }

    #[test]
    fn unknown_network_and_format() {
        let config = Settings {
            network: Some("regtest".into()),
            ..settings()
        };
        assert!(matches!(config.key_config(), Err(ConfigError::UnknownNetwork(_))));
        let config = Settings {
            format: Some("p2pkh".into()),
            ..settings()
        };
        assert!(matches!(config.key_config(), Err(ConfigError::Crate("format", _))));
    }

    #[test]
    fn command_line_overrides_file() {
        let file = Settings {
            network: Some("testnet".into()),
            max_matches: Some(5),
            ..settings()
        };
        let cli = Settings {
            max_matches: Some(1),
            ..Settings::default()
        };
        let merged = file.merge(cli);
        assert_eq!(merged.max_matches, Some(1));
        assert_eq!(merged.network.as_deref(), Some("testnet"));
        assert_eq!(merged.suffix.as_deref(), Some("x0x"));
    }

    #[test]
    fn loads_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "xpub = \"{}\"\nsuffix = \"vv\"\nnetwork = \"solonet\"\naccount_end = 4\n\
             address_end = 8\nmax_matches = 2\noutput = \"json\"",
            "11".repeat(64)
        )
        .unwrap();

        let config = Settings::load_with(Some(file.path()), environment(&[]))
            .unwrap()
            .into_search_config()
            .unwrap();
        assert_eq!(config.key.network, NetworkKind::Solonet);
        assert_eq!(config.space, IndexSpace::new(0..4, 0..8).unwrap());
        assert_eq!(config.budget.max_matches, Some(2));
        assert_eq!(config.output, OutputFormat::Json);
    }

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let source: ext_config::Map<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Environment::with_prefix("VANITY").source(Some(source))
    }

    #[test]
    fn numeric_looking_environment_values_stay_strings() {
        let xpub = "0".repeat(128);
        let env = environment(&[
            ("VANITY_SUFFIX", "00"),
            ("VANITY_XPUB", &xpub),
            ("VANITY_ACCOUNT_END", "4"),
            ("VANITY_THREADS", "1"),
        ]);
        let settings = Settings::load_with(None, env).unwrap();
        assert_eq!(settings.suffix.as_deref(), Some("00"));
        assert_eq!(settings.xpub.as_deref(), Some(xpub.as_str()));
        assert_eq!(settings.account_end, Some(4));
        assert_eq!(settings.threads, Some(1));

        let config = settings.into_search_config().unwrap();
        assert_eq!(config.suffix, "00");
        assert_eq!(config.strategy, Strategy::Sequential);
    }

    #[test]
    fn environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "suffix = \"vv\"\nmax_matches = 2").unwrap();
        let env = environment(&[("VANITY_SUFFIX", "007")]);
        let settings = Settings::load_with(Some(file.path()), env).unwrap();
        assert_eq!(settings.suffix.as_deref(), Some("007"));
        assert_eq!(settings.max_matches, Some(2));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Settings::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::Crate("config", _))));
    }
}
