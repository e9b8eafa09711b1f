//! Client configuration construction.
//!
//! [`ClientConfig::new`] seeds a working [`ConfigBuilder`] with the three
//! required connection values, applies the caller's [`ConfigOption`]s in
//! order, then runs a fixed defaulting pass that re-applies every optional
//! field's own option logic to its current value. A field left unset and a
//! field explicitly set to a structurally invalid value therefore normalize
//! to the same built-in default, and a finished config never needs
//! re-validation downstream.
//!
//! Construction is synchronous. The one documented side effect: when no key
//! store was supplied, the defaulting pass creates the default on-disk store
//! under the user's home directory, and failure to open it aborts
//! construction.
use std::{fmt, fs, path::Path, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    address::AddressPrefixConfig,
    coin::{coins_valid, parse_coins, Coin},
    error::ConfigError,
    keyring::{self, FileKeyStore, KeyAlgorithm, KeyManager, KeyStore},
    token::{DefaultTokenManager, TokenManager},
};

pub const DEFAULT_GAS_LIMIT: u64 = 200_000;
pub const DEFAULT_FEE: &str = "4000uatom";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_MAX_TX_BYTES: u64 = 1_073_741_824;
pub const DEFAULT_TX_SIZE_LIMIT: u64 = 1_048_576;
pub const DEFAULT_GAS_ADJUSTMENT: f64 = 1.0;
pub const DEFAULT_DERIVATION_PATH: &str = "m/44'/118'/0'/0/0";

/// How a broadcast call waits on transaction acceptance.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastMode {
    /// Wait for the node's CheckTx result.
    Sync,
    /// Fire and forget.
    Async,
    /// Wait for the transaction to be committed in a block.
    Commit,
}

impl Default for BroadcastMode {
    fn default() -> Self {
        BroadcastMode::Sync
    }
}

impl fmt::Display for BroadcastMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BroadcastMode::Sync => write!(f, "sync"),
            BroadcastMode::Async => write!(f, "async"),
            BroadcastMode::Commit => write!(f, "commit"),
        }
    }
}

/// Gateway project identity. Copied into the config verbatim, never
/// defaulted or validated; the transport layer attaches it to every
/// outbound call as request metadata.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct ProjectIdentity {
    #[serde(rename = "project-id")]
    pub project_id: String,
    #[serde(rename = "project-key")]
    pub project_key: String,
    #[serde(rename = "chain-account-address")]
    pub chain_account_address: String,
}

/// A named configuration override. Options are applied in the order given,
/// and the defaulting pass re-runs each field's option logic afterwards, so
/// explicit overrides go through the same normalization as defaults.
pub type ConfigOption = Box<dyn FnOnce(&mut ConfigBuilder) -> Result<(), ConfigError>>;

/// Working state mutated by [`ConfigOption`]s before
/// [`ConfigBuilder::check_and_set_defaults`] finalizes it into a
/// [`ClientConfig`]. Zero and empty values mean "unset".
#[derive(Default)]
pub struct ConfigBuilder {
    pub node_uri: String,
    pub grpc_uri: String,
    pub chain_id: String,
    pub gas_limit: u64,
    pub fee: Vec<Coin>,
    pub key_algorithm: Option<KeyAlgorithm>,
    pub broadcast_mode: Option<BroadcastMode>,
    pub timeout_secs: u64,
    pub log_level: String,
    pub max_tx_bytes: u64,
    pub tx_size_limit: u64,
    pub gas_adjustment: f64,
    pub cached: bool,
    pub key_store: Option<Arc<dyn KeyStore>>,
    pub token_manager: Option<Arc<dyn TokenManager>>,
    pub key_manager: Option<Arc<dyn KeyManager>>,
    pub address_prefixes: AddressPrefixConfig,
    pub derivation_path: String,
    pub project: ProjectIdentity,
}

/// Named option constructors for [`ClientConfig::new`]. Each option owns
/// exactly the field it is named after.
pub mod options {
    use super::*;

    /// Sets the fee amount. An empty or invalid fee is replaced wholesale by
    /// the parsed [`DEFAULT_FEE`]; no partial correction is attempted.
    pub fn fee(fee: Vec<Coin>) -> ConfigOption {
        Box::new(move |builder| {
            builder.fee = if coins_valid(&fee) {
                fee
            } else {
                parse_coins(DEFAULT_FEE).expect("default fee parses")
            };
            Ok(())
        })
    }

    /// Sets the max gas limit. Zero falls back to [`DEFAULT_GAS_LIMIT`].
    pub fn gas_limit(gas: u64) -> ConfigOption {
        Box::new(move |builder| {
            builder.gas_limit = if gas == 0 { DEFAULT_GAS_LIMIT } else { gas };
            Ok(())
        })
    }

    /// Selects the account key algorithm.
    pub fn key_algorithm(algorithm: KeyAlgorithm) -> ConfigOption {
        Box::new(move |builder| {
            builder.key_algorithm = Some(algorithm);
            Ok(())
        })
    }

    /// Selects the transaction broadcast mode.
    pub fn broadcast_mode(mode: BroadcastMode) -> ConfigOption {
        Box::new(move |builder| {
            builder.broadcast_mode = Some(mode);
            Ok(())
        })
    }

    /// Sets the request timeout policy in seconds. Zero falls back to
    /// [`DEFAULT_TIMEOUT_SECS`].
    pub fn timeout(secs: u64) -> ConfigOption {
        Box::new(move |builder| {
            builder.timeout_secs = if secs == 0 { DEFAULT_TIMEOUT_SECS } else { secs };
            Ok(())
        })
    }

    /// Sets the log level. Anything other than trace|debug|info|warn|error
    /// falls back to [`DEFAULT_LOG_LEVEL`].
    pub fn log_level(level: impl Into<String>) -> ConfigOption {
        let level = level.into();
        Box::new(move |builder| {
            builder.log_level = if level.parse::<tracing::Level>().is_ok() {
                level
            } else {
                DEFAULT_LOG_LEVEL.to_string()
            };
            Ok(())
        })
    }

    /// Caps transaction sizes accepted from the mempool. Zero falls back to
    /// [`DEFAULT_MAX_TX_BYTES`].
    pub fn max_tx_bytes(max: u64) -> ConfigOption {
        Box::new(move |builder| {
            builder.max_tx_bytes = if max == 0 { DEFAULT_MAX_TX_BYTES } else { max };
            Ok(())
        })
    }

    /// Caps the size of transactions this client builds. Zero falls back to
    /// [`DEFAULT_TX_SIZE_LIMIT`].
    pub fn tx_size_limit(limit: u64) -> ConfigOption {
        Box::new(move |builder| {
            builder.tx_size_limit = if limit == 0 { DEFAULT_TX_SIZE_LIMIT } else { limit };
            Ok(())
        })
    }

    /// Multiplier applied to simulated gas estimates. Non-positive values
    /// fall back to [`DEFAULT_GAS_ADJUSTMENT`].
    pub fn gas_adjustment(factor: f64) -> ConfigOption {
        Box::new(move |builder| {
            builder.gas_adjustment = if factor <= 0.0 {
                DEFAULT_GAS_ADJUSTMENT
            } else {
                factor
            };
            Ok(())
        })
    }

    /// Enables or disables response caching. False is a valid setting; no
    /// default substitution happens for this field.
    pub fn caching(enabled: bool) -> ConfigOption {
        Box::new(move |builder| {
            builder.cached = enabled;
            Ok(())
        })
    }

    /// Supplies a key storage backend, replacing the default on-disk store.
    pub fn key_store(store: Arc<dyn KeyStore>) -> ConfigOption {
        Box::new(move |builder| {
            builder.key_store = Some(store);
            Ok(())
        })
    }

    /// Supplies a token metadata source, replacing the built-in identity
    /// implementation.
    pub fn token_manager(manager: Arc<dyn TokenManager>) -> ConfigOption {
        Box::new(move |builder| {
            builder.token_manager = Some(manager);
            Ok(())
        })
    }

    /// Supplies a signing capability. There is no default; configurations
    /// without one leave signing to a later wiring step.
    pub fn key_manager(manager: Arc<dyn KeyManager>) -> ConfigOption {
        Box::new(move |builder| {
            builder.key_manager = Some(manager);
            Ok(())
        })
    }

    /// Sets the bech32 prefix record. The record is replaced wholesale by
    /// [`AddressPrefixConfig::cosmos`] unless both the address triple and
    /// the pubkey triple are complete.
    pub fn address_prefixes(prefixes: AddressPrefixConfig) -> ConfigOption {
        Box::new(move |builder| {
            builder.address_prefixes = if prefixes.is_complete() {
                prefixes
            } else {
                AddressPrefixConfig::cosmos()
            };
            Ok(())
        })
    }

    /// Sets the BIP-44 derivation path. Empty or unparseable paths fall back
    /// to [`DEFAULT_DERIVATION_PATH`].
    pub fn derivation_path(path: impl Into<String>) -> ConfigOption {
        let path = path.into();
        Box::new(move |builder| {
            builder.derivation_path = if path.parse::<bip32::DerivationPath>().is_ok() {
                path
            } else {
                DEFAULT_DERIVATION_PATH.to_string()
            };
            Ok(())
        })
    }

    /// Sets the gateway project identity, copied field by field. Identity
    /// values are never defaulted or validated.
    pub fn project(identity: ProjectIdentity) -> ConfigOption {
        Box::new(move |builder| {
            builder.project.project_id = identity.project_id;
            builder.project.project_key = identity.project_key;
            builder.project.chain_account_address = identity.chain_account_address;
            Ok(())
        })
    }
}

/// Validated, immutable client configuration. Built once via
/// [`ClientConfig::new`] and shared by reference with every downstream
/// collaborator; no field is mutated after construction.
#[derive(Clone)]
pub struct ClientConfig {
    /// Tendermint node RPC address.
    pub node_uri: String,
    /// Gateway gRPC address.
    pub grpc_uri: String,
    /// Target chain id.
    pub chain_id: String,
    /// Max gas limit.
    pub gas_limit: u64,
    /// Fee amount paid per transaction.
    pub fee: Vec<Coin>,
    /// Private key algorithm for account keys.
    pub key_algorithm: KeyAlgorithm,
    /// Transaction broadcast mode.
    pub broadcast_mode: BroadcastMode,
    /// Request timeout policy, consumed by downstream RPC collaborators.
    pub timeout_secs: u64,
    /// Log level (trace|debug|info|warn|error).
    pub log_level: String,
    /// Maximum bytes of a transaction.
    pub max_tx_bytes: u64,
    /// Size limit for transactions this client builds.
    pub tx_size_limit: u64,
    /// Multiplier applied to simulated gas estimates.
    pub gas_adjustment: f64,
    /// Whether response caching is enabled.
    pub cached: bool,
    /// Private key storage backend.
    pub key_store: Arc<dyn KeyStore>,
    /// Token metadata source.
    pub token_manager: Arc<dyn TokenManager>,
    /// Signing capability, if wired in.
    pub key_manager: Option<Arc<dyn KeyManager>>,
    /// Bech32 prefix record.
    pub address_prefixes: AddressPrefixConfig,
    /// BIP-44 derivation path for account keys.
    pub derivation_path: String,
    /// Gateway project identity.
    pub project: ProjectIdentity,
}

impl ClientConfig {
    /// Builds a validated configuration from the required connection values
    /// and an ordered list of overrides.
    ///
    /// Only an empty `node_uri` or `chain_id`, or a key store that cannot be
    /// opened, abort construction; every other problem is normalized to the
    /// field's built-in default.
    pub fn new(
        node_uri: &str,
        grpc_uri: &str,
        chain_id: &str,
        options: Vec<ConfigOption>,
    ) -> Result<ClientConfig, ConfigError> {
        let mut builder = ConfigBuilder {
            node_uri: node_uri.to_string(),
            grpc_uri: grpc_uri.to_string(),
            chain_id: chain_id.to_string(),
            ..ConfigBuilder::default()
        };

        for option in options {
            option(&mut builder)?;
        }

        builder.check_and_set_defaults()
    }

    /// Timeout policy as a [`Duration`] for downstream request layers.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The configured log level as a tracing level.
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level
            .parse()
            .expect("log level is normalized at construction")
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("node_uri", &self.node_uri)
            .field("grpc_uri", &self.grpc_uri)
            .field("chain_id", &self.chain_id)
            .field("gas_limit", &self.gas_limit)
            .field("fee", &self.fee)
            .field("key_algorithm", &self.key_algorithm)
            .field("broadcast_mode", &self.broadcast_mode)
            .field("timeout_secs", &self.timeout_secs)
            .field("log_level", &self.log_level)
            .field("max_tx_bytes", &self.max_tx_bytes)
            .field("tx_size_limit", &self.tx_size_limit)
            .field("gas_adjustment", &self.gas_adjustment)
            .field("cached", &self.cached)
            .field("key_manager", &self.key_manager.is_some())
            .field("address_prefixes", &self.address_prefixes)
            .field("derivation_path", &self.derivation_path)
            .field("project", &self.project)
            .finish_non_exhaustive()
    }
}

impl ConfigBuilder {
    /// The fixed-order defaulting and validation pass. Scalar and composite
    /// fields re-run their own option logic against their current value;
    /// capability handles default when absent.
    fn check_and_set_defaults(mut self) -> Result<ClientConfig, ConfigError> {
        if self.node_uri.is_empty() {
            return Err(ConfigError::MissingField("node_uri"));
        }
        if self.chain_id.is_empty() {
            return Err(ConfigError::MissingField("chain_id"));
        }

        options::gas_limit(self.gas_limit)(&mut self)?;
        options::fee(std::mem::take(&mut self.fee))(&mut self)?;
        options::timeout(self.timeout_secs)(&mut self)?;
        options::log_level(std::mem::take(&mut self.log_level))(&mut self)?;
        options::max_tx_bytes(self.max_tx_bytes)(&mut self)?;
        options::tx_size_limit(self.tx_size_limit)(&mut self)?;
        options::gas_adjustment(self.gas_adjustment)(&mut self)?;
        options::address_prefixes(self.address_prefixes.clone())(&mut self)?;
        options::derivation_path(std::mem::take(&mut self.derivation_path))(&mut self)?;
        options::project(self.project.clone())(&mut self)?;

        let key_store: Arc<dyn KeyStore> = match self.key_store.take() {
            Some(store) => store,
            None => {
                let path = keyring::default_store_path()?;
                tracing::debug!(path = %path, "opening default file key store");
                Arc::new(FileKeyStore::create_or_open(&path)?)
            }
        };
        let token_manager: Arc<dyn TokenManager> = match self.token_manager.take() {
            Some(manager) => manager,
            None => Arc::new(DefaultTokenManager),
        };

        Ok(ClientConfig {
            node_uri: self.node_uri,
            grpc_uri: self.grpc_uri,
            chain_id: self.chain_id,
            gas_limit: self.gas_limit,
            fee: self.fee,
            key_algorithm: self.key_algorithm.unwrap_or_default(),
            broadcast_mode: self.broadcast_mode.unwrap_or_default(),
            timeout_secs: self.timeout_secs,
            log_level: self.log_level,
            max_tx_bytes: self.max_tx_bytes,
            tx_size_limit: self.tx_size_limit,
            gas_adjustment: self.gas_adjustment,
            cached: self.cached,
            key_store,
            token_manager,
            key_manager: self.key_manager,
            address_prefixes: self.address_prefixes,
            derivation_path: self.derivation_path,
            project: self.project,
        })
    }
}

/// On-disk configuration profile. Every field is optional; present fields
/// are expanded into the corresponding [`options`] overrides, so values from
/// a file go through the exact same normalization as programmatic ones.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(rename = "node-addr")]
    pub node_uri: String,
    #[serde(rename = "grpc-addr")]
    pub grpc_uri: String,
    #[serde(rename = "chain-id")]
    pub chain_id: String,
    #[serde(rename = "gas-limit")]
    pub gas_limit: u64,
    pub fee: String,
    #[serde(rename = "key-algorithm")]
    pub key_algorithm: Option<KeyAlgorithm>,
    #[serde(rename = "broadcast-mode")]
    pub broadcast_mode: Option<BroadcastMode>,
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
    #[serde(rename = "log-level")]
    pub log_level: String,
    #[serde(rename = "max-tx-bytes")]
    pub max_tx_bytes: u64,
    #[serde(rename = "tx-size-limit")]
    pub tx_size_limit: u64,
    #[serde(rename = "gas-adjustment")]
    pub gas_adjustment: f64,
    pub cached: bool,
    #[serde(rename = "key-directory")]
    pub key_directory: String,
    #[serde(rename = "address-prefixes")]
    pub address_prefixes: Option<AddressPrefixConfig>,
    #[serde(rename = "derivation-path")]
    pub derivation_path: String,
    pub project: Option<ProjectIdentity>,
}

impl ConfigFile {
    /// Reads a TOML profile from disk.
    pub fn load(path: &Path) -> Result<ConfigFile, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|err| ConfigError::FileIO(err.to_string()))?;

        toml::from_str(&raw).map_err(|err| ConfigError::Toml(err.to_string()))
    }

    /// Expands the profile into the equivalent option list. The fee string
    /// is parsed here; an unparseable fee becomes an empty amount and picks
    /// up the default like any other invalid fee.
    pub fn into_options(self) -> Result<Vec<ConfigOption>, ConfigError> {
        let mut opts: Vec<ConfigOption> = Vec::new();

        if self.gas_limit > 0 {
            opts.push(options::gas_limit(self.gas_limit));
        }
        if !self.fee.is_empty() {
            opts.push(options::fee(parse_coins(&self.fee).unwrap_or_default()));
        }
        if let Some(algorithm) = self.key_algorithm {
            opts.push(options::key_algorithm(algorithm));
        }
        if let Some(mode) = self.broadcast_mode {
            opts.push(options::broadcast_mode(mode));
        }
        if self.timeout_secs > 0 {
            opts.push(options::timeout(self.timeout_secs));
        }
        if !self.log_level.is_empty() {
            opts.push(options::log_level(self.log_level));
        }
        if self.max_tx_bytes > 0 {
            opts.push(options::max_tx_bytes(self.max_tx_bytes));
        }
        if self.tx_size_limit > 0 {
            opts.push(options::tx_size_limit(self.tx_size_limit));
        }
        if self.gas_adjustment > 0.0 {
            opts.push(options::gas_adjustment(self.gas_adjustment));
        }
        if self.cached {
            opts.push(options::caching(true));
        }
        if !self.key_directory.is_empty() {
            let store = FileKeyStore::create_or_open(&self.key_directory)?;
            opts.push(options::key_store(Arc::new(store)));
        }
        if let Some(prefixes) = self.address_prefixes {
            opts.push(options::address_prefixes(prefixes));
        }
        if !self.derivation_path.is_empty() {
            opts.push(options::derivation_path(self.derivation_path));
        }
        if let Some(identity) = self.project {
            opts.push(options::project(identity));
        }

        Ok(opts)
    }

    /// Builds a [`ClientConfig`] straight from the profile.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let node_uri = self.node_uri.clone();
        let grpc_uri = self.grpc_uri.clone();
        let chain_id = self.chain_id.clone();

        ClientConfig::new(&node_uri, &grpc_uri, &chain_id, self.into_options()?)
    }
}
