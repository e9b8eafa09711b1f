use std::{path::Path, sync::Arc};

use assay::assay;
use monocle::{
    address::AddressPrefixConfig,
    coin::{parse_coins, Coin},
    config::{
        options, BroadcastMode, ClientConfig, ConfigFile, ConfigOption, ProjectIdentity,
        DEFAULT_DERIVATION_PATH, DEFAULT_FEE, DEFAULT_GAS_ADJUSTMENT, DEFAULT_GAS_LIMIT,
        DEFAULT_LOG_LEVEL, DEFAULT_MAX_TX_BYTES, DEFAULT_TIMEOUT_SECS, DEFAULT_TX_SIZE_LIMIT,
    },
    error::ConfigError,
    keyring::{FileKeyStore, KeyAlgorithm, KeyStore},
    token::TokenManager,
};
use uuid::Uuid;

const NODE: &str = "http://localhost:26657";
const GRPC: &str = "https://localhost:9090";
const CHAIN_ID: &str = "monocle-test-1";

fn scratch_dir(label: &str) -> String {
    std::env::temp_dir()
        .join(format!("monocle-{}-{}", label, Uuid::new_v4()))
        .into_os_string()
        .into_string()
        .unwrap()
}

fn scratch_key_store() -> Arc<dyn KeyStore> {
    Arc::new(FileKeyStore::create_or_open(&scratch_dir("config-test")).unwrap())
}

/// Builds a config with a scratch key store prepended so tests never touch
/// the default store under the user's home directory.
fn build(mut overrides: Vec<ConfigOption>) -> ClientConfig {
    let mut options = vec![options::key_store(scratch_key_store())];
    options.append(&mut overrides);

    ClientConfig::new(NODE, GRPC, CHAIN_ID, options).expect("failed to build config")
}

#[assay]
fn empty_options_yield_defaults() {
    let config = build(vec![]);

    assert_eq!(config.node_uri, NODE);
    assert_eq!(config.grpc_uri, GRPC);
    assert_eq!(config.chain_id, CHAIN_ID);
    assert_eq!(config.gas_limit, DEFAULT_GAS_LIMIT);
    assert_eq!(config.fee, parse_coins(DEFAULT_FEE).unwrap());
    assert_eq!(config.key_algorithm, KeyAlgorithm::Secp256k1);
    assert_eq!(config.broadcast_mode, BroadcastMode::Sync);
    assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    assert_eq!(config.max_tx_bytes, DEFAULT_MAX_TX_BYTES);
    assert_eq!(config.tx_size_limit, DEFAULT_TX_SIZE_LIMIT);
    assert!((config.gas_adjustment - DEFAULT_GAS_ADJUSTMENT).abs() < f64::EPSILON);
    assert!(!config.cached);
    assert_eq!(config.address_prefixes, AddressPrefixConfig::cosmos());
    assert_eq!(config.derivation_path, DEFAULT_DERIVATION_PATH);
    assert!(config.key_manager.is_none());
    assert_eq!(config.project, ProjectIdentity::default());
}

#[assay]
fn missing_required_fields_abort() {
    assert!(matches!(
        ClientConfig::new("", GRPC, CHAIN_ID, vec![]),
        Err(ConfigError::MissingField("node_uri"))
    ));
    assert!(matches!(
        ClientConfig::new(NODE, GRPC, "", vec![]),
        Err(ConfigError::MissingField("chain_id"))
    ));
}

#[assay]
fn explicit_invalid_values_normalize_like_unset() {
    let config = build(vec![
        options::gas_limit(0),
        options::timeout(0),
        options::max_tx_bytes(0),
        options::tx_size_limit(0),
        options::gas_adjustment(-1.5),
        options::log_level("catastrophic"),
        options::derivation_path("not-a-path"),
        options::fee(parse_coins("0uatom").unwrap()),
    ]);

    assert_eq!(config.gas_limit, DEFAULT_GAS_LIMIT);
    assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    assert_eq!(config.max_tx_bytes, DEFAULT_MAX_TX_BYTES);
    assert_eq!(config.tx_size_limit, DEFAULT_TX_SIZE_LIMIT);
    assert!((config.gas_adjustment - DEFAULT_GAS_ADJUSTMENT).abs() < f64::EPSILON);
    assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    assert_eq!(config.derivation_path, DEFAULT_DERIVATION_PATH);
    assert_eq!(config.fee, parse_coins(DEFAULT_FEE).unwrap());
}

#[assay]
fn positive_values_pass_through() {
    let config = build(vec![
        options::gas_limit(321_000),
        options::timeout(30),
        options::gas_adjustment(1.4),
        options::log_level("warn"),
        options::derivation_path("m/44'/330'/0'/0/0"),
    ]);

    assert_eq!(config.gas_limit, 321_000);
    assert_eq!(config.timeout_secs, 30);
    assert!((config.gas_adjustment - 1.4).abs() < f64::EPSILON);
    assert_eq!(config.log_level, "warn");
    assert_eq!(config.derivation_path, "m/44'/330'/0'/0/0");
}

#[assay]
fn later_options_win() {
    let config = build(vec![options::gas_limit(5), options::gas_limit(7)]);

    assert_eq!(config.gas_limit, 7);
}

#[assay]
fn invalid_fee_replaced_wholesale() {
    // a valid coin next to a duplicated denom; no partial correction
    let fee = parse_coins("100uatom,5uatom").unwrap();
    let config = build(vec![options::fee(fee)]);
    assert_eq!(config.fee, parse_coins(DEFAULT_FEE).unwrap());

    let config = build(vec![options::fee(Vec::new())]);
    assert_eq!(config.fee, parse_coins(DEFAULT_FEE).unwrap());

    let valid = parse_coins("25uatom,11uosmo").unwrap();
    let config = build(vec![options::fee(valid.clone())]);
    assert_eq!(config.fee, valid);
}

#[assay]
fn prefix_record_never_hybridizes() {
    // complete address triple, empty pubkey triple: the whole record is
    // replaced, not merged with the default
    let prefixes = AddressPrefixConfig {
        account_addr: "osmo".to_string(),
        validator_addr: "osmovaloper".to_string(),
        consensus_addr: "osmovalcons".to_string(),
        ..AddressPrefixConfig::default()
    };
    let config = build(vec![options::address_prefixes(prefixes)]);
    assert_eq!(config.address_prefixes, AddressPrefixConfig::cosmos());

    let mut complete = AddressPrefixConfig::cosmos();
    complete.account_addr = "osmo".to_string();
    let config = build(vec![options::address_prefixes(complete.clone())]);
    assert_eq!(config.address_prefixes, complete);
}

#[assay]
fn identity_is_copied_verbatim() {
    // empty identity fields are neither defaulted nor rejected
    let identity = ProjectIdentity {
        project_id: String::new(),
        project_key: "k-999".to_string(),
        chain_account_address: String::new(),
    };
    let config = build(vec![options::project(identity.clone())]);

    assert_eq!(config.project, identity);
}

#[assay]
fn enum_and_handle_overrides_are_respected() {
    struct UpperCaseTokenManager;

    impl TokenManager for UpperCaseTokenManager {
        fn to_min_coin(&self, coin: &Coin) -> eyre::Result<Coin> {
            Ok(coin.clone())
        }

        fn to_main_coin(&self, coin: &Coin) -> eyre::Result<Coin> {
            Ok(Coin {
                amount: coin.amount,
                denom: coin.denom.to_uppercase(),
            })
        }
    }

    let config = build(vec![
        options::key_algorithm(KeyAlgorithm::Ed25519),
        options::broadcast_mode(BroadcastMode::Commit),
        options::caching(true),
        options::token_manager(Arc::new(UpperCaseTokenManager)),
    ]);

    assert_eq!(config.key_algorithm, KeyAlgorithm::Ed25519);
    assert_eq!(config.broadcast_mode, BroadcastMode::Commit);
    assert!(config.cached);

    let coin = Coin {
        amount: 7,
        denom: "uatom".to_string(),
    };
    assert_eq!(
        config.token_manager.to_main_coin(&coin).unwrap().denom,
        "UATOM"
    );
}

#[assay(env = [("HOME", "/tmp/monocle-default-store-home")])]
fn default_key_store_created_on_disk() {
    let config = ClientConfig::new(NODE, GRPC, CHAIN_ID, vec![]).expect("failed to build config");

    assert!(Path::new("/tmp/monocle-default-store-home/.monocle/keys").exists());
    assert!(!config.key_store.exists("no-such-key").unwrap());
}

#[assay]
fn config_file_expands_to_options() {
    let dir = scratch_dir("config-file-test");
    std::fs::create_dir_all(&dir).unwrap();
    let key_dir = format!("{}/keys", dir);
    let path = format!("{}/config.toml", dir);
    let raw = format!(
        r#"
node-addr = "{}"
grpc-addr = "{}"
chain-id = "{}"
gas-limit = 75000
fee = "12uosmo"
broadcast-mode = "commit"
log-level = "debug"
key-directory = "{}"

[project]
project-id = "77"
project-key = "s3cr3t"
chain-account-address = "cosmos1abc"
"#,
        NODE, GRPC, CHAIN_ID, key_dir
    );
    std::fs::write(&path, raw).unwrap();

    let config = ConfigFile::load(Path::new(&path))
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.gas_limit, 75_000);
    assert_eq!(config.fee, parse_coins("12uosmo").unwrap());
    assert_eq!(config.broadcast_mode, BroadcastMode::Commit);
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.project.project_id, "77");
    // fields absent from the file still pick up defaults
    assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    assert_eq!(config.address_prefixes, AddressPrefixConfig::cosmos());
}

#[assay]
fn config_file_errors_are_descriptive() {
    assert!(matches!(
        ConfigFile::load(Path::new("/definitely/not/here.toml")),
        Err(ConfigError::FileIO(_))
    ));

    let dir = scratch_dir("config-file-bad");
    std::fs::create_dir_all(&dir).unwrap();
    let path = format!("{}/config.toml", dir);
    std::fs::write(&path, "gas-limit = \"not a number\"").unwrap();
    assert!(matches!(
        ConfigFile::load(Path::new(&path)),
        Err(ConfigError::Toml(_))
    ));
}
