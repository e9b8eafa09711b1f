//! Convenience re-exports for the common client surface.
pub use crate::{
    address::AddressPrefixConfig,
    coin::{coins_valid, parse_coins, Coin},
    config::{options, BroadcastMode, ClientConfig, ConfigFile, ConfigOption, ProjectIdentity},
    error::{ClientError, ConfigError, GrpcError, KeyStoreError, RpcError},
    grpc::{AuthedChannel, GrpcConnection, GrpcConnector, ProjectCredentials},
    keyring::{FileKeyStore, KeyAlgorithm, KeyManager, KeyStore},
    rpc::new_rpc_client,
    token::{DefaultTokenManager, TokenManager},
};
