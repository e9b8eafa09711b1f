use thiserror::Error;

// Higher level error: ClientError wraps the per-concern enums below
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Grpc(#[from] GrpcError),
    #[error("{0}")]
    KeyStore(#[from] KeyStoreError),
    #[error("error during RPC call: {0}")]
    Rpc(#[from] RpcError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{0}")]
    KeyStore(#[from] KeyStoreError),
    #[error("error reading config file: {0}")]
    FileIO(String),
    #[error("error parsing config file: {0}")]
    Toml(String),
}

// Lower level errors; should be used by higher level errors
#[derive(Debug, Error)]
pub enum GrpcError {
    #[error("{0}")]
    Connection(#[from] tonic::transport::Error),
    #[error("invalid gRPC endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("project credentials require TLS, refusing plaintext endpoint: {0}")]
    InsecureTransport(String),
    #[error("invalid credential value: {0}")]
    InvalidCredential(#[from] tonic::metadata::errors::InvalidMetadataValue),
    #[error("{0}")]
    Request(#[from] tonic::Status),
}

#[derive(Debug, Error)]
pub enum KeyStoreError {
    #[error("error creating or opening keystore: {0}")]
    CouldNotOpenOrCreateKeyStore(String),
    #[error("key name '{0}' already exists.")]
    Exists(String),
    #[error("key name '{0}' does not exist.")]
    DoesNotExist(String),
    #[error("invalid key name '{0}'")]
    InvalidName(String),
    #[error("invalid key material: {0}")]
    InvalidKey(String),
    #[error("unable to store key: {0}")]
    UnableToStoreKey(String),
    #[error("unable to delete key: {0}")]
    UnableToDeleteKey(String),
    #[error("unable to retrieve key: {0}")]
    UnableToRetrieveKey(String),
}

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid RPC endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("tendermint error: {0}")]
    Tendermint(#[from] tendermint_rpc::Error),
}
