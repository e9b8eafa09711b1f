//! Tendermint RPC client construction against the configured node endpoint.
use tendermint_rpc::HttpClient;
use url::Url;

use crate::{config::ClientConfig, error::RpcError};

/// Builds a Tendermint RPC client for a node address. The configured
/// `timeout_secs` policy is enforced by the caller's request layer, not
/// here.
pub fn new_rpc_client(node_uri: &str) -> Result<HttpClient, RpcError> {
    let url = Url::parse(node_uri)
        .map_err(|err| RpcError::InvalidEndpoint(format!("{}: {}", node_uri, err)))?;
    if !url.scheme().contains("http") {
        return Err(RpcError::InvalidEndpoint(format!(
            "{}: node RPC endpoints must use http or https",
            node_uri
        )));
    }

    HttpClient::new(node_uri).map_err(|err| err.into())
}

impl ClientConfig {
    /// An RPC client against this configuration's node endpoint.
    pub fn rpc_client(&self) -> Result<HttpClient, RpcError> {
        new_rpc_client(&self.node_uri)
    }
}
