//! The shared, credentialed gRPC transport.
//!
//! A [`GrpcConnector`] dials its endpoint at most once for its lifetime;
//! every caller, however many arrive concurrently, ends up holding the same
//! [`GrpcConnection`]. The [`ProjectCredentials`] bound at first successful
//! creation ride along as request metadata on every call made through the
//! connection, and identities passed on later bootstrap calls are ignored.
use std::{collections::HashMap, fmt};

use cosmos_sdk_proto::cosmos::{auth, tx};
use tokio::sync::OnceCell;
use tonic::{
    metadata::AsciiMetadataValue,
    service::{interceptor::InterceptedService, Interceptor},
    transport::{channel::Channel, ClientTlsConfig, Endpoint},
    Request, Status,
};

use crate::{config::ProjectIdentity, error::GrpcError, utils};

// gRPC ASCII metadata keys must be lowercase, so the camelCase names the
// gateway documents arrive on the wire in these forms.
pub const PROJECT_ID_HEADER: &str = "projectid";
pub const PROJECT_KEY_HEADER: &str = "projectkey";
pub const CHAIN_ACCOUNT_ADDRESS_HEADER: &str = "chainaccountaddress";

/// Channel type carrying per-request project credentials.
pub type AuthedChannel = InterceptedService<Channel, ProjectCredentials>;

/// The Cosmos Tx proto client over the credentialed channel.
pub type TxClient = tx::v1beta1::service_client::ServiceClient<AuthedChannel>;

/// The auth module's query client over the credentialed channel.
pub type AuthQueryClient = auth::v1beta1::query_client::QueryClient<AuthedChannel>;

/// Per-request credential provider bound to one project identity.
///
/// Produces the three identity metadata entries on every outbound call and
/// declares transport security mandatory: the connector refuses plaintext
/// endpoints on its behalf before any I/O happens.
#[derive(Clone)]
pub struct ProjectCredentials {
    project_id: AsciiMetadataValue,
    project_key: AsciiMetadataValue,
    chain_account_address: AsciiMetadataValue,
}

impl ProjectCredentials {
    pub fn new(identity: &ProjectIdentity) -> Result<ProjectCredentials, GrpcError> {
        Ok(ProjectCredentials {
            project_id: identity.project_id.parse()?,
            project_key: identity.project_key.parse()?,
            chain_account_address: identity.chain_account_address.parse()?,
        })
    }

    /// The metadata attached to every outbound request: exactly the three
    /// identity fields supplied at creation.
    pub fn request_metadata(&self) -> HashMap<&'static str, String> {
        HashMap::from([
            (PROJECT_ID_HEADER, ascii_to_string(&self.project_id)),
            (PROJECT_KEY_HEADER, ascii_to_string(&self.project_key)),
            (
                CHAIN_ACCOUNT_ADDRESS_HEADER,
                ascii_to_string(&self.chain_account_address),
            ),
        ])
    }

    /// Project credentials only travel over encrypted transport.
    pub fn require_transport_security(&self) -> bool {
        true
    }
}

fn ascii_to_string(value: &AsciiMetadataValue) -> String {
    value.to_str().unwrap_or_default().to_string()
}

impl Interceptor for ProjectCredentials {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        let metadata = request.metadata_mut();
        metadata.insert(PROJECT_ID_HEADER, self.project_id.clone());
        metadata.insert(PROJECT_KEY_HEADER, self.project_key.clone());
        metadata.insert(
            CHAIN_ACCOUNT_ADDRESS_HEADER,
            self.chain_account_address.clone(),
        );

        Ok(request)
    }
}

impl fmt::Debug for ProjectCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectCredentials")
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

/// Handle to the shared transport. Cheap to clone; any number of typed
/// service stubs can be constructed against the same underlying channel.
#[derive(Clone)]
pub struct GrpcConnection {
    endpoint: String,
    credentials: ProjectCredentials,
    channel: AuthedChannel,
}

impl GrpcConnection {
    /// The normalized endpoint this connection was dialed against.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The credential provider fixed at creation.
    pub fn credentials(&self) -> &ProjectCredentials {
        &self.credentials
    }

    /// A clone of the credentialed channel for constructing arbitrary stubs.
    pub fn channel(&self) -> AuthedChannel {
        self.channel.clone()
    }

    /// A Tx broadcast client over this connection.
    pub fn tx_client(&self) -> TxClient {
        TxClient::new(self.channel())
    }

    /// An auth module query client over this connection.
    pub fn auth_query_client(&self) -> AuthQueryClient {
        AuthQueryClient::new(self.channel())
    }
}

impl fmt::Debug for GrpcConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrpcConnection")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// One-shot factory for the shared connection. Owning the once-guarded cell
/// here keeps the single-instantiation guarantee visible in the type rather
/// than hidden in module state; embed one connector wherever the client's
/// lifetime is managed.
#[derive(Debug, Default)]
pub struct GrpcConnector {
    connection: OnceCell<GrpcConnection>,
}

impl GrpcConnector {
    pub fn new() -> GrpcConnector {
        GrpcConnector {
            connection: OnceCell::new(),
        }
    }

    /// Returns the shared connection, dialing it on first use.
    ///
    /// The dial body runs at most once across concurrent callers; callers
    /// arriving while it runs block until it completes, and all receive the
    /// same handle. The identity supplied by the first successful caller is
    /// fixed for the life of the connection; identities on later calls are
    /// ignored. A failed dial is not cached: the next caller repeats it.
    pub async fn get_or_connect(
        &self,
        grpc_uri: &str,
        identity: &ProjectIdentity,
    ) -> Result<&GrpcConnection, GrpcError> {
        self.connection
            .get_or_try_init(|| connect(grpc_uri, identity))
            .await
    }

    /// The connection, if one has been established yet.
    pub fn get(&self) -> Option<&GrpcConnection> {
        self.connection.get()
    }
}

async fn connect(
    grpc_uri: &str,
    identity: &ProjectIdentity,
) -> Result<GrpcConnection, GrpcError> {
    let endpoint = utils::normalize_grpc_endpoint(grpc_uri)?;
    let credentials = ProjectCredentials::new(identity)?;
    if credentials.require_transport_security() && !endpoint.starts_with("https://") {
        return Err(GrpcError::InsecureTransport(endpoint));
    }

    tracing::info!(endpoint = %endpoint, "dialing gRPC endpoint");
    let channel = Endpoint::from_shared(endpoint.clone())?
        .tls_config(ClientTlsConfig::new())?
        .connect()
        .await
        .map_err(|err| {
            tracing::error!(endpoint = %endpoint, error = %err, "gRPC dial failed");
            GrpcError::Connection(err)
        })?;

    Ok(GrpcConnection {
        endpoint,
        credentials: credentials.clone(),
        channel: InterceptedService::new(channel, credentials),
    })
}
