use http::Uri;

use crate::error::GrpcError;

/// Normalizes a gRPC endpoint. An explicit port is required; a missing
/// scheme defaults to https since the gateway only speaks TLS.
pub(crate) fn normalize_grpc_endpoint(input: &str) -> Result<String, GrpcError> {
    if input.is_empty() {
        return Err(GrpcError::InvalidEndpoint("empty endpoint".to_string()));
    }

    let uri = input
        .parse::<Uri>()
        .map_err(|err| GrpcError::InvalidEndpoint(format!("{}: {}", input, err)))?;

    if uri.port().is_none() {
        return Err(GrpcError::InvalidEndpoint(format!(
            "{}: gRPC endpoints must name a port",
            input
        )));
    }

    if uri.scheme().is_none() {
        let uri = Uri::builder()
            .scheme("https")
            // the input is a bare authority here, e.g. "host:9090"
            .authority(input)
            .path_and_query("/")
            .build()
            .map_err(|err| GrpcError::InvalidEndpoint(format!("{}: {}", input, err)))?;

        return Ok(uri.to_string());
    }

    Ok(uri.to_string())
}
