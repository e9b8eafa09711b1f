//! Monocle is a client library for Cosmos SDK chains that sit behind
//! credentialed gateway endpoints. It turns a sparse set of caller supplied
//! values into a fully validated [`config::ClientConfig`], and maintains one
//! authenticated gRPC connection shared by every service stub in the process.
//!
//! Construction is strict about identity (node endpoint and chain id are
//! required) and permissive about everything else: optional fields left unset
//! or set to structurally invalid values are silently normalized to built-in
//! defaults during a fixed defaulting pass.
pub extern crate cosmrs;

pub use config::{ClientConfig, ConfigOption};
pub use grpc::{GrpcConnection, GrpcConnector};

pub mod address;
pub mod coin;
pub mod config;
pub mod error;
pub mod grpc;
pub mod keyring;
pub mod prelude;
pub mod rpc;
pub mod token;

mod utils;
