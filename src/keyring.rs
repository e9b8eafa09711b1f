//! Key storage and signing capabilities consumed by client configurations.
//!
//! The [`KeyStore`] contract is deliberately narrow: persist, retrieve and
//! delete pkcs8-encoded key material by name. The bundled [`FileKeyStore`]
//! keeps keys on disk via [`signatory::FsKeyStore`]; alternative backends
//! can be supplied through [`crate::config::options::key_store`].
use std::{fmt, path::Path, str::FromStr};

use bip32::PrivateKey;
use cosmrs::crypto::secp256k1::SigningKey;
use k256::SecretKey;
use serde::{Deserialize, Serialize};
use signatory::{pkcs8::DecodePrivateKey, FsKeyStore, KeyName};

use crate::error::KeyStoreError;

/// Directory appended to the user's home directory when no key store is
/// configured.
pub const DEFAULT_KEYSTORE_DIR: &str = "/.monocle/keys";

/// Private key algorithms a configuration can select for account keys.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyAlgorithm {
    Secp256k1,
    Ed25519,
}

impl Default for KeyAlgorithm {
    fn default() -> Self {
        KeyAlgorithm::Secp256k1
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyAlgorithm::Secp256k1 => write!(f, "secp256k1"),
            KeyAlgorithm::Ed25519 => write!(f, "ed25519"),
        }
    }
}

impl FromStr for KeyAlgorithm {
    type Err = KeyStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "secp256k1" => Ok(KeyAlgorithm::Secp256k1),
            "ed25519" => Ok(KeyAlgorithm::Ed25519),
            _ => Err(KeyStoreError::InvalidKey(format!(
                "unsupported key algorithm '{}'",
                s
            ))),
        }
    }
}

/// Storage capability for private key material. All backends persist pkcs8
/// private key documents under unique names.
pub trait KeyStore: Send + Sync {
    /// Store key material under a name. Overwrites any existing entry.
    fn persist(&self, name: &str, key: pkcs8::PrivateKeyDocument) -> Result<(), KeyStoreError>;

    /// Load key material by name. Errors if no entry exists under the name.
    fn retrieve(&self, name: &str) -> Result<pkcs8::PrivateKeyDocument, KeyStoreError>;

    /// Delete the entry under a name. Errors if no entry exists.
    fn delete(&self, name: &str) -> Result<(), KeyStoreError>;

    /// Check if an entry exists under a name.
    fn exists(&self, name: &str) -> Result<bool, KeyStoreError>;
}

/// Signing capability wired in by the caller once keys are loaded. There is
/// no default implementation; configurations may leave it unset.
pub trait KeyManager: Send + Sync {
    /// Sign an arbitrary byte payload.
    fn sign(&self, msg: &[u8]) -> Result<Vec<u8>, KeyStoreError>;

    /// The public key matching the signing key.
    fn public_key(&self) -> cosmrs::crypto::PublicKey;

    /// The algorithm this manager signs with.
    fn algorithm(&self) -> KeyAlgorithm;
}

/// On-disk key store backed by [`signatory::FsKeyStore`].
pub struct FileKeyStore {
    key_path: String,
    key_store: FsKeyStore,
}

impl FileKeyStore {
    /// Creates or opens a store rooted at `path`, creating the directory if
    /// it does not exist.
    pub fn create_or_open(path: &str) -> Result<FileKeyStore, KeyStoreError> {
        let key_store = FsKeyStore::create_or_open(Path::new(path))
            .map_err(|err| KeyStoreError::CouldNotOpenOrCreateKeyStore(err.to_string()))?;

        Ok(FileKeyStore {
            key_path: path.to_string(),
            key_store,
        })
    }

    /// The directory holding the stored keys.
    pub fn path(&self) -> &str {
        &self.key_path
    }
}

impl fmt::Debug for FileKeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileKeyStore")
            .field("key_path", &self.key_path)
            .finish_non_exhaustive()
    }
}

impl KeyStore for FileKeyStore {
    fn persist(&self, name: &str, key: pkcs8::PrivateKeyDocument) -> Result<(), KeyStoreError> {
        let key_name = parse_key_name(name)?;

        self.key_store
            .store(&key_name, &key)
            .map_err(|err| KeyStoreError::UnableToStoreKey(err.to_string()))
    }

    fn retrieve(&self, name: &str) -> Result<pkcs8::PrivateKeyDocument, KeyStoreError> {
        if !self.exists(name)? {
            return Err(KeyStoreError::DoesNotExist(name.to_string()));
        }
        let key_name = parse_key_name(name)?;

        self.key_store
            .load(&key_name)
            .map_err(|err| KeyStoreError::UnableToRetrieveKey(err.to_string()))
    }

    fn delete(&self, name: &str) -> Result<(), KeyStoreError> {
        if !self.exists(name)? {
            return Err(KeyStoreError::DoesNotExist(name.to_string()));
        }
        let key_name = parse_key_name(name)?;

        self.key_store
            .delete(&key_name)
            .map_err(|err| KeyStoreError::UnableToDeleteKey(err.to_string()))
    }

    fn exists(&self, name: &str) -> Result<bool, KeyStoreError> {
        let key_name = parse_key_name(name)?;

        Ok(self.key_store.info(&key_name).is_ok())
    }
}

fn parse_key_name(name: &str) -> Result<KeyName, KeyStoreError> {
    KeyName::new(name).map_err(|_| KeyStoreError::InvalidName(name.to_string()))
}

/// The default on-disk store path, expanded against the user's home
/// directory at call time.
pub fn default_store_path() -> Result<String, KeyStoreError> {
    let home = dirs::home_dir().ok_or_else(|| {
        KeyStoreError::CouldNotOpenOrCreateKeyStore("home directory unavailable".to_string())
    })?;
    let home = home.into_os_string().into_string().map_err(|_| {
        KeyStoreError::CouldNotOpenOrCreateKeyStore("home directory is not valid UTF-8".to_string())
    })?;

    Ok(home + DEFAULT_KEYSTORE_DIR)
}

/// Decodes a stored pkcs8 document into a usable secp256k1 signing key.
pub fn signing_key(store: &dyn KeyStore, name: &str) -> Result<SigningKey, KeyStoreError> {
    let pem = store.retrieve(name)?;

    let decoded_private_key: SecretKey = DecodePrivateKey::from_pkcs8_doc(&pem)
        .map_err(|err| KeyStoreError::InvalidKey(err.to_string()))?;

    SigningKey::from_bytes(&decoded_private_key.to_bytes())
        .map_err(|err| KeyStoreError::InvalidKey(err.to_string()))
}
