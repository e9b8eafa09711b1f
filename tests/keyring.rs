use assay::assay;
use monocle::{
    error::KeyStoreError,
    keyring::{self, FileKeyStore, KeyStore},
};
use monocle::cosmrs::bip32::PrivateKey;
use signatory::pkcs8::{DecodePrivateKey, EncodePrivateKey};
use uuid::Uuid;

const SEED: [u8; 32] = [1u8; 32];

fn scratch_path() -> String {
    std::env::temp_dir()
        .join(format!("monocle-keyring-test-{}", Uuid::new_v4()))
        .into_os_string()
        .into_string()
        .unwrap()
}

fn encoded_key() -> pkcs8::PrivateKeyDocument {
    k256::SecretKey::from_be_bytes(&SEED)
        .expect("seed is a valid scalar")
        .to_pkcs8_der()
        .expect("could not pkcs8 encode private key")
}

#[assay]
fn persist_retrieve_delete_round_trip() {
    let store = FileKeyStore::create_or_open(&scratch_path()).unwrap();

    assert!(!store.exists("validator").unwrap());

    store.persist("validator", encoded_key()).unwrap();
    assert!(store.exists("validator").unwrap());

    let loaded = store.retrieve("validator").unwrap();
    let loaded: k256::SecretKey = DecodePrivateKey::from_pkcs8_doc(&loaded).unwrap();
    let expected = k256::SecretKey::from_be_bytes(&SEED).unwrap();
    assert_eq!(loaded.to_bytes(), expected.to_bytes());

    store.delete("validator").unwrap();
    assert!(!store.exists("validator").unwrap());
    assert!(matches!(
        store.retrieve("validator"),
        Err(KeyStoreError::DoesNotExist(_))
    ));
    assert!(matches!(
        store.delete("validator"),
        Err(KeyStoreError::DoesNotExist(_))
    ));
}

#[assay]
fn stored_keys_decode_to_signing_keys() {
    let store = FileKeyStore::create_or_open(&scratch_path()).unwrap();
    store.persist("signer", encoded_key()).unwrap();

    keyring::signing_key(&store, "signer").expect("stored key should decode");

    assert!(matches!(
        keyring::signing_key(&store, "missing"),
        Err(KeyStoreError::DoesNotExist(_))
    ));
}

#[assay]
fn bad_key_names_are_rejected() {
    let store = FileKeyStore::create_or_open(&scratch_path()).unwrap();

    assert!(matches!(
        store.persist("no/slashes", encoded_key()),
        Err(KeyStoreError::InvalidName(_))
    ));
}

#[assay(env = [("HOME", "/tmp/monocle-keyring-home")])]
fn default_path_expands_home() {
    assert_eq!(
        keyring::default_store_path().unwrap(),
        "/tmp/monocle-keyring-home/.monocle/keys"
    );
}

#[assay]
fn open_failure_is_reported() {
    // the store path collides with an existing file
    let path = scratch_path();
    std::fs::write(&path, "not a directory").unwrap();

    assert!(matches!(
        FileKeyStore::create_or_open(&path),
        Err(KeyStoreError::CouldNotOpenOrCreateKeyStore(_))
    ));
}
