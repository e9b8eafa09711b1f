//! Bech32 prefix configuration for the three address roles a chain exposes.
use serde::{Deserialize, Serialize};

/// The six human-readable parts used when rendering addresses and public
/// keys for accounts, validators and consensus nodes.
///
/// Defaulting is all-or-nothing: the builder replaces the whole record with
/// [`AddressPrefixConfig::cosmos`] unless both triples are complete, so a
/// finished [`crate::config::ClientConfig`] never carries a hybrid of caller
/// and built-in prefixes.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct AddressPrefixConfig {
    #[serde(rename = "account-addr")]
    pub account_addr: String,
    #[serde(rename = "validator-addr")]
    pub validator_addr: String,
    #[serde(rename = "consensus-addr")]
    pub consensus_addr: String,
    #[serde(rename = "account-pub")]
    pub account_pub: String,
    #[serde(rename = "validator-pub")]
    pub validator_pub: String,
    #[serde(rename = "consensus-pub")]
    pub consensus_pub: String,
}

impl AddressPrefixConfig {
    /// The standard Cosmos Hub prefix family.
    pub fn cosmos() -> Self {
        AddressPrefixConfig {
            account_addr: "cosmos".to_string(),
            validator_addr: "cosmosvaloper".to_string(),
            consensus_addr: "cosmosvalcons".to_string(),
            account_pub: "cosmospub".to_string(),
            validator_pub: "cosmosvaloperpub".to_string(),
            consensus_pub: "cosmosvalconspub".to_string(),
        }
    }

    pub fn address_triple_complete(&self) -> bool {
        !self.account_addr.is_empty()
            && !self.validator_addr.is_empty()
            && !self.consensus_addr.is_empty()
    }

    pub fn pubkey_triple_complete(&self) -> bool {
        !self.account_pub.is_empty()
            && !self.validator_pub.is_empty()
            && !self.consensus_pub.is_empty()
    }

    /// Both triples present. Used by the defaulting pass.
    pub fn is_complete(&self) -> bool {
        self.address_triple_complete() && self.pubkey_triple_complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triple_checks_are_independent() {
        let mut prefixes = AddressPrefixConfig::cosmos();
        prefixes.consensus_pub = String::new();

        assert!(prefixes.address_triple_complete());
        assert!(!prefixes.pubkey_triple_complete());
        assert!(!prefixes.is_complete());
    }

    #[test]
    fn default_record_is_incomplete() {
        assert!(!AddressPrefixConfig::default().is_complete());
        assert!(AddressPrefixConfig::cosmos().is_complete());
    }
}
