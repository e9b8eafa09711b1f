//! Token unit conversion capability.
use eyre::Result;

use crate::coin::Coin;

/// Converts between a token's display denomination and its base (minimal)
/// denomination. Chains with token metadata can wire in their own
/// implementation through [`crate::config::options::token_manager`].
pub trait TokenManager: Send + Sync {
    /// Converts a coin to its base denomination.
    fn to_min_coin(&self, coin: &Coin) -> Result<Coin>;

    /// Converts a coin to its display denomination.
    fn to_main_coin(&self, coin: &Coin) -> Result<Coin>;
}

/// Built-in implementation used when no token metadata source is configured.
/// Treats every denomination as already minimal.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultTokenManager;

impl TokenManager for DefaultTokenManager {
    fn to_min_coin(&self, coin: &Coin) -> Result<Coin> {
        Ok(coin.clone())
    }

    fn to_main_coin(&self, coin: &Coin) -> Result<Coin> {
        Ok(coin.clone())
    }
}
