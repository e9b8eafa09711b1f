//! A simple coin type convertable from [`cosmrs::Coin`] and the Cosmos SDK
//! proto coin type, plus parsing and validity checks for fee amounts written
//! as strings like `4000uatom` or `4000uatom,12uosmo`.
use std::{collections::HashSet, fmt, str::FromStr};

use cosmrs::Denom;
use eyre::{eyre, Report, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Coin {
    pub amount: u128,
    pub denom: String,
}

impl Coin {
    /// A coin is valid if its amount is positive and its denom parses as a
    /// canonical Cosmos denomination.
    pub fn is_valid(&self) -> bool {
        self.amount > 0 && self.denom.parse::<Denom>().is_ok()
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Coin {
    type Err = Report;

    fn from_str(s: &str) -> Result<Coin> {
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| eyre!("missing denomination in coin '{}'", s))?;
        let (amount, denom) = s.split_at(split);
        if amount.is_empty() {
            return Err(eyre!("missing amount in coin '{}'", s));
        }
        denom
            .parse::<Denom>()
            .map_err(|e| eyre!("invalid denomination '{}': {}", denom, e))?;

        Ok(Coin {
            amount: amount.parse::<u128>()?,
            denom: denom.to_string(),
        })
    }
}

/// Parses a comma separated list of coins. Parsing puts no constraint on
/// amounts or denom uniqueness; see [`coins_valid`] for the semantic checks.
pub fn parse_coins(input: &str) -> Result<Vec<Coin>> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    input
        .split(',')
        .map(|part| part.trim().parse::<Coin>())
        .collect()
}

/// Validity predicate for a fee amount: non-empty, every coin valid, and no
/// repeated denominations.
pub fn coins_valid(coins: &[Coin]) -> bool {
    if coins.is_empty() {
        return false;
    }

    let mut denoms = HashSet::new();
    coins
        .iter()
        .all(|coin| coin.is_valid() && denoms.insert(coin.denom.as_str()))
}

impl From<Coin> for cosmos_sdk_proto::cosmos::base::v1beta1::Coin {
    fn from(coin: Coin) -> Self {
        cosmos_sdk_proto::cosmos::base::v1beta1::Coin {
            amount: coin.amount.to_string(),
            denom: coin.denom,
        }
    }
}

impl TryFrom<Coin> for cosmrs::Coin {
    type Error = Report;

    fn try_from(coin: Coin) -> Result<cosmrs::Coin, Self::Error> {
        cosmrs::Coin::try_from(&coin)
    }
}

impl TryFrom<&Coin> for cosmrs::Coin {
    type Error = Report;

    fn try_from(coin: &Coin) -> Result<cosmrs::Coin, Self::Error> {
        Ok(cosmrs::Coin {
            denom: coin.denom.parse::<Denom>()?,
            amount: (coin.amount as u64).into(),
        })
    }
}

impl TryFrom<cosmos_sdk_proto::cosmos::base::v1beta1::Coin> for Coin {
    type Error = Report;

    fn try_from(coin: cosmos_sdk_proto::cosmos::base::v1beta1::Coin) -> Result<Coin, Self::Error> {
        Coin::try_from(&coin)
    }
}

impl TryFrom<&cosmos_sdk_proto::cosmos::base::v1beta1::Coin> for Coin {
    type Error = Report;

    fn try_from(coin: &cosmos_sdk_proto::cosmos::base::v1beta1::Coin) -> Result<Coin, Self::Error> {
        Ok(Coin {
            denom: coin.denom.clone(),
            amount: coin.amount.parse()?,
        })
    }
}
