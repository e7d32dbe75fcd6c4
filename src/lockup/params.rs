//! Lockup params, their validation, and the membership sets built from them

use crate::address::{account_aliases, validate_address};
use crate::config::NATIVE_TOKEN;
use crate::error::{LockupError, Result};
use crate::transaction::{
    MSG_ETHEREUM_TX_TYPE_URL, MSG_MICROTX_TYPE_URL, MSG_MULTI_SEND_TYPE_URL, MSG_SEND_TYPE_URL,
    MSG_TRANSFER_TYPE_URL,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const MODULE_NAME: &str = "lockup";

pub const LOCKED_KEY: &str = "Locked";
pub const LOCK_EXEMPT_KEY: &str = "LockExempt";
pub const LOCKED_MESSAGE_TYPES_KEY: &str = "LockedMessageTypes";
pub const LOCKED_TOKEN_DENOMS_KEY: &str = "LockedTokenDenoms";

/// Every key backing [`Params`], in storage order.
pub const PARAM_KEYS: [&str; 4] = [
    LOCKED_KEY,
    LOCK_EXEMPT_KEY,
    LOCKED_MESSAGE_TYPES_KEY,
    LOCKED_TOKEN_DENOMS_KEY,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    pub locked: bool,
    pub lock_exempt: Vec<String>,
    pub locked_message_types: Vec<String>,
    pub locked_token_denoms: Vec<String>,
}

impl Default for Params {
    fn default() -> Self {
        Params::with_native_denom(NATIVE_TOKEN)
    }
}

impl Params {
    /// Unlocked params that, once locked, block the base transfer messages
    /// for `native_denom`.
    pub fn with_native_denom(native_denom: impl Into<String>) -> Self {
        Params {
            locked: false,
            lock_exempt: Vec::new(),
            locked_message_types: default_locked_message_types(),
            locked_token_denoms: vec![native_denom.into()],
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_lock_exempt(&self.lock_exempt)?;
        validate_locked_message_types(&self.locked_message_types)?;
        validate_locked_token_denoms(&self.locked_token_denoms)?;
        Ok(())
    }
}

pub fn default_locked_message_types() -> Vec<String> {
    [
        MSG_SEND_TYPE_URL,
        MSG_MULTI_SEND_TYPE_URL,
        MSG_TRANSFER_TYPE_URL,
        MSG_MICROTX_TYPE_URL,
        MSG_ETHEREUM_TX_TYPE_URL,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn validate_lock_exempt(addresses: &[String]) -> Result<()> {
    for (i, address) in addresses.iter().enumerate() {
        validate_address(address)
            .map_err(|e| e.with_prefix(&format!("invalid lock exempt address {}", i)))?;
    }
    Ok(())
}

pub fn validate_locked_message_types(types: &[String]) -> Result<()> {
    if types.is_empty() {
        return Err(LockupError::InvalidParams(
            "no locked message types".to_string(),
        ));
    }
    if types.iter().any(|t| t.is_empty()) {
        return Err(LockupError::InvalidParams(
            "locked message types cannot contain an empty type url".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_locked_token_denoms(denoms: &[String]) -> Result<()> {
    if denoms.is_empty() {
        return Err(LockupError::InvalidParams(
            "no locked token denoms".to_string(),
        ));
    }
    if denoms.iter().any(|d| d.is_empty()) {
        return Err(LockupError::InvalidParams(
            "locked token denoms cannot contain an empty denom".to_string(),
        ));
    }
    Ok(())
}

pub type AddressSet = HashSet<String>;
pub type DenomSet = HashSet<String>;
pub type TypeSet = HashSet<String>;

pub fn create_set(items: &[String]) -> HashSet<String> {
    items.iter().cloned().collect()
}

/// Membership sets derived from the stored lists for one admission check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockSets {
    pub exempt: AddressSet,
    pub locked_denoms: DenomSet,
    pub locked_message_types: TypeSet,
}

impl LockSets {
    pub fn new(lock_exempt: &[String], locked_denoms: &[String], locked_types: &[String]) -> Self {
        LockSets {
            exempt: create_set(lock_exempt),
            locked_denoms: create_set(locked_denoms),
            locked_message_types: create_set(locked_types),
        }
    }

    pub fn from_params(params: &Params) -> Self {
        LockSets::new(
            &params.lock_exempt,
            &params.locked_token_denoms,
            &params.locked_message_types,
        )
    }

    /// Adds every other encoding of each exempt account under `prefix`, so an
    /// account listed as bech32 is also exempt as a `0x` sender and the
    /// reverse.
    pub fn with_account_aliases(mut self, prefix: &str) -> Self {
        let aliases: Vec<String> = self
            .exempt
            .iter()
            .flat_map(|address| account_aliases(address, prefix))
            .collect();
        self.exempt.extend(aliases);
        self
    }
}
