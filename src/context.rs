//! Execution context threaded through the ante pipeline

use crate::config::DEFAULT_ACCOUNT_PREFIX;
use crate::persistence::ParamStore;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

/// Per-transaction execution context. Cloning is cheap; the parameter store is
/// shared.
#[derive(Clone)]
pub struct Context {
    store: Arc<dyn ParamStore>,
    chain_id: String,
    account_prefix: String,
    block_height: u64,
    block_time: DateTime<Utc>,
    is_check_tx: bool,
}

impl Context {
    pub fn new(store: Arc<dyn ParamStore>, chain_id: impl Into<String>) -> Self {
        Context {
            store,
            chain_id: chain_id.into(),
            account_prefix: DEFAULT_ACCOUNT_PREFIX.to_string(),
            block_height: 0,
            block_time: Utc::now(),
            is_check_tx: false,
        }
    }

    /// Bech32 prefix of native accounts on this chain.
    pub fn with_account_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.account_prefix = prefix.into();
        self
    }

    pub fn with_block_height(mut self, height: u64) -> Self {
        self.block_height = height;
        self
    }

    pub fn with_block_time(mut self, time: DateTime<Utc>) -> Self {
        self.block_time = time;
        self
    }

    pub fn with_check_tx(mut self, is_check_tx: bool) -> Self {
        self.is_check_tx = is_check_tx;
        self
    }

    pub fn store(&self) -> &dyn ParamStore {
        self.store.as_ref()
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn account_prefix(&self) -> &str {
        &self.account_prefix
    }

    pub fn block_height(&self) -> u64 {
        self.block_height
    }

    pub fn block_time(&self) -> DateTime<Utc> {
        self.block_time
    }

    pub fn is_check_tx(&self) -> bool {
        self.is_check_tx
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Context")
            .field("chain_id", &self.chain_id)
            .field("account_prefix", &self.account_prefix)
            .field("block_height", &self.block_height)
            .field("block_time", &self.block_time)
            .field("is_check_tx", &self.is_check_tx)
            .finish()
    }
}

/// Two contexts are equal when they describe the same block on the same store.
impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.store, &other.store)
            && self.chain_id == other.chain_id
            && self.account_prefix == other.account_prefix
            && self.block_height == other.block_height
            && self.block_time == other.block_time
            && self.is_check_tx == other.is_check_tx
    }
}
