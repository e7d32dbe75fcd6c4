//! Typed access to the lockup params stored in the `lockup` namespace

use crate::context::Context;
use crate::error::{LockupError, Result};
use crate::lockup::params::*;
use crate::persistence::Subspace;
use serde::de::DeserializeOwned;

/// Accessors for the lockup params. Mutation is expected to come only from
/// genesis and governance; the keeper performs no authorization itself.
#[derive(Debug, Clone, Copy)]
pub struct LockupKeeper {
    subspace: Subspace,
}

impl Default for LockupKeeper {
    fn default() -> Self {
        LockupKeeper::new(Subspace::new(MODULE_NAME))
    }
}

impl LockupKeeper {
    pub fn new(subspace: Subspace) -> Self {
        LockupKeeper { subspace }
    }

    pub fn subspace(&self) -> Subspace {
        self.subspace
    }

    /// Returns the current params, or `NotFound` if any entry has never been
    /// written. Safe to use while handling genesis transactions.
    pub fn get_params_if_set(&self, ctx: &Context) -> Result<Params> {
        for key in PARAM_KEYS {
            if !self.subspace.has(ctx.store(), key)? {
                return Err(LockupError::NotFound {
                    key: key.to_string(),
                });
            }
        }
        Ok(Params {
            locked: self.get_chain_locked(ctx)?,
            lock_exempt: self.get_lock_exempt_addresses(ctx)?,
            locked_message_types: self.get_locked_message_types(ctx)?,
            locked_token_denoms: self.get_locked_token_denoms(ctx)?,
        })
    }

    /// Params query; an uninitialized module is reported as an error rather
    /// than an empty response.
    pub fn params(&self, ctx: &Context) -> Result<Params> {
        self.get_params_if_set(ctx)
    }

    pub fn get_chain_locked(&self, ctx: &Context) -> Result<bool> {
        self.get_or(ctx, LOCKED_KEY, Params::default().locked)
    }

    pub fn set_chain_locked(&self, ctx: &Context, locked: bool) -> Result<()> {
        self.subspace.set(ctx.store(), LOCKED_KEY, &locked)
    }

    pub fn get_lock_exempt_addresses(&self, ctx: &Context) -> Result<Vec<String>> {
        self.get_or(ctx, LOCK_EXEMPT_KEY, Params::default().lock_exempt)
    }

    pub fn get_lock_exempt_addresses_set(&self, ctx: &Context) -> Result<AddressSet> {
        Ok(create_set(&self.get_lock_exempt_addresses(ctx)?))
    }

    pub fn set_lock_exempt_addresses(&self, ctx: &Context, lock_exempt: &[String]) -> Result<()> {
        validate_lock_exempt(lock_exempt)?;
        self.subspace.set(ctx.store(), LOCK_EXEMPT_KEY, &lock_exempt)
    }

    pub fn get_locked_token_denoms(&self, ctx: &Context) -> Result<Vec<String>> {
        self.get_or(ctx, LOCKED_TOKEN_DENOMS_KEY, Params::default().locked_token_denoms)
    }

    pub fn get_locked_token_denoms_set(&self, ctx: &Context) -> Result<DenomSet> {
        Ok(create_set(&self.get_locked_token_denoms(ctx)?))
    }

    pub fn set_locked_token_denoms(&self, ctx: &Context, denoms: &[String]) -> Result<()> {
        validate_locked_token_denoms(denoms)?;
        self.subspace.set(ctx.store(), LOCKED_TOKEN_DENOMS_KEY, &denoms)
    }

    pub fn get_locked_message_types(&self, ctx: &Context) -> Result<Vec<String>> {
        self.get_or(ctx, LOCKED_MESSAGE_TYPES_KEY, Params::default().locked_message_types)
    }

    pub fn get_locked_message_types_set(&self, ctx: &Context) -> Result<TypeSet> {
        Ok(create_set(&self.get_locked_message_types(ctx)?))
    }

    pub fn set_locked_message_types(&self, ctx: &Context, types: &[String]) -> Result<()> {
        validate_locked_message_types(types)?;
        self.subspace.set(ctx.store(), LOCKED_MESSAGE_TYPES_KEY, &types)
    }

    /// Builds every membership set needed by one admission check. Exempt
    /// accounts match in both their bech32 and `0x` forms.
    pub fn lock_sets(&self, ctx: &Context) -> Result<LockSets> {
        let sets = LockSets {
            exempt: self.get_lock_exempt_addresses_set(ctx)?,
            locked_denoms: self.get_locked_token_denoms_set(ctx)?,
            locked_message_types: self.get_locked_message_types_set(ctx)?,
        };
        Ok(sets.with_account_aliases(ctx.account_prefix()))
    }

    fn get_or<T: DeserializeOwned>(&self, ctx: &Context, key: &str, default: T) -> Result<T> {
        Ok(self
            .subspace
            .get_if_exists(ctx.store(), key)?
            .unwrap_or(default))
    }
}
