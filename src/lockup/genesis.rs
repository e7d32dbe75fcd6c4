//! Import and export of the lockup params at chain genesis

use crate::context::Context;
use crate::error::Result;
use crate::lockup::keeper::LockupKeeper;
use crate::lockup::params::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    pub params: Params,
}

impl GenesisState {
    pub fn new(params: Params) -> Self {
        GenesisState { params }
    }

    pub fn validate_basic(&self) -> Result<()> {
        validate_lock_exempt(&self.params.lock_exempt)
            .map_err(|e| e.with_prefix("Invalid LockExempt GenesisState"))?;
        validate_locked_message_types(&self.params.locked_message_types)
            .map_err(|e| e.with_prefix("Invalid LockedMessageTypes GenesisState"))?;
        validate_locked_token_denoms(&self.params.locked_token_denoms)
            .map_err(|e| e.with_prefix("Invalid LockedTokenDenoms GenesisState"))?;
        Ok(())
    }
}

/// Writes every lockup param from `genesis`.
pub fn init_genesis(ctx: &Context, keeper: &LockupKeeper, genesis: &GenesisState) -> Result<()> {
    genesis.validate_basic()?;
    let params = &genesis.params;
    keeper.set_chain_locked(ctx, params.locked)?;
    keeper.set_lock_exempt_addresses(ctx, &params.lock_exempt)?;
    keeper.set_locked_message_types(ctx, &params.locked_message_types)?;
    keeper.set_locked_token_denoms(ctx, &params.locked_token_denoms)?;
    tracing::info!(
        locked = params.locked,
        exempt = params.lock_exempt.len(),
        "Initialized lockup genesis"
    );
    Ok(())
}

pub fn export_genesis(ctx: &Context, keeper: &LockupKeeper) -> Result<GenesisState> {
    Ok(GenesisState {
        params: Params {
            locked: keeper.get_chain_locked(ctx)?,
            lock_exempt: keeper.get_lock_exempt_addresses(ctx)?,
            locked_message_types: keeper.get_locked_message_types(ctx)?,
            locked_token_denoms: keeper.get_locked_token_denoms(ctx)?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LockupError;
    use crate::persistence::InMemoryParamStore;
    use std::sync::Arc;

    #[test]
    fn test_init_then_export() {
        let ctx = Context::new(Arc::new(InMemoryParamStore::new()), "test-chain");
        let keeper = LockupKeeper::default();
        let mut params = Params::with_native_denom("alt");
        params.locked = true;
        params.lock_exempt = vec!["0x0000000000000000000000000000000000000000".to_string()];
        let genesis = GenesisState::new(params);

        init_genesis(&ctx, &keeper, &genesis).unwrap();
        assert_eq!(export_genesis(&ctx, &keeper).unwrap(), genesis);
        assert_eq!(keeper.get_params_if_set(&ctx).unwrap(), genesis.params);
    }

    #[test]
    fn test_invalid_genesis_writes_nothing() {
        let ctx = Context::new(Arc::new(InMemoryParamStore::new()), "test-chain");
        let keeper = LockupKeeper::default();
        let mut genesis = GenesisState::default();
        genesis.params.locked_token_denoms.clear();

        let err = init_genesis(&ctx, &keeper, &genesis).unwrap_err();
        assert!(err.to_string().contains("LockedTokenDenoms"));
        assert!(matches!(
            keeper.get_params_if_set(&ctx),
            Err(LockupError::NotFound { .. })
        ));
    }

    #[test]
    fn test_genesis_json_shape() {
        let genesis: GenesisState = serde_json::from_str(
            r#"{"params": {
                "locked": true,
                "lock_exempt": ["0x0000000000000000000000000000000000000000"],
                "locked_message_types": ["/cosmos.bank.v1beta1.MsgSend"],
                "locked_token_denoms": ["alt"]
            }}"#,
        )
        .unwrap();
        assert!(genesis.params.locked);
        assert!(genesis.validate_basic().is_ok());
    }
}
