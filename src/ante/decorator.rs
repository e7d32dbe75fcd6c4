//! The lockup admission decorator and the constructors that install it

use crate::ante::chain::{chain_ante_decorators, AnteDecorator, AnteHandler, DecoratorChain, WrappedAnteHandler};
use crate::context::Context;
use crate::error::{LockupError, Result};
use crate::lockup::{LockSets, LockupKeeper};
use crate::policy::{always_sensitive, Decision, PolicyRegistry, DEFAULT_REGISTRY};
use crate::transaction::{is_builtin_type_url, Any, Msg, MsgCodec, Tx, MSG_SET_WITHDRAW_ADDRESS_TYPE_URL};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Blocks any transaction that moves a locked token through a locked message
/// type from a non-exempt address while the chain is locked.
#[derive(Clone)]
pub struct LockAnteDecorator {
    keeper: LockupKeeper,
    codec: Arc<dyn MsgCodec>,
    registry: Option<Arc<PolicyRegistry>>,
}

impl LockAnteDecorator {
    pub fn new(keeper: LockupKeeper, codec: Arc<dyn MsgCodec>) -> Self {
        LockAnteDecorator {
            keeper,
            codec,
            registry: None,
        }
    }

    /// Uses `registry` instead of the default rules.
    pub fn with_registry(mut self, registry: Arc<PolicyRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    fn registry(&self) -> &PolicyRegistry {
        match &self.registry {
            Some(registry) => registry.as_ref(),
            None => &*DEFAULT_REGISTRY,
        }
    }

    /// Checks every message of `tx` against `sets`, unwrapping one level of
    /// MsgExec. The first rejected message decides the outcome.
    pub fn check_tx(&self, tx: &Tx, sets: &LockSets) -> Result<()> {
        for msg in tx.msgs() {
            let msg = self.resolve(msg)?;
            match msg.as_ref() {
                Msg::Exec(exec) => {
                    for any in &exec.msgs {
                        let inner = self.unpack(any)?;
                        let inner = self.resolve(&inner)?;
                        self.is_acceptable(&inner, sets)?;
                    }
                }
                other => self.is_acceptable(other, sets)?,
            }
        }
        Ok(())
    }

    /// Decodes an opaque message that carries a built-in type URL into its
    /// concrete variant, so it is judged by that type's rule. A payload that
    /// does not decode rejects the message.
    fn resolve<'a>(&self, msg: &'a Msg) -> Result<Cow<'a, Msg>> {
        let Msg::Other(opaque) = msg else {
            return Ok(Cow::Borrowed(msg));
        };
        if !is_builtin_type_url(&opaque.type_url) {
            return Ok(Cow::Borrowed(msg));
        }
        // refused whatever its payload
        if opaque.type_url == MSG_SET_WITHDRAW_ADDRESS_TYPE_URL {
            return Ok(Cow::Borrowed(msg));
        }
        let any = Any {
            type_url: opaque.type_url.clone(),
            value: opaque.value.clone(),
        };
        match self.unpack(&any)? {
            Msg::Other(_) => Err(LockupError::decode(
                &opaque.type_url,
                "built-in message type decoded as an opaque message",
            )),
            concrete => Ok(Cow::Owned(concrete)),
        }
    }

    fn unpack(&self, any: &Any) -> Result<Msg> {
        self.codec.unpack_any(any).map_err(|e| {
            warn!(type_url = %any.type_url, "unable to unpack message: {}", e);
            e
        })
    }

    /// Decides whether `msg` is permissible under a locked chain.
    pub fn is_acceptable(&self, msg: &Msg, sets: &LockSets) -> Result<()> {
        let decision = match always_sensitive(msg, &sets.exempt, &sets.locked_denoms) {
            Some(decision) => decision,
            None if sets.locked_message_types.contains(msg.type_url()) => {
                self.registry()
                    .evaluate(msg, &sets.exempt, &sets.locked_denoms)
            }
            None => Decision::Allow,
        };

        if let Decision::Reject(err) = &decision {
            match err {
                LockupError::Unhandled { type_url } => {
                    error!(%type_url, "locked message type has no lockup policy, rejecting");
                }
                _ => info!(type_url = %msg.type_url(), "transaction blocked because of a message: {}", err),
            }
        }
        decision.into_result()
    }
}

impl AnteDecorator for LockAnteDecorator {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &Tx,
        simulate: bool,
        next: &dyn AnteHandler,
    ) -> Result<Context> {
        if !self.keeper.get_chain_locked(&ctx)? {
            return next.handle(ctx, tx, simulate);
        }

        let sets = self.keeper.lock_sets(&ctx)?;
        self.check_tx(tx, &sets)?;
        debug!(
            height = ctx.block_height(),
            msgs = tx.msgs().len(),
            "transaction passed lockup checks"
        );
        next.handle(ctx, tx, simulate)
    }
}

pub fn new_lockup_ante_decorator(keeper: LockupKeeper, codec: Arc<dyn MsgCodec>) -> LockAnteDecorator {
    LockAnteDecorator::new(keeper, codec)
}

/// A handler that runs only the lockup checks.
pub fn new_lockup_ante_handler(keeper: LockupKeeper, codec: Arc<dyn MsgCodec>) -> DecoratorChain {
    let lockup: Arc<dyn AnteDecorator> = Arc::new(new_lockup_ante_decorator(keeper, codec));
    chain_ante_decorators(vec![lockup])
}

/// Runs `ante_handler` first, then the lockup checks. The wrapped handler
/// stays outermost so any context setup it performs happens before lockup.
pub fn new_wrapped_lockup_ante_handler(
    ante_handler: Arc<dyn AnteHandler>,
    keeper: LockupKeeper,
    codec: Arc<dyn MsgCodec>,
) -> DecoratorChain {
    let wrapped: Arc<dyn AnteDecorator> = Arc::new(WrappedAnteHandler::new(ante_handler));
    let lockup: Arc<dyn AnteDecorator> = Arc::new(new_lockup_ante_decorator(keeper, codec));
    chain_ante_decorators(vec![wrapped, lockup])
}
