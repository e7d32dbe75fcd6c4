//! Ante handler and decorator traits, and the chain that links decorators

use crate::context::Context;
use crate::error::Result;
use crate::transaction::Tx;
use std::sync::Arc;

/// A complete validation step run before a transaction touches state.
pub trait AnteHandler: Send + Sync {
    fn handle(&self, ctx: Context, tx: &Tx, simulate: bool) -> Result<Context>;
}

impl<F> AnteHandler for F
where
    F: Fn(Context, &Tx, bool) -> Result<Context> + Send + Sync,
{
    fn handle(&self, ctx: Context, tx: &Tx, simulate: bool) -> Result<Context> {
        self(ctx, tx, simulate)
    }
}

/// One link of an ante pipeline. A decorator either returns an error or
/// hands the context on to `next`.
pub trait AnteDecorator: Send + Sync {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &Tx,
        simulate: bool,
        next: &dyn AnteHandler,
    ) -> Result<Context>;
}

/// Linear pipeline built by [`chain_ante_decorators`].
pub struct DecoratorChain {
    decorators: Vec<Arc<dyn AnteDecorator>>,
}

impl DecoratorChain {
    pub fn len(&self) -> usize {
        self.decorators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }
}

impl AnteHandler for DecoratorChain {
    fn handle(&self, ctx: Context, tx: &Tx, simulate: bool) -> Result<Context> {
        Remaining(&self.decorators).handle(ctx, tx, simulate)
    }
}

/// The tail of a chain, itself usable as the `next` handler.
struct Remaining<'a>(&'a [Arc<dyn AnteDecorator>]);

impl AnteHandler for Remaining<'_> {
    fn handle(&self, ctx: Context, tx: &Tx, simulate: bool) -> Result<Context> {
        match self.0.split_first() {
            Some((first, rest)) => first.ante_handle(ctx, tx, simulate, &Remaining(rest)),
            None => Ok(ctx),
        }
    }
}

/// Runs `decorators` in order. The terminal handler returns the context
/// unchanged.
pub fn chain_ante_decorators(decorators: Vec<Arc<dyn AnteDecorator>>) -> DecoratorChain {
    DecoratorChain { decorators }
}

/// Adapts an opaque, already composed [`AnteHandler`] into a decorator so
/// further decorators can be appended after it.
#[derive(Clone)]
pub struct WrappedAnteHandler {
    inner: Arc<dyn AnteHandler>,
}

impl WrappedAnteHandler {
    pub fn new(inner: Arc<dyn AnteHandler>) -> Self {
        WrappedAnteHandler { inner }
    }
}

impl AnteDecorator for WrappedAnteHandler {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &Tx,
        simulate: bool,
        next: &dyn AnteHandler,
    ) -> Result<Context> {
        let ctx = self.inner.handle(ctx, tx, simulate)?;
        next.handle(ctx, tx, simulate)
    }
}
