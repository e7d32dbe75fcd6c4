//! Per message type lockup policy
//!
//! The registry is a closed map from type URL to a pure rule. A rule is only
//! consulted once the chain is known to be locked and the message type is
//! known to be lock relevant, so every rule answers a single question: does
//! this message move a locked denom from a non-exempt address?
//!
//! A locked type with no registered rule is rejected as `Unhandled`.

use crate::address::normalize_eth_address;
use crate::error::LockupError;
use crate::lockup::{AddressSet, DenomSet};
use crate::transaction::*;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

/// Outcome of evaluating one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Reject(LockupError),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn into_result(self) -> Result<(), LockupError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Reject(err) => Err(err),
        }
    }

    fn locked(reason: &str) -> Self {
        Decision::Reject(LockupError::locked(reason))
    }
}

pub type PolicyFn = fn(&Msg, &AddressSet, &DenomSet) -> Decision;

/// Rules shared by every gate that does not bring its own registry.
pub static DEFAULT_REGISTRY: Lazy<PolicyRegistry> = Lazy::new(PolicyRegistry::default);

#[derive(Clone)]
pub struct PolicyRegistry {
    rules: HashMap<String, PolicyFn>,
}

impl fmt::Debug for PolicyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut types: Vec<&String> = self.rules.keys().collect();
        types.sort();
        f.debug_struct("PolicyRegistry").field("types", &types).finish()
    }
}

impl Default for PolicyRegistry {
    fn default() -> Self {
        let mut registry = PolicyRegistry::empty();
        registry.register(MSG_SEND_TYPE_URL, allow_send);
        registry.register(MSG_MULTI_SEND_TYPE_URL, allow_multi_send);
        registry.register(MSG_TRANSFER_TYPE_URL, allow_transfer);
        registry.register(MSG_MICROTX_TYPE_URL, allow_microtx);
        registry.register(MSG_ETHEREUM_TX_TYPE_URL, allow_ethereum_tx);
        registry
    }
}

impl PolicyRegistry {
    pub fn empty() -> Self {
        PolicyRegistry {
            rules: HashMap::new(),
        }
    }

    /// Registers `rule` for `type_url`, returning any rule it replaced.
    pub fn register(&mut self, type_url: impl Into<String>, rule: PolicyFn) -> Option<PolicyFn> {
        self.rules.insert(type_url.into(), rule)
    }

    pub fn contains(&self, type_url: &str) -> bool {
        self.rules.contains_key(type_url)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Applies the rule registered for `msg`'s type. Must only be called once
    /// the chain is locked and the type is locked.
    pub fn evaluate(&self, msg: &Msg, exempt: &AddressSet, locked_denoms: &DenomSet) -> Decision {
        match self.rules.get(msg.type_url()) {
            Some(rule) => rule(msg, exempt, locked_denoms),
            None => Decision::Reject(LockupError::unhandled(msg.type_url())),
        }
    }
}

/// Rules for message kinds that are checked whether or not their type is in
/// the configured locked set. Matched on the type URL, so an opaque message
/// carrying one of these URLs gets the same treatment. Returns `None` for
/// every other kind.
pub fn always_sensitive(msg: &Msg, exempt: &AddressSet, locked_denoms: &DenomSet) -> Option<Decision> {
    match msg.type_url() {
        MSG_SET_WITHDRAW_ADDRESS_TYPE_URL => Some(Decision::locked(
            "only exempt addresses may submit this Msg type",
        )),
        // Only reachable from inside another MsgExec.
        MSG_EXEC_TYPE_URL => Some(Decision::locked(
            "recursively MsgExec-wrapped Msgs are not allowed",
        )),
        MSG_ETHEREUM_TX_TYPE_URL => Some(allow_ethereum_tx(msg, exempt, locked_denoms)),
        _ => None,
    }
}

fn is_locked(denom: &str, locked_denoms: &DenomSet) -> bool {
    locked_denoms.contains(denom)
}

pub fn allow_send(msg: &Msg, exempt: &AddressSet, locked_denoms: &DenomSet) -> Decision {
    let Msg::Send(send) = msg else {
        return Decision::Reject(LockupError::unhandled(msg.type_url()));
    };
    if !exempt.contains(&send.from_address)
        && send.amount.iter().any(|c| is_locked(&c.denom, locked_denoms))
    {
        return Decision::locked("only exempt addresses may send locked denoms");
    }
    Decision::Allow
}

/// Every input is judged on its own: compliant inputs do not excuse a
/// non-exempt input carrying a locked denom.
pub fn allow_multi_send(msg: &Msg, exempt: &AddressSet, locked_denoms: &DenomSet) -> Decision {
    let Msg::MultiSend(multi) = msg else {
        return Decision::Reject(LockupError::unhandled(msg.type_url()));
    };
    for input in &multi.inputs {
        let locked_token = input.coins.iter().any(|c| is_locked(&c.denom, locked_denoms));
        let blocked_address = !exempt.contains(&input.address);
        if locked_token && blocked_address {
            return Decision::locked(
                "only exempt addresses may be inputs in a MultiSend message containing a locked token denom",
            );
        }
    }
    Decision::Allow
}

pub fn allow_transfer(msg: &Msg, exempt: &AddressSet, locked_denoms: &DenomSet) -> Decision {
    let Msg::Transfer(transfer) = msg else {
        return Decision::Reject(LockupError::unhandled(msg.type_url()));
    };
    if !exempt.contains(&transfer.sender) && is_locked(&transfer.token.denom, locked_denoms) {
        return Decision::locked("only exempt addresses may Transfer a locked token denom over IBC");
    }
    Decision::Allow
}

pub fn allow_microtx(msg: &Msg, exempt: &AddressSet, locked_denoms: &DenomSet) -> Decision {
    let Msg::Microtx(microtx) = msg else {
        return Decision::Reject(LockupError::unhandled(msg.type_url()));
    };
    if !exempt.contains(&microtx.sender) && is_locked(&microtx.amount.denom, locked_denoms) {
        return Decision::locked("only exempt addresses may Microtx a locked token denom");
    }
    Decision::Allow
}

/// Contract calls can move locked value through paths the gate cannot see,
/// so non-exempt senders are rejected regardless of denom.
pub fn allow_ethereum_tx(msg: &Msg, exempt: &AddressSet, _locked_denoms: &DenomSet) -> Decision {
    let Msg::EthereumTx(eth) = msg else {
        return Decision::Reject(LockupError::unhandled(msg.type_url()));
    };
    let exempt_sender = exempt.contains(&eth.from)
        || normalize_eth_address(&eth.from)
            .map(|canonical| exempt.contains(&canonical))
            .unwrap_or(false);
    if !exempt_sender {
        return Decision::locked("only exempt addresses may send a MsgEthereumTx");
    }
    Decision::Allow
}
