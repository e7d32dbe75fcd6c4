//! Unpacking of generically encoded messages held by delegated execution containers
use crate::error::{LockupError, Result};
use crate::transaction::types::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;

/// Decodes an [`Any`] into a concrete [`Msg`]. Supplied by the host.
pub trait MsgCodec: Send + Sync {
    fn unpack_any(&self, any: &Any) -> Result<Msg>;
}

/// JSON message codec. Knows the built-in message kinds; additional host
/// kinds can be registered as opaque types.
#[derive(Debug, Clone, Default)]
pub struct JsonCodec {
    opaque_types: HashSet<String>,
}

impl JsonCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `type_url` and decode it as [`Msg::Other`].
    pub fn with_opaque_type(mut self, type_url: impl Into<String>) -> Self {
        self.opaque_types.insert(type_url.into());
        self
    }

    /// Encodes a message into an [`Any`] this codec can unpack.
    pub fn pack(msg: &Msg) -> Result<Any> {
        let value = match msg {
            Msg::Send(m) => encode(m)?,
            Msg::MultiSend(m) => encode(m)?,
            Msg::Transfer(m) => encode(m)?,
            Msg::Microtx(m) => encode(m)?,
            Msg::EthereumTx(m) => encode(m)?,
            Msg::SetWithdrawAddress(m) => encode(m)?,
            Msg::Exec(m) => encode(m)?,
            Msg::Other(m) => m.value.clone(),
        };
        Ok(Any {
            type_url: msg.type_url().to_string(),
            value,
        })
    }
}

impl MsgCodec for JsonCodec {
    fn unpack_any(&self, any: &Any) -> Result<Msg> {
        let url = any.type_url.as_str();
        let msg = match url {
            MSG_SEND_TYPE_URL => Msg::Send(decode(any)?),
            MSG_MULTI_SEND_TYPE_URL => Msg::MultiSend(decode(any)?),
            MSG_TRANSFER_TYPE_URL => Msg::Transfer(decode(any)?),
            MSG_MICROTX_TYPE_URL => Msg::Microtx(decode(any)?),
            MSG_ETHEREUM_TX_TYPE_URL => Msg::EthereumTx(decode(any)?),
            MSG_SET_WITHDRAW_ADDRESS_TYPE_URL => Msg::SetWithdrawAddress(decode(any)?),
            MSG_EXEC_TYPE_URL => Msg::Exec(decode(any)?),
            _ if self.opaque_types.contains(url) => Msg::Other(OpaqueMsg {
                type_url: any.type_url.clone(),
                value: any.value.clone(),
            }),
            _ => return Err(LockupError::decode(url, "no concrete type registered")),
        };
        Ok(msg)
    }
}

fn encode<T: Serialize>(msg: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(msg)?)
}

fn decode<T: DeserializeOwned>(any: &Any) -> Result<T> {
    serde_json::from_slice(&any.value).map_err(|e| LockupError::decode(&any.type_url, e))
}
