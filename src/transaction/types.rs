//! Message and transaction types seen by the ante pipeline
use serde::{Deserialize, Serialize};

pub const MSG_SEND_TYPE_URL: &str = "/cosmos.bank.v1beta1.MsgSend";
pub const MSG_MULTI_SEND_TYPE_URL: &str = "/cosmos.bank.v1beta1.MsgMultiSend";
pub const MSG_TRANSFER_TYPE_URL: &str = "/ibc.applications.transfer.v1.MsgTransfer";
pub const MSG_MICROTX_TYPE_URL: &str = "/microtx.v1.MsgMicrotx";
pub const MSG_ETHEREUM_TX_TYPE_URL: &str = "/ethermint.evm.v1.MsgEthereumTx";
pub const MSG_SET_WITHDRAW_ADDRESS_TYPE_URL: &str =
    "/cosmos.distribution.v1beta1.MsgSetWithdrawAddress";
pub const MSG_EXEC_TYPE_URL: &str = "/cosmos.authz.v1beta1.MsgExec";

/// Type URLs that have a concrete [`Msg`] variant.
pub const BUILTIN_TYPE_URLS: [&str; 7] = [
    MSG_SEND_TYPE_URL,
    MSG_MULTI_SEND_TYPE_URL,
    MSG_TRANSFER_TYPE_URL,
    MSG_MICROTX_TYPE_URL,
    MSG_ETHEREUM_TX_TYPE_URL,
    MSG_SET_WITHDRAW_ADDRESS_TYPE_URL,
    MSG_EXEC_TYPE_URL,
];

pub fn is_builtin_type_url(type_url: &str) -> bool {
    BUILTIN_TYPE_URLS.contains(&type_url)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u128,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Coin {
            denom: denom.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSend {
    pub from_address: String,
    pub to_address: String,
    pub amount: Vec<Coin>,
}

/// One side of a multi-send; used for both inputs and outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankIo {
    pub address: String,
    pub coins: Vec<Coin>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgMultiSend {
    pub inputs: Vec<BankIo>,
    pub outputs: Vec<BankIo>,
}

/// Cross-chain token transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgTransfer {
    pub source_port: String,
    pub source_channel: String,
    pub token: Coin,
    pub sender: String,
    pub receiver: String,
    #[serde(default)]
    pub timeout_height: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgMicrotx {
    pub sender: String,
    pub receiver: String,
    pub amount: Coin,
}

/// Contract-invoking EVM transaction. `from` is a `0x` hex address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgEthereumTx {
    pub from: String,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub value: u128,
    #[serde(default)]
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSetWithdrawAddress {
    pub delegator_address: String,
    pub withdraw_address: String,
}

/// Generically encoded message, unpacked through a [`super::MsgCodec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Any {
    pub type_url: String,
    pub value: Vec<u8>,
}

/// Delegated execution container: `grantee` executes `msgs` on behalf of
/// their signers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgExec {
    pub grantee: String,
    pub msgs: Vec<Any>,
}

/// A message the gate has no special knowledge of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpaqueMsg {
    pub type_url: String,
    #[serde(default)]
    pub value: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Msg {
    Send(MsgSend),
    MultiSend(MsgMultiSend),
    Transfer(MsgTransfer),
    Microtx(MsgMicrotx),
    EthereumTx(MsgEthereumTx),
    SetWithdrawAddress(MsgSetWithdrawAddress),
    Exec(MsgExec),
    Other(OpaqueMsg),
}

impl Msg {
    /// Stable type identifier of this message.
    pub fn type_url(&self) -> &str {
        match self {
            Msg::Send(_) => MSG_SEND_TYPE_URL,
            Msg::MultiSend(_) => MSG_MULTI_SEND_TYPE_URL,
            Msg::Transfer(_) => MSG_TRANSFER_TYPE_URL,
            Msg::Microtx(_) => MSG_MICROTX_TYPE_URL,
            Msg::EthereumTx(_) => MSG_ETHEREUM_TX_TYPE_URL,
            Msg::SetWithdrawAddress(_) => MSG_SET_WITHDRAW_ADDRESS_TYPE_URL,
            Msg::Exec(_) => MSG_EXEC_TYPE_URL,
            Msg::Other(msg) => &msg.type_url,
        }
    }
}

/// A transaction as seen by the ante pipeline: an ordered list of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    msgs: Vec<Msg>,
    #[serde(default)]
    memo: String,
}

impl Tx {
    pub fn new(msgs: Vec<Msg>) -> Self {
        Tx {
            msgs,
            memo: String::new(),
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    pub fn msgs(&self) -> &[Msg] {
        &self.msgs
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }
}

impl From<Msg> for Tx {
    fn from(msg: Msg) -> Self {
        Tx::new(vec![msg])
    }
}
