//! Integration tests for the lockup ante handler

use lockup::address::eth_to_bech32;
use lockup::ante::{new_lockup_ante_handler, new_wrapped_lockup_ante_handler, AnteHandler};
use lockup::context::Context;
use lockup::error::LockupError;
use lockup::lockup::{init_genesis, GenesisState, LockupKeeper, Params};
use lockup::persistence::InMemoryParamStore;
use lockup::transaction::*;
use parking_lot::Mutex;
use std::sync::Arc;

const ZERO: &str = "0x0000000000000000000000000000000000000000";
const ONES: &str = "0x1111111111111111111111111111111111111111";

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Context over a fresh store seeded with the given lock state
fn seeded_ctx(locked: bool, locked_types: &[&str]) -> Result<Context, LockupError> {
    let ctx = Context::new(Arc::new(InMemoryParamStore::new()), "althea_7357-1").with_block_height(10);
    let params = Params {
        locked,
        lock_exempt: vec![ZERO.to_string()],
        locked_message_types: locked_types.iter().map(|t| t.to_string()).collect(),
        locked_token_denoms: vec!["alt".to_string()],
    };
    init_genesis(&ctx, &LockupKeeper::default(), &GenesisState::new(params))?;
    Ok(ctx)
}

/// Scenario state: chain locked, bank sends and multi-sends gated
fn scenario_ctx() -> Result<Context, LockupError> {
    seeded_ctx(true, &[MSG_SEND_TYPE_URL, MSG_MULTI_SEND_TYPE_URL])
}

fn handler() -> impl AnteHandler {
    new_lockup_ante_handler(LockupKeeper::default(), Arc::new(JsonCodec::new()))
}

fn send(from: &str, to: &str, denom: &str) -> Msg {
    Msg::Send(MsgSend {
        from_address: from.to_string(),
        to_address: to.to_string(),
        amount: vec![Coin::new(denom, 1)],
    })
}

fn exec(msgs: &[Msg]) -> Result<Msg, LockupError> {
    Ok(Msg::Exec(MsgExec {
        grantee: ONES.to_string(),
        msgs: msgs.iter().map(JsonCodec::pack).collect::<Result<Vec<_>, _>>()?,
    }))
}

fn is_locked(result: Result<Context, LockupError>) -> bool {
    matches!(result, Err(LockupError::Locked(_)))
}

#[test]
fn test_exempt_sender_may_move_locked_denom() -> TestResult {
    let ctx = scenario_ctx()?;
    let tx = Tx::from(send(ZERO, ONES, "alt"));
    let out = handler().handle(ctx.clone(), &tx, false)?;
    assert_eq!(out, ctx);
    Ok(())
}

#[test]
fn test_non_exempt_sender_blocked_for_locked_denom() -> TestResult {
    let ctx = scenario_ctx()?;
    let tx = Tx::from(send(ONES, ZERO, "alt"));
    let err = handler().handle(ctx, &tx, false).unwrap_err();
    assert!(matches!(err, LockupError::Locked(_)));
    assert!(err.is_policy_rejection());
    Ok(())
}

#[test]
fn test_unlocked_denom_is_accepted() -> TestResult {
    let ctx = scenario_ctx()?;
    let tx = Tx::from(send(ONES, ZERO, "other"));
    assert!(handler().handle(ctx, &tx, false).is_ok());
    Ok(())
}

#[test]
fn test_multi_send_with_one_bad_input_is_rejected() -> TestResult {
    let ctx = scenario_ctx()?;
    let multi = Msg::MultiSend(MsgMultiSend {
        inputs: vec![
            BankIo {
                address: ZERO.to_string(),
                coins: vec![Coin::new("alt", 1)],
            },
            BankIo {
                address: ONES.to_string(),
                coins: vec![Coin::new("alt", 1)],
            },
        ],
        outputs: vec![BankIo {
            address: ZERO.to_string(),
            coins: vec![Coin::new("alt", 2)],
        }],
    });
    assert!(is_locked(handler().handle(ctx, &Tx::from(multi), false)));
    Ok(())
}

#[test]
fn test_unlocked_chain_accepts_everything() -> TestResult {
    let ctx = seeded_ctx(false, &[MSG_SEND_TYPE_URL, "/custom.v1.MsgPay"])?;
    let tx = Tx::new(vec![
        send(ONES, ZERO, "alt"),
        Msg::SetWithdrawAddress(MsgSetWithdrawAddress {
            delegator_address: ONES.to_string(),
            withdraw_address: ONES.to_string(),
        }),
        Msg::Other(OpaqueMsg {
            type_url: "/custom.v1.MsgPay".to_string(),
            value: vec![],
        }),
    ]);
    assert!(handler().handle(ctx, &tx, false).is_ok());
    Ok(())
}

#[test]
fn test_uninitialized_store_is_unlocked() -> TestResult {
    let ctx = Context::new(Arc::new(InMemoryParamStore::new()), "althea_7357-1");
    let tx = Tx::from(send(ONES, ZERO, lockup::config::NATIVE_TOKEN));
    assert!(handler().handle(ctx, &tx, false).is_ok());
    Ok(())
}

#[test]
fn test_exec_inner_messages_are_checked() -> TestResult {
    let ctx = scenario_ctx()?;

    let allowed = Tx::from(exec(&[send(ZERO, ONES, "alt"), send(ONES, ZERO, "other")])?);
    assert!(handler().handle(ctx.clone(), &allowed, false).is_ok());

    let blocked = Tx::from(exec(&[send(ZERO, ONES, "alt"), send(ONES, ZERO, "alt")])?);
    assert!(is_locked(handler().handle(ctx, &blocked, false)));
    Ok(())
}

#[test]
fn test_nested_exec_is_rejected() -> TestResult {
    let ctx = scenario_ctx()?;
    // every doubly nested message would pass on its own
    let inner = exec(&[send(ZERO, ONES, "alt")])?;
    let tx = Tx::from(exec(&[inner])?);
    assert!(is_locked(handler().handle(ctx, &tx, false)));
    Ok(())
}

#[test]
fn test_undecodable_exec_message_rejects_tx() -> TestResult {
    let ctx = scenario_ctx()?;
    let tx = Tx::from(Msg::Exec(MsgExec {
        grantee: ZERO.to_string(),
        msgs: vec![Any {
            type_url: MSG_SEND_TYPE_URL.to_string(),
            value: b"definitely not a MsgSend".to_vec(),
        }],
    }));
    let err = handler().handle(ctx, &tx, false).unwrap_err();
    assert!(matches!(err, LockupError::Decode { ref type_url, .. } if type_url == MSG_SEND_TYPE_URL));
    Ok(())
}

#[test]
fn test_unknown_exec_message_type_rejects_tx() -> TestResult {
    let ctx = scenario_ctx()?;
    let tx = Tx::from(Msg::Exec(MsgExec {
        grantee: ZERO.to_string(),
        msgs: vec![Any {
            type_url: "/unknown.v1.MsgThing".to_string(),
            value: vec![],
        }],
    }));
    assert!(matches!(
        handler().handle(ctx.clone(), &tx, false),
        Err(LockupError::Decode { .. })
    ));

    // a codec that knows the type lets the opaque message through
    let codec = JsonCodec::new().with_opaque_type("/unknown.v1.MsgThing");
    let tolerant = new_lockup_ante_handler(LockupKeeper::default(), Arc::new(codec));
    assert!(tolerant.handle(ctx, &tx, false).is_ok());
    Ok(())
}

#[test]
fn test_withdraw_address_change_always_blocked() -> TestResult {
    let ctx = scenario_ctx()?;
    // even the exempt address may not redirect rewards
    let tx = Tx::from(Msg::SetWithdrawAddress(MsgSetWithdrawAddress {
        delegator_address: ZERO.to_string(),
        withdraw_address: ZERO.to_string(),
    }));
    assert!(is_locked(handler().handle(ctx.clone(), &tx, false)));

    let wrapped = Tx::from(exec(&[Msg::SetWithdrawAddress(MsgSetWithdrawAddress {
        delegator_address: ONES.to_string(),
        withdraw_address: ONES.to_string(),
    })])?);
    assert!(is_locked(handler().handle(ctx, &wrapped, false)));
    Ok(())
}

#[test]
fn test_ethereum_tx_requires_exempt_sender() -> TestResult {
    let ctx = scenario_ctx()?;
    let eth = |from: &str| {
        Tx::from(Msg::EthereumTx(MsgEthereumTx {
            from: from.to_string(),
            to: Some(ONES.to_string()),
            value: 0,
            data: vec![0xa9, 0x05, 0x9c, 0xbb],
        }))
    };

    assert!(handler().handle(ctx.clone(), &eth(ZERO), false).is_ok());
    assert!(is_locked(handler().handle(ctx.clone(), &eth(ONES), false)));
    Ok(())
}

#[test]
fn test_ethereum_tx_sender_matched_case_insensitively() -> TestResult {
    let ctx = seeded_ctx(true, &[MSG_SEND_TYPE_URL])?;
    let keeper = LockupKeeper::default();
    let exempt = "0xabcdefabcdefabcdefabcdefabcdefabcdefabcd";
    keeper.set_lock_exempt_addresses(&ctx, &[exempt.to_string()])?;

    let tx = Tx::from(Msg::EthereumTx(MsgEthereumTx {
        from: exempt.to_uppercase().replacen("0X", "0x", 1),
        to: None,
        value: 5,
        data: vec![],
    }));
    assert!(handler().handle(ctx, &tx, false).is_ok());
    Ok(())
}

#[test]
fn test_locked_type_without_policy_is_unhandled() -> TestResult {
    let ctx = seeded_ctx(true, &[MSG_SEND_TYPE_URL, "/custom.v1.MsgPay"])?;
    let tx = Tx::from(Msg::Other(OpaqueMsg {
        type_url: "/custom.v1.MsgPay".to_string(),
        value: vec![],
    }));
    let err = handler().handle(ctx, &tx, false).unwrap_err();
    assert_eq!(err, LockupError::unhandled("/custom.v1.MsgPay"));
    assert!(!err.is_policy_rejection());
    Ok(())
}

#[test]
fn test_same_tx_same_state_same_decision() -> TestResult {
    let ctx = scenario_ctx()?;
    let handler = handler();
    let tx = Tx::new(vec![send(ZERO, ONES, "alt"), send(ONES, ZERO, "alt")]);

    let first = handler.handle(ctx.clone(), &tx, false);
    let second = handler.handle(ctx.clone(), &tx, true);
    assert_eq!(first, second);
    assert!(is_locked(first));
    Ok(())
}

#[test]
fn test_governance_update_applies_to_next_tx() -> TestResult {
    let ctx = scenario_ctx()?;
    let keeper = LockupKeeper::default();
    let handler = handler();
    let tx = Tx::from(send(ONES, ZERO, "alt"));

    assert!(is_locked(handler.handle(ctx.clone(), &tx, false)));
    keeper.set_locked_token_denoms(&ctx, &["stake".to_string()])?;
    assert!(handler.handle(ctx.clone(), &tx, false).is_ok());
    keeper.set_chain_locked(&ctx, false)?;
    keeper.set_locked_token_denoms(&ctx, &["alt".to_string()])?;
    assert!(handler.handle(ctx, &tx, false).is_ok());
    Ok(())
}

#[test]
fn test_wrapped_handler_runs_before_lockup() -> TestResult {
    let ctx = scenario_ctx()?;
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let base = move |ctx: Context, tx: &Tx, _simulate: bool| -> Result<Context, LockupError> {
        recorder.lock().push(tx.msgs().len());
        let height = ctx.block_height();
        Ok(ctx.with_block_height(height + 1))
    };
    let handler = new_wrapped_lockup_ante_handler(
        Arc::new(base),
        LockupKeeper::default(),
        Arc::new(JsonCodec::new()),
    );
    assert_eq!(handler.len(), 2);

    let out = handler.handle(ctx.clone(), &Tx::from(send(ZERO, ONES, "alt")), false)?;
    assert_eq!(out.block_height(), 11);

    // the base handler still runs for transactions lockup rejects
    let err = handler.handle(ctx, &Tx::from(send(ONES, ZERO, "alt")), false);
    assert!(is_locked(err));
    assert_eq!(*seen.lock(), vec![1, 1]);
    Ok(())
}

#[test]
fn test_wrapped_handler_error_wins() -> TestResult {
    let ctx = scenario_ctx()?;
    let base = |_ctx: Context, _tx: &Tx, _simulate: bool| -> Result<Context, LockupError> {
        Err(LockupError::InvalidParams("insufficient fee".to_string()))
    };
    let handler = new_wrapped_lockup_ante_handler(
        Arc::new(base),
        LockupKeeper::default(),
        Arc::new(JsonCodec::new()),
    );
    let err = handler
        .handle(ctx, &Tx::from(send(ONES, ZERO, "alt")), false)
        .unwrap_err();
    assert_eq!(err, LockupError::InvalidParams("insufficient fee".to_string()));
    Ok(())
}

#[test]
fn test_opaque_form_of_sensitive_types_is_rejected() -> TestResult {
    let ctx = scenario_ctx()?;

    let withdraw: Tx = serde_json::from_str(&format!(
        r#"{{"msgs": [{{"Other": {{"type_url": "{}"}}}}]}}"#,
        MSG_SET_WITHDRAW_ADDRESS_TYPE_URL
    ))?;
    assert!(is_locked(handler().handle(ctx.clone(), &withdraw, false)));

    // no payload to unwrap
    let empty_exec: Tx = serde_json::from_str(&format!(
        r#"{{"msgs": [{{"Other": {{"type_url": "{}"}}}}]}}"#,
        MSG_EXEC_TYPE_URL
    ))?;
    let err = handler().handle(ctx.clone(), &empty_exec, false).unwrap_err();
    assert!(err.is_policy_rejection());

    let packed = JsonCodec::pack(&exec(&[send(ONES, ZERO, "alt")])?)?;
    let disguised_exec = Tx::from(Msg::Other(OpaqueMsg {
        type_url: packed.type_url,
        value: packed.value,
    }));
    assert!(is_locked(handler().handle(ctx, &disguised_exec, false)));
    Ok(())
}

#[test]
fn test_bech32_exempt_entry_covers_ethereum_sender() -> TestResult {
    let ctx = scenario_ctx()?;
    let keeper = LockupKeeper::default();
    keeper.set_lock_exempt_addresses(&ctx, &[eth_to_bech32(ONES, "althea")?])?;

    let eth = Tx::from(Msg::EthereumTx(MsgEthereumTx {
        from: ONES.to_string(),
        to: Some(ZERO.to_string()),
        value: 1,
        data: vec![],
    }));
    assert!(handler().handle(ctx.clone(), &eth, false).is_ok());

    // the entry names an account on another chain's prefix
    let foreign = ctx.clone().with_account_prefix("cosmos");
    assert!(is_locked(handler().handle(foreign, &eth, false)));

    // the zero address is no longer exempt
    let zero = Tx::from(Msg::EthereumTx(MsgEthereumTx {
        from: ZERO.to_string(),
        to: None,
        value: 0,
        data: vec![],
    }));
    assert!(is_locked(handler().handle(ctx, &zero, false)));
    Ok(())
}

#[test]
fn test_default_genesis_gates_transfer_and_microtx() -> TestResult {
    let ctx = Context::new(Arc::new(InMemoryParamStore::new()), "althea_7357-1");
    let native = lockup::config::NATIVE_TOKEN;
    let mut genesis = GenesisState::default();
    genesis.params.locked = true;
    genesis.params.lock_exempt = vec![ZERO.to_string()];
    init_genesis(&ctx, &LockupKeeper::default(), &genesis)?;

    let transfer = |sender: &str, denom: &str| {
        Tx::from(Msg::Transfer(MsgTransfer {
            source_port: "transfer".to_string(),
            source_channel: "channel-0".to_string(),
            token: Coin::new(denom, 10),
            sender: sender.to_string(),
            receiver: "cosmos1receiver".to_string(),
            timeout_height: 0,
        }))
    };
    let microtx = |sender: &str, denom: &str| {
        Tx::from(Msg::Microtx(MsgMicrotx {
            sender: sender.to_string(),
            receiver: ZERO.to_string(),
            amount: Coin::new(denom, 10),
        }))
    };

    let handler = handler();
    assert!(handler.handle(ctx.clone(), &transfer(ZERO, native), false).is_ok());
    assert!(handler.handle(ctx.clone(), &transfer(ONES, "uatom"), false).is_ok());
    assert!(is_locked(handler.handle(ctx.clone(), &transfer(ONES, native), false)));

    assert!(handler.handle(ctx.clone(), &microtx(ZERO, native), false).is_ok());
    assert!(handler.handle(ctx.clone(), &microtx(ONES, "uatom"), false).is_ok());
    assert!(is_locked(handler.handle(ctx, &microtx(ONES, native), false)));
    Ok(())
}
