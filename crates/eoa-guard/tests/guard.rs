//! End-to-end tests driving the caller guard with real EVM execution.

use alloy_primitives::{address, Address, Bytes, U256};
use eoa_guard::{
    constants::{MIN_USABLE_TX_GAS_LIMIT, TX_BASE_GAS},
    forwarding_ratio, max_forwardable_gas,
    test_utils::{transact, BytecodeBuilder, MemoryDatabase},
    CallerKind, GuardInspector,
};
use revm::{
    bytecode::opcode::{CALLDATASIZE, INVALID, ISZERO, JUMPDEST, JUMPI, PUSH0, REVERT},
    context::result::{ExecutionResult, HaltReason},
};

const CALLER: Address = address!("2000000000000000000000000000000000000002");
const GUARDED: Address = address!("1000000000000000000000000000000000000001");
const PROXY: Address = address!("1000000000000000000000000000000000000002");
const SIBLING: Address = address!("1000000000000000000000000000000000000003");

const GAS_LIMIT: u64 = 12_000_000;

/// Proxy code: forward everything EIP-150 allows into `callee` and hit
/// INVALID if the subcall failed.
fn proxy_code(callee: Address) -> Bytes {
    let body = BytecodeBuilder::default().call_with_all_gas(callee, 0).append(ISZERO);
    let fail_dest = (body.len() + 4) as u8; // PUSH1 x, JUMPI, STOP, then JUMPDEST
    body.push_number(fail_dest)
        .append(JUMPI)
        .stop()
        .append(JUMPDEST)
        .append(INVALID)
        .build()
}

/// A direct EOA call into the guarded contract clears the gas floor and runs.
#[test]
fn test_direct_eoa_call_admitted() {
    let mut db = MemoryDatabase::default();
    db.set_account_code(GUARDED, BytecodeBuilder::default().sstore(0, U256::from(1)).stop().build());

    let mut inspector = GuardInspector::new(GUARDED);
    let res = transact(db, &mut inspector, CALLER, GUARDED, Bytes::new(), GAS_LIMIT).unwrap();
    assert!(res.result.is_success());

    let &[decision] = inspector.decisions() else { panic!("expected one guarded frame") };
    assert!(decision.admitted);
    assert_eq!(decision.classification, Some(CallerKind::ExternallyOwned));
    // the outermost frame starts with the gas limit minus intrinsic gas
    assert_eq!(decision.gas_at_entry, GAS_LIMIT - TX_BASE_GAS);
    assert!(forwarding_ratio(decision.gas_at_entry, GAS_LIMIT) > 63.0);
    assert!(!inspector.is_protected());
}

/// A call routed through an intermediary contract arrives below the floor and
/// is rejected; the intermediary observes a plain failed subcall.
#[test]
fn test_proxied_call_rejected() {
    let mut db = MemoryDatabase::default();
    db.set_account_code(GUARDED, BytecodeBuilder::default().stop().build());
    db.set_account_code(PROXY, proxy_code(GUARDED));

    let mut inspector = GuardInspector::new(GUARDED);
    let res = transact(db, &mut inspector, CALLER, PROXY, Bytes::new(), GAS_LIMIT).unwrap();
    assert!(matches!(
        res.result,
        ExecutionResult::Halt { reason: HaltReason::InvalidFEOpcode, .. }
    ));

    let &[decision] = inspector.decisions() else { panic!("expected one guarded frame") };
    assert!(!decision.admitted);
    assert_eq!(decision.classification, Some(CallerKind::Contract));
    // the proxy cannot have forwarded more than EIP-150 allows it to
    assert!(decision.gas_at_entry <= max_forwardable_gas(GAS_LIMIT - TX_BASE_GAS));
    assert!(decision.gas_at_entry < decision.floor);
    assert!(forwarding_ratio(decision.gas_at_entry, GAS_LIMIT) < 63.0);
}

/// While the latch is set, the guarded contract may re-enter its own guarded
/// entry point even though the nested frame arrives below the floor.
#[test]
fn test_latched_self_call_admitted() {
    let mut db = MemoryDatabase::default();

    // Dispatch on calldata size: the outer path (empty calldata) re-enters
    // the contract with one byte of calldata and hits INVALID if the subcall
    // failed; the inner path just stops.
    let body = BytecodeBuilder::default().call_with_all_gas(GUARDED, 1).append(ISZERO);
    let fail_dest = 4 + body.len() + 4;
    let inner_dest = fail_dest + 2;
    let code = BytecodeBuilder::default()
        .append(CALLDATASIZE)
        .push_number(inner_dest as u8)
        .append(JUMPI)
        .append_many(body.build_vec())
        .push_number(fail_dest as u8)
        .append(JUMPI)
        .stop()
        .append(JUMPDEST)
        .append(INVALID)
        .append(JUMPDEST)
        .stop()
        .build();
    db.set_account_code(GUARDED, code);

    let mut inspector = GuardInspector::new(GUARDED);
    let res = transact(db, &mut inspector, CALLER, GUARDED, Bytes::new(), GAS_LIMIT).unwrap();
    assert!(res.result.is_success());

    let &[outer, inner] = inspector.decisions() else { panic!("expected two guarded frames") };
    assert!(outer.admitted);
    assert_eq!(outer.classification, Some(CallerKind::ExternallyOwned));
    assert!(inner.admitted);
    assert_eq!(inner.classification, None);
    // without the latch this frame would have been rejected
    assert!(inner.gas_at_entry < inner.floor);
    assert!(!inspector.is_protected());
}

/// The latch unwinds when the guarded frame reverts.
#[test]
fn test_latch_clears_on_revert() {
    let mut db = MemoryDatabase::default();
    db.set_account_code(
        GUARDED,
        BytecodeBuilder::default().append_many([PUSH0, PUSH0, REVERT]).build(),
    );

    let mut inspector = GuardInspector::new(GUARDED);
    let res = transact(db, &mut inspector, CALLER, GUARDED, Bytes::new(), GAS_LIMIT).unwrap();
    assert!(matches!(res.result, ExecutionResult::Revert { .. }));

    let &[decision] = inspector.decisions() else { panic!("expected one guarded frame") };
    assert!(decision.admitted);
    assert!(!inspector.is_protected());
}

/// Below the usable gas limit the guard rejects even the transaction signer,
/// and the rejected frame consumes no gas beyond the intrinsic cost.
#[test]
fn test_small_gas_limit_rejects_direct_call() {
    let mut db = MemoryDatabase::default();
    db.set_account_code(GUARDED, BytecodeBuilder::default().stop().build());

    let mut inspector = GuardInspector::new(GUARDED);
    let res = transact(db, &mut inspector, CALLER, GUARDED, Bytes::new(), 100_000).unwrap();
    assert!(matches!(res.result, ExecutionResult::Revert { .. }));
    assert_eq!(res.result.gas_used(), TX_BASE_GAS);

    let &[decision] = inspector.decisions() else { panic!("expected one guarded frame") };
    assert!(!decision.admitted);
    assert_eq!(decision.classification, Some(CallerKind::Contract));
}

/// The documented minimum gas limit is exact: the signer is admitted at the
/// boundary and rejected one gas below it.
#[test]
fn test_min_usable_gas_limit_is_exact() {
    for (gas_limit, admitted) in
        [(MIN_USABLE_TX_GAS_LIMIT, true), (MIN_USABLE_TX_GAS_LIMIT - 1, false)]
    {
        let mut db = MemoryDatabase::default();
        db.set_account_code(GUARDED, BytecodeBuilder::default().stop().build());

        let mut inspector = GuardInspector::new(GUARDED);
        let res = transact(db, &mut inspector, CALLER, GUARDED, Bytes::new(), gas_limit).unwrap();
        assert_eq!(res.result.is_success(), admitted);

        let &[decision] = inspector.decisions() else { panic!("expected one guarded frame") };
        assert_eq!(decision.admitted, admitted);
    }
}

/// Calls that do not target the guarded address are not checked.
#[test]
fn test_other_targets_not_guarded() {
    let mut db = MemoryDatabase::default();
    db.set_account_code(SIBLING, BytecodeBuilder::default().stop().build());
    db.set_account_code(PROXY, proxy_code(SIBLING));

    let mut inspector = GuardInspector::new(GUARDED);
    let res = transact(db, &mut inspector, CALLER, PROXY, Bytes::new(), GAS_LIMIT).unwrap();
    assert!(res.result.is_success());
    assert!(inspector.decisions().is_empty());
}
