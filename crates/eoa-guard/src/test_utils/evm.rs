use core::convert::Infallible;

use alloy_primitives::{Address, Bytes, TxKind};
use revm::{
    context::{
        result::{EVMError, HaltReason, InvalidTransaction, ResultAndState},
        BlockEnv, CfgEnv, TxEnv,
    },
    handler::{MainBuilder, MainContext},
    inspector::{InspectEvm, Inspector},
    Context,
};

use crate::test_utils::MemoryDatabase;

/// The mainnet revm context over the in-memory test database.
pub type TestContext = Context<BlockEnv, TxEnv, CfgEnv, MemoryDatabase>;

/// Executes a single call transaction on a mainnet EVM with the given
/// inspector installed.
pub fn transact<INSP>(
    db: MemoryDatabase,
    inspector: INSP,
    caller: Address,
    callee: Address,
    data: Bytes,
    gas_limit: u64,
) -> Result<ResultAndState<HaltReason>, EVMError<Infallible, InvalidTransaction>>
where
    INSP: Inspector<TestContext>,
{
    let mut evm = Context::mainnet().with_db(db).build_mainnet_with_inspector(inspector);
    let tx = TxEnv { caller, kind: TxKind::Call(callee), data, gas_limit, ..Default::default() };
    evm.inspect_with_tx(tx)
}
