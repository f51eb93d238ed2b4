use serde::{Deserialize, Serialize};

use crate::constants::{FORWARDED_GAS_NUMERATOR, GAS_RETENTION_DIVISOR};

/// Classification of the account a guarded frame was entered from.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallerKind {
    /// The frame was entered directly by the transaction signer.
    ExternallyOwned,
    /// The frame was entered through at least one intermediate contract.
    Contract,
}

impl CallerKind {
    /// Whether the caller was classified as an EOA.
    pub const fn is_externally_owned(self) -> bool {
        matches!(self, Self::ExternallyOwned)
    }
}

/// Maximum gas a frame can pass into a subcall under EIP-150. The caller
/// always retains `available / 64`.
pub const fn max_forwardable_gas(available: u64) -> u64 {
    available - available / GAS_RETENTION_DIVISOR
}

/// Gas floor that only a frame entered directly from an EOA can clear.
///
/// Computed as `(tx_gas_limit / 64) * 63`, dividing before multiplying. A
/// direct entry starts with the gas limit minus intrinsic gas, which exceeds
/// the floor for any reasonable gas limit; a contract-mediated entry arrives
/// below it because the intermediate frame both paid intrinsic gas and kept
/// its EIP-150 sixty-fourth.
pub const fn eoa_gas_floor(tx_gas_limit: u64) -> u64 {
    (tx_gas_limit / GAS_RETENTION_DIVISOR) * FORWARDED_GAS_NUMERATOR
}

/// Gas a directly-entered frame may have burned before the check while still
/// clearing the floor. Intrinsic gas spends from this budget, so the guard is
/// only usable when the headroom exceeds it (see
/// [`MIN_USABLE_TX_GAS_LIMIT`](crate::constants::MIN_USABLE_TX_GAS_LIMIT)).
pub const fn eoa_headroom(tx_gas_limit: u64) -> u64 {
    tx_gas_limit - eoa_gas_floor(tx_gas_limit)
}

/// Classifies the caller of a frame from the gas the frame was entered with.
///
/// The comparison is strictly greater-than: entry gas exactly at the floor is
/// treated as contract-mediated. With `tx_gas_limit == 0` the floor is zero
/// and the zero entry gas such a transaction implies classifies as contract.
pub const fn classify_caller(gas_at_entry: u64, tx_gas_limit: u64) -> CallerKind {
    if gas_at_entry > eoa_gas_floor(tx_gas_limit) {
        CallerKind::ExternallyOwned
    } else {
        CallerKind::Contract
    }
}

/// Entry gas as a fraction of the transaction gas limit, scaled to
/// sixty-fourths. Diagnostic only: direct entries sit just under `64.0`,
/// contract-mediated ones under `63.0`.
pub fn forwarding_ratio(gas_at_entry: u64, tx_gas_limit: u64) -> f64 {
    if tx_gas_limit == 0 {
        return 0.0;
    }
    gas_at_entry as f64 / tx_gas_limit as f64 * GAS_RETENTION_DIVISOR as f64
}
