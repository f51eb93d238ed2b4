//! Constants of the gas-forwarding rule the guard relies on.

/// EIP-150 retention divisor: a frame keeps `1/64` of its remaining gas when
/// it makes a subcall.
pub const GAS_RETENTION_DIVISOR: u64 = 64;

/// Share of the remaining gas that a subcall can receive at most, expressed
/// over [`GAS_RETENTION_DIVISOR`].
pub const FORWARDED_GAS_NUMERATOR: u64 = 63;

/// Intrinsic gas of a transaction with empty calldata.
pub const TX_BASE_GAS: u64 = 21_000;

/// Smallest transaction gas limit at which a direct EOA call with empty
/// calldata still clears [`eoa_gas_floor`](crate::eoa_gas_floor).
///
/// For gas limit `L` the outermost frame starts with `L - 21_000` gas and the
/// floor is `(L / 64) * 63`, so the strict comparison first succeeds at
/// `21_000 * 64 + 1`. Below this the guard rejects every caller, EOAs
/// included. Calldata raises the intrinsic cost and with it the effective
/// minimum.
pub const MIN_USABLE_TX_GAS_LIMIT: u64 = TX_BASE_GAS * GAS_RETENTION_DIVISOR + 1;
