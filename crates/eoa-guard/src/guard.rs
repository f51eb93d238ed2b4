use crate::{classify_caller, eoa_gas_floor, CallerKind};

/// Rejection returned when a guarded frame was entered with too little gas to
/// have come directly from an EOA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("caller is a contract: {gas_at_entry} gas at entry, EOA floor is {floor}")]
pub struct GuardRejected {
    /// Gas the frame was entered with.
    pub gas_at_entry: u64,
    /// The floor the frame had to clear.
    pub floor: u64,
}

/// Token handed out for every admitted guard entry. Records whether the entry
/// latched the guard and must be given back through [`CallerGuard::exit`],
/// on the revert path included.
#[derive(Debug)]
#[must_use = "every admitted entry must be returned through CallerGuard::exit"]
pub struct GuardEntry {
    latched: bool,
}

impl GuardEntry {
    /// Whether this entry set the protection latch.
    pub const fn latched(&self) -> bool {
        self.latched
    }
}

/// The gas-threshold caller check behind a reentrancy-safe latch.
///
/// The outermost guarded frame runs the threshold check and, on success,
/// latches the guard for as long as it is live. Nested guarded frames are
/// admitted without a check while the latch is set: a guarded contract
/// re-entering its own guarded entry point necessarily arrives below the
/// floor, and the latch is what keeps that legitimate.
#[derive(Debug, Default)]
pub struct CallerGuard {
    protected: bool,
}

impl CallerGuard {
    /// Creates an unlatched guard.
    pub const fn new() -> Self {
        Self { protected: false }
    }

    /// Whether an admitted outermost guarded frame is currently live.
    pub const fn is_protected(&self) -> bool {
        self.protected
    }

    /// Enters a guarded frame with the gas it was entered with and the gas
    /// limit of the enclosing transaction.
    ///
    /// Returns a latching token for an admitted outermost entry, a
    /// non-latching token for a nested entry under the latch, and
    /// [`GuardRejected`] when the threshold check classifies the caller as a
    /// contract.
    pub fn try_enter(
        &mut self,
        gas_at_entry: u64,
        tx_gas_limit: u64,
    ) -> Result<GuardEntry, GuardRejected> {
        if self.protected {
            return Ok(GuardEntry { latched: false });
        }
        match classify_caller(gas_at_entry, tx_gas_limit) {
            CallerKind::ExternallyOwned => {
                self.protected = true;
                Ok(GuardEntry { latched: true })
            }
            CallerKind::Contract => {
                Err(GuardRejected { gas_at_entry, floor: eoa_gas_floor(tx_gas_limit) })
            }
        }
    }

    /// Leaves a guarded frame. Clears the latch iff `entry` set it; exits of
    /// nested entries leave the latch in place for the frame that owns it.
    pub fn exit(&mut self, entry: GuardEntry) {
        if entry.latched {
            self.protected = false;
        }
    }
}
