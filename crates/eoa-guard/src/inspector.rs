use alloy_primitives::Bytes;
use delegate::delegate;
use revm::{
    context::{ContextTr, Transaction},
    inspector::{Inspector, NoOpInspector},
    interpreter::{
        interpreter::EthInterpreter, CallInputs, CallOutcome, CreateInputs, CreateOutcome, Gas,
        InstructionResult, Interpreter, InterpreterResult,
    },
    primitives::Address,
};
use serde::{Deserialize, Serialize};

use crate::{eoa_gas_floor, CallerGuard, CallerKind, GuardEntry};

/// Record of the guard's verdict on one frame that targeted the guarded
/// address, kept available to embedders without an event or logging layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardDecision {
    /// Gas the frame was entered with.
    pub gas_at_entry: u64,
    /// The EOA gas floor derived from the transaction gas limit.
    pub floor: u64,
    /// How the caller was classified. `None` for frames admitted under the
    /// latch, which skip the check.
    pub classification: Option<CallerKind>,
    /// Whether the frame was allowed to run.
    pub admitted: bool,
}

/// Inspector that enforces the EOA caller guard on calls into a single
/// guarded address.
///
/// Frames targeting the guarded address are checked at entry, where the
/// frame's gas still equals what the caller forwarded. Rejected frames never
/// run: their caller observes a plain failed subcall and gets the frame's gas
/// back. `call_end` fires for every started or overridden frame, so the
/// latch always unwinds, on reverts included.
///
/// Wraps an inner inspector and forwards every hook to it.
#[derive(Debug)]
pub struct GuardInspector<INSP = NoOpInspector> {
    inner: INSP,
    guarded: Address,
    guard: CallerGuard,
    /// Entry tokens of guarded frames currently on the call stack, `None` for
    /// rejected frames. Frames end in LIFO order, so pairing entries with
    /// `call_end` is positional.
    live: Vec<Option<GuardEntry>>,
    decisions: Vec<GuardDecision>,
}

impl GuardInspector {
    /// Creates a guard inspector for the given address.
    pub fn new(guarded: Address) -> Self {
        Self::with_inspector(guarded, NoOpInspector)
    }
}

impl<INSP> GuardInspector<INSP> {
    /// Creates a guard inspector for the given address, wrapping `inner`.
    pub fn with_inspector(guarded: Address, inner: INSP) -> Self {
        Self {
            inner,
            guarded,
            guard: CallerGuard::new(),
            live: Vec::new(),
            decisions: Vec::new(),
        }
    }

    /// The address the guard is enforced on.
    pub const fn guarded_address(&self) -> Address {
        self.guarded
    }

    /// Whether an admitted outermost guarded frame is currently live.
    pub const fn is_protected(&self) -> bool {
        self.guard.is_protected()
    }

    /// The verdicts recorded for guarded frames, in entry order.
    pub fn decisions(&self) -> &[GuardDecision] {
        &self.decisions
    }

    /// Clears recorded verdicts, e.g. between transactions.
    pub fn clear_decisions(&mut self) {
        self.decisions.clear();
    }

    fn reject_outcome(inputs: &CallInputs) -> CallOutcome {
        // the frame never ran; hand its gas back to the caller
        CallOutcome::new(
            InterpreterResult::new(InstructionResult::Revert, Bytes::new(), Gas::new(inputs.gas_limit)),
            inputs.return_memory_offset.clone(),
        )
    }
}

impl<CTX: ContextTr, INSP: Inspector<CTX>> Inspector<CTX> for GuardInspector<INSP> {
    fn call(&mut self, context: &mut CTX, inputs: &mut CallInputs) -> Option<CallOutcome> {
        if let Some(outcome) = self.inner.call(context, inputs) {
            // `call_end` still fires for overridden frames; keep the pairing
            if inputs.target_address == self.guarded {
                self.live.push(None);
            }
            return Some(outcome);
        }
        if inputs.target_address != self.guarded {
            return None;
        }

        let tx_gas_limit = context.tx().gas_limit();
        match self.guard.try_enter(inputs.gas_limit, tx_gas_limit) {
            Ok(entry) => {
                self.decisions.push(GuardDecision {
                    gas_at_entry: inputs.gas_limit,
                    floor: eoa_gas_floor(tx_gas_limit),
                    classification: entry.latched().then_some(CallerKind::ExternallyOwned),
                    admitted: true,
                });
                self.live.push(Some(entry));
                None
            }
            Err(rejected) => {
                self.decisions.push(GuardDecision {
                    gas_at_entry: rejected.gas_at_entry,
                    floor: rejected.floor,
                    classification: Some(CallerKind::Contract),
                    admitted: false,
                });
                self.live.push(None);
                Some(Self::reject_outcome(inputs))
            }
        }
    }

    fn call_end(&mut self, context: &mut CTX, inputs: &CallInputs, outcome: &mut CallOutcome) {
        if inputs.target_address == self.guarded {
            if let Some(Some(entry)) = self.live.pop() {
                self.guard.exit(entry);
            }
        }
        self.inner.call_end(context, inputs, outcome);
    }

    delegate! {
        to self.inner {
            fn initialize_interp(&mut self, interp: &mut Interpreter<EthInterpreter>, context: &mut CTX);
            fn step(&mut self, interp: &mut Interpreter<EthInterpreter>, context: &mut CTX);
            fn step_end(&mut self, interp: &mut Interpreter<EthInterpreter>, context: &mut CTX);
            fn create(&mut self, context: &mut CTX, inputs: &mut CreateInputs) -> Option<CreateOutcome>;
            fn create_end(&mut self, context: &mut CTX, inputs: &CreateInputs, outcome: &mut CreateOutcome);
        }
    }
}
