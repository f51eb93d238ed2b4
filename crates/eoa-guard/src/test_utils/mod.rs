//! Test utilities for exercising the guard against real EVM execution.

mod database;
mod evm;
mod opcode_gen;

pub use database::*;
pub use evm::*;
pub use opcode_gen::*;
