//! Utilities to assemble raw EVM bytecode for tests.

use alloy_primitives::{Address, Bytes, U256};
use revm::bytecode::opcode::{CALL, GAS, PUSH0, SSTORE, STOP};

/// A builder for assembling EVM bytecode.
#[derive(Debug, Default)]
pub struct BytecodeBuilder {
    code: Vec<u8>,
}

impl BytecodeBuilder {
    /// Build the bytecode.
    pub fn build(self) -> Bytes {
        self.code.into()
    }

    /// Build the bytecode as a vector.
    pub fn build_vec(self) -> Vec<u8> {
        self.code
    }

    /// Get the length of the bytecode.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Check if the bytecode is empty.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Append a single opcode or byte.
    pub fn append(mut self, opcode: u8) -> Self {
        self.code.push(opcode);
        self
    }

    /// Append a series of opcodes or bytes.
    pub fn append_many(mut self, items: impl IntoIterator<Item = u8>) -> Self {
        self.code.extend(items);
        self
    }

    /// Append a PUSH opcode and the bytes to push.
    pub fn push_bytes(mut self, bytes: impl AsRef<[u8]>) -> Self {
        let bytes: &[u8] = bytes.as_ref();
        assert!(bytes.len() <= 32);
        self.code.push(PUSH0 + bytes.len() as u8);
        self.code.extend(bytes);
        self
    }

    /// Append a PUSH opcode and the number to push.
    pub fn push_number<T: Into<u128> + Copy>(self, number: T) -> Self {
        let num = number.into();
        let bytes = match core::mem::size_of::<T>() {
            1 => (num as u8).to_be_bytes().to_vec(),
            2 => (num as u16).to_be_bytes().to_vec(),
            4 => (num as u32).to_be_bytes().to_vec(),
            8 => (num as u64).to_be_bytes().to_vec(),
            16 => num.to_be_bytes().to_vec(),
            _ => panic!("Unsupported integer size"),
        };
        self.push_bytes(bytes)
    }

    /// Append a PUSH opcode and the address to push.
    pub fn push_address(self, address: Address) -> Self {
        self.push_bytes(address)
    }

    /// Append a PUSH opcode and the u256 value to push.
    pub fn push_u256(self, value: U256) -> Self {
        self.push_bytes(value.to_be_bytes_vec())
    }

    /// Append an SSTORE opcode storing the given value at the given slot.
    pub fn sstore(mut self, slot: usize, value: U256) -> Self {
        self = self.push_u256(value);
        self = self.push_number(slot as u128);
        self.code.push(SSTORE);
        self
    }

    /// Append a CALL to `callee` forwarding all remaining gas, no value, with
    /// `args_len` zero bytes of calldata read from unwritten memory. Leaves
    /// the success flag on the stack.
    pub fn call_with_all_gas(self, callee: Address, args_len: u8) -> Self {
        self.append_many([PUSH0, PUSH0]) // retLen, retOffset
            .push_number(args_len) // argsLen
            .append_many([PUSH0, PUSH0]) // argsOffset, value
            .push_address(callee)
            .append(GAS)
            .append(CALL)
    }

    /// Append a STOP opcode.
    pub fn stop(self) -> Self {
        self.append(STOP)
    }
}
