//! Gas-based detection of externally-owned callers for the EVM.
//!
//! A transaction signed by an EOA enters its outermost frame with almost the
//! whole transaction gas limit, while EIP-150 caps what any contract can
//! forward into a subcall at `63/64` of its remaining gas. Comparing the gas a
//! frame was entered with against that bound therefore tells contract-mediated
//! entries apart from direct ones, without the `tx.origin == msg.sender` check
//! that EIP-3074 invalidates.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod constants;

mod threshold;
pub use threshold::*;

mod guard;
pub use guard::*;

mod inspector;
pub use inspector::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
