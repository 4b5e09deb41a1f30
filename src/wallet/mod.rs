//! Wallet records and the operations submitted on their behalf
//!
//! Private keys live here only in sealed form; see [`SealedWallet`].

mod operation;
mod sealed;

pub use operation::{OperationKind, WalletOperation};
pub use sealed::SealedWallet;
