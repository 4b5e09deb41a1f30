//! Wallet operations submitted through the bundle pipeline

use serde::{Deserialize, Serialize};

/// What an operation does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Buy,
    Sell,
    Swap,
    Transfer,
}

impl OperationKind {
    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::Buy => "buy",
            OperationKind::Sell => "sell",
            OperationKind::Swap => "swap",
            OperationKind::Transfer => "transfer",
        }
    }
}

/// One signed operation for one wallet.
///
/// The pipeline treats this as opaque; only sinks look inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletOperation {
    /// Wallet label or public key
    pub wallet: String,
    pub kind: OperationKind,
    /// Token mint/address
    pub token: String,
    /// Amount in base units
    pub amount: String,
}

impl WalletOperation {
    /// `per_wallet` operations of `kind` for each wallet, wallet-major order
    pub fn fan_out(
        wallets: &[String],
        per_wallet: usize,
        kind: OperationKind,
        token: &str,
        amount: &str,
    ) -> Vec<Self> {
        wallets
            .iter()
            .flat_map(|wallet| {
                (0..per_wallet).map(move |_| Self {
                    wallet: wallet.clone(),
                    kind,
                    token: token.to_string(),
                    amount: amount.to_string(),
                })
            })
            .collect()
    }
}
