//! Settlement port for releasing task rewards.

use crate::task::domain::{AccountId, RewardAmount, TransactionId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for settlement operations.
pub type SettlementResult<T> = Result<T, SettlementError>;

/// Value transfer capability used on task approval.
///
/// Callers await the transfer before committing any state that depends on
/// it. Implementations must not be retried automatically by callers; a
/// failed transfer is surfaced and any retry is an explicit new request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettlementGateway: Send + Sync {
    /// Transfers `amount` from `payer` to `payee` and returns the confirmed
    /// transaction identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SettlementError`] when the transfer is refused or the
    /// settlement backend cannot be reached.
    async fn transfer(
        &self,
        payer: &AccountId,
        payee: &AccountId,
        amount: RewardAmount,
    ) -> SettlementResult<TransactionId>;
}

/// Errors returned by settlement gateways.
#[derive(Debug, Clone, Error)]
pub enum SettlementError {
    /// The transfer was refused (for example insufficient funds).
    #[error("settlement rejected: {reason}")]
    Rejected {
        /// Gateway-supplied reason, passed through to callers.
        reason: String,
    },

    /// The settlement backend failed.
    #[error("settlement backend unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl SettlementError {
    /// Creates a rejection with the given reason.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    /// Wraps a backend error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
