//! In-memory settlement gateway.
//!
//! Records transfers in a local ledger instead of moving value. Failures can
//! be queued and transfers can be held open, which lets callers exercise
//! retry and concurrent-approval paths.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, Semaphore};
use tracing::{info, warn};
use uuid::Uuid;

use crate::task::{
    domain::{AccountId, RewardAmount, TransactionId},
    ports::{SettlementError, SettlementGateway, SettlementResult},
};

/// A transfer confirmed by the in-memory gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementReceipt {
    /// Transaction identifier handed back to the caller.
    pub transaction_id: TransactionId,
    /// Paying account.
    pub payer: AccountId,
    /// Receiving account.
    pub payee: AccountId,
    /// Transferred amount.
    pub amount: RewardAmount,
}

#[derive(Debug, Default)]
struct LedgerState {
    receipts: Vec<SettlementReceipt>,
    queued_failures: VecDeque<String>,
}

#[derive(Debug)]
struct TransferHold {
    entered: Notify,
    release: Semaphore,
}

/// Ledger-backed settlement gateway.
#[derive(Debug, Clone, Default)]
pub struct InMemorySettlementGateway {
    ledger: Arc<Mutex<LedgerState>>,
    hold: Option<Arc<TransferHold>>,
}

impl InMemorySettlementGateway {
    /// Creates a gateway that confirms every transfer immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway whose transfers wait until
    /// [`release_transfers`](Self::release_transfers) is called.
    #[must_use]
    pub fn held() -> Self {
        Self {
            ledger: Arc::default(),
            hold: Some(Arc::new(TransferHold {
                entered: Notify::new(),
                release: Semaphore::new(0),
            })),
        }
    }

    /// Makes the next transfer fail with `reason`. Failures queue in order.
    pub fn fail_next(&self, reason: impl Into<String>) {
        if let Ok(mut ledger) = self.ledger.lock() {
            ledger.queued_failures.push_back(reason.into());
        }
    }

    /// Returns confirmed transfers in the order they settled.
    #[must_use]
    pub fn receipts(&self) -> Vec<SettlementReceipt> {
        self.ledger
            .lock()
            .map(|ledger| ledger.receipts.clone())
            .unwrap_or_default()
    }

    /// Waits until a held transfer has started.
    ///
    /// Returns immediately for gateways that do not hold transfers.
    pub async fn wait_for_pending_transfer(&self) {
        if let Some(hold) = &self.hold {
            hold.entered.notified().await;
        }
    }

    /// Lets `count` held transfers proceed.
    pub fn release_transfers(&self, count: usize) {
        if let Some(hold) = &self.hold {
            hold.release.add_permits(count);
        }
    }

    fn record(
        &self,
        payer: &AccountId,
        payee: &AccountId,
        amount: RewardAmount,
    ) -> SettlementResult<TransactionId> {
        let mut ledger = self
            .ledger
            .lock()
            .map_err(|err| SettlementError::unavailable(std::io::Error::other(err.to_string())))?;

        if let Some(reason) = ledger.queued_failures.pop_front() {
            warn!(payer = %payer, payee = %payee, amount = %amount, reason = %reason, "Transfer refused");
            return Err(SettlementError::rejected(reason));
        }

        let transaction_id = TransactionId::new(format!("txn-{}", Uuid::new_v4()));
        ledger.receipts.push(SettlementReceipt {
            transaction_id: transaction_id.clone(),
            payer: payer.clone(),
            payee: payee.clone(),
            amount,
        });
        info!(
            payer = %payer,
            payee = %payee,
            amount = %amount,
            tx_id = %transaction_id,
            "Transfer recorded"
        );
        Ok(transaction_id)
    }
}

#[async_trait]
impl SettlementGateway for InMemorySettlementGateway {
    async fn transfer(
        &self,
        payer: &AccountId,
        payee: &AccountId,
        amount: RewardAmount,
    ) -> SettlementResult<TransactionId> {
        if let Some(hold) = &self.hold {
            hold.entered.notify_one();
            hold.release
                .acquire()
                .await
                .map_err(SettlementError::unavailable)?
                .forget();
        }
        self.record(payer, payee, amount)
    }
}
