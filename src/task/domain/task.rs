//! Task aggregate root and the bounty lifecycle state machine.

use super::{
    AccountId, ParseTaskStatusError, ProofUri, RewardAmount, TaskDomainError, TaskId,
    TaskPostingPolicy, TimeRemaining, TransactionId,
};
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Posted and waiting for a claimant.
    Open,
    /// Accepted by a claimant.
    Claimed,
    /// Proof of completion has been submitted.
    Submitted,
    /// Approved and paid out.
    Completed,
    /// Under dispute; no automatic resolution.
    Disputed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Claimed => "claimed",
            Self::Submitted => "submitted",
            Self::Completed => "completed",
            Self::Disputed => "disputed",
        }
    }

    /// Returns `true` for statuses with no outgoing transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Disputed)
    }

    /// Returns the status reached by applying `event`, if the event is legal
    /// from this status.
    #[must_use]
    pub const fn successor(self, event: TaskEvent) -> Option<Self> {
        match (self, event) {
            (Self::Open, TaskEvent::Claim) => Some(Self::Claimed),
            (Self::Claimed, TaskEvent::SubmitProof) => Some(Self::Submitted),
            (Self::Submitted, TaskEvent::Approve) => Some(Self::Completed),
            (Self::Open | Self::Claimed | Self::Submitted, TaskEvent::Dispute) => {
                Some(Self::Disputed)
            }
            _ => None,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "claimed" => Ok(Self::Claimed),
            "submitted" => Ok(Self::Submitted),
            "completed" => Ok(Self::Completed),
            "disputed" => Ok(Self::Disputed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Lifecycle events a participant can apply to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskEvent {
    /// Commit to performing an open task.
    Claim,
    /// Hand in proof of completion.
    SubmitProof,
    /// Accept the submission and release the reward.
    Approve,
    /// Raise a dispute.
    Dispute,
}

impl TaskEvent {
    /// Returns the canonical event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Claim => "claim",
            Self::SubmitProof => "submit_proof",
            Self::Approve => "approve",
            Self::Dispute => "dispute",
        }
    }
}

impl fmt::Display for TaskEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Claim => "claim",
            Self::SubmitProof => "submit proof for",
            Self::Approve => "approve",
            Self::Dispute => "dispute",
        })
    }
}

/// Request data for posting a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Posting account.
    pub creator: AccountId,
    /// Short title.
    pub title: String,
    /// Free-text description of the work.
    pub description: String,
    /// Reward paid on approval.
    pub reward: RewardAmount,
    /// Days from creation until the deadline.
    pub duration_days: u32,
}

/// Value transfer the settlement gateway must perform to approve a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementTerms {
    /// Account paying the reward (the task creator).
    pub payer: AccountId,
    /// Account receiving the reward (the claimant).
    pub payee: AccountId,
    /// Amount to transfer.
    pub amount: RewardAmount,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    creator: AccountId,
    reward: RewardAmount,
    status: TaskStatus,
    claimant: Option<AccountId>,
    submission_uri: Option<ProofUri>,
    settlement_tx: Option<TransactionId>,
    deadline: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Posting account.
    pub creator: AccountId,
    /// Reward amount.
    pub reward: RewardAmount,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Claimant, if any.
    pub claimant: Option<AccountId>,
    /// Proof reference, if any.
    pub submission_uri: Option<ProofUri>,
    /// Settlement transaction, if any.
    pub settlement_tx: Option<TransactionId>,
    /// Deadline timestamp.
    pub deadline: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Posts a new open task after validating it against `policy`.
    ///
    /// # Errors
    ///
    /// Returns a validation [`TaskDomainError`] when the title, description,
    /// reward, or duration is rejected, including a duration whose deadline
    /// cannot be represented.
    pub fn post(
        request: NewTask,
        policy: &TaskPostingPolicy,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let title = request.title.trim();
        policy.check_title(title)?;
        let description = request.description.trim();
        if description.is_empty() {
            return Err(TaskDomainError::EmptyDescription);
        }
        policy.check_reward(request.reward)?;
        policy.check_duration(request.duration_days)?;

        let timestamp = clock.utc();
        let deadline = Duration::try_days(i64::from(request.duration_days))
            .and_then(|span| timestamp.checked_add_signed(span))
            .ok_or(TaskDomainError::DurationOutOfRange {
                days: request.duration_days,
                min: policy.min_duration_days.max(1),
                max: policy.max_duration_days,
            })?;
        Ok(Self {
            id: TaskId::new(),
            title: title.to_owned(),
            description: description.to_owned(),
            creator: request.creator,
            reward: request.reward,
            status: TaskStatus::Open,
            claimant: None,
            submission_uri: None,
            settlement_tx: None,
            deadline,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CorruptRecord`] when the data breaks a task
    /// invariant (party fields inconsistent with the status, or a deadline
    /// not after creation).
    pub fn from_persisted(data: PersistedTaskData) -> Result<Self, TaskDomainError> {
        let corrupt = |detail| TaskDomainError::CorruptRecord {
            task_id: data.id,
            detail,
        };

        if data.deadline <= data.created_at {
            return Err(corrupt("deadline must be after creation"));
        }
        let has_claimant = data.claimant.is_some();
        let has_submission = data.submission_uri.is_some();
        let claimant_ok = match data.status {
            TaskStatus::Open => !has_claimant,
            TaskStatus::Claimed | TaskStatus::Submitted | TaskStatus::Completed => has_claimant,
            TaskStatus::Disputed => true,
        };
        if !claimant_ok {
            return Err(corrupt("claimant does not match status"));
        }
        let submission_ok = match data.status {
            TaskStatus::Open | TaskStatus::Claimed => !has_submission,
            TaskStatus::Submitted | TaskStatus::Completed => has_submission,
            TaskStatus::Disputed => !has_submission || has_claimant,
        };
        if !submission_ok {
            return Err(corrupt("submission does not match status"));
        }
        if data.settlement_tx.is_some() != (data.status == TaskStatus::Completed) {
            return Err(corrupt("settlement transaction does not match status"));
        }

        Ok(Self {
            id: data.id,
            title: data.title,
            description: data.description,
            creator: data.creator,
            reward: data.reward,
            status: data.status,
            claimant: data.claimant,
            submission_uri: data.submission_uri,
            settlement_tx: data.settlement_tx,
            deadline: data.deadline,
            created_at: data.created_at,
            updated_at: data.updated_at,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the posting account.
    #[must_use]
    pub const fn creator(&self) -> &AccountId {
        &self.creator
    }

    /// Returns the reward.
    #[must_use]
    pub const fn reward(&self) -> RewardAmount {
        self.reward
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the claimant, if any.
    #[must_use]
    pub const fn claimant(&self) -> Option<&AccountId> {
        self.claimant.as_ref()
    }

    /// Returns the proof-of-completion reference, if any.
    #[must_use]
    pub const fn submission_uri(&self) -> Option<&ProofUri> {
        self.submission_uri.as_ref()
    }

    /// Returns the settlement transaction recorded on approval.
    #[must_use]
    pub const fn settlement_tx(&self) -> Option<&TransactionId> {
        self.settlement_tx.as_ref()
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the time left before the deadline.
    #[must_use]
    pub fn time_remaining(&self, clock: &impl Clock) -> TimeRemaining {
        TimeRemaining::until(self.deadline, clock.utc())
    }

    /// Returns `true` once the deadline has passed. Advisory only.
    #[must_use]
    pub fn is_expired(&self, clock: &impl Clock) -> bool {
        self.time_remaining(clock).is_expired()
    }

    /// Claims the task for `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAuthorized`] when `actor` is the creator
    /// and [`TaskDomainError::InvalidTransition`] when the task is not open.
    pub fn claim(&mut self, actor: &AccountId, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if *actor == self.creator {
            return Err(self.not_authorized(actor, TaskEvent::Claim));
        }
        self.status = self.successor(TaskEvent::Claim)?;
        self.claimant = Some(actor.clone());
        self.touch(clock);
        Ok(())
    }

    /// Records proof of completion from the claimant.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAuthorized`] when `actor` is not the
    /// claimant and [`TaskDomainError::InvalidTransition`] when the task is
    /// not claimed.
    pub fn submit_proof(
        &mut self,
        actor: &AccountId,
        proof: ProofUri,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !self.is_claimant(actor) {
            return Err(self.not_authorized(actor, TaskEvent::SubmitProof));
        }
        self.status = self.successor(TaskEvent::SubmitProof)?;
        self.submission_uri = Some(proof);
        self.touch(clock);
        Ok(())
    }

    /// Checks that `actor` may approve the task and returns the transfer the
    /// approval requires. Does not modify the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAuthorized`] when `actor` is not the
    /// creator and [`TaskDomainError::InvalidTransition`] when the task is
    /// not submitted.
    pub fn settlement_terms(&self, actor: &AccountId) -> Result<SettlementTerms, TaskDomainError> {
        if *actor != self.creator {
            return Err(self.not_authorized(actor, TaskEvent::Approve));
        }
        self.successor(TaskEvent::Approve)?;
        let Some(payee) = self.claimant.clone() else {
            return Err(self.invalid_transition(TaskEvent::Approve));
        };
        Ok(SettlementTerms {
            payer: self.creator.clone(),
            payee,
            amount: self.reward,
        })
    }

    /// Marks the task completed after a confirmed settlement.
    ///
    /// Must only be called once the transfer described by
    /// [`Task::settlement_terms`] has succeeded.
    ///
    /// # Errors
    ///
    /// Same as [`Task::settlement_terms`].
    pub fn complete(
        &mut self,
        actor: &AccountId,
        settlement_tx: TransactionId,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.settlement_terms(actor)?;
        self.status = TaskStatus::Completed;
        self.settlement_tx = Some(settlement_tx);
        self.touch(clock);
        Ok(())
    }

    /// Moves the task into dispute.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAuthorized`] when `actor` is neither the
    /// creator nor the claimant and [`TaskDomainError::InvalidTransition`]
    /// when the task is already terminal.
    pub fn dispute(&mut self, actor: &AccountId, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if *actor != self.creator && !self.is_claimant(actor) {
            return Err(self.not_authorized(actor, TaskEvent::Dispute));
        }
        self.status = self.successor(TaskEvent::Dispute)?;
        self.touch(clock);
        Ok(())
    }

    fn is_claimant(&self, actor: &AccountId) -> bool {
        self.claimant.as_ref() == Some(actor)
    }

    fn successor(&self, event: TaskEvent) -> Result<TaskStatus, TaskDomainError> {
        self.status
            .successor(event)
            .ok_or_else(|| self.invalid_transition(event))
    }

    const fn invalid_transition(&self, event: TaskEvent) -> TaskDomainError {
        TaskDomainError::InvalidTransition {
            task_id: self.id,
            from: self.status,
            event,
        }
    }

    fn not_authorized(&self, actor: &AccountId, event: TaskEvent) -> TaskDomainError {
        TaskDomainError::NotAuthorized {
            task_id: self.id,
            actor: actor.clone(),
            event,
        }
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
