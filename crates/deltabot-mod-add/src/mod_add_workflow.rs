use tracing::{error, info, warn};

use crate::comment_lock::CommentLockRegistry;
use crate::mod_add_collaborators::OverrideCollaborators;
use crate::mod_add_contract::{OverrideCommand, ReplyKind, WorkflowOutcome};
use crate::mod_add_errors::{render_error_chain, NotifyError, OverrideError};

pub const ADD_SUCCEEDED_MESSAGE: &str = "Delta has been added.";
pub const ADD_FAILED_ALREADY_AWARDED_MESSAGE: &str =
    "I already successfully awarded a delta for this comment. I can't do 2 for the same comment.";
pub const ADD_FAILED_ERROR_MESSAGE_PREFIX: &str =
    "Add failed. DeltaBot is very sorry :(\n\nSend this to a DeltaBot dev:\n\n";

fn default_lock_key(locator: &str) -> String {
    locator.trim().to_string()
}

/// Runs a moderator force-add for one private message.
///
/// The sequence is resolve, detect, guard, award, compose, delete old reply,
/// publish new reply, acknowledge. Any failure is reported to the requester
/// and then returned to the caller.
///
/// An award is never rolled back. If compose, delete or publish fails after
/// the award succeeded, the delta stands without a moderator reply; the
/// moderator can re-issue the command because the guard only blocks on a
/// successful bot reply.
pub struct OverrideWorkflow {
    collaborators: OverrideCollaborators,
    locks: CommentLockRegistry,
    lock_key: fn(&str) -> String,
}

impl OverrideWorkflow {
    pub fn new(collaborators: OverrideCollaborators) -> Self {
        Self {
            collaborators,
            locks: CommentLockRegistry::new(),
            lock_key: default_lock_key,
        }
    }

    /// Derives the serialization key from the raw locator, so different URL
    /// spellings of one comment share a lock.
    pub fn with_lock_key(mut self, lock_key: fn(&str) -> String) -> Self {
        self.lock_key = lock_key;
        self
    }

    pub fn with_lock_registry(mut self, locks: CommentLockRegistry) -> Self {
        self.locks = locks;
        self
    }

    /// Same as [`OverrideWorkflow::execute`], holding the per-comment lock for
    /// the whole run.
    pub async fn execute_serialized(
        &self,
        command: &OverrideCommand,
    ) -> Result<WorkflowOutcome, OverrideError> {
        let key = (self.lock_key)(command.comment_locator());
        let _guard = self.locks.acquire(&key).await;
        self.execute(command).await
    }

    pub async fn execute(
        &self,
        command: &OverrideCommand,
    ) -> Result<WorkflowOutcome, OverrideError> {
        match self.run_sequence(command).await {
            Ok(outcome) => {
                info!(
                    message_id = command.message_id(),
                    requester = command.requester(),
                    locator = command.comment_locator(),
                    outcome = outcome.label(),
                    "moderator add finished"
                );
                Ok(outcome)
            }
            Err(failure) => {
                let failed = WorkflowOutcome::Failed {
                    diagnostic: render_error_chain(&failure),
                };
                if let Err(notify_error) = self.notify(command, &failed).await {
                    error!(
                        message_id = command.message_id(),
                        stage = failure.stage(),
                        original = %render_error_chain(&failure),
                        "moderator add failed and the failure reply could not be sent"
                    );
                    return Err(OverrideError::Notify(notify_error));
                }
                error!(
                    message_id = command.message_id(),
                    requester = command.requester(),
                    locator = command.comment_locator(),
                    stage = failure.stage(),
                    error = %render_error_chain(&failure),
                    "moderator add failed"
                );
                Err(failure)
            }
        }
    }

    async fn run_sequence(
        &self,
        command: &OverrideCommand,
    ) -> Result<WorkflowOutcome, OverrideError> {
        let collaborators = &self.collaborators;

        let mut comment = collaborators
            .resolver
            .resolve_by_locator(command.comment_locator())
            .await?;
        collaborators.resolver.populate_context(&mut comment).await?;

        let detection = collaborators.detector.detect(&comment).await?;
        if detection.blocks_override() {
            warn!(
                message_id = command.message_id(),
                comment = %comment.fullname,
                "moderator add rejected: comment already has a successful award"
            );
            let outcome = WorkflowOutcome::AlreadyAwarded;
            self.notify(command, &outcome).await?;
            return Ok(outcome);
        }

        // Moderators can award any comment, eligibility rules do not apply.
        collaborators.award_engine.award(&comment).await?;

        let reply = collaborators
            .composer
            .compose(ReplyKind::ModeratorAdded, &comment)
            .await?;
        // Delete rather than edit so the comment never shows two bot replies.
        for prior_reply in detection.replies_to_replace() {
            collaborators.publisher.delete(prior_reply).await?;
        }
        collaborators.publisher.publish(&comment, &reply).await?;

        let outcome = WorkflowOutcome::Succeeded;
        self.notify(command, &outcome).await?;
        Ok(outcome)
    }

    async fn notify(
        &self,
        command: &OverrideCommand,
        outcome: &WorkflowOutcome,
    ) -> Result<(), NotifyError> {
        self.collaborators
            .notifier
            .reply_to_requester(command.message_id(), &outcome.notification_text())
            .await
    }
}
