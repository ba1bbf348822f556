//! Moderator force-add workflow for DeltaBot.
//!
//! A moderator sends the bot a private message whose body is a comment URL.
//! The workflow awards a delta to that comment regardless of prior bot
//! activity, swaps any existing bot reply for a moderator-attributed one, and
//! answers the moderator with exactly one message.

pub mod comment_lock;
pub mod mod_add_collaborators;
pub mod mod_add_contract;
pub mod mod_add_errors;
pub mod mod_add_workflow;

pub use comment_lock::{CommentLockGuard, CommentLockRegistry};
pub use mod_add_collaborators::{
    AwardEngine, CommentResolver, Notifier, OverrideCollaborators, ReplyComposer, ReplyDetector,
    ReplyPublisher,
};
pub use mod_add_contract::{
    Comment, OverrideCommand, PrivateMessage, ReplyDetectionResult, ReplyKind, ReplyRef,
    WorkflowOutcome,
};
pub use mod_add_errors::{
    render_error_chain, AwardError, ComposeError, DetectionError, NotifyError, OverrideError,
    PublishError, ResolutionError,
};
pub use mod_add_workflow::{
    OverrideWorkflow, ADD_FAILED_ALREADY_AWARDED_MESSAGE, ADD_FAILED_ERROR_MESSAGE_PREFIX,
    ADD_SUCCEEDED_MESSAGE,
};
