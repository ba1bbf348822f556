use serde::{Deserialize, Serialize};

use crate::mod_add_workflow::{
    ADD_FAILED_ALREADY_AWARDED_MESSAGE, ADD_FAILED_ERROR_MESSAGE_PREFIX, ADD_SUCCEEDED_MESSAGE,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Inbound private message as delivered by the inbox.
pub struct PrivateMessage {
    pub id: String,
    #[serde(default)]
    pub author: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Parsed moderator force-add command.
pub struct OverrideCommand {
    message_id: String,
    requester: String,
    comment_locator: String,
}

impl OverrideCommand {
    pub fn new(
        message_id: impl Into<String>,
        requester: impl Into<String>,
        comment_locator: &str,
    ) -> Self {
        Self {
            message_id: message_id.into(),
            requester: requester.into(),
            comment_locator: comment_locator.trim().to_string(),
        }
    }

    /// The body should be the URL to a comment. An empty body is not rejected
    /// here; the resolver reports it as an invalid locator.
    pub fn from_private_message(message: &PrivateMessage) -> Self {
        Self::new(message.id.clone(), message.author.clone(), &message.body)
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    pub fn requester(&self) -> &str {
        &self.requester
    }

    pub fn comment_locator(&self) -> &str {
        &self.comment_locator
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Remote comment with the thread context needed for reply detection.
pub struct Comment {
    /// Fullname including the type prefix, e.g. `t1_def`.
    pub fullname: String,
    pub id: String,
    pub author: String,
    pub body: String,
    pub subreddit: String,
    pub link_id: String,
    pub parent_id: Option<String>,
    pub author_flair_text: Option<String>,
    #[serde(default)]
    pub replies: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Reference to an existing bot reply.
pub struct ReplyRef {
    pub fullname: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyDetectionResult {
    pub has_prior_reply: bool,
    pub was_successful: bool,
    pub prior_reply: Option<ReplyRef>,
    /// Further bot replies on the same comment, removed along with
    /// `prior_reply`.
    pub extra_replies: Vec<ReplyRef>,
}

impl ReplyDetectionResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn prior(reply: ReplyRef, was_successful: bool) -> Self {
        Self {
            has_prior_reply: true,
            was_successful,
            prior_reply: Some(reply),
            extra_replies: Vec::new(),
        }
    }

    pub fn with_extra_replies(mut self, replies: Vec<ReplyRef>) -> Self {
        self.extra_replies = replies;
        self
    }

    /// Every bot reply that must be gone before the moderator reply is
    /// published.
    pub fn replies_to_replace(&self) -> impl Iterator<Item = &ReplyRef> {
        self.prior_reply.iter().chain(self.extra_replies.iter())
    }

    /// Only a successful prior award blocks a moderator add.
    pub fn blocks_override(&self) -> bool {
        self.has_prior_reply && self.was_successful
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Enumerates the reply kinds the bot leaves on comments.
pub enum ReplyKind {
    Success,
    ModeratorAdded,
    FailCommentTooShort,
    FailCannotAwardSelf,
    FailCannotAwardOp,
    FailAlreadyAwarded,
}

impl ReplyKind {
    pub const ALL: [ReplyKind; 6] = [
        ReplyKind::Success,
        ReplyKind::ModeratorAdded,
        ReplyKind::FailCommentTooShort,
        ReplyKind::FailCannotAwardSelf,
        ReplyKind::FailCannotAwardOp,
        ReplyKind::FailAlreadyAwarded,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReplyKind::Success => "success",
            ReplyKind::ModeratorAdded => "moderator_added",
            ReplyKind::FailCommentTooShort => "fail_comment_too_short",
            ReplyKind::FailCannotAwardSelf => "fail_cannot_award_self",
            ReplyKind::FailCannotAwardOp => "fail_cannot_award_op",
            ReplyKind::FailAlreadyAwarded => "fail_already_awarded",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
    }

    pub fn is_success(self) -> bool {
        matches!(self, ReplyKind::Success | ReplyKind::ModeratorAdded)
    }
}

impl std::fmt::Display for ReplyKind {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Terminal value of one workflow run.
pub enum WorkflowOutcome {
    AlreadyAwarded,
    Succeeded,
    Failed { diagnostic: String },
}

impl WorkflowOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            WorkflowOutcome::AlreadyAwarded => "already_awarded",
            WorkflowOutcome::Succeeded => "succeeded",
            WorkflowOutcome::Failed { .. } => "failed",
        }
    }

    /// Text sent back to the requesting moderator.
    pub fn notification_text(&self) -> String {
        match self {
            WorkflowOutcome::AlreadyAwarded => ADD_FAILED_ALREADY_AWARDED_MESSAGE.to_string(),
            WorkflowOutcome::Succeeded => ADD_SUCCEEDED_MESSAGE.to_string(),
            WorkflowOutcome::Failed { diagnostic } => {
                format!("{ADD_FAILED_ERROR_MESSAGE_PREFIX}{diagnostic}")
            }
        }
    }
}
