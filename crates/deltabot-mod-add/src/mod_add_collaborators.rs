use std::sync::Arc;

use async_trait::async_trait;

use crate::mod_add_contract::{Comment, ReplyDetectionResult, ReplyKind, ReplyRef};
use crate::mod_add_errors::{
    AwardError, ComposeError, DetectionError, NotifyError, PublishError, ResolutionError,
};

#[async_trait]
/// Maps a comment locator to a remote comment.
pub trait CommentResolver: Send + Sync {
    async fn resolve_by_locator(&self, locator: &str) -> Result<Comment, ResolutionError>;

    /// Loads parent and child relations needed for reply detection.
    async fn populate_context(&self, comment: &mut Comment) -> Result<(), ResolutionError>;
}

#[async_trait]
pub trait ReplyDetector: Send + Sync {
    async fn detect(&self, comment: &Comment) -> Result<ReplyDetectionResult, DetectionError>;
}

#[async_trait]
pub trait AwardEngine: Send + Sync {
    async fn award(&self, comment: &Comment) -> Result<(), AwardError>;
}

#[async_trait]
pub trait ReplyComposer: Send + Sync {
    async fn compose(&self, kind: ReplyKind, comment: &Comment) -> Result<String, ComposeError>;
}

#[async_trait]
pub trait ReplyPublisher: Send + Sync {
    async fn delete(&self, reply: &ReplyRef) -> Result<(), PublishError>;

    async fn publish(&self, comment: &Comment, text: &str) -> Result<(), PublishError>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn reply_to_requester(&self, message_id: &str, text: &str) -> Result<(), NotifyError>;
}

#[derive(Clone)]
/// Capability set injected into the workflow.
pub struct OverrideCollaborators {
    pub resolver: Arc<dyn CommentResolver>,
    pub detector: Arc<dyn ReplyDetector>,
    pub award_engine: Arc<dyn AwardEngine>,
    pub composer: Arc<dyn ReplyComposer>,
    pub publisher: Arc<dyn ReplyPublisher>,
    pub notifier: Arc<dyn Notifier>,
}
