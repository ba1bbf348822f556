use async_trait::async_trait;
use deltabot_mod_add::{Comment, ComposeError, ReplyComposer, ReplyKind};

use crate::delta_flair::DELTA_SYMBOL;
use crate::reply_marker::render_reply_marker;

const DELETED_AUTHOR: &str = "[deleted]";

fn render_reply_body(kind: ReplyKind, author: &str, subreddit: &str) -> String {
    match kind {
        ReplyKind::Success => format!("Confirmed: 1 delta ({DELTA_SYMBOL}) awarded to u/{author}."),
        ReplyKind::ModeratorAdded => format!(
            "Confirmed: 1 delta ({DELTA_SYMBOL}) awarded to u/{author}.\n\nThis delta was added by a r/{subreddit} moderator."
        ),
        ReplyKind::FailCommentTooShort => format!(
            "This delta has not been awarded. Please include an explanation of how u/{author} changed your view."
        ),
        ReplyKind::FailCannotAwardSelf => {
            "This delta has not been awarded. You cannot award a delta to yourself.".to_string()
        }
        ReplyKind::FailCannotAwardOp => {
            "This delta has not been awarded. You cannot award a delta to the original poster.".to_string()
        }
        ReplyKind::FailAlreadyAwarded => format!(
            "This delta has not been awarded. You have already awarded u/{author} a delta in this comment thread."
        ),
    }
}

fn render_reply_footer(subreddit: &str) -> String {
    format!(
        "^[Delta System Explained](/r/{subreddit}/wiki/DeltaSystem) ^| ^[Deltaboards](/r/{subreddit}/wiki/deltaboards)"
    )
}

#[derive(Debug, Clone)]
/// Renders bot replies and stamps them with a reply marker.
pub struct TemplateReplyComposer {
    subreddit: String,
}

impl TemplateReplyComposer {
    pub fn new(subreddit: impl Into<String>) -> Self {
        Self {
            subreddit: subreddit.into(),
        }
    }

    pub fn render(&self, kind: ReplyKind, comment: &Comment) -> Result<String, ComposeError> {
        let author = comment.author.trim();
        if author.is_empty() || author == DELETED_AUTHOR {
            return Err(ComposeError::MissingAuthor {
                kind: kind.to_string(),
                comment: comment.fullname.clone(),
            });
        }
        let subreddit = if self.subreddit.trim().is_empty() {
            comment.subreddit.as_str()
        } else {
            self.subreddit.trim()
        };
        Ok(format!(
            "{}\n\n---\n{}\n{}",
            render_reply_body(kind, author, subreddit),
            render_reply_footer(subreddit),
            render_reply_marker(kind)
        ))
    }
}

#[async_trait]
impl ReplyComposer for TemplateReplyComposer {
    async fn compose(&self, kind: ReplyKind, comment: &Comment) -> Result<String, ComposeError> {
        self.render(kind, comment)
    }
}
