use async_trait::async_trait;
use deltabot_mod_add::{Comment, DetectionError, ReplyDetectionResult, ReplyDetector, ReplyRef};

use crate::reply_marker::extract_reply_marker;

#[derive(Debug, Clone)]
/// Finds the bot's own reply among a comment's direct children.
pub struct MarkerReplyDetector {
    bot_username: String,
}

impl MarkerReplyDetector {
    pub fn new(bot_username: impl Into<String>) -> Self {
        Self {
            bot_username: bot_username.into(),
        }
    }

    fn is_bot_author(&self, author: &str) -> bool {
        let author = author.trim();
        let author = author.strip_prefix("u/").unwrap_or(author);
        author.eq_ignore_ascii_case(self.bot_username.trim())
    }

    /// Any bot reply carrying a success marker blocks the add, whatever its
    /// position. Otherwise the first bot reply is the one to replace and any
    /// later ones are removed with it. A bot reply without a marker counts as
    /// unsuccessful.
    pub fn scan(&self, comment: &Comment) -> ReplyDetectionResult {
        let bot_replies = comment
            .replies
            .iter()
            .filter(|reply| self.is_bot_author(&reply.author))
            .collect::<Vec<_>>();
        let successful = bot_replies.iter().position(|reply| {
            extract_reply_marker(&reply.body)
                .map(|kind| kind.is_success())
                .unwrap_or(false)
        });
        let primary = match (successful, bot_replies.is_empty()) {
            (Some(index), _) => index,
            (None, true) => return ReplyDetectionResult::none(),
            (None, false) => 0,
        };

        let reply_ref = |reply: &Comment| ReplyRef {
            fullname: reply.fullname.clone(),
        };
        let extra_replies = bot_replies
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != primary)
            .map(|(_, reply)| reply_ref(*reply))
            .collect();
        ReplyDetectionResult::prior(reply_ref(bot_replies[primary]), successful.is_some())
            .with_extra_replies(extra_replies)
    }
}

#[async_trait]
impl ReplyDetector for MarkerReplyDetector {
    async fn detect(&self, comment: &Comment) -> Result<ReplyDetectionResult, DetectionError> {
        let result = self.scan(comment);
        tracing::debug!(
            comment = %comment.fullname,
            replies = comment.replies.len(),
            has_prior_reply = result.has_prior_reply,
            was_successful = result.was_successful,
            "scanned comment replies for bot reply"
        );
        Ok(result)
    }
}
