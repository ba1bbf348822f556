use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Error)]
/// Failure mapping a locator to a comment or loading its thread context.
pub enum ResolutionError {
    #[error("no comment matches locator '{locator}'")]
    NotFound { locator: String },
    #[error("'{locator}' is not a comment url: {reason}")]
    InvalidLocator { locator: String, reason: String },
    #[error("{operation} failed")]
    Transport {
        operation: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ResolutionError {
    pub fn not_found(locator: impl Into<String>) -> Self {
        Self::NotFound {
            locator: locator.into(),
        }
    }

    pub fn transport(operation: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Transport {
            operation: operation.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
#[error("{operation} failed")]
pub struct DetectionError {
    pub operation: String,
    #[source]
    pub source: anyhow::Error,
}

#[derive(Debug, Error)]
pub enum AwardError {
    #[error("award rejected for comment {comment}: {reason}")]
    Rejected { comment: String, reason: String },
    #[error("award for comment {comment} failed")]
    Transport {
        comment: String,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("cannot address {kind} reply: comment {comment} has no author")]
    MissingAuthor { kind: String, comment: String },
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to delete reply {reply}")]
    Delete {
        reply: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to publish reply to comment {comment}")]
    Publish {
        comment: String,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Debug, Error)]
#[error("failed to reply to private message {message_id}")]
pub struct NotifyError {
    pub message_id: String,
    #[source]
    pub source: anyhow::Error,
}

#[derive(Debug, Error)]
/// Stage-tagged failure of a moderator add.
pub enum OverrideError {
    #[error("comment resolution failed")]
    Resolution(#[from] ResolutionError),
    #[error("reply detection failed")]
    Detection(#[from] DetectionError),
    #[error("delta award failed")]
    Award(#[from] AwardError),
    #[error("reply composition failed")]
    Compose(#[from] ComposeError),
    #[error("reply replacement failed")]
    Publish(#[from] PublishError),
    #[error("requester notification failed")]
    Notify(#[from] NotifyError),
}

impl OverrideError {
    pub fn stage(&self) -> &'static str {
        match self {
            OverrideError::Resolution(_) => "resolve",
            OverrideError::Detection(_) => "detect",
            OverrideError::Award(_) => "award",
            OverrideError::Compose(_) => "compose",
            OverrideError::Publish(_) => "publish",
            OverrideError::Notify(_) => "notify",
        }
    }
}

/// Renders an error with its full `source()` chain, outermost first.
pub fn render_error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut rendered = error.to_string();
    let mut current = error.source();
    while let Some(source) = current {
        rendered.push_str(": ");
        rendered.push_str(&source.to_string());
        current = source.source();
    }
    rendered
}
