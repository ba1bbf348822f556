use anyhow::{Context, Result};
use deltabot_mod_add::Comment;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListing {
    pub data: RedditListingData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListingData {
    #[serde(default)]
    pub children: Vec<RedditThing>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditThing {
    pub kind: String,
    pub data: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditCommentData {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub link_id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub author_flair_text: Option<String>,
    /// Either an empty string or a nested listing.
    #[serde(default)]
    pub replies: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedditApiEnvelope {
    #[serde(default)]
    pub json: RedditApiJson,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedditApiJson {
    #[serde(default)]
    pub errors: Vec<Value>,
}

impl RedditApiEnvelope {
    /// Reddit reports form errors with a 200 status inside `json.errors`.
    pub fn error_summary(&self) -> Option<String> {
        if self.json.errors.is_empty() {
            return None;
        }
        Some(
            self.json
                .errors
                .iter()
                .map(|error| match error {
                    Value::Array(parts) => parts
                        .iter()
                        .filter_map(Value::as_str)
                        .collect::<Vec<_>>()
                        .join(": "),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

impl RedditListing {
    /// Converts `t1` children into comments, skipping `more` stubs.
    pub fn comments(&self) -> Result<Vec<Comment>> {
        self.data
            .children
            .iter()
            .filter(|thing| thing.kind == "t1")
            .map(|thing| {
                let data: RedditCommentData = serde_json::from_value(thing.data.clone())
                    .context("failed to decode reddit comment")?;
                data.into_comment()
            })
            .collect()
    }
}

impl RedditCommentData {
    pub fn into_comment(self) -> Result<Comment> {
        let replies = match self.replies {
            Value::Object(_) => {
                let listing: RedditListing = serde_json::from_value(self.replies)
                    .with_context(|| format!("failed to decode replies of {}", self.name))?;
                listing.comments()?
            }
            _ => Vec::new(),
        };
        Ok(Comment {
            fullname: self.name,
            id: self.id,
            author: self.author,
            body: self.body,
            subreddit: self.subreddit,
            link_id: self.link_id,
            parent_id: self.parent_id.filter(|parent| !parent.trim().is_empty()),
            author_flair_text: self.author_flair_text,
            replies,
        })
    }
}

/// `GET /comments/{link}` answers with `[submission, comments]`.
pub fn find_comment_in_thread(
    listings: &[RedditListing],
    fullname: &str,
) -> Result<Option<Comment>> {
    let Some(comments) = listings.get(1) else {
        return Ok(None);
    };
    Ok(comments
        .comments()?
        .into_iter()
        .find(|comment| comment.fullname == fullname))
}
