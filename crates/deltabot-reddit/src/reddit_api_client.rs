use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use deltabot_mod_add::{
    AwardEngine, AwardError, Comment, CommentResolver, Notifier, NotifyError, PublishError,
    ReplyPublisher, ReplyRef, ResolutionError,
};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::comment_locator::parse_comment_locator;
use crate::delta_flair::next_delta_flair;
use crate::reddit_listing::{find_comment_in_thread, RedditApiEnvelope, RedditListing};
use crate::reddit_transport_helpers::{
    parse_retry_after, retry_delay, truncate_for_error, RetryPolicy,
};

const DELETED_AUTHOR: &str = "[deleted]";
const MAX_ERROR_BODY_CHARS: usize = 800;

#[derive(Debug, Clone)]
pub struct RedditApiClientConfig {
    pub api_base: String,
    pub token: String,
    pub user_agent: String,
    pub request_timeout_ms: u64,
    pub retry_max_attempts: usize,
    pub retry_base_delay_ms: u64,
}

fn strip_fullname_prefix<'a>(fullname: &'a str, prefix: &str) -> &'a str {
    fullname.strip_prefix(prefix).unwrap_or(fullname)
}

fn with_fullname_prefix(id: &str, prefix: &str) -> String {
    if id.starts_with(prefix) {
        id.to_string()
    } else {
        format!("{prefix}{id}")
    }
}

#[derive(Clone)]
/// OAuth client for the Reddit endpoints the moderator add needs.
pub struct RedditApiClient {
    http: reqwest::Client,
    api_base: String,
    retry_max_attempts: usize,
    retry_base_delay_ms: u64,
}

impl RedditApiClient {
    pub fn new(config: RedditApiClientConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_str(config.user_agent.trim())
                .context("invalid reddit user agent header")?,
        );
        let auth_header = format!("Bearer {}", config.token.trim());
        headers.insert(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_str(&auth_header)
                .context("invalid reddit authorization header")?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.request_timeout_ms.max(1)))
            .build()
            .context("failed to create reddit api client")?;
        Ok(Self {
            http: client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            retry_max_attempts: config.retry_max_attempts.max(1),
            retry_base_delay_ms: config.retry_base_delay_ms.max(1),
        })
    }

    pub async fn fetch_comment(&self, fullname: &str) -> Result<Option<Comment>> {
        let listing: RedditListing = self
            .request_json("fetch comment info", RetryPolicy::Idempotent, || {
                self.http
                    .get(format!("{}/api/info", self.api_base))
                    .query(&[("id", fullname), ("raw_json", "1")])
            })
            .await?;
        Ok(listing
            .comments()?
            .into_iter()
            .find(|comment| comment.fullname == fullname))
    }

    pub async fn fetch_comment_thread(
        &self,
        link_id: &str,
        comment_id: &str,
    ) -> Result<Option<Comment>> {
        let link_id = strip_fullname_prefix(link_id, "t3_");
        let comment_id = strip_fullname_prefix(comment_id, "t1_");
        let listings: Vec<RedditListing> = self
            .request_json("fetch comment thread", RetryPolicy::Idempotent, || {
                self.http
                    .get(format!("{}/comments/{link_id}", self.api_base))
                    .query(&[
                        ("comment", comment_id),
                        ("depth", "2"),
                        ("limit", "100"),
                        ("raw_json", "1"),
                    ])
            })
            .await?;
        find_comment_in_thread(&listings, &format!("t1_{comment_id}"))
    }

    pub async fn delete_thing(&self, fullname: &str) -> Result<()> {
        let envelope: RedditApiEnvelope = self
            .request_json("delete thing", RetryPolicy::Idempotent, || {
                self.http
                    .post(format!("{}/api/del", self.api_base))
                    .form(&[("id", fullname)])
            })
            .await?;
        ensure_no_api_errors("delete thing", &envelope)
    }

    pub async fn post_comment(&self, parent_fullname: &str, text: &str) -> Result<()> {
        let envelope: RedditApiEnvelope = self
            .request_json("post comment", RetryPolicy::SingleDelivery, || {
                self.http
                    .post(format!("{}/api/comment", self.api_base))
                    .form(&[
                        ("api_type", "json"),
                        ("thing_id", parent_fullname),
                        ("text", text),
                    ])
            })
            .await?;
        ensure_no_api_errors("post comment", &envelope)
    }

    pub async fn set_user_flair(&self, subreddit: &str, username: &str, text: &str) -> Result<()> {
        let envelope: RedditApiEnvelope = self
            .request_json("set user flair", RetryPolicy::Idempotent, || {
                self.http
                    .post(format!("{}/r/{subreddit}/api/flair", self.api_base))
                    .form(&[("api_type", "json"), ("name", username), ("text", text)])
            })
            .await?;
        ensure_no_api_errors("set user flair", &envelope)
    }

    async fn request_json<T, F>(
        &self,
        operation: &str,
        policy: RetryPolicy,
        mut request_builder: F,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnMut() -> reqwest::RequestBuilder,
    {
        let mut attempt = 0_usize;
        loop {
            attempt = attempt.saturating_add(1);
            let response = request_builder().send().await;
            match response {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed = response
                            .json::<T>()
                            .await
                            .with_context(|| format!("failed to decode reddit {operation}"))?;
                        return Ok(parsed);
                    }

                    let retry_after = parse_retry_after(response.headers());
                    let body = response.text().await.unwrap_or_default();
                    let retryable = policy.retries_status(status.as_u16());
                    if attempt < self.retry_max_attempts && retryable {
                        debug!(
                            operation,
                            attempt,
                            status = status.as_u16(),
                            "retrying reddit request"
                        );
                        tokio::time::sleep(retry_delay(
                            self.retry_base_delay_ms,
                            attempt,
                            retry_after,
                        ))
                        .await;
                        continue;
                    }

                    bail!(
                        "reddit api {operation} failed with status {}: {}",
                        status.as_u16(),
                        truncate_for_error(&body, MAX_ERROR_BODY_CHARS)
                    );
                }
                Err(error) => {
                    if attempt < self.retry_max_attempts && policy.retries_transport_error(&error) {
                        debug!(operation, attempt, "retrying reddit request after transport error");
                        tokio::time::sleep(retry_delay(self.retry_base_delay_ms, attempt, None))
                            .await;
                        continue;
                    }
                    return Err(error)
                        .with_context(|| format!("reddit api {operation} request failed"));
                }
            }
        }
    }
}

fn ensure_no_api_errors(operation: &str, envelope: &RedditApiEnvelope) -> Result<()> {
    match envelope.error_summary() {
        Some(summary) => Err(anyhow!("reddit api {operation} rejected: {summary}")),
        None => Ok(()),
    }
}

#[async_trait]
impl CommentResolver for RedditApiClient {
    async fn resolve_by_locator(&self, locator: &str) -> Result<Comment, ResolutionError> {
        let parsed = parse_comment_locator(locator).map_err(|error| {
            ResolutionError::InvalidLocator {
                locator: locator.to_string(),
                reason: error.to_string(),
            }
        })?;
        let fullname = parsed.comment_fullname();
        self.fetch_comment(&fullname)
            .await
            .map_err(|source| ResolutionError::transport("resolve comment", source))?
            .ok_or_else(|| ResolutionError::not_found(locator))
    }

    async fn populate_context(&self, comment: &mut Comment) -> Result<(), ResolutionError> {
        let populated = self
            .fetch_comment_thread(&comment.link_id, &comment.id)
            .await
            .map_err(|source| ResolutionError::transport("load comment context", source))?
            .ok_or_else(|| ResolutionError::not_found(comment.fullname.clone()))?;
        if comment.parent_id.is_none() {
            comment.parent_id = populated.parent_id;
        }
        comment.replies = populated.replies;
        debug!(
            comment = %comment.fullname,
            replies = comment.replies.len(),
            "populated comment context"
        );
        Ok(())
    }
}

#[async_trait]
impl AwardEngine for RedditApiClient {
    async fn award(&self, comment: &Comment) -> Result<(), AwardError> {
        let author = comment.author.trim();
        if author.is_empty() || author == DELETED_AUTHOR {
            return Err(AwardError::Rejected {
                comment: comment.fullname.clone(),
                reason: "comment author is deleted".to_string(),
            });
        }
        let flair = next_delta_flair(comment.author_flair_text.as_deref());
        self.set_user_flair(&comment.subreddit, author, &flair)
            .await
            .map_err(|source| AwardError::Transport {
                comment: comment.fullname.clone(),
                source,
            })?;
        info!(comment = %comment.fullname, author, flair = %flair, "awarded delta");
        Ok(())
    }
}

#[async_trait]
impl ReplyPublisher for RedditApiClient {
    async fn delete(&self, reply: &ReplyRef) -> Result<(), PublishError> {
        self.delete_thing(&reply.fullname)
            .await
            .map_err(|source| PublishError::Delete {
                reply: reply.fullname.clone(),
                source,
            })?;
        info!(reply = %reply.fullname, "deleted prior bot reply");
        Ok(())
    }

    async fn publish(&self, comment: &Comment, text: &str) -> Result<(), PublishError> {
        self.post_comment(&comment.fullname, text)
            .await
            .map_err(|source| PublishError::Publish {
                comment: comment.fullname.clone(),
                source,
            })?;
        info!(comment = %comment.fullname, "published moderator reply");
        Ok(())
    }
}

#[async_trait]
impl Notifier for RedditApiClient {
    async fn reply_to_requester(&self, message_id: &str, text: &str) -> Result<(), NotifyError> {
        let fullname = with_fullname_prefix(message_id.trim(), "t4_");
        self.post_comment(&fullname, text)
            .await
            .map_err(|source| NotifyError {
                message_id: message_id.to_string(),
                source,
            })
    }
}
