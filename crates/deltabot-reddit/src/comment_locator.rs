use anyhow::{bail, Context, Result};
use url::Url;

const REDDIT_HOSTS: &[&str] = &[
    "reddit.com",
    "www.reddit.com",
    "old.reddit.com",
    "new.reddit.com",
    "np.reddit.com",
];

#[derive(Debug, Clone, PartialEq, Eq)]
/// Identifies one comment inside a submission.
pub struct CommentLocator {
    pub subreddit: String,
    pub link_id: String,
    pub comment_id: String,
}

impl CommentLocator {
    pub fn comment_fullname(&self) -> String {
        format!("t1_{}", self.comment_id)
    }

    pub fn link_fullname(&self) -> String {
        format!("t3_{}", self.link_id)
    }
}

fn is_base36_id(raw: &str) -> bool {
    !raw.is_empty() && raw.chars().all(|ch| ch.is_ascii_alphanumeric())
}

/// Parses `https://reddit.com/r/{sub}/comments/{link}/{slug}/{comment}`.
pub fn parse_comment_locator(raw: &str) -> Result<CommentLocator> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("comment url is empty");
    }
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    let url = Url::parse(&with_scheme)
        .with_context(|| format!("invalid comment url '{trimmed}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("unsupported comment url scheme '{}'", url.scheme());
    }
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    if !REDDIT_HOSTS.contains(&host.as_str()) {
        bail!("comment url host '{host}' is not reddit");
    }

    let segments = url
        .path_segments()
        .map(|segments| segments.filter(|segment| !segment.is_empty()).collect::<Vec<_>>())
        .unwrap_or_default();
    match segments.as_slice() {
        ["r", subreddit, "comments", link_id, _slug, comment_id]
            if is_base36_id(link_id) && is_base36_id(comment_id) =>
        {
            Ok(CommentLocator {
                subreddit: (*subreddit).to_string(),
                link_id: link_id.to_ascii_lowercase(),
                comment_id: comment_id.to_ascii_lowercase(),
            })
        }
        _ => bail!("expected /r/<subreddit>/comments/<link>/<slug>/<comment> in '{trimmed}'"),
    }
}

/// Key shared by every URL spelling of one comment.
pub fn comment_lock_key(locator: &str) -> String {
    match parse_comment_locator(locator) {
        Ok(parsed) => parsed.comment_fullname(),
        Err(_) => locator.trim().to_string(),
    }
}
