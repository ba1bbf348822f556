use std::time::Duration;

const MAX_RETRY_DELAY_MS: u64 = 30_000;

pub fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    let raw = headers.get("retry-after")?.to_str().ok()?;
    let seconds = raw.trim().parse::<f64>().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some(Duration::from_millis((seconds * 1_000.0).ceil() as u64))
}

pub fn retry_delay(base_delay_ms: u64, attempt: usize, retry_after: Option<Duration>) -> Duration {
    if let Some(delay) = retry_after {
        return delay
            .max(Duration::from_millis(base_delay_ms))
            .min(Duration::from_millis(MAX_RETRY_DELAY_MS));
    }
    let exponent = attempt.saturating_sub(1).min(10) as u32;
    let scaled = base_delay_ms.saturating_mul(2_u64.saturating_pow(exponent));
    Duration::from_millis(scaled.min(MAX_RETRY_DELAY_MS))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How a Reddit request may be repeated after a failed attempt.
pub enum RetryPolicy {
    /// Reads, deletes and flair sets land in the same state when repeated.
    Idempotent,
    /// Comment and private-message posts. Reddit may commit the write and
    /// still answer 5xx or time out, so only attempts the server provably
    /// refused (429) or never received (connect failure) are repeated.
    SingleDelivery,
}

impl RetryPolicy {
    pub fn retries_status(self, status: u16) -> bool {
        match self {
            RetryPolicy::Idempotent => status == 429 || status >= 500,
            RetryPolicy::SingleDelivery => status == 429,
        }
    }

    pub fn retries_transport_error(self, error: &reqwest::Error) -> bool {
        match self {
            RetryPolicy::Idempotent => {
                error.is_timeout() || error.is_connect() || error.is_request()
            }
            RetryPolicy::SingleDelivery => error.is_connect(),
        }
    }
}

pub fn truncate_for_error(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated = text.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}
