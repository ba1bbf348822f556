use deltabot_mod_add::ReplyKind;

/// Empty markdown links render invisibly on Reddit.
pub const REPLY_MARKER_PREFIX: &str = "[](#deltabot-reply:";
pub const REPLY_MARKER_SUFFIX: &str = ")";

pub fn render_reply_marker(kind: ReplyKind) -> String {
    format!("{REPLY_MARKER_PREFIX}{}{REPLY_MARKER_SUFFIX}", kind.as_str())
}

/// Returns every marker label in order of appearance, ignoring unterminated
/// markers.
pub fn extract_reply_marker_labels(text: &str) -> Vec<String> {
    let mut labels = Vec::new();
    let mut cursor = text;
    while let Some(start) = cursor.find(REPLY_MARKER_PREFIX) {
        let after_start = &cursor[start + REPLY_MARKER_PREFIX.len()..];
        let Some(end) = after_start.find(REPLY_MARKER_SUFFIX) else {
            break;
        };
        let label = after_start[..end].trim();
        if !label.is_empty() {
            labels.push(label.to_string());
        }
        cursor = &after_start[end + REPLY_MARKER_SUFFIX.len()..];
    }
    labels
}

/// The last recognised marker wins, so an edited reply reports its latest
/// state.
pub fn extract_reply_marker(text: &str) -> Option<ReplyKind> {
    extract_reply_marker_labels(text)
        .iter()
        .rev()
        .find_map(|label| ReplyKind::parse(label))
}
