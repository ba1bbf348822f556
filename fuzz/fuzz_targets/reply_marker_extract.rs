#![no_main]

use deltabot_mod_add::ReplyKind;
use deltabot_reddit::reply_marker::{
    extract_reply_marker, extract_reply_marker_labels, render_reply_marker, REPLY_MARKER_PREFIX,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let labels = extract_reply_marker_labels(&raw);
    let kind = extract_reply_marker(&raw);
    if let Some(kind) = kind {
        assert!(labels.iter().any(|label| label == kind.as_str()));
    }

    // An unterminated marker in the input swallows the appended one.
    if raw.contains(REPLY_MARKER_PREFIX) {
        return;
    }
    let index = data.first().copied().unwrap_or_default() as usize % ReplyKind::ALL.len();
    let stamped = format!("{raw}\n\n{}", render_reply_marker(ReplyKind::ALL[index]));
    assert_eq!(extract_reply_marker(&stamped), Some(ReplyKind::ALL[index]));
});
