#![no_main]

use deltabot_reddit::{comment_lock_key, parse_comment_locator};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let key = comment_lock_key(&raw);

    match parse_comment_locator(&raw) {
        Ok(locator) => {
            assert!(!locator.link_id.is_empty());
            assert!(!locator.comment_id.is_empty());
            assert_eq!(key, locator.comment_fullname());
            let reparsed = parse_comment_locator(&format!(
                "https://reddit.com/r/{}/comments/{}/_/{}",
                locator.subreddit, locator.link_id, locator.comment_id
            ));
            if let Ok(reparsed) = reparsed {
                assert_eq!(reparsed.comment_fullname(), locator.comment_fullname());
            }
        }
        Err(error) => {
            assert!(!error.to_string().trim().is_empty());
            assert_eq!(key, raw.trim());
        }
    }
});
