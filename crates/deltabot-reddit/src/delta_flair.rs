pub const DELTA_SYMBOL: &str = "∆";

/// Reads the delta count from flair text such as `12∆`. Missing or
/// unrecognised flair counts as zero.
pub fn parse_delta_count(flair_text: Option<&str>) -> u64 {
    let Some(raw) = flair_text.map(str::trim) else {
        return 0;
    };
    let Some(count) = raw.strip_suffix(DELTA_SYMBOL) else {
        return 0;
    };
    count.trim().parse::<u64>().unwrap_or(0)
}

pub fn render_delta_flair(count: u64) -> String {
    format!("{count}{DELTA_SYMBOL}")
}

pub fn next_delta_flair(flair_text: Option<&str>) -> String {
    render_delta_flair(parse_delta_count(flair_text).saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::{next_delta_flair, parse_delta_count, render_delta_flair};

    #[test]
    fn unit_parse_delta_count_reads_symbol_suffix() {
        assert_eq!(parse_delta_count(Some("12∆")), 12);
        assert_eq!(parse_delta_count(Some(" 3 ∆ ")), 3);
        assert_eq!(parse_delta_count(None), 0);
    }

    #[test]
    fn regression_parse_delta_count_treats_foreign_flair_as_zero() {
        assert_eq!(parse_delta_count(Some("Moderator")), 0);
        assert_eq!(parse_delta_count(Some("∆")), 0);
        assert_eq!(parse_delta_count(Some("-1∆")), 0);
    }

    #[test]
    fn functional_next_delta_flair_increments_existing_count() {
        assert_eq!(next_delta_flair(Some("41∆")), "42∆");
        assert_eq!(next_delta_flair(None), render_delta_flair(1));
    }
}
