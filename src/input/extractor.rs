//! Account reference validation
//!
//! A candidate names an account either as bare digits or through a profile
//! URL such as `https://www.nicovideo.jp/user/12345/video`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Bare account number: the whole candidate is 1-9 digits.
static BARE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{1,9}$").expect("Invalid bare id regex"));

/// Profile reference anywhere in the candidate.
static PROFILE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"((https?://)?(www\.)?)nicovideo\.jp/user/(?P<user_id>[0-9]{1,9})(/video)?")
        .expect("Invalid profile url regex")
});

/// A validated account number (1-9 ASCII digits)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extract the account number a candidate refers to, if any.
#[must_use]
pub fn extract_user_id(raw: &str) -> Option<UserId> {
    if BARE_ID.is_match(raw) {
        return Some(UserId(raw.to_string()));
    }
    PROFILE_URL
        .captures(raw)
        .and_then(|caps| caps.name("user_id"))
        .map(|m| UserId(m.as_str().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(raw: &str) -> Option<String> {
        extract_user_id(raw).map(|id| id.to_string())
    }

    #[test]
    fn accepts_bare_digits() {
        assert_eq!(extract("12345"), Some("12345".into()));
        assert_eq!(extract("123456789"), Some("123456789".into()));
    }

    #[test]
    fn rejects_bad_bare_values() {
        assert_eq!(extract("1234567890"), None);
        assert_eq!(extract("12a45"), None);
        assert_eq!(extract(""), None);
        assert_eq!(extract("garbage"), None);
        assert_eq!(extract("\u{0661}\u{0662}\u{0663}"), None);
    }

    #[test]
    fn accepts_profile_urls() {
        for raw in [
            "https://www.nicovideo.jp/user/777",
            "http://nicovideo.jp/user/777/video",
            "www.nicovideo.jp/user/777",
            "nicovideo.jp/user/777?ref=pc",
        ] {
            assert_eq!(extract(raw), Some("777".into()), "{raw}");
        }
    }

    #[test]
    fn url_match_takes_first_nine_digits() {
        assert_eq!(
            extract("https://www.nicovideo.jp/user/1234567890"),
            Some("123456789".into())
        );
    }

    #[test]
    fn rejects_other_hosts() {
        assert_eq!(extract("https://example.com/user/1"), None);
        assert_eq!(extract("https://www.nicovideo.jp/watch/sm9"), None);
    }
}
