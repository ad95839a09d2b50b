use serde::{Deserialize, Serialize};

/// Closed set of supported providers.
///
/// Unrecognized tags parse to `Unknown`, which every component treats as
/// a safe no-op rather than an error. This keeps stored rows readable
/// when a newer deployment wrote a provider this build does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Twitter,
    Facebook,
    Unknown,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Twitter => "twitter",
            Provider::Facebook => "facebook",
            Provider::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Provider {
    fn from(tag: &str) -> Self {
        match tag {
            "twitter" => Provider::Twitter,
            "facebook" => Provider::Facebook,
            _ => Provider::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tags_are_not_errors() {
        assert_eq!(Provider::from("twitter"), Provider::Twitter);
        assert_eq!(Provider::from("facebook"), Provider::Facebook);
        assert_eq!(Provider::from("myspace"), Provider::Unknown);
        assert_eq!(Provider::from(""), Provider::Unknown);
    }
}
