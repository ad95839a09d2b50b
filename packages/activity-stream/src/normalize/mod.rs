//! Provider payload → canonical item conversion.
//!
//! Normalization is a pure function of its inputs: no I/O, no lookups.
//! Visibility decisions (including the Facebook privacy check, which
//! needs the network) live in [`crate::policy`] instead.

mod facebook;
mod twitter;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

use crate::error::NormalizeError;
use crate::types::{Connection, NewStreamItem, RawPost, StreamConnection};

/// Converts raw provider payloads into canonical stream items.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    /// Offset applied to provider timestamps that carry no timezone.
    /// Timestamps with an offset pass through unchanged (converted to
    /// UTC for storage).
    naive_offset: FixedOffset,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::utc()
    }
}

impl Normalizer {
    pub fn new(naive_offset: FixedOffset) -> Self {
        Self { naive_offset }
    }

    /// Naive timestamps are read as UTC.
    pub fn utc() -> Self {
        Self::new(FixedOffset::east_opt(0).expect("zero offset is valid"))
    }

    pub fn normalize(
        &self,
        raw: &RawPost,
        stream_connection: &StreamConnection,
        connection: &Connection,
    ) -> Result<NewStreamItem, NormalizeError> {
        match raw {
            RawPost::Tweet(tweet) => {
                twitter::normalize_tweet(self, tweet, stream_connection, connection, raw)
            }
            RawPost::FacebookStatus(status) => {
                facebook::normalize_status(self, status, stream_connection, connection, raw)
            }
            RawPost::FacebookPhoto(photo) => {
                facebook::normalize_photo(self, photo, stream_connection, connection, raw)
            }
        }
    }

    /// Parse a provider timestamp into UTC.
    ///
    /// Accepts RFC 3339, the Graph API's compact offset form
    /// ("2015-03-21T12:00:00+0000"), Twitter's timeline form
    /// ("Wed Aug 27 13:08:45 +0000 2008"), and offset-less values,
    /// which are interpreted in the configured local offset.
    pub(crate) fn resolve_timestamp(&self, value: &str) -> Result<DateTime<Utc>, NormalizeError> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Ok(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z") {
            return Ok(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_str(value, "%a %b %d %H:%M:%S %z %Y") {
            return Ok(dt.with_timezone(&Utc));
        }

        let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
            .map_err(|_| NormalizeError::Timestamp {
                value: value.to_string(),
            })?;
        naive
            .and_local_timezone(self.naive_offset)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| NormalizeError::Timestamp {
                value: value.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn offset_timestamps_pass_through_as_utc() {
        let n = Normalizer::utc();
        let parsed = n.resolve_timestamp("2015-03-21T12:00:00+0100").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2015, 3, 21, 11, 0, 0).unwrap());
    }

    #[test]
    fn twitter_timeline_format_parses() {
        let n = Normalizer::utc();
        let parsed = n.resolve_timestamp("Wed Aug 27 13:08:45 +0000 2008").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2008, 8, 27, 13, 8, 45).unwrap());
    }

    #[test]
    fn naive_timestamps_use_the_configured_offset() {
        let n = Normalizer::new(FixedOffset::east_opt(2 * 3600).unwrap());
        let parsed = n.resolve_timestamp("2015-03-21T12:00:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2015, 3, 21, 10, 0, 0).unwrap());
    }

    #[test]
    fn garbage_timestamps_are_an_error() {
        let n = Normalizer::utc();
        assert!(n.resolve_timestamp("last tuesday").is_err());
    }
}
