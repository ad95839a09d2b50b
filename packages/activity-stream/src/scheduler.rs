//! Refresh window evaluation for stream connections.

use chrono::{DateTime, Duration, Utc};

use crate::types::StreamConnection;

/// Whether a connection's refresh window has elapsed.
///
/// `post_delay_hours` shifts the perceived check time forward, so the
/// effective comparison is `now + delay > updated + refresh`. The
/// first-sync bootstrap (zero published items is always due) lives in
/// the orchestrator, which owns store access.
pub fn is_due(stream_connection: &StreamConnection, now: DateTime<Utc>) -> bool {
    let adjusted_now = now + Duration::hours(stream_connection.post_delay_hours);
    let window_end =
        stream_connection.updated + Duration::hours(stream_connection.stream_refresh_hours);
    adjusted_now > window_end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use chrono::TimeZone;

    fn connection_with_window(refresh: i64, delay: i64, updated: DateTime<Utc>) -> StreamConnection {
        let connection = testing::twitter_connection();
        let mut sc = testing::stream_connection(&connection);
        sc.stream_refresh_hours = refresh;
        sc.post_delay_hours = delay;
        sc.updated = updated;
        sc
    }

    #[test]
    fn window_boundaries() {
        let t = Utc.with_ymd_and_hms(2016, 5, 1, 12, 0, 0).unwrap();
        let sc = connection_with_window(2, 1, t);

        // effective check time is now + 1h against updated + 2h
        assert!(!is_due(&sc, t + Duration::minutes(2 * 60 + 59)));
        assert!(is_due(&sc, t + Duration::minutes(3 * 60 + 1)));
    }

    #[test]
    fn exact_boundary_is_not_due() {
        let t = Utc.with_ymd_and_hms(2016, 5, 1, 12, 0, 0).unwrap();
        let sc = connection_with_window(1, 0, t);
        assert!(!is_due(&sc, t + Duration::hours(1)));
        assert!(is_due(&sc, t + Duration::hours(1) + Duration::seconds(1)));
    }

    #[test]
    fn zero_delay_uses_the_plain_window() {
        let t = Utc.with_ymd_and_hms(2016, 5, 1, 12, 0, 0).unwrap();
        let sc = connection_with_window(1, 0, t);
        assert!(is_due(&sc, t + Duration::hours(2)));
    }
}
