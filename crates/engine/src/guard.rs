use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

use crate::error::EngineError;

/// Render a fetch token the way it travels on the wire.
pub fn format_fetch_token(token: DateTime<Utc>) -> String {
    token.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a wire-form fetch token back into an instant.
pub fn parse_fetch_token(text: &str) -> Result<DateTime<Utc>, EngineError> {
    let parsed = DateTime::parse_from_rfc3339(text)?;
    Ok(parsed.with_timezone(&Utc).trunc_subsecs(6))
}

/// Tracks the single instant of the most recent listing. A mutation that
/// presents a fetch time is rejected unless it equals this instant exactly;
/// a mutation that presents none skips the check.
///
/// Instants are truncated to whole microseconds so a token survives the
/// RFC 3339 round trip through a header and still compares equal.
pub struct FetchGuard {
    last_fetch: DateTime<Utc>,
}

impl FetchGuard {
    pub fn new() -> Self {
        Self {
            last_fetch: Utc::now().trunc_subsecs(6),
        }
    }

    pub fn last_fetch(&self) -> DateTime<Utc> {
        self.last_fetch
    }

    /// Move the marker to now and return the new token. Called on every
    /// successful listing and never on mutations.
    pub fn record_fetch(&mut self) -> DateTime<Utc> {
        self.last_fetch = Utc::now().trunc_subsecs(6);
        self.last_fetch
    }

    pub fn check(&self, presented: Option<DateTime<Utc>>) -> Result<(), EngineError> {
        match presented {
            Some(token) if token != self.last_fetch => Err(EngineError::Stale {
                presented: token,
                last_fetch: self.last_fetch,
            }),
            _ => Ok(()),
        }
    }
}

impl Default for FetchGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_survives_text_round_trip() {
        let mut guard = FetchGuard::new();
        let token = guard.record_fetch();

        let text = format_fetch_token(token);
        let parsed = parse_fetch_token(&text).unwrap();
        assert_eq!(parsed, token, "formatted token should parse back equal");
        assert!(guard.check(Some(parsed)).is_ok());
    }

    #[test]
    fn matching_token_passes() {
        let mut guard = FetchGuard::new();
        let token = guard.record_fetch();
        assert!(guard.check(Some(token)).is_ok());
    }

    #[test]
    fn mismatched_token_is_stale() {
        let mut guard = FetchGuard::new();
        let token = guard.record_fetch();

        let off_by_one = token + chrono::Duration::microseconds(1);
        let result = guard.check(Some(off_by_one));
        match result.unwrap_err() {
            EngineError::Stale {
                presented,
                last_fetch,
            } => {
                assert_eq!(presented, off_by_one);
                assert_eq!(last_fetch, token);
            }
            other => panic!("expected Stale, got {other:?}"),
        }
    }

    #[test]
    fn missing_token_skips_check() {
        let guard = FetchGuard::new();
        assert!(guard.check(None).is_ok());
    }

    #[test]
    fn marker_moves_on_record_fetch() {
        let mut guard = FetchGuard::new();
        let first = guard.record_fetch();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = guard.record_fetch();

        assert!(second > first, "expected {second:?} > {first:?}");
        assert!(guard.check(Some(first)).is_err(), "old token must go stale");
        assert!(guard.check(Some(second)).is_ok());
    }

    #[test]
    fn garbage_token_fails_to_parse() {
        let result = parse_fetch_token("not-a-timestamp");
        assert!(matches!(result, Err(EngineError::InvalidFetchTime(_))));
    }
}
