//! Staleness decisions.
//!
//! Both checks deliberately treat an equal timestamp as "changed". Many
//! filesystems only record whole seconds, so an edit landing in the same
//! tick as the previous build output must not be missed. The cost is an
//! occasional spurious rebuild, which is the right side to err on.

use std::time::SystemTime;

/// Whole-build skip check: is there anything to do at all?
///
/// `None` for the executable means it was never built. Otherwise any
/// input at or past the executable's timestamp forces a build.
pub fn needs_full_build(
    exe_mtime: Option<SystemTime>,
    inputs: impl IntoIterator<Item = SystemTime>,
) -> bool {
    match exe_mtime {
        None => true,
        Some(exe) => inputs.into_iter().any(|ts| ts >= exe),
    }
}

/// Per-object check: does this translation unit need recompiling?
///
/// A missing object always does. An existing one is rebuilt unless it is
/// strictly newer than every contributing file. `newest_input` of `None`
/// (no readable inputs) rebuilds rather than guesses.
pub fn object_stale(obj_mtime: Option<SystemTime>, newest_input: Option<SystemTime>) -> bool {
    match (obj_mtime, newest_input) {
        (None, _) => true,
        (Some(_), None) => true,
        (Some(obj), Some(input)) => obj <= input,
    }
}

/// Most recent of a set of timestamps.
pub fn newest(times: impl IntoIterator<Item = SystemTime>) -> Option<SystemTime> {
    times.into_iter().max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn missing_executable_forces_a_build() {
        assert!(needs_full_build(None, [at(1)]));
        assert!(needs_full_build(None, []));
    }

    #[test]
    fn untouched_inputs_skip_the_build() {
        assert!(!needs_full_build(Some(at(100)), [at(90), at(99)]));
    }

    #[test]
    fn newer_input_forces_a_build() {
        assert!(needs_full_build(Some(at(100)), [at(90), at(101)]));
    }

    #[test]
    fn equal_input_timestamp_forces_a_build() {
        assert!(needs_full_build(Some(at(100)), [at(100)]));
    }

    #[test]
    fn missing_object_is_stale() {
        assert!(object_stale(None, Some(at(5))));
        assert!(object_stale(None, None));
    }

    #[test]
    fn object_newer_than_all_inputs_is_fresh() {
        assert!(!object_stale(Some(at(10)), Some(at(9))));
    }

    #[test]
    fn object_equal_to_newest_input_is_stale() {
        assert!(object_stale(Some(at(10)), Some(at(10))));
    }

    #[test]
    fn object_older_than_an_input_is_stale() {
        assert!(object_stale(Some(at(10)), Some(at(11))));
    }

    #[test]
    fn object_with_no_readable_inputs_is_stale() {
        assert!(object_stale(Some(at(10)), None));
    }

    #[test]
    fn newest_picks_the_maximum() {
        assert_eq!(newest([at(3), at(7), at(5)]), Some(at(7)));
        assert_eq!(newest([]), None);
    }
}
