//! ISO-8601 local date-times, e.g. `2019-11-25T10:00` or `2019-11-25T10:00:11.5`.

use chrono::{NaiveDateTime, Timelike};

use super::errors::{CodecError, CodecResult};

const WITH_SECONDS: &str = "%Y-%m-%dT%H:%M:%S%.f";
const WITHOUT_SECONDS: &str = "%Y-%m-%dT%H:%M";

pub fn parse_date_time(s: &str) -> CodecResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, WITH_SECONDS)
        .or_else(|_| NaiveDateTime::parse_from_str(s, WITHOUT_SECONDS))
        .map_err(|_| CodecError::InvalidDateTime(s.to_string()))
}

/// Shortest form: seconds are omitted when they and the fraction are zero.
pub fn format_date_time(dt: &NaiveDateTime) -> String {
    if dt.second() == 0 && dt.nanosecond() == 0 {
        dt.format(WITHOUT_SECONDS).to_string()
    } else {
        dt.format(WITH_SECONDS).to_string()
    }
}
