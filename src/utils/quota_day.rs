use chrono::{DateTime, Utc};
use chrono_tz::US::Pacific;

use crate::consts::DATE_FORMAT;

/// Quota resets at midnight Pacific time, so usage is bucketed by that calendar day.
pub(crate) fn quota_day_key(now: DateTime<Utc>) -> String {
    now.with_timezone(&Pacific).format(DATE_FORMAT).to_string()
}
