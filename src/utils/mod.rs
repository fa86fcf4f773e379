pub(crate) mod date;
pub(crate) mod logging;
pub(crate) mod quota_day;

pub(crate) use date::{format_date, parse_date, parse_record_date};
pub(crate) use logging::init_logging;
pub(crate) use quota_day::quota_day_key;
