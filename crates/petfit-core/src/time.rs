use std::time::Duration;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub fn now_utc_rfc3339() -> Result<String, time::error::Format> {
    OffsetDateTime::now_utc().format(&Rfc3339)
}

/// Wall-clock duration of a fitting round trip, e.g. `"12.4s"` or `"850ms"`.
pub fn elapsed_label(elapsed: Duration) -> String {
    if elapsed < Duration::from_secs(1) {
        return format!("{}ms", elapsed.as_millis());
    }
    format!("{:.1}s", elapsed.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_utc_rfc3339_formats_timestamp() {
        let value = now_utc_rfc3339().expect("timestamp");
        assert!(value.ends_with('Z'));
        assert!(value.contains('T'));
    }

    #[test]
    fn elapsed_label_switches_units_at_one_second() {
        assert_eq!(elapsed_label(Duration::from_millis(850)), "850ms");
        assert_eq!(elapsed_label(Duration::from_millis(12_430)), "12.4s");
    }
}
