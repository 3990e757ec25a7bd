use chrono::{DateTime, Utc};

/// 运行时长的可读形式，如 `2d 3h`、`5h 12m`、`42s`
pub fn format_duration_human(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    let secs = to.signed_duration_since(from).num_seconds().max(0);

    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3600;
    let minutes = (secs % 3600) / 60;

    match (days, hours, minutes) {
        (d, 0, _) if d > 0 => format!("{}d", d),
        (d, h, _) if d > 0 => format!("{}d {}h", d, h),
        (_, h, 0) if h > 0 => format!("{}h", h),
        (_, h, m) if h > 0 => format!("{}h {}m", h, m),
        (_, _, m) if m > 0 => format!("{}m", m),
        _ => format!("{}s", secs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_duration_human() {
        let start = Utc::now();
        assert_eq!(format_duration_human(start, start + Duration::seconds(42)), "42s");
        assert_eq!(format_duration_human(start, start + Duration::minutes(7)), "7m");
        assert_eq!(
            format_duration_human(start, start + Duration::minutes(5 * 60 + 12)),
            "5h 12m"
        );
        assert_eq!(format_duration_human(start, start + Duration::hours(3)), "3h");
        assert_eq!(
            format_duration_human(start, start + Duration::hours(51)),
            "2d 3h"
        );
        assert_eq!(format_duration_human(start + Duration::hours(1), start), "0s");
    }
}
