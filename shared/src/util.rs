/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Current UTC timestamp in whole seconds
pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Current timestamp in fractional seconds
pub fn now_secs_f64() -> f64 {
    now_millis() as f64 / 1000.0
}

/// Local wall-clock time as `HH:MM:SS`, used for display strings
pub fn wall_clock() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_clock_format() {
        let s = wall_clock();
        assert_eq!(s.len(), 8);
        assert_eq!(s.as_bytes()[2], b':');
        assert_eq!(s.as_bytes()[5], b':');
    }

    #[test]
    fn test_secs_and_millis_agree() {
        let millis = now_millis();
        let secs = now_secs();
        assert!((millis / 1000 - secs).abs() <= 1);
    }
}
