const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Convert a capture timestamp from nanoseconds to seconds.
pub fn nanos_to_seconds(nanos: i64) -> f64 {
    nanos as f64 / NANOS_PER_SECOND
}

/// Rebase timestamps so the first observed one becomes zero.
///
/// Charts across devices with different boot times stay comparable
/// within one run because every handler plots relative seconds, never
/// absolute capture time. Idempotent: rebasing an already zero-based
/// sequence is a no-op.
pub fn rebase_nanos(timestamps: &[i64]) -> Vec<i64> {
    match timestamps.first() {
        Some(&first) => timestamps.iter().map(|&t| t - first).collect(),
        None => Vec::new(),
    }
}

/// Reduce a free-form name to a filesystem-safe artifact stem.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_sep = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nanos_to_seconds() {
        assert_eq!(nanos_to_seconds(1_500_000_000), 1.5);
        assert_eq!(nanos_to_seconds(0), 0.0);
    }

    #[test]
    fn test_rebase_is_idempotent() {
        let raw = vec![5_000, 6_000, 9_000];
        let once = rebase_nanos(&raw);
        assert_eq!(once, vec![0, 1_000, 4_000]);

        let twice = rebase_nanos(&once);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_rebase_empty() {
        assert!(rebase_nanos(&[]).is_empty());
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Memory allocation"), "memory_allocation");
        assert_eq!(slug("Pixel 4 (Google, 11)"), "pixel_4_google_11");
        assert_eq!(slug("__odd--name__"), "odd_name");
    }
}
