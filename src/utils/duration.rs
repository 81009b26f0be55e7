//! Duration parsing and formatting

/// Parse `SS`, `MM:SS` or `HH:MM:SS` into whole seconds.
///
/// Used both as a clap value parser and by the console `set` command.
pub fn parse_duration(input: &str) -> Result<u64, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("duration is empty".to_string());
    }

    let parts: Vec<&str> = input.split(':').collect();
    if parts.len() > 3 {
        return Err(format!("too many fields in '{}', expected HH:MM:SS", input));
    }

    let mut values = Vec::with_capacity(parts.len());
    for part in &parts {
        let value = part
            .trim()
            .parse::<u64>()
            .map_err(|_| format!("'{}' is not a whole number in '{}'", part, input))?;
        values.push(value);
    }

    // Lower fields are bounded only when a larger unit is present
    for value in values.iter().skip(1) {
        if *value >= 60 {
            return Err(format!("minutes and seconds must be below 60 in '{}'", input));
        }
    }

    let total = values
        .iter()
        .try_fold(0u64, |acc, v| acc.checked_mul(60)?.checked_add(*v))
        .ok_or_else(|| format!("duration '{}' is too large", input))?;

    if total == 0 {
        return Err("duration must be at least 1 second".to_string());
    }
    Ok(total)
}

/// Render whole seconds as `HH:MM:SS`
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_forms() {
        assert_eq!(parse_duration("45"), Ok(45));
        assert_eq!(parse_duration("2:30"), Ok(150));
        assert_eq!(parse_duration("01:00:05"), Ok(3_605));
        assert_eq!(parse_duration(" 90 "), Ok(90));
    }

    #[test]
    fn bare_seconds_may_exceed_a_minute() {
        assert_eq!(parse_duration("600"), Ok(600));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("0").is_err());
        assert!(parse_duration("00:00:00").is_err());
        assert!(parse_duration("1:75").is_err());
        assert!(parse_duration("1:2:3:4").is_err());
        assert!(parse_duration("ten").is_err());
        assert!(parse_duration("-5").is_err());
    }

    #[test]
    fn formats_hms() {
        assert_eq!(format_hms(60), "00:01:00");
        assert_eq!(format_hms(3_725), "01:02:05");
    }
}
