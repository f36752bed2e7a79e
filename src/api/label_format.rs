use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};

const UNIT_SUFFIXES: [&str; 6] = ["K", "M", "G", "T", "P", "E"];
const THIN_SPACE: char = '\u{2009}';
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Abbreviates values above 9999 with a unit suffix, truncating the mantissa.
///
/// `12345 -> "12K"`, `1234567 -> "1M"`.
#[must_use]
pub fn shortened_value(value: i64) -> String {
    if value > 9_999 {
        let exponent = ((value as f64).log10() / 3.0) as usize;
        if let Some(suffix) = exponent
            .checked_sub(1)
            .and_then(|index| UNIT_SUFFIXES.get(index))
        {
            let mantissa = (value as f64 / 1000f64.powi(exponent as i32)) as i64;
            return format!("{mantissa}{suffix}");
        }
    }
    value.to_string()
}

/// Groups digits by three with thin spaces when there are more than five.
///
/// `123456 -> "123 456"` (U+2009 separator), `12345 -> "12345"`.
#[must_use]
pub fn grouped_value(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let sign = if value < 0 { "-" } else { "" };
    if digits.len() <= 5 {
        return format!("{sign}{digits}");
    }

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * 3 + 1);
    grouped.push_str(sign);
    let lead = digits.len() % 3;
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (index + 3 - lead) % 3 == 0 {
            grouped.push(THIN_SPACE);
        }
        grouped.push(ch);
    }
    grouped
}

/// `chrono` format strings chosen from the dataset's point spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFormats {
    pub axis: &'static str,
    pub tooltip: &'static str,
    pub start_title: &'static str,
    pub end_title: &'static str,
}

impl DateFormats {
    /// Daily data gets calendar labels, anything else gets clock labels.
    #[must_use]
    pub fn for_spacing(spacing_secs: f64) -> Self {
        let (axis, tooltip) = if spacing_secs == SECONDS_PER_DAY {
            ("%b %d", "%a, %d %b %Y")
        } else {
            ("%H:%M", "%H:%M")
        };
        Self {
            axis,
            tooltip,
            start_title: "%-d %B %Y",
            end_title: "%Y %B %-d",
        }
    }
}

impl Default for DateFormats {
    fn default() -> Self {
        Self::for_spacing(SECONDS_PER_DAY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateStyle {
    Axis,
    Tooltip,
    StartTitle,
    EndTitle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateLabelCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

/// Formats timestamps in a fixed offset and memoizes the strings.
#[derive(Debug)]
pub struct DateLabeler {
    formats: DateFormats,
    offset: FixedOffset,
    entries: HashMap<(DateStyle, i64), String>,
    hits: u64,
    misses: u64,
}

impl DateLabeler {
    const MAX_ENTRIES: usize = 8192;

    #[must_use]
    pub fn new(formats: DateFormats, offset: FixedOffset) -> Self {
        Self {
            formats,
            offset,
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    #[must_use]
    pub fn formats(&self) -> DateFormats {
        self.formats
    }

    /// Switches formats and drops every cached string.
    pub fn reset(&mut self, formats: DateFormats, offset: FixedOffset) {
        self.formats = formats;
        self.offset = offset;
        self.entries.clear();
    }

    pub fn format(&mut self, timestamp: f64, style: DateStyle) -> String {
        let key = (style, (timestamp * 1000.0).round() as i64);
        if let Some(value) = self.entries.get(&key) {
            self.hits = self.hits.saturating_add(1);
            return value.clone();
        }
        self.misses = self.misses.saturating_add(1);
        let pattern = match style {
            DateStyle::Axis => self.formats.axis,
            DateStyle::Tooltip => self.formats.tooltip,
            DateStyle::StartTitle => self.formats.start_title,
            DateStyle::EndTitle => self.formats.end_title,
        };
        let value = match self.local_time(timestamp) {
            Some(time) => time.format(pattern).to_string(),
            None => format!("{timestamp}"),
        };
        if self.entries.len() >= Self::MAX_ENTRIES {
            self.entries.clear();
        }
        self.entries.insert(key, value.clone());
        value
    }

    /// Whether both timestamps fall on the same calendar day in the offset.
    #[must_use]
    pub fn same_day(&self, left: f64, right: f64) -> bool {
        match (self.local_time(left), self.local_time(right)) {
            (Some(left), Some(right)) => left.date_naive() == right.date_naive(),
            _ => false,
        }
    }

    #[must_use]
    pub fn stats(&self) -> DateLabelCacheStats {
        DateLabelCacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.entries.len(),
        }
    }

    fn local_time(&self, timestamp: f64) -> Option<DateTime<FixedOffset>> {
        if !timestamp.is_finite() {
            return None;
        }
        let secs = timestamp.floor();
        let nanos = ((timestamp - secs) * 1e9) as u32;
        DateTime::from_timestamp(secs as i64, nanos).map(|time| time.with_timezone(&self.offset))
    }
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    use super::{DateFormats, DateLabeler, DateStyle, grouped_value, shortened_value};

    #[test]
    fn shortened_values_use_unit_suffixes() {
        assert_eq!(shortened_value(9_999), "9999");
        assert_eq!(shortened_value(12_345), "12K");
        assert_eq!(shortened_value(123_456), "123K");
        assert_eq!(shortened_value(1_234_567), "1M");
        assert_eq!(shortened_value(-50_000), "-50000");
    }

    #[test]
    fn grouped_values_insert_thin_spaces_above_five_digits() {
        assert_eq!(grouped_value(12_345), "12345");
        assert_eq!(grouped_value(123_456), "123\u{2009}456");
        assert_eq!(grouped_value(1_234_567), "1\u{2009}234\u{2009}567");
        assert_eq!(grouped_value(-1_234_567), "-1\u{2009}234\u{2009}567");
    }

    #[test]
    fn labeler_formats_daily_data_and_caches() {
        let utc = FixedOffset::east_opt(0).expect("utc");
        let mut labeler = DateLabeler::new(DateFormats::for_spacing(86_400.0), utc);
        // 2019-03-01T00:00:00Z
        let timestamp = 1_551_398_400.0;

        assert_eq!(labeler.format(timestamp, DateStyle::Axis), "Mar 01");
        assert_eq!(labeler.format(timestamp, DateStyle::Tooltip), "Fri, 01 Mar 2019");
        assert_eq!(labeler.format(timestamp, DateStyle::StartTitle), "1 March 2019");
        assert_eq!(labeler.format(timestamp, DateStyle::EndTitle), "2019 March 1");
        assert_eq!(labeler.format(timestamp, DateStyle::Axis), "Mar 01");

        let stats = labeler.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 4);
        assert!(labeler.same_day(timestamp, timestamp + 3_600.0));
        assert!(!labeler.same_day(timestamp, timestamp + 86_400.0));
    }

    #[test]
    fn hourly_data_uses_clock_labels_in_offset() {
        let offset = FixedOffset::east_opt(3 * 3600).expect("offset");
        let mut labeler = DateLabeler::new(DateFormats::for_spacing(3_600.0), offset);
        assert_eq!(labeler.format(1_551_398_400.0, DateStyle::Axis), "03:00");
    }
}
