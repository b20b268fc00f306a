/// Text processing utilities
pub mod text {
    use crate::types::Record;

    /// Substitute `{column}` placeholders with the record's field values.
    /// Unknown placeholders and unmatched braces are kept verbatim.
    pub fn render_template(template: &str, record: &Record) -> String {
        let mut rendered = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            rendered.push_str(&rest[..open]);
            let after_open = &rest[open + 1..];
            match after_open.find('}') {
                Some(close) => {
                    let name = &after_open[..close];
                    match record.field(name) {
                        Some(value) => rendered.push_str(value),
                        None => {
                            rendered.push('{');
                            rendered.push_str(name);
                            rendered.push('}');
                        }
                    }
                    rest = &after_open[close + 1..];
                }
                None => {
                    rendered.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }
        rendered.push_str(rest);

        rendered
    }

    /// Split `items` into `max(1, len / per_row)` rows of near-equal size,
    /// earlier rows taking the remainder.
    pub fn split_rows<T: Clone>(items: &[T], per_row: usize) -> Vec<Vec<T>> {
        if items.is_empty() {
            return Vec::new();
        }
        let row_count = (items.len() / per_row.max(1)).max(1);
        let base = items.len() / row_count;
        let extra = items.len() % row_count;

        let mut rows = Vec::with_capacity(row_count);
        let mut start = 0;
        for row in 0..row_count {
            let size = base + usize::from(row < extra);
            rows.push(items[start..start + size].to_vec());
            start += size;
        }
        rows
    }
}

/// Time utilities
pub mod time {
    use crate::types::{AnnotatorError, Result, TIMESTAMP_FORMAT};
    use chrono::{Local, NaiveDateTime, Timelike};

    /// Local wall-clock time truncated to whole seconds.
    pub fn now() -> NaiveDateTime {
        let now = Local::now().naive_local();
        now.with_nanosecond(0).unwrap_or(now)
    }

    pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
        timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
        NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).map_err(|source| {
            AnnotatorError::Timestamp {
                value: value.to_string(),
                source,
            }
        })
    }
}
