//! Minimal server-sent event record parsing.
//!
//! Records are separated by a blank line. Within a record, `data:` carries
//! the text payload and `id:` the opaque event id; unknown fields and
//! comment lines are ignored.

use anyhow::bail;

/// One parsed server event.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SseEvent {
    pub data: Option<String>,
    pub id: Option<String>,
}

/// Drain the next complete record from the receive buffer, if any.
///
/// The buffer keeps any trailing partial record for the next read.
pub fn next_record(buffer: &mut String) -> Option<String> {
    let end = buffer.find("\n\n")?;
    let record = buffer[..end].to_string();
    buffer.drain(..end + 2);
    Some(record)
}

/// Parse one record into its `data`/`id` fields.
///
/// Multiple `data:` lines are joined with a newline. A non-empty line with
/// no field separator is malformed; the caller decides whether that kills
/// the stream (it does not, see the stream client).
pub fn parse_record(record: &str) -> anyhow::Result<SseEvent> {
    let mut event = SseEvent::default();
    let mut data_lines: Vec<&str> = Vec::new();

    for line in record.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        let Some((field, value)) = line.split_once(':') else {
            bail!("malformed event line: {line:?}");
        };
        let value = value.strip_prefix(' ').unwrap_or(value);
        match field {
            "data" => data_lines.push(value),
            "id" => event.id = Some(value.to_string()),
            _ => {}
        }
    }

    if !data_lines.is_empty() {
        event.data = Some(data_lines.join("\n"));
    }
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_complete_records_and_keeps_partials() {
        let mut buffer = "data: one\n\ndata: tw".to_string();

        assert_eq!(next_record(&mut buffer).as_deref(), Some("data: one"));
        assert_eq!(next_record(&mut buffer), None);

        buffer.push_str("o\n\n");
        assert_eq!(next_record(&mut buffer).as_deref(), Some("data: two"));
        assert!(buffer.is_empty());
    }

    #[test]
    fn parses_data_and_id_fields() {
        let event = parse_record("id: evt-9\ndata: hello").unwrap();
        assert_eq!(event.id.as_deref(), Some("evt-9"));
        assert_eq!(event.data.as_deref(), Some("hello"));
    }

    #[test]
    fn joins_multiple_data_lines() {
        let event = parse_record("data: a\ndata: b").unwrap();
        assert_eq!(event.data.as_deref(), Some("a\nb"));
    }

    #[test]
    fn ignores_comments_and_unknown_fields() {
        let event = parse_record(": keepalive\nretry: 3000").unwrap();
        assert_eq!(event, SseEvent::default());
    }

    #[test]
    fn empty_data_value_is_kept_distinct_from_absent() {
        let event = parse_record("data:").unwrap();
        assert_eq!(event.data.as_deref(), Some(""));
    }

    #[test]
    fn rejects_lines_without_separator() {
        assert!(parse_record("garbage without colon").is_err());
    }
}
