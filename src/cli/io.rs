//! JSON line I/O for the CLI
//!
//! - Input: one JSON object per line
//! - Output: one JSON object per line
//! - UTF-8 only

use std::io::{BufRead, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Iterates over JSON requests, one per non-blank line
pub fn read_requests<R: BufRead>(reader: R) -> impl Iterator<Item = CliResult<Value>> {
    reader.lines().filter_map(|line| match line {
        Ok(line) if line.trim().is_empty() => None,
        Ok(line) => Some(serde_json::from_str(&line).map_err(CliError::from)),
        Err(e) => Some(Err(CliError::from(e))),
    })
}

/// Write a success response
pub fn write_response<W: Write>(writer: &mut W, data: Value) -> CliResult<()> {
    let response = json!({
        "status": "ok",
        "data": data
    });
    serde_json::to_writer(&mut *writer, &response)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write an error response
pub fn write_error<W: Write>(writer: &mut W, code: &str, message: &str) -> CliResult<()> {
    let response = json!({
        "status": "error",
        "code": code,
        "message": message
    });
    serde_json::to_writer(&mut *writer, &response)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_requests_skips_blank_lines() {
        let input = "{\"op\":\"at\",\"offset\":0}\n\n   \n{\"op\":\"keys\",\"keys\":[\"a\"]}\n";
        let requests: Vec<_> = read_requests(input.as_bytes()).collect();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.is_ok()));
    }

    #[test]
    fn test_read_requests_reports_bad_json() {
        let requests: Vec<_> = read_requests("not json\n".as_bytes()).collect();
        assert!(matches!(requests[0], Err(CliError::Json(_))));
    }

    #[test]
    fn test_write_response_and_error() {
        let mut out = Vec::new();
        write_response(&mut out, json!([1, 2])).unwrap();
        write_error(&mut out, "TIDX_CLI_INVALID_REQUEST", "bad op").unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(lines[0]["status"], "ok");
        assert_eq!(lines[0]["data"], json!([1, 2]));
        assert_eq!(lines[1]["status"], "error");
        assert_eq!(lines[1]["code"], "TIDX_CLI_INVALID_REQUEST");
    }
}
