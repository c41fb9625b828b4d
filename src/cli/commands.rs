//! CLI command implementations
//!
//! Both commands load the config, load the rows file and bulk-build one
//! index. `build` prints a summary; `query` then answers requests read from
//! stdin until EOF.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::index::{Index, IndexConfig, RowId};
use crate::observability::{log_event_with_fields, Event, Logger, Severity};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_requests, write_error, write_response};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Index construction parameters (required)
    pub index: IndexConfig,

    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::Config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        self.severity()?;
        self.index.validate()?;
        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level.parse().map_err(CliError::Config)
    }
}

/// Loads rows from a JSON file.
///
/// An array assigns each row its position as id; an object uses its keys
/// as string ids, in key order.
pub fn load_rows(path: &Path) -> CliResult<Vec<(Value, RowId)>> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    let rows = rows_from_value(value)?;

    let count = rows.len().to_string();
    let path_str = path.display().to_string();
    log_event_with_fields(
        Event::RowsLoaded,
        &[("path", path_str.as_str()), ("rows", count.as_str())],
    );
    Ok(rows)
}

/// Splits a parsed rows document into `(row, id)` pairs
pub fn rows_from_value(value: Value) -> CliResult<Vec<(Value, RowId)>> {
    match value {
        Value::Array(items) => Ok(items
            .into_iter()
            .enumerate()
            .map(|(i, row)| (row, RowId::Int(i as i64)))
            .collect()),
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(id, row)| (row, RowId::Str(id)))
            .collect()),
        _ => Err(CliError::InvalidRows(
            "expected a JSON array of rows or an object of id -> row".to_string(),
        )),
    }
}

/// One query request, tagged by `op`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum QueryRequest {
    /// Exact match on one or more keys
    Keys { keys: KeyList },
    /// Inclusive key range
    Range {
        start: String,
        end: String,
        #[serde(default)]
        offset: usize,
        #[serde(default)]
        limit: Option<usize>,
    },
    /// Key prefix
    Prefix {
        prefix: String,
        #[serde(default)]
        offset: usize,
        #[serde(default)]
        limit: Option<usize>,
    },
    /// Sorted positions `[start, end)`
    Between { start: usize, end: usize },
    /// Sorted position
    At { offset: usize },
}

/// One key or a list of keys
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum KeyList {
    One(String),
    Many(Vec<String>),
}

impl KeyList {
    fn into_vec(self) -> Vec<String> {
        match self {
            KeyList::One(key) => vec![key],
            KeyList::Many(keys) => keys,
        }
    }
}

/// Answers one request against the index
pub fn execute(index: &Index, request: QueryRequest) -> Value {
    match request {
        QueryRequest::Keys { keys } => json!(index.row_ids_for_keys(keys.into_vec())),
        QueryRequest::Range {
            start,
            end,
            offset,
            limit,
        } => json!(index.row_ids_for_key_range(&start, &end, offset, limit)),
        QueryRequest::Prefix {
            prefix,
            offset,
            limit,
        } => json!(index.row_ids_for_prefix(&prefix, offset, limit)),
        QueryRequest::Between { start, end } => json!(index.row_ids_between(start, end)),
        QueryRequest::At { offset } => json!(index.row_ids_at(offset)),
    }
}

/// Answers every request from `reader`, one response line each.
///
/// Malformed requests get an error line; the loop continues. Returns the
/// number of requests answered successfully.
pub fn serve_requests<R: BufRead, W: Write>(
    index: &Index,
    reader: R,
    writer: &mut W,
) -> CliResult<usize> {
    let mut served = 0;
    for request in read_requests(reader) {
        let parsed = request.and_then(|value| {
            serde_json::from_value::<QueryRequest>(value)
                .map_err(|e| CliError::InvalidRequest(e.to_string()))
        });

        match parsed {
            Ok(request) => {
                if Logger::enabled(Event::QueryServed.severity()) {
                    let op = format!("{:?}", request);
                    log_event_with_fields(Event::QueryServed, &[("request", op.as_str())]);
                }
                write_response(writer, execute(index, request))?;
                served += 1;
            }
            // stdin failures end the session
            Err(CliError::Io(e)) => return Err(CliError::Io(e)),
            Err(e) => {
                let message = e.to_string();
                log_event_with_fields(
                    Event::RequestRejected,
                    &[("code", e.code()), ("message", message.as_str())],
                );
                write_error(writer, e.code(), &message)?;
            }
        }
    }
    Ok(served)
}

/// Loads config and rows, applies the log level and builds the index
pub fn open_index(config_path: &Path, rows_path: &Path) -> CliResult<Index> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.severity()?);

    let fields = config.index.field_names.join(",");
    log_event_with_fields(Event::ConfigLoaded, &[("fields", fields.as_str())]);

    let rows = load_rows(rows_path)?;
    let mut index = Index::from_config(&config.index)?;
    index.add_rows(rows);
    Ok(index)
}

/// Summary of a built index
pub fn summary(index: &Index) -> Value {
    json!({
        "entries": index.len(),
        "distinct_keys": index.key_count(),
        "order_type": index.order_type().as_str(),
        "metrics": index.metrics().snapshot(),
        "sorted_keys": index.sorted_keys(),
    })
}

/// Main CLI entry point
///
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Build { config, rows } => build(&config, &rows),
        Command::Query { config, rows } => query(&config, &rows),
    }
}

/// Build an index and print its summary
pub fn build(config_path: &Path, rows_path: &Path) -> CliResult<()> {
    let index = open_index(config_path, rows_path)?;
    write_response(&mut io::stdout(), summary(&index))
}

/// Build an index and answer stdin requests until EOF
pub fn query(config_path: &Path, rows_path: &Path) -> CliResult<()> {
    let index = open_index(config_path, rows_path)?;
    let stdin = io::stdin();
    serve_requests(&index, stdin.lock(), &mut io::stdout())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> Index {
        let rows = rows_from_value(json!([
            {"name": "apple"},
            {"name": "apricot"},
            {"name": "banana"},
            {"other": true}
        ]))
        .unwrap();
        let mut index = Index::from_config(&IndexConfig::new(["name"])).unwrap();
        index.add_rows(rows);
        index
    }

    #[test]
    fn test_rows_from_array_and_object() {
        let rows = rows_from_value(json!([{"a": 1}, {"a": 2}])).unwrap();
        assert_eq!(rows[1].1, RowId::Int(1));

        let rows = rows_from_value(json!({"r1": {"a": 1}})).unwrap();
        assert_eq!(rows[0].1, RowId::from("r1"));

        assert!(matches!(
            rows_from_value(json!(42)),
            Err(CliError::InvalidRows(_))
        ));
    }

    #[test]
    fn test_request_parsing() {
        let req: QueryRequest = serde_json::from_str(r#"{"op":"keys","keys":"x"}"#).unwrap();
        assert_eq!(req, QueryRequest::Keys { keys: KeyList::One("x".into()) });

        let req: QueryRequest =
            serde_json::from_str(r#"{"op":"range","start":"a","end":"b","limit":2}"#).unwrap();
        assert_eq!(
            req,
            QueryRequest::Range {
                start: "a".into(),
                end: "b".into(),
                offset: 0,
                limit: Some(2)
            }
        );
    }

    #[test]
    fn test_execute() {
        let index = sample_index();
        let result = execute(
            &index,
            QueryRequest::Prefix {
                prefix: "ap".into(),
                offset: 0,
                limit: None,
            },
        );
        assert_eq!(result, json!([0, 1]));

        let result = execute(
            &index,
            QueryRequest::Keys {
                keys: KeyList::Many(vec!["banana".into(), "banana".into()]),
            },
        );
        assert_eq!(result, json!([2]));
    }

    #[test]
    fn test_serve_requests_continues_after_bad_request() {
        let index = sample_index();
        let input = "{\"op\":\"at\",\"offset\":2}\n{\"op\":\"explode\"}\n{\"op\":\"between\",\"start\":0,\"end\":2}\n";
        let mut out = Vec::new();

        let served = serve_requests(&index, input.as_bytes(), &mut out).unwrap();
        assert_eq!(served, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["data"], json!([2]));
        assert_eq!(lines[1]["code"], "TIDX_CLI_INVALID_REQUEST");
        assert_eq!(lines[2]["data"], json!([0, 1]));
    }

    #[test]
    fn test_summary() {
        let summary = summary(&sample_index());
        assert_eq!(summary["entries"], 3);
        assert_eq!(summary["metrics"]["rows_skipped"], 1);
        assert_eq!(summary["sorted_keys"], json!(["apple", "apricot", "banana"]));
    }
}
