//! Transcode a saved HogQL query API response and print it as a table.
//!
//! Usage: `hogql-transcode <response.json>`, or `-` to read from stdin.

use std::io::Read;

use arrow::util::pretty::pretty_format_batches;
use hogql_frame::logging::setup::{init_logging, LoggingConfig};
use hogql_frame::prelude::*;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    init_logging(LoggingConfig::default().with_level(tracing::Level::WARN))?;

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: hogql-transcode <response.json | ->")?;

    let body = if path == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        std::fs::read(&path)?
    };

    let result = QueryResult::from_json(&body).with_context(|| format!("reading {path}"))?;
    if let Some(detail) = result.detail_message() {
        eprintln!("upstream detail: {detail}");
    }

    let frame = transcode(&result)?;
    for column in frame.columns() {
        eprintln!(
            "{}: {} ({} nulls)",
            column.name(),
            column.category(),
            column.values().null_count()
        );
    }

    let batch = frame.to_record_batch()?;
    println!("{}", pretty_format_batches(&[batch])?);
    Ok(())
}
