//! JSON output for CLI commands
//!
//! One JSON object per line on stdout.

use std::io::Write;

use serde_json::Value;

use super::errors::CliResult;

/// Write a success response wrapped in the `{"status": "ok", "data": ...}` envelope
pub fn write_response_to<W: Write>(out: &mut W, data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}
