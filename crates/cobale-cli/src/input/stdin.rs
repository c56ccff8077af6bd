use serde_json::Value;
use std::io::Read;

/// Read a piped JSON request from stdin, if there is one.
///
/// Interactive sessions (stdin is a TTY) and empty pipes both yield
/// `None`, which sends the caller back to the individual flags.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut raw = String::new();
    std::io::stdin().read_to_string(&mut raw)?;
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let value: Value =
        serde_json::from_str(raw.trim()).map_err(|e| format!("Failed to parse stdin: {e}"))?;
    Ok(Some(value))
}
