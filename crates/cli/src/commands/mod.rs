pub mod config_cmd;
pub mod convert;
pub mod status;

use serde::Serialize;
use std::io::Read;
use std::path::Path;

/// Read the whole input from `file`, or from stdin when no file is given.
pub fn read_input(file: Option<&Path>) -> std::io::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Serialize `value` as JSON text.
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
