//! Generic utilities used across core modules.

use serde::Serialize;

/// Current time as unix seconds. Falls back to 0 on a pre-epoch clock.
pub fn now_unix() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_else(|e| {
            log::warn!("System time before UNIX epoch: {}", e);
            0
        })
}

/// Serialize a value as pretty JSON with 4-space indentation (the on-disk
/// format for presets and chats).
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_unix_is_past_2024() {
        assert!(now_unix() > 1_700_000_000);
    }

    #[test]
    fn pretty_json_uses_four_space_indent() {
        #[derive(Serialize)]
        struct Doc {
            name: String,
        }
        let doc = Doc {
            name: "x".to_string(),
        };
        let out = String::from_utf8(to_pretty_json(&doc).unwrap()).unwrap();
        assert!(out.contains("\n    \"name\""), "got: {}", out);
    }
}
