//! Formatted state summary.

use tare_core::StateRecord;

use crate::checksum::checksum;

/// Render a multi-line summary of the current state.
///
/// One line per field — `id`, `name`, `tag`, `len`, `bias`, `scale`,
/// `min`, `max`, `mean`, `checksum` — each prefixed with a two-hex-digit
/// zero-padded line index and a separator, joined by newlines. Floats
/// print to 6 decimals. Min, max, and mean are 0.0 for an empty
/// sequence. The checksum is re-derived on every call; checksum purity
/// makes that observably identical to caching it.
pub fn format_summary(state: &StateRecord) -> String {
    let (min, max, mean) = if state.values.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &v in &state.values {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }
        (min, max, sum / state.values.len() as f64)
    };

    let fields: [(&str, String); 10] = [
        ("id", state.id.to_string()),
        ("name", state.name.clone()),
        ("tag", state.tag.to_string()),
        ("len", state.values.len().to_string()),
        ("bias", format!("{:.6}", state.bias)),
        ("scale", format!("{:.6}", state.scale)),
        ("min", format!("{min:.6}")),
        ("max", format!("{max:.6}")),
        ("mean", format!("{mean:.6}")),
        ("checksum", checksum(state).to_string()),
    ];

    let lines: Vec<String> = fields
        .iter()
        .enumerate()
        .map(|(i, (label, value))| format!("{i:02x} | {label}: {value}"))
        .collect();
    lines.join("\n")
}
