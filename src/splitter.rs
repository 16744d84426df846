//! Splitting model output into explanatory text and an A2UI JSON payload

/// Separates the conversational text (left) from the JSON payload (right)
pub const DELIMITER: &str = "---a2ui_JSON---";

const FENCE_OPEN_JSON: &str = "```json";
const FENCE: &str = "```";

/// A model response split at the first delimiter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitResult {
    pub explanatory_text: String,
    /// Raw right-hand segment, `None` when the delimiter is absent
    pub json_payload: Option<String>,
}

/// Split `raw` at the first occurrence of [`DELIMITER`].
///
/// Without a delimiter the whole response is text. With one, the text keeps
/// everything to the left and the payload everything to the right, fence
/// markers included; use [`clean_payload`] before parsing.
pub fn split(raw: &str) -> SplitResult {
    match raw.split_once(DELIMITER) {
        Some((text, json)) => SplitResult {
            explanatory_text: text.to_string(),
            json_payload: Some(json.to_string()),
        },
        None => SplitResult {
            explanatory_text: raw.to_string(),
            json_payload: None,
        },
    }
}

/// Trim whitespace and code-fence markers from both ends of a payload.
///
/// Markers are only removed at the two ends, however many are stacked there;
/// fences inside the payload are left alone. The result may be empty.
pub fn clean_payload(json: &str) -> &str {
    let mut s = json.trim();
    loop {
        let before = s.len();
        if let Some(rest) = s.strip_prefix(FENCE_OPEN_JSON) {
            s = rest.trim_start();
        } else if let Some(rest) = s.strip_prefix(FENCE) {
            s = rest.trim_start();
        }
        if let Some(rest) = s.strip_suffix(FENCE) {
            s = rest.trim_end();
        }
        if s.len() == before {
            return s;
        }
    }
}
