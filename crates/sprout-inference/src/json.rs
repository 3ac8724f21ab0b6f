//! Cleanup and parsing of JSON replies from chat models.

use serde::de::DeserializeOwned;
use sprout_core::{Error, Result};

/// Strip a surrounding Markdown code fence (```` ```json ```` or ```` ``` ````).
pub fn clean_json_response(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    else {
        return trimmed;
    };
    let rest = rest.trim_start();
    rest.strip_suffix("```").unwrap_or(rest).trim_end()
}

/// Clean then deserialize a model reply.
pub fn parse_json_response<T: DeserializeOwned>(content: &str) -> Result<T> {
    let cleaned = clean_json_response(content);
    if cleaned.is_empty() {
        return Err(Error::Inference("Empty response from model".to_string()));
    }
    serde_json::from_str(cleaned).map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_strips_json_fence() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(clean_json_response(raw), "{\"a\": 1}");
    }

    #[test]
    fn test_strips_bare_fence() {
        let raw = "  ```\n[1, 2]\n```  ";
        assert_eq!(clean_json_response(raw), "[1, 2]");
    }

    #[test]
    fn test_leaves_plain_json() {
        assert_eq!(clean_json_response(" {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn test_unterminated_fence() {
        assert_eq!(clean_json_response("```json\n{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_parse_reports_serialization_error() {
        let err = parse_json_response::<Value>("```json\nnot json\n```").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_parse_empty_is_inference_error() {
        let err = parse_json_response::<Value>("``````").unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }
}
