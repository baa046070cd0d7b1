// Review payload normalization.
//
// Reviews arrive from upstream storage in a few shapes: bare strings, review
// rows with a `review_text` column, or a wrapper object. All of that is
// resolved here into one trimmed `Vec<String>` before the pipeline runs.

use serde_json::Value;

use crate::error::AnalysisError;

/// Object fields checked, in order, for a review's text.
const TEXT_FIELDS: [&str; 3] = ["review_text", "text", "review"];

/// Normalize a JSON payload into a list of review texts.
///
/// Accepts an array of strings, an array of objects carrying one of
/// `review_text`, `text` or `review`, or an object with a `reviews` array of
/// either. Texts are trimmed and blank entries dropped; an object entry
/// whose text field is `null` counts as blank.
pub fn normalize_reviews(payload: &Value) -> Result<Vec<String>, AnalysisError> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("reviews") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(AnalysisError::InvalidInput(format!(
                    "`reviews` must be an array, got {}",
                    kind(other)
                )))
            }
            None => {
                return Err(AnalysisError::InvalidInput(
                    "expected an array of reviews or an object with a `reviews` array".to_string(),
                ))
            }
        },
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(AnalysisError::InvalidInput(format!(
                "expected an array of reviews, got {}",
                kind(other)
            )))
        }
    };

    let mut reviews = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        if let Some(text) = review_text(item, i)? {
            reviews.push(text);
        }
    }
    Ok(reviews)
}

/// Trim and drop blank review strings.
pub fn clean_reviews<S: AsRef<str>>(reviews: &[S]) -> Vec<String> {
    reviews
        .iter()
        .map(|r| r.as_ref().trim())
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

fn review_text(item: &Value, index: usize) -> Result<Option<String>, AnalysisError> {
    let text = match item {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => {
            let field = TEXT_FIELDS
                .iter()
                .find_map(|f| map.get(*f).map(|v| (*f, v)));
            match field {
                Some((_, Value::String(s))) => Some(s.as_str()),
                Some((_, Value::Null)) => None,
                Some((name, other)) => {
                    return Err(AnalysisError::InvalidInput(format!(
                        "review {index}: `{name}` must be a string, got {}",
                        kind(other)
                    )))
                }
                None => {
                    return Err(AnalysisError::InvalidInput(format!(
                        "review {index}: object has none of {}",
                        TEXT_FIELDS.join(", ")
                    )))
                }
            }
        }
        Value::Null => None,
        other => {
            return Err(AnalysisError::InvalidInput(format!(
                "review {index}: expected a string or object, got {}",
                kind(other)
            )))
        }
    };

    Ok(text.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_of_strings() {
        let reviews = normalize_reviews(&json!(["  tasty ", "", "dirty"])).unwrap();
        assert_eq!(reviews, vec!["tasty", "dirty"]);
    }

    #[test]
    fn test_review_rows() {
        let payload = json!([
            {"stall_id": 1, "rating": 5, "review_text": "great laksa"},
            {"text": "slow queue"},
            {"review_text": null}
        ]);
        assert_eq!(
            normalize_reviews(&payload).unwrap(),
            vec!["great laksa", "slow queue"]
        );
    }

    #[test]
    fn test_wrapper_object() {
        let payload = json!({"reviews": ["a", {"review": "b"}]});
        assert_eq!(normalize_reviews(&payload).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_null_is_empty() {
        assert!(normalize_reviews(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_numbers() {
        let err = normalize_reviews(&json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("review 0"));
    }

    #[test]
    fn test_rejects_object_without_text() {
        assert!(normalize_reviews(&json!([{"rating": 3}])).is_err());
        assert!(normalize_reviews(&json!({"items": []})).is_err());
    }

    #[test]
    fn test_clean_reviews() {
        assert_eq!(clean_reviews(&["  a ", "  ", "b"]), vec!["a", "b"]);
    }
}
