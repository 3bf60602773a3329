//! Indented body rendering for verbose traces.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fmt;

use crate::domain::{InspectorError, Result};

const INDENT: &[u8] = b"    ";

/// Prefix telling log readers which part of the exchange a body belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyLabel {
    /// Request arguments.
    Arguments,
    /// Response result.
    Result,
    /// Event data.
    Data,
}

impl BodyLabel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arguments => "Arguments",
            Self::Result => "Result",
            Self::Data => "Data",
        }
    }
}

impl fmt::Display for BodyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serializes `body` as multi-line JSON indented by four spaces.
///
/// Struct fields keep their declaration order. Returns `Ok(None)` when the body
/// serializes to `null`, which counts as no body.
///
/// # Errors
///
/// Returns [`InspectorError::Serialization`] if the body cannot be represented as
/// JSON, for example a map keyed by tuples.
pub fn to_indented_json<B: Serialize + ?Sized>(body: &B) -> Result<Option<String>> {
    let mut buf = Vec::with_capacity(128);
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    body.serialize(&mut ser)?;

    if buf == b"null" {
        return Ok(None);
    }

    String::from_utf8(buf)
        .map(Some)
        .map_err(|e| InspectorError::Serialization(e.to_string()))
}

/// Renders `body` as `"<label>:\n"` followed by its indented JSON.
///
/// # Errors
///
/// Same as [`to_indented_json`].
pub fn render_body<B: Serialize + ?Sized>(label: BodyLabel, body: &B) -> Result<Option<String>> {
    Ok(to_indented_json(body)?.map(|json| format!("{label}:\n{json}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn indents_with_four_spaces() {
        let text = render_body(BodyLabel::Arguments, &json!(["a", "b"])).unwrap().unwrap();
        assert_eq!(text, "Arguments:\n[\n    \"a\",\n    \"b\"\n]");
    }

    #[test]
    fn nests_indentation() {
        let text = to_indented_json(&json!({ "pos": { "line": 1 } })).unwrap().unwrap();
        assert_eq!(text, "{\n    \"pos\": {\n        \"line\": 1\n    }\n}");
    }

    #[test]
    fn struct_fields_keep_declaration_order() {
        #[derive(Serialize)]
        struct Position {
            line: u32,
            character: u32,
        }

        let text = render_body(BodyLabel::Arguments, &Position { line: 3, character: 14 })
            .unwrap()
            .unwrap();
        assert_eq!(text, "Arguments:\n{\n    \"line\": 3,\n    \"character\": 14\n}");
    }

    #[test]
    fn null_is_no_body() {
        assert_eq!(render_body(BodyLabel::Data, &json!(null)).unwrap(), None);
        assert_eq!(render_body(BodyLabel::Data, &None::<u32>).unwrap(), None);
    }

    #[test]
    fn scalars_render_on_one_line() {
        let text = render_body(BodyLabel::Result, &42).unwrap().unwrap();
        assert_eq!(text, "Result:\n42");
    }

    #[test]
    fn unrepresentable_body_is_a_serialization_error() {
        let mut body = HashMap::new();
        body.insert((1, 2), "tuple keys are not JSON");
        let err = render_body(BodyLabel::Arguments, &body).unwrap_err();
        assert!(matches!(err, InspectorError::Serialization(_)));
    }
}
