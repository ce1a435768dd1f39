//! JSON documents exchanged with the path service.
//!
//! ```text
//! request:  {"start":{"x":2,"y":2},"end":{"x":5,"y":5}}
//! response: {"path":[{"x":2,"y":2},{"x":3,"y":2},...]}
//! ```

use gridpath_core::Point;
use serde::{Deserialize, Serialize};

use crate::error::PathRequestError;

/// Request body: the two selected cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRequest {
    pub start: Point,
    pub end: Point,
}

/// Response body.
///
/// The reference service encodes "no path" as `"path": null`, so a null or
/// missing list is accepted and means empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PathResponse {
    #[serde(default)]
    pub path: Option<Vec<Point>>,
}

impl PathResponse {
    /// The ordered path, empty when the service found none.
    pub fn into_path(self) -> Vec<Point> {
        self.path.unwrap_or_default()
    }
}

/// Decode a response body into an ordered path.
pub fn decode_response(body: &str) -> Result<Vec<Point>, PathRequestError> {
    serde_json::from_str::<PathResponse>(body)
        .map(PathResponse::into_path)
        .map_err(|e| PathRequestError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_to_service_shape() {
        let req = PathRequest {
            start: Point::new(2, 2),
            end: Point::new(5, 5),
        };
        let v = serde_json::to_value(req).unwrap();
        assert_eq!(
            v,
            serde_json::json!({"start": {"x": 2, "y": 2}, "end": {"x": 5, "y": 5}})
        );
    }

    #[test]
    fn decode_keeps_order() {
        let path = decode_response(r#"{"path":[{"x":2,"y":2},{"x":3,"y":3},{"x":4,"y":4}]}"#)
            .unwrap();
        assert_eq!(
            path,
            vec![Point::new(2, 2), Point::new(3, 3), Point::new(4, 4)]
        );
    }

    #[test]
    fn empty_null_and_missing_path_mean_no_path() {
        assert!(decode_response(r#"{"path":[]}"#).unwrap().is_empty());
        assert!(decode_response(r#"{"path":null}"#).unwrap().is_empty());
        assert!(decode_response("{}").unwrap().is_empty());
    }

    #[test]
    fn malformed_bodies_are_decode_errors() {
        for body in ["", "not json", r#"{"path":[{"x":1}]}"#, r#"{"path":"nope"}"#] {
            assert!(
                matches!(decode_response(body), Err(PathRequestError::Decode(_))),
                "body {body:?} should fail to decode"
            );
        }
    }
}
