//! Content wire types shared with the remote API.
//!
//! Field names follow the remote API's JSON (including its `magzines`
//! misspelling elsewhere in paths); the Rust-side names are ours.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use newsstand_core::{AccessTier, ContentKind, ContentSeq};

/// Response envelope used by every remote endpoint.
///
/// Fallback responses are serialized in the same shape, so clients cannot
/// distinguish degraded responses structurally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// A success envelope carrying `data`.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// A failure envelope with no payload.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// A magazine, article, or digest record.
///
/// Immutable value snapshot; counters are opaque read-only values maintained
/// by the remote system. Counters and rating default to zero when absent
/// from the upstream payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "mid", default)]
    pub seq: ContentSeq,
    pub name: String,
    #[serde(rename = "image", default)]
    pub cover_url: String,
    #[serde(rename = "file", default)]
    pub file_ref: String,
    #[serde(rename = "magzineType", default)]
    pub tier: AccessTier,
    #[serde(rename = "fileType", default)]
    pub format: String,
    #[serde(rename = "type", default)]
    pub kind: ContentKind,
    #[serde(rename = "isActive", default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub reads: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(rename = "reviews", default)]
    pub review_ids: Vec<String>,
    #[serde(rename = "createdAt", default = "epoch")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "totalPages", default)]
    pub pages: u32,
}

fn default_active() -> bool {
    true
}

fn epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_item() {
        let json = serde_json::json!({
            "_id": "663d1f",
            "mid": 12,
            "name": "Tech Today",
            "image": "https://cdn.example.com/tech-today.jpg",
            "file": "tech-today.pdf",
            "magzineType": "pro",
            "fileType": "pdf",
            "type": "magazine",
            "isActive": true,
            "category": "Technology",
            "downloads": 3,
            "views": 120,
            "likes": 9,
            "reads": 44,
            "description": "Latest in tech.",
            "rating": 4.5,
            "reviews": ["r1", "r2"],
            "createdAt": "2024-03-01T10:00:00Z",
            "totalPages": 42
        });

        let item: ContentItem = serde_json::from_value(json).unwrap();
        assert_eq!(item.id, "663d1f");
        assert_eq!(item.seq, ContentSeq::new(12));
        assert_eq!(item.tier, AccessTier::Pro);
        assert_eq!(item.kind, ContentKind::Magazine);
        assert_eq!(item.review_ids.len(), 2);
        assert_eq!(item.pages, 42);
    }

    #[test]
    fn test_deserialize_defaults_when_absent() {
        let json = serde_json::json!({
            "_id": "abc",
            "name": "Bare Item"
        });

        let item: ContentItem = serde_json::from_value(json).unwrap();
        assert_eq!(item.downloads, 0);
        assert_eq!(item.views, 0);
        assert_eq!(item.likes, 0);
        assert_eq!(item.reads, 0);
        assert!((item.rating - 0.0).abs() < f64::EPSILON);
        assert!(item.active);
        assert!(item.review_ids.is_empty());
        assert_eq!(item.created_at, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let item: ContentItem = serde_json::from_value(serde_json::json!({
            "_id": "abc",
            "name": "Bare Item"
        }))
        .unwrap();

        let value = serde_json::to_value(&item).unwrap();
        assert!(value.get("_id").is_some());
        assert!(value.get("magzineType").is_some());
        assert!(value.get("totalPages").is_some());
        assert!(value.get("tier").is_none());
    }

    #[test]
    fn test_envelope_failure_omits_data() {
        let envelope = ApiEnvelope::<ContentItem>::failure("nope");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value.get("success").unwrap(), false);
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_envelope_deserialize_without_message() {
        let envelope: ApiEnvelope<Vec<ContentItem>> =
            serde_json::from_value(serde_json::json!({ "success": true, "data": [] })).unwrap();
        assert!(envelope.success);
        assert!(envelope.message.is_empty());
        assert_eq!(envelope.data.unwrap().len(), 0);
    }
}
