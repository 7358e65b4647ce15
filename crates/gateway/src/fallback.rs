//! Static fallback payloads and the degradation policy.
//!
//! When the remote API is unreachable, content endpoints substitute
//! deterministic sample data and auth endpoints may mint a demo session.
//! [`FallbackPolicy`] is the single place that decides which operation
//! classes are allowed to degrade:
//!
//! - content list/detail: degrade unconditionally, browsing never
//!   surfaces a hard error
//! - login/signup: degrade only when demo mode is enabled
//! - password reset: never degrades
//!
//! The asymmetry is part of the external contract.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use newsstand_core::{AccessTier, ContentKind, ContentSeq, Email};

use crate::models::{ApiEnvelope, ContentItem, Session, UserProfile};
use crate::upstream::UpstreamError;

/// Auth operations that may degrade to a demo session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOp {
    Login,
    Signup,
}

impl AuthOp {
    const fn demo_message(self) -> &'static str {
        match self {
            Self::Login => "Login successful (demo mode)",
            Self::Signup => "Signup successful (demo mode)",
        }
    }
}

/// Centralized fallback decision-making.
#[derive(Debug, Clone, Copy)]
pub struct FallbackPolicy {
    demo_mode: bool,
}

impl FallbackPolicy {
    /// Create a policy with the given demo-mode flag.
    #[must_use]
    pub const fn new(demo_mode: bool) -> Self {
        Self { demo_mode }
    }

    /// Whether auth endpoints may fabricate demo sessions.
    #[must_use]
    pub const fn demo_mode(&self) -> bool {
        self.demo_mode
    }

    /// Resolve a content-list fetch to a renderable envelope.
    ///
    /// Any failure, including a success-shaped response without usable
    /// data, is replaced by the sample catalog.
    pub fn resolve_list(
        &self,
        result: Result<ApiEnvelope<Vec<ContentItem>>, UpstreamError>,
    ) -> ApiEnvelope<Vec<ContentItem>> {
        match result {
            Ok(envelope) if envelope.success && envelope.data.is_some() => envelope,
            Ok(envelope) => {
                tracing::warn!(
                    message = %envelope.message,
                    "Content list response unusable, serving sample catalog"
                );
                ApiEnvelope::ok("Magazines fetched successfully", sample_catalog())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Content list fetch failed, serving sample catalog");
                ApiEnvelope::ok("Magazines fetched successfully", sample_catalog())
            }
        }
    }

    /// Resolve a content-detail fetch to a renderable envelope.
    ///
    /// Failures are replaced by a placeholder echoing the requested id.
    pub fn resolve_detail(
        &self,
        id: &str,
        result: Result<ApiEnvelope<ContentItem>, UpstreamError>,
    ) -> ApiEnvelope<ContentItem> {
        match result {
            Ok(envelope) if envelope.success && envelope.data.is_some() => envelope,
            Ok(envelope) => {
                tracing::warn!(
                    id,
                    message = %envelope.message,
                    "Content detail response unusable, serving placeholder"
                );
                ApiEnvelope::ok("Magazine fetched successfully", placeholder_item(id))
            }
            Err(err) => {
                tracing::warn!(id, error = %err, "Content detail fetch failed, serving placeholder");
                ApiEnvelope::ok("Magazine fetched successfully", placeholder_item(id))
            }
        }
    }

    /// Resolve a login/signup attempt.
    ///
    /// Upstream verdicts pass through verbatim, including rejections. Only
    /// transport-level failures may be replaced by a demo session, and only
    /// when demo mode is enabled.
    pub fn resolve_session(
        &self,
        op: AuthOp,
        email: &Email,
        name: Option<&str>,
        result: Result<ApiEnvelope<Session>, UpstreamError>,
    ) -> ApiEnvelope<Session> {
        match result {
            Ok(envelope) => envelope,
            Err(err) if self.demo_mode => {
                tracing::info!(error = %err, ?op, "Auth upstream unavailable, minting demo session");
                ApiEnvelope::ok(op.demo_message(), demo_session(email, name))
            }
            Err(err) => ApiEnvelope::failure(err.to_string()),
        }
    }

    /// Resolve a password-reset attempt.
    ///
    /// Never fabricates success; the demo flag is not consulted. Transport
    /// failures surface as a failure envelope carrying the error message.
    pub fn resolve_reset(
        &self,
        result: Result<ApiEnvelope<serde_json::Value>, UpstreamError>,
    ) -> ApiEnvelope<serde_json::Value> {
        match result {
            Ok(envelope) => envelope,
            Err(err) => ApiEnvelope::failure(err.to_string()),
        }
    }
}

/// The fixed six-item sample catalog served when the content API is down.
///
/// Order and contents are deterministic; the set spans all three content
/// kinds and both access tiers.
#[must_use]
pub fn sample_catalog() -> Vec<ContentItem> {
    vec![
        sample_item(
            1,
            "tech-today",
            "Tech Today",
            ContentKind::Magazine,
            AccessTier::Free,
            "Technology",
            "Monthly roundup of consumer technology, gadgets, and software.",
            4.6,
            48,
        ),
        sample_item(
            2,
            "business-weekly",
            "Business Weekly",
            ContentKind::Magazine,
            AccessTier::Pro,
            "Business",
            "Markets, management, and the week in business.",
            4.2,
            36,
        ),
        sample_item(
            3,
            "health-wellness-guide",
            "Health & Wellness Guide",
            ContentKind::Article,
            AccessTier::Free,
            "Health",
            "Practical guidance on nutrition, fitness, and everyday wellbeing.",
            4.8,
            12,
        ),
        sample_item(
            4,
            "travel-digest",
            "Travel Digest",
            ContentKind::Digest,
            AccessTier::Free,
            "Travel",
            "Hand-picked destinations and itineraries in a short digest.",
            4.0,
            16,
        ),
        sample_item(
            5,
            "science-quarterly",
            "Science Quarterly",
            ContentKind::Article,
            AccessTier::Pro,
            "Science",
            "Long-form explainers on current research.",
            4.4,
            24,
        ),
        sample_item(
            6,
            "food-culture",
            "Food & Culture",
            ContentKind::Digest,
            AccessTier::Pro,
            "Food",
            "Recipes, restaurants, and the stories behind them.",
            4.7,
            20,
        ),
    ]
}

/// A placeholder item echoing the requested id.
#[must_use]
pub fn placeholder_item(id: &str) -> ContentItem {
    ContentItem {
        id: id.to_string(),
        seq: ContentSeq::default(),
        name: "Content unavailable".to_string(),
        cover_url: String::new(),
        file_ref: String::new(),
        tier: AccessTier::Free,
        format: String::new(),
        kind: ContentKind::Magazine,
        active: false,
        category: String::new(),
        downloads: 0,
        views: 0,
        likes: 0,
        reads: 0,
        description: "The requested content could not be found.".to_string(),
        rating: 0.0,
        review_ids: Vec::new(),
        created_at: DateTime::UNIX_EPOCH,
        pages: 0,
    }
}

/// Mint a demo session from submitted credentials.
///
/// The token is time-stamped for uniqueness only; it carries no
/// cryptographic meaning. When no name is supplied, the email's local
/// part is used.
#[must_use]
pub fn demo_session(email: &Email, name: Option<&str>) -> Session {
    let name = name
        .filter(|n| !n.is_empty())
        .map_or_else(|| email.local_part().to_string(), ToString::to_string);

    Session {
        token: format!("demo-{}", Utc::now().timestamp_millis()),
        user: UserProfile {
            id: Uuid::new_v4().to_string(),
            name,
            email: email.as_str().to_string(),
        },
    }
}

fn sample_item(
    seq: u64,
    slug: &str,
    name: &str,
    kind: ContentKind,
    tier: AccessTier,
    category: &str,
    description: &str,
    rating: f64,
    pages: u32,
) -> ContentItem {
    ContentItem {
        id: format!("sample-{seq}"),
        seq: ContentSeq::new(seq),
        name: name.to_string(),
        cover_url: format!("/samples/{slug}.jpg"),
        file_ref: format!("/samples/{slug}.pdf"),
        tier,
        format: "pdf".to_string(),
        kind,
        active: true,
        category: category.to_string(),
        downloads: 0,
        views: 0,
        likes: 0,
        reads: 0,
        description: description.to_string(),
        rating,
        review_ids: Vec::new(),
        created_at: sample_created_at(seq),
        pages,
    }
}

/// Deterministic timestamps starting at 2024-01-01, one day apart.
fn sample_created_at(seq: u64) -> DateTime<Utc> {
    let day = i64::try_from(seq).unwrap_or(0);
    DateTime::from_timestamp(1_704_067_200 + 86_400 * day, 0).unwrap_or(DateTime::UNIX_EPOCH)
}
