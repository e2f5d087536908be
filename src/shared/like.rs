//! Blog like payloads
//!
//! Field names follow the JSON contract the frontend already consumes
//! (`blogid`, `likecount`, `isUserliked`).

use serde::{Deserialize, Serialize};

/// Body of `POST /api/blog-like/do-like`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoLikeRequest {
    pub blogid: String,
}

/// Result of toggling a like
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DoLikeResponse {
    pub likecount: u64,
}

/// Like count for a blog, optionally personalized for one user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LikeCountResponse {
    pub likecount: u64,
    #[serde(rename = "isUserliked")]
    pub is_user_liked: bool,
}
