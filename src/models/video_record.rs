// file: src/models/video_record.rs
// description: indexed video entry returned by keyword lookups
// reference: Used for keyword index search results

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Store-assigned identifier, when the backend has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Keywords this video is indexed under
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Locator of the video, expected to be an absolute URL
    #[serde(rename = "videoURL", alias = "video_url")]
    pub video_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl VideoRecord {
    pub fn new(keywords: Vec<String>, video_url: impl Into<String>) -> Self {
        Self {
            id: None,
            keywords,
            video_url: video_url.into(),
            title: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Exact, case-sensitive membership test.
    pub fn matches(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }
}
