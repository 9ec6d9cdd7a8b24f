//! Star records: the payload of a registration block.
//!
//! The story is persisted hex-encoded. Magnitude and constellation are
//! optional and are left out of the serialized form entirely when unset.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A star description as stored inside a block body.
///
/// Field order is part of the block digest; do not reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarRecord {
    /// Right ascension.
    #[serde(rename = "ra")]
    pub right_ascension: String,

    /// Declination.
    #[serde(rename = "dec")]
    pub declination: String,

    /// Apparent magnitude.
    #[serde(rename = "mag", default, skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<String>,

    /// Constellation name.
    #[serde(rename = "con", default, skip_serializing_if = "Option::is_none")]
    pub constellation: Option<String>,

    /// Hex encoding of the UTF-8 story text.
    pub story: String,
}

impl StarRecord {
    /// Create a record from plaintext, hex-encoding the story.
    pub fn new(
        right_ascension: impl Into<String>,
        declination: impl Into<String>,
        story: &str,
    ) -> Self {
        Self {
            right_ascension: right_ascension.into(),
            declination: declination.into(),
            magnitude: None,
            constellation: None,
            story: hex::encode(story.as_bytes()),
        }
    }

    /// Set the magnitude.
    pub fn with_magnitude(mut self, magnitude: impl Into<String>) -> Self {
        self.magnitude = Some(magnitude.into());
        self
    }

    /// Set the constellation.
    pub fn with_constellation(mut self, constellation: impl Into<String>) -> Self {
        self.constellation = Some(constellation.into());
        self
    }

    /// Decode the stored story back to text.
    pub fn decoded_story(&self) -> Result<String, CoreError> {
        let bytes = hex::decode(&self.story)
            .map_err(|e| CoreError::DecodingError(format!("story is not hex: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| CoreError::DecodingError(format!("story is not UTF-8: {}", e)))
    }
}

/// Outbound star: the stored record plus the decoded story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarView {
    #[serde(flatten)]
    pub record: StarRecord,

    #[serde(rename = "storyDecoded")]
    pub story_decoded: String,
}

impl TryFrom<StarRecord> for StarView {
    type Error = CoreError;

    fn try_from(record: StarRecord) -> Result<Self, Self::Error> {
        let story_decoded = record.decoded_story()?;
        Ok(Self {
            record,
            story_decoded,
        })
    }
}
