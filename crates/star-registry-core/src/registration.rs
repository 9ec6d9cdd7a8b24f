//! Registration input supplied by the controller layer.

use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::star::StarRecord;

/// Default upper bound on story size, in bytes of UTF-8.
pub const DEFAULT_MAX_STORY_BYTES: usize = 500;

/// Star fields as submitted, with a plaintext story.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarInput {
    #[serde(default)]
    pub ra: String,
    #[serde(default)]
    pub dec: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub con: Option<String>,
    #[serde(default)]
    pub story: String,
}

/// A request to register a star for an address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarRegistration {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub star: StarInput,
}

impl StarRegistration {
    pub fn new(address: impl Into<String>, star: StarInput) -> Self {
        Self {
            address: address.into(),
            star,
        }
    }

    /// Check required fields and the story size.
    pub fn validate(&self, max_story_bytes: usize) -> Result<(), InputError> {
        if self.address.trim().is_empty() {
            return Err(InputError::MissingField("address"));
        }
        if self.star.ra.trim().is_empty() {
            return Err(InputError::MissingField("star.ra"));
        }
        if self.star.dec.trim().is_empty() {
            return Err(InputError::MissingField("star.dec"));
        }
        if self.star.story.is_empty() {
            return Err(InputError::MissingField("star.story"));
        }
        let len = self.star.story.len();
        if len > max_story_bytes {
            return Err(InputError::StoryTooLong {
                len,
                max: max_story_bytes,
            });
        }
        Ok(())
    }

    /// Convert the star input into the record that is persisted.
    pub fn to_record(&self) -> StarRecord {
        let mut record = StarRecord::new(&*self.star.ra, &*self.star.dec, &self.star.story);
        record.magnitude = self.star.mag.clone();
        record.constellation = self.star.con.clone();
        record
    }
}

impl StarInput {
    pub fn new(ra: impl Into<String>, dec: impl Into<String>, story: impl Into<String>) -> Self {
        Self {
            ra: ra.into(),
            dec: dec.into(),
            mag: None,
            con: None,
            story: story.into(),
        }
    }

    pub fn with_magnitude(mut self, mag: impl Into<String>) -> Self {
        self.mag = Some(mag.into());
        self
    }

    pub fn with_constellation(mut self, con: impl Into<String>) -> Self {
        self.con = Some(con.into());
        self
    }
}
