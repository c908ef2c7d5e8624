// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-local reminder list of posts the user intends to publish later.
//!
//! Nothing here triggers publishing. Entries never expire on their own and
//! are removed only when the user deletes them.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::PostcraftError;

/// Content category of a scheduled entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScheduledContentType {
    Text,
    Image,
    Video,
    Audio,
}

/// One reminder entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPost {
    pub id: String,
    /// Id of the generated message this entry was created from.
    pub message_ref: String,
    pub scheduled_for: DateTime<Utc>,
    pub content_type: ScheduledContentType,
    pub preview: String,
    /// The original message payload, kept as-is.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl ScheduledPost {
    pub fn new(
        message_ref: impl Into<String>,
        scheduled_for: DateTime<Utc>,
        content_type: ScheduledContentType,
        preview: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            message_ref: message_ref.into(),
            scheduled_for,
            content_type,
            preview: preview.into(),
            payload,
        }
    }
}

/// Ordered collection of scheduled entries, persisted as a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleBook {
    #[serde(default)]
    posts: Vec<ScheduledPost>,
}

impl ScheduleBook {
    /// Loads the book from `path`. A missing file yields an empty book.
    pub fn load(path: &Path) -> Result<Self, PostcraftError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| PostcraftError::Storage {
            source: Box::new(e),
        })?;
        serde_json::from_str(&raw).map_err(|e| PostcraftError::Storage {
            source: Box::new(e),
        })
    }

    /// Writes the book to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), PostcraftError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| PostcraftError::Storage {
                    source: Box::new(e),
                })?;
            }
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| PostcraftError::Storage {
            source: Box::new(e),
        })?;
        std::fs::write(path, json).map_err(|e| PostcraftError::Storage {
            source: Box::new(e),
        })
    }

    pub fn add(&mut self, post: ScheduledPost) {
        self.posts.push(post);
    }

    /// Removes the entry with `id`. Returns whether one was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.posts.len();
        self.posts.retain(|p| p.id != id);
        self.posts.len() != before
    }

    /// Removes every entry, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.posts.len();
        self.posts.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// All entries ordered by target time. Past entries are included.
    pub fn upcoming(&self) -> Vec<&ScheduledPost> {
        let mut sorted: Vec<&ScheduledPost> = self.posts.iter().collect();
        sorted.sort_by_key(|p| p.scheduled_for);
        sorted
    }
}
