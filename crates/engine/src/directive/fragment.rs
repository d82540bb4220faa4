//! Directive function results.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::breadcrumb::Breadcrumb;

/// Text produced by a directive function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FragmentText {
    /// No text.
    #[default]
    None,
    /// Text for the active slot.
    Single(String),
    /// Text for several named slots.
    Slots(BTreeMap<String, String>),
}

/// A media item attached to a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    /// Where the media lives.
    pub url: String,
    /// Optional caption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Everything a directive function can contribute to a page.
///
/// Unset fields leave the page untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    /// Text to append.
    pub text: FragmentText,
    /// Overrides the page title.
    pub title: Option<String>,
    /// Authors to add.
    pub authors: Vec<String>,
    /// Media to add.
    pub media: Vec<MediaRef>,
    /// Replaces the breadcrumb extensions.
    pub breadcrumbs: Option<Vec<Breadcrumb>>,
    /// Suppresses the page header.
    pub no_header: Option<bool>,
    /// Suppresses the page footer.
    pub no_footer: Option<bool>,
    /// Shows links to other language versions.
    pub language_links: Option<bool>,
    /// Overrides the last-modified timestamp.
    pub last_update: Option<DateTime<Utc>>,
    /// Clears the target slots before appending and claims them.
    pub replace: bool,
}

impl Fragment {
    /// A fragment that contributes nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A fragment with text for the active slot.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: FragmentText::Single(text.into()),
            ..Self::default()
        }
    }

    /// A fragment with text for several slots.
    pub fn slots<I, K, V>(slots: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            text: FragmentText::Slots(
                slots
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    /// Sets the title override.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Adds an author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }

    /// Adds a media item.
    pub fn with_media(mut self, media: MediaRef) -> Self {
        self.media.push(media);
        self
    }

    /// Sets the breadcrumb extensions.
    pub fn with_breadcrumbs(mut self, breadcrumbs: Vec<Breadcrumb>) -> Self {
        self.breadcrumbs = Some(breadcrumbs);
        self
    }

    /// Sets the last-update override.
    pub fn with_last_update(mut self, at: DateTime<Utc>) -> Self {
        self.last_update = Some(at);
        self
    }

    /// Marks the fragment as replacing its target slots.
    pub fn replacing(mut self) -> Self {
        self.replace = true;
        self
    }
}
