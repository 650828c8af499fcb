//! Typed form submissions and their validators.
//!
//! Every field is deserialized with a default so a missing field turns into a
//! field error on re-render instead of an extractor rejection.

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

use crate::entity::song;

pub const NAME_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 255;
pub const TITLE_MAX: usize = 100;
pub const ARTIST_MAX: usize = 100;

const REQUIRED: &str = "This field is required.";
const NOT_AN_INTEGER: &str = "Not a valid integer value.";
const NOT_A_CHOICE: &str = "Not a valid choice.";

/// Field name to messages, in the order they were raised.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

/// Checks `value` is present and at most `max` characters, returning it trimmed.
fn bounded(errors: &mut FieldErrors, field: &'static str, value: &str, max: usize) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
    } else if value.chars().count() > max {
        errors.add(
            field,
            format!("Field must be between 1 and {max} characters long."),
        );
    }
    value.to_string()
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct PlaylistForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlaylist {
    pub name: String,
    pub description: String,
}

impl PlaylistForm {
    pub fn validate(&self) -> Result<NewPlaylist, FieldErrors> {
        let mut errors = FieldErrors::default();
        let name = bounded(&mut errors, "name", &self.name, NAME_MAX);
        let description = bounded(&mut errors, "description", &self.description, DESCRIPTION_MAX);
        errors.into_result(|| NewPlaylist { name, description })
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct SongForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
}

impl SongForm {
    pub fn validate(&self) -> Result<NewSong, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = bounded(&mut errors, "title", &self.title, TITLE_MAX);
        let artist = bounded(&mut errors, "artist", &self.artist, ARTIST_MAX);
        errors.into_result(|| NewSong { title, artist })
    }
}

/// Selection of a song to add to a playlist.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AddSongForm {
    #[serde(default)]
    pub song: String,
}

impl AddSongForm {
    /// Resolves the selected song id against `choices`, the songs not yet on the playlist.
    pub fn validate(&self, choices: &[song::Model]) -> Result<i32, FieldErrors> {
        let mut errors = FieldErrors::default();
        let raw = self.song.trim();
        if raw.is_empty() {
            errors.add("song", REQUIRED);
            return Err(errors);
        }
        let Ok(id) = raw.parse::<i32>() else {
            errors.add("song", NOT_AN_INTEGER);
            return Err(errors);
        };
        let allowed: HashSet<i32> = choices.iter().map(|s| s.id).collect();
        if !allowed.contains(&id) {
            errors.add("song", NOT_A_CHOICE);
        }
        errors.into_result(|| id)
    }
}
