//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`Action`] - The six export actions
//!
//! # Using Action in Libraries
//!
//! [`Action`] carries no CLI baggage and converts to/from strings:
//!
//! ```rust
//! use vkpack::cli::Action;
//!
//! let action: Action = "archive".parse().unwrap();
//! assert_eq!(action, Action::Archive);
//! ```

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

/// Export a VK conversation as text, JSON, media links, HTML, or a full
/// media archive.
#[derive(Parser, Debug, Clone)]
#[command(name = "vkpack")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    vkpack durov <token> text
    vkpack 12345 <token> json
    vkpack 12345 <token> photo | wget -i -
    vkpack 12345 <token> archive")]
pub struct Args {
    /// Id or screen name of the user whose conversation to export
    pub peer_id: String,

    /// VK API access token
    pub token: String,

    /// What to produce
    #[arg(value_enum)]
    pub action: Action,
}

/// The six export actions.
///
/// - [`Json`](Action::Json) - raw message dump to a dated file
/// - [`Text`](Action::Text) - transcript lines on stdout
/// - [`Audio`](Action::Audio) - playable stream URLs on stdout
/// - [`Photo`](Action::Photo) - best-resolution photo URLs on stdout
/// - [`Html`](Action::Html) - browsable `<peer_id>.html`
/// - [`Archive`](Action::Archive) - HTML plus downloaded media folders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Save raw messages to a JSON file in the current directory
    Json,

    /// Print a text transcript of the conversation
    Text,

    /// Print every playable audio URL (pipeable to wget)
    Audio,

    /// Print every best-resolution photo URL (pipeable to wget)
    Photo,

    /// Write a self-contained local HTML page
    Html,

    /// Download everything into a folder structure
    Archive,
}

impl Action {
    /// Returns all supported action names.
    pub fn all_names() -> &'static [&'static str] {
        &["json", "text", "audio", "photo", "html", "archive"]
    }

    /// Returns `true` when the action needs resolved participant names.
    pub fn needs_participants(&self) -> bool {
        matches!(self, Action::Text | Action::Html | Action::Archive)
    }

    /// Returns `true` when the action needs normalized media link lists.
    pub fn needs_media_links(&self) -> bool {
        matches!(self, Action::Html | Action::Archive)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::Json => "json",
            Action::Text => "text",
            Action::Audio => "audio",
            Action::Photo => "photo",
            Action::Html => "html",
            Action::Archive => "archive",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Action::Json),
            "text" => Ok(Action::Text),
            "audio" => Ok(Action::Audio),
            "photo" => Ok(Action::Photo),
            "html" => Ok(Action::Html),
            "archive" => Ok(Action::Archive),
            _ => Err(format!(
                "Unknown action: '{}'. Expected one of: {}",
                s,
                Action::all_names().join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_display() {
        assert_eq!(Action::Json.to_string(), "json");
        assert_eq!(Action::Archive.to_string(), "archive");
    }

    #[test]
    fn test_action_from_str() {
        assert_eq!("text".parse::<Action>().unwrap(), Action::Text);
        assert_eq!("HTML".parse::<Action>().unwrap(), Action::Html);
        assert!("spreadsheet".parse::<Action>().is_err());
    }

    #[test]
    fn test_action_display_roundtrip() {
        for name in Action::all_names() {
            let action: Action = name.parse().unwrap();
            assert_eq!(&action.to_string(), name);
        }
    }

    #[test]
    fn test_action_needs() {
        assert!(Action::Text.needs_participants());
        assert!(!Action::Photo.needs_participants());
        assert!(Action::Archive.needs_media_links());
        assert!(!Action::Text.needs_media_links());
    }

    #[test]
    fn test_action_serde() {
        let json = serde_json::to_string(&Action::Photo).unwrap();
        assert_eq!(json, "\"photo\"");
        let parsed: Action = serde_json::from_str("\"archive\"").unwrap();
        assert_eq!(parsed, Action::Archive);
    }
}
