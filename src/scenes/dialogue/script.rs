//! Dialogue script records, the payload they are parsed from, and text tokens.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use serde::Deserialize;

use crate::error::TableauError;
use crate::net::Fetch;

/// One line of dialogue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogueEntry {
    pub speaker: String,
    pub text: String,
}

/// Which side of the bubble a speaker's avatar stands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Avatar {
    pub url: String,
    pub side: Side,
}

#[derive(thiserror::Error, Debug)]
pub enum DialogueError {
    #[error("dialogue request failed with HTTP status {0}")]
    Status(u16),

    #[error("dialogue request failed: {0}")]
    Transport(String),

    #[error("malformed dialogue payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct Payload {
    #[serde(default)]
    dialogue: Option<Vec<RawEntry>>,
    #[serde(default)]
    avatars: Option<Vec<RawAvatar>>,
}

#[derive(Deserialize)]
struct RawEntry {
    name: String,
    text: String,
}

#[derive(Deserialize)]
struct RawAvatar {
    name: String,
    url: String,
    #[serde(default)]
    position: String,
}

/// A loaded conversation and the avatars of its speakers.
#[derive(Clone, Debug, Default)]
pub struct Script {
    entries: Vec<DialogueEntry>,
    avatars: HashMap<String, Avatar>,
}

impl Script {
    /// Parse the `{ dialogue: [...], avatars: [...] }` payload.
    ///
    /// A missing or null list is treated as empty. When a speaker appears twice in
    /// `avatars` the later record wins.
    pub fn from_json(bytes: &[u8]) -> Result<Self, DialogueError> {
        let payload: Payload = serde_json::from_slice(bytes)?;
        let entries = payload
            .dialogue
            .unwrap_or_default()
            .into_iter()
            .map(|raw| DialogueEntry {
                speaker: raw.name,
                text: raw.text,
            })
            .collect();
        let avatars = payload
            .avatars
            .unwrap_or_default()
            .into_iter()
            .map(|raw| {
                let side = if raw.position == "left" {
                    Side::Left
                } else {
                    Side::Right
                };
                (raw.name, Avatar { url: raw.url, side })
            })
            .collect();
        Ok(Self { entries, avatars })
    }

    pub fn entries(&self) -> &[DialogueEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&DialogueEntry> {
        self.entries.get(index)
    }

    pub fn avatar(&self, speaker: &str) -> Option<&Avatar> {
        self.avatars.get(speaker)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A cursor over this script, or `None` when there is nothing to play.
    pub fn cursor(&self) -> Option<ScriptCursor> {
        ScriptCursor::new(self.len())
    }
}

/// Fetch and parse a script. Blocking; run it on a worker.
pub fn load_script(fetch: &dyn Fetch, url: &str) -> Result<Script, DialogueError> {
    let bytes = fetch.get(url).map_err(|err| match err {
        TableauError::Status(code) => DialogueError::Status(code),
        other => DialogueError::Transport(other.to_string()),
    })?;
    Script::from_json(&bytes)
}

/// Position in a non-empty script. Advancing wraps around forever.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScriptCursor {
    index: usize,
    len: NonZeroUsize,
}

impl ScriptCursor {
    pub fn new(len: usize) -> Option<Self> {
        NonZeroUsize::new(len).map(|len| Self { index: 0, len })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Step to the next entry, wrapping at the end. Returns the new index.
    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % self.len.get();
        self.index
    }
}

/// Replace each `{name}` token with its symbol from `table`.
///
/// Unknown names stay as literal text. A token never spans a line break.
pub fn substitute_tokens(text: &str, table: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find(['}', '\n']) {
            Some(close) if after[close..].starts_with('}') => {
                let name = &after[..close];
                match table.iter().find(|(key, _)| *key == name) {
                    Some((_, symbol)) => out.push_str(symbol),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
