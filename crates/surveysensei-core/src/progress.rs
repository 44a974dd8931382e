//! Ordered, user-visible progress log for multi-step workflows.
//!
//! Entries are only ever appended or patched in place; iteration order is
//! insertion order. The renderer helpers at the bottom of this module infer a
//! provisional indicator from entry text, but program logic must only look at
//! [`Severity`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chain::Network;

/// Severity classification of a status entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Opaque handle to an entry, unique within one log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(u64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub id: EntryId,
    pub text: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

/// Fields to replace on an existing entry. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    pub text: Option<String>,
    pub severity: Option<Severity>,
}

impl EntryPatch {
    /// Mark a step as concluded successfully, with new wording.
    pub fn resolved(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            severity: Some(Severity::Success),
        }
    }
}

type Observer = Box<dyn Fn(&StatusEntry) + Send + Sync>;

/// Append/update-only log of status entries.
#[derive(Default)]
pub struct ProgressLog {
    entries: Vec<StatusEntry>,
    next_id: u64,
    observer: Option<Observer>,
}

impl fmt::Debug for ProgressLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressLog")
            .field("entries", &self.entries)
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked with every appended or patched entry.
    pub fn set_observer(&mut self, observer: impl Fn(&StatusEntry) + Send + Sync + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Append a new entry at the end and return its id.
    pub fn append(&mut self, text: impl Into<String>, severity: Severity) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        let entry = StatusEntry {
            id,
            text: text.into(),
            severity,
            created_at: Utc::now(),
        };
        debug!(
            id = id.0,
            severity = severity.as_str(),
            text = %entry.text,
            "progress entry appended"
        );
        if let Some(observer) = &self.observer {
            observer(&entry);
        }
        self.entries.push(entry);
        id
    }

    pub fn info(&mut self, text: impl Into<String>) -> EntryId {
        self.append(text, Severity::Info)
    }

    pub fn success(&mut self, text: impl Into<String>) -> EntryId {
        self.append(text, Severity::Success)
    }

    pub fn error(&mut self, text: impl Into<String>) -> EntryId {
        self.append(text, Severity::Error)
    }

    /// Patch the entry with `id` in place. Unknown ids are ignored.
    ///
    /// Returns whether an entry was found.
    pub fn update(&mut self, id: EntryId, patch: EntryPatch) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            debug!(id = id.0, "progress update for unknown entry ignored");
            return false;
        };
        if let Some(text) = patch.text {
            entry.text = text;
        }
        if let Some(severity) = patch.severity {
            entry.severity = severity;
        }
        debug!(
            id = id.0,
            severity = entry.severity.as_str(),
            text = %entry.text,
            "progress entry updated"
        );
        if let Some(observer) = &self.observer {
            observer(entry);
        }
        true
    }

    /// Drop every entry. Only called when an unrelated new run starts.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[StatusEntry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&StatusEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent error entry, if any.
    pub fn last_error(&self) -> Option<&StatusEntry> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.severity == Severity::Error)
    }
}

// ── Rendering ──

const WORK_VERBS: &[&str] = &["Generating", "Preparing", "Waiting"];

const RESULT_NOUNS: &[&str] = &[
    "Transaction hash",
    "Survey ID",
    "Total Reward",
    "Target Responses",
];

/// Icon shown next to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    InProgress,
    Completed,
    Failed,
    Neutral,
}

/// Presentation-only classification of an entry.
pub fn indicator(entry: &StatusEntry) -> Indicator {
    match entry.severity {
        Severity::Success => Indicator::Completed,
        Severity::Error => Indicator::Failed,
        Severity::Info => {
            if starts_with_any(&entry.text, WORK_VERBS) {
                Indicator::InProgress
            } else if starts_with_any(&entry.text, RESULT_NOUNS) {
                Indicator::Completed
            } else {
                Indicator::Neutral
            }
        }
    }
}

fn starts_with_any(text: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| {
        text.get(..p.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(p))
    })
}

/// A piece of rendered entry text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Link { label: &'a str, url: String },
}

/// Split entry text so that the first transaction hash becomes an explorer link.
pub fn segments(text: &str, network: Network) -> Vec<Segment<'_>> {
    let Some((start, end)) = find_tx_hash(text) else {
        return vec![Segment::Text(text)];
    };
    let hash = &text[start..end];
    let mut out = Vec::with_capacity(3);
    if start > 0 {
        out.push(Segment::Text(&text[..start]));
    }
    out.push(Segment::Link {
        label: hash,
        url: network.tx_url(hash),
    });
    if end < text.len() {
        out.push(Segment::Text(&text[end..]));
    }
    out
}

/// Byte range of the first `0x`-prefixed hex run that is not glued to a
/// preceding word.
fn find_tx_hash(text: &str) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i + 2 < bytes.len() {
        let boundary = i == 0 || !bytes[i - 1].is_ascii_alphanumeric();
        if boundary && bytes[i] == b'0' && (bytes[i + 1] == b'x' || bytes[i + 1] == b'X') {
            let digits = bytes[i + 2..]
                .iter()
                .take_while(|b| b.is_ascii_hexdigit())
                .count();
            if digits > 0 {
                return Some((i, i + 2 + digits));
            }
        }
        i += 1;
    }
    None
}
