//! Commit objects.
//!
//! A commit is encoded as text headers followed by a blank line and the
//! message:
//!
//! ```text
//! tree <40-char hex>
//! parent <40-char hex>        (absent on the root commit)
//! author <identity> <unix timestamp>
//!
//! <message>
//! ```

use crate::error::{Error, Result};
use crate::objects::oid::ObjectId;

/// A commit: a tree snapshot plus history metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    tree: ObjectId,
    parent: Option<ObjectId>,
    author: String,
    timestamp: u64,
    message: String,
}

impl Commit {
    /// Creates a new commit.
    pub fn new(
        tree: ObjectId,
        parent: Option<ObjectId>,
        author: impl Into<String>,
        timestamp: u64,
        message: impl Into<String>,
    ) -> Self {
        Commit {
            tree,
            parent,
            author: author.into(),
            timestamp,
            message: message.into(),
        }
    }

    /// The root tree of this commit's snapshot.
    pub fn tree(&self) -> ObjectId {
        self.tree
    }

    /// The parent commit, or `None` for the root commit.
    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    /// The author identity string.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// The commit time as a unix timestamp.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// The commit message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The first line of the message, for one-line log output.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Encodes the commit to its canonical byte form.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = String::new();
        out.push_str(&format!("tree {}\n", self.tree));
        if let Some(parent) = &self.parent {
            out.push_str(&format!("parent {}\n", parent));
        }
        out.push_str(&format!("author {} {}\n", self.author, self.timestamp));
        out.push('\n');
        out.push_str(&self.message);
        out.into_bytes()
    }

    /// Parses a commit from its encoded byte form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corrupt`] if a required header is missing or
    /// malformed.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(data).map_err(|_| corrupt("commit is not valid UTF-8"))?;

        let (headers, message) = text
            .split_once("\n\n")
            .ok_or_else(|| corrupt("commit missing blank line before message"))?;

        let mut tree = None;
        let mut parent = None;
        let mut author = None;
        let mut timestamp = None;

        for line in headers.lines() {
            let (key, value) = line
                .split_once(' ')
                .ok_or_else(|| corrupt("malformed commit header line"))?;
            match key {
                "tree" => tree = Some(ObjectId::from_hex(value)?),
                "parent" => parent = Some(ObjectId::from_hex(value)?),
                "author" => {
                    let (identity, ts) = value
                        .rsplit_once(' ')
                        .ok_or_else(|| corrupt("author header missing timestamp"))?;
                    author = Some(identity.to_string());
                    timestamp = Some(
                        ts.parse::<u64>()
                            .map_err(|_| corrupt("author timestamp is not a number"))?,
                    );
                }
                other => return Err(corrupt(&format!("unknown commit header: {}", other))),
            }
        }

        Ok(Commit {
            tree: tree.ok_or_else(|| corrupt("commit missing tree header"))?,
            parent,
            author: author.ok_or_else(|| corrupt("commit missing author header"))?,
            timestamp: timestamp.ok_or_else(|| corrupt("commit missing author header"))?,
            message: message.to_string(),
        })
    }
}

fn corrupt(reason: &str) -> Error {
    Error::Corrupt {
        id: String::new(),
        reason: reason.to_string(),
    }
}
