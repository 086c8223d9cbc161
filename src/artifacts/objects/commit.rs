//! Commit object
//!
//! Commits are immutable records of the whole tracked file set. They contain:
//! - A timestamp (fixed time zone; the root commit uses the Unix epoch)
//! - Parent commit ID(s): none for the root, one for ordinary commits, two for merges
//! - The snapshot: tracked file name -> blob id
//! - The log message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! timestamp <unix-seconds> <timezone>
//! parent <parent-sha>
//! file <blob-sha> <name>
//!
//! <commit message>
//! ```
//!
//! The id is the hash of all of the above, so two commits that differ only in
//! their snapshot or parents never collide.

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::snapshot::Snapshot;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::io::{BufRead, Write};

/// Message of the commit created by `init`
pub const ROOT_COMMIT_MESSAGE: &str = "initial commit";

/// All timestamps are recorded and displayed in UTC-08:00
const COMMIT_TIMEZONE_OFFSET_SECS: i32 = -8 * 3600;

const TIMESTAMP_DISPLAY_FORMAT: &str = "%a %b %-d %H:%M:%S %Y %z";

pub fn commit_timezone() -> FixedOffset {
    FixedOffset::east_opt(COMMIT_TIMEZONE_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Timestamp for a new commit: the configured override, or the current time
pub fn commit_timestamp(fixed: Option<DateTime<FixedOffset>>) -> DateTime<FixedOffset> {
    fixed
        .unwrap_or_else(|| Utc::now().fixed_offset())
        .with_timezone(&commit_timezone())
}

/// Slim representation of a commit
///
/// Contains only what the ancestry resolver needs.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    pub parents: Vec<ObjectId>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent commit IDs (empty for the root commit, two for merge commits)
    parents: Vec<ObjectId>,
    /// Tracked files of this commit
    snapshot: Snapshot,
    timestamp: DateTime<FixedOffset>,
    message: String,
}

impl Commit {
    pub fn new(
        parents: Vec<ObjectId>,
        snapshot: Snapshot,
        timestamp: DateTime<FixedOffset>,
        message: String,
    ) -> Self {
        Commit {
            parents,
            snapshot,
            timestamp: timestamp.with_timezone(&commit_timezone()),
            message,
        }
    }

    /// The single parentless commit every repository starts from
    pub fn root() -> Self {
        let epoch = DateTime::from_timestamp(0, 0)
            .unwrap_or_default()
            .fixed_offset();

        Commit::new(
            Vec::new(),
            Snapshot::default(),
            epoch,
            ROOT_COMMIT_MESSAGE.to_string(),
        )
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    /// First parent, the one followed by `log`
    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Timestamp in the form "Thu Jan 1 12:34:56 2024 -0800"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_DISPLAY_FORMAT).to_string()
    }

    pub fn to_slim(&self) -> SlimCommit {
        SlimCommit {
            parents: self.parents.clone(),
        }
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut object_content = vec![];

        object_content.push(format!(
            "timestamp {} {}",
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        ));
        for parent in &self.parents {
            object_content.push(format!("parent {}", parent.as_ref()));
        }
        for (name, blob_oid) in self.snapshot.iter() {
            object_content.push(format!("file {} {}", blob_oid.as_ref(), name));
        }
        object_content.push(String::new());
        object_content.push(self.message.to_string());

        let object_content = object_content.join("\n");

        let mut commit_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), object_content.len());
        commit_bytes.write_all(header.as_bytes())?;
        commit_bytes.write_all(object_content.as_bytes())?;

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn deserialize(header: &str, mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let expected_size = header
            .parse::<usize>()
            .context("Invalid commit object: invalid size")?;
        if expected_size != content.len() {
            anyhow::bail!(
                "Invalid commit object: expected {} bytes, found {}",
                expected_size,
                content.len()
            );
        }

        // headers never contain empty lines, so the first one starts the message
        let (headers, message) = content
            .split_once("\n\n")
            .context("Invalid commit object: missing message separator")?;
        let mut lines = headers.lines();

        let timestamp_line = lines
            .next()
            .context("Invalid commit object: missing timestamp line")?;
        let timestamp = parse_timestamp(
            timestamp_line
                .strip_prefix("timestamp ")
                .context("Invalid commit object: invalid timestamp line")?,
        )?;

        let mut parents = Vec::new();
        let mut snapshot = Snapshot::default();
        for line in lines {
            if let Some(parent_oid) = line.strip_prefix("parent ") {
                parents.push(ObjectId::try_parse(parent_oid.to_string())?);
            } else if let Some(entry) = line.strip_prefix("file ") {
                let (blob_oid, name) = entry
                    .split_once(' ')
                    .context("Invalid commit object: invalid file line")?;
                snapshot.insert(name.to_string(), ObjectId::try_parse(blob_oid.to_string())?);
            } else {
                anyhow::bail!("Invalid commit object: unexpected line {:?}", line);
            }
        }

        Ok(Self::new(parents, snapshot, timestamp, message.to_string()))
    }
}

fn parse_timestamp(value: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    let (seconds, timezone) = value
        .split_once(' ')
        .context("Invalid commit object: invalid timestamp")?;
    let seconds = seconds
        .parse::<i64>()
        .context("Invalid commit object: invalid timestamp seconds")?;
    let datetime = DateTime::from_timestamp(seconds, 0)
        .context("Invalid commit object: timestamp out of range")?;
    let offset = DateTime::parse_from_str(
        &format!("1970-01-01 00:00:00 {timezone}"),
        "%Y-%m-%d %H:%M:%S %z",
    )
    .context("Invalid commit object: invalid timezone")?
        .offset()
        .to_owned();

    Ok(datetime.with_timezone(&offset))
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
