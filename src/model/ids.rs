// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A stable identifier used across the model, the wire records and the MCP surface.
///
/// Ids are opaque strings. The only enforced rule is that an id is a non-empty path segment
/// (no `/`), because element refs are rendered as `node/<id>` and `edge/<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        validate_id_segment(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }

    /// Trailing decimal suffix after the last `-`, if any (`tool-12` -> `12`).
    pub fn numeric_suffix(&self) -> Option<u64> {
        let (_, suffix) = self.value.rsplit_once('-')?;
        suffix.parse().ok()
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T> Borrow<str> for Id<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl<T> TryFrom<String> for Id<T> {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("id must not be empty")]
    Empty,
    #[error("id must not contain '/'")]
    ContainsSlash,
}

fn validate_id_segment(value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty);
    }
    if value.contains('/') {
        return Err(IdError::ContainsSlash);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeIdTag {}
pub type NodeId = Id<NodeIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeIdTag {}
pub type EdgeId = Id<EdgeIdTag>;

/// Largest persisted suffix `IdAllocator::observe` follows. Higher suffixes are left alone so a
/// hand-written id cannot exhaust the counter.
pub const OBSERVED_SUFFIX_LIMIT: u64 = u64::MAX / 2;

/// Monotonic suffix source for generated ids.
///
/// The counter only moves forward. `observe` bumps it past ids that were loaded from disk so a
/// freshly generated id never reuses a persisted suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    /// Next unused suffix, or `None` once the counter is exhausted.
    pub fn next_suffix(&mut self) -> Option<u64> {
        let next = self.last.checked_add(1)?;
        self.last = next;
        Some(next)
    }

    pub fn observe<T>(&mut self, id: &Id<T>) {
        if let Some(suffix) = id
            .numeric_suffix()
            .filter(|suffix| *suffix <= OBSERVED_SUFFIX_LIMIT)
        {
            self.last = self.last.max(suffix);
        }
    }

    pub fn last(&self) -> u64 {
        self.last
    }

    /// Generates `<prefix>-<n>` ids until `taken` rejects none. Falls back to
    /// `<prefix>-<last>-<k>` when the counter is exhausted.
    pub fn fresh<T>(&mut self, prefix: &str, taken: impl Fn(&Id<T>) -> bool) -> Id<T> {
        while let Some(suffix) = self.next_suffix() {
            if let Ok(id) = Id::new(format!("{prefix}-{suffix}")) {
                if !taken(&id) {
                    return id;
                }
            }
        }

        let mut attempt: u64 = 0;
        loop {
            attempt = attempt.wrapping_add(1);
            if let Ok(id) = Id::new(format!("{prefix}-{}-{attempt}", self.last)) {
                if !taken(&id) {
                    return id;
                }
            }
        }
    }
}
