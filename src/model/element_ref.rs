// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ids::{EdgeId, IdError, NodeId};

/// Stable reference to one element of a workflow graph.
///
/// Canonical format: `node/<node_id>` or `edge/<edge_id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementRef {
    Node(NodeId),
    Edge(EdgeId),
}

impl ElementRef {
    pub fn parse(input: &str) -> Result<Self, ParseElementRefError> {
        let (category, id) = input
            .split_once('/')
            .ok_or(ParseElementRefError::MissingCategory)?;
        if id.is_empty() {
            return Err(ParseElementRefError::MissingId);
        }

        match category {
            "node" => NodeId::new(id)
                .map(Self::Node)
                .map_err(ParseElementRefError::InvalidId),
            "edge" => EdgeId::new(id)
                .map(Self::Edge)
                .map_err(ParseElementRefError::InvalidId),
            other => Err(ParseElementRefError::UnknownCategory(other.to_owned())),
        }
    }

    pub fn id_str(&self) -> &str {
        match self {
            Self::Node(id) => id.as_str(),
            Self::Edge(id) => id.as_str(),
        }
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) => write!(f, "node/{id}"),
            Self::Edge(id) => write!(f, "edge/{id}"),
        }
    }
}

impl FromStr for ElementRef {
    type Err = ParseElementRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ElementRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ElementRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseElementRefError {
    #[error("element ref is missing a category (expected node/<id> or edge/<id>)")]
    MissingCategory,
    #[error("element ref is missing an id")]
    MissingId,
    #[error("unknown element category {0:?}")]
    UnknownCategory(String),
    #[error("invalid element id: {0}")]
    InvalidId(#[source] IdError),
}

#[cfg(test)]
mod tests {
    use super::{ElementRef, ParseElementRefError};

    #[test]
    fn parses_and_formats_both_categories() {
        for s in ["node/agent-3", "edge/edge-12"] {
            let parsed: ElementRef = s.parse().expect("parse");
            assert_eq!(parsed.to_string(), s);
        }
    }

    #[test]
    fn rejects_malformed_refs() {
        assert_eq!(
            "agent-3".parse::<ElementRef>(),
            Err(ParseElementRefError::MissingCategory)
        );
        assert_eq!(
            "node/".parse::<ElementRef>(),
            Err(ParseElementRefError::MissingId)
        );
        assert_eq!(
            "group/g-1".parse::<ElementRef>(),
            Err(ParseElementRefError::UnknownCategory("group".to_owned()))
        );
        assert!(matches!(
            "node/a/b".parse::<ElementRef>(),
            Err(ParseElementRefError::InvalidId(_))
        ));
    }
}
