// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The node catalog and the picker that filters it.

use crate::canvas::DragPayload;
use crate::model::NodeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub kind: NodeKind,
    pub label: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    /// `#rrggbb` accent color.
    pub swatch: &'static str,
}

impl CatalogEntry {
    pub fn drag_payload(&self) -> DragPayload {
        DragPayload {
            kind: self.kind,
            label: self.label.to_owned(),
        }
    }
}

pub const CATALOG: [CatalogEntry; 8] = [
    CatalogEntry {
        kind: NodeKind::Application,
        label: "Application",
        icon: "▣",
        description: "Call into a registered application",
        swatch: "#8b5cf6",
    },
    CatalogEntry {
        kind: NodeKind::Tool,
        label: "Tool",
        icon: "⚒",
        description: "Invoke an external tool or API",
        swatch: "#f59e0b",
    },
    CatalogEntry {
        kind: NodeKind::Agent,
        label: "Agent",
        icon: "◉",
        description: "LLM agent that plans and acts",
        swatch: "#ec4899",
    },
    CatalogEntry {
        kind: NodeKind::Task,
        label: "Task",
        icon: "☐",
        description: "A unit of work with instructions",
        swatch: "#06b6d4",
    },
    CatalogEntry {
        kind: NodeKind::Memory,
        label: "Memory",
        icon: "◫",
        description: "Store and recall context",
        swatch: "#6366f1",
    },
    CatalogEntry {
        kind: NodeKind::Reasoning,
        label: "Reasoning",
        icon: "◈",
        description: "Step-by-step reasoning strategy",
        swatch: "#f97316",
    },
    CatalogEntry {
        kind: NodeKind::Input,
        label: "Input",
        icon: "▶",
        description: "Entry point that receives data",
        swatch: "#10b981",
    },
    CatalogEntry {
        kind: NodeKind::Output,
        label: "Output",
        icon: "■",
        description: "Final result of the workflow",
        swatch: "#3b82f6",
    },
];

pub fn catalog_entry(kind: NodeKind) -> &'static CatalogEntry {
    match kind {
        NodeKind::Application => &CATALOG[0],
        NodeKind::Tool => &CATALOG[1],
        NodeKind::Agent => &CATALOG[2],
        NodeKind::Task => &CATALOG[3],
        NodeKind::Memory => &CATALOG[4],
        NodeKind::Reasoning => &CATALOG[5],
        NodeKind::Input => &CATALOG[6],
        NodeKind::Output => &CATALOG[7],
    }
}

/// Catalog entries matching `query`, best first. An empty query returns the whole catalog in
/// catalog order.
pub fn filter_catalog(query: &str) -> Vec<&'static CatalogEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return CATALOG.iter().collect();
    }

    let mut scored = CATALOG
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            let label = fuzzy_score(&needle, &entry.label.to_lowercase());
            // Description hits rank below any label hit.
            let description = fuzzy_score(&needle, &entry.description.to_lowercase())
                .map(|score| score - 10_000);
            let score = label.into_iter().chain(description).max()?;
            Some((score, idx, entry))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|(score_a, idx_a, _), (score_b, idx_b, _)| {
        score_b.cmp(score_a).then_with(|| idx_a.cmp(idx_b))
    });
    scored.into_iter().map(|(_, _, entry)| entry).collect()
}

/// Type-to-filter state of an open picker. The anchor lives on the canvas controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePicker {
    query: String,
    highlighted: usize,
}

impl NodePicker {
    pub fn reset(&mut self) {
        self.query.clear();
        self.highlighted = 0;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn push_char(&mut self, ch: char) {
        self.query.push(ch);
        self.highlighted = 0;
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
        self.highlighted = 0;
    }

    pub fn entries(&self) -> Vec<&'static CatalogEntry> {
        filter_catalog(&self.query)
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn highlighted_entry(&self) -> Option<&'static CatalogEntry> {
        self.entries().get(self.highlighted).copied()
    }

    pub fn move_highlight(&mut self, delta: isize) {
        let len = self.entries().len();
        if len == 0 {
            self.highlighted = 0;
            return;
        }
        let next = (self.highlighted as isize + delta).rem_euclid(len as isize);
        self.highlighted = next as usize;
    }
}

#[derive(Debug)]
struct SubsequenceStats {
    first: usize,
    span: usize,
    consecutive: usize,
    start_boundary: bool,
}

fn fuzzy_score(needle: &str, haystack: &str) -> Option<i64> {
    let subseq = subsequence_stats(needle, haystack)?;
    let ratio = rapidfuzz::fuzz::ratio(needle.chars(), haystack.chars());
    let ratio_score = (ratio * 1000.0).round() as i64;

    let mut score = ratio_score;
    score -= subseq.span as i64;
    score -= (subseq.first as i64) / 4;
    score += (subseq.consecutive as i64) * 40;
    if subseq.start_boundary {
        score += 150;
    }
    if haystack.starts_with(needle) {
        score += 3000;
    } else if haystack.contains(needle) {
        score += 2000;
    }

    Some(score)
}

fn subsequence_stats(needle: &str, haystack: &str) -> Option<SubsequenceStats> {
    let mut needle_iter = needle.chars().peekable();
    let mut first: Option<usize> = None;
    let mut last = 0;
    let mut prev_match: Option<usize> = None;
    let mut consecutive = 0;
    let mut start_boundary = false;
    let mut prev_hay: Option<char> = None;

    for (idx, ch) in haystack.chars().enumerate() {
        let Some(&want) = needle_iter.peek() else {
            break;
        };

        if ch == want {
            needle_iter.next();
            if first.is_none() {
                first = Some(idx);
                start_boundary = prev_hay.map_or(true, char::is_whitespace);
            }
            if prev_match.is_some_and(|prev| idx == prev + 1) {
                consecutive += 1;
            }
            prev_match = Some(idx);
            last = idx;
        }

        prev_hay = Some(ch);
    }

    if needle_iter.peek().is_some() {
        return None;
    }

    let first = first?;
    Some(SubsequenceStats {
        first,
        span: last.saturating_sub(first).saturating_add(1),
        consecutive,
        start_boundary,
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{catalog_entry, filter_catalog, NodePicker, CATALOG};
    use crate::model::NodeKind;

    #[test]
    fn catalog_has_one_entry_per_kind_in_lookup_order() {
        assert_eq!(CATALOG.len(), NodeKind::ALL.len());
        for kind in NodeKind::ALL {
            assert_eq!(catalog_entry(kind).kind, kind);
        }
    }

    #[test]
    fn empty_query_lists_everything_in_catalog_order() {
        let kinds = filter_catalog("  ").iter().map(|e| e.kind).collect::<Vec<_>>();
        assert_eq!(kinds, CATALOG.iter().map(|e| e.kind).collect::<Vec<_>>());
    }

    #[rstest]
    #[case("agent", NodeKind::Agent)]
    #[case("agt", NodeKind::Agent)]
    #[case("MEM", NodeKind::Memory)]
    #[case("outp", NodeKind::Output)]
    #[case("reason", NodeKind::Reasoning)]
    fn best_match_comes_first(#[case] query: &str, #[case] expected: NodeKind) {
        let entries = filter_catalog(query);
        assert_eq!(entries.first().map(|e| e.kind), Some(expected));
    }

    #[test]
    fn description_only_matches_are_kept() {
        let kinds = filter_catalog("llm").iter().map(|e| e.kind).collect::<Vec<_>>();
        assert_eq!(kinds, vec![NodeKind::Agent]);
    }

    #[test]
    fn no_match_yields_nothing() {
        assert!(filter_catalog("zzzz").is_empty());
    }

    #[test]
    fn highlight_wraps_and_resets_on_typing() {
        let mut picker = NodePicker::default();
        picker.move_highlight(-1);
        assert_eq!(picker.highlighted_entry().map(|e| e.kind), Some(NodeKind::Output));

        picker.push_char('t');
        assert_eq!(picker.highlighted(), 0);
        picker.pop_char();
        assert_eq!(picker.query(), "");
    }

    #[test]
    fn drag_payload_carries_kind_and_label() {
        let payload = catalog_entry(NodeKind::Memory).drag_payload();
        assert_eq!(payload.kind, NodeKind::Memory);
        assert_eq!(payload.label, "Memory");
    }
}
