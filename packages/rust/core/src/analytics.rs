//! Aggregate statistics derived from a graph snapshot.

use std::collections::BTreeMap;

use serde::Serialize;

use wiseways_shared::{Dimension, Link, Need, Node, QuestionStatus, Room};

/// Links heavier than this count as strong.
const STRONG_LINK: f64 = 0.5;
/// Links heavier than this (and not strong) count as medium.
const MEDIUM_LINK: f64 = 0.3;

/// Link-strength histogram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkStrength {
    /// weight > 0.5
    pub strong: usize,
    /// 0.3 < weight <= 0.5
    pub medium: usize,
    /// weight <= 0.3
    pub weak: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Analytics {
    pub total_questions: usize,
    pub total_links: usize,
    pub link_strength: LinkStrength,
    pub total_rooms: usize,
    /// Rooms with at least one participant.
    pub active_rooms: usize,
    pub need_distribution: BTreeMap<Need, usize>,
    pub dimension_distribution: BTreeMap<Dimension, usize>,
    pub status_distribution: BTreeMap<QuestionStatus, usize>,
    /// Answered questions as a percentage of all questions.
    pub response_rate: f64,
}

pub fn compute(nodes: &[Node], links: &[Link], rooms: &[Room]) -> Analytics {
    let mut need_distribution: BTreeMap<Need, usize> =
        Need::ALL.into_iter().map(|n| (n, 0)).collect();
    let mut dimension_distribution: BTreeMap<Dimension, usize> =
        Dimension::ALL.into_iter().map(|d| (d, 0)).collect();
    let mut status_distribution: BTreeMap<QuestionStatus, usize> = [
        QuestionStatus::Unanswered,
        QuestionStatus::InProgress,
        QuestionStatus::Answered,
    ]
    .into_iter()
    .map(|s| (s, 0))
    .collect();

    for node in nodes {
        *need_distribution.entry(node.need).or_insert(0) += 1;
        *dimension_distribution.entry(node.dimension).or_insert(0) += 1;
        *status_distribution.entry(node.status).or_insert(0) += 1;
    }

    let mut link_strength = LinkStrength::default();
    for link in links {
        if link.weight > STRONG_LINK {
            link_strength.strong += 1;
        } else if link.weight > MEDIUM_LINK {
            link_strength.medium += 1;
        } else {
            link_strength.weak += 1;
        }
    }

    let answered = status_distribution
        .get(&QuestionStatus::Answered)
        .copied()
        .unwrap_or(0);
    let response_rate = if nodes.is_empty() {
        0.0
    } else {
        answered as f64 / nodes.len() as f64 * 100.0
    };

    Analytics {
        total_questions: nodes.len(),
        total_links: links.len(),
        link_strength,
        total_rooms: rooms.len(),
        active_rooms: rooms.iter().filter(|r| !r.participants.is_empty()).count(),
        need_distribution,
        dimension_distribution,
        status_distribution,
        response_rate,
    }
}
