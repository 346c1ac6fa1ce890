//! Thinking-room detection over the strong links of the graph.
//!
//! Clustering is greedy and one-hop: nodes are visited in insertion order, and
//! each unvisited node absorbs its unvisited strong neighbours, but those
//! neighbours do not pull in their own. Results therefore depend on node order.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use tracing::{debug, info, instrument};

use wiseways_shared::{
    Link, Node, NodeId, ParticipantPolicy, Room, RoomConfig, RoomId, RoomStatus,
};

use crate::terms::extract_key_terms;

/// A regenerated room inherits an old one when it holds at least this share
/// of the old room's members.
const CONTAINMENT_THRESHOLD: f64 = 0.5;

/// Terms must appear in at least this many members to enter a theme.
const MIN_THEME_MEMBERS: usize = 2;

/// Partition `nodes` into rooms using links heavier than the strong threshold.
#[instrument(skip_all, fields(nodes = nodes.len(), links = links.len()))]
pub fn detect_rooms(nodes: &[Node], links: &[Link], config: &RoomConfig) -> Vec<Room> {
    let by_id: HashMap<NodeId, &Node> = nodes.iter().map(|n| (n.id, n)).collect();

    let mut strong: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    for link in links.iter().filter(|l| l.weight > config.strong_link_threshold) {
        strong.entry(link.source).or_default().push(link.target);
        strong.entry(link.target).or_default().push(link.source);
    }

    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut clusters: Vec<Vec<&Node>> = Vec::new();

    for node in nodes {
        if !visited.insert(node.id) {
            continue;
        }

        let mut cluster = vec![node];
        for other in strong.get(&node.id).into_iter().flatten() {
            let Some(other_node) = by_id.get(other) else {
                continue;
            };
            if visited.insert(*other) {
                cluster.push(*other_node);
            }
        }

        if cluster.len() >= 2 {
            clusters.push(cluster);
        }
    }

    let total = nodes.len() as f64;
    let created_at = Utc::now();
    let rooms: Vec<Room> = clusters
        .iter()
        .enumerate()
        .map(|(idx, members)| Room {
            id: RoomId::new(),
            name: room_name(members[0], idx),
            theme: room_theme(members, config),
            question_ids: members.iter().map(|n| n.id).collect(),
            participants: Vec::new(),
            status: RoomStatus::Open,
            created_at,
            strength: members.len() as f64 / total * 100.0,
        })
        .collect();

    info!(rooms = rooms.len(), "detected thinking rooms");
    rooms
}

fn room_name(lead: &Node, idx: usize) -> String {
    format!("{} Room {}", lead.need, idx + 1)
}

/// Recompute name, theme and strength of rooms after nodes left the graph.
///
/// Rooms must already be pruned of departed members. Ids, creation times and
/// participants are untouched.
pub fn refresh_rooms(rooms: &mut [Room], nodes: &[Node], config: &RoomConfig) {
    let by_id: HashMap<NodeId, &Node> = nodes.iter().map(|n| (n.id, n)).collect();
    let total = nodes.len() as f64;

    for (idx, room) in rooms.iter_mut().enumerate() {
        let members: Vec<&Node> = room
            .question_ids
            .iter()
            .filter_map(|id| by_id.get(id).copied())
            .collect();
        let Some(lead) = members.first() else {
            continue;
        };

        room.name = room_name(lead, idx);
        room.theme = room_theme(&members, config);
        room.strength = members.len() as f64 / total * 100.0;
    }
    debug!(rooms = rooms.len(), "refreshed thinking rooms");
}

/// Common terms shared by members, or a fallback built from member openings.
fn room_theme(members: &[&Node], config: &RoomConfig) -> String {
    // (term, number of members mentioning it), first-seen order
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for member in members {
        for term in extract_key_terms(&member.text).terms() {
            match index.get(term) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(term.to_string(), counts.len());
                    counts.push((term.to_string(), 1));
                }
            }
        }
    }

    counts.retain(|(_, count)| *count >= MIN_THEME_MEMBERS);
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let theme = counts
        .into_iter()
        .take(config.theme_terms)
        .map(|(term, _)| term)
        .collect::<Vec<_>>()
        .join(", ");
    if !theme.is_empty() {
        return theme;
    }

    members
        .iter()
        .map(|n| n.text.split(' ').take(3).collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join(", ")
        .chars()
        .take(config.theme_fallback_chars)
        .collect()
}

/// Apply the participant policy to freshly detected rooms.
///
/// With [`ParticipantPolicy::CarryOver`], a new room whose members include at
/// least half of an old room's members takes over that room's id, creation
/// time and participants. Each old room is inherited at most once.
pub fn reconcile_rooms(
    previous: &[Room],
    mut fresh: Vec<Room>,
    policy: ParticipantPolicy,
) -> Vec<Room> {
    if policy == ParticipantPolicy::Drop || previous.is_empty() {
        return fresh;
    }

    let mut claimed: HashSet<RoomId> = HashSet::new();
    for room in &mut fresh {
        let members: HashSet<&NodeId> = room.question_ids.iter().collect();

        let matched = previous.iter().find(|old| {
            if old.question_ids.is_empty() || claimed.contains(&old.id) {
                return false;
            }
            let shared = old.question_ids.iter().filter(|id| members.contains(id)).count();
            shared as f64 / old.question_ids.len() as f64 >= CONTAINMENT_THRESHOLD
        });

        if let Some(old) = matched {
            debug!(room = %old.id, participants = old.participants.len(), "room carried over");
            claimed.insert(old.id);
            room.id = old.id;
            room.created_at = old.created_at;
            room.participants = old.participants.clone();
        }
    }

    fresh
}
