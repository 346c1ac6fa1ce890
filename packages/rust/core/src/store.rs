//! The question graph aggregate and its rebuild lifecycle.
//!
//! [`GraphStore`] owns nodes, links and rooms. Every mutation of the node set
//! regenerates links and rooms from scratch; regeneration results replace the
//! committed state only when the whole rebuild succeeds.
//!
//! The store is not internally synchronized. Callers that share it across
//! threads must serialize mutations (e.g. behind a `Mutex`).

use chrono::Utc;
use tracing::{debug, info, instrument};

use wiseways_shared::{
    AppConfig, GraphSnapshot, Link, LinkConfig, Node, NodeId, Participant, QuestionStatus,
    Result, Room, RoomConfig, RoomId, WiseWaysError,
};

use crate::analytics::{self, Analytics};
use crate::classify::classify;
use crate::demo::DEMO_QUESTIONS;
use crate::links::generate_links;
use crate::rooms::{detect_rooms, reconcile_rooms, refresh_rooms};
use crate::similarity::structural_embed;

/// Default display name for participants who do not give one.
const ANONYMOUS: &str = "Anonymous";

/// Classify and embed `text` into a fresh, unanswered node.
pub fn build_node(text: &str) -> Node {
    let text = text.trim();
    let classification = classify(text);

    Node {
        id: NodeId::new(),
        text: text.to_string(),
        need: classification.need,
        dimension: classification.dimension,
        pipeline_score: classification.pipeline_score,
        embedding: structural_embed(text),
        status: QuestionStatus::Unanswered,
        created_at: Utc::now(),
        last_answered_at: None,
    }
}

/// In-memory question graph.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    links: Vec<Link>,
    rooms: Vec<Room>,
    link_config: LinkConfig,
    room_config: RoomConfig,
}

impl GraphStore {
    pub fn new(link_config: LinkConfig, room_config: RoomConfig) -> Self {
        Self {
            link_config,
            room_config,
            ..Self::default()
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(LinkConfig::from(config), RoomConfig::from(config))
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == *id)
    }

    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == *id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Owned copy of the full graph for collaborators.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            links: self.links.clone(),
            thinking_rooms: self.rooms.clone(),
        }
    }

    pub fn analytics(&self) -> Analytics {
        analytics::compute(&self.nodes, &self.links, &self.rooms)
    }

    // -----------------------------------------------------------------------
    // Node lifecycle
    // -----------------------------------------------------------------------

    /// Classify and insert a question, then regenerate links and rooms.
    ///
    /// Empty or whitespace-only text is rejected without touching the graph.
    #[instrument(skip_all, fields(nodes = self.nodes.len()))]
    pub fn submit_question(&mut self, text: &str) -> Result<Node> {
        if text.trim().is_empty() {
            return Err(WiseWaysError::invalid_input("question text is empty"));
        }

        let node = build_node(text);
        self.nodes.push(node.clone());

        if let Err(e) = self.regenerate() {
            self.nodes.pop();
            return Err(e);
        }

        info!(
            id = %node.id,
            need = %node.need,
            dimension = %node.dimension,
            text = %node.text.chars().take(50).collect::<String>(),
            "question added"
        );
        Ok(node)
    }

    /// Regenerate links and rooms with caller-supplied tuning parameters.
    ///
    /// The parameters apply to this call only; later submissions use the
    /// store's configured defaults.
    pub fn recompute_links(
        &mut self,
        threshold: f64,
        max_per_node: usize,
    ) -> Result<(&[Link], &[Room])> {
        self.regenerate_with(&LinkConfig::new(threshold, max_per_node))?;
        Ok((&self.links, &self.rooms))
    }

    /// Regenerate links and rooms with the store's configured parameters.
    pub fn regenerate(&mut self) -> Result<()> {
        let link_config = self.link_config;
        self.regenerate_with(&link_config)
    }

    #[instrument(skip_all, fields(nodes = self.nodes.len()))]
    fn regenerate_with(&mut self, link_config: &LinkConfig) -> Result<()> {
        let links = generate_links(&self.nodes, link_config)?;
        let rooms = detect_rooms(&self.nodes, &links, &self.room_config);
        let rooms = reconcile_rooms(&self.rooms, rooms, self.room_config.participant_policy);

        self.links = links;
        self.rooms = rooms;
        Ok(())
    }

    /// Remove a node and every link touching it.
    ///
    /// Rooms are not re-clustered; the node is only dropped from room
    /// membership, and rooms left with fewer than two members disappear.
    /// Surviving rooms get their name, theme and strength recomputed against
    /// the smaller graph.
    #[instrument(skip(self))]
    pub fn remove_node(&mut self, id: &NodeId) -> Result<()> {
        let pos = self
            .nodes
            .iter()
            .position(|n| n.id == *id)
            .ok_or_else(|| WiseWaysError::not_found("question", id))?;

        self.nodes.remove(pos);
        self.links.retain(|l| !l.touches(id));
        for room in &mut self.rooms {
            room.question_ids.retain(|q| q != id);
        }
        self.rooms.retain(|r| r.question_ids.len() >= 2);
        refresh_rooms(&mut self.rooms, &self.nodes, &self.room_config);

        debug!(nodes = self.nodes.len(), links = self.links.len(), "question removed");
        Ok(())
    }

    /// Set a question's status.
    pub fn update_status(&mut self, id: &NodeId, status: QuestionStatus) -> Result<&Node> {
        let node = self.node_mut(id)?;
        node.status = status;
        Ok(node)
    }

    /// Mark a question answered after a response was recorded for it.
    pub fn record_response(&mut self, id: &NodeId) -> Result<&Node> {
        let node = self.node_mut(id)?;
        node.status = QuestionStatus::Answered;
        node.last_answered_at = Some(Utc::now());
        Ok(node)
    }

    fn node_mut(&mut self, id: &NodeId) -> Result<&mut Node> {
        self.nodes
            .iter_mut()
            .find(|n| n.id == *id)
            .ok_or_else(|| WiseWaysError::not_found("question", id))
    }

    // -----------------------------------------------------------------------
    // Rooms
    // -----------------------------------------------------------------------

    /// Add a participant to a room. Joining twice is a no-op.
    pub fn join_room(
        &mut self,
        room_id: &RoomId,
        user_id: &str,
        user_name: Option<&str>,
    ) -> Result<&Room> {
        if user_id.trim().is_empty() {
            return Err(WiseWaysError::invalid_input("user id is empty"));
        }
        let room = self.room_mut(room_id)?;

        if !room.participants.iter().any(|p| p.user_id == user_id) {
            room.participants.push(Participant {
                user_id: user_id.to_string(),
                user_name: user_name.unwrap_or(ANONYMOUS).to_string(),
                joined_at: Utc::now(),
            });
        }
        Ok(room)
    }

    /// Remove a participant from a room.
    pub fn leave_room(&mut self, room_id: &RoomId, user_id: &str) -> Result<&Room> {
        let room = self.room_mut(room_id)?;
        room.participants.retain(|p| p.user_id != user_id);
        Ok(room)
    }

    fn room_mut(&mut self, id: &RoomId) -> Result<&mut Room> {
        self.rooms
            .iter_mut()
            .find(|r| r.id == *id)
            .ok_or_else(|| WiseWaysError::not_found("room", id))
    }

    // -----------------------------------------------------------------------
    // Bulk operations
    // -----------------------------------------------------------------------

    /// Replace the whole graph with the demo question set.
    #[instrument(skip_all)]
    pub fn seed_demo(&mut self) -> Result<()> {
        let nodes: Vec<Node> = DEMO_QUESTIONS.iter().map(|t| build_node(t)).collect();
        let links = generate_links(&nodes, &self.link_config)?;
        let rooms = detect_rooms(&nodes, &links, &self.room_config);

        self.nodes = nodes;
        self.links = links;
        self.rooms = rooms;

        info!(
            nodes = self.nodes.len(),
            links = self.links.len(),
            rooms = self.rooms.len(),
            "demo seeded"
        );
        Ok(())
    }

    /// Drop every node, link and room.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.links.clear();
        self.rooms.clear();
        info!("graph reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use wiseways_shared::{Dimension, Need, ParticipantPolicy, RelationType};

    #[test]
    fn build_node_trims_and_classifies() {
        let node = build_node("  How can we improve team collaboration?  ");
        assert_eq!(node.text, "How can we improve team collaboration?");
        assert_eq!(node.need, Need::Participation);
        assert_eq!(node.embedding.len(), wiseways_shared::EMBEDDING_DIM);
        assert_eq!(node.status, QuestionStatus::Unanswered);
    }

    #[test]
    fn empty_submission_is_rejected_without_mutation() {
        let mut store = GraphStore::default();
        store.submit_question("team strategy").unwrap();

        let err = store.submit_question("   \n\t").unwrap_err();
        assert!(matches!(err, WiseWaysError::InvalidInput { .. }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn collaboration_and_training_questions_link() {
        let mut store = GraphStore::default();
        let a = store
            .submit_question("How can we improve team collaboration?")
            .unwrap();
        let b = store
            .submit_question("What training programs build skills?")
            .unwrap();

        assert_eq!(a.need, Need::Participation);
        assert_eq!(b.need, Need::Understanding);

        let (links, _) = store.recompute_links(0.2, 8).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].relation_type, None);
        assert_eq!(links[0].source, a.id);
    }

    #[test]
    fn problem_and_solution_questions_link() {
        let mut store = GraphStore::default();
        store
            .submit_question("What problem are we facing with retention?")
            .unwrap();
        store
            .submit_question("How do we solve the retention issue?")
            .unwrap();

        let link = &store.links()[0];
        assert_eq!(link.relation_type, Some(RelationType::ProblemSolution));
        assert!(link.weight >= 0.3);
        assert!(link.semantic_score > 0.0);
    }

    #[test]
    fn short_unrelated_texts_stay_unlinked() {
        let words = [
            "ok", "go", "yes", "no", "hi", "hey", "yo", "up", "oh", "ah", "um", "eh", "wow",
            "yep", "nah", "meh", "huh", "bye", "sup", "yay",
        ];
        let mut store = GraphStore::default();
        for word in words {
            let node = store.submit_question(word).unwrap();
            assert_eq!(node.need, Need::Unknown);
            assert_eq!(node.dimension, Dimension::Unknown);
            assert_eq!(node.pipeline_score, 0.5);
        }
        assert_eq!(store.len(), 20);
        assert!(store.links().is_empty());
        assert!(store.rooms().is_empty());
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut store = GraphStore::default();
        store.seed_demo().unwrap();

        let (links, rooms) = store.recompute_links(0.2, 8).unwrap();
        let first_links: Vec<_> = links
            .iter()
            .map(|l| (l.source, l.target, l.weight.to_bits()))
            .collect();
        let first_rooms: Vec<_> = rooms.iter().map(|r| r.question_ids.clone()).collect();

        let (links, rooms) = store.recompute_links(0.2, 8).unwrap();
        let second_links: Vec<_> = links
            .iter()
            .map(|l| (l.source, l.target, l.weight.to_bits()))
            .collect();
        let second_rooms: Vec<_> = rooms.iter().map(|r| r.question_ids.clone()).collect();

        assert_eq!(first_links, second_links);
        assert_eq!(first_rooms, second_rooms);
    }

    #[test]
    fn demo_graph_invariants() {
        let mut store = GraphStore::default();
        store.seed_demo().unwrap();
        assert_eq!(store.len(), 20);

        let pairs: HashSet<_> = store.links().iter().map(|l| l.pair_key()).collect();
        assert_eq!(pairs.len(), store.links().len());

        for node in store.nodes() {
            let out = store.links().iter().filter(|l| l.source == node.id).count();
            assert!(out <= 8);
        }

        let ids: HashSet<NodeId> = store.nodes().iter().map(|n| n.id).collect();
        for room in store.rooms() {
            assert!(room.question_ids.len() >= 2);
            assert!(room.question_ids.iter().all(|id| ids.contains(id)));
        }
    }

    #[test]
    fn invalid_recompute_keeps_last_good_state() {
        let mut store = GraphStore::default();
        store.seed_demo().unwrap();
        let before: Vec<_> = store.links().iter().map(|l| l.id).collect();

        assert!(store.recompute_links(f64::NAN, 8).is_err());
        let after: Vec<_> = store.links().iter().map(|l| l.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn failed_submission_rolls_back() {
        let mut store = GraphStore::default();
        store.submit_question("team strategy").unwrap();
        store.nodes[0].pipeline_score = f64::NAN;

        assert!(store.submit_question("team vision").is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_node_cascades_to_links_and_rooms() {
        let mut store = GraphStore::default();
        let a = store.submit_question("customer experience quality").unwrap();
        let b = store.submit_question("customer experience quality").unwrap();
        let c = store.submit_question("Holiday picnic").unwrap();
        assert_eq!(store.rooms().len(), 1);

        store.remove_node(&a.id).unwrap();
        assert!(store.links().iter().all(|l| !l.touches(&a.id)));
        assert!(store.rooms().is_empty());
        assert!(store.node(&b.id).is_some());
        assert!(store.node(&c.id).is_some());

        let err = store.remove_node(&a.id).unwrap_err();
        assert!(matches!(err, WiseWaysError::NotFound { .. }));
    }

    #[test]
    fn remove_node_rescales_surviving_rooms() {
        let mut store = GraphStore::default();
        let a = store.submit_question("customer experience quality").unwrap();
        let b = store.submit_question("customer experience quality").unwrap();
        store.submit_question("customer experience quality").unwrap();
        store.submit_question("Holiday picnic").unwrap();

        let room_id = store.rooms()[0].id;
        assert_eq!(store.rooms()[0].strength, 75.0);
        store.join_room(&room_id, "u1", Some("Alice")).unwrap();

        store.remove_node(&a.id).unwrap();

        let room = store.room(&room_id).expect("room survives");
        assert_eq!(room.question_ids.len(), 2);
        assert!((room.strength - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(room.name, format!("{} Room 1", b.need));
        assert_eq!(room.theme, "customer, experience, quality");
        assert_eq!(room.participants.len(), 1);
    }

    #[test]
    fn status_updates_and_responses() {
        let mut store = GraphStore::default();
        let node = store.submit_question("team strategy").unwrap();

        let updated = store
            .update_status(&node.id, QuestionStatus::InProgress)
            .unwrap();
        assert_eq!(updated.status, QuestionStatus::InProgress);

        let answered = store.record_response(&node.id).unwrap();
        assert_eq!(answered.status, QuestionStatus::Answered);
        assert!(answered.last_answered_at.is_some());

        assert!(store.record_response(&NodeId::new()).is_err());
        assert_eq!(store.analytics().response_rate, 100.0);
    }

    #[test]
    fn join_and_leave_rooms() {
        let mut store = GraphStore::default();
        store.submit_question("customer experience quality").unwrap();
        store.submit_question("customer experience quality").unwrap();
        let room_id = store.rooms()[0].id;

        store.join_room(&room_id, "u1", Some("Alice")).unwrap();
        let room = store.join_room(&room_id, "u1", Some("Alice again")).unwrap();
        assert_eq!(room.participants.len(), 1);
        assert_eq!(room.participants[0].user_name, "Alice");

        let room = store.join_room(&room_id, "u2", None).unwrap();
        assert_eq!(room.participants[1].user_name, "Anonymous");
        assert_eq!(store.analytics().active_rooms, 1);

        let room = store.leave_room(&room_id, "u1").unwrap();
        assert_eq!(room.participants.len(), 1);

        assert!(store.join_room(&RoomId::new(), "u1", None).is_err());
        assert!(store.join_room(&room_id, "  ", None).is_err());
    }

    #[test]
    fn participants_follow_policy_across_regeneration() {
        let texts = ["customer experience quality", "customer experience quality"];

        let mut dropping = GraphStore::default();
        for t in texts {
            dropping.submit_question(t).unwrap();
        }
        let room_id = dropping.rooms()[0].id;
        dropping.join_room(&room_id, "u1", None).unwrap();
        dropping.submit_question("Holiday picnic").unwrap();
        assert!(dropping.rooms()[0].participants.is_empty());
        assert_ne!(dropping.rooms()[0].id, room_id);

        let config = RoomConfig {
            participant_policy: ParticipantPolicy::CarryOver,
            ..RoomConfig::default()
        };
        let mut keeping = GraphStore::new(LinkConfig::default(), config);
        for t in texts {
            keeping.submit_question(t).unwrap();
        }
        let room_id = keeping.rooms()[0].id;
        keeping.join_room(&room_id, "u1", None).unwrap();
        keeping.submit_question("Holiday picnic").unwrap();
        assert_eq!(keeping.rooms()[0].id, room_id);
        assert_eq!(keeping.rooms()[0].participants.len(), 1);
    }

    #[test]
    fn reset_clears_everything() {
        let mut store = GraphStore::default();
        store.seed_demo().unwrap();
        store.reset();
        assert!(store.is_empty());
        assert!(store.links().is_empty());
        assert!(store.snapshot().thinking_rooms.is_empty());
    }
}
