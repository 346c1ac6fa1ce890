//! Link generation: composite edge weights, per-node top-K, pair dedup.
//!
//! Every call rebuilds the full edge set from nothing. Pairs are evaluated once
//! each (`i < j` in node order), so the earlier node is always the link source.

use std::collections::HashSet;

use tracing::{debug, info, instrument};

use wiseways_shared::{
    Link, LinkConfig, LinkId, Node, NodeId, RelationType, Result, WiseWaysError, pair_key,
};

use crate::causal::detect_relation;
use crate::similarity::cosine_similarity;
use crate::terms::{KeyTerms, extract_key_terms};

const SEMANTIC_WEIGHT: f64 = 0.4;
const EMBEDDING_WEIGHT: f64 = 0.2;
const SAME_NEED_BONUS: f64 = 0.15;
const SAME_DIMENSION_BONUS: f64 = 0.1;
const PIPELINE_WEIGHT: f64 = 0.1;

/// Individual signals behind one candidate edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairScore {
    /// Raw weighted-term cosine, before weighting.
    pub semantic: f64,
    /// Raw structural-embedding cosine, before weighting.
    pub embedding: f64,
    pub same_need: f64,
    pub same_dimension: f64,
    pub pipeline_proximity: f64,
    pub causal: f64,
    pub relation_type: Option<RelationType>,
}

impl PairScore {
    /// Sum of all weighted signals.
    pub fn combined(&self) -> f64 {
        self.semantic * SEMANTIC_WEIGHT
            + self.embedding * EMBEDDING_WEIGHT
            + self.same_need
            + self.same_dimension
            + self.pipeline_proximity
            + self.causal
    }

    /// Human-readable summary of the dominant signals.
    pub fn reason(&self) -> String {
        let pct = (self.semantic * 100.0).round();
        match self.relation_type {
            Some(kind) => format!("{pct:.0}% semantic similarity, {kind} relationship"),
            None => format!("{pct:.0}% semantic similarity"),
        }
    }
}

/// Score the ordered pair `(a, b)`.
pub fn score_pair(a: &Node, a_terms: &KeyTerms, b: &Node, b_terms: &KeyTerms) -> PairScore {
    let causal = detect_relation(&a.text, &b.text);

    PairScore {
        semantic: a_terms.cosine(b_terms),
        embedding: cosine_similarity(&a.embedding, &b.embedding),
        same_need: if a.need == b.need { SAME_NEED_BONUS } else { 0.0 },
        same_dimension: if a.dimension == b.dimension {
            SAME_DIMENSION_BONUS
        } else {
            0.0
        },
        pipeline_proximity: (1.0 - (a.pipeline_score - b.pipeline_score).abs()) * PIPELINE_WEIGHT,
        causal: causal.score,
        relation_type: causal.relation_type,
    }
}

fn check_node(node: &Node) -> Result<()> {
    if !node.pipeline_score.is_finite() || !(0.0..=1.0).contains(&node.pipeline_score) {
        return Err(WiseWaysError::malformed_node(
            node.id,
            format!("pipeline score {} outside [0, 1]", node.pipeline_score),
        ));
    }
    if node.embedding.iter().any(|x| !x.is_finite()) {
        return Err(WiseWaysError::malformed_node(
            node.id,
            "embedding holds non-finite values",
        ));
    }
    Ok(())
}

struct Candidate {
    target: NodeId,
    weight: f64,
    score: PairScore,
}

/// Build the full link set over `nodes`.
///
/// A pair becomes a candidate when both questions carry key terms and the
/// combined weight reaches `config.threshold`. Each source keeps its
/// `config.max_per_node` heaviest candidates; at most one link per unordered pair.
#[instrument(skip_all, fields(nodes = nodes.len(), threshold = config.threshold, max_per_node = config.max_per_node))]
pub fn generate_links(nodes: &[Node], config: &LinkConfig) -> Result<Vec<Link>> {
    config.validate()?;
    for node in nodes {
        check_node(node)?;
    }

    if nodes.len() < 2 {
        return Ok(Vec::new());
    }

    let terms: Vec<KeyTerms> = nodes.iter().map(|n| extract_key_terms(&n.text)).collect();
    let mut seen: HashSet<(NodeId, NodeId)> = HashSet::new();
    let mut links = Vec::new();

    for (i, a) in nodes.iter().enumerate() {
        if terms[i].is_empty() {
            continue;
        }

        let mut candidates: Vec<Candidate> = Vec::new();
        for (j, b) in nodes.iter().enumerate().skip(i + 1) {
            if terms[j].is_empty() {
                continue;
            }

            let score = score_pair(a, &terms[i], b, &terms[j]);
            let weight = score.combined();
            if weight >= config.threshold {
                candidates.push(Candidate {
                    target: b.id,
                    weight,
                    score,
                });
            }
        }

        candidates.sort_by(|x, y| y.weight.total_cmp(&x.weight));
        candidates.truncate(config.max_per_node);

        for candidate in candidates {
            if !seen.insert(pair_key(a.id, candidate.target)) {
                continue;
            }
            links.push(Link {
                id: LinkId::new(),
                source: a.id,
                target: candidate.target,
                weight: candidate.weight,
                relation_type: candidate.score.relation_type,
                semantic_score: candidate.score.semantic,
                reason: candidate.score.reason(),
            });
        }
    }

    info!(links = links.len(), "generated semantic links");
    log_strongest(nodes, &links);

    Ok(links)
}

fn log_strongest(nodes: &[Node], links: &[Link]) {
    let text_of = |id: &NodeId| {
        nodes
            .iter()
            .find(|n| n.id == *id)
            .map(|n| n.text.chars().take(40).collect::<String>())
            .unwrap_or_default()
    };

    for link in links.iter().filter(|l| l.weight > 0.5).take(5) {
        debug!(
            source = %text_of(&link.source),
            target = %text_of(&link.target),
            weight = link.weight,
            reason = %link.reason,
            "strong connection"
        );
    }
}
