//! Causal-relation pattern detection between an ordered pair of texts.

use std::sync::LazyLock;

use regex::Regex;

use wiseways_shared::RelationType;

const PROBLEM_SOLUTION_SCORE: f64 = 0.3;
const CAUSE_EFFECT_SCORE: f64 = 0.25;
const DEPENDENCY_SCORE: f64 = 0.2;

fn relation_pattern(words: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b(?:{words})\b")).expect("valid regex")
}

static CAUSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    relation_pattern("cause|lead|result|enable|create|produce|generate|drive")
});
static EFFECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    relation_pattern("impact|affect|influence|change|improve|reduce|increase")
});
static DEPENDENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    relation_pattern("require|need|depend|rely|based on|prerequisite")
});
static SOLUTION_RE: LazyLock<Regex> =
    LazyLock::new(|| relation_pattern("solve|address|fix|resolve|answer|handle"));
static PROBLEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    relation_pattern("problem|issue|challenge|obstacle|difficulty|concern")
});

/// Score and type of the causal patterns found from `a` to `b`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CausalRelation {
    /// Already weighted; contributes directly to a link's weight.
    pub score: f64,
    pub relation_type: Option<RelationType>,
}

/// Detect problem/solution, cause/effect and dependency patterns from `a` to `b`.
///
/// Every rule that fires adds its score; the first rule to fire sets the type
/// (problem-solution, then cause-effect, then dependency).
pub fn detect_relation(a: &str, b: &str) -> CausalRelation {
    let mut relation = CausalRelation::default();

    if PROBLEM_RE.is_match(a) && SOLUTION_RE.is_match(b) {
        relation.score += PROBLEM_SOLUTION_SCORE;
        relation.relation_type = Some(RelationType::ProblemSolution);
    }

    if CAUSE_RE.is_match(a) && EFFECT_RE.is_match(b) {
        relation.score += CAUSE_EFFECT_SCORE;
        relation.relation_type.get_or_insert(RelationType::CauseEffect);
    }

    if DEPENDENCY_RE.is_match(a) || DEPENDENCY_RE.is_match(b) {
        relation.score += DEPENDENCY_SCORE;
        relation.relation_type.get_or_insert(RelationType::Dependency);
    }

    relation
}
