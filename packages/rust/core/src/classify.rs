//! Need / dimension / pipeline classification by keyword patterns.
//!
//! Each taxonomy is an ordered list of `(label, pattern)` pairs evaluated
//! uniformly. The label with the strictly greatest match count wins; ties keep
//! the label that comes first in the list.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use wiseways_shared::{Dimension, Need};

/// Pipeline score when a text carries neither strategic nor execution cues.
pub const NEUTRAL_PIPELINE_SCORE: f64 = 0.5;

/// Result of classifying one text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub need: Need,
    pub dimension: Dimension,
    pub pipeline_score: f64,
}

fn keyword_pattern(words: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b(?:{words})\b")).expect("valid regex")
}

static NEED_PATTERNS: LazyLock<Vec<(Need, Regex)>> = LazyLock::new(|| {
    vec![
        (
            Need::Subsistence,
            keyword_pattern(
                "food|health|shelter|work|income|salary|revenue|survive|basic|essential|subsistence|alimentation|santé|revenu",
            ),
        ),
        (
            Need::Protection,
            keyword_pattern(
                "safety|security|protect|risk|insurance|legal|rights|defense|care|sécurité|protection|défense",
            ),
        ),
        (
            Need::Affection,
            keyword_pattern(
                "love|friend|family|relationship|care|emotion|affection|belonging|connect|amour|amitié|famille|relation",
            ),
        ),
        (
            Need::Understanding,
            keyword_pattern(
                r"learn|understand|educat\w*|knowledge|training|skill|study|research|analyze|apprendre|comprendre|éducation|connaissance|formation",
            ),
        ),
        (
            Need::Participation,
            keyword_pattern(
                "participate|engage|involve|contribute|collaborate|team|group|community|vote|participer|engager|équipe|communauté",
            ),
        ),
        (
            Need::Creation,
            keyword_pattern(
                "create|innovate|design|build|develop|invent|art|imagine|express|créer|innover|concevoir|développer|inventer",
            ),
        ),
        (
            Need::Identity,
            keyword_pattern(
                "identity|who|self|personal|individual|unique|character|belong|culture|identité|personnel|individuel",
            ),
        ),
        (
            Need::Freedom,
            keyword_pattern(
                "freedom|choice|autonomy|independent|decide|liberty|flexible|option|liberté|choix|autonomie|indépendant",
            ),
        ),
        (
            Need::Idleness,
            keyword_pattern(
                "rest|relax|leisure|play|fun|enjoy|vacation|hobby|entertain|game|repos|détente|loisir|jeu|vacances",
            ),
        ),
    ]
});

static DIMENSION_PATTERNS: LazyLock<Vec<(Dimension, Regex)>> = LazyLock::new(|| {
    vec![
        (
            Dimension::Being,
            keyword_pattern("is|am|are|being|exist|state|condition|quality|attribute|être|état|qualité"),
        ),
        (
            Dimension::Having,
            keyword_pattern(
                "have|has|own|possess|resource|asset|tool|material|property|avoir|posséder|ressource|outil",
            ),
        ),
        (
            Dimension::Doing,
            keyword_pattern(
                "do|does|action|activity|work|perform|execute|implement|practice|faire|activité|exécuter",
            ),
        ),
        (
            Dimension::Interacting,
            keyword_pattern(
                "interact|with|between|relation|network|collaborate|communicate|meet|interagir|avec|entre|communiquer",
            ),
        ),
    ]
});

static STRATEGIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    keyword_pattern(
        "strategy|vision|future|plan|goal|objective|why|purpose|mission|stratégie|futur|objectif",
    )
});

static EXECUTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    keyword_pattern(
        "implement|execute|deliver|now|today|urgent|deadline|task|action|implémenter|exécuter|livrer|tâche",
    )
});

/// Pick the label with the strictly greatest match count, first-seen on ties.
fn best_label<L: Copy>(text: &str, patterns: &[(L, Regex)], unknown: L) -> L {
    let mut best = unknown;
    let mut best_count = 0;

    for (label, pattern) in patterns {
        let count = pattern.find_iter(text).count();
        if count > best_count {
            best_count = count;
            best = *label;
        }
    }

    best
}

/// Assign a need label, a dimension label and a pipeline score to `text`.
///
/// Pure and total: any input, including the empty string, classifies.
pub fn classify(text: &str) -> Classification {
    let lower = text.to_lowercase();

    let need = best_label(&lower, &NEED_PATTERNS, Need::Unknown);
    let dimension = best_label(&lower, &DIMENSION_PATTERNS, Dimension::Unknown);
    let pipeline_score = pipeline_score(&lower);

    Classification {
        need,
        dimension,
        pipeline_score,
    }
}

/// Strategic (near 0) versus execution-ready (near 1) estimate.
///
/// `exec / (strategic + exec + 1)`; the `+ 1` damps scores built on a single cue.
pub fn pipeline_score(text: &str) -> f64 {
    let strategic = STRATEGIC_RE.find_iter(text).count();
    let execution = EXECUTION_RE.find_iter(text).count();

    if strategic == 0 && execution == 0 {
        return NEUTRAL_PIPELINE_SCORE;
    }

    execution as f64 / (strategic + execution + 1) as f64
}
