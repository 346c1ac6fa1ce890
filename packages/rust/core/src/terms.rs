//! Key-term extraction with a curated importance table.
//!
//! Tokens are maximal runs of Latin letters (English and French accents),
//! lower-cased. Short tokens and bilingual stopwords are dropped; every
//! surviving occurrence adds its importance weight to the term's total.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Tokens must be longer than this (in characters) to count.
const MIN_TERM_CHARS: usize = 3;

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "up", "about", "into", "through", "during", "is", "are", "was", "were", "be", "been",
    "being", "have", "has", "had", "do", "does", "did", "will", "would", "should", "could", "can",
    "may", "le", "la", "les", "un", "une", "des", "de", "du", "et", "ou", "mais", "dans", "sur",
    "pour", "avec", "par", "est", "sont", "être", "avoir",
];

/// Importance weight of a lower-cased term.
pub fn term_weight(term: &str) -> f64 {
    match term {
        // action and strategic vocabulary
        "improve" | "create" | "develop" | "implement" | "build" | "design" | "innovate"
        | "optimize" | "enhance" | "transform" | "strategy" | "vision" | "goal" | "objective"
        | "mission" | "future" | "plan" | "roadmap" | "direction" | "améliorer" | "créer"
        | "développer" | "implémenter" | "stratégie" => 3.0,
        // organisational vocabulary
        "team" | "collaboration" | "communication" | "culture" | "innovation" | "growth"
        | "quality" | "performance" | "customer" | "user" | "client" | "experience" | "équipe"
        | "croissance" | "qualité" => 2.5,
        // needs-adjacent vocabulary
        "health" | "safety" | "security" | "learning" | "education" | "creativity" | "identity"
        | "freedom" | "participation" => 2.0,
        _ => 1.0,
    }
}

/// Weighted terms of one text, in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyTerms {
    terms: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl KeyTerms {
    /// Add `weight` to `term`, inserting it if new.
    fn accumulate(&mut self, term: &str, weight: f64) {
        match self.index.get(term) {
            Some(&i) => self.terms[i].1 += weight,
            None => {
                self.index.insert(term.to_string(), self.terms.len());
                self.terms.push((term.to_string(), weight));
            }
        }
    }

    /// Accumulated weight of `term`, 0 when absent.
    pub fn weight(&self, term: &str) -> f64 {
        self.index.get(term).map_or(0.0, |&i| self.terms[i].1)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }

    /// Distinct terms in first-occurrence order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|(t, _)| t.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.terms.iter().map(|(t, w)| (t.as_str(), *w))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Euclidean norm of the weight vector.
    pub fn magnitude(&self) -> f64 {
        self.terms.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Cosine similarity of two weight vectors over the union of their terms.
    ///
    /// Returns 0 when either side has no terms.
    pub fn cosine(&self, other: &KeyTerms) -> f64 {
        let mag_a = self.magnitude();
        let mag_b = other.magnitude();
        if mag_a == 0.0 || mag_b == 0.0 {
            return 0.0;
        }

        let dot: f64 = self
            .terms
            .iter()
            .map(|(term, w)| w * other.weight(term))
            .sum();

        (dot / (mag_a * mag_b)).clamp(0.0, 1.0)
    }
}

/// Extract weighted key terms from `text`.
pub fn extract_key_terms(text: &str) -> KeyTerms {
    static WORD_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[a-zàâäéèêëïîôùûüÿæœç]+").expect("valid regex"));

    let lower = text.to_lowercase();
    let mut terms = KeyTerms::default();

    for m in WORD_RE.find_iter(&lower) {
        let word = m.as_str();
        if word.chars().count() <= MIN_TERM_CHARS || STOPWORDS.contains(&word) {
            continue;
        }
        terms.accumulate(word, term_weight(word));
    }

    terms
}
