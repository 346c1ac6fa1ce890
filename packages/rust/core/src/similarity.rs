//! Text similarity measures: weighted-term cosine and hashed bag-of-words.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use wiseways_shared::EMBEDDING_DIM;

use crate::terms::extract_key_terms;

/// Cosine similarity of the key-term weight vectors of two texts.
///
/// 0 when either text has no qualifying terms.
pub fn semantic_similarity(a: &str, b: &str) -> f64 {
    extract_key_terms(a).cosine(&extract_key_terms(b))
}

/// Polynomial rolling hash (`h * 31 + unit`) over UTF-16 code units, 32-bit wrapping.
fn rolling_hash(token: &str) -> i32 {
    token
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Fixed-size hashed bag-of-words sketch of `text`.
///
/// Each distinct token of ASCII word characters adds its occurrence count to
/// slot `|hash| mod EMBEDDING_DIM`. Accented letters split tokens, so
/// "sécurité" yields "s" and "curit". Collisions are expected.
pub fn structural_embed(text: &str) -> Vec<f64> {
    static TOKEN_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?-u:\w)+").expect("valid regex"));

    let lower = text.to_lowercase();
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for m in TOKEN_RE.find_iter(&lower) {
        *counts.entry(m.as_str()).or_default() += 1;
    }

    let mut vec = vec![0.0; EMBEDDING_DIM];
    for (token, count) in counts {
        let slot = rolling_hash(token).unsigned_abs() as usize % EMBEDDING_DIM;
        vec[slot] += f64::from(count);
    }
    vec
}

/// Cosine similarity of two vectors, clamped to `[0, 1]`.
///
/// Missing trailing indices of the shorter vector count as 0. Empty or
/// zero-magnitude inputs give 0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let mag_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    (dot / (mag_a * mag_b)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_similarity_beats_disjoint_texts() {
        let t = "How do we build a shared product roadmap?";
        let u = "Vacation policy questions";
        let own = semantic_similarity(t, t);
        assert!((own - 1.0).abs() < 1e-9);
        assert!(own >= semantic_similarity(t, u));
        assert_eq!(semantic_similarity(t, u), 0.0);
    }

    #[test]
    fn shared_terms_give_partial_similarity() {
        let sim = semantic_similarity(
            "What problem are we facing with retention?",
            "How do we solve the retention issue?",
        );
        assert!(sim > 0.0 && sim < 1.0, "{sim}");
    }

    #[test]
    fn empty_text_has_zero_similarity() {
        assert_eq!(semantic_similarity("", "team strategy"), 0.0);
        assert_eq!(semantic_similarity("ok", "ok"), 0.0);
    }

    #[test]
    fn embedding_has_fixed_length_and_counts_tokens() {
        let v = structural_embed("team team TEAM growth");
        assert_eq!(v.len(), EMBEDDING_DIM);
        assert_eq!(v.iter().sum::<f64>(), 4.0);
        let slot = rolling_hash("team").unsigned_abs() as usize % EMBEDDING_DIM;
        assert!(v[slot] >= 3.0);
    }

    #[test]
    fn embedding_tokens_are_ascii_word_runs() {
        assert_eq!(structural_embed("Sécurité"), structural_embed("s curit"));
        assert_eq!(structural_embed("équipe").iter().sum::<f64>(), 1.0);
    }

    #[test]
    fn embedding_of_empty_text_is_zero() {
        let v = structural_embed("?!");
        assert_eq!(v.len(), EMBEDDING_DIM);
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn rolling_hash_is_stable() {
        assert_eq!(rolling_hash(""), 0);
        assert_eq!(rolling_hash("a"), 97);
        assert_eq!(rolling_hash("ab"), 97 * 31 + 98);
    }

    #[test]
    fn cosine_is_symmetric() {
        let pairs: [(&[f64], &[f64]); 4] = [
            (&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]),
            (&[0.5, 0.0], &[0.0, 0.5]),
            (&[1.0, 1.0, 1.0], &[2.0]),
            (&[4.0, 0.0, 1.0, 7.0], &[1.0, 1.0, 1.0, 1.0]),
        ];
        for (a, b) in pairs {
            assert_eq!(cosine_similarity(a, b), cosine_similarity(b, a));
        }
    }

    #[test]
    fn cosine_edge_cases() {
        assert_eq!(cosine_similarity(&[], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert!((cosine_similarity(&[2.0, 0.0], &[5.0, 0.0]) - 1.0).abs() < 1e-12);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn identical_texts_embed_identically() {
        let a = structural_embed("How do we measure employee satisfaction?");
        let b = structural_embed("How do we measure employee satisfaction?");
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-12);
    }
}
