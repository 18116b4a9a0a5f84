//! Reciprocal rank fusion.
//!
//! Dense similarity and sparse term-frequency scores live on incomparable
//! scales; converting to rank neutralizes the difference and is robust to
//! either retriever returning degenerate all-zero or all-one scores.

use std::collections::HashMap;
use uniqa_core::types::{ChunkId, RankedList, ScoredResult};

/// Standard damping constant; larger k flattens the influence gap between
/// top and lower ranks.
pub const DEFAULT_RRF_K: usize = 60;

/// Merge two ranked lists by summing `1 / (k + rank + 1)` per chunk id.
///
/// Pure and deterministic: output is ordered by fused score descending,
/// ties broken by the order ids were first encountered scanning `list_a`
/// then `list_b`. For ids present in both lists, `list_a`'s chunk payload
/// wins.
pub fn reciprocal_rank_fusion(list_a: RankedList, list_b: RankedList, k: usize) -> RankedList {
    let mut scores: HashMap<ChunkId, f32> = HashMap::new();
    let mut first_seen: Vec<ChunkId> = Vec::new();
    let mut payloads: HashMap<ChunkId, ScoredResult> = HashMap::new();

    for list in [list_a, list_b] {
        for (rank, result) in list.into_iter().enumerate() {
            let contribution = 1.0 / (k as f32 + rank as f32 + 1.0);
            let id = result.chunk.id.clone();
            match scores.get_mut(&id) {
                Some(total) => *total += contribution,
                None => {
                    scores.insert(id.clone(), contribution);
                    first_seen.push(id.clone());
                    payloads.insert(id, result);
                }
            }
        }
    }

    let mut ranked: Vec<(usize, ChunkId)> = first_seen.into_iter().enumerate().collect();
    ranked.sort_by(|a, b| {
        scores[&b.1]
            .partial_cmp(&scores[&a.1])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });

    ranked
        .into_iter()
        .filter_map(|(_, id)| {
            payloads.remove(&id).map(|result| {
                let score = scores[&id];
                ScoredResult {
                    score,
                    source: result.chunk.source.clone(),
                    chunk: result.chunk,
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uniqa_core::types::{Chunk, DocumentType, Meta};

    fn result(id: &str, score: f32) -> ScoredResult {
        let chunk = Chunk {
            id: id.to_string(),
            content: format!("content of {id}"),
            metadata: Meta::new(),
            document_type: DocumentType::Scholarship,
            source: "test.txt".to_string(),
        };
        ScoredResult::new(chunk, score)
    }

    #[test]
    fn fuses_overlapping_lists_by_rank() {
        let list_a = vec![result("A", 0.9), result("B", 0.8)];
        let list_b = vec![result("B", 0.3), result("C", 0.2)];
        let fused = reciprocal_rank_fusion(list_a, list_b, 60);

        let ids: Vec<&str> = fused.iter().map(|r| r.chunk.id.as_str()).collect();
        // B appears in both (ranks 1 and 0); A and C tie, A was seen first.
        assert_eq!(ids, vec!["B", "A", "C"]);

        let b = &fused[0];
        assert!((b.score - (1.0 / 60.0 + 1.0 / 61.0)).abs() < 1e-6);
        let a = &fused[1];
        assert!((a.score - 1.0 / 61.0).abs() < 1e-6);
        let c = &fused[2];
        assert!((c.score - 1.0 / 61.0).abs() < 1e-6);
    }

    #[test]
    fn absolute_scores_do_not_matter() {
        // Degenerate all-zero scores still fuse by rank.
        let list_a = vec![result("A", 0.0), result("B", 0.0)];
        let list_b = vec![result("A", 0.0)];
        let fused = reciprocal_rank_fusion(list_a, list_b, 60);
        assert_eq!(fused[0].chunk.id, "A");
        assert!(fused[0].score > fused[1].score);
    }

    #[test]
    fn list_a_payload_wins_for_duplicate_ids() {
        let mut a_copy = result("A", 0.9);
        a_copy.chunk.content = "payload from list a".to_string();
        let mut b_copy = result("A", 0.1);
        b_copy.chunk.content = "payload from list b".to_string();

        let fused = reciprocal_rank_fusion(vec![a_copy], vec![b_copy], 60);
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].chunk.content, "payload from list a");
    }

    #[test]
    fn empty_inputs_fuse_to_empty() {
        let fused = reciprocal_rank_fusion(Vec::new(), Vec::new(), 60);
        assert!(fused.is_empty());
    }

    #[test]
    fn fused_scores_are_bounded_by_contributing_lists() {
        let list_a = vec![result("A", 1.0)];
        let list_b = vec![result("A", 1.0)];
        let fused = reciprocal_rank_fusion(list_a, list_b, 60);
        // Present in both lists at rank 0: the maximum possible fused score.
        assert!((fused[0].score - 2.0 / 61.0).abs() < 1e-6);
    }
}
