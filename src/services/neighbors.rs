use crate::models::{AudioFeatures, SongRecord};

/// Maximum number of rows a single search considers
pub const CANDIDATE_POOL_LIMIT: usize = 500;

/// A ranked candidate and its distance to the query vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a> {
    pub song: &'a SongRecord,
    pub distance: f64,
}

/// Keeps the most popular candidates, at most [`CANDIDATE_POOL_LIMIT`]
///
/// The sort is stable: equally popular rows keep their catalog order.
pub fn candidate_pool<'a>(candidates: &[&'a SongRecord]) -> Vec<&'a SongRecord> {
    let mut pool = candidates.to_vec();
    pool.sort_by(|a, b| b.popularity.cmp(&a.popularity));
    pool.truncate(CANDIDATE_POOL_LIMIT);
    pool
}

/// Exact nearest-neighbor index over one candidate pool
///
/// Built fresh for every search since the pool changes with each filter.
pub struct FeatureIndex<'a> {
    entries: Vec<&'a SongRecord>,
}

impl<'a> FeatureIndex<'a> {
    pub fn build(pool: &[&'a SongRecord]) -> Self {
        Self {
            entries: pool.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `k` closest entries by ascending Euclidean distance
    ///
    /// Equal distances keep index order. Asking for more than the index
    /// holds returns everything.
    pub fn nearest(&self, query: &AudioFeatures, k: usize) -> Vec<Neighbor<'a>> {
        let mut neighbors: Vec<Neighbor<'a>> = self
            .entries
            .iter()
            .map(|song| Neighbor {
                song: *song,
                distance: song.features.distance(query),
            })
            .collect();

        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors.truncate(k);
        neighbors
    }
}

/// Ranks candidates by similarity to `query`, returning at most `k`
///
/// Candidates are first cut down to the popularity-capped pool. An empty
/// candidate list gives an empty ranking.
pub fn rank<'a>(
    candidates: &[&'a SongRecord],
    query: &AudioFeatures,
    k: usize,
) -> Vec<Neighbor<'a>> {
    let pool = candidate_pool(candidates);
    let index = FeatureIndex::build(&pool);

    let neighbors = index.nearest(query, k);
    tracing::debug!(
        candidates = candidates.len(),
        pool = index.len(),
        k,
        returned = neighbors.len(),
        "Ranked candidate pool"
    );
    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::song;

    #[test]
    fn test_rank_orders_by_ascending_distance() {
        let songs = vec![
            song("far", 50, [0.0, 0.0, 0.0, 0.0, 0.0, 150.0]),
            song("near", 50, [0.0, 0.0, 0.0, 0.0, 0.0, 10.0]),
            song("mid", 50, [0.0, 0.0, 0.0, 0.0, 0.0, 80.0]),
        ];
        let candidates: Vec<&SongRecord> = songs.iter().collect();

        let ranked = rank(&candidates, &AudioFeatures::default(), 3);
        let uris: Vec<&str> = ranked.iter().map(|n| n.song.uri.as_str()).collect();
        assert_eq!(uris, vec!["near", "mid", "far"]);
        assert!(ranked.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_query_present_in_candidates_ranks_first_at_zero() {
        let songs = vec![
            song("a", 10, [0.3, 0.4, 0.5, 0.0, 0.1, 100.0]),
            song("b", 20, [0.6, 0.2, 0.9, 0.3, 0.8, 130.0]),
            song("c", 30, [0.1, 0.9, 0.2, 0.0, 0.5, 95.0]),
        ];
        let candidates: Vec<&SongRecord> = songs.iter().collect();

        let ranked = rank(&candidates, &songs[1].features, 3);
        assert_eq!(ranked[0].song.uri, "b");
        assert_eq!(ranked[0].distance, 0.0);
    }

    #[test]
    fn test_k_larger_than_pool_returns_all() {
        let songs = vec![
            song("a", 10, [0.0; 6]),
            song("b", 20, [1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
        ];
        let candidates: Vec<&SongRecord> = songs.iter().collect();

        let ranked = rank(&candidates, &AudioFeatures::default(), 50);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_k_limits_results() {
        let songs: Vec<SongRecord> = (0..10)
            .map(|i| song(&i.to_string(), 50, [0.0, 0.0, 0.0, 0.0, 0.0, i as f64]))
            .collect();
        let candidates: Vec<&SongRecord> = songs.iter().collect();

        let ranked = rank(&candidates, &AudioFeatures::default(), 4);
        let uris: Vec<&str> = ranked.iter().map(|n| n.song.uri.as_str()).collect();
        assert_eq!(uris, vec!["0", "1", "2", "3"]);
    }

    #[test]
    fn test_empty_candidates_yield_empty_ranking() {
        let ranked = rank(&[], &AudioFeatures::default(), 10);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_distance_ties_keep_popularity_order() {
        let songs = vec![
            song("low", 10, [0.5; 6]),
            song("high", 90, [0.5; 6]),
            song("mid-first", 50, [0.5; 6]),
            song("mid-second", 50, [0.5; 6]),
        ];
        let candidates: Vec<&SongRecord> = songs.iter().collect();

        let ranked = rank(&candidates, &AudioFeatures::default(), 4);
        let uris: Vec<&str> = ranked.iter().map(|n| n.song.uri.as_str()).collect();
        assert_eq!(uris, vec!["high", "mid-first", "mid-second", "low"]);
    }

    #[test]
    fn test_pool_is_capped_to_most_popular() {
        // 600 rows; the 100 least popular sit exactly on the query vector
        let songs: Vec<SongRecord> = (0..600u32)
            .map(|i| {
                let tempo = if i < 100 { 0.0 } else { 100.0 };
                song(&format!("s{}", i), i, [0.0, 0.0, 0.0, 0.0, 0.0, tempo])
            })
            .collect();
        let candidates: Vec<&SongRecord> = songs.iter().collect();

        let ranked = rank(&candidates, &AudioFeatures::default(), 600);
        assert_eq!(ranked.len(), CANDIDATE_POOL_LIMIT);
        assert!(ranked.iter().all(|n| n.song.popularity >= 100));
    }

    #[test]
    fn test_candidate_pool_is_stable_on_popularity_ties() {
        let songs = vec![
            song("first", 40, [0.0; 6]),
            song("top", 99, [0.0; 6]),
            song("second", 40, [0.0; 6]),
        ];
        let candidates: Vec<&SongRecord> = songs.iter().collect();

        let pool = candidate_pool(&candidates);
        let uris: Vec<&str> = pool.iter().map(|s| s.uri.as_str()).collect();
        assert_eq!(uris, vec!["top", "first", "second"]);
    }
}
