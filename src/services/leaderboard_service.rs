use uuid::Uuid;

use crate::{
    dao::{
        models::{GameLevel, ScoreEntity},
        score_store::ScoreStore,
    },
    dto::leaderboard::{LeaderboardQuery, LeaderboardRow},
    error::ServiceError,
    state::SharedState,
};

/// Return the ordered top rows of the board for one difficulty partition.
pub async fn top_scores(
    state: &SharedState,
    query: LeaderboardQuery,
) -> Result<Vec<LeaderboardRow>, ServiceError> {
    let store = state.require_score_store().await?;
    let limit = query.limit.unwrap_or_else(|| state.config().leaderboard_size());

    let scores = store.scan_scores(query.level).await?;
    Ok(rank(scores, limit).into_iter().map(Into::into).collect())
}

/// Whether the identified score currently sits in the top `n` of its
/// partition. Rank `n` itself still counts.
pub async fn is_in_top_n(
    store: &dyn ScoreStore,
    score_id: Uuid,
    level: Option<GameLevel>,
    n: usize,
) -> Result<bool, ServiceError> {
    let scores = store.scan_scores(level).await?;
    Ok(rank(scores, n)
        .iter()
        .any(|record| record.score_id == score_id))
}

/// Order by score descending and cut to `limit` rows.
///
/// The sort is stable, so equal scores keep the order the storage scan
/// returned them in.
fn rank(mut scores: Vec<ScoreEntity>, limit: usize) -> Vec<ScoreEntity> {
    scores.sort_by(|a, b| b.score.cmp(&a.score));
    scores.truncate(limit);
    scores
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::dao::score_store::memory::MemoryScoreStore;

    fn record(username: &str, score: u32, level: Option<GameLevel>) -> ScoreEntity {
        ScoreEntity {
            score_id: Uuid::new_v4(),
            username: username.into(),
            score,
            game_level: level,
            submitted_at: SystemTime::now(),
        }
    }

    fn scores(values: &[u32]) -> Vec<ScoreEntity> {
        values
            .iter()
            .enumerate()
            .map(|(index, score)| record(&format!("player-{index}"), *score, None))
            .collect()
    }

    #[test]
    fn rank_orders_descending_and_cuts() {
        let ranked = rank(scores(&[10, 50, 30, 90, 20]), 3);
        let values: Vec<_> = ranked.iter().map(|r| r.score).collect();
        assert_eq!(values, [90, 50, 30]);
    }

    #[test]
    fn rank_keeps_storage_order_for_ties() {
        let input = vec![
            record("early", 50, None),
            record("middle", 70, None),
            record("late", 50, None),
        ];
        let ranked = rank(input, 3);
        let names: Vec<_> = ranked.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(names, ["middle", "early", "late"]);
    }

    #[tokio::test]
    async fn easy_board_ranks_only_easy_scores() {
        let store = MemoryScoreStore::new();
        for score in [10, 50, 30, 90, 20] {
            ScoreStore::insert_score(&store, record("ada", score, Some(GameLevel::Easy)))
                .await
                .unwrap();
        }
        // A better hard score stays off the easy board.
        ScoreStore::insert_score(&store, record("rival", 95, Some(GameLevel::Hard)))
            .await
            .unwrap();

        let easy = ScoreStore::scan_scores(&store, Some(GameLevel::Easy))
            .await
            .unwrap();
        let values: Vec<_> = rank(easy, 3).iter().map(|r| r.score).collect();
        assert_eq!(values, [90, 50, 30]);
    }

    #[test]
    fn rank_with_short_input_returns_everything() {
        let ranked = rank(scores(&[5, 1]), 10);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].score, 5);
    }

    #[tokio::test]
    async fn top_n_membership_is_inclusive_at_the_boundary() {
        let store = MemoryScoreStore::new();
        for score in [100, 90, 80, 70, 60, 50, 40, 30, 20, 11] {
            ScoreStore::insert_score(&store, record("crowd", score, None))
                .await
                .unwrap();
        }

        let tenth = record("edge", 10, None);
        let tenth_id = tenth.score_id;
        ScoreStore::insert_score(&store, tenth).await.unwrap();

        // Eleven records now; the newest is rank 11 and misses the board.
        assert!(!is_in_top_n(&store, tenth_id, None, 10).await.unwrap());
        // A wider board keeps it.
        assert!(is_in_top_n(&store, tenth_id, None, 11).await.unwrap());
    }

    #[tokio::test]
    async fn top_n_membership_follows_the_partition() {
        let store = MemoryScoreStore::new();
        for score in [90, 80] {
            ScoreStore::insert_score(&store, record("rival", score, Some(GameLevel::Hard)))
                .await
                .unwrap();
        }

        let easy = record("ada", 10, Some(GameLevel::Easy));
        let easy_id = easy.score_id;
        ScoreStore::insert_score(&store, easy).await.unwrap();

        // Best of its own partition even though hard scores dwarf it.
        assert!(
            is_in_top_n(&store, easy_id, Some(GameLevel::Easy), 1)
                .await
                .unwrap()
        );
        // Against every partition it is rank 3.
        assert!(!is_in_top_n(&store, easy_id, None, 2).await.unwrap());
    }
}
