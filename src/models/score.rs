// src/models/score.rs

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::ALL_TOPICS;
use crate::error::AppError;

/// One completed quiz. Appended to the history, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// ISO-8601 local time, e.g. `2024-05-01T12:34:56.123456`.
    pub timestamp: NaiveDateTime,
    pub score: u32,
    pub total: u32,
}

impl ScoreRecord {
    pub fn new(timestamp: NaiveDateTime, score: u32, total: u32) -> Result<Self, AppError> {
        let record = ScoreRecord {
            timestamp,
            score,
            total,
        };
        record.check()?;
        Ok(record)
    }

    pub fn check(&self) -> Result<(), AppError> {
        if self.total == 0 {
            return Err(AppError::validation("total", "must be greater than 0"));
        }
        if self.score > self.total {
            return Err(AppError::validation(
                "score",
                format!("{} exceeds the total of {}", self.score, self.total),
            ));
        }
        Ok(())
    }

    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.score as f64 / self.total as f64
        }
    }

    pub fn percentage(&self) -> f64 {
        self.ratio() * 100.0
    }
}

/// topic -> chronological records, for one user.
pub type TopicHistory = BTreeMap<String, Vec<ScoreRecord>>;

/// Score-history resource (`result/scores.json`): username -> topic -> records.
pub type ScoreHistory = BTreeMap<String, TopicHistory>;

/// Checks a history read back from storage.
pub fn check_history(history: &ScoreHistory) -> Result<(), String> {
    for (username, topics) in history {
        for (topic, records) in topics {
            for record in records {
                record
                    .check()
                    .map_err(|e| format!("{}/{}: {}", username, topic, e))?;
            }
        }
    }
    Ok(())
}

/// Appends a record, creating the intermediate entries as needed.
pub fn append_record(history: &mut ScoreHistory, username: &str, topic: &str, record: ScoreRecord) {
    history
        .entry(username.to_string())
        .or_default()
        .entry(topic.to_string())
        .or_default()
        .push(record);
}

/// Record with the highest score/total ratio. The earliest one wins a tie.
pub fn best_record(records: &[ScoreRecord]) -> Option<&ScoreRecord> {
    records.iter().fold(None, |best, r| match best {
        Some(b) if b.ratio() >= r.ratio() => Some(b),
        _ => Some(r),
    })
}

/// Which leaderboard to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardScope {
    /// Sum of per-topic bests, per user.
    All,
    Topic(String),
}

impl From<&str> for LeaderboardScope {
    fn from(s: &str) -> Self {
        if s.eq_ignore_ascii_case(ALL_TOPICS) {
            LeaderboardScope::All
        } else {
            LeaderboardScope::Topic(s.to_string())
        }
    }
}

/// Aggregated struct for displaying the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub best_score: u64,
    pub best_total: u64,
    pub percentage: f64,
}

impl LeaderboardEntry {
    fn new(username: &str, best_score: u64, best_total: u64) -> Self {
        let percentage = if best_total == 0 {
            0.0
        } else {
            best_score as f64 / best_total as f64 * 100.0
        };
        LeaderboardEntry {
            username: username.to_string(),
            best_score,
            best_total,
            percentage,
        }
    }
}

/// Builds a leaderboard sorted by descending percentage.
/// The sort is stable, so ties keep username order.
pub fn rank(history: &ScoreHistory, scope: &LeaderboardScope) -> Vec<LeaderboardEntry> {
    let mut board: Vec<LeaderboardEntry> = match scope {
        LeaderboardScope::Topic(topic) => history
            .iter()
            .filter_map(|(username, topics)| {
                let best = best_record(topics.get(topic)?)?;
                Some(LeaderboardEntry::new(
                    username,
                    u64::from(best.score),
                    u64::from(best.total),
                ))
            })
            .collect(),
        LeaderboardScope::All => history
            .iter()
            .filter_map(|(username, topics)| {
                let (score, total) = topics
                    .values()
                    .filter_map(|records| best_record(records))
                    .fold((0u64, 0u64), |(s, t), best| {
                        (s + u64::from(best.score), t + u64::from(best.total))
                    });
                (total > 0).then(|| LeaderboardEntry::new(username, score, total))
            })
            .collect(),
    };

    board.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    board
}

/// Store-wide participation counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analytics {
    pub total_users: usize,
    pub total_topics: usize,
    pub users_who_took_any_quiz: usize,
    pub per_topic_participant_count: BTreeMap<String, usize>,
}

pub fn summarize(total_users: usize, topics: &[String], history: &ScoreHistory) -> Analytics {
    let users_who_took_any_quiz = history
        .values()
        .filter(|topics| topics.values().any(|records| !records.is_empty()))
        .count();

    let per_topic_participant_count = topics
        .iter()
        .map(|topic| {
            let count = history
                .values()
                .filter(|t| t.get(topic).is_some_and(|records| !records.is_empty()))
                .count();
            (topic.clone(), count)
        })
        .collect();

    Analytics {
        total_users,
        total_topics: topics.len(),
        users_who_took_any_quiz,
        per_topic_participant_count,
    }
}

/// One point of a user's score progression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressPoint {
    pub topic: String,
    pub timestamp: NaiveDateTime,
    pub percentage: f64,
}

/// Flattens one user's history into a chronological series across topics.
pub fn progression(topics: &TopicHistory) -> Vec<ProgressPoint> {
    let mut points: Vec<ProgressPoint> = topics
        .iter()
        .flat_map(|(topic, records)| {
            records.iter().map(move |r| ProgressPoint {
                topic: topic.clone(),
                timestamp: r.timestamp,
                percentage: r.percentage(),
            })
        })
        .collect();
    points.sort_by_key(|p| p.timestamp);
    points
}
