// tests/quiz_flow_tests.rs

use std::cell::Cell;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use quiz_store::{
    AppError, AppState,
    handlers::{admin, auth, bank, quiz, scores},
    models::{
        question::{OPTION_KEYS, QuestionBank, QuestionDraft},
        quiz_config::QuizConfig,
        score::ScoreHistory,
        session::SessionState,
        user::{
            AdminCreateUserRequest, AuthenticatedUser, CreateUserRequest, LoginRequest, Role, Users,
        },
    },
    repository::{
        ConfigRepository, JsonFileStore, MemoryStore, QuestionRepository, ScoreRepository,
        UserRepository,
    },
};

fn config(cap: u32) -> QuizConfig {
    QuizConfig {
        topics: vec!["math".to_string(), "science".to_string()],
        questions_per_topic: cap,
    }
}

/// Helper function to open a file-backed state in a unique directory.
fn spawn_app(cap: u32) -> (AppState, JsonFileStore, PathBuf) {
    let dir = std::env::temp_dir().join(format!("quiz_flow_{}", uuid::Uuid::new_v4()));
    let store = JsonFileStore::new(&dir);
    store.save_config(&config(cap)).unwrap();
    let state = AppState::new(store.clone()).unwrap();
    (state, store, dir)
}

fn admin() -> AuthenticatedUser {
    AuthenticatedUser {
        username: "root_admin".to_string(),
        role: Role::Admin,
    }
}

fn player(name: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        username: name.to_string(),
        role: Role::User,
    }
}

fn draft(n: usize) -> QuestionDraft {
    QuestionDraft::new(&format!("Question {}?", n), ["w", "x", "y", "z"], "3")
}

#[test]
fn added_question_is_listed_with_all_options() {
    let (state, _, dir) = spawn_app(5);

    let id = bank::add_question(&state, &admin(), "math", draft(1)).unwrap();
    let listed = bank::list_questions(&state, "math").unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].question.options.len(), 4);
    assert!(listed[0].question.options.contains_key(&listed[0].question.answer));
    assert_eq!(listed[0].question.correct_text(), "y");

    fs::remove_dir_all(dir).ok();
}

#[test]
fn ids_are_unique_over_a_thousand_inserts() {
    let state = AppState::new(MemoryStore::with_config(config(1000))).unwrap();

    let mut ids = HashSet::new();
    for n in 0..1000 {
        ids.insert(bank::add_question(&state, &admin(), "math", draft(n)).unwrap());
    }
    assert_eq!(ids.len(), 1000);
    assert_eq!(bank::list_questions(&state, "math").unwrap().len(), 1000);
}

#[test]
fn full_bank_rejects_and_is_left_untouched() {
    let (state, store, dir) = spawn_app(2);
    bank::add_question(&state, &admin(), "math", draft(1)).unwrap();
    bank::add_question(&state, &admin(), "math", draft(2)).unwrap();
    let before = fs::read_to_string(store.bank_path("math")).unwrap();

    let err = bank::add_question(&state, &admin(), "math", draft(3)).unwrap_err();
    assert_eq!(
        err,
        AppError::Capacity {
            topic: "math".to_string(),
            limit: 2
        }
    );

    assert_eq!(fs::read_to_string(store.bank_path("math")).unwrap(), before);
    assert_eq!(bank::list_questions(&state, "math").unwrap().len(), 2);

    fs::remove_dir_all(dir).ok();
}

#[test]
fn capacity_is_checked_before_draft_validation() {
    let (state, _, dir) = spawn_app(1);
    bank::add_question(&state, &admin(), "math", draft(1)).unwrap();

    let invalid = QuestionDraft::new("", ["", "", "", ""], "9");
    let err = bank::add_question(&state, &admin(), "math", invalid).unwrap_err();
    assert!(matches!(err, AppError::Capacity { .. }));

    fs::remove_dir_all(dir).ok();
}

#[test]
fn invalid_draft_is_rejected_without_writing() {
    let (state, store, dir) = spawn_app(5);

    let err = bank::add_question(&state, &admin(), "math", QuestionDraft::new("?", ["a", "b", "c", "d"], "5"))
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "answer"));
    assert!(bank::list_questions(&state, "math").unwrap().is_empty());
    assert!(!store.bank_path("math").exists());

    bank::add_question(&state, &admin(), "math", draft(1)).unwrap();
    assert!(store.bank_path("math").exists());

    fs::remove_dir_all(dir).ok();
}

#[test]
fn rejected_first_add_leaves_no_bank_in_memory() {
    let state = AppState::new(MemoryStore::with_config(config(5))).unwrap();

    let rejected = QuestionDraft::new("", ["a", "b", "c", "d"], "1");
    assert!(bank::add_question(&state, &admin(), "science", rejected).is_err());
    assert!(matches!(state.store.load_bank("science"), Err(AppError::NotFound(_))));
    assert!(matches!(
        quiz::begin_session(&state, "science"),
        Err(AppError::NoQuestions(_))
    ));
}

#[test]
fn unknown_topic_and_non_admin_are_rejected() {
    let (state, _, dir) = spawn_app(5);

    assert!(matches!(
        bank::add_question(&state, &admin(), "history", draft(1)),
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        bank::add_question(&state, &player("bob"), "math", draft(1)),
        Err(AppError::AuthError(_))
    ));

    fs::remove_dir_all(dir).ok();
}

#[test]
fn deleting_unknown_question_is_a_no_op() {
    let (state, store, dir) = spawn_app(5);

    // No bank file yet.
    assert!(matches!(
        bank::delete_question(&state, &admin(), "science", "nope"),
        Err(AppError::NotFound(_))
    ));

    let id = bank::add_question(&state, &admin(), "math", draft(1)).unwrap();
    let before = fs::read_to_string(store.bank_path("math")).unwrap();

    assert!(matches!(
        bank::delete_question(&state, &admin(), "math", "not-an-id"),
        Err(AppError::NotFound(_))
    ));
    assert_eq!(fs::read_to_string(store.bank_path("math")).unwrap(), before);

    bank::delete_question(&state, &admin(), "math", &id).unwrap();
    assert!(bank::list_questions(&state, "math").unwrap().is_empty());

    fs::remove_dir_all(dir).ok();
}

#[test]
fn session_covers_whole_bank_and_scores_within_bounds() {
    let (state, _, dir) = spawn_app(10);
    for n in 0..6 {
        bank::add_question(&state, &admin(), "math", draft(n)).unwrap();
    }

    for attempt in 0..5 {
        let mut session = quiz::begin_session(&state, "math").unwrap();
        assert_eq!(session.total(), 6);

        while let Some((index, _)) = session.current() {
            let key = OPTION_KEYS[(index + attempt) % 4];
            quiz::submit_answer(&mut session, index, key).unwrap();
        }
        assert_eq!(session.state(), SessionState::InProgress(6));

        let result = quiz::finish_session(&state, &player("bob"), &mut session).unwrap();
        assert!(result.score <= result.total);
        assert_eq!(result.total, 6);
    }

    let history = scores::user_score_history(&state, "bob").unwrap();
    assert_eq!(history["math"].len(), 5);

    fs::remove_dir_all(dir).ok();
}

/// Memory-backed store whose score saves fail while `fail_scores` is set.
struct FlakyScoreStore {
    inner: MemoryStore,
    fail_scores: Rc<Cell<bool>>,
}

impl ConfigRepository for FlakyScoreStore {
    fn load_config(&self) -> Result<QuizConfig, AppError> {
        self.inner.load_config()
    }
    fn save_config(&self, config: &QuizConfig) -> Result<(), AppError> {
        self.inner.save_config(config)
    }
}

impl QuestionRepository for FlakyScoreStore {
    fn load_bank(&self, topic: &str) -> Result<QuestionBank, AppError> {
        self.inner.load_bank(topic)
    }
    fn load_bank_or_create(&self, topic: &str) -> Result<QuestionBank, AppError> {
        self.inner.load_bank_or_create(topic)
    }
    fn save_bank(&self, topic: &str, bank: &QuestionBank) -> Result<(), AppError> {
        self.inner.save_bank(topic, bank)
    }
}

impl UserRepository for FlakyScoreStore {
    fn load_users(&self) -> Result<Users, AppError> {
        self.inner.load_users()
    }
    fn save_users(&self, users: &Users) -> Result<(), AppError> {
        self.inner.save_users(users)
    }
}

impl ScoreRepository for FlakyScoreStore {
    fn load_history(&self) -> Result<ScoreHistory, AppError> {
        self.inner.load_history()
    }
    fn save_history(&self, history: &ScoreHistory) -> Result<(), AppError> {
        if self.fail_scores.get() {
            return Err(AppError::io("result/scores.json", "disk full"));
        }
        self.inner.save_history(history)
    }
}

#[test]
fn failed_score_save_keeps_session_open_for_retry() {
    let fail_scores = Rc::new(Cell::new(false));
    let state = AppState::new(FlakyScoreStore {
        inner: MemoryStore::with_config(config(5)),
        fail_scores: Rc::clone(&fail_scores),
    })
    .unwrap();
    bank::add_question(&state, &admin(), "math", draft(1)).unwrap();

    let mut session = quiz::begin_session(&state, "math").unwrap();
    quiz::submit_answer(&mut session, 0, "3").unwrap();

    fail_scores.set(true);
    let err = quiz::finish_session(&state, &player("bob"), &mut session).unwrap_err();
    assert!(matches!(err, AppError::Io { .. }));
    assert_eq!(session.state(), SessionState::InProgress(1));
    assert!(scores::user_score_history(&state, "bob").unwrap().is_empty());

    fail_scores.set(false);
    let result = quiz::finish_session(&state, &player("bob"), &mut session).unwrap();
    assert_eq!((result.score, result.total), (1, 1));
    assert_eq!(session.state(), SessionState::Finished);

    let history = scores::user_score_history(&state, "bob").unwrap();
    assert_eq!(history["math"].len(), 1);
    assert!(matches!(
        quiz::finish_session(&state, &player("bob"), &mut session),
        Err(AppError::InvalidSession(_))
    ));
}

#[test]
fn session_on_empty_topic_fails() {
    let (state, _, dir) = spawn_app(10);

    assert_eq!(
        quiz::begin_session(&state, "science").unwrap_err(),
        AppError::NoQuestions("science".to_string())
    );

    fs::remove_dir_all(dir).ok();
}

#[test]
fn out_of_range_key_is_rejected_before_scoring() {
    let (state, _, dir) = spawn_app(10);
    bank::add_question(&state, &admin(), "math", draft(1)).unwrap();

    let mut session = quiz::begin_session(&state, "math").unwrap();
    assert!(matches!(
        quiz::submit_answer(&mut session, 0, "5"),
        Err(AppError::Validation { .. })
    ));
    assert_eq!(session.score(), 0);

    assert!(quiz::submit_answer(&mut session, 0, "3").unwrap().correct);
    assert!(quiz::submit_answer(&mut session, 0, "3").is_err());
    assert_eq!(session.score(), 1);

    let result = quiz::finish_session(&state, &player("bob"), &mut session).unwrap();
    assert_eq!((result.score, result.total), (1, 1));

    fs::remove_dir_all(dir).ok();
}

#[test]
fn leaderboard_scenario_single_best_vs_sum_of_bests() {
    let (state, _, dir) = spawn_app(10);

    scores::record_score(&state, "alice", "math", 60, 100).unwrap();
    scores::record_score(&state, "alice", "math", 90, 100).unwrap();
    scores::record_score(&state, "alice", "science", 40, 50).unwrap();
    scores::record_score(&state, "bob", "math", 95, 100).unwrap();

    let math = scores::leaderboard(&state, "math").unwrap();
    assert_eq!(math[0].username, "bob");
    assert_eq!(math[1].username, "alice");
    assert!((math[1].percentage - 90.0).abs() < 1e-9);

    let all = scores::leaderboard(&state, "ALL").unwrap();
    let alice = all.iter().find(|e| e.username == "alice").unwrap();
    assert_eq!((alice.best_score, alice.best_total), (130, 150));
    assert!((alice.percentage - 86.67).abs() < 0.01);
    assert_eq!(all[0].username, "bob");

    // History is append-only.
    let history = scores::user_score_history(&state, "alice").unwrap();
    let math_scores: Vec<u32> = history["math"].iter().map(|r| r.score).collect();
    assert_eq!(math_scores, vec![60, 90]);

    fs::remove_dir_all(dir).ok();
}

#[test]
fn all_leaderboard_handles_totals_past_u32_range() {
    let state = AppState::new(MemoryStore::with_config(config(5))).unwrap();
    scores::record_score(&state, "alice", "math", u32::MAX, u32::MAX).unwrap();
    scores::record_score(&state, "alice", "science", 1, 1).unwrap();

    for _ in 0..2 {
        let board = scores::leaderboard(&state, "ALL").unwrap();
        assert_eq!(board[0].best_total, u64::from(u32::MAX) + 1);
        assert!((board[0].percentage - 100.0).abs() < 1e-9);
    }
}

#[test]
fn record_score_validates_input() {
    let (state, _, dir) = spawn_app(10);

    assert!(matches!(
        scores::record_score(&state, "alice", "math", 5, 4),
        Err(AppError::Validation { .. })
    ));
    assert!(matches!(
        scores::record_score(&state, "alice", "math", 0, 0),
        Err(AppError::Validation { .. })
    ));
    assert!(matches!(
        scores::record_score(&state, "alice", "history", 1, 1),
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(scores::leaderboard(&state, "history"), Err(AppError::NotFound(_))));
    assert!(scores::user_score_history(&state, "alice").unwrap().is_empty());

    fs::remove_dir_all(dir).ok();
}

#[test]
fn registering_twice_keeps_the_first_record() {
    let (state, store, dir) = spawn_app(10);
    let request = || CreateUserRequest {
        username: "alice".to_string(),
        password: "first-pass".to_string(),
    };

    let user = auth::register_user(&state, request()).unwrap();
    assert_eq!(user.role, Role::User);
    let first_hash = store.load_users().unwrap()["alice"].password_hash.clone();

    let err = auth::register_user(
        &state,
        CreateUserRequest {
            username: "alice".to_string(),
            password: "second-pass".to_string(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Duplicate(_)));

    let users = store.load_users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users["alice"].password_hash, first_hash);

    let logged_in = auth::authenticate_user(
        &state,
        LoginRequest {
            username: "alice".to_string(),
            password: "first-pass".to_string(),
        },
    )
    .unwrap();
    assert_eq!(logged_in, player("alice"));

    fs::remove_dir_all(dir).ok();
}

#[test]
fn bad_credentials_and_usernames_are_rejected() {
    let (state, _, dir) = spawn_app(10);
    auth::register_user(
        &state,
        CreateUserRequest {
            username: "carol".to_string(),
            password: "secret1".to_string(),
        },
    )
    .unwrap();

    let wrong = auth::authenticate_user(
        &state,
        LoginRequest {
            username: "carol".to_string(),
            password: "secret2".to_string(),
        },
    );
    assert!(matches!(wrong, Err(AppError::AuthError(_))));

    let unknown = auth::authenticate_user(
        &state,
        LoginRequest {
            username: "nobody".to_string(),
            password: "secret1".to_string(),
        },
    );
    assert!(matches!(unknown, Err(AppError::AuthError(_))));

    let bad_name = auth::register_user(
        &state,
        CreateUserRequest {
            username: "bad name!".to_string(),
            password: "secret1".to_string(),
        },
    );
    assert!(matches!(bad_name, Err(AppError::Validation { ref field, .. }) if field == "username"));

    fs::remove_dir_all(dir).ok();
}

#[test]
fn admin_management_and_analytics() {
    let state = AppState::new(MemoryStore::with_config(config(10))).unwrap();

    assert!(admin::seed_admin_user(&state, "root_admin", "rootpass").unwrap());
    assert!(!admin::seed_admin_user(&state, "root_admin", "rootpass").unwrap());

    let created = admin::create_user(
        &state,
        &admin(),
        AdminCreateUserRequest {
            username: "dave".to_string(),
            password: "davepass".to_string(),
            role: Role::User,
        },
    )
    .unwrap();
    assert_eq!(created.username, "dave");
    assert!(matches!(
        admin::list_users(&state, &player("dave")),
        Err(AppError::AuthError(_))
    ));
    assert_eq!(admin::list_users(&state, &admin()).unwrap().len(), 2);

    scores::record_score(&state, "dave", "math", 1, 2).unwrap();
    scores::record_score(&state, "dave", "science", 2, 2).unwrap();

    let analytics = scores::analytics(&state, &admin()).unwrap();
    assert_eq!(analytics.total_users, 2);
    assert_eq!(analytics.total_topics, 2);
    assert_eq!(analytics.users_who_took_any_quiz, 1);
    assert_eq!(analytics.per_topic_participant_count["math"], 1);
    assert_eq!(analytics.per_topic_participant_count["science"], 1);

    let progress = scores::user_progress(&state, "dave").unwrap();
    assert_eq!(progress.len(), 2);
    assert!(progress.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}
