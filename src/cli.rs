// src/cli.rs

//! Text front end. It only calls handlers and never touches storage itself.

use std::io::{self, BufRead, ErrorKind, Write};

use crate::{
    config::ALL_TOPICS,
    error::AppError,
    handlers::{admin, auth, bank, config::list_topics, quiz, scores},
    models::{
        question::QuestionDraft,
        user::{AuthenticatedUser, CreateUserRequest, LoginRequest},
    },
    state::AppState,
};

/// Current screen. The logged-in user travels with it instead of living in
/// shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Auth,
    UserMenu(AuthenticatedUser),
    AdminMenu(AuthenticatedUser),
    Exit,
}

pub struct Cli<'a, R, W> {
    state: &'a AppState,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Cli<'a, R, W> {
    pub fn new(state: &'a AppState, input: R, out: W) -> Self {
        Self { state, input, out }
    }

    /// Runs screens until the user exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        let mut screen = Screen::Auth;
        loop {
            let next = match screen {
                Screen::Auth => self.auth_screen(),
                Screen::UserMenu(user) => self.user_menu(user),
                Screen::AdminMenu(user) => self.admin_menu(user),
                Screen::Exit => return Ok(()),
            };
            screen = match next {
                Ok(screen) => screen,
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(()),
                Err(e) => return Err(e),
            };
        }
    }

    fn prompt(&mut self, label: &str) -> io::Result<String> {
        write!(self.out, "{}: ", label)?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    fn report(&mut self, err: &AppError) -> io::Result<()> {
        writeln!(self.out, "Error: {}", err)
    }

    fn menu(&mut self, title: &str, entries: &[&str]) -> io::Result<usize> {
        writeln!(self.out, "\n== {} ==", title)?;
        for (i, entry) in entries.iter().enumerate() {
            writeln!(self.out, "{}. {}", i + 1, entry)?;
        }
        loop {
            let choice = self.prompt("Choose")?;
            match choice.parse::<usize>() {
                Ok(n) if (1..=entries.len()).contains(&n) => return Ok(n),
                _ => writeln!(self.out, "Please enter a number from 1 to {}", entries.len())?,
            }
        }
    }

    fn home(user: AuthenticatedUser) -> Screen {
        if user.is_admin() {
            Screen::AdminMenu(user)
        } else {
            Screen::UserMenu(user)
        }
    }

    fn auth_screen(&mut self) -> io::Result<Screen> {
        match self.menu("Quiz Application", &["Login", "Register", "Exit"])? {
            1 => {
                let username = self.prompt("Username")?;
                let password = self.prompt("Password")?;
                match auth::authenticate_user(self.state, LoginRequest { username, password }) {
                    Ok(user) => {
                        writeln!(self.out, "Welcome, {}!", user.username)?;
                        Ok(Self::home(user))
                    }
                    Err(e) => {
                        self.report(&e)?;
                        Ok(Screen::Auth)
                    }
                }
            }
            2 => {
                let username = self.prompt("Username")?;
                let password = self.prompt("Password")?;
                match auth::register_user(self.state, CreateUserRequest { username, password }) {
                    Ok(user) => writeln!(self.out, "Registered '{}'. You can log in now.", user.username)?,
                    Err(e) => self.report(&e)?,
                }
                Ok(Screen::Auth)
            }
            _ => Ok(Screen::Exit),
        }
    }

    fn user_menu(&mut self, user: AuthenticatedUser) -> io::Result<Screen> {
        let entries = ["Take quiz", "Leaderboard", "My scores", "Logout"];
        match self.menu(&format!("Hello {}", user.username), &entries)? {
            1 => self.take_quiz(&user)?,
            2 => self.show_leaderboard()?,
            3 => self.show_history(&user)?,
            _ => return Ok(Screen::Auth),
        }
        Ok(Screen::UserMenu(user))
    }

    fn admin_menu(&mut self, user: AuthenticatedUser) -> io::Result<Screen> {
        let entries = [
            "Add question",
            "Delete question",
            "List questions",
            "Leaderboard",
            "Analytics",
            "Users",
            "Logout",
        ];
        match self.menu("Admin", &entries)? {
            1 => self.add_question(&user)?,
            2 => self.delete_question(&user)?,
            3 => self.list_questions()?,
            4 => self.show_leaderboard()?,
            5 => self.show_analytics(&user)?,
            6 => self.show_users(&user)?,
            _ => return Ok(Screen::Auth),
        }
        Ok(Screen::AdminMenu(user))
    }

    /// `None` when no topic is configured.
    fn choose_topic(&mut self, allow_all: bool) -> io::Result<Option<String>> {
        let mut topics = list_topics(self.state);
        if topics.is_empty() {
            writeln!(self.out, "No topics available")?;
            return Ok(None);
        }
        if allow_all {
            topics.insert(0, ALL_TOPICS.to_string());
        }
        let labels: Vec<&str> = topics.iter().map(String::as_str).collect();
        let choice = self.menu("Select topic", &labels)?;
        Ok(Some(topics[choice - 1].clone()))
    }

    fn take_quiz(&mut self, user: &AuthenticatedUser) -> io::Result<()> {
        let Some(topic) = self.choose_topic(false)? else {
            return Ok(());
        };
        let mut session = match quiz::begin_session(self.state, &topic) {
            Ok(session) => session,
            Err(e) => return self.report(&e),
        };

        while let Some((index, question)) = session.current() {
            writeln!(self.out, "\nQ{}: {}", index + 1, question.question)?;
            for (key, text) in &question.options {
                writeln!(self.out, "  {}. {}", key, text)?;
            }
            loop {
                let chosen = self.prompt("Your answer (1-4)")?;
                match quiz::submit_answer(&mut session, index, &chosen) {
                    Ok(outcome) if outcome.correct => {
                        writeln!(self.out, "Correct!")?;
                        break;
                    }
                    Ok(outcome) => {
                        writeln!(
                            self.out,
                            "Wrong! Correct answer: {}. {}",
                            outcome.correct_key, outcome.correct_text
                        )?;
                        break;
                    }
                    Err(e) => self.report(&e)?,
                }
            }
        }

        match quiz::finish_session(self.state, user, &mut session) {
            Ok(result) => writeln!(
                self.out,
                "\nYour score for '{}': {}/{}",
                result.topic, result.score, result.total
            ),
            Err(e) => self.report(&e),
        }
    }

    fn show_leaderboard(&mut self) -> io::Result<()> {
        let Some(topic) = self.choose_topic(true)? else {
            return Ok(());
        };
        match scores::leaderboard(self.state, &topic) {
            Ok(board) if board.is_empty() => writeln!(self.out, "No scores yet"),
            Ok(board) => {
                for (rank, entry) in board.iter().enumerate() {
                    writeln!(
                        self.out,
                        "{}. {:<20} {}/{}  {:.2}%",
                        rank + 1,
                        entry.username,
                        entry.best_score,
                        entry.best_total,
                        entry.percentage
                    )?;
                }
                Ok(())
            }
            Err(e) => self.report(&e),
        }
    }

    fn show_history(&mut self, user: &AuthenticatedUser) -> io::Result<()> {
        match scores::user_progress(self.state, &user.username) {
            Ok(points) if points.is_empty() => writeln!(self.out, "No score data available"),
            Ok(points) => {
                for p in points {
                    writeln!(
                        self.out,
                        "{}  {:<20} {:.2}%",
                        p.timestamp.format("%Y-%m-%d %H:%M"),
                        p.topic,
                        p.percentage
                    )?;
                }
                Ok(())
            }
            Err(e) => self.report(&e),
        }
    }

    fn add_question(&mut self, user: &AuthenticatedUser) -> io::Result<()> {
        let Some(topic) = self.choose_topic(false)? else {
            return Ok(());
        };
        let text = self.prompt("Question")?;
        let mut options = Vec::with_capacity(4);
        for key in 1..=4 {
            options.push(self.prompt(&format!("Option {}", key))?);
        }
        let answer = self.prompt("Correct option (1-4)")?;

        let draft = QuestionDraft::new(
            &text,
            [
                options[0].as_str(),
                options[1].as_str(),
                options[2].as_str(),
                options[3].as_str(),
            ],
            &answer,
        );
        match bank::add_question(self.state, user, &topic, draft) {
            Ok(id) => writeln!(self.out, "Question added with ID: {}", id),
            Err(e) => self.report(&e),
        }
    }

    fn delete_question(&mut self, user: &AuthenticatedUser) -> io::Result<()> {
        let Some(topic) = self.choose_topic(false)? else {
            return Ok(());
        };
        let id = self.prompt("Question ID")?;
        match bank::delete_question(self.state, user, &topic, &id) {
            Ok(()) => writeln!(self.out, "Question deleted"),
            Err(e) => self.report(&e),
        }
    }

    fn list_questions(&mut self) -> io::Result<()> {
        let Some(topic) = self.choose_topic(false)? else {
            return Ok(());
        };
        match bank::list_questions(self.state, &topic) {
            Ok(questions) if questions.is_empty() => writeln!(self.out, "No questions yet"),
            Ok(questions) => {
                for record in questions {
                    writeln!(self.out, "[{}] {}", record.id, record.question.question)?;
                    for (key, text) in record.question.options_in_order() {
                        let mark = if key == record.question.answer { "*" } else { " " };
                        writeln!(self.out, " {} {}. {}", mark, key, text)?;
                    }
                }
                Ok(())
            }
            Err(e) => self.report(&e),
        }
    }

    fn show_analytics(&mut self, user: &AuthenticatedUser) -> io::Result<()> {
        match scores::analytics(self.state, user) {
            Ok(a) => {
                writeln!(self.out, "Total Users: {}", a.total_users)?;
                writeln!(self.out, "Total Topics: {}", a.total_topics)?;
                writeln!(self.out, "Users Who Took Quizzes: {}", a.users_who_took_any_quiz)?;
                writeln!(self.out, "Per-Topic Activity:")?;
                for (topic, count) in &a.per_topic_participant_count {
                    writeln!(self.out, "  {}: {} users", topic, count)?;
                }
                Ok(())
            }
            Err(e) => self.report(&e),
        }
    }

    fn show_users(&mut self, user: &AuthenticatedUser) -> io::Result<()> {
        match admin::list_users(self.state, user) {
            Ok(users) => {
                for u in users {
                    writeln!(self.out, "{:<20} {}", u.username, u.role)?;
                }
                Ok(())
            }
            Err(e) => self.report(&e),
        }
    }
}
