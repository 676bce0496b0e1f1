//! Application state controller
//!
//! Holds the in-memory state slices (user, tasks, history, chat, transient
//! UI flags) and wires user actions to the day-cycle engine, the chat
//! orchestrator, and the persistent store. This is the sole writer of the
//! store: every mutation of a persisted slice is followed by a save of that
//! slice within the same method, so durable state is never observably stale
//! after a completed action.

use crate::chat::ChatOrchestrator;
use crate::day_cycle;
use crate::error::{ElevateError, Result};
use crate::model::{ChatMessage, HistoryLog, Task, Theme, UserProfile, VoiceGender};
use crate::providers::{Coach, CoachContext, VoicePlayer};
use crate::store::{Store, KEY_CHAT, KEY_HISTORY, KEY_TASKS, KEY_USER};
use chrono::Local;

/// The application state controller
pub struct App {
    store: Store,
    coach: ChatOrchestrator,
    user: Option<UserProfile>,
    tasks: Vec<Task>,
    history: Vec<HistoryLog>,
    chat: Vec<ChatMessage>,
    focus_mode: bool,
    chat_open: bool,
}

impl App {
    /// Build the controller, restoring all slices from the store
    ///
    /// Each slice is loaded independently; a missing or unreadable slice
    /// comes back as its default without failing the others.
    pub fn new(store: Store, coach: Box<dyn Coach>, voice: Box<dyn VoicePlayer>) -> Self {
        let snapshot = store.load_snapshot();
        tracing::debug!(
            "Restored state: user={}, {} tasks, {} logs, {} messages",
            snapshot.user.is_some(),
            snapshot.tasks.len(),
            snapshot.history.len(),
            snapshot.chat.len()
        );

        Self {
            store,
            coach: ChatOrchestrator::new(coach, voice),
            user: snapshot.user,
            tasks: snapshot.tasks,
            history: snapshot.history,
            chat: snapshot.chat,
            focus_mode: false,
            chat_open: false,
        }
    }

    /// Current user profile, if logged in
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// Whether a user is logged in
    pub fn is_logged_in(&self) -> bool {
        self.user.as_ref().map(|u| u.is_logged_in).unwrap_or(false)
    }

    /// Active task list
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Archived day logs, most recent first
    pub fn history(&self) -> &[HistoryLog] {
        &self.history
    }

    /// Chat transcript, chronological
    pub fn chat(&self) -> &[ChatMessage] {
        &self.chat
    }

    /// Whether a coach reply is pending
    pub fn is_thinking(&self) -> bool {
        self.coach.is_thinking()
    }

    /// Whether focus mode is active (transient, never persisted)
    pub fn focus_mode(&self) -> bool {
        self.focus_mode
    }

    /// Whether the chat panel is open (transient, never persisted)
    pub fn is_chat_open(&self) -> bool {
        self.chat_open
    }

    /// Enter or leave focus mode
    pub fn set_focus(&mut self, active: bool) {
        self.focus_mode = active;
    }

    /// Open or close the chat panel
    pub fn set_chat_open(&mut self, open: bool) {
        self.chat_open = open;
    }

    /// Log in with a display name
    ///
    /// Creates a fully onboarded profile with default preferences, seeds the
    /// transcript with the welcome message, and plays the welcome voice
    /// line.
    ///
    /// # Errors
    ///
    /// Returns `ElevateError::InvalidInput` for an empty name
    pub async fn login(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ElevateError::InvalidInput("name must not be empty".to_string()).into());
        }

        let now = Local::now();
        let profile = UserProfile::onboard(name);
        let voice = profile.preferences.voice;

        self.store.save(KEY_USER, &profile)?;
        self.user = Some(profile);

        self.chat = vec![self.coach.welcome(name, now)];
        self.store.save(KEY_CHAT, &self.chat)?;

        tracing::info!("User logged in: {}", name);
        self.coach
            .speak(&format!("Welcome {}. I am ready.", name), voice)
            .await;
        Ok(())
    }

    /// Log out, clearing the store and all in-memory state unconditionally
    ///
    /// The in-memory reset stands in for the original full restart: after a
    /// clear, no stale slice can ever be re-saved.
    pub fn logout(&mut self) -> Result<()> {
        self.store.clear()?;
        self.user = None;
        self.tasks.clear();
        self.history.clear();
        self.chat.clear();
        self.focus_mode = false;
        self.chat_open = false;
        tracing::info!("User logged out, state cleared");
        Ok(())
    }

    /// Add a new task with zero progress
    ///
    /// # Errors
    ///
    /// Returns `ElevateError::InvalidInput` for an empty title or zero goal
    pub fn add_task(&mut self, title: &str, goal: u32, unit: &str) -> Result<Task> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ElevateError::InvalidInput("title must not be empty".to_string()).into());
        }
        if goal == 0 {
            return Err(ElevateError::InvalidInput("goal must be positive".to_string()).into());
        }

        let task = Task::new(title, goal, unit, Local::now());
        self.tasks.push(task.clone());
        self.store.save(KEY_TASKS, &self.tasks)?;
        Ok(task)
    }

    /// Record progress against a task
    ///
    /// When the task first reaches its goal and notifications are enabled,
    /// the completion line is spoken in the preferred voice.
    ///
    /// # Errors
    ///
    /// Returns `ElevateError::InvalidInput` for an unknown task id
    pub async fn record_progress(&mut self, task_id: &str, amount: u32) -> Result<()> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| ElevateError::InvalidInput(format!("no task with id {}", task_id)))?;

        let was_done = task.is_done();
        task.completed = task.completed.saturating_add(amount);
        task.last_updated = Local::now().to_rfc3339();
        let just_completed = !was_done && task.is_done();
        let title = task.title.clone();

        self.store.save(KEY_TASKS, &self.tasks)?;

        let notify = self
            .user
            .as_ref()
            .map(|u| u.preferences.notifications)
            .unwrap_or(false);
        if just_completed && notify {
            let voice = self.preferred_voice();
            self.coach
                .speak(&format!("Task {} completed. Great job!", title), voice)
                .await;
        }
        Ok(())
    }

    /// Close the current day-cycle
    ///
    /// Archives a snapshot (most-recent-first), resets progress for the next
    /// cycle, appends the judgment message to the transcript, and speaks it.
    /// Returns the completion rate, or `None` for an empty task list (silent
    /// no-op).
    pub async fn end_day(&mut self) -> Result<Option<u8>> {
        let now = Local::now();
        let Some(close) = day_cycle::end_day(&self.tasks, now) else {
            return Ok(None);
        };

        let rate = close.log.completion_rate;
        self.history.insert(0, close.log);
        self.tasks = close.reset_tasks;
        self.store.save(KEY_HISTORY, &self.history)?;
        self.store.save(KEY_TASKS, &self.tasks)?;

        self.chat_open = true;
        let message = day_cycle::judgment_message(rate);
        self.chat.push(ChatMessage::model(&message, now));
        self.store.save(KEY_CHAT, &self.chat)?;

        let voice = self.preferred_voice();
        self.coach.speak(&message, voice).await;
        Ok(Some(rate))
    }

    /// Send a message to the coach
    ///
    /// Two-phase append: the user turn commits (and persists) before the
    /// collaborator is invoked, the model turn commits once it resolves. A
    /// coach failure still yields a model turn with a fallback string.
    ///
    /// # Errors
    ///
    /// Returns `ElevateError::NotLoggedIn` without a user, or
    /// `ElevateError::ReplyInFlight` while a previous send is pending
    pub async fn send_message(&mut self, text: &str) -> Result<ChatMessage> {
        if !self.is_logged_in() {
            return Err(ElevateError::NotLoggedIn.into());
        }

        let user_message = self.coach.begin_send(text, Local::now())?;
        self.chat.push(user_message);
        self.store.save(KEY_CHAT, &self.chat)?;

        let ctx = CoachContext {
            tasks: &self.tasks,
            history: &self.history,
            voice: self
                .user
                .as_ref()
                .map(|u| u.preferences.voice)
                .unwrap_or(VoiceGender::Female),
        };
        let reply = self.coach.complete_send(text, ctx, Local::now()).await;

        self.chat.push(reply.clone());
        self.store.save(KEY_CHAT, &self.chat)?;
        Ok(reply)
    }

    /// Flip the color theme preference
    ///
    /// Mutates only the nested preferences; all other profile fields stay
    /// untouched.
    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let user = self.user.as_mut().ok_or(ElevateError::NotLoggedIn)?;
        user.preferences.theme = user.preferences.theme.toggled();
        let theme = user.preferences.theme;
        self.store.save(KEY_USER, user)?;
        Ok(theme)
    }

    /// Set the voice preference
    pub fn set_voice(&mut self, voice: VoiceGender) -> Result<()> {
        let user = self.user.as_mut().ok_or(ElevateError::NotLoggedIn)?;
        user.preferences.voice = voice;
        self.store.save(KEY_USER, user)?;
        Ok(())
    }

    /// Flip the notifications preference
    pub fn toggle_notifications(&mut self) -> Result<bool> {
        let user = self.user.as_mut().ok_or(ElevateError::NotLoggedIn)?;
        user.preferences.notifications = !user.preferences.notifications;
        let enabled = user.preferences.notifications;
        self.store.save(KEY_USER, user)?;
        Ok(enabled)
    }

    fn preferred_voice(&self) -> VoiceGender {
        self.user
            .as_ref()
            .map(|u| u.preferences.voice)
            .unwrap_or(VoiceGender::Female)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Role, WELCOME_MESSAGE_ID};
    use crate::test_utils::{FailingCoach, RecordingVoice, ScriptedCoach};
    use tempfile::tempdir;

    fn test_app(dir: &tempfile::TempDir) -> App {
        let store = Store::open(dir.path().join("state.db")).expect("open failed");
        App::new(
            store,
            Box::new(ScriptedCoach::new("Keep at it!")),
            Box::new(RecordingVoice::default()),
        )
    }

    #[tokio::test]
    async fn test_login_seeds_welcome_and_profile() {
        let dir = tempdir().expect("tempdir failed");
        let mut app = test_app(&dir);

        app.login("Sam").await.expect("login failed");

        let user = app.user().expect("no user");
        assert_eq!(user.name, "Sam");
        assert!(user.is_logged_in);
        assert!(user.onboarded);

        assert_eq!(app.chat().len(), 1);
        assert_eq!(app.chat()[0].id, WELCOME_MESSAGE_ID);
        assert_eq!(app.chat()[0].role, Role::Model);
    }

    #[tokio::test]
    async fn test_login_rejects_empty_name() {
        let dir = tempdir().expect("tempdir failed");
        let mut app = test_app(&dir);
        assert!(app.login("   ").await.is_err());
        assert!(app.user().is_none());
    }

    #[tokio::test]
    async fn test_state_survives_restart() {
        let dir = tempdir().expect("tempdir failed");
        {
            let mut app = test_app(&dir);
            app.login("Sam").await.expect("login failed");
            app.add_task("Read", 20, "pages").expect("add failed");
        }

        let app = test_app(&dir);
        assert!(app.is_logged_in());
        assert_eq!(app.tasks().len(), 1);
        assert_eq!(app.tasks()[0].title, "Read");
        assert_eq!(app.chat().len(), 1);
    }

    #[tokio::test]
    async fn test_logout_clears_store_and_memory() {
        let dir = tempdir().expect("tempdir failed");
        {
            let mut app = test_app(&dir);
            app.login("Sam").await.expect("login failed");
            app.add_task("Read", 20, "pages").expect("add failed");
            app.logout().expect("logout failed");
            assert!(app.user().is_none());
            assert!(app.tasks().is_empty());
            assert!(app.chat().is_empty());
        }

        let app = test_app(&dir);
        assert!(!app.is_logged_in());
        assert!(app.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_add_task_validates_input() {
        let dir = tempdir().expect("tempdir failed");
        let mut app = test_app(&dir);
        assert!(app.add_task("", 10, "pages").is_err());
        assert!(app.add_task("Read", 0, "pages").is_err());
        assert!(app.add_task("Read", 10, "pages").is_ok());
    }

    #[tokio::test]
    async fn test_record_progress_updates_task() {
        let dir = tempdir().expect("tempdir failed");
        let mut app = test_app(&dir);
        app.login("Sam").await.expect("login failed");
        let id = app.add_task("Read", 20, "pages").expect("add failed").id.clone();

        app.record_progress(&id, 8).await.expect("progress failed");
        assert_eq!(app.tasks()[0].completed, 8);

        assert!(app.record_progress("missing", 1).await.is_err());
    }

    #[tokio::test]
    async fn test_completion_voice_respects_notifications() {
        let dir = tempdir().expect("tempdir failed");
        let store = Store::open(dir.path().join("state.db")).expect("open failed");
        let voice = RecordingVoice::default();
        let played = voice.played();
        let mut app = App::new(
            store,
            Box::new(ScriptedCoach::new("ok")),
            Box::new(voice),
        );

        app.login("Sam").await.expect("login failed");
        played.lock().unwrap().clear(); // drop the welcome line

        let id = app.add_task("Run", 5, "km").expect("add failed").id.clone();
        app.record_progress(&id, 5).await.expect("progress failed");
        assert_eq!(played.lock().unwrap().len(), 1);
        assert!(played.lock().unwrap()[0].0.contains("Run"));

        // Already done: a further update must not speak again
        app.record_progress(&id, 1).await.expect("progress failed");
        assert_eq!(played.lock().unwrap().len(), 1);

        // Notifications off: completing another task stays silent
        app.toggle_notifications().expect("toggle failed");
        let id2 = app.add_task("Read", 2, "pages").expect("add failed").id.clone();
        app.record_progress(&id2, 2).await.expect("progress failed");
        assert_eq!(played.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_end_day_empty_is_noop() {
        let dir = tempdir().expect("tempdir failed");
        let mut app = test_app(&dir);
        app.login("Sam").await.expect("login failed");

        let rate = app.end_day().await.expect("end_day failed");
        assert!(rate.is_none());
        assert!(app.history().is_empty());
    }

    #[tokio::test]
    async fn test_end_day_archives_and_resets() {
        let dir = tempdir().expect("tempdir failed");
        let mut app = test_app(&dir);
        app.login("Sam").await.expect("login failed");
        let a = app.add_task("Read", 10, "pages").expect("add failed").id.clone();
        let b = app.add_task("Run", 20, "km").expect("add failed").id.clone();
        app.record_progress(&a, 8).await.expect("progress failed");
        app.record_progress(&b, 12).await.expect("progress failed");

        let rate = app.end_day().await.expect("end_day failed");
        assert_eq!(rate, Some(67));

        assert_eq!(app.history().len(), 1);
        assert_eq!(app.history()[0].completion_rate, 67);
        assert!(app.tasks().iter().all(|t| t.completed == 0));
        assert!(app.is_chat_open());

        let last = app.chat().last().expect("no judgment message");
        assert_eq!(last.role, Role::Model);
        assert!(last.text.contains("67% completion"));
        assert!(last.text.contains("Solid effort"));
    }

    #[tokio::test]
    async fn test_history_is_most_recent_first() {
        let dir = tempdir().expect("tempdir failed");
        let mut app = test_app(&dir);
        app.login("Sam").await.expect("login failed");
        let id = app.add_task("Read", 10, "pages").expect("add failed").id.clone();

        app.record_progress(&id, 5).await.expect("progress failed");
        app.end_day().await.expect("end_day failed");
        app.record_progress(&id, 10).await.expect("progress failed");
        app.end_day().await.expect("end_day failed");

        assert_eq!(app.history().len(), 2);
        // Second close is first in the sequence
        assert_eq!(app.history()[0].completion_rate, 100);
        assert_eq!(app.history()[1].completion_rate, 50);
    }

    #[tokio::test]
    async fn test_archived_snapshot_is_independent_of_live_edits() {
        let dir = tempdir().expect("tempdir failed");
        let mut app = test_app(&dir);
        app.login("Sam").await.expect("login failed");
        let id = app.add_task("Read", 10, "pages").expect("add failed").id.clone();
        app.record_progress(&id, 8).await.expect("progress failed");
        app.end_day().await.expect("end_day failed");

        app.record_progress(&id, 3).await.expect("progress failed");
        assert_eq!(app.history()[0].tasks[0].completed, 8);
        assert_eq!(app.tasks()[0].completed, 3);
    }

    #[tokio::test]
    async fn test_send_message_appends_user_then_model() {
        let dir = tempdir().expect("tempdir failed");
        let mut app = test_app(&dir);
        app.login("Sam").await.expect("login failed");

        let before = app.chat().len();
        let reply = app.send_message("How am I doing?").await.expect("send failed");
        assert_eq!(reply.text, "Keep at it!");

        let appended = &app.chat()[before..];
        assert_eq!(appended.len(), 2);
        assert_eq!(appended[0].role, Role::User);
        assert_eq!(appended[0].text, "How am I doing?");
        assert_eq!(appended[1].role, Role::Model);
    }

    #[tokio::test]
    async fn test_send_message_on_coach_failure_still_appends_two() {
        let dir = tempdir().expect("tempdir failed");
        let store = Store::open(dir.path().join("state.db")).expect("open failed");
        let mut app = App::new(
            store,
            Box::new(FailingCoach),
            Box::new(RecordingVoice::default()),
        );
        app.login("Sam").await.expect("login failed");

        let before = app.chat().len();
        let reply = app.send_message("hello?").await.expect("send failed");
        assert_eq!(app.chat().len(), before + 2);
        assert_eq!(reply.role, Role::Model);
        assert!(!app.is_thinking());
    }

    #[tokio::test]
    async fn test_send_message_requires_login() {
        let dir = tempdir().expect("tempdir failed");
        let mut app = test_app(&dir);
        assert!(app.send_message("hi").await.is_err());
    }

    #[tokio::test]
    async fn test_toggles_mutate_only_preferences() {
        let dir = tempdir().expect("tempdir failed");
        let mut app = test_app(&dir);
        app.login("Sam").await.expect("login failed");

        let theme = app.toggle_theme().expect("toggle failed");
        assert_eq!(theme, Theme::Dark);
        app.set_voice(VoiceGender::Male).expect("set_voice failed");

        let user = app.user().expect("no user");
        assert_eq!(user.name, "Sam");
        assert!(user.is_logged_in);
        assert!(user.onboarded);
        assert_eq!(user.preferences.theme, Theme::Dark);
        assert_eq!(user.preferences.voice, VoiceGender::Male);
    }

    #[tokio::test]
    async fn test_toggles_require_login() {
        let dir = tempdir().expect("tempdir failed");
        let mut app = test_app(&dir);
        assert!(app.toggle_theme().is_err());
        assert!(app.set_voice(VoiceGender::Male).is_err());
        assert!(app.toggle_notifications().is_err());
    }

    #[tokio::test]
    async fn test_focus_mode_is_transient() {
        let dir = tempdir().expect("tempdir failed");
        {
            let mut app = test_app(&dir);
            app.set_focus(true);
            assert!(app.focus_mode());
        }
        let app = test_app(&dir);
        assert!(!app.focus_mode());
    }
}
