use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::content::validate::{self, Field, FormInput, ValidationError, TOPIC_MAX_CHARS};
use crate::content::{GeneratedContent, GenerationRequest};
use crate::generation::{Completion, Generator, Outcome};
use crate::llm::CompletionClient;
use crate::theme::Theme;

/// Status messages clear after this long
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Time spent on each loading step before advancing
pub const LOADING_STEP_INTERVAL: Duration = Duration::from_millis(1200);

pub const LOADING_STEPS: [&str; 4] = [
    "Analyzing your writing style",
    "Researching regional trends",
    "Drafting your post",
    "Polishing the output",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    ApiKey,
    Topic,
    ProfileUrl,
    Industry,
    ImageToggle,
    GenerateButton,
}

impl Focus {
    const ORDER: [Focus; 6] = [
        Focus::ApiKey,
        Focus::Topic,
        Focus::ProfileUrl,
        Focus::Industry,
        Focus::ImageToggle,
        Focus::GenerateButton,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        Self::ORDER[self.index().checked_sub(1).unwrap_or(Self::ORDER.len() - 1)]
    }

    /// Text field behind this focus, if it is one
    pub fn field(self) -> Option<Field> {
        match self {
            Focus::ApiKey => Some(Field::ApiKey),
            Focus::Topic => Some(Field::Topic),
            Focus::ProfileUrl => Some(Field::ProfileUrl),
            Focus::Industry => Some(Field::Industry),
            Focus::ImageToggle | Focus::GenerateButton => None,
        }
    }

    fn from_field(field: Field) -> Self {
        match field {
            Field::ApiKey => Focus::ApiKey,
            Field::Topic => Focus::Topic,
            Field::ProfileUrl => Focus::ProfileUrl,
            Field::Industry => Focus::Industry,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Form,
    Loading,
    Results,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
    EditPost,
}

/// How close the topic is to its length limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterLevel {
    Normal,
    Warning,
    Critical,
}

/// A rendered generation and the request that produced it
#[derive(Debug, Clone)]
pub struct Results {
    pub content: GeneratedContent,
    pub request: GenerationRequest,
    /// Post text offered for copying (starts as the extracted post, editable)
    pub post: String,
}

pub struct App {
    pub view: View,
    pub popup: Popup,
    pub focus: Focus,

    // Form
    pub form: FormInput,
    pub field_errors: HashMap<Field, ValidationError>,

    // Output
    pub results: Option<Results>,
    pub results_scroll: u16,
    pub error_message: Option<String>,
    pub edit_buffer: String,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    pub loading_started: Option<Instant>,

    // Config
    pub config: AppConfig,
    config_path: Option<PathBuf>,
    pub theme: Theme,

    pub should_quit: bool,

    generator: Generator,
    // Held for the app's lifetime so copied text outlives the copy call
    clipboard: Option<arboard::Clipboard>,
}

impl App {
    /// `config_path` of `None` keeps preference changes in memory only
    pub fn new(config: AppConfig, config_path: Option<PathBuf>, client: Arc<dyn CompletionClient>) -> Self {
        let theme = Theme::for_mode(config.theme, config.accent.as_deref());
        let generator = Generator::new(client, config.region.clone());

        Self {
            view: View::Form,
            popup: Popup::None,
            focus: Focus::ApiKey,

            form: FormInput::default(),
            field_errors: HashMap::new(),

            results: None,
            results_scroll: 0,
            error_message: None,
            edit_buffer: String::new(),

            status_message: None,
            status_message_time: None,

            loading_started: None,

            config,
            config_path,
            theme,

            should_quit: false,

            generator,
            clipboard: None,
        }
    }

    /// Set a status message (auto-clears after 3 seconds)
    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    pub fn field_error(&self, field: Field) -> Option<&ValidationError> {
        self.field_errors.get(&field)
    }

    /// Topic length and how close it is to the limit
    pub fn topic_counter(&self) -> (usize, CounterLevel) {
        let len = self.form.topic.chars().count();
        let ratio = len as f64 / TOPIC_MAX_CHARS as f64;
        let level = if ratio > 0.9 {
            CounterLevel::Critical
        } else if ratio > 0.7 {
            CounterLevel::Warning
        } else {
            CounterLevel::Normal
        };
        (len, level)
    }

    /// Index of the active loading step
    pub fn loading_step(&self) -> usize {
        let elapsed = self.loading_started.map(|t| t.elapsed()).unwrap_or_default();
        let step = (elapsed.as_millis() / LOADING_STEP_INTERVAL.as_millis()) as usize;
        step.min(LOADING_STEPS.len() - 1)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Theme toggle works everywhere
        if ctrl && key.code == KeyCode::Char('t') {
            self.toggle_theme();
            return Ok(());
        }

        if self.popup != Popup::None {
            return self.handle_popup_key(key);
        }

        match self.view {
            View::Form => self.handle_form_key(key),
            View::Loading => {
                if key.code == KeyCode::Esc && self.generator.is_pending() {
                    self.generator.cancel();
                    self.loading_started = None;
                    self.view = View::Form;
                    self.set_status("Generation cancelled");
                }
                Ok(())
            }
            View::Results => self.handle_results_key(key),
            View::Error => {
                match key.code {
                    KeyCode::Char('r') | KeyCode::Enter => self.retry(),
                    KeyCode::Esc | KeyCode::Char('n') => {
                        self.error_message = None;
                        self.view = View::Form;
                    }
                    KeyCode::Char('q') => self.should_quit = true,
                    KeyCode::Char('?') => self.popup = Popup::Help,
                    _ => {}
                }
                Ok(())
            }
        }
    }

    fn handle_popup_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.popup {
            Popup::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter | KeyCode::Char('q') | KeyCode::F(1)) {
                    self.popup = Popup::None;
                }
            }
            Popup::EditPost => {
                let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                match key.code {
                    KeyCode::Esc => self.popup = Popup::None,
                    KeyCode::Char('s') if ctrl => self.save_edit(),
                    KeyCode::Enter if ctrl => self.save_edit(),
                    KeyCode::Enter => self.edit_buffer.push('\n'),
                    KeyCode::Backspace => {
                        self.edit_buffer.pop();
                    }
                    KeyCode::Char(c) if !ctrl => self.edit_buffer.push(c),
                    _ => {}
                }
            }
            Popup::None => {}
        }
        Ok(())
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('g') if ctrl => self.submit(),
            KeyCode::F(1) => self.popup = Popup::Help,
            KeyCode::Tab | KeyCode::Down => self.move_focus(self.focus.next()),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(self.focus.prev()),
            KeyCode::Enter => match self.focus {
                Focus::GenerateButton => self.submit(),
                Focus::ImageToggle => self.form.generate_image = !self.form.generate_image,
                _ => self.move_focus(self.focus.next()),
            },
            KeyCode::Char(' ') if self.focus == Focus::ImageToggle => {
                self.form.generate_image = !self.form.generate_image;
            }
            KeyCode::Char('?') if self.focus.field().is_none() => self.popup = Popup::Help,
            KeyCode::Char(c) if !ctrl => {
                if let Some(field) = self.focus.field() {
                    self.form.value_mut(field).push(c);
                    self.revalidate(field);
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = self.focus.field() {
                    self.form.value_mut(field).pop();
                    self.revalidate(field);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_results_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('c') => self.copy_post(),
            KeyCode::Char('r') => self.regenerate(),
            KeyCode::Char('e') => self.open_edit(),
            KeyCode::Char('n') | KeyCode::Esc => self.view = View::Form,
            KeyCode::Char('j') | KeyCode::Down => {
                self.results_scroll = self.results_scroll.saturating_add(1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.results_scroll = self.results_scroll.saturating_sub(1);
            }
            KeyCode::Char('?') | KeyCode::F(1) => self.popup = Popup::Help,
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
        Ok(())
    }

    /// Leaving a text field validates it, like a blur
    fn move_focus(&mut self, to: Focus) {
        if let Some(field) = self.focus.field() {
            self.revalidate(field);
        }
        self.focus = to;
    }

    fn revalidate(&mut self, field: Field) {
        match validate::validate_field(&self.form, field) {
            Ok(()) => {
                self.field_errors.remove(&field);
            }
            Err(e) => {
                self.field_errors.insert(field, e);
            }
        }
    }

    /// Validate the form and start a generation
    pub fn submit(&mut self) {
        match validate::validate_form(&self.form) {
            Ok(request) => {
                self.field_errors.clear();
                self.start(request);
            }
            Err(errors) => {
                if let Some(first) = errors.first() {
                    self.focus = Focus::from_field(first.field());
                }
                self.field_errors = errors.into_iter().map(|e| (e.field(), e)).collect();
                self.set_status("Please fix the highlighted fields");
            }
        }
    }

    fn start(&mut self, request: GenerationRequest) {
        self.generator.submit(request);
        self.begin_loading();
    }

    fn begin_loading(&mut self) {
        self.error_message = None;
        self.results = None;
        self.results_scroll = 0;
        self.loading_started = Some(Instant::now());
        self.view = View::Loading;
    }

    /// Same request again, replacing the shown results
    pub fn regenerate(&mut self) {
        if self.generator.resubmit().is_some() {
            self.begin_loading();
        } else {
            self.submit();
        }
    }

    /// Re-issue the request that failed
    pub fn retry(&mut self) {
        self.regenerate();
    }

    fn open_edit(&mut self) {
        if let Some(results) = &self.results {
            self.edit_buffer = results.post.clone();
            self.popup = Popup::EditPost;
        }
    }

    fn save_edit(&mut self) {
        let edited = self.edit_buffer.trim();
        if edited.is_empty() {
            return;
        }
        if let Some(results) = self.results.as_mut() {
            results.post = edited.to_string();
        }
        self.popup = Popup::None;
        self.set_status("Post updated successfully!");
    }

    fn copy_post(&mut self) {
        let Some(post) = self.results.as_ref().map(|r| r.post.clone()) else {
            return;
        };
        match self.write_clipboard(post) {
            Ok(()) => self.set_status("Copied!"),
            Err(e) => {
                tracing::warn!("Clipboard write failed: {}", e);
                self.set_status(format!("Failed to copy content: {}", e));
            }
        }
    }

    fn write_clipboard(&mut self, text: String) -> Result<(), arboard::Error> {
        let clipboard = match self.clipboard.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new()?,
        };
        self.clipboard.insert(clipboard).set_text(text)
    }

    pub fn toggle_theme(&mut self) {
        self.config.theme = self.config.theme.toggled();
        self.theme = Theme::for_mode(self.config.theme, self.config.accent.as_deref());

        if let Some(path) = &self.config_path {
            if let Err(e) = self.config.save_to(path) {
                tracing::warn!("Could not save theme preference: {}", e);
            }
        }
    }

    fn apply_completion(&mut self, completion: Completion) {
        self.loading_started = None;
        match completion.outcome {
            Outcome::Ready(content) => {
                let post = content.post.clone();
                self.results = Some(Results {
                    content,
                    request: completion.request,
                    post,
                });
                self.results_scroll = 0;
                self.view = View::Results;
                self.set_status("Content generated successfully!");
                if self.config.notifications {
                    notify("linkpost", "Your LinkedIn post is ready");
                }
            }
            Outcome::Failed(message) => {
                self.results = None;
                self.error_message = Some(message);
                self.view = View::Error;
            }
        }
    }

    /// Periodic housekeeping: collect finished generations, expire status
    pub fn tick(&mut self) {
        if let Some(completion) = self.generator.try_recv() {
            self.apply_completion(completion);
        }

        if let Some(t) = self.status_message_time {
            if t.elapsed() >= STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    /// Wait for the pending generation and apply it
    #[cfg(test)]
    async fn settle(&mut self) {
        if let Some(completion) = self.generator.recv().await {
            self.apply_completion(completion);
        }
    }
}

fn notify(summary: &str, body: &str) {
    if let Err(e) = notify_rust::Notification::new()
        .summary(summary)
        .body(body)
        .show()
    {
        tracing::warn!("Notification failed: {}", e);
    }
}
