use std::collections::HashMap;

use clap::ValueEnum;
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::backend::{Outcome, Request, Submission};
use crate::config::Config;
use crate::models::{self, ModelDescriptor, INDEPENDENT_MODELS, SHARED_MODELS};
use crate::ui_state::UIState;

/// Shown in a response panel while its request is outstanding
pub const LOADING_TEXT: &str = "Loading...";

/// Shown in a response panel that has never received anything
pub const PLACEHOLDER_TEXT: &str = "Response will appear here";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Variant {
    /// Every model box has its own prompt and submit control
    #[default]
    Independent,
    /// One prompt fans out to all models at once
    Shared,
}

impl Variant {
    pub fn models(self) -> &'static [ModelDescriptor] {
        match self {
            Variant::Independent => INDEPENDENT_MODELS,
            Variant::Shared => SHARED_MODELS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Variant::Independent => "independent prompts",
            Variant::Shared => "shared prompt",
        }
    }
}

/// What the event loop should do after an action
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Continue,
    Dispatch(Submission),
    Quit,
}

pub struct App {
    pub variant: Variant,
    pub config: Config,
    pub prompts: HashMap<&'static str, String>,
    pub shared_prompt: String,
    pub responses: HashMap<&'static str, String>,
    pub loading: HashMap<&'static str, bool>,
    pub ui: UIState,
    pub animation_frame: usize,
    pub animation_tick: u64,
}

impl App {
    pub fn new(variant: Variant, config: Config) -> Self {
        let models = variant.models();

        Self {
            variant,
            config,
            prompts: models.iter().map(|m| (m.id, String::new())).collect(),
            shared_prompt: String::new(),
            responses: HashMap::new(),
            loading: models.iter().map(|m| (m.id, false)).collect(),
            ui: UIState::new(),
            animation_frame: 0,
            animation_tick: 0,
        }
    }

    pub fn models(&self) -> &'static [ModelDescriptor] {
        self.variant.models()
    }

    pub fn focused_model(&self) -> Option<ModelDescriptor> {
        self.models().get(self.ui.focus).copied()
    }

    /// Prompt key for keyboard input: the focused model, or the shared prompt
    pub fn input_target(&self) -> Option<&'static str> {
        match self.variant {
            Variant::Independent => self.focused_model().map(|m| m.id),
            Variant::Shared => None,
        }
    }

    pub fn prompt(&self, model_id: Option<&str>) -> &str {
        match model_id {
            Some(id) => self.prompts.get(id).map(String::as_str).unwrap_or(""),
            None => &self.shared_prompt,
        }
    }

    fn prompt_mut(&mut self, model_id: Option<&str>) -> Option<&mut String> {
        match model_id {
            Some(id) => self.prompts.get_mut(id),
            None => Some(&mut self.shared_prompt),
        }
    }

    pub fn is_loading(&self, model_id: &str) -> bool {
        self.loading.get(model_id).copied().unwrap_or(false)
    }

    pub fn any_loading(&self) -> bool {
        self.loading.values().any(|l| *l)
    }

    /// Current panel text, `None` when nothing has been received yet
    pub fn response(&self, model_id: &str) -> Option<&str> {
        self.responses
            .get(model_id)
            .map(String::as_str)
            .filter(|r| !r.is_empty())
    }

    /// Independent prompts are read-only while their request is in flight.
    pub fn prompt_editable(&self, model_id: Option<&str>) -> bool {
        match model_id {
            Some(id) => !self.is_loading(id),
            None => true,
        }
    }

    /// Submit is disabled while loading or while the prompt is blank.
    pub fn can_submit(&self, model_id: Option<&str>) -> bool {
        if self.prompt(model_id).trim().is_empty() {
            return false;
        }
        match (self.variant, model_id) {
            (Variant::Independent, Some(id)) => {
                models::find(self.models(), id).is_some() && !self.is_loading(id)
            }
            (Variant::Shared, None) => !self.any_loading(),
            _ => false,
        }
    }

    pub fn edit_prompt(&mut self, model_id: Option<&str>, text: String) {
        if let Some(prompt) = self.prompt_mut(model_id) {
            *prompt = text;
        }
    }

    /// Accept a submit if its preconditions hold. Marks the model(s) loading,
    /// shows the loading sentinel, and returns the requests to issue.
    pub fn submit(&mut self, model_id: Option<&str>) -> Option<Submission> {
        if !self.can_submit(model_id) {
            debug!(model = ?model_id, "submit ignored");
            return None;
        }

        match model_id {
            Some(id) => {
                let model = models::find(self.models(), id)?;
                let port = self.config.port_for(model.id);
                let url = self.config.endpoint(model.id, port, self.prompt(Some(model.id)));
                info!(
                    model = model.id,
                    port,
                    prompt_len = self.prompt(Some(model.id)).len(),
                    "submitting"
                );

                self.mark_loading(model.id);
                Some(Submission::Single(Request {
                    model_id: model.id,
                    url,
                }))
            }
            None => {
                let port = self.config.shared_port;
                let requests: Vec<Request> = self
                    .models()
                    .iter()
                    .map(|m| Request {
                        model_id: m.id,
                        url: self.config.endpoint(m.id, port, &self.shared_prompt),
                    })
                    .collect();
                info!(
                    models = requests.len(),
                    port,
                    prompt_len = self.shared_prompt.len(),
                    "submitting to all models"
                );

                for model in self.models() {
                    self.mark_loading(model.id);
                }
                Some(Submission::Fanout(requests))
            }
        }
    }

    fn mark_loading(&mut self, model_id: &'static str) {
        self.loading.insert(model_id, true);
        self.responses.insert(model_id, LOADING_TEXT.to_string());
        self.ui.reset_scroll(model_id);
    }

    /// Write a settled outcome into state. Stale outcomes still overwrite.
    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Single { model_id, text, ok } => {
                let Some(model) = models::find(self.models(), model_id) else {
                    warn!(model = model_id, "outcome for unknown model dropped");
                    return;
                };
                self.responses.insert(model.id, text);
                self.loading.insert(model.id, false);
                let verb = if ok { "responded" } else { "failed" };
                self.set_status(format!("{} {}", model.display_name, verb));
            }
            Outcome::Fanout(results) => {
                // Rebuilt from scratch so ids outside the catalog never linger
                let models = self.models();
                self.responses = results
                    .into_iter()
                    .filter_map(|(id, text)| models::find(models, id).map(|m| (m.id, text)))
                    .collect();
                for model in models {
                    self.loading.insert(model.id, false);
                }
                self.set_status("All models settled".to_string());
            }
        }
    }

    pub fn handle(&mut self, action: Action) -> Flow {
        let target = self.input_target();
        let model_count = self.models().len();

        match action {
            Action::Quit => return Flow::Quit,
            Action::Insert(text) => {
                if self.prompt_editable(target) {
                    if let Some(prompt) = self.prompt_mut(target) {
                        prompt.push_str(&text);
                    }
                }
            }
            Action::Backspace => {
                if self.prompt_editable(target) {
                    if let Some(prompt) = self.prompt_mut(target) {
                        prompt.pop();
                    }
                }
            }
            Action::ClearPrompt => {
                if self.prompt_editable(target) {
                    self.edit_prompt(target, String::new());
                }
            }
            Action::Submit => {
                if let Some(submission) = self.submit(target) {
                    return Flow::Dispatch(submission);
                }
            }
            Action::FocusNext => self.ui.focus_next(model_count),
            Action::FocusPrev => self.ui.focus_prev(model_count),
            Action::ScrollUp => {
                if let Some(model) = self.focused_model() {
                    self.ui.scroll_up(model.id, self.config.scroll_step);
                }
            }
            Action::ScrollDown => {
                if let Some(model) = self.focused_model() {
                    self.ui.scroll_down(model.id, self.config.scroll_step);
                }
            }
            // Clipboard access lives in the event loop
            Action::Paste => {}
        }
        Flow::Continue
    }

    pub fn set_status(&mut self, message: String) {
        self.ui.status_message = Some(message);
        self.ui.status_set_at = self.animation_tick;
    }

    pub fn tick(&mut self) {
        self.animation_tick += 1;
        self.animation_frame = (self.animation_frame + 1) % 360;

        if self.ui.status_message.is_some()
            && self.animation_tick.saturating_sub(self.ui.status_set_at)
                >= self.config.status_timeout_ticks
        {
            self.ui.status_message = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Backend;
    use pretty_assertions::assert_eq;

    fn independent() -> App {
        App::new(Variant::Independent, Config::default())
    }

    fn shared() -> App {
        App::new(Variant::Shared, Config::default())
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle(Action::Insert(c.to_string()));
        }
    }

    /// Config pointing every backend at one mock server
    fn config_for(server: &mockito::ServerGuard) -> Config {
        let (host, port) = server
            .host_with_port()
            .rsplit_once(':')
            .map(|(h, p)| (h.to_string(), p.parse::<u16>().unwrap()))
            .unwrap();
        let mut config = Config {
            host: format!("http://{host}"),
            shared_port: port,
            default_port: port,
            ..Config::default()
        };
        for model in INDEPENDENT_MODELS {
            config.ports.insert(model.id.to_string(), port);
        }
        config
    }

    #[test]
    fn test_new_state_is_empty() {
        let app = independent();
        for model in app.models() {
            assert_eq!(app.prompt(Some(model.id)), "");
            assert!(!app.is_loading(model.id));
            assert_eq!(app.response(model.id), None);
        }
    }

    #[test]
    fn test_blank_prompt_submit_is_noop() {
        for text in ["", "   ", "\n\t "] {
            let mut app = independent();
            app.edit_prompt(Some("openai"), text.to_string());

            assert!(app.submit(Some("openai")).is_none());
            assert!(!app.is_loading("openai"));
            assert_eq!(app.response("openai"), None);
        }
    }

    #[test]
    fn test_submit_marks_loading_and_builds_url() {
        let mut app = independent();
        app.edit_prompt(Some("deepseek"), "Hello there".to_string());

        let submission = app.submit(Some("deepseek"));
        assert_eq!(
            submission,
            Some(Submission::Single(Request {
                model_id: "deepseek",
                url: "http://localhost:8081/api/deepseek/Hello%20there".to_string(),
            }))
        );
        assert!(app.is_loading("deepseek"));
        assert_eq!(app.response("deepseek"), Some(LOADING_TEXT));
        assert!(!app.is_loading("openai"));
    }

    #[test]
    fn test_submit_while_loading_is_noop() {
        let mut app = independent();
        app.edit_prompt(Some("openai"), "Hello".to_string());
        assert!(app.submit(Some("openai")).is_some());
        assert!(app.submit(Some("openai")).is_none());
    }

    #[test]
    fn test_independent_models_load_independently() {
        let mut app = independent();
        app.edit_prompt(Some("openai"), "a".to_string());
        app.edit_prompt(Some("ollama"), "b".to_string());
        assert!(app.submit(Some("openai")).is_some());
        assert!(app.submit(Some("ollama")).is_some());

        app.apply(Outcome::Single {
            model_id: "ollama",
            text: "done".to_string(),
            ok: true,
        });

        assert!(app.is_loading("openai"));
        assert!(!app.is_loading("ollama"));
        assert_eq!(app.response("ollama"), Some("done"));
        assert_eq!(app.response("openai"), Some(LOADING_TEXT));
    }

    #[test]
    fn test_submit_unknown_or_mismatched_target_is_noop() {
        let mut app = independent();
        app.edit_prompt(None, "shared".to_string());
        assert!(app.submit(None).is_none());
        assert!(app.submit(Some("mistral")).is_none());

        let mut app = shared();
        app.edit_prompt(None, "Ping".to_string());
        assert!(app.submit(Some("openai")).is_none());
        assert!(!app.any_loading());
    }

    #[test]
    fn test_apply_single_writes_text_verbatim() {
        let mut app = independent();
        app.edit_prompt(Some("openai"), "Hello".to_string());
        app.submit(Some("openai"));

        app.apply(Outcome::Single {
            model_id: "openai",
            text: "  Hi there\n".to_string(),
            ok: true,
        });

        assert_eq!(app.response("openai"), Some("  Hi there\n"));
        assert!(!app.is_loading("openai"));
    }

    #[test]
    fn test_apply_single_status_reports_failure() {
        let mut app = independent();
        app.edit_prompt(Some("deepseek"), "Hello".to_string());
        app.submit(Some("deepseek"));

        app.apply(Outcome::Single {
            model_id: "deepseek",
            text: "Error: 500".to_string(),
            ok: false,
        });
        assert_eq!(app.ui.status_message.as_deref(), Some("DeepSeek failed"));
        assert_eq!(app.response("deepseek"), Some("Error: 500"));

        app.edit_prompt(Some("openai"), "Hello".to_string());
        app.submit(Some("openai"));
        app.apply(Outcome::Single {
            model_id: "openai",
            text: "Hi".to_string(),
            ok: true,
        });
        assert_eq!(
            app.ui.status_message.as_deref(),
            Some("OpenAI (GPT-4o) responded")
        );
    }

    #[test]
    fn test_resubmit_overwrites_without_history() {
        let mut app = independent();
        app.edit_prompt(Some("openai"), "Hello".to_string());
        app.submit(Some("openai"));
        app.apply(Outcome::Single {
            model_id: "openai",
            text: "first".to_string(),
            ok: true,
        });

        assert!(app.submit(Some("openai")).is_some());
        assert_eq!(app.response("openai"), Some(LOADING_TEXT));

        app.apply(Outcome::Single {
            model_id: "openai",
            text: "second".to_string(),
            ok: true,
        });
        assert_eq!(app.response("openai"), Some("second"));
    }

    #[test]
    fn test_apply_unknown_model_is_dropped() {
        let mut app = independent();
        app.apply(Outcome::Single {
            model_id: "mistral",
            text: "ignored".to_string(),
            ok: true,
        });
        assert_eq!(app.response("mistral"), None);
        assert!(!app.loading.contains_key("mistral"));
    }

    #[test]
    fn test_shared_submit_fans_out_on_shared_port() {
        let mut app = shared();
        app.edit_prompt(None, "Ping".to_string());

        let Some(Submission::Fanout(requests)) = app.submit(None) else {
            panic!("expected fan-out");
        };
        let urls: Vec<&str> = requests.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "http://localhost:8080/api/openai/Ping",
                "http://localhost:8080/api/anthropic/Ping",
                "http://localhost:8080/api/ollama/Ping",
            ]
        );
        for model in SHARED_MODELS {
            assert!(app.is_loading(model.id));
            assert_eq!(app.response(model.id), Some(LOADING_TEXT));
        }
        assert!(app.submit(None).is_none());
    }

    #[test]
    fn test_shared_apply_clears_all_loading_and_resets_responses() {
        let mut app = shared();
        app.edit_prompt(None, "Ping".to_string());
        app.submit(None);
        app.responses.insert("deepseek", "stale".to_string());

        app.apply(Outcome::Fanout(vec![
            ("openai", "Pong".to_string()),
            ("anthropic", "Error: fetch failed".to_string()),
            ("ollama", "Pong".to_string()),
        ]));

        let expected: HashMap<&'static str, String> = [
            ("openai", "Pong".to_string()),
            ("anthropic", "Error: fetch failed".to_string()),
            ("ollama", "Pong".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(app.responses, expected);
        assert!(!app.any_loading());
        assert!(app.can_submit(None));
    }

    #[test]
    fn test_typing_follows_focus() {
        let mut app = independent();
        type_text(&mut app, "hi");
        app.handle(Action::FocusNext);
        type_text(&mut app, "yo");
        app.handle(Action::Backspace);

        assert_eq!(app.prompt(Some("openai")), "hi");
        assert_eq!(app.prompt(Some("anthropic")), "y");
    }

    #[test]
    fn test_loading_prompt_is_read_only() {
        let mut app = independent();
        type_text(&mut app, "Hello");
        assert!(matches!(app.handle(Action::Submit), Flow::Dispatch(_)));

        type_text(&mut app, " again");
        app.handle(Action::ClearPrompt);
        assert_eq!(app.prompt(Some("openai")), "Hello");
    }

    #[test]
    fn test_shared_prompt_stays_editable_while_loading() {
        let mut app = shared();
        type_text(&mut app, "Ping");
        assert!(matches!(app.handle(Action::Submit), Flow::Dispatch(_)));

        type_text(&mut app, "!");
        assert_eq!(app.prompt(None), "Ping!");
        assert_eq!(app.handle(Action::Submit), Flow::Continue);
    }

    #[test]
    fn test_quit_action() {
        let mut app = independent();
        assert_eq!(app.handle(Action::Quit), Flow::Quit);
    }

    #[test]
    fn test_status_message_expires() {
        let mut app = independent();
        app.set_status("hello".to_string());
        for _ in 0..app.config.status_timeout_ticks - 1 {
            app.tick();
        }
        assert!(app.ui.status_message.is_some());
        app.tick();
        assert!(app.ui.status_message.is_none());
    }

    #[tokio::test]
    async fn test_independent_round_trip_success() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/openai/Hello")
            .with_body("Hi there")
            .create_async()
            .await;

        let mut app = App::new(Variant::Independent, config_for(&server));
        app.edit_prompt(Some("openai"), "Hello".to_string());
        let submission = app.submit(Some("openai")).unwrap();

        let outcome = Backend::new().unwrap().execute(submission).await;
        app.apply(outcome);

        assert_eq!(app.response("openai"), Some("Hi there"));
        assert!(!app.is_loading("openai"));
    }

    #[tokio::test]
    async fn test_independent_round_trip_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/deepseek/Hello")
            .with_status(500)
            .create_async()
            .await;

        let mut app = App::new(Variant::Independent, config_for(&server));
        app.edit_prompt(Some("deepseek"), "Hello".to_string());
        let submission = app.submit(Some("deepseek")).unwrap();

        let outcome = Backend::new().unwrap().execute(submission).await;
        app.apply(outcome);

        assert_eq!(app.response("deepseek"), Some("Error: 500"));
        assert!(!app.is_loading("deepseek"));
    }

    #[tokio::test]
    async fn test_shared_round_trip_partial_failure() {
        let mut server = mockito::Server::new_async().await;
        let _openai = server
            .mock("GET", "/api/openai/Ping")
            .with_body("Pong")
            .create_async()
            .await;
        let _anthropic = server
            .mock("GET", "/api/anthropic/Ping")
            .with_status(503)
            .create_async()
            .await;
        let _ollama = server
            .mock("GET", "/api/ollama/Ping")
            .with_body("Pong")
            .create_async()
            .await;

        let mut app = App::new(Variant::Shared, config_for(&server));
        app.edit_prompt(None, "Ping".to_string());
        let submission = app.submit(None).unwrap();

        let outcome = Backend::new().unwrap().execute(submission).await;
        app.apply(outcome);

        assert_eq!(app.response("openai"), Some("Pong"));
        assert_eq!(app.response("anthropic"), Some("Error: 503"));
        assert_eq!(app.response("ollama"), Some("Pong"));
        assert!(!app.any_loading());
    }
}
