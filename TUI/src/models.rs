//! Fixed catalog of model backends and their port table.

use ratatui::style::Color;

/// A backend the view can talk to. `id` doubles as the URL path segment and
/// the port-table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    pub accent_color: &'static str,
}

impl ModelDescriptor {
    /// Accent color as a terminal color. Falls back to white on a malformed hex.
    pub fn accent(&self) -> Color {
        self.accent_color.parse().unwrap_or(Color::White)
    }
}

const OPENAI: ModelDescriptor = ModelDescriptor {
    id: "openai",
    display_name: "OpenAI (GPT-4o)",
    accent_color: "#2ECC71",
};

const ANTHROPIC: ModelDescriptor = ModelDescriptor {
    id: "anthropic",
    display_name: "Anthropic (Claude)",
    accent_color: "#9B59B6",
};

const DEEPSEEK: ModelDescriptor = ModelDescriptor {
    id: "deepseek",
    display_name: "DeepSeek",
    accent_color: "#3498DB",
};

const OLLAMA: ModelDescriptor = ModelDescriptor {
    id: "ollama",
    display_name: "Ollama (Gemma 2)",
    accent_color: "#E67E22",
};

/// Models shown when every box has its own prompt.
pub const INDEPENDENT_MODELS: &[ModelDescriptor] = &[OPENAI, ANTHROPIC, DEEPSEEK, OLLAMA];

/// Models a shared prompt fans out to.
pub const SHARED_MODELS: &[ModelDescriptor] = &[OPENAI, ANTHROPIC, OLLAMA];

/// Per-model backend ports used by the independent variant.
pub const PORTS: &[(&str, u16)] = &[
    ("openai", 8080),
    ("deepseek", 8081),
    ("ollama", 8082),
    ("anthropic", 8083),
];

pub const DEFAULT_PORT: u16 = 8080;

/// Single port every model is reached on in the shared variant.
pub const SHARED_PORT: u16 = 8080;

pub fn table_port(id: &str) -> Option<u16> {
    PORTS
        .iter()
        .find(|(model, _)| *model == id)
        .map(|(_, port)| *port)
}

pub fn find(models: &[ModelDescriptor], id: &str) -> Option<ModelDescriptor> {
    models.iter().find(|m| m.id == id).copied()
}
