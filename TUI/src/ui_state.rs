use std::collections::HashMap;

/// View-only state: nothing here is sent to a backend.
#[derive(Debug, Default)]
pub struct UIState {
    /// Index into the active model catalog
    pub focus: usize,

    /// Response panel scroll offsets, in lines, keyed by model id
    pub scroll: HashMap<&'static str, u16>,

    /// Largest useful offset per panel, refreshed on every draw
    pub scroll_limits: HashMap<&'static str, u16>,

    pub status_message: Option<String>,

    /// Tick at which the status message was set
    pub status_set_at: u64,
}

impl UIState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus_next(&mut self, len: usize) {
        if len > 0 {
            self.focus = (self.focus + 1) % len;
        }
    }

    pub fn focus_prev(&mut self, len: usize) {
        if len > 0 {
            self.focus = (self.focus + len - 1) % len;
        }
    }

    pub fn scroll_offset(&self, model_id: &str) -> u16 {
        self.scroll.get(model_id).copied().unwrap_or(0)
    }

    pub fn scroll_up(&mut self, model_id: &'static str, step: u16) {
        let offset = self.scroll.entry(model_id).or_insert(0);
        *offset = offset.saturating_sub(step);
    }

    pub fn scroll_down(&mut self, model_id: &'static str, step: u16) {
        let limit = self.scroll_limits.get(model_id).copied().unwrap_or(0);
        let offset = self.scroll.entry(model_id).or_insert(0);
        *offset = offset.saturating_add(step).min(limit);
    }

    /// Record how far a panel can scroll; pulls back an offset past the new end.
    pub fn set_scroll_limit(&mut self, model_id: &'static str, limit: u16) {
        self.scroll_limits.insert(model_id, limit);
        if let Some(offset) = self.scroll.get_mut(model_id) {
            *offset = (*offset).min(limit);
        }
    }

    pub fn reset_scroll(&mut self, model_id: &str) {
        self.scroll.remove(model_id);
    }
}
