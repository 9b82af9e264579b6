/// User actions that can be triggered by key presses or terminal events.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Append text to the focused prompt
    Insert(String),
    /// Delete the last character of the focused prompt
    Backspace,
    /// Empty the focused prompt
    ClearPrompt,
    /// Paste clipboard contents into the focused prompt
    Paste,
    /// Submit the focused model, or every model for a shared prompt
    Submit,
    /// Move focus to the next model box
    FocusNext,
    /// Move focus to the previous model box
    FocusPrev,
    /// Scroll the focused response panel
    ScrollUp,
    ScrollDown,
    /// Quit application
    Quit,
}
