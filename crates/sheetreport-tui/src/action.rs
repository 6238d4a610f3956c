/// Everything the user (or the clock) can ask the app to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    /// `q`: asks for confirmation first.
    Quit,
    /// Ctrl+C: leaves immediately.
    ForceQuit,
    Tick,
    Resize(u16, u16),

    FocusNext,
    FocusPrev,
    MoveUp,
    MoveDown,
    /// Enter: edit the focused field or pick the row under the cursor.
    Activate,
    /// Esc: close whatever overlay is open.
    Cancel,

    Login,
    Logout,
    Generate,
    Upload,
    RefreshFiles,
    ToggleHelp,

    // Text editing
    InsertChar(char),
    Backspace,
    DeleteForward,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    ConfirmInput,
    CancelInput,
}
