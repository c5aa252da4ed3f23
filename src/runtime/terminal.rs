use console::Term;

/// Puts the terminal in checklist mode (cursor hidden) for as long as it lives.
///
/// The cursor is shown again on drop, whatever way the run ended.
#[derive(Debug)]
pub struct TerminalGuard {
    term: Term,
    active: bool,
}

impl TerminalGuard {
    pub fn acquire(term: Term) -> Self {
        let active = term.is_term() && term.hide_cursor().is_ok();
        if active {
            tracing::debug!(target: "mkxray::terminal", "cursor hidden for checklist rendering");
        }
        Self { term, active }
    }

    /// Whether the guard changed the terminal mode and will restore it.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Restores the terminal now instead of waiting for drop.
    pub fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Err(err) = self.term.show_cursor() {
            tracing::warn!(target: "mkxray::terminal", error = %err, "failed to restore cursor");
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.release();
    }
}
