use std::io::{self, Write};
use std::panic;

use crossterm::{
    cursor::Show,
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};

/// Raw mode + alternate screen + bracketed paste, undone on drop
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        // from here on a failed step still restores through Drop
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen, EnableBracketedPaste)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = restore(&mut io::stdout()) {
            tracing::error!(error = %e, "failed to restore terminal");
        }
    }
}

/// Undo every terminal mode we set. All steps run; the first error is returned.
/// Safe to call more than once.
pub fn restore<W: Write>(out: &mut W) -> io::Result<()> {
    let steps = [
        disable_raw_mode(),
        execute!(out, DisableBracketedPaste),
        execute!(out, LeaveAlternateScreen),
        execute!(out, Show),
    ];
    steps.into_iter().fold(Ok(()), |acc, step| acc.and(step))
}

/// Restore the terminal before the default hook prints, so panics stay readable
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore(&mut io::stdout());
        previous(info);
    }));
}
