// src/cli/progress.rs — Terminal progress renderer for research polling

use std::sync::{Arc, Mutex};

use crate::core::scheduler::ProgressCallback;
use crate::core::session::Session;
use crate::core::types::Phase;

/// Build a progress callback that writes one line per observed change.
///
/// All progress output goes to stderr so stdout remains clean for the
/// report itself. Identical consecutive poll results are not repeated.
pub fn terminal_progress() -> ProgressCallback {
    let last = Mutex::new(String::new());
    Arc::new(move |session: &Session| {
        let line = render_line(session);
        let mut last = last.lock().expect("progress lock poisoned");
        if *last == line {
            return;
        }
        *last = line.clone();
        eprintln!("{line}");
    })
}

/// One status line, e.g. `[executing]  35%  searching and extracting (2/7 questions)`.
fn render_line(session: &Session) -> String {
    let mut line = format!("[{}] {:>3}%", session.phase, session.progress_percent);
    if !session.current_stage.is_empty() {
        line.push_str("  ");
        line.push_str(&session.current_stage);
    }
    if session.questions_total > 0 {
        line.push_str(&format!(
            " ({}/{} questions)",
            session.questions_completed, session.questions_total
        ));
    }
    if session.phase == Phase::Failed {
        if let Some(message) = &session.error_message {
            line.push_str("  ");
            line.push_str(message);
        }
    }
    line
}
