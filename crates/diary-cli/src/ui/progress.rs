//! Progress indicators for slow operations (key derivation, backups, checks).

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use super::context::UiContext;
use super::render::badge;
use super::theme::{spinner_frames, Badge};

/// A spinner for indeterminate progress, drawn on stderr.
///
/// Outside pretty mode the spinner is inert; `finish*` still prints the
/// closing badge so plain output keeps a stable shape.
pub struct Spinner<'a> {
    ctx: &'a UiContext,
    bar: Option<ProgressBar>,
}

impl<'a> Spinner<'a> {
    /// Start a spinner with the given message.
    pub fn start(ctx: &'a UiContext, message: &str) -> Self {
        let bar = if ctx.allows_animation() {
            let bar = ProgressBar::new_spinner();
            let mut frames: Vec<&str> = spinner_frames(ctx.unicode).to_vec();
            // indicatif shows the last tick string once finished.
            frames.push(" ");
            if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
                bar.set_style(style.tick_strings(&frames));
            }
            bar.set_message(format!("{}...", message));
            bar.enable_steady_tick(Duration::from_millis(80));
            Some(bar)
        } else {
            None
        };
        Self { ctx, bar }
    }

    /// Clear the spinner without printing anything.
    pub fn clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    /// Finish spinner with success message.
    pub fn finish(&self, message: &str) {
        self.clear();
        println!("{}", badge(self.ctx, Badge::Ok, message));
    }

    /// Finish spinner with error message.
    pub fn finish_err(&self, message: &str) {
        self.clear();
        eprintln!("{}", badge(self.ctx, Badge::Err, message));
    }
}

impl Drop for Spinner<'_> {
    fn drop(&mut self) {
        self.clear();
    }
}
