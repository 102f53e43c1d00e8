//! UI context for environment detection and configuration.

use std::io::IsTerminal;

use chrono_tz::Tz;

use super::mode::OutputMode;
use crate::helpers::TableFormat;

/// Terminal and environment facts that rendering depends on.
#[derive(Debug, Clone)]
pub struct UiContext {
    /// Whether color output is enabled
    pub color: bool,
    /// Whether unicode symbols are enabled
    pub unicode: bool,
    /// Terminal width (columns)
    pub width: usize,
    /// Resolved output mode
    pub mode: OutputMode,
    /// Display timezone for timestamps; UTC when unset
    pub timezone: Option<Tz>,
}

impl UiContext {
    /// Create context from environment and CLI flags.
    pub fn from_env(
        json_flag: bool,
        format: Option<TableFormat>,
        no_color_flag: bool,
        timezone: Option<Tz>,
    ) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let term_is_dumb = std::env::var("TERM").map(|v| v == "dumb").unwrap_or(false);

        Self {
            color: color_enabled(is_tty, no_color_flag, term_is_dumb),
            unicode: !term_is_dumb,
            width: terminal_width().unwrap_or(80),
            mode: OutputMode::resolve(json_flag, format, is_tty, term_is_dumb),
            timezone,
        }
    }

    /// Context for error output on stderr, before any command flags are known.
    pub fn for_stderr(no_color_flag: bool) -> Self {
        let is_tty = std::io::stderr().is_terminal();
        let term_is_dumb = std::env::var("TERM").map(|v| v == "dumb").unwrap_or(false);
        Self {
            color: color_enabled(is_tty, no_color_flag, term_is_dumb),
            unicode: !term_is_dumb,
            width: 80,
            mode: if is_tty && !term_is_dumb {
                OutputMode::Pretty
            } else {
                OutputMode::Plain
            },
            timezone: None,
        }
    }

    /// Spinners only make sense on an interactive pretty stdout.
    pub fn allows_animation(&self) -> bool {
        self.mode.is_pretty()
    }
}

/// Color is off for pipes, `--no-color`, `NO_COLOR`, and `TERM=dumb`.
pub fn color_enabled(is_tty: bool, no_color_flag: bool, term_is_dumb: bool) -> bool {
    let no_color_env = std::env::var_os("NO_COLOR").is_some();
    is_tty && !no_color_flag && !no_color_env && !term_is_dumb
}

fn terminal_width() -> Option<usize> {
    if let Ok(cols) = std::env::var("COLUMNS") {
        if let Ok(width) = cols.parse::<usize>() {
            if width > 0 {
                return Some(width);
            }
        }
    }

    #[cfg(unix)]
    {
        use std::mem::MaybeUninit;

        let mut winsize = MaybeUninit::<libc::winsize>::uninit();
        // SAFETY: TIOCGWINSZ only writes into the provided winsize.
        let result =
            unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, winsize.as_mut_ptr()) };
        if result == 0 {
            // SAFETY: ioctl succeeded, so winsize was filled in.
            let ws = unsafe { winsize.assume_init() };
            if ws.ws_col > 0 {
                return Some(ws.ws_col as usize);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_mode_from_flag() {
        let ctx = UiContext::from_env(true, None, false, None);
        assert_eq!(ctx.mode, OutputMode::Json);
    }

    #[test]
    fn test_no_color_flag_disables_color() {
        assert!(!color_enabled(true, true, false));
        assert!(!color_enabled(false, false, false));
    }

    #[test]
    fn test_width_has_default() {
        let ctx = UiContext::from_env(false, None, false, None);
        assert!(ctx.width > 0);
    }

    #[test]
    fn test_timezone_carried() {
        let ctx = UiContext::from_env(false, None, false, Some(chrono_tz::Europe::Berlin));
        assert_eq!(ctx.timezone, Some(chrono_tz::Europe::Berlin));
    }
}
