//! Output mode routing.

use crate::helpers::TableFormat;

/// How a command renders its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// serde_json on stdout, nothing else
    Json,
    /// Space-separated rows, stable for scripts
    #[default]
    Plain,
    /// comfy-table tables, badges and hints (TTY only)
    Pretty,
}

impl OutputMode {
    /// Pick the mode for one invocation.
    ///
    /// `--json` always wins. `--format plain` and `TERM=dumb` force plain.
    /// Otherwise stdout decides: a TTY gets pretty output, a pipe gets plain.
    pub fn resolve(
        json_flag: bool,
        format: Option<TableFormat>,
        is_tty: bool,
        term_is_dumb: bool,
    ) -> Self {
        if json_flag {
            return Self::Json;
        }
        if format == Some(TableFormat::Plain) || term_is_dumb || !is_tty {
            return Self::Plain;
        }
        Self::Pretty
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_pretty(&self) -> bool {
        matches!(self, Self::Pretty)
    }
}
