//! Planner mode flags supplied by the query compiler.

use serde::Serialize;

///
/// QueryMode
///
/// Execution mode of the statement being compiled. Only selects which
/// downstream state-factory variants are legal; never alters planning.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    #[default]
    Continuous,
    FireAndForget,
}

///
/// AnalyzeConfig
///
/// Per-statement planning configuration.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AnalyzeConfig {
    mode: QueryMode,
    statement_name: Option<String>,
}

impl AnalyzeConfig {
    /// Configuration for a continuously evaluated statement.
    #[must_use]
    pub const fn continuous() -> Self {
        Self {
            mode: QueryMode::Continuous,
            statement_name: None,
        }
    }

    /// Configuration for an ad-hoc, one-shot statement.
    #[must_use]
    pub const fn fire_and_forget() -> Self {
        Self {
            mode: QueryMode::FireAndForget,
            statement_name: None,
        }
    }

    /// Attach the statement name used in planner diagnostics.
    #[must_use]
    pub fn with_statement_name(mut self, name: impl Into<String>) -> Self {
        self.statement_name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn mode(&self) -> QueryMode {
        self.mode
    }

    #[must_use]
    pub const fn is_fire_and_forget(&self) -> bool {
        matches!(self.mode, QueryMode::FireAndForget)
    }

    #[must_use]
    pub fn statement_name(&self) -> Option<&str> {
        self.statement_name.as_deref()
    }
}
