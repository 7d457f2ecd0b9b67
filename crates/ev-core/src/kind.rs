//! Agent category tag.

/// The population category an agent was created from.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[non_exhaustive]
pub enum AgentKind {
    /// Lives in the seeded region (default).
    #[default]
    Resident,
    /// Present in the area but not living there (workers, tourists…).
    Visitor,
}

impl AgentKind {
    /// Label used in output files.
    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Resident => "resident",
            AgentKind::Visitor  => "visitor",
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
