use ev_core::AgentKind;
use ev_spatial::Region;

/// One block of population living inside a polygonal region.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopulationRecord {
    /// District or block name; seeded agents are called `<label>-<n>`.
    pub label:    String,
    pub quantity: u32,
    pub region:   Region,
    pub kind:     AgentKind,
}

impl PopulationRecord {
    /// A resident population record.
    pub fn new(label: impl Into<String>, quantity: u32, region: impl Into<Region>) -> Self {
        Self {
            label:    label.into(),
            quantity,
            region:   region.into(),
            kind:     AgentKind::Resident,
        }
    }

    pub fn with_kind(mut self, kind: AgentKind) -> Self {
        self.kind = kind;
        self
    }
}
