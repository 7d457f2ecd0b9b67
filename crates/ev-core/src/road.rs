//! Street category and the width lookup used to size links.
//!
//! The upstream graph collaborator tags every edge with a road category; the
//! engine only needs the usable walking width that category implies.

/// Street category of a network edge.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[non_exhaustive]
pub enum RoadClass {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Residential,
    Service,
    Footway,
    Path,
    Steps,
    #[default]
    Unclassified,
}

impl RoadClass {
    /// Usable width in metres for pedestrian flow.
    pub fn width_m(self) -> f64 {
        match self {
            RoadClass::Motorway | RoadClass::Trunk   => 7.0,
            RoadClass::Primary                       => 6.0,
            RoadClass::Secondary                     => 5.0,
            RoadClass::Tertiary                      => 4.0,
            RoadClass::Residential                   => 3.5,
            RoadClass::Service                       => 3.0,
            RoadClass::Footway | RoadClass::Path
                | RoadClass::Steps                   => 2.0,
            RoadClass::Unclassified                  => 3.0,
        }
    }

    /// Parse an OSM-style `highway=*` value.  Unknown values map to
    /// `Unclassified`; `*_link` ramps map to their parent class.
    pub fn from_tag(tag: &str) -> RoadClass {
        match tag.trim().trim_end_matches("_link") {
            "motorway"    => RoadClass::Motorway,
            "trunk"       => RoadClass::Trunk,
            "primary"     => RoadClass::Primary,
            "secondary"   => RoadClass::Secondary,
            "tertiary"    => RoadClass::Tertiary,
            "residential" | "living_street" => RoadClass::Residential,
            "service"     => RoadClass::Service,
            "footway" | "pedestrian" => RoadClass::Footway,
            "path" | "track" | "cycleway" => RoadClass::Path,
            "steps"       => RoadClass::Steps,
            _             => RoadClass::Unclassified,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoadClass::Motorway     => "motorway",
            RoadClass::Trunk        => "trunk",
            RoadClass::Primary      => "primary",
            RoadClass::Secondary    => "secondary",
            RoadClass::Tertiary     => "tertiary",
            RoadClass::Residential  => "residential",
            RoadClass::Service      => "service",
            RoadClass::Footway      => "footway",
            RoadClass::Path         => "path",
            RoadClass::Steps        => "steps",
            RoadClass::Unclassified => "unclassified",
        }
    }
}

impl std::fmt::Display for RoadClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
