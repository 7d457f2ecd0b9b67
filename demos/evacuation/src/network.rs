//! Synthetic ward street network.
//!
//! An 8 × 6 block grid with 60 m blocks in a local metric frame (origin at the
//! south-west corner).  Row 3 is the high street, the outer columns are
//! secondary roads, and a footpath cuts diagonally through the park block.

use ev_core::{NodeId, Point, RoadClass};
use ev_spatial::{SpatialResult, StreetNetwork, StreetNetworkBuilder};

pub const COLS:  usize = 8;
pub const ROWS:  usize = 6;
pub const BLOCK: f64   = 60.0;

const HIGH_STREET_ROW: usize = 3;

/// Named shelter nodes.
pub struct Shelters {
    /// School hall on the north-east corner.
    pub school: NodeId,
    /// Riverside park on the west edge.
    pub park:   NodeId,
}

impl Shelters {
    pub fn all(&self) -> [(&'static str, NodeId); 2] {
        [("school", self.school), ("park", self.park)]
    }
}

/// Build the ward network.  Returns the network and its shelters.
pub fn build_ward() -> SpatialResult<(StreetNetwork, Shelters)> {
    let mut b = StreetNetworkBuilder::with_capacity(COLS * ROWS, 4 * COLS * ROWS);
    let mut ids = Vec::with_capacity(COLS * ROWS);
    for row in 0..ROWS {
        for col in 0..COLS {
            ids.push(b.add_node(Point::new(col as f64 * BLOCK, row as f64 * BLOCK)));
        }
    }
    let at = |col: usize, row: usize| ids[row * COLS + col];

    for row in 0..ROWS {
        for col in 0..COLS {
            if col + 1 < COLS {
                let class = if row == HIGH_STREET_ROW { RoadClass::Primary } else { RoadClass::Residential };
                b.add_street_of_class(at(col, row), at(col + 1, row), BLOCK, class);
            }
            if row + 1 < ROWS {
                let class = if col == 0 || col == COLS - 1 { RoadClass::Secondary } else { RoadClass::Residential };
                b.add_street_of_class(at(col, row), at(col, row + 1), BLOCK, class);
            }
        }
    }

    // Park footpath.
    b.add_street_of_class(at(1, 1), at(2, 2), BLOCK * std::f64::consts::SQRT_2, RoadClass::Footway);

    let shelters = Shelters { school: at(COLS - 1, ROWS - 1), park: at(0, 2) };
    Ok((b.build()?, shelters))
}
