//! Wide-layout segment columns.
//!
//! One input shape carries a column per named anatomical segment, each cell
//! holding a free-text description. The table below maps every known segment
//! column to its canonical (vessel, site) pair; branch segments without a
//! proximal/mid/distal split are treated as distal territory.

use angio_model::{LesionSite, Vessel};

/// Known segment-column names with their canonical vessel and site.
pub const SEGMENT_COLUMNS: [(&str, Vessel, LesionSite); 19] = [
    ("右冠近段", Vessel::Rca, LesionSite::Proximal),
    ("右冠中段", Vessel::Rca, LesionSite::Mid),
    ("右冠远段", Vessel::Rca, LesionSite::Distal),
    ("右冠-后降支", Vessel::Pda, LesionSite::Distal),
    ("右冠-左室后侧支", Vessel::Plv, LesionSite::Distal),
    ("左主干", Vessel::Lm, LesionSite::Proximal),
    ("左冠-前降支近段", Vessel::Lad, LesionSite::Proximal),
    ("左冠-前降支中段", Vessel::Lad, LesionSite::Mid),
    ("左冠-前降支远段", Vessel::Lad, LesionSite::Distal),
    ("左冠-第一对角支", Vessel::D, LesionSite::Distal),
    ("左冠-第二对角支", Vessel::D, LesionSite::Distal),
    ("左冠-回旋支近段", Vessel::Lcx, LesionSite::Proximal),
    ("左冠-回旋支中段", Vessel::Lcx, LesionSite::Mid),
    ("左冠-回旋支远段", Vessel::Lcx, LesionSite::Distal),
    ("左冠-第一钝缘支", Vessel::Om, LesionSite::Distal),
    ("左冠-第二钝缘支", Vessel::Om, LesionSite::Distal),
    ("左冠-左房回旋支", Vessel::Lcx, LesionSite::Distal),
    ("左冠-左室后侧支", Vessel::Plv, LesionSite::Distal),
    ("左冠-后降支", Vessel::Pda, LesionSite::Distal),
];

/// Resolve a header to its segment mapping, if it names a known segment.
pub fn segment_column(header: &str) -> Option<(Vessel, LesionSite)> {
    let name = header.trim();
    SEGMENT_COLUMNS
        .iter()
        .find(|(column, _, _)| *column == name)
        .map(|(_, vessel, site)| (*vessel, *site))
}

/// Whether any header names a known segment column (wide-layout detection).
pub fn has_segment_columns(headers: &[String]) -> bool {
    headers.iter().any(|h| segment_column(h).is_some())
}
