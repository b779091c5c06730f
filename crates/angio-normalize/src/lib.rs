pub mod features;
pub mod segments;
pub mod stenosis;
pub mod values;

pub use features::{LesionFeatures, detect_features};
pub use segments::{SEGMENT_COLUMNS, has_segment_columns, segment_column};
pub use stenosis::{extract_stenosis_percent, is_stenosis_statement, scan_numbers};
pub use values::{GenderMap, match_site, match_vessel, parse_bool, parse_number};
