pub mod engine;
pub mod fields;

pub use engine::{ColumnMap, ColumnMatcher, ColumnScore, FieldAssignment, ScoreComponent};
pub use fields::CanonicalField;
