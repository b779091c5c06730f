pub mod enums;
pub mod error;
pub mod patient;
pub mod scores;
pub mod table;

pub use enums::{Gender, LesionSite, Vessel};
pub use error::{ModelError, Result};
pub use patient::{Lesion, Patient};
pub use scores::{
    CadRadsScore, GensiniLesionDetail, GensiniScore, GensiniSeverity, LesionContribution,
    LesionGrade, RiskLevel, SyntaxRisk, SyntaxScore,
};
pub use table::RowTable;
