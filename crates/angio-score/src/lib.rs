pub mod cadrads;
pub mod gensini;
pub mod syntax;
pub mod weights;

pub use cadrads::{CadRadsCalculator, stenosis_grade};
pub use gensini::GensiniCalculator;
pub use syntax::{SIGNIFICANT_STENOSIS, SyntaxCalculator};
pub use weights::{
    CadRadsConfig, ComplexityPoints, GensiniWeights, GradeTexts, SiteFactors, StenosisBand,
    SyntaxWeights,
};
