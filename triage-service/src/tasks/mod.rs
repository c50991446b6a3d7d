pub mod analysis;
pub mod plain_summary;
pub mod professional_summary;
pub mod translation;
pub mod utils;

pub use analysis::AnalysisTask;
pub use plain_summary::PlainSummaryTask;
pub use professional_summary::ProfessionalSummaryTask;
pub use translation::TranslationTask;
