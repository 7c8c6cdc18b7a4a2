pub mod use_cases;

pub use use_cases::career_coach::CareerCoachUseCase;
pub use use_cases::structured_generation::StructuredGenerationUseCase;
