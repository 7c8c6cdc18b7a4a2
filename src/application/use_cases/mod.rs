pub mod career_coach;
pub mod structured_generation;
