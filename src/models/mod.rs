pub mod checkin;
pub mod entry;
pub mod health;
pub mod lenient;
pub mod profile;

pub use checkin::{CheckIn, Decision, Mood};
pub use entry::{Entry, WorkoutType};
pub use health::{HealthDay, HealthStore};
pub use profile::{GoalCategory, Profile, ProfileUpdate, SupportStyle};
