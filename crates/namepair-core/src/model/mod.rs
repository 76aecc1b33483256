pub mod combination;
pub mod decision;
pub mod gender;
pub mod group;
pub mod momentum;
pub mod name;

pub use combination::{Combination, CombinationId, CombinationKey};
pub use decision::{DecisionRecord, Outcome};
pub use gender::{Gender, GenderMode, ParseGenderError};
pub use group::{GroupProfile, ParseGroupError, ScoringGroup};
pub use momentum::Momentum;
pub use name::{AtomicName, NameId, normalize_name_text};
