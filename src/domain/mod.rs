pub mod appraisal;
pub mod property;

pub use appraisal::AppraisalResult;
pub use property::{NewProperty, PropertyField, PropertyRecord, PropertyStatus};
