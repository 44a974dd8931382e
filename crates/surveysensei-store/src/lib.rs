//! Local client state: a single best-effort slot for the latest created survey.

mod error;
pub use error::StoreError;

mod slot;
pub use slot::{FileSlot, LatestSurveySlot, MemorySlot};
