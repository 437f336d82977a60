pub mod aggregator;
pub mod engine;
pub mod ids;
pub mod parser;
pub mod session;
pub mod upload;

pub use crate::domain::model::{BillConfig, BillSummary, ItemId, MenuItem, Person, PersonId};
pub use crate::domain::ports::{Recognizer, Storage};
pub use crate::utils::error::Result;
