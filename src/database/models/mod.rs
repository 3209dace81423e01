pub mod agent;
pub mod property;

pub use agent::Agent;
pub use property::{Property, PropertySummary};
