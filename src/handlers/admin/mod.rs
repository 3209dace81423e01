pub mod agents;
pub mod forms;
pub mod properties;
