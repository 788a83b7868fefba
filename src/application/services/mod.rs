pub mod assets;
pub mod directory;
pub mod orchestrator;
pub mod registration;
pub mod search;
