pub mod directory;
pub mod event;
