pub mod settings;
pub mod strips;
