pub mod audio;
pub mod llm;
pub mod mail;
pub mod observability;
pub mod persistence;
pub mod render;
pub mod transport;
