pub mod client;
pub mod dto;
pub mod text_recognizer;
