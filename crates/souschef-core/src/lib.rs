pub mod action;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod llm;
pub mod model;
pub mod prompt;
pub mod recipe;
pub mod render;
pub mod session;
pub mod storage;
