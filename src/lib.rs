//! Pixel Vengeance - boss encounter controller for an arcade shooter

pub mod arena;
pub mod boss;
pub mod core;
pub mod llm;
