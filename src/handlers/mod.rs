// src/handlers/mod.rs

pub mod assessment;
pub mod question;
pub mod submission;
