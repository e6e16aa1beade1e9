//! Command handlers

pub mod board;
pub mod call;
pub mod card;
pub mod config;
pub mod list;
pub mod login;
pub mod status;
