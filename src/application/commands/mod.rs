// src/application/commands/mod.rs
//
// Command Handlers
//
// ARCHITECTURE:
// - Commands are thin adapters between the UI (CLI) and Services
// - Commands return DTOs
// - Commands handle error conversion (JSON ErrorResponse strings)
// - Commands NEVER contain business logic

pub mod catalog_commands;

pub use catalog_commands::*;
