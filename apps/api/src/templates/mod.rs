// Ticket templates: background image plus positioned slots.
// Slot rows are owned by their template and replaced wholesale on update.

pub mod handlers;
pub mod models;
pub mod repository;
