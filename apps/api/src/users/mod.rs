// Accounts for the admin panel and ticket issuers.
// Passwords are only ever stored as PBKDF2 hashes; see password.rs.

pub mod handlers;
pub mod migration;
pub mod models;
pub mod password;
