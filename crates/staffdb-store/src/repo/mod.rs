//! Repository layer mapping table rows to shared record instances

pub mod repository;

pub use repository::Repository;
