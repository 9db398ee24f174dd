//! Domain records: departments, employees and their reviews
//!
//! Each type implements `Record` for its table. Ids are read-only from
//! outside this crate; only repositories assign or clear them.

pub mod department;
pub mod employee;
pub mod review;

pub use department::Department;
pub use employee::Employee;
pub use review::Review;
