pub mod assignment;
pub mod employee;
pub mod snapshot;
pub mod task;
