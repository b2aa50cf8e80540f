pub mod phone;

pub use phone::{normalize, PhoneNumber};
