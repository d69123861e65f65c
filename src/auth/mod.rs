pub mod magic;
pub mod sessions;
