pub mod prescription;
pub mod transcript;
