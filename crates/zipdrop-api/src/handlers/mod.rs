pub mod archive;
pub mod health;
