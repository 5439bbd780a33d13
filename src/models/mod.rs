pub mod moderatable;
pub mod record;

// Re-export core model types for easy access
pub use moderatable::Moderatable;
pub use record::Record;
