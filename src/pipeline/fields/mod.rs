pub mod dates;
pub mod note_type;
pub mod patient;
