pub mod category;
pub mod document;
pub mod note;
pub mod patient;

pub use category::*;
pub use document::*;
pub use note::*;
pub use patient::*;
