pub mod books;
pub mod loans;
pub mod stats;

define_service!(LibraryService);
