pub mod books;
pub mod login;
pub mod users;
