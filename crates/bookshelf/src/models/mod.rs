mod book;
mod common;
mod user;

pub use book::{BookCreate, BookPublic, BooksPublic};
pub use common::{ListParams, Message, Token};
pub use user::{
    UpdatePassword, UserCreate, UserPublic, UserRegister, UserUpdate, UserUpdateMe, UsersPublic,
};
