pub mod auth;
pub mod import;
pub mod page;
pub mod transfers;
pub mod users;

pub use page::Page;
