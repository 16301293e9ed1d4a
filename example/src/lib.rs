mod data;
mod error;
mod user_directory_client;

pub use data::user::{NewUser, User};
pub use error::Error;
pub use user_directory_client::{UserDirectoryClient, UserDirectoryClientBuilder};
