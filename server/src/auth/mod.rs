mod crypto;
mod db;
mod extractor;

pub use crypto::{generate_token, hash_password, verify_password};
pub use db::create_session;
pub use extractor::AuthUser;
