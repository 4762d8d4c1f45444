//! Authentication

mod session;
mod token;

pub use session::Session;
pub use session::SignOutReason;
pub use session::User;
pub use token::AccessToken;
pub use token::StaticTokenProvider;
pub use token::TokenProvider;
