pub mod user_tokens;

pub use user_tokens::Entity as UserTokens;
pub use user_tokens::Model as UserToken;
