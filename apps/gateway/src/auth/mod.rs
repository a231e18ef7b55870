pub mod claims;
pub mod gate;
pub mod token_codec;

pub use claims::{TokenClaims, VerifiedToken};
pub use gate::authenticate;
pub use token_codec::{TokenCodec, VerifyError};
