pub mod bearer;
pub mod identity;
pub mod validated_json;

pub use bearer::BearerToken;
pub use identity::RequestIdentity;
pub use validated_json::{Validate, ValidatedJson};
