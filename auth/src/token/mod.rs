pub mod claims;
pub mod codec;
pub mod errors;
pub mod issuer;
pub mod timed;

pub use claims::Claims;
pub use claims::RefreshClaims;
pub use codec::Envelope;
pub use codec::SignedTokenCodec;
pub use errors::TimedTokenError;
pub use errors::TokenError;
pub use issuer::TokenIssuer;
pub use timed::TimedPayload;
pub use timed::TimedTokenSerializer;
