pub mod assertion;
pub mod authenticator;
pub mod factory;
pub mod key_loader;
pub mod security_context;
pub mod token_parser;

#[cfg(test)]
pub(crate) mod test_support;

pub use assertion::{AssertionError, AssertionPolicy};
pub use authenticator::{AuthError, AuthResult, AuthStage, Authenticator};
pub use factory::build_authenticator;
pub use key_loader::{KeyLoadError, PublicKey, load_public_key};
pub use security_context::SecurityContext;
pub use token_parser::{Claims, ParseError, TokenParser};
