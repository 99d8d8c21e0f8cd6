/// Factory: build `Authenticator` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{
    Authenticator, TokenParser,
    key_loader::{KeyLoadError, load_public_key},
};

pub fn build_authenticator(config: &Config) -> Result<Arc<Authenticator>, KeyLoadError> {
    let key = load_public_key(&config.public_key_path)?;

    let parser = TokenParser::new(
        key,
        config.auth_issuer.as_deref(),
        config.access_token_leeway_seconds,
    );

    Ok(Arc::new(Authenticator::new(
        parser,
        config.assertion_policy(),
    )))
}
