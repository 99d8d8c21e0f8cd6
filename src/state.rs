/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - auth: Authenticator (公開鍵 + assertion policy), csrf: CsrfProtection
 * - Clone 前提で持つ (内部は Arc/Clone cheap)、起動後は read-only
 */
use std::sync::Arc;

use crate::services::{auth::Authenticator, csrf::CsrfProtection};

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<Authenticator>,
    pub csrf: CsrfProtection,
}

impl AppState {
    pub fn new(auth: Arc<Authenticator>, csrf: CsrfProtection) -> Self {
        Self { auth, csrf }
    }
}
