/*
 * Responsibility
 * - Handler から見える per-request のセキュリティコンテキスト
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - 署名検証や claim assertion は token_parser / assertion 側の責務
 * - 認可 (どの route が anonymous を許すか) はここでは判断しない
 */

use crate::services::auth::token_parser::Claims;

/// Principal reported for requests without an established identity.
pub const ANONYMOUS_PRINCIPAL: &str = "anonymousUser";

// organization, tenant and subject are joined with this marker: `Chumbok13Chumbok13admin`
const PRINCIPAL_SEPARATOR: &str = "13";

/// Security context attached to every request that passed the authentication layer.
///
/// - `principal` is `<org>13<tenant>13<sub>` for display/audit; it is not a security boundary
/// - `authorities` are the token scopes, de-duplicated, in token order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityContext {
    principal: String,
    authorities: Vec<String>,
    authenticated: bool,
    identity: Option<Identity>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Identity {
    subject: String,
    organization: String,
    tenant: String,
}

impl SecurityContext {
    pub fn anonymous() -> Self {
        Self {
            principal: ANONYMOUS_PRINCIPAL.to_string(),
            authorities: Vec::new(),
            authenticated: false,
            identity: None,
        }
    }

    /// Only called with claims that already passed signature and assertion checks.
    pub(crate) fn from_claims(claims: &Claims) -> Self {
        let principal = [
            claims.organization.as_str(),
            claims.tenant.as_str(),
            claims.subject.as_str(),
        ]
        .join(PRINCIPAL_SEPARATOR);

        let mut authorities: Vec<String> = Vec::with_capacity(claims.scopes.len());
        for scope in &claims.scopes {
            if !authorities.contains(scope) {
                authorities.push(scope.clone());
            }
        }

        Self {
            principal,
            authorities,
            authenticated: true,
            identity: Some(Identity {
                subject: claims.subject.clone(),
                organization: claims.organization.clone(),
                tenant: claims.tenant.clone(),
            }),
        }
    }

    pub fn principal(&self) -> &str {
        &self.principal
    }

    pub fn authorities(&self) -> &[String] {
        &self.authorities
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }

    pub fn subject(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.subject.as_str())
    }

    pub fn organization(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.organization.as_str())
    }

    pub fn tenant(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.tenant.as_str())
    }
}

impl Default for SecurityContext {
    fn default() -> Self {
        Self::anonymous()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn claims(scopes: &[&str]) -> Claims {
        Claims {
            subject: "admin".into(),
            organization: "Chumbok".into(),
            tenant: "Chumbok".into(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            issuer: "Chumbok".into(),
            issued_at: None,
            expires_at: Utc::now() + Duration::minutes(5),
        }
    }

    #[test]
    fn principal_joins_org_tenant_subject() {
        let ctx = SecurityContext::from_claims(&claims(&["ROLE_SUPERADMIN"]));

        assert_eq!(ctx.principal(), "Chumbok13Chumbok13admin");
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.subject(), Some("admin"));
        assert_eq!(ctx.organization(), Some("Chumbok"));
        assert_eq!(ctx.tenant(), Some("Chumbok"));
    }

    #[test]
    fn authorities_are_deduplicated_in_order() {
        let ctx = SecurityContext::from_claims(&claims(&["ROLE_B", "ROLE_A", "ROLE_B"]));

        assert_eq!(ctx.authorities(), &["ROLE_B", "ROLE_A"]);
        assert!(ctx.has_authority("ROLE_A"));
        assert!(!ctx.has_authority("ROLE_C"));
    }

    #[test]
    fn anonymous_context() {
        let ctx = SecurityContext::default();

        assert_eq!(ctx.principal(), ANONYMOUS_PRINCIPAL);
        assert!(ctx.authorities().is_empty());
        assert!(!ctx.is_authenticated());
        assert_eq!(ctx.subject(), None);
    }
}
