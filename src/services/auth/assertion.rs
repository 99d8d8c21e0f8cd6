//! Organization / tenant claim assertions.

use thiserror::Error;

use crate::services::auth::token_parser::Claims;

/// Expected claim values, built once from `Config`.
///
/// `enabled = false` turns every check into a no-op (local/dev mode).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssertionPolicy {
    pub enabled: bool,
    pub assert_organization_with: Option<String>,
    pub assert_tenant: bool,
    pub assert_tenant_with: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssertionError {
    #[error("organization '{actual}' does not match expected '{expected}'")]
    OrganizationMismatch { expected: String, actual: String },
    #[error("tenant '{actual}' does not match expected '{expected}'")]
    TenantMismatch { expected: String, actual: String },
    #[error("tenant claim is empty")]
    TenantMissing,
}

impl AssertionPolicy {
    /// Checks run in a fixed order (organization, then tenant); the first failure is returned.
    pub fn check(&self, claims: &Claims) -> Result<(), AssertionError> {
        if !self.enabled {
            return Ok(());
        }

        if let Some(expected) = &self.assert_organization_with
            && *expected != claims.organization
        {
            return Err(AssertionError::OrganizationMismatch {
                expected: expected.clone(),
                actual: claims.organization.clone(),
            });
        }

        if self.assert_tenant {
            match &self.assert_tenant_with {
                Some(expected) if *expected != claims.tenant => {
                    return Err(AssertionError::TenantMismatch {
                        expected: expected.clone(),
                        actual: claims.tenant.clone(),
                    });
                }
                Some(_) => {}
                // Without an expected value the tenant only has to be present.
                None if claims.tenant.is_empty() => return Err(AssertionError::TenantMissing),
                None => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn claims(org: &str, tenant: &str) -> Claims {
        Claims {
            subject: "admin".into(),
            organization: org.into(),
            tenant: tenant.into(),
            scopes: vec!["ROLE_USER".into()],
            issuer: "Chumbok".into(),
            issued_at: Some(Utc::now()),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    fn strict() -> AssertionPolicy {
        AssertionPolicy {
            enabled: true,
            assert_organization_with: Some("Chumbok".into()),
            assert_tenant: true,
            assert_tenant_with: Some("Chumbok".into()),
        }
    }

    #[test]
    fn matching_claims_pass() {
        assert_eq!(strict().check(&claims("Chumbok", "Chumbok")), Ok(()));
    }

    #[test]
    fn disabled_policy_accepts_anything() {
        let policy = AssertionPolicy {
            enabled: false,
            ..strict()
        };
        assert_eq!(policy.check(&claims("OtherOrg", "")), Ok(()));
    }

    #[test]
    fn organization_mismatch() {
        let err = strict().check(&claims("OtherOrg", "Chumbok")).unwrap_err();
        assert_eq!(
            err,
            AssertionError::OrganizationMismatch {
                expected: "Chumbok".into(),
                actual: "OtherOrg".into(),
            }
        );
    }

    #[test]
    fn organization_is_case_sensitive() {
        let err = strict().check(&claims("chumbok", "Chumbok")).unwrap_err();
        assert!(matches!(err, AssertionError::OrganizationMismatch { .. }));
    }

    #[test]
    fn organization_is_reported_before_tenant() {
        let err = strict().check(&claims("OtherOrg", "OtherTenant")).unwrap_err();
        assert!(matches!(err, AssertionError::OrganizationMismatch { .. }));
    }

    #[test]
    fn tenant_mismatch() {
        let err = strict().check(&claims("Chumbok", "OtherTenant")).unwrap_err();
        assert!(matches!(err, AssertionError::TenantMismatch { .. }));
    }

    #[test]
    fn tenant_presence_only_when_no_expected_value() {
        let policy = AssertionPolicy {
            assert_tenant_with: None,
            ..strict()
        };
        assert_eq!(policy.check(&claims("Chumbok", "AnyTenant")), Ok(()));
        assert_eq!(
            policy.check(&claims("Chumbok", "")),
            Err(AssertionError::TenantMissing)
        );
    }

    #[test]
    fn tenant_ignored_when_not_asserted() {
        let policy = AssertionPolicy {
            assert_tenant: false,
            ..strict()
        };
        assert_eq!(policy.check(&claims("Chumbok", "")), Ok(()));
    }

    #[test]
    fn no_organization_expectation_accepts_any_org() {
        let policy = AssertionPolicy {
            assert_organization_with: None,
            ..strict()
        };
        assert_eq!(policy.check(&claims("Anything", "Chumbok")), Ok(()));
    }
}
