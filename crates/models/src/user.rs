use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
    Retailer,
    /// Any role this client has no dashboard for.
    #[serde(other)]
    Other,
}

impl Role {
    /// Landing page after sign-in; plain users stay on the storefront.
    pub fn dashboard_path(&self) -> Option<&'static str> {
        match self {
            Role::Admin => Some("/dashboard/admin/dashboard"),
            Role::Retailer => Some("/dashboard/retailer/dashboard"),
            Role::User | Role::Other => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Body of `POST /api/v1/auth/signup`. Self-service accounts are retailers.
#[derive(Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
    pub role: Role,
}

impl std::fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &"***")
            .field("role", &self.role)
            .finish()
    }
}

impl SignUpRequest {
    /// Blank phone numbers are dropped rather than sent.
    pub fn retailer(
        full_name: impl Into<String>,
        email: impl Into<String>,
        phone: Option<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            phone: phone.filter(|p| !p.trim().is_empty()),
            password: password.into(),
            role: Role::Retailer,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        let name_len = self.full_name.trim().chars().count();
        if !(3..=100).contains(&name_len) {
            return Err(ModelError::Validation("fullName must be 3 to 100 characters".into()));
        }
        if !looks_like_email(&self.email) {
            return Err(ModelError::Validation(format!("invalid email address: {}", self.email)));
        }
        if let Some(phone) = &self.phone {
            if !phone.chars().all(|c| c.is_ascii_digit() || c == '+' || c == '-') {
                return Err(ModelError::Validation("phone may only contain digits, + and -".into()));
            }
            if phone.chars().count() < 7 {
                return Err(ModelError::Validation("phone must be at least 7 characters".into()));
            }
        }
        let pw_len = self.password.chars().count();
        if !(6..=50).contains(&pw_len) {
            return Err(ModelError::Validation("password must be 6 to 50 characters".into()));
        }
        Ok(())
    }
}

fn looks_like_email(s: &str) -> bool {
    let Some((local, domain)) = s.trim().split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.split('.').count() >= 2
        && domain.split('.').all(|part| !part.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retailer_lands_on_retailer_dashboard() -> anyhow::Result<()> {
        let u: User = serde_json::from_str(
            r#"{"_id":"u1","fullName":"Ali","email":"ali@example.com","role":"retailer"}"#,
        )?;
        assert_eq!(u.role.dashboard_path(), Some("/dashboard/retailer/dashboard"));
        assert!(u.phone.is_none());
        Ok(())
    }

    #[test]
    fn missing_role_defaults_to_user() -> anyhow::Result<()> {
        let u: User = serde_json::from_str(r#"{"fullName":"Sara","email":"s@example.com"}"#)?;
        assert_eq!(u.role, Role::User);
        assert_eq!(u.role.dashboard_path(), None);
        Ok(())
    }

    #[test]
    fn unknown_role_still_decodes() -> anyhow::Result<()> {
        let u: User = serde_json::from_str(
            r#"{"_id":"u9","fullName":"Ops","email":"ops@example.com","role":"staff"}"#,
        )?;
        assert_eq!(u.role, Role::Other);
        assert_eq!(u.role.dashboard_path(), None);
        Ok(())
    }

    #[test]
    fn signup_body_matches_backend() -> anyhow::Result<()> {
        let req = SignUpRequest::retailer("Corner Store", "shop@example.com", Some(String::new()), "secret1");
        req.validate()?;
        let v = serde_json::to_value(&req)?;
        assert_eq!(v["fullName"], "Corner Store");
        assert_eq!(v["role"], "retailer");
        assert!(v.get("phone").is_none());
        assert!(!format!("{req:?}").contains("secret1"));
        Ok(())
    }

    #[test]
    fn signup_rules() {
        let ok = SignUpRequest::retailer("Corner Store", "shop@example.com", Some("+92-300".into()), "secret1");
        assert!(ok.validate().is_ok());
        let cases = [
            SignUpRequest { full_name: "Al".into(), ..ok.clone() },
            SignUpRequest { email: "shop.example.com".into(), ..ok.clone() },
            SignUpRequest { email: "shop@localhost".into(), ..ok.clone() },
            SignUpRequest { phone: Some("12345".into()), ..ok.clone() },
            SignUpRequest { phone: Some("0300 1234567".into()), ..ok.clone() },
            SignUpRequest { password: "12345".into(), ..ok.clone() },
            SignUpRequest { password: "x".repeat(51), ..ok.clone() },
        ];
        for bad in cases {
            assert!(bad.validate().is_err(), "{bad:?} should be rejected");
        }
    }
}
