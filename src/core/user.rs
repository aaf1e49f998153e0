use serde::{Deserialize, Serialize};

/// Console role as issued by the API.
///
/// Unknown role strings are kept verbatim so they survive a round trip;
/// they get the same read-mostly treatment as `convidado`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Colaborador,
    Convidado,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Colaborador => "colaborador",
            Self::Convidado => "convidado",
            Self::Other(s) => s,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, Self::Convidado)
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::Convidado
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "admin" => Self::Admin,
            "colaborador" => Self::Colaborador,
            "convidado" => Self::Convidado,
            _ => Self::Other(s),
        }
    }
}

impl From<Role> for String {
    fn from(r: Role) -> Self {
        r.as_str().to_string()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub contact: Option<String>,
    /// Shown as "Especialidade" in the collaborators list.
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub admission_date: Option<String>,
}

/// Nested user reference (`assigned_to`, `responsible`, `creator`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// Create/edit form for a collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    /// Left out of the payload when empty so an edit keeps the current password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: Role,
    pub contact: String,
    pub position: String,
    pub admission_date: String,
}

impl UserDraft {
    pub fn new() -> Self {
        Self {
            role: Role::Colaborador,
            ..Self::default()
        }
    }

    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            password: None,
            role: user.role.clone(),
            contact: user.contact.clone().unwrap_or_default(),
            position: user.position.clone().unwrap_or_default(),
            admission_date: user.admission_date.clone().unwrap_or_default(),
        }
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        let password = password.into();
        self.password = if password.is_empty() { None } else { Some(password) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_roundtrip_keeps_unknown_values() {
        let role: Role = serde_json::from_str("\"auditor\"").unwrap();
        assert_eq!(role, Role::Other("auditor".to_string()));
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"auditor\"");
        let admin: Role = serde_json::from_str("\"admin\"").unwrap();
        assert!(admin.is_admin());
    }

    #[test]
    fn user_profile_with_missing_optionals() {
        let user: User = serde_json::from_str(r#"{"id":7,"name":"Ana","role":"colaborador"}"#).unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.role, Role::Colaborador);
        assert!(user.contact.is_none());
    }

    #[test]
    fn edit_draft_omits_blank_password() {
        let mut draft = UserDraft::new();
        draft.name = "Ana".into();
        draft.set_password("");
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "colaborador");
    }
}
