use crate::role::Role;
use serde::{Deserialize, Serialize};

/// `/users/me/` as it comes off the wire. Field names vary between backend
/// revisions (en and pt-BR), hence the aliases; convert to `UserProfile`
/// before handing the user to anything else.
#[derive(Debug, Clone, Deserialize)]
pub struct UserWire {
    pub id: i64,
    pub email: String,
    #[serde(default, alias = "nome")]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// Parent customer id, set for subclient accounts.
    #[serde(default, alias = "cliente")]
    pub client: Option<i64>,
    #[serde(default, alias = "permissoes", alias = "perms")]
    pub permissions: Vec<String>,
}

/// Authenticated user with the role already normalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub client: Option<i64>,
    pub permissions: Vec<String>,
}

impl UserProfile {
    /// The customer a submission belongs to: subclients act on behalf of
    /// their parent customer, everyone else on their own account.
    pub fn acting_client_id(&self) -> i64 {
        match self.role {
            Role::Subclient => self.client.unwrap_or(self.id),
            _ => self.id,
        }
    }
}

impl From<UserWire> for UserProfile {
    fn from(wire: UserWire) -> Self {
        UserProfile {
            id: wire.id,
            name: wire.name.unwrap_or_default(),
            role: Role::normalize(wire.role.as_deref().unwrap_or_default()),
            email: wire.email,
            client: wire.client,
            permissions: wire.permissions,
        }
    }
}

/// Row of the user management listing. `companies` arrives as either
/// "empresas" or the legacy "empresa" key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListItem {
    pub id: i64,
    #[serde(default, alias = "nome")]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, alias = "empresas", alias = "empresa")]
    pub companies: Option<String>,
    #[serde(default, alias = "cliente")]
    pub client: Option<i64>,
}

impl UserListItem {
    pub fn role(&self) -> Role {
        Role::normalize(self.role.as_deref().unwrap_or_default())
    }
}

/// Create/update body for user management. All fields optional on update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
