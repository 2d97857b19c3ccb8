use serde::{Deserialize, Serialize};

/// Closed role type. Raw role strings arrive from the backend in two locales
/// and are normalized exactly once at the API boundary; nothing downstream
/// compares role strings again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Client,
    Subclient,
    Analyst,
    Manager,
    Guest,
}

impl Role {
    pub fn normalize(raw: &str) -> Role {
        match raw.trim().to_lowercase().as_str() {
            "cliente" | "client" => Role::Client,
            "subcliente" | "subclient" => Role::Subclient,
            "analista" | "analyst" => Role::Analyst,
            "gestor" | "manager" | "admin" | "administrator" => Role::Manager,
            _ => Role::Guest,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Subclient => "subclient",
            Role::Analyst => "analyst",
            Role::Manager => "manager",
            Role::Guest => "guest",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
