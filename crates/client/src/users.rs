use crate::error::Result;
use crate::http::{ApiClient, MaybePaged};
use forms_protocol::{UserListItem, UserPayload};

/// Filters for the user management listing.
#[derive(Debug, Clone, Default)]
pub struct ListUsersQuery {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListUsersQuery {
    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("page_size", page_size.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(is_active) = self.is_active {
            pairs.push(("is_active", is_active.to_string()));
        }
        pairs
    }
}

impl ApiClient {
    pub async fn list_users(&self, query: &ListUsersQuery) -> Result<Vec<UserListItem>> {
        let listed: MaybePaged<UserListItem> =
            self.get_json("/users/", &query.to_pairs()).await?;
        Ok(listed.into_vec())
    }

    pub async fn get_user(&self, id: i64) -> Result<UserListItem> {
        self.get_json(&format!("/users/{id}/"), &[]).await
    }

    pub async fn create_user(&self, payload: &UserPayload) -> Result<UserListItem> {
        self.post_json("/users/", payload).await
    }

    pub async fn update_user(&self, id: i64, payload: &UserPayload) -> Result<UserListItem> {
        self.patch_json(&format!("/users/{id}/"), payload).await
    }

    pub async fn set_user_active(&self, id: i64, is_active: bool) -> Result<()> {
        let _: serde_json::Value = self
            .post_json(
                &format!("/users/{id}/set_active/"),
                &serde_json::json!({ "is_active": is_active }),
            )
            .await?;
        Ok(())
    }

    pub async fn delete_user(&self, id: i64) -> Result<()> {
        self.delete(&format!("/users/{id}/")).await
    }
}
