use crate::error::Result;
use crate::http::{ApiClient, MaybePaged};
use forms_protocol::{DomainNode, Framework, TemplateDetail};

impl ApiClient {
    pub async fn list_frameworks(&self) -> Result<Vec<Framework>> {
        let listed: MaybePaged<Framework> = self.get_json("/frameworks/frameworks/", &[]).await?;
        Ok(listed.into_vec())
    }

    pub async fn template_detail(&self, id: i64) -> Result<TemplateDetail> {
        self.get_json(&format!("/frameworks/templates/{id}/"), &[]).await
    }

    /// Domain tree for one framework. The backend may or may not honor the
    /// `framework` query parameter, so the result is filtered again here.
    pub async fn domains_by_framework(&self, framework_id: i64) -> Result<Vec<DomainNode>> {
        let listed: MaybePaged<DomainNode> = self
            .get_json("/frameworks/domains/", &[("framework", framework_id.to_string())])
            .await?;
        Ok(listed
            .into_vec()
            .into_iter()
            .filter(|dom| dom.framework == framework_id)
            .collect())
    }
}
