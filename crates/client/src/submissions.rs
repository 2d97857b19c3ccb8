use crate::error::Result;
use crate::http::{ApiClient, MaybePaged};
use forms_protocol::{
    DashboardEnvelope, FrameworkRef, SubmissionItem, SubmissionRead, TemplateDetail, TemplateRef,
};
use std::collections::HashMap;

impl ApiClient {
    /// Ensure-or-create the customer's submission for a template. The backend
    /// returns the submission already hydrated, or null when the template has
    /// no form for this customer.
    pub async fn ensure_submission(
        &self,
        client_id: i64,
        template_slug: &str,
    ) -> Result<DashboardEnvelope> {
        self.get_json(
            &format!("/responses/dashboard/{client_id}/"),
            &[("ensure", "1".to_string()), ("template", template_slug.to_string())],
        )
        .await
    }

    pub async fn list_submissions(&self, customer: i64) -> Result<Vec<SubmissionItem>> {
        let listed: MaybePaged<SubmissionRead> = self
            .get_json("/responses/submissions/", &[("customer", customer.to_string())])
            .await?;
        self.hydrate(listed.into_vec()).await
    }

    /// Move a draft to review. Tries the dedicated action first and falls
    /// back to a plain status PATCH on deployments that lack it.
    pub async fn start_review(&self, submission_id: i64) -> Result<SubmissionItem> {
        let raw: SubmissionRead = match self
            .post_empty(&format!("/responses/submissions/{submission_id}/start_review/"))
            .await
        {
            Ok(raw) => raw,
            Err(err) => {
                log::debug!("start_review action unavailable, patching status: {err}");
                self.patch_json(
                    &format!("/responses/submissions/{submission_id}/"),
                    &serde_json::json!({ "status": "in_review" }),
                )
                .await?
            }
        };
        self.hydrate_one(raw).await
    }

    pub async fn submit(&self, submission_id: i64) -> Result<SubmissionItem> {
        let raw: SubmissionRead = self
            .post_empty(&format!("/responses/submissions/{submission_id}/submit/"))
            .await?;
        self.hydrate_one(raw).await
    }

    /// Resolve flat template/framework ids into descriptors. Each distinct
    /// template is fetched once; a failed fetch degrades to a placeholder
    /// instead of sinking the whole listing.
    async fn hydrate(&self, items: Vec<SubmissionRead>) -> Result<Vec<SubmissionItem>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut template_ids: Vec<i64> = items.iter().map(|item| item.template).collect();
        template_ids.sort_unstable();
        template_ids.dedup();

        let mut templates: HashMap<i64, TemplateDetail> = HashMap::new();
        for id in template_ids {
            match self.template_detail(id).await {
                Ok(detail) => {
                    templates.insert(id, detail);
                }
                Err(err) => log::warn!("template {id} fetch failed during hydration: {err}"),
            }
        }

        Ok(items
            .into_iter()
            .map(|item| {
                let detail = templates.get(&item.template);
                compose_item(item, detail)
            })
            .collect())
    }

    async fn hydrate_one(&self, raw: SubmissionRead) -> Result<SubmissionItem> {
        let detail = self.template_detail(raw.template).await.ok();
        Ok(compose_item(raw, detail.as_ref()))
    }
}

fn compose_item(read: SubmissionRead, detail: Option<&TemplateDetail>) -> SubmissionItem {
    let template = match detail {
        Some(tpl) => TemplateRef {
            id: tpl.id,
            name: tpl.name.clone(),
            slug: tpl.slug.clone(),
            version: tpl.version.clone(),
        },
        None => TemplateRef {
            id: read.template,
            name: format!("Template #{}", read.template),
            slug: format!("template-{}", read.template),
            version: String::new(),
        },
    };
    let framework = match detail {
        Some(tpl) => FrameworkRef {
            id: tpl.framework.id,
            name: tpl.framework.name.clone(),
            slug: tpl.framework.slug.clone(),
            version: tpl.framework.version.clone(),
        },
        None => FrameworkRef {
            id: read.framework,
            name: format!("Framework #{}", read.framework),
            slug: format!("framework-{}", read.framework),
            version: String::new(),
        },
    };

    SubmissionItem {
        id: read.id,
        status: read.status,
        progress: read.progress,
        version: read.version,
        created_at: read.created_at,
        updated_at: read.updated_at,
        template,
        framework,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forms_protocol::{Framework, SubmissionStatus};
    use pretty_assertions::assert_eq;

    fn read(template: i64, framework: i64) -> SubmissionRead {
        serde_json::from_value(serde_json::json!({
            "id": 11,
            "customer": 2,
            "template": template,
            "framework": framework,
            "status": "draft",
            "progress": "0.00",
        }))
        .expect("read decodes")
    }

    #[test]
    fn compose_uses_template_detail_when_present() {
        let detail = TemplateDetail {
            id: 5,
            name: "CSF 2.0 Assessment".into(),
            slug: "csf-2".into(),
            version: "2.0".into(),
            description: String::new(),
            framework: Framework {
                id: 9,
                slug: "nist-csf".into(),
                name: "NIST CSF".into(),
                version: "2.0".into(),
                description: String::new(),
                active: true,
            },
        };
        let item = compose_item(read(5, 9), Some(&detail));
        assert_eq!(item.status, SubmissionStatus::Draft);
        assert_eq!(item.template.slug, "csf-2");
        assert_eq!(item.framework.name, "NIST CSF");
    }

    #[test]
    fn compose_falls_back_to_placeholders() {
        let item = compose_item(read(5, 9), None);
        assert_eq!(item.template.name, "Template #5");
        assert_eq!(item.template.slug, "template-5");
        assert_eq!(item.framework.slug, "framework-9");
    }
}
