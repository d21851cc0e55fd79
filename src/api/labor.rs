use super::{transform, ApiClient, ApiError};
use crate::models::LaborData;

#[derive(Debug, Clone, Copy)]
pub struct Labor<'a> {
    api: &'a ApiClient,
}

impl<'a> Labor<'a> {
    pub(super) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn by_organization(self, organization_id: i64) -> Result<LaborData, ApiError> {
        let body = self
            .api
            .get_json(&format!("/labor/organization/{}", organization_id), &[])
            .await?;
        Ok(transform::labor(&body))
    }

    pub async fn find_by_inn(self, inn: &str) -> Result<LaborData, ApiError> {
        let body = self
            .api
            .get_json("/labor/search/by-inn", &[("inn", inn.to_string())])
            .await?;
        Ok(transform::labor(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_by_organization_keeps_fot_absence() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/labor/organization/2")
            .with_status(200)
            .with_body(r#"{"total_staff_annual":12}"#)
            .create_async()
            .await;

        let client =
            ApiClient::with_base_url(&format!("{}/api/v1", server.url()), Duration::from_secs(5)).unwrap();
        let labor = client.labor().by_organization(2).await.unwrap();
        assert_eq!(labor.total_staff_annual, Some(12));
        assert!(labor.fot.is_none());
    }
}
