use reqwest::Method;

use super::{transform, ApiClient, ApiError};
use crate::models::{CreateOrganization, Organization, PaginatedResponse, UpdateOrganization};

/// Query for the paginated organization list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationFilters {
    pub page: u32,
    pub page_size: u32,
    /// Sent verbatim; callers uppercase it (see `pager::normalize_name_filter`)
    pub name: Option<String>,
}

impl OrganizationFilters {
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
        ];
        if let Some(name) = self.name.as_ref().filter(|n| !n.is_empty()) {
            query.push(("name", name.clone()));
        }
        query
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Organizations<'a> {
    api: &'a ApiClient,
}

impl<'a> Organizations<'a> {
    pub(super) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(self) -> Result<Vec<Organization>, ApiError> {
        let body = self.api.get_json("/organization", &[]).await?;
        transform::organization_list(&body)
    }

    pub async fn list_page(
        self,
        filters: &OrganizationFilters,
    ) -> Result<PaginatedResponse<Organization>, ApiError> {
        let body = self.api.get_json("/organization", &filters.to_query()).await?;
        transform::page(&body, transform::organization)
    }

    pub async fn get(self, id: i64) -> Result<Organization, ApiError> {
        let body = self.api.get_json(&format!("/organization/{}", id), &[]).await?;
        Ok(transform::organization(&body))
    }

    pub async fn find_by_inn(self, inn: &str) -> Result<Organization, ApiError> {
        let body = self
            .api
            .get_json("/organization/search/by-inn", &[("inn", inn.to_string())])
            .await?;
        Ok(transform::organization(&body))
    }

    pub async fn create(self, dto: &CreateOrganization) -> Result<Organization, ApiError> {
        let body = self.api.send_json(Method::POST, "/organization", dto).await?;
        Ok(transform::organization(&body))
    }

    pub async fn update(self, id: i64, dto: &UpdateOrganization) -> Result<Organization, ApiError> {
        let body = self
            .api
            .send_json(Method::PUT, &format!("/organization/{}", id), dto)
            .await?;
        Ok(transform::organization(&body))
    }

    pub async fn delete(self, id: i64) -> Result<(), ApiError> {
        self.api
            .send_unit::<()>(Method::DELETE, &format!("/organization/{}", id), &[], None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::time::Duration;

    fn client(server: &mockito::ServerGuard) -> ApiClient {
        ApiClient::with_base_url(&format!("{}/api/v1", server.url()), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_filters_query() {
        let filters = OrganizationFilters {
            page: 2,
            page_size: 20,
            name: Some("MUSEUM".to_string()),
        };
        assert_eq!(
            filters.to_query(),
            vec![
                ("page", "2".to_string()),
                ("page_size", "20".to_string()),
                ("name", "MUSEUM".to_string()),
            ]
        );

        let no_name = OrganizationFilters {
            page: 1,
            page_size: 10,
            name: Some(String::new()),
        };
        assert_eq!(no_name.to_query().len(), 2);
    }

    #[tokio::test]
    async fn test_list_transforms_items() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/organization")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"ID":1,"INN":"77","Name":"Fund","ExistMuseum":true}]"#)
            .create_async()
            .await;

        let orgs = client(&server).organizations().list().await.unwrap();
        mock.assert_async().await;
        assert_eq!(orgs.len(), 1);
        assert_eq!(orgs[0].name, "Fund");
        assert!(orgs[0].exist_museum);
    }

    #[tokio::test]
    async fn test_list_page_sends_filters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/organization")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "3".into()),
                Matcher::UrlEncoded("page_size".into(), "10".into()),
                Matcher::UrlEncoded("name".into(), "ABC".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"data":[{"ID":21,"Name":"ABC"}],"page":3,"page_size":10,"total_count":21,"total_pages":3}"#)
            .create_async()
            .await;

        let filters = OrganizationFilters {
            page: 3,
            page_size: 10,
            name: Some("ABC".to_string()),
        };
        let page = client(&server).organizations().list_page(&filters).await.unwrap();
        mock.assert_async().await;
        assert_eq!(page.page, 3);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.data[0].id, 21);
    }

    #[tokio::test]
    async fn test_find_by_inn_encodes_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/organization/search/by-inn")
            .match_query(Matcher::UrlEncoded("inn".into(), "77 01".into()))
            .with_status(200)
            .with_body(r#"{"ID":4,"INN":"77 01","Name":"X"}"#)
            .create_async()
            .await;

        let org = client(&server).organizations().find_by_inn("77 01").await.unwrap();
        mock.assert_async().await;
        assert_eq!(org.id, 4);
    }

    #[tokio::test]
    async fn test_create_posts_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/organization")
            .match_body(Matcher::Json(serde_json::json!({
                "inn": "7701", "name": "Fund", "exist_museum": false
            })))
            .with_status(201)
            .with_body(r#"{"ID":9,"INN":"7701","Name":"Fund","ExistMuseum":false}"#)
            .create_async()
            .await;

        let dto = CreateOrganization {
            inn: "7701".to_string(),
            name: "Fund".to_string(),
            exist_museum: false,
        };
        let created = client(&server).organizations().create(&dto).await.unwrap();
        mock.assert_async().await;
        assert_eq!(created.id, 9);
    }

    #[tokio::test]
    async fn test_error_body_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("PUT", "/api/v1/organization/5")
            .with_status(409)
            .with_body(r#"{"error":"duplicate inn"}"#)
            .create_async()
            .await;

        let dto = UpdateOrganization {
            inn: "1".to_string(),
            name: "n".to_string(),
            exist_museum: false,
        };
        let err = client(&server).organizations().update(5, &dto).await.unwrap_err();
        assert_eq!(err.user_message("Failed to update organization"), "duplicate inn");
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/organization/404")
            .with_status(404)
            .create_async()
            .await;

        let err = client(&server).organizations().get(404).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.user_message("Organization not found"), "Organization not found");
    }

    #[tokio::test]
    async fn test_delete() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/v1/organization/3")
            .with_status(204)
            .create_async()
            .await;

        client(&server).organizations().delete(3).await.unwrap();
        mock.assert_async().await;
    }
}
