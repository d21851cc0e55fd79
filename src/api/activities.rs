use reqwest::Method;

use super::{transform, ApiClient, ApiError};
use crate::models::{Activity, CreateActivity, UpdateActivity};

#[derive(Debug, Clone, Copy)]
pub struct Activities<'a> {
    api: &'a ApiClient,
}

impl<'a> Activities<'a> {
    pub(super) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(self) -> Result<Vec<Activity>, ApiError> {
        let body = self.api.get_json("/activity", &[]).await?;
        transform::activity_list(&body)
    }

    pub async fn find_by_inn(self, inn: &str) -> Result<Vec<Activity>, ApiError> {
        let body = self
            .api
            .get_json("/activity/search/by-inn", &[("inn", inn.to_string())])
            .await?;
        transform::activity_list(&body)
    }

    pub async fn find_by_museum(self, museum_id: i64) -> Result<Vec<Activity>, ApiError> {
        let body = self
            .api
            .get_json(&format!("/activity/museum/{}", museum_id), &[])
            .await?;
        transform::activity_list(&body)
    }

    /// The backend does not echo the created record.
    pub async fn create(self, dto: &CreateActivity) -> Result<(), ApiError> {
        self.api
            .send_unit(Method::POST, "/activity", &[], Some(dto))
            .await
    }

    pub async fn update(self, dto: &UpdateActivity) -> Result<(), ApiError> {
        self.api
            .send_unit(Method::PUT, "/activity", &[], Some(dto))
            .await
    }

    pub async fn delete(self, id: i64) -> Result<(), ApiError> {
        self.api
            .send_unit::<()>(Method::DELETE, "/activity", &[("id", id.to_string())], None)
            .await
    }
}
