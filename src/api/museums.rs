use reqwest::Method;

use super::{transform, ApiClient, ApiError};
use crate::models::{CreateMuseum, Museum, MuseumType, PaginatedResponse, UpdateMuseum};

/// Query for the paginated museum list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuseumFilters {
    pub page: u32,
    pub page_size: u32,
    pub name: Option<String>,
    pub museum_type: Option<MuseumType>,
}

impl MuseumFilters {
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
        ];
        if let Some(name) = self.name.as_ref().filter(|n| !n.is_empty()) {
            query.push(("name", name.clone()));
        }
        if let Some(museum_type) = self.museum_type {
            query.push(("museum_type", museum_type.as_str().to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Museums<'a> {
    api: &'a ApiClient,
}

impl<'a> Museums<'a> {
    pub(super) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(self) -> Result<Vec<Museum>, ApiError> {
        let body = self.api.get_json("/museum", &[]).await?;
        transform::museum_list(&body)
    }

    pub async fn list_page(self, filters: &MuseumFilters) -> Result<PaginatedResponse<Museum>, ApiError> {
        let body = self.api.get_json("/museum", &filters.to_query()).await?;
        transform::page(&body, transform::museum)
    }

    pub async fn get(self, id: i64) -> Result<Museum, ApiError> {
        let body = self.api.get_json(&format!("/museum/{}", id), &[]).await?;
        Ok(transform::museum(&body))
    }

    pub async fn find_by_inn(self, inn: &str) -> Result<Museum, ApiError> {
        let body = self
            .api
            .get_json("/museum/search/by-inn", &[("inn", inn.to_string())])
            .await?;
        Ok(transform::museum(&body))
    }

    pub async fn find_by_owner(self, owner_id: i64) -> Result<Vec<Museum>, ApiError> {
        let body = self.api.get_json(&format!("/museum/owner/{}", owner_id), &[]).await?;
        transform::museum_list(&body)
    }

    pub async fn create(self, dto: &CreateMuseum) -> Result<Museum, ApiError> {
        let body = self.api.send_json(Method::POST, "/museum", dto).await?;
        Ok(transform::museum(&body))
    }

    pub async fn update(self, id: i64, dto: &UpdateMuseum) -> Result<Museum, ApiError> {
        let body = self
            .api
            .send_json(Method::PUT, &format!("/museum/{}", id), dto)
            .await?;
        Ok(transform::museum(&body))
    }

    pub async fn delete(self, id: i64) -> Result<(), ApiError> {
        self.api
            .send_unit::<()>(Method::DELETE, &format!("/museum/{}", id), &[], None)
            .await
    }
}
