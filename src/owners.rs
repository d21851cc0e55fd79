//! Owner organization lookup for list pages.
//!
//! A page of museums or activities references owners by id. The distinct ids
//! of the visible page are fetched concurrently and joined into one lookup;
//! a failed fetch only leaves that owner out.

use async_trait::async_trait;
use futures_util::future::join_all;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

use crate::api::{ApiClient, ApiError};
use crate::models::Organization;

/// Shown in place of an owner that could not be resolved.
pub const OWNER_PLACEHOLDER: &str = "—";

pub type OwnerLookup = HashMap<i64, Organization>;

#[async_trait]
pub trait OwnerSource: Sync {
    async fn fetch_owner(&self, id: i64) -> Result<Organization, ApiError>;
}

#[async_trait]
impl OwnerSource for ApiClient {
    async fn fetch_owner(&self, id: i64) -> Result<Organization, ApiError> {
        self.organizations().get(id).await
    }
}

/// Distinct positive owner ids, in ascending order.
pub fn distinct_owner_ids<I>(ids: I) -> Vec<i64>
where
    I: IntoIterator<Item = i64>,
{
    ids.into_iter()
        .filter(|id| *id > 0)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Fetch every distinct owner at once and wait for all of them.
pub async fn resolve_owners<S, I>(source: &S, ids: I) -> OwnerLookup
where
    S: OwnerSource + ?Sized,
    I: IntoIterator<Item = i64>,
{
    let ids = distinct_owner_ids(ids);
    if ids.is_empty() {
        return OwnerLookup::new();
    }
    debug!(count = ids.len(), "resolving owners");

    let results = join_all(ids.iter().map(|id| source.fetch_owner(*id))).await;

    let mut lookup = OwnerLookup::with_capacity(ids.len());
    for (id, result) in ids.into_iter().zip(results) {
        match result {
            Ok(org) => {
                lookup.insert(id, org);
            }
            Err(e) => warn!(owner_id = id, error = %e, "owner lookup failed"),
        }
    }
    lookup
}

/// Owner name for display, or the placeholder.
pub fn owner_name(lookup: &OwnerLookup, id: i64) -> &str {
    lookup
        .get(&id)
        .map(|org| org.name.as_str())
        .unwrap_or(OWNER_PLACEHOLDER)
}
