mod activity;
mod labor;
mod museum;
mod organization;
mod pagination;

pub use activity::{Activity, CreateActivity, UpdateActivity, VisitorCategory};
pub use labor::{LaborData, LaborFot};
pub use museum::{CreateMuseum, Museum, MuseumType, UpdateMuseum};
pub use organization::{CreateOrganization, Organization, UpdateOrganization};
pub use pagination::PaginatedResponse;
