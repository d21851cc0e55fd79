use super::FormErrors;
use crate::models::{CreateOrganization, Organization};

/// Organization create/edit input. Name and INN are required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationForm {
    pub name: String,
    pub inn: String,
    pub exist_museum: bool,
}

impl OrganizationForm {
    pub fn from_organization(org: &Organization) -> Self {
        Self {
            name: org.name.clone(),
            inn: org.inn.clone(),
            exist_museum: org.exist_museum,
        }
    }

    pub fn validate(&self) -> Result<CreateOrganization, FormErrors> {
        let mut errors = FormErrors::default();
        let name = errors.required("name", &self.name);
        let inn = errors.required("inn", &self.inn);
        errors.finish(CreateOrganization {
            inn,
            name,
            exist_museum: self.exist_museum,
        })
    }
}
