use serde::{Deserialize, Serialize};

/// An organization that may own one or more museums.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub inn: String,
    pub name: String,
    pub exist_museum: bool,
}

impl Organization {
    pub fn new(id: i64, inn: String, name: String) -> Self {
        Self {
            id,
            inn,
            name,
            exist_museum: false,
        }
    }

    pub fn exist_museum_label(&self) -> &'static str {
        if self.exist_museum {
            "Yes"
        } else {
            "No"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrganization {
    pub inn: String,
    pub name: String,
    pub exist_museum: bool,
}

/// Same shape as the create payload; the id travels in the URL.
pub type UpdateOrganization = CreateOrganization;

impl From<&Organization> for UpdateOrganization {
    fn from(org: &Organization) -> Self {
        Self {
            inn: org.inn.clone(),
            name: org.name.clone(),
            exist_museum: org.exist_museum,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_new() {
        let org = Organization::new(7, "7701234567".to_string(), "Culture Fund".to_string());
        assert_eq!(org.id, 7);
        assert!(!org.exist_museum);
        assert_eq!(org.exist_museum_label(), "No");
    }

    #[test]
    fn test_update_payload_from_organization() {
        let mut org = Organization::new(1, "123".to_string(), "Fund".to_string());
        org.exist_museum = true;
        let dto = UpdateOrganization::from(&org);
        assert_eq!(dto.inn, "123");
        assert_eq!(dto.name, "Fund");
        assert!(dto.exist_museum);
    }
}
