use super::{field_text, optional_text, FormErrors};
use crate::models::{CreateMuseum, Museum, MuseumType};

/// Museum create/edit input.
///
/// Required: name, INN and a positive owner id. Counts are optional
/// integers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MuseumForm {
    pub id_owner: String,
    pub inn: String,
    pub kpp: String,
    pub founder: String,
    pub name: String,
    pub museum_legal_status: String,
    pub museum_activity_in_charter: bool,
    pub types: Vec<MuseumType>,
    pub annual_visitor_capacity: String,
    pub internal_visitors_count: String,
    pub external_visitors_count: String,
    pub is_valuable_cultural_heritage: bool,
    pub valuable_museum_items_count: String,
}

impl MuseumForm {
    pub fn from_museum(museum: &Museum) -> Self {
        Self {
            id_owner: museum.id_owner.to_string(),
            inn: museum.inn.clone(),
            kpp: museum.kpp.clone().unwrap_or_default(),
            founder: museum.founder.clone().unwrap_or_default(),
            name: museum.name.clone(),
            museum_legal_status: museum.museum_legal_status.clone().unwrap_or_default(),
            museum_activity_in_charter: museum.museum_activity_in_charter,
            types: MuseumType::ALL
                .iter()
                .copied()
                .filter(|t| museum.has_type(*t))
                .collect(),
            annual_visitor_capacity: field_text(museum.annual_visitor_capacity),
            internal_visitors_count: field_text(museum.internal_visitors_count),
            external_visitors_count: field_text(museum.external_visitors_count),
            is_valuable_cultural_heritage: museum.is_valuable_cultural_heritage,
            valuable_museum_items_count: field_text(museum.valuable_museum_items_count),
        }
    }

    pub fn validate(&self) -> Result<CreateMuseum, FormErrors> {
        let mut errors = FormErrors::default();

        let name = errors.required("name", &self.name);
        let inn = errors.required("inn", &self.inn);
        let id_owner = match errors.required_number::<i64>("id_owner", &self.id_owner) {
            Some(id) if id > 0 => id,
            Some(_) => {
                errors.push("id_owner", "must be a positive id");
                0
            }
            None => 0,
        };

        let mut dto = CreateMuseum {
            id_owner,
            inn,
            kpp: optional_text(&self.kpp),
            founder: optional_text(&self.founder),
            museum_activity_in_charter: self.museum_activity_in_charter,
            name,
            museum_legal_status: optional_text(&self.museum_legal_status),
            annual_visitor_capacity: errors
                .optional_number("annual_visitor_capacity", &self.annual_visitor_capacity),
            internal_visitors_count: errors
                .optional_number("internal_visitors_count", &self.internal_visitors_count),
            external_visitors_count: errors
                .optional_number("external_visitors_count", &self.external_visitors_count),
            is_valuable_cultural_heritage: self.is_valuable_cultural_heritage,
            valuable_museum_items_count: errors
                .optional_number("valuable_museum_items_count", &self.valuable_museum_items_count),
            ..CreateMuseum::default()
        };
        for t in &self.types {
            dto.set_type(*t, true);
        }

        errors.finish(dto)
    }
}
