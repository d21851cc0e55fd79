//! Backend payload normalization.
//!
//! The backend mixes PascalCase and snake_case keys (and for activities
//! sends either, depending on the endpoint). Each field is read through a
//! fallback chain: PascalCase spelling(s) first, then snake_case, then a
//! default. A key that is present but `null` or of the wrong type falls
//! through to the next spelling. Nothing is validated here.

use serde_json::{Map, Value};

use super::ApiError;
use crate::models::{
    Activity, LaborData, LaborFot, Museum, Organization, PaginatedResponse, VisitorCategory,
};

/// Read-only view over one JSON object; non-objects read as empty.
struct Fields<'a> {
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Fields<'a> {
    fn new(value: &'a Value) -> Self {
        Self {
            map: value.as_object(),
        }
    }

    fn first<T>(&self, keys: &[&str], convert: impl Fn(&'a Value) -> Option<T>) -> Option<T> {
        let map = self.map?;
        keys.iter()
            .filter_map(|key| map.get(*key))
            .find_map(convert)
    }

    fn int(&self, keys: &[&str]) -> Option<i64> {
        self.first(keys, as_int)
    }

    fn float(&self, keys: &[&str]) -> Option<f64> {
        self.first(keys, Value::as_f64)
    }

    fn string(&self, keys: &[&str]) -> Option<String> {
        self.first(keys, |v| v.as_str().map(str::to_string))
    }

    fn flag(&self, keys: &[&str]) -> bool {
        self.first(keys, Value::as_bool).unwrap_or(false)
    }

    fn object(&self, keys: &[&str]) -> Option<&'a Value> {
        self.first(keys, |v| v.is_object().then_some(v))
    }
}

fn as_int(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
}

/// Map every element of a JSON array. `null` reads as an empty list.
fn map_list<T>(value: &Value, f: fn(&Value) -> T) -> Result<Vec<T>, ApiError> {
    match value {
        Value::Array(items) => Ok(items.iter().map(f).collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(ApiError::Shape(format!(
            "expected a list, got {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

pub fn organization(value: &Value) -> Organization {
    let f = Fields::new(value);
    Organization {
        id: f.int(&["ID", "Id", "id"]).unwrap_or(0),
        inn: f.string(&["INN", "Inn", "inn"]).unwrap_or_default(),
        name: f.string(&["Name", "name"]).unwrap_or_default(),
        exist_museum: f.flag(&["ExistMuseum", "exist_museum"]),
    }
}

pub fn organization_list(value: &Value) -> Result<Vec<Organization>, ApiError> {
    map_list(value, organization)
}

pub fn museum(value: &Value) -> Museum {
    let f = Fields::new(value);
    Museum {
        id: f.int(&["Id", "ID", "id"]).unwrap_or(0),
        id_owner: f.int(&["IdOwner", "IDOwner", "id_owner"]).unwrap_or(0),
        inn: f.string(&["INN", "Inn", "inn"]).unwrap_or_default(),
        kpp: f.string(&["KPP", "Kpp", "kpp"]),
        founder: f.string(&["Founder", "founder"]),
        museum_activity_in_charter: f.flag(&["MuseumActivityInCharter", "museum_activity_in_charter"]),
        name: f.string(&["Name", "name"]).unwrap_or_default(),
        museum_legal_status: f.string(&["MuseumLegalStatus", "museum_legal_status"]),
        is_memorial_reserve_museum: f.flag(&["IsMemorialReserveMuseum", "is_memorial_reserve_museum"]),
        is_historical_memorial_reserve: f.flag(&[
            "IsHistoricalMemorialReserve",
            "is_historical_memorial_reserve",
        ]),
        is_art_museum: f.flag(&["IsArtMuseum", "is_art_museum"]),
        is_museum_reserve: f.flag(&["IsMuseumReserve", "is_museum_reserve"]),
        is_estate_museum: f.flag(&["IsEstateMuseum", "is_estate_museum"]),
        is_palace_park_ensemble: f.flag(&["IsPalaceParkEnsemble", "is_palace_park_ensemble"]),
        is_historical_architectural_reserve: f.flag(&[
            "IsHistoricalArchitecturalReserve",
            "is_historical_architectural_reserve",
        ]),
        annual_visitor_capacity: f.int(&["AnnualVisitorCapacity", "annual_visitor_capacity"]),
        internal_visitors_count: f.int(&["InternalVisitorsCount", "internal_visitors_count"]),
        external_visitors_count: f.int(&["ExternalVisitorsCount", "external_visitors_count"]),
        is_valuable_cultural_heritage: f.flag(&[
            "IsValuableCulturalHeritage",
            "is_valuable_cultural_heritage",
        ]),
        valuable_museum_items_count: f.int(&["ValuableMuseumItemsCount", "valuable_museum_items_count"]),
    }
}

pub fn museum_list(value: &Value) -> Result<Vec<Museum>, ApiError> {
    map_list(value, museum)
}

pub fn activity(value: &Value) -> Activity {
    let f = Fields::new(value);
    let visitor_category = f
        .string(&["VisitorCategory", "visitor_category"])
        .map(|s| VisitorCategory::parse(&s))
        .unwrap_or_default();

    Activity {
        id: f.int(&["ID", "Id", "id"]).unwrap_or(0),
        inn: f.string(&["INN", "Inn", "inn"]).unwrap_or_default(),
        id_owner: f.int(&["IDOwner", "IdOwner", "id_owner"]).unwrap_or(0),
        activity_type_id: f.int(&["ActivityTypeID", "ActivityTypeId", "activity_type_id"]),
        activity_type_name: f.string(&["ActivityTypeName", "activity_type_name"]),
        custom_activity_id: f.int(&["CustomActivityID", "CustomActivityId", "custom_activity_id"]),
        custom_activity_name: f.string(&["CustomActivityName", "custom_activity_name"]),
        visitor_category,
        cost_share_percent: f.float(&["CostSharePercent", "cost_share_percent"]),
        revenue_amount: f.float(&["RevenueAmount", "revenue_amount"]),
        total_count: f.int(&["TotalCount", "total_count"]),
        state_task_count: f.int(&["StateTaskCount", "state_task_count"]),
        revenue_activity_count: f.int(&["RevenueActivityCount", "revenue_activity_count"]),
        year: f.int(&["Year", "year"]).unwrap_or(0) as i32,
    }
}

pub fn activity_list(value: &Value) -> Result<Vec<Activity>, ApiError> {
    map_list(value, activity)
}

pub fn labor(value: &Value) -> LaborData {
    let f = Fields::new(value);
    LaborData {
        total_staff_annual: f.int(&["TotalStaffAnnual", "total_staff_annual"]),
        research_staff_internal: f.int(&["ResearchStaffInternal", "research_staff_internal"]),
        core_operational_staff_internal: f.int(&[
            "CoreOperationalStaffInternal",
            "core_operational_staff_internal",
        ]),
        admin_support_staff_internal: f.int(&["AdminSupportStaffInternal", "admin_support_staff_internal"]),
        research_staff_external: f.int(&["ResearchStaffExternal", "research_staff_external"]),
        core_operational_staff_external: f.int(&[
            "CoreOperationalStaffExternal",
            "core_operational_staff_external",
        ]),
        admin_support_staff_external: f.int(&["AdminSupportStaffExternal", "admin_support_staff_external"]),
        fot: f.object(&["Fot", "FOT", "fot"]).map(labor_fot),
    }
}

fn labor_fot(value: &Value) -> LaborFot {
    let staff = labor(value);
    LaborFot {
        total_staff_annual: staff.total_staff_annual,
        research_staff_internal: staff.research_staff_internal,
        core_operational_staff_internal: staff.core_operational_staff_internal,
        admin_support_staff_internal: staff.admin_support_staff_internal,
        research_staff_external: staff.research_staff_external,
        core_operational_staff_external: staff.core_operational_staff_external,
        admin_support_staff_external: staff.admin_support_staff_external,
    }
}

/// Paginated envelope `{data, page, page_size, total_count, total_pages}`.
///
/// `total_pages` is taken from the server; it is derived only when absent.
pub fn page<T>(value: &Value, item: fn(&Value) -> T) -> Result<PaginatedResponse<T>, ApiError> {
    if !value.is_object() {
        return Err(ApiError::Shape(format!(
            "expected a paginated object, got {}",
            json_kind(value)
        )));
    }

    let f = Fields::new(value);
    let data = match f.first(&["data", "Data"], Some) {
        Some(list) => map_list(list, item)?,
        None => Vec::new(),
    };
    let page = f.int(&["page", "Page"]).unwrap_or(1).max(1) as u32;
    let page_size = f.int(&["page_size", "PageSize"]).unwrap_or(data.len() as i64).max(0) as u32;
    let total_count = f.int(&["total_count", "TotalCount"]).unwrap_or(data.len() as i64).max(0) as u64;
    let total_pages = f
        .int(&["total_pages", "TotalPages"])
        .map(|n| n.max(0) as u32)
        .unwrap_or_else(|| PaginatedResponse::<T>::derive_total_pages(total_count, page_size));

    Ok(PaginatedResponse {
        data,
        page,
        page_size,
        total_count,
        total_pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_organization_pascal_case() {
        let org = organization(&json!({
            "ID": 5, "INN": "7701", "Name": "Fund", "ExistMuseum": true
        }));
        assert_eq!(org, Organization {
            id: 5,
            inn: "7701".to_string(),
            name: "Fund".to_string(),
            exist_museum: true,
        });
    }

    #[test]
    fn test_organization_casings_agree() {
        let pascal = organization(&json!({"ID": 5, "INN": "7701", "Name": "Fund", "ExistMuseum": false}));
        let snake = organization(&json!({"id": 5, "inn": "7701", "name": "Fund", "exist_museum": false}));
        assert_eq!(pascal, snake);
    }

    #[test]
    fn test_organization_defaults() {
        let org = organization(&json!({}));
        assert_eq!(org.id, 0);
        assert_eq!(org.inn, "");
        assert!(!org.exist_museum);

        // non-object payloads read as empty
        assert_eq!(organization(&json!("oops")).id, 0);
    }

    #[test]
    fn test_pascal_case_wins_over_snake_case() {
        let org = organization(&json!({"ID": 1, "id": 2, "Name": "Upper", "name": "lower"}));
        assert_eq!(org.id, 1);
        assert_eq!(org.name, "Upper");
    }

    #[test]
    fn test_null_falls_through_to_snake_case() {
        let org = organization(&json!({"ID": null, "id": 9}));
        assert_eq!(org.id, 9);
    }

    #[test]
    fn test_museum_pascal_case() {
        let m = museum(&json!({
            "Id": 3,
            "IdOwner": 8,
            "INN": "7702",
            "KPP": "770201001",
            "Founder": null,
            "MuseumActivityInCharter": true,
            "Name": "Estate",
            "MuseumLegalStatus": "budget",
            "IsMemorialReserveMuseum": false,
            "IsHistoricalMemorialReserve": false,
            "IsArtMuseum": true,
            "IsMuseumReserve": false,
            "IsEstateMuseum": true,
            "IsPalaceParkEnsemble": false,
            "IsHistoricalArchitecturalReserve": false,
            "AnnualVisitorCapacity": 10000,
            "InternalVisitorsCount": 4000,
            "ExternalVisitorsCount": null,
            "IsValuableCulturalHeritage": true,
            "ValuableMuseumItemsCount": 12
        }));
        assert_eq!(m.id, 3);
        assert_eq!(m.id_owner, 8);
        assert_eq!(m.kpp.as_deref(), Some("770201001"));
        assert_eq!(m.founder, None);
        assert!(m.museum_activity_in_charter);
        assert!(m.is_art_museum && m.is_estate_museum);
        assert!(!m.is_museum_reserve);
        assert_eq!(m.annual_visitor_capacity, Some(10000));
        assert_eq!(m.external_visitors_count, None);
        assert!(m.is_valuable_cultural_heritage);
        assert_eq!(m.valuable_museum_items_count, Some(12));
    }

    #[test]
    fn test_museum_missing_optionals_are_none() {
        let m = museum(&json!({"Id": 1, "IdOwner": 2, "INN": "1", "Name": "M"}));
        assert_eq!(m.kpp, None);
        assert_eq!(m.museum_legal_status, None);
        assert_eq!(m.annual_visitor_capacity, None);
        assert!(!m.is_art_museum);
    }

    fn activity_cases() -> Vec<(&'static str, Value)> {
        vec![
            (
                "pascal",
                json!({
                    "ID": 11, "INN": "7703", "IDOwner": 4,
                    "ActivityTypeID": 2, "ActivityTypeName": "Excursion",
                    "CustomActivityID": null, "CustomActivityName": null,
                    "VisitorCategory": "external",
                    "CostSharePercent": 12.5, "RevenueAmount": 1000.0,
                    "TotalCount": 300, "StateTaskCount": 200, "RevenueActivityCount": 100,
                    "Year": 2024
                }),
            ),
            (
                "snake",
                json!({
                    "id": 11, "inn": "7703", "id_owner": 4,
                    "activity_type_id": 2, "activity_type_name": "Excursion",
                    "custom_activity_id": null, "custom_activity_name": null,
                    "visitor_category": "external",
                    "cost_share_percent": 12.5, "revenue_amount": 1000.0,
                    "total_count": 300, "state_task_count": 200, "revenue_activity_count": 100,
                    "year": 2024
                }),
            ),
            (
                "mixed",
                json!({
                    "ID": 11, "inn": "7703", "IDOwner": 4,
                    "activity_type_id": 2, "ActivityTypeName": "Excursion",
                    "visitor_category": "external",
                    "CostSharePercent": 12.5, "revenue_amount": 1000,
                    "TotalCount": 300, "state_task_count": 200, "RevenueActivityCount": 100,
                    "year": 2024
                }),
            ),
        ]
    }

    #[test]
    fn test_activity_casings_agree() {
        let expected = activity(&activity_cases()[0].1);
        for (name, payload) in activity_cases() {
            assert_eq!(activity(&payload), expected, "case {}", name);
        }
        assert_eq!(expected.visitor_category, VisitorCategory::External);
        assert_eq!(expected.cost_share_percent, Some(12.5));
        assert_eq!(expected.year, 2024);
    }

    #[test]
    fn test_activity_visitor_category_defaults_to_internal() {
        let a = activity(&json!({"ID": 1, "INN": "1", "Year": 2020}));
        assert_eq!(a.visitor_category, VisitorCategory::Internal);
    }

    #[test]
    fn test_activity_required_defaults() {
        let a = activity(&json!({"INN": "1"}));
        assert_eq!(a.id, 0);
        assert_eq!(a.id_owner, 0);
        assert_eq!(a.year, 0);
        assert_eq!(a.total_count, None);
    }

    #[test]
    fn test_labor_without_fot() {
        let labor = labor(&json!({"total_staff_annual": 30, "research_staff_internal": null}));
        assert_eq!(labor.total_staff_annual, Some(30));
        assert_eq!(labor.research_staff_internal, None);
        assert!(labor.fot.is_none());

        let labor = super::labor(&json!({"total_staff_annual": 30, "fot": null}));
        assert!(labor.fot.is_none());
    }

    #[test]
    fn test_labor_with_empty_fot() {
        let labor = labor(&json!({"fot": {}}));
        assert_eq!(labor.fot, Some(LaborFot::default()));
    }

    #[test]
    fn test_labor_fot_values() {
        let labor = labor(&json!({
            "TotalStaffAnnual": 10,
            "fot": {"total_staff_annual": 500000, "admin_support_staff_external": 1200}
        }));
        assert_eq!(labor.total_staff_annual, Some(10));
        let fot = labor.fot.unwrap();
        assert_eq!(fot.total_staff_annual, Some(500000));
        assert_eq!(fot.admin_support_staff_external, Some(1200));
    }

    #[test]
    fn test_list_preserves_order() {
        let list = organization_list(&json!([
            {"ID": 3, "Name": "c"},
            {"ID": 1, "Name": "a"},
            {"ID": 2, "Name": "b"}
        ]))
        .unwrap();
        let ids: Vec<i64> = list.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_null_list_is_empty() {
        assert!(museum_list(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_non_list_is_shape_error() {
        let err = activity_list(&json!({"ID": 1})).unwrap_err();
        assert!(matches!(err, ApiError::Shape(_)));
    }

    #[test]
    fn test_page_envelope() {
        let page = page(
            &json!({
                "data": [{"ID": 1, "Name": "A"}, {"ID": 2, "Name": "B"}],
                "page": 2, "page_size": 2, "total_count": 7, "total_pages": 4
            }),
            organization,
        )
        .unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[1].name, "B");
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 4);
    }

    #[test]
    fn test_page_trusts_server_total_pages() {
        let page = page(
            &json!({"data": [], "page": 1, "page_size": 10, "total_count": 5, "total_pages": 3}),
            organization,
        )
        .unwrap();
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_page_derives_missing_total_pages() {
        let page = page(
            &json!({"data": null, "page": 1, "page_size": 10, "total_count": 21}),
            museum,
        )
        .unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_page_rejects_bare_list() {
        assert!(page(&json!([]), organization).is_err());
    }
}
