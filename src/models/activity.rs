use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VisitorCategory {
    #[default]
    Internal,
    External,
}

impl VisitorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::External => "external",
        }
    }

    /// Unknown values fall back to `Internal`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "external" => Self::External,
            _ => Self::Internal,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Internal => "Internal visitors",
            Self::External => "External visitors",
        }
    }
}

/// Yearly activity record of a museum.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    pub inn: String,
    pub id_owner: i64,
    pub activity_type_id: Option<i64>,
    pub activity_type_name: Option<String>,
    pub custom_activity_id: Option<i64>,
    pub custom_activity_name: Option<String>,
    pub visitor_category: VisitorCategory,
    pub cost_share_percent: Option<f64>,
    pub revenue_amount: Option<f64>,
    pub total_count: Option<i64>,
    pub state_task_count: Option<i64>,
    pub revenue_activity_count: Option<i64>,
    pub year: i32,
}

impl Activity {
    /// Display label for the activity type.
    ///
    /// Precedence: custom name, type name, custom id, type id.
    pub fn type_label(&self) -> String {
        let non_empty = |s: &Option<String>| s.as_deref().filter(|v| !v.is_empty()).map(str::to_string);

        if let Some(name) = non_empty(&self.custom_activity_name) {
            return name;
        }
        if let Some(name) = non_empty(&self.activity_type_name) {
            return name;
        }
        match (self.custom_activity_id, self.activity_type_id) {
            (Some(id), _) if id != 0 => format!("Custom type #{}", id),
            (_, Some(id)) if id != 0 => format!("Type #{}", id),
            _ => "Type not specified".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateActivity {
    pub inn: String,
    pub activity_type_id: Option<i64>,
    pub custom_activity_id: Option<i64>,
    pub visitor_category: VisitorCategory,
    pub cost_share_percent: Option<f64>,
    pub revenue_amount: Option<f64>,
    pub total_count: Option<i64>,
    pub state_task_count: Option<i64>,
    pub revenue_activity_count: Option<i64>,
    pub year: i32,
}

/// Update payload; the id travels in the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateActivity {
    pub id: i64,
    pub cost_share_percent: Option<f64>,
    pub revenue_amount: Option<f64>,
    pub total_count: Option<i64>,
    pub state_task_count: Option<i64>,
    pub revenue_activity_count: Option<i64>,
    pub year: i32,
}

impl From<&Activity> for UpdateActivity {
    fn from(a: &Activity) -> Self {
        Self {
            id: a.id,
            cost_share_percent: a.cost_share_percent,
            revenue_amount: a.revenue_amount,
            total_count: a.total_count,
            state_task_count: a.state_task_count,
            revenue_activity_count: a.revenue_activity_count,
            year: a.year,
        }
    }
}
