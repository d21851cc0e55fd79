use super::{field_text, FormErrors};
use crate::models::{Activity, CreateActivity, UpdateActivity, VisitorCategory};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityForm {
    pub inn: String,
    pub year: String,
    pub activity_type_id: String,
    pub custom_activity_id: String,
    /// `internal` or `external`
    pub visitor_category: String,
    pub metrics: MetricFields,
}

/// The five activity metrics shared by create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricFields {
    pub cost_share_percent: String,
    pub revenue_amount: String,
    pub total_count: String,
    pub state_task_count: String,
    pub revenue_activity_count: String,
}

struct Metrics {
    cost_share_percent: Option<f64>,
    revenue_amount: Option<f64>,
    total_count: Option<i64>,
    state_task_count: Option<i64>,
    revenue_activity_count: Option<i64>,
}

impl MetricFields {
    fn from_activity(activity: &Activity) -> Self {
        Self {
            cost_share_percent: field_text(activity.cost_share_percent),
            revenue_amount: field_text(activity.revenue_amount),
            total_count: field_text(activity.total_count),
            state_task_count: field_text(activity.state_task_count),
            revenue_activity_count: field_text(activity.revenue_activity_count),
        }
    }

    fn parse(&self, errors: &mut FormErrors) -> Metrics {
        Metrics {
            cost_share_percent: errors.optional_float("cost_share_percent", &self.cost_share_percent),
            revenue_amount: errors.optional_float("revenue_amount", &self.revenue_amount),
            total_count: errors.optional_number("total_count", &self.total_count),
            state_task_count: errors.optional_number("state_task_count", &self.state_task_count),
            revenue_activity_count: errors
                .optional_number("revenue_activity_count", &self.revenue_activity_count),
        }
    }
}

fn visitor_category(errors: &mut FormErrors, raw: &str) -> VisitorCategory {
    match raw.trim().to_lowercase().as_str() {
        "internal" => VisitorCategory::Internal,
        "external" => VisitorCategory::External,
        "" => {
            errors.push("visitor_category", "required");
            VisitorCategory::default()
        }
        other => {
            errors.push("visitor_category", format!("{:?} is not internal or external", other));
            VisitorCategory::default()
        }
    }
}

impl ActivityForm {
    pub fn validate(&self) -> Result<CreateActivity, FormErrors> {
        let mut errors = FormErrors::default();

        let inn = errors.required("inn", &self.inn);
        let year = errors.required_number::<i32>("year", &self.year).unwrap_or(0);
        let activity_type_id = errors.optional_number("activity_type_id", &self.activity_type_id);
        let custom_activity_id = errors.optional_number("custom_activity_id", &self.custom_activity_id);
        let visitor_category = visitor_category(&mut errors, &self.visitor_category);
        let m = self.metrics.parse(&mut errors);

        errors.finish(CreateActivity {
            inn,
            activity_type_id,
            custom_activity_id,
            visitor_category,
            cost_share_percent: m.cost_share_percent,
            revenue_amount: m.revenue_amount,
            total_count: m.total_count,
            state_task_count: m.state_task_count,
            revenue_activity_count: m.revenue_activity_count,
            year,
        })
    }
}

/// Edit input: the metrics and the year of an existing activity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityUpdateForm {
    pub id: i64,
    pub year: String,
    pub metrics: MetricFields,
}

impl ActivityUpdateForm {
    pub fn from_activity(activity: &Activity) -> Self {
        Self {
            id: activity.id,
            year: activity.year.to_string(),
            metrics: MetricFields::from_activity(activity),
        }
    }

    pub fn validate(&self) -> Result<UpdateActivity, FormErrors> {
        let mut errors = FormErrors::default();
        let year = errors.required_number::<i32>("year", &self.year).unwrap_or(0);
        let m = self.metrics.parse(&mut errors);

        errors.finish(UpdateActivity {
            id: self.id,
            cost_share_percent: m.cost_share_percent,
            revenue_amount: m.revenue_amount,
            total_count: m.total_count,
            state_task_count: m.state_task_count,
            revenue_activity_count: m.revenue_activity_count,
            year,
        })
    }
}
