use crate::models::{Activity, LaborData, Museum, Organization};
use crate::owners::OWNER_PLACEHOLDER;

/// Shown for a value the backend left empty.
pub const EMPTY_VALUE: &str = "—";

/// Integer metric, or the empty marker when the backend had none
pub fn format_count(value: Option<i64>) -> String {
    value
        .map(group_thousands)
        .unwrap_or_else(|| EMPTY_VALUE.to_string())
}

pub fn format_amount(value: Option<f64>) -> String {
    match value {
        Some(v) => {
            let whole = v.trunc() as i64;
            let cents = ((v.abs().fract()) * 100.0).round() as i64;
            // 0.999 rounds up into the next unit
            let (whole, cents) = if cents == 100 {
                (whole + v.signum() as i64, 0)
            } else {
                (whole, cents)
            };
            let sign = if v < 0.0 && whole == 0 { "-" } else { "" };
            format!("{}{}.{:02}", sign, group_thousands(whole), cents)
        }
        None => EMPTY_VALUE.to_string(),
    }
}

pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}%", v),
        None => EMPTY_VALUE.to_string(),
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

fn text_or_empty(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(EMPTY_VALUE)
}

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

fn row(label: &str, value: impl AsRef<str>) -> String {
    format!("  {:<34}{}", label, value.as_ref())
}

pub fn organization_lines(org: &Organization) -> Vec<String> {
    vec![
        format!("{}\n", org.name),
        row("ID", org.id.to_string()),
        row("INN", &org.inn),
        row("Has museum", org.exist_museum_label()),
    ]
}

/// Museum detail. `owner` is `None` when the owner could not be loaded.
pub fn museum_lines(museum: &Museum, owner: Option<&Organization>) -> Vec<String> {
    let owner = match owner {
        Some(org) => format!("{} (#{})", org.name, org.id),
        None => format!("{} (#{})", OWNER_PLACEHOLDER, museum.id_owner),
    };

    let types = museum.type_labels();
    let types = if types.is_empty() {
        "Type not specified".to_string()
    } else {
        types.join(", ")
    };

    let mut lines = vec![
        format!("{}\n", museum.name),
        row("ID", museum.id.to_string()),
        row("Owner", owner),
        row("INN", &museum.inn),
        row("KPP", text_or_empty(museum.kpp.as_deref())),
        row("Founder", text_or_empty(museum.founder.as_deref())),
        row("Legal status", text_or_empty(museum.museum_legal_status.as_deref())),
        row("Museum activity in charter", yes_no(museum.museum_activity_in_charter)),
        row("Type", types),
        String::new(),
        "Visitors".to_string(),
    ];
    for (label, value) in museum.stats() {
        lines.push(row(label, format_count(value)));
    }
    lines.push(row(
        "Valuable cultural heritage",
        yes_no(museum.is_valuable_cultural_heritage),
    ));
    lines
}

pub fn activity_lines(activity: &Activity, owner_name: &str) -> Vec<String> {
    vec![
        format!("{} ({})\n", activity.type_label(), activity.year),
        row("ID", activity.id.to_string()),
        row("Organization", owner_name),
        row("INN", &activity.inn),
        row("Visitor category", activity.visitor_category.label()),
        row("Total events", format_count(activity.total_count)),
        row("State task events", format_count(activity.state_task_count)),
        row("Paid events", format_count(activity.revenue_activity_count)),
        row("Revenue", format_amount(activity.revenue_amount)),
        row("Cost share", format_percent(activity.cost_share_percent)),
    ]
}

/// Staffing section, plus payroll when the backend sent an FOT block.
pub fn labor_lines(labor: Option<&LaborData>) -> Vec<String> {
    let Some(labor) = labor else {
        return vec!["Labor data unavailable.".to_string()];
    };

    let mut lines = vec!["Staff".to_string()];
    lines.extend(labor.rows().iter().map(|(label, v)| row(label, format_count(*v))));

    if let Some(fot) = &labor.fot {
        lines.push(String::new());
        lines.push("Payroll (FOT)".to_string());
        lines.extend(fot.rows().iter().map(|(label, v)| row(label, format_count(*v))));
    }
    lines
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
