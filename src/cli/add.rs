use anyhow::Result;
use chrono::Datelike;
use tracing::warn;

use crate::api::ApiError;
use crate::cli::ui::{self, field, prompt_choice, prompt_field, prompt_flag, prompt_multi};
use crate::cli::App;
use crate::forms::{ActivityForm, FormErrors, MetricFields, MuseumForm, OrganizationForm};
use crate::models::{Museum, MuseumType, Organization, VisitorCategory};

/// Prompt, validate and submit until the backend accepts the form.
///
/// Validation errors send the user back to the prompts with their input
/// kept. A backend failure asks whether to try again. `Ok(None)` means the
/// user cancelled.
pub(crate) fn form_loop<F, D, T>(
    initial: F,
    mut prompt: impl FnMut(&F) -> Result<Option<F>>,
    validate: impl Fn(&F) -> Result<D, FormErrors>,
    mut submit: impl FnMut(&D) -> Result<T, ApiError>,
    fallback: &str,
) -> Result<Option<T>> {
    let mut form = initial;
    loop {
        let Some(next) = prompt(&form)? else {
            return Ok(None);
        };
        form = next;

        let dto = match validate(&form) {
            Ok(dto) => dto,
            Err(errors) => {
                ui::error("Please fix the following:");
                for e in &errors.errors {
                    println!("  {}", e);
                }
                continue;
            }
        };

        match submit(&dto) {
            Ok(saved) => return Ok(Some(saved)),
            Err(e) => {
                warn!(error = %e, "submit failed");
                ui::error(&e.user_message(fallback));
                if !ui::confirm("Try again?")? {
                    println!("Cancelled.");
                    return Ok(None);
                }
            }
        }
    }
}

pub(crate) fn prompt_organization_form(form: &OrganizationForm) -> Result<Option<OrganizationForm>> {
    Ok(Some(OrganizationForm {
        name: field!(prompt_field("name", &form.name)),
        inn: field!(prompt_field("INN", &form.inn)),
        exist_museum: field!(prompt_flag("Has a museum?", form.exist_museum)),
    }))
}

/// Organizations offered as museum owners. Empty when they cannot be
/// loaded; the owner id is then typed in.
pub(crate) fn owner_options(app: &App) -> Vec<Organization> {
    app.block_on(app.api.organizations().list())
        .unwrap_or_else(|e| {
            warn!(error = %e, "could not load organizations for owner selection");
            Vec::new()
        })
}

/// Owner choices as (label, id) pairs and the index to start on.
///
/// An owner id that is not among the loaded organizations is offered first
/// as a keep option, so confirming the prompt never reassigns the museum.
fn owner_choices(owners: &[Organization], current: &str) -> (Vec<(String, String)>, usize) {
    let current = current.trim();
    let mut choices: Vec<(String, String)> = owners
        .iter()
        .map(|o| (format!("{} (#{})", o.name, o.id), o.id.to_string()))
        .collect();

    match choices.iter().position(|(_, id)| id == current) {
        Some(start) => (choices, start),
        None if current.is_empty() => (choices, 0),
        None => {
            choices.insert(0, (format!("Keep current owner (#{})", current), current.to_string()));
            (choices, 0)
        }
    }
}

fn prompt_owner(owners: &[Organization], current: &str) -> Result<Option<String>> {
    if owners.is_empty() {
        return Ok(Some(field!(prompt_field("owner id", current))));
    }

    let (mut choices, start) = owner_choices(owners, current);
    let labels: Vec<String> = choices.iter().map(|(label, _)| label.clone()).collect();
    let idx = field!(prompt_choice("Owner organization", &labels, start));
    Ok(Some(choices.swap_remove(idx).1))
}

pub(crate) fn prompt_museum_form(owners: &[Organization], form: &MuseumForm) -> Result<Option<MuseumForm>> {
    let Some(id_owner) = prompt_owner(owners, &form.id_owner)? else {
        return Ok(None);
    };
    let name = field!(prompt_field("name", &form.name));
    let inn = field!(prompt_field("INN", &form.inn));
    let kpp = field!(prompt_field("KPP", &form.kpp));
    let founder = field!(prompt_field("founder", &form.founder));
    let museum_legal_status = field!(prompt_field("legal status", &form.museum_legal_status));
    let museum_activity_in_charter = field!(prompt_flag(
        "Museum activity in charter?",
        form.museum_activity_in_charter
    ));

    let labels: Vec<&str> = MuseumType::ALL.iter().map(MuseumType::label).collect();
    let selected: Vec<usize> = MuseumType::ALL
        .iter()
        .enumerate()
        .filter(|(_, t)| form.types.contains(*t))
        .map(|(i, _)| i)
        .collect();
    let types = field!(prompt_multi("Museum type", &labels, &selected))
        .into_iter()
        .map(|i| MuseumType::ALL[i])
        .collect();

    Ok(Some(MuseumForm {
        id_owner,
        inn,
        kpp,
        founder,
        name,
        museum_legal_status,
        museum_activity_in_charter,
        types,
        annual_visitor_capacity: field!(prompt_field("annual visitor capacity", &form.annual_visitor_capacity)),
        internal_visitors_count: field!(prompt_field("internal visitors", &form.internal_visitors_count)),
        external_visitors_count: field!(prompt_field("external visitors", &form.external_visitors_count)),
        is_valuable_cultural_heritage: field!(prompt_flag(
            "Valuable cultural heritage?",
            form.is_valuable_cultural_heritage
        )),
        valuable_museum_items_count: field!(prompt_field(
            "valuable museum items",
            &form.valuable_museum_items_count
        )),
    }))
}

pub(crate) fn prompt_metrics(metrics: &MetricFields) -> Result<Option<MetricFields>> {
    Ok(Some(MetricFields {
        total_count: field!(prompt_field("total events", &metrics.total_count)),
        state_task_count: field!(prompt_field("state task events", &metrics.state_task_count)),
        revenue_activity_count: field!(prompt_field("paid events", &metrics.revenue_activity_count)),
        revenue_amount: field!(prompt_field("revenue", &metrics.revenue_amount)),
        cost_share_percent: field!(prompt_field("cost share %", &metrics.cost_share_percent)),
    }))
}

const VISITOR_CATEGORIES: [VisitorCategory; 2] = [VisitorCategory::Internal, VisitorCategory::External];

fn prompt_activity_form(form: &ActivityForm) -> Result<Option<ActivityForm>> {
    let inn = field!(prompt_field("INN", &form.inn));
    let year = field!(prompt_field("year", &form.year));
    let activity_type_id = field!(prompt_field("activity type id", &form.activity_type_id));
    let custom_activity_id = field!(prompt_field("custom activity id", &form.custom_activity_id));

    let labels: Vec<&str> = VISITOR_CATEGORIES.iter().map(VisitorCategory::label).collect();
    let current = VISITOR_CATEGORIES
        .iter()
        .position(|c| c.as_str() == form.visitor_category.trim().to_lowercase())
        .unwrap_or(0);
    let visitor_category = VISITOR_CATEGORIES[field!(prompt_choice("Visitor category", &labels, current))];

    let Some(metrics) = prompt_metrics(&form.metrics)? else {
        return Ok(None);
    };

    Ok(Some(ActivityForm {
        inn,
        year,
        activity_type_id,
        custom_activity_id,
        visitor_category: visitor_category.as_str().to_string(),
        metrics,
    }))
}

/// Execute `orgs add`
pub fn run_add_organization(app: &App) -> Result<Option<Organization>> {
    ui::require_interactive("orgs add")?;

    let created = form_loop(
        OrganizationForm::default(),
        prompt_organization_form,
        OrganizationForm::validate,
        |dto| app.block_on(app.api.organizations().create(dto)),
        "Failed to create organization",
    )?;

    if let Some(org) = &created {
        println!("\nCreated: {} (#{})", org.name, org.id);
    }
    Ok(created)
}

/// Execute `museums add`
pub fn run_add_museum(app: &App) -> Result<Option<Museum>> {
    ui::require_interactive("museums add")?;

    let owners = owner_options(app);
    let created = form_loop(
        MuseumForm::default(),
        |form| prompt_museum_form(&owners, form),
        MuseumForm::validate,
        |dto| app.block_on(app.api.museums().create(dto)),
        "Failed to create museum",
    )?;

    if let Some(museum) = &created {
        println!("\nCreated: {} (#{})", museum.name, museum.id);
    }
    Ok(created)
}

/// Execute `activities add`
pub fn run_add_activity(app: &App) -> Result<Option<()>> {
    ui::require_interactive("activities add")?;

    let initial = ActivityForm {
        year: chrono::Local::now().year().to_string(),
        visitor_category: VisitorCategory::default().as_str().to_string(),
        ..ActivityForm::default()
    };
    let created = form_loop(
        initial,
        prompt_activity_form,
        ActivityForm::validate,
        |dto| app.block_on(app.api.activities().create(dto)),
        "Failed to create activity",
    )?;

    if created.is_some() {
        println!("\nCreated activity record.");
    }
    Ok(created)
}
