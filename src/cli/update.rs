use anyhow::Result;

use super::add::{form_loop, owner_options, prompt_metrics, prompt_museum_form, prompt_organization_form};
use super::show::{find_activity, load_or_retry};
use super::ui::{self, field, prompt_field};
use super::App;
use crate::forms::{ActivityUpdateForm, MuseumForm, OrganizationForm};
use crate::models::{Activity, Museum, Organization};

fn saved() {
    println!("\nSaved.");
}

/// Execute `orgs edit <id>`
pub fn run_edit_organization(app: &App, id: i64) -> Result<Option<Organization>> {
    ui::require_interactive("orgs edit")?;

    let subject = format!("Organization #{}", id);
    let Some(current) = load_or_retry(app, &subject, "Failed to load organization", || {
        app.api.organizations().get(id)
    })?
    else {
        return Ok(None);
    };

    println!("Editing {} (Enter keeps a value)\n", current.name);
    let updated = form_loop(
        OrganizationForm::from_organization(&current),
        prompt_organization_form,
        OrganizationForm::validate,
        |dto| app.block_on(app.api.organizations().update(id, dto)),
        "Failed to save organization",
    )?;

    if updated.is_some() {
        saved();
    }
    Ok(updated)
}

/// Execute `museums edit <id>`
pub fn run_edit_museum(app: &App, id: i64) -> Result<Option<Museum>> {
    ui::require_interactive("museums edit")?;

    let subject = format!("Museum #{}", id);
    let Some(current) = load_or_retry(app, &subject, "Failed to load museum", || {
        app.api.museums().get(id)
    })?
    else {
        return Ok(None);
    };

    println!("Editing {} (Enter keeps a value)\n", current.name);
    let owners = owner_options(app);
    let updated = form_loop(
        MuseumForm::from_museum(&current),
        |form| prompt_museum_form(&owners, form),
        |form| form.validate().map(|dto| dto.into_update(id)),
        |dto| app.block_on(app.api.museums().update(id, dto)),
        "Failed to save museum",
    )?;

    if updated.is_some() {
        saved();
    }
    Ok(updated)
}

fn prompt_activity_update(form: &ActivityUpdateForm) -> Result<Option<ActivityUpdateForm>> {
    let year = field!(prompt_field("year", &form.year));
    let Some(metrics) = prompt_metrics(&form.metrics)? else {
        return Ok(None);
    };
    Ok(Some(ActivityUpdateForm {
        id: form.id,
        year,
        metrics,
    }))
}

/// Edit the year and metrics of an activity at hand.
pub fn edit_activity(app: &App, activity: &Activity) -> Result<Option<()>> {
    ui::require_interactive("activities edit")?;

    println!(
        "Editing {} ({}) (Enter keeps a value)\n",
        activity.type_label(),
        activity.year
    );
    let updated = form_loop(
        ActivityUpdateForm::from_activity(activity),
        prompt_activity_update,
        ActivityUpdateForm::validate,
        |dto| app.block_on(app.api.activities().update(dto)),
        "Failed to save activity",
    )?;

    if updated.is_some() {
        saved();
    }
    Ok(updated)
}

/// Execute `activities edit <id>`
pub fn run_edit_activity(app: &App, id: i64) -> Result<Option<()>> {
    ui::require_interactive("activities edit")?;

    match find_activity(app, id)? {
        Some(activity) => edit_activity(app, &activity),
        None => Ok(None),
    }
}
