use anyhow::{anyhow, Result};
use crossterm::event::KeyCode;
use std::future::Future;
use tracing::warn;

use super::delete::{delete_record, DeleteTarget};
use super::display::{
    activity_lines, format_count, labor_lines, museum_lines, organization_lines, print_lines,
};
use super::ui::{self, StatusBar};
use super::{update, App};
use crate::api::{ApiClient, ApiError};
use crate::models::{Activity, LaborData, Museum, Organization};
use crate::owners::{owner_name, resolve_owners};

/// Run `load`; on failure show the message and offer a retry.
///
/// Without a terminal the failure becomes the command's error. `Ok(None)`
/// means the user gave up.
pub(crate) fn load_or_retry<T, F, Fut>(
    app: &App,
    subject: &str,
    fallback: &str,
    mut load: F,
) -> Result<Option<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    loop {
        let err = match app.block_on(load()) {
            Ok(value) => return Ok(Some(value)),
            Err(e) => e,
        };

        let message = if err.is_not_found() {
            format!("{} not found.", subject)
        } else {
            err.user_message(fallback)
        };

        if !ui::is_interactive() {
            return Err(anyhow::Error::new(err).context(message));
        }

        warn!(subject, error = %err, "load failed");
        ui::error(&message);
        println!("{}", StatusBar::new().action("r", "etry").action("q", " back").render());
        match ui::wait_key()? {
            KeyCode::Char('r') => continue,
            _ => return Ok(None),
        }
    }
}

/// Everything on the organization screen.
#[derive(Debug, Clone)]
pub struct OrganizationDetail {
    pub organization: Organization,
    pub museums: Vec<Museum>,
    pub labor: Option<LaborData>,
}

/// The organization is required; its museums and labor data are not.
pub async fn load_organization(api: &ApiClient, id: i64) -> Result<OrganizationDetail, ApiError> {
    let organization = api.organizations().get(id).await?;
    let (museums, labor) = tokio::join!(
        api.museums().find_by_owner(id),
        api.labor().by_organization(id)
    );

    let museums = museums.unwrap_or_else(|e| {
        warn!(organization_id = id, error = %e, "could not load museums of organization");
        Vec::new()
    });
    let labor = labor
        .map_err(|e| warn!(organization_id = id, error = %e, "labor data unavailable"))
        .ok();

    Ok(OrganizationDetail {
        organization,
        museums,
        labor,
    })
}

#[derive(Debug, Clone)]
pub struct MuseumDetail {
    pub museum: Museum,
    pub owner: Option<Organization>,
    pub activities: Vec<Activity>,
}

/// The museum is required; owner and activities degrade to empty.
pub async fn load_museum(api: &ApiClient, id: i64) -> Result<MuseumDetail, ApiError> {
    let museum = api.museums().get(id).await?;
    let owner_id = museum.id_owner;

    let owner = async {
        if owner_id > 0 {
            api.organizations().get(owner_id).await.map(Some)
        } else {
            Ok(None)
        }
    };
    let (owner, activities) = tokio::join!(owner, api.activities().find_by_museum(id));

    let owner = owner.unwrap_or_else(|e| {
        warn!(museum_id = id, owner_id, error = %e, "could not load museum owner");
        None
    });
    let activities = activities.unwrap_or_else(|e| {
        warn!(museum_id = id, error = %e, "could not load museum activities");
        Vec::new()
    });

    Ok(MuseumDetail {
        museum,
        owner,
        activities,
    })
}

fn organization_screen(detail: &OrganizationDetail) -> Vec<String> {
    let mut lines = organization_lines(&detail.organization);
    lines.push(String::new());
    if detail.museums.is_empty() {
        lines.push("No museums.".to_string());
    } else {
        lines.push(format!("Museums ({})", detail.museums.len()));
        for museum in &detail.museums {
            lines.push(format!("  #{:<6}{}", museum.id, museum.name));
        }
    }
    lines.push(String::new());
    lines.extend(labor_lines(detail.labor.as_ref()));
    lines
}

fn museum_screen(detail: &MuseumDetail) -> Vec<String> {
    let mut lines = museum_lines(&detail.museum, detail.owner.as_ref());
    lines.push(String::new());
    if detail.activities.is_empty() {
        lines.push("No activity records.".to_string());
    } else {
        lines.push(format!("Activities ({})", detail.activities.len()));
        for activity in &detail.activities {
            lines.push(format!(
                "  {}  {:<30}  {:<8}  {}",
                activity.year,
                ui::truncate(&activity.type_label(), 30),
                activity.visitor_category.as_str(),
                format_count(activity.total_count)
            ));
        }
    }
    lines
}

/// Shared key handling of detail screens.
enum DetailKey {
    Edit,
    Delete,
    Reload,
    Owner,
    Back,
}

fn detail_key(with_owner: bool) -> Result<DetailKey> {
    let bar = StatusBar::new()
        .action("e", "dit")
        .action("d", "elete")
        .action_if(with_owner, "o", "wner")
        .action("r", "eload")
        .action("q", " back");
    println!("\n{}", bar.render());

    Ok(match ui::wait_key()? {
        KeyCode::Char('e') => DetailKey::Edit,
        KeyCode::Char('d') => DetailKey::Delete,
        KeyCode::Char('r') => DetailKey::Reload,
        KeyCode::Char('o') if with_owner => DetailKey::Owner,
        _ => DetailKey::Back,
    })
}

/// Delete from a detail screen. Returns true when the record is gone.
fn delete_from_detail(app: &App, target: DeleteTarget, description: &str) -> Result<bool> {
    let outcome = delete_record(app, target, description, false)?;
    if let Some(message) = outcome.message() {
        println!("{}", message);
        println!("{}", StatusBar::new().info("Press any key").render());
        ui::wait_key()?;
    }
    Ok(outcome.is_deleted())
}

/// Show an organization. Returns whether it was edited or deleted.
pub fn run_show_organization(app: &App, id: i64) -> Result<bool> {
    let interactive = ui::is_interactive();
    let subject = format!("Organization #{}", id);
    let mut changed = false;

    loop {
        let Some(detail) = load_or_retry(app, &subject, "Failed to load organization", || {
            load_organization(&app.api, id)
        })?
        else {
            return Ok(changed);
        };

        if interactive {
            ui::clear_screen()?;
        }
        print_lines(&organization_screen(&detail));
        if !interactive {
            return Ok(false);
        }

        match detail_key(false)? {
            DetailKey::Edit => changed |= update::run_edit_organization(app, id)?.is_some(),
            DetailKey::Delete => {
                let description = format!("organization \"{}\"", detail.organization.name);
                if delete_from_detail(app, DeleteTarget::Organization(id), &description)? {
                    return Ok(true);
                }
            }
            DetailKey::Reload | DetailKey::Owner => {}
            DetailKey::Back => return Ok(changed),
        }
    }
}

/// Show a museum with its owner and activities.
pub fn run_show_museum(app: &App, id: i64) -> Result<bool> {
    let interactive = ui::is_interactive();
    let subject = format!("Museum #{}", id);
    let mut changed = false;

    loop {
        let Some(detail) = load_or_retry(app, &subject, "Failed to load museum", || {
            load_museum(&app.api, id)
        })?
        else {
            return Ok(changed);
        };

        if interactive {
            ui::clear_screen()?;
        }
        print_lines(&museum_screen(&detail));
        if !interactive {
            return Ok(false);
        }

        let owner_id = detail.museum.id_owner;
        match detail_key(owner_id > 0)? {
            DetailKey::Edit => changed |= update::run_edit_museum(app, id)?.is_some(),
            DetailKey::Delete => {
                let description = format!("museum \"{}\"", detail.museum.name);
                if delete_from_detail(app, DeleteTarget::Museum(id), &description)? {
                    return Ok(true);
                }
            }
            DetailKey::Owner => changed |= run_show_organization(app, owner_id)?,
            DetailKey::Reload => {}
            DetailKey::Back => return Ok(changed),
        }
    }
}

/// Detail of an activity already at hand (opened from the list).
pub fn show_activity_screen(app: &App, activity: &Activity) -> Result<bool> {
    let owners = app.block_on(resolve_owners(&app.api, [activity.id_owner]));
    let interactive = ui::is_interactive();

    if interactive {
        ui::clear_screen()?;
    }
    print_lines(&activity_lines(activity, owner_name(&owners, activity.id_owner)));
    if !interactive {
        return Ok(false);
    }

    match detail_key(false)? {
        DetailKey::Edit => Ok(update::edit_activity(app, activity)?.is_some()),
        DetailKey::Delete => {
            let description = format!("activity \"{}\" ({})", activity.type_label(), activity.year);
            delete_from_detail(app, DeleteTarget::Activity(activity.id), &description)
        }
        DetailKey::Reload | DetailKey::Owner | DetailKey::Back => Ok(false),
    }
}

/// Locate an activity in the full list; the backend has no single-record
/// endpoint for activities.
pub(crate) fn find_activity(app: &App, id: i64) -> Result<Option<Activity>> {
    let subject = format!("Activity #{}", id);
    let Some(all) = load_or_retry(app, &subject, "Failed to load activities", || {
        app.api.activities().list()
    })?
    else {
        return Ok(None);
    };

    match all.into_iter().find(|a| a.id == id) {
        Some(activity) => Ok(Some(activity)),
        None => Err(anyhow!(
            "activity #{} not found; see `museumcmd activities list`",
            id
        )),
    }
}

/// Execute `activities show <id>`
pub fn run_show_activity(app: &App, id: i64) -> Result<()> {
    if let Some(activity) = find_activity(app, id)? {
        show_activity_screen(app, &activity)?;
    }
    Ok(())
}

/// Execute `labor <org-id>`
pub fn run_labor(app: &App, org_id: i64) -> Result<()> {
    let labor = match app.block_on(app.api.labor().by_organization(org_id)) {
        Ok(labor) => Some(labor),
        Err(e) => {
            warn!(organization_id = org_id, error = %e, "labor data unavailable");
            if !e.is_not_found() {
                ui::warning(&e.user_message("Failed to load labor data"));
            }
            None
        }
    };

    println!("Labor data of organization #{}\n", org_id);
    print_lines(&labor_lines(labor.as_ref()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn api(server: &mockito::ServerGuard) -> ApiClient {
        ApiClient::with_base_url(&format!("{}/api/v1", server.url()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_organization_detail_tolerates_missing_parts() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/organization/2")
            .with_status(200)
            .with_body(r#"{"ID": 2, "INN": "7701", "Name": "Heritage Trust", "ExistMuseum": true}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v1/museum/owner/2")
            .with_status(500)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v1/labor/organization/2")
            .with_status(404)
            .with_body(r#"{"error": "no labor data"}"#)
            .create_async()
            .await;

        let detail = load_organization(&api(&server), 2).await.unwrap();
        assert_eq!(detail.organization.name, "Heritage Trust");
        assert!(detail.museums.is_empty());
        assert!(detail.labor.is_none());

        let screen = organization_screen(&detail).join("\n");
        assert!(screen.contains("No museums."));
        assert!(screen.contains("Labor data unavailable."));
    }

    #[tokio::test]
    async fn test_organization_detail_with_labor_and_fot() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/organization/2")
            .with_status(200)
            .with_body(r#"{"id": 2, "inn": "7701", "name": "Trust"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v1/museum/owner/2")
            .with_status(200)
            .with_body(r#"[{"Id": 5, "IdOwner": 2, "Name": "Gallery"}]"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v1/labor/organization/2")
            .with_status(200)
            .with_body(r#"{"TotalStaffAnnual": 40, "Fot": {"TotalStaffAnnual": 1200000}}"#)
            .create_async()
            .await;

        let detail = load_organization(&api(&server), 2).await.unwrap();
        assert_eq!(detail.museums.len(), 1);
        let screen = organization_screen(&detail).join("\n");
        assert!(screen.contains("Museums (1)"));
        assert!(screen.contains("Gallery"));
        assert!(screen.contains("Payroll (FOT)"));
        assert!(screen.contains("1 200 000"));
    }

    #[tokio::test]
    async fn test_organization_detail_fails_without_organization() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/organization/9")
            .with_status(404)
            .create_async()
            .await;

        let err = load_organization(&api(&server), 9).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_museum_detail_skips_owner_lookup_without_owner() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/museum/5")
            .with_status(200)
            .with_body(r#"{"Id": 5, "IdOwner": 0, "Name": "Orphan"}"#)
            .create_async()
            .await;
        let owner = server
            .mock("GET", mockito::Matcher::Regex(r"^/api/v1/organization/".to_string()))
            .expect(0)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v1/activity/museum/5")
            .with_status(200)
            .with_body(r#"[{"id": 1, "year": 2023, "activity_type_name": "Exhibitions", "total_count": 12}]"#)
            .create_async()
            .await;

        let detail = load_museum(&api(&server), 5).await.unwrap();
        owner.assert_async().await;
        assert!(detail.owner.is_none());

        let screen = museum_screen(&detail).join("\n");
        assert!(screen.contains("Type not specified"));
        assert!(screen.contains("Activities (1)"));
        assert!(screen.contains("Exhibitions"));
    }

    #[tokio::test]
    async fn test_museum_detail_tolerates_owner_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/museum/5")
            .with_status(200)
            .with_body(r#"{"Id": 5, "IdOwner": 3, "Name": "Gallery", "IsArtMuseum": true}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v1/organization/3")
            .with_status(502)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v1/activity/museum/5")
            .with_status(500)
            .create_async()
            .await;

        let detail = load_museum(&api(&server), 5).await.unwrap();
        assert!(detail.owner.is_none());
        assert!(detail.activities.is_empty());
        let screen = museum_screen(&detail).join("\n");
        assert!(screen.contains("— (#3)"));
        assert!(screen.contains("No activity records."));
    }
}
