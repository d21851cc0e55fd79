use anyhow::{anyhow, Result};
use std::io::{self, IsTerminal};
use tracing::{debug, warn};

use crate::api::{ApiClient, ApiError};
use crate::cli::{ui, App};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Organization(i64),
    Museum(i64),
    Activity(i64),
}

impl DeleteTarget {
    fn noun(&self) -> &'static str {
        match self {
            Self::Organization(_) => "organization",
            Self::Museum(_) => "museum",
            Self::Activity(_) => "activity",
        }
    }

    fn id(&self) -> i64 {
        match self {
            Self::Organization(id) | Self::Museum(id) | Self::Activity(id) => *id,
        }
    }

    async fn send(&self, api: &ApiClient) -> Result<(), ApiError> {
        match *self {
            Self::Organization(id) => api.organizations().delete(id).await,
            Self::Museum(id) => api.museums().delete(id).await,
            Self::Activity(id) => api.activities().delete(id).await,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(String),
    Cancelled,
    Failed(String),
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted(_))
    }

    pub fn message(&self) -> Option<String> {
        match self {
            Self::Deleted(what) => Some(format!("Deleted {}.", what)),
            Self::Cancelled => None,
            Self::Failed(message) => Some(message.clone()),
        }
    }
}

/// Delete after `confirm` agrees. Nothing is sent when it declines.
pub fn delete_with<C>(
    app: &App,
    target: DeleteTarget,
    description: &str,
    confirm: C,
) -> Result<DeleteOutcome>
where
    C: FnOnce(&str) -> Result<bool>,
{
    if !confirm(&format!("Delete {}?", description))? {
        debug!(?target, "delete declined");
        return Ok(DeleteOutcome::Cancelled);
    }

    match app.block_on(target.send(&app.api)) {
        Ok(()) => Ok(DeleteOutcome::Deleted(description.to_string())),
        Err(e) => {
            warn!(?target, error = %e, "delete failed");
            let fallback = format!("Failed to delete {}", target.noun());
            Ok(DeleteOutcome::Failed(e.user_message(&fallback)))
        }
    }
}

/// Confirm with the user unless `force`, then delete.
pub fn delete_record(
    app: &App,
    target: DeleteTarget,
    description: &str,
    force: bool,
) -> Result<DeleteOutcome> {
    if force {
        delete_with(app, target, description, |_| Ok(true))
    } else {
        delete_with(app, target, description, ui::confirm)
    }
}

/// Execute `<resource> delete <id>`
pub fn run_delete(app: &App, target: DeleteTarget, force: bool) -> Result<DeleteOutcome> {
    if !force && !io::stdin().is_terminal() {
        return Err(anyhow!("refusing to delete without confirmation; pass --force"));
    }

    let description = format!("{} #{}", target.noun(), target.id());
    let outcome = delete_record(app, target, &description, force)?;
    match &outcome {
        DeleteOutcome::Deleted(_) => ui::status(&outcome.message().unwrap_or_default()),
        DeleteOutcome::Cancelled => ui::status("Cancelled."),
        DeleteOutcome::Failed(message) => return Err(anyhow!("{}", message)),
    }
    Ok(outcome)
}
