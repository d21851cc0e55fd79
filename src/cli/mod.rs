use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::future::Future;
use tokio::runtime::{Handle, Runtime};

use crate::api::ApiClient;
use crate::config::Config;

pub mod add;
pub mod delete;
pub mod display;
pub mod list;
pub mod menu;
pub mod show;
pub mod ui;
pub mod update;

pub use add::{run_add_activity, run_add_museum, run_add_organization};
pub use delete::{run_delete, DeleteTarget};
pub use list::{run_list, Resource};
pub use menu::run_menu;
pub use show::{run_labor, run_show_museum, run_show_organization};
pub use update::{run_edit_activity, run_edit_museum, run_edit_organization};

#[derive(Parser)]
#[command(name = "museumcmd")]
#[command(about = "Museum registry administration console for the command line")]
#[command(version)]
pub struct Cli {
    /// Backend base URL (overrides MUSEUM_API_URL and the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Log requests and internal decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Organizations that own museums
    #[command(alias = "organizations")]
    Orgs {
        #[command(subcommand)]
        action: RecordAction,
    },
    /// Registered museums
    Museums {
        #[command(subcommand)]
        action: RecordAction,
    },
    /// Yearly museum activity records
    Activities {
        #[command(subcommand)]
        action: RecordAction,
    },
    /// Staffing and payroll figures of an organization
    Labor(LaborArgs),
}

#[derive(Subcommand)]
pub enum RecordAction {
    /// List records, interactively when attached to a terminal
    List(ListArgs),
    /// Show one record
    Show(IdArgs),
    /// Create a record
    Add,
    /// Edit a record
    Edit(IdArgs),
    /// Delete a record
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(short, long, default_value = "1")]
    pub page: u32,
    /// Rows per page: 10, 20, 50 or 100 (defaults to the configured size)
    #[arg(short, long)]
    pub limit: Option<u32>,
    /// Name filter (case-insensitive substring)
    #[arg(short, long)]
    pub name: Option<String>,
    /// Museum category, e.g. art, estate, museum_reserve
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub museum_type: Option<String>,
    /// Print one page as a table and exit
    #[arg(short, long)]
    pub all: bool,
}

impl Default for ListArgs {
    fn default() -> Self {
        Self {
            page: 1,
            limit: None,
            name: None,
            museum_type: None,
            all: false,
        }
    }
}

#[derive(Args)]
pub struct IdArgs {
    pub id: i64,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub id: i64,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct LaborArgs {
    /// Organization id
    pub org_id: i64,
}

/// Everything a command needs: the API client, the async runtime it runs
/// on, and the resolved configuration.
pub struct App {
    pub api: ApiClient,
    pub config: Config,
    runtime: Runtime,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let api = ApiClient::new(&config).context("could not build HTTP client")?;
        Self::with_api(api, config)
    }

    pub fn with_api(api: ApiClient, config: Config) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("could not start async runtime")?;
        Ok(Self {
            api,
            config,
            runtime,
        })
    }

    /// Run one request to completion.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub fn handle(&self) -> &Handle {
        self.runtime.handle()
    }
}

/// Route a parsed subcommand.
pub fn dispatch(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::Orgs { action } => run_action(app, Resource::Organizations, action),
        Commands::Museums { action } => run_action(app, Resource::Museums, action),
        Commands::Activities { action } => run_action(app, Resource::Activities, action),
        Commands::Labor(args) => run_labor(app, args.org_id),
    }
}

fn run_action(app: &App, resource: Resource, action: RecordAction) -> Result<()> {
    match action {
        RecordAction::List(args) => run_list(app, resource, &args),
        RecordAction::Show(args) => match resource {
            Resource::Organizations => run_show_organization(app, args.id).map(drop),
            Resource::Museums => run_show_museum(app, args.id).map(drop),
            Resource::Activities => show::run_show_activity(app, args.id),
        },
        RecordAction::Add => match resource {
            Resource::Organizations => run_add_organization(app).map(drop),
            Resource::Museums => run_add_museum(app).map(drop),
            Resource::Activities => run_add_activity(app).map(drop),
        },
        RecordAction::Edit(args) => match resource {
            Resource::Organizations => run_edit_organization(app, args.id).map(drop),
            Resource::Museums => run_edit_museum(app, args.id).map(drop),
            Resource::Activities => run_edit_activity(app, args.id).map(drop),
        },
        RecordAction::Delete(args) => {
            let target = match resource {
                Resource::Organizations => DeleteTarget::Organization(args.id),
                Resource::Museums => DeleteTarget::Museum(args.id),
                Resource::Activities => DeleteTarget::Activity(args.id),
            };
            run_delete(app, target, args.force).map(drop)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_flags() {
        let cli = Cli::try_parse_from([
            "museumcmd", "museums", "list", "--page", "2", "--limit", "50", "--name", "tret", "-t", "art", "--all",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Museums {
                action: RecordAction::List(args),
            }) => {
                assert_eq!(args.page, 2);
                assert_eq!(args.limit, Some(50));
                assert_eq!(args.name.as_deref(), Some("tret"));
                assert_eq!(args.museum_type.as_deref(), Some("art"));
                assert!(args.all);
            }
            _ => panic!("expected museums list"),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "museumcmd", "orgs", "delete", "7", "--force", "--api-url", "http://api.local/v1", "-v",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://api.local/v1"));
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Some(Commands::Orgs {
                action: RecordAction::Delete(DeleteArgs { id: 7, force: true })
            })
        ));
    }

    #[test]
    fn test_no_subcommand_opens_menu() {
        let cli = Cli::try_parse_from(["museumcmd"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_labor_requires_id() {
        assert!(Cli::try_parse_from(["museumcmd", "labor"]).is_err());
        let cli = Cli::try_parse_from(["museumcmd", "labor", "3"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Labor(LaborArgs { org_id: 3 }))));
    }
}
