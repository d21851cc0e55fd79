//! Main menu, shown when museumcmd runs without a subcommand.

use anyhow::{anyhow, Result};
use inquire::{Select, Text};

use crate::cli::ui::{self, clear_screen, minimal_render_config};
use crate::cli::{run_labor, run_list, App, ListArgs, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuOption {
    Organizations,
    Museums,
    Activities,
    Labor,
    Quit,
}

impl MenuOption {
    const ALL: &'static [MenuOption] = &[
        MenuOption::Organizations,
        MenuOption::Museums,
        MenuOption::Activities,
        MenuOption::Labor,
        MenuOption::Quit,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuOption::Organizations => "Organizations",
            MenuOption::Museums => "Museums",
            MenuOption::Activities => "Activities",
            MenuOption::Labor => "Labor data",
            MenuOption::Quit => "Quit",
        }
    }

    fn from_label(s: &str) -> Option<MenuOption> {
        MenuOption::ALL.iter().find(|opt| opt.label() == s).copied()
    }

    fn resource(self) -> Option<Resource> {
        match self {
            MenuOption::Organizations => Some(Resource::Organizations),
            MenuOption::Museums => Some(Resource::Museums),
            MenuOption::Activities => Some(Resource::Activities),
            MenuOption::Labor | MenuOption::Quit => None,
        }
    }
}

/// Run the interactive main menu
pub fn run_menu(app: &App) -> Result<()> {
    if !ui::is_interactive() {
        return Err(anyhow!(
            "Interactive menu requires a terminal. Use subcommands instead:\n  \
            museumcmd orgs list\n  \
            museumcmd museums list --type art\n  \
            museumcmd labor <org-id>\n  \
            Run 'museumcmd --help' for all options."
        ));
    }

    let menu_labels: Vec<&str> = MenuOption::ALL.iter().map(|opt| opt.label()).collect();

    loop {
        let _ = clear_screen();

        let selection = Select::new("museumcmd", menu_labels.clone())
            .with_render_config(minimal_render_config())
            .with_page_size(menu_labels.len())
            .with_vim_mode(true)
            .prompt_skippable();

        let Ok(Some(choice_label)) = selection else {
            return Ok(());
        };
        let Some(choice) = MenuOption::from_label(choice_label) else {
            continue;
        };
        if choice == MenuOption::Quit {
            return Ok(());
        }

        let _ = clear_screen();
        if let Err(e) = execute_command(app, choice) {
            eprintln!("\nError: {:#}", e);
            wait_for_continue();
        }
    }
}

fn execute_command(app: &App, choice: MenuOption) -> Result<()> {
    if let Some(resource) = choice.resource() {
        return run_list(app, resource, &ListArgs::default());
    }

    let input = prompt_for_input("organization id: ")?;
    if input.is_empty() {
        return Ok(());
    }
    let org_id: i64 = input
        .parse()
        .map_err(|_| anyhow!("{:?} is not an organization id", input))?;
    run_labor(app, org_id)?;
    wait_for_continue();
    Ok(())
}

/// Prompt for text input, returning empty string on cancel
fn prompt_for_input(label: &str) -> Result<String> {
    let result = Text::new(label)
        .with_render_config(minimal_render_config())
        .prompt_skippable()?;
    Ok(result.map(|s| s.trim().to_string()).unwrap_or_default())
}

fn wait_for_continue() {
    println!();
    let _ = Text::new("[enter]")
        .with_render_config(minimal_render_config())
        .prompt_skippable();
}
