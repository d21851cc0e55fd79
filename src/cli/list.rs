use anyhow::{anyhow, Result};
use crossterm::{
    event::KeyCode,
    style::{Attribute, SetAttribute},
    ExecutableCommand,
};
use std::io::{self, IsTerminal};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::delete::{delete_record, DeleteOutcome, DeleteTarget};
use super::display::EMPTY_VALUE;
use super::ui::{self, column, selection_prefix, StatusBar};
use super::{add, show, update, App, ListArgs};
use crate::api::{ApiClient, ApiError};
use crate::models::{Activity, Museum, MuseumType, Organization, PaginatedResponse};
use crate::owners::{owner_name, resolve_owners, OwnerLookup};
use crate::pager::{render_window, Debouncer, FetchTicket, ListController, ListQuery};

/// Upper bound on how long the screen waits for a key before checking for
/// finished fetches.
const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Organizations,
    Museums,
    Activities,
}

impl Resource {
    pub fn title(self) -> &'static str {
        match self {
            Self::Organizations => "Organizations",
            Self::Museums => "Museums",
            Self::Activities => "Activities",
        }
    }

    fn load_error(self) -> &'static str {
        match self {
            Self::Organizations => "Failed to load organizations",
            Self::Museums => "Failed to load museums",
            Self::Activities => "Failed to load activities",
        }
    }

    /// The activity endpoint has no text search.
    fn has_name_filter(self) -> bool {
        self != Self::Activities
    }

    fn has_type_filter(self) -> bool {
        self == Self::Museums
    }
}

/// A list row of any resource.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Organization(Organization),
    Museum(Museum),
    Activity(Activity),
}

impl Record {
    pub fn id(&self) -> i64 {
        match self {
            Self::Organization(org) => org.id,
            Self::Museum(museum) => museum.id,
            Self::Activity(activity) => activity.id,
        }
    }

    fn delete_target(&self) -> DeleteTarget {
        match self {
            Self::Organization(org) => DeleteTarget::Organization(org.id),
            Self::Museum(museum) => DeleteTarget::Museum(museum.id),
            Self::Activity(activity) => DeleteTarget::Activity(activity.id),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Organization(org) => format!("organization \"{}\"", org.name),
            Self::Museum(museum) => format!("museum \"{}\"", museum.name),
            Self::Activity(activity) => {
                format!("activity \"{}\" ({})", activity.type_label(), activity.year)
            }
        }
    }
}

/// A fetched page together with the owners it references.
#[derive(Debug, Clone)]
pub struct LoadedPage {
    pub page: PaginatedResponse<Record>,
    pub owners: OwnerLookup,
}

/// Fetch one page of `resource` and resolve the owners it shows.
///
/// Organizations and museums are paged by the server. The activity
/// endpoint returns everything, so activities are paged here.
pub async fn fetch_page(
    api: &ApiClient,
    resource: Resource,
    query: &ListQuery,
) -> Result<LoadedPage, ApiError> {
    match resource {
        Resource::Organizations => {
            let page = api
                .organizations()
                .list_page(&query.organization_filters())
                .await?;
            Ok(LoadedPage {
                page: page.map(Record::Organization),
                owners: OwnerLookup::new(),
            })
        }
        Resource::Museums => {
            let page = api.museums().list_page(&query.museum_filters()).await?;
            let owners = resolve_owners(api, page.data.iter().map(|m| m.id_owner)).await;
            Ok(LoadedPage {
                page: page.map(Record::Museum),
                owners,
            })
        }
        Resource::Activities => {
            let all = api.activities().list().await?;
            let page = PaginatedResponse::paginate_local(all, query.page, query.page_size);
            let owners = resolve_owners(api, page.data.iter().map(|a| a.id_owner)).await;
            Ok(LoadedPage {
                page: page.map(Record::Activity),
                owners,
            })
        }
    }
}

fn header(resource: Resource) -> String {
    match resource {
        Resource::Organizations => format!(
            "  {}  {}  {}  HAS MUSEUM",
            column("ID", 6),
            column("NAME", 40),
            column("INN", 14)
        ),
        Resource::Museums => format!(
            "  {}  {}  {}  TYPE",
            column("ID", 6),
            column("NAME", 34),
            column("OWNER", 28)
        ),
        Resource::Activities => format!(
            "  {}  {}  {}  {}  {}  CATEGORY",
            column("ID", 6),
            column("ORGANIZATION", 26),
            column("INN", 12),
            column("YEAR", 4),
            column("TYPE", 26)
        ),
    }
}

fn row_line(record: &Record, owners: &OwnerLookup) -> String {
    match record {
        Record::Organization(org) => format!(
            "{}  {}  {}  {}",
            column(&org.id.to_string(), 6),
            column(&org.name, 40),
            column(&org.inn, 14),
            org.exist_museum_label()
        ),
        Record::Museum(museum) => format!(
            "{}  {}  {}  {}",
            column(&museum.id.to_string(), 6),
            column(&museum.name, 34),
            column(owner_name(owners, museum.id_owner), 28),
            museum.type_labels().first().copied().unwrap_or(EMPTY_VALUE)
        ),
        Record::Activity(activity) => format!(
            "{}  {}  {}  {}  {}  {}",
            column(&activity.id.to_string(), 6),
            column(owner_name(owners, activity.id_owner), 26),
            column(&activity.inn, 12),
            column(&activity.year.to_string(), 4),
            column(&activity.type_label(), 26),
            activity.visitor_category.as_str()
        ),
    }
}

fn empty_message(resource: Resource, query: &ListQuery) -> String {
    let filtered = query.name.is_some() || query.museum_type.is_some();
    match (resource, filtered) {
        (_, true) => "Nothing matches the current filter.".to_string(),
        (Resource::Organizations, false) => "No organizations yet. Press [a] to add one.".to_string(),
        (Resource::Museums, false) => "No museums yet. Press [a] to add one.".to_string(),
        (Resource::Activities, false) => "No activity records yet. Press [a] to add one.".to_string(),
    }
}

/// Build the starting query from command-line flags.
fn initial_controller(app: &App, resource: Resource, args: &ListArgs) -> Result<ListController> {
    let mut ctl = ListController::new(app.config.page_size);
    if let Some(limit) = args.limit {
        if !ctl.set_page_size(limit) && limit != ctl.page_size() {
            return Err(anyhow!("page size must be one of 10, 20, 50, 100"));
        }
    }
    if let Some(name) = &args.name {
        if !resource.has_name_filter() {
            return Err(anyhow!("{} cannot be filtered by name", resource.title().to_lowercase()));
        }
        ctl.set_name_filter(name);
    }
    if let Some(raw) = &args.museum_type {
        if !resource.has_type_filter() {
            return Err(anyhow!("only museums can be filtered by type"));
        }
        let museum_type = MuseumType::parse(raw).ok_or_else(|| {
            let known: Vec<&str> = MuseumType::ALL.iter().map(|t| t.as_str()).collect();
            anyhow!("unknown museum type {:?}; expected one of {}", raw, known.join(", "))
        })?;
        ctl.set_museum_type(Some(museum_type));
    }
    // filters reset the page, so the requested page goes last
    ctl.set_page(args.page);
    Ok(ctl)
}

/// Execute `<resource> list`
pub fn run_list(app: &App, resource: Resource, args: &ListArgs) -> Result<()> {
    let ctl = initial_controller(app, resource, args)?;

    if args.all || !io::stdout().is_terminal() {
        return print_table(app, resource, ctl.query());
    }
    run_list_screen(app, resource, ctl)
}

/// Print one page as a plain table.
fn print_table(app: &App, resource: Resource, query: &ListQuery) -> Result<()> {
    let loaded = app
        .block_on(fetch_page(&app.api, resource, query))
        .map_err(|e| {
            let msg = e.user_message(resource.load_error());
            anyhow::Error::new(e).context(msg)
        })?;

    if loaded.page.data.is_empty() {
        println!("{}", empty_message(resource, query));
        return Ok(());
    }

    println!("{} ({} total)\n", resource.title(), loaded.page.total_count);
    println!("{}", header(resource));
    for record in &loaded.page.data {
        println!("  {}", row_line(record, &loaded.owners));
    }
    println!(
        "\n{}  page {}",
        loaded.page.range_label(),
        render_window(loaded.page.page, loaded.page.total_pages)
    );
    Ok(())
}

#[derive(Debug)]
enum View {
    Loading,
    Ready(LoadedPage),
    Failed(String),
}

/// What the loop should do after a key press.
#[derive(Debug, Clone, PartialEq)]
enum ListAction {
    None,
    Quit,
    Open(Record),
    Edit(Record),
    Delete(Record),
    Add,
}

type FetchResult = (u64, Result<LoadedPage, ApiError>);

/// State of one interactive list screen.
struct ListScreen {
    resource: Resource,
    ctl: ListController,
    filter: Debouncer,
    editing_filter: bool,
    view: View,
    loading: bool,
    cursor: usize,
    notice: Option<String>,
}

impl ListScreen {
    fn new(resource: Resource, ctl: ListController) -> Self {
        let filter = Debouncer::with_value(
            crate::pager::FILTER_DEBOUNCE,
            ctl.query().name.as_deref().unwrap_or(""),
        );
        Self {
            resource,
            ctl,
            filter,
            editing_filter: false,
            view: View::Loading,
            loading: false,
            cursor: 0,
            notice: None,
        }
    }

    fn records(&self) -> &[Record] {
        match &self.view {
            View::Ready(loaded) => &loaded.page.data,
            _ => &[],
        }
    }

    fn selected(&self) -> Option<Record> {
        self.records().get(self.cursor).cloned()
    }

    fn total_pages(&self) -> u32 {
        match &self.view {
            View::Ready(loaded) => loaded.page.total_pages,
            _ => 0,
        }
    }

    /// Apply a fetch result if it is still the latest one.
    fn receive(&mut self, seq: u64, result: Result<LoadedPage, ApiError>) -> bool {
        let Some(result) = self.ctl.accept(seq, result) else {
            return false;
        };
        self.loading = false;
        match result {
            Ok(loaded) => {
                let page = &loaded.page;
                self.ctl.sync_page(page.page);
                // a delete can leave us past the last page
                if page.data.is_empty() && page.page > 1 && page.page > page.total_pages {
                    debug!(page = page.page, total = page.total_pages, "page out of range");
                    self.ctl.set_page(page.total_pages.max(1));
                }
                self.cursor = self.cursor.min(loaded.page.data.len().saturating_sub(1));
                self.view = View::Ready(loaded);
            }
            Err(e) => {
                warn!(resource = self.resource.title(), error = %e, "list fetch failed");
                self.view = View::Failed(e.user_message(self.resource.load_error()));
            }
        }
        true
    }

    fn handle_key(&mut self, key: KeyCode, now: Instant) -> ListAction {
        self.notice = None;

        if self.editing_filter {
            match key {
                KeyCode::Char(c) => self.filter.push(c, now),
                KeyCode::Backspace => self.filter.backspace(now),
                KeyCode::Enter => {
                    if let Some(value) = self.filter.flush() {
                        self.ctl.set_name_filter(&value);
                    }
                    self.editing_filter = false;
                }
                KeyCode::Esc => {
                    self.filter.clear(now);
                    self.filter.flush();
                    self.ctl.set_name_filter("");
                    self.editing_filter = false;
                }
                _ => {}
            }
            return ListAction::None;
        }

        match key {
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < self.records().len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('n') => {
                if self.ctl.next_page(self.total_pages()) {
                    self.cursor = 0;
                }
            }
            KeyCode::Left | KeyCode::Char('p') => {
                if self.ctl.prev_page() {
                    self.cursor = 0;
                }
            }
            KeyCode::Char('/') | KeyCode::Char('f') if self.resource.has_name_filter() => {
                self.editing_filter = true;
            }
            KeyCode::Char('t') if self.resource.has_type_filter() => {
                let next = MuseumType::cycle(self.ctl.query().museum_type);
                self.ctl.set_museum_type(next);
                self.cursor = 0;
            }
            KeyCode::Char('s') => {
                self.ctl.cycle_page_size();
                self.cursor = 0;
            }
            KeyCode::Char('r') => self.ctl.reload(),
            KeyCode::Char('a') => return ListAction::Add,
            KeyCode::Enter => {
                if let Some(record) = self.selected() {
                    return ListAction::Open(record);
                }
            }
            KeyCode::Char('e') => {
                if let Some(record) = self.selected() {
                    return ListAction::Edit(record);
                }
            }
            KeyCode::Char('d') => {
                if let Some(record) = self.selected() {
                    return ListAction::Delete(record);
                }
            }
            KeyCode::Esc | KeyCode::Char('q') => return ListAction::Quit,
            _ => {}
        }
        ListAction::None
    }

    /// Commit the filter once typing has paused.
    fn tick(&mut self, now: Instant) -> bool {
        match self.filter.poll(now) {
            Some(value) => self.ctl.set_name_filter(&value),
            None => false,
        }
    }

    fn filter_line(&self) -> String {
        let mut parts = Vec::new();
        if self.resource.has_name_filter() {
            let name = if self.editing_filter {
                format!("name: {}_", self.filter.buffer())
            } else {
                format!("name: {}", self.ctl.query().name.as_deref().unwrap_or("any"))
            };
            parts.push(name);
        }
        if self.resource.has_type_filter() {
            let label = self
                .ctl
                .query()
                .museum_type
                .map(|t| t.label())
                .unwrap_or("any");
            parts.push(format!("type: {}", label));
        }
        parts.push(format!("per page: {}", self.ctl.page_size()));
        parts.join("   ")
    }

    fn render(&self) -> Result<()> {
        ui::clear_screen()?;
        println!("{}", self.resource.title());
        println!("{}\n", self.filter_line());

        match &self.view {
            View::Loading => println!("Loading…"),
            View::Failed(message) => {
                println!("{}", message);
                println!("\n{}", StatusBar::new().action("r", "etry").action("q", "uit").render());
                return Ok(());
            }
            View::Ready(loaded) if loaded.page.data.is_empty() => {
                println!("{}", empty_message(self.resource, self.ctl.query()));
            }
            View::Ready(loaded) => {
                println!("{}", header(self.resource));
                let visible = ui::visible_lines();
                let start = self.cursor.saturating_sub(visible.saturating_sub(1));
                for (i, record) in loaded.page.data.iter().enumerate().skip(start).take(visible) {
                    let line = format!(
                        "{}{}",
                        selection_prefix(i == self.cursor),
                        row_line(record, &loaded.owners)
                    );
                    print_row(&line, i == self.cursor);
                }
                println!(
                    "\npage {}",
                    render_window(loaded.page.page, loaded.page.total_pages)
                );
            }
        }

        if let Some(notice) = &self.notice {
            println!("{}", notice);
        }

        let (info, has_prev, has_next) = match &self.view {
            View::Ready(loaded) => (
                loaded.page.range_label(),
                loaded.page.has_prev(),
                loaded.page.has_next(),
            ),
            _ => (String::new(), false, false),
        };
        let info = if self.loading && !info.is_empty() {
            format!("{} (loading…)", info)
        } else {
            info
        };
        let bar = StatusBar::new()
            .info(info)
            .action_if(has_next, "n", "ext")
            .action_if(has_prev, "p", "rev")
            .action_if(self.resource.has_name_filter(), "/", "filter")
            .action_if(self.resource.has_type_filter(), "t", "ype")
            .action("s", "ize")
            .action("a", "dd")
            .action("e", "dit")
            .action("d", "elete")
            .action("q", "uit");
        println!("\n{}", bar.render());
        Ok(())
    }
}

fn print_row(line: &str, selected: bool) {
    if selected {
        let mut stdout = io::stdout();
        let _ = stdout.execute(SetAttribute(Attribute::Reverse));
        print!("{}", line);
        let _ = stdout.execute(SetAttribute(Attribute::Reset));
        println!();
    } else {
        println!("{}", line);
    }
}

/// Start a fetch on the runtime; the result comes back over `tx` tagged
/// with the ticket's sequence number.
fn dispatch(app: &App, resource: Resource, ticket: FetchTicket, tx: Sender<FetchResult>) {
    let api = app.api.clone();
    debug!(seq = ticket.seq, page = ticket.query.page, "dispatching list fetch");
    app.handle().spawn(async move {
        let result = fetch_page(&api, resource, &ticket.query).await;
        let _ = tx.send((ticket.seq, result));
    });
}

fn drain(screen: &mut ListScreen, rx: &Receiver<FetchResult>) -> bool {
    let mut changed = false;
    while let Ok((seq, result)) = rx.try_recv() {
        changed |= screen.receive(seq, result);
    }
    changed
}

fn run_list_screen(app: &App, resource: Resource, ctl: ListController) -> Result<()> {
    let (tx, rx) = mpsc::channel::<FetchResult>();
    let mut screen = ListScreen::new(resource, ctl);
    let mut redraw = true;

    loop {
        if let Some(ticket) = screen.ctl.take_fetch() {
            dispatch(app, resource, ticket, tx.clone());
            screen.loading = true;
            redraw = true;
        }
        redraw |= drain(&mut screen, &rx);

        if redraw {
            screen.render()?;
            redraw = false;
        }

        let now = Instant::now();
        let timeout = screen
            .filter
            .time_until_due(now)
            .map_or(TICK, |due| due.min(TICK));

        if let Some(key) = ui::read_key(timeout)? {
            redraw = true;
            let action = screen.handle_key(key, Instant::now());
            if run_action(app, &mut screen, action)? {
                break;
            }
        }

        redraw |= screen.tick(Instant::now());
    }

    Ok(())
}

/// Returns true when the screen should close.
fn run_action(app: &App, screen: &mut ListScreen, action: ListAction) -> Result<bool> {
    let changed = match action {
        ListAction::None => false,
        ListAction::Quit => return Ok(true),
        ListAction::Add => match screen.resource {
            Resource::Organizations => add::run_add_organization(app)?.is_some(),
            Resource::Museums => add::run_add_museum(app)?.is_some(),
            Resource::Activities => add::run_add_activity(app)?.is_some(),
        },
        ListAction::Open(record) => match record {
            Record::Organization(org) => show::run_show_organization(app, org.id)?,
            Record::Museum(museum) => show::run_show_museum(app, museum.id)?,
            Record::Activity(activity) => show::show_activity_screen(app, &activity)?,
        },
        ListAction::Edit(record) => match record {
            Record::Organization(org) => update::run_edit_organization(app, org.id)?.is_some(),
            Record::Museum(museum) => update::run_edit_museum(app, museum.id)?.is_some(),
            Record::Activity(activity) => update::edit_activity(app, &activity)?.is_some(),
        },
        ListAction::Delete(record) => {
            let outcome = delete_record(app, record.delete_target(), &record.describe(), false)?;
            apply_delete_outcome(screen, &outcome);
            return Ok(false);
        }
    };

    if changed {
        screen.ctl.reload();
    }
    Ok(false)
}

/// Show the outcome and reload the current page after a delete went through.
/// A declined or failed delete leaves the page as it is.
fn apply_delete_outcome(screen: &mut ListScreen, outcome: &DeleteOutcome) {
    if let Some(message) = outcome.message() {
        screen.notice = Some(message);
    }
    if outcome.is_deleted() {
        screen.ctl.reload();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::owners::OWNER_PLACEHOLDER;
    use crate::pager::FILTER_DEBOUNCE;
    use mockito::Matcher;

    fn org(id: i64, name: &str) -> Record {
        Record::Organization(Organization::new(id, "7701".to_string(), name.to_string()))
    }

    fn ready(records: Vec<Record>, page: u32, total_pages: u32) -> LoadedPage {
        let total_count = records.len() as u64;
        LoadedPage {
            page: PaginatedResponse {
                data: records,
                page,
                page_size: 10,
                total_count,
                total_pages,
            },
            owners: OwnerLookup::new(),
        }
    }

    fn screen_with(resource: Resource, loaded: LoadedPage) -> ListScreen {
        let mut screen = ListScreen::new(resource, ListController::default());
        let ticket = screen.ctl.take_fetch().unwrap();
        assert!(screen.receive(ticket.seq, Ok(loaded)));
        screen
    }

    #[test]
    fn test_typing_filter_commits_after_pause() {
        let t0 = Instant::now();
        let mut screen = screen_with(Resource::Organizations, ready(vec![org(1, "A")], 1, 1));

        screen.handle_key(KeyCode::Char('/'), t0);
        assert!(screen.editing_filter);
        for (i, c) in "her".chars().enumerate() {
            screen.handle_key(KeyCode::Char(c), t0 + Duration::from_millis(i as u64 * 100));
        }
        assert!(!screen.tick(t0 + Duration::from_millis(400)));
        assert!(screen.ctl.take_fetch().is_none());

        assert!(screen.tick(t0 + Duration::from_millis(200) + FILTER_DEBOUNCE));
        let ticket = screen.ctl.take_fetch().unwrap();
        assert_eq!(ticket.query.name.as_deref(), Some("HER"));
        assert_eq!(ticket.query.page, 1);
    }

    #[test]
    fn test_enter_commits_filter_immediately() {
        let t0 = Instant::now();
        let mut screen = screen_with(Resource::Museums, ready(vec![], 1, 0));
        screen.handle_key(KeyCode::Char('f'), t0);
        screen.handle_key(KeyCode::Char('x'), t0);
        screen.handle_key(KeyCode::Enter, t0);
        assert!(!screen.editing_filter);
        assert_eq!(screen.ctl.take_fetch().unwrap().query.name.as_deref(), Some("X"));
        // nothing left pending
        assert!(!screen.tick(t0 + FILTER_DEBOUNCE));
    }

    #[test]
    fn test_activities_have_no_text_filter() {
        let mut screen = screen_with(Resource::Activities, ready(vec![], 1, 0));
        screen.handle_key(KeyCode::Char('/'), Instant::now());
        assert!(!screen.editing_filter);
        screen.handle_key(KeyCode::Char('t'), Instant::now());
        assert!(screen.ctl.take_fetch().is_none());
    }

    #[test]
    fn test_type_cycle_refetches_from_first_page() {
        let mut screen = screen_with(Resource::Museums, ready(vec![], 1, 5));
        screen.handle_key(KeyCode::Char('n'), Instant::now());
        screen.ctl.take_fetch();
        assert_eq!(screen.ctl.page(), 2);

        screen.handle_key(KeyCode::Char('t'), Instant::now());
        let ticket = screen.ctl.take_fetch().unwrap();
        assert_eq!(ticket.query.page, 1);
        assert_eq!(ticket.query.museum_type, Some(MuseumType::ALL[0]));
    }

    #[test]
    fn test_navigation_and_actions() {
        let records = vec![org(1, "A"), org(2, "B")];
        let mut screen = screen_with(Resource::Organizations, ready(records.clone(), 1, 1));

        assert_eq!(screen.handle_key(KeyCode::Down, Instant::now()), ListAction::None);
        assert_eq!(screen.handle_key(KeyCode::Down, Instant::now()), ListAction::None);
        assert_eq!(screen.cursor, 1);
        assert_eq!(
            screen.handle_key(KeyCode::Enter, Instant::now()),
            ListAction::Open(records[1].clone())
        );
        assert_eq!(
            screen.handle_key(KeyCode::Char('d'), Instant::now()),
            ListAction::Delete(records[1].clone())
        );
        // single page: next does nothing
        screen.handle_key(KeyCode::Char('n'), Instant::now());
        assert!(screen.ctl.take_fetch().is_none());
        assert_eq!(screen.handle_key(KeyCode::Char('q'), Instant::now()), ListAction::Quit);
    }

    #[test]
    fn test_delete_reloads_same_page_once() {
        let mut screen = screen_with(Resource::Organizations, ready(vec![org(1, "A")], 1, 3));
        screen.handle_key(KeyCode::Char('n'), Instant::now());
        let shown = screen.ctl.take_fetch().unwrap();
        assert!(screen.receive(shown.seq, Ok(ready(vec![org(11, "K")], 2, 3))));

        apply_delete_outcome(&mut screen, &DeleteOutcome::Deleted("organization K".to_string()));
        assert_eq!(screen.notice.as_deref(), Some("Deleted organization K."));
        let reload = screen.ctl.take_fetch().unwrap();
        assert!(reload.seq > shown.seq);
        assert_eq!(reload.query, shown.query);
        assert!(screen.ctl.take_fetch().is_none());
    }

    #[test]
    fn test_declined_or_failed_delete_fetches_nothing() {
        let mut screen = screen_with(Resource::Museums, ready(vec![], 1, 1));

        apply_delete_outcome(&mut screen, &DeleteOutcome::Cancelled);
        assert!(screen.notice.is_none());
        assert!(screen.ctl.take_fetch().is_none());

        apply_delete_outcome(&mut screen, &DeleteOutcome::Failed("Server error".to_string()));
        assert_eq!(screen.notice.as_deref(), Some("Server error"));
        assert!(screen.ctl.take_fetch().is_none());
    }

    #[test]
    fn test_stale_page_is_ignored() {
        let mut screen = screen_with(Resource::Organizations, ready(vec![org(1, "A")], 1, 3));
        screen.handle_key(KeyCode::Char('n'), Instant::now());
        let old = screen.ctl.take_fetch().unwrap();
        screen.handle_key(KeyCode::Char('s'), Instant::now());
        let new = screen.ctl.take_fetch().unwrap();

        assert!(screen.receive(new.seq, Ok(ready(vec![org(5, "New")], 1, 1))));
        assert!(!screen.receive(old.seq, Ok(ready(vec![org(9, "Old")], 2, 3))));
        assert_eq!(screen.records()[0].id(), 5);
    }

    #[test]
    fn test_failure_then_retry() {
        let mut screen = ListScreen::new(Resource::Museums, ListController::default());
        let ticket = screen.ctl.take_fetch().unwrap();
        let err = ApiError::from_status(reqwest::StatusCode::BAD_GATEWAY, "");
        screen.receive(ticket.seq, Err(err));
        assert!(matches!(&screen.view, View::Failed(m) if m == "Failed to load museums"));

        screen.handle_key(KeyCode::Char('r'), Instant::now());
        assert!(screen.ctl.take_fetch().is_some());
    }

    #[test]
    fn test_empty_page_past_end_steps_back() {
        let mut screen = ListScreen::new(Resource::Organizations, ListController::default());
        screen.ctl.set_page(3);
        let ticket = screen.ctl.take_fetch().unwrap();
        screen.receive(ticket.seq, Ok(ready(vec![], 3, 2)));
        let ticket = screen.ctl.take_fetch().unwrap();
        assert_eq!(ticket.query.page, 2);
    }

    #[test]
    fn test_initial_controller_from_flags() {
        let api = ApiClient::with_base_url("http://localhost:1/api/v1", Duration::from_secs(1)).unwrap();
        let app = App::with_api(api, Config::default()).unwrap();
        let args = ListArgs {
            page: 3,
            limit: Some(20),
            name: Some("tret".to_string()),
            museum_type: Some("palace-park-ensemble".to_string()),
            all: true,
        };
        let ctl = initial_controller(&app, Resource::Museums, &args).unwrap();
        assert_eq!(ctl.page(), 3);
        assert_eq!(ctl.page_size(), 20);
        assert_eq!(ctl.query().name.as_deref(), Some("TRET"));
        assert_eq!(ctl.query().museum_type, Some(MuseumType::PalaceParkEnsemble));

        let bad = ListArgs {
            limit: Some(15),
            museum_type: None,
            name: None,
            ..args
        };
        assert!(initial_controller(&app, Resource::Museums, &bad).is_err());
    }

    #[tokio::test]
    async fn test_fetch_museum_page_resolves_owners() {
        let mut server = mockito::Server::new_async().await;
        let page = server
            .mock("GET", "/api/v1/museum")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "1".into()),
                Matcher::UrlEncoded("page_size".into(), "10".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"data": [
                    {"Id": 1, "IdOwner": 4, "Name": "Gallery"},
                    {"id": 2, "id_owner": 4, "name": "Estate"},
                    {"Id": 3, "IdOwner": 6, "Name": "Reserve"}
                ], "page": 1, "page_size": 10, "total_count": 3}"#,
            )
            .create_async()
            .await;
        let owner = server
            .mock("GET", "/api/v1/organization/4")
            .with_status(200)
            .with_body(r#"{"ID": 4, "Name": "Trust"}"#)
            .expect(1)
            .create_async()
            .await;
        let failing = server
            .mock("GET", "/api/v1/organization/6")
            .with_status(500)
            .create_async()
            .await;

        let api = ApiClient::with_base_url(&format!("{}/api/v1", server.url()), Duration::from_secs(5))
            .unwrap();
        let query = ListController::default().query().clone();
        let loaded = fetch_page(&api, Resource::Museums, &query).await.unwrap();

        page.assert_async().await;
        owner.assert_async().await;
        failing.assert_async().await;
        assert_eq!(loaded.page.total_pages, 1);
        assert_eq!(loaded.page.data.len(), 3);
        assert_eq!(owner_name(&loaded.owners, 4), "Trust");
        assert_eq!(owner_name(&loaded.owners, 6), OWNER_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_fetch_activities_pages_locally() {
        let mut server = mockito::Server::new_async().await;
        let body: Vec<String> = (1..=12)
            .map(|i| format!(r#"{{"id": {}, "id_owner": 0, "year": 2024}}"#, i))
            .collect();
        let list = server
            .mock("GET", "/api/v1/activity")
            .with_status(200)
            .with_body(format!("[{}]", body.join(",")))
            .create_async()
            .await;

        let api = ApiClient::with_base_url(&format!("{}/api/v1", server.url()), Duration::from_secs(5))
            .unwrap();
        let mut ctl = ListController::default();
        ctl.set_page(2);
        let loaded = fetch_page(&api, Resource::Activities, ctl.query()).await.unwrap();

        list.assert_async().await;
        assert_eq!(loaded.page.total_count, 12);
        assert_eq!(loaded.page.total_pages, 2);
        let ids: Vec<i64> = loaded.page.data.iter().map(Record::id).collect();
        assert_eq!(ids, vec![11, 12]);
        assert!(loaded.owners.is_empty());
    }

    #[test]
    fn test_row_line_uses_placeholder_for_missing_owner() {
        let record = Record::Museum(Museum {
            id: 7,
            id_owner: 99,
            name: "Gallery".to_string(),
            ..Museum::default()
        });
        let line = row_line(&record, &OwnerLookup::new());
        assert!(line.contains(OWNER_PLACEHOLDER));
        assert!(line.contains("Gallery"));
    }

    #[test]
    fn test_row_line_marks_missing_type() {
        let record = Record::Museum(Museum {
            id: 8,
            id_owner: 1,
            name: "Depot".to_string(),
            ..Museum::default()
        });
        let line = row_line(&record, &OwnerLookup::new());
        assert!(line.trim_end().ends_with(EMPTY_VALUE));
    }
}
