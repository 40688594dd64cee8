//! The browsing session: an address bar, the view it points at, and the
//! commands that move between locations.
//!
//! # Design
//! Every command either pushes a new location or walks history; after any
//! move the session reloads whatever the bar now points at. Views are kept
//! across loads while the route stays the same and replaced (along with
//! their style sheet) when it changes.

use std::str::FromStr;

use tracing::debug;
use zoo_core::sports::LeagueQuery;
use zoo_core::view::habitat_species_location;
use zoo_core::{
    AddressBar, LeagueView, ListPage, ListView, Location, Notice, Route, SportsClient,
    StyleGuard, StyleRegistry, Transport, ZooClient,
};

use crate::render;

pub const HELP: &str = "\
commands:
  open <location>        go to a location, e.g. /habitats?page=2
  search <key> <term>    filter the list (species: name; habitats: filter, climate;
                         leagues: c for country, s for sport)
  clear                  drop the filter
  page <n> | size <n>    jump to a page | change the page size (5, 10, 20)
  next | prev            neighbouring page
  back | forward         walk history
  species <HA-id>        species living in a habitat
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Open(Location),
    Search { key: String, term: String },
    Clear,
    Page(u32),
    Size(u32),
    Next,
    Previous,
    Back,
    Forward,
    Inhabitants(String),
    Help,
    Quit,
}

impl FromStr for Action {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let number = |what: &str| {
            rest.parse::<u32>()
                .map_err(|_| format!("`{command}` needs a {what}, got `{rest}`"))
        };
        match command {
            "open" | "o" if !rest.is_empty() => Ok(Action::Open(Location::parse(rest))),
            "search" | "s" => {
                let (key, term) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| "usage: search <key> <term>".to_string())?;
                Ok(Action::Search {
                    key: key.to_string(),
                    term: term.trim().to_string(),
                })
            }
            "clear" => Ok(Action::Clear),
            "page" => number("page number").map(Action::Page),
            "size" => number("page size").map(Action::Size),
            "next" | "n" => Ok(Action::Next),
            "prev" | "p" => Ok(Action::Previous),
            "back" | "b" => Ok(Action::Back),
            "forward" | "f" => Ok(Action::Forward),
            "species" if !rest.is_empty() => Ok(Action::Inhabitants(rest.to_string())),
            "help" | "?" => Ok(Action::Help),
            "quit" | "q" | "exit" => Ok(Action::Quit),
            "" => Err("type `help` for commands".to_string()),
            other => Err(format!("unknown command `{other}`; type `help`")),
        }
    }
}

pub enum Screen {
    List(ListView),
    Leagues(LeagueView),
    NotFound,
}

impl Screen {
    fn matches(&self, route: Route) -> bool {
        match (self, route) {
            (Screen::List(view), Route::Species) => view.page() == ListPage::Species,
            (Screen::List(view), Route::Habitats) => view.page() == ListPage::Habitats,
            (Screen::List(view), Route::HabitatSpecies) => view.page() == ListPage::HabitatSpecies,
            (Screen::Leagues(_), Route::Leagues) => true,
            (Screen::NotFound, Route::NotFound) => true,
            _ => false,
        }
    }

    fn for_route(route: Route) -> Self {
        match route {
            Route::Species => Screen::List(ListView::new(ListPage::Species)),
            Route::Habitats => Screen::List(ListView::new(ListPage::Habitats)),
            Route::HabitatSpecies => Screen::List(ListView::new(ListPage::HabitatSpecies)),
            Route::Leagues => Screen::Leagues(LeagueView::new()),
            Route::NotFound => Screen::NotFound,
        }
    }
}

pub struct Session<T: Transport> {
    transport: T,
    zoo: ZooClient,
    sports: SportsClient,
    bar: AddressBar,
    styles: StyleRegistry,
    screen: Screen,
    guard: Option<StyleGuard>,
    notice: Option<Notice>,
}

impl<T: Transport> Session<T> {
    /// Open `start` and load it.
    pub fn open(transport: T, zoo: ZooClient, sports: SportsClient, start: Location) -> Self {
        let route = start.route();
        let mut session = Self {
            transport,
            zoo,
            sports,
            bar: AddressBar::new(start),
            styles: StyleRegistry::new(),
            screen: Screen::for_route(route),
            guard: None,
            notice: None,
        };
        session.enter_style();
        session.reload();
        session
    }

    pub fn location(&self) -> &Location {
        self.bar.current()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    fn enter_style(&mut self) {
        // Release the old sheet before the new one goes in.
        self.guard = None;
        let sheet = match &self.screen {
            Screen::List(view) => Some(view.page().style()),
            Screen::Leagues(_) => Some(zoo_core::sports::style()),
            Screen::NotFound => None,
        };
        self.guard = sheet.map(|sheet| self.styles.enter(sheet));
    }

    /// Load whatever the address bar points at.
    fn reload(&mut self) {
        let location = self.bar.current().clone();
        let route = location.route();
        if !self.screen.matches(route) {
            debug!(%location, ?route, "switching view");
            self.screen = Screen::for_route(route);
            self.enter_style();
        }
        match &mut self.screen {
            Screen::List(view) => {
                if let Some(clamped) = view.load(&self.transport, &self.zoo, &location.query) {
                    self.bar.replace(clamped.clone());
                    view.load(&self.transport, &self.zoo, &clamped.query);
                }
            }
            Screen::Leagues(view) => view.load(&self.transport, &self.sports, &location.query),
            Screen::NotFound => {
                self.notice = Some(Notice::warning(format!("Nothing lives at {}.", location.path)));
            }
        }
    }

    fn push(&mut self, location: Location) {
        self.bar.push(location);
        self.reload();
    }

    /// Run one command. Returns `false` when the session should end.
    pub fn apply(&mut self, action: Action) -> bool {
        self.notice = None;
        match action {
            Action::Quit => return false,
            Action::Help => println!("{HELP}"),
            Action::Open(location) => self.push(location),
            Action::Back => {
                if self.bar.back().is_some() {
                    self.reload();
                } else {
                    self.notice = Some(Notice::info("No earlier page."));
                }
            }
            Action::Forward => {
                if self.bar.forward().is_some() {
                    self.reload();
                } else {
                    self.notice = Some(Notice::info("No later page."));
                }
            }
            Action::Inhabitants(habitat_id) => self.push(habitat_species_location(&habitat_id)),
            other => self.apply_to_view(other),
        }
        true
    }

    fn apply_to_view(&mut self, action: Action) {
        let target = match (&mut self.screen, action) {
            (Screen::List(view), Action::Search { key, term }) => view.search(&key, &term).ok(),
            (Screen::List(view), Action::Clear) => Some(view.clear_search()),
            (Screen::List(view), Action::Page(page)) => view.goto_page(page).ok(),
            (Screen::List(view), Action::Size(size)) => view.set_page_size(size).ok(),
            (Screen::List(view), Action::Next) => {
                let next = view.next_page();
                if next.is_none() {
                    self.notice = Some(Notice::info("Already on the last page."));
                }
                next
            }
            (Screen::List(view), Action::Previous) => {
                let previous = view.previous_page();
                if previous.is_none() {
                    self.notice = Some(Notice::info("Already on the first page."));
                }
                previous
            }
            (Screen::Leagues(view), Action::Search { key, term }) => {
                let current = view.query().clone();
                let country = current.country.unwrap_or_default();
                let sport = current.sport.unwrap_or_default();
                match key.as_str() {
                    "c" | "country" => view.search(&term, &sport).ok(),
                    "s" | "sport" => view.search(&country, &term).ok(),
                    _ => {
                        self.notice = Some(Notice::warning(format!(
                            "Search by `c` (country) or `s` (sport), not `{key}`."
                        )));
                        None
                    }
                }
            }
            (Screen::Leagues(_), Action::Clear) => Some(LeagueQuery::default().location()),
            _ => {
                self.notice = Some(Notice::info("That command does not apply to this page."));
                None
            }
        };
        if let Some(location) = target {
            self.push(location);
        }
    }

    pub fn render(&self) {
        println!("── {} ──", self.bar.current());
        match &self.screen {
            Screen::List(view) => render::print_list(view, &self.styles),
            Screen::Leagues(view) => {
                if !view.leagues().is_empty() {
                    println!("{}", render::leagues_table(view.leagues(), &self.styles));
                } else if view.query().is_empty() {
                    println!("Search with `search c <country>` or `search s <sport>`.");
                }
                if let Some(notice) = view.notice() {
                    render::print_notice(notice);
                }
            }
            Screen::NotFound => {}
        }
        if let Some(notice) = &self.notice {
            render::print_notice(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::UreqTransport;
    use mock_server::Store;
    use zoo_core::{Level, LoadStatus};

    fn start_server() -> String {
        let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = std_listener.local_addr().unwrap();
        std_listener.set_nonblocking(true).unwrap();
        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
                mock_server::run_with(listener, Store::seeded()).await
            })
            .unwrap();
        });
        format!("http://{addr}")
    }

    fn session(start: &str) -> Session<UreqTransport> {
        let base = start_server();
        Session::open(
            UreqTransport::new(),
            ZooClient::new(&base),
            SportsClient::new(&base),
            Location::parse(start),
        )
    }

    fn list(session: &Session<UreqTransport>) -> &ListView {
        match session.screen() {
            Screen::List(view) => view,
            _ => panic!("expected a list view"),
        }
    }

    #[test]
    fn parses_commands() {
        assert_eq!("next".parse::<Action>(), Ok(Action::Next));
        assert_eq!("page 3".parse::<Action>(), Ok(Action::Page(3)));
        assert_eq!(
            "search name Red Fox".parse::<Action>(),
            Ok(Action::Search {
                key: "name".into(),
                term: "Red Fox".into()
            })
        );
        assert_eq!(
            "open habitats?page=2".parse::<Action>(),
            Ok(Action::Open(Location::new("/habitats", "page=2")))
        );
        assert!("page two".parse::<Action>().is_err());
        assert!("dance".parse::<Action>().is_err());
        assert!("search name".parse::<Action>().is_err());
    }

    #[test]
    fn paging_walks_history() {
        let mut session = session("/habitats?page=1&pageSize=5");
        assert_eq!(list(&session).rows().len(), 5);
        assert_eq!(session.styles().active().map(|s| s.view), Some("habitats"));

        assert!(session.apply(Action::Next));
        assert_eq!(list(&session).state().page, 2);
        assert_eq!(list(&session).rows().len(), 3);

        session.apply(Action::Next);
        assert_eq!(session.notice().map(|n| n.level), Some(Level::Info));

        session.apply(Action::Back);
        assert_eq!(list(&session).state().page, 1);
        session.apply(Action::Forward);
        assert_eq!(list(&session).state().page, 2);
    }

    #[test]
    fn page_past_the_end_is_replaced() {
        let mut session = session("/species?page=1&pageSize=5");
        session.apply(Action::Page(9));
        assert_eq!(list(&session).state().page, 3);
        assert_eq!(session.location().to_string(), "/species?page=3&pageSize=5");

        // The clamp replaced the entry, so back returns to page 1.
        session.apply(Action::Back);
        assert_eq!(list(&session).state().page, 1);
    }

    #[test]
    fn invalid_search_keeps_location() {
        let mut session = session("/species");
        let before = session.location().clone();
        session.apply(Action::Search {
            key: "name".into(),
            term: "<script>".into(),
        });
        assert_eq!(session.location(), &before);
        assert_eq!(list(&session).notice().map(|n| n.level), Some(Level::Warning));
    }

    #[test]
    fn habitat_link_switches_view_and_style() {
        let mut session = session("/habitats");
        session.apply(Action::Inhabitants("HA-001".into()));
        let view = list(&session);
        assert_eq!(view.page(), ListPage::HabitatSpecies);
        assert_eq!(view.rows().len(), 3);
        assert_eq!(session.styles().len(), 1);
        assert_ne!(session.styles().active().map(|s| s.view), Some("habitats"));
    }

    #[test]
    fn leagues_search_combines_keys() {
        let mut session = session("/leagues");
        session.apply(Action::Search {
            key: "c".into(),
            term: "England".into(),
        });
        session.apply(Action::Search {
            key: "s".into(),
            term: "Soccer".into(),
        });
        let Screen::Leagues(view) = session.screen() else {
            panic!("expected leagues");
        };
        assert!(matches!(view.status(), LoadStatus::Loaded(_)));
        assert_eq!(view.leagues().len(), 2);
        assert_eq!(session.location().to_string(), "/leagues?c=England&s=Soccer");
    }

    #[test]
    fn unknown_path_shows_notice() {
        let session = session("/keepers");
        assert!(matches!(session.screen(), Screen::NotFound));
        assert!(session.styles().is_empty());
        assert_eq!(session.notice().map(|n| n.level), Some(Level::Warning));
    }
}
