//! Hash-based navigation for Circley
//!
//! This module provides the client-side routing layer:
//! - Path normalization with a canonical trailing-slash form
//! - Typed route definitions covering every addressable screen
//! - A URL router for parsing paths back to routes
//! - A fragment station abstraction over the address bar
//! - A hash router that keeps path state in sync with the fragment

use std::collections::HashMap;
use std::sync::Arc;

use app_core::locations::FindCategory;
use serde::{Deserialize, Serialize};
use tokio::sync::{oneshot, watch};

// =============================================================================
// Path Normalization
// =============================================================================

/// Normalize a raw fragment or link target into a canonical path.
///
/// Strips a leading `#`, guarantees a leading `/`, and appends a trailing
/// `/` to every path except the bare root. Total and idempotent: any input,
/// including the empty string, maps to a well-formed path.
pub fn normalize_path(raw: &str) -> String {
    let base = if raw.is_empty() { "/" } else { raw };
    let mut path = base.strip_prefix('#').unwrap_or(base).to_string();
    if !path.starts_with('/') {
        path.insert(0, '/');
    }
    if path.len() > 1 && !path.ends_with('/') {
        path.push('/');
    }
    path
}

// =============================================================================
// Route Parameters
// =============================================================================

/// Parameters extracted from a matched route
pub type RouteParams = HashMap<String, String>;

// =============================================================================
// Route Definitions
// =============================================================================

/// All possible routes in the application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "route", content = "params")]
pub enum Route {
    /// Home dashboard
    Home,

    // Auth
    /// Login screen
    Login,
    /// Create account
    Signup,

    // Resources
    /// Resource finder, optionally opened on a category tab
    Find {
        /// Category tab, `None` for the landing view
        #[serde(skip_serializing_if = "Option::is_none")]
        section: Option<FindCategory>,
    },
    /// Nearby locations with the map
    Locations,

    // Community
    /// Support circles
    Circles,

    // Personal tracking
    /// Personal log
    Log {
        /// Active log form
        view: LogView,
    },
    /// Location check-in
    CheckIn,

    // Account
    /// Account profile
    Account,
    /// Admin portal
    Admin,

    // Placeholders
    /// Verification placeholder
    Verify,
    /// Rating placeholder
    Rate,
    /// Sign-out confirmation
    Logout,

    /// Detail view for a home update card
    Update {
        /// Card id
        id: String,
    },

    // Error
    /// Not found
    NotFound,
}

/// Sub-views of the personal log screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogView {
    /// Daily check-in form
    #[default]
    Daily,
    /// Milestone form
    Milestone,
    /// Goal form
    Goal,
    /// Trigger form
    Trigger,
}

impl Default for Route {
    fn default() -> Self {
        Route::Home
    }
}

impl Route {
    /// Get the canonical normalized path for this route
    pub fn to_path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login/".to_string(),
            Route::Signup => "/signup/".to_string(),
            Route::Find { section } => match section {
                Some(section) => format!("/find/{}/", find_segment(*section)),
                None => "/find/".to_string(),
            },
            Route::Locations => "/locations/".to_string(),
            Route::Circles => "/circles/".to_string(),
            Route::Log { view } => match view {
                LogView::Daily => "/log/".to_string(),
                LogView::Milestone => "/log/milestone/".to_string(),
                LogView::Goal => "/log/goal/".to_string(),
                LogView::Trigger => "/log/trigger/".to_string(),
            },
            Route::CheckIn => "/checkin/".to_string(),
            Route::Account => "/account/".to_string(),
            Route::Admin => "/admin/".to_string(),
            Route::Verify => "/verify/".to_string(),
            Route::Rate => "/rate/".to_string(),
            Route::Logout => "/logout/".to_string(),
            Route::Update { id } => format!("/updates/{}/", urlencoding::encode(id)),
            Route::NotFound => "/not-found/".to_string(),
        }
    }
}

/// Path segment for a finder category tab
fn find_segment(section: FindCategory) -> &'static str {
    match section {
        FindCategory::Therapists => "therapist",
        FindCategory::Treatment => "treatment",
        FindCategory::Meetings => "meetings",
        FindCategory::SoberLiving => "sober-living",
    }
}

/// Finder category tab for a path segment
fn find_section(segment: &str) -> Option<FindCategory> {
    match segment {
        "therapist" => Some(FindCategory::Therapists),
        "treatment" => Some(FindCategory::Treatment),
        "meetings" => Some(FindCategory::Meetings),
        "sober-living" => Some(FindCategory::SoberLiving),
        _ => None,
    }
}

// =============================================================================
// Navigation Tabs
// =============================================================================

/// Bottom navigation bar tabs
///
/// The SOS action sits in the middle of the bar but is a broadcast button,
/// not a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NavigationTab {
    /// Home tab
    #[default]
    Home,
    /// Account tab
    Account,
    /// Rate tab
    Rate,
    /// Verify tab
    Verify,
}

impl NavigationTab {
    /// Get the root route for this tab
    pub fn root_route(&self) -> Route {
        match self {
            NavigationTab::Home => Route::Home,
            NavigationTab::Account => Route::Account,
            NavigationTab::Rate => Route::Rate,
            NavigationTab::Verify => Route::Verify,
        }
    }

    /// Get label for this tab
    pub fn label(&self) -> &'static str {
        match self {
            NavigationTab::Home => "Home",
            NavigationTab::Account => "Account",
            NavigationTab::Rate => "Rate",
            NavigationTab::Verify => "Verify",
        }
    }

    /// Whether this tab is highlighted for the given path.
    ///
    /// Home matches only the bare root; every other tab matches any path
    /// under its root.
    pub fn is_active(&self, current_path: &str) -> bool {
        let path = normalize_path(current_path);
        let root = self.root_route().to_path();
        match self {
            NavigationTab::Home => path == root,
            _ => path.starts_with(&root),
        }
    }

    /// Get all tabs in order
    pub fn all() -> [NavigationTab; 4] {
        [
            NavigationTab::Home,
            NavigationTab::Account,
            NavigationTab::Rate,
            NavigationTab::Verify,
        ]
    }
}

// =============================================================================
// Router
// =============================================================================

/// Route pattern for matching
struct RoutePattern {
    /// Pattern segments
    segments: Vec<PatternSegment>,
    /// Route builder
    builder: fn(RouteParams) -> Option<Route>,
}

/// Segment type in a pattern
#[derive(Debug, Clone)]
enum PatternSegment {
    /// Literal segment
    Literal(String),
    /// Parameter segment
    Param(String),
}

/// URL router for parsing paths to routes
pub struct Router {
    /// Route patterns
    patterns: Vec<RoutePattern>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Create a new router with the full route table
    pub fn new() -> Self {
        let mut router = Self {
            patterns: Vec::new(),
        };

        router.add_route("/", |_| Some(Route::Home));

        // Auth
        router.add_route("/login", |_| Some(Route::Login));
        router.add_route("/signup", |_| Some(Route::Signup));

        // Resources
        router.add_route("/find", |_| Some(Route::Find { section: None }));
        router.add_route("/find/:section", |params| {
            let section = find_section(params.get("section")?)?;
            Some(Route::Find {
                section: Some(section),
            })
        });
        router.add_route("/locations", |_| Some(Route::Locations));

        // Community
        router.add_route("/circles", |_| Some(Route::Circles));

        // Personal tracking
        router.add_route("/log", |_| {
            Some(Route::Log {
                view: LogView::Daily,
            })
        });
        router.add_route("/log/milestone", |_| {
            Some(Route::Log {
                view: LogView::Milestone,
            })
        });
        router.add_route("/log/goal", |_| {
            Some(Route::Log {
                view: LogView::Goal,
            })
        });
        router.add_route("/log/trigger", |_| {
            Some(Route::Log {
                view: LogView::Trigger,
            })
        });
        router.add_route("/checkin", |_| Some(Route::CheckIn));

        // Account
        router.add_route("/account", |_| Some(Route::Account));
        router.add_route("/admin", |_| Some(Route::Admin));

        // Placeholders
        router.add_route("/verify", |_| Some(Route::Verify));
        router.add_route("/rate", |_| Some(Route::Rate));
        router.add_route("/logout", |_| Some(Route::Logout));

        // Home deck details
        router.add_route("/updates/:id", |params| {
            Some(Route::Update {
                id: params.get("id")?.clone(),
            })
        });

        router
    }

    /// Add a route pattern
    fn add_route(&mut self, pattern: &str, builder: fn(RouteParams) -> Option<Route>) {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if let Some(param) = s.strip_prefix(':') {
                    PatternSegment::Param(param.to_string())
                } else {
                    PatternSegment::Literal(s.to_string())
                }
            })
            .collect();

        self.patterns.push(RoutePattern { segments, builder });
    }

    /// Match a path to a route
    pub fn match_path(&self, path: &str) -> Route {
        // Query strings are not part of the routing contract
        let pathname = match path.find('?') {
            Some(idx) => &path[..idx],
            None => path,
        };

        let path_segments: Vec<&str> = pathname.split('/').filter(|s| !s.is_empty()).collect();

        for pattern in &self.patterns {
            if let Some(params) = self.match_pattern(&pattern.segments, &path_segments) {
                if let Some(route) = (pattern.builder)(params) {
                    return route;
                }
            }
        }

        Route::NotFound
    }

    /// Match a pattern against path segments
    fn match_pattern(&self, pattern: &[PatternSegment], path: &[&str]) -> Option<RouteParams> {
        if pattern.len() != path.len() {
            return None;
        }

        let mut params = RouteParams::new();

        for (segment, actual) in pattern.iter().zip(path.iter()) {
            match segment {
                PatternSegment::Literal(expected) => {
                    if expected != *actual {
                        return None;
                    }
                }
                PatternSegment::Param(name) => {
                    params.insert(name.clone(), urlencoding::decode(actual).ok()?.into_owned());
                }
            }
        }

        Some(params)
    }
}

// =============================================================================
// Hash Station
// =============================================================================

/// Address-bar fragment storage.
///
/// In a browser this is the portion of the URL after `#`, rewritten by the
/// app and by the user alike, with a change notification on every rewrite.
/// Fragments are stored without the leading `#`.
pub trait HashStation: Send + Sync {
    /// Read the current fragment
    fn fragment(&self) -> String;

    /// Replace the fragment. Watchers are only notified when the value
    /// actually changes.
    fn set_fragment(&self, fragment: &str);

    /// Watch for fragment changes
    fn subscribe(&self) -> watch::Receiver<String>;
}

/// In-memory fragment store backed by a watch channel
#[derive(Debug)]
pub struct InMemoryHashStation {
    fragment: watch::Sender<String>,
}

impl InMemoryHashStation {
    /// Create a station with an empty fragment
    pub fn new() -> Self {
        Self::with_fragment("")
    }

    /// Create a station seeded with an initial fragment
    pub fn with_fragment(fragment: &str) -> Self {
        let (tx, _rx) = watch::channel(fragment.to_string());
        Self { fragment: tx }
    }
}

impl Default for InMemoryHashStation {
    fn default() -> Self {
        Self::new()
    }
}

impl HashStation for InMemoryHashStation {
    fn fragment(&self) -> String {
        self.fragment.borrow().clone()
    }

    fn set_fragment(&self, fragment: &str) {
        // send_if_modified stores the value even with no subscribers and
        // stays silent when the fragment is unchanged.
        self.fragment.send_if_modified(|current| {
            if *current == fragment {
                false
            } else {
                *current = fragment.to_string();
                true
            }
        });
    }

    fn subscribe(&self) -> watch::Receiver<String> {
        self.fragment.subscribe()
    }
}

// =============================================================================
// Hash Router
// =============================================================================

/// Client-side router driven by the address-bar fragment.
///
/// The station's fragment is the single source of truth: [`navigate`] writes
/// the fragment, and a background listener picks up every fragment change,
/// whoever wrote it, and publishes the normalized path. An empty fragment is
/// seeded to `/` at startup.
///
/// [`navigate`]: HashRouter::navigate
pub struct HashRouter {
    station: Arc<dyn HashStation>,
    routes: Router,
    path_rx: watch::Receiver<String>,
    stop_tx: Option<oneshot::Sender<()>>,
    _listener: tokio::task::JoinHandle<()>,
}

impl HashRouter {
    /// Attach a router to a fragment station
    pub fn new(station: Arc<dyn HashStation>) -> Self {
        if station.fragment().is_empty() {
            station.set_fragment("/");
        }

        let mut fragment_rx = station.subscribe();
        let initial = normalize_path(&fragment_rx.borrow_and_update());
        let (path_tx, path_rx) = watch::channel(initial);
        let (stop_tx, mut stop_rx) = oneshot::channel();

        let listener = tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = fragment_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let fragment = fragment_rx.borrow_and_update().clone();
                        let path = normalize_path(&fragment);
                        tracing::debug!(%path, "hash changed");
                        path_tx.send_if_modified(|current| {
                            if *current == path {
                                false
                            } else {
                                *current = path;
                                true
                            }
                        });
                    }
                    _ = &mut stop_rx => {
                        break;
                    }
                }
            }

            tracing::debug!("fragment listener stopped");
        });

        Self {
            station,
            routes: Router::new(),
            path_rx,
            stop_tx: Some(stop_tx),
            _listener: listener,
        }
    }

    /// Get the current normalized path
    pub fn current_path(&self) -> String {
        self.path_rx.borrow().clone()
    }

    /// Get the route for the current path
    pub fn current_route(&self) -> Route {
        self.routes.match_path(&self.current_path())
    }

    /// Resolve an arbitrary path or link target to a route
    pub fn resolve(&self, target: &str) -> Route {
        self.routes.match_path(&normalize_path(target))
    }

    /// Navigate to a path or link target.
    ///
    /// The fragment is only written when it differs from the current one, so
    /// a redundant navigation never produces a change notification.
    pub fn navigate(&self, target: &str) {
        let path = normalize_path(target);
        if self.station.fragment() != path {
            tracing::debug!(%path, "navigate");
            self.station.set_fragment(&path);
        }
    }

    /// Navigate to a typed route
    pub fn navigate_to(&self, route: &Route) {
        self.navigate(&route.to_path());
    }

    /// Watch the normalized path
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.path_rx.clone()
    }

    /// Detach the fragment listener
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for HashRouter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::sleep;

    #[test]
    fn test_normalize_path_examples() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("#"), "/");
        assert_eq!(normalize_path("home"), "/home/");
        assert_eq!(normalize_path("/circles"), "/circles/");
        assert_eq!(normalize_path("/circles/"), "/circles/");
        assert_eq!(normalize_path("#/log"), "/log/");
        assert_eq!(normalize_path("#/log/goal"), "/log/goal/");
    }

    #[test]
    fn test_normalize_path_idempotent() {
        let raw = ["", "#", "home", "/circles", "/circles/", "#/log/goal", "find/meetings"];
        for s in raw {
            let once = normalize_path(s);
            assert_eq!(normalize_path(&once), once, "input {s:?}");
        }
    }

    #[test]
    fn test_route_to_path() {
        assert_eq!(Route::Home.to_path(), "/");
        assert_eq!(Route::Login.to_path(), "/login/");
        assert_eq!(Route::Find { section: None }.to_path(), "/find/");
        assert_eq!(
            Route::Find {
                section: Some(FindCategory::SoberLiving)
            }
            .to_path(),
            "/find/sober-living/"
        );
        assert_eq!(
            Route::Log {
                view: LogView::Goal
            }
            .to_path(),
            "/log/goal/"
        );
        assert_eq!(
            Route::Update {
                id: "appt-101".to_string()
            }
            .to_path(),
            "/updates/appt-101/"
        );
    }

    #[test]
    fn test_router_round_trips_route_table() {
        let router = Router::new();
        let routes = vec![
            Route::Home,
            Route::Login,
            Route::Signup,
            Route::Find { section: None },
            Route::Find {
                section: Some(FindCategory::Therapists),
            },
            Route::Find {
                section: Some(FindCategory::Treatment),
            },
            Route::Find {
                section: Some(FindCategory::Meetings),
            },
            Route::Find {
                section: Some(FindCategory::SoberLiving),
            },
            Route::Locations,
            Route::Circles,
            Route::Log {
                view: LogView::Daily,
            },
            Route::Log {
                view: LogView::Milestone,
            },
            Route::Log {
                view: LogView::Goal,
            },
            Route::Log {
                view: LogView::Trigger,
            },
            Route::CheckIn,
            Route::Account,
            Route::Admin,
            Route::Verify,
            Route::Rate,
            Route::Logout,
            Route::Update {
                id: "appt-101".to_string(),
            },
            Route::NotFound,
        ];

        for route in &routes {
            assert_eq!(
                router.match_path(&route.to_path()),
                *route,
                "path {}",
                route.to_path()
            );
        }
    }

    #[test]
    fn test_router_parameterized_update() {
        let router = Router::new();
        assert_eq!(
            router.match_path("/updates/circle-880/"),
            Route::Update {
                id: "circle-880".to_string()
            }
        );

        let encoded = Route::Update {
            id: "day 1".to_string(),
        };
        assert_eq!(encoded.to_path(), "/updates/day%201/");
        assert_eq!(router.match_path(&encoded.to_path()), encoded);
    }

    #[test]
    fn test_router_not_found() {
        let router = Router::new();
        assert_eq!(router.match_path("/nonexistent/path/"), Route::NotFound);
        assert_eq!(router.match_path("/find/bogus/"), Route::NotFound);
        assert_eq!(router.match_path("/circles/join/"), Route::NotFound);
        assert_eq!(router.match_path("/updates/"), Route::NotFound);
    }

    #[test]
    fn test_router_ignores_query_strings() {
        let router = Router::new();
        assert_eq!(
            router.match_path("/find?q=harbor"),
            Route::Find { section: None }
        );
        assert_eq!(router.match_path("/?welcome=1"), Route::Home);
    }

    #[test]
    fn test_navigation_tab_active_rules() {
        assert!(NavigationTab::Home.is_active("/"));
        assert!(!NavigationTab::Home.is_active("/account/"));
        assert!(NavigationTab::Account.is_active("/account/"));
        assert!(NavigationTab::Account.is_active("/account"));
        assert!(!NavigationTab::Account.is_active("/"));
        assert!(NavigationTab::Rate.is_active("/rate/"));
        assert!(NavigationTab::Verify.is_active("/verify/"));
    }

    #[test]
    fn test_navigation_tab_metadata() {
        let tabs = NavigationTab::all();
        assert_eq!(tabs.len(), 4);
        assert_eq!(tabs[0], NavigationTab::Home);
        assert_eq!(tabs[0].label(), "Home");
        assert_eq!(tabs[1].root_route().to_path(), "/account/");
        assert_eq!(tabs[2].label(), "Rate");
        assert_eq!(tabs[3].root_route(), Route::Verify);
    }

    #[test]
    fn test_route_serialization() {
        let route = Route::Update {
            id: "appt-101".to_string(),
        };
        let json = serde_json::to_string(&route).unwrap();
        let parsed: Route = serde_json::from_str(&json).unwrap();
        assert_eq!(route, parsed);

        let find = Route::Find {
            section: Some(FindCategory::Meetings),
        };
        let json = serde_json::to_string(&find).unwrap();
        let parsed: Route = serde_json::from_str(&json).unwrap();
        assert_eq!(find, parsed);
    }

    #[tokio::test]
    async fn test_router_seeds_empty_fragment() {
        let station = Arc::new(InMemoryHashStation::new());
        let router = HashRouter::new(station.clone());

        assert_eq!(station.fragment(), "/");
        assert_eq!(router.current_path(), "/");
        assert_eq!(router.current_route(), Route::Home);
    }

    #[tokio::test]
    async fn test_navigate_updates_path_and_fragment() {
        let station = Arc::new(InMemoryHashStation::new());
        let router = HashRouter::new(station.clone());
        let mut paths = router.subscribe();

        router.navigate("circles");
        assert_eq!(station.fragment(), "/circles/");

        paths.changed().await.unwrap();
        assert_eq!(*paths.borrow_and_update(), "/circles/");
        assert_eq!(router.current_route(), Route::Circles);
    }

    #[tokio::test]
    async fn test_hash_edits_flow_into_the_router() {
        let station = Arc::new(InMemoryHashStation::new());
        let router = HashRouter::new(station.clone());
        let mut paths = router.subscribe();

        station.set_fragment("log/trigger");

        paths.changed().await.unwrap();
        assert_eq!(*paths.borrow_and_update(), "/log/trigger/");
        assert_eq!(
            router.current_route(),
            Route::Log {
                view: LogView::Trigger
            }
        );
    }

    #[tokio::test]
    async fn test_subscribers_observe_navigations_in_order() {
        let station = Arc::new(InMemoryHashStation::new());
        let router = HashRouter::new(station);
        let mut paths = router.subscribe();

        let mut seen = Vec::new();
        for target in ["/circles", "/find/meetings", "/account"] {
            router.navigate(target);
            paths.changed().await.unwrap();
            seen.push(paths.borrow_and_update().clone());
        }

        assert_eq!(seen, ["/circles/", "/find/meetings/", "/account/"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_redundant_navigate_is_quiet() {
        let station = Arc::new(InMemoryHashStation::new());
        let router = HashRouter::new(station.clone());
        let mut paths = router.subscribe();

        router.navigate("/circles/");
        paths.changed().await.unwrap();
        paths.borrow_and_update();

        let mut fragments = station.subscribe();
        router.navigate("circles");
        sleep(Duration::from_millis(50)).await;

        assert!(!fragments.has_changed().unwrap());
        assert!(!paths.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_detaches_listener() {
        let station = Arc::new(InMemoryHashStation::new());
        let router = HashRouter::new(station.clone());
        let mut paths = router.subscribe();

        router.stop();
        sleep(Duration::from_millis(10)).await;

        station.set_fragment("/circles/");
        sleep(Duration::from_millis(10)).await;

        assert!(paths.has_changed().is_err());
        assert_eq!(station.fragment(), "/circles/");
    }

    #[tokio::test]
    async fn test_resolve_matches_unnormalized_targets() {
        let station = Arc::new(InMemoryHashStation::new());
        let router = HashRouter::new(station);

        assert_eq!(router.resolve("checkin"), Route::CheckIn);
        assert_eq!(
            router.resolve("#/log/goal"),
            Route::Log {
                view: LogView::Goal
            }
        );
    }
}
