//! Screen view-models
//!
//! One headless view-model per routed screen. Builders take explicit
//! inputs (the session snapshot plus whatever domain data the screen
//! renders) and produce serializable data a rendering shell can walk.
//! Fixed copy lives in associated constants so every screen's chrome
//! strings sit next to the model that uses them.
//!
//! Screens that only present data (home, find, circles, admin, the
//! placeholders) are built fresh per render. Screens that carry form or
//! toggle state between events (login, signup, log, check-in, account,
//! locations) are constructed once and mutated by the shell's event
//! handlers.

use app_core::auth::{AuthService, MemberRole, SignupParams};
use app_core::checkin::{demo_venues, filter_venues, CheckInRequest};
use app_core::circles::Circle;
use app_core::journal::{
    week_at_a_glance, DailyEntry, GlanceDay, Goal, LogEntry, Milestone, Mood, ReminderCadence,
    TriggerEntry, TriggerKind,
};
use app_core::locations::{
    demo_directory, demo_locations, DirectoryEntry, FindCategory, MapModel, MapRequest,
    RecoveryLocation,
};
use app_core::sobriety::CounterSnapshot;
use app_core::updates::{find_update, UpdateCard};
use app_state::CurrentSession;
use serde::{Deserialize, Serialize};

use crate::card_stack::{CardLayout, CardStack, DragTransform};
use crate::components::{FormStatus, ScreenHeader};
use crate::navigation::{LogView, Route};

/// The phone-shell brand header most screens share
fn brand_header() -> ScreenHeader {
    ScreenHeader::new("NextCircle.org", "Circely")
}

/// `None` for an untouched form field, `Some` otherwise
fn optional(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

// =============================================================================
// Shared Pieces
// =============================================================================

/// A labelled link into the auth flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthLink {
    /// Visible label
    pub label: String,
    /// Normalized path the link navigates to
    pub target: String,
}

impl AuthLink {
    fn new(label: &str, route: Route) -> Self {
        Self {
            label: label.to_string(),
            target: route.to_path(),
        }
    }
}

/// One selectable pill in a toggle row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillOption {
    /// Pill label
    pub label: String,
    /// Whether this pill is the selected one
    pub selected: bool,
}

/// Sign-up nudge shown to unauthenticated visitors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigninPrompt {
    /// Prompt headline
    pub title: String,
    /// Supporting line
    pub body: String,
    /// Login and signup links
    pub links: [AuthLink; 2],
}

impl SigninPrompt {
    /// Prompt headline
    pub const TITLE: &'static str = "Join Circley Today";
    /// Supporting line
    pub const BODY: &'static str =
        "Create an account to save locations and connect with your recovery community";

    fn new() -> Self {
        Self {
            title: Self::TITLE.to_string(),
            body: Self::BODY.to_string(),
            links: [
                AuthLink::new("Login", Route::Login),
                AuthLink::new("Sign Up", Route::Signup),
            ],
        }
    }
}

// =============================================================================
// Home
// =============================================================================

/// The tappable sobriety counter card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterCard {
    /// Display-mode label rendered bold inside the heading
    pub mode: String,
    /// Main counter line
    pub value: String,
    /// Line under the value, e.g. "days • tap to change"
    pub detail: String,
    /// Daily encouragement message shown at the bottom of the card
    pub message: String,
    /// Accessibility label for the whole card
    pub accessibility: String,
}

impl CounterCard {
    /// Heading text before the bold mode label
    pub const HEADING: &'static str = "You've been sober for";

    /// Render a counter reading plus the day's message
    pub fn new(snapshot: &CounterSnapshot, message: &str) -> Self {
        Self {
            mode: snapshot.mode.label().to_string(),
            value: snapshot.main.clone(),
            detail: format!("{} • tap to change", snapshot.sub),
            message: message.to_string(),
            accessibility: format!(
                "Sobriety counter. Mode: {}. {}. Click to change display.",
                snapshot.mode.label(),
                snapshot.aria
            ),
        }
    }
}

/// One of the three round section buttons under the counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircleButton {
    /// Uppercase button label
    pub label: String,
    /// Normalized path the button navigates to
    pub target: String,
}

/// The home dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeScreen {
    /// Brand header
    pub header: ScreenHeader,
    /// Welcome line, present when a member is signed in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub welcome: Option<String>,
    /// Login/signup links, present for guests
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub auth_links: Vec<AuthLink>,
    /// Sobriety counter card
    pub counter: CounterCard,
    /// Section buttons in display order
    pub circle_buttons: Vec<CircleButton>,
    /// The updates deck
    pub deck: DeckView,
}

impl HomeScreen {
    /// Guest link into the login screen
    pub const LOGIN_LABEL: &'static str = "Login";
    /// Guest link into the signup screen
    pub const JOIN_LABEL: &'static str = "Join now";

    /// Build the dashboard for one render
    pub fn build(
        session: &CurrentSession,
        counter: &CounterSnapshot,
        message: &str,
        deck: &CardStack<UpdateCard>,
    ) -> Self {
        let (welcome, auth_links) = if session.is_signed_in {
            (
                Some(format!("Welcome back, {}", session.member.username)),
                Vec::new(),
            )
        } else {
            (
                None,
                vec![
                    AuthLink::new(Self::LOGIN_LABEL, Route::Login),
                    AuthLink::new(Self::JOIN_LABEL, Route::Signup),
                ],
            )
        };

        Self {
            header: brand_header(),
            welcome,
            auth_links,
            counter: CounterCard::new(counter, message),
            circle_buttons: Self::circle_buttons(),
            deck: DeckView::from_stack(deck),
        }
    }

    fn circle_buttons() -> Vec<CircleButton> {
        [
            ("CIRCLES", Route::Circles),
            ("FIND", Route::Find { section: None }),
            ("LOG", Route::Log { view: LogView::Daily }),
        ]
        .into_iter()
        .map(|(label, route)| CircleButton {
            label: label.to_string(),
            target: route.to_path(),
        })
        .collect()
    }
}

// =============================================================================
// Updates Deck
// =============================================================================

/// One rendered card in the updates deck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckCard {
    /// Card content
    pub card: UpdateCard,
    /// Resting pose at this stack depth
    pub layout: CardLayout,
    /// Live drag transform, carried by the top card only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<DragTransform>,
    /// Path of the card's detail screen
    pub see_more_target: String,
}

/// One paging dot under the deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckDot {
    /// Index into the deck
    pub index: usize,
    /// Whether this dot marks the active card
    pub active: bool,
    /// Accessibility label, e.g. "Go to update 3"
    pub accessibility: String,
}

/// The updates deck as one render pass sees it
///
/// An empty deck has no cards or dots; the host renders
/// [`DeckView::EMPTY_MESSAGE`] instead of the stack area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckView {
    /// Visible cards, top first
    pub cards: Vec<DeckCard>,
    /// Paging dots, one per card in the deck
    pub dots: Vec<DeckDot>,
    /// Position text, e.g. "2 of 5"
    pub position: String,
    /// Fill of the progress bar under the deck
    pub progress_percent: f32,
    /// Whether the previous-card control is enabled
    pub prev_enabled: bool,
    /// Whether the next-card control is enabled
    pub next_enabled: bool,
}

impl DeckView {
    /// Deck section title
    pub const TITLE: &'static str = "Updates";
    /// Gesture hint next to the title
    pub const HINT: &'static str = "Swipe";
    /// Card action opening the detail screen
    pub const SEE_MORE_LABEL: &'static str = "See more";
    /// Previous-card control label
    pub const PREV_LABEL: &'static str = "← Prev";
    /// Next-card control label
    pub const NEXT_LABEL: &'static str = "Next →";
    /// Copy shown in place of an empty deck
    pub const EMPTY_MESSAGE: &'static str = "No updates to explore.";

    /// Snapshot a card stack for rendering
    pub fn from_stack(stack: &CardStack<UpdateCard>) -> Self {
        let cards = stack
            .visible_layouts()
            .into_iter()
            .filter_map(|layout| {
                let card = stack.items().get(layout.index)?.clone();
                let transform = (layout.depth == 0).then(|| stack.transform());
                Some(DeckCard {
                    see_more_target: card.detail_path(),
                    card,
                    layout,
                    transform,
                })
            })
            .collect();

        let dots = (0..stack.len())
            .map(|index| DeckDot {
                index,
                active: index == stack.active_index(),
                accessibility: format!("Go to update {}", index + 1),
            })
            .collect();

        let position = if stack.is_empty() {
            "0 of 0".to_string()
        } else {
            format!("{} of {}", stack.active_index() + 1, stack.len())
        };

        Self {
            cards,
            dots,
            position,
            progress_percent: stack.progress_percent(),
            prev_enabled: stack.active_index() > 0,
            next_enabled: stack.active_index() + 1 < stack.len(),
        }
    }
}

// =============================================================================
// Login
// =============================================================================

/// The login form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginScreen {
    /// Email field
    pub email: String,
    /// Password field
    pub password: String,
    /// Inline validation message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoginScreen {
    /// Header eyebrow
    pub const EYEBROW: &'static str = "Recovery Network";
    /// Header title
    pub const TITLE: &'static str = "Login";
    /// Email field label
    pub const EMAIL_LABEL: &'static str = "Email";
    /// Password field label
    pub const PASSWORD_LABEL: &'static str = "Password";
    /// Submit button label
    pub const SUBMIT_LABEL: &'static str = "Login";

    /// An empty login form
    pub fn new() -> Self {
        Self::default()
    }

    /// Header for this screen
    pub fn header(&self) -> ScreenHeader {
        ScreenHeader::new(Self::EYEBROW, Self::TITLE)
    }

    /// Footer links under the form
    pub fn links() -> [AuthLink; 2] {
        [
            AuthLink::new("Create an account", Route::Signup),
            AuthLink::new("Back to Home", Route::Home),
        ]
    }

    /// Show an inline validation message
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Clear the inline validation message
    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

// =============================================================================
// Signup
// =============================================================================

/// Which step of the two-step signup flow is showing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignupStep {
    /// Role selection
    #[default]
    Role,
    /// Email and password fields
    Credentials,
}

/// One selectable role card on the first signup step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCard {
    /// The role this card offers
    pub role: MemberRole,
    /// Card label
    pub label: String,
    /// Card description
    pub description: String,
    /// Accent color hex string
    pub accent: String,
    /// Whether this card is the selected one
    pub selected: bool,
}

/// The two-step signup form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignupScreen {
    /// Current step
    pub step: SignupStep,
    /// Role chosen on the first step
    pub role: Option<MemberRole>,
    /// Email field
    pub email: String,
    /// Password field
    pub password: String,
    /// Password confirmation field
    pub confirm_password: String,
    /// Inline validation message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SignupScreen {
    /// Header eyebrow
    pub const EYEBROW: &'static str = "Recovery Network";
    /// Header title on the role step
    pub const ROLE_TITLE: &'static str = "Who are you?";
    /// Header title on the credentials step
    pub const CREDENTIALS_TITLE: &'static str = "Sign Up";
    /// Intro line above the role cards
    pub const INTRO: &'static str =
        "Tell us a bit about how you'll use Circley so we can personalize the journey.";
    /// Label above the chosen-role line on the credentials step
    pub const SIGNING_UP_AS: &'static str = "Signing up as";
    /// Chosen-role line before any role is picked
    pub const ROLE_FALLBACK: &'static str = "Choose who you are";
    /// Email field label
    pub const EMAIL_LABEL: &'static str = "Work or personal email";
    /// Password field label
    pub const PASSWORD_LABEL: &'static str = "Create password";
    /// Confirmation field label
    pub const CONFIRM_LABEL: &'static str = "Confirm password";
    /// Role-step advance button label
    pub const CONTINUE_LABEL: &'static str = "Continue";
    /// Credentials-step back button label
    pub const BACK_LABEL: &'static str = "Back";
    /// Submit button label
    pub const SUBMIT_LABEL: &'static str = "Create account";
    /// Header link into the login screen
    pub const LOGIN_LABEL: &'static str = "Login";
    /// Footer link back to the dashboard
    pub const HOME_LABEL: &'static str = "Back to Home";

    /// A fresh signup form on the role step
    pub fn new() -> Self {
        Self::default()
    }

    /// Header title for the current step
    pub fn title(&self) -> &'static str {
        match self.step {
            SignupStep::Role => Self::ROLE_TITLE,
            SignupStep::Credentials => Self::CREDENTIALS_TITLE,
        }
    }

    /// Header for this screen
    pub fn header(&self) -> ScreenHeader {
        ScreenHeader::new(Self::EYEBROW, self.title())
    }

    /// Role cards in display order, with the chosen one flagged
    pub fn role_cards(&self) -> Vec<RoleCard> {
        MemberRole::ALL
            .into_iter()
            .map(|role| RoleCard {
                role,
                label: role.label().to_string(),
                description: role.description().to_string(),
                accent: role.accent().to_string(),
                selected: self.role == Some(role),
            })
            .collect()
    }

    /// Choose a role on the first step
    pub fn select_role(&mut self, role: MemberRole) {
        self.role = Some(role);
    }

    /// Advance to the credentials step, or surface the role-step message
    pub fn continue_to_credentials(&mut self) {
        match AuthService::validate_role_step(self.role) {
            Ok(_) => {
                self.step = SignupStep::Credentials;
                self.error = None;
            }
            Err(error) => {
                self.error = Some(error.to_string());
            }
        }
    }

    /// Return to the role step, keeping every field
    pub fn back_to_role(&mut self) {
        self.step = SignupStep::Role;
    }

    /// The chosen-role line on the credentials step
    pub fn signing_up_as(&self) -> &'static str {
        self.role.map_or(Self::ROLE_FALLBACK, |role| role.label())
    }

    /// Show an inline validation message
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Clear the inline validation message
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// The form's fields as signup parameters
    pub fn params(&self) -> SignupParams {
        SignupParams {
            role: self.role,
            email: self.email.clone(),
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
        }
    }
}

// =============================================================================
// Find Support
// =============================================================================

/// One category tab on the find-support screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindTab {
    /// Category the tab opens
    pub category: FindCategory,
    /// Tab label
    pub label: String,
    /// Normalized path of the tab
    pub target: String,
    /// Whether this tab is the active one
    pub active: bool,
}

/// The find-support directory screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindScreen {
    /// Brand header
    pub header: ScreenHeader,
    /// Category tabs in display order
    pub tabs: Vec<FindTab>,
    /// Search field
    pub query: String,
    /// Directory results
    pub results: Vec<DirectoryEntry>,
    /// Sign-up nudge, present for guests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signin_prompt: Option<SigninPrompt>,
}

impl FindScreen {
    /// Section title
    pub const TITLE: &'static str = "Find support";
    /// Pill next to the section title
    pub const TITLE_PILL: &'static str = "Browse & filter";
    /// Section subtitle
    pub const SUBTITLE: &'static str =
        "Search therapists, treatment centers, meetings and sober living near you.";
    /// Search field placeholder
    pub const SEARCH_PLACEHOLDER: &'static str = "Search by name, city, or keyword";
    /// Filter button label
    pub const FILTER_LABEL: &'static str = "Filter";
    /// Result row action label
    pub const VIEW_LABEL: &'static str = "View";

    /// Build the screen, opened on a category tab
    ///
    /// `None` opens the landing view, which shows the first tab active.
    pub fn build(section: Option<FindCategory>, session: &CurrentSession) -> Self {
        let active = section.unwrap_or_default();
        let tabs = FindCategory::ALL
            .into_iter()
            .map(|category| FindTab {
                category,
                label: category.label().to_string(),
                target: Route::Find {
                    section: Some(category),
                }
                .to_path(),
                active: category == active,
            })
            .collect();

        Self {
            header: brand_header(),
            tabs,
            query: String::new(),
            results: demo_directory(),
            signin_prompt: (!session.is_signed_in).then(SigninPrompt::new),
        }
    }
}

// =============================================================================
// Locations
// =============================================================================

/// Which half of the map/list toggle is showing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationsView {
    /// Full-bleed map
    #[default]
    Map,
    /// Location list
    List,
}

/// One row in the locations list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRow {
    /// Location id, used to focus the map
    pub id: String,
    /// Location name
    pub name: String,
    /// Meta line, e.g. "San Francisco • Open"
    pub meta: String,
    /// Distance badge
    pub distance: String,
}

/// The nearby-locations browser with its map/list toggle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationsScreen {
    /// Current view mode
    pub view: LocationsView,
    /// Whether a member is signed in
    pub authenticated: bool,
    /// Nav welcome line, present when a member is signed in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub welcome: Option<String>,
    /// Map view-model handed to the mapping widget
    pub map: MapModel,
    /// List rows
    pub rows: Vec<LocationRow>,
    /// Sign-up nudge, present for guests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signin_prompt: Option<SigninPrompt>,
}

impl LocationsScreen {
    /// Nav logo text
    pub const LOGO: &'static str = "Circely";
    /// Nav tagline
    pub const TAGLINE: &'static str = "Find Resources";
    /// Map half of the view toggle
    pub const MAP_TOGGLE_LABEL: &'static str = "Map";
    /// List half of the view toggle
    pub const LIST_TOGGLE_LABEL: &'static str = "List";
    /// Nav sign-out link for members
    pub const LOGOUT_LABEL: &'static str = "Logout";
    /// Nav login link for guests
    pub const LOGIN_LABEL: &'static str = "Login";
    /// Nav signup link for guests
    pub const JOIN_LABEL: &'static str = "Join";
    /// Panel title in list view
    pub const LIST_TITLE: &'static str = "Nearby Resources";
    /// Panel subtitle in list view
    pub const LIST_SUBTITLE: &'static str = "Browse all locations below";
    /// Panel title in map view
    pub const MAP_TITLE: &'static str = "Explore the Map";
    /// Panel subtitle in map view
    pub const MAP_SUBTITLE: &'static str = "Use the map to explore locations near you";
    /// List row action focusing the map
    pub const ROW_MAP_LABEL: &'static str = "Map";
    /// Save-your-favorites line under the list for guests
    pub const SIGNIN_CTA: &'static str =
        "Sign in to save your favorite locations and get personalized recommendations.";

    /// Build the browser, opened on the map view
    pub fn build(session: &CurrentSession) -> Self {
        let locations = demo_locations();
        let rows = locations.iter().map(Self::row).collect();

        Self {
            view: LocationsView::default(),
            authenticated: session.is_signed_in,
            welcome: session
                .is_signed_in
                .then(|| format!("Welcome, {}", session.member.username)),
            map: MapModel::for_locations(&locations),
            rows,
            signin_prompt: (!session.is_signed_in).then(SigninPrompt::new),
        }
    }

    fn row(location: &RecoveryLocation) -> LocationRow {
        let mut parts = Vec::new();
        if let Some(city) = &location.city {
            parts.push(city.clone());
        }
        if let Some(status) = location.status {
            parts.push(status.label().to_string());
        }

        LocationRow {
            id: location.id.clone(),
            name: location.name.clone(),
            meta: parts.join(" • "),
            distance: location.distance.clone(),
        }
    }

    /// Panel title for the current view
    pub fn panel_title(&self) -> &'static str {
        match self.view {
            LocationsView::Map => Self::MAP_TITLE,
            LocationsView::List => Self::LIST_TITLE,
        }
    }

    /// Panel subtitle for the current view
    pub fn panel_subtitle(&self) -> &'static str {
        match self.view {
            LocationsView::Map => Self::MAP_SUBTITLE,
            LocationsView::List => Self::LIST_SUBTITLE,
        }
    }

    /// Switch the view mode
    ///
    /// The mapping widget needs to re-measure its container whenever the
    /// mode actually changes, so a change returns a size-invalidation
    /// request.
    pub fn set_view(&mut self, view: LocationsView) -> Option<MapRequest> {
        if self.view == view {
            return None;
        }
        self.view = view;
        Some(MapRequest::InvalidateSize)
    }

    /// Focus a location on the map from its list row
    ///
    /// Switches to the map view first, so the requests come back in apply
    /// order: the size invalidation (when the view changed), then the
    /// focus. An unknown id produces no focus request.
    pub fn focus_location(&mut self, location_id: &str) -> Vec<MapRequest> {
        let mut requests = Vec::new();
        if let Some(request) = self.set_view(LocationsView::Map) {
            requests.push(request);
        }
        if let Some(request) = self.map.focus(location_id) {
            requests.push(request);
        }
        requests
    }

    /// The save-your-favorites line, shown under the list for guests
    pub fn signin_cta(&self) -> Option<&'static str> {
        (self.view == LocationsView::List && !self.authenticated).then_some(Self::SIGNIN_CTA)
    }
}

// =============================================================================
// Circles
// =============================================================================

/// One circle card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircleCard {
    /// Circle name
    pub name: String,
    /// Meta line, e.g. "Daily at 8:00 AM • 12 members"
    pub meta: String,
    /// Membership status pill
    pub badge: String,
    /// Next session line, e.g. "Next: Today, 8:00 AM"
    pub next_session: String,
    /// Host line, e.g. "Host: Alex"
    pub host: String,
    /// Action labels for the member's status
    pub actions: Vec<String>,
}

impl CircleCard {
    fn new(circle: &Circle) -> Self {
        Self {
            name: circle.name.clone(),
            meta: circle.meta(),
            badge: circle.membership.label().to_string(),
            next_session: format!("Next: {}", circle.next_session),
            host: format!("Host: {}", circle.host),
            actions: circle
                .membership
                .actions()
                .iter()
                .map(|action| action.to_string())
                .collect(),
        }
    }
}

/// The support-circles screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CirclesScreen {
    /// Brand header
    pub header: ScreenHeader,
    /// Greeting line, present when a member is signed in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
    /// Circle cards in display order
    pub cards: Vec<CircleCard>,
}

impl CirclesScreen {
    /// Section title
    pub const TITLE: &'static str = "My circles";
    /// Pill next to the section title
    pub const TITLE_PILL: &'static str = "Community";
    /// Section subtitle
    pub const SUBTITLE: &'static str =
        "Stay connected with the people and groups that support your recovery.";
    /// Create-circle button label
    pub const CREATE_LABEL: &'static str = "Create new circle";
    /// Join-with-invite-code button label
    pub const JOIN_LABEL: &'static str = "Join with invite code";

    /// Build the screen over the member's circles
    pub fn build(session: &CurrentSession, circles: &[Circle]) -> Self {
        Self {
            header: brand_header(),
            greeting: session
                .is_signed_in
                .then(|| format!("Hello, {}", session.member.username)),
            cards: circles.iter().map(CircleCard::new).collect(),
        }
    }
}

// =============================================================================
// Personal Log
// =============================================================================

/// The daily check-in form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLogForm {
    /// Entry date as typed, defaults to "Today"
    pub date: String,
    /// Selected mood pill
    pub mood: Mood,
    /// Cravings or triggers field
    pub cravings: String,
    /// Wins field
    pub wins: String,
}

impl Default for DailyLogForm {
    fn default() -> Self {
        Self {
            date: "Today".to_string(),
            mood: Mood::default(),
            cravings: String::new(),
            wins: String::new(),
        }
    }
}

impl DailyLogForm {
    /// Section title
    pub const TITLE: &'static str = "Log today";
    /// Pill next to the section title
    pub const TITLE_PILL: &'static str = "Daily check-in";
    /// Section subtitle
    pub const SUBTITLE: &'static str =
        "Capture how you’re feeling and any triggers, cravings, or wins from today.";
    /// Date field label
    pub const DATE_LABEL: &'static str = "Date";
    /// Mood row label
    pub const MOOD_LABEL: &'static str = "How are you feeling?";
    /// Cravings field label
    pub const CRAVINGS_LABEL: &'static str = "Cravings / triggers";
    /// Cravings field placeholder
    pub const CRAVINGS_PLACEHOLDER: &'static str = "What came up for you today?";
    /// Wins field label
    pub const WINS_LABEL: &'static str = "Wins you want to remember";
    /// Wins field placeholder
    pub const WINS_PLACEHOLDER: &'static str = "Big or small, they all count.";
    /// Submit button label
    pub const SAVE_LABEL: &'static str = "Save entry";
    /// Heading over the week strip
    pub const WEEK_TITLE: &'static str = "This week at a glance";

    /// Mood pills in display order, with the selected one flagged
    pub fn mood_pills(&self) -> Vec<PillOption> {
        Mood::ALL
            .into_iter()
            .map(|mood| PillOption {
                label: mood.pill(),
                selected: mood == self.mood,
            })
            .collect()
    }

    /// The form as a saved entry
    pub fn entry(&self) -> DailyEntry {
        DailyEntry {
            date: self.date.clone(),
            mood: self.mood,
            cravings: self.cravings.clone(),
            wins: self.wins.clone(),
        }
    }
}

/// The milestone form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneForm {
    /// Milestone title field
    pub title: String,
    /// Date field
    pub date: String,
    /// Notes field
    pub notes: String,
}

impl MilestoneForm {
    /// Section title
    pub const TITLE: &'static str = "Milestones";
    /// Pill next to the section title
    pub const TITLE_PILL: &'static str = "Progress";
    /// Section subtitle
    pub const SUBTITLE: &'static str =
        "Save key sobriety milestones so you can look back on how far you’ve come.";
    /// Title field label
    pub const TITLE_LABEL: &'static str = "Milestone title";
    /// Title field placeholder
    pub const TITLE_PLACEHOLDER: &'static str =
        "e.g., 30 days sober, 1 year, first sober holiday";
    /// Date field label
    pub const DATE_LABEL: &'static str = "Date";
    /// Notes field label
    pub const NOTES_LABEL: &'static str = "Notes (optional)";
    /// Notes field placeholder
    pub const NOTES_PLACEHOLDER: &'static str = "What does this milestone mean to you?";
    /// Submit button label
    pub const SAVE_LABEL: &'static str = "Save milestone";

    /// The form as a saved entry
    pub fn entry(&self) -> Milestone {
        Milestone {
            title: self.title.clone(),
            date: self.date.clone(),
            notes: optional(&self.notes),
        }
    }
}

/// The goal form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalForm {
    /// Goal field
    pub title: String,
    /// Target date field
    pub target_date: String,
    /// Why-this-matters field
    pub why: String,
    /// Selected reminder cadence
    pub cadence: Option<ReminderCadence>,
}

impl GoalForm {
    /// Section title
    pub const TITLE: &'static str = "Goals";
    /// Pill next to the section title
    pub const TITLE_PILL: &'static str = "Intentions";
    /// Section subtitle
    pub const SUBTITLE: &'static str =
        "Set clear goals for your recovery so Circely can help you stay on track.";
    /// Goal field label
    pub const GOAL_LABEL: &'static str = "Goal";
    /// Goal field placeholder
    pub const GOAL_PLACEHOLDER: &'static str = "e.g., Go to 3 meetings this week";
    /// Target date field label
    pub const TARGET_DATE_LABEL: &'static str = "Target date (optional)";
    /// Why field label
    pub const WHY_LABEL: &'static str = "Why this matters (optional)";
    /// Why field placeholder
    pub const WHY_PLACEHOLDER: &'static str = "How will this goal support your recovery?";
    /// Cadence row label
    pub const CADENCE_LABEL: &'static str = "How often should we remind you?";
    /// Submit button label
    pub const SAVE_LABEL: &'static str = "Save goal";

    /// Cadence pills in display order, with the selected one flagged
    pub fn cadence_pills(&self) -> Vec<PillOption> {
        ReminderCadence::ALL
            .into_iter()
            .map(|cadence| PillOption {
                label: cadence.label().to_string(),
                selected: self.cadence == Some(cadence),
            })
            .collect()
    }

    /// The form as a saved entry
    pub fn entry(&self) -> Goal {
        Goal {
            title: self.title.clone(),
            target_date: optional(&self.target_date),
            why: optional(&self.why),
            cadence: self.cadence,
        }
    }
}

/// The trigger form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerForm {
    /// Trigger kind, the first pill to start
    pub kind: TriggerKind,
    /// Trigger name field
    pub name: String,
    /// Details field
    pub details: String,
    /// Location field
    pub location: String,
    /// Notify when entering the location
    pub notify_on_location: bool,
    /// Remind the next time the event occurs
    pub remind_on_event: bool,
    /// Send a morning awareness reminder
    pub morning_reminder: bool,
    /// Event date field
    pub event_date: String,
}

impl Default for TriggerForm {
    fn default() -> Self {
        Self {
            kind: TriggerKind::Person,
            name: String::new(),
            details: String::new(),
            location: String::new(),
            notify_on_location: false,
            remind_on_event: false,
            morning_reminder: false,
            event_date: String::new(),
        }
    }
}

impl TriggerForm {
    /// Section title
    pub const TITLE: &'static str = "Log a Trigger";
    /// Pill next to the section title
    pub const TITLE_PILL: &'static str = "Awareness";
    /// Section subtitle
    pub const SUBTITLE: &'static str = "Identify the people, places, things, or dates that \
         increase your risk. We’ll help remind you next time.";
    /// Kind row label
    pub const KIND_LABEL: &'static str = "Trigger type";
    /// Name field label
    pub const NAME_LABEL: &'static str = "What is the trigger?";
    /// Name field placeholder
    pub const NAME_PLACEHOLDER: &'static str = "e.g., Sports game, Cousin Mike, Liquor aisle";
    /// Details field label
    pub const DETAILS_LABEL: &'static str = "Details (optional)";
    /// Details field placeholder
    pub const DETAILS_PLACEHOLDER: &'static str =
        "Describe why this is a trigger or what usually happens.";
    /// Location field label
    pub const LOCATION_LABEL: &'static str = "Location (optional)";
    /// Location field placeholder
    pub const LOCATION_PLACEHOLDER: &'static str = "e.g., Prudential Center, home, bar on Main St";
    /// Heading over the reminder checkboxes
    pub const REMINDERS_TITLE: &'static str = "Reminder settings";
    /// Line under the reminders heading
    pub const REMINDERS_SUBTITLE: &'static str =
        "Choose how proactive you want Circely to be around this trigger.";
    /// Location-notification checkbox label
    pub const NOTIFY_LOCATION_LABEL: &'static str = "Notify me when I enter this location";
    /// Event-reminder checkbox label
    pub const REMIND_EVENT_LABEL: &'static str =
        "Send a reminder the next time this event occurs";
    /// Morning-reminder checkbox label
    pub const MORNING_LABEL: &'static str = "Send a morning awareness reminder";
    /// Event date field label
    pub const EVENT_DATE_LABEL: &'static str = "Event date (optional)";
    /// Submit button label
    pub const SAVE_LABEL: &'static str = "Save trigger";

    /// Kind pills in display order, with the selected one flagged
    pub fn kind_pills(&self) -> Vec<PillOption> {
        TriggerKind::ALL
            .into_iter()
            .map(|kind| PillOption {
                label: kind.label().to_string(),
                selected: kind == self.kind,
            })
            .collect()
    }

    /// The form as a saved entry
    pub fn entry(&self) -> TriggerEntry {
        TriggerEntry {
            kind: self.kind,
            name: self.name.clone(),
            details: optional(&self.details),
            location: optional(&self.location),
            notify_on_location: self.notify_on_location,
            remind_on_event: self.remind_on_event,
            morning_reminder: self.morning_reminder,
            event_date: optional(&self.event_date),
        }
    }
}

/// The personal log screen with its four sub-views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogScreen {
    /// Active sub-view, taken from the route
    pub view: LogView,
    /// Daily check-in form
    pub daily: DailyLogForm,
    /// Milestone form
    pub milestone: MilestoneForm,
    /// Goal form
    pub goal: GoalForm,
    /// Trigger form
    pub trigger: TriggerForm,
    /// Week-at-a-glance strip under the daily form
    pub week: Vec<GlanceDay>,
}

impl LogScreen {
    /// Back link on the milestone, goal, and trigger views
    pub const BACK_LABEL: &'static str = "← Back";

    /// A fresh log screen opened on a sub-view
    pub fn new(view: LogView) -> Self {
        Self {
            view,
            daily: DailyLogForm::default(),
            milestone: MilestoneForm::default(),
            goal: GoalForm::default(),
            trigger: TriggerForm::default(),
            week: week_at_a_glance(),
        }
    }

    /// Header for this screen
    pub fn header(&self) -> ScreenHeader {
        brand_header()
    }

    /// Path of the back link, the daily view
    pub fn back_target() -> String {
        Route::Log {
            view: LogView::Daily,
        }
        .to_path()
    }

    /// The active form as a saved entry
    pub fn save(&self) -> LogEntry {
        match self.view {
            LogView::Daily => LogEntry::Daily(self.daily.entry()),
            LogView::Milestone => LogEntry::Milestone(self.milestone.entry()),
            LogView::Goal => LogEntry::Goal(self.goal.entry()),
            LogView::Trigger => LogEntry::Trigger(self.trigger.entry()),
        }
    }
}

// =============================================================================
// Check-In
// =============================================================================

/// One venue row on the check-in screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueRow {
    /// Venue id
    pub id: String,
    /// Venue name
    pub name: String,
    /// Meta line, e.g. "Treatment Center · 123 Ocean View Rd"
    pub meta: String,
    /// Distance badge
    pub distance: String,
    /// Row action label, "Select" or "Selected"
    pub action: String,
}

/// The location check-in screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInScreen {
    /// Search field, filters the venue list live
    pub query: String,
    /// Venue catalog
    pub venues: Vec<RecoveryLocation>,
    /// Id of the selected venue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
    /// Let the member's circle know about the check-in
    pub notify_circle: bool,
    /// Optional note to the circle
    pub note: String,
}

impl CheckInScreen {
    /// Header eyebrow
    pub const EYEBROW: &'static str = "Circely";
    /// Header title
    pub const TITLE: &'static str = "Check-In";
    /// Header tagline
    pub const TAGLINE: &'static str = "Showing up for your recovery.";
    /// Section title
    pub const SECTION_TITLE: &'static str = "Choose a place";
    /// Pill next to the section title
    pub const SECTION_PILL: &'static str = "Today";
    /// Section subtitle
    pub const SUBTITLE: &'static str = "Check in to a treatment center, sober living house, \
         or meeting. Your circle can be notified when you show up.";
    /// Search field placeholder
    pub const SEARCH_PLACEHOLDER: &'static str = "Search by name, type, or address...";
    /// Search button label
    pub const SEARCH_LABEL: &'static str = "Search";
    /// Geolocation quick action label
    pub const USE_LOCATION_LABEL: &'static str = "Use my location";
    /// Recent-places quick action label
    pub const RECENT_LABEL: &'static str = "Recent places";
    /// Row action for an unselected venue
    pub const SELECT_LABEL: &'static str = "Select";
    /// Row action for the selected venue
    pub const SELECTED_LABEL: &'static str = "Selected";
    /// Confirmation card title
    pub const CONFIRM_TITLE: &'static str = "Confirm check-in";
    /// Note field label
    pub const NOTE_LABEL: &'static str = "Optional note to your circle";
    /// Note field placeholder
    pub const NOTE_PLACEHOLDER: &'static str =
        "Add a short note (e.g., 'First day of IOP', 'Back at the noon meeting').";
    /// Heading over the notify checkbox
    pub const NOTIFY_TITLE: &'static str = "Circle notification";
    /// Notify checkbox label
    pub const NOTIFY_LABEL: &'static str = "Let my circle know that I checked in here";
    /// Confirm button label
    pub const CONFIRM_LABEL: &'static str = "Confirm Check-In";

    /// A fresh check-in screen over the demo venue catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Header for this screen
    pub fn header(&self) -> ScreenHeader {
        ScreenHeader::new(Self::EYEBROW, Self::TITLE).with_tagline(Self::TAGLINE)
    }

    /// Venues matching the current query
    pub fn results(&self) -> Vec<RecoveryLocation> {
        filter_venues(&self.venues, &self.query)
    }

    /// Rendered rows for the venues matching the current query
    pub fn rows(&self) -> Vec<VenueRow> {
        self.results()
            .iter()
            .map(|venue| {
                let mut parts = Vec::new();
                if let Some(category) = &venue.category {
                    parts.push(category.clone());
                }
                if let Some(address) = &venue.address {
                    parts.push(address.clone());
                }

                let action = if self.selected.as_deref() == Some(venue.id.as_str()) {
                    Self::SELECTED_LABEL
                } else {
                    Self::SELECT_LABEL
                };

                VenueRow {
                    id: venue.id.clone(),
                    name: venue.name.clone(),
                    meta: parts.join(" · "),
                    distance: venue.distance.clone(),
                    action: action.to_string(),
                }
            })
            .collect()
    }

    /// Select a venue from the catalog
    ///
    /// Unknown ids leave the selection unchanged.
    pub fn select(&mut self, location_id: &str) {
        if self.venues.iter().any(|venue| venue.id == location_id) {
            self.selected = Some(location_id.to_string());
        }
    }

    /// The recent-places quick action, which resets the filter
    pub fn show_recent(&mut self) {
        self.query.clear();
    }

    /// The selected venue, if any
    pub fn selected_venue(&self) -> Option<&RecoveryLocation> {
        let selected = self.selected.as_deref()?;
        self.venues.iter().find(|venue| venue.id == selected)
    }

    /// Confirmation prompt for the selected venue
    pub fn confirmation(&self) -> Option<String> {
        self.selected_venue().map(|venue| {
            format!(
                "You’re about to check in to {}. This can help you track your journey \
                 and keep your circle in the loop.",
                venue.name
            )
        })
    }

    /// The confirm action's payload, once a venue is selected
    pub fn request(&self) -> Option<CheckInRequest> {
        let venue = self.selected_venue()?;
        Some(CheckInRequest {
            location_id: venue.id.clone(),
            notify_circle: self.notify_circle,
            note: self.note.clone(),
        })
    }
}

impl Default for CheckInScreen {
    fn default() -> Self {
        Self {
            query: String::new(),
            venues: demo_venues(),
            selected: None,
            notify_circle: true,
            note: String::new(),
        }
    }
}

// =============================================================================
// Account
// =============================================================================

/// One profile row on the account screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRow {
    /// Row label
    pub label: String,
    /// Row value
    pub value: String,
}

/// The password-change modal's fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordForm {
    /// Current password field
    pub old_password: String,
    /// New password field
    pub new_password: String,
    /// Confirmation field
    pub confirm_password: String,
}

/// The account profile screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountScreen {
    /// Member's display username
    pub username: String,
    /// Member's email address
    pub email: String,
    /// Member's join date
    pub date_joined: String,
    /// Whether the password modal is showing
    pub modal_open: bool,
    /// Password modal fields
    pub form: PasswordForm,
    /// Status banner inside the modal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FormStatus>,
}

impl AccountScreen {
    /// Header eyebrow
    pub const EYEBROW: &'static str = "My Profile";
    /// Header title
    pub const TITLE: &'static str = "Account";
    /// Username row label
    pub const USERNAME_LABEL: &'static str = "Username";
    /// Email row label
    pub const EMAIL_LABEL: &'static str = "Email";
    /// Join date row label
    pub const MEMBER_SINCE_LABEL: &'static str = "Member Since";
    /// Button opening the password modal
    pub const RESET_LABEL: &'static str = "Reset Password";
    /// Sign-out link
    pub const LOGOUT_LABEL: &'static str = "Logout";
    /// Password modal title
    pub const MODAL_TITLE: &'static str = "Reset Password";
    /// Current password field label
    pub const OLD_PASSWORD_LABEL: &'static str = "Current Password";
    /// New password field label
    pub const NEW_PASSWORD_LABEL: &'static str = "New Password";
    /// Confirmation field label
    pub const CONFIRM_PASSWORD_LABEL: &'static str = "Confirm New Password";
    /// Modal submit button label
    pub const UPDATE_LABEL: &'static str = "Update";
    /// Modal cancel button label
    pub const CANCEL_LABEL: &'static str = "Cancel";

    /// Build the screen from the current session
    pub fn build(session: &CurrentSession) -> Self {
        Self {
            username: session.member.username.clone(),
            email: session.member.email.clone(),
            date_joined: session.member.date_joined.clone(),
            modal_open: false,
            form: PasswordForm::default(),
            status: None,
        }
    }

    /// Header for this screen
    pub fn header(&self) -> ScreenHeader {
        ScreenHeader::new(Self::EYEBROW, Self::TITLE)
    }

    /// Path of the logout link
    pub fn logout_target() -> String {
        Route::Logout.to_path()
    }

    /// Profile rows in display order
    pub fn rows(&self) -> [ProfileRow; 3] {
        [
            ProfileRow {
                label: Self::USERNAME_LABEL.to_string(),
                value: self.username.clone(),
            },
            ProfileRow {
                label: Self::EMAIL_LABEL.to_string(),
                value: self.email.clone(),
            },
            ProfileRow {
                label: Self::MEMBER_SINCE_LABEL.to_string(),
                value: self.date_joined.clone(),
            },
        ]
    }

    /// Open the password modal
    pub fn open_modal(&mut self) {
        self.modal_open = true;
    }

    /// Close the password modal, discarding its fields and status
    pub fn close_modal(&mut self) {
        self.modal_open = false;
        self.form = PasswordForm::default();
        self.status = None;
    }

    /// Show the success banner and clear the fields for the next change
    pub fn apply_success(&mut self) {
        self.status = Some(FormStatus::success(app_core::account::PASSWORD_UPDATED));
        self.form = PasswordForm::default();
    }

    /// Show an error banner, keeping the fields for correction
    pub fn apply_error(&mut self, message: impl Into<String>) {
        self.status = Some(FormStatus::error(message));
    }
}

// =============================================================================
// Admin
// =============================================================================

/// The administrative portal screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminScreen {
    /// Header
    pub header: ScreenHeader,
    /// Welcome line, present when a member is signed in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
}

impl AdminScreen {
    /// Header eyebrow
    pub const EYEBROW: &'static str = "Administration";
    /// Header title
    pub const TITLE: &'static str = "Admin Portal";
    /// Dashboard card title
    pub const CARD_TITLE: &'static str = "Admin Dashboard";
    /// Dashboard card body
    pub const CARD_BODY: &'static str = "This is the administrative portal for Circley. \
         Use this area to manage users, moderate content, and configure system settings.";

    /// Build the screen from the current session
    pub fn build(session: &CurrentSession) -> Self {
        Self {
            header: ScreenHeader::new(Self::EYEBROW, Self::TITLE),
            greeting: session
                .is_signed_in
                .then(|| format!("Welcome, {}", session.member.username)),
        }
    }
}

// =============================================================================
// Placeholders
// =============================================================================

/// A titled placeholder with a back-home action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderScreen {
    /// Header
    pub header: ScreenHeader,
    /// Body copy
    pub description: String,
}

impl PlaceholderScreen {
    /// Header eyebrow shared by all placeholders
    pub const EYEBROW: &'static str = "Circley";
    /// Back-home link label
    pub const HOME_LABEL: &'static str = "Back to Home";

    /// A placeholder with a title and body copy
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            header: ScreenHeader::new(Self::EYEBROW, title),
            description: description.into(),
        }
    }

    /// Path of the back-home link
    pub fn home_target() -> String {
        Route::Home.to_path()
    }

    /// The rating placeholder
    pub fn rate() -> Self {
        Self::new("Rate", "Rating and feedback tools are coming soon.")
    }

    /// The verification placeholder
    pub fn verify() -> Self {
        Self::new(
            "Verify",
            "User verification tools will live here. For now, return home to keep exploring.",
        )
    }

    /// The post-sign-out placeholder
    pub fn logged_out() -> Self {
        Self::new(
            "Logged Out",
            "You have been signed out of this demo experience.",
        )
    }

    /// The unknown-path placeholder
    pub fn not_found() -> Self {
        Self::new(
            "Not Found",
            "We couldn't find that page. Try heading back home to continue exploring Circley.",
        )
    }
}

// =============================================================================
// Update Detail
// =============================================================================

/// Detail view for one home update card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDetailScreen {
    /// Header, titled after the card
    pub header: ScreenHeader,
    /// The card being shown
    pub card: UpdateCard,
}

impl UpdateDetailScreen {
    /// Header eyebrow
    pub const EYEBROW: &'static str = "Circley";
    /// Back-home link label
    pub const HOME_LABEL: &'static str = "Back to Home";

    /// Look up a card by its route parameter
    ///
    /// `None` means the id matches no card and the caller should fall back
    /// to the not-found placeholder.
    pub fn build(id: &str) -> Option<Self> {
        find_update(id).map(|card| Self {
            header: ScreenHeader::new(Self::EYEBROW, card.title.clone()),
            card,
        })
    }
}
