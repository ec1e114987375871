use std::sync::Arc;

use rand::seq::SliceRandom;
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::backend::{Backend, LocalBackend};
use super::cache::SessionCache;
use super::gate::{SessionEvent, SessionState};
use crate::error::AppError;
use crate::recipes::dto::{Recipe, TodayRecipe};
use crate::recipes::matcher::ANY_DAY;
use crate::schedule;
use crate::state::AppState;
use crate::users::dto::{PreferencesForm, PublicUser};

/// Week as the day stepper cycles it.
pub const DAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Shown in place of an answer when the assistant call fails. The question
/// stays in the transcript.
const APOLOGY: &str = "Sorry, I couldn't process that request. Please try again later.";

/// Meal tabs in display order. `Snack` is only ever user-picked; the clock
/// resolves to one of the other three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealTab {
    Breakfast,
    Lunch,
    Snack,
    Dinner,
}

impl MealTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealTab::Breakfast => "breakfast",
            MealTab::Lunch => "lunch",
            MealTab::Snack => "snack",
            MealTab::Dinner => "dinner",
        }
    }

    pub fn parse(value: &str) -> Option<MealTab> {
        match value.to_ascii_lowercase().as_str() {
            "breakfast" => Some(MealTab::Breakfast),
            "lunch" => Some(MealTab::Lunch),
            "snack" => Some(MealTab::Snack),
            "dinner" => Some(MealTab::Dinner),
            _ => None,
        }
    }
}

/// One message in the assistant transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub id: Uuid,
    pub content: String,
    pub is_user: bool,
}

impl ChatTurn {
    fn user(content: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.to_string(),
            is_user: true,
        }
    }

    fn assistant(content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            is_user: false,
        }
    }
}

/// Claim for an in-flight alternates fetch. The result only applies while
/// its sequence number is still the newest one issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub day: String,
    pub meal_time: String,
    seq: u64,
}

/// What a tab activation needs next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPlan {
    /// The current day is not resolved yet; nothing to fetch.
    NotReady,
    /// Served from the session cache; the tab is already applied.
    Cached,
    /// Caller runs the fetch and hands the outcome to `finish_load`.
    Fetch(FetchTicket),
}

/// Driver for one user's session: the sign-in/onboarding gate, the day and
/// meal-tab browsing state, per-session memoization and the assistant
/// transcript. Fetches are split into `begin_load`/`finish_load` so a
/// result that lands after the user has moved on is discarded instead of
/// overwriting the newer tab.
pub struct SessionController {
    backend: Arc<dyn Backend>,
    gate: SessionState,
    cache: SessionCache,
    user: Option<PublicUser>,
    current_day: Option<String>,
    selected_tab: MealTab,
    recipes: Vec<Recipe>,
    selected: Option<Recipe>,
    chat: Vec<ChatTurn>,
    fetch_seq: u64,
}

impl SessionController {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            gate: SessionState::Unauthenticated,
            cache: SessionCache::new(),
            user: None,
            current_day: None,
            selected_tab: MealTab::Breakfast,
            recipes: Vec::new(),
            selected: None,
            chat: Vec::new(),
            fetch_seq: 0,
        }
    }

    /// Session over the in-process backend.
    pub fn local(state: AppState) -> Self {
        Self::new(Arc::new(LocalBackend::new(state)))
    }

    pub fn state(&self) -> SessionState {
        self.gate
    }

    pub fn user(&self) -> Option<&PublicUser> {
        self.user.as_ref()
    }

    pub fn current_day(&self) -> Option<&str> {
        self.current_day.as_deref()
    }

    pub fn selected_tab(&self) -> MealTab {
        self.selected_tab
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn selected(&self) -> Option<&Recipe> {
        self.selected.as_ref()
    }

    pub fn chat(&self) -> &[ChatTurn] {
        &self.chat
    }

    /// Replay a persisted token on startup. A token that no longer
    /// verifies leaves the session signed out instead of failing.
    pub async fn restore(&mut self, token: Option<&str>) -> Result<SessionState, AppError> {
        let Some(token) = token else {
            return Ok(self.gate);
        };
        match self.sign_in(token).await {
            Ok(state) => Ok(state),
            Err(AppError::MissingIdentity) => {
                debug!("persisted token no longer verifies");
                Ok(self.gate)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn sign_in(&mut self, token: &str) -> Result<SessionState, AppError> {
        let response = self.backend.sign_in(token).await?;
        info!(uid = %response.user.uid, "session signed in");
        self.user = Some(response.user);
        self.gate = self.gate.apply(SessionEvent::SignedIn {
            needs_onboarding: response.needs_onboarding,
        });
        Ok(self.gate)
    }

    /// Drop everything the signed-in user accumulated. The fetch sequence
    /// keeps counting so results still in flight can never apply.
    pub fn sign_out(&mut self) {
        self.gate = self.gate.apply(SessionEvent::SignedOut);
        self.user = None;
        self.cache.clear();
        self.current_day = None;
        self.selected_tab = MealTab::Breakfast;
        self.recipes.clear();
        self.selected = None;
        self.chat.clear();
        self.fetch_seq += 1;
    }

    pub async fn complete_onboarding(
        &mut self,
        form: &PreferencesForm,
    ) -> Result<SessionState, AppError> {
        let uid = match &self.user {
            Some(user) => user.uid.clone(),
            None => return Err(AppError::MissingIdentity),
        };
        self.backend.save_preferences(&uid, form).await?;
        self.gate = self.gate.apply(SessionEvent::OnboardingCompleted);
        Ok(self.gate)
    }

    /// Resolve the current day and meal slot, memoized per IST calendar
    /// date. When nothing is scheduled right now the day stays unresolved
    /// and tab loads report `NotReady`.
    pub async fn load_today(&mut self, now: OffsetDateTime) -> Result<(), AppError> {
        if self.gate != SessionState::Ready {
            return Ok(());
        }
        let date = schedule::today(now);
        if let Some(cached) = self.cache.today(date) {
            let cached = cached.clone();
            self.apply_today(cached);
            return Ok(());
        }

        let today = self.backend.today_recipe(now).await?;
        self.cache.put_today(date, today.clone());
        self.apply_today(today);
        Ok(())
    }

    fn apply_today(&mut self, today: Option<TodayRecipe>) {
        let Some(today) = today else { return };
        self.current_day = Some(today.current_day);
        if let Some(tab) = MealTab::parse(&today.current_meal_time) {
            self.selected_tab = tab;
        }
    }

    /// Activate a tab. Every activation supersedes whatever fetch was in
    /// flight, whether it resolves from the cache or asks for a new fetch.
    /// Snack tabs always query the day-independent collection.
    pub fn begin_load(&mut self, tab: MealTab) -> LoadPlan {
        self.selected_tab = tab;
        let Some(current_day) = self.current_day.clone() else {
            return LoadPlan::NotReady;
        };
        self.fetch_seq += 1;

        let day = if tab == MealTab::Snack {
            ANY_DAY.to_string()
        } else {
            current_day
        };
        let meal_time = tab.as_str().to_string();

        if let Some(hit) = self.cache.alternates(&day, &meal_time) {
            let recipes = hit.clone();
            self.apply_recipes(recipes);
            return LoadPlan::Cached;
        }

        LoadPlan::Fetch(FetchTicket {
            day,
            meal_time,
            seq: self.fetch_seq,
        })
    }

    /// Apply a fetch outcome. Returns false when the ticket was superseded;
    /// a late error from a superseded fetch is swallowed with it.
    pub fn finish_load(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<Vec<Recipe>, AppError>,
    ) -> Result<bool, AppError> {
        if ticket.seq != self.fetch_seq {
            debug!(
                day = %ticket.day,
                meal_time = %ticket.meal_time,
                "discarding superseded fetch result"
            );
            return Ok(false);
        }
        let recipes = outcome?;
        self.cache
            .put_alternates(&ticket.day, &ticket.meal_time, recipes.clone());
        self.apply_recipes(recipes);
        Ok(true)
    }

    /// `begin_load` and `finish_load` in one sequential step, for drivers
    /// without concurrent fetches. Returns whether the tab was applied.
    pub async fn load_tab(&mut self, tab: MealTab) -> Result<bool, AppError> {
        match self.begin_load(tab) {
            LoadPlan::NotReady => Ok(false),
            LoadPlan::Cached => Ok(true),
            LoadPlan::Fetch(ticket) => {
                let outcome = self.backend.alternates(&ticket.day, &ticket.meal_time).await;
                self.finish_load(&ticket, outcome)
            }
        }
    }

    fn apply_recipes(&mut self, recipes: Vec<Recipe>) {
        self.selected = if self.selected_tab == MealTab::Snack {
            recipes.choose(&mut rand::thread_rng()).cloned()
        } else {
            recipes.first().cloned()
        };
        self.recipes = recipes;
    }

    /// Pick one of the loaded alternates by id. Unknown ids leave the
    /// selection alone.
    pub fn select_recipe(&mut self, id: &str) -> bool {
        if let Some(recipe) = self.recipes.iter().find(|r| r.id.as_deref() == Some(id)) {
            self.selected = Some(recipe.clone());
            true
        } else {
            false
        }
    }

    /// Step the browsed day forward or backward, wrapping around the week.
    /// The caller follows up with a tab load for the new day.
    pub fn step_day(&mut self, delta: i32) -> Option<&str> {
        let day = self.current_day.as_deref()?;
        let idx = DAYS.iter().position(|d| d.eq_ignore_ascii_case(day))? as i32;
        let next = DAYS[(idx + delta).rem_euclid(7) as usize];
        self.current_day = Some(next.to_string());
        self.current_day.as_deref()
    }

    /// Ask the assistant about the selected recipe. Blank questions and
    /// questions with no recipe selected are ignored. A failed call still
    /// records the question, answered with an apology.
    pub async fn ask(&mut self, question: &str) -> Option<&ChatTurn> {
        if question.trim().is_empty() {
            return None;
        }
        let recipe = self.selected.clone()?;

        self.chat.push(ChatTurn::user(question));
        let reply = match self.backend.ask(&recipe, question).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "assistant request failed");
                APOLOGY.to_string()
            }
        };
        self.chat.push(ChatTurn::assistant(reply));
        self.chat.last()
    }
}
