use std::collections::HashMap;

use time::Date;

use crate::recipes::dto::{Recipe, TodayRecipe};

/// Per-session memo of backend lookups, keyed by the parameters of the
/// operation that filled it. Empty results are memoized too: a day with no
/// recipe stays settled without refetching. Cleared in full on sign-out.
#[derive(Debug, Default)]
pub struct SessionCache {
    today: Option<(Date, Option<TodayRecipe>)>,
    alternates: HashMap<(String, String), Vec<Recipe>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoized today-lookup for an IST calendar date. The outer `Option`
    /// is hit-or-miss; the inner one is the memoized response.
    pub fn today(&self, date: Date) -> Option<&Option<TodayRecipe>> {
        match &self.today {
            Some((cached, value)) if *cached == date => Some(value),
            _ => None,
        }
    }

    pub fn put_today(&mut self, date: Date, value: Option<TodayRecipe>) {
        self.today = Some((date, value));
    }

    fn key(day: &str, meal_time: &str) -> (String, String) {
        (day.to_lowercase(), meal_time.to_lowercase())
    }

    pub fn alternates(&self, day: &str, meal_time: &str) -> Option<&Vec<Recipe>> {
        self.alternates.get(&Self::key(day, meal_time))
    }

    pub fn put_alternates(&mut self, day: &str, meal_time: &str, recipes: Vec<Recipe>) {
        self.alternates.insert(Self::key(day, meal_time), recipes);
    }

    pub fn clear(&mut self) {
        self.today = None;
        self.alternates.clear();
    }
}
