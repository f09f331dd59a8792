//! # Day Roster
//!
//! Splits the children list for one date into children who are expected
//! that weekday and children who are not expected but have data anyway.
//! Children with data are listed by default; expected children without
//! data are only listed once `show_all` is set.
//!
//! Hiding a child is view state only: the entry stays untouched and the
//! card comes back with its data when un-hidden.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    models::{child::Child, entry::TimeEntry},
    presence::DayCard,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterCard {
    #[serde(flatten)]
    pub card: DayCard,
    pub has_data: bool,
}

#[derive(Debug, Clone)]
pub struct DayRoster {
    pub date: NaiveDate,
    cards: Vec<RosterCard>,
    show_all: bool,
    hidden: HashSet<String>,
}

impl DayRoster {
    /// Classifies `children` for `date`; `entries` may span other dates.
    pub fn build(date: NaiveDate, children: &[Child], entries: &[TimeEntry]) -> Self {
        let cards = children
            .iter()
            .filter_map(|child| {
                let entry = entries.iter().find(|e| e.matches(&child.id, date));
                let has_data = entry.is_some_and(TimeEntry::has_data);
                if !child.is_expected_on(date) && !has_data {
                    return None;
                }
                Some(RosterCard {
                    card: DayCard::build(child, date, entry),
                    has_data,
                })
            })
            .collect();

        Self {
            date,
            cards,
            show_all: false,
            hidden: HashSet::new(),
        }
    }

    pub fn with_show_all(mut self, show_all: bool) -> Self {
        self.show_all = show_all;
        self
    }

    pub fn with_hidden<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn set_show_all(&mut self, show_all: bool) {
        self.show_all = show_all;
    }

    pub fn hide(&mut self, child_id: &str) {
        self.hidden.insert(child_id.to_string());
    }

    pub fn unhide(&mut self, child_id: &str) -> bool {
        self.hidden.remove(child_id)
    }

    pub fn is_hidden(&self, child_id: &str) -> bool {
        self.hidden.contains(child_id)
    }

    pub fn expected(&self) -> impl Iterator<Item = &RosterCard> {
        self.cards.iter().filter(|c| c.card.expected)
    }

    /// Not scheduled today, yet something was recorded.
    pub fn unexpected(&self) -> impl Iterator<Item = &RosterCard> {
        self.cards.iter().filter(|c| !c.card.expected)
    }

    pub fn visible(&self) -> Vec<&RosterCard> {
        self.cards
            .iter()
            .filter(|c| !self.is_hidden(&c.card.child_id))
            .filter(|c| c.has_data || self.show_all)
            .collect()
    }

    /// Expected children with no data that `show_all` would reveal.
    pub fn revealable(&self) -> usize {
        if self.show_all {
            return 0;
        }
        self.cards
            .iter()
            .filter(|c| !c.has_data && !self.is_hidden(&c.card.child_id))
            .count()
    }

    pub fn hidden_cards(&self) -> Vec<&RosterCard> {
        self.cards
            .iter()
            .filter(|c| self.is_hidden(&c.card.child_id))
            .collect()
    }

    pub fn view(&self) -> RosterView {
        RosterView {
            date: self.date,
            show_all: self.show_all,
            cards: self.visible().into_iter().cloned().collect(),
            hidden: self
                .hidden_cards()
                .into_iter()
                .map(|c| c.card.child_id.clone())
                .collect(),
            revealable: self.revealable(),
        }
    }
}

/// Serializable snapshot of a roster as the API returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterView {
    pub date: NaiveDate,
    pub show_all: bool,
    pub cards: Vec<RosterCard>,
    pub hidden: Vec<String>,
    pub revealable: usize,
}
