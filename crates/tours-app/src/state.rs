// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::OffsetDateTime;

use crate::{ToggleLabel, TourCard, TourId, TourRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub load: LoadState,
    pub cards: Vec<TourCard>,
    pub selected: usize,
    pub request_id: u64,
    pub loaded_at: Option<OffsetDateTime>,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            load: LoadState::Loading,
            cards: Vec::new(),
            selected: 0,
            request_id: 0,
            loaded_at: None,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    BeginLoad,
    LoadFinished {
        request_id: u64,
        tours: Vec<TourRecord>,
        fetched_at: OffsetDateTime,
    },
    LoadFailed {
        request_id: u64,
        error: String,
    },
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
    Toggle(TourId),
    ToggleSelected,
    Remove(TourId),
    RemoveSelected,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    LoadStarted { request_id: u64 },
    ToursLoaded { count: usize },
    LoadFailed(String),
    SelectionChanged(usize),
    TextToggled { id: TourId, label: ToggleLabel },
    TourRemoved { id: TourId, remaining: usize },
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn is_loading(&self) -> bool {
        self.load == LoadState::Loading
    }

    pub fn selected_card(&self) -> Option<&TourCard> {
        self.cards.get(self.selected)
    }

    pub fn tours(&self) -> impl Iterator<Item = &TourRecord> {
        self.cards.iter().map(|card| &card.record)
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::BeginLoad => {
                self.request_id = self.request_id.saturating_add(1);
                self.load = LoadState::Loading;
                self.cards.clear();
                self.selected = 0;
                vec![AppEvent::LoadStarted {
                    request_id: self.request_id,
                }]
            }
            AppCommand::LoadFinished {
                request_id,
                tours,
                fetched_at,
            } => {
                if !self.accepts(request_id) {
                    return Vec::new();
                }
                self.cards = tours.into_iter().map(TourCard::new).collect();
                self.selected = 0;
                self.load = LoadState::Ready;
                self.loaded_at = Some(fetched_at);
                let count = self.cards.len();
                vec![
                    AppEvent::ToursLoaded { count },
                    self.set_status(&format!("loaded {count} {}", plural_tours(count))),
                ]
            }
            AppCommand::LoadFailed { request_id, error } => {
                if !self.accepts(request_id) {
                    return Vec::new();
                }
                self.load = LoadState::Failed(error.clone());
                vec![
                    AppEvent::LoadFailed(error),
                    self.set_status("load failed; press r to retry"),
                ]
            }
            AppCommand::SelectNext => self.move_selection(1),
            AppCommand::SelectPrev => self.move_selection(-1),
            AppCommand::SelectFirst => self.select(0),
            AppCommand::SelectLast => self.select(self.cards.len().saturating_sub(1)),
            AppCommand::Toggle(id) => match self.position_of(&id) {
                Some(index) => self.toggle_at(index),
                None => Vec::new(),
            },
            AppCommand::ToggleSelected => self.toggle_at(self.selected),
            AppCommand::Remove(id) => self.remove(&id),
            AppCommand::RemoveSelected => match self.selected_card() {
                Some(card) => {
                    let id = card.record.id.clone();
                    self.remove(&id)
                }
                None => Vec::new(),
            },
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn accepts(&self, request_id: u64) -> bool {
        request_id == self.request_id && self.is_loading()
    }

    fn position_of(&self, id: &TourId) -> Option<usize> {
        self.cards.iter().position(|card| &card.record.id == id)
    }

    fn move_selection(&mut self, delta: isize) -> Vec<AppEvent> {
        if self.cards.is_empty() {
            return Vec::new();
        }
        let last = self.cards.len() - 1;
        let next = self.selected.saturating_add_signed(delta).min(last);
        self.select(next)
    }

    fn select(&mut self, index: usize) -> Vec<AppEvent> {
        if self.cards.is_empty() || index == self.selected {
            return Vec::new();
        }
        self.selected = index.min(self.cards.len() - 1);
        vec![AppEvent::SelectionChanged(self.selected)]
    }

    fn toggle_at(&mut self, index: usize) -> Vec<AppEvent> {
        let Some(card) = self.cards.get_mut(index) else {
            return Vec::new();
        };
        match card.toggle() {
            Some(label) => vec![AppEvent::TextToggled {
                id: card.record.id.clone(),
                label,
            }],
            None => Vec::new(),
        }
    }

    fn remove(&mut self, id: &TourId) -> Vec<AppEvent> {
        let before = self.cards.len();
        self.cards.retain(|card| &card.record.id != id);
        if self.cards.len() == before {
            return Vec::new();
        }

        self.selected = self.selected.min(self.cards.len().saturating_sub(1));
        let remaining = self.cards.len();
        vec![
            AppEvent::TourRemoved {
                id: id.clone(),
                remaining,
            },
            self.set_status(&format!("{remaining} {} left", plural_tours(remaining))),
        ]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}

fn plural_tours(count: usize) -> &'static str {
    if count == 1 { "tour" } else { "tours" }
}
