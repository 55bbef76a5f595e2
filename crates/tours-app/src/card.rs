// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::TourRecord;

/// Descriptions longer than this many characters start truncated.
pub const TRUNCATE_AT: usize = 200;
pub const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleLabel {
    ShowMore,
    ShowLess,
}

impl ToggleLabel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShowMore => "show more",
            Self::ShowLess => "show less",
        }
    }
}

/// Text state of one card. `FullOnly` is the only state for descriptions at or
/// under the threshold; the other two alternate forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextState {
    FullOnly,
    Truncated,
    Full,
}

impl TextState {
    pub fn initial(info: &str) -> Self {
        if needs_truncation(info) {
            Self::Truncated
        } else {
            Self::FullOnly
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::FullOnly => Self::FullOnly,
            Self::Truncated => Self::Full,
            Self::Full => Self::Truncated,
        }
    }

    pub const fn toggle_label(self) -> Option<ToggleLabel> {
        match self {
            Self::FullOnly => None,
            Self::Truncated => Some(ToggleLabel::ShowMore),
            Self::Full => Some(ToggleLabel::ShowLess),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayState {
    pub visible_text: String,
    pub toggle_label: Option<ToggleLabel>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourCard {
    pub record: TourRecord,
    text: TextState,
}

impl TourCard {
    pub fn new(record: TourRecord) -> Self {
        let text = TextState::initial(&record.info);
        Self { record, text }
    }

    pub const fn text_state(&self) -> TextState {
        self.text
    }

    pub fn toggle(&mut self) -> Option<ToggleLabel> {
        self.text = self.text.toggled();
        self.text.toggle_label()
    }

    pub fn display(&self) -> DisplayState {
        let visible_text = match self.text {
            TextState::FullOnly | TextState::Full => self.record.info.clone(),
            TextState::Truncated => truncate_info(&self.record.info),
        };
        DisplayState {
            visible_text,
            toggle_label: self.text.toggle_label(),
        }
    }
}

pub fn needs_truncation(info: &str) -> bool {
    info.chars().nth(TRUNCATE_AT).is_some()
}

pub fn truncate_info(info: &str) -> String {
    let cut = info
        .char_indices()
        .nth(TRUNCATE_AT)
        .map_or(info.len(), |(index, _)| index);
    format!("{}{ELLIPSIS}", &info[..cut])
}

#[cfg(test)]
mod tests {
    use super::{TRUNCATE_AT, TextState, ToggleLabel, TourCard, needs_truncation, truncate_info};
    use crate::{TourId, TourRecord};

    fn card_with_info(info: String) -> TourCard {
        TourCard::new(TourRecord {
            id: TourId::new("1"),
            image: "https://images.example.com/1.jpeg".to_owned(),
            name: "Tour".to_owned(),
            price: "100".to_owned(),
            info,
        })
    }

    #[test]
    fn short_info_shows_full_text_without_toggle() {
        let card = card_with_info("A".repeat(50));
        let display = card.display();
        assert_eq!(display.visible_text, "A".repeat(50));
        assert_eq!(display.toggle_label, None);
        assert_eq!(card.text_state(), TextState::FullOnly);
    }

    #[test]
    fn threshold_boundary_is_inclusive_of_full_text() {
        let at = card_with_info("C".repeat(TRUNCATE_AT));
        assert_eq!(at.display().visible_text, "C".repeat(TRUNCATE_AT));
        assert_eq!(at.display().toggle_label, None);

        let over = card_with_info("C".repeat(TRUNCATE_AT + 1));
        assert_eq!(
            over.display().visible_text,
            format!("{}...", "C".repeat(TRUNCATE_AT))
        );
        assert_eq!(over.display().toggle_label, Some(ToggleLabel::ShowMore));
    }

    #[test]
    fn long_info_toggles_between_truncated_and_full() {
        let mut card = card_with_info("B".repeat(250));
        let display = card.display();
        assert_eq!(display.visible_text, format!("{}...", "B".repeat(200)));
        assert_eq!(display.toggle_label, Some(ToggleLabel::ShowMore));

        assert_eq!(card.toggle(), Some(ToggleLabel::ShowLess));
        let display = card.display();
        assert_eq!(display.visible_text, "B".repeat(250));
        assert_eq!(display.toggle_label.map(ToggleLabel::as_str), Some("show less"));

        assert_eq!(card.toggle(), Some(ToggleLabel::ShowMore));
        assert_eq!(card.display().visible_text, format!("{}...", "B".repeat(200)));
    }

    #[test]
    fn two_round_trips_return_to_truncated_display() {
        let mut card = card_with_info("D".repeat(400));
        let initial = card.display();
        for _ in 0..4 {
            card.toggle();
        }
        assert_eq!(card.display(), initial);
    }

    #[test]
    fn toggle_is_ignored_for_short_info() {
        let mut card = card_with_info("short".to_owned());
        assert_eq!(card.toggle(), None);
        assert_eq!(card.text_state(), TextState::FullOnly);
        assert_eq!(card.display().visible_text, "short");
    }

    #[test]
    fn label_is_present_iff_text_differs_from_info() {
        for info in ["x".repeat(10), "y".repeat(200), "z".repeat(201), "w".repeat(999)] {
            let mut card = card_with_info(info.clone());
            for _ in 0..3 {
                let display = card.display();
                assert_eq!(
                    display.toggle_label == Some(ToggleLabel::ShowMore),
                    display.visible_text != info
                );
                card.toggle();
            }
        }
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let info = "é".repeat(201);
        assert!(needs_truncation(&info));
        let truncated = truncate_info(&info);
        assert_eq!(truncated.chars().count(), TRUNCATE_AT + 3);
        assert!(truncated.ends_with("é..."));
        assert!(!needs_truncation(&"é".repeat(200)));
    }
}
