// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::ids::{InspectionId, PropertyId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Schedule,
    PropertyDetail,
    InspectionDetail,
    InspectionForm,
    PhotoManager,
    History,
    ReportReview,
}

impl ScreenKind {
    pub const ALL: [Self; 7] = [
        Self::Schedule,
        Self::PropertyDetail,
        Self::InspectionDetail,
        Self::InspectionForm,
        Self::PhotoManager,
        Self::History,
        Self::ReportReview,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Schedule => "schedule",
            Self::PropertyDetail => "property",
            Self::InspectionDetail => "inspection",
            Self::InspectionForm => "form",
            Self::PhotoManager => "photos",
            Self::History => "history",
            Self::ReportReview => "report",
        }
    }

    /// Hard-coded predecessor per screen; there is no history stack.
    pub const fn back_target(self) -> Option<Self> {
        match self {
            Self::Schedule => None,
            Self::PropertyDetail => Some(Self::Schedule),
            Self::InspectionDetail => Some(Self::PropertyDetail),
            Self::InspectionForm => Some(Self::InspectionDetail),
            Self::PhotoManager => Some(Self::InspectionForm),
            Self::History => Some(Self::Schedule),
            Self::ReportReview => Some(Self::History),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub screen: ScreenKind,
    pub selected_property: Option<PropertyId>,
    pub selected_inspection: Option<InspectionId>,
    pub dark_mode: bool,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            screen: ScreenKind::Schedule,
            selected_property: None,
            selected_inspection: None,
            dark_mode: false,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    GoTo {
        screen: ScreenKind,
        property: Option<PropertyId>,
        inspection: Option<InspectionId>,
    },
    Back,
    ToggleDarkMode,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ScreenChanged(ScreenKind),
    PropertySelected(PropertyId),
    InspectionSelected(InspectionId),
    DarkModeChanged(bool),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::GoTo {
                screen,
                property,
                inspection,
            } => {
                let mut events = Vec::new();
                if let Some(property) = property {
                    self.selected_property = Some(property);
                    events.push(AppEvent::PropertySelected(property));
                }
                if let Some(inspection) = inspection {
                    self.selected_inspection = Some(inspection);
                    events.push(AppEvent::InspectionSelected(inspection));
                }
                self.screen = screen;
                events.push(AppEvent::ScreenChanged(screen));
                events
            }
            AppCommand::Back => match self.screen.back_target() {
                Some(target) => {
                    self.screen = target;
                    vec![AppEvent::ScreenChanged(target)]
                }
                None => Vec::new(),
            },
            AppCommand::ToggleDarkMode => {
                self.dark_mode = !self.dark_mode;
                let label = if self.dark_mode {
                    "dark mode on"
                } else {
                    "dark mode off"
                };
                vec![
                    AppEvent::DarkModeChanged(self.dark_mode),
                    self.set_status(label),
                ]
            }
            AppCommand::SetStatus(message) => {
                vec![self.set_status(&message)]
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    pub fn go_to(
        &mut self,
        screen: ScreenKind,
        property: Option<PropertyId>,
        inspection: Option<InspectionId>,
    ) -> Vec<AppEvent> {
        self.dispatch(AppCommand::GoTo {
            screen,
            property,
            inspection,
        })
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, AppState, ScreenKind};
    use crate::ids::{InspectionId, PropertyId};

    #[test]
    fn go_to_updates_screen_and_selections() {
        let mut state = AppState::default();
        let events = state.go_to(
            ScreenKind::InspectionDetail,
            Some(PropertyId::new(3)),
            Some(InspectionId::new(9)),
        );

        assert_eq!(state.screen, ScreenKind::InspectionDetail);
        assert_eq!(state.selected_property, Some(PropertyId::new(3)));
        assert_eq!(state.selected_inspection, Some(InspectionId::new(9)));
        assert_eq!(
            events,
            vec![
                AppEvent::PropertySelected(PropertyId::new(3)),
                AppEvent::InspectionSelected(InspectionId::new(9)),
                AppEvent::ScreenChanged(ScreenKind::InspectionDetail),
            ],
        );
    }

    #[test]
    fn selections_stick_across_navigation() {
        let mut state = AppState::default();
        state.go_to(ScreenKind::PropertyDetail, Some(PropertyId::new(2)), None);
        state.go_to(ScreenKind::History, None, None);
        assert_eq!(state.selected_property, Some(PropertyId::new(2)));
    }

    #[test]
    fn back_walks_the_hard_coded_predecessors() {
        let mut state = AppState::default();
        state.go_to(
            ScreenKind::PhotoManager,
            Some(PropertyId::new(1)),
            Some(InspectionId::new(1)),
        );

        state.dispatch(AppCommand::Back);
        assert_eq!(state.screen, ScreenKind::InspectionForm);
        state.dispatch(AppCommand::Back);
        assert_eq!(state.screen, ScreenKind::InspectionDetail);
        state.dispatch(AppCommand::Back);
        assert_eq!(state.screen, ScreenKind::PropertyDetail);
        state.dispatch(AppCommand::Back);
        assert_eq!(state.screen, ScreenKind::Schedule);

        let events = state.dispatch(AppCommand::Back);
        assert_eq!(state.screen, ScreenKind::Schedule);
        assert!(events.is_empty());
    }

    #[test]
    fn report_review_returns_to_history() {
        let mut state = AppState::default();
        state.go_to(ScreenKind::ReportReview, None, None);
        state.dispatch(AppCommand::Back);
        assert_eq!(state.screen, ScreenKind::History);
    }

    #[test]
    fn dark_mode_toggle_updates_status() {
        let mut state = AppState::default();
        let events = state.dispatch(AppCommand::ToggleDarkMode);
        assert!(state.dark_mode);
        assert_eq!(
            events,
            vec![
                AppEvent::DarkModeChanged(true),
                AppEvent::StatusUpdated("dark mode on".to_owned()),
            ],
        );
    }
}
