// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use time::OffsetDateTime;

use crate::ids::{InspectionId, IssueDraftId, PhotoDraftId};

/// Sections tracked by the completion gauge: notes, photos, result,
/// issues.
const TRACKED_SECTIONS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InspectionResult {
    #[default]
    Pending,
    Pass,
    Fail,
}

impl InspectionResult {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Pass => "pass",
            Self::Fail => "fail",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "pass" => Some(Self::Pass),
            "fail" => Some(Self::Fail),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Low,
    Medium,
    High,
}

impl IssueSeverity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub const fn cycle(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }
}

/// Form-local finding. Lives only inside the active form session and is
/// discarded with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDraft {
    pub id: IssueDraftId,
    pub description: String,
    pub severity: IssueSeverity,
    pub location: String,
    pub photos: Vec<String>,
}

/// Photo-manager-local entry; a data URI or remote URL plus its tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoDraft {
    pub id: PhotoDraftId,
    pub url: String,
    pub caption: String,
    pub before_photo: bool,
    pub timestamp: OffsetDateTime,
}

/// The in-session edits for one inspection form. Never merged back into
/// the canonical `Inspection` record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InspectionDraft {
    pub notes: String,
    pub photos: Vec<PhotoDraft>,
    pub result: InspectionResult,
    pub issues: Vec<IssueDraft>,
}

impl InspectionDraft {
    /// Integer percentage in {25, 50, 75, 100}. The issues section
    /// always counts as complete: zero recorded issues is itself a
    /// finding.
    pub fn completion_percent(&self) -> u8 {
        let mut completed = 1u32;
        if !self.notes.is_empty() {
            completed += 1;
        }
        if !self.photos.is_empty() {
            completed += 1;
        }
        if self.result != InspectionResult::Pending {
            completed += 1;
        }
        ((f64::from(completed) / f64::from(TRACKED_SECTIONS)) * 100.0).round() as u8
    }

    pub fn add_issue(
        &mut self,
        description: impl Into<String>,
        severity: IssueSeverity,
        location: impl Into<String>,
        now: OffsetDateTime,
    ) -> IssueDraftId {
        // Timestamp-derived id; bumped past collisions from same-instant adds.
        let mut id = IssueDraftId::new((now.unix_timestamp_nanos() / 1_000_000) as i64);
        while self.issues.iter().any(|issue| issue.id == id) {
            id = IssueDraftId::new(id.get() + 1);
        }
        self.issues.push(IssueDraft {
            id,
            description: description.into(),
            severity,
            location: location.into(),
            photos: Vec::new(),
        });
        id
    }

    pub fn remove_issue(&mut self, id: IssueDraftId) -> bool {
        let before = self.issues.len();
        self.issues.retain(|issue| issue.id != id);
        self.issues.len() != before
    }

    pub fn add_photo(&mut self, photo: PhotoDraft) {
        self.photos.push(photo);
    }

    pub fn remove_photo(&mut self, id: PhotoDraftId) -> bool {
        let before = self.photos.len();
        self.photos.retain(|photo| photo.id != id);
        self.photos.len() != before
    }

    pub fn set_photo_caption(&mut self, id: PhotoDraftId, caption: impl Into<String>) -> bool {
        match self.photos.iter_mut().find(|photo| photo.id == id) {
            Some(photo) => {
                photo.caption = caption.into();
                true
            }
            None => false,
        }
    }

    pub fn toggle_photo_tag(&mut self, id: PhotoDraftId) -> bool {
        match self.photos.iter_mut().find(|photo| photo.id == id) {
            Some(photo) => {
                photo.before_photo = !photo.before_photo;
                true
            }
            None => false,
        }
    }

    pub fn validate_for_submit(&self) -> Result<()> {
        if self.result == InspectionResult::Pending {
            bail!("choose pass or fail before submitting the report");
        }
        Ok(())
    }

    pub fn to_report(&self, inspection_id: InspectionId) -> Result<ReviewReport> {
        self.validate_for_submit()?;
        Ok(ReviewReport {
            inspection_id,
            result: self.result,
            notes: self.notes.clone(),
            photo_urls: self.photos.iter().map(|photo| photo.url.clone()).collect(),
            issues: self.issues.clone(),
        })
    }
}

/// Snapshot handed to the runtime on submit; the draft itself stays
/// session-local.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewReport {
    pub inspection_id: InspectionId,
    pub result: InspectionResult,
    pub notes: String,
    pub photo_urls: Vec<String>,
    pub issues: Vec<IssueDraft>,
}

#[cfg(test)]
mod tests {
    use super::{InspectionDraft, InspectionResult, IssueSeverity, PhotoDraft};
    use crate::ids::{InspectionId, PhotoDraftId};
    use time::OffsetDateTime;

    fn sample_photo(id: i64) -> PhotoDraft {
        PhotoDraft {
            id: PhotoDraftId::new(id),
            url: format!("data:image/jpeg;base64,photo-{id}"),
            caption: String::new(),
            before_photo: false,
            timestamp: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn completion_climbs_the_quarter_ladder() {
        let mut draft = InspectionDraft::default();
        assert_eq!(draft.completion_percent(), 25);

        draft.notes = "Wrap inspected at all penetrations".to_owned();
        assert_eq!(draft.completion_percent(), 50);

        draft.add_photo(sample_photo(1));
        assert_eq!(draft.completion_percent(), 75);

        draft.result = InspectionResult::Pass;
        assert_eq!(draft.completion_percent(), 100);
    }

    #[test]
    fn issue_count_never_moves_the_gauge() {
        let mut draft = InspectionDraft::default();
        draft.add_issue(
            "Torn house wrap at NE corner",
            IssueSeverity::High,
            "118 Bluestem Dr",
            OffsetDateTime::UNIX_EPOCH,
        );
        assert_eq!(draft.completion_percent(), 25);
    }

    #[test]
    fn same_instant_issue_ids_do_not_collide() {
        let mut draft = InspectionDraft::default();
        let now = OffsetDateTime::UNIX_EPOCH;
        let first = draft.add_issue("one", IssueSeverity::Low, "garage", now);
        let second = draft.add_issue("two", IssueSeverity::Low, "garage", now);
        assert_ne!(first, second);
        assert_eq!(draft.issues.len(), 2);
    }

    #[test]
    fn remove_issue_reports_whether_anything_was_removed() {
        let mut draft = InspectionDraft::default();
        let id = draft.add_issue(
            "Missing poly at rim joist",
            IssueSeverity::Medium,
            "44 Crescent Ct",
            OffsetDateTime::UNIX_EPOCH,
        );
        assert!(draft.remove_issue(id));
        assert!(!draft.remove_issue(id));
        assert!(draft.issues.is_empty());
    }

    #[test]
    fn photo_edits_target_by_id() {
        let mut draft = InspectionDraft::default();
        draft.add_photo(sample_photo(1));
        draft.add_photo(sample_photo(2));

        assert!(draft.set_photo_caption(PhotoDraftId::new(2), "North elevation"));
        assert!(draft.toggle_photo_tag(PhotoDraftId::new(2)));
        assert!(!draft.set_photo_caption(PhotoDraftId::new(9), "nope"));

        let edited = &draft.photos[1];
        assert_eq!(edited.caption, "North elevation");
        assert!(edited.before_photo);
        assert!(draft.remove_photo(PhotoDraftId::new(1)));
        assert_eq!(draft.photos.len(), 1);
    }

    #[test]
    fn submit_requires_a_pass_fail_decision() {
        let mut draft = InspectionDraft::default();
        assert!(draft.to_report(InspectionId::new(7)).is_err());

        draft.result = InspectionResult::Fail;
        let report = draft.to_report(InspectionId::new(7)).expect("report");
        assert_eq!(report.result, InspectionResult::Fail);
        assert_eq!(report.inspection_id, InspectionId::new(7));
    }

    #[test]
    fn severity_cycle_wraps() {
        assert_eq!(IssueSeverity::Low.cycle(), IssueSeverity::Medium);
        assert_eq!(IssueSeverity::High.cycle(), IssueSeverity::Low);
        assert_eq!(InspectionResult::parse("pass"), Some(InspectionResult::Pass));
    }
}
