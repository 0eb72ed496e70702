// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use sitewalk_app::{Inspection, PhotoDraft, PhotoDraftId, Property, ReviewReport};
use sitewalk_data::Dataset;
use sitewalk_tui::{AppRuntime, ExternalLink};
use std::time::Duration;
use time::OffsetDateTime;

/// In-memory runtime over a loaded dataset. Submissions and captured
/// photos accumulate here for the lifetime of the process and are
/// dropped on exit; there is no backend.
pub struct MockRuntime {
    dataset: Dataset,
    submit_delay: Duration,
    photo_seq: i64,
    submitted: Vec<ReviewReport>,
    opened_links: Vec<ExternalLink>,
}

impl MockRuntime {
    pub fn new(dataset: Dataset, submit_delay: Duration) -> Self {
        Self {
            dataset,
            submit_delay,
            photo_seq: 0,
            submitted: Vec::new(),
            opened_links: Vec::new(),
        }
    }

    pub fn submitted_reports(&self) -> &[ReviewReport] {
        &self.submitted
    }

    pub fn opened_links(&self) -> &[ExternalLink] {
        &self.opened_links
    }
}

impl AppRuntime for MockRuntime {
    fn load_properties(&mut self) -> Result<Vec<Property>> {
        Ok(self.dataset.properties.clone())
    }

    fn load_inspections(&mut self) -> Result<Vec<Inspection>> {
        Ok(self.dataset.inspections.clone())
    }

    /// Simulated camera: a placeholder data URI per capture, tagged
    /// with the capture order so entries stay distinguishable.
    fn capture_photo(&mut self) -> Result<PhotoDraft> {
        self.photo_seq += 1;
        Ok(PhotoDraft {
            id: PhotoDraftId::new(self.photo_seq),
            url: format!(
                "data:image/svg+xml;utf8,<svg xmlns='http://www.w3.org/2000/svg' width='320' height='240'><rect width='100%25' height='100%25' fill='%23888'/><text x='12' y='120'>site photo {}</text></svg>",
                self.photo_seq
            ),
            caption: String::new(),
            before_photo: false,
            timestamp: OffsetDateTime::now_utc(),
        })
    }

    fn submit_report(&mut self, report: &ReviewReport) -> Result<()> {
        self.submitted.push(report.clone());
        Ok(())
    }

    // The terminal has no dialer or map application to hand off to;
    // the launch is recorded and acknowledged on the status line.
    fn open_external(&mut self, link: &ExternalLink) -> Result<()> {
        self.opened_links.push(link.clone());
        Ok(())
    }

    fn submit_delay(&self) -> Duration {
        self.submit_delay
    }
}
