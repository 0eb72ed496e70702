// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! The data supplier for a session: two read-only arrays, loaded once
//! at startup from JSON or seeded in memory. Nothing here is written
//! back; submissions and drafts never leave the UI session.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use sitewalk_app::datefmt::{day_key, shift_date_by_days};
use sitewalk_app::{
    Inspection, InspectionId, InspectionKind, InspectionStatus, Inspector, Property, PropertyId,
    PropertyIndex, PropertyStatus, SiteContact,
};
use time::Date;

pub const APP_NAME: &str = "sitewalk";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct Dataset {
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub inspections: Vec<Inspection>,
}

/// Inspections whose property is missing from the set. They render as
/// skipped rows, never as errors; the report exists so an operator can
/// see what a dataset leaves dark.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IntegrityReport {
    pub orphaned_inspections: Vec<InspectionId>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.orphaned_inspections.is_empty()
    }
}

impl Dataset {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("decode dataset JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read dataset file {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("parse dataset file {}", path.display()))
    }

    pub fn integrity(&self) -> IntegrityReport {
        let index = PropertyIndex::new(&self.properties);
        IntegrityReport {
            orphaned_inspections: self
                .inspections
                .iter()
                .filter(|inspection| index.resolve(inspection.property_id).is_none())
                .map(|inspection| inspection.id)
                .collect(),
        }
    }

    /// Seeded demo session anchored to `today`, used by `--demo`.
    pub fn demo(today: Date) -> Self {
        let day = |offset: i64| shift_date_by_days(today, offset).unwrap_or(today);
        let iso = |date: Date, hour: u8, minute: u8| {
            format!("{}T{hour:02}:{minute:02}:00Z", day_key(date))
        };

        let properties = vec![
            demo_property(
                1,
                "118 Bluestem Dr",
                "Dallas",
                "Plan 2403",
                PropertyStatus::InProgress,
                ("Jordan Reyes", "214-555-0148"),
                Some("2025-11-14"),
                "Buyer walk scheduled after final",
            ),
            demo_property(
                2,
                "44 Crescent Ct",
                "Plano",
                "Plan 2406",
                PropertyStatus::Scheduled,
                ("Casey Tran", "972-555-0112"),
                None,
                "",
            ),
            demo_property(
                3,
                "901 Longhorn Way",
                "Frisco",
                "Plan 2409",
                PropertyStatus::Scheduled,
                ("Morgan Ellis", "469-555-0187"),
                None,
                "Gate code 4418",
            ),
            demo_property(
                4,
                "217 Mesquite Trl",
                "McKinney",
                "Plan 2412",
                PropertyStatus::Passed,
                ("Jordan Reyes", "214-555-0148"),
                Some("2025-10-03"),
                "",
            ),
            demo_property(
                5,
                "75 Shady Oak Ln",
                "Dallas",
                "Plan 2415",
                PropertyStatus::Failed,
                ("Casey Tran", "972-555-0112"),
                None,
                "Reinspection required",
            ),
        ];

        let mut inspections = vec![
            demo_inspection(
                101,
                1,
                InspectionKind::PreRock,
                InspectionStatus::Scheduled,
                iso(today, 14, 30),
                "",
            ),
            demo_inspection(
                102,
                2,
                InspectionKind::PolyTest,
                InspectionStatus::InProgress,
                iso(today, 16, 0),
                "Crew on site since noon",
            ),
            demo_inspection(
                103,
                3,
                InspectionKind::BlowerDoor,
                InspectionStatus::Scheduled,
                iso(day(1), 13, 0),
                "",
            ),
            demo_inspection(
                104,
                1,
                InspectionKind::Final,
                InspectionStatus::Scheduled,
                iso(day(3), 15, 30),
                "",
            ),
            demo_inspection(
                105,
                4,
                InspectionKind::Final,
                InspectionStatus::Passed,
                iso(day(-4), 14, 0),
                "Clean final; closing packet sent",
            ),
            demo_inspection(
                106,
                5,
                InspectionKind::BlowerDoor,
                InspectionStatus::Failed,
                iso(day(-1), 10, 30),
                "ACH50 over target; seal attic hatch and recheck",
            ),
            demo_inspection(
                107,
                4,
                InspectionKind::PreRock,
                InspectionStatus::Passed,
                iso(day(-12), 9, 0),
                "",
            ),
        ];
        inspections[4].report_url = Some("https://reports.example.com/105.pdf".to_owned());
        inspections[6].report_url = Some("https://reports.example.com/107.pdf".to_owned());
        inspections[4].photos = vec![
            "https://photos.example.com/105/front.jpg".to_owned(),
            "https://photos.example.com/105/attic.jpg".to_owned(),
        ];

        Self {
            properties,
            inspections,
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn demo_property(
    id: i64,
    address: &str,
    community: &str,
    plan_number: &str,
    status: PropertyStatus,
    contact: (&str, &str),
    closing_date: Option<&str>,
    notes: &str,
) -> Property {
    Property {
        id: PropertyId::new(id),
        address: address.to_owned(),
        community: community.to_owned(),
        plan_number: plan_number.to_owned(),
        status,
        site_contact: SiteContact {
            name: contact.0.to_owned(),
            phone: contact.1.to_owned(),
        },
        closing_date: closing_date.map(str::to_owned),
        notes: notes.to_owned(),
    }
}

fn demo_inspection(
    id: i64,
    property_id: i64,
    kind: InspectionKind,
    status: InspectionStatus,
    scheduled_date: String,
    notes: &str,
) -> Inspection {
    Inspection {
        id: InspectionId::new(id),
        property_id: PropertyId::new(property_id),
        kind,
        status,
        scheduled_date,
        notes: notes.to_owned(),
        photos: Vec::new(),
        report_url: None,
        inspector: Inspector {
            name: "Sam Ortiz".to_owned(),
        },
    }
}
