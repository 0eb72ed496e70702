// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyStatus {
    #[serde(rename = "scheduled")]
    Scheduled,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "passed")]
    Passed,
    #[serde(rename = "failed")]
    Failed,
}

impl PropertyStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in-progress",
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "scheduled" => Some(Self::Scheduled),
            "in-progress" => Some(Self::InProgress),
            "passed" => Some(Self::Passed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InspectionStatus {
    #[serde(rename = "scheduled")]
    Scheduled,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "passed")]
    Passed,
    #[serde(rename = "failed")]
    Failed,
}

impl InspectionStatus {
    pub const ALL: [Self; 4] = [
        Self::Scheduled,
        Self::InProgress,
        Self::Passed,
        Self::Failed,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in-progress",
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "scheduled" => Some(Self::Scheduled),
            "in-progress" => Some(Self::InProgress),
            "passed" => Some(Self::Passed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Passed | Self::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InspectionKind {
    #[serde(rename = "pre-rock")]
    PreRock,
    #[serde(rename = "poly-test")]
    PolyTest,
    #[serde(rename = "final")]
    Final,
    #[serde(rename = "blower-door")]
    BlowerDoor,
}

impl InspectionKind {
    pub const ALL: [Self; 4] = [Self::PreRock, Self::PolyTest, Self::Final, Self::BlowerDoor];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreRock => "pre-rock",
            Self::PolyTest => "poly-test",
            Self::Final => "final",
            Self::BlowerDoor => "blower-door",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pre-rock" => Some(Self::PreRock),
            "poly-test" => Some(Self::PolyTest),
            "final" => Some(Self::Final),
            "blower-door" => Some(Self::BlowerDoor),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PreRock => "Pre-Rock",
            Self::PolyTest => "Poly Test",
            Self::Final => "Final",
            Self::BlowerDoor => "Blower Door",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContact {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspector {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: PropertyId,
    pub address: String,
    pub community: String,
    pub plan_number: String,
    pub status: PropertyStatus,
    pub site_contact: SiteContact,
    #[serde(default)]
    pub closing_date: Option<String>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    pub id: InspectionId,
    pub property_id: PropertyId,
    #[serde(rename = "type")]
    pub kind: InspectionKind,
    pub status: InspectionStatus,
    /// ISO-8601 datetime. Kept as the wire string; day bucketing and
    /// "Invalid Date" rendering are string-level concerns.
    pub scheduled_date: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub report_url: Option<String>,
    pub inspector: Inspector,
}
