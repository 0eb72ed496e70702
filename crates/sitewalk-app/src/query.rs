// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;
use std::collections::HashMap;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::ids::PropertyId;
use crate::model::{Inspection, InspectionKind, InspectionStatus, Property};

/// Lookup table over the externally supplied property array. Screens
/// resolve inspections through this; a miss is skipped, never an error.
#[derive(Debug, Clone)]
pub struct PropertyIndex<'a> {
    by_id: HashMap<PropertyId, &'a Property>,
}

impl<'a> PropertyIndex<'a> {
    pub fn new(properties: &'a [Property]) -> Self {
        Self {
            by_id: properties
                .iter()
                .map(|property| (property.id, property))
                .collect(),
        }
    }

    pub fn resolve(&self, id: PropertyId) -> Option<&'a Property> {
        self.by_id.get(&id).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(InspectionStatus),
}

impl StatusFilter {
    pub fn matches(self, status: InspectionStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            Self::All => Self::Only(InspectionStatus::ALL[0]),
            Self::Only(status) => {
                let position = InspectionStatus::ALL
                    .iter()
                    .position(|entry| *entry == status)
                    .unwrap_or(0);
                match InspectionStatus::ALL.get(position + 1) {
                    Some(next) => Self::Only(*next),
                    None => Self::All,
                }
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(status) => status.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindFilter {
    #[default]
    All,
    Only(InspectionKind),
}

impl KindFilter {
    pub fn matches(self, kind: InspectionKind) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == kind,
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            Self::All => Self::Only(InspectionKind::ALL[0]),
            Self::Only(kind) => {
                let position = InspectionKind::ALL
                    .iter()
                    .position(|entry| *entry == kind)
                    .unwrap_or(0);
                match InspectionKind::ALL.get(position + 1) {
                    Some(next) => Self::Only(*next),
                    None => Self::All,
                }
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(kind) => kind.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InspectionFilter {
    pub status: StatusFilter,
    pub kind: KindFilter,
    pub query: String,
}

impl InspectionFilter {
    pub fn is_active(&self) -> bool {
        self.status != StatusFilter::All
            || self.kind != KindFilter::All
            || !self.query.trim().is_empty()
    }

    fn matches(&self, inspection: &Inspection, index: &PropertyIndex<'_>) -> bool {
        if !self.status.matches(inspection.status) {
            return false;
        }
        if !self.kind.matches(inspection.kind) {
            return false;
        }

        let query = self.query.trim();
        if query.is_empty() {
            return true;
        }

        // A missing property makes the property-field checks vacuously
        // false; the inspection can still match on kind or notes.
        let property_hit = index.resolve(inspection.property_id).is_some_and(|property| {
            contains_ci(&property.address, query)
                || contains_ci(&property.community, query)
                || contains_ci(&property.plan_number, query)
        });

        property_hit
            || contains_ci(inspection.kind.as_str(), query)
            || contains_ci(&inspection.notes, query)
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Subset of `inspections` satisfying every active predicate, in input
/// order.
pub fn filter_inspections(
    inspections: &[Inspection],
    index: &PropertyIndex<'_>,
    filter: &InspectionFilter,
) -> Vec<Inspection> {
    inspections
        .iter()
        .filter(|inspection| filter.matches(inspection, index))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Date,
    Status,
    Address,
}

impl SortKey {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Status => "status",
            Self::Address => "address",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn flip(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub const fn marker(self) -> &'static str {
        match self {
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }
}

/// UI-facing sort selection: the same key toggles direction, a new key
/// starts over descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::Date,
            direction: SortDirection::Desc,
        }
    }
}

impl SortState {
    pub fn select(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.flip();
        } else {
            self.key = key;
            self.direction = SortDirection::Desc;
        }
    }
}

fn date_value(inspection: &Inspection) -> OffsetDateTime {
    // Unparseable dates collapse to the epoch and group at the early end.
    OffsetDateTime::parse(&inspection.scheduled_date, &Rfc3339)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

fn address_value<'a>(inspection: &Inspection, index: &PropertyIndex<'a>) -> &'a str {
    index
        .resolve(inspection.property_id)
        .map(|property| property.address.as_str())
        .unwrap_or("")
}

/// Deterministic ordering over the filtered list. Stable with respect
/// to equal keys; ties keep their input order.
pub fn sort_inspections(
    mut inspections: Vec<Inspection>,
    index: &PropertyIndex<'_>,
    key: SortKey,
    direction: SortDirection,
) -> Vec<Inspection> {
    inspections.sort_by(|left, right| {
        let ordering = match key {
            SortKey::Date => date_value(left).cmp(&date_value(right)),
            SortKey::Status => left.status.as_str().cmp(right.status.as_str()),
            SortKey::Address => address_value(left, index).cmp(address_value(right, index)),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    inspections
}

/// Ordering helper for schedule day buckets; earliest first, invalid
/// dates first.
pub fn compare_by_date(left: &Inspection, right: &Inspection) -> Ordering {
    date_value(left).cmp(&date_value(right))
}

#[cfg(test)]
mod tests {
    use super::{
        InspectionFilter, KindFilter, PropertyIndex, SortDirection, SortKey, SortState,
        StatusFilter, filter_inspections, sort_inspections,
    };
    use crate::ids::{InspectionId, PropertyId};
    use crate::model::{
        Inspection, InspectionKind, InspectionStatus, Inspector, Property, PropertyStatus,
        SiteContact,
    };

    fn property(id: i64, address: &str, community: &str) -> Property {
        Property {
            id: PropertyId::new(id),
            address: address.to_owned(),
            community: community.to_owned(),
            plan_number: format!("Plan {id}"),
            status: PropertyStatus::Scheduled,
            site_contact: SiteContact {
                name: "Jordan Reyes".to_owned(),
                phone: "555-0100".to_owned(),
            },
            closing_date: None,
            notes: String::new(),
        }
    }

    fn inspection(id: i64, property_id: i64, kind: InspectionKind, date: &str) -> Inspection {
        Inspection {
            id: InspectionId::new(id),
            property_id: PropertyId::new(property_id),
            kind,
            status: InspectionStatus::Scheduled,
            scheduled_date: date.to_owned(),
            notes: String::new(),
            photos: Vec::new(),
            report_url: None,
            inspector: Inspector {
                name: "Sam Ortiz".to_owned(),
            },
        }
    }

    fn metro_fixture() -> (Vec<Property>, Vec<Inspection>) {
        let properties = vec![
            property(1, "118 Bluestem Dr", "Dallas"),
            property(2, "44 Crescent Ct", "Plano"),
            property(3, "901 Longhorn Way", "Frisco"),
        ];
        let inspections = vec![
            inspection(10, 1, InspectionKind::PreRock, "2025-09-18T14:00:00Z"),
            inspection(11, 2, InspectionKind::Final, "2025-09-19T16:30:00Z"),
            inspection(12, 3, InspectionKind::BlowerDoor, "2025-09-20T13:00:00Z"),
        ];
        (properties, inspections)
    }

    #[test]
    fn empty_filter_returns_all_in_input_order() {
        let (properties, inspections) = metro_fixture();
        let index = PropertyIndex::new(&properties);
        let result = filter_inspections(&inspections, &index, &InspectionFilter::default());
        assert_eq!(result, inspections);
    }

    #[test]
    fn free_text_matches_exactly_one_community() {
        let (properties, inspections) = metro_fixture();
        let index = PropertyIndex::new(&properties);
        let filter = InspectionFilter {
            query: "Dallas".to_owned(),
            ..InspectionFilter::default()
        };
        let result = filter_inspections(&inspections, &index, &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, InspectionId::new(10));
    }

    #[test]
    fn free_text_is_case_insensitive_across_fields() {
        let (properties, mut inspections) = metro_fixture();
        inspections[2].notes = "Recheck attic penetrations".to_owned();
        let index = PropertyIndex::new(&properties);

        for query in ["bluestem", "PLAN 2", "blower", "ATTIC"] {
            let filter = InspectionFilter {
                query: query.to_owned(),
                ..InspectionFilter::default()
            };
            assert_eq!(
                filter_inspections(&inspections, &index, &filter).len(),
                1,
                "query {query:?}"
            );
        }
    }

    #[test]
    fn status_and_kind_predicates_combine_with_free_text() {
        let (properties, mut inspections) = metro_fixture();
        inspections[0].status = InspectionStatus::Passed;
        inspections[1].status = InspectionStatus::Passed;
        let index = PropertyIndex::new(&properties);

        let filter = InspectionFilter {
            status: StatusFilter::Only(InspectionStatus::Passed),
            kind: KindFilter::Only(InspectionKind::Final),
            query: "Plano".to_owned(),
        };
        let result = filter_inspections(&inspections, &index, &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, InspectionId::new(11));
    }

    #[test]
    fn missing_property_still_matches_on_kind_and_notes() {
        let (_, mut inspections) = metro_fixture();
        inspections[0].notes = "Garage slab crack".to_owned();
        let index = PropertyIndex::new(&[]);

        let by_kind = InspectionFilter {
            query: "pre-rock".to_owned(),
            ..InspectionFilter::default()
        };
        assert_eq!(filter_inspections(&inspections, &index, &by_kind).len(), 1);

        let by_notes = InspectionFilter {
            query: "slab".to_owned(),
            ..InspectionFilter::default()
        };
        assert_eq!(filter_inspections(&inspections, &index, &by_notes).len(), 1);

        let by_address = InspectionFilter {
            query: "Bluestem".to_owned(),
            ..InspectionFilter::default()
        };
        assert!(filter_inspections(&inspections, &index, &by_address).is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let (properties, inspections) = metro_fixture();
        let index = PropertyIndex::new(&properties);
        let filter = InspectionFilter {
            status: StatusFilter::Only(InspectionStatus::Scheduled),
            ..InspectionFilter::default()
        };
        let once = filter_inspections(&inspections, &index, &filter);
        let twice = filter_inspections(&once, &index, &filter);
        assert_eq!(once, twice);
    }

    #[test]
    fn date_sort_descending_reverses_ascending_without_ties() {
        let (properties, inspections) = metro_fixture();
        let index = PropertyIndex::new(&properties);

        let asc = sort_inspections(
            inspections.clone(),
            &index,
            SortKey::Date,
            SortDirection::Asc,
        );
        let mut reversed = asc.clone();
        reversed.reverse();
        let desc = sort_inspections(inspections, &index, SortKey::Date, SortDirection::Desc);
        assert_eq!(desc, reversed);
    }

    #[test]
    fn invalid_dates_sort_to_the_early_end_ascending() {
        let (properties, mut inspections) = metro_fixture();
        inspections[1].scheduled_date = "TBD".to_owned();
        let index = PropertyIndex::new(&properties);
        let sorted = sort_inspections(inspections, &index, SortKey::Date, SortDirection::Asc);
        assert_eq!(sorted[0].id, InspectionId::new(11));
    }

    #[test]
    fn status_sort_is_lexicographic_on_the_status_string() {
        let (properties, mut inspections) = metro_fixture();
        inspections[0].status = InspectionStatus::Scheduled;
        inspections[1].status = InspectionStatus::Failed;
        inspections[2].status = InspectionStatus::InProgress;
        let index = PropertyIndex::new(&properties);
        let sorted = sort_inspections(inspections, &index, SortKey::Status, SortDirection::Asc);
        let statuses: Vec<&str> = sorted
            .iter()
            .map(|inspection| inspection.status.as_str())
            .collect();
        // "failed" < "in-progress" < "scheduled"
        assert_eq!(statuses, vec!["failed", "in-progress", "scheduled"]);
    }

    #[test]
    fn unresolved_addresses_sort_as_empty_string() {
        let (mut properties, inspections) = metro_fixture();
        properties.remove(1);
        let index = PropertyIndex::new(&properties);

        let asc = sort_inspections(
            inspections.clone(),
            &index,
            SortKey::Address,
            SortDirection::Asc,
        );
        assert_eq!(asc[0].id, InspectionId::new(11));

        let desc = sort_inspections(inspections, &index, SortKey::Address, SortDirection::Desc);
        assert_eq!(desc.last().map(|inspection| inspection.id), Some(InspectionId::new(11)));
    }

    #[test]
    fn sort_selection_toggles_and_resets_direction() {
        let mut state = SortState::default();
        assert_eq!(state.key, SortKey::Date);
        assert_eq!(state.direction, SortDirection::Desc);

        state.select(SortKey::Date);
        assert_eq!(state.direction, SortDirection::Asc);

        state.select(SortKey::Address);
        assert_eq!(state.key, SortKey::Address);
        assert_eq!(state.direction, SortDirection::Desc);
    }

    #[test]
    fn status_filter_cycle_walks_every_status_and_wraps() {
        let mut filter = StatusFilter::All;
        for status in InspectionStatus::ALL {
            filter = filter.cycle();
            assert_eq!(filter, StatusFilter::Only(status));
        }
        assert_eq!(filter.cycle(), StatusFilter::All);
    }

    #[test]
    fn kind_filter_cycle_wraps_back_to_all() {
        let mut filter = KindFilter::All;
        for _ in 0..=InspectionKind::ALL.len() {
            filter = filter.cycle();
        }
        assert_eq!(filter, KindFilter::All);
    }
}
