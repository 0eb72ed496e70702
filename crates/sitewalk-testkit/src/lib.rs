// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Deterministic sample data for tests and `--demo` runs. Everything is
//! anchored to a caller-supplied reference day so "today" buckets stay
//! meaningful regardless of when the suite runs.

use sitewalk_app::datefmt::{day_key, shift_date_by_days};
use sitewalk_app::{
    Inspection, InspectionId, InspectionKind, InspectionStatus, Inspector, Property, PropertyId,
    PropertyStatus, SiteContact,
};
use time::Date;

// Paired with ADDRESSES; exactly one Dallas property so free-text
// assertions have a single expected hit.
const COMMUNITIES: [&str; 6] = ["Dallas", "Plano", "Frisco", "McKinney", "Plano", "Frisco"];

const ADDRESSES: [&str; 6] = [
    "118 Bluestem Dr",
    "44 Crescent Ct",
    "901 Longhorn Way",
    "217 Mesquite Trl",
    "75 Shady Oak Ln",
    "1402 Prairie View Rd",
];

const CONTACTS: [(&str, &str); 3] = [
    ("Jordan Reyes", "214-555-0148"),
    ("Casey Tran", "972-555-0112"),
    ("Morgan Ellis", "469-555-0187"),
];

const INSPECTOR: &str = "Sam Ortiz";

pub fn sample_property(id: i64, address: &str, community: &str) -> Property {
    let (contact_name, contact_phone) = CONTACTS[(id as usize) % CONTACTS.len()];
    Property {
        id: PropertyId::new(id),
        address: address.to_owned(),
        community: community.to_owned(),
        plan_number: format!("Plan {}", 2400 + id * 3),
        status: PropertyStatus::Scheduled,
        site_contact: SiteContact {
            name: contact_name.to_owned(),
            phone: contact_phone.to_owned(),
        },
        closing_date: None,
        notes: String::new(),
    }
}

pub fn sample_inspection(
    id: i64,
    property_id: i64,
    kind: InspectionKind,
    status: InspectionStatus,
    scheduled_date: &str,
) -> Inspection {
    Inspection {
        id: InspectionId::new(id),
        property_id: PropertyId::new(property_id),
        kind,
        status,
        scheduled_date: scheduled_date.to_owned(),
        notes: String::new(),
        photos: Vec::new(),
        report_url: None,
        inspector: Inspector {
            name: INSPECTOR.to_owned(),
        },
    }
}

pub fn sample_properties() -> Vec<Property> {
    ADDRESSES
        .iter()
        .enumerate()
        .map(|(index, address)| {
            sample_property(index as i64 + 1, address, COMMUNITIES[index])
        })
        .collect()
}

fn iso_at(day: Date, hour: u8, minute: u8) -> String {
    format!("{}T{hour:02}:{minute:02}:00Z", day_key(day))
}

/// A week of work around `today`: two visits today, the rest spread
/// across the surrounding days, plus a settled pair for the history
/// screen.
pub fn sample_inspections(today: Date) -> Vec<Inspection> {
    let day = |offset: i64| shift_date_by_days(today, offset).unwrap_or(today);

    let mut inspections = vec![
        sample_inspection(
            101,
            1,
            InspectionKind::PreRock,
            InspectionStatus::Scheduled,
            &iso_at(today, 14, 30),
        ),
        sample_inspection(
            102,
            2,
            InspectionKind::PolyTest,
            InspectionStatus::InProgress,
            &iso_at(today, 16, 0),
        ),
        sample_inspection(
            103,
            3,
            InspectionKind::BlowerDoor,
            InspectionStatus::Scheduled,
            &iso_at(day(1), 13, 0),
        ),
        sample_inspection(
            104,
            4,
            InspectionKind::Final,
            InspectionStatus::Scheduled,
            &iso_at(day(2), 15, 30),
        ),
        sample_inspection(
            105,
            5,
            InspectionKind::PreRock,
            InspectionStatus::Passed,
            &iso_at(day(-3), 14, 0),
        ),
        sample_inspection(
            106,
            6,
            InspectionKind::Final,
            InspectionStatus::Failed,
            &iso_at(day(-1), 10, 30),
        ),
    ];
    inspections[4].report_url = Some("https://reports.example.com/105.pdf".to_owned());
    inspections[4].notes = "Wrap and penetrations clean".to_owned();
    inspections[5].notes = "Attic insulation short of spec at north bay".to_owned();
    inspections
}

#[cfg(test)]
mod tests {
    use super::{sample_inspections, sample_properties};
    use sitewalk_app::datefmt::same_day;
    use sitewalk_app::{InspectionFilter, PropertyIndex, filter_inspections};
    use time::{Date, Month};

    fn today() -> Date {
        Date::from_calendar_date(2025, Month::September, 19).expect("valid date")
    }

    #[test]
    fn every_sample_inspection_resolves_a_property() {
        let properties = sample_properties();
        let index = PropertyIndex::new(&properties);
        for inspection in sample_inspections(today()) {
            assert!(index.resolve(inspection.property_id).is_some());
        }
    }

    #[test]
    fn two_sample_inspections_land_on_the_reference_day() {
        let todays = sample_inspections(today())
            .iter()
            .filter(|inspection| same_day(&inspection.scheduled_date, today()))
            .count();
        assert_eq!(todays, 2);
    }

    #[test]
    fn dallas_query_hits_one_sample_inspection() {
        let properties = sample_properties();
        let inspections = sample_inspections(today());
        let index = PropertyIndex::new(&properties);
        let filter = InspectionFilter {
            query: "Dallas".to_owned(),
            ..InspectionFilter::default()
        };
        assert_eq!(filter_inspections(&inspections, &index, &filter).len(), 1);
    }
}
