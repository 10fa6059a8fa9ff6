//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{TimeZone, Utc};
use crimewatch_core::{
  district::{District, ReferenceDistrict, REFERENCE_DISTRICTS},
  incident::NewIncident,
  store::{IncidentStore, InsertOutcome, SeedOutcome},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn seeded(name: &'static str) -> (SqliteStore, District) {
  let s = store().await;
  let outcome = s
    .ensure_district(&ReferenceDistrict { name, latitude: -6.9, longitude: 107.6 })
    .await
    .unwrap();
  let district = outcome.district().clone();
  (s, district)
}

fn incident(district: &District, url: &str, day: u32) -> NewIncident {
  NewIncident {
    district_id:   district.district_id,
    title:         format!("Incident on day {day}"),
    description:   "Something happened.".into(),
    source_url:    url.into(),
    incident_date: Utc.with_ymd_and_hms(2024, 5, day, 8, 0, 0).unwrap(),
    category:      "Theft".into(),
  }
}

// ─── Districts ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn ensure_district_inserts_then_reports_existing() {
  let s = store().await;
  let andir = REFERENCE_DISTRICTS[0];

  let first = s.ensure_district(&andir).await.unwrap();
  assert!(matches!(first, SeedOutcome::Inserted(_)));

  let second = s.ensure_district(&andir).await.unwrap();
  assert!(matches!(second, SeedOutcome::Existing(_)));
  assert_eq!(first.district().district_id, second.district().district_id);

  assert_eq!(s.list_districts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn reseeding_never_updates_coordinates() {
  let s = store().await;
  let original = ReferenceDistrict { name: "Regol", latitude: -6.9358, longitude: 107.6105 };
  let moved = ReferenceDistrict { name: "Regol", latitude: 1.0, longitude: 2.0 };

  s.ensure_district(&original).await.unwrap();
  let outcome = s.ensure_district(&moved).await.unwrap();

  assert!(matches!(outcome, SeedOutcome::Existing(_)));
  let stored = s.find_district("Regol").await.unwrap().unwrap();
  assert_eq!(stored.latitude, -6.9358);
  assert_eq!(stored.longitude, 107.6105);
}

#[tokio::test]
async fn find_district_is_case_insensitive() {
  let (s, district) = seeded("Sumur Bandung").await;

  for name in ["Sumur Bandung", "sumur bandung", "SUMUR BANDUNG", " sumur Bandung "] {
    let found = s.find_district(name).await.unwrap();
    assert_eq!(found.as_ref(), Some(&district), "name {name:?}");
  }

  assert!(s.find_district("Sumur").await.unwrap().is_none());
}

#[tokio::test]
async fn list_districts_is_ordered_by_name() {
  let s = store().await;
  for d in REFERENCE_DISTRICTS.iter().rev() {
    s.ensure_district(d).await.unwrap();
  }

  let names: Vec<String> =
    s.list_districts().await.unwrap().into_iter().map(|d| d.name).collect();
  let mut sorted = names.clone();
  sorted.sort_by_key(|n| n.to_lowercase());
  assert_eq!(names, sorted);
  assert_eq!(names.len(), REFERENCE_DISTRICTS.len());
}

// ─── Incidents ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_check_existence() {
  let (s, district) = seeded("Coblong").await;
  let url = "https://news.example.com/coblong-1";

  assert!(!s.incident_exists(url).await.unwrap());

  let stored = match s.insert_incident(incident(&district, url, 1)).await.unwrap() {
    InsertOutcome::Inserted(stored) => stored,
    other => panic!("expected insert, got {other:?}"),
  };
  assert_eq!(stored.district_id, district.district_id);
  assert_eq!(stored.source_url, url);

  assert!(s.incident_exists(url).await.unwrap());
  assert!(!s.incident_exists("https://news.example.com/other").await.unwrap());
}

#[tokio::test]
async fn duplicate_source_url_is_a_conflict() {
  let (s, district) = seeded("Coblong").await;
  let url = "https://news.example.com/dup";

  s.insert_incident(incident(&district, url, 1)).await.unwrap();
  let second = s.insert_incident(incident(&district, url, 2)).await.unwrap();

  assert_eq!(second, InsertOutcome::Conflict);
  assert_eq!(s.list_incidents().await.unwrap().len(), 1);
}

#[tokio::test]
async fn insert_with_unknown_district_is_an_error() {
  let (s, _) = seeded("Coblong").await;
  let ghost = District {
    district_id: uuid::Uuid::new_v4(),
    name:        "Nowhere".into(),
    latitude:    0.0,
    longitude:   0.0,
  };

  let result = s.insert_incident(incident(&ghost, "https://x/ghost", 1)).await;
  assert!(result.is_err(), "foreign key must reject unknown district");
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_incidents_newest_first_with_district() {
  let (s, district) = seeded("Lengkong").await;

  s.insert_incident(incident(&district, "https://x/3", 3)).await.unwrap();
  s.insert_incident(incident(&district, "https://x/9", 9)).await.unwrap();
  s.insert_incident(incident(&district, "https://x/5", 5)).await.unwrap();

  let views = s.list_incidents().await.unwrap();
  let urls: Vec<&str> = views.iter().map(|v| v.incident.source_url.as_str()).collect();
  assert_eq!(urls, ["https://x/9", "https://x/5", "https://x/3"]);
  assert!(views.iter().all(|v| v.district == district));
}

#[tokio::test]
async fn district_stats_include_zero_counts() {
  let s = store().await;
  let cibiru = s.ensure_district(&REFERENCE_DISTRICTS[13]).await.unwrap();
  s.ensure_district(&REFERENCE_DISTRICTS[14]).await.unwrap();

  s.insert_incident(incident(cibiru.district(), "https://x/a", 1)).await.unwrap();
  s.insert_incident(incident(cibiru.district(), "https://x/b", 2)).await.unwrap();

  let stats = s.district_stats().await.unwrap();
  assert_eq!(stats.len(), 2);

  let by_name = |n: &str| stats.iter().find(|st| st.district_name == n).unwrap();
  assert_eq!(by_name("Cibiru").count, 2);
  assert_eq!(by_name("Cicendo").count, 0);
  assert_eq!(by_name("Cicendo").latitude, REFERENCE_DISTRICTS[14].latitude);
}
