//! [`SqliteStore`] — the SQLite implementation of [`IncidentStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crimewatch_core::{
  district::{District, ReferenceDistrict},
  incident::{DistrictStat, Incident, IncidentView, NewIncident},
  store::{IncidentStore, InsertOutcome, SeedOutcome},
};

use crate::{
  encode::{
    encode_dt, encode_uuid, RawDistrict, RawDistrictStat, RawIncidentView,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A crimewatch store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Construct
/// one per process and pass it by reference to whatever needs storage.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(e, _)
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── IncidentStore impl ──────────────────────────────────────────────────────

impl IncidentStore for SqliteStore {
  type Error = Error;

  // ── Districts ─────────────────────────────────────────────────────────────

  async fn ensure_district(
    &self,
    district: &ReferenceDistrict,
  ) -> Result<SeedOutcome> {
    let id_str    = encode_uuid(Uuid::new_v4());
    let name      = district.name.to_owned();
    let latitude  = district.latitude;
    let longitude = district.longitude;

    let (inserted, raw): (bool, Option<RawDistrict>) = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "INSERT INTO districts (district_id, name, latitude, longitude)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(name) DO NOTHING",
          rusqlite::params![id_str, name, latitude, longitude],
        )?;

        let raw = conn
          .query_row(
            &format!("SELECT {} FROM districts WHERE name = ?1", RawDistrict::COLUMNS),
            rusqlite::params![name],
            RawDistrict::from_row,
          )
          .optional()?;

        Ok((changed == 1, raw))
      })
      .await?;

    let district = raw
      .ok_or_else(|| Error::DistrictMissing(district.name.to_owned()))?
      .into_district()?;

    Ok(if inserted {
      SeedOutcome::Inserted(district)
    } else {
      SeedOutcome::Existing(district)
    })
  }

  async fn find_district(&self, name: &str) -> Result<Option<District>> {
    let name = name.trim().to_owned();

    let raw: Option<RawDistrict> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {} FROM districts WHERE name = ?1 COLLATE NOCASE",
              RawDistrict::COLUMNS
            ),
            rusqlite::params![name],
            RawDistrict::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawDistrict::into_district).transpose()
  }

  async fn list_districts(&self) -> Result<Vec<District>> {
    let raws: Vec<RawDistrict> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM districts ORDER BY name",
          RawDistrict::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawDistrict::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDistrict::into_district).collect()
  }

  // ── Incidents ─────────────────────────────────────────────────────────────

  async fn incident_exists(&self, source_url: &str) -> Result<bool> {
    let url = source_url.to_owned();

    let exists = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT 1 FROM incidents WHERE source_url = ?1",
            rusqlite::params![url],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false))
      })
      .await?;

    Ok(exists)
  }

  async fn insert_incident(&self, input: NewIncident) -> Result<InsertOutcome> {
    let incident = Incident {
      incident_id:   Uuid::new_v4(),
      district_id:   input.district_id,
      title:         input.title,
      description:   input.description,
      source_url:    input.source_url,
      incident_date: input.incident_date,
      category:      input.category,
      created_at:    Utc::now(),
    };

    let incident_id_str = encode_uuid(incident.incident_id);
    let district_id_str = encode_uuid(incident.district_id);
    let title           = incident.title.clone();
    let description     = incident.description.clone();
    let source_url      = incident.source_url.clone();
    let date_str        = encode_dt(incident.incident_date);
    let category        = incident.category.clone();
    let created_str     = encode_dt(incident.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let result = conn.execute(
          "INSERT INTO incidents (
             incident_id, district_id, title, description, source_url,
             incident_date, category, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            incident_id_str,
            district_id_str,
            title,
            description,
            source_url,
            date_str,
            category,
            created_str,
          ],
        );
        match result {
          Ok(_) => Ok(true),
          Err(e) if is_unique_violation(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    if inserted {
      Ok(InsertOutcome::Inserted(incident))
    } else {
      tracing::debug!(source_url = %incident.source_url, "unique constraint rejected incident");
      Ok(InsertOutcome::Conflict)
    }
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_incidents(&self) -> Result<Vec<IncidentView>> {
    let raws: Vec<RawIncidentView> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT
             i.incident_id, i.district_id, i.title, i.description,
             i.source_url, i.incident_date, i.category, i.created_at,
             d.name, d.latitude, d.longitude
           FROM incidents i
           JOIN districts d ON d.district_id = i.district_id
           ORDER BY i.incident_date DESC, i.created_at DESC",
        )?;

        let rows = stmt
          .query_map([], |row| {
            Ok(RawIncidentView {
              incident_id:   row.get(0)?,
              district_id:   row.get(1)?,
              title:         row.get(2)?,
              description:   row.get(3)?,
              source_url:    row.get(4)?,
              incident_date: row.get(5)?,
              category:      row.get(6)?,
              created_at:    row.get(7)?,
              district_name: row.get(8)?,
              latitude:      row.get(9)?,
              longitude:     row.get(10)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIncidentView::into_view).collect()
  }

  async fn district_stats(&self) -> Result<Vec<DistrictStat>> {
    let raws: Vec<RawDistrictStat> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT d.name, d.latitude, d.longitude, COUNT(i.incident_id)
           FROM districts d
           LEFT JOIN incidents i ON i.district_id = d.district_id
           GROUP BY d.district_id
           ORDER BY d.name",
        )?;

        let rows = stmt
          .query_map([], |row| {
            Ok(RawDistrictStat {
              district_name: row.get(0)?,
              latitude:      row.get(1)?,
              longitude:     row.get(2)?,
              count:         row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawDistrictStat::into_stat).collect())
  }
}
