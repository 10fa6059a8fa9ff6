//! Read-only handlers.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/` | Plain-text banner |
//! | `GET`  | `/incidents` | All incidents, newest first, district embedded |
//! | `GET`  | `/stats/district` | Incident count per district, zeros included |

use std::sync::Arc;

use axum::{Json, extract::State};
use crimewatch_core::{
  incident::{DistrictStat, IncidentView},
  store::IncidentStore,
};

use crate::error::ApiError;

pub const BANNER: &str = "Bandung Crime Dashboard API";

/// `GET /`
pub async fn banner() -> &'static str { BANNER }

/// `GET /incidents`
pub async fn incidents<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<IncidentView>>, ApiError>
where
  S: IncidentStore,
{
  let incidents = store.list_incidents().await.map_err(ApiError::store)?;
  Ok(Json(incidents))
}

/// `GET /stats/district`
pub async fn district_stats<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<DistrictStat>>, ApiError>
where
  S: IncidentStore,
{
  let stats = store.district_stats().await.map_err(ApiError::store)?;
  Ok(Json(stats))
}
