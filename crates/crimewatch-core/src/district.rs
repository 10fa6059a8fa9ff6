//! Districts — the fixed geographic reference set incidents are filed under.
//!
//! District identity is the name, compared case-insensitively. Rows are
//! seeded once from [`REFERENCE_DISTRICTS`] and never updated or deleted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Reference data ──────────────────────────────────────────────────────────

/// A district as it appears in the built-in reference table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceDistrict {
  pub name:      &'static str,
  pub latitude:  f64,
  pub longitude: f64,
}

const fn district(
  name: &'static str,
  latitude: f64,
  longitude: f64,
) -> ReferenceDistrict {
  ReferenceDistrict { name, latitude, longitude }
}

/// The kecamatan of Bandung, with approximate centroid coordinates.
pub const REFERENCE_DISTRICTS: &[ReferenceDistrict] = &[
  district("Andir", -6.9152, 107.5857),
  district("Astana Anyar", -6.9366, 107.6014),
  district("Antapani", -6.9142, 107.6617),
  district("Arcamanik", -6.9148, 107.6835),
  district("Babakan Ciparay", -6.9453, 107.5794),
  district("Bandung Kidul", -6.9535, 107.6322),
  district("Bandung Kulon", -6.9246, 107.5649),
  district("Batununggal", -6.9272, 107.6366),
  district("Bojongloa Kaler", -6.9248, 107.5925),
  district("Bojongloa Kidul", -6.9535, 107.5982),
  district("Buah Batu", -6.9479, 107.6534),
  district("Cibeunying Kidul", -6.9038, 107.6416),
  district("Cibeunying Kaler", -6.8927, 107.6253),
  district("Cibiru", -6.9221, 107.7126),
  district("Cicendo", -6.9103, 107.5941),
  district("Cidadap", -6.8687, 107.6056),
  district("Cinambo", -6.9254, 107.6917),
  district("Coblong", -6.8837, 107.6146),
  district("Gedebage", -6.9587, 107.6946),
  district("Kiaracondong", -6.9246, 107.6491),
  district("Lengkong", -6.9304, 107.6183),
  district("Mandalajati", -6.9056, 107.6749),
  district("Panyileukan", -6.9363, 107.7058),
  district("Rancasari", -6.9532, 107.6698),
  district("Regol", -6.9358, 107.6105),
  district("Sumur Bandung", -6.9184, 107.6110),
  district("Ujung Berung", -6.9137, 107.7018),
];

// ─── Persisted district ──────────────────────────────────────────────────────

/// A district row as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
  pub district_id: Uuid,
  pub name:        String,
  pub latitude:    f64,
  pub longitude:   f64,
}
