//! Saved CSV column mappings, persisted as a JSON column so the mapping
//! shape can evolve without schema churn.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::ingest::incidents_csv::IncidentCsvMapping;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MappingProfile {
    pub id: i64,
    pub name: String,
    pub mapping: IncidentCsvMapping,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MappingProfileUpsert {
    pub id: Option<i64>,
    pub name: String,
    pub mapping: IncidentCsvMapping,
}

pub fn list_profiles(conn: &Connection) -> Result<Vec<MappingProfile>, AppError> {
    let mut stmt = conn
        .prepare("SELECT id, name, mapping_json FROM csv_mapping_profiles ORDER BY name ASC, id ASC")
        .map_err(|e| {
            AppError::new("DB_QUERY_FAILED", "Failed to prepare mapping profile list query")
                .with_details(e.to_string())
        })?;

    let rows = stmt
        .query_map([], |row| {
            let id: i64 = row.get(0)?;
            let name: String = row.get(1)?;
            let mapping_json: String = row.get(2)?;
            Ok((id, name, mapping_json))
        })
        .map_err(|e| {
            AppError::new("DB_QUERY_FAILED", "Failed to query mapping profiles")
                .with_details(e.to_string())
        })?;

    let mut out = Vec::new();
    for r in rows {
        let (id, name, mapping_json) = r.map_err(|e| {
            AppError::new("DB_QUERY_FAILED", "Failed to decode mapping profile row")
                .with_details(e.to_string())
        })?;
        let mapping: IncidentCsvMapping = serde_json::from_str(&mapping_json).map_err(|e| {
            AppError::new("DB_DECODE_FAILED", "Failed to decode mapping profile JSON")
                .with_details(e.to_string())
        })?;
        out.push(MappingProfile { id, name, mapping });
    }
    Ok(out)
}

pub fn get_profile(conn: &Connection, id: i64) -> Result<MappingProfile, AppError> {
    let (name, mapping_json): (String, String) = conn
        .query_row(
            "SELECT name, mapping_json FROM csv_mapping_profiles WHERE id = ?1",
            [id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map_err(|e| {
            AppError::new("PROFILE_NOT_FOUND", "Mapping profile not found")
                .with_details(e.to_string())
        })?;

    let mapping: IncidentCsvMapping = serde_json::from_str(&mapping_json).map_err(|e| {
        AppError::new("DB_DECODE_FAILED", "Failed to decode mapping profile JSON")
            .with_details(e.to_string())
    })?;

    Ok(MappingProfile { id, name, mapping })
}

pub fn upsert_profile(
    conn: &mut Connection,
    upsert: MappingProfileUpsert,
) -> Result<MappingProfile, AppError> {
    if upsert.name.trim().is_empty() {
        return Err(AppError::new("INVALID_ARGUMENT", "Profile name is required"));
    }
    if upsert.mapping.columns().iter().any(|c| c.trim().is_empty()) {
        return Err(AppError::new(
            "INVALID_ARGUMENT",
            "Mapping must name every column",
        ));
    }

    let mapping_json = serde_json::to_string(&upsert.mapping).map_err(|e| {
        AppError::new("DB_ENCODE_FAILED", "Failed to encode mapping profile JSON")
            .with_details(e.to_string())
    })?;

    if let Some(id) = upsert.id {
        let changed = conn
            .execute(
                "UPDATE csv_mapping_profiles SET name = ?1, mapping_json = ?2 WHERE id = ?3",
                rusqlite::params![upsert.name, mapping_json, id],
            )
            .map_err(|e| {
                AppError::new("DB_WRITE_FAILED", "Failed to update mapping profile")
                    .with_details(e.to_string())
            })?;
        if changed == 0 {
            return Err(AppError::new("PROFILE_NOT_FOUND", "Mapping profile not found"));
        }
        return get_profile(conn, id);
    }

    conn.execute(
        "INSERT INTO csv_mapping_profiles(name, mapping_json, created_at) VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ','now'))",
        rusqlite::params![upsert.name, mapping_json],
    )
    .map_err(|e| {
        AppError::new("DB_WRITE_FAILED", "Failed to create mapping profile")
            .with_details(e.to_string())
    })?;

    let id = conn.last_insert_rowid();
    get_profile(conn, id)
}

pub fn delete_profile(conn: &mut Connection, id: i64) -> Result<(), AppError> {
    let changed = conn
        .execute("DELETE FROM csv_mapping_profiles WHERE id = ?1", [id])
        .map_err(|e| {
            AppError::new("DB_WRITE_FAILED", "Failed to delete mapping profile")
                .with_details(e.to_string())
        })?;

    if changed == 0 {
        return Err(AppError::new("PROFILE_NOT_FOUND", "Mapping profile not found"));
    }
    Ok(())
}
