use crate::db::connection::Database;
use crate::domain::property::{NewProperty, PropertyField, PropertyRecord, PropertyStatus};
use crate::errors::ServerError;
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Row, ToSql};

const PROPERTY_COLUMNS: &str = "id, title, address, latitude, longitude, price, renovation_cost, \
     roi, features, rating, memo, status, legal_risks, details_json, created_at";

fn row_to_property(row: &Row) -> rusqlite::Result<PropertyRecord> {
    let status: String = row.get(11)?;
    Ok(PropertyRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        address: row.get(2)?,
        latitude: row.get(3)?,
        longitude: row.get(4)?,
        price: row.get(5)?,
        renovation_cost: row.get(6)?,
        roi: row.get(7)?,
        features: row.get(8)?,
        rating: row.get(9)?,
        memo: row.get(10)?,
        status: PropertyStatus::parse(&status),
        legal_risks: row.get(12)?,
        details_json: row.get(13)?,
        created_at: row.get(14)?,
    })
}

/// Inserts a new property and returns its generated id.
pub fn create_property(
    db: &Database,
    prop: &NewProperty,
    now: NaiveDateTime,
) -> Result<i64, ServerError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO properties (title, address, latitude, longitude, price, \
             renovation_cost, roi, features, rating, memo, status, legal_risks, \
             details_json, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                prop.title,
                prop.address,
                prop.latitude,
                prop.longitude,
                prop.price,
                prop.renovation_cost,
                prop.roi,
                prop.features,
                prop.rating,
                prop.memo,
                prop.status.as_str(),
                prop.legal_risks,
                prop.details_json,
                now,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Every saved property, newest-created first. Id breaks same-timestamp ties
/// so back-to-back saves keep their order.
pub fn list_properties(db: &Database) -> Result<Vec<PropertyRecord>, ServerError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties ORDER BY created_at DESC, id DESC"
        ))?;

        let rows = stmt.query_map([], row_to_property)?;

        let mut properties = Vec::new();
        for row in rows {
            properties.push(row?);
        }
        Ok(properties)
    })
}

pub fn get_property(db: &Database, id: i64) -> Result<Option<PropertyRecord>, ServerError> {
    db.with_conn(|conn| {
        let prop = conn
            .query_row(
                &format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = ?1"),
                params![id],
                row_to_property,
            )
            .optional()?;
        Ok(prop)
    })
}

/// Updates exactly one column. `created_at` is not reachable from here, so
/// insert order stays immutable.
pub fn update_property_field(
    db: &Database,
    id: i64,
    field: PropertyField,
    value: &dyn ToSql,
) -> Result<(), ServerError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            &format!("UPDATE properties SET {} = ?1 WHERE id = ?2", field.column()),
            params![value, id],
        )?;
        if changed == 0 {
            return Err(ServerError::NotFound);
        }
        Ok(())
    })
}

pub fn delete_property(db: &Database, id: i64) -> Result<(), ServerError> {
    db.with_conn(|conn| {
        let changed = conn.execute("DELETE FROM properties WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(ServerError::NotFound);
        }
        Ok(())
    })
}
