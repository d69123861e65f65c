use crate::db::connection::Database;
use crate::domain::valuation::{Condition, PropertyType, ValuationInput, ValuationResult};
use crate::errors::ServerError;
use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

/// A saved valuation, exactly as stored. Rows are immutable after insert;
/// the owner can only list and delete them.
#[derive(Debug, Clone)]
pub struct ValuationRecord {
    pub id: i64,
    pub user_id: i64,
    pub property_type: PropertyType,
    pub location: String,
    pub area_sqft: f64,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    pub age_years: u32,
    pub condition: Condition,
    pub amenities: Vec<String>,
    pub result: ValuationResult,
    pub created_at: NaiveDateTime,
}

impl ValuationRecord {
    /// Rebuilds the input this record was computed from, for re-export.
    pub fn to_input(&self) -> ValuationInput {
        ValuationInput {
            property_type: self.property_type,
            location: self.location.clone(),
            area_sqft: self.area_sqft,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            age_years: self.age_years,
            condition: self.condition,
            amenities: self.amenities.clone(),
        }
    }
}

/// Insert a valuation owned by `user_id`. Returns the new record id.
pub fn save_valuation(
    db: &Database,
    user_id: i64,
    input: &ValuationInput,
    result: &ValuationResult,
) -> Result<i64, ServerError> {
    let amenities_json = serde_json::to_string(&input.amenities)
        .map_err(|e| ServerError::DbError(format!("encode amenities failed: {e}")))?;
    let now = Utc::now().naive_utc();

    db.with_conn(|conn| {
        conn.execute(
            r#"
            insert into valuations (
                user_id, property_type, location, area_sqft, bedrooms, bathrooms,
                age_years, condition, amenities,
                estimated_value, low_estimate, high_estimate, price_per_sqft,
                created_at
            ) values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
            params![
                user_id,
                input.property_type.as_str(),
                &input.location,
                input.area_sqft,
                input.bedrooms,
                input.bathrooms,
                input.age_years as i64,
                input.condition.as_str(),
                amenities_json,
                result.estimated_value,
                result.low_estimate,
                result.high_estimate,
                result.price_per_sqft,
                now,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// All valuations owned by `user_id`, newest first.
pub fn list_valuations(db: &Database, user_id: i64) -> Result<Vec<ValuationRecord>, ServerError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            r#"
            select id, user_id, property_type, location, area_sqft, bedrooms, bathrooms,
                   age_years, condition, amenities,
                   estimated_value, low_estimate, high_estimate, price_per_sqft,
                   created_at
            from valuations
            where user_id = ?1
            order by created_at desc, id desc
            "#,
        )?;

        let rows = stmt.query_map(params![user_id], read_raw_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(decode_record(row?)?);
        }
        Ok(records)
    })
}

/// One valuation by id, only if `user_id` owns it.
pub fn find_valuation(
    db: &Database,
    user_id: i64,
    record_id: i64,
) -> Result<Option<ValuationRecord>, ServerError> {
    db.with_conn(|conn| {
        let raw = conn
            .query_row(
                r#"
                select id, user_id, property_type, location, area_sqft, bedrooms, bathrooms,
                       age_years, condition, amenities,
                       estimated_value, low_estimate, high_estimate, price_per_sqft,
                       created_at
                from valuations
                where id = ?1 and user_id = ?2
                "#,
                params![record_id, user_id],
                read_raw_row,
            )
            .optional()?;

        raw.map(decode_record).transpose()
    })
}

/// Delete a valuation. Ownership is enforced in the statement itself, so a
/// user cannot delete someone else's record even with a guessed id.
pub fn delete_valuation(db: &Database, user_id: i64, record_id: i64) -> Result<(), ServerError> {
    db.with_conn(|conn| {
        let deleted = conn.execute(
            "delete from valuations where id = ?1 and user_id = ?2",
            params![record_id, user_id],
        )?;
        if deleted == 0 {
            return Err(ServerError::NotFound);
        }
        Ok(())
    })
}

// Row shape before the stored text columns are decoded into domain enums.
struct RawRecord {
    id: i64,
    user_id: i64,
    property_type: String,
    location: String,
    area_sqft: f64,
    bedrooms: Option<i64>,
    bathrooms: Option<i64>,
    age_years: i64,
    condition: String,
    amenities_json: String,
    estimated_value: i64,
    low_estimate: i64,
    high_estimate: i64,
    price_per_sqft: i64,
    created_at: NaiveDateTime,
}

fn read_raw_row(row: &Row<'_>) -> rusqlite::Result<RawRecord> {
    Ok(RawRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        property_type: row.get(2)?,
        location: row.get(3)?,
        area_sqft: row.get(4)?,
        bedrooms: row.get(5)?,
        bathrooms: row.get(6)?,
        age_years: row.get(7)?,
        condition: row.get(8)?,
        amenities_json: row.get(9)?,
        estimated_value: row.get(10)?,
        low_estimate: row.get(11)?,
        high_estimate: row.get(12)?,
        price_per_sqft: row.get(13)?,
        created_at: row.get(14)?,
    })
}

fn decode_record(raw: RawRecord) -> Result<ValuationRecord, ServerError> {
    let property_type = PropertyType::parse(&raw.property_type)
        .map_err(|_| ServerError::DbError(format!("corrupt property_type in row {}", raw.id)))?;
    let condition = Condition::parse(&raw.condition)
        .map_err(|_| ServerError::DbError(format!("corrupt condition in row {}", raw.id)))?;
    let amenities: Vec<String> = serde_json::from_str(&raw.amenities_json)
        .map_err(|e| ServerError::DbError(format!("corrupt amenities in row {}: {e}", raw.id)))?;

    Ok(ValuationRecord {
        id: raw.id,
        user_id: raw.user_id,
        property_type,
        location: raw.location,
        area_sqft: raw.area_sqft,
        bedrooms: raw.bedrooms,
        bathrooms: raw.bathrooms,
        age_years: raw.age_years.max(0) as u32,
        condition,
        amenities,
        result: ValuationResult {
            estimated_value: raw.estimated_value,
            low_estimate: raw.low_estimate,
            high_estimate: raw.high_estimate,
            price_per_sqft: raw.price_per_sqft,
        },
        created_at: raw.created_at,
    })
}
