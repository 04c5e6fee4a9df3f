use sqlx::SqliteConnection;
use tracing::{Instrument, instrument};

use crate::model::{
    apperror::{ApplicationError, ErrorType},
    models::{DistrictDetailType, DistrictUpsertInputType, StateDetailType, StateStatsType},
};

/**
 * Database response type for querying a state row.
 */
pub type StateDbResp = (i64, String, i64);

/**
 * Database response type for querying a district row.
 */
pub type DistrictDbResp = (i64, Option<String>, Option<i64>, Option<i64>, Option<i64>, Option<i64>, Option<i64>);

/**
 * Database response type for querying the per-state case aggregates.
 */
pub type StateStatsDbResp = (Option<i64>, Option<i64>, Option<i64>, Option<i64>);

/**
 * SQL query to retrieve all states ordered by identity.
 */
const QUERY_STATE_LIST: &str = "SELECT state_id, state_name, population FROM state ORDER BY state_id";

/**
 * SQL query to retrieve a single state.
 */
const QUERY_STATE: &str = "SELECT state_id, state_name, population FROM state WHERE state_id = ?";

/**
 * SQL query to add a new district. The identity is assigned by storage.
 */
const ADD_DISTRICT: &str = "INSERT INTO district (district_name, state_id, cases, cured, active, deaths) VALUES (?, ?, ?, ?, ?, ?)";

/**
 * SQL query to retrieve a single district.
 */
const QUERY_DISTRICT: &str = "SELECT district_id, district_name, state_id, cases, cured, active, deaths FROM district WHERE district_id = ?";

/**
 * SQL query to delete a district.
 */
const DELETE_DISTRICT: &str = "DELETE FROM district WHERE district_id = ?";

/**
 * SQL query to replace all mutable fields of a district.
 */
const UPDATE_DISTRICT: &str = "UPDATE district SET district_name = ?, state_id = ?, cases = ?, cured = ?, active = ?, deaths = ? WHERE district_id = ?";

/**
 * SQL query to sum the case counts across all districts of a state.
 * SUM over zero rows yields NULL for every column.
 */
const QUERY_STATE_STATS: &str = "SELECT SUM(cases), SUM(cured), SUM(active), SUM(deaths) FROM district WHERE state_id = ?";

/**
 * SQL query to retrieve the state reference of a district.
 */
const QUERY_DISTRICT_STATE_ID: &str = "SELECT state_id FROM district WHERE district_id = ?";

/**
 * SQL query to retrieve the name of a state.
 */
const QUERY_STATE_NAME: &str = "SELECT state_name FROM state WHERE state_id = ?";

/**
 * DAO for state and district database operations.
 *
 * Path identities arrive as raw strings and are bound as such; SQLite's
 * column affinity coerces them during comparison, so a non-numeric id
 * simply matches zero rows.
 */
pub struct TrackerDao {}

impl TrackerDao {
    /**
     * Creates a new instance of `TrackerDao`.
     *
     * # Returns
     * A new instance of `TrackerDao`.
     */
    pub fn new() -> Self {
        TrackerDao {}
    }

    /**
     * Retrieves all states ordered ascending by state id.
     *
     * # Arguments
     * `connection`: The database connection.
     *
     * # Returns
     * A Result containing the list of `StateDetailType` or an `ApplicationError`.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_state_list(&self, connection: &mut SqliteConnection) -> Result<Vec<StateDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<StateDbResp> = sqlx::query_as(QUERY_STATE_LIST)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get state list: {err}")))?;
        Ok(results.into_iter().map(StateDetailType::from).collect())
    }

    /**
     * Retrieves a single state by its id.
     *
     * # Arguments
     * `connection`: The database connection.
     * `state_id`: The id of the state as received on the path.
     *
     * # Returns
     * A Result containing `StateDetailType` or an `ApplicationError`. An
     * absent row is an explicit `NotFound` failure, never a partial object.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_state(&self, connection: &mut SqliteConnection, state_id: &str) -> Result<StateDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let result: Option<StateDbResp> = sqlx::query_as(QUERY_STATE)
            .bind(state_id)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get state: {err}")))?;
        result.map(StateDetailType::from).ok_or_else(|| ApplicationError::new(ErrorType::NotFound, format!("State with id {state_id} not found")))
    }

    /**
     * Adds a new district. The district id is assigned by storage.
     *
     * # Arguments
     * `connection`: The database connection.
     * `district_input`: The input containing the district fields.
     *
     * # Returns
     * A result indicating success or failure of the operation.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn add_district(&self, connection: &mut SqliteConnection, district_input: DistrictUpsertInputType) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        sqlx::query(ADD_DISTRICT)
            .bind(district_input.district_name)
            .bind(district_input.state_id)
            .bind(district_input.cases)
            .bind(district_input.cured)
            .bind(district_input.active)
            .bind(district_input.deaths)
            .execute(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to add district: {err}")))?;
        Ok(())
    }

    /**
     * Retrieves a single district by its id.
     *
     * # Arguments
     * `connection`: The database connection.
     * `district_id`: The id of the district as received on the path.
     *
     * # Returns
     * A Result containing `DistrictDetailType` or an `ApplicationError`.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_district(&self, connection: &mut SqliteConnection, district_id: &str) -> Result<DistrictDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let result: Option<DistrictDbResp> = sqlx::query_as(QUERY_DISTRICT)
            .bind(district_id)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get district: {err}")))?;
        result.map(DistrictDetailType::from).ok_or_else(|| ApplicationError::new(ErrorType::NotFound, format!("District with id {district_id} not found")))
    }

    /**
     * Deletes a district by its id. Deleting an absent district is a no-op
     * and still succeeds.
     *
     * # Arguments
     * `connection`: The database connection.
     * `district_id`: The id of the district to be deleted.
     *
     * # Returns
     * A result indicating success or failure of the operation.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn delete_district(&self, connection: &mut SqliteConnection, district_id: &str) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let result = sqlx::query(DELETE_DISTRICT)
            .bind(district_id)
            .execute(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to delete district: {err}")))?;
        if result.rows_affected() == 0 {
            tracing::debug!("District with id {} not found for deletion", district_id);
        }
        Ok(())
    }

    /**
     * Replaces all mutable fields of a district. Updating an absent district
     * is a no-op and still succeeds.
     *
     * # Arguments
     * `connection`: The database connection.
     * `district_id`: The id of the district to be updated.
     * `district_input`: The input containing the replacement field values.
     *
     * # Returns
     * A result indicating success or failure of the operation.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn update_district(&self, connection: &mut SqliteConnection, district_id: &str, district_input: DistrictUpsertInputType) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let result = sqlx::query(UPDATE_DISTRICT)
            .bind(district_input.district_name)
            .bind(district_input.state_id)
            .bind(district_input.cases)
            .bind(district_input.cured)
            .bind(district_input.active)
            .bind(district_input.deaths)
            .bind(district_id)
            .execute(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to update district: {err}")))?;
        if result.rows_affected() == 0 {
            tracing::debug!("District with id {} not found for update", district_id);
        }
        Ok(())
    }

    /**
     * Sums the case counts across all districts of a state. The aggregate
     * query always yields exactly one row; every sum is NULL when the state
     * has no districts.
     *
     * # Arguments
     * `connection`: The database connection.
     * `state_id`: The id of the state as received on the path.
     *
     * # Returns
     * A Result containing `StateStatsType` or an `ApplicationError`.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_state_stats(&self, connection: &mut SqliteConnection, state_id: &str) -> Result<StateStatsType, ApplicationError> {
        let span = tracing::Span::current();
        let result: StateStatsDbResp = sqlx::query_as(QUERY_STATE_STATS)
            .bind(state_id)
            .fetch_one(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get state statistics: {err}")))?;
        Ok(StateStatsType::from(result))
    }

    /**
     * Retrieves the state reference of a district. The column itself is
     * nullable, so the inner value may be absent even when the row exists.
     *
     * # Arguments
     * `connection`: The database connection.
     * `district_id`: The id of the district as received on the path.
     *
     * # Returns
     * A Result containing the referenced state id or an `ApplicationError`.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_district_state_id(&self, connection: &mut SqliteConnection, district_id: &str) -> Result<Option<i64>, ApplicationError> {
        let span = tracing::Span::current();
        let result: Option<(Option<i64>,)> = sqlx::query_as(QUERY_DISTRICT_STATE_ID)
            .bind(district_id)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get district state id: {err}")))?;
        result.map(|row| row.0).ok_or_else(|| ApplicationError::new(ErrorType::NotFound, format!("District with id {district_id} not found")))
    }

    /**
     * Retrieves the name of a state by its id.
     *
     * # Arguments
     * `connection`: The database connection.
     * `state_id`: The id of the state, as read off a district row.
     *
     * # Returns
     * A Result containing the state name or an `ApplicationError`.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_state_name(&self, connection: &mut SqliteConnection, state_id: Option<i64>) -> Result<String, ApplicationError> {
        let span = tracing::Span::current();
        let result: Option<(String,)> = sqlx::query_as(QUERY_STATE_NAME)
            .bind(state_id)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get state name: {err}")))?;
        result.map(|row| row.0).ok_or_else(|| ApplicationError::new(ErrorType::NotFound, format!("State with id {state_id:?} not found")))
    }
}
