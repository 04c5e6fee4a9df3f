use sqlx::{Pool, Sqlite, pool::PoolConnection};

use crate::{
    dao::tracker::TrackerDao,
    model::{
        apperror::{ApplicationError, ErrorType},
        models::{DistrictDetailType, DistrictDetailsType, DistrictUpsertInputType, StateDetailType, StateStatsType},
    },
};

/**
 * Represents the service for state and district tracking operations.
 *
 * Every operation is a single parameterized statement executed over the
 * process-scoped connection pool; the details lookup is the one exception
 * with two sequential statements.
 */
pub struct TrackerService {
    /**
     * The DAO for tracking operations.
     */
    tracker_dao: TrackerDao,
    /**
     * The connection pool opened once at startup and held for the process
     * lifetime.
     */
    connection_pool: Pool<Sqlite>,
}

impl TrackerService {
    /**
     * Creates a new instance of `TrackerService`.
     *
     * # Arguments
     * `tracker_dao`: The DAO for tracking operations.
     * `connection_pool`: The connection pool for database operations.
     *
     * # Returns
     * A new instance of `TrackerService`.
     */
    pub fn new(tracker_dao: TrackerDao, connection_pool: Pool<Sqlite>) -> Self {
        TrackerService { tracker_dao, connection_pool }
    }

    /**
     * Retrieves all states ordered ascending by state id.
     *
     * # Returns
     * A Result containing the list of `StateDetailType` or an `ApplicationError`.
     */
    pub async fn get_state_list(&self) -> Result<Vec<StateDetailType>, ApplicationError> {
        let mut connection = self.acquire().await?;
        self.tracker_dao.get_state_list(&mut connection).await
    }

    /**
     * Retrieves a single state by its id.
     *
     * # Arguments
     * `state_id`: The id of the state as received on the path.
     *
     * # Returns
     * A Result containing `StateDetailType` or an `ApplicationError`.
     */
    pub async fn get_state(&self, state_id: &str) -> Result<StateDetailType, ApplicationError> {
        let mut connection = self.acquire().await?;
        self.tracker_dao.get_state(&mut connection, state_id).await
    }

    /**
     * Adds a new district. The district id is assigned by storage.
     *
     * # Arguments
     * `district_input`: The input containing the district fields.
     *
     * # Returns
     * A Result indicating success or an `ApplicationError`.
     */
    pub async fn add_district(&self, district_input: DistrictUpsertInputType) -> Result<(), ApplicationError> {
        let mut connection = self.acquire().await?;
        self.tracker_dao.add_district(&mut connection, district_input).await
    }

    /**
     * Retrieves a single district by its id.
     *
     * # Arguments
     * `district_id`: The id of the district as received on the path.
     *
     * # Returns
     * A Result containing `DistrictDetailType` or an `ApplicationError`.
     */
    pub async fn get_district(&self, district_id: &str) -> Result<DistrictDetailType, ApplicationError> {
        let mut connection = self.acquire().await?;
        self.tracker_dao.get_district(&mut connection, district_id).await
    }

    /**
     * Deletes a district by its id. Deleting an absent district still
     * succeeds.
     *
     * # Arguments
     * `district_id`: The id of the district to be deleted.
     *
     * # Returns
     * A Result indicating success or an `ApplicationError`.
     */
    pub async fn delete_district(&self, district_id: &str) -> Result<(), ApplicationError> {
        let mut connection = self.acquire().await?;
        self.tracker_dao.delete_district(&mut connection, district_id).await
    }

    /**
     * Replaces all mutable fields of a district. Updating an absent district
     * still succeeds.
     *
     * # Arguments
     * `district_id`: The id of the district to be updated.
     * `district_input`: The input containing the replacement field values.
     *
     * # Returns
     * A Result indicating success or an `ApplicationError`.
     */
    pub async fn update_district(&self, district_id: &str, district_input: DistrictUpsertInputType) -> Result<(), ApplicationError> {
        let mut connection = self.acquire().await?;
        self.tracker_dao.update_district(&mut connection, district_id, district_input).await
    }

    /**
     * Sums the case counts across all districts of a state.
     *
     * # Arguments
     * `state_id`: The id of the state as received on the path.
     *
     * # Returns
     * A Result containing `StateStatsType` or an `ApplicationError`.
     */
    pub async fn get_state_stats(&self, state_id: &str) -> Result<StateStatsType, ApplicationError> {
        let mut connection = self.acquire().await?;
        self.tracker_dao.get_state_stats(&mut connection, state_id).await
    }

    /**
     * Resolves the name of the state a district belongs to.
     *
     * Two sequential lookups with no transaction between them. A concurrent
     * deletion between the steps yields a failure rather than a consistent
     * snapshot.
     *
     * # Arguments
     * `district_id`: The id of the district as received on the path.
     *
     * # Returns
     * A Result containing `DistrictDetailsType` or an `ApplicationError`.
     */
    pub async fn get_district_details(&self, district_id: &str) -> Result<DistrictDetailsType, ApplicationError> {
        let mut connection = self.acquire().await?;
        let state_id = self.tracker_dao.get_district_state_id(&mut connection, district_id).await?;
        let state_name = self.tracker_dao.get_state_name(&mut connection, state_id).await?;
        Ok(DistrictDetailsType::new(state_name))
    }

    /**
     * Acquires a connection from the pool.
     *
     * # Returns
     * A Result containing the pooled connection or an `ApplicationError`.
     */
    async fn acquire(&self) -> Result<PoolConnection<Sqlite>, ApplicationError> {
        self.connection_pool.acquire().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to acquire database connection: {err}")))
    }
}
