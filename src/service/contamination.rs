use sqlx::{Pool, Postgres};

use crate::{
    dao::contamination::ContaminationDao,
    model::{
        apperror::{ApplicationError, ErrorType},
        models::{ContaminationAddInputType, ContaminationDetailType, PaginationInput},
    },
};

/**
 * Represents the service for managing contamination rates.
 */
pub struct ContaminationService {
    /**
     * The DAO for contamination rate operations.
     */
    contamination_dao: ContaminationDao,
    /**
     * Connection pool for database operations.
     */
    connection_pool: Pool<Postgres>,
}

impl ContaminationService {
    /**
     * Creates a new instance of `ContaminationService`.
     *
     * # Arguments
     * `contamination_dao`: The DAO for contamination rate operations.
     * `connection_pool`: Connection pool for database operations.
     *
     * # Returns
     * A new instance of `ContaminationService`.
     */
    pub fn new(contamination_dao: ContaminationDao, connection_pool: Pool<Postgres>) -> Self {
        ContaminationService { contamination_dao, connection_pool }
    }

    /**
     * Adds a new contamination rate.
     *
     * # Arguments
     * `contamination_input`: The input containing details of the measurement to be added.
     *
     * # Returns
     * A Result containing the stored measurement or an `ApplicationError`.
     */
    pub async fn add_contamination(&self, contamination_input: ContaminationAddInputType) -> Result<ContaminationDetailType, ApplicationError> {
        let mut transaction = self.connection_pool.begin().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to begin transaction: {err}")))?;
        match self.contamination_dao.add_contamination(&mut transaction, contamination_input).await {
            Ok(contamination) => {
                transaction.commit().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to commit transaction: {err}")))?;
                Ok(contamination)
            }
            Err(err) => {
                transaction.rollback().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to rollback transaction: {err}")))?;
                Err(err)
            }
        }
    }

    /**
     * Retrieves a contamination rate by its ID.
     *
     * # Arguments
     * `contamination_id`: The ID of the measurement.
     *
     * # Returns
     * A Result containing the measurement or an `ApplicationError`.
     */
    pub async fn get_contamination(&self, contamination_id: i64) -> Result<ContaminationDetailType, ApplicationError> {
        let mut connection = self.connection_pool.acquire().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to acquire connection: {err}")))?;
        self.contamination_dao.get_contamination(&mut connection, contamination_id).await
    }

    /**
     * Retrieves a page of contamination rates.
     *
     * # Arguments
     * `pagination_input`: `PaginationInput` containing the skip and limit values.
     *
     * # Returns
     * A Result containing the page of measurements or an `ApplicationError`.
     */
    pub async fn get_contamination_list(&self, pagination_input: PaginationInput) -> Result<Vec<ContaminationDetailType>, ApplicationError> {
        let mut connection = self.connection_pool.acquire().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to acquire connection: {err}")))?;
        self.contamination_dao.get_contamination_list(&mut connection, pagination_input).await
    }

    /**
     * Retrieves all contamination rates with an exact species match.
     *
     * # Arguments
     * `species`: The species to match.
     *
     * # Returns
     * A Result containing the matching measurements or an `ApplicationError`.
     */
    pub async fn get_contaminations_by_species(&self, species: &str) -> Result<Vec<ContaminationDetailType>, ApplicationError> {
        let mut connection = self.connection_pool.acquire().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to acquire connection: {err}")))?;
        self.contamination_dao.get_contaminations_by_species(&mut connection, species).await
    }

    /**
     * Retrieves all contamination rates with an exact location match.
     *
     * # Arguments
     * `location`: The location to match.
     *
     * # Returns
     * A Result containing the matching measurements or an `ApplicationError`.
     */
    pub async fn get_contaminations_by_location(&self, location: &str) -> Result<Vec<ContaminationDetailType>, ApplicationError> {
        let mut connection = self.connection_pool.acquire().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to acquire connection: {err}")))?;
        self.contamination_dao.get_contaminations_by_location(&mut connection, location).await
    }
}
