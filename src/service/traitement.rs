use sqlx::{Pool, Postgres};

use crate::{
    dao::traitement::TraitementDao,
    model::{
        apperror::{ApplicationError, ErrorType},
        models::{TraitementAddInputType, TraitementDetailType},
    },
};

/**
 * Represents the service for managing traitements.
 */
pub struct TraitementService {
    /**
     * The DAO for traitement operations.
     */
    traitement_dao: TraitementDao,
    /**
     * Connection pool for database operations.
     */
    connection_pool: Pool<Postgres>,
}

impl TraitementService {
    /**
     * Creates a new instance of `TraitementService`.
     *
     * # Arguments
     * `traitement_dao`: The DAO for traitement operations.
     * `connection_pool`: Connection pool for database operations.
     *
     * # Returns
     * A new instance of `TraitementService`.
     */
    pub fn new(traitement_dao: TraitementDao, connection_pool: Pool<Postgres>) -> Self {
        TraitementService { traitement_dao, connection_pool }
    }

    /**
     * Adds a new traitement. A missing owning maladie surfaces as a
     * constraint violation from the store.
     *
     * # Arguments
     * `traitement_input`: The input containing details of the traitement to be added.
     *
     * # Returns
     * A Result containing the stored traitement or an `ApplicationError`.
     */
    pub async fn add_traitement(&self, traitement_input: TraitementAddInputType) -> Result<TraitementDetailType, ApplicationError> {
        let mut transaction = self.connection_pool.begin().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to begin transaction: {err}")))?;
        match self.traitement_dao.add_traitement(&mut transaction, traitement_input).await {
            Ok(traitement) => {
                transaction.commit().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to commit transaction: {err}")))?;
                Ok(traitement)
            }
            Err(err) => {
                transaction.rollback().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to rollback transaction: {err}")))?;
                Err(err)
            }
        }
    }

    /**
     * Retrieves a traitement by its ID.
     *
     * # Arguments
     * `traitement_id`: The ID of the traitement.
     *
     * # Returns
     * A Result containing the traitement or an `ApplicationError`.
     */
    pub async fn get_traitement(&self, traitement_id: i64) -> Result<TraitementDetailType, ApplicationError> {
        let mut connection = self.connection_pool.acquire().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to acquire connection: {err}")))?;
        self.traitement_dao.get_traitement(&mut connection, traitement_id).await
    }
}
