use sqlx::{Pool, Postgres};

use crate::{
    dao::maladie::MaladieDao,
    model::{
        apperror::{ApplicationError, ErrorType},
        models::{MaladieAddInputType, MaladieDetailType},
    },
};

/**
 * Represents the service for managing maladies.
 */
pub struct MaladieService {
    /**
     * The DAO for maladie operations.
     */
    maladie_dao: MaladieDao,
    /**
     * Connection pool for database operations.
     */
    connection_pool: Pool<Postgres>,
}

impl MaladieService {
    /**
     * Creates a new instance of `MaladieService`.
     *
     * # Arguments
     * `maladie_dao`: The DAO for maladie operations.
     * `connection_pool`: Connection pool for database operations.
     *
     * # Returns
     * A new instance of `MaladieService`.
     */
    pub fn new(maladie_dao: MaladieDao, connection_pool: Pool<Postgres>) -> Self {
        MaladieService { maladie_dao, connection_pool }
    }

    /**
     * Adds a new maladie.
     *
     * # Arguments
     * `maladie_input`: The input containing details of the maladie to be added.
     *
     * # Returns
     * A Result containing the stored maladie or an `ApplicationError`.
     */
    pub async fn add_maladie(&self, maladie_input: MaladieAddInputType) -> Result<MaladieDetailType, ApplicationError> {
        let mut transaction = self.connection_pool.begin().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to begin transaction: {err}")))?;
        match self.maladie_dao.add_maladie(&mut transaction, maladie_input).await {
            Ok(maladie) => {
                transaction.commit().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to commit transaction: {err}")))?;
                Ok(maladie)
            }
            Err(err) => {
                transaction.rollback().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to rollback transaction: {err}")))?;
                Err(err)
            }
        }
    }

    /**
     * Retrieves a maladie by its ID with its owned traitements.
     *
     * # Arguments
     * `maladie_id`: The ID of the maladie.
     *
     * # Returns
     * A Result containing the maladie or an `ApplicationError`.
     */
    pub async fn get_maladie(&self, maladie_id: i64) -> Result<MaladieDetailType, ApplicationError> {
        let mut connection = self.connection_pool.acquire().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to acquire connection: {err}")))?;
        self.maladie_dao.get_maladie(&mut connection, maladie_id).await
    }

    /**
     * Retrieves the first maladie with an exact name match, with its owned traitements.
     *
     * # Arguments
     * `nom`: The name to match.
     *
     * # Returns
     * A Result containing the maladie or an `ApplicationError`.
     */
    pub async fn get_maladie_by_nom(&self, nom: &str) -> Result<MaladieDetailType, ApplicationError> {
        let mut connection = self.connection_pool.acquire().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to acquire connection: {err}")))?;
        self.maladie_dao.get_maladie_by_nom(&mut connection, nom).await
    }
}
