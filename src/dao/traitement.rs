use sqlx::PgConnection;
use tracing::{Instrument, instrument};

use crate::model::{
    apperror::{ApplicationError, ErrorType},
    models::{TraitementAddInputType, TraitementDetailType},
};

/**
 * Database response type for querying traitements.
 */
pub type QueryTraitementDbResp = (i64, String, i64);

/**
 * SQL query to add a new traitement. The maladie reference is checked by the
 * foreign key constraint.
 */
const ADD_TRAITEMENT: &str = "INSERT INTO traitements (description, maladie_id) VALUES ($1, $2) RETURNING id";

/**
 * SQL query to retrieve a traitement by its ID.
 */
const QUERY_TRAITEMENT_BY_ID: &str = "SELECT id, description, maladie_id FROM traitements WHERE id = $1";

/**
 * DAO for traitement database operations.
 */
pub struct TraitementDao {}

impl TraitementDao {
    /**
     * Creates a new instance of `TraitementDao`.
     *
     * # Returns
     * A new instance of `TraitementDao`.
     */
    pub fn new() -> Self {
        TraitementDao {}
    }

    /**
     * Adds a new traitement to the database.
     *
     * # Arguments
     * `transaction`: The database transaction to execute the query within.
     * `traitement_input`: The input containing details of the traitement to be added.
     *
     * # Returns
     * A Result containing the stored traitement with its assigned ID, or an `ApplicationError`.
     */
    #[instrument(skip(self, transaction), fields(result))]
    pub async fn add_traitement(&self, transaction: &mut PgConnection, traitement_input: TraitementAddInputType) -> Result<TraitementDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let assigned_id: (i64,) = sqlx::query_as(ADD_TRAITEMENT)
            .bind(&traitement_input.description)
            .bind(traitement_input.maladie_id)
            .fetch_one(transaction)
            .instrument(span)
            .await
            .map_err(|err| super::handle_database_error(err.as_database_error()))?;
        Ok(TraitementDetailType::new(assigned_id.0, traitement_input.description, traitement_input.maladie_id))
    }

    /**
     * Retrieves a traitement by its ID.
     *
     * # Arguments
     * `connection`: The database connection.
     * `traitement_id`: The ID of the traitement.
     *
     * # Returns
     * A Result containing the traitement, or a not found `ApplicationError` if the ID is absent.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_traitement(&self, connection: &mut PgConnection, traitement_id: i64) -> Result<TraitementDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let result: Option<QueryTraitementDbResp> = sqlx::query_as(QUERY_TRAITEMENT_BY_ID)
            .bind(traitement_id)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get traitement: {err}")))?;
        result.map(TraitementDetailType::from).ok_or_else(|| ApplicationError::new(ErrorType::NotFound, "Traitement not found".to_string()))
    }
}

#[cfg(feature = "integration-test")]
#[cfg(test)]
mod integration_test {
    use super::*;
    use crate::dao::maladie::MaladieDao;
    use crate::model::models::MaladieAddInputType;
    use sqlx::PgPool;

    #[sqlx::test]
    async fn test_add_then_get_traitement() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let maladie_dao = MaladieDao::new();
        let traitement_dao = TraitementDao::new();
        let maladie = maladie_dao.add_maladie(&mut transaction, MaladieAddInputType::new("Dengue".to_string())).await.unwrap();
        let added = traitement_dao.add_traitement(&mut transaction, TraitementAddInputType::new("Rest".to_string(), maladie.id)).await.unwrap();
        let fetched = traitement_dao.get_traitement(&mut transaction, added.id).await.unwrap();
        assert_eq!(fetched, added);
        transaction.rollback().await.unwrap(); // Rollback the transaction to avoid leaving test data in the database
    }

    #[sqlx::test]
    async fn test_add_traitement_missing_maladie() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let traitement_dao = TraitementDao::new();
        let result = traitement_dao.add_traitement(&mut transaction, TraitementAddInputType::new("Rest".to_string(), 999_999)).await;
        assert_eq!(result.unwrap_err().error_type, ErrorType::ConstraintViolation);
        transaction.rollback().await.unwrap();
    }

    #[sqlx::test]
    async fn test_get_traitement_not_found() {
        let pool = init_db().await;
        let mut connection = pool.acquire().await.unwrap();
        let traitement_dao = TraitementDao::new();
        let result = traitement_dao.get_traitement(&mut connection, 999_999).await;
        assert_eq!(result.unwrap_err().error_type, ErrorType::NotFound);
    }

    /**
     * Initialize the database connection pool.
     */
    async fn init_db() -> PgPool {
        dotenv::from_filename("./sqlx-postgresql-migration/.env-test").ok();
        let pool = PgPool::connect(dotenv::var("DATABASE_URL").unwrap().as_str()).await.unwrap();
        sqlx::migrate!("./sqlx-postgresql-migration/migrations").run(&pool).await.unwrap();
        pool
    }
}
