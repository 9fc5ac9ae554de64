use sqlx::PgConnection;
use tracing::{Instrument, instrument};

use crate::model::{
    apperror::{ApplicationError, ErrorType},
    models::{MaladieAddInputType, MaladieDetailType, TraitementDetailType},
};

/**
 * Database response type for querying maladies.
 */
pub type QueryMaladieDbResp = (i64, String);

/**
 * SQL query to add a new maladie.
 */
const ADD_MALADIE: &str = "INSERT INTO maladies (nom) VALUES ($1) RETURNING id";

/**
 * SQL query to retrieve a maladie by its ID.
 */
const QUERY_MALADIE_BY_ID: &str = "SELECT id, nom FROM maladies WHERE id = $1";

/**
 * SQL query to retrieve the first maladie with an exact name match.
 */
const QUERY_MALADIE_BY_NOM: &str = "SELECT id, nom FROM maladies WHERE nom = $1 ORDER BY id LIMIT 1";

/**
 * SQL query to retrieve the traitements owned by a maladie.
 */
const QUERY_TRAITEMENTS_BY_MALADIE: &str = "SELECT id, description, maladie_id FROM traitements WHERE maladie_id = $1 ORDER BY id";

/**
 * DAO for maladie database operations. Every maladie read eagerly includes
 * the owned traitements.
 */
pub struct MaladieDao {}

impl MaladieDao {
    /**
     * Creates a new instance of `MaladieDao`.
     *
     * # Returns
     * A new instance of `MaladieDao`.
     */
    pub fn new() -> Self {
        MaladieDao {}
    }

    /**
     * Adds a new maladie to the database.
     *
     * # Arguments
     * `transaction`: The database transaction to execute the query within.
     * `maladie_input`: The input containing details of the maladie to be added.
     *
     * # Returns
     * A Result containing the stored maladie with its assigned ID and an empty
     * traitement list, or an `ApplicationError`.
     */
    #[instrument(skip(self, transaction), fields(result))]
    pub async fn add_maladie(&self, transaction: &mut PgConnection, maladie_input: MaladieAddInputType) -> Result<MaladieDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let assigned_id: (i64,) = sqlx::query_as(ADD_MALADIE)
            .bind(&maladie_input.nom)
            .fetch_one(transaction)
            .instrument(span)
            .await
            .map_err(|err| super::handle_database_error(err.as_database_error()))?;
        Ok(MaladieDetailType::new(assigned_id.0, maladie_input.nom, vec![]))
    }

    /**
     * Retrieves a maladie by its ID with its owned traitements.
     *
     * # Arguments
     * `connection`: The database connection.
     * `maladie_id`: The ID of the maladie.
     *
     * # Returns
     * A Result containing the maladie, or a not found `ApplicationError` if the ID is absent.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_maladie(&self, connection: &mut PgConnection, maladie_id: i64) -> Result<MaladieDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let result: Option<QueryMaladieDbResp> = sqlx::query_as(QUERY_MALADIE_BY_ID)
            .bind(maladie_id)
            .fetch_optional(&mut *connection)
            .instrument(span.clone())
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get maladie: {err}")))?;
        let Some(maladie) = result else {
            return Err(ApplicationError::new(ErrorType::NotFound, "Maladie not found".to_string()));
        };
        let traitements = self.get_traitements_for_maladie(connection, maladie.0).instrument(span).await?;
        Ok(MaladieDetailType::new(maladie.0, maladie.1, traitements))
    }

    /**
     * Retrieves the first maladie with an exact name match, with its owned traitements.
     *
     * # Arguments
     * `connection`: The database connection.
     * `nom`: The name to match.
     *
     * # Returns
     * A Result containing the maladie, or a not found `ApplicationError` if no maladie has the name.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_maladie_by_nom(&self, connection: &mut PgConnection, nom: &str) -> Result<MaladieDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let result: Option<QueryMaladieDbResp> = sqlx::query_as(QUERY_MALADIE_BY_NOM)
            .bind(nom)
            .fetch_optional(&mut *connection)
            .instrument(span.clone())
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get maladie by nom: {err}")))?;
        let Some(maladie) = result else {
            return Err(ApplicationError::new(ErrorType::NotFound, "Maladie not found".to_string()));
        };
        let traitements = self.get_traitements_for_maladie(connection, maladie.0).instrument(span).await?;
        Ok(MaladieDetailType::new(maladie.0, maladie.1, traitements))
    }

    /**
     * Retrieves the traitements owned by a maladie.
     *
     * # Arguments
     * `connection`: The database connection.
     * `maladie_id`: The ID of the owning maladie.
     *
     * # Returns
     * A Result containing the owned traitements, possibly empty, or an `ApplicationError`.
     */
    async fn get_traitements_for_maladie(&self, connection: &mut PgConnection, maladie_id: i64) -> Result<Vec<TraitementDetailType>, ApplicationError> {
        let results: Vec<crate::dao::traitement::QueryTraitementDbResp> = sqlx::query_as(QUERY_TRAITEMENTS_BY_MALADIE)
            .bind(maladie_id)
            .fetch_all(connection)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get traitements for maladie: {err}")))?;
        Ok(results.into_iter().map(TraitementDetailType::from).collect())
    }
}

#[cfg(feature = "integration-test")]
#[cfg(test)]
mod integration_test {
    use super::*;
    use crate::dao::traitement::TraitementDao;
    use crate::model::models::TraitementAddInputType;
    use sqlx::PgPool;

    #[sqlx::test]
    async fn test_add_then_get_maladie() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let maladie_dao = MaladieDao::new();
        let added = maladie_dao.add_maladie(&mut transaction, MaladieAddInputType::new("Dengue".to_string())).await.unwrap();
        assert!(added.traitements.is_empty());
        let fetched = maladie_dao.get_maladie(&mut transaction, added.id).await.unwrap();
        assert_eq!(fetched, added);
        transaction.rollback().await.unwrap(); // Rollback the transaction to avoid leaving test data in the database
    }

    #[sqlx::test]
    async fn test_get_maladie_not_found() {
        let pool = init_db().await;
        let mut connection = pool.acquire().await.unwrap();
        let maladie_dao = MaladieDao::new();
        let result = maladie_dao.get_maladie(&mut connection, 999_999).await;
        assert_eq!(result.unwrap_err().error_type, ErrorType::NotFound);
    }

    #[sqlx::test]
    async fn test_get_maladie_by_nom() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let maladie_dao = MaladieDao::new();
        let added = maladie_dao.add_maladie(&mut transaction, MaladieAddInputType::new("Paludisme".to_string())).await.unwrap();
        let fetched = maladie_dao.get_maladie_by_nom(&mut transaction, "Paludisme").await.unwrap();
        assert_eq!(fetched.id, added.id);
        let result = maladie_dao.get_maladie_by_nom(&mut transaction, "Chikungunya").await;
        assert_eq!(result.unwrap_err().error_type, ErrorType::NotFound);
        transaction.rollback().await.unwrap();
    }

    #[sqlx::test]
    async fn test_get_maladie_includes_owned_traitements() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let maladie_dao = MaladieDao::new();
        let traitement_dao = TraitementDao::new();
        let maladie = maladie_dao.add_maladie(&mut transaction, MaladieAddInputType::new("Dengue".to_string())).await.unwrap();
        let traitement = traitement_dao.add_traitement(&mut transaction, TraitementAddInputType::new("Rest".to_string(), maladie.id)).await.unwrap();
        let fetched = maladie_dao.get_maladie(&mut transaction, maladie.id).await.unwrap();
        assert_eq!(fetched.traitements, vec![traitement]);
        transaction.rollback().await.unwrap();
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
