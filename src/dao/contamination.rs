use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use tracing::{Instrument, instrument};

use crate::model::{
    apperror::{ApplicationError, ErrorType},
    models::{ContaminationAddInputType, ContaminationDetailType, PaginationInput},
};

/**
 * Database response type for querying contamination rates.
 */
pub type QueryContaminationDbResp = (i64, String, i32, i32, f64, String, DateTime<Utc>);

/**
 * SQL query to add a new contamination rate.
 */
const ADD_CONTAMINATION: &str = "INSERT INTO contaminations (species, total_tested, total_contaminated, contamination_rate, location, date) VALUES ($1, $2, $3, $4, $5, $6) RETURNING id";

/**
 * SQL query to retrieve a contamination rate by its ID.
 */
const QUERY_CONTAMINATION_BY_ID: &str = "SELECT id, species, total_tested, total_contaminated, contamination_rate, location, date FROM contaminations WHERE id = $1";

/**
 * SQL query to retrieve a page of contamination rates in natural order.
 */
const QUERY_CONTAMINATION_LIST: &str = "SELECT id, species, total_tested, total_contaminated, contamination_rate, location, date FROM contaminations ORDER BY id LIMIT $1 OFFSET $2";

/**
 * SQL query to retrieve contamination rates with an exact species match.
 */
const QUERY_CONTAMINATION_BY_SPECIES: &str = "SELECT id, species, total_tested, total_contaminated, contamination_rate, location, date FROM contaminations WHERE species = $1 ORDER BY id";

/**
 * SQL query to retrieve contamination rates with an exact location match.
 */
const QUERY_CONTAMINATION_BY_LOCATION: &str = "SELECT id, species, total_tested, total_contaminated, contamination_rate, location, date FROM contaminations WHERE location = $1 ORDER BY id";

/**
 * DAO for contamination rate database operations.
 */
pub struct ContaminationDao {}

impl ContaminationDao {
    /**
     * Creates a new instance of `ContaminationDao`.
     *
     * # Returns
     * A new instance of `ContaminationDao`.
     */
    pub fn new() -> Self {
        ContaminationDao {}
    }

    /**
     * Adds a new contamination rate to the database. The rate value is stored
     * exactly as supplied, it is not checked against the totals.
     *
     * # Arguments
     * `transaction`: The database transaction to execute the query within.
     * `contamination_input`: The input containing details of the measurement to be added.
     *
     * # Returns
     * A Result containing the stored measurement with its assigned ID, or an `ApplicationError`.
     */
    #[instrument(skip(self, transaction), fields(result))]
    pub async fn add_contamination(&self, transaction: &mut PgConnection, contamination_input: ContaminationAddInputType) -> Result<ContaminationDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let assigned_id: (i64,) = sqlx::query_as(ADD_CONTAMINATION)
            .bind(&contamination_input.species)
            .bind(contamination_input.total_tested)
            .bind(contamination_input.total_contaminated)
            .bind(contamination_input.contamination_rate)
            .bind(&contamination_input.location)
            .bind(contamination_input.date)
            .fetch_one(transaction)
            .instrument(span)
            .await
            .map_err(|err| super::handle_database_error(err.as_database_error()))?;
        Ok(ContaminationDetailType::new(
            assigned_id.0,
            contamination_input.species,
            contamination_input.total_tested,
            contamination_input.total_contaminated,
            contamination_input.contamination_rate,
            contamination_input.location,
            contamination_input.date,
        ))
    }

    /**
     * Retrieves a contamination rate by its ID.
     *
     * # Arguments
     * `connection`: The database connection.
     * `contamination_id`: The ID of the measurement.
     *
     * # Returns
     * A Result containing the measurement, or a not found `ApplicationError` if the ID is absent.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_contamination(&self, connection: &mut PgConnection, contamination_id: i64) -> Result<ContaminationDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let result: Option<QueryContaminationDbResp> = sqlx::query_as(QUERY_CONTAMINATION_BY_ID)
            .bind(contamination_id)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get contamination rate: {err}")))?;
        result.map(ContaminationDetailType::from).ok_or_else(|| ApplicationError::new(ErrorType::NotFound, "Contamination rate not found".to_string()))
    }

    /**
     * Retrieves a page of contamination rates based on the provided pagination input.
     *
     * # Arguments
     * `connection`: The database connection.
     * `pagination_input`: `PaginationInput` containing the skip and limit values.
     *
     * # Returns
     * A Result containing the page of measurements, possibly empty, or an `ApplicationError`.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_contamination_list(&self, connection: &mut PgConnection, pagination_input: PaginationInput) -> Result<Vec<ContaminationDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryContaminationDbResp> = sqlx::query_as(QUERY_CONTAMINATION_LIST)
            .bind(pagination_input.limit)
            .bind(pagination_input.skip)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get contamination rate list: {err}")))?;
        Ok(results.into_iter().map(ContaminationDetailType::from).collect())
    }

    /**
     * Retrieves all contamination rates with an exact species match.
     *
     * # Arguments
     * `connection`: The database connection.
     * `species`: The species to match.
     *
     * # Returns
     * A Result containing the matching measurements, possibly empty, or an `ApplicationError`.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_contaminations_by_species(&self, connection: &mut PgConnection, species: &str) -> Result<Vec<ContaminationDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryContaminationDbResp> = sqlx::query_as(QUERY_CONTAMINATION_BY_SPECIES)
            .bind(species)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get contamination rates by species: {err}")))?;
        Ok(results.into_iter().map(ContaminationDetailType::from).collect())
    }

    /**
     * Retrieves all contamination rates with an exact location match.
     *
     * # Arguments
     * `connection`: The database connection.
     * `location`: The location to match.
     *
     * # Returns
     * A Result containing the matching measurements, possibly empty, or an `ApplicationError`.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_contaminations_by_location(&self, connection: &mut PgConnection, location: &str) -> Result<Vec<ContaminationDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryContaminationDbResp> = sqlx::query_as(QUERY_CONTAMINATION_BY_LOCATION)
            .bind(location)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get contamination rates by location: {err}")))?;
        Ok(results.into_iter().map(ContaminationDetailType::from).collect())
    }
}

#[cfg(feature = "integration-test")]
#[cfg(test)]
mod integration_test {
    use super::*;
    use chrono::TimeZone;
    use sqlx::PgPool;

    #[sqlx::test]
    async fn test_add_then_get_contamination() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let contamination_dao = ContaminationDao::new();
        let added = contamination_dao.add_contamination(&mut transaction, test_contamination_input("Aedes", "Antananarivo")).await.unwrap();
        let fetched = contamination_dao.get_contamination(&mut transaction, added.id).await.unwrap();
        assert_eq!(fetched, added);
        transaction.rollback().await.unwrap(); // Rollback the transaction to avoid leaving test data in the database
    }

    #[sqlx::test]
    async fn test_get_contamination_not_found() {
        let pool = init_db().await;
        let mut connection = pool.acquire().await.unwrap();
        let contamination_dao = ContaminationDao::new();
        let result = contamination_dao.get_contamination(&mut connection, 999_999).await;
        assert_eq!(result.unwrap_err().error_type, ErrorType::NotFound);
    }

    #[sqlx::test]
    async fn test_get_contamination_list_limit() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let contamination_dao = ContaminationDao::new();
        let first = contamination_dao.add_contamination(&mut transaction, test_contamination_input("Aedes", "Antananarivo")).await.unwrap();
        contamination_dao.add_contamination(&mut transaction, test_contamination_input("Culex", "Toamasina")).await.unwrap();
        contamination_dao.add_contamination(&mut transaction, test_contamination_input("Anopheles", "Mahajanga")).await.unwrap();
        let page = contamination_dao.get_contamination_list(&mut transaction, PaginationInput::new(0, 1)).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, first.id);
        transaction.rollback().await.unwrap();
    }

    #[sqlx::test]
    async fn test_get_contaminations_by_species_and_location() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let contamination_dao = ContaminationDao::new();
        contamination_dao.add_contamination(&mut transaction, test_contamination_input("Aedes", "Antananarivo")).await.unwrap();
        contamination_dao.add_contamination(&mut transaction, test_contamination_input("Culex", "Toamasina")).await.unwrap();
        let by_species = contamination_dao.get_contaminations_by_species(&mut transaction, "Aedes").await.unwrap();
        assert!(by_species.iter().all(|contamination| contamination.species == "Aedes"));
        assert!(!by_species.is_empty());
        let by_location = contamination_dao.get_contaminations_by_location(&mut transaction, "Toamasina").await.unwrap();
        assert!(by_location.iter().all(|contamination| contamination.location == "Toamasina"));
        assert!(!by_location.is_empty());
        transaction.rollback().await.unwrap();
    }

    fn test_contamination_input(species: &str, location: &str) -> ContaminationAddInputType {
        ContaminationAddInputType::new(species.to_string(), 200, 30, 0.15, location.to_string(), Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap())
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
