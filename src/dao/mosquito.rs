use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use tracing::{Instrument, instrument};

use crate::model::{
    apperror::{ApplicationError, ErrorType},
    models::{MosquitoReportDetailType, MosquitoReportInputType},
};

/**
 * Database response type for querying mosquito reports.
 */
pub type QueryMosquitoReportDbResp = (i64, String, String, DateTime<Utc>, Option<String>, String, i32);

/**
 * SQL query to add a new mosquito report.
 */
const ADD_REPORT: &str = "INSERT INTO mosquito_reports (location, species, date, observations, disease, number) VALUES ($1, $2, $3, $4, $5, $6) RETURNING id";

/**
 * SQL query to retrieve a mosquito report by its ID.
 */
const QUERY_REPORT_BY_ID: &str = "SELECT id, location, species, date, observations, disease, number FROM mosquito_reports WHERE id = $1";

/**
 * SQL query to fully replace a mosquito report.
 */
const UPDATE_REPORT: &str = "UPDATE mosquito_reports SET location = $1, species = $2, date = $3, observations = $4, disease = $5, number = $6 WHERE id = $7";

/**
 * SQL query to delete a mosquito report.
 */
const DELETE_REPORT: &str = "DELETE FROM mosquito_reports WHERE id = $1";

/**
 * SQL query to retrieve mosquito reports with an exact species match.
 */
const QUERY_REPORTS_BY_SPECIES: &str = "SELECT id, location, species, date, observations, disease, number FROM mosquito_reports WHERE species = $1 ORDER BY id";

/**
 * SQL query to retrieve mosquito reports with an exact timestamp match.
 */
const QUERY_REPORTS_BY_DATE: &str = "SELECT id, location, species, date, observations, disease, number FROM mosquito_reports WHERE date = $1 ORDER BY id";

/**
* SQL query to retrieve the most recent mosquito report for a location.
* No secondary sort key, equal dates resolve to the store default.
*/
const QUERY_LAST_REPORT_BY_LOCATION: &str = "SELECT id, location, species, date, observations, disease, number FROM mosquito_reports WHERE location = $1 ORDER BY date DESC LIMIT 1";

/**
 * SQL query to retrieve the most recent mosquito report overall.
 */
const QUERY_LAST_REPORT: &str = "SELECT id, location, species, date, observations, disease, number FROM mosquito_reports ORDER BY date DESC LIMIT 1";

/**
 * DAO for mosquito report database operations.
 */
pub struct MosquitoDao {}

impl MosquitoDao {
    /**
     * Creates a new instance of `MosquitoDao`.
     *
     * # Returns
     * A new instance of `MosquitoDao`.
     */
    pub fn new() -> Self {
        MosquitoDao {}
    }

    /**
     * Adds a new mosquito report to the database.
     *
     * # Arguments
     * `transaction`: The database transaction to execute the query within.
     * `report_input`: The input containing details of the report to be added.
     *
     * # Returns
     * A Result containing the stored report with its assigned ID, or an `ApplicationError`.
     */
    #[instrument(skip(self, transaction), fields(result))]
    pub async fn add_report(&self, transaction: &mut PgConnection, report_input: MosquitoReportInputType) -> Result<MosquitoReportDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let assigned_id: (i64,) = sqlx::query_as(ADD_REPORT)
            .bind(&report_input.location)
            .bind(&report_input.species)
            .bind(report_input.date)
            .bind(&report_input.observations)
            .bind(&report_input.disease)
            .bind(report_input.number)
            .fetch_one(transaction)
            .instrument(span)
            .await
            .map_err(|err| super::handle_database_error(err.as_database_error()))?;
        Ok(MosquitoReportDetailType::new(assigned_id.0, report_input.location, report_input.species, report_input.date, report_input.observations, report_input.disease, report_input.number))
    }

    /**
     * Retrieves a mosquito report by its ID.
     *
     * # Arguments
     * `connection`: The database connection.
     * `report_id`: The ID of the report.
     *
     * # Returns
     * A Result containing the report, or a not found `ApplicationError` if the ID is absent.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_report(&self, connection: &mut PgConnection, report_id: i64) -> Result<MosquitoReportDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let result: Option<QueryMosquitoReportDbResp> = sqlx::query_as(QUERY_REPORT_BY_ID)
            .bind(report_id)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get mosquito report: {err}")))?;
        result.map(MosquitoReportDetailType::from).ok_or_else(|| ApplicationError::new(ErrorType::NotFound, "Mosquito not found".to_string()))
    }

    /**
     * Fully replaces an existing mosquito report.
     *
     * # Arguments
     * `transaction`: The database transaction to execute the query within.
     * `report_id`: The ID of the report to be updated.
     * `report_input`: The input containing the replacement field values.
     *
     * # Returns
     * A Result containing the updated report, or an `ApplicationError`.
     */
    #[instrument(skip(self, transaction), fields(result))]
    pub async fn update_report(&self, transaction: &mut PgConnection, report_id: i64, report_input: MosquitoReportInputType) -> Result<MosquitoReportDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let result = sqlx::query(UPDATE_REPORT)
            .bind(&report_input.location)
            .bind(&report_input.species)
            .bind(report_input.date)
            .bind(&report_input.observations)
            .bind(&report_input.disease)
            .bind(report_input.number)
            .bind(report_id)
            .execute(transaction)
            .instrument(span)
            .await
            .map_err(|err| super::handle_database_error(err.as_database_error()))?;
        if result.rows_affected() == 0 {
            tracing::debug!("Mosquito report with ID {} not found for update", report_id);
            return Err(ApplicationError::new(ErrorType::NotFound, "Mosquito not found".to_string()));
        }
        if result.rows_affected() > 1 {
            tracing::warn!("Multiple mosquito reports attempted updated. Rolled back");
            return Err(ApplicationError::new(ErrorType::Application, "Multiple mosquito reports attempted updated. Rolled back".to_string()));
        }
        Ok(MosquitoReportDetailType::new(report_id, report_input.location, report_input.species, report_input.date, report_input.observations, report_input.disease, report_input.number))
    }

    /**
     * Deletes a mosquito report by its ID.
     *
     * # Arguments
     * `transaction`: The database transaction to execute the query within.
     * `report_id`: The ID of the report to be deleted.
     *
     * # Returns
     * A Result containing the deleted report's last known values, or an `ApplicationError`.
     */
    #[instrument(skip(self, transaction), fields(result))]
    pub async fn delete_report(&self, transaction: &mut PgConnection, report_id: i64) -> Result<MosquitoReportDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let report = self.get_report(transaction, report_id).instrument(span.clone()).await?;
        let result = sqlx::query(DELETE_REPORT)
            .bind(report_id)
            .execute(transaction)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to delete mosquito report: {err}")))?;
        if result.rows_affected() == 0 {
            tracing::debug!("Mosquito report with ID {} not found for deletion", report_id);
            return Err(ApplicationError::new(ErrorType::NotFound, "Mosquito not found".to_string()));
        }
        if result.rows_affected() > 1 {
            tracing::warn!("Multiple mosquito reports attempted deleted. Rolled back");
            return Err(ApplicationError::new(ErrorType::Application, "Multiple mosquito reports attempted deleted. Rolled back".to_string()));
        }
        Ok(report)
    }

    /**
     * Retrieves all mosquito reports with an exact species match.
     *
     * # Arguments
     * `connection`: The database connection.
     * `species`: The species to match.
     *
     * # Returns
     * A Result containing the matching reports, possibly empty, or an `ApplicationError`.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_reports_by_species(&self, connection: &mut PgConnection, species: &str) -> Result<Vec<MosquitoReportDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryMosquitoReportDbResp> = sqlx::query_as(QUERY_REPORTS_BY_SPECIES)
            .bind(species)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get mosquito reports by species: {err}")))?;
        Ok(results.into_iter().map(MosquitoReportDetailType::from).collect())
    }

    /**
     * Retrieves all mosquito reports with an exact timestamp match.
     *
     * # Arguments
     * `connection`: The database connection.
     * `date`: The timestamp to match.
     *
     * # Returns
     * A Result containing the matching reports, possibly empty, or an `ApplicationError`.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_reports_by_date(&self, connection: &mut PgConnection, date: DateTime<Utc>) -> Result<Vec<MosquitoReportDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryMosquitoReportDbResp> = sqlx::query_as(QUERY_REPORTS_BY_DATE)
            .bind(date)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get mosquito reports by date: {err}")))?;
        Ok(results.into_iter().map(MosquitoReportDetailType::from).collect())
    }

    /**
     * Retrieves the most recent mosquito report for a location.
     *
     * # Arguments
     * `connection`: The database connection.
     * `location`: The location to match.
     *
     * # Returns
     * A Result containing the report, or a not found `ApplicationError` if the location has none.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_last_report_by_location(&self, connection: &mut PgConnection, location: &str) -> Result<MosquitoReportDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let result: Option<QueryMosquitoReportDbResp> = sqlx::query_as(QUERY_LAST_REPORT_BY_LOCATION)
            .bind(location)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get last mosquito report by location: {err}")))?;
        result.map(MosquitoReportDetailType::from).ok_or_else(|| ApplicationError::new(ErrorType::NotFound, "Mosquito not found".to_string()))
    }

    /**
     * Retrieves the most recent mosquito report overall.
     *
     * # Arguments
     * `connection`: The database connection.
     *
     * # Returns
     * A Result containing the report, or a not found `ApplicationError` if the table is empty.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_last_report(&self, connection: &mut PgConnection) -> Result<MosquitoReportDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let result: Option<QueryMosquitoReportDbResp> = sqlx::query_as(QUERY_LAST_REPORT)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get last mosquito report: {err}")))?;
        result.map(MosquitoReportDetailType::from).ok_or_else(|| ApplicationError::new(ErrorType::NotFound, "Mosquito not found".to_string()))
    }
}

#[cfg(feature = "integration-test")]
#[cfg(test)]
mod integration_test {
    use super::*;
    use chrono::TimeZone;
    use sqlx::PgPool;

    #[sqlx::test]
    async fn test_add_then_get_report() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let mosquito_dao = MosquitoDao::new();
        let report_input = test_report_input("Antananarivo", "Aedes", 2023, 6, 1);
        let added = mosquito_dao.add_report(&mut transaction, report_input.clone()).await.unwrap();
        let fetched = mosquito_dao.get_report(&mut transaction, added.id).await.unwrap();
        assert_eq!(fetched, added);
        assert_eq!(fetched.location, report_input.location);
        assert_eq!(fetched.species, report_input.species);
        assert_eq!(fetched.date, report_input.date);
        assert_eq!(fetched.observations, report_input.observations);
        assert_eq!(fetched.disease, report_input.disease);
        assert_eq!(fetched.number, report_input.number);
        transaction.rollback().await.unwrap(); // Rollback the transaction to avoid leaving test data in the database
    }

    #[sqlx::test]
    async fn test_get_report_not_found() {
        let pool = init_db().await;
        let mut connection = pool.acquire().await.unwrap();
        let mosquito_dao = MosquitoDao::new();
        let result = mosquito_dao.get_report(&mut connection, 999_999).await;
        assert_eq!(result.unwrap_err().error_type, ErrorType::NotFound);
    }

    #[sqlx::test]
    async fn test_update_report_not_found() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let mosquito_dao = MosquitoDao::new();
        let report_input = test_report_input("Toamasina", "Culex", 2023, 1, 1);
        let result = mosquito_dao.update_report(&mut transaction, 999_999, report_input).await;
        assert_eq!(result.unwrap_err().error_type, ErrorType::NotFound);
        transaction.rollback().await.unwrap();
    }

    #[sqlx::test]
    async fn test_delete_then_get_report() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let mosquito_dao = MosquitoDao::new();
        let added = mosquito_dao.add_report(&mut transaction, test_report_input("Mahajanga", "Anopheles", 2023, 3, 15)).await.unwrap();
        let deleted = mosquito_dao.delete_report(&mut transaction, added.id).await.unwrap();
        assert_eq!(deleted, added);
        let result = mosquito_dao.get_report(&mut transaction, added.id).await;
        assert_eq!(result.unwrap_err().error_type, ErrorType::NotFound);
        transaction.rollback().await.unwrap();
    }

    #[sqlx::test]
    async fn test_get_reports_by_species_exact_match() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let mosquito_dao = MosquitoDao::new();
        mosquito_dao.add_report(&mut transaction, test_report_input("Antananarivo", "Aedes", 2023, 6, 1)).await.unwrap();
        mosquito_dao.add_report(&mut transaction, test_report_input("Antananarivo", "Culex", 2023, 6, 1)).await.unwrap();
        let reports = mosquito_dao.get_reports_by_species(&mut transaction, "Aedes").await.unwrap();
        assert!(reports.iter().all(|report| report.species == "Aedes"));
        let reports = mosquito_dao.get_reports_by_species(&mut transaction, "Mansonia").await.unwrap();
        assert!(reports.is_empty());
        transaction.rollback().await.unwrap();
    }

    #[sqlx::test]
    async fn test_get_last_report() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let mosquito_dao = MosquitoDao::new();
        mosquito_dao.add_report(&mut transaction, test_report_input("Antananarivo", "Aedes", 2023, 1, 1)).await.unwrap();
        let latest = mosquito_dao.add_report(&mut transaction, test_report_input("Toamasina", "Aedes", 2023, 6, 1)).await.unwrap();
        let result = mosquito_dao.get_last_report(&mut transaction).await.unwrap();
        assert_eq!(result.id, latest.id);
        transaction.rollback().await.unwrap();
    }

    #[sqlx::test]
    async fn test_get_last_report_by_location() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let mosquito_dao = MosquitoDao::new();
        mosquito_dao.add_report(&mut transaction, test_report_input("Antananarivo", "Aedes", 2023, 1, 1)).await.unwrap();
        let latest = mosquito_dao.add_report(&mut transaction, test_report_input("Antananarivo", "Culex", 2023, 6, 1)).await.unwrap();
        mosquito_dao.add_report(&mut transaction, test_report_input("Toamasina", "Aedes", 2023, 12, 1)).await.unwrap();
        let result = mosquito_dao.get_last_report_by_location(&mut transaction, "Antananarivo").await.unwrap();
        assert_eq!(result.id, latest.id);
        transaction.rollback().await.unwrap();
    }

    fn test_report_input(location: &str, species: &str, year: i32, month: u32, day: u32) -> MosquitoReportInputType {
        MosquitoReportInputType::new(
            location.to_string(),
            species.to_string(),
            Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap(),
            Some("Captured near standing water".to_string()),
            "Dengue".to_string(),
            12,
        )
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
