use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    dao::mosquito::MosquitoDao,
    model::{
        apperror::{ApplicationError, ErrorType},
        models::{MosquitoReportDetailType, MosquitoReportInputType},
    },
};

/**
 * Represents the service for managing mosquito reports. Every call acquires a
 * scoped connection or transaction from the pool and releases it on every
 * exit path.
 */
pub struct MosquitoService {
    /**
     * The DAO for mosquito report operations.
     */
    mosquito_dao: MosquitoDao,
    /**
     * Connection pool for database operations.
     */
    connection_pool: Pool<Postgres>,
}

impl MosquitoService {
    /**
     * Creates a new instance of `MosquitoService`.
     *
     * # Arguments
     * `mosquito_dao`: The DAO for mosquito report operations.
     * `connection_pool`: Connection pool for database operations.
     *
     * # Returns
     * A new instance of `MosquitoService`.
     */
    pub fn new(mosquito_dao: MosquitoDao, connection_pool: Pool<Postgres>) -> Self {
        MosquitoService { mosquito_dao, connection_pool }
    }

    /**
     * Adds a new mosquito report.
     *
     * # Arguments
     * `report_input`: The input containing details of the report to be added.
     *
     * # Returns
     * A Result containing the stored report or an `ApplicationError`.
     */
    pub async fn add_report(&self, report_input: MosquitoReportInputType) -> Result<MosquitoReportDetailType, ApplicationError> {
        let mut transaction = self.connection_pool.begin().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to begin transaction: {err}")))?;
        match self.mosquito_dao.add_report(&mut transaction, report_input).await {
            Ok(report) => {
                transaction.commit().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to commit transaction: {err}")))?;
                Ok(report)
            }
            Err(err) => {
                transaction.rollback().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to rollback transaction: {err}")))?;
                Err(err)
            }
        }
    }

    /**
     * Retrieves a mosquito report by its ID.
     *
     * # Arguments
     * `report_id`: The ID of the report.
     *
     * # Returns
     * A Result containing the report or an `ApplicationError`.
     */
    pub async fn get_report(&self, report_id: i64) -> Result<MosquitoReportDetailType, ApplicationError> {
        let mut connection = self.connection_pool.acquire().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to acquire connection: {err}")))?;
        self.mosquito_dao.get_report(&mut connection, report_id).await
    }

    /**
     * Fully replaces an existing mosquito report.
     *
     * # Arguments
     * `report_id`: The ID of the report to be updated.
     * `report_input`: The input containing the replacement field values.
     *
     * # Returns
     * A Result containing the updated report or an `ApplicationError`.
     */
    pub async fn update_report(&self, report_id: i64, report_input: MosquitoReportInputType) -> Result<MosquitoReportDetailType, ApplicationError> {
        let mut transaction = self.connection_pool.begin().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to begin transaction: {err}")))?;
        match self.mosquito_dao.update_report(&mut transaction, report_id, report_input).await {
            Ok(report) => {
                transaction.commit().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to commit transaction: {err}")))?;
                Ok(report)
            }
            Err(err) => {
                transaction.rollback().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to rollback transaction: {err}")))?;
                Err(err)
            }
        }
    }

    /**
     * Deletes a mosquito report by its ID.
     *
     * # Arguments
     * `report_id`: The ID of the report to be deleted.
     *
     * # Returns
     * A Result containing the deleted report's last known values or an `ApplicationError`.
     */
    pub async fn delete_report(&self, report_id: i64) -> Result<MosquitoReportDetailType, ApplicationError> {
        let mut transaction = self.connection_pool.begin().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to begin transaction: {err}")))?;
        match self.mosquito_dao.delete_report(&mut transaction, report_id).await {
            Ok(report) => {
                transaction.commit().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to commit transaction: {err}")))?;
                Ok(report)
            }
            Err(err) => {
                transaction.rollback().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to rollback transaction: {err}")))?;
                Err(err)
            }
        }
    }

    /**
     * Retrieves all mosquito reports with an exact species match.
     *
     * # Arguments
     * `species`: The species to match.
     *
     * # Returns
     * A Result containing the matching reports or an `ApplicationError`.
     */
    pub async fn get_reports_by_species(&self, species: &str) -> Result<Vec<MosquitoReportDetailType>, ApplicationError> {
        let mut connection = self.connection_pool.acquire().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to acquire connection: {err}")))?;
        self.mosquito_dao.get_reports_by_species(&mut connection, species).await
    }

    /**
     * Retrieves all mosquito reports with an exact timestamp match.
     *
     * # Arguments
     * `date`: The timestamp to match.
     *
     * # Returns
     * A Result containing the matching reports or an `ApplicationError`.
     */
    pub async fn get_reports_by_date(&self, date: DateTime<Utc>) -> Result<Vec<MosquitoReportDetailType>, ApplicationError> {
        let mut connection = self.connection_pool.acquire().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to acquire connection: {err}")))?;
        self.mosquito_dao.get_reports_by_date(&mut connection, date).await
    }

    /**
     * Retrieves the most recent mosquito report for a location.
     *
     * # Arguments
     * `location`: The location to match.
     *
     * # Returns
     * A Result containing the report or an `ApplicationError`.
     */
    pub async fn get_last_report_by_location(&self, location: &str) -> Result<MosquitoReportDetailType, ApplicationError> {
        let mut connection = self.connection_pool.acquire().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to acquire connection: {err}")))?;
        self.mosquito_dao.get_last_report_by_location(&mut connection, location).await
    }

    /**
     * Retrieves the most recent mosquito report overall.
     *
     * # Returns
     * A Result containing the report or an `ApplicationError`.
     */
    pub async fn get_last_report(&self) -> Result<MosquitoReportDetailType, ApplicationError> {
        let mut connection = self.connection_pool.acquire().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to acquire connection: {err}")))?;
        self.mosquito_dao.get_last_report(&mut connection).await
    }
}
