use actix_web::{HttpRequest, HttpResponse, ResponseError, error, http::StatusCode};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    apperror::{ApplicationError, ErrorType},
    config::AppConfig,
    models::{ContaminationAddInputType, ContaminationDetailType, MaladieAddInputType, MaladieDetailType, MosquitoReportDetailType, MosquitoReportInputType, PaginationInput, TraitementAddInputType, TraitementDetailType},
};

/***************** Mosquito report models *********************/

/**
 * Request structure for creating or fully replacing a mosquito report.
 */
#[derive(Debug, Deserialize)]
pub struct MosquitoReportRequest {
    pub location: String,
    pub species: String,
    pub date: DateTime<Utc>,
    pub observations: Option<String>,
    pub disease: String,
    pub number: i32,
}

impl From<MosquitoReportRequest> for MosquitoReportInputType {
    fn from(request: MosquitoReportRequest) -> Self {
        MosquitoReportInputType::new(request.location, request.species, request.date, request.observations, request.disease, request.number)
    }
}

/**
 * Response structure for a single mosquito report.
 */
#[derive(Debug, Serialize)]
pub struct MosquitoReportResponse {
    pub id: i64,
    pub location: String,
    pub species: String,
    pub date: DateTime<Utc>,
    pub observations: Option<String>,
    pub disease: String,
    pub number: i32,
}

impl From<MosquitoReportDetailType> for MosquitoReportResponse {
    fn from(report: MosquitoReportDetailType) -> Self {
        MosquitoReportResponse { id: report.id, location: report.location, species: report.species, date: report.date, observations: report.observations, disease: report.disease, number: report.number }
    }
}

/***************** Contamination rate models *********************/

/**
 * Request structure for creating a contamination rate. The rate is taken as
 * supplied, it is not derived from the totals.
 */
#[derive(Debug, Deserialize)]
pub struct ContaminationRateRequest {
    pub species: String,
    pub total_tested: i32,
    pub total_contaminated: i32,
    pub contamination_rate: f64,
    pub location: String,
    pub date: DateTime<Utc>,
}

impl From<ContaminationRateRequest> for ContaminationAddInputType {
    fn from(request: ContaminationRateRequest) -> Self {
        ContaminationAddInputType::new(request.species, request.total_tested, request.total_contaminated, request.contamination_rate, request.location, request.date)
    }
}

/**
 * Response structure for a single contamination rate.
 */
#[derive(Debug, Serialize)]
pub struct ContaminationRateResponse {
    pub id: i64,
    pub species: String,
    pub total_tested: i32,
    pub total_contaminated: i32,
    pub contamination_rate: f64,
    pub location: String,
    pub date: DateTime<Utc>,
}

impl From<ContaminationDetailType> for ContaminationRateResponse {
    fn from(contamination: ContaminationDetailType) -> Self {
        ContaminationRateResponse {
            id: contamination.id,
            species: contamination.species,
            total_tested: contamination.total_tested,
            total_contaminated: contamination.total_contaminated,
            contamination_rate: contamination.contamination_rate,
            location: contamination.location,
            date: contamination.date,
        }
    }
}

/***************** Maladie and traitement models *********************/

/**
 * Request structure for creating a maladie.
 */
#[derive(Debug, Deserialize)]
pub struct MaladieRequest {
    pub nom: String,
}

impl From<MaladieRequest> for MaladieAddInputType {
    fn from(request: MaladieRequest) -> Self {
        MaladieAddInputType::new(request.nom)
    }
}

/**
 * Response structure for a maladie. The owned traitements are always embedded
 * in full.
 */
#[derive(Debug, Serialize)]
pub struct MaladieResponse {
    pub id: i64,
    pub nom: String,
    pub traitements: Vec<TraitementElement>,
}

impl From<MaladieDetailType> for MaladieResponse {
    fn from(maladie: MaladieDetailType) -> Self {
        MaladieResponse { id: maladie.id, nom: maladie.nom, traitements: maladie.traitements.into_iter().map(TraitementElement::from).collect() }
    }
}

/**
 * Request structure for creating a traitement.
 */
#[derive(Debug, Deserialize)]
pub struct TraitementRequest {
    pub description: String,
    pub maladie_id: i64,
}

impl From<TraitementRequest> for TraitementAddInputType {
    fn from(request: TraitementRequest) -> Self {
        TraitementAddInputType::new(request.description, request.maladie_id)
    }
}

/**
 * A traitement as returned on its own or embedded in a maladie response.
 */
#[derive(Debug, Serialize)]
pub struct TraitementElement {
    pub id: i64,
    pub description: String,
    pub maladie_id: i64,
}

impl From<TraitementDetailType> for TraitementElement {
    fn from(traitement: TraitementDetailType) -> Self {
        TraitementElement { id: traitement.id, description: traitement.description, maladie_id: traitement.maladie_id }
    }
}

/***************** Diagnostic models *********************/

/**
 * Response structure for the diagnostic configuration endpoint. Returns the
 * connection string verbatim, key names kept for compatibility.
 */
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    #[serde(rename = "DB_URL")]
    pub db_url: String,
    #[serde(rename = "Debug Mode")]
    pub debug: bool,
}

impl From<&AppConfig> for ConfigResponse {
    fn from(config: &AppConfig) -> Self {
        ConfigResponse { db_url: config.database_url.clone(), debug: config.debug }
    }
}

/**
 * Response structure for the liveness endpoint.
 */
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/***************** Common models *********************/

/**
 * Pagination query parameters for the contamination list.
 */
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    /**
     * Number of rows to skip.
     */
    pub skip: Option<i64>,
    /**
     * Maximum number of rows to return.
     */
    pub limit: Option<i64>,
}

impl From<PaginationQuery> for PaginationInput {
    fn from(query: PaginationQuery) -> Self {
        PaginationInput::new(query.skip.unwrap_or(0), query.limit.unwrap_or(10))
    }
}

/**
 * Parses a date path parameter. Accepts RFC 3339, a naive timestamp, or a
 * bare date taken as midnight UTC.
 *
 * # Arguments
 * `value`: The raw path segment.
 *
 * # Returns
 * A Result containing the parsed timestamp or a validation `ApplicationError`.
 */
pub fn parse_date_param(value: &str) -> Result<DateTime<Utc>, ApplicationError> {
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Ok(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&date));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(date) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&date));
        }
    }
    Err(ApplicationError::new(ErrorType::Validation, format!("Invalid date value: {value}")))
}

/***************** Error models *********************/

/**
 * Custom error response for the application.
 */
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /**
     * The error code associated with the error type.
     */
    pub code: u16,
    /**
     * A human-readable message describing the error.
     */
    pub message: String,
}

impl ResponseError for ApplicationError {
    /**
     * Generates an error response for the application error.
     */
    fn error_response(&self) -> HttpResponse {
        let error_response = ErrorResponse { code: get_error_code(&self.error_type), message: self.message.clone() };
        HttpResponse::build(self.status_code()).json(&error_response)
    }

    fn status_code(&self) -> StatusCode {
        get_statuscode(&self.error_type)
    }
}

/**
* Maps application errors to HTTP status codes. Store failures, constraint
* violations included, are not distinguished to callers.
*
* # Arguments
* `application_error`: The type of error that occurred.
*
* # Returns
* The corresponding HTTP status code.
*/
fn get_statuscode(application_error: &ErrorType) -> StatusCode {
    match application_error {
        ErrorType::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorType::NotFound => StatusCode::NOT_FOUND,
        ErrorType::Initialization => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorType::ConstraintViolation => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorType::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorType::Application => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/**
 * Maps application errors to error codes.
 *
 * # Arguments
 * `application_error`: The type of error that occurred.
 *
 * # Returns
 * The corresponding error code.
 */
fn get_error_code(application_error: &ErrorType) -> u16 {
    match application_error {
        ErrorType::Initialization => 1001,
        ErrorType::Validation => 1002,
        ErrorType::DatabaseError => 1003,
        ErrorType::NotFound => 1004,
        ErrorType::ConstraintViolation => 1005,
        ErrorType::Application => 1006,
    }
}

/***************** Extractor error handlers *********************/

/**
 * Maps a malformed JSON body to a validation error.
 */
pub fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApplicationError::new(ErrorType::Validation, format!("Invalid request body: {err}")).into()
}

/**
 * Maps a malformed path parameter to a validation error.
 */
pub fn path_error_handler(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    ApplicationError::new(ErrorType::Validation, format!("Invalid path parameter: {err}")).into()
}

/**
 * Maps a malformed query string to a validation error.
 */
pub fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApplicationError::new(ErrorType::Validation, format!("Invalid query parameter: {err}")).into()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_statuscode_not_found() {
        assert_eq!(get_statuscode(&ErrorType::NotFound), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_statuscode_validation() {
        assert_eq!(get_statuscode(&ErrorType::Validation), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_statuscode_store_failures_opaque() {
        assert_eq!(get_statuscode(&ErrorType::DatabaseError), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(get_statuscode(&ErrorType::ConstraintViolation), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(get_statuscode(&ErrorType::Application), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_response_status() {
        let error = ApplicationError::new(ErrorType::NotFound, "Mosquito not found".to_string());
        let response = error.error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_parse_date_param_rfc3339() {
        let parsed = parse_date_param("2023-06-01T12:30:00Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 6, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_date_param_naive_datetime() {
        let parsed = parse_date_param("2023-06-01T12:30:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 6, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_date_param_bare_date() {
        let parsed = parse_date_param("2023-06-01").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_date_param_invalid() {
        let result = parse_date_param("first of june");
        assert_eq!(result.unwrap_err().error_type, ErrorType::Validation);
    }

    #[test]
    fn test_pagination_defaults() {
        let pagination_input = PaginationInput::from(PaginationQuery { skip: None, limit: None });
        assert_eq!(pagination_input.skip, 0);
        assert_eq!(pagination_input.limit, 10);
    }

    #[test]
    fn test_pagination_explicit_values() {
        let pagination_input = PaginationInput::from(PaginationQuery { skip: Some(5), limit: Some(2) });
        assert_eq!(pagination_input.skip, 5);
        assert_eq!(pagination_input.limit, 2);
    }

    #[test]
    fn test_config_response_key_names() {
        let config = AppConfig { database_url: "postgres://localhost/mosquito".to_string(), debug: true };
        let json = serde_json::to_value(ConfigResponse::from(&config)).unwrap();
        assert_eq!(json["DB_URL"], "postgres://localhost/mosquito");
        assert_eq!(json["Debug Mode"], true);
    }

    #[test]
    fn test_maladie_response_embeds_traitements() {
        let maladie = MaladieDetailType::new(1, "Dengue".to_string(), vec![TraitementDetailType::new(1, "Rest".to_string(), 1)]);
        let json = serde_json::to_value(MaladieResponse::from(maladie)).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["nom"], "Dengue");
        assert_eq!(json["traitements"][0]["id"], 1);
        assert_eq!(json["traitements"][0]["description"], "Rest");
        assert_eq!(json["traitements"][0]["maladie_id"], 1);
    }

    #[test]
    fn test_maladie_response_empty_traitements() {
        let maladie = MaladieDetailType::new(1, "Dengue".to_string(), vec![]);
        let json = serde_json::to_value(MaladieResponse::from(maladie)).unwrap();
        assert_eq!(json["traitements"], serde_json::json!([]));
    }
}
