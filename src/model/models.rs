use chrono::{DateTime, Utc};

use crate::model::apperror::{ApplicationError, ErrorType};

/**
 * A stored mosquito surveillance report.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct MosquitoReportDetailType {
    pub id: i64,
    pub location: String,
    pub species: String,
    pub date: DateTime<Utc>,
    pub observations: Option<String>,
    pub disease: String,
    pub number: i32,
}

impl MosquitoReportDetailType {
    pub fn new(id: i64, location: String, species: String, date: DateTime<Utc>, observations: Option<String>, disease: String, number: i32) -> Self {
        MosquitoReportDetailType { id, location, species, date, observations, disease, number }
    }
}

/**
 * Input for creating a mosquito report or fully replacing an existing one.
 * The disease field is free text, not a reference to a maladie.
 */
#[derive(Debug, Clone)]
pub struct MosquitoReportInputType {
    pub location: String,
    pub species: String,
    pub date: DateTime<Utc>,
    pub observations: Option<String>,
    pub disease: String,
    pub number: i32,
}

impl MosquitoReportInputType {
    pub fn new(location: String, species: String, date: DateTime<Utc>, observations: Option<String>, disease: String, number: i32) -> Self {
        MosquitoReportInputType { location, species, date, observations, disease, number }
    }
}

/**
 * A stored contamination rate measurement. The rate is caller supplied and is
 * not derived from the totals.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct ContaminationDetailType {
    pub id: i64,
    pub species: String,
    pub total_tested: i32,
    pub total_contaminated: i32,
    pub contamination_rate: f64,
    pub location: String,
    pub date: DateTime<Utc>,
}

impl ContaminationDetailType {
    pub fn new(id: i64, species: String, total_tested: i32, total_contaminated: i32, contamination_rate: f64, location: String, date: DateTime<Utc>) -> Self {
        ContaminationDetailType { id, species, total_tested, total_contaminated, contamination_rate, location, date }
    }
}

/**
 * Input for creating a contamination rate measurement.
 */
#[derive(Debug, Clone)]
pub struct ContaminationAddInputType {
    pub species: String,
    pub total_tested: i32,
    pub total_contaminated: i32,
    pub contamination_rate: f64,
    pub location: String,
    pub date: DateTime<Utc>,
}

impl ContaminationAddInputType {
    pub fn new(species: String, total_tested: i32, total_contaminated: i32, contamination_rate: f64, location: String, date: DateTime<Utc>) -> Self {
        ContaminationAddInputType { species, total_tested, total_contaminated, contamination_rate, location, date }
    }
}

/**
 * A stored maladie with its owned traitements eagerly included.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct MaladieDetailType {
    pub id: i64,
    pub nom: String,
    pub traitements: Vec<TraitementDetailType>,
}

impl MaladieDetailType {
    pub fn new(id: i64, nom: String, traitements: Vec<TraitementDetailType>) -> Self {
        MaladieDetailType { id, nom, traitements }
    }
}

/**
 * Input for creating a maladie.
 */
#[derive(Debug, Clone)]
pub struct MaladieAddInputType {
    pub nom: String,
}

impl MaladieAddInputType {
    pub fn new(nom: String) -> Self {
        MaladieAddInputType { nom }
    }
}

/**
 * A stored traitement. The maladie reference is mandatory.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct TraitementDetailType {
    pub id: i64,
    pub description: String,
    pub maladie_id: i64,
}

impl TraitementDetailType {
    pub fn new(id: i64, description: String, maladie_id: i64) -> Self {
        TraitementDetailType { id, description, maladie_id }
    }
}

/**
 * Input for creating a traitement.
 */
#[derive(Debug, Clone)]
pub struct TraitementAddInputType {
    pub description: String,
    pub maladie_id: i64,
}

impl TraitementAddInputType {
    pub fn new(description: String, maladie_id: i64) -> Self {
        TraitementAddInputType { description, maladie_id }
    }
}

/**
 * Pagination input for the contamination list. Defaults are skip 0, limit 10.
 */
#[derive(Debug, Clone)]
pub struct PaginationInput {
    pub skip: i64,
    pub limit: i64,
}

impl PaginationInput {
    pub fn new(skip: i64, limit: i64) -> Self {
        PaginationInput { skip, limit }
    }

    /**
     * Validates the pagination bounds.
     *
     * # Returns
     * The validated input, or a validation error if either bound is negative.
     */
    pub fn validate(self) -> Result<Self, ApplicationError> {
        if self.skip < 0 {
            return Err(ApplicationError::new(ErrorType::Validation, "skip must not be negative".to_string()));
        }
        if self.limit < 0 {
            return Err(ApplicationError::new(ErrorType::Validation, "limit must not be negative".to_string()));
        }
        Ok(self)
    }
}

impl From<crate::dao::mosquito::QueryMosquitoReportDbResp> for MosquitoReportDetailType {
    fn from(row: crate::dao::mosquito::QueryMosquitoReportDbResp) -> Self {
        MosquitoReportDetailType::new(row.0, row.1, row.2, row.3, row.4, row.5, row.6)
    }
}

impl From<crate::dao::contamination::QueryContaminationDbResp> for ContaminationDetailType {
    fn from(row: crate::dao::contamination::QueryContaminationDbResp) -> Self {
        ContaminationDetailType::new(row.0, row.1, row.2, row.3, row.4, row.5, row.6)
    }
}

impl From<crate::dao::traitement::QueryTraitementDbResp> for TraitementDetailType {
    fn from(row: crate::dao::traitement::QueryTraitementDbResp) -> Self {
        TraitementDetailType::new(row.0, row.1, row.2)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_pagination_validate_ok() {
        let pagination_input = PaginationInput::new(0, 10).validate();
        assert!(pagination_input.is_ok());
    }

    #[test]
    fn test_pagination_validate_negative_skip() {
        let pagination_input = PaginationInput::new(-1, 10).validate();
        assert!(pagination_input.is_err());
        assert_eq!(pagination_input.unwrap_err().error_type, ErrorType::Validation);
    }

    #[test]
    fn test_pagination_validate_negative_limit() {
        let pagination_input = PaginationInput::new(0, -10).validate();
        assert!(pagination_input.is_err());
        assert_eq!(pagination_input.unwrap_err().error_type, ErrorType::Validation);
    }
}
