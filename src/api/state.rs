use crate::{
    model::config::AppConfig,
    service::{contamination::ContaminationService, maladie::MaladieService, mosquito::MosquitoService, traitement::TraitementService},
};

/**
* Represents the application state shared across the Actix web application.
* The configuration is injected here once at startup, nothing reads it as
* global state.
*/
pub struct AppState {
    /**
     * The application configuration, fixed for the process lifetime.
     */
    pub config: AppConfig,
    /**
     * The service for mosquito report operations.
     */
    pub mosquito_service: MosquitoService,
    /**
     * The service for contamination rate operations.
     */
    pub contamination_service: ContaminationService,
    /**
     * The service for maladie operations.
     */
    pub maladie_service: MaladieService,
    /**
     * The service for traitement operations.
     */
    pub traitement_service: TraitementService,
}

/**
 * Creates a new instance of `AppState`.
 *
 * # Arguments
 * `config`: The application configuration.
 * `mosquito_service`: The service for mosquito report operations.
 * `contamination_service`: The service for contamination rate operations.
 * `maladie_service`: The service for maladie operations.
 * `traitement_service`: The service for traitement operations.
 */
impl AppState {
    pub fn new(config: AppConfig, mosquito_service: MosquitoService, contamination_service: ContaminationService, maladie_service: MaladieService, traitement_service: TraitementService) -> Self {
        AppState { config, mosquito_service, contamination_service, maladie_service, traitement_service }
    }
}
