use actix_web::{
    HttpRequest, HttpResponse, delete, get, post, put,
    web::{self, Path},
};
use tracing::{Instrument, instrument};

use crate::{
    api::{
        rest::{ConfigResponse, ContaminationRateRequest, ContaminationRateResponse, MaladieRequest, MaladieResponse, MessageResponse, MosquitoReportRequest, MosquitoReportResponse, PaginationQuery, TraitementElement, TraitementRequest, parse_date_param},
        state::AppState,
    },
    model::{
        apperror::ApplicationError,
        models::{ContaminationAddInputType, MaladieAddInputType, MosquitoReportInputType, PaginationInput, TraitementAddInputType},
    },
};

/**
 * Diagnostic endpoint returning the configuration values verbatim.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "readConfig", trace_id = get_trace_id(&http_request)))]
#[get("/config/")]
pub async fn read_config(http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    Ok(HttpResponse::Ok().json(ConfigResponse::from(&app_state.config)))
}

/**
 * Liveness endpoint.
 */
#[instrument(level = "info", skip(http_request), fields(service = "readRoot", trace_id = get_trace_id(&http_request)))]
#[get("/")]
pub async fn read_root(http_request: HttpRequest) -> Result<HttpResponse, ApplicationError> {
    Ok(HttpResponse::Ok().json(MessageResponse { message: "Welcome to the Mosquito API".to_string() }))
}

/**
 * Endpoint to create a mosquito report.
 */
#[instrument(level = "info", skip(http_request, request_body, app_state), fields(service = "createMosquitoReport", trace_id = get_trace_id(&http_request), result))]
#[post("/mosquito/")]
pub async fn create_mosquito_report(http_request: HttpRequest, request_body: web::Json<MosquitoReportRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let report_input = MosquitoReportInputType::from(request_body.into_inner());
    let report = app_state.mosquito_service.add_report(report_input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(MosquitoReportResponse::from(report)))
}

/**
 * Endpoint to retrieve a mosquito report by ID.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "readMosquitoReport", trace_id = get_trace_id(&http_request), result))]
#[get("/mosquito/{mosquito_id}")]
pub async fn read_mosquito_report(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let mosquito_id = path.into_inner();
    let report = app_state.mosquito_service.get_report(mosquito_id).instrument(span).await?;
    Ok(HttpResponse::Ok().json(MosquitoReportResponse::from(report)))
}

/**
 * Endpoint to fully replace a mosquito report.
 */
#[instrument(level = "info", skip(http_request, request_body, app_state), fields(service = "updateMosquitoReport", trace_id = get_trace_id(&http_request), result))]
#[put("/mosquito/{mosquito_id}")]
pub async fn update_mosquito_report(path: Path<i64>, http_request: HttpRequest, request_body: web::Json<MosquitoReportRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let mosquito_id = path.into_inner();
    let report_input = MosquitoReportInputType::from(request_body.into_inner());
    let report = app_state.mosquito_service.update_report(mosquito_id, report_input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(MosquitoReportResponse::from(report)))
}

/**
 * Endpoint to delete a mosquito report. Returns the deleted report's last
 * known values.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "deleteMosquitoReport", trace_id = get_trace_id(&http_request), result))]
#[delete("/mosquito/{mosquito_id}")]
pub async fn delete_mosquito_report(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let mosquito_id = path.into_inner();
    let report = app_state.mosquito_service.delete_report(mosquito_id).instrument(span).await?;
    Ok(HttpResponse::Ok().json(MosquitoReportResponse::from(report)))
}

/**
 * Endpoint to list mosquito reports with an exact species match.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "readMosquitoReportsBySpecies", trace_id = get_trace_id(&http_request), result))]
#[get("/mosquito/species/{species}")]
pub async fn read_mosquito_reports_by_species(path: Path<String>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let species = path.into_inner();
    let reports = app_state.mosquito_service.get_reports_by_species(&species).instrument(span).await?;
    Ok(HttpResponse::Ok().json(reports.into_iter().map(MosquitoReportResponse::from).collect::<Vec<_>>()))
}

/**
 * Endpoint to list mosquito reports with an exact timestamp match.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "readMosquitoReportsByDate", trace_id = get_trace_id(&http_request), result))]
#[get("/mosquito/date/{date}")]
pub async fn read_mosquito_reports_by_date(path: Path<String>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let date = parse_date_param(&path.into_inner())?;
    let reports = app_state.mosquito_service.get_reports_by_date(date).instrument(span).await?;
    Ok(HttpResponse::Ok().json(reports.into_iter().map(MosquitoReportResponse::from).collect::<Vec<_>>()))
}

/**
 * Endpoint to retrieve the most recent mosquito report for a location.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "readLastMosquitoReportByLocation", trace_id = get_trace_id(&http_request), result))]
#[get("/mosquito/location/{location}")]
pub async fn read_last_mosquito_report_by_location(path: Path<String>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let location = path.into_inner();
    let report = app_state.mosquito_service.get_last_report_by_location(&location).instrument(span).await?;
    Ok(HttpResponse::Ok().json(MosquitoReportResponse::from(report)))
}

/**
 * Endpoint to retrieve the most recent mosquito report overall.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "readLastMosquitoReport", trace_id = get_trace_id(&http_request), result))]
#[get("/mosquito/last/")]
pub async fn read_last_mosquito_report(http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let report = app_state.mosquito_service.get_last_report().instrument(span).await?;
    Ok(HttpResponse::Ok().json(MosquitoReportResponse::from(report)))
}

/**
 * Endpoint to list contamination rates with skip and limit pagination.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "readContaminationRates", trace_id = get_trace_id(&http_request), result))]
#[get("/contamination/")]
pub async fn read_contamination_rates(http_request: HttpRequest, pagination: web::Query<PaginationQuery>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let pagination_input = PaginationInput::from(pagination.into_inner()).validate()?;
    let contaminations = app_state.contamination_service.get_contamination_list(pagination_input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(contaminations.into_iter().map(ContaminationRateResponse::from).collect::<Vec<_>>()))
}

/**
 * Endpoint to create a contamination rate.
 */
#[instrument(level = "info", skip(http_request, request_body, app_state), fields(service = "createContaminationRate", trace_id = get_trace_id(&http_request), result))]
#[post("/contamination/")]
pub async fn create_contamination_rate(http_request: HttpRequest, request_body: web::Json<ContaminationRateRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let contamination_input = ContaminationAddInputType::from(request_body.into_inner());
    let contamination = app_state.contamination_service.add_contamination(contamination_input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(ContaminationRateResponse::from(contamination)))
}

/**
 * Endpoint to retrieve a contamination rate by ID.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "readContaminationRate", trace_id = get_trace_id(&http_request), result))]
#[get("/contamination/{contamination_id}")]
pub async fn read_contamination_rate(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let contamination_id = path.into_inner();
    let contamination = app_state.contamination_service.get_contamination(contamination_id).instrument(span).await?;
    Ok(HttpResponse::Ok().json(ContaminationRateResponse::from(contamination)))
}

/**
 * Endpoint to list contamination rates with an exact species match.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "readContaminationRatesBySpecies", trace_id = get_trace_id(&http_request), result))]
#[get("/contamination/species/{species}")]
pub async fn read_contamination_rates_by_species(path: Path<String>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let species = path.into_inner();
    let contaminations = app_state.contamination_service.get_contaminations_by_species(&species).instrument(span).await?;
    Ok(HttpResponse::Ok().json(contaminations.into_iter().map(ContaminationRateResponse::from).collect::<Vec<_>>()))
}

/**
 * Endpoint to list contamination rates with an exact location match.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "readContaminationRatesByLocation", trace_id = get_trace_id(&http_request), result))]
#[get("/contamination/location/{location}")]
pub async fn read_contamination_rates_by_location(path: Path<String>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let location = path.into_inner();
    let contaminations = app_state.contamination_service.get_contaminations_by_location(&location).instrument(span).await?;
    Ok(HttpResponse::Ok().json(contaminations.into_iter().map(ContaminationRateResponse::from).collect::<Vec<_>>()))
}

/**
 * Endpoint to create a traitement.
 */
#[instrument(level = "info", skip(http_request, request_body, app_state), fields(service = "createTraitement", trace_id = get_trace_id(&http_request), result))]
#[post("/traitement/")]
pub async fn create_traitement(http_request: HttpRequest, request_body: web::Json<TraitementRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let traitement_input = TraitementAddInputType::from(request_body.into_inner());
    let traitement = app_state.traitement_service.add_traitement(traitement_input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(TraitementElement::from(traitement)))
}

/**
 * Endpoint to retrieve a traitement by ID.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "readTraitement", trace_id = get_trace_id(&http_request), result))]
#[get("/traitement/{traitement_id}")]
pub async fn read_traitement(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let traitement_id = path.into_inner();
    let traitement = app_state.traitement_service.get_traitement(traitement_id).instrument(span).await?;
    Ok(HttpResponse::Ok().json(TraitementElement::from(traitement)))
}

/**
 * Endpoint returning the maladie owning the given ID with its traitements
 * nested, not a bare traitement list.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "readTraitementsByMaladie", trace_id = get_trace_id(&http_request), result))]
#[get("/traitement/maladie/{maladie_id}")]
pub async fn read_traitements_by_maladie(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let maladie_id = path.into_inner();
    let maladie = app_state.maladie_service.get_maladie(maladie_id).instrument(span).await?;
    Ok(HttpResponse::Ok().json(MaladieResponse::from(maladie)))
}

/**
 * Endpoint to create a maladie.
 */
#[instrument(level = "info", skip(http_request, request_body, app_state), fields(service = "createMaladie", trace_id = get_trace_id(&http_request), result))]
#[post("/maladie/")]
pub async fn create_maladie(http_request: HttpRequest, request_body: web::Json<MaladieRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let maladie_input = MaladieAddInputType::from(request_body.into_inner());
    let maladie = app_state.maladie_service.add_maladie(maladie_input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(MaladieResponse::from(maladie)))
}

/**
 * Endpoint to retrieve a maladie by ID with its traitements.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "readMaladie", trace_id = get_trace_id(&http_request), result))]
#[get("/maladie/{maladie_id}")]
pub async fn read_maladie(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let maladie_id = path.into_inner();
    let maladie = app_state.maladie_service.get_maladie(maladie_id).instrument(span).await?;
    Ok(HttpResponse::Ok().json(MaladieResponse::from(maladie)))
}

/**
 * Endpoint to retrieve the first maladie with an exact name match.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "readMaladieByNom", trace_id = get_trace_id(&http_request), result))]
#[get("/maladie/nom/{nom}")]
pub async fn read_maladie_by_nom(path: Path<String>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let nom = path.into_inner();
    let maladie = app_state.maladie_service.get_maladie_by_nom(&nom).instrument(span).await?;
    Ok(HttpResponse::Ok().json(MaladieResponse::from(maladie)))
}

/**
 * Retrieves the trace ID from the HTTP request headers.
 * If the trace ID is not present, a new UUID is generated.
 */
fn get_trace_id(http_request: &HttpRequest) -> String {
    http_request.headers().get("X-Trace-ID")
        .and_then(|v| v.to_str().ok().map(std::string::ToString::to_string))
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

#[cfg(test)]
mod test {
    use actix_web::test::TestRequest;

    use super::*;

    #[actix_web::test]
    async fn test_get_trace_id_exists() {
        let request = TestRequest::default()
            .insert_header(("X-Trace-ID", "test"))
            .to_http_request();
        let trace_id = get_trace_id(&request);
        assert_eq!(trace_id, "test");
    }


    #[actix_web::test]
    async fn test_get_trace_id_not_exists() {
        let request = TestRequest::default()
            .to_http_request();
        let trace_id = get_trace_id(&request);
        assert!(!trace_id.is_empty());
    }
}
