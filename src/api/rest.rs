use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::model::{
    apperror::ApplicationError,
    models::{DistrictDetailType, DistrictDetailsType, DistrictUpsertInputType, StateDetailType, StateStatsType},
};

/***************** State models *********************/

/**
 * Response structure for a single state.
 */
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateResponse {
    /**
     * The unique identifier of the state.
     */
    state_id: i64,
    /**
     * The name of the state.
     */
    state_name: String,
    /**
     * The population of the state.
     */
    population: i64,
}

/**
 * Converts from the state domain type into a response format suitable for API responses.
 */
impl From<StateDetailType> for StateResponse {
    fn from(state: StateDetailType) -> Self {
        StateResponse { state_id: state.state_id, state_name: state.state_name, population: state.population }
    }
}

/***************** District models *********************/

/**
 * Request structure for creating a district or fully replacing one.
 *
 * Fields omitted from the body deserialize as `None` and bind as NULL; no
 * schema enforcement happens here.
 */
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictUpsertRequest {
    pub district_name: Option<String>,
    pub state_id: Option<i64>,
    pub cases: Option<i64>,
    pub cured: Option<i64>,
    pub active: Option<i64>,
    pub deaths: Option<i64>,
}

/**
 * Converts from the district upsert request into the service input type.
 */
impl From<DistrictUpsertRequest> for DistrictUpsertInputType {
    fn from(request: DistrictUpsertRequest) -> Self {
        DistrictUpsertInputType::new(request.district_name, request.state_id, request.cases, request.cured, request.active, request.deaths)
    }
}

/**
 * Response structure for a single district.
 */
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictResponse {
    /**
     * The unique identifier of the district, assigned by storage.
     */
    district_id: i64,
    /**
     * The name of the district.
     */
    district_name: Option<String>,
    /**
     * The id of the state this district belongs to.
     */
    state_id: Option<i64>,
    /**
     * Total registered cases.
     */
    cases: Option<i64>,
    /**
     * Cured cases.
     */
    cured: Option<i64>,
    /**
     * Active cases.
     */
    active: Option<i64>,
    /**
     * Deaths.
     */
    deaths: Option<i64>,
}

/**
 * Converts from the district domain type into a response format suitable for API responses.
 */
impl From<DistrictDetailType> for DistrictResponse {
    fn from(district: DistrictDetailType) -> Self {
        DistrictResponse {
            district_id: district.district_id,
            district_name: district.district_name,
            state_id: district.state_id,
            cases: district.cases,
            cured: district.cured,
            active: district.active,
            deaths: district.deaths,
        }
    }
}

/***************** Statistics models *********************/

/**
 * Response structure for per-state aggregated statistics.
 *
 * Every sum serializes as `null` when the state has no districts.
 */
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateStatsResponse {
    /**
     * Sum of cases across the state's districts.
     */
    total_cases: Option<i64>,
    /**
     * Sum of cured cases across the state's districts.
     */
    total_cured: Option<i64>,
    /**
     * Sum of active cases across the state's districts.
     */
    total_active: Option<i64>,
    /**
     * Sum of deaths across the state's districts.
     */
    total_deaths: Option<i64>,
}

/**
 * Converts from the statistics domain type into a response format suitable for API responses.
 */
impl From<StateStatsType> for StateStatsResponse {
    fn from(stats: StateStatsType) -> Self {
        StateStatsResponse { total_cases: stats.total_cases, total_cured: stats.total_cured, total_active: stats.total_active, total_deaths: stats.total_deaths }
    }
}

/**
 * Response structure for the district details lookup.
 */
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictDetailsResponse {
    /**
     * The name of the state the district belongs to.
     */
    state_name: String,
}

/**
 * Converts from the district details domain type into a response format suitable for API responses.
 */
impl From<DistrictDetailsType> for DistrictDetailsResponse {
    fn from(details: DistrictDetailsType) -> Self {
        DistrictDetailsResponse { state_name: details.state_name }
    }
}

/***************** Error models *********************/

/**
 * Fixed body returned for every failed request.
 */
const ERROR_RESPONSE_BODY: &str = "Internal Server Error";

impl ResponseError for ApplicationError {
    /**
     * Every failure maps to the same generic status. No error is classified
     * further on the wire.
     */
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /**
     * The uniform fault boundary: log the underlying message for the
     * operator and respond with the fixed plain-text body.
     */
    fn error_response(&self) -> HttpResponse {
        tracing::error!("{}", self.message);
        HttpResponse::build(self.status_code()).body(ERROR_RESPONSE_BODY)
    }
}
