use actix_web::{
    HttpRequest, HttpResponse, delete, get, post, put,
    web::{self, Path},
};
use tracing::{Instrument, instrument};

use crate::{
    api::{
        rest::{DistrictDetailsResponse, DistrictResponse, DistrictUpsertRequest, StateResponse, StateStatsResponse},
        state::AppState,
    },
    model::{apperror::ApplicationError, models::DistrictUpsertInputType},
};

/**
 * Fixed confirmation body for a created district.
 */
const DISTRICT_ADDED_BODY: &str = "District Successfully Added";

/**
 * Fixed confirmation body for a removed district.
 */
const DISTRICT_REMOVED_BODY: &str = "District Removed";

/**
 * Fixed confirmation body for an updated district.
 */
const DISTRICT_UPDATED_BODY: &str = "District Details Updated";

/**
 * Endpoint to retrieve all states ordered ascending by state id.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "listStates", trace_id = get_trace_id(&http_request), result))]
#[get("/states/")]
pub async fn states_list(http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let states = app_state.tracker_service.get_state_list().instrument(span).await?;
    Ok(HttpResponse::Ok().json(states.into_iter().map(StateResponse::from).collect::<Vec<StateResponse>>()))
}

/**
 * Endpoint to retrieve a single state. An absent state is a failure, not an
 * empty object.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "getState", trace_id = get_trace_id(&http_request), result))]
#[get("/states/{stateId}/")]
pub async fn state_get(path: Path<String>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let state_id = path.into_inner();
    let state = app_state.tracker_service.get_state(&state_id).instrument(span).await?;
    Ok(HttpResponse::Ok().json(StateResponse::from(state)))
}

/**
 * Endpoint to create a district. The district id is assigned by storage.
 */
#[instrument(level = "info", skip(http_request, request_body, app_state), fields(service = "addDistrict", trace_id = get_trace_id(&http_request), result))]
#[post("/districts/")]
pub async fn district_add(http_request: HttpRequest, request_body: web::Json<DistrictUpsertRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let district_input = DistrictUpsertInputType::from(request_body.into_inner());
    app_state.tracker_service.add_district(district_input).instrument(span).await?;
    Ok(HttpResponse::Ok().body(DISTRICT_ADDED_BODY))
}

/**
 * Endpoint to retrieve a single district.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "getDistrict", trace_id = get_trace_id(&http_request), result))]
#[get("/districts/{districtId}/")]
pub async fn district_get(path: Path<String>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let district_id = path.into_inner();
    let district = app_state.tracker_service.get_district(&district_id).instrument(span).await?;
    Ok(HttpResponse::Ok().json(DistrictResponse::from(district)))
}

/**
 * Endpoint to delete a district. Deleting an absent district still succeeds.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "deleteDistrict", trace_id = get_trace_id(&http_request), result))]
#[delete("/districts/{districtId}/")]
pub async fn district_delete(path: Path<String>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let district_id = path.into_inner();
    app_state.tracker_service.delete_district(&district_id).instrument(span).await?;
    Ok(HttpResponse::Ok().body(DISTRICT_REMOVED_BODY))
}

/**
 * Endpoint to fully replace the mutable fields of a district. Updating an
 * absent district still succeeds.
 */
#[instrument(level = "info", skip(http_request, request_body, app_state), fields(service = "updateDistrict", trace_id = get_trace_id(&http_request), result))]
#[put("/districts/{districtId}/")]
pub async fn district_update(path: Path<String>, http_request: HttpRequest, request_body: web::Json<DistrictUpsertRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let district_id = path.into_inner();
    let district_input = DistrictUpsertInputType::from(request_body.into_inner());
    app_state.tracker_service.update_district(&district_id, district_input).instrument(span).await?;
    Ok(HttpResponse::Ok().body(DISTRICT_UPDATED_BODY))
}

/**
 * Endpoint to retrieve the aggregated case counts for one state.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "getStateStats", trace_id = get_trace_id(&http_request), result))]
#[get("/states/{stateId}/stats/")]
pub async fn state_stats(path: Path<String>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let state_id = path.into_inner();
    let stats = app_state.tracker_service.get_state_stats(&state_id).instrument(span).await?;
    Ok(HttpResponse::Ok().json(StateStatsResponse::from(stats)))
}

/**
 * Endpoint to resolve the name of the state a district belongs to.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "getDistrictDetails", trace_id = get_trace_id(&http_request), result))]
#[get("/districts/{districtId}/details/")]
pub async fn district_details(path: Path<String>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let district_id = path.into_inner();
    let details = app_state.tracker_service.get_district_details(&district_id).instrument(span).await?;
    Ok(HttpResponse::Ok().json(DistrictDetailsResponse::from(details)))
}

/**
 * Retrieves the trace ID from the HTTP request headers.
 * If the trace ID is not present, a new UUID is generated.
 */
fn get_trace_id(http_request: &HttpRequest) -> String {
    http_request.headers().get("X-Trace-ID").and_then(|v| v.to_str().ok().map(std::string::ToString::to_string)).unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

#[cfg(test)]
mod test {
    use actix_web::{App, http::StatusCode, test, test::TestRequest};
    use serde_json::json;
    use sqlx::SqlitePool;
    use sqlx::sqlite::SqlitePoolOptions;

    use crate::{dao::tracker::TrackerDao, service::tracker::TrackerService};

    use super::*;

    #[actix_web::test]
    async fn test_get_trace_id_exists() {
        let request = TestRequest::default().insert_header(("X-Trace-ID", "test")).to_http_request();
        let trace_id = get_trace_id(&request);
        assert_eq!(trace_id, "test");
    }

    #[actix_web::test]
    async fn test_get_trace_id_not_exists() {
        let request = TestRequest::default().to_http_request();
        let trace_id = get_trace_id(&request);
        assert!(!trace_id.is_empty());
    }

    /**
     * Builds the full application over the given pool, with every endpoint
     * registered as in main.
     */
    macro_rules! init_app {
        ($pool:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(AppState::new(TrackerService::new(TrackerDao::new(), $pool.clone()))))
                    .service(states_list)
                    .service(state_get)
                    .service(district_add)
                    .service(district_get)
                    .service(district_delete)
                    .service(district_update)
                    .service(state_stats)
                    .service(district_details),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_list_states_sorted_ascending() {
        let pool = init_db().await;
        let app = init_app!(pool);
        let request = TestRequest::get().uri("/states/").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(
            body,
            json!([
                {"stateId": 1, "stateName": "Kerala", "population": 35000000},
                {"stateId": 2, "stateName": "Tamil Nadu", "population": 72000000}
            ])
        );
    }

    #[actix_web::test]
    async fn test_get_state_returns_stored_fields() {
        let pool = init_db().await;
        let app = init_app!(pool);
        let request = TestRequest::get().uri("/states/1/").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body, json!({"stateId": 1, "stateName": "Kerala", "population": 35000000}));
    }

    #[actix_web::test]
    async fn test_get_absent_state_is_generic_failure() {
        let pool = init_db().await;
        let app = init_app!(pool);
        let request = TestRequest::get().uri("/states/99/").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = test::read_body(response).await;
        assert_eq!(body, "Internal Server Error".as_bytes());
    }

    #[actix_web::test]
    async fn test_non_numeric_id_matches_zero_rows() {
        let pool = init_db().await;
        let app = init_app!(pool);
        let request = TestRequest::get().uri("/states/kerala/").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn test_add_then_get_district() {
        let pool = init_db().await;
        let app = init_app!(pool);
        let request = TestRequest::post()
            .uri("/districts/")
            .set_json(json!({"districtName": "Ernakulam", "stateId": 1, "cases": 10, "cured": 5, "active": 4, "deaths": 1}))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = test::read_body(response).await;
        assert_eq!(body, DISTRICT_ADDED_BODY.as_bytes());

        let request = TestRequest::get().uri("/districts/1/").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body, json!({"districtId": 1, "districtName": "Ernakulam", "stateId": 1, "cases": 10, "cured": 5, "active": 4, "deaths": 1}));
    }

    #[actix_web::test]
    async fn test_add_district_with_missing_fields_stores_null() {
        let pool = init_db().await;
        let app = init_app!(pool);
        let request = TestRequest::post().uri("/districts/").set_json(json!({"districtName": "Ernakulam", "stateId": 1})).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let request = TestRequest::get().uri("/districts/1/").to_request();
        let response = test::call_service(&app, request).await;
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body, json!({"districtId": 1, "districtName": "Ernakulam", "stateId": 1, "cases": null, "cured": null, "active": null, "deaths": null}));
    }

    #[actix_web::test]
    async fn test_delete_then_get_district_fails() {
        let pool = init_db().await;
        let app = init_app!(pool);
        let request = TestRequest::post()
            .uri("/districts/")
            .set_json(json!({"districtName": "Ernakulam", "stateId": 1, "cases": 10, "cured": 5, "active": 4, "deaths": 1}))
            .to_request();
        test::call_service(&app, request).await;

        let request = TestRequest::delete().uri("/districts/1/").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = test::read_body(response).await;
        assert_eq!(body, DISTRICT_REMOVED_BODY.as_bytes());

        let request = TestRequest::get().uri("/districts/1/").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn test_delete_absent_district_still_succeeds() {
        let pool = init_db().await;
        let app = init_app!(pool);
        let request = TestRequest::delete().uri("/districts/99/").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = test::read_body(response).await;
        assert_eq!(body, DISTRICT_REMOVED_BODY.as_bytes());
    }

    #[actix_web::test]
    async fn test_put_replaces_all_fields() {
        let pool = init_db().await;
        let app = init_app!(pool);
        let request = TestRequest::post()
            .uri("/districts/")
            .set_json(json!({"districtName": "Ernakulam", "stateId": 1, "cases": 10, "cured": 5, "active": 4, "deaths": 1}))
            .to_request();
        test::call_service(&app, request).await;

        let request = TestRequest::put()
            .uri("/districts/1/")
            .set_json(json!({"districtName": "Kollam", "stateId": 2, "cases": 20, "cured": 12, "active": 6, "deaths": 2}))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = test::read_body(response).await;
        assert_eq!(body, DISTRICT_UPDATED_BODY.as_bytes());

        let request = TestRequest::get().uri("/districts/1/").to_request();
        let response = test::call_service(&app, request).await;
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body, json!({"districtId": 1, "districtName": "Kollam", "stateId": 2, "cases": 20, "cured": 12, "active": 6, "deaths": 2}));
    }

    #[actix_web::test]
    async fn test_put_is_replacement_not_merge() {
        let pool = init_db().await;
        let app = init_app!(pool);
        let request = TestRequest::post()
            .uri("/districts/")
            .set_json(json!({"districtName": "Ernakulam", "stateId": 1, "cases": 10, "cured": 5, "active": 4, "deaths": 1}))
            .to_request();
        test::call_service(&app, request).await;

        // Omitted fields overwrite with NULL rather than keeping old values.
        let request = TestRequest::put().uri("/districts/1/").set_json(json!({"districtName": "Ernakulam", "stateId": 1})).to_request();
        test::call_service(&app, request).await;

        let request = TestRequest::get().uri("/districts/1/").to_request();
        let response = test::call_service(&app, request).await;
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body, json!({"districtId": 1, "districtName": "Ernakulam", "stateId": 1, "cases": null, "cured": null, "active": null, "deaths": null}));
    }

    #[actix_web::test]
    async fn test_put_absent_district_still_succeeds() {
        let pool = init_db().await;
        let app = init_app!(pool);
        let request = TestRequest::put()
            .uri("/districts/99/")
            .set_json(json!({"districtName": "Kollam", "stateId": 2, "cases": 20, "cured": 12, "active": 6, "deaths": 2}))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_stats_over_state_without_districts_is_all_null() {
        let pool = init_db().await;
        let app = init_app!(pool);
        let request = TestRequest::get().uri("/states/2/stats/").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body, json!({"totalCases": null, "totalCured": null, "totalActive": null, "totalDeaths": null}));
    }

    #[actix_web::test]
    async fn test_stats_sums_matching_districts() {
        let pool = init_db().await;
        let app = init_app!(pool);
        for district in [
            json!({"districtName": "Ernakulam", "stateId": 1, "cases": 10, "cured": 5, "active": 4, "deaths": 1}),
            json!({"districtName": "Kollam", "stateId": 1, "cases": 20, "cured": 12, "active": 6, "deaths": 2}),
            json!({"districtName": "Chennai", "stateId": 2, "cases": 100, "cured": 50, "active": 40, "deaths": 10}),
        ] {
            let request = TestRequest::post().uri("/districts/").set_json(district).to_request();
            test::call_service(&app, request).await;
        }
        let request = TestRequest::get().uri("/states/1/stats/").to_request();
        let response = test::call_service(&app, request).await;
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body, json!({"totalCases": 30, "totalCured": 17, "totalActive": 10, "totalDeaths": 3}));
    }

    #[actix_web::test]
    async fn test_details_returns_state_name() {
        let pool = init_db().await;
        let app = init_app!(pool);
        let request = TestRequest::post()
            .uri("/districts/")
            .set_json(json!({"districtName": "Ernakulam", "stateId": 1, "cases": 10, "cured": 5, "active": 4, "deaths": 1}))
            .to_request();
        test::call_service(&app, request).await;

        let request = TestRequest::get().uri("/districts/1/details/").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body, json!({"stateName": "Kerala"}));
    }

    #[actix_web::test]
    async fn test_details_for_absent_district_is_generic_failure() {
        let pool = init_db().await;
        let app = init_app!(pool);
        let request = TestRequest::get().uri("/districts/99/details/").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = test::read_body(response).await;
        assert_eq!(body, "Internal Server Error".as_bytes());
    }

    #[actix_web::test]
    async fn test_details_for_dangling_state_reference_is_generic_failure() {
        let pool = init_db().await;
        let app = init_app!(pool);
        // No FK enforcement at this layer: the insert succeeds, the second
        // lookup of the details endpoint then misses.
        let request = TestRequest::post()
            .uri("/districts/")
            .set_json(json!({"districtName": "Ernakulam", "stateId": 42, "cases": 10, "cured": 5, "active": 4, "deaths": 1}))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let request = TestRequest::get().uri("/districts/1/details/").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    /**
     * Initialize an in-memory database with the schema and two seeded states.
     * A single pooled connection keeps the in-memory database alive across
     * acquisitions.
     */
    async fn init_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new().max_connections(1).connect("sqlite::memory:").await.unwrap();
        sqlx::query("CREATE TABLE state (state_id INTEGER PRIMARY KEY, state_name TEXT, population INTEGER)").execute(&pool).await.unwrap();
        sqlx::query("CREATE TABLE district (district_id INTEGER PRIMARY KEY AUTOINCREMENT, district_name TEXT, state_id INTEGER, cases INTEGER, cured INTEGER, active INTEGER, deaths INTEGER)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO state (state_id, state_name, population) VALUES (1, 'Kerala', 35000000), (2, 'Tamil Nadu', 72000000)").execute(&pool).await.unwrap();
        pool
    }
}
