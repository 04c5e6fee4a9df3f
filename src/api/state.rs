use crate::service::tracker::TrackerService;

/**
* Represents the application state shared across the Actix web application.
*/
pub struct AppState {
    /**
     * The tracking service for state and district operations.
     */
    pub tracker_service: TrackerService,
}

/**
 * Creates a new instance of `AppState`.
 *
 * # Arguments
 * `tracker_service`: The tracking service for state and district operations.
 */
impl AppState {
    pub fn new(tracker_service: TrackerService) -> Self {
        AppState { tracker_service }
    }
}
