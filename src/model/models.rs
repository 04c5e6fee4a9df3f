use crate::dao::tracker::{DistrictDbResp, StateDbResp, StateStatsDbResp};

/**
 * Details of a single state row.
 */
pub struct StateDetailType {
    pub state_id: i64,
    pub state_name: String,
    pub population: i64,
}

impl StateDetailType {
    pub fn new(state_id: i64, state_name: String, population: i64) -> Self {
        StateDetailType { state_id, state_name, population }
    }
}

/**
 * Converts a state database row into the domain type.
 */
impl From<StateDbResp> for StateDetailType {
    fn from(row: StateDbResp) -> Self {
        StateDetailType::new(row.0, row.1, row.2)
    }
}

/**
 * Details of a single district row.
 *
 * All fields except the identity are nullable in storage. A create or update
 * request that omitted a field leaves NULL behind, which reads back as `None`.
 */
pub struct DistrictDetailType {
    pub district_id: i64,
    pub district_name: Option<String>,
    pub state_id: Option<i64>,
    pub cases: Option<i64>,
    pub cured: Option<i64>,
    pub active: Option<i64>,
    pub deaths: Option<i64>,
}

impl DistrictDetailType {
    pub fn new(district_id: i64, district_name: Option<String>, state_id: Option<i64>, cases: Option<i64>, cured: Option<i64>, active: Option<i64>, deaths: Option<i64>) -> Self {
        DistrictDetailType { district_id, district_name, state_id, cases, cured, active, deaths }
    }
}

/**
 * Converts a district database row into the domain type.
 */
impl From<DistrictDbResp> for DistrictDetailType {
    fn from(row: DistrictDbResp) -> Self {
        DistrictDetailType::new(row.0, row.1, row.2, row.3, row.4, row.5, row.6)
    }
}

/**
 * Input for creating a district or fully replacing an existing one.
 *
 * Fields absent from the request body bind as NULL, matching the storage
 * columns. No validation is performed here; storage decides.
 */
#[derive(Debug)]
pub struct DistrictUpsertInputType {
    pub district_name: Option<String>,
    pub state_id: Option<i64>,
    pub cases: Option<i64>,
    pub cured: Option<i64>,
    pub active: Option<i64>,
    pub deaths: Option<i64>,
}

impl DistrictUpsertInputType {
    pub fn new(district_name: Option<String>, state_id: Option<i64>, cases: Option<i64>, cured: Option<i64>, active: Option<i64>, deaths: Option<i64>) -> Self {
        DistrictUpsertInputType { district_name, state_id, cases, cured, active, deaths }
    }
}

/**
 * Aggregated case counts across all districts of one state.
 *
 * Each sum is `None` when the state has no districts, since SUM over zero
 * rows yields NULL.
 */
pub struct StateStatsType {
    pub total_cases: Option<i64>,
    pub total_cured: Option<i64>,
    pub total_active: Option<i64>,
    pub total_deaths: Option<i64>,
}

impl StateStatsType {
    pub fn new(total_cases: Option<i64>, total_cured: Option<i64>, total_active: Option<i64>, total_deaths: Option<i64>) -> Self {
        StateStatsType { total_cases, total_cured, total_active, total_deaths }
    }
}

/**
 * Converts a statistics aggregate row into the domain type.
 */
impl From<StateStatsDbResp> for StateStatsType {
    fn from(row: StateStatsDbResp) -> Self {
        StateStatsType::new(row.0, row.1, row.2, row.3)
    }
}

/**
 * Name of the state a district belongs to.
 */
pub struct DistrictDetailsType {
    pub state_name: String,
}

impl DistrictDetailsType {
    pub fn new(state_name: String) -> Self {
        DistrictDetailsType { state_name }
    }
}
