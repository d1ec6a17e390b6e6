//! Route handlers for the quoting API.

use axum::{
    async_trait,
    extract::{FromRequest, Path, Request, State},
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::AppState;

use super::calculators::{
    basic_dimensions, concrete_works, earthworks, formwork, ConcreteParams, EarthworksParams,
    PoolSpec,
};
use super::costing::{cost_scales, finishing_cost, scale_reference_costs, scaled_breakdown};
use super::profiles::{Profile, ProfileStore};
use super::requests::{
    CalculateRequest, CompareEstimateRequest, GenerateKpRequest, ProfileRequest,
};
use super::responses::{
    BasicDimensionsResponse, CompareEstimateResponse, ComparisonEntry, ConcreteWorksResponse,
    CostCategoryResponse, CostTotalsResponse, CostsComparison, DimensionsComparison,
    EarthworksResponse, FinishingCostResponse, FormworkResponse, GenerateKpResponse,
    ProfileListResponse, QuoteResponse,
};

/// `axum::Json` wrapper that maps body rejections into the application
/// error taxonomy (malformed JSON and non-numeric fields become 400s with
/// a JSON error body instead of axum's plain-text rejection).
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(AppError::InvalidBody(rejection.body_text())),
        }
    }
}

/// Build the quoting API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate))
        .route("/get_profiles", get(get_profiles))
        .route("/get_profile/:profile_id", get(get_profile))
        .route("/get_prices", post(get_prices))
        .route("/get_costs", post(get_costs))
        .route("/get_dimensions_correction", post(get_dimensions_correction))
        .route("/compare_estimate", post(compare_estimate))
        .route("/generate_kp", post(generate_kp))
        .with_state(state)
}

/// Run the whole calculation chain for one spec/profile pair.
fn build_quote(profile: &Profile, spec: &PoolSpec) -> QuoteResponse {
    let factors = profile.correction_factors();
    let dims = basic_dimensions(spec, &factors);

    let earth = earthworks(spec, &EarthworksParams::default());
    let concrete = concrete_works(spec, &ConcreteParams::default());
    let forms = formwork(spec, &ConcreteParams::default());

    let scales = cost_scales(&dims, &profile.basic_dimensions);
    let totals = scale_reference_costs(profile, &scales);
    let finishing = finishing_cost(profile, &dims);

    let materials_lines = scaled_breakdown(&profile.materials_breakdown, scales.materials);
    let works_lines = scaled_breakdown(&profile.works_breakdown, scales.works);

    QuoteResponse {
        profile: super::profiles::ProfileSummary {
            id: profile.id.clone(),
            name: profile.name.clone(),
        },
        basic_dimensions: BasicDimensionsResponse::new(spec, &dims),
        earthworks: EarthworksResponse::from(&earth),
        concrete_works: ConcreteWorksResponse::from(&concrete),
        formwork: FormworkResponse::from(&forms),
        finishing_cost: FinishingCostResponse::from(&finishing),
        materials_cost: CostCategoryResponse::new(&materials_lines, totals.materials_total),
        works_cost: CostCategoryResponse::new(&works_lines, totals.works_total),
        costs: CostTotalsResponse::from(&totals),
    }
}

/// Resolve the profile leniently: unknown or absent ids fall back to the
/// default profile (legacy clients send arbitrary ids here).
fn lenient_profile<'a>(store: &'a ProfileStore, id: Option<&str>) -> &'a Profile {
    store.get(id.unwrap_or(super::profiles::DEFAULT_PROFILE_ID))
}

/// Resolve the profile strictly: unknown ids are a caller error.
fn strict_profile<'a>(store: &'a ProfileStore, id: Option<&str>) -> Result<&'a Profile> {
    let id = id.unwrap_or(super::profiles::DEFAULT_PROFILE_ID);
    store
        .find(id)
        .ok_or_else(|| AppError::UnknownProfile(id.to_string()))
}

/// `POST /calculate`
async fn calculate(
    State(state): State<AppState>,
    AppJson(request): AppJson<CalculateRequest>,
) -> Result<Json<QuoteResponse>> {
    let spec = request.dimensions.validate()?;
    let profile = lenient_profile(&state.profiles, request.profile_id.as_deref());
    tracing::debug!(profile = %profile.id, "calculating quote");
    Ok(Json(build_quote(profile, &spec)))
}

/// `GET /get_profiles`
async fn get_profiles(State(state): State<AppState>) -> Json<ProfileListResponse> {
    Json(ProfileListResponse {
        profiles: state.profiles.list(),
    })
}

/// `GET /get_profile/{id}` - strict: unknown id is a 400
async fn get_profile(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let profile = strict_profile(&state.profiles, Some(&profile_id))?;
    Ok(Json(json!({ "profile": profile })))
}

/// `POST /get_prices` - a profile's unit-price tables
async fn get_prices(
    State(state): State<AppState>,
    AppJson(request): AppJson<ProfileRequest>,
) -> Result<Json<serde_json::Value>> {
    let profile = strict_profile(&state.profiles, request.profile_id.as_deref())?;
    Ok(Json(json!({
        "profile": profile.name,
        "materials_prices": profile.materials_prices,
        "works_prices": profile.works_prices,
    })))
}

/// `POST /get_costs` - a profile's reference cost record
async fn get_costs(
    State(state): State<AppState>,
    AppJson(request): AppJson<ProfileRequest>,
) -> Result<Json<serde_json::Value>> {
    let profile = strict_profile(&state.profiles, request.profile_id.as_deref())?;
    Ok(Json(json!({
        "profile": profile.name,
        "costs": profile.costs,
    })))
}

/// `POST /get_dimensions_correction` - a profile's fitted factor set
async fn get_dimensions_correction(
    State(state): State<AppState>,
    AppJson(request): AppJson<ProfileRequest>,
) -> Result<Json<serde_json::Value>> {
    let profile = strict_profile(&state.profiles, request.profile_id.as_deref())?;
    Ok(Json(json!({
        "profile": profile.name,
        "correction_factors": profile.correction_factors(),
    })))
}

/// `POST /compare_estimate` - per-field differences between our quote and
/// an externally supplied estimate
async fn compare_estimate(
    State(state): State<AppState>,
    AppJson(request): AppJson<CompareEstimateRequest>,
) -> Result<Json<CompareEstimateResponse>> {
    use rust_decimal::prelude::ToPrimitive;

    let spec = request.dimensions.validate()?;
    let profile = lenient_profile(&state.profiles, request.profile_id.as_deref());
    let quote = build_quote(profile, &spec);
    let estimate = &request.estimate;

    let dim = |calc: f64, est: Option<f64>| ComparisonEntry::new(calc, est.unwrap_or(0.0), 2);
    let cost = |calc: &rust_decimal::Decimal, est: Option<f64>| {
        ComparisonEntry::new(calc.to_f64().unwrap_or(0.0), est.unwrap_or(0.0), 0)
    };

    let dims = &quote.basic_dimensions;
    let totals = &quote.costs;

    Ok(Json(CompareEstimateResponse {
        dimensions: DimensionsComparison {
            water_surface: dim(dims.water_surface.value, estimate.water_surface),
            perimeter: dim(dims.perimeter.value, estimate.perimeter),
            wall_area: dim(dims.wall_area.value, estimate.wall_area),
            finishing_area: dim(dims.finishing_area.value, estimate.finishing_area),
            water_volume: dim(dims.water_volume.value, estimate.water_volume),
        },
        costs: CostsComparison {
            materials: cost(&totals.materials_total.amount, estimate.materials_cost),
            work: cost(&totals.works_total.amount, estimate.work_cost),
            equipment: cost(&totals.equipment_total.amount, estimate.equipment_cost),
            total: cost(&totals.total.amount, estimate.total_cost),
        },
    }))
}

/// `POST /generate_kp` - full quote plus customer and date metadata for
/// commercial-proposal document generation
async fn generate_kp(
    State(state): State<AppState>,
    AppJson(request): AppJson<GenerateKpRequest>,
) -> Result<Json<GenerateKpResponse>> {
    let spec = request.dimensions.validate()?;
    let customer = request.customer.ok_or(AppError::MissingField("customer"))?;
    customer.validate()?;

    // Document generation refuses unknown profiles instead of silently
    // quoting from the default one
    let profile = strict_profile(&state.profiles, request.profile_id.as_deref())?;

    let quote = build_quote(profile, &spec);
    let generation_date = chrono::Utc::now().format("%d.%m.%Y").to_string();

    Ok(Json(GenerateKpResponse {
        quote,
        customer,
        generation_date,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn state() -> AppState {
        AppState {
            profiles: Arc::new(ProfileStore::builtin()),
        }
    }

    #[test]
    fn test_lenient_profile_falls_back() {
        let state = state();
        assert_eq!(lenient_profile(&state.profiles, Some("nope")).id, "kp1");
        assert_eq!(lenient_profile(&state.profiles, None).id, "kp1");
        assert_eq!(lenient_profile(&state.profiles, Some("kp3")).id, "kp3");
    }

    #[test]
    fn test_strict_profile_rejects_unknown() {
        let state = state();
        assert!(strict_profile(&state.profiles, Some("nope")).is_err());
        assert!(strict_profile(&state.profiles, None).is_ok()); // default id
    }

    #[test]
    fn test_build_quote_at_kp1_reference() {
        let state = state();
        let profile = state.profiles.get("kp1");
        let spec = PoolSpec::new(8000.0, 4000.0, 1500.0, 200.0).unwrap();
        let quote = build_quote(profile, &spec);

        assert_eq!(quote.basic_dimensions.water_surface.display, "32.0 м²");
        assert_eq!(quote.basic_dimensions.perimeter.display, "24.0 м/п");
        assert_eq!(quote.basic_dimensions.wall_area.display, "39.6 м²");
        assert_eq!(quote.basic_dimensions.finishing_area.display, "71.6 м²");
        assert_eq!(quote.costs.total.display, "2 899 664 руб.");
        assert_eq!(quote.earthworks.trucks_count, 17);
    }

    #[test]
    fn test_build_quote_small_pool_all_positive() {
        let state = state();
        let profile = state.profiles.get("kp1");
        let spec = PoolSpec::new(3000.0, 2000.0, 1000.0, 150.0).unwrap();
        let quote = build_quote(profile, &spec);

        assert!(quote.basic_dimensions.water_surface.value > 0.0);
        assert!(quote.basic_dimensions.water_volume.value > 0.0);
        assert!(quote.earthworks.pit_volume.value > 0.0);
        assert!(quote.earthworks.trucks_count > 0);
        assert!(quote.concrete_works.total_volume.value > 0.0);
        assert!(quote.formwork.plywood_sheets > 0);
        assert!(quote.costs.total.amount > rust_decimal::Decimal::ZERO);
        assert!(quote.finishing_cost.total_cost.amount > rust_decimal::Decimal::ZERO);
    }
}
