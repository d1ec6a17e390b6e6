//! Request DTOs for the quoting API endpoints.
//!
//! Dimension fields are deserialized as `Option<f64>` so the handler can
//! report `missing_field` / `out_of_range` per field instead of a generic
//! body error.

use serde::Deserialize;

use crate::error::AppError;
use crate::quote::calculators::PoolSpec;

/// Pool dimensions as received over the wire, millimeters
#[derive(Debug, Clone, Deserialize)]
pub struct PoolDimensionsRequest {
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub depth: Option<f64>,
    #[serde(default)]
    pub wall_thickness: Option<f64>,
}

impl PoolDimensionsRequest {
    /// Validate into a [`PoolSpec`]
    pub fn validate(&self) -> Result<PoolSpec, AppError> {
        let length = self.length.ok_or(AppError::MissingField("length"))?;
        let width = self.width.ok_or(AppError::MissingField("width"))?;
        let depth = self.depth.ok_or(AppError::MissingField("depth"))?;
        let wall_thickness = self
            .wall_thickness
            .ok_or(AppError::MissingField("wall_thickness"))?;

        PoolSpec::new(length, width, depth, wall_thickness)
    }
}

/// Request body for `POST /calculate`
#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    #[serde(flatten)]
    pub dimensions: PoolDimensionsRequest,
    #[serde(default)]
    pub profile_id: Option<String>,
}

/// Request body for the profile-only endpoints
/// (`/get_prices`, `/get_costs`, `/get_dimensions_correction`)
#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub profile_id: Option<String>,
}

/// Externally quoted values to compare a calculation against
#[derive(Debug, Default, Deserialize)]
pub struct EstimateValues {
    #[serde(default)]
    pub water_surface: Option<f64>,
    #[serde(default)]
    pub perimeter: Option<f64>,
    #[serde(default)]
    pub wall_area: Option<f64>,
    #[serde(default)]
    pub finishing_area: Option<f64>,
    #[serde(default)]
    pub water_volume: Option<f64>,
    #[serde(default)]
    pub materials_cost: Option<f64>,
    #[serde(default)]
    pub work_cost: Option<f64>,
    #[serde(default)]
    pub equipment_cost: Option<f64>,
    #[serde(default)]
    pub total_cost: Option<f64>,
}

/// Request body for `POST /compare_estimate`
#[derive(Debug, Deserialize)]
pub struct CompareEstimateRequest {
    #[serde(flatten)]
    pub dimensions: PoolDimensionsRequest,
    #[serde(default)]
    pub profile_id: Option<String>,
    #[serde(default)]
    pub estimate: EstimateValues,
}

/// Customer contact block for a commercial proposal
#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub struct Customer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Customer {
    /// Name, address and phone are required for a KP document.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::MissingField("customer.name"));
        }
        if self.address.trim().is_empty() {
            return Err(AppError::MissingField("customer.address"));
        }
        if self.phone.trim().is_empty() {
            return Err(AppError::MissingField("customer.phone"));
        }
        Ok(())
    }
}

/// Request body for `POST /generate_kp`
#[derive(Debug, Deserialize)]
pub struct GenerateKpRequest {
    #[serde(flatten)]
    pub dimensions: PoolDimensionsRequest,
    #[serde(default)]
    pub profile_id: Option<String>,
    #[serde(default)]
    pub customer: Option<Customer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_is_reported_by_name() {
        let request = PoolDimensionsRequest {
            length: Some(8000.0),
            width: Some(4000.0),
            depth: None,
            wall_thickness: Some(200.0),
        };
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("depth"));
    }

    #[test]
    fn test_valid_dimensions_pass() {
        let request = PoolDimensionsRequest {
            length: Some(8000.0),
            width: Some(4000.0),
            depth: Some(1500.0),
            wall_thickness: Some(200.0),
        };
        let spec = request.validate().unwrap();
        assert_eq!(spec.length_mm, 8000.0);
    }

    #[test]
    fn test_customer_requires_contact_fields() {
        let customer = Customer {
            name: "Иванов И.И.".to_string(),
            address: "".to_string(),
            phone: "+7 900 000-00-00".to_string(),
            email: None,
        };
        let err = customer.validate().unwrap_err();
        assert!(err.to_string().contains("customer.address"));

        let customer = Customer {
            name: "Иванов И.И.".to_string(),
            address: "г. Ростов-на-Дону".to_string(),
            phone: "+7 900 000-00-00".to_string(),
            email: None,
        };
        assert!(customer.validate().is_ok());
    }

    #[test]
    fn test_calculate_request_deserializes_flat_body() {
        let body = r#"{"length": 8000, "width": 4000, "depth": 1500,
                       "wall_thickness": 200, "profile_id": "kp2"}"#;
        let request: CalculateRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.profile_id.as_deref(), Some("kp2"));
        assert_eq!(request.dimensions.length, Some(8000.0));
    }
}
