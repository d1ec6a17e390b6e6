//! Response DTOs for the quoting API endpoints.
//!
//! Every physical quantity carries both the raw numeric value and a
//! formatted display string with its Russian unit suffix; money carries
//! the decimal amount (string-serialized) and a grouped ruble display.
//! Formatting happens only here - nothing downstream parses it back.

use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::{
    BasicDimensions, ConcreteResult, EarthworksResult, FormworkResult, PoolSpec, MM_PER_M,
};
use super::costing::{round_money, CostLine, CostTotals, FinishingCost};
use super::profiles::ProfileSummary;
use super::requests::Customer;

/// Numeric quantity with a display string (`"32.0 м²"`)
#[derive(Debug, Clone, Serialize)]
pub struct Quantity {
    pub value: f64,
    pub display: String,
}

impl Quantity {
    /// Area, m², one decimal place
    pub fn area(value: f64) -> Self {
        Self {
            value,
            display: format!("{:.1} м²", value),
        }
    }

    /// Volume, m³, one decimal place
    pub fn volume(value: f64) -> Self {
        Self {
            value,
            display: format!("{:.1} м³", value),
        }
    }

    /// Running meters (perimeters, timber), one decimal place
    pub fn running_meters(value: f64) -> Self {
        Self {
            value,
            display: format!("{:.1} м/п", value),
        }
    }

    /// Millimeters, whole numbers
    pub fn millimeters(value: f64) -> Self {
        Self {
            value,
            display: format!("{:.0} мм", value),
        }
    }

    /// Kilograms, whole numbers
    pub fn kilograms(value: f64) -> Self {
        Self {
            value,
            display: format!("{:.0} кг", value),
        }
    }
}

/// Money value with a grouped ruble display (`"817 876 руб."`)
#[derive(Debug, Clone, Serialize)]
pub struct Money {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub display: String,
}

impl Money {
    pub fn rub(amount: Decimal) -> Self {
        Self {
            display: format_rub(amount),
            amount,
        }
    }
}

/// Format a ruble amount with space-grouped thousands, whole rubles.
pub fn format_rub(amount: Decimal) -> String {
    let rounded = round_money(amount, 0);
    let digits = rounded.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{} руб.", sign, grouped)
}

/// Basic pool dimensions section of a quote
#[derive(Debug, Clone, Serialize)]
pub struct BasicDimensionsResponse {
    pub length: Quantity,
    pub width: Quantity,
    pub depth: Quantity,
    pub wall_thickness: Quantity,
    pub water_surface: Quantity,
    pub perimeter: Quantity,
    pub wall_area: Quantity,
    pub finishing_area: Quantity,
    pub water_volume: Quantity,
}

impl BasicDimensionsResponse {
    pub fn new(spec: &PoolSpec, dims: &BasicDimensions) -> Self {
        Self {
            length: Quantity::millimeters(spec.length_mm),
            width: Quantity::millimeters(spec.width_mm),
            depth: Quantity::millimeters(spec.depth_mm),
            wall_thickness: Quantity::millimeters(spec.wall_thickness_mm),
            water_surface: Quantity::area(dims.water_surface),
            perimeter: Quantity::running_meters(dims.perimeter),
            wall_area: Quantity::area(dims.wall_area),
            finishing_area: Quantity::area(dims.finishing_area),
            water_volume: Quantity::volume(dims.water_volume),
        }
    }
}

/// Earthworks section of a quote
#[derive(Debug, Clone, Serialize)]
pub struct EarthworksResponse {
    pub pit_length: Quantity,
    pub pit_width: Quantity,
    pub pit_depth: Quantity,
    pub pit_area: Quantity,
    pub pit_volume: Quantity,
    pub backfill_volume: Quantity,
    pub removal_volume: Quantity,
    pub trucks_count: u32,
}

impl From<&EarthworksResult> for EarthworksResponse {
    fn from(result: &EarthworksResult) -> Self {
        Self {
            pit_length: Quantity::millimeters(result.pit_length_m * MM_PER_M),
            pit_width: Quantity::millimeters(result.pit_width_m * MM_PER_M),
            pit_depth: Quantity::millimeters(result.pit_depth_m * MM_PER_M),
            pit_area: Quantity::area(result.pit_area),
            pit_volume: Quantity::volume(result.pit_volume),
            backfill_volume: Quantity::volume(result.backfill_volume),
            removal_volume: Quantity::volume(result.removal_volume),
            trucks_count: result.trucks_count,
        }
    }
}

/// Concrete pour section of a quote
#[derive(Debug, Clone, Serialize)]
pub struct ConcreteWorksResponse {
    pub gravel_volume: Quantity,
    pub subbase_volume: Quantity,
    pub slab_volume: Quantity,
    pub walls_volume: Quantity,
    pub structural_volume: Quantity,
    pub total_volume: Quantity,
}

impl From<&ConcreteResult> for ConcreteWorksResponse {
    fn from(result: &ConcreteResult) -> Self {
        Self {
            gravel_volume: Quantity::volume(result.gravel_volume),
            subbase_volume: Quantity::volume(result.subbase_volume),
            slab_volume: Quantity::volume(result.slab_volume),
            walls_volume: Quantity::volume(result.walls_volume),
            structural_volume: Quantity::volume(result.structural_volume),
            total_volume: Quantity::volume(result.total_volume),
        }
    }
}

/// Formwork section of a quote
#[derive(Debug, Clone, Serialize)]
pub struct FormworkResponse {
    pub outer_area: Quantity,
    pub inner_area: Quantity,
    pub total_area: Quantity,
    pub plywood_sheets: u32,
    pub rebar_weight: Quantity,
    pub timber_length: Quantity,
}

impl From<&FormworkResult> for FormworkResponse {
    fn from(result: &FormworkResult) -> Self {
        Self {
            outer_area: Quantity::area(result.outer_area),
            inner_area: Quantity::area(result.inner_area),
            total_area: Quantity::area(result.total_area),
            plywood_sheets: result.plywood_sheets,
            rebar_weight: Quantity::kilograms(result.rebar_weight_kg),
            timber_length: Quantity::running_meters(result.timber_length_m),
        }
    }
}

/// A priced breakdown line
#[derive(Debug, Clone, Serialize)]
pub struct CostLineResponse {
    pub name: String,
    pub amount: Money,
}

impl From<&CostLine> for CostLineResponse {
    fn from(line: &CostLine) -> Self {
        Self {
            name: line.name.clone(),
            amount: Money::rub(line.amount),
        }
    }
}

/// Category breakdown with its authoritative total
#[derive(Debug, Clone, Serialize)]
pub struct CostCategoryResponse {
    pub items: Vec<CostLineResponse>,
    pub total: Money,
}

impl CostCategoryResponse {
    pub fn new(lines: &[CostLine], total: Decimal) -> Self {
        Self {
            items: lines.iter().map(CostLineResponse::from).collect(),
            total: Money::rub(total),
        }
    }
}

/// Finishing cost section of a quote
#[derive(Debug, Clone, Serialize)]
pub struct FinishingCostResponse {
    pub area: Quantity,
    pub perimeter: Quantity,
    pub items: Vec<CostLineResponse>,
    pub material_cost: Money,
    pub work_cost: Money,
    pub total_cost: Money,
}

impl From<&FinishingCost> for FinishingCostResponse {
    fn from(cost: &FinishingCost) -> Self {
        Self {
            area: Quantity::area(cost.area),
            perimeter: Quantity::running_meters(cost.perimeter),
            items: cost.lines.iter().map(CostLineResponse::from).collect(),
            material_cost: Money::rub(cost.material_cost),
            work_cost: Money::rub(cost.work_cost),
            total_cost: Money::rub(cost.total_cost),
        }
    }
}

/// Scaled cost totals section of a quote
#[derive(Debug, Clone, Serialize)]
pub struct CostTotalsResponse {
    pub materials_total: Money,
    pub works_total: Money,
    pub equipment_total: Money,
    pub total: Money,
}

impl From<&CostTotals> for CostTotalsResponse {
    fn from(totals: &CostTotals) -> Self {
        Self {
            materials_total: Money::rub(totals.materials_total),
            works_total: Money::rub(totals.works_total),
            equipment_total: Money::rub(totals.equipment_total),
            total: Money::rub(totals.total),
        }
    }
}

/// Full quote returned by `POST /calculate`
#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    pub profile: ProfileSummary,
    pub basic_dimensions: BasicDimensionsResponse,
    pub earthworks: EarthworksResponse,
    pub concrete_works: ConcreteWorksResponse,
    pub formwork: FormworkResponse,
    pub finishing_cost: FinishingCostResponse,
    pub materials_cost: CostCategoryResponse,
    pub works_cost: CostCategoryResponse,
    pub costs: CostTotalsResponse,
}

/// Response for `GET /get_profiles`
#[derive(Debug, Serialize)]
pub struct ProfileListResponse {
    pub profiles: Vec<ProfileSummary>,
}

/// Per-field calc vs estimate comparison
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonEntry {
    pub calc: f64,
    pub estimate: f64,
    pub diff: f64,
}

impl ComparisonEntry {
    pub fn new(calc: f64, estimate: f64, places: u32) -> Self {
        let factor = 10f64.powi(places as i32);
        Self {
            calc,
            estimate,
            diff: ((calc - estimate) * factor).round() / factor,
        }
    }
}

/// Dimension-side comparison block
#[derive(Debug, Serialize)]
pub struct DimensionsComparison {
    pub water_surface: ComparisonEntry,
    pub perimeter: ComparisonEntry,
    pub wall_area: ComparisonEntry,
    pub finishing_area: ComparisonEntry,
    pub water_volume: ComparisonEntry,
}

/// Cost-side comparison block
#[derive(Debug, Serialize)]
pub struct CostsComparison {
    pub materials: ComparisonEntry,
    pub work: ComparisonEntry,
    pub equipment: ComparisonEntry,
    pub total: ComparisonEntry,
}

/// Response for `POST /compare_estimate`
#[derive(Debug, Serialize)]
pub struct CompareEstimateResponse {
    pub dimensions: DimensionsComparison,
    pub costs: CostsComparison,
}

/// Response for `POST /generate_kp`: the quote plus document metadata
#[derive(Debug, Serialize)]
pub struct GenerateKpResponse {
    #[serde(flatten)]
    pub quote: QuoteResponse,
    pub customer: Customer,
    /// DD.MM.YYYY
    pub generation_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    // ==================== formatting tests ====================

    #[test]
    fn test_quantity_display_units() {
        assert_eq!(Quantity::area(32.0).display, "32.0 м²");
        assert_eq!(Quantity::volume(47.96).display, "48.0 м³");
        assert_eq!(Quantity::running_meters(24.0).display, "24.0 м/п");
        assert_eq!(Quantity::millimeters(1900.0).display, "1900 мм");
        assert_eq!(Quantity::kilograms(340.4).display, "340 кг");
    }

    #[test]
    fn test_quantity_keeps_raw_value() {
        let q = Quantity::area(71.5999);
        assert_eq!(q.value, 71.5999);
        assert_eq!(q.display, "71.6 м²");
    }

    #[test]
    fn test_format_rub_groups_thousands() {
        assert_eq!(format_rub(dec!(817876)), "817 876 руб.");
        assert_eq!(format_rub(dec!(2899664)), "2 899 664 руб.");
        assert_eq!(format_rub(dec!(500)), "500 руб.");
        assert_eq!(format_rub(dec!(0)), "0 руб.");
        assert_eq!(format_rub(dec!(1000)), "1 000 руб.");
    }

    #[test]
    fn test_format_rub_rounds_and_signs() {
        assert_eq!(format_rub(dec!(1234.49)), "1 234 руб.");
        assert_eq!(format_rub(dec!(-56000)), "-56 000 руб.");
    }

    #[test]
    fn test_money_serializes_amount_as_string() {
        let money = Money::rub(dec!(124800));
        let json = serde_json::to_value(&money).unwrap();
        assert_eq!(json["amount"], "124800");
        assert_eq!(json["display"], "124 800 руб.");
    }

    // ==================== comparison tests ====================

    #[test]
    fn test_comparison_entry_rounds_diff() {
        let entry = ComparisonEntry::new(32.04, 32.0, 2);
        assert!((entry.diff - 0.04).abs() < 1e-9);

        let entry = ComparisonEntry::new(817876.0, 820000.0, 0);
        assert_eq!(entry.diff, -2124.0);
    }
}
