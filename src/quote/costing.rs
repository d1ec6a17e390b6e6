//! Cost aggregation over profile reference quotes.
//!
//! Implements the reference-scaling strategy: each profile carries the
//! quoted cost totals for its reference pool size, and a quote for an
//! arbitrary size scales those totals by weighted ratios of the computed
//! dimensions to the profile's reference dimensions. At the reference size
//! every ratio is 1 and the quote reproduces the reference costs exactly.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use super::calculators::BasicDimensions;
use super::profiles::{FinishingMethod, Profile, ReferenceBasicDimensions};

/// Scale weights: (surface, volume, perimeter)
const MATERIALS_WEIGHTS: (f64, f64, f64) = (0.4, 0.4, 0.2);
/// Scale weights: (finishing area, volume, perimeter)
const WORKS_WEIGHTS: (f64, f64, f64) = (0.5, 0.3, 0.2);
/// Equipment is mostly fixed: (volume, perimeter, fixed share)
const EQUIPMENT_WEIGHTS: (f64, f64, f64) = (0.2, 0.1, 0.7);

/// Round to specified decimal places using banker's rounding
/// (ROUND_HALF_EVEN), which reduces cumulative rounding bias.
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Lossy f64 -> Decimal conversion for quantity × price math
pub fn dec(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or_default()
}

/// Per-category multipliers against the profile's reference costs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostScales {
    pub materials: f64,
    pub works: f64,
    pub equipment: f64,
}

/// Weighted dimension ratios of the computed (corrected) dimensions to the
/// profile's reference dimensions.
pub fn cost_scales(dims: &BasicDimensions, reference: &ReferenceBasicDimensions) -> CostScales {
    let surface_ratio = dims.water_surface / reference.water_surface;
    let perimeter_ratio = dims.perimeter / reference.perimeter;
    let volume_ratio = dims.water_volume / reference.water_volume;
    let area_ratio = dims.finishing_area / reference.finishing_area;

    let (m_s, m_v, m_p) = MATERIALS_WEIGHTS;
    let (w_a, w_v, w_p) = WORKS_WEIGHTS;
    let (e_v, e_p, e_fixed) = EQUIPMENT_WEIGHTS;

    CostScales {
        materials: m_s * surface_ratio + m_v * volume_ratio + m_p * perimeter_ratio,
        works: w_a * area_ratio + w_v * volume_ratio + w_p * perimeter_ratio,
        equipment: e_v * volume_ratio + e_p * perimeter_ratio + e_fixed,
    }
}

/// Scaled cost totals, whole rubles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostTotals {
    pub materials_total: Decimal,
    pub works_total: Decimal,
    pub equipment_total: Decimal,
    pub total: Decimal,
}

/// Scale the profile's reference totals by the computed ratios.
pub fn scale_reference_costs(profile: &Profile, scales: &CostScales) -> CostTotals {
    let materials_total = round_money(profile.costs.materials_total * dec(scales.materials), 0);
    let works_total = round_money(profile.costs.works_total * dec(scales.works), 0);
    let equipment_total = round_money(profile.costs.equipment_total * dec(scales.equipment), 0);

    CostTotals {
        materials_total,
        works_total,
        equipment_total,
        total: materials_total + works_total + equipment_total,
    }
}

/// A named, priced line in a cost breakdown
#[derive(Debug, Clone)]
pub struct CostLine {
    pub name: String,
    pub amount: Decimal,
}

/// Display breakdown for a category: the profile's reference lines scaled
/// by the category ratio. Line rounding may leave a small residual against
/// the category total; the total is authoritative.
pub fn scaled_breakdown(lines: &[super::profiles::BreakdownLine], scale: f64) -> Vec<CostLine> {
    let scale = dec(scale);
    lines
        .iter()
        .map(|line| CostLine {
            name: line.name.clone(),
            amount: round_money(line.amount * scale, 0),
        })
        .collect()
}

/// Finishing cost result
#[derive(Debug, Clone)]
pub struct FinishingCost {
    /// Finishing area the cost was computed from, m²
    pub area: f64,
    /// Rim perimeter, running meters
    pub perimeter: f64,
    pub lines: Vec<CostLine>,
    pub material_cost: Decimal,
    pub work_cost: Decimal,
    pub total_cost: Decimal,
}

/// Price the bowl finish from the profile's finishing method.
pub fn finishing_cost(profile: &Profile, dims: &BasicDimensions) -> FinishingCost {
    let area = dims.finishing_area;
    let perimeter = dims.perimeter;

    match &profile.finishing {
        FinishingMethod::Liner {
            lining_price,
            coping_stone_price,
            coping_stone_step_m,
        } => {
            let lining = round_money(dec(area) * *lining_price, 0);
            let stone_count = (perimeter / coping_stone_step_m).ceil() as i64;
            let coping = round_money(Decimal::from(stone_count) * *coping_stone_price, 0);

            FinishingCost {
                area,
                perimeter,
                lines: vec![
                    CostLine {
                        name: "Лайнер с установкой".to_string(),
                        amount: lining,
                    },
                    CostLine {
                        name: "Копинговый камень".to_string(),
                        amount: coping,
                    },
                ],
                material_cost: lining + coping,
                // Installation is included in the liner price
                work_cost: Decimal::ZERO,
                total_cost: lining + coping,
            }
        }
        FinishingMethod::Tile => {
            let area_dec = dec(area);
            let price = |key: &str| profile.materials_prices.get(key).copied().unwrap_or_default();
            let work_price = |key: &str| profile.works_prices.get(key).copied().unwrap_or_default();

            let tile = round_money(area_dec * price("tile"), 0);
            let grout = round_money(area_dec * price("grout"), 0);
            let adhesive = round_money(area_dec * price("tile_adhesive"), 0);
            let waterproofing = round_money(area_dec * price("waterproofing"), 0);
            let laying = round_money(area_dec * work_price("tile_laying"), 0);
            let grouting = round_money(area_dec * work_price("grouting"), 0);

            let material_cost = tile + grout + adhesive + waterproofing;
            let work_cost = laying + grouting;

            FinishingCost {
                area,
                perimeter,
                lines: vec![
                    CostLine { name: "Плитка".to_string(), amount: tile },
                    CostLine { name: "Затирка".to_string(), amount: grout },
                    CostLine { name: "Клей для плитки".to_string(), amount: adhesive },
                    CostLine { name: "Гидроизоляция".to_string(), amount: waterproofing },
                    CostLine { name: "Укладка плитки".to_string(), amount: laying },
                    CostLine { name: "Затирка швов".to_string(), amount: grouting },
                ],
                material_cost,
                work_cost,
                total_cost: material_cost + work_cost,
            }
        }
        FinishingMethod::FlatRate {
            materials_rate,
            works_rate,
        } => {
            let material_cost = round_money(dec(area) * *materials_rate, 0);
            let work_cost = round_money(dec(area) * *works_rate, 0);

            FinishingCost {
                area,
                perimeter,
                lines: vec![
                    CostLine {
                        name: "Отделочные материалы".to_string(),
                        amount: material_cost,
                    },
                    CostLine {
                        name: "Отделочные работы".to_string(),
                        amount: work_cost,
                    },
                ],
                material_cost,
                work_cost,
                total_cost: material_cost + work_cost,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::calculators::{basic_dimensions, CorrectionFactors, PoolSpec};
    use crate::quote::profiles::ProfileStore;
    use rust_decimal_macros::dec as d;

    fn reference_dims(store: &ProfileStore, id: &str) -> BasicDimensions {
        let profile = store.get(id);
        let spec = PoolSpec::new(
            profile.dimensions.length,
            profile.dimensions.width,
            profile.dimensions.depth,
            profile.dimensions.wall_thickness,
        )
        .unwrap();
        basic_dimensions(&spec, &profile.correction_factors())
    }

    // ==================== round_money tests ====================

    #[test]
    fn test_round_money_bankers_rounding() {
        assert_eq!(round_money(d!(2.5), 0), d!(2));
        assert_eq!(round_money(d!(3.5), 0), d!(4));
        assert_eq!(round_money(d!(1.234), 2), d!(1.23));
        assert_eq!(round_money(d!(1.236), 2), d!(1.24));
    }

    #[test]
    fn test_round_money_negative() {
        assert_eq!(round_money(d!(-2.5), 0), d!(-2));
        assert_eq!(round_money(d!(-1.234), 2), d!(-1.23));
    }

    // ==================== cost_scales tests ====================

    #[test]
    fn test_scales_are_unity_at_reference_size() {
        let store = ProfileStore::builtin();
        for id in ["kp1", "kp2", "kp3"] {
            let profile = store.get(id);
            let scales = cost_scales(&reference_dims(&store, id), &profile.basic_dimensions);
            assert!((scales.materials - 1.0).abs() < 1e-12);
            assert!((scales.works - 1.0).abs() < 1e-12);
            assert!((scales.equipment - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_smaller_pool_scales_down_materials() {
        let store = ProfileStore::builtin();
        let profile = store.get("kp1");
        let spec = PoolSpec::new(4000.0, 2000.0, 1200.0, 200.0).unwrap();
        let dims = basic_dimensions(&spec, &profile.correction_factors());
        let scales = cost_scales(&dims, &profile.basic_dimensions);
        assert!(scales.materials < 1.0);
        assert!(scales.works < 1.0);
        // Equipment carries a 0.7 fixed share and shrinks more slowly
        assert!(scales.equipment > scales.materials);
    }

    // ==================== scale_reference_costs tests ====================

    #[test]
    fn test_reference_size_reproduces_reference_costs() {
        let store = ProfileStore::builtin();
        let profile = store.get("kp1");
        let scales = cost_scales(&reference_dims(&store, "kp1"), &profile.basic_dimensions);
        let totals = scale_reference_costs(profile, &scales);

        assert_eq!(totals.materials_total, d!(817876));
        assert_eq!(totals.works_total, d!(931860));
        assert_eq!(totals.equipment_total, d!(1149928));
        assert_eq!(totals.total, d!(2899664));
    }

    #[test]
    fn test_totals_are_whole_rubles() {
        let store = ProfileStore::builtin();
        let profile = store.get("kp2");
        let spec = PoolSpec::new(6000.0, 3000.0, 1400.0, 200.0).unwrap();
        let dims = basic_dimensions(&spec, &profile.correction_factors());
        let totals = scale_reference_costs(profile, &cost_scales(&dims, &profile.basic_dimensions));

        for amount in [
            totals.materials_total,
            totals.works_total,
            totals.equipment_total,
            totals.total,
        ] {
            assert!(amount > Decimal::ZERO);
            assert_eq!(round_money(amount, 0), amount);
        }
    }

    // ==================== finishing_cost tests ====================

    #[test]
    fn test_liner_finishing_at_kp1_reference() {
        let store = ProfileStore::builtin();
        let profile = store.get("kp1");
        let cost = finishing_cost(profile, &reference_dims(&store, "kp1"));

        // 71.6 m² × 5400 руб/m²
        assert_eq!(cost.lines[0].amount, d!(386640));
        // ceil(24.0 / 0.5) = 48 stones × 2600 руб
        assert_eq!(cost.lines[1].amount, d!(124800));
        assert_eq!(cost.material_cost, d!(511440));
        assert_eq!(cost.work_cost, Decimal::ZERO);
        assert_eq!(cost.total_cost, d!(511440));
    }

    #[test]
    fn test_tile_finishing_at_kp2_reference() {
        let store = ProfileStore::builtin();
        let profile = store.get("kp2");
        let cost = finishing_cost(profile, &reference_dims(&store, "kp2"));

        // area 57.0: materials 57 × (2500+300+400+800), works 57 × (2500+300)
        assert_eq!(cost.material_cost, d!(228000));
        assert_eq!(cost.work_cost, d!(159600));
        assert_eq!(cost.total_cost, d!(387600));
        assert_eq!(cost.lines.len(), 6);
    }

    #[test]
    fn test_flat_rate_finishing_at_kp3_reference() {
        let store = ProfileStore::builtin();
        let profile = store.get("kp3");
        let cost = finishing_cost(profile, &reference_dims(&store, "kp3"));

        assert_eq!(cost.material_cost, d!(171000)); // 57 × 3000
        assert_eq!(cost.work_cost, d!(114000)); // 57 × 2000
        assert_eq!(cost.total_cost, d!(285000));
    }

    // ==================== scaled_breakdown tests ====================

    #[test]
    fn test_breakdown_unscaled_at_unity() {
        let store = ProfileStore::builtin();
        let profile = store.get("kp2");
        let lines = scaled_breakdown(&profile.materials_breakdown, 1.0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].amount, d!(275000));
        let sum: Decimal = lines.iter().map(|l| l.amount).sum();
        assert_eq!(sum, profile.costs.materials_total);
    }

    #[test]
    fn test_breakdown_scales_each_line() {
        let store = ProfileStore::builtin();
        let profile = store.get("kp3");
        let lines = scaled_breakdown(&profile.works_breakdown, 0.5);
        assert_eq!(lines[0].amount, d!(45000)); // 90000 × 0.5
        assert_eq!(lines[3].amount, d!(55000)); // 110000 × 0.5
    }
}
