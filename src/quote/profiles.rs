//! Commercial-proposal (KP) pricing profiles.
//!
//! A profile bundles a reference pool size, the quoted costs for that size
//! and per-unit price tables. Profiles are read-only process-wide
//! configuration: built once at startup and shared behind `Arc`.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::calculators::{basic_dimensions, CorrectionFactors, PoolSpec};

/// Profile used when the caller omits or mistypes the id
pub const DEFAULT_PROFILE_ID: &str = "kp1";

/// Reference pool size the profile was quoted for, millimeters
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReferenceDimensions {
    pub length: f64,
    pub width: f64,
    pub depth: f64,
    pub wall_thickness: f64,
}

/// Quoted basic dimensions for the reference pool size
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReferenceBasicDimensions {
    pub water_surface: f64,
    pub perimeter: f64,
    pub wall_area: f64,
    pub finishing_area: f64,
    pub water_volume: f64,
}

/// Quoted cost totals for the reference pool size, whole rubles
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReferenceCosts {
    #[serde(with = "rust_decimal::serde::str")]
    pub materials_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub works_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub equipment_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
}

/// How the bowl finish is priced for this profile
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum FinishingMethod {
    /// PVC liner plus coping stone around the rim; installation is
    /// included in the liner price
    Liner {
        #[serde(with = "rust_decimal::serde::str")]
        lining_price: Decimal,
        #[serde(with = "rust_decimal::serde::str")]
        coping_stone_price: Decimal,
        /// One coping stone per this many running meters of rim
        coping_stone_step_m: f64,
    },
    /// Tile over waterproofing, priced from the profile's unit tables
    Tile,
    /// Flat per-m² rates for materials and labor
    FlatRate {
        #[serde(with = "rust_decimal::serde::str")]
        materials_rate: Decimal,
        #[serde(with = "rust_decimal::serde::str")]
        works_rate: Decimal,
    },
}

/// Named line inside a category breakdown, reference-size rubles
#[derive(Debug, Clone, Serialize)]
pub struct BreakdownLine {
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

impl BreakdownLine {
    fn new(name: &str, amount: Decimal) -> Self {
        Self {
            name: name.to_string(),
            amount,
        }
    }
}

/// One KP pricing profile
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub dimensions: ReferenceDimensions,
    pub basic_dimensions: ReferenceBasicDimensions,
    pub costs: ReferenceCosts,
    pub materials_prices: BTreeMap<String, Decimal>,
    pub works_prices: BTreeMap<String, Decimal>,
    pub finishing: FinishingMethod,
    pub materials_breakdown: Vec<BreakdownLine>,
    pub works_breakdown: Vec<BreakdownLine>,
}

impl Profile {
    /// Correction factors fitted at this profile's own reference size:
    /// quoted reference value over the theoretical formula value.
    ///
    /// Applying them to the theoretical dimensions of the reference pool
    /// reproduces the quoted reference dimensions exactly. Behavior far
    /// from the reference size is a curve fit, not engineering.
    pub fn correction_factors(&self) -> CorrectionFactors {
        let spec = PoolSpec {
            length_mm: self.dimensions.length,
            width_mm: self.dimensions.width,
            depth_mm: self.dimensions.depth,
            wall_thickness_mm: self.dimensions.wall_thickness,
        };
        let theoretical = basic_dimensions(&spec, &CorrectionFactors::IDENTITY);

        CorrectionFactors {
            water_surface: self.basic_dimensions.water_surface / theoretical.water_surface,
            perimeter: self.basic_dimensions.perimeter / theoretical.perimeter,
            wall_area: self.basic_dimensions.wall_area / theoretical.wall_area,
            finishing_area: self.basic_dimensions.finishing_area / theoretical.finishing_area,
            water_volume: self.basic_dimensions.water_volume / theoretical.water_volume,
        }
    }
}

/// Lightweight id/name pair for listings
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub id: String,
    pub name: String,
}

/// Immutable lookup table of KP profiles
#[derive(Debug)]
pub struct ProfileStore {
    profiles: BTreeMap<String, Profile>,
}

impl ProfileStore {
    /// Store with the three builtin KP profiles
    pub fn builtin() -> Self {
        let mut profiles = BTreeMap::new();
        for profile in [kp1(), kp2(), kp3()] {
            profiles.insert(profile.id.clone(), profile);
        }
        Self { profiles }
    }

    /// Lookup with fallback to [`DEFAULT_PROFILE_ID`]; never fails.
    pub fn get(&self, id: &str) -> &Profile {
        self.profiles.get(id).unwrap_or_else(|| {
            self.profiles
                .get(DEFAULT_PROFILE_ID)
                .expect("builtin store always contains the default profile")
        })
    }

    /// Strict lookup for routes that reject unknown ids
    pub fn find(&self, id: &str) -> Option<&Profile> {
        self.profiles.get(id)
    }

    pub fn list(&self) -> Vec<ProfileSummary> {
        self.profiles
            .values()
            .map(|p| ProfileSummary {
                id: p.id.clone(),
                name: p.name.clone(),
            })
            .collect()
    }
}

fn standard_materials_prices() -> BTreeMap<String, Decimal> {
    BTreeMap::from([
        ("concrete".to_string(), dec!(5000)),       // per m³
        ("rebar".to_string(), dec!(80000)),         // per tonne
        ("pvc_film".to_string(), dec!(1200)),       // per m²
        ("tile".to_string(), dec!(2500)),           // per m²
        ("grout".to_string(), dec!(300)),           // per m²
        ("waterproofing".to_string(), dec!(800)),   // per m²
        ("tile_adhesive".to_string(), dec!(400)),   // per m²
    ])
}

fn standard_works_prices() -> BTreeMap<String, Decimal> {
    BTreeMap::from([
        ("earthworks".to_string(), dec!(1500)),     // per m³
        ("concrete_works".to_string(), dec!(3500)), // per m³
        ("reinforcement".to_string(), dec!(2500)),  // per m³
        ("waterproofing".to_string(), dec!(800)),   // per m²
        ("tile_laying".to_string(), dec!(2500)),    // per m²
        ("grouting".to_string(), dec!(300)),        // per m²
        ("equipment_installation".to_string(), dec!(15000)), // fixed
        ("commissioning".to_string(), dec!(20000)), // fixed
    ])
}

fn kp1() -> Profile {
    Profile {
        id: "kp1".to_string(),
        name: "КП №1 (8000x4000x1500)".to_string(),
        dimensions: ReferenceDimensions {
            length: 8000.0,
            width: 4000.0,
            depth: 1500.0,
            wall_thickness: 200.0,
        },
        basic_dimensions: ReferenceBasicDimensions {
            water_surface: 32.0,
            perimeter: 24.0,
            wall_area: 39.6,
            finishing_area: 71.6,
            water_volume: 48.0,
        },
        costs: ReferenceCosts {
            materials_total: dec!(817876),
            works_total: dec!(931860),
            equipment_total: dec!(1149928),
            total: dec!(2899664),
        },
        materials_prices: standard_materials_prices(),
        works_prices: standard_works_prices(),
        finishing: FinishingMethod::Liner {
            lining_price: dec!(5400),
            coping_stone_price: dec!(2600),
            coping_stone_step_m: 0.5,
        },
        materials_breakdown: vec![
            BreakdownLine::new("Земляные работы", dec!(48800)),
            BreakdownLine::new("Транспорт", dec!(97500)),
            BreakdownLine::new("Песок и щебень", dec!(17300)),
            BreakdownLine::new("Материалы опалубки", dec!(144500)),
            BreakdownLine::new("Арматура и сопутствующие", dec!(177000)),
            BreakdownLine::new("Бетон с доставкой", dec!(169750)),
            BreakdownLine::new("Вспомогательные материалы", dec!(162026)),
        ],
        works_breakdown: vec![
            BreakdownLine::new("Подготовительные работы", dec!(73000)),
            BreakdownLine::new("Земляные работы", dec!(29000)),
            BreakdownLine::new("Бетонирование", dec!(177600)),
            BreakdownLine::new("Опалубка и армирование", dec!(204260)),
            BreakdownLine::new("Монтаж закладных", dec!(40500)),
            BreakdownLine::new("Обратная засыпка", dec!(50400)),
            BreakdownLine::new("Отделочные работы", dec!(252100)),
            BreakdownLine::new("Монтаж бортового камня", dec!(65000)),
            BreakdownLine::new("Разгрузка материалов", dec!(30000)),
        ],
    }
}

fn kp2() -> Profile {
    Profile {
        id: "kp2".to_string(),
        name: "КП №2 (8000x3000x1500)".to_string(),
        dimensions: ReferenceDimensions {
            length: 8000.0,
            width: 3000.0,
            depth: 1500.0,
            wall_thickness: 200.0,
        },
        basic_dimensions: ReferenceBasicDimensions {
            water_surface: 23.0,
            perimeter: 22.0,
            wall_area: 33.0,
            finishing_area: 57.0,
            water_volume: 34.5,
        },
        costs: ReferenceCosts {
            materials_total: dec!(583398),
            works_total: dec!(615690),
            equipment_total: dec!(929369),
            total: dec!(2128457),
        },
        materials_prices: standard_materials_prices(),
        works_prices: standard_works_prices(),
        finishing: FinishingMethod::Tile,
        materials_breakdown: vec![
            BreakdownLine::new("Строительные материалы", dec!(275000)),
            BreakdownLine::new("Отделочные материалы", dec!(180000)),
            BreakdownLine::new("Вспомогательные материалы", dec!(128398)),
        ],
        works_breakdown: vec![
            BreakdownLine::new("Подготовительные и земляные работы", dec!(120000)),
            BreakdownLine::new("Бетонные работы", dec!(180000)),
            BreakdownLine::new("Опалубка и армирование", dec!(105000)),
            BreakdownLine::new("Отделочные работы", dec!(170690)),
            BreakdownLine::new("Монтаж бортового камня", dec!(40000)),
        ],
    }
}

fn kp3() -> Profile {
    let materials_prices = BTreeMap::from([
        ("concrete".to_string(), dec!(4800)),
        ("rebar".to_string(), dec!(75000)),
        ("pvc_film".to_string(), dec!(1100)),
        ("tile".to_string(), dec!(2300)),
        ("grout".to_string(), dec!(280)),
        ("waterproofing".to_string(), dec!(750)),
        ("tile_adhesive".to_string(), dec!(380)),
    ]);
    let works_prices = BTreeMap::from([
        ("earthworks".to_string(), dec!(1400)),
        ("concrete_works".to_string(), dec!(3300)),
        ("reinforcement".to_string(), dec!(2300)),
        ("waterproofing".to_string(), dec!(750)),
        ("tile_laying".to_string(), dec!(2300)),
        ("grouting".to_string(), dec!(280)),
        ("equipment_installation".to_string(), dec!(14000)),
        ("commissioning".to_string(), dec!(18000)),
    ]);

    Profile {
        id: "kp3".to_string(),
        name: "КП №3 (8000x3000x1500) - Упрощенный".to_string(),
        dimensions: ReferenceDimensions {
            length: 8000.0,
            width: 3000.0,
            depth: 1500.0,
            wall_thickness: 200.0,
        },
        basic_dimensions: ReferenceBasicDimensions {
            water_surface: 23.0,
            perimeter: 22.0,
            wall_area: 33.0,
            finishing_area: 57.0,
            water_volume: 34.5,
        },
        costs: ReferenceCosts {
            materials_total: dec!(320631),
            works_total: dec!(394284),
            equipment_total: dec!(728694),
            total: dec!(1443609),
        },
        materials_prices,
        works_prices,
        finishing: FinishingMethod::FlatRate {
            materials_rate: dec!(3000),
            works_rate: dec!(2000),
        },
        materials_breakdown: vec![
            BreakdownLine::new("Строительные материалы", dec!(180000)),
            BreakdownLine::new("Отделочные материалы", dec!(90000)),
            BreakdownLine::new("Вспомогательные материалы", dec!(50631)),
        ],
        works_breakdown: vec![
            BreakdownLine::new("Подготовительные и земляные работы", dec!(90000)),
            BreakdownLine::new("Бетонные работы", dec!(104284)),
            BreakdownLine::new("Опалубка и армирование", dec!(90000)),
            BreakdownLine::new("Отделочные работы", dec!(110000)),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_store_lists_all_profiles() {
        let store = ProfileStore::builtin();
        let list = store.list();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].id, "kp1");
        assert_eq!(list[1].id, "kp2");
        assert_eq!(list[2].id, "kp3");
    }

    #[test]
    fn test_unknown_id_falls_back_to_default() {
        let store = ProfileStore::builtin();
        assert_eq!(store.get("doesnotexist").id, "kp1");
        assert_eq!(store.get("").id, "kp1");
        assert_eq!(store.get("kp2").id, "kp2");
    }

    #[test]
    fn test_find_is_strict() {
        let store = ProfileStore::builtin();
        assert!(store.find("doesnotexist").is_none());
        assert!(store.find("kp3").is_some());
    }

    #[test]
    fn test_kp1_correction_factors() {
        let store = ProfileStore::builtin();
        let factors = store.get("kp1").correction_factors();
        // Theoretical at 8x4x1.5: surface 32, perimeter 24, wall 36,
        // finishing 68, volume 48
        assert!(close(factors.water_surface, 1.0));
        assert!(close(factors.perimeter, 1.0));
        assert!(close(factors.wall_area, 39.6 / 36.0));
        assert!(close(factors.finishing_area, 71.6 / 68.0));
        assert!(close(factors.water_volume, 1.0));
    }

    #[test]
    fn test_factors_reproduce_reference_dimensions() {
        use crate::quote::calculators::{basic_dimensions, PoolSpec};

        let store = ProfileStore::builtin();
        for id in ["kp1", "kp2", "kp3"] {
            let profile = store.get(id);
            let spec = PoolSpec::new(
                profile.dimensions.length,
                profile.dimensions.width,
                profile.dimensions.depth,
                profile.dimensions.wall_thickness,
            )
            .unwrap();
            let dims = basic_dimensions(&spec, &profile.correction_factors());
            assert!(close(dims.water_surface, profile.basic_dimensions.water_surface));
            assert!(close(dims.perimeter, profile.basic_dimensions.perimeter));
            assert!(close(dims.wall_area, profile.basic_dimensions.wall_area));
            assert!(close(dims.finishing_area, profile.basic_dimensions.finishing_area));
            assert!(close(dims.water_volume, profile.basic_dimensions.water_volume));
        }
    }

    #[test]
    fn test_reference_cost_components_sum_to_total() {
        let store = ProfileStore::builtin();
        for id in ["kp1", "kp2", "kp3"] {
            let costs = &store.get(id).costs;
            assert_eq!(
                costs.materials_total + costs.works_total + costs.equipment_total,
                costs.total
            );
        }
    }
}
