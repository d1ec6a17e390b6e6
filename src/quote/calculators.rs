//! Core quantity calculation functions.
//!
//! Pure functions for pool geometry, earthworks and concrete/formwork
//! quantities - no profile lookups, no HTTP. Inputs are millimeters,
//! outputs are meters / m² / m³ / kilograms.

use crate::error::AppError;

pub const MM_PER_M: f64 = 1000.0;

/// Sanity range for pool depth, millimeters
pub const DEPTH_MIN_MM: f64 = 1000.0;
pub const DEPTH_MAX_MM: f64 = 3000.0;

/// Validated pool dimensions, millimeters (inner sizes)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolSpec {
    pub length_mm: f64,
    pub width_mm: f64,
    pub depth_mm: f64,
    pub wall_thickness_mm: f64,
}

impl PoolSpec {
    /// Validate raw field values into a spec.
    ///
    /// Every field must be a strictly positive number; depth must also fall
    /// inside [`DEPTH_MIN_MM`]..=[`DEPTH_MAX_MM`].
    pub fn new(
        length_mm: f64,
        width_mm: f64,
        depth_mm: f64,
        wall_thickness_mm: f64,
    ) -> Result<Self, AppError> {
        check_positive("length", length_mm)?;
        check_positive("width", width_mm)?;
        check_positive("depth", depth_mm)?;
        check_positive("wall_thickness", wall_thickness_mm)?;

        if depth_mm < DEPTH_MIN_MM || depth_mm > DEPTH_MAX_MM {
            return Err(AppError::OutOfRange {
                field: "depth",
                message: format!(
                    "{} mm is outside the supported range {}-{} mm",
                    depth_mm, DEPTH_MIN_MM, DEPTH_MAX_MM
                ),
            });
        }

        Ok(Self {
            length_mm,
            width_mm,
            depth_mm,
            wall_thickness_mm,
        })
    }

    pub fn length_m(&self) -> f64 {
        self.length_mm / MM_PER_M
    }

    pub fn width_m(&self) -> f64 {
        self.width_mm / MM_PER_M
    }

    pub fn depth_m(&self) -> f64 {
        self.depth_mm / MM_PER_M
    }

    pub fn wall_m(&self) -> f64 {
        self.wall_thickness_mm / MM_PER_M
    }

    /// Outer length (inner + one wall each side), meters
    pub fn outer_length_m(&self) -> f64 {
        self.length_m() + 2.0 * self.wall_m()
    }

    /// Outer width (inner + one wall each side), meters
    pub fn outer_width_m(&self) -> f64 {
        self.width_m() + 2.0 * self.wall_m()
    }

    /// Perimeter by inner sizes, running meters
    pub fn inner_perimeter_m(&self) -> f64 {
        2.0 * (self.length_m() + self.width_m())
    }

    /// Perimeter by outer sizes, running meters
    pub fn outer_perimeter_m(&self) -> f64 {
        2.0 * (self.outer_length_m() + self.outer_width_m())
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<(), AppError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AppError::OutOfRange {
            field,
            message: format!("must be a positive number, got {}", value),
        });
    }
    Ok(())
}

/// Per-dimension multiplicative correction factors.
///
/// A curve-fit device tied to a pricing profile: factors force the
/// theoretical formula results toward the profile's quoted reference
/// values at its reference pool size. Identity factors leave the
/// theoretical values untouched.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct CorrectionFactors {
    pub water_surface: f64,
    pub perimeter: f64,
    pub wall_area: f64,
    pub finishing_area: f64,
    pub water_volume: f64,
}

impl CorrectionFactors {
    pub const IDENTITY: Self = Self {
        water_surface: 1.0,
        perimeter: 1.0,
        wall_area: 1.0,
        finishing_area: 1.0,
        water_volume: 1.0,
    };
}

impl Default for CorrectionFactors {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Basic pool dimensions derived from the spec
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasicDimensions {
    /// Water surface (inner footprint), m²
    pub water_surface: f64,
    /// Inner perimeter, running meters
    pub perimeter: f64,
    /// Wall surface (inner perimeter × depth), m²
    pub wall_area: f64,
    /// Surface to be finished (bottom + walls), m²
    pub finishing_area: f64,
    /// Water volume, m³
    pub water_volume: f64,
}

/// Calculate the basic dimensions, scaled by the given correction factors.
///
/// With identity factors `finishing_area == water_surface + wall_area`
/// holds exactly.
pub fn basic_dimensions(spec: &PoolSpec, factors: &CorrectionFactors) -> BasicDimensions {
    let water_surface = spec.length_m() * spec.width_m();
    let perimeter = spec.inner_perimeter_m();
    let wall_area = perimeter * spec.depth_m();
    let finishing_area = water_surface + wall_area;
    let water_volume = water_surface * spec.depth_m();

    BasicDimensions {
        water_surface: water_surface * factors.water_surface,
        perimeter: perimeter * factors.perimeter,
        wall_area: wall_area * factors.wall_area,
        finishing_area: finishing_area * factors.finishing_area,
        water_volume: water_volume * factors.water_volume,
    }
}

/// Earthworks coefficients.
///
/// The observed quoting variants disagree on these values; they are kept
/// as named configuration rather than generalized.
#[derive(Debug, Clone, Copy)]
pub struct EarthworksParams {
    /// Working clearance beyond the outer wall, meters per side
    pub working_margin_m: f64,
    /// Extra pit depth for gravel bed and lean-concrete sub-base, meters
    pub subbase_allowance_m: f64,
    /// Soil removal truck capacity, m³ per load
    pub truck_capacity_m3: f64,
}

impl Default for EarthworksParams {
    fn default() -> Self {
        Self {
            working_margin_m: 0.8,
            subbase_allowance_m: 0.2,
            truck_capacity_m3: 7.0,
        }
    }
}

/// Excavation pit quantities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarthworksResult {
    pub pit_length_m: f64,
    pub pit_width_m: f64,
    pub pit_depth_m: f64,
    /// Pit footprint, m²
    pub pit_area: f64,
    /// Excavated volume, m³
    pub pit_volume: f64,
    /// Pit volume minus the constructed pool shell volume, m³
    pub backfill_volume: f64,
    /// Soil hauled off site, m³
    pub removal_volume: f64,
    /// Truck loads, ceiling of removal / capacity
    pub trucks_count: u32,
}

pub fn earthworks(spec: &PoolSpec, params: &EarthworksParams) -> EarthworksResult {
    let pit_length_m = spec.length_m() + 2.0 * (spec.wall_m() + params.working_margin_m);
    let pit_width_m = spec.width_m() + 2.0 * (spec.wall_m() + params.working_margin_m);
    let pit_depth_m = spec.depth_m() + spec.wall_m() + params.subbase_allowance_m;

    let pit_area = pit_length_m * pit_width_m;
    let pit_volume = pit_area * pit_depth_m;

    let outer_depth_m = spec.depth_m() + spec.wall_m();
    let pool_volume = spec.outer_length_m() * spec.outer_width_m() * outer_depth_m;
    let backfill_volume = pit_volume - pool_volume;

    let removal_volume = pit_volume;
    let trucks_count = truck_loads(removal_volume, params.truck_capacity_m3);

    EarthworksResult {
        pit_length_m,
        pit_width_m,
        pit_depth_m,
        pit_area,
        pit_volume,
        backfill_volume,
        removal_volume,
        trucks_count,
    }
}

/// Truck loads needed to haul `volume_m3` away; fractional loads round up.
pub fn truck_loads(volume_m3: f64, capacity_m3: f64) -> u32 {
    (volume_m3 / capacity_m3).ceil() as u32
}

/// Concrete and formwork coefficients
#[derive(Debug, Clone, Copy)]
pub struct ConcreteParams {
    /// Gravel bed under the footprint, meters
    pub gravel_thickness_m: f64,
    /// Lean-concrete (M200) sub-base thickness, meters
    pub subbase_thickness_m: f64,
    /// Sub-base overhang beyond the outer footprint, meters per side
    pub subbase_margin_m: f64,
    /// One plywood sheet, m²
    pub plywood_sheet_area_m2: f64,
    /// Cutting-waste multiplier on formwork area
    pub cutting_waste: f64,
    /// Double-mesh reinforcement weight per m²
    pub rebar_kg_per_m2: f64,
    /// 50x100 timber per m² of formwork, running meters
    pub timber_m_per_m2: f64,
}

impl Default for ConcreteParams {
    fn default() -> Self {
        Self {
            gravel_thickness_m: 0.1,
            subbase_thickness_m: 0.1,
            subbase_margin_m: 0.6,
            plywood_sheet_area_m2: 2.25,
            cutting_waste: 1.2,
            rebar_kg_per_m2: 5.0,
            timber_m_per_m2: 3.0,
        }
    }
}

/// Concrete pour volumes by grade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConcreteResult {
    /// Gravel bed volume, m³
    pub gravel_volume: f64,
    /// M200 lean-concrete sub-base, m³
    pub subbase_volume: f64,
    /// Bottom slab (outer footprint × wall thickness), m³
    pub slab_volume: f64,
    /// Walls (inner perimeter × depth × wall thickness), m³
    pub walls_volume: f64,
    /// M300 structural pour (slab + walls), m³
    pub structural_volume: f64,
    /// All concrete (M200 + M300), m³
    pub total_volume: f64,
}

pub fn concrete_works(spec: &PoolSpec, params: &ConcreteParams) -> ConcreteResult {
    let outer_footprint = spec.outer_length_m() * spec.outer_width_m();

    let gravel_volume = outer_footprint * params.gravel_thickness_m;

    let subbase_length = spec.outer_length_m() + 2.0 * params.subbase_margin_m;
    let subbase_width = spec.outer_width_m() + 2.0 * params.subbase_margin_m;
    let subbase_volume = subbase_length * subbase_width * params.subbase_thickness_m;

    let slab_volume = outer_footprint * spec.wall_m();
    let walls_volume = spec.inner_perimeter_m() * spec.depth_m() * spec.wall_m();
    let structural_volume = slab_volume + walls_volume;

    ConcreteResult {
        gravel_volume,
        subbase_volume,
        slab_volume,
        walls_volume,
        structural_volume,
        total_volume: subbase_volume + structural_volume,
    }
}

/// Formwork surfaces and consumables
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormworkResult {
    /// Outer shuttering (outer perimeter × full shell height), m²
    pub outer_area: f64,
    /// Inner shuttering (inner perimeter × depth), m²
    pub inner_area: f64,
    pub total_area: f64,
    /// Plywood sheets, ceiling with cutting waste applied
    pub plywood_sheets: u32,
    /// Reinforcement weight over walls + bottom, kg
    pub rebar_weight_kg: f64,
    /// 50x100 timber, running meters
    pub timber_length_m: f64,
}

pub fn formwork(spec: &PoolSpec, params: &ConcreteParams) -> FormworkResult {
    let outer_height = spec.depth_m() + spec.wall_m();
    let outer_area = spec.outer_perimeter_m() * outer_height;
    let inner_area = spec.inner_perimeter_m() * spec.depth_m();
    let total_area = outer_area + inner_area;

    let plywood_sheets =
        (total_area / params.plywood_sheet_area_m2 * params.cutting_waste).ceil() as u32;

    let reinforcement_area = spec.inner_perimeter_m() * spec.depth_m()
        + spec.length_m() * spec.width_m();
    let rebar_weight_kg = reinforcement_area * params.rebar_kg_per_m2;

    let timber_length_m = total_area * params.timber_m_per_m2;

    FormworkResult {
        outer_area,
        inner_area,
        total_area,
        plywood_sheets,
        rebar_weight_kg,
        timber_length_m,
    }
}
