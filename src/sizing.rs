//! Roof area and target capacity estimation.

use crate::config::ConfigError;
use crate::error::EstimateError;
use crate::pv::system::MIN_SYSTEM_SIZE_KW;

/// Share of roof area converted to nameplate capacity (kW per m² / 1 kW/m²).
pub const DEFAULT_MODULE_EFFICIENCY: f64 = 0.18;
/// Ground size of one roof-mask pixel (m).
pub const DEFAULT_MASK_RESOLUTION_M: f64 = 0.1;
/// Typical annual yield used to size from an electricity bill (kWh/kW).
pub const DEFAULT_SPECIFIC_YIELD_KWH_PER_KW: f64 = 1400.0;

/// Rounds to two decimals.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn invalid(field: &str, message: &str) -> EstimateError {
    EstimateError::from(ConfigError {
        field: field.to_string(),
        message: message.to_string(),
    })
}

/// Target DC capacity (kW) for a usable roof area.
///
/// The result is rounded to two decimals and never below
/// [`MIN_SYSTEM_SIZE_KW`].
///
/// # Errors
///
/// Returns [`EstimateError::Validation`] for a non-positive or non-finite
/// area or efficiency.
pub fn size_from_area(area_m2: f64, module_efficiency: f64) -> Result<f64, EstimateError> {
    if !area_m2.is_finite() || area_m2 <= 0.0 {
        return Err(invalid("roof.area_m2", "must be > 0"));
    }
    if !module_efficiency.is_finite() || module_efficiency <= 0.0 || module_efficiency > 1.0 {
        return Err(invalid("roof.module_efficiency", "must be in (0, 1]"));
    }
    Ok(round2(area_m2 * module_efficiency).max(MIN_SYSTEM_SIZE_KW))
}

/// Usable area (m²) from the number of roof pixels in a segmentation mask.
pub fn area_from_mask(roof_pixels: u64, resolution_m: f64) -> f64 {
    round2(roof_pixels as f64 * resolution_m * resolution_m)
}

/// Roof area (m²) needed to offset a monthly electricity bill.
///
/// # Errors
///
/// Returns [`EstimateError::Validation`] for non-positive inputs.
pub fn area_from_bill(
    monthly_bill: f64,
    tariff_per_kwh: f64,
    specific_yield_kwh_per_kw: f64,
    module_efficiency: f64,
) -> Result<f64, EstimateError> {
    if !monthly_bill.is_finite() || monthly_bill <= 0.0 {
        return Err(invalid("roof.monthly_bill", "must be > 0"));
    }
    if !tariff_per_kwh.is_finite() || tariff_per_kwh <= 0.0 {
        return Err(invalid("finance.tariff_per_kwh", "must be > 0 to size from a bill"));
    }
    if !specific_yield_kwh_per_kw.is_finite() || specific_yield_kwh_per_kw <= 0.0 {
        return Err(invalid("roof.specific_yield_kwh_per_kw", "must be > 0"));
    }
    if !module_efficiency.is_finite() || module_efficiency <= 0.0 {
        return Err(invalid("roof.module_efficiency", "must be in (0, 1]"));
    }
    let annual_kwh = monthly_bill * 12.0 / tariff_per_kwh;
    let size_kw = annual_kwh / specific_yield_kwh_per_kw;
    Ok(round2(size_kw / module_efficiency))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_square_metres_is_three_point_six_kw() {
        assert_eq!(size_from_area(20.0, DEFAULT_MODULE_EFFICIENCY).ok(), Some(3.6));
    }

    #[test]
    fn tiny_roof_is_floored() {
        assert_eq!(size_from_area(0.01, DEFAULT_MODULE_EFFICIENCY).ok(), Some(MIN_SYSTEM_SIZE_KW));
    }

    #[test]
    fn non_positive_area_is_rejected() {
        for area in [0.0, -5.0, f64::NAN] {
            let r = size_from_area(area, DEFAULT_MODULE_EFFICIENCY);
            assert!(matches!(r, Err(EstimateError::Validation(_))), "area {area}");
        }
    }

    #[test]
    fn mask_pixels_to_area() {
        assert_eq!(area_from_mask(2000, DEFAULT_MASK_RESOLUTION_M), 20.0);
        assert_eq!(area_from_mask(0, DEFAULT_MASK_RESOLUTION_M), 0.0);
    }

    #[test]
    fn bill_to_area() {
        // 3000/month at 8/kWh = 4500 kWh/yr -> 3.214 kW -> 17.86 m²
        let area = area_from_bill(3000.0, 8.0, 1400.0, 0.18).ok();
        assert_eq!(area, Some(17.86));
    }

    #[test]
    fn bill_needs_a_tariff() {
        assert!(area_from_bill(3000.0, 0.0, 1400.0, 0.18).is_err());
    }
}
