//! Core pricing calculation functions.
//!
//! Pure functions for glazing price math - no database access, no cache, no clock.
//! Every quote line in the application is priced through `compute_line_price`
//! and every quote total through `compute_quote_totals`.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::PricingError;

/// Thickness assumed when a line item does not specify one (standard float glass).
pub const REFERENCE_THICKNESS_MM: Decimal = dec!(6);

const MEDIUM_THICKNESS_MM: Decimal = dec!(10);
const HEAVY_THICKNESS_MM: Decimal = dec!(20);
const MEDIUM_THICKNESS_MULTIPLIER: Decimal = dec!(1.2);
const HEAVY_THICKNESS_MULTIPLIER: Decimal = dec!(1.5);

const SMALL_PIECE_AREA_M2: Decimal = dec!(0.5);
const BULK_AREA_M2: Decimal = dec!(5);
const SMALL_PIECE_SURCHARGE: Decimal = dec!(1.3);
const BULK_DISCOUNT: Decimal = dec!(0.9);

const CM_PER_M: Decimal = dec!(100);

/// Largest amount a stored money column holds (`NUMERIC(14, 2)`).
pub const MAX_MONEY: Decimal = dec!(999999999999.99);

/// Round a monetary amount to `places` decimals, halves away from zero.
///
/// Client-facing quotes use conventional commercial rounding, so 0.125
/// becomes 0.13 rather than the banker's 0.12. The result always carries
/// exactly `places` decimals, so 150 is returned as 150.00.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use glazing_quotes::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(3));
/// assert_eq!(round_money(dec!(0.125), 2), dec!(0.13));
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(places);
    rounded
}

/// Pricing parameters of a catalog product
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingProfile {
    /// Price per square meter
    pub base_price_per_unit_area: Decimal,
    pub complexity_factor: Decimal,
    pub thickness_base_factor: Decimal,
    /// Floor applied to the unit price
    pub minimum_price: Decimal,
}

impl PricingProfile {
    /// Check every field is inside the domain the engine accepts.
    pub fn validate(&self) -> Result<(), PricingError> {
        require_positive_profile("base_price_per_unit_area", self.base_price_per_unit_area)?;
        require_positive_profile("complexity_factor", self.complexity_factor)?;
        require_positive_profile("thickness_base_factor", self.thickness_base_factor)?;
        if self.minimum_price < Decimal::ZERO {
            return Err(PricingError::InvalidProfile {
                field: "minimum_price",
                reason: format!("must be zero or positive (got {})", self.minimum_price),
            });
        }
        if self.minimum_price > MAX_MONEY {
            return Err(PricingError::InvalidProfile {
                field: "minimum_price",
                reason: format!("must not exceed {} (got {})", MAX_MONEY, self.minimum_price),
            });
        }
        Ok(())
    }
}

/// A requested piece of glass on a quote line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineItemRequest {
    pub width_cm: Decimal,
    pub length_cm: Decimal,
    /// `None` means the reference thickness
    pub thickness_mm: Option<Decimal>,
    pub quantity: i32,
}

impl LineItemRequest {
    pub fn effective_thickness_mm(&self) -> Decimal {
        self.thickness_mm.unwrap_or(REFERENCE_THICKNESS_MM)
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        require_positive_dimension("width_cm", self.width_cm)?;
        require_positive_dimension("length_cm", self.length_cm)?;
        require_positive_dimension("thickness_mm", self.effective_thickness_mm())?;
        if self.quantity < 1 {
            return Err(PricingError::InvalidDimensions {
                field: "quantity",
                reason: format!("must be at least 1 (got {})", self.quantity),
            });
        }
        Ok(())
    }
}

/// Priced quote line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceResult {
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Step-by-step account of how a line price was reached
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBreakdown {
    pub area_m2: Decimal,
    pub thickness_mm: Decimal,
    pub thickness_multiplier: Decimal,
    pub area_adjustment: Decimal,
    /// Unit price before the minimum clamp, unrounded
    pub computed_unit_price: Decimal,
    pub minimum_applied: bool,
    pub result: PriceResult,
}

/// Quote-level totals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteTotals {
    pub total_before_tax: Decimal,
    pub tax_amount: Decimal,
    pub total_with_tax: Decimal,
}

impl QuoteTotals {
    pub fn zero() -> Self {
        Self {
            total_before_tax: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            total_with_tax: Decimal::ZERO,
        }
    }
}

/// Surface of a piece in square meters, from centimeter dimensions.
///
/// `None` when the surface does not fit in a `Decimal`.
pub fn area_m2(width_cm: Decimal, length_cm: Decimal) -> Option<Decimal> {
    (width_cm / CM_PER_M).checked_mul(length_cm / CM_PER_M)
}

/// Multiplier for thickness, starting from the product's base factor.
///
/// Thresholds are exclusive: exactly 10 mm gets no surcharge and exactly
/// 20 mm gets the medium one. `None` on overflow.
pub fn thickness_multiplier(thickness_base_factor: Decimal, thickness_mm: Decimal) -> Option<Decimal> {
    if thickness_mm > HEAVY_THICKNESS_MM {
        thickness_base_factor.checked_mul(HEAVY_THICKNESS_MULTIPLIER)
    } else if thickness_mm > MEDIUM_THICKNESS_MM {
        thickness_base_factor.checked_mul(MEDIUM_THICKNESS_MULTIPLIER)
    } else {
        Some(thickness_base_factor)
    }
}

/// Small-piece surcharge or bulk discount for a given surface.
pub fn area_adjustment(area_m2: Decimal) -> Decimal {
    if area_m2 < SMALL_PIECE_AREA_M2 {
        SMALL_PIECE_SURCHARGE
    } else if area_m2 > BULK_AREA_M2 {
        BULK_DISCOUNT
    } else {
        Decimal::ONE
    }
}

/// Price one quote line and report every factor that went into it.
pub fn explain_line_price(
    profile: &PricingProfile,
    request: &LineItemRequest,
) -> Result<PriceBreakdown, PricingError> {
    profile.validate()?;
    request.validate()?;

    let thickness_mm = request.effective_thickness_mm();
    let area = area_m2(request.width_cm, request.length_cm).ok_or_else(|| out_of_range("area_m2"))?;
    let thickness_multiplier = thickness_multiplier(profile.thickness_base_factor, thickness_mm)
        .ok_or_else(|| out_of_range("thickness_multiplier"))?;
    let area_adjustment = area_adjustment(area);

    let base_price = [
        profile.base_price_per_unit_area,
        profile.complexity_factor,
        thickness_multiplier,
        area_adjustment,
    ]
    .into_iter()
    .try_fold(area, |price, factor| price.checked_mul(factor))
    .ok_or_else(|| out_of_range("unit_price"))?;

    let minimum_applied = base_price < profile.minimum_price;
    let unit_price = money_in_range("unit_price", base_price.max(profile.minimum_price))?;
    let line_total = unit_price
        .checked_mul(Decimal::from(request.quantity))
        .ok_or_else(|| out_of_range("line_total"))
        .and_then(|total| money_in_range("line_total", total))?;

    Ok(PriceBreakdown {
        area_m2: area,
        thickness_mm,
        thickness_multiplier,
        area_adjustment,
        computed_unit_price: base_price,
        minimum_applied,
        result: PriceResult {
            unit_price,
            line_total,
        },
    })
}

/// Price one quote line.
///
/// Deterministic: identical inputs always give identical output.
pub fn compute_line_price(
    profile: &PricingProfile,
    request: &LineItemRequest,
) -> Result<PriceResult, PricingError> {
    explain_line_price(profile, request).map(|breakdown| breakdown.result)
}

/// Aggregate priced lines into quote totals.
///
/// An empty quote is valid and totals to zero.
pub fn compute_quote_totals(
    lines: &[PriceResult],
    tax_rate_percent: Decimal,
) -> Result<QuoteTotals, PricingError> {
    totals_from_line_totals(lines.iter().map(|l| l.line_total), tax_rate_percent)
}

/// Same as `compute_quote_totals`, from bare line totals (e.g. persisted rows).
pub fn totals_from_line_totals<I>(
    line_totals: I,
    tax_rate_percent: Decimal,
) -> Result<QuoteTotals, PricingError>
where
    I: IntoIterator<Item = Decimal>,
{
    if tax_rate_percent < Decimal::ZERO {
        return Err(PricingError::InvalidTaxRate(tax_rate_percent));
    }

    let sum = line_totals
        .into_iter()
        .try_fold(Decimal::ZERO, |sum, line_total| sum.checked_add(line_total))
        .ok_or_else(|| out_of_range("total_before_tax"))?;
    let total_before_tax = money_in_range("total_before_tax", sum)?;

    let tax = total_before_tax
        .checked_mul(tax_rate_percent)
        .and_then(|amount| amount.checked_div(dec!(100)))
        .ok_or_else(|| out_of_range("tax_amount"))?;
    let tax_amount = money_in_range("tax_amount", tax)?;

    let total_with_tax = money_in_range("total_with_tax", total_before_tax + tax_amount)?;

    Ok(QuoteTotals {
        total_before_tax,
        tax_amount,
        total_with_tax,
    })
}

/// Round to cents and check the amount fits a money column.
fn money_in_range(field: &'static str, amount: Decimal) -> Result<Decimal, PricingError> {
    let rounded = round_money(amount, 2);
    if rounded.abs() > MAX_MONEY {
        return Err(out_of_range(field));
    }
    Ok(rounded)
}

fn out_of_range(field: &'static str) -> PricingError {
    PricingError::AmountOutOfRange {
        field,
        reason: format!("exceeds the largest supported amount ({})", MAX_MONEY),
    }
}

fn require_positive_profile(field: &'static str, value: Decimal) -> Result<(), PricingError> {
    if value > Decimal::ZERO {
        Ok(())
    } else {
        Err(PricingError::InvalidProfile {
            field,
            reason: format!("must be positive (got {})", value),
        })
    }
}

fn require_positive_dimension(field: &'static str, value: Decimal) -> Result<(), PricingError> {
    if value > Decimal::ZERO {
        Ok(())
    } else {
        Err(PricingError::InvalidDimensions {
            field,
            reason: format!("must be positive (got {})", value),
        })
    }
}
