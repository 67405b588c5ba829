use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, AddAssign, Sub, SubAssign};

use common_constants::{BPS, BPS_PRECISION, RAY, RAY_PRECISION, WAD, WAD_PRECISION};
use num_bigint::BigUint;
use num_traits::{One, Zero};

pub type NumDecimals = usize;

/// Fixed-point number: `raw / 10^scale`.
///
/// Equality and ordering compare the represented value, so `1.0` at scale 18
/// equals `1.0` at scale 27.
#[derive(Clone, Debug)]
pub struct Decimal {
    raw: BigUint,
    scale: NumDecimals,
}

impl Decimal {
    pub fn from_raw_units(raw: BigUint, scale: NumDecimals) -> Self {
        Decimal { raw, scale }
    }

    pub fn zero(scale: NumDecimals) -> Self {
        Decimal {
            raw: BigUint::zero(),
            scale,
        }
    }

    pub fn into_raw_units(&self) -> &BigUint {
        &self.raw
    }

    pub fn into_raw(self) -> BigUint {
        self.raw
    }

    pub fn scale(&self) -> NumDecimals {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// Changes the scale, truncating when precision is lost.
    pub fn rescale(&self, new_scale: NumDecimals) -> Self {
        match new_scale.cmp(&self.scale) {
            Ordering::Equal => self.clone(),
            Ordering::Greater => {
                let factor = pow10(new_scale - self.scale);
                Decimal::from_raw_units(&self.raw * factor, new_scale)
            },
            Ordering::Less => {
                let factor = pow10(self.scale - new_scale);
                Decimal::from_raw_units(&self.raw / factor, new_scale)
            },
        }
    }

    /// Subtraction at `self`'s scale; `None` if the result would be negative.
    pub fn checked_sub(&self, other: &Decimal) -> Option<Decimal> {
        let other = other.rescale(self.scale);
        if other.raw > self.raw {
            return None;
        }
        Some(Decimal::from_raw_units(&self.raw - other.raw, self.scale))
    }

    /// Subtraction at `self`'s scale, clamped at zero.
    pub fn saturating_sub(&self, other: &Decimal) -> Decimal {
        self.checked_sub(other)
            .unwrap_or_else(|| Decimal::zero(self.scale))
    }
}

fn pow10(exp: usize) -> BigUint {
    BigUint::from(10u64).pow(exp as u32)
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.scale == other.scale {
            return self.raw.cmp(&other.raw);
        }
        let common = self.scale.max(other.scale);
        self.rescale(common).raw.cmp(&other.rescale(common).raw)
    }
}

impl Add<&Decimal> for Decimal {
    type Output = Decimal;

    fn add(self, rhs: &Decimal) -> Decimal {
        let rhs = rhs.rescale(self.scale);
        Decimal::from_raw_units(self.raw + rhs.raw, self.scale)
    }
}

impl Add for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Decimal) -> Decimal {
        self + &rhs
    }
}

impl AddAssign<&Decimal> for Decimal {
    fn add_assign(&mut self, rhs: &Decimal) {
        let rhs = rhs.rescale(self.scale);
        self.raw += rhs.raw;
    }
}

impl AddAssign for Decimal {
    fn add_assign(&mut self, rhs: Decimal) {
        *self += &rhs;
    }
}

/// Panics on underflow, like `BigUint` subtraction. Use [`Decimal::checked_sub`]
/// when the operands are not already ordered.
impl Sub<&Decimal> for Decimal {
    type Output = Decimal;

    fn sub(self, rhs: &Decimal) -> Decimal {
        let rhs = rhs.rescale(self.scale);
        Decimal::from_raw_units(self.raw - rhs.raw, self.scale)
    }
}

impl Sub for Decimal {
    type Output = Decimal;

    fn sub(self, rhs: Decimal) -> Decimal {
        self - &rhs
    }
}

impl SubAssign<&Decimal> for Decimal {
    fn sub_assign(&mut self, rhs: &Decimal) {
        let rhs = rhs.rescale(self.scale);
        self.raw -= rhs.raw;
    }
}

impl SubAssign for Decimal {
    fn sub_assign(&mut self, rhs: Decimal) {
        *self -= &rhs;
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.raw.to_str_radix(10);
        if self.scale == 0 {
            return f.write_str(&digits);
        }
        let padded = if digits.len() <= self.scale {
            format!("{}{}", "0".repeat(self.scale - digits.len() + 1), digits)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - self.scale);
        write!(f, "{}.{}", int_part, frac_part)
    }
}

pub fn mul_half_up(a: &Decimal, b: &Decimal, precision: NumDecimals) -> Decimal {
    // Use target precision directly, no +1
    let scaled_a = a.rescale(precision);
    let scaled_b = b.rescale(precision);

    let product = scaled_a.raw * scaled_b.raw;

    // Half-up rounding at precision
    let scaled = pow10(precision);
    let half_scaled = &scaled / BigUint::from(2u64);

    let rounded_product = (product + half_scaled) / scaled;

    to_decimal(rounded_product, precision)
}

/// Panics if `b` is zero; callers check the denominator first.
pub fn div_half_up(a: &Decimal, b: &Decimal, precision: NumDecimals) -> Decimal {
    let scaled_a = a.rescale(precision);
    let scaled_b = b.rescale(precision);

    let scaled = pow10(precision);
    let numerator = scaled_a.raw * &scaled;
    let denominator = scaled_b.raw;

    let half_denominator = &denominator / BigUint::from(2u64);
    let rounded_quotient = (numerator + half_denominator) / denominator;

    to_decimal(rounded_quotient, precision)
}

pub fn rescale_half_up(value: &Decimal, new_precision: NumDecimals) -> Decimal {
    let old_precision = value.scale();

    match new_precision.cmp(&old_precision) {
        Ordering::Equal => value.clone(),
        Ordering::Less => {
            let factor = pow10(old_precision - new_precision);
            let half_factor = &factor / BigUint::from(2u64);

            let rounded_downscaled_value = (&value.raw + half_factor) / factor;
            Decimal::from_raw_units(rounded_downscaled_value, new_precision)
        },
        Ordering::Greater => value.rescale(new_precision),
    }
}

pub fn to_decimal(value: BigUint, precision: NumDecimals) -> Decimal {
    Decimal::from_raw_units(value, precision)
}

pub fn to_decimal_wad(value: BigUint) -> Decimal {
    to_decimal(value, WAD_PRECISION)
}

pub fn to_decimal_ray(value: BigUint) -> Decimal {
    to_decimal(value, RAY_PRECISION)
}

pub fn to_decimal_bps(value: BigUint) -> Decimal {
    to_decimal(value, BPS_PRECISION)
}

pub fn ray() -> Decimal {
    to_decimal(BigUint::from(RAY), RAY_PRECISION)
}

pub fn wad() -> Decimal {
    to_decimal(BigUint::from(WAD), WAD_PRECISION)
}

pub fn bps() -> Decimal {
    to_decimal(BigUint::from(BPS), BPS_PRECISION)
}

pub fn ray_zero() -> Decimal {
    Decimal::zero(RAY_PRECISION)
}

pub fn wad_zero() -> Decimal {
    Decimal::zero(WAD_PRECISION)
}

pub fn bps_zero() -> Decimal {
    Decimal::zero(BPS_PRECISION)
}

/// Integer `value` as a decimal with no fractional digits.
pub fn from_units(value: u64) -> Decimal {
    to_decimal(BigUint::from(value), 0)
}

pub fn one(precision: NumDecimals) -> Decimal {
    to_decimal(BigUint::one(), 0).rescale(precision)
}

pub fn get_min(a: Decimal, b: Decimal) -> Decimal {
    if a < b {
        a
    } else {
        b
    }
}

pub fn get_max(a: Decimal, b: Decimal) -> Decimal {
    if a > b {
        a
    } else {
        b
    }
}
