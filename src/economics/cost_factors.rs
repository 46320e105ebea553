//! Present-value cost breakdown of one component.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::Serialize;

use super::discount::{ReplacementSchedule, annuity_factor, discount_factor};
use crate::components::Project;
use crate::error::Result;

/// Prices and quantities describing one component for cost evaluation.
///
/// Prices are per unit of `quantity` (kW or kWh). `om_price` is a yearly
/// amount per unit, `fuel_consumption` a yearly quantity of fuel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostInputs {
    /// Sizing quantity (rated kW or kWh).
    pub quantity: f64,
    /// Initial investment price per unit.
    pub investment_price: f64,
    /// Replacement price per unit.
    pub replacement_price: f64,
    /// Salvage price per unit, for a brand new unit.
    pub salvage_price: f64,
    /// Yearly operation and maintenance price per unit.
    pub om_price: f64,
    /// Component lifetime (years), possibly infinite.
    pub lifetime: f64,
    /// Yearly fuel consumption (fuel unit).
    pub fuel_consumption: f64,
    /// Fuel price per fuel unit.
    pub fuel_price: f64,
}

/// Present-value costs of a component over the project lifetime.
///
/// Salvage is a credit and therefore `<= 0` for non-negative prices.
/// `total` is always the sum of the five other terms. Breakdowns add up
/// component-wise, which is how the system totals are formed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CostFactors {
    /// Initial investment.
    pub investment: f64,
    /// Discounted replacements.
    pub replacement: f64,
    /// Discounted operation and maintenance.
    pub om: f64,
    /// Discounted fuel.
    pub fuel: f64,
    /// Discounted salvage value of the remaining life (negative).
    pub salvage: f64,
    /// Sum of all terms.
    pub total: f64,
}

impl CostFactors {
    /// Builds a breakdown from its terms, deriving the total.
    pub fn new(investment: f64, replacement: f64, om: f64, fuel: f64, salvage: f64) -> Self {
        Self {
            investment,
            replacement,
            om,
            fuel,
            salvage,
            total: investment + replacement + om + fuel + salvage,
        }
    }

    /// Evaluates the present-value costs of a component.
    ///
    /// Replacements happen at years `L, 2L, ...` before the project end and
    /// are discounted at those (possibly fractional) times. The share of the
    /// last unit's life that remains at project end is credited as salvage,
    /// discounted from the final year. O&M and fuel are yearly amounts
    /// discounted with the annuity factor.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::MicrogridError`] if the project is invalid, the
    /// lifetime is not positive, or the replacement count overflows.
    pub fn from_prices(project: &Project, inputs: &CostInputs) -> Result<Self> {
        project.validate()?;
        let rate = project.discount_rate;
        let annuity = annuity_factor(project);
        let schedule = ReplacementSchedule::new(project.lifetime, inputs.lifetime)?;

        let replacement_discount: f64 = schedule
            .years()
            .map(|year| discount_factor(rate, year))
            .sum();
        let final_discount = discount_factor(rate, f64::from(project.lifetime));

        let investment = inputs.investment_price * inputs.quantity;
        let replacement = inputs.replacement_price * inputs.quantity * replacement_discount;
        let om = inputs.om_price * inputs.quantity * annuity;
        let fuel = inputs.fuel_price * inputs.fuel_consumption * annuity;
        let salvage = -inputs.salvage_price
            * inputs.quantity
            * schedule.remaining_fraction
            * final_discount;

        Ok(Self::new(investment, replacement, om, fuel, salvage))
    }

    /// Terms as `[investment, replacement, om, fuel, salvage, total]`.
    pub fn as_row(&self) -> [f64; 6] {
        [
            self.investment,
            self.replacement,
            self.om,
            self.fuel,
            self.salvage,
            self.total,
        ]
    }
}

impl Add for CostFactors {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            investment: self.investment + rhs.investment,
            replacement: self.replacement + rhs.replacement,
            om: self.om + rhs.om,
            fuel: self.fuel + rhs.fuel,
            salvage: self.salvage + rhs.salvage,
            total: self.total + rhs.total,
        }
    }
}

impl AddAssign for CostFactors {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for CostFactors {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl<'a> Sum<&'a CostFactors> for CostFactors {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
