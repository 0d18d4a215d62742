//! Unit conversion factors.

pub const MPH_TO_KPH: f64 = 1.609344;
pub const KPH_TO_MPH: f64 = 1. / MPH_TO_KPH;
pub const MS_TO_KPH: f64 = 3.6;
pub const KPH_TO_MS: f64 = 1. / MS_TO_KPH;
pub const MS_TO_MPH: f64 = MS_TO_KPH * KPH_TO_MPH;
pub const MPH_TO_MS: f64 = MPH_TO_KPH * KPH_TO_MS;
pub const LB_TO_KG: f64 = 0.453592;
