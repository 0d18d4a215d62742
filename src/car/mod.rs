//! Platform independent car types: the resolved [`CarParams`] record, its inputs, safety layers and per-cycle events.

pub mod disable_ecu;
pub mod events;
pub mod fingerprint;
pub mod safety;

pub use disable_ecu::{disable_ecu, COM_CONT_REQ};
pub use events::{create_button_events, ButtonEvent, ButtonType, EventName};
pub use fingerprint::{CarFw, Ecu, Fingerprint};
pub use safety::{SafetyConfig, SafetyModel, SafetyParam};

use crate::hyundai::{Candidate, HyundaiFlags};

/// Linear interpolation over `(xp, fp)`, clamped to the end values outside of the breakpoints. `xp` must be non-decreasing.
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let n = xp.len().min(fp.len());
    if n == 0 {
        return 0.;
    }
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[n - 1] {
        return fp[n - 1];
    }

    let hi = xp[..n].partition_point(|&p| p <= x);
    let lo = hi - 1;
    fp[lo] + (x - xp[lo]) * (fp[hi] - fp[lo]) / (xp[hi] - xp[lo])
}

/// Gain as a function of speed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TuningCurve {
    pub bp: Vec<f64>,
    pub v: Vec<f64>,
}

impl TuningCurve {
    pub fn new(bp: &[f64], v: &[f64]) -> Self {
        debug_assert_eq!(bp.len(), v.len());
        debug_assert!(bp.windows(2).all(|w| w[0] <= w[1]));
        Self {
            bp: bp.to_vec(),
            v: v.to_vec(),
        }
    }

    pub fn eval(&self, x: f64) -> f64 {
        interp(x, &self.bp, &self.v)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LongitudinalTuning {
    pub kp: TuningCurve,
    pub ki: TuningCurve,
}

impl Default for LongitudinalTuning {
    fn default() -> Self {
        Self {
            kp: TuningCurve::new(&[0.], &[1.]),
            ki: TuningCurve::new(&[0.], &[1.]),
        }
    }
}

/// Where the physical parameters of a [`CarParams`] came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecsSource {
    Table,
    Community,
    /// Neither the table nor the community provider knew the platform
    Default,
}

/// The resolved vehicle configuration. Produced once per session and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarParams {
    pub car_name: String,
    pub car_fingerprint: Candidate,
    pub flags: HyundaiFlags,
    pub specs_source: SpecsSource,
    pub dashcam_only: bool,
    pub radar_unavailable: bool,

    pub mass: f64,
    pub wheelbase: f64,
    pub steer_ratio: f64,
    pub tire_stiffness_factor: f64,
    /// m/s
    pub min_steer_speed: f64,
    pub center_to_front: f64,

    pub steer_actuator_delay: f64,
    pub steer_limit_timer: f64,

    pub longitudinal_tuning: LongitudinalTuning,
    pub stopping_decel_rate: f64,
    pub experimental_longitudinal_available: bool,
    /// This session sends the adaptive cruise commands
    pub longitudinal_control: bool,
    /// The factory cruise module owns engagement and set speed
    pub pcm_cruise: bool,
    pub stopping_control: bool,
    pub starting_state: bool,
    pub v_ego_starting: f64,
    pub v_ego_stopping: f64,
    pub start_accel: f64,
    pub longitudinal_actuator_delay_lower_bound: f64,
    pub longitudinal_actuator_delay_upper_bound: f64,
    pub radar_time_step: f64,

    pub enable_bsm: bool,
    pub has_auto_hold: bool,
    pub has_lfa_hda: bool,
    pub has_nav: bool,
    pub has_scc13: bool,
    pub has_scc14: bool,

    /// Applied by the enforcement layer in list order
    pub safety_configs: Vec<SafetyConfig>,
    /// Bus carrying the adaptive cruise (SCC) messages
    pub scc_bus: Option<u8>,
}

impl Default for CarParams {
    fn default() -> Self {
        Self {
            car_name: String::new(),
            car_fingerprint: Candidate::Community(String::new()),
            flags: HyundaiFlags::empty(),
            specs_source: SpecsSource::Default,
            dashcam_only: false,
            radar_unavailable: true,
            mass: 1500.,
            wheelbase: 2.7,
            steer_ratio: 15.,
            tire_stiffness_factor: 1.,
            min_steer_speed: 0.,
            center_to_front: 0.,
            steer_actuator_delay: 0.,
            steer_limit_timer: 1.,
            longitudinal_tuning: LongitudinalTuning::default(),
            stopping_decel_rate: 0.8,
            experimental_longitudinal_available: false,
            longitudinal_control: false,
            pcm_cruise: true,
            stopping_control: false,
            starting_state: false,
            v_ego_starting: 0.5,
            v_ego_stopping: 0.5,
            start_accel: 0.,
            longitudinal_actuator_delay_lower_bound: 0.15,
            longitudinal_actuator_delay_upper_bound: 0.15,
            radar_time_step: 0.05,
            enable_bsm: false,
            has_auto_hold: false,
            has_lfa_hda: false,
            has_nav: false,
            has_scc13: false,
            has_scc14: false,
            safety_configs: vec![],
            scc_bus: None,
        }
    }
}

impl CarParams {
    /// The layer carrying the active parameter bits.
    pub fn active_safety_config(&self) -> Option<&SafetyConfig> {
        self.safety_configs.last()
    }

    /// Adaptive cruise is replaced on bus 0, so the radar has to be silenced and its points read instead.
    pub fn is_radar_point(&self) -> bool {
        self.longitudinal_control && self.scc_bus == Some(0)
    }

    /// Gate run before a session starts. Resolution itself never fails; this rejects records that must not be used to drive.
    pub fn validate(&self) -> std::result::Result<(), crate::hyundai::Error> {
        if self.specs_source == SpecsSource::Default {
            return Err(crate::hyundai::Error::UnsupportedVehicle(self.car_fingerprint.to_string()));
        }
        if self.longitudinal_control && self.scc_bus.is_none() {
            return Err(crate::hyundai::Error::SccBusUnassigned);
        }
        if self.safety_configs.is_empty() {
            return Err(crate::hyundai::Error::NoSafetyConfig);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interp_clamps() {
        let xp = [10., 20., 50.];
        let fp = [2., 1.5, 1.];
        assert_eq!(interp(0., &xp, &fp), 2.);
        assert_eq!(interp(100., &xp, &fp), 1.);
        assert_eq!(interp(15., &xp, &fp), 1.75);
        assert_eq!(interp(20., &xp, &fp), 1.5);
    }

    #[test]
    fn interp_single_point() {
        assert_eq!(interp(42., &[0.], &[0.1]), 0.1);
        assert_eq!(interp(42., &[], &[]), 0.);
    }

    #[test]
    fn default_params_do_not_validate() {
        assert!(matches!(
            CarParams::default().validate(),
            Err(crate::hyundai::Error::UnsupportedVehicle(_))
        ));
    }

    #[test]
    fn longitudinal_without_scc_bus_does_not_validate() {
        let cp = CarParams {
            specs_source: SpecsSource::Table,
            longitudinal_control: true,
            scc_bus: None,
            safety_configs: vec![SafetyConfig::new(SafetyModel::Hyundai)],
            ..Default::default()
        };
        assert_eq!(cp.validate(), Err(crate::hyundai::Error::SccBusUnassigned));
    }
}
