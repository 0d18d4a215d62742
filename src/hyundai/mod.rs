//! Hyundai, Kia and Genesis car interface.
//!
//! [`CarInterface::get_params`] resolves a [`CarParams`] from the fingerprint, firmware and preferences. It is total: every candidate produces a record, and [`CarParams::validate`] decides whether that record may be used. [`CarInterface::init`] runs the startup handshake and [`CarInterface::update`] the per-cycle logic.

pub mod canbus;
pub mod community;
pub mod error;
pub mod flags;
pub mod values;

pub use canbus::CanBus;
pub use community::{CommunityProvider, NoCommunity};
pub use error::Error;
pub use flags::HyundaiFlags;
pub use values::{Buttons, Candidate, Car, CarSpecs};

use tracing::info;

use crate::can::AsyncCanAdapter;
use crate::car::{
    create_button_events, disable_ecu, interp, ButtonEvent, CarFw, CarParams, Ecu, EventName, Fingerprint,
    LongitudinalTuning, SafetyConfig, SafetyModel, SafetyParam, SpecsSource, TuningCurve, COM_CONT_REQ,
};
use crate::conversions::{KPH_TO_MS, MS_TO_KPH};
use crate::params::{ParamKey, ParamsReader};

pub const ACCEL_MIN: f64 = -3.5;
pub const ACCEL_MAX: f64 = 2.0;

/// Start of the radar track messages on bus 1.
pub const RADAR_START_ADDR: u32 = 0x500;

const LEGACY_RADAR_ADDR: u32 = 0x7d0;
const HDA2_RADAR_ADDR: u32 = 0x730;
const BLINKER_ADDR: u32 = 0x7b1;

const LOW_SPEED_ALERT_ON: f64 = 2.;
const LOW_SPEED_ALERT_OFF: f64 = 4.;
const LOW_SPEED_ALERT_MIN: f64 = 10.;

/// Raw driver inputs of one control cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarStateInput {
    /// m/s
    pub v_ego: f64,
    /// Recent raw cruise button samples, oldest first. The last one is the current state.
    pub cruise_buttons: Vec<u8>,
    /// Recent main (cruise on/off) button samples.
    pub main_buttons: Vec<bool>,
}

impl CarStateInput {
    pub fn cruise_button(&self) -> u8 {
        self.cruise_buttons.last().copied().unwrap_or(Buttons::NONE)
    }
}

/// State carried from one control cycle to the next.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct CycleState {
    pub prev_cruise_button: u8,
    pub low_speed_alert: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleOutput {
    pub button_events: Vec<ButtonEvent>,
    /// The driver showed an intention to engage
    pub allow_enable: bool,
    pub events: Vec<EventName>,
}

pub struct CarInterface;

impl CarInterface {
    /// Resolve the configuration of `candidate`.
    pub fn get_params(
        candidate: Candidate,
        fingerprint: &Fingerprint,
        car_fw: &[CarFw],
        experimental_long: bool,
        params: &dyn ParamsReader,
        community: &dyn CommunityProvider,
    ) -> CarParams {
        let car = candidate.car();
        let canfd = candidate.is_canfd();

        let mut ret = CarParams {
            car_name: "hyundai".to_string(),
            car_fingerprint: candidate.clone(),
            // Next-generation platforms have no radar track definitions
            radar_unavailable: !fingerprint.contains(1, RADAR_START_ADDR) || canfd,
            dashcam_only: car.is_some_and(Car::is_dashcam_only),
            ..Default::default()
        };

        let hda2 = car_fw.iter().any(|fw| fw.ecu == Ecu::Adas) || car.is_some_and(Car::is_canfd_hda2);
        let can = CanBus::from_fingerprint(hda2, fingerprint);

        ret.flags = Self::resolve_flags(&candidate, fingerprint, hda2, &can);
        // Commanding the blinkers is opt-in and only reaches the E-CAN blinker ECU
        if canfd && params.get_bool(ParamKey::EnableBlinkers) {
            ret.flags |= HyundaiFlags::ENABLE_BLINKERS;
        }

        ret.steer_actuator_delay = 0.1;
        ret.steer_limit_timer = 0.4;

        let specs = match &candidate {
            Candidate::Supported(car) => Some((car.specs(), SpecsSource::Table)),
            Candidate::Community(name) => community.specs(name).map(|specs| (specs, SpecsSource::Community)),
        };
        if let Some((specs, source)) = specs {
            ret.mass = specs.mass;
            ret.wheelbase = specs.wheelbase;
            ret.steer_ratio = specs.steer_ratio;
            ret.tire_stiffness_factor = specs.tire_stiffness_factor;
            ret.min_steer_speed = specs.min_steer_speed;
            ret.center_to_front = specs.center_to_front.unwrap_or(0.);
            ret.specs_source = source;
        }

        // Longitudinal control
        if canfd {
            ret.longitudinal_tuning = LongitudinalTuning {
                kp: TuningCurve::new(&[0.], &[0.1]),
                ki: TuningCurve::new(&[0.], &[0.0]),
            };
            ret.experimental_longitudinal_available = (candidate.is_hybrid() || candidate.is_ev())
                && !car.is_some_and(|car| car.is_canfd_unsupported_longitudinal() || car.is_canfd_radar_scc());
        } else {
            ret.longitudinal_tuning = LongitudinalTuning {
                kp: TuningCurve::new(
                    &[0., 5. * KPH_TO_MS, 10. * KPH_TO_MS, 30. * KPH_TO_MS, 130. * KPH_TO_MS],
                    &[1.2, 1.0, 0.95, 0.8, 0.25],
                ),
                ki: TuningCurve::new(&[0., 130. * KPH_TO_MS], &[0.1, 0.05]),
            };
            ret.stopping_decel_rate = 0.3;

            ret.steer_actuator_delay = 0.1;
            ret.steer_limit_timer = 2.0;

            ret.experimental_longitudinal_available = true;
        }

        ret.longitudinal_control = experimental_long && ret.experimental_longitudinal_available;
        ret.pcm_cruise = !ret.longitudinal_control;

        ret.stopping_control = true;
        ret.starting_state = true;
        ret.v_ego_starting = 0.3;
        ret.v_ego_stopping = 0.3;
        ret.start_accel = 1.0;
        ret.longitudinal_actuator_delay_lower_bound = 0.5;
        ret.longitudinal_actuator_delay_upper_bound = 0.5;

        // Feature detection
        ret.enable_bsm = if canfd {
            fingerprint.contains(can.ecan(), 0x1e5)
        } else {
            fingerprint.contains(0, 0x58b)
        };

        // Safety configuration
        if canfd {
            let mut cfgs = vec![SafetyConfig::new(SafetyModel::HyundaiCanfd)];
            if can.ecan() >= 4 {
                cfgs.insert(0, SafetyConfig::new(SafetyModel::NoOutput));
            }
            ret.safety_configs = cfgs;

            let mut param = SafetyParam::empty();
            if ret.flags.contains(HyundaiFlags::CANFD_HDA2) {
                param |= SafetyParam::HYUNDAI_CANFD_HDA2;
                if ret.flags.contains(HyundaiFlags::CANFD_HDA2_ALT_STEERING) {
                    param |= SafetyParam::HYUNDAI_CANFD_HDA2_ALT_STEERING;
                }
            }
            if ret.flags.contains(HyundaiFlags::CANFD_ALT_BUTTONS) {
                param |= SafetyParam::HYUNDAI_CANFD_ALT_BUTTONS;
            }
            if ret.flags.contains(HyundaiFlags::CANFD_CAMERA_SCC) {
                param |= SafetyParam::HYUNDAI_CAMERA_SCC;
            }
            Self::add_safety_param(&mut ret, param);

            ret.scc_bus = Some(0);
        } else {
            let model = if car.is_some_and(Car::is_legacy_safety_mode) {
                // Missing counters and checksums in the messages the safety mode inspects
                SafetyModel::HyundaiLegacy
            } else {
                SafetyModel::Hyundai
            };
            ret.safety_configs = vec![SafetyConfig::new(model)];

            let scc_on_bus_2 = car.is_some_and(Car::is_camera_scc) || params.get_bool(ParamKey::SccOnBus2);
            ret.scc_bus = Some(if scc_on_bus_2 { 2 } else { 0 });
            ret.has_auto_hold = fingerprint.contains(0, 1151);
            ret.has_lfa_hda = fingerprint.contains(0, 1157);
            ret.has_nav = fingerprint.contains(0, 1348);

            if !ret.longitudinal_control {
                ret.radar_unavailable = ret.scc_bus.is_none();
            }

            if ret.scc_bus == Some(2) {
                ret.has_scc13 = fingerprint.contains(0, 0x50a) || fingerprint.contains(2, 0x50a);
                ret.has_scc14 = fingerprint.contains(0, 0x389) || fingerprint.contains(2, 0x389);
                ret.longitudinal_control = true;
                ret.radar_unavailable = false;
                ret.safety_configs = vec![SafetyConfig::new(SafetyModel::HyundaiLegacy)];
                ret.radar_time_step = 0.02;
            }
        }

        // The cruise state manager keeps the buttons unless the radar is replaced on bus 0
        ret.pcm_cruise =
            !(ret.longitudinal_control && ret.scc_bus == Some(0) && !params.get_bool(ParamKey::CruiseStateControl));

        if ret.longitudinal_control {
            Self::add_safety_param(&mut ret, SafetyParam::HYUNDAI_LONG);
        }
        if candidate.is_hybrid() {
            Self::add_safety_param(&mut ret, SafetyParam::HYUNDAI_HYBRID_GAS);
        } else if candidate.is_ev() {
            Self::add_safety_param(&mut ret, SafetyParam::HYUNDAI_EV_GAS);
        }
        if ret.flags.contains(HyundaiFlags::ALT_LIMITS) {
            Self::add_safety_param(&mut ret, SafetyParam::HYUNDAI_ALT_LIMITS);
        }

        if ret.center_to_front == 0. {
            ret.center_to_front = ret.wheelbase * 0.4;
        }

        info!(
            "resolved {} ({:?}): flags {:?}, long {}, pcm cruise {}, scc bus {:?}, safety {:?}",
            ret.car_fingerprint,
            ret.specs_source,
            ret.flags,
            ret.longitudinal_control,
            ret.pcm_cruise,
            ret.scc_bus,
            ret.safety_configs
        );

        ret
    }

    fn resolve_flags(candidate: &Candidate, fingerprint: &Fingerprint, hda2: bool, can: &CanBus) -> HyundaiFlags {
        let car = candidate.car();
        let mut flags = HyundaiFlags::empty();

        if candidate.is_canfd() {
            if hda2 {
                flags |= HyundaiFlags::CANFD_HDA2;
                if fingerprint.contains(can.cam(), 0x110) {
                    flags |= HyundaiFlags::CANFD_HDA2_ALT_STEERING;
                }
                if car.is_some_and(Car::is_hda2_alt_gears) {
                    flags |= HyundaiFlags::CANFD_ALT_GEARS;
                }
            } else {
                if !fingerprint.contains(can.ecan(), 0x1cf) {
                    flags |= HyundaiFlags::CANFD_ALT_BUTTONS;
                }
                // ICE platforms have no 0x130, their gears are on 0x40 or 0x70
                if !fingerprint.contains(can.ecan(), 0x130) {
                    if !fingerprint.contains(can.ecan(), 0x40) {
                        flags |= HyundaiFlags::CANFD_ALT_GEARS_2;
                    } else {
                        flags |= HyundaiFlags::CANFD_ALT_GEARS;
                    }
                }
                if !car.is_some_and(Car::is_canfd_radar_scc) {
                    flags |= HyundaiFlags::CANFD_CAMERA_SCC;
                }
            }
        } else {
            // Platforms with HDA get the LFA message
            if fingerprint.contains(2, 0x485) {
                flags |= HyundaiFlags::SEND_LFA;
            }
            // AEB and FCW signals are in FCA11 instead of SCC12
            if fingerprint.contains(0, 0x38d) || fingerprint.contains(2, 0x38d) {
                flags |= HyundaiFlags::USE_FCA;
            }
        }

        if candidate.is_hybrid() {
            flags |= HyundaiFlags::HYBRID;
        }
        if candidate.is_ev() {
            flags |= HyundaiFlags::EV;
        }
        if car.is_some_and(Car::is_alt_limits) {
            flags |= HyundaiFlags::ALT_LIMITS;
        }

        flags
    }

    fn add_safety_param(ret: &mut CarParams, param: SafetyParam) {
        if let Some(cfg) = ret.safety_configs.last_mut() {
            cfg.safety_param |= param;
        }
    }

    /// Startup handshake: silence the radar when its messages are replaced, and the ECU owning the blinkers when they are commanded. Failures are logged and never block startup.
    pub async fn init(cp: &CarParams, adapter: &AsyncCanAdapter) {
        let can = CanBus::from_params(cp);

        if cp.is_radar_point() && !cp.flags.contains(HyundaiFlags::CANFD_CAMERA_SCC) {
            let (addr, bus) = if cp.flags.contains(HyundaiFlags::CANFD_HDA2) {
                (HDA2_RADAR_ADDR, can.ecan())
            } else {
                (LEGACY_RADAR_ADDR, 0)
            };
            disable_ecu(adapter, bus, addr, &COM_CONT_REQ).await;
        }

        if cp.flags.contains(HyundaiFlags::ENABLE_BLINKERS) {
            disable_ecu(adapter, can.ecan(), BLINKER_ADDR, &COM_CONT_REQ).await;
        }
    }

    /// Per-cycle button events, engagement gate and low speed alert.
    pub fn update(cp: &CarParams, state: &mut CycleState, input: &CarStateInput) -> CycleOutput {
        let cur_btn = input.cruise_button();
        let button_events = create_button_events(cur_btn, state.prev_cruise_button, Buttons::button_type);
        state.prev_cruise_button = cur_btn;

        // On newer model years CANCEL also pauses and resumes, so engagement needs a button press
        let allow_enable = input
            .cruise_buttons
            .iter()
            .any(|btn| Buttons::ENABLE_BUTTONS.contains(btn))
            || input.main_buttons.iter().any(|&pressed| pressed)
            || cp.car_fingerprint.is_canfd();

        // Only for platforms cutting steering above 10 m/s
        if input.v_ego < cp.min_steer_speed + LOW_SPEED_ALERT_ON && cp.min_steer_speed > LOW_SPEED_ALERT_MIN {
            state.low_speed_alert = true;
        }
        if input.v_ego > cp.min_steer_speed + LOW_SPEED_ALERT_OFF {
            state.low_speed_alert = false;
        }

        let mut events = vec![];
        if state.low_speed_alert {
            events.push(EventName::BelowSteerSpeed);
        }

        CycleOutput {
            button_events,
            allow_enable,
            events,
        }
    }

    /// Acceleration bounds for the longitudinal PID, m/s^2.
    pub fn get_pid_accel_limits(_cp: &CarParams, current_speed: f64, _cruise_speed: f64) -> (f64, f64) {
        let v_current_kph = current_speed * MS_TO_KPH;
        let gas_max_bp = [10., 20., 50., 70., 130., 150.];
        let gas_max_v = [ACCEL_MAX, 1.5, 1.0, 0.6, 0.2, 0.1];
        (ACCEL_MIN, interp(v_current_kph, &gas_max_bp, &gas_max_v))
    }

    /// Set speed step sizes (km/h) for short and long button presses.
    pub fn get_params_adjust_set_speed() -> ([u8; 2], [u8; 4]) {
        ([8, 10], [12, 14, 16, 18])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::car::ButtonType;
    use crate::params::MemoryParams;

    fn resolve(car: Car, fingerprint: &Fingerprint, car_fw: &[CarFw], long: bool) -> CarParams {
        CarInterface::get_params(car.into(), fingerprint, car_fw, long, &MemoryParams::new(), &NoCommunity)
    }

    #[test]
    fn legacy_sonata() {
        let fingerprint = Fingerprint::new().with(0, &[0x58b, 0x38d, 1151]).with(1, &[RADAR_START_ADDR]);
        let cp = resolve(Car::SONATA, &fingerprint, &[], false);

        assert_eq!(cp.flags, HyundaiFlags::USE_FCA);
        assert_eq!(cp.safety_configs, vec![SafetyConfig::new(SafetyModel::Hyundai)]);
        assert_eq!(cp.scc_bus, Some(0));
        assert!(cp.pcm_cruise);
        assert!(!cp.radar_unavailable);
        assert!(cp.enable_bsm);
        assert!(cp.has_auto_hold);
        assert!(!cp.has_nav);
        assert_eq!(cp.steer_limit_timer, 2.0);
        assert_eq!(cp.center_to_front, 2.84 * 0.4);
        assert!(cp.validate().is_ok());
    }

    #[test]
    fn legacy_longitudinal() {
        let cp = resolve(Car::SONATA, &Fingerprint::new(), &[], true);
        assert!(cp.longitudinal_control);
        assert!(!cp.pcm_cruise);
        assert!(cp.is_radar_point());
        assert_eq!(cp.safety_configs[0].safety_param, SafetyParam::HYUNDAI_LONG);
    }

    #[test]
    fn cruise_state_control_keeps_pcm_cruise() {
        let params = MemoryParams::new().with(ParamKey::CruiseStateControl, true);
        let cp = CarInterface::get_params(Car::SONATA.into(), &Fingerprint::new(), &[], true, &params, &NoCommunity);
        assert!(cp.longitudinal_control);
        assert!(cp.pcm_cruise);
    }

    #[test]
    fn canfd_hda2() {
        let fingerprint = Fingerprint::new().with(1, &[0x1e5]).with(2, &[0x110]);
        let car_fw = [CarFw::new(Ecu::Adas, 0x730, b"ADAS")];
        let cp = resolve(Car::IONIQ_5, &fingerprint, &car_fw, true);

        assert!(cp.flags.contains(HyundaiFlags::CANFD_HDA2 | HyundaiFlags::CANFD_HDA2_ALT_STEERING));
        assert!(!cp.flags.contains(HyundaiFlags::CANFD_CAMERA_SCC));
        assert!(cp.enable_bsm);
        assert!(cp.radar_unavailable);
        assert_eq!(cp.scc_bus, Some(0));
        assert_eq!(
            cp.active_safety_config().map(|cfg| cfg.safety_param),
            Some(
                SafetyParam::HYUNDAI_CANFD_HDA2
                    | SafetyParam::HYUNDAI_CANFD_HDA2_ALT_STEERING
                    | SafetyParam::HYUNDAI_LONG
                    | SafetyParam::HYUNDAI_EV_GAS
            )
        );
    }

    #[test]
    fn canfd_without_hda2() {
        let fingerprint = Fingerprint::new().with(0, &[0x40]).with(1, &[0x1]);
        let cp = resolve(Car::KIA_SPORTAGE_5TH_GEN, &fingerprint, &[], true);

        assert_eq!(
            cp.flags,
            HyundaiFlags::CANFD_ALT_BUTTONS | HyundaiFlags::CANFD_ALT_GEARS | HyundaiFlags::CANFD_CAMERA_SCC
        );
        assert!(!cp.experimental_longitudinal_available);
        assert!(!cp.longitudinal_control);
        assert_eq!(cp.steer_limit_timer, 0.4);
    }

    #[test]
    fn canfd_radar_scc() {
        let fingerprint = Fingerprint::new().with(0, &[0x1cf, 0x130]);
        let cp = resolve(Car::KIA_SORENTO_HEV_4TH_GEN, &fingerprint, &[], true);

        assert_eq!(cp.flags, HyundaiFlags::HYBRID);
        assert!(!cp.longitudinal_control);
        assert_eq!(cp.safety_configs[0].safety_param, SafetyParam::HYUNDAI_HYBRID_GAS);
    }

    #[test]
    fn kona_alt_limits() {
        let cp = resolve(Car::KONA_EV, &Fingerprint::new(), &[], false);
        assert!(cp.flags.contains(HyundaiFlags::ALT_LIMITS | HyundaiFlags::EV));
        assert_eq!(
            cp.safety_configs[0].safety_param,
            SafetyParam::HYUNDAI_EV_GAS | SafetyParam::HYUNDAI_ALT_LIMITS
        );
    }

    #[test]
    fn community_fallback() {
        let mut community = std::collections::HashMap::new();
        community.insert("HYUNDAI_AVANTE_CN7".to_string(), CarSpecs::new(1300., 2.72, 13.5));

        let candidate: Candidate = "HYUNDAI_AVANTE_CN7".parse().unwrap();
        let cp = CarInterface::get_params(
            candidate,
            &Fingerprint::new(),
            &[],
            false,
            &MemoryParams::new(),
            &community,
        );
        assert_eq!(cp.specs_source, SpecsSource::Community);
        assert_eq!(cp.wheelbase, 2.72);
        assert!(cp.validate().is_ok());

        let cp = CarInterface::get_params(
            "UNKNOWN".parse().unwrap(),
            &Fingerprint::new(),
            &[],
            false,
            &MemoryParams::new(),
            &community,
        );
        assert_eq!(cp.specs_source, SpecsSource::Default);
        assert_eq!(cp.validate(), Err(Error::UnsupportedVehicle("UNKNOWN".to_string())));
    }

    #[test]
    fn button_events_and_allow_enable() {
        let cp = resolve(Car::SONATA, &Fingerprint::new(), &[], false);
        let mut state = CycleState::default();

        let input = CarStateInput {
            cruise_buttons: vec![Buttons::NONE, Buttons::GAP_DIST],
            ..Default::default()
        };
        let out = CarInterface::update(&cp, &mut state, &input);
        assert_eq!(
            out.button_events,
            vec![ButtonEvent {
                button_type: ButtonType::GapAdjustCruise
            }]
        );
        assert!(!out.allow_enable);
        assert_eq!(state.prev_cruise_button, Buttons::GAP_DIST);

        let input = CarStateInput {
            cruise_buttons: vec![Buttons::GAP_DIST, Buttons::SET_DECEL],
            ..Default::default()
        };
        assert!(CarInterface::update(&cp, &mut state, &input).allow_enable);

        let input = CarStateInput {
            main_buttons: vec![false, true],
            ..Default::default()
        };
        assert!(CarInterface::update(&cp, &mut state, &input).allow_enable);
    }

    #[test]
    fn canfd_always_allows_enable() {
        let cp = resolve(Car::KIA_EV6, &Fingerprint::new(), &[], false);
        let out = CarInterface::update(&cp, &mut CycleState::default(), &CarStateInput::default());
        assert!(out.allow_enable);
        assert!(out.button_events.is_empty());
    }

    #[test]
    fn pid_accel_limits() {
        let cp = CarParams::default();
        assert_eq!(CarInterface::get_pid_accel_limits(&cp, 0., 0.), (ACCEL_MIN, ACCEL_MAX));
        let (_, max) = CarInterface::get_pid_accel_limits(&cp, 100. * KPH_TO_MS, 0.);
        assert!((max - 0.4).abs() < 1e-9);
        assert_eq!(CarInterface::get_pid_accel_limits(&cp, 200. * KPH_TO_MS, 0.).1, 0.1);
    }

    #[test]
    fn adjust_set_speed() {
        assert_eq!(CarInterface::get_params_adjust_set_speed(), ([8, 10], [12, 14, 16, 18]));
    }
}
