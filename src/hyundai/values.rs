//! Supported platforms, their membership in the platform sets that drive resolution, and their physical parameters.
use std::fmt;
use std::str::FromStr;

use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use crate::car::ButtonType;
use crate::conversions::{KPH_TO_MS, LB_TO_KG, MPH_TO_MS};

/// Every platform of the parameter table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(non_camel_case_types)]
pub enum Car {
    // Hyundai
    AZERA_6TH_GEN,
    AZERA_HEV_6TH_GEN,
    ELANTRA,
    ELANTRA_GT_I30,
    ELANTRA_2021,
    ELANTRA_HEV_2021,
    HYUNDAI_GENESIS,
    IONIQ,
    IONIQ_HEV_2022,
    IONIQ_EV_LTD,
    IONIQ_EV_2020,
    IONIQ_PHEV_2019,
    IONIQ_PHEV,
    KONA,
    KONA_EV,
    KONA_EV_2022,
    KONA_EV_2ND_GEN,
    KONA_HEV,
    SANTA_FE,
    SANTA_FE_2022,
    SANTA_FE_HEV_2022,
    SANTA_FE_PHEV_2022,
    SONATA,
    SONATA_LF,
    SONATA_HYBRID,
    TUCSON,
    TUCSON_4TH_GEN,
    TUCSON_HYBRID_4TH_GEN,
    PALISADE,
    VELOSTER,
    SANTA_CRUZ_1ST_GEN,
    CUSTIN_1ST_GEN,
    STARIA,
    CASPER,
    GRANDEUR_GN7,
    GRANDEUR_GN7_HYBRID,
    IONIQ_5,
    IONIQ_5N,
    IONIQ_6,

    // Kia
    KIA_FORTE,
    KIA_K5_2021,
    KIA_K5_2024,
    KIA_K5_HEV_2020,
    KIA_K5_HEV_2024,
    KIA_K8,
    KIA_K8_HEV_1ST_GEN,
    KIA_NIRO_EV,
    KIA_NIRO_EV_2ND_GEN,
    KIA_NIRO_PHEV,
    KIA_NIRO_HEV_2021,
    KIA_NIRO_HEV_2ND_GEN,
    KIA_OPTIMA_G4,
    KIA_OPTIMA_G4_FL,
    KIA_OPTIMA_H,
    KIA_OPTIMA_H_G4_FL,
    KIA_SELTOS,
    KIA_SPORTAGE_5TH_GEN,
    KIA_SPORTAGE_HYBRID_5TH_GEN,
    KIA_SORENTO,
    KIA_SORENTO_4TH_GEN,
    KIA_SORENTO_HEV_4TH_GEN,
    KIA_SORENTO_PHEV_4TH_GEN,
    KIA_STINGER,
    KIA_STINGER_2022,
    KIA_CEED,
    KIA_EV6,
    KIA_CARNIVAL_4TH_GEN,

    // Genesis
    GENESIS_GV60_EV_1ST_GEN,
    GENESIS_G70,
    GENESIS_G70_2020,
    GENESIS_GV70_1ST_GEN,
    GENESIS_EGV70,
    GENESIS_G80,
    GENESIS_G80_RG3,
    GENESIS_EG80_RG3,
    GENESIS_G90,
    GENESIS_GV80,
}

/// Platforms using the CAN-FD message set.
pub static CANFD_CAR: &[Car] = &[
    Car::KIA_EV6,
    Car::IONIQ_5,
    Car::IONIQ_5N,
    Car::IONIQ_6,
    Car::TUCSON_4TH_GEN,
    Car::TUCSON_HYBRID_4TH_GEN,
    Car::KIA_SPORTAGE_HYBRID_5TH_GEN,
    Car::SANTA_CRUZ_1ST_GEN,
    Car::KIA_SPORTAGE_5TH_GEN,
    Car::GENESIS_GV70_1ST_GEN,
    Car::GENESIS_EGV70,
    Car::KIA_SORENTO_PHEV_4TH_GEN,
    Car::GENESIS_GV60_EV_1ST_GEN,
    Car::KIA_SORENTO_4TH_GEN,
    Car::KIA_NIRO_HEV_2ND_GEN,
    Car::KIA_NIRO_EV_2ND_GEN,
    Car::GENESIS_GV80,
    Car::KIA_CARNIVAL_4TH_GEN,
    Car::KIA_SORENTO_HEV_4TH_GEN,
    Car::KONA_EV_2ND_GEN,
    Car::KIA_K8,
    Car::KIA_K8_HEV_1ST_GEN,
    Car::KIA_K5_2024,
    Car::KIA_K5_HEV_2024,
    Car::STARIA,
    Car::GRANDEUR_GN7,
    Car::GRANDEUR_GN7_HYBRID,
    Car::GENESIS_G80_RG3,
    Car::GENESIS_EG80_RG3,
];

/// CAN-FD platforms known to carry the HDA2 harness even when the ADAS ECU does not answer the firmware query.
pub static CANFD_HDA2_CAR: &[Car] = &[Car::IONIQ_5N, Car::GENESIS_G80_RG3, Car::GENESIS_EG80_RG3];

/// HDA2 platforms sending the gear position in the alternate message.
pub static CANFD_HDA2_ALT_GEARS: &[Car] = &[Car::KIA_K8_HEV_1ST_GEN, Car::GRANDEUR_GN7, Car::GRANDEUR_GN7_HYBRID];

/// CAN-FD platforms where the radar, not the camera, runs adaptive cruise.
pub static CANFD_RADAR_SCC_CAR: &[Car] = &[
    Car::GENESIS_GV70_1ST_GEN,
    Car::GENESIS_EGV70,
    Car::KIA_SORENTO_PHEV_4TH_GEN,
    Car::KIA_SORENTO_4TH_GEN,
    Car::GENESIS_GV80,
    Car::KIA_CARNIVAL_4TH_GEN,
    Car::KIA_SORENTO_HEV_4TH_GEN,
];

/// CAN-FD platforms without longitudinal support beyond the radar SCC platforms.
pub static CANFD_UNSUPPORTED_LONGITUDINAL_CAR: &[Car] = &[Car::KIA_NIRO_EV_2ND_GEN, Car::KIA_NIRO_HEV_2ND_GEN];

/// CAN platforms where adaptive cruise runs in the camera and its messages appear on bus 2.
pub static CAMERA_SCC_CAR: &[Car] = &[Car::KONA_EV_2022];

pub static HYBRID_CAR: &[Car] = &[
    Car::IONIQ_PHEV,
    Car::ELANTRA_HEV_2021,
    Car::KIA_NIRO_PHEV,
    Car::KIA_NIRO_HEV_2021,
    Car::SONATA_HYBRID,
    Car::KONA_HEV,
    Car::IONIQ,
    Car::IONIQ_HEV_2022,
    Car::SANTA_FE_HEV_2022,
    Car::SANTA_FE_PHEV_2022,
    Car::IONIQ_PHEV_2019,
    Car::TUCSON_HYBRID_4TH_GEN,
    Car::KIA_SPORTAGE_HYBRID_5TH_GEN,
    Car::KIA_SORENTO_PHEV_4TH_GEN,
    Car::KIA_K5_HEV_2020,
    Car::KIA_K5_HEV_2024,
    Car::KIA_NIRO_HEV_2ND_GEN,
    Car::KIA_SORENTO_HEV_4TH_GEN,
    Car::KIA_OPTIMA_H,
    Car::KIA_OPTIMA_H_G4_FL,
    Car::KIA_K8_HEV_1ST_GEN,
    Car::AZERA_HEV_6TH_GEN,
    Car::GRANDEUR_GN7_HYBRID,
];

pub static EV_CAR: &[Car] = &[
    Car::IONIQ_EV_2020,
    Car::IONIQ_EV_LTD,
    Car::KONA_EV,
    Car::KIA_NIRO_EV,
    Car::KIA_NIRO_EV_2ND_GEN,
    Car::KONA_EV_2022,
    Car::KIA_EV6,
    Car::IONIQ_5,
    Car::IONIQ_5N,
    Car::IONIQ_6,
    Car::GENESIS_GV60_EV_1ST_GEN,
    Car::GENESIS_EGV70,
    Car::GENESIS_EG80_RG3,
    Car::KONA_EV_2ND_GEN,
];

/// These platforms have no counters or checksums in the messages the safety mode inspects.
pub static LEGACY_SAFETY_MODE_CAR: &[Car] = &[
    Car::HYUNDAI_GENESIS,
    Car::IONIQ_EV_LTD,
    Car::IONIQ_HEV_2022,
    Car::KIA_OPTIMA_G4,
    Car::VELOSTER,
    Car::GENESIS_G70,
    Car::GENESIS_G80,
    Car::KIA_CEED,
    Car::ELANTRA,
];

/// Platforms needing the tighter steering torque limits.
pub static ALT_LIMITS_CAR: &[Car] = &[Car::KONA, Car::KONA_EV, Car::KONA_HEV, Car::KONA_EV_2022];

/// Platforms with too little test coverage to allow control.
pub static DASHCAM_ONLY_CAR: &[Car] = &[Car::KIA_OPTIMA_H];

impl Car {
    pub fn is_canfd(self) -> bool {
        CANFD_CAR.contains(&self)
    }

    pub fn is_canfd_hda2(self) -> bool {
        CANFD_HDA2_CAR.contains(&self)
    }

    pub fn is_hda2_alt_gears(self) -> bool {
        CANFD_HDA2_ALT_GEARS.contains(&self)
    }

    pub fn is_canfd_radar_scc(self) -> bool {
        CANFD_RADAR_SCC_CAR.contains(&self)
    }

    pub fn is_canfd_unsupported_longitudinal(self) -> bool {
        self.is_canfd_radar_scc() || CANFD_UNSUPPORTED_LONGITUDINAL_CAR.contains(&self)
    }

    pub fn is_camera_scc(self) -> bool {
        CAMERA_SCC_CAR.contains(&self)
    }

    pub fn is_hybrid(self) -> bool {
        HYBRID_CAR.contains(&self)
    }

    pub fn is_ev(self) -> bool {
        EV_CAR.contains(&self)
    }

    pub fn is_legacy_safety_mode(self) -> bool {
        LEGACY_SAFETY_MODE_CAR.contains(&self)
    }

    pub fn is_alt_limits(self) -> bool {
        ALT_LIMITS_CAR.contains(&self)
    }

    pub fn is_dashcam_only(self) -> bool {
        DASHCAM_ONLY_CAR.contains(&self)
    }

    /// Nominal physical parameters.
    pub fn specs(self) -> CarSpecs {
        use Car::*;

        match self {
            AZERA_6TH_GEN => CarSpecs::new(1600., 2.885, 14.5),
            AZERA_HEV_6TH_GEN => CarSpecs::new(1675., 2.885, 14.5),
            SANTA_FE | SANTA_FE_2022 | SANTA_FE_HEV_2022 | SANTA_FE_PHEV_2022 => {
                CarSpecs::new(3982. * LB_TO_KG, 2.766, 16.55).tire_stiffness(0.82)
            }
            SONATA | SONATA_HYBRID => CarSpecs::new(1513., 2.84, 13.27 * 1.15).tire_stiffness(0.65),
            SONATA_LF => CarSpecs::new(1536., 2.804, 13.27 * 1.15),
            PALISADE => CarSpecs::new(1999., 2.90, 15.6 * 1.15).tire_stiffness(0.63),
            ELANTRA | ELANTRA_GT_I30 => CarSpecs::new(1275., 2.7, 15.4)
                .tire_stiffness(0.385)
                .min_steer_speed(32. * MPH_TO_MS),
            ELANTRA_2021 => CarSpecs::new(2800. * LB_TO_KG, 2.72, 12.9).tire_stiffness(0.65),
            ELANTRA_HEV_2021 => CarSpecs::new(3017. * LB_TO_KG, 2.72, 12.9).tire_stiffness(0.65),
            HYUNDAI_GENESIS => CarSpecs::new(2060., 3.01, 16.5).min_steer_speed(60. * KPH_TO_MS),
            KONA => CarSpecs::new(1275., 2.6, 13.42).tire_stiffness(0.385),
            KONA_EV => CarSpecs::new(1685., 2.6, 13.42).tire_stiffness(0.385),
            KONA_HEV => CarSpecs::new(1425., 2.6, 13.42).tire_stiffness(0.385),
            KONA_EV_2022 => CarSpecs::new(1743., 2.6, 13.42).tire_stiffness(0.385),
            KONA_EV_2ND_GEN => CarSpecs::new(1740., 2.66, 13.6).tire_stiffness(0.385),
            IONIQ | IONIQ_EV_LTD | IONIQ_PHEV_2019 => CarSpecs::new(1490., 2.7, 13.73)
                .tire_stiffness(0.385)
                .min_steer_speed(32. * MPH_TO_MS),
            IONIQ_HEV_2022 | IONIQ_EV_2020 | IONIQ_PHEV => CarSpecs::new(1490., 2.7, 13.73).tire_stiffness(0.385),
            IONIQ_5 | IONIQ_6 => CarSpecs::new(1948., 2.97, 14.26).tire_stiffness(0.65),
            VELOSTER => CarSpecs::new(2917. * LB_TO_KG, 2.80, 13.75 * 1.15).tire_stiffness(0.5),
            TUCSON => CarSpecs::new(3520. * LB_TO_KG, 2.67, 14.00 * 1.15).tire_stiffness(0.385),
            TUCSON_4TH_GEN | TUCSON_HYBRID_4TH_GEN => CarSpecs::new(1630., 2.756, 16.).tire_stiffness(0.385),
            SANTA_CRUZ_1ST_GEN => CarSpecs::new(1870., 3.000, 14.2),
            CUSTIN_1ST_GEN => CarSpecs::new(1690., 3.055, 17.0),
            STARIA => CarSpecs::new(2280., 3.275, 14.2),
            CASPER => CarSpecs::new(985., 2.40, 14.2),
            GRANDEUR_GN7 => CarSpecs::new(1620., 2.895, 14.2),
            GRANDEUR_GN7_HYBRID => CarSpecs::new(1700., 2.895, 14.2),
            IONIQ_5N => CarSpecs::new(2200., 3.0, 14.26).tire_stiffness(0.65),

            KIA_SORENTO => CarSpecs::new(1985., 2.78, 14.4 * 1.1),
            KIA_NIRO_PHEV => CarSpecs::new(3543. * LB_TO_KG, 2.7, 13.6)
                .tire_stiffness(0.385)
                .min_steer_speed(32. * MPH_TO_MS),
            KIA_NIRO_EV | KIA_NIRO_EV_2ND_GEN | KIA_NIRO_HEV_2021 | KIA_NIRO_HEV_2ND_GEN => {
                CarSpecs::new(3543. * LB_TO_KG, 2.7, 13.6).tire_stiffness(0.385)
            }
            KIA_SELTOS => CarSpecs::new(1337., 2.63, 14.56),
            KIA_SPORTAGE_5TH_GEN => CarSpecs::new(1700., 2.756, 13.6),
            KIA_OPTIMA_G4 => CarSpecs::new(3558. * LB_TO_KG, 2.80, 13.75)
                .tire_stiffness(0.5)
                .min_steer_speed(32. * MPH_TO_MS),
            KIA_OPTIMA_G4_FL | KIA_OPTIMA_H | KIA_OPTIMA_H_G4_FL => {
                CarSpecs::new(3558. * LB_TO_KG, 2.80, 13.75).tire_stiffness(0.5)
            }
            KIA_STINGER | KIA_STINGER_2022 => CarSpecs::new(1825., 2.78, 14.4 * 1.15),
            KIA_FORTE => CarSpecs::new(2878. * LB_TO_KG, 2.80, 13.75).tire_stiffness(0.5),
            KIA_CEED => CarSpecs::new(1450., 2.65, 13.75).tire_stiffness(0.5),
            KIA_K5_2021 | KIA_K5_HEV_2020 | KIA_K5_2024 | KIA_K5_HEV_2024 => {
                CarSpecs::new(3381. * LB_TO_KG, 2.85, 13.27).tire_stiffness(0.5)
            }
            KIA_EV6 => CarSpecs::new(2055., 2.9, 16.).tire_stiffness(0.65),
            KIA_SPORTAGE_HYBRID_5TH_GEN => CarSpecs::new(1767., 2.756, 13.6),
            KIA_SORENTO_4TH_GEN => CarSpecs::new(3957. * LB_TO_KG, 2.81, 13.5),
            KIA_SORENTO_HEV_4TH_GEN => CarSpecs::new(4255. * LB_TO_KG, 2.81, 13.5),
            KIA_SORENTO_PHEV_4TH_GEN => CarSpecs::new(4537. * LB_TO_KG, 2.81, 13.5),
            KIA_CARNIVAL_4TH_GEN => CarSpecs::new(2087., 3.09, 14.23),
            KIA_K8_HEV_1ST_GEN => CarSpecs::new(1630., 2.895, 13.27),
            KIA_K8 => CarSpecs::new(1540., 2.895, 13.27),

            GENESIS_GV60_EV_1ST_GEN => CarSpecs::new(2205., 2.9, 12.6),
            GENESIS_G70 => CarSpecs::new(1640., 2.84, 13.56),
            GENESIS_G70_2020 => CarSpecs::new(3673. * LB_TO_KG, 2.83, 12.9),
            GENESIS_GV70_1ST_GEN => CarSpecs::new(1950., 2.87, 14.6),
            GENESIS_EGV70 => CarSpecs::new(2230., 2.87, 14.6),
            GENESIS_G80 => CarSpecs::new(2060., 3.01, 16.5),
            GENESIS_G80_RG3 => CarSpecs::new(1785., 3.01, 16.5),
            GENESIS_EG80_RG3 => CarSpecs::new(2265., 3.01, 16.5),
            GENESIS_G90 => CarSpecs::new(2200., 3.15, 12.069),
            GENESIS_GV80 => CarSpecs::new(2258., 2.95, 14.14),
        }
    }
}

/// Nominal physical parameters of a platform.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarSpecs {
    /// kg
    pub mass: f64,
    /// m
    pub wheelbase: f64,
    pub steer_ratio: f64,
    pub tire_stiffness_factor: f64,
    /// m/s
    pub min_steer_speed: f64,
    /// m, defaults to 0.4 * wheelbase
    pub center_to_front: Option<f64>,
}

impl CarSpecs {
    pub fn new(mass: f64, wheelbase: f64, steer_ratio: f64) -> Self {
        Self {
            mass,
            wheelbase,
            steer_ratio,
            tire_stiffness_factor: 1.,
            min_steer_speed: 0.,
            center_to_front: None,
        }
    }

    pub fn tire_stiffness(mut self, tire_stiffness_factor: f64) -> Self {
        self.tire_stiffness_factor = tire_stiffness_factor;
        self
    }

    pub fn min_steer_speed(mut self, min_steer_speed: f64) -> Self {
        self.min_steer_speed = min_steer_speed;
        self
    }

    pub fn center_to_front(mut self, center_to_front: f64) -> Self {
        self.center_to_front = Some(center_to_front);
        self
    }
}

/// Vehicle identity handed to resolution. Platforms outside the table are explicit [`Candidate::Community`] entries resolved through a [`super::CommunityProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Candidate {
    Supported(Car),
    Community(String),
}

impl Candidate {
    pub fn car(&self) -> Option<Car> {
        match self {
            Candidate::Supported(car) => Some(*car),
            Candidate::Community(_) => None,
        }
    }

    fn is(&self, check: impl Fn(Car) -> bool) -> bool {
        self.car().is_some_and(check)
    }

    pub fn is_canfd(&self) -> bool {
        self.is(Car::is_canfd)
    }

    pub fn is_hybrid(&self) -> bool {
        self.is(Car::is_hybrid)
    }

    pub fn is_ev(&self) -> bool {
        self.is(Car::is_ev)
    }
}

impl From<Car> for Candidate {
    fn from(car: Car) -> Self {
        Candidate::Supported(car)
    }
}

impl FromStr for Candidate {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Car::from_str(s)
            .map(Candidate::Supported)
            .unwrap_or_else(|_| Candidate::Community(s.to_string())))
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Candidate::Supported(car) => write!(f, "{}", car),
            Candidate::Community(name) => write!(f, "{}", name),
        }
    }
}

/// Raw cruise button codes.
pub struct Buttons;

impl Buttons {
    pub const NONE: u8 = 0;
    pub const RES_ACCEL: u8 = 1;
    pub const SET_DECEL: u8 = 2;
    pub const GAP_DIST: u8 = 3;
    pub const CANCEL: u8 = 4;

    /// Buttons showing the driver intends to engage.
    pub const ENABLE_BUTTONS: [u8; 3] = [Self::RES_ACCEL, Self::SET_DECEL, Self::CANCEL];

    pub fn button_type(btn: u8) -> Option<ButtonType> {
        match btn {
            Self::RES_ACCEL => Some(ButtonType::AccelCruise),
            Self::SET_DECEL => Some(ButtonType::DecelCruise),
            Self::GAP_DIST => Some(ButtonType::GapAdjustCruise),
            Self::CANCEL => Some(ButtonType::Cancel),
            _ => None,
        }
    }
}
