use std::time::Duration;

use carparams::can::{AsyncCanAdapter, VirtualCan, VirtualEcu};
use carparams::car::disable_ecu::disable_ecu_with;
use carparams::car::{disable_ecu, CarFw, CarParams, Ecu, Fingerprint, COM_CONT_REQ};
use carparams::hyundai::{Car, CarInterface, HyundaiFlags, NoCommunity};
use carparams::params::{MemoryParams, ParamKey};

static EXTENDED_SESSION: [u8; 2] = [0x10, 0x03];
static EXTENDED_SESSION_RESPONSE: [u8; 2] = [0x50, 0x03];

fn ecu(bus: u8, address: u32) -> VirtualEcu {
    VirtualEcu::new(bus, address).with_response(&EXTENDED_SESSION, &EXTENDED_SESSION_RESPONSE)
}

fn resolve_with(car: Car, car_fw: &[CarFw], long: bool, params: &MemoryParams) -> CarParams {
    CarInterface::get_params(car.into(), &Fingerprint::new(), car_fw, long, params, &NoCommunity)
}

fn resolve(car: Car, car_fw: &[CarFw], long: bool) -> CarParams {
    resolve_with(car, car_fw, long, &MemoryParams::new())
}

fn blinkers_enabled() -> MemoryParams {
    MemoryParams::new().with(ParamKey::EnableBlinkers, true)
}

/// Requests seen by an ECU that was disabled on the first attempt.
fn disabled() -> Vec<Vec<u8>> {
    vec![EXTENDED_SESSION.to_vec(), COM_CONT_REQ.to_vec()]
}

#[tokio::test]
async fn responsive_ecu() {
    let radar = ecu(0, 0x7d0);
    let adapter = AsyncCanAdapter::new(VirtualCan::new(vec![radar.clone()]));

    assert!(disable_ecu(&adapter, 0, 0x7d0, &COM_CONT_REQ).await);
    assert_eq!(radar.requests(), disabled());
}

#[tokio::test]
async fn silent_ecu_gives_up() {
    let radar = ecu(0, 0x7d0).silent_for(usize::MAX);
    let adapter = AsyncCanAdapter::new(VirtualCan::new(vec![radar.clone()]));

    let ok = disable_ecu_with(&adapter, 0, 0x7d0, &COM_CONT_REQ, Duration::from_millis(20), 3).await;
    assert!(!ok);
    assert_eq!(radar.requests(), vec![EXTENDED_SESSION.to_vec(); 3]);
}

#[tokio::test]
async fn succeeds_after_retry() {
    let radar = ecu(0, 0x7d0).silent_for(2);
    let adapter = AsyncCanAdapter::new(VirtualCan::new(vec![radar.clone()]));

    assert!(disable_ecu(&adapter, 0, 0x7d0, &COM_CONT_REQ).await);

    let mut expected = vec![EXTENDED_SESSION.to_vec(); 3];
    expected.push(COM_CONT_REQ.to_vec());
    assert_eq!(radar.requests(), expected);
}

#[tokio::test]
async fn legacy_radar() {
    let cp = resolve(Car::SONATA, &[], true);
    assert!(cp.is_radar_point());

    let radar = ecu(0, 0x7d0);
    let adapter = AsyncCanAdapter::new(VirtualCan::new(vec![radar.clone()]));
    CarInterface::init(&cp, &adapter).await;

    assert_eq!(radar.requests(), disabled());
}

#[tokio::test]
async fn no_handshake_without_longitudinal() {
    let cp = resolve(Car::SONATA, &[], false);

    let can = VirtualCan::new(vec![ecu(0, 0x7d0)]);
    let log = can.log();
    let adapter = AsyncCanAdapter::new(can);
    CarInterface::init(&cp, &adapter).await;

    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn hda2_radar_and_blinkers() {
    let car_fw = [CarFw::new(Ecu::Adas, 0x730, b"ADAS")];
    let cp = resolve_with(Car::IONIQ_5, &car_fw, true, &blinkers_enabled());
    assert!(cp.is_radar_point());

    // HDA2 puts the ADAS messages on bus 1
    let radar = ecu(1, 0x730);
    let blinkers = ecu(1, 0x7b1);
    let wrong_bus = ecu(0, 0x730);
    let adapter = AsyncCanAdapter::new(VirtualCan::new(vec![radar.clone(), blinkers.clone(), wrong_bus.clone()]));
    CarInterface::init(&cp, &adapter).await;

    assert_eq!(radar.requests(), disabled());
    assert_eq!(blinkers.requests(), disabled());
    assert!(wrong_bus.requests().is_empty());
}

#[tokio::test]
async fn camera_scc_keeps_radar() {
    let cp = resolve_with(Car::KIA_EV6, &[], true, &blinkers_enabled());
    assert!(cp.is_radar_point());

    let radar = ecu(0, 0x7d0);
    let blinkers = ecu(0, 0x7b1);
    let adapter = AsyncCanAdapter::new(VirtualCan::new(vec![radar.clone(), blinkers.clone()]));
    CarInterface::init(&cp, &adapter).await;

    assert!(radar.requests().is_empty());
    assert_eq!(blinkers.requests(), disabled());
}

#[tokio::test]
async fn blinker_ecu_untouched_by_default() {
    let car_fw = [CarFw::new(Ecu::Adas, 0x730, b"ADAS")];
    for long in [false, true] {
        let cp = resolve(Car::IONIQ_5, &car_fw, long);
        assert!(!cp.flags.contains(HyundaiFlags::ENABLE_BLINKERS));

        let blinkers = ecu(1, 0x7b1);
        let adapter = AsyncCanAdapter::new(VirtualCan::new(vec![ecu(1, 0x730), blinkers.clone()]));
        CarInterface::init(&cp, &adapter).await;

        assert!(blinkers.requests().is_empty());
    }
}

#[tokio::test]
async fn blinker_preference_needs_canfd() {
    let cp = resolve_with(Car::SONATA, &[], false, &blinkers_enabled());
    assert!(!cp.flags.contains(HyundaiFlags::ENABLE_BLINKERS));

    let cp = resolve_with(Car::IONIQ_5, &[], false, &blinkers_enabled());
    assert!(cp.flags.contains(HyundaiFlags::ENABLE_BLINKERS));

    // Without HDA2 the E-CAN is bus 0
    let blinkers = ecu(0, 0x7b1);
    let adapter = AsyncCanAdapter::new(VirtualCan::new(vec![blinkers.clone()]));
    CarInterface::init(&cp, &adapter).await;
    assert_eq!(blinkers.requests(), disabled());
}
