use carparams::can::{AsyncCanAdapter, VirtualCan, VirtualEcu};
use carparams::car::Fingerprint;
use carparams::hyundai::{Car, CarInterface, NoCommunity};
use carparams::params::MemoryParams;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cp = CarInterface::get_params(
        Car::SONATA.into(),
        &Fingerprint::new().with(1, &[0x500]),
        &[],
        true,
        &MemoryParams::new(),
        &NoCommunity,
    );

    let radar = VirtualEcu::new(0, 0x7d0).with_response(&[0x10, 0x03], &[0x50, 0x03]);
    let can = VirtualCan::new(vec![radar.clone()]);
    let log = can.log();
    let adapter = AsyncCanAdapter::new(can);

    CarInterface::init(&cp, &adapter).await;

    for frame in log.lock().unwrap().iter() {
        println!("{:?}", frame);
    }
    for request in radar.requests() {
        println!("radar received {}", hex::encode(request));
    }
}
