use carparams::car::Fingerprint;
use carparams::hyundai::{Candidate, CarInterface, NoCommunity};
use carparams::params::FileParams;

fn main() {
    tracing_subscriber::fmt::init();

    let experimental_long = std::env::args().any(|arg| arg == "--long");
    let mut args = std::env::args().skip(1).filter(|arg| !arg.starts_with("--"));
    let candidate: Candidate = match args.next() {
        Some(name) => name.parse().unwrap(),
        None => {
            eprintln!("usage: resolve <CAR> [PARAMS_DIR] [--long]");
            std::process::exit(1);
        }
    };
    let params = FileParams::new(args.next().unwrap_or_else(|| "/data/params/d".to_string()));

    // Typical legacy CAN traffic: blind spot, radar tracks and HDA
    let fingerprint = Fingerprint::new()
        .with(0, &[0x58b, 0x38d, 1151])
        .with(1, &[0x500])
        .with(2, &[0x485]);

    let cp = CarInterface::get_params(candidate, &fingerprint, &[], experimental_long, &params, &NoCommunity);
    println!("{:#?}", cp);

    if let Err(e) = cp.validate() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
