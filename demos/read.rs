use pms_7003::{linux, Config, Mode};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = args.next().expect("Missing path to device");
    let mode = match args.next().as_deref() {
        Some("passive") => Mode::Passive,
        _ => Mode::Active,
    };

    println!("Connecting to: {} ({:?} mode)", path, mode);

    let mut sensor = linux::open(&path, Config::new(mode)).unwrap();

    loop {
        match sensor.read() {
            Ok(measurement) => println!("PM2.5: {}", measurement.reading.pm2_5_atm),
            Err(e) => eprintln!("{}", e),
        }
    }
}
