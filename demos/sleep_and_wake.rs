use pms_7003::{linux, Config};
use std::time::Duration;

fn main() {
    env_logger::init();

    let path = std::env::args()
        .skip(1)
        .next()
        .expect("Missing path to device");

    println!("Connecting to: {}", path);

    let mut sensor = linux::open(&path, Config::default()).unwrap();

    sensor.sleep().unwrap();
    std::thread::sleep(Duration::from_secs(3));
    sensor.wake().unwrap();
    // The fan needs a while to spin up before readings settle.
    std::thread::sleep(Duration::from_secs(10));

    for _ in 0..5 {
        match sensor.read() {
            Ok(measurement) => println!("{:?}", measurement),
            Err(e) => println!("{}", e),
        }
    }

    sensor.sleep().unwrap();
    sensor.close().unwrap();
}
