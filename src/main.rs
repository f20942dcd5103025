use std::process;

use bsc_responder::config::{
    self, CLOCK_STRETCHING, EXIT_INTERRUPTED, I2C_ADDR, I2C_BUS_SPEED_HZ, STOP_SIGNALS,
};
use bsc_responder::pigpio::PigpioBsc;
use bsc_responder::shutdown::{self, STOP_REQUESTED};
use bsc_responder::tasks::i2c_responder::{self, ResponderConfig};
use bsc_responder::{ResponderError, ResponseTable};
use embassy_executor::Spawner;
use log::{debug, error, info, warn};
use static_cell::StaticCell;

static RESPONSE_TABLE: StaticCell<ResponseTable> = StaticCell::new();

fn exit_with(e: ResponderError) -> ! {
    error!("{}", e);
    process::exit(e.exit_code() as i32)
}

#[embassy_executor::task]
async fn i2c_responder_task(
    bus: PigpioBsc,
    table: &'static ResponseTable,
    config: ResponderConfig,
) {
    // The bus is torn down by the time run() returns
    match i2c_responder::run(bus, table, &STOP_REQUESTED, &config).await {
        Ok(()) => {
            match shutdown::stop_signal() {
                Some(signum) => info!("Interrupt signal ({}) received. Exiting...", signum),
                None => info!("Exiting..."),
            }
            process::exit(EXIT_INTERRUPTED as i32)
        }
        Err(e) => exit_with(e),
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting up...");

    let table = ResponseTable::new(config::RESPONSES).unwrap_or_else(|e| exit_with(e.into()));
    for (command, response) in table.iter() {
        debug!("Register 0x{:02X} => {:02X?}", command, response);
    }
    if table.is_empty() {
        warn!("Response table is empty, no command will be answered");
    }
    let table: &'static ResponseTable = RESPONSE_TABLE.init(table);

    let config = ResponderConfig::new(I2C_ADDR).unwrap_or_else(|e| exit_with(e.into()));

    let bus = PigpioBsc::open().unwrap_or_else(|e| exit_with(e.into()));
    if let Err(e) = bus.install_stop_handler(&STOP_SIGNALS) {
        drop(bus);
        exit_with(e.into());
    }

    info!(
        "I2C slave 0x{:02X}, bus clock {} kHz, clock stretching {}",
        config.control.address(),
        I2C_BUS_SPEED_HZ / 1000,
        if CLOCK_STRETCHING { "on" } else { "off" }
    );

    spawner
        .spawn(i2c_responder_task(bus, table, config))
        .unwrap();
}
