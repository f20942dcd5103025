pub const I2C_ADDR: u8 = 0x68; // I2C address of the emulated device

// The bus clock is driven by the master; a BSC slave can only stretch it.
pub const I2C_BUS_SPEED_HZ: u32 = 400_000;
pub const CLOCK_STRETCHING: bool = true;

// How often the BSC FIFO is polled for a new command
pub const POLL_INTERVAL_US: u64 = 100; // us

// Size of the rx/tx buffers in pigpio's bsc_xfer_t
pub const BSC_FIFO_SIZE: usize = 512;

// Process exit codes
pub const EXIT_INTERRUPTED: u8 = 0;
pub const EXIT_INIT_FAILURE: u8 = 2;
pub const EXIT_TRANSFER_FAILURE: u8 = 3;
pub const EXIT_TABLE_FAILURE: u8 = 4;

// Linux signal numbers that request a graceful stop
pub const SIGINT: u32 = 2;
pub const SIGTERM: u32 = 15;
pub const STOP_SIGNALS: [u32; 2] = [SIGINT, SIGTERM];

// Register responses of the emulated device.
// Read 0xNN: respond with the listed bytes. The master is expected to know how
// many bytes to read for each register.
pub const RESPONSES: &[(u8, &[u8])] = &[
    (0x75, &[0xF8]),
    (0x3A, &[0x05]),
    (0x41, &[0x00, 0x00]),
    (0x19, &[0x13]),
    (0x1A, &[0x05]),
    (0x1B, &[0x00]),
    (0x1C, &[0x10]),
    // 0x1D is listed twice in the captured register dump. The later entry
    // wins and a warning is logged when the table is built.
    (0x1D, &[0x05]),
    (0x1D, &[0x00]),
    (0x37, &[0x20]),
    (0x38, &[0x00]),
    (0x1F, &[0x64]),
];
