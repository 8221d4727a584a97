/// File extensions handled by the FITS loader.
pub const FITS_EXTENSIONS: &[&str] = &["fts", "fit", "fits"];

/// Camera RAW container extensions handled by the EXIF/RAW loader.
pub const RAW_EXTENSIONS: &[&str] = &["dng", "cr2", "nef", "arw", "orf"];

/// Default CSV field delimiter (the calibration toolchain exchanges
/// semicolon-separated files).
pub const DEFAULT_CSV_DELIMITER: u8 = b';';

/// Default baud rate for serial photometer endpoints.
pub const DEFAULT_SERIAL_BAUDRATE: u32 = 9600;

/// Default TCP port for TESS-W photometers.
pub const DEFAULT_TCP_PORT: u16 = 23;

/// Default UDP port TESS-W photometers broadcast readings to.
pub const DEFAULT_UDP_PORT: u16 = 2255;

/// Receive buffer size for UDP reading datagrams.
pub const UDP_BUFFER_SIZE: usize = 1024;

/// Capacity of the bounded photometer reading queue.
pub const READING_QUEUE_SIZE: usize = 128;

/// Rows per page when paging query results to a terminal.
pub const DEFAULT_PAGE_SIZE: usize = 10;
