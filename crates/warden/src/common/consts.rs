/// Names for the default directories.
pub const DEFAULT_ROOT_DIR: &str = ".warden";
pub const DEFAULT_CONFIG_FILENAME: &str = "config.json";
