// nosrs/src/constants.rs

/// Site configuration file expected in the project directory.
pub const DEFAULT_SITE_CONFIG: &str = "site.cfg";
/// Installation settings file written by the installer, if present.
pub const DEFAULT_INI_NAME: &str = "nos287.ini";
/// Where the run report is written, relative to the project directory.
pub const REPORT_FILE_NAME: &str = "reconfig-report.json";

/// Machine (CMR) configuration deck record.
pub const CMRD_RECORD: &str = "CMRD01";
/// Equipment configuration deck record.
pub const EQPD_RECORD: &str = "EQPD01";
/// TCP/IP host table file.
pub const TCPHOST_FILE: &str = "TCPHOST";
/// DNS resolver configuration file.
pub const TCPRSLV_FILE: &str = "TCPRSLV";
/// Catalog qualifier of the deadstart-tape source records.
pub const SOURCE_QUALIFIER: &str = "UN=SYSTEMX";
/// Access qualifier for indirect-access replacements.
pub const INDIRECT_QUALIFIER: &str = "IA";

/// Machine identifier every stock installation ships with.
pub const STOCK_MID: &str = "01";
/// Host identifier every stock installation ships with.
pub const STOCK_HOST_ID: &str = "NCCM01";

/// Network administrator account used for privileged file operations.
pub const NETADMN_USER: &str = "NETADMN";
pub const NETADMN_PASSWORD: &str = "NETADMN";

// Site configuration section names.
pub const CMRDECK_SECTION: &str = "CMRDECK";
pub const EQPDECK_SECTION: &str = "EQPDECK";
pub const NETWORK_SECTION: &str = "NETWORK";
pub const HOSTS_SECTION: &str = "HOSTS";
pub const RESOLVER_SECTION: &str = "RESOLVER";

// Installation settings section names.
pub const NPU_SECTION: &str = "npu.nos287";
pub const SYSINFO_SECTION: &str = "sysinfo";
