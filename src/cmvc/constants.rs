//! CMVC-specific constants
//!
//! Centralized definitions for the CMVC client command, its flags and the
//! fixed values the remote family expects.

/// CMVC reporting command name
pub const REPORT_COMMAND: &str = "Report";

/// Default CMVC client directory when none is configured
pub const DEFAULT_CMVC_PATH: &str = "c:/cmvc/exe";

/// `Report` command flags
pub mod flags {
    /// Target family (`family@host@port`)
    pub const FAMILY: &str = "-family";
    /// Machine-readable output, one `|`-separated record per line
    pub const RAW: &str = "-raw";
    /// Report view to query
    pub const VIEW: &str = "-view";
    /// SQL-like filter expression
    pub const WHERE: &str = "-where";
    /// Impersonate another CMVC login
    pub const BECOME: &str = "-become";
}

/// Date handling shared by the query builder and the parser
pub mod dates {
    /// Date-time format CMVC uses for `lastUpdate`, independent of locale
    pub const FORMAT: &str = "%Y/%m/%d %H:%M:%S";

    /// [`FORMAT`] with a fractional second, written only when non-zero
    pub const PRECISE_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.f";

    /// Lower bound used when no successful build exists yet
    pub const BEGINNING_OF_TIME: &str = "1970/01/01 00:00:00";
}

/// Track state that marks a track as delivered into its release
pub const INTEGRATE_STATE: &str = "integrate";

/// Environment variables exposed to `Report` and the checkout script
pub mod env {
    pub const CLIENT_PATH: &str = "CMVC_CLIENT_CMC";
    pub const FAMILY: &str = "CMVC_FAMILY";
    pub const RELEASES: &str = "CMVC_RELEASES";
    pub const BECOME: &str = "CMVC_BECOME";
}
