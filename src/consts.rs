pub mod cli_consts {
    //! Client Configuration Constants
    //!
    //! This module contains all configuration constants for the dashboard
    //! client, organized by functional area for clarity and maintainability.

    // =============================================================================
    // PAGINATION CONFIGURATION
    // =============================================================================

    /// Default number of rows requested per dashboard page.
    pub const DEFAULT_PAGE_SIZE: u32 = 100;

    /// The backend clamps page sizes above this back to the default.
    pub const MAX_PAGE_SIZE: u32 = 1000;

    /// Number of page numbers shown on each side of the current page in the
    /// pagination strip.
    pub const PAGE_WINDOW_RADIUS: u32 = 2;

    // =============================================================================
    // EVENT CONFIGURATION
    // =============================================================================

    /// Maximum number of buffered events between the export worker and the
    /// terminal renderer.
    pub const EVENT_QUEUE_SIZE: usize = 100;

    // =============================================================================
    // EXPORT POLLING CONFIGURATION
    // =============================================================================

    /// Status poll intervals per dashboard variant. The backend pages were
    /// written at different times and poll at different rates; the values are
    /// kept per-variant so the server sees the same request cadence as the
    /// original dashboards.
    pub mod export_polling {
        /// Cell dashboard export poll interval (milliseconds)
        pub const CELLS_INTERVAL_MS: u64 = 800;

        /// Module dashboard export poll interval (milliseconds)
        pub const MODULES_INTERVAL_MS: u64 = 1000;

        /// Zone02 station export poll interval (milliseconds)
        pub const ZONE02_INTERVAL_MS: u64 = 2000;

        /// Per-zone combined statistics export poll interval (milliseconds)
        pub const ZONE_STATISTICS_INTERVAL_MS: u64 = 1000;

        /// All-zones combined statistics export poll interval (milliseconds)
        pub const ALL_ZONES_INTERVAL_MS: u64 = 2000;
    }

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// HTTP connect timeout for all API calls (seconds)
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;

    /// HTTP request timeout for page loads and export control calls (seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// HTTP request timeout for export downloads (seconds).
    /// Downloads stream a whole workbook and get a longer allowance.
    pub const DOWNLOAD_TIMEOUT_SECS: u64 = 300;
}
