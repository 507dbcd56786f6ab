// Version information for the Fabstir Embed Node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-e5-small-v2";

/// Build date
pub const BUILD_DATE: &str = "2025-08-24";
