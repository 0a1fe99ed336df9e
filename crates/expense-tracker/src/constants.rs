//! Centralized constants for the expense tracker
//!
//! Anything a user may want to change lives in the config file instead
//! (see `config.rs`); these are fixed formats and styling values.

// =============================================================================
// File Names
// =============================================================================

/// Default config file path
pub const CONFIG_FILENAME: &str = "expenses.toml";

/// Default CSV log filename
pub const EXPENSES_FILENAME: &str = "expenses.csv";

/// Default SQLite database filename
pub const DATABASE_FILENAME: &str = "expenses.sqlite";

// =============================================================================
// Log Format
// =============================================================================

/// Header row of the CSV log, in column order
pub const CSV_HEADER: [&str; 4] = ["Date", "Category", "Amount", "Note"];

/// Date format used in the log, the detail listings and form input
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Server Defaults
// =============================================================================

pub const DEFAULT_HOST: &str = "0.0.0.0";

pub const DEFAULT_PORT: u16 = 5000;

/// Currency symbol shown on chart axes and tables
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

// =============================================================================
// Calendar
// =============================================================================

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Number of categories reported as reasons for the highest/lowest month
pub const TOP_REASONS: usize = 3;

// =============================================================================
// Chart Styling
// =============================================================================

/// Pie chart canvas (square, pixels)
pub const PIE_SIZE: u32 = 560;

/// Bar chart canvas width (pixels)
pub const BAR_WIDTH: u32 = 800;

/// Bar chart canvas height (pixels)
pub const BAR_HEIGHT: u32 = 480;

/// Wedge colors, cycled when there are more categories than entries
pub const PIE_PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

pub const BAR_COLOR: &str = "#87ceeb";

pub const GRID_COLOR: &str = "#b0b0b0";

/// Category labels sit just outside the wedge (fraction of the radius)
pub const PIE_LABEL_DISTANCE: f64 = 1.05;

/// Percentage labels sit inside the wedge (fraction of the radius)
pub const PIE_PERCENT_DISTANCE: f64 = 0.6;

/// Target number of horizontal grid lines on the bar chart
pub const BAR_TICK_TARGET: f64 = 5.0;

/// Upper bound on grid lines, whatever the totals
pub const BAR_MAX_TICKS: usize = 10;

/// Look up a month name by number (1-12)
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get((month as usize).wrapping_sub(1))
        .copied()
        .unwrap_or("Unknown")
}

/// Look up an abbreviated month name by number (1-12)
pub fn month_abbreviation(month: u32) -> &'static str {
    MONTH_ABBREVIATIONS
        .get((month as usize).wrapping_sub(1))
        .copied()
        .unwrap_or("???")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_lookup() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_abbreviation(3), "Mar");
    }

    #[test]
    fn test_month_lookup_out_of_range() {
        assert_eq!(month_name(0), "Unknown");
        assert_eq!(month_name(13), "Unknown");
        assert_eq!(month_abbreviation(0), "???");
    }
}
