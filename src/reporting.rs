//! Human-readable and JSON rendering of simulation results.

use comfy_table::{Cell, CellAlignment, Table, modifiers, presets};
use serde::Serialize;

use crate::economics::MicrogridCosts;
use crate::economics::costs::COST_COLUMNS;
use crate::sim::OperationStats;

/// Operation statistics and costs of one run, as serialized by `--json`.
///
/// Non-finite ratios serialize as `null`.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    /// Energy statistics.
    pub stats: &'a OperationStats,
    /// Economic results.
    pub costs: &'a MicrogridCosts,
}

/// Formats a currency amount with thousands separators, e.g. `-1,234,567`.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, c) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0.0 && rounded != "0" {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Builds the cost breakdown table: one row per component, then the system total.
pub fn build_costs_table(costs: &MicrogridCosts) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    let mut header = vec![Cell::new(format!("Costs ({})", costs.currency))];
    header.extend(COST_COLUMNS.iter().map(Cell::new));
    table.set_header(header);

    let rows = costs.costs_table();
    for (name, values) in rows.rows.iter().zip(&rows.values) {
        let mut row = vec![Cell::new(name)];
        row.extend(
            values
                .iter()
                .map(|&v| Cell::new(format_amount(v)).set_alignment(CellAlignment::Right)),
        );
        table.add_row(row);
    }
    table
}

/// Renders the full text report: statistics, headline costs and the cost table.
pub fn render_report(stats: &OperationStats, costs: &MicrogridCosts) -> String {
    format!(
        "{stats}\n\n--- Economics ---\n\
         Net present cost:      {} {}\n\
         LCOE:                  {:.4} {}/kWh\n\n\
         {}\n",
        format_amount(costs.npc),
        costs.currency,
        costs.lcoe,
        costs.currency,
        build_costs_table(costs)
    )
}

/// Renders both records as pretty-printed JSON.
///
/// # Errors
///
/// Returns a `serde_json::Error` if serialization fails.
pub fn render_json(stats: &OperationStats, costs: &MicrogridCosts) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Report { stats, costs })
}
