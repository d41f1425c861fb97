// In app/src/report.rs

use backtester::BacktestResult;

/// Prints the end-of-run summary to stdout.
pub fn print_report(result: &BacktestResult) {
    let report = &result.report;

    println!("\n--- Backtest Complete: {} ---", result.symbol);
    println!("---------------------------------");
    if let (Some(first), Some(last)) = (result.rows.first(), result.rows.last()) {
        println!("Period: {} to {} ({} bars)", first.bar.date, last.bar.date, result.rows.len());
    }
    println!(
        "Equity: ${:.2} -> ${:.2} | P&L: ${:.2} ({:.2}%)",
        report.initial_equity, report.final_equity, report.net_pnl_absolute, report.net_pnl_percentage
    );
    println!("Buy & Hold: {:.2}%", report.buy_and_hold_percentage);
    println!(
        "Max Drawdown: ${:.2} ({:.2}%) | Sharpe: {:.2}",
        report.max_drawdown_absolute, report.max_drawdown_percentage, report.sharpe_ratio
    );
    println!(
        "Trades: {} ({} closed) | Win Rate: {:.2}% | Exposure: {:.2}%",
        report.total_trades, report.closed_trades, report.win_rate, report.exposure_percentage
    );

    if let Some(open) = result.trades.iter().find(|trade| !trade.is_closed()) {
        println!("Open position since {} at {:.2}", open.entry_date, open.entry_price);
    }
    println!("---------------------------------");
}
