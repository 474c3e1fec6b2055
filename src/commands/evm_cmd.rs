use crate::commands::command_error::CommandError;
use crate::commands::report_format::format_evm_report;
use crate::services::evm_calculation::compute_evm;

pub fn evm_command(
    bac: f64,
    ac: f64,
    percent_complete: f64,
    planned_percent: f64,
) -> Result<(), CommandError> {
    let evm = compute_evm(bac, ac, percent_complete, planned_percent)?;
    println!("{}", format_evm_report(&evm));
    Ok(())
}
