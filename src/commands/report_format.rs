use crate::domain::anomaly::AnomalyReport;
use crate::domain::evm::{EvmResult, Tcpi};
use crate::services::simulation_types::ProjectForecast;

pub fn format_evm_report(evm: &EvmResult) -> String {
    let mut lines = Vec::new();
    lines.push("Earned Value Report".to_string());
    lines.push("Metric | Value".to_string());
    lines.push("-------|------".to_string());
    lines.push(format!("PV | {:.2}", evm.planned_value));
    lines.push(format!("EV | {:.2}", evm.earned_value));
    lines.push(format!("AC | {:.2}", evm.actual_cost));
    lines.push(format!("SPI | {}", format_index(evm.spi, evm.schedule_baseline_established)));
    lines.push(format!("CPI | {}", format_index(evm.cpi, evm.cost_baseline_established)));
    lines.push(format!("EAC | {:.2}", evm.eac));
    lines.push(format!("ETC | {:.2}", evm.etc));
    lines.push(format!("VAC | {:.2}", evm.vac));
    lines.push(format!("TCPI | {}", format_tcpi(evm.tcpi)));
    lines.join("\n")
}

pub fn format_forecast_report(forecast: &ProjectForecast) -> String {
    let schedule = &forecast.schedule_forecast;
    let cost = &forecast.cost_forecast;
    let assessment = &forecast.overall_assessment;

    let mut lines = Vec::new();
    lines.push("Project Forecast".to_string());
    lines.push(format!("Project: {}", forecast.project_name));
    lines.push(format!("Seed: {}", forecast.seed));
    lines.push(format!(
        "SPI: {:.2} | CPI: {:.2}",
        forecast.evm_metrics.spi, forecast.evm_metrics.cpi
    ));
    lines.push(String::new());
    lines.push("Schedule:".to_string());
    lines.push(format!(
        "Planned end: {} | Forecasted end: {}",
        schedule.original_end_date.format("%Y-%m-%d"),
        schedule.forecasted_end_date.format("%Y-%m-%d")
    ));
    lines.push(format!("Delay: {:.1} days", schedule.delay_days));
    lines.push(format!(
        "On-time probability: {:.1}%",
        schedule.probability_on_time * 100.0
    ));
    lines.push(format!("Risk: {}", schedule.risk_level));
    for recommendation in &schedule.recommendations {
        lines.push(format!("- {recommendation}"));
    }
    lines.push(String::new());
    lines.push("Cost:".to_string());
    lines.push(format!(
        "Budget: {:.2} | Forecasted cost: {:.2}",
        cost.original_budget, cost.forecasted_cost
    ));
    lines.push(format!("Variance: {:+.1}%", cost.variance_percent));
    lines.push(format!(
        "Within-budget probability: {:.1}%",
        cost.probability_within_budget * 100.0
    ));
    lines.push(format!("Risk: {}", cost.risk_level));
    lines.push(String::new());
    lines.push(format!(
        "Health: {} ({})",
        assessment.health_score,
        assessment.health_status.as_str()
    ));

    lines.join("\n")
}

pub fn format_anomaly_summary(report: &AnomalyReport) -> String {
    let mut lines = vec![format!(
        "Detected {} anomalies in {} records ({} skipped evaluations)",
        report.findings.len(),
        report.record_count,
        report.skipped_count
    )];
    for finding in &report.findings {
        lines.push(format!(
            "[{}] {} #{}: {}",
            finding.severity, finding.dimension, finding.source_index, finding.message
        ));
    }
    lines.join("\n")
}

fn format_index(value: f64, established: bool) -> String {
    if established {
        format!("{value:.2}")
    } else {
        format!("{value:.2} (no baseline)")
    }
}

fn format_tcpi(tcpi: Tcpi) -> String {
    match tcpi {
        Tcpi::Index(value) => format!("{value:.2}"),
        Tcpi::Complete => "complete".to_string(),
    }
}
