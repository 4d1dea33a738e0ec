use super::EvaluationReport;

pub fn to_json(report: &EvaluationReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
