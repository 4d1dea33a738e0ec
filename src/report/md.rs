use super::EvaluationReport;

pub fn to_markdown(report: &EvaluationReport, decimals: usize) -> String {
    let result = &report.result;
    let mut output = String::new();
    output.push_str(&format!(
        "# Admission Report: {} / {}\n\n",
        report.university_id, report.program_id
    ));
    if !report.description.is_empty() {
        output.push_str(&format!("Formula: {}\n\n", report.description));
    }
    output.push_str(&format!(
        "Total score: {:.prec$} / {:.prec$}\n\n",
        result.total_score,
        report.max_possible_score,
        prec = decimals
    ));

    if let Some(reason) = &report.disqualification_reason {
        output.push_str(&format!("Requirements: not met ({reason})\n\n"));
    } else {
        output.push_str("Requirements: met\n\n");
    }

    output.push_str("## Stages\n\n");
    if result.stage_results.is_empty() {
        output.push_str("- none evaluated\n\n");
    } else {
        for stage in &result.stage_results {
            output.push_str(&format!(
                "- [{}] {} ({}): {:.prec$} / {:.prec$}\n",
                if stage.passed { "passed" } else { "failed" },
                stage.stage_name,
                stage.stage_id,
                stage.score,
                stage.max_score,
                prec = decimals
            ));
            for component in &stage.components {
                output.push_str(&format!(
                    "  - {}: {:.prec$}{}\n",
                    component.id,
                    component.points,
                    if component.counted { "" } else { " (not counted)" },
                    prec = decimals
                ));
            }
        }
        output.push('\n');
    }

    output.push_str("## Bonuses\n\n");
    if result.bonuses.is_empty() {
        output.push_str("- none\n\n");
    } else {
        for award in &result.bonuses {
            output.push_str(&format!(
                "- {} ({:?}): {:.prec$}\n",
                award.rule_id,
                award.kind,
                award.points,
                prec = decimals
            ));
        }
        output.push('\n');
    }

    output.push_str("## Outlook\n\n");
    output.push_str(&format!("- chance: {}\n", report.outlook.chance));
    if let Some(threshold) = report.outlook.threshold {
        output.push_str(&format!(
            "- last year's threshold: {:.prec$}\n",
            threshold,
            prec = decimals
        ));
    }
    if let Some(progress) = report.outlook.progress_text() {
        output.push_str(&format!("- progress: {progress}\n"));
    }
    output.push('\n');

    output.push_str(&format!("Formula fingerprint: {}\n", report.fingerprint));
    output
}
