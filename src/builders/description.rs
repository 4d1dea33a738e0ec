use crate::formula::{Component, ComponentKind, Formula, Stage};

/// Human-readable rule, e.g. `0.5 × matematyka (R) + 0.3 × fizyka (R)`.
/// Stages are separated by `; `.
pub fn describe(formula: &Formula) -> String {
    formula
        .stages
        .iter()
        .map(describe_stage)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn describe_stage(stage: &Stage) -> String {
    stage
        .components
        .iter()
        .filter(|component| component.counts_toward_total())
        .map(|component| {
            let label = component_label(component, stage);
            match weight_text(component.weight) {
                Some(weight) => format!("{weight} × {label}"),
                None => label,
            }
        })
        .collect::<Vec<_>>()
        .join(" + ")
}

fn weight_text(weight: f64) -> Option<String> {
    if weight == 1.0 {
        None
    } else {
        Some(format!("{weight}"))
    }
}

fn component_label(component: &Component, stage: &Stage) -> String {
    match &component.kind {
        ComponentKind::MaturaExam { subject, level, .. } => {
            let mut names: Vec<&str> = subject
                .subject()
                .map(|subject| subject.display_name())
                .into_iter()
                .collect();
            names.extend(
                component
                    .alternatives
                    .iter()
                    .map(|alternative| alternative.display_name()),
            );
            let subject_text = match names.as_slice() {
                [] => subject.to_string().to_lowercase(),
                [single] => single.to_string(),
                several => format!("max({})", several.join(", ")),
            };
            format!("{subject_text} ({})", level.code())
        }
        ComponentKind::PracticalExam => stage
            .practical_exams
            .iter()
            .find(|exam| exam.id == component.id)
            .map(|exam| exam.name.to_lowercase())
            .unwrap_or_else(|| component.id.clone()),
        ComponentKind::Interview => "rozmowa kwalifikacyjna".to_string(),
        ComponentKind::Portfolio => "portfolio".to_string(),
        ComponentKind::PreviousDegree => "średnia ze studiów".to_string(),
        ComponentKind::Olympiad => "olimpiada".to_string(),
        ComponentKind::Certificate => "certyfikat".to_string(),
    }
}
