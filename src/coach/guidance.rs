use crate::models::{DecisionGuidance, DecisionGuidanceInput};

/// Decisions described as "easy" or "medium" to undo get a bias toward action.
pub fn is_reversible(reversibility: &str) -> bool {
    let lowered = reversibility.to_lowercase();
    lowered.contains("easy") || lowered.contains("medium")
}

pub fn guide(input: &DecisionGuidanceInput) -> DecisionGuidance {
    let reversible = is_reversible(&input.reversibility);
    let assumption = input.assumption.trim();

    let headline = if reversible {
        "Bias toward action: run a small test."
    } else {
        "Slow down: add a safeguard before committing."
    };

    let next_step = if assumption.is_empty() {
        "Pick one assumption to test this week, and define a 15-30 minute action that produces evidence."
            .to_string()
    } else {
        format!(
            "Test your key assumption this week: \"{assumption}\". Define a 15-30 minute action that produces evidence."
        )
    };

    let guardrail = if reversible {
        "Set a time-box and a stop rule (what evidence would make you pause?)."
    } else {
        "Define a reversible pilot, add an exit plan, and pre-commit to criteria."
    };

    DecisionGuidance {
        headline: headline.to_string(),
        next_step,
        guardrail: guardrail.to_string(),
        note: format!(
            "Domain: {}. Confidence: {}/100.",
            input.domain,
            input.confidence.min(100)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(reversibility: &str, assumption: &str) -> DecisionGuidanceInput {
        DecisionGuidanceInput {
            title: "Switch teams".into(),
            domain: "career".into(),
            reversibility: reversibility.into(),
            confidence: 65,
            assumption: assumption.into(),
        }
    }

    #[test]
    fn reversible_decisions_bias_to_action() {
        let guidance = guide(&input("Easy to undo", ""));
        assert_eq!(guidance.headline, "Bias toward action: run a small test.");
        assert!(guidance.guardrail.starts_with("Set a time-box"));
        assert!(guidance.next_step.starts_with("Pick one assumption"));
        assert_eq!(guidance.note, "Domain: career. Confidence: 65/100.");
    }

    #[test]
    fn hard_to_reverse_decisions_slow_down() {
        let guidance = guide(&input("Hard", "manager supports the move"));
        assert_eq!(guidance.headline, "Slow down: add a safeguard before committing.");
        assert!(guidance.next_step.contains("\"manager supports the move\""));
        assert!(guidance.guardrail.starts_with("Define a reversible pilot"));
    }

    #[test]
    fn reversibility_match_is_case_insensitive() {
        assert!(is_reversible("MEDIUM"));
        assert!(!is_reversible("one-way door"));
    }
}
