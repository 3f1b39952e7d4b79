use quiz_core::model::{QuestionDraft, QuestionId};

/// The bundled photosynthesis quiz used when no bank file is configured.
#[must_use]
pub fn builtin_questions() -> Vec<QuestionDraft> {
    vec![
        draft(
            1,
            "What do green plants use to make their own food?",
            &["The Moon", "The Sun", "The stars"],
            1,
            "Light energy from the Sun powers photosynthesis.",
        ),
        draft(
            2,
            "What is the process green plants use to make food called?",
            &["Photosynthesis", "Respiration", "Fermentation"],
            0,
            "Photosynthesis builds glucose from light, carbon dioxide and water.",
        ),
        draft(
            3,
            "Besides water and sunlight, what do plants need for photosynthesis?",
            &["Carbon dioxide", "Oxygen", "Wind"],
            0,
            "Carbon dioxide from the air enters through the stomata and becomes glucose.",
        ),
        draft(
            4,
            "Which part of the plant takes in water for photosynthesis?",
            &["Leaves", "Stem", "Roots"],
            2,
            "Roots absorb water from the soil and xylem carries it up to the leaves.",
        ),
        draft(
            5,
            "Which gas do plants release during photosynthesis?",
            &["Oxygen", "Carbon dioxide", "Nitrogen"],
            0,
            "Oxygen is released through the stomata as a by-product.",
        ),
    ]
}

fn draft(
    id: u64,
    prompt: &str,
    choices: &[&str],
    correct_index: usize,
    explanation: &str,
) -> QuestionDraft {
    QuestionDraft {
        id: QuestionId::new(id),
        prompt: prompt.to_owned(),
        choices: choices.iter().map(|c| (*c).to_owned()).collect(),
        correct_index,
        explanation: explanation.to_owned(),
    }
}
