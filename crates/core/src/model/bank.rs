use rand::Rng;
use rand::rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::{Question, QuestionDraft, QuestionError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("question bank is empty")]
    Empty,

    #[error("duplicate question id {0}")]
    DuplicateId(QuestionId),

    #[error(transparent)]
    Question(#[from] QuestionError),
}

/// The fixed, validated set of questions a quiz draws from.
///
/// Never empty and ids are unique; both are checked once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// # Errors
    ///
    /// Returns `BankError::Empty` for an empty list and `BankError::DuplicateId`
    /// when two questions share an id.
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::Empty);
        }
        let mut seen = HashSet::with_capacity(questions.len());
        for q in &questions {
            if !seen.insert(q.id()) {
                return Err(BankError::DuplicateId(q.id()));
            }
        }
        Ok(Self { questions })
    }

    /// Validate every draft, then build the bank.
    ///
    /// # Errors
    ///
    /// Returns the first `QuestionError` encountered, or any `BankError` from [`Self::new`].
    pub fn from_drafts(drafts: impl IntoIterator<Item = QuestionDraft>) -> Result<Self, BankError> {
        let questions = drafts
            .into_iter()
            .map(QuestionDraft::validate)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(questions)
    }

    #[must_use]
    pub fn all_questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Draw a fresh uniformly random ordering using the thread RNG.
    #[must_use]
    pub fn new_session_order(&self) -> SessionOrder {
        let mut rng = rng();
        self.new_session_order_with(&mut rng)
    }

    /// Draw a fresh ordering from the supplied random source.
    pub fn new_session_order_with<R: Rng + ?Sized>(&self, rng: &mut R) -> SessionOrder {
        let mut questions = self.questions.clone();
        questions.as_mut_slice().shuffle(rng);
        SessionOrder { questions }
    }
}

/// One playthrough's ordering: a permutation of the bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOrder {
    questions: Vec<Question>,
}

impl SessionOrder {
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn ids(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.questions.iter().map(Question::id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            vec!["a".into(), "b".into()],
            0,
            "",
        )
        .unwrap()
    }

    fn bank(n: u64) -> QuestionBank {
        QuestionBank::new((1..=n).map(question).collect()).unwrap()
    }

    #[test]
    fn empty_bank_is_rejected() {
        assert_eq!(QuestionBank::new(Vec::new()).unwrap_err(), BankError::Empty);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = QuestionBank::new(vec![question(1), question(2), question(1)]).unwrap_err();
        assert_eq!(err, BankError::DuplicateId(QuestionId::new(1)));
    }

    #[test]
    fn from_drafts_surfaces_question_defects() {
        let drafts = vec![QuestionDraft {
            id: QuestionId::new(3),
            prompt: "Q".into(),
            choices: vec!["a".into(), "b".into()],
            correct_index: 2,
            explanation: String::new(),
        }];
        let err = QuestionBank::from_drafts(drafts).unwrap_err();
        assert!(matches!(
            err,
            BankError::Question(QuestionError::CorrectIndexOutOfRange { .. })
        ));
    }

    #[test]
    fn all_questions_keeps_configured_order() {
        let b = bank(4);
        let ids: Vec<u64> = b.all_questions().iter().map(|q| q.id().value()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn session_order_is_a_permutation() {
        let b = bank(8);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let order = b.new_session_order_with(&mut rng);
            assert_eq!(order.len(), b.len());
            let mut ids: Vec<u64> = order.ids().map(|id| id.value()).collect();
            ids.sort_unstable();
            assert_eq!(ids, (1..=8).collect::<Vec<_>>());
        }
    }

    #[test]
    fn session_orders_vary_across_draws() {
        let b = bank(8);
        let mut rng = StdRng::seed_from_u64(42);
        let first: Vec<_> = b.new_session_order_with(&mut rng).ids().collect();
        let differs = (0..10).any(|_| {
            let next: Vec<_> = b.new_session_order_with(&mut rng).ids().collect();
            next != first
        });
        assert!(differs);
    }

    #[test]
    fn seeded_draws_are_reproducible() {
        let b = bank(6);
        let a: Vec<_> = b
            .new_session_order_with(&mut StdRng::seed_from_u64(1))
            .ids()
            .collect();
        let c: Vec<_> = b
            .new_session_order_with(&mut StdRng::seed_from_u64(1))
            .ids()
            .collect();
        assert_eq!(a, c);
    }
}
