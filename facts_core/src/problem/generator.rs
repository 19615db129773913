use facts_schema::{Operation, MAX_OPERAND, MIN_OPERAND};
use rand::Rng;
use tracing::trace;

use super::{OperandSet, Problem, SprintProblem};

/// How a game turns the selected tables into facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPolicy {
    /// `a` from the tables, `b` from 1..=12, `a op b`.
    Standard(Operation),
    /// Answer from the tables, subtrahend from 1..=12, shown as a subtraction.
    InvertedSubtraction,
    /// Divisor from the tables, quotient from 1..=12, shown as a division.
    InvertedDivision,
    /// All twelve `a × factor` rows, built up front.
    ExhaustiveSprint,
}

impl GenerationPolicy {
    /// The policy that draws `op` facts with whole, non-negative answers.
    pub fn for_operation(op: Operation) -> Self {
        match op {
            Operation::Add | Operation::Multiply => GenerationPolicy::Standard(op),
            Operation::Subtract => GenerationPolicy::InvertedSubtraction,
            Operation::Divide => GenerationPolicy::InvertedDivision,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            GenerationPolicy::Standard(op) => *op,
            GenerationPolicy::InvertedSubtraction => Operation::Subtract,
            GenerationPolicy::InvertedDivision => Operation::Divide,
            GenerationPolicy::ExhaustiveSprint => Operation::Multiply,
        }
    }
}

pub struct QuestionGenerator<R> {
    policy: GenerationPolicy,
    rng: R,
    last_key: Option<String>,
}

impl<R: Rng> QuestionGenerator<R> {
    /// `Standard` subtraction and division are drawn the inverted way so every
    /// table keeps twelve facts to pick from.
    pub fn new(policy: GenerationPolicy, rng: R) -> Self {
        let policy = match policy {
            GenerationPolicy::Standard(op) => GenerationPolicy::for_operation(op),
            other => other,
        };
        Self {
            policy,
            rng,
            last_key: None,
        }
    }

    pub fn policy(&self) -> GenerationPolicy {
        self.policy
    }

    /// Forgets the previous fact so a fresh run may open with anything.
    pub fn reset(&mut self) {
        self.last_key = None;
    }

    /// Draws the next fact, never repeating the one before it.
    ///
    /// Returns `None` for an empty set and for the sprint policy, which has
    /// no incremental draw.
    pub fn next(&mut self, tables: &OperandSet) -> Option<Problem> {
        let values = tables.values();
        if values.is_empty() || self.policy == GenerationPolicy::ExhaustiveSprint {
            return None;
        }

        loop {
            let Some(problem) = self.draw(&values) else {
                continue;
            };
            let key = problem.key();
            if self.last_key.as_deref() == Some(key.as_str()) {
                trace!(%key, "redrawing repeated fact");
                continue;
            }
            self.last_key = Some(key);
            return Some(problem);
        }
    }

    fn draw(&mut self, values: &[u8]) -> Option<Problem> {
        let picked = u32::from(values[self.rng.random_range(0..values.len())]);
        let free = u32::from(self.rng.random_range(MIN_OPERAND..=MAX_OPERAND));

        let problem = match self.policy {
            GenerationPolicy::Standard(op) => Problem::new(picked, free, op, op.apply(picked, free)?),
            GenerationPolicy::InvertedSubtraction => {
                // picked is the answer, free the subtrahend
                Problem::new(picked + free, free, Operation::Subtract, picked)
            }
            GenerationPolicy::InvertedDivision => {
                // picked is the divisor, free the quotient
                Problem::new(picked * free, picked, Operation::Divide, free)
            }
            GenerationPolicy::ExhaustiveSprint => return None,
        };
        Some(problem)
    }
}

/// The twelve rows `1 × factor` through `12 × factor`, in order.
pub fn sprint_set(factor: u8) -> Vec<SprintProblem> {
    let factor = u32::from(factor);
    (u32::from(MIN_OPERAND)..=u32::from(MAX_OPERAND))
        .map(|a| SprintProblem {
            problem: Problem::new(a, factor, Operation::Multiply, a * factor),
            completed: false,
            completion_ms: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn generator(policy: GenerationPolicy, seed: u64) -> QuestionGenerator<StdRng> {
        QuestionGenerator::new(policy, StdRng::seed_from_u64(seed))
    }

    #[test]
    fn standard_operands_stay_in_their_ranges() {
        let tables = OperandSet::from_values([3, 7, 11]);
        for op in [Operation::Add, Operation::Multiply] {
            let mut gen = generator(GenerationPolicy::Standard(op), 42);
            let mut last: Option<String> = None;
            for _ in 0..1000 {
                let p = gen.next(&tables).unwrap();
                assert!(tables.contains(p.a as u8), "a={} not selected", p.a);
                assert!((1..=12).contains(&p.b));
                assert_eq!(Some(p.expected), op.apply(p.a, p.b));
                assert_ne!(last.as_deref(), Some(p.key().as_str()));
                last = Some(p.key());
            }
        }
    }

    #[test]
    fn single_table_still_avoids_consecutive_repeats() {
        let tables = OperandSet::from_values([5]);
        let mut gen = generator(GenerationPolicy::Standard(Operation::Multiply), 1);
        let mut prev = gen.next(&tables).unwrap();
        for _ in 0..500 {
            let p = gen.next(&tables).unwrap();
            assert_ne!(p.key(), prev.key());
            prev = p;
        }
    }

    #[test]
    fn subtraction_answers_are_never_negative() {
        let tables = OperandSet::all();
        let mut gen = generator(GenerationPolicy::InvertedSubtraction, 9);
        let mut prev = String::new();
        for _ in 0..1000 {
            let p = gen.next(&tables).unwrap();
            assert_eq!(p.operation, Operation::Subtract);
            assert_eq!(p.a - p.b, p.expected);
            assert!(tables.contains(p.expected as u8));
            assert!((1..=12).contains(&p.b));
            assert_ne!(p.key(), prev);
            prev = p.key();
        }
    }

    #[test]
    fn division_answers_are_whole_numbers() {
        let tables = OperandSet::from_values([2, 9]);
        let mut gen = generator(GenerationPolicy::InvertedDivision, 3);
        for _ in 0..1000 {
            let p = gen.next(&tables).unwrap();
            assert!(tables.contains(p.b as u8));
            assert_eq!(p.a % p.b, 0);
            assert_eq!(p.a / p.b, p.expected);
            assert!((1..=12).contains(&p.expected));
        }
    }

    #[test]
    fn one_table_gives_distinct_facts_for_every_policy() {
        let tables = OperandSet::from_values([1]);
        for policy in [
            GenerationPolicy::Standard(Operation::Add),
            GenerationPolicy::Standard(Operation::Multiply),
            GenerationPolicy::Standard(Operation::Subtract),
            GenerationPolicy::Standard(Operation::Divide),
            GenerationPolicy::InvertedSubtraction,
            GenerationPolicy::InvertedDivision,
        ] {
            let mut gen = generator(policy, 1);
            let first = gen.next(&tables).unwrap();
            let second = gen.next(&tables).unwrap();
            assert_ne!(first.key(), second.key(), "{policy:?}");
            assert_eq!(first.operation.apply(first.a, first.b), Some(first.expected));
        }
        let mut sprint = generator(GenerationPolicy::ExhaustiveSprint, 1);
        assert!(sprint.next(&tables).is_none());
    }

    #[test]
    fn plain_subtraction_and_division_are_drawn_inverted() {
        let gen = generator(GenerationPolicy::Standard(Operation::Subtract), 0);
        assert_eq!(gen.policy(), GenerationPolicy::InvertedSubtraction);
        let gen = generator(GenerationPolicy::Standard(Operation::Divide), 0);
        assert_eq!(gen.policy(), GenerationPolicy::InvertedDivision);
    }

    #[test]
    fn empty_set_yields_nothing() {
        let mut gen = generator(GenerationPolicy::Standard(Operation::Add), 0);
        assert!(gen.next(&OperandSet::empty()).is_none());
    }

    #[test]
    fn sprint_set_covers_one_through_twelve() {
        let rows = sprint_set(7);
        assert_eq!(rows.len(), 12);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.problem.a, i as u32 + 1);
            assert_eq!(row.problem.b, 7);
            assert_eq!(row.problem.expected, 7 * (i as u32 + 1));
            assert!(!row.completed);
        }
    }
}
