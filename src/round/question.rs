use super::{Difficulty, Operation, Question, RandomSource};
use crate::config::RoundConfig;

/// Draw a question for the round's difficulty and operation.
///
/// Add/subtract use the difficulty bound; multiply/divide always stay inside
/// the times table. Division picks divisor and quotient first and derives the
/// dividend so the answer is always whole.
pub fn generate_question<R: RandomSource + ?Sized>(
    config: &RoundConfig,
    difficulty: Difficulty,
    operation: Operation,
    rng: &mut R,
) -> Question {
    let bound = config.bounds.for_difficulty(difficulty);
    let table = config.table_max;

    let (operand_a, operand_b) = match operation {
        Operation::Add => (rng.next_int(1, bound), rng.next_int(1, bound)),
        Operation::Subtract => {
            let a = rng.next_int(1, bound);
            let b = rng.next_int(1, bound);
            (a.max(b), a.min(b))
        }
        Operation::Multiply => (rng.next_int(1, table), rng.next_int(1, table)),
        Operation::Divide => {
            let divisor = rng.next_int(1, table);
            let quotient = rng.next_int(1, table);
            (divisor * quotient, divisor)
        }
    };
    let expected_answer = operation.apply(operand_a, operand_b);

    Question {
        operation,
        operand_a,
        operand_b,
        expected_answer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct Scripted(VecDeque<i64>);

    impl RandomSource for Scripted {
        fn next_int(&mut self, min: i64, max: i64) -> i64 {
            let v = self.0.pop_front().expect("script exhausted");
            assert!((min..=max).contains(&v), "{v} outside {min}..={max}");
            v
        }
    }

    fn scripted(values: &[i64]) -> Scripted {
        Scripted(values.iter().copied().collect())
    }

    #[test]
    fn test_add_uses_draws_in_order() {
        let q = generate_question(
            &RoundConfig::default(),
            Difficulty::Easy,
            Operation::Add,
            &mut scripted(&[3, 4]),
        );
        assert_eq!((q.operand_a, q.operand_b, q.expected_answer), (3, 4, 7));
    }

    #[test]
    fn test_subtract_swaps_to_stay_non_negative() {
        let q = generate_question(
            &RoundConfig::default(),
            Difficulty::Medium,
            Operation::Subtract,
            &mut scripted(&[12, 40]),
        );
        assert_eq!((q.operand_a, q.operand_b, q.expected_answer), (40, 12, 28));
    }

    #[test]
    fn test_divide_derives_dividend() {
        let q = generate_question(
            &RoundConfig::default(),
            Difficulty::Hard,
            Operation::Divide,
            &mut scripted(&[7, 9]),
        );
        assert_eq!((q.operand_a, q.operand_b, q.expected_answer), (63, 7, 9));
    }

    #[test]
    fn test_multiply_ignores_difficulty_bound() {
        // Scripted source asserts every draw falls in 1..=12.
        let q = generate_question(
            &RoundConfig::default(),
            Difficulty::Hard,
            Operation::Multiply,
            &mut scripted(&[12, 11]),
        );
        assert_eq!(q.expected_answer, 132);
    }

    #[test]
    fn test_widest_accepted_config_stays_in_range() {
        let config = RoundConfig::from_json(
            r#"{"table_max": 1000000, "bounds": {"easy": 1000000, "medium": 1000000, "hard": 1000000}}"#,
        )
        .expect("limits are accepted");
        for operation in Operation::ALL {
            let q = generate_question(
                &config,
                Difficulty::Hard,
                operation,
                &mut scripted(&[1_000_000, 1_000_000]),
            );
            assert_eq!(q.expected_answer, operation.apply(q.operand_a, q.operand_b));
        }
    }
}
