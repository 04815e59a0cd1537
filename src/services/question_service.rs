use rand::Rng;

use crate::dto::question::QuestionResponse;

const MAX_OPERAND: u32 = 9;

/// Generate one practice addition question with single-digit operands.
pub fn generate_question() -> QuestionResponse {
    let mut rng = rand::rng();
    let left = rng.random_range(0..=MAX_OPERAND);
    let right = rng.random_range(0..=MAX_OPERAND);

    QuestionResponse {
        question: format!("{left} + {right}"),
        answer: left + right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_matches_its_answer() {
        for _ in 0..100 {
            let question = generate_question();
            let (left, right) = question
                .question
                .split_once(" + ")
                .expect("prompt is `a + b`");
            let sum = left.parse::<u32>().unwrap() + right.parse::<u32>().unwrap();
            assert_eq!(sum, question.answer);
            assert!(question.answer <= 2 * MAX_OPERAND);
        }
    }
}
