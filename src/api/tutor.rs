// Tutor replies for the `ask` command
// Keyword matched study notes; the first matching subject wins

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            role,
            content: content.to_string(),
            timestamp,
        }
    }
}

/// Anything that can answer a student's question
pub trait Tutor: Send + Sync {
    fn reply(&self, message: &str) -> String;
}

/// Subject a message was routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Differentiation,
    Integration,
    Equations,
    Sequences,
    Probability,
    Trigonometry,
    General,
}

impl Subject {
    /// Route a message by keyword, checked in a fixed order
    pub fn classify(message: &str) -> Self {
        let message = message.to_lowercase();
        let has = |word: &str| message.contains(word);

        if has("derivative") || has("differentiate") {
            Subject::Differentiation
        } else if has("integral") || has("integrate") {
            Subject::Integration
        } else if has("solve") && (has("equation") || has("=")) {
            Subject::Equations
        } else if has("sequence") || has("series") {
            Subject::Sequences
        } else if has("probability") || has("statistics") {
            Subject::Probability
        } else if has("trig") || has("triangle") {
            Subject::Trigonometry
        } else {
            Subject::General
        }
    }

    pub fn notes(&self) -> &'static str {
        match self {
            Subject::Differentiation => DIFFERENTIATION,
            Subject::Integration => INTEGRATION,
            Subject::Equations => EQUATIONS,
            Subject::Sequences => SEQUENCES,
            Subject::Probability => PROBABILITY,
            Subject::Trigonometry => TRIGONOMETRY,
            Subject::General => GENERAL,
        }
    }
}

/// Offline tutor built from fixed study notes
pub struct RuleTutor;

impl Tutor for RuleTutor {
    fn reply(&self, message: &str) -> String {
        Subject::classify(message).notes().to_string()
    }
}

const DIFFERENTIATION: &str = "\
To find a derivative, start from these rules:

Power rule: f(x) = x^n gives f'(x) = n x^(n-1)
Product rule: f = u v gives f' = u'v + u v'
Quotient rule: f = u / v gives f' = (u'v - u v') / v^2
Chain rule: f = g(h(x)) gives f' = g'(h(x)) h'(x)

Share the function you are working with and we can pick the right rule.";

const INTEGRATION: &str = "\
For integration, remember:

Power rule: ∫ x^n dx = x^(n+1) / (n+1) + C, for n ≠ -1
Definite integral: ∫[a,b] f(x) dx = F(b) - F(a), where F' = f

Common integrals:
• ∫ e^x dx = e^x + C
• ∫ 1/x dx = ln|x| + C
• ∫ sin x dx = -cos x + C
• ∫ cos x dx = sin x + C

Which integral are you trying to evaluate?";

const EQUATIONS: &str = "\
To solve an equation, identify its type first:

1. Linear: isolate the variable with inverse operations.
   2x + 5 = 13 → 2x = 8 → x = 4
2. Quadratic: factorise, complete the square, or use
   x = (-b ± √(b^2 - 4ac)) / 2a
3. Exponential: take logarithms. a^x = b → x = log_a(b)

Send the equation and we can work through it step by step.";

const SEQUENCES: &str = "\
Sequences and series:

Arithmetic term: u_n = u_1 + (n-1)d
Arithmetic sum: S_n = n/2 (2u_1 + (n-1)d)
Geometric term: u_n = u_1 r^(n-1)
Geometric sum: S_n = u_1 (r^n - 1) / (r - 1), for r ≠ 1
Infinite geometric sum: S_∞ = u_1 / (1 - r), for |r| < 1

Which kind of sequence are you working with?";

const PROBABILITY: &str = "\
Probability and statistics:

Basic: P(A) = favourable outcomes / total outcomes
Independent events: P(A ∩ B) = P(A) P(B)
Conditional: P(A | B) = P(A ∩ B) / P(B)
Binomial: P(X = r) = nCr p^r (1-p)^(n-r)
Normal: standardise with Z = (X - μ) / σ

What problem are you working on?";

const TRIGONOMETRY: &str = "\
Trigonometry and triangles:

Right triangles (SOH CAH TOA):
• sin θ = opposite / hypotenuse
• cos θ = adjacent / hypotenuse
• tan θ = opposite / adjacent

Sine rule: a / sin A = b / sin B = c / sin C
Cosine rule: c^2 = a^2 + b^2 - 2ab cos C
Area: A = ½ ab sin C

Which triangle problem can I help with?";

const GENERAL: &str = "\
I can help with IB Mathematics across all five topics: Number & Algebra, Functions,
Geometry & Trigonometry, Statistics & Probability and Calculus.

Ask a specific question, for example:
• How do I find the derivative of x^3 + 2x^2?
• Explain the quadratic formula
• Help me solve log_2(x + 3) = 5";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_routing() {
        assert_eq!(Subject::classify("What is the DERIVATIVE of x^2?"), Subject::Differentiation);
        assert_eq!(Subject::classify("how to differentiate sin x"), Subject::Differentiation);
        assert_eq!(Subject::classify("integrate e^x"), Subject::Integration);
        assert_eq!(Subject::classify("solve 2x + 5 = 13"), Subject::Equations);
        assert_eq!(Subject::classify("solve this equation"), Subject::Equations);
        assert_eq!(Subject::classify("geometric series sum"), Subject::Sequences);
        assert_eq!(Subject::classify("conditional probability"), Subject::Probability);
        assert_eq!(Subject::classify("trig identities"), Subject::Trigonometry);
        assert_eq!(Subject::classify("hello"), Subject::General);
    }

    #[test]
    fn test_solve_needs_an_equation() {
        // "solve" alone falls through to later subjects
        assert_eq!(Subject::classify("solve for the triangle side"), Subject::Trigonometry);
        assert_eq!(Subject::classify("solve it"), Subject::General);
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(
            Subject::classify("derivative of an integral"),
            Subject::Differentiation
        );
    }

    #[test]
    fn test_rule_tutor_replies_with_notes() {
        let reply = RuleTutor.reply("sine rule for a triangle");
        assert!(reply.contains("Cosine rule"));
        assert!(RuleTutor.reply("anything").contains("Ask a specific question"));
    }
}
