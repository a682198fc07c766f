// IB curriculum dimensions: topic, difficulty and paper

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Syllabus topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Topic {
    #[serde(rename = "Number & Algebra")]
    NumberAndAlgebra,
    #[serde(rename = "Functions")]
    Functions,
    #[serde(rename = "Geometry & Trig")]
    GeometryAndTrig,
    #[serde(rename = "Stats & Probability")]
    StatsAndProbability,
    #[serde(rename = "Calculus")]
    Calculus,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Topic::NumberAndAlgebra,
        Topic::Functions,
        Topic::GeometryAndTrig,
        Topic::StatsAndProbability,
        Topic::Calculus,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Topic::NumberAndAlgebra => "Number & Algebra",
            Topic::Functions => "Functions",
            Topic::GeometryAndTrig => "Geometry & Trig",
            Topic::StatsAndProbability => "Stats & Probability",
            Topic::Calculus => "Calculus",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "number & algebra" | "number_algebra" | "algebra" | "number" => Ok(Topic::NumberAndAlgebra),
            "functions" | "function" => Ok(Topic::Functions),
            "geometry & trig" | "geometry_trig" | "geometry" | "trig" => Ok(Topic::GeometryAndTrig),
            "stats & probability" | "stats_probability" | "stats" | "probability" => {
                Ok(Topic::StatsAndProbability)
            }
            "calculus" => Ok(Topic::Calculus),
            _ => Err(format!("Unknown topic: {}", s)),
        }
    }
}

/// Question difficulty band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Foundation,
    Standard,
    Distinction,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Foundation,
        Difficulty::Standard,
        Difficulty::Distinction,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Foundation => "Foundation",
            Difficulty::Standard => "Standard",
            Difficulty::Distinction => "Distinction",
        }
    }

    /// Marks carried by a template question of this difficulty
    pub fn template_marks(&self) -> u32 {
        match self {
            Difficulty::Foundation => 4,
            Difficulty::Standard => 6,
            Difficulty::Distinction => 8,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "foundation" | "easy" => Ok(Difficulty::Foundation),
            "standard" | "medium" => Ok(Difficulty::Standard),
            "distinction" | "hard" => Ok(Difficulty::Distinction),
            _ => Err(format!("Unknown difficulty: {}", s)),
        }
    }
}

/// Exam paper type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Paper {
    Paper1,
    Paper2,
    Paper3,
}

impl Paper {
    pub const ALL: [Paper; 3] = [Paper::Paper1, Paper::Paper2, Paper::Paper3];

    pub fn label(&self) -> &'static str {
        match self {
            Paper::Paper1 => "Paper 1",
            Paper::Paper2 => "Paper 2",
            Paper::Paper3 => "Paper 3",
        }
    }
}

impl fmt::Display for Paper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Paper {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .collect();
        match normalized.as_str() {
            "1" | "p1" | "paper1" => Ok(Paper::Paper1),
            "2" | "p2" | "paper2" => Ok(Paper::Paper2),
            "3" | "p3" | "paper3" => Ok(Paper::Paper3),
            _ => Err(format!("Unknown paper: {}", s)),
        }
    }
}
