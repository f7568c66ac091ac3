//! Score Calculator: pure, deterministic section scoring.
//!
//! Every score is a clamped linear function of how many fixed keywords appear
//! in the text (case-insensitive substring, each keyword counted once) or of
//! the text's length. The aggregate is the rounded mean of the four sections.

use serde::{Deserialize, Serialize};

/// Points per detected skill.
pub const SKILL_POINTS: u32 = 10;
/// Points per matched experience keyword, on top of the experience floor.
pub const EXPERIENCE_POINTS: u32 = 12;
/// Points per matched education keyword, on top of the education floor.
pub const EDUCATION_POINTS: u32 = 15;

const SKILLS_FLOOR: u32 = 20;
const EXPERIENCE_FLOOR: u32 = 30;
const EDUCATION_FLOOR: u32 = 40;
const FORMAT_FLOOR: u32 = 50;
const MAX_SCORE: u32 = 100;

/// Texts longer than this many characters get the "substantial" format score.
const FORMAT_LENGTH_THRESHOLD: usize = 1000;
const FORMAT_SCORE_LONG: u32 = 85;
const FORMAT_SCORE_SHORT: u32 = 60;

pub const EXPERIENCE_KEYWORDS: &[&str] = &[
    "experience",
    "worked",
    "developed",
    "managed",
    "led",
    "created",
    "implemented",
    "achieved",
    "increased",
    "reduced",
];

pub const EDUCATION_KEYWORDS: &[&str] = &[
    "university",
    "college",
    "degree",
    "bachelor",
    "master",
    "phd",
    "education",
    "graduated",
    "gpa",
];

/// The four per-section scores, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionScores {
    pub skills: u32,
    pub experience: u32,
    pub education: u32,
    pub format: u32,
}

impl SectionScores {
    /// Rounded mean of the four sections; halves round up.
    pub fn overall(&self) -> u32 {
        let sum = self.skills + self.experience + self.education + self.format;
        (sum + 2) / 4
    }
}

/// Section scores plus the aggregate ATS compatibility score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scores {
    pub overall: u32,
    pub sections: SectionScores,
}

/// Computes all section scores and the overall score for a resume.
pub fn compute_scores(text: &str, skills: &[String]) -> Scores {
    let text_lower = text.to_lowercase();

    let sections = SectionScores {
        skills: skills_score(skills.len()),
        experience: experience_score(count_keyword_matches(&text_lower, EXPERIENCE_KEYWORDS)),
        education: education_score(count_keyword_matches(&text_lower, EDUCATION_KEYWORDS)),
        format: format_score(text.chars().count()),
    };

    Scores {
        overall: sections.overall(),
        sections,
    }
}

pub fn skills_score(skill_count: usize) -> u32 {
    linear_score(skill_count, SKILL_POINTS, 0, SKILLS_FLOOR)
}

pub fn experience_score(matches: usize) -> u32 {
    linear_score(matches, EXPERIENCE_POINTS, EXPERIENCE_FLOOR, EXPERIENCE_FLOOR)
}

pub fn education_score(matches: usize) -> u32 {
    linear_score(matches, EDUCATION_POINTS, EDUCATION_FLOOR, EDUCATION_FLOOR)
}

pub fn format_score(char_len: usize) -> u32 {
    let raw = if char_len > FORMAT_LENGTH_THRESHOLD {
        FORMAT_SCORE_LONG
    } else {
        FORMAT_SCORE_SHORT
    };
    raw.clamp(FORMAT_FLOOR, MAX_SCORE)
}

/// Number of distinct keywords contained in `text_lower`.
/// `text_lower` must already be lowercased; keywords are lowercase literals.
pub fn count_keyword_matches(text_lower: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| text_lower.contains(*k)).count()
}

/// `clamp(floor, 100, count * points + base)` without overflowing on huge counts.
fn linear_score(count: usize, points: u32, base: u32, floor: u32) -> u32 {
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    count
        .saturating_mul(points)
        .saturating_add(base)
        .clamp(floor, MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_skills_score_has_floor_of_20() {
        assert_eq!(skills_score(0), 20);
        assert_eq!(skills_score(1), 20);
        assert_eq!(skills_score(2), 20);
        assert_eq!(skills_score(3), 30);
    }

    #[test]
    fn test_skills_score_caps_at_100() {
        assert_eq!(skills_score(10), 100);
        assert_eq!(skills_score(25), 100);
        assert_eq!(skills_score(usize::MAX), 100);
    }

    #[test]
    fn test_skills_score_is_monotonic() {
        let mut previous = 0;
        for n in 0..=20 {
            let score = skills_score(n);
            assert!(score >= previous, "score dropped at n={n}");
            assert_eq!(score, (n as u32 * SKILL_POINTS).clamp(20, 100));
            previous = score;
        }
    }

    #[test]
    fn test_experience_score_counts_each_keyword_once() {
        let text = "Led the team. Led again. LED lighting. Managed budgets.";
        let scores = compute_scores(text, &[]);
        // "led" + "managed" → 2 * 12 + 30
        assert_eq!(scores.sections.experience, 54);
    }

    #[test]
    fn test_keyword_match_is_case_insensitive_substring() {
        // "skilled" contains "led"; substring matching is intentional
        let lower = "highly skilled engineer".to_lowercase();
        assert_eq!(count_keyword_matches(&lower, EXPERIENCE_KEYWORDS), 1);
    }

    #[test]
    fn test_experience_score_caps_at_100() {
        let text = EXPERIENCE_KEYWORDS.join(" ");
        assert_eq!(compute_scores(&text, &[]).sections.experience, 100);
    }

    #[test]
    fn test_education_score_floor_and_growth() {
        assert_eq!(compute_scores("nothing relevant", &[]).sections.education, 40);
        assert_eq!(
            compute_scores("B.Sc. degree from State University", &[])
                .sections
                .education,
            70
        );
        let all = EDUCATION_KEYWORDS.join(" ");
        assert_eq!(compute_scores(&all, &[]).sections.education, 100);
    }

    #[test]
    fn test_format_score_threshold_is_strictly_greater_than_1000() {
        assert_eq!(format_score(0), 60);
        assert_eq!(format_score(1000), 60);
        assert_eq!(format_score(1001), 85);
    }

    #[test]
    fn test_format_score_counts_characters_not_bytes() {
        // 600 two-byte chars = 1200 bytes but only 600 characters
        let text = "é".repeat(600);
        assert_eq!(compute_scores(&text, &[]).sections.format, 60);
    }

    #[test]
    fn test_overall_is_rounded_mean() {
        let sections = SectionScores {
            skills: 40,
            experience: 66,
            education: 40,
            format: 85,
        };
        // (40 + 66 + 40 + 85) / 4 = 57.75 → 58
        assert_eq!(sections.overall(), 58);

        let half = SectionScores {
            skills: 20,
            experience: 30,
            education: 40,
            format: 60,
        };
        // 150 / 4 = 37.5 → 38
        assert_eq!(half.overall(), 38);
    }

    #[test]
    fn test_overall_bounded_0_to_100() {
        let max = SectionScores {
            skills: 100,
            experience: 100,
            education: 100,
            format: 100,
        };
        assert_eq!(max.overall(), 100);
        let min = SectionScores {
            skills: 0,
            experience: 0,
            education: 0,
            format: 0,
        };
        assert_eq!(min.overall(), 0);
    }

    #[test]
    fn test_four_skills_scenario() {
        let scores = compute_scores(
            "Python, React, AWS, Docker",
            &skills(&["Python", "React", "AWS", "Docker"]),
        );
        assert_eq!(scores.sections.skills, 40);
    }

    #[test]
    fn test_experience_only_long_text_scenario() {
        let mut text = String::from("Managed a platform team, developed services and led hiring. ");
        while text.chars().count() < 1500 {
            text.push_str("Lorem ipsum dolor sit amet. ");
        }
        let text: String = text.chars().take(1500).collect();

        let scores = compute_scores(&text, &[]);
        assert_eq!(scores.sections.experience, 3 * EXPERIENCE_POINTS + 30);
        assert_eq!(scores.sections.format, 85);
        assert_eq!(scores.sections.education, 40);
        assert_eq!(scores.sections.skills, 20);
        assert_eq!(scores.overall, scores.sections.overall());
    }

    #[test]
    fn test_section_scores_serialize_with_expected_keys() {
        let json = serde_json::to_value(SectionScores {
            skills: 1,
            experience: 2,
            education: 3,
            format: 4,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"skills": 1, "experience": 2, "education": 3, "format": 4})
        );
    }
}
