//! Strengths and growth areas derived from consolidated scores.

use std::cmp::Ordering;

use super::MergedScores;
use crate::domain::assessment::SkillName;

/// Top/bottom-N selection over a merge state.
pub struct SkillRanking {
    size: usize,
}

impl SkillRanking {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    /// `(strengths, growth_areas)`, disjoint.
    ///
    /// Each list holds `min(size, skills / 2)` entries; a lone skill is a
    /// strength with no growth area. Strengths are ordered highest first,
    /// growth areas lowest first. In both lists equal scores are listed in
    /// ascending skill-name order.
    pub fn rank(&self, merged: &MergedScores) -> (Vec<SkillName>, Vec<SkillName>) {
        if merged.is_empty() || self.size == 0 {
            return (Vec::new(), Vec::new());
        }

        let mut highest_first: Vec<(&SkillName, f64)> =
            merged.iter().map(|(skill, m)| (skill, m.value)).collect();
        let mut lowest_first = highest_first.clone();
        highest_first.sort_by(|a, b| by_name_on_tie(b.1.total_cmp(&a.1), a.0, b.0));
        lowest_first.sort_by(|a, b| by_name_on_tie(a.1.total_cmp(&b.1), a.0, b.0));

        let n = self.size.min(highest_first.len() / 2);
        let strengths_len = n.max(1);

        let strengths: Vec<SkillName> = highest_first
            .iter()
            .take(strengths_len)
            .map(|(skill, _)| (*skill).clone())
            .collect();
        let growth_areas = lowest_first
            .iter()
            .filter(|(skill, _)| !strengths.contains(*skill))
            .take(n)
            .map(|(skill, _)| (*skill).clone())
            .collect();

        (strengths, growth_areas)
    }
}

fn by_name_on_tie(by_score: Ordering, a: &SkillName, b: &SkillName) -> Ordering {
    match by_score {
        Ordering::Equal => a.cmp(b),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::consolidation::MergedSkill;

    fn merged(pairs: &[(&str, f64)]) -> MergedScores {
        pairs
            .iter()
            .map(|(n, v)| {
                (
                    SkillName::new(*n).unwrap(),
                    MergedSkill {
                        value: *v,
                        accumulated_weight: 1.0,
                    },
                )
            })
            .collect()
    }

    fn names(skills: &[SkillName]) -> Vec<&str> {
        skills.iter().map(SkillName::as_str).collect()
    }

    #[test]
    fn three_skills_yield_one_each() {
        let (strengths, growth) = SkillRanking::new(3).rank(&merged(&[
            ("Communication", 0.82),
            ("Collaboration", 0.97),
            ("Math", 0.47),
        ]));
        assert_eq!(names(&strengths), vec!["Collaboration"]);
        assert_eq!(names(&growth), vec!["Math"]);
    }

    #[test]
    fn eight_skills_yield_three_each_disjoint() {
        let (strengths, growth) = SkillRanking::new(3).rank(&merged(&[
            ("Communication", 0.9),
            ("Collaboration", 0.8),
            ("Content", 0.7),
            ("Critical Thinking", 0.6),
            ("Creative Innovation", 0.5),
            ("Confidence", 0.4),
            ("Literacy", 0.3),
            ("Math", 0.2),
        ]));
        assert_eq!(names(&strengths), vec!["Communication", "Collaboration", "Content"]);
        assert_eq!(names(&growth), vec!["Math", "Literacy", "Confidence"]);
    }

    #[test]
    fn single_skill_is_only_a_strength() {
        let (strengths, growth) = SkillRanking::new(3).rank(&merged(&[("Math", 0.5)]));
        assert_eq!(names(&strengths), vec!["Math"]);
        assert!(growth.is_empty());
    }

    #[test]
    fn ties_break_by_name() {
        let (strengths, growth) =
            SkillRanking::new(3).rank(&merged(&[("Literacy", 0.5), ("Content", 0.5)]));
        assert_eq!(names(&strengths), vec!["Content"]);
        assert_eq!(names(&growth), vec!["Literacy"]);
    }

    #[test]
    fn tied_growth_areas_list_in_name_order() {
        let (strengths, growth) = SkillRanking::new(3).rank(&merged(&[
            ("Math", 0.5),
            ("Literacy", 0.5),
            ("Focus", 0.5),
            ("Content", 0.5),
        ]));
        assert_eq!(names(&strengths), vec!["Content", "Focus"]);
        assert_eq!(names(&growth), vec!["Literacy", "Math"]);
    }
}
