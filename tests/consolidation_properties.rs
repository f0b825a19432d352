//! Property tests for the consolidation pipeline and profile persistence.

use proptest::prelude::*;
use tempfile::TempDir;

use progressive_profile::adapters::{FsProfileStore, InMemoryProfileStore};

use progressive_profile::domain::assessment::{
    Assessment, QuizType, RespondentType, ScoringVersion, SkillName, SkillScores,
};
use progressive_profile::domain::consolidation::ProfileConsolidator;
use progressive_profile::domain::foundation::ChildName;
use progressive_profile::domain::profile::ConsolidatedProfile;
use progressive_profile::ports::ProfileStore;

const SKILLS: [&str; 5] = ["Communication", "Collaboration", "Math", "Literacy", "Focus"];

fn respondent() -> impl Strategy<Value = RespondentType> {
    prop_oneof![
        Just(RespondentType::Parent),
        Just(RespondentType::Teacher),
        Just(RespondentType::Other),
    ]
}

fn quiz_type() -> impl Strategy<Value = QuizType> {
    prop_oneof![
        Just(QuizType::parent_home()),
        Just(QuizType::teacher_classroom()),
        Just(QuizType::general()),
        Just(QuizType::new("summer_camp")),
    ]
}

fn assessment() -> impl Strategy<Value = Assessment> {
    (
        respondent(),
        quiz_type(),
        prop::bool::ANY,
        prop::sample::subsequence(SKILLS.to_vec(), 1..=SKILLS.len()),
        prop::collection::vec(0.0f64..=1.0, SKILLS.len()),
        0.0f64..=1.0,
    )
        .prop_map(|(respondent, quiz, clp2, skills, fractions, answered)| {
            let version = if clp2 {
                ScoringVersion::Clp2
            } else {
                ScoringVersion::Legacy
            };
            let scores = SkillScores::from_pairs(
                skills
                    .into_iter()
                    .zip(fractions)
                    .map(|(name, f)| (name, f * version.native_max())),
            )
            .unwrap();
            Assessment::new(
                ChildName::new("Maya").unwrap(),
                quiz,
                respondent,
                version,
                scores,
            )
            .with_answer_completeness(answered)
        })
}

fn consolidate_all(sequence: &[Assessment]) -> Vec<ConsolidatedProfile> {
    let consolidator = ProfileConsolidator::default();
    let mut history: Vec<ConsolidatedProfile> = Vec::new();
    for incoming in sequence {
        let next = consolidator
            .consolidate(history.last(), incoming)
            .unwrap()
            .profile;
        history.push(next);
    }
    history
}

/// Saves every version in order, then loads the latest back.
fn save_and_reload(
    store: &dyn ProfileStore,
    history: &[ConsolidatedProfile],
) -> Option<ConsolidatedProfile> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime.block_on(async {
        for profile in history {
            store.save(profile).await.unwrap();
        }
        let latest = history.last().unwrap();
        store.load(latest.id()).await.unwrap()
    })
}

proptest! {
    #[test]
    fn completeness_never_decreases(sequence in prop::collection::vec(assessment(), 1..12)) {
        let history = consolidate_all(&sequence);

        for pair in history.windows(2) {
            let (before, after) = (&pair[0], &pair[1]);
            prop_assert!(
                after.completeness_percentage() >= before.completeness_percentage(),
                "completeness fell from {} to {}",
                before.completeness_percentage().value(),
                after.completeness_percentage().value()
            );
        }
    }

    #[test]
    fn new_respondent_type_never_lowers_completeness(
        seed in prop::collection::vec(assessment(), 1..6),
        newcomer in assessment(),
    ) {
        let mut history = consolidate_all(&seed);
        let before = history.pop().unwrap();
        prop_assume!(before.counts().of(newcomer.respondent_type) == 0);

        let after = ProfileConsolidator::default()
            .consolidate(Some(&before), &newcomer)
            .unwrap()
            .profile;
        prop_assert!(after.completeness_percentage() >= before.completeness_percentage());
    }

    #[test]
    fn memory_store_round_trips_merged_profiles(sequence in prop::collection::vec(assessment(), 1..6)) {
        let history = consolidate_all(&sequence);
        let loaded = save_and_reload(&InMemoryProfileStore::new(), &history);
        prop_assert_eq!(loaded.as_ref(), history.last());
    }

    #[test]
    fn confidence_never_decreases(sequence in prop::collection::vec(assessment(), 1..12)) {
        let consolidator = ProfileConsolidator::default();
        let mut profile: Option<ConsolidatedProfile> = None;
        let mut previous = 0.0;

        for (n, incoming) in sequence.iter().enumerate() {
            let next = consolidator
                .consolidate(profile.as_ref(), incoming)
                .unwrap()
                .profile;

            let confidence = next.confidence_percentage().value();
            prop_assert!(confidence >= previous);
            prop_assert!(confidence <= 100.0);
            prop_assert!(next.completeness_percentage().value() <= 100.0);
            prop_assert_eq!(next.total_assessments() as usize, n + 1);
            prop_assert_eq!(next.version().as_u32() as usize, n + 1);
            prop_assert_eq!(next.data_sources().len(), n + 1);

            previous = confidence;
            profile = Some(next);
        }
    }

    #[test]
    fn strengths_and_growth_areas_are_disjoint(sequence in prop::collection::vec(assessment(), 1..6)) {
        let consolidator = ProfileConsolidator::default();
        let mut profile: Option<ConsolidatedProfile> = None;
        for incoming in &sequence {
            profile = Some(consolidator.consolidate(profile.as_ref(), incoming).unwrap().profile);
        }
        let profile = profile.unwrap();

        for strength in profile.strengths() {
            prop_assert!(!profile.growth_areas().contains(strength));
        }
        prop_assert!(profile.strengths().len() <= 3);
        prop_assert!(profile.growth_areas().len() <= 3);
        prop_assert!(!profile.strengths().is_empty());
    }

    #[test]
    fn shared_skill_is_weighted_average(home in 0.0f64..=5.0, school in 0.0f64..=5.0) {
        let consolidator = ProfileConsolidator::default();
        let child = ChildName::new("Maya").unwrap();
        let parent = Assessment::new(
            child.clone(),
            QuizType::parent_home(),
            RespondentType::Parent,
            ScoringVersion::Legacy,
            SkillScores::from_pairs([("Math", home)]).unwrap(),
        );
        let teacher = Assessment::new(
            child,
            QuizType::teacher_classroom(),
            RespondentType::Teacher,
            ScoringVersion::Legacy,
            SkillScores::from_pairs([("Math", school)]).unwrap(),
        );

        let first = consolidator.consolidate(None, &parent).unwrap().profile;
        let merged = consolidator.consolidate(Some(&first), &teacher).unwrap().profile;

        let expected = (home * 0.6 + school * 0.8) / 1.4;
        let actual = merged.score_of(&SkillName::new("Math").unwrap()).unwrap();
        prop_assert!((actual - expected).abs() < 1e-9);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn filesystem_store_round_trips_merged_profiles(sequence in prop::collection::vec(assessment(), 1..6)) {
        let dir = TempDir::new().unwrap();
        let history = consolidate_all(&sequence);
        let loaded = save_and_reload(&FsProfileStore::new(dir.path()), &history);
        prop_assert_eq!(loaded.as_ref(), history.last());
    }
}
