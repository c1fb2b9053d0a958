use std::collections::HashSet;

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use quarkdex::core::types::{Question, QuizOption};
use quarkdex::query::page::{Pagination, paginate, slice_range, validate_range};
use quarkdex::query::sampler::sample;
use quarkdex::sanitize::public::sanitize;

fn question_strategy() -> impl Strategy<Value = Question> {
    let option = ("[A-F]", ".{0,20}", proptest::option::of(any::<bool>())).prop_map(
        |(letter, text, is_correct)| QuizOption { letter, text, is_correct },
    );
    (
        any::<u64>(),
        ".{0,40}",
        proptest::collection::vec(option, 0..5),
        proptest::option::of("[A-F]"),
    )
        .prop_map(|(id, question, options, correct_answer)| Question {
            id,
            question,
            options,
            correct_answer,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn range_slice_is_clamped_window(
        total in 0usize..200,
        start in 0i64..250,
        width in 1i64..=50,
    ) {
        let items: Vec<usize> = (0..total).collect();
        let (start, end) = validate_range(start, start + width, 50).unwrap();

        match slice_range(&items, start, end) {
            Ok((slice, info)) => {
                prop_assert_eq!(slice.len(), end.min(total) - start.min(total));
                prop_assert_eq!(info.count, slice.len());
                prop_assert_eq!(info.has_more, end < total);
                prop_assert!(slice.iter().copied().eq(start..start + slice.len()));
            }
            Err(_) => prop_assert!(start >= total),
        }
    }

    #[test]
    fn sample_is_distinct_subset(
        pool_size in 0usize..100,
        count in 1usize..30,
        seed in any::<u64>(),
    ) {
        let pool: Vec<usize> = (0..pool_size).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        let picked = sample(pool.iter().collect(), count, &mut rng);

        prop_assert_eq!(picked.len(), count.min(pool_size));
        let distinct: HashSet<_> = picked.iter().copied().collect();
        prop_assert_eq!(distinct.len(), picked.len());
        prop_assert!(picked.iter().all(|v| **v < pool_size));
    }

    #[test]
    fn pages_partition_results(total in 0usize..300, limit in 1usize..=50) {
        let items: Vec<usize> = (0..total).collect();
        let first = paginate(&items, Pagination::new(1, limit, 50).unwrap()).1;

        let mut joined = Vec::new();
        for page in 1..=first.total_pages {
            let (window, info) = paginate(&items, Pagination::new(page, limit, 50).unwrap());
            prop_assert_eq!(info.has_next, page < first.total_pages);
            prop_assert!(!window.is_empty());
            joined.extend_from_slice(window);
        }
        prop_assert_eq!(joined, items);
    }

    #[test]
    fn sanitized_questions_never_leak_answers(question in question_strategy()) {
        let public = sanitize(&question, false);
        prop_assert!(!public.has_answer_fields());

        let json = serde_json::to_value(&public).unwrap();
        prop_assert!(json.get("correct_answer").is_none());
        if let Some(options) = json.get("options").and_then(|o| o.as_array()) {
            prop_assert!(options.iter().all(|o| o.get("is_correct").is_none()));
        }

        let full = sanitize(&question, true);
        prop_assert_eq!(full.correct_answer, question.correct_answer.clone());
        prop_assert_eq!(full.options.map(|o| o.len()).unwrap_or(0), question.options.len());
    }
}
