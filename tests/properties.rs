use lexicon_core::compiler::actors::read_actors;
use lexicon_core::compiler::ActorDictionary;
use lexicon_core::core::date::{is_leap_year, to_ordinal};
use lexicon_core::core::line_source::LineSource;
use lexicon_core::{segment, CompileContext};
use proptest::prelude::*;
use std::io::Cursor;
use std::ops::RangeInclusive;

fn days_in(year: u32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year as i64) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// A valid (year, month, day) with the year drawn from `years`.
fn arb_date_in(years: RangeInclusive<u32>) -> impl Strategy<Value = (u32, u32, u32)> {
    (years, 1u32..=12)
        .prop_flat_map(|(year, month)| (Just(year), Just(month), 1..=days_in(year, month)))
}

fn arb_date() -> impl Strategy<Value = (u32, u32, u32)> {
    arb_date_in(1601..=2099)
}

fn long_form((year, month, day): (u32, u32, u32)) -> String {
    format!("{year:04}{month:02}{day:02}")
}

fn compile_actors(text: &str) -> ActorDictionary {
    let mut ctx = CompileContext::default();
    let mut dict = ActorDictionary::default();
    let mut source = LineSource::from_reader(Cursor::new(text.to_string()), "generated.actors");
    read_actors(&mut source, &mut dict, &mut ctx).unwrap();
    dict
}

proptest! {
    #[test]
    fn later_dates_have_larger_ordinals(a in arb_date(), b in arb_date()) {
        let (oa, ob) = (to_ordinal(&long_form(a)).unwrap(), to_ordinal(&long_form(b)).unwrap());
        prop_assert_eq!(a.cmp(&b), oa.cmp(&ob));
    }

    #[test]
    fn two_digit_years_match_their_century((year, month, day) in arb_date_in(1931..=2030)) {
        let short = format!("{:02}{month:02}{day:02}", year % 100);
        prop_assert_eq!(to_ordinal(&short), to_ordinal(&long_form((year, month, day))));
    }

    #[test]
    fn consecutive_days_are_one_apart(date in arb_date()) {
        let (year, month, day) = date;
        let next = if day < days_in(year, month) {
            (year, month, day + 1)
        } else if month < 12 {
            (year, month + 1, 1)
        } else {
            (year + 1, 1, 1)
        };
        prop_assume!(next.0 < 2100);
        let gap = to_ordinal(&long_form(next)).unwrap() - to_ordinal(&long_form(date)).unwrap();
        prop_assert_eq!(gap, 1);
    }

    #[test]
    fn every_actor_cluster_is_kept(names in prop::collection::btree_set("[A-Z]{3,8}", 1..12)) {
        let text: String = names.iter().map(|n| format!("{n} [{n}]\n")).collect();
        let dict = compile_actors(&text);
        prop_assert_eq!(dict.cluster_count(), names.len());
        for name in &names {
            prop_assert_eq!(dict.code_on(name, 1), Some(name.as_str()));
        }
    }

    #[test]
    fn segments_are_slices_within_bounds(words in prop::collection::vec("[a-z]{1,9}", 0..200)) {
        let text = words.join(" ") + ". Next " + &words.join(" ");
        for sentence in segment(&text) {
            let len = sentence.chars().count();
            prop_assert!(len > 100 && len < 512);
            prop_assert!(text.contains(sentence));
        }
    }
}
