use dashgraph::consolidate::consolidate_top_n;
use dashgraph::ir::{CategoryMapping, EntryKind};
use dashgraph::mapping::MappingEntry;
use dashgraph::palette::ColorPalette;
use dashgraph::summarize::count_categories;
use dashgraph::{build_chart, Locale, Table};
use proptest::prelude::*;

fn single_column(labels: &[String]) -> Table {
    Table::from_records(
        vec!["Religion".to_string()],
        labels.iter().map(|l| vec![l.clone()]).collect(),
    )
}

/// Distinct labels `c0, c1, ...` with whole-number measures
fn mapping(measures: &[u32]) -> CategoryMapping {
    measures
        .iter()
        .enumerate()
        .map(|(i, m)| (format!("c{}", i), *m as f64))
        .collect()
}

proptest! {
    #[test]
    fn prop_counts_sum_to_row_count(labels in prop::collection::vec("[a-e]{0,2}", 1..60)) {
        let table = single_column(&labels);
        let counts = count_categories(&table, "Religion", "no data specified").unwrap();
        prop_assert_eq!(counts.total(), table.row_count() as f64);
    }

    #[test]
    fn prop_counts_are_descending(labels in prop::collection::vec("[a-e]", 1..60)) {
        let counts = count_categories(&single_column(&labels), "Religion", "-").unwrap();
        let measures = counts.measures();
        prop_assert!(measures.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn prop_top_n_keeps_largest(measures in prop::collection::vec(0u32..1000, 1..30), top_n in 1usize..10) {
        let input = mapping(&measures);
        let out = consolidate_top_n(input.clone(), top_n, "Other");

        if measures.len() <= top_n {
            prop_assert_eq!(out, input);
        } else {
            prop_assert_eq!(out.len(), top_n + 1);

            let mut ranked = input.entries.clone();
            ranked.sort_by(|a, b| b.measure.total_cmp(&a.measure));
            let expected_rest: f64 = ranked[top_n..].iter().map(|e| e.measure).sum();

            for (kept, expected) in out.entries[..top_n].iter().zip(&ranked[..top_n]) {
                prop_assert_eq!(&kept.label, &expected.label);
            }
            let last = &out.entries[top_n];
            prop_assert_eq!(last.kind, EntryKind::Remainder);
            prop_assert_eq!(last.measure, expected_rest);
            prop_assert_eq!(out.total(), input.total());
        }
    }

    #[test]
    fn prop_top_n_idempotent(measures in prop::collection::vec(0u32..1000, 1..30), top_n in 1usize..10) {
        let once = consolidate_top_n(mapping(&measures), top_n, "Other");
        let twice = consolidate_top_n(once.clone(), top_n, "Other");
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_color_order_matches_input(labels in prop::collection::vec("[A-Za-z/ ]{1,8}", 0..20)) {
        for palette in [ColorPalette::party(), ColorPalette::qualitative()] {
            let assignment = palette.assign_colors(&labels);
            prop_assert_eq!(&assignment.order, &labels);
            prop_assert_eq!(assignment.colors.len(), labels.len());
        }
    }

    #[test]
    fn prop_builder_always_answers(labels in prop::collection::vec("[a-z]{0,3}", 0..40), top_n in 0usize..12) {
        let table = single_column(&labels);
        let spec = MappingEntry::pie("Religion").with_top_n(top_n).canonicalize("kosis");
        let chart = build_chart(&table, &spec, Locale::English);

        if labels.is_empty() {
            prop_assert!(chart.is_placeholder());
        } else {
            prop_assert!(chart.points.len() <= top_n.max(1) + 1);
            let labels: Vec<String> = chart.points.iter().map(|p| p.label.clone()).collect();
            prop_assert_eq!(&chart.category_order, &labels);
        }
    }
}
