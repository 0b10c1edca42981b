//! Property-based tests for the reshape, clean and aggregate stages.
//!
//! ```bash
//! PROPTEST_CASES=1000 cargo test --test property_tests
//! ```

use polars::prelude::*;
use proptest::prelude::*;

use gdp_dashboard::data::schema::{CONTINENT, COUNTRY_NAME, GDP_VALUE};
use gdp_dashboard::{
    CleanOptions, DataCleaner, DataFilter, DataReshaper, GroupBy, MissingStrategy, Operation,
};

// =============================================================================
// Test Strategies
// =============================================================================

const CONTINENTS: [&str; 4] = ["Africa", "Asia", "Europe", "Oceania"];

/// A GDP cell: mostly present, sometimes missing.
fn gdp_cell() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        4 => (0u32..1_000_000).prop_map(|v| Some(v as f64)),
        1 => Just(None),
    ]
}

/// Wide table: `rows` countries and a random set of year columns.
fn wide_table() -> impl Strategy<Value = DataFrame> {
    (0usize..6, prop::collection::btree_set(1990i32..2005, 0..5)).prop_flat_map(|(rows, years)| {
        let years: Vec<i32> = years.into_iter().collect();
        let cells = prop::collection::vec(
            prop::collection::vec(gdp_cell(), rows),
            years.len(),
        );
        let continents = prop::collection::vec(prop::sample::select(CONTINENTS.to_vec()), rows);
        (Just(rows), Just(years), cells, continents)
    })
    .prop_map(|(rows, years, cells, continents)| {
        let mut columns = vec![
            Column::new(
                COUNTRY_NAME.into(),
                (0..rows).map(|i| format!("Country {i}")).collect::<Vec<_>>(),
            ),
            Column::new(CONTINENT.into(), continents),
        ];
        for (year, values) in years.iter().zip(cells) {
            columns.push(Column::new(year.to_string().into(), values));
        }
        DataFrame::new(columns).unwrap()
    })
}

/// Arbitrary column labels, some of which look like years.
fn labels() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set(
        prop_oneof![
            (1850i32..2150).prop_map(|y| y.to_string()),
            "[A-Za-z ]{1,12}",
            "[0-9]{1,6}",
        ],
        1..10,
    )
    .prop_map(|set| set.into_iter().collect())
}

fn gdp_values(df: &DataFrame) -> Vec<Option<f64>> {
    df.column(GDP_VALUE)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

// =============================================================================
// Reshape
// =============================================================================

proptest! {
    #[test]
    fn long_row_count_is_rows_times_years(wide in wide_table()) {
        let long = DataReshaper::to_long(&wide).unwrap();
        prop_assert_eq!(
            long.height(),
            wide.height() * DataReshaper::year_columns(&wide).len()
        );
    }

    #[test]
    fn year_columns_sorted_bounded_idempotent(names in labels()) {
        let columns: Vec<Column> = names
            .iter()
            .map(|name| Column::new(name.as_str().into(), vec![1.0f64]))
            .collect();
        let df = DataFrame::new(columns).unwrap();

        let years = DataReshaper::year_columns(&df);
        let parsed: Vec<i32> = years.iter().map(|y| y.parse().unwrap()).collect();
        prop_assert!(parsed.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(parsed.iter().all(|y| (1900..=2100).contains(y)));

        let again = DataReshaper::year_columns(&df.select(years.iter().map(String::as_str)).unwrap());
        prop_assert_eq!(again, years);
    }
}

// =============================================================================
// Clean
// =============================================================================

proptest! {
    #[test]
    fn remove_duplicates_is_idempotent(wide in wide_table(), copies in 1usize..3) {
        let long = DataReshaper::to_long(&wide).unwrap();
        let mut doubled = long.clone();
        for _ in 0..copies {
            doubled.vstack_mut(&long).unwrap();
        }

        let once = DataCleaner::remove_duplicates(&doubled, None).unwrap();
        let twice = DataCleaner::remove_duplicates(&once, None).unwrap();
        prop_assert!(once.equals_missing(&twice));
        prop_assert_eq!(once.height(), long.height());
    }

    #[test]
    fn every_strategy_leaves_no_gaps(
        values in prop::collection::vec(gdp_cell(), 1..40),
        anchor in 0u32..1000,
        strategy in prop::sample::select(MissingStrategy::ALL.to_vec()),
    ) {
        let mut values = values;
        values.push(Some(anchor as f64));
        let df = DataFrame::new(vec![Column::new(GDP_VALUE.into(), values)]).unwrap();

        let filled = DataCleaner::handle_missing(&df, strategy, false).unwrap();
        prop_assert!(gdp_values(&filled).iter().all(Option::is_some));
    }

    #[test]
    fn rows_removed_matches_heights(wide in wide_table()) {
        let long = DataReshaper::to_long(&wide).unwrap();
        let cleaned = DataCleaner::clean(&long, &CleanOptions::default()).unwrap();
        let summary = DataCleaner::cleaning_summary(&long, &cleaned);
        prop_assert_eq!(
            summary.rows_removed,
            long.height() as i64 - cleaned.height() as i64
        );
    }
}

// =============================================================================
// Aggregate
// =============================================================================

proptest! {
    #[test]
    fn continent_sums_preserve_total(wide in wide_table()) {
        let long = DataReshaper::to_long(&wide).unwrap();
        let total: f64 = gdp_values(&long).into_iter().flatten().sum();

        let grouped = DataFilter::aggregate(&long, Operation::Sum, GroupBy::Continent).unwrap();
        let grouped_total: f64 = gdp_values(&grouped).into_iter().flatten().sum();

        prop_assert!((total - grouped_total).abs() <= 1e-6 * total.abs().max(1.0));
        prop_assert_eq!(grouped.height(), DataReshaper::regions(&long).len());
    }
}
