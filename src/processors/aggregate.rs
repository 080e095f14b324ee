//! Per-(subject, activity) averaging and export of the tidy table.

use std::collections::BTreeMap;
use std::path::Path;

use log::info;

use crate::config::OutputConfig;
use crate::core::activity::ActivityLabel;
use crate::core::tables::{CombinedTable, TidyRow, TidyTable};
use crate::core::writers::{write_tidy_table, WriteError};

/// Running sums for one group.
struct GroupAccumulator {
    count: usize,
    sums: Vec<f64>,
}

/// Average every feature column within each (subject, activity) group.
///
/// Produces exactly one row per distinct pair, sorted by subject and then
/// by activity code.
pub fn aggregate(table: &CombinedTable) -> TidyTable {
    let width = table.feature_names.len();
    let mut groups: BTreeMap<(u32, ActivityLabel), GroupAccumulator> = BTreeMap::new();

    for ((features, &activity), &subject) in table
        .features
        .iter()
        .zip(table.activity.iter())
        .zip(table.subject.iter())
    {
        let group = groups
            .entry((subject, activity))
            .or_insert_with(|| GroupAccumulator {
                count: 0,
                sums: vec![0.0; width],
            });

        group.count += 1;
        for (sum, &value) in group.sums.iter_mut().zip(features.iter()) {
            *sum += value;
        }
    }

    let rows: Vec<TidyRow> = groups
        .into_iter()
        .map(|((subject, activity), group)| {
            let n = group.count as f64;
            TidyRow {
                subject,
                activity,
                means: group.sums.into_iter().map(|s| s / n).collect(),
            }
        })
        .collect();

    TidyTable {
        feature_names: table.feature_names.clone(),
        rows,
    }
}

/// Aggregate `table` and write the result to `config.path`.
pub fn aggregate_and_export(
    table: &CombinedTable,
    config: &OutputConfig,
) -> Result<TidyTable, WriteError> {
    aggregate_to(table, &config.path, config)
}

/// Aggregate `table` and write the result to `path`.
pub fn aggregate_to(
    table: &CombinedTable,
    path: &Path,
    config: &OutputConfig,
) -> Result<TidyTable, WriteError> {
    let tidy = aggregate(table);

    write_tidy_table(path, &tidy, config)?;
    info!(
        "Wrote {} groups x {} features to {}",
        tidy.len(),
        tidy.feature_names.len(),
        path.display()
    );

    Ok(tidy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Delimiter;
    use crate::core::activity::Activity;
    use crate::core::loaders::load_tidy_table;
    use std::collections::HashSet;
    use tempfile::tempdir;

    const WALKING: ActivityLabel = ActivityLabel::Known(Activity::Walking);
    const SITTING: ActivityLabel = ActivityLabel::Known(Activity::Sitting);
    const LAYING: ActivityLabel = ActivityLabel::Known(Activity::Laying);

    fn table(rows: Vec<(u32, ActivityLabel, Vec<f64>)>) -> CombinedTable {
        let width = rows.first().map_or(0, |r| r.2.len());
        let mut combined = CombinedTable {
            feature_names: (0..width).map(|i| format!("f{}-mean()", i)).collect(),
            ..CombinedTable::default()
        };
        for (subject, activity, features) in rows {
            combined.subject.push(subject);
            combined.activity.push(activity);
            combined.features.push(features);
        }
        combined
    }

    #[test]
    fn test_identical_values_keep_their_value() {
        let combined = table(vec![
            (1, WALKING, vec![0.1, -0.7]),
            (1, WALKING, vec![0.1, -0.7]),
            (1, SITTING, vec![0.3, 0.9]),
            (1, SITTING, vec![0.3, 0.9]),
            (2, WALKING, vec![-0.2, 0.05]),
            (2, WALKING, vec![-0.2, 0.05]),
            (2, SITTING, vec![1e-3, 2.5]),
            (2, SITTING, vec![1e-3, 2.5]),
        ]);

        let tidy = aggregate(&combined);

        assert_eq!(tidy.len(), 4);
        assert_eq!(tidy.rows[0].means, vec![0.1, -0.7]);
        assert_eq!(tidy.rows[1].means, vec![0.3, 0.9]);
        assert_eq!(tidy.rows[2].means, vec![-0.2, 0.05]);
        assert_eq!(tidy.rows[3].means, vec![1e-3, 2.5]);
    }

    #[test]
    fn test_mean_of_two_values() {
        let combined = table(vec![(5, LAYING, vec![2.0]), (5, LAYING, vec![4.0])]);

        let tidy = aggregate(&combined);

        assert_eq!(tidy.len(), 1);
        assert_eq!(tidy.rows[0].subject, 5);
        assert_eq!(tidy.rows[0].activity, LAYING);
        assert_eq!(tidy.rows[0].means, vec![3.0]);
    }

    #[test]
    fn test_one_row_per_distinct_pair_sorted() {
        let combined = table(vec![
            (3, LAYING, vec![1.0]),
            (1, SITTING, vec![2.0]),
            (3, WALKING, vec![3.0]),
            (1, SITTING, vec![4.0]),
            (1, WALKING, vec![5.0]),
            (3, LAYING, vec![6.0]),
        ]);

        let tidy = aggregate(&combined);

        let distinct: HashSet<(u32, ActivityLabel)> = combined
            .subject
            .iter()
            .copied()
            .zip(combined.activity.iter().copied())
            .collect();
        let subjects: HashSet<u32> = combined.subject.iter().copied().collect();

        assert_eq!(tidy.len(), distinct.len());
        assert!(tidy.len() <= subjects.len() * 6);

        let keys: Vec<(u32, ActivityLabel)> =
            tidy.rows.iter().map(|r| (r.subject, r.activity)).collect();
        assert_eq!(
            keys,
            vec![(1, WALKING), (1, SITTING), (3, WALKING), (3, LAYING)]
        );
        assert_eq!(tidy.rows[1].means, vec![3.0]);
        assert_eq!(tidy.rows[3].means, vec![3.5]);
    }

    #[test]
    fn test_unmapped_labels_group_separately() {
        let combined = table(vec![
            (1, ActivityLabel::Unmapped(9), vec![1.0]),
            (1, ActivityLabel::Unmapped(0), vec![2.0]),
            (1, WALKING, vec![3.0]),
        ]);

        let tidy = aggregate(&combined);
        let activities: Vec<String> = tidy.rows.iter().map(|r| r.activity.to_string()).collect();

        assert_eq!(activities, vec!["WALKING", "UNMAPPED_0", "UNMAPPED_9"]);
    }

    #[test]
    fn test_export_round_trip() {
        let dir = tempdir().unwrap();
        let combined = table(vec![
            (1, WALKING, vec![0.28858451, -0.020294171, -0.13290514]),
            (1, WALKING, vec![0.27841883, -0.016410568, -0.12352019]),
            (2, SITTING, vec![0.1, 0.2, 0.3]),
            (2, LAYING, vec![-1.0, 1.0, 1.0 / 3.0]),
        ]);

        for delimiter in [Delimiter::Comma, Delimiter::Space, Delimiter::Tab] {
            let config = OutputConfig {
                path: dir.path().join("tidy.txt"),
                delimiter,
                precision: None,
            };

            let tidy = aggregate_and_export(&combined, &config).unwrap();
            let reread = load_tidy_table(&config.path, delimiter).unwrap();

            assert_eq!(reread.feature_names, tidy.feature_names);
            assert_eq!(reread.len(), tidy.len());
            for (a, b) in reread.rows.iter().zip(tidy.rows.iter()) {
                assert_eq!(a.subject, b.subject);
                assert_eq!(a.activity, b.activity);
                for (x, y) in a.means.iter().zip(b.means.iter()) {
                    assert!((x - y).abs() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_empty_table() {
        let tidy = aggregate(&CombinedTable::default());
        assert!(tidy.is_empty());
    }
}
