//! Activity codes and their descriptive labels.

use std::fmt;
use std::str::FromStr;

/// Physical activity performed during a recording window.
///
/// Variants are declared in code order, so the derived `Ord` sorts
/// activities by their numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Activity {
    Walking,
    WalkingUpstairs,
    WalkingDownstairs,
    Sitting,
    Standing,
    Laying,
}

impl Activity {
    /// All activities in code order.
    pub const ALL: [Activity; 6] = [
        Activity::Walking,
        Activity::WalkingUpstairs,
        Activity::WalkingDownstairs,
        Activity::Sitting,
        Activity::Standing,
        Activity::Laying,
    ];

    /// Look up the activity for a raw code (1..=6).
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Activity::Walking),
            2 => Some(Activity::WalkingUpstairs),
            3 => Some(Activity::WalkingDownstairs),
            4 => Some(Activity::Sitting),
            5 => Some(Activity::Standing),
            6 => Some(Activity::Laying),
            _ => None,
        }
    }

    /// Raw code used in the `y_*.txt` files.
    pub fn code(self) -> i64 {
        match self {
            Activity::Walking => 1,
            Activity::WalkingUpstairs => 2,
            Activity::WalkingDownstairs => 3,
            Activity::Sitting => 4,
            Activity::Standing => 5,
            Activity::Laying => 6,
        }
    }

    /// Descriptive label as written to the output.
    pub fn label(self) -> &'static str {
        match self {
            Activity::Walking => "WALKING",
            Activity::WalkingUpstairs => "WALKING_UPSTAIRS",
            Activity::WalkingDownstairs => "WALKING_DOWNSTAIRS",
            Activity::Sitting => "SITTING",
            Activity::Standing => "STANDING",
            Activity::Laying => "LAYING",
        }
    }
}

/// Prefix of the sentinel label for codes outside 1..=6.
pub const UNMAPPED_PREFIX: &str = "UNMAPPED_";

/// Value of the `activity` column.
///
/// Known labels sort before unmapped ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActivityLabel {
    Known(Activity),
    Unmapped(i64),
}

impl ActivityLabel {
    /// Returns true if the label is one of the six defined activities.
    #[inline]
    pub fn is_known(&self) -> bool {
        matches!(self, ActivityLabel::Known(_))
    }
}

impl From<Activity> for ActivityLabel {
    fn from(activity: Activity) -> Self {
        ActivityLabel::Known(activity)
    }
}

impl fmt::Display for ActivityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityLabel::Known(activity) => f.write_str(activity.label()),
            ActivityLabel::Unmapped(code) => write!(f, "{}{}", UNMAPPED_PREFIX, code),
        }
    }
}

impl FromStr for ActivityLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(activity) = Activity::ALL.iter().find(|a| a.label() == s) {
            return Ok(ActivityLabel::Known(*activity));
        }

        s.strip_prefix(UNMAPPED_PREFIX)
            .and_then(|code| code.parse().ok())
            .map(ActivityLabel::Unmapped)
            .ok_or_else(|| format!("unknown activity label: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_lookup() {
        assert_eq!(Activity::from_code(1), Some(Activity::Walking));
        assert_eq!(Activity::from_code(6), Some(Activity::Laying));
        assert_eq!(Activity::from_code(0), None);
        assert_eq!(Activity::from_code(7), None);

        for activity in Activity::ALL {
            assert_eq!(Activity::from_code(activity.code()), Some(activity));
        }
    }

    #[test]
    fn test_label_display_and_parse() {
        let label = ActivityLabel::Known(Activity::WalkingDownstairs);
        assert_eq!(label.to_string(), "WALKING_DOWNSTAIRS");
        assert_eq!("WALKING_DOWNSTAIRS".parse::<ActivityLabel>(), Ok(label));

        let unmapped = ActivityLabel::Unmapped(9);
        assert_eq!(unmapped.to_string(), "UNMAPPED_9");
        assert_eq!("UNMAPPED_9".parse::<ActivityLabel>(), Ok(unmapped));

        assert!("walking".parse::<ActivityLabel>().is_err());
        assert!("UNMAPPED_x".parse::<ActivityLabel>().is_err());
    }

    #[test]
    fn test_ordering_follows_codes() {
        let mut labels = vec![
            ActivityLabel::Unmapped(0),
            ActivityLabel::Known(Activity::Laying),
            ActivityLabel::Known(Activity::Walking),
            ActivityLabel::Known(Activity::Sitting),
        ];
        labels.sort();

        assert_eq!(
            labels,
            vec![
                ActivityLabel::Known(Activity::Walking),
                ActivityLabel::Known(Activity::Sitting),
                ActivityLabel::Known(Activity::Laying),
                ActivityLabel::Unmapped(0),
            ]
        );
    }
}
