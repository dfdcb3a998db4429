use crate::catalog::status::ReadingStatus;
use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BadgeColor {
    Green,
    Blue,
    Orange,
    Gray,
    Red,
    Violet,
}

/// Material Design icon names
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BadgeIcon {
    CheckCircle,
    BookmarkAdd,
    HourglassTop,
    VisibilityOff,
    Cancel,
    Help,
    Star,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub color: BadgeColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<BadgeIcon>,
    pub label: String,
}

/// Maps a stored status to its badge. Never fails: unknown statuses get a gray badge with a
/// question mark, labelled with whatever was stored.
#[must_use]
#[inline]
pub fn status_badge(status: &str) -> Badge {
    let label = status.trim();
    let (color, icon) = match ReadingStatus::parse(label) {
        Some(ReadingStatus::Read) => (BadgeColor::Green, BadgeIcon::CheckCircle),
        Some(ReadingStatus::ToRead) => (BadgeColor::Blue, BadgeIcon::BookmarkAdd),
        Some(ReadingStatus::InProgress) => (BadgeColor::Orange, BadgeIcon::HourglassTop),
        Some(ReadingStatus::NotRead) => (BadgeColor::Gray, BadgeIcon::VisibilityOff),
        Some(ReadingStatus::Abandoned) => (BadgeColor::Red, BadgeIcon::Cancel),
        None => (BadgeColor::Gray, BadgeIcon::Help),
    };
    Badge {
        color,
        icon: Some(icon),
        label: label.to_owned(),
    }
}

/// One violet star badge per category, or a single gray "-" badge without icon for a book
/// without any
#[must_use]
#[inline]
pub fn category_badges(names: &[&str]) -> Vec<Badge> {
    if names.is_empty() {
        return vec![Badge {
            color: BadgeColor::Gray,
            icon: None,
            label: String::from("-"),
        }];
    }
    names
        .iter()
        .map(|name| Badge {
            color: BadgeColor::Violet,
            icon: Some(BadgeIcon::Star),
            label: (*name).to_owned(),
        })
        .collect()
}
