//! Per-viewer dashboard state: the active view and the date filters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use socdash_core::Platform;

use crate::error::SessionError;
use crate::filter::{DateRange, YearMonth};

/// A named dashboard view. Each view belongs to exactly one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveView {
    /// Histogram of the engagement column.
    Distribution,
    /// Top companies by summed engagement.
    TopCompanies,
    /// Engagement summed per day.
    DailyTrend,
    /// Post count per day inside one month.
    PostsPerDay,
    /// Mean of each numeric column per content type.
    Engagement,
    /// Share of posts per content type.
    ContentDistribution,
}

const LINKEDIN_VIEWS: [ActiveView; 3] = [
    ActiveView::Distribution,
    ActiveView::TopCompanies,
    ActiveView::DailyTrend,
];

const INSTAGRAM_VIEWS: [ActiveView; 3] = [
    ActiveView::PostsPerDay,
    ActiveView::Engagement,
    ActiveView::ContentDistribution,
];

impl ActiveView {
    /// Views offered for `platform`, in menu order.
    #[must_use]
    pub fn for_platform(platform: Platform) -> &'static [ActiveView] {
        match platform {
            Platform::LinkedIn => &LINKEDIN_VIEWS,
            Platform::Instagram => &INSTAGRAM_VIEWS,
        }
    }

    /// View shown when a session starts.
    #[must_use]
    pub fn default_for(platform: Platform) -> Self {
        match platform {
            Platform::LinkedIn => Self::Distribution,
            Platform::Instagram => Self::PostsPerDay,
        }
    }

    #[must_use]
    pub fn platform(self) -> Platform {
        match self {
            Self::Distribution | Self::TopCompanies | Self::DailyTrend => Platform::LinkedIn,
            Self::PostsPerDay | Self::Engagement | Self::ContentDistribution => {
                Platform::Instagram
            }
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Distribution => "distribution",
            Self::TopCompanies => "top_companies",
            Self::DailyTrend => "daily_trend",
            Self::PostsPerDay => "posts_per_day",
            Self::Engagement => "engagement",
            Self::ContentDistribution => "content_distribution",
        }
    }

    /// Human-readable title.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Distribution => "Engagement distribution",
            Self::TopCompanies => "Top companies by engagement",
            Self::DailyTrend => "Daily engagement trend",
            Self::PostsPerDay => "Posts per day",
            Self::Engagement => "Average engagement by content type",
            Self::ContentDistribution => "Content type distribution",
        }
    }
}

impl fmt::Display for ActiveView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActiveView {
    type Err = SessionError;

    /// Accepts snake_case or kebab-case slugs, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let slug = s.trim().to_ascii_lowercase().replace('-', "_");
        LINKEDIN_VIEWS
            .iter()
            .chain(INSTAGRAM_VIEWS.iter())
            .copied()
            .find(|v| v.as_str() == slug)
            .ok_or_else(|| SessionError::UnknownView(s.to_string()))
    }
}

/// Dashboard state for one viewer.
///
/// `range` narrows every metric; `period` only affects
/// [`ActiveView::PostsPerDay`]. `None` means the dataset default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub platform: Platform,
    pub active_view: ActiveView,
    pub range: Option<DateRange>,
    pub period: Option<YearMonth>,
}

impl Session {
    #[must_use]
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            active_view: ActiveView::default_for(platform),
            range: None,
            period: None,
        }
    }

    /// Switch to `view`. Filters are kept.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ViewNotAvailable`] when `view` belongs to the
    /// other platform; the active view is left unchanged.
    pub fn select(&mut self, view: ActiveView) -> Result<(), SessionError> {
        if view.platform() != self.platform {
            return Err(SessionError::ViewNotAvailable {
                view,
                platform: self.platform,
            });
        }
        self.active_view = view;
        Ok(())
    }

    pub fn set_range(&mut self, range: Option<DateRange>) {
        self.range = range;
    }

    pub fn set_period(&mut self, period: Option<YearMonth>) {
        self.period = period;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_on_platform_default() {
        assert_eq!(
            Session::new(Platform::LinkedIn).active_view,
            ActiveView::Distribution
        );
        assert_eq!(
            Session::new(Platform::Instagram).active_view,
            ActiveView::PostsPerDay
        );
    }

    #[test]
    fn every_view_belongs_to_its_platform_menu() {
        for platform in [Platform::LinkedIn, Platform::Instagram] {
            let views = ActiveView::for_platform(platform);
            assert_eq!(views.len(), 3);
            assert!(views.iter().all(|v| v.platform() == platform));
            assert!(views.contains(&ActiveView::default_for(platform)));
        }
    }

    #[test]
    fn select_switches_within_platform() {
        let mut session = Session::new(Platform::LinkedIn);
        session.select(ActiveView::TopCompanies).unwrap();
        assert_eq!(session.active_view, ActiveView::TopCompanies);
        session.select(ActiveView::DailyTrend).unwrap();
        assert_eq!(session.active_view, ActiveView::DailyTrend);
    }

    #[test]
    fn select_rejects_other_platform_view() {
        let mut session = Session::new(Platform::Instagram);
        let err = session.select(ActiveView::TopCompanies).unwrap_err();
        assert_eq!(
            err,
            SessionError::ViewNotAvailable {
                view: ActiveView::TopCompanies,
                platform: Platform::Instagram
            }
        );
        assert_eq!(session.active_view, ActiveView::PostsPerDay);
    }

    #[test]
    fn parses_view_slugs() {
        assert_eq!(
            "top-companies".parse::<ActiveView>().unwrap(),
            ActiveView::TopCompanies
        );
        assert_eq!(
            " Posts_Per_Day ".parse::<ActiveView>().unwrap(),
            ActiveView::PostsPerDay
        );
        assert!(matches!(
            "pie".parse::<ActiveView>(),
            Err(SessionError::UnknownView(_))
        ));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for view in LINKEDIN_VIEWS.iter().chain(INSTAGRAM_VIEWS.iter()) {
            assert_eq!(view.to_string().parse::<ActiveView>().unwrap(), *view);
        }
    }
}
