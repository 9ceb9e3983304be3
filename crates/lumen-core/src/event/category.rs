use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::SchemaError;

/// Event category. Closed set; the collector rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Interaction,
    Navigation,
    Perf,
    Engagement,
    Error,
    Lifecycle,
    Heartbeat,
    Intro,
    Config,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Self::Interaction,
        Self::Navigation,
        Self::Perf,
        Self::Engagement,
        Self::Error,
        Self::Lifecycle,
        Self::Heartbeat,
        Self::Intro,
        Self::Config,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Interaction => "interaction",
            Self::Navigation => "navigation",
            Self::Perf => "perf",
            Self::Engagement => "engagement",
            Self::Error => "error",
            Self::Lifecycle => "lifecycle",
            Self::Heartbeat => "heartbeat",
            Self::Intro => "intro",
            Self::Config => "config",
        }
    }

    /// Actions allowed under this category.
    pub fn actions(self) -> impl Iterator<Item = Action> {
        Action::ALL.into_iter().filter(move |a| a.category() == self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownCategory {
                category: s.to_string(),
            })
    }
}

/// Event action. Every action belongs to exactly one [`Category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    // interaction
    CtaClick,
    LinkClick,
    FormSubmit,
    Toggle,
    // navigation
    SectionView,
    PageView,
    RouteChange,
    // perf
    HeroPaint,
    Fid,
    ClsTotal,
    QuoteTransition,
    PerfMetric,
    // engagement
    VisibilityChange,
    Focus,
    ScrollDepth,
    TimeOnPage,
    // error
    Exception,
    UnhandledRejection,
    // lifecycle
    PageLoad,
    PageHide,
    ConsentGranted,
    ConsentRevoked,
    // heartbeat
    Tick,
    // intro
    IntroStart,
    IntroComplete,
    IntroSkip,
    // config
    TransportConfigured,
    SamplingUpdated,
}

impl Action {
    pub const ALL: [Action; 28] = [
        Self::CtaClick,
        Self::LinkClick,
        Self::FormSubmit,
        Self::Toggle,
        Self::SectionView,
        Self::PageView,
        Self::RouteChange,
        Self::HeroPaint,
        Self::Fid,
        Self::ClsTotal,
        Self::QuoteTransition,
        Self::PerfMetric,
        Self::VisibilityChange,
        Self::Focus,
        Self::ScrollDepth,
        Self::TimeOnPage,
        Self::Exception,
        Self::UnhandledRejection,
        Self::PageLoad,
        Self::PageHide,
        Self::ConsentGranted,
        Self::ConsentRevoked,
        Self::Tick,
        Self::IntroStart,
        Self::IntroComplete,
        Self::IntroSkip,
        Self::TransportConfigured,
        Self::SamplingUpdated,
    ];

    /// The category that owns this action.
    ///
    /// Exhaustive on purpose: a new action does not compile until it is
    /// assigned a category.
    pub fn category(self) -> Category {
        match self {
            Self::CtaClick | Self::LinkClick | Self::FormSubmit | Self::Toggle => {
                Category::Interaction
            }
            Self::SectionView | Self::PageView | Self::RouteChange => Category::Navigation,
            Self::HeroPaint
            | Self::Fid
            | Self::ClsTotal
            | Self::QuoteTransition
            | Self::PerfMetric => Category::Perf,
            Self::VisibilityChange | Self::Focus | Self::ScrollDepth | Self::TimeOnPage => {
                Category::Engagement
            }
            Self::Exception | Self::UnhandledRejection => Category::Error,
            Self::PageLoad | Self::PageHide | Self::ConsentGranted | Self::ConsentRevoked => {
                Category::Lifecycle
            }
            Self::Tick => Category::Heartbeat,
            Self::IntroStart | Self::IntroComplete | Self::IntroSkip => Category::Intro,
            Self::TransportConfigured | Self::SamplingUpdated => Category::Config,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CtaClick => "cta_click",
            Self::LinkClick => "link_click",
            Self::FormSubmit => "form_submit",
            Self::Toggle => "toggle",
            Self::SectionView => "section_view",
            Self::PageView => "page_view",
            Self::RouteChange => "route_change",
            Self::HeroPaint => "hero_paint",
            Self::Fid => "fid",
            Self::ClsTotal => "cls_total",
            Self::QuoteTransition => "quote_transition",
            Self::PerfMetric => "perf_metric",
            Self::VisibilityChange => "visibility_change",
            Self::Focus => "focus",
            Self::ScrollDepth => "scroll_depth",
            Self::TimeOnPage => "time_on_page",
            Self::Exception => "exception",
            Self::UnhandledRejection => "unhandled_rejection",
            Self::PageLoad => "page_load",
            Self::PageHide => "page_hide",
            Self::ConsentGranted => "consent_granted",
            Self::ConsentRevoked => "consent_revoked",
            Self::Tick => "tick",
            Self::IntroStart => "intro_start",
            Self::IntroComplete => "intro_complete",
            Self::IntroSkip => "intro_skip",
            Self::TransportConfigured => "transport_configured",
            Self::SamplingUpdated => "sampling_updated",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownAction {
                action: s.to_string(),
            })
    }
}
