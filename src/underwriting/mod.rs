//! Underwriting rules engine
//!
//! Biometrics, EMR aggregation, rating classification, verdict, flags and
//! premiums, orchestrated by [`UnderwritingEngine`].

pub mod biometrics;
pub mod emr;
pub mod engine;
pub mod flags;
pub mod premium;
pub mod rating;
pub mod report;
pub mod result;
pub mod verdict;

pub use emr::EmrBreakdown;
pub use engine::UnderwritingEngine;
pub use flags::{Flag, FlagKind, FlagSeverity};
pub use premium::{AccidentPremium, CirDeclineReason, CirPremium, CirQuote, LifePremium, Premiums};
pub use rating::Ratings;
pub use report::{format_currency, format_points, render_quote};
pub use result::{QuoteSummary, UnderwritingResult};
pub use verdict::{DecisionCategory, Verdict};
